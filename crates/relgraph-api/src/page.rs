//! Server-rendered upload page
//!
//! Author: hephaex@gmail.com

use relgraph_parser::InputKind;
use relgraph_pipeline::PipelineOutput;

const TEMPLATE: &str = include_str!("templates/index.html");

/// What the page shows below the form
pub enum Outcome<'a> {
    /// Fresh page, nothing submitted yet
    Initial,
    /// Pipeline finished, possibly without a graph
    Finished(&'a PipelineOutput),
    /// Request failed
    Failed(&'a str),
}

/// The single page of the web interface
pub struct IndexPage<'a> {
    pub input_kind: InputKind,
    pub text: &'a str,
    pub outcome: Outcome<'a>,
}

impl<'a> IndexPage<'a> {
    pub fn initial() -> Self {
        Self {
            input_kind: InputKind::Text,
            text: "",
            outcome: Outcome::Initial,
        }
    }

    pub fn render(&self) -> String {
        let checked = |kind: InputKind| if self.input_kind == kind { " checked" } else { "" };
        let text = escape_html(self.text);
        let result = self.result_section();

        fill(
            TEMPLATE,
            &[
                ("__TEXT_CHECKED__", checked(InputKind::Text)),
                ("__PDF_CHECKED__", checked(InputKind::Pdf)),
                ("__TEXT_VALUE__", text.as_str()),
                ("__RESULT__", result.as_str()),
            ],
        )
    }

    fn result_section(&self) -> String {
        match &self.outcome {
            Outcome::Initial => String::new(),
            Outcome::Failed(message) => {
                format!(r#"<div class="error" role="alert">{}</div>"#, escape_html(message))
            }
            Outcome::Finished(output) => match &output.graph_html {
                Some(graph_html) => {
                    let mut section = String::from("<h2>Relation graph</h2>\n");
                    section.push_str(&format!(
                        r#"<iframe title="Relation graph" srcdoc="{}"></iframe>"#,
                        escape_html(graph_html)
                    ));
                    section.push_str("\n<h2>Extracted triplets</h2>\n<table>\n");
                    section.push_str("<tr><th>Subject</th><th>Relation</th><th>Object</th></tr>\n");
                    for t in &output.triplets {
                        section.push_str(&format!(
                            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                            escape_html(&t.subject),
                            escape_html(&t.relation),
                            escape_html(&t.object)
                        ));
                    }
                    section.push_str("</table>");
                    section
                }
                None => r#"<p class="empty">No graph: no relations were extracted from the input.</p>"#
                    .to_string(),
            },
        }
    }
}

/// Substitute placeholders in template order, without rescanning
/// inserted values.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    for (key, value) in values {
        if let Some(at) = rest.find(key) {
            out.push_str(&rest[..at]);
            out.push_str(value);
            rest = &rest[at + key.len()..];
        }
    }
    out.push_str(rest);
    out
}

/// Escape text for HTML content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgraph_core::Triplet;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_initial_page() {
        let html = IndexPage::initial().render();
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(html.contains(r#"value="Text" checked"#));
        assert!(!html.contains("__RESULT__"));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn test_text_is_not_rescanned() {
        let page = IndexPage {
            input_kind: InputKind::Pdf,
            text: "__RESULT__ </textarea>",
            outcome: Outcome::Failed("boom"),
        };
        let html = page.render();

        assert!(html.contains("__RESULT__ &lt;/textarea&gt;"));
        assert!(html.contains(r#"value="PDF File" checked"#));
        assert_eq!(html.matches("boom").count(), 1);
    }

    #[test]
    fn test_graph_and_table() {
        let output = PipelineOutput {
            triplets: vec![Triplet::new("Paris", "is capital of", "France")],
            graph_html: Some(r#"<div id="graph">"</div>"#.to_string()),
        };
        let page = IndexPage {
            input_kind: InputKind::Text,
            text: "Paris is the capital of France.",
            outcome: Outcome::Finished(&output),
        };
        let html = page.render();

        assert!(html.contains(
            r#"srcdoc="&lt;div id=&quot;graph&quot;&gt;&quot;&lt;/div&gt;""#
        ));
        assert!(html.contains("<td>Paris</td><td>is capital of</td><td>France</td>"));
    }

    #[test]
    fn test_empty_result_shows_no_graph() {
        let output = PipelineOutput::empty();
        let page = IndexPage {
            input_kind: InputKind::Text,
            text: "",
            outcome: Outcome::Finished(&output),
        };
        let html = page.render();

        assert!(html.contains("No graph"));
        assert!(!html.contains("<iframe"));
    }
}
