use crate::ir::{Span, SpanKind};

pub const CODE_START: &str = "<%";
pub const CODE_END: &str = "%>";

/// Splits a page into markup, code and inline-output spans.
///
/// Markers do not nest: a `<%` opens a span that the next `%>` closes. A `<%`
/// that is never closed turns the rest of the document into one unterminated
/// code span.
pub fn segment(text: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(CODE_START) {
        if start > 0 {
            spans.push(Span::markup(&rest[..start]));
        }
        let inner = &rest[start + CODE_START.len()..];
        match inner.find(CODE_END) {
            Some(end) => {
                let body = &inner[..end];
                spans.push(match body.strip_prefix('=') {
                    Some(expr) => Span::output(expr),
                    None => Span::code(body),
                });
                rest = &inner[end + CODE_END.len()..];
            }
            None => {
                tracing::warn!(
                    offset = text.len() - rest.len() + start,
                    "unterminated code block, treating remainder as code"
                );
                spans.push(Span::unterminated(inner));
                rest = "";
            }
        }
    }

    if !rest.is_empty() {
        spans.push(Span::markup(rest));
    }
    spans
}

/// Reassembles spans into page text, markers included.
pub fn render(spans: &[Span]) -> String {
    let mut out = String::new();
    for span in spans {
        match span.kind {
            SpanKind::Markup => out.push_str(&span.text),
            SpanKind::Code => {
                out.push_str(CODE_START);
                out.push_str(&span.text);
                if span.terminated {
                    out.push_str(CODE_END);
                }
            }
            SpanKind::Output => {
                out.push_str(CODE_START);
                out.push('=');
                out.push_str(&span.text);
                out.push_str(CODE_END);
            }
        }
    }
    out
}

/// Joins runs of adjacent markup spans and drops empty ones.
pub fn merge_markup(spans: Vec<Span>) -> Vec<Span> {
    let mut out: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if span.is_markup() {
            if span.text.is_empty() {
                continue;
            }
            if let Some(prev) = out.last_mut().filter(|p| p.is_markup()) {
                prev.text.push_str(&span.text);
                continue;
            }
        }
        out.push(span);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_only() {
        let spans = segment("<p>hello</p>");
        assert_eq!(spans, vec![Span::markup("<p>hello</p>")]);
    }

    #[test]
    fn test_empty_document() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_code_and_markup() {
        let spans = segment("a<% x = 1 %>b");
        assert_eq!(
            spans,
            vec![Span::markup("a"), Span::code(" x = 1 "), Span::markup("b")]
        );
    }

    #[test]
    fn test_output_span() {
        let spans = segment("<%= name %>");
        assert_eq!(spans, vec![Span::output(" name ")]);
    }

    #[test]
    fn test_first_end_marker_wins() {
        let spans = segment("<% a %> mid <% b %>");
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0], Span::code(" a "));
        assert_eq!(spans[1], Span::markup(" mid "));
        assert_eq!(spans[2], Span::code(" b "));
    }

    #[test]
    fn test_unterminated_code() {
        let spans = segment("x<% if y then");
        assert_eq!(spans, vec![Span::markup("x"), Span::unterminated(" if y then")]);
    }

    #[test]
    fn test_stray_end_marker_is_markup() {
        let spans = segment("50%> off");
        assert_eq!(spans, vec![Span::markup("50%> off")]);
    }

    #[test]
    fn test_render_reconstructs_document() {
        let docs = [
            "",
            "plain",
            "a<% b %>c<%= d %>e",
            "<%x%><%y%>",
            "tail <% open",
        ];
        for doc in docs {
            assert_eq!(render(&segment(doc)), doc);
        }
    }

    #[test]
    fn test_merge_markup() {
        let spans = vec![
            Span::markup("a"),
            Span::markup(""),
            Span::markup("b"),
            Span::code("c"),
            Span::markup(""),
            Span::code("d"),
        ];
        assert_eq!(
            merge_markup(spans),
            vec![Span::markup("ab"), Span::code("c"), Span::code("d")]
        );
    }
}
