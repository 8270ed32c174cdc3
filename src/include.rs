use crate::config::Config;
use crate::ir::{IncludeItem, Span, SpanKind};
use indexmap::IndexMap;
use regex::Regex;

pub struct IncludeResolver {
    directive: Regex,
    dedupe: bool,
}

impl IncludeResolver {
    pub fn new(config: &Config) -> Self {
        let pattern = format!(
            r#"(?i)<!--\s*#include\s+(?:file|virtual)\s*=\s*"([^"]*/)?([^"/]+?)\.{}"\s*-->"#,
            regex::escape(&config.source_extension)
        );
        IncludeResolver {
            directive: Regex::new(&pattern).unwrap(),
            dedupe: config.dedupe_includes,
        }
    }

    /// Replaces every directive found in markup with a code span that calls
    /// the included unit, and returns the items in discovery order.
    pub fn resolve(&self, spans: Vec<Span>) -> (Vec<Span>, Vec<IncludeItem>) {
        let mut items: Vec<IncludeItem> = Vec::new();
        let mut out: Vec<Span> = Vec::with_capacity(spans.len());

        for span in spans {
            if span.kind != SpanKind::Markup {
                out.push(span);
                continue;
            }
            let mut last = 0;
            for caps in self.directive.captures_iter(&span.text) {
                let whole = caps.get(0).map_or(0..0, |m| m.range());
                if whole.start > last {
                    out.push(Span::markup(&span.text[last..whole.start]));
                }
                let dir = caps.get(1).map_or("./", |m| m.as_str());
                let base = &caps[2];
                let name = unit_identifier(base);
                out.push(Span::code(format!("\n{}();\n", name)));
                items.push(IncludeItem {
                    name,
                    path: format!("{}{}", dir, base),
                });
                last = whole.end;
            }
            if last < span.text.len() {
                out.push(Span::markup(&span.text[last..]));
            }
        }

        if self.dedupe {
            let mut unique: IndexMap<String, IncludeItem> = IndexMap::new();
            for item in items {
                unique.entry(item.name.clone()).or_insert(item);
            }
            items = unique.into_values().collect();
        }

        tracing::debug!(includes = items.len(), "resolved include directives");
        (out, items)
    }
}

/// Turns a file base name into a TypeScript identifier.
pub fn unit_identifier(base: &str) -> String {
    let mut ident: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;

    fn resolve(text: &str) -> (Vec<Span>, Vec<IncludeItem>) {
        IncludeResolver::new(&Config::default()).resolve(segment(text))
    }

    #[test]
    fn test_directive_with_directory() {
        let (spans, items) = resolve(r#"<!-- #include file="lib/header.asp" -->"#);
        assert_eq!(
            items,
            vec![IncludeItem {
                name: "header".to_string(),
                path: "lib/header".to_string(),
            }]
        );
        assert_eq!(spans, vec![Span::code("\nheader();\n")]);
    }

    #[test]
    fn test_directive_without_directory() {
        let (_, items) = resolve(r#"<!-- #include file="footer.asp" -->"#);
        assert_eq!(items[0].path, "./footer");
    }

    #[test]
    fn test_directive_case_insensitive() {
        let (_, items) = resolve(r#"<!--#INCLUDE FILE="../inc/Nav.ASP"-->"#);
        assert_eq!(items[0].name, "Nav");
        assert_eq!(items[0].path, "../inc/Nav");
    }

    #[test]
    fn test_virtual_directive() {
        let (_, items) = resolve(r#"<!-- #include virtual="/shared/menu.asp" -->"#);
        assert_eq!(items[0].path, "/shared/menu");
    }

    #[test]
    fn test_surrounding_markup_kept() {
        let (spans, _) = resolve(r#"<p>a</p><!-- #include file="x.asp" --><p>b</p>"#);
        assert_eq!(
            spans,
            vec![
                Span::markup("<p>a</p>"),
                Span::code("\nx();\n"),
                Span::markup("<p>b</p>"),
            ]
        );
    }

    #[test]
    fn test_discovery_order_and_duplicates() {
        let text = r#"<!-- #include file="a.asp" --><!-- #include file="b.asp" --><!-- #include file="a.asp" -->"#;
        let (_, items) = resolve(text);
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_dedupe_keeps_first() {
        let config = Config {
            dedupe_includes: true,
            ..Config::default()
        };
        let text = r#"<!-- #include file="a.asp" --><!-- #include file="b.asp" --><!-- #include file="a.asp" -->"#;
        let (spans, items) = IncludeResolver::new(&config).resolve(segment(text));
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(spans.len(), 3);
    }

    #[test]
    fn test_directive_inside_code_ignored() {
        let (spans, items) = resolve(r#"<% x = "<!-- #include file=""y.asp"" -->" %>"#);
        assert!(items.is_empty());
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_other_extension_not_matched() {
        let (_, items) = resolve(r#"<!-- #include file="util.inc" -->"#);
        assert!(items.is_empty());
    }

    #[test]
    fn test_unit_identifier() {
        assert_eq!(unit_identifier("header"), "header");
        assert_eq!(unit_identifier("site-nav"), "site_nav");
        assert_eq!(unit_identifier("404"), "_404");
    }
}
