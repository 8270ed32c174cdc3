use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_STRING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""[^"\n]*""#).unwrap());
static RE_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"\n]*)"|//([^\n]*)"#).unwrap());
static RE_MASKED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").unwrap());

pub type Rewrite = fn(&str) -> String;

/// A named, total text rewrite. Tables of rules run left to right.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub rewrite: Rewrite,
}

pub fn apply(rules: &[Rule], text: &str) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| (rule.rewrite)(&acc))
}

pub fn names(rules: &[Rule]) -> Vec<&'static str> {
    rules.iter().map(|r| r.name).collect()
}

/// Applies `f` to every region of `text` outside double-quoted string
/// literals. Literals are copied through unchanged.
pub fn outside_strings<F>(text: &str, f: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in RE_STRING.find_iter(text) {
        out.push_str(&f(&text[last..m.start()]));
        out.push_str(m.as_str());
        last = m.end();
    }
    out.push_str(&f(&text[last..]));
    out
}

/// Code text whose string literal and `//` comment contents are replaced by
/// numbered tokens. The quotes and the `//` marker stay in place.
pub struct Masked {
    pub text: String,
    contents: Vec<String>,
}

pub fn mask(text: &str) -> Masked {
    let mut contents = Vec::new();
    let text = RE_LITERAL
        .replace_all(text, |caps: &Captures| {
            let (open, close, inner) = match caps.get(1) {
                Some(m) => ("\"", "\"", m.as_str()),
                None => ("//", "", caps.get(2).map_or("", |m| m.as_str())),
            };
            contents.push(inner.to_string());
            format!("{}\u{E000}{}\u{E001}{}", open, contents.len() - 1, close)
        })
        .into_owned();
    Masked { text, contents }
}

impl Masked {
    /// Puts the original contents back into rewritten text.
    pub fn restore(&self, text: &str) -> String {
        RE_MASKED
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| self.contents.get(i))
                    .map_or_else(|| caps[0].to_string(), String::clone)
            })
            .into_owned()
    }
}

pub fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shout(text: &str) -> String {
        text.to_uppercase()
    }

    fn bang(text: &str) -> String {
        format!("{}!", text)
    }

    #[test]
    fn test_apply_runs_in_order() {
        let rules = [
            Rule { name: "shout", rewrite: shout },
            Rule { name: "bang", rewrite: bang },
        ];
        assert_eq!(apply(&rules, "hi"), "HI!");
        assert_eq!(names(&rules), vec!["shout", "bang"]);
    }

    #[test]
    fn test_apply_empty_table() {
        assert_eq!(apply(&[], "unchanged"), "unchanged");
    }

    #[test]
    fn test_outside_strings_skips_literals() {
        let result = outside_strings(r#"a = "a" & a"#, |s| s.replace('a', "b"));
        assert_eq!(result, r#"b = "a" & b"#);
    }

    #[test]
    fn test_outside_strings_doubled_quotes() {
        let result = outside_strings(r#"x = "say ""x""" x"#, |s| s.replace('x', "y"));
        assert_eq!(result, r#"y = "say ""x""" y"#);
    }

    #[test]
    fn test_mask_hides_strings_and_comments() {
        let masked = mask("x = \"if a then\" // case when\ny = 1");
        assert!(!masked.text.contains("if"));
        assert!(!masked.text.contains("case"));
        assert!(masked.text.starts_with("x = \""));
        assert!(masked.text.ends_with("\ny = 1"));
        assert_eq!(masked.restore(&masked.text), "x = \"if a then\" // case when\ny = 1");
    }

    #[test]
    fn test_mask_comment_marker_inside_string() {
        let masked = mask(r#"u = "http://host" // link"#);
        assert!(!masked.text.contains("host"));
        assert!(!masked.text.contains("link"));
        assert_eq!(masked.restore(&masked.text), r#"u = "http://host" // link"#);
    }

    #[test]
    fn test_restore_after_rewrite() {
        let masked = mask(r#"If s = "and" Then"#);
        let rewritten = masked.text.replace("If", "if (").replace(" Then", ") {");
        assert_eq!(masked.restore(&rewritten), r#"if ( s = "and") {"#);
    }

    #[test]
    fn test_upper_first() {
        assert_eq!(upper_first("name"), "Name");
        assert_eq!(upper_first(""), "");
        assert_eq!(upper_first("Id"), "Id");
    }
}
