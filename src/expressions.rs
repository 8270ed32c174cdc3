use crate::config::Config;
use crate::ir::{Span, SpanKind};
use crate::segment;
use fancy_regex::{Captures as FancyCaptures, Regex as FancyRegex};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static RE_RECORD: LazyLock<FancyRegex> = LazyLock::new(|| {
    FancyRegex::new(r#"(?<![\w.])([A-Za-z_]\w*)(\("[^"\n]*"\))(?!\.Value\b)"#).unwrap()
});

/// The two targeted rewrites applied to every expression: record field access
/// gets `.Value`, and indexed lookups use bracket syntax.
pub struct Normalizers {
    accessors: Vec<String>,
    lookup: Regex,
    lookup_index: String,
}

impl Normalizers {
    pub fn new(config: &Config) -> Self {
        let pattern = format!(
            r"(?i)\b({}[\w.]*)\({}\)",
            regex::escape(&config.lookup_prefix),
            regex::escape(&config.lookup_index)
        );
        Normalizers {
            accessors: config.record_accessors.clone(),
            lookup: Regex::new(&pattern).unwrap(),
            lookup_index: config.lookup_index.clone(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        let text = self.record_accessor(text);
        self.indexed_lookup(&text)
    }

    /// `name("key")` → `name("key").Value`
    pub fn record_accessor(&self, text: &str) -> String {
        RE_RECORD
            .replace_all(text, |caps: &FancyCaptures| {
                let name = caps.get(1).map_or("", |m| m.as_str());
                let call = caps.get(0).map_or("", |m| m.as_str());
                if self.is_accessor(name) {
                    format!("{}.Value", call)
                } else {
                    call.to_string()
                }
            })
            .into_owned()
    }

    /// `l_title(p_lan)` → `l_title[p_lan]`
    pub fn indexed_lookup(&self, text: &str) -> String {
        self.lookup
            .replace_all(text, |caps: &Captures| format!("{}[{}]", &caps[1], self.lookup_index))
            .into_owned()
    }

    fn is_accessor(&self, name: &str) -> bool {
        self.accessors.is_empty() || self.accessors.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// Turns inline output spans into `${…}` placeholders inside the surrounding
/// markup. Markup is escaped for a template literal first, so only the
/// placeholders stay live.
pub fn translate(spans: Vec<Span>, normalizers: &Normalizers, escape: bool) -> Vec<Span> {
    let spans: Vec<Span> = spans
        .into_iter()
        .map(|span| match span.kind {
            SpanKind::Markup if escape => Span::markup(escape_literal(&span.text)),
            SpanKind::Output => Span::markup(placeholder(&span.text, normalizers)),
            _ => span,
        })
        .collect();
    segment::merge_markup(spans)
}

pub fn placeholder(expr: &str, normalizers: &Normalizers) -> String {
    format!("${{{}}}", normalizers.apply(expr.trim()))
}

pub fn escape_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
