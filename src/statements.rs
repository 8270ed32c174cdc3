use crate::class;
use crate::expressions::Normalizers;
use crate::ir::{Span, SpanKind};
use crate::rules::{self, outside_strings, Rule};
use fancy_regex::Regex as FancyRegex;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Dialect cleanups on a raw code span, before class extraction.
pub const PRELUDE: &[Rule] = &[
    Rule { name: "line_continuation", rewrite: fold_continuations },
    Rule { name: "parameter_modes", rewrite: parameter_modes },
    Rule { name: "class_events", rewrite: class_events },
    Rule { name: "nothing", rewrite: nothing },
];

/// Statement rewrites. Function and loop headers are line-anchored, so they
/// run after variable syntax has been normalised. They see masked text: no
/// rule reaches into a string literal or a comment.
pub const STATEMENTS: &[Rule] = &[
    Rule { name: "variables", rewrite: variables },
    Rule { name: "switch", rewrite: switch },
    Rule { name: "conditionals", rewrite: conditionals },
    Rule { name: "functions", rewrite: functions },
    Rule { name: "for_loops", rewrite: for_loops },
    Rule { name: "do_loops", rewrite: do_loops },
    Rule { name: "split", rewrite: split },
];

static RE_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+_[ \t]*\r?\n[ \t]*").unwrap());
static RE_BYREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bByRef\b").unwrap());
static RE_BYVAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bByVal[ \t]+").unwrap());
static RE_CLASS_INITIALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bClass_Initialize\b").unwrap());
static RE_CLASS_TERMINATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bClass_Terminate\b").unwrap());
static RE_NOTHING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bNothing\b").unwrap());

static RE_REM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?im)^([ \t]*)rem\b").unwrap());

static RE_DIM_SET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|\s)Dim[ \t]+\w+[ \t]*:[ \t]*(?:Set[ \t]+)?").unwrap()
});
static RE_DIM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(^|\s)Dim[ \t]+").unwrap());
static RE_SET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(^|\s)Set[ \t]+").unwrap());
static RE_ME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bMe\b").unwrap());
static RE_NEW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bNew[ \t]+(\w+)").unwrap());
static RE_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(^|\s)Call[ \t]+").unwrap());

static RE_SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bselect[ \t]+case[ \t]+([^\n]*)").unwrap());
static RE_END_SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bend[ \t]+select\b").unwrap());
static RE_CASE_ELSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(^|\s)case[ \t]+else\b").unwrap());
static RE_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(^|\s)case[ \t]+((?:"[^"\n]*"|[\w.\-]+)(?:[ \t]*,[ \t]*(?:"[^"\n]*"|[\w.\-]+))*)"#,
    )
    .unwrap()
});
static RE_CASE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"\n]*"|[\w.\-]+"#).unwrap());

static RE_END_IF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bend[ \t]+if\b").unwrap());
static RE_ELSEIF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\belseif[ \t]+(.*?)[ \t]+then\b").unwrap());
static RE_IF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bif[ \t]+(.*?)[ \t]+then\b([^\n]*)").unwrap());
static RE_INLINE_ELSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\belse\b").unwrap());
static RE_ELSE: LazyLock<FancyRegex> =
    LazyLock::new(|| FancyRegex::new(r"(?i)\belse\b(?![ \t]*(?:\{|if\b))").unwrap());

static RE_AND: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)[ \t]+and[ \t]+").unwrap());
static RE_OR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)[ \t]+or[ \t]+").unwrap());
static RE_NOT_EQUAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]*<>[ \t]*").unwrap());
static RE_IS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)[ \t]+is[ \t]+").unwrap());
static RE_NOT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bnot[ \t]+").unwrap());
static RE_EQUAL: LazyLock<FancyRegex> =
    LazyLock::new(|| FancyRegex::new(r"(?<![<>!=])[ \t]*=(?!=)[ \t]*").unwrap());

static RE_EXIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bexit[ \t]+(?:function|sub|property)\b").unwrap());
static RE_END_FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bend[ \t]+(?:function|sub)\b").unwrap());
static RE_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(private|public)[ \t]+)?(?:default[ \t]+)?\b(?:function|sub)[ \t]+(\w+)(?:[ \t]*\(([^)\n]*)\))?",
    )
    .unwrap()
});

static RE_FOR_EACH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bfor[ \t]+each[ \t]+(\w+)[ \t]+in[ \t]+([^\n]*)").unwrap()
});
static RE_FOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfor[ \t]+([^(\n][^\n]*\bto\b[^\n]*)").unwrap());
static RE_NEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*next(?:[ \t]+\w+)?[ \t]*$").unwrap());

static RE_DO_UNTIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdo[ \t]+until[ \t]+([^\n]*)").unwrap());
static RE_DO_WHILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bdo[ \t]+while[ \t]+([^\n]*)").unwrap());
static RE_DO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?im)^([ \t]*)do[ \t]*$").unwrap());
static RE_LOOP_UNTIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*loop[ \t]+until[ \t]+([^\n]*)$").unwrap());
static RE_LOOP_WHILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*loop[ \t]+while[ \t]+([^\n]*)$").unwrap());
static RE_LOOP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?im)^[ \t]*loop[ \t]*$").unwrap());

static RE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bSplit\((.+?),[ \t]*("[^"\n]*")\)"#).unwrap());

pub fn translate(spans: Vec<Span>, normalizers: &Normalizers) -> Vec<Span> {
    let translated: Vec<Span> = spans
        .into_iter()
        .map(|mut span| {
            if span.kind == SpanKind::Code {
                span.text = translate_code(&span.text, normalizers);
            }
            span
        })
        .collect();
    tracing::debug!(spans = translated.len(), "translated code spans");
    translated
}

pub fn translate_code(code: &str, normalizers: &Normalizers) -> String {
    let masked = rules::mask(&comments(code));
    let code = rules::apply(PRELUDE, &masked.text);
    let code = class::translate_classes(&code);
    let code = rules::apply(STATEMENTS, &code);
    masked.restore(&normalizers.apply(&code))
}

fn fold_continuations(text: &str) -> String {
    RE_CONTINUATION.replace_all(text, " ").into_owned()
}

fn parameter_modes(text: &str) -> String {
    let text = RE_BYREF.replace_all(text, "/*ByRef*/");
    RE_BYVAL.replace_all(&text, "").into_owned()
}

fn class_events(text: &str) -> String {
    let text = RE_CLASS_INITIALIZE.replace_all(text, "constructor");
    RE_CLASS_TERMINATE.replace_all(&text, "dispose").into_owned()
}

fn nothing(text: &str) -> String {
    outside_strings(text, |s| RE_NOTHING.replace_all(s, "undefined").into_owned())
}

fn comments(text: &str) -> String {
    let text = RE_REM.replace_all(text, "${1}//");
    text.split_inclusive('\n').map(comment_line).collect()
}

/// Rewrites the first `'` outside a string literal; the rest of the line is
/// comment text and stays as written.
fn comment_line(line: &str) -> String {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '\'' if !in_string => return format!("{}//{}", &line[..i], &line[i + 1..]),
            '/' if !in_string && line[i..].starts_with("//") => break,
            _ => {}
        }
    }
    line.to_string()
}

fn variables(text: &str) -> String {
    outside_strings(text, |s| {
        let s = RE_DIM_SET.replace_all(s, "${1}let ");
        let s = RE_DIM.replace_all(&s, "${1}let ");
        let s = RE_SET.replace_all(&s, "${1}");
        let s = RE_ME.replace_all(&s, "this");
        let s = RE_NEW.replace_all(&s, "new ${1}()");
        RE_CALL.replace_all(&s, "${1}").into_owned()
    })
}

fn switch(text: &str) -> String {
    let text = RE_SELECT.replace_all(text, |caps: &Captures| {
        format!("\nswitch ({}) {{\n", caps[1].trim())
    });
    let text = RE_END_SELECT.replace_all(&text, "\n}\n");
    let text = RE_CASE_ELSE.replace_all(&text, "${1}default:");
    RE_CASE
        .replace_all(&text, |caps: &Captures| {
            let labels: Vec<String> = RE_CASE_VALUE
                .find_iter(&caps[2])
                .map(|m| format!("case {}:", m.as_str()))
                .collect();
            format!("{}{}", &caps[1], labels.join(" "))
        })
        .into_owned()
}

/// Normalises a legacy boolean expression to symbolic operators.
pub fn condition(text: &str) -> String {
    outside_strings(text.trim(), |s| {
        let s = RE_AND.replace_all(s, " && ");
        let s = RE_OR.replace_all(&s, " || ");
        let s = RE_NOT_EQUAL.replace_all(&s, " !== ");
        let s = RE_IS.replace_all(&s, " === ");
        let s = RE_NOT.replace_all(&s, "!");
        RE_EQUAL.replace_all(&s, " === ").into_owned()
    })
}

fn conditionals(text: &str) -> String {
    let text = outside_strings(text, |s| RE_END_IF.replace_all(s, "\n}\n").into_owned());
    let text = RE_ELSEIF.replace_all(&text, |caps: &Captures| {
        format!("\n}} else if ({}) {{\n", condition(&caps[1]))
    });
    let text = RE_IF.replace_all(&text, if_header);
    outside_strings(&text, |s| RE_ELSE.replace_all(s, "\n}\nelse {\n").into_owned())
}

fn if_header(caps: &Captures) -> String {
    let cond = condition(&caps[1]);
    let rest = caps[2].trim();
    if rest.is_empty() {
        return format!("\nif ({}) {{\n", cond);
    }
    if rest.starts_with("//") {
        return format!("\nif ({}) {{ {}\n", cond, rest);
    }
    match RE_INLINE_ELSE.find(rest) {
        Some(m) => format!(
            "\nif ({}) {{ {} }} else {{ {} }}\n",
            cond,
            rest[..m.start()].trim(),
            rest[m.end()..].trim()
        ),
        None => format!("\nif ({}) {{ {} }}\n", cond, rest),
    }
}

fn functions(text: &str) -> String {
    translate_functions(text, false)
}

/// Rewrites `Function`/`Sub` declarations. Inside a class body they become
/// indented methods keeping their lower-cased visibility.
pub fn translate_functions(text: &str, in_class: bool) -> String {
    let end = if in_class { "\n\t}\n" } else { "\n}\n" };
    outside_strings(text, |s| {
        let s = RE_EXIT.replace_all(s, "return");
        let s = RE_END_FUNCTION.replace_all(&s, end);
        RE_FUNCTION
            .replace_all(&s, |caps: &Captures| {
                let name = &caps[2];
                let params = caps.get(3).map_or("", |m| m.as_str().trim());
                if !in_class {
                    return format!("\nfunction {}({}) {{\n", name, params);
                }
                match caps.get(1) {
                    Some(vis) if name != "constructor" => format!(
                        "\n\t{} {}({}) {{\n",
                        vis.as_str().to_lowercase(),
                        name,
                        params
                    ),
                    _ => format!("\n\t{}({}) {{\n", name, params),
                }
            })
            .into_owned()
    })
}

fn for_loops(text: &str) -> String {
    let text = RE_FOR_EACH.replace_all(text, |caps: &Captures| {
        format!("\nfor (const {} of {}) {{\n", &caps[1], caps[2].trim())
    });
    let text = RE_FOR.replace_all(&text, |caps: &Captures| {
        format!("\nfor ({}) {{\n", caps[1].trim())
    });
    RE_NEXT.replace_all(&text, "}").into_owned()
}

fn do_loops(text: &str) -> String {
    let text = RE_DO_UNTIL.replace_all(text, |caps: &Captures| {
        format!("\nwhile (!({})) {{\n", condition(&caps[1]))
    });
    let text = RE_DO_WHILE.replace_all(&text, |caps: &Captures| {
        format!("\nwhile ({}) {{\n", condition(&caps[1]))
    });
    let text = RE_DO.replace_all(&text, "${1}do {");
    let text = RE_LOOP_UNTIL.replace_all(&text, |caps: &Captures| {
        format!("}} while (!({}));", condition(&caps[1]))
    });
    let text = RE_LOOP_WHILE.replace_all(&text, |caps: &Captures| {
        format!("}} while ({});", condition(&caps[1]))
    });
    RE_LOOP.replace_all(&text, "}").into_owned()
}

fn split(text: &str) -> String {
    RE_SPLIT.replace_all(text, "${1}.split(${2})").into_owned()
}
