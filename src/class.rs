use crate::ir::ClassBlock;
use crate::rules::{self, upper_first, Rule};
use crate::statements::translate_functions;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Class body rewrites. Fields are line-anchored and must see the body after
/// properties and methods have been rewritten.
pub const CLASS_BODY: &[Rule] = &[
    Rule { name: "properties", rewrite: properties },
    Rule { name: "methods", rewrite: methods },
    Rule { name: "fields", rewrite: fields },
];

static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ims)^[ \t]*class[ \t]+(\w+)[ \t]*(//[^\n]*)?$(.*?)^[ \t]*end[ \t]+class\b")
        .unwrap()
});
static RE_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*(?:(private|public)[ \t]+)?(?:default[ \t]+)?property[ \t]+(get|set|let)[ \t]+(\w+)[ \t]*(\([^)\n]*\))?",
    )
    .unwrap()
});
static RE_END_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bend[ \t]+property\b").unwrap());
static RE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[ \t]*(private|public|dim)[ \t]+(\w+(?:[ \t]*,[ \t]*\w+)*)[ \t]*(//.*)?$")
        .unwrap()
});


/// Rewrites every `Class … End Class` block in a code span. Each block ends
/// at its own `End Class`, so sibling classes are translated independently.
pub fn translate_classes(code: &str) -> String {
    RE_CLASS
        .replace_all(code, |caps: &Captures| {
            let block = ClassBlock {
                name: caps[1].to_string(),
                comment: caps.get(2).map(|m| m.as_str().to_string()),
                body: caps[3].to_string(),
            };
            translate_class(&block)
        })
        .into_owned()
}

pub fn translate_class(block: &ClassBlock) -> String {
    let body = rules::apply(CLASS_BODY, &block.body);
    let comment = block.comment.as_ref().map_or(String::new(), |c| format!(" {}", c));
    format!("class {} {{{}\n{}\n}}", block.name, comment, body.trim_matches('\n'))
}

fn properties(text: &str) -> String {
    let text = RE_PROPERTY.replace_all(text, |caps: &Captures| {
        let visibility = caps
            .get(1)
            .map_or(String::new(), |m| format!("{} ", m.as_str().to_lowercase()));
        let accessor = match caps[2].to_lowercase().as_str() {
            "get" => "get",
            _ => "set",
        };
        let params = caps.get(4).map_or("()", |m| m.as_str());
        format!(
            "\n\t{}{}{}{} {{\n",
            visibility,
            accessor,
            upper_first(&caps[3]),
            params
        )
    });
    RE_END_PROPERTY.replace_all(&text, "\n\t}\n").into_owned()
}

fn methods(text: &str) -> String {
    translate_functions(text, true)
}

/// Rewrites declarations at class level. Member bodies opened by the
/// property and method rules are tracked by their braces; declarations inside
/// them are locals and left to the statement rules.
fn fields(text: &str) -> String {
    let mut depth = 0usize;
    text.split_inclusive('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed == "}" {
                depth = depth.saturating_sub(1);
                line.to_string()
            } else if trimmed.ends_with('{') {
                depth += 1;
                line.to_string()
            } else if depth > 0 {
                line.to_string()
            } else {
                field_line(line)
            }
        })
        .collect()
}

fn field_line(line: &str) -> String {
    let (body, newline) = match line.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (line, ""),
    };
    let rewritten = RE_FIELD
        .replace(body, |caps: &Captures| {
            let visibility = match caps[1].to_lowercase().as_str() {
                "private" => "private",
                _ => "public",
            };
            let mut lines: Vec<String> = caps[2]
                .split(',')
                .map(|name| format!("\t{} {}", visibility, name.trim()))
                .collect();
            if let (Some(comment), Some(last)) = (caps.get(3), lines.last_mut()) {
                last.push(' ');
                last.push_str(comment.as_str());
            }
            lines.join("\n")
        });
    format!("{}{}", rewritten, newline)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_order() {
        assert_eq!(rules::names(CLASS_BODY), vec!["properties", "methods", "fields"]);
    }

    #[test]
    fn test_fields_one_per_name() {
        assert_eq!(fields("  Public x, y\n"), "\tpublic x\n\tpublic y\n");
    }

    #[test]
    fn test_private_and_dim_fields() {
        assert_eq!(fields("Private m_id\nDim m_name"), "\tprivate m_id\n\tpublic m_name");
    }

    #[test]
    fn test_field_trailing_comment_kept() {
        assert_eq!(fields("Private a, b // ids"), "\tprivate a\n\tprivate b // ids");
    }

    #[test]
    fn test_property_get() {
        let result = properties("Public Property Get name\n  name = m_name\nEnd Property");
        assert_eq!(result, "\n\tpublic getName() {\n\n  name = m_name\n\n\t}\n");
    }

    #[test]
    fn test_property_let_becomes_set() {
        let result = properties("Property Let Title(value)\nEnd Property");
        assert!(result.starts_with("\n\tsetTitle(value) {\n"));
    }

    #[test]
    fn test_class_block() {
        let result = translate_classes("Class Foo\n  Public x, y\nEnd Class");
        assert_eq!(result, "class Foo {\n\tpublic x\n\tpublic y\n}");
    }

    #[test]
    fn test_methods_not_taken_for_fields() {
        let code = "Class Cart\nPublic Sub Add(item)\nEnd Sub\nEnd Class";
        let result = translate_classes(code);
        assert!(result.contains("\tpublic Add(item) {"));
        assert!(!result.contains("\tpublic Sub"));
    }

    #[test]
    fn test_sibling_classes() {
        let code = "Class A\nPublic x\nEnd Class\n\nClass B\nPrivate y\nEnd Class\n";
        let result = translate_classes(code);
        assert_eq!(
            result,
            "class A {\n\tpublic x\n}\n\nclass B {\n\tprivate y\n}\n"
        );
    }

    #[test]
    fn test_member_locals_are_not_fields() {
        let body = "Public x\nPublic Function Bar()\n  Dim t\nEnd Function\nDim y\n";
        let result = rules::apply(CLASS_BODY, body);
        assert_eq!(
            result,
            "\tpublic x\n\n\tpublic Bar() {\n\n  Dim t\n\n\t}\n\n\tpublic y\n"
        );
    }

    #[test]
    fn test_property_locals_are_not_fields() {
        let body = "Public Property Get Name\n  Dim n\n  Name = n\nEnd Property\n";
        let result = rules::apply(CLASS_BODY, body);
        assert!(result.contains("\n  Dim n\n"));
        assert!(!result.contains("public n"));
    }

    #[test]
    fn test_class_line_comment() {
        let result = translate_classes("Class Foo // the foo\n  Public x\nEnd Class");
        assert_eq!(result, "class Foo { // the foo\n\tpublic x\n}");
    }

    #[test]
    fn test_constructor_has_no_visibility() {
        let code = "Class Foo\nPrivate Sub constructor()\nEnd Sub\nEnd Class";
        let result = translate_classes(code);
        assert!(result.contains("\n\tconstructor() {"));
    }
}
