use crate::ir::Span;

/// Renders translated spans as TypeScript. Markup becomes literal write calls
/// and code is emitted bare with its markers dropped.
pub fn emit(spans: &[Span], output_call: &str) -> String {
    let Some(first) = spans.iter().position(|s| !s.is_markup()) else {
        let text: String = spans.iter().map(|s| s.text.as_str()).collect();
        if text.is_empty() {
            return String::new();
        }
        return write_call(output_call, &text);
    };
    let last = spans.iter().rposition(|s| !s.is_markup()).unwrap_or(first);

    let mut out = String::new();
    for (i, span) in spans.iter().enumerate() {
        if !span.is_markup() {
            out.push_str(&span.text);
            continue;
        }
        if span.text.is_empty() {
            continue;
        }
        let call = write_call(output_call, &span.text);
        if i < first {
            out.push_str(&call);
            out.push('\n');
        } else if i > last {
            out.push('\n');
            out.push_str(&call);
        } else {
            out.push('\n');
            out.push_str(&call);
            out.push('\n');
        }
    }
    out
}

fn write_call(output_call: &str, text: &str) -> String {
    format!("{}(`{}`);", output_call, text)
}
