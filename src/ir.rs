#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Literal output text.
    Markup,
    /// Script statements between `<%` and `%>`.
    Code,
    /// Inline output `<%= … %>`; `text` excludes the `=`.
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: String,
    /// False only for a trailing code span whose `%>` never appeared.
    pub terminated: bool,
}

impl Span {
    pub fn markup(text: impl Into<String>) -> Self {
        Span {
            kind: SpanKind::Markup,
            text: text.into(),
            terminated: true,
        }
    }

    pub fn code(text: impl Into<String>) -> Self {
        Span {
            kind: SpanKind::Code,
            text: text.into(),
            terminated: true,
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Span {
            kind: SpanKind::Output,
            text: text.into(),
            terminated: true,
        }
    }

    pub fn unterminated(text: impl Into<String>) -> Self {
        Span {
            kind: SpanKind::Code,
            text: text.into(),
            terminated: false,
        }
    }

    pub fn is_markup(&self) -> bool {
        self.kind == SpanKind::Markup
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeItem {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassBlock {
    pub name: String,
    /// Trailing comment on the `Class` line, `//` included.
    pub comment: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub code: String,
    pub includes: Vec<IncludeItem>,
}
