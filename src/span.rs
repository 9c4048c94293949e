use serde::Serialize;

/// Formatting applied to a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Plain,
    Bold,
    Italic,
    Code,
    Strikethrough,
}

impl SpanKind {
    /// Delimiter that opens and closes this kind in canonical markup.
    pub fn delimiter(self) -> &'static str {
        match self {
            SpanKind::Plain => "",
            SpanKind::Bold => "**",
            SpanKind::Italic => "*",
            SpanKind::Code => "`",
            SpanKind::Strikethrough => "~~",
        }
    }
}

/// A contiguous, uniformly styled run of characters within a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextSpan {
    pub kind: SpanKind,
    pub content: String,
}

impl TextSpan {
    pub fn new(kind: SpanKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(SpanKind::Plain, content)
    }

    fn write_markup(&self, out: &mut String) {
        let delimiter = self.kind.delimiter();
        out.push_str(delimiter);
        out.push_str(&self.content);
        out.push_str(delimiter);
    }
}

/// One line of formatted text
///
/// Blank source lines carry no spans and render as a hard break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Line {
    Spans { spans: Vec<TextSpan> },
    Break,
}

impl Line {
    /// Spans of this line; empty for a break.
    pub fn spans(&self) -> &[TextSpan] {
        match self {
            Line::Spans { spans } => spans,
            Line::Break => &[],
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Line::Break)
    }

    /// Re-serialize the line with canonical delimiters.
    ///
    /// Triple-asterisk emphasis comes back as `**`, since it parses to bold.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for span in self.spans() {
            span.write_markup(&mut out);
        }
        out
    }
}

/// The complete result of formatting one block of text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormattedDocument {
    pub lines: Vec<Line>,
}

impl FormattedDocument {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Line> {
        self.lines.iter()
    }

    /// Canonical markup for the whole document, lines joined with `\n`.
    pub fn to_markup(&self) -> String {
        self.lines
            .iter()
            .map(Line::to_markup)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a FormattedDocument {
    type Item = &'a Line;
    type IntoIter = std::slice::Iter<'a, Line>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_reinserts_delimiters() {
        let line = Line::Spans {
            spans: vec![
                TextSpan::new(SpanKind::Italic, "a"),
                TextSpan::plain(" "),
                TextSpan::new(SpanKind::Code, "b"),
                TextSpan::plain(" "),
                TextSpan::new(SpanKind::Strikethrough, "c"),
                TextSpan::new(SpanKind::Bold, "d"),
            ],
        };
        assert_eq!(line.to_markup(), "*a* `b` ~~c~~**d**");
    }

    #[test]
    fn break_has_no_spans() {
        assert!(Line::Break.spans().is_empty());
        assert_eq!(Line::Break.to_markup(), "");
    }

    #[test]
    fn document_markup_joins_lines() {
        let doc = FormattedDocument {
            lines: vec![
                Line::Spans {
                    spans: vec![TextSpan::plain("one")],
                },
                Line::Break,
                Line::Spans {
                    spans: vec![TextSpan::new(SpanKind::Bold, "two")],
                },
            ],
        };
        assert_eq!(doc.to_markup(), "one\n\n**two**");
    }

    #[test]
    fn serializes_with_lowercase_tags() {
        let doc = FormattedDocument {
            lines: vec![
                Line::Spans {
                    spans: vec![TextSpan::new(SpanKind::Strikethrough, "x")],
                },
                Line::Break,
            ],
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lines": [
                    {"type": "spans", "spans": [{"kind": "strikethrough", "content": "x"}]},
                    {"type": "break"}
                ]
            })
        );
    }
}
