use crate::config::RenderConfig;
use crate::span::{FormattedDocument, Line, SpanKind, TextSpan};

/// Convert a formatted document to an HTML fragment
pub fn document_to_html(doc: &FormattedDocument, config: &RenderConfig) -> String {
    let mut out = String::new();
    let last = doc.len().saturating_sub(1);

    for (i, line) in doc.iter().enumerate() {
        match line {
            Line::Break => out.push_str("<br />"),
            Line::Spans { spans } => {
                out.push_str("<span>");
                for span in spans {
                    emit_span(span, config, &mut out);
                }
                // Every line but the last carries its own break
                if i < last {
                    out.push_str("<br />");
                }
                out.push_str("</span>");
            }
        }
    }

    out
}

fn emit_span(span: &TextSpan, config: &RenderConfig, out: &mut String) {
    let (tag, class) = match span.kind {
        SpanKind::Plain => ("span", None),
        SpanKind::Bold => ("strong", Some(config.bold_class.as_str())),
        SpanKind::Italic => ("em", Some(config.italic_class.as_str())),
        SpanKind::Code => ("code", Some(config.code_class.as_str())),
        SpanKind::Strikethrough => ("del", Some(config.strikethrough_class.as_str())),
    };

    out.push('<');
    out.push_str(tag);
    if let Some(class) = class.filter(|c| !c.is_empty()) {
        out.push_str(" class=\"");
        escape_into(class, out);
        out.push('"');
    }
    out.push('>');
    escape_into(&span.content, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
