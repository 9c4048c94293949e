use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::span::{FormattedDocument, Line, SpanKind, TextSpan};

/// Inline patterns in priority order. `***` has to come before `**` and
/// `*` because they share a prefix; equal start offsets keep this order.
///
/// Content never spans a carriage return or a Unicode line/paragraph
/// separator, even though those do not split lines.
static PATTERNS: LazyLock<Vec<(Regex, SpanKind)>> = LazyLock::new(|| {
    [
        (r"\*\*\*([^\r\x{2028}\x{2029}]*?)\*\*\*", SpanKind::Bold),
        (r"\*\*([^\r\x{2028}\x{2029}]*?)\*\*", SpanKind::Bold),
        (r"\*([^\r\x{2028}\x{2029}]*?)\*", SpanKind::Italic),
        (r"`([^\r\x{2028}\x{2029}]*?)`", SpanKind::Code),
        (r"~~([^\r\x{2028}\x{2029}]*?)~~", SpanKind::Strikethrough),
    ]
    .into_iter()
    .map(|(pattern, kind)| (Regex::new(pattern).expect("inline pattern is valid"), kind))
    .collect()
});

/// A candidate styled region of a line, in byte offsets
#[derive(Debug, Clone, PartialEq, Eq)]
struct Marker {
    start: usize,
    end: usize,
    content: Range<usize>,
    kind: SpanKind,
}

/// Format chat text into lines of styled spans.
///
/// Never fails: unmatched delimiters stay in the output as plain text.
pub fn format(text: &str) -> FormattedDocument {
    let lines = text.split('\n').map(format_line).collect();
    FormattedDocument { lines }
}

fn format_line(line: &str) -> Line {
    if is_blank(line) {
        return Line::Break;
    }

    let markers = resolve_overlaps(find_markers(line));
    if markers.is_empty() {
        return Line::Spans {
            spans: vec![TextSpan::plain(line)],
        };
    }

    let mut spans = Vec::with_capacity(markers.len() * 2 + 1);
    let mut cursor = 0;
    for marker in markers {
        if cursor < marker.start {
            spans.push(TextSpan::plain(&line[cursor..marker.start]));
        }
        spans.push(TextSpan::new(marker.kind, &line[marker.content]));
        cursor = marker.end;
    }
    if cursor < line.len() {
        spans.push(TextSpan::plain(&line[cursor..]));
    }

    Line::Spans { spans }
}

/// Whitespace as understood by chat clients: Unicode white space and the
/// byte-order mark, but not NEL.
fn is_blank(line: &str) -> bool {
    line.chars()
        .all(|c| c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}'))
}

/// Every match of every pattern, sorted by start offset.
fn find_markers(line: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    for (regex, kind) in PATTERNS.iter() {
        for caps in regex.captures_iter(line) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            markers.push(Marker {
                start: whole.start(),
                end: whole.end(),
                content: inner.range(),
                kind: *kind,
            });
        }
    }
    // Stable, so ties keep pattern priority
    markers.sort_by_key(|m| m.start);
    markers
}

/// Left-to-right sweep: a marker survives only if it starts at or after
/// the end of the last surviving marker.
fn resolve_overlaps(markers: Vec<Marker>) -> Vec<Marker> {
    let mut kept: Vec<Marker> = Vec::with_capacity(markers.len());
    for marker in markers {
        let free = kept.last().is_none_or(|last| marker.start >= last.end);
        if free {
            kept.push(marker);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str) -> Vec<(SpanKind, String)> {
        let doc = format(text);
        assert_eq!(doc.len(), 1, "expected a single line for {text:?}");
        doc.lines[0]
            .spans()
            .iter()
            .map(|s| (s.kind, s.content.clone()))
            .collect()
    }

    fn span(kind: SpanKind, content: &str) -> (SpanKind, String) {
        (kind, content.to_string())
    }

    #[test]
    fn plain_text_is_one_span() {
        assert_eq!(
            spans("no markup here"),
            vec![span(SpanKind::Plain, "no markup here")]
        );
    }

    #[test]
    fn empty_input_is_a_single_break() {
        let doc = format("");
        assert_eq!(doc.lines, vec![Line::Break]);
    }

    #[test]
    fn line_count_matches_split() {
        for text in ["a", "a\nb", "a\n\nb", "\n", "\n\n\n", "**x**\n`y`\n"] {
            assert_eq!(format(text).len(), text.split('\n').count(), "{text:?}");
        }
    }

    #[test]
    fn blank_lines_become_breaks() {
        let doc = format("one\n\ntwo\n   \nthree");
        let breaks: Vec<bool> = doc.iter().map(Line::is_break).collect();
        assert_eq!(breaks, vec![false, true, false, true, false]);
    }

    #[test]
    fn byte_order_mark_line_is_blank() {
        assert_eq!(format("\u{FEFF}").lines, vec![Line::Break]);
        assert_eq!(format(" \u{FEFF}\t").lines, vec![Line::Break]);
        assert_eq!(spans("\u{85}"), vec![span(SpanKind::Plain, "\u{85}")]);
    }

    #[test]
    fn markers_do_not_cross_line_terminators() {
        assert_eq!(spans("*a\rb*"), vec![span(SpanKind::Plain, "*a\rb*")]);
        // No bold run across the separator; each `**` pairs up as an empty italic
        assert_eq!(
            spans("**x\u{2028}y**"),
            vec![
                span(SpanKind::Italic, ""),
                span(SpanKind::Plain, "x\u{2028}y"),
                span(SpanKind::Italic, ""),
            ]
        );
        assert_eq!(
            spans("`a\u{2029}b` ~~c~~"),
            vec![
                span(SpanKind::Plain, "`a\u{2029}b` "),
                span(SpanKind::Strikethrough, "c"),
            ]
        );
        assert_eq!(
            spans("*a*\r"),
            vec![span(SpanKind::Italic, "a"), span(SpanKind::Plain, "\r")]
        );
    }

    #[test]
    fn triple_asterisk_is_bold() {
        assert_eq!(spans("***x***"), vec![span(SpanKind::Bold, "x")]);
    }

    #[test]
    fn double_asterisk_is_bold() {
        assert_eq!(
            spans("say **hello** now"),
            vec![
                span(SpanKind::Plain, "say "),
                span(SpanKind::Bold, "hello"),
                span(SpanKind::Plain, " now"),
            ]
        );
    }

    #[test]
    fn earliest_match_wins_on_overlap() {
        assert_eq!(
            spans("**a*b**c*"),
            vec![span(SpanKind::Bold, "a*b"), span(SpanKind::Plain, "c*")]
        );
    }

    #[test]
    fn whitespace_content_is_kept() {
        assert_eq!(spans("** **"), vec![span(SpanKind::Bold, " ")]);
    }

    #[test]
    fn empty_content_yields_empty_span() {
        assert_eq!(
            spans("a `` b"),
            vec![
                span(SpanKind::Plain, "a "),
                span(SpanKind::Code, ""),
                span(SpanKind::Plain, " b"),
            ]
        );
    }

    #[test]
    fn independent_markers_on_one_line() {
        assert_eq!(
            spans("*a* `b` ~~c~~"),
            vec![
                span(SpanKind::Italic, "a"),
                span(SpanKind::Plain, " "),
                span(SpanKind::Code, "b"),
                span(SpanKind::Plain, " "),
                span(SpanKind::Strikethrough, "c"),
            ]
        );
    }

    #[test]
    fn nested_markers_stay_literal() {
        assert_eq!(
            spans("**bold *and* more**"),
            vec![span(SpanKind::Bold, "bold *and* more")]
        );
    }

    #[test]
    fn code_swallows_emphasis() {
        assert_eq!(
            spans("run `a*b*c` now"),
            vec![
                span(SpanKind::Plain, "run "),
                span(SpanKind::Code, "a*b*c"),
                span(SpanKind::Plain, " now"),
            ]
        );
    }

    #[test]
    fn unmatched_delimiters_fall_back_to_plain() {
        assert_eq!(spans("2 * 3 = 6"), vec![span(SpanKind::Plain, "2 * 3 = 6")]);
        assert_eq!(spans("~~open"), vec![span(SpanKind::Plain, "~~open")]);
        assert_eq!(spans("`tick"), vec![span(SpanKind::Plain, "`tick")]);
    }

    #[test]
    fn discarded_match_does_not_block_later_ones() {
        // `*b*` overlaps the bold run and is dropped; `~~d~~` still survives.
        assert_eq!(
            spans("**a*b** ~~d~~"),
            vec![
                span(SpanKind::Bold, "a*b"),
                span(SpanKind::Plain, " "),
                span(SpanKind::Strikethrough, "d"),
            ]
        );
    }

    #[test]
    fn multibyte_text_is_sliced_on_char_boundaries() {
        assert_eq!(
            spans("héllo **wörld** ✓"),
            vec![
                span(SpanKind::Plain, "héllo "),
                span(SpanKind::Bold, "wörld"),
                span(SpanKind::Plain, " ✓"),
            ]
        );
    }

    #[test]
    fn kept_markers_never_overlap() {
        let line = "***a*** **b* `c*` ~~*d~~* *e**";
        let markers = resolve_overlaps(find_markers(line));
        for pair in markers.windows(2) {
            assert!(pair[0].start < pair[0].end);
            assert!(pair[0].end <= pair[1].start, "{pair:?}");
        }
    }

    #[test]
    fn markup_round_trips_canonical_lines() {
        for text in ["*a* `b` ~~c~~", "plain **bold** tail", "x\n\n`y`"] {
            assert_eq!(format(text).to_markup(), text);
        }
        assert_eq!(format("***x***").to_markup(), "**x**");
    }
}
