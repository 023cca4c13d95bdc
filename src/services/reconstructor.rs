// Reconstructor
// One left-to-right pass that produces the cleaned text, the annotated HTML rendering
// and the counters together, so the three can never disagree.

use tracing::{debug, warn};

use crate::models::{Classification, DetectorSet, Interval, ReconstructionOutput, ScanStats};
use crate::services::classifier::classify_with;

/// Prefix for boilerplate labels in `ScanStats::labels`.
pub const PHRASE_LABEL_PREFIX: &str = "phrase:";

pub fn reconstruct(text: &str, intervals: &[Interval]) -> ReconstructionOutput {
    reconstruct_with(text, intervals, &DetectorSet::all())
}

pub fn reconstruct_with(
    text: &str,
    intervals: &[Interval],
    detectors: &DetectorSet,
) -> ReconstructionOutput {
    if text.is_empty() {
        return ReconstructionOutput::default();
    }

    let len = text.chars().count();
    let spans = ordered_spans(intervals, len);

    let mut out = Emitter::with_capacity(text.len());
    out.stats.boilerplate_phrases = spans.len();
    for span in &spans {
        out.stats.bump_label(&format!("{}{}", PHRASE_LABEL_PREFIX, span.label));
    }

    let mut open: Vec<&Interval> = Vec::new();
    let mut next = 0;

    for (i, c) in text.chars().enumerate() {
        out.close_ending_at(i, &mut open);
        while next < spans.len() && spans[next].start == i {
            out.open_mark(spans[next]);
            open.push(spans[next]);
            next += 1;
        }
        out.emit_char(c, classify_with(c, detectors));
    }
    out.close_ending_at(len, &mut open);

    debug!(
        chars = len,
        hidden = out.stats.hidden_chars,
        homoglyphs = out.stats.homoglyphs,
        spaces = out.stats.suspicious_spaces,
        phrases = out.stats.boilerplate_phrases,
        "reconstruct.done"
    );

    ReconstructionOutput {
        clean_text: out.clean,
        annotated_text: out.annotated,
        stats: out.stats,
    }
}

/// Valid intervals in opening order: by start, longer spans first so they enclose
/// shorter ones starting at the same index, then by label for identical bounds.
fn ordered_spans(intervals: &[Interval], len: usize) -> Vec<&Interval> {
    let mut spans: Vec<&Interval> = intervals
        .iter()
        .filter(|iv| {
            let ok = iv.is_valid_for(len);
            if !ok {
                warn!(start = iv.start, end = iv.end, len, label = %iv.label, "reconstruct.interval_skipped");
            }
            ok
        })
        .collect();
    spans.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.end.cmp(&a.end))
            .then_with(|| a.label.cmp(&b.label))
    });
    spans
}

struct Emitter {
    clean: String,
    annotated: String,
    stats: ScanStats,
}

impl Emitter {
    fn with_capacity(bytes: usize) -> Self {
        Self {
            clean: String::with_capacity(bytes),
            annotated: String::with_capacity(bytes * 2),
            stats: ScanStats::default(),
        }
    }

    fn open_mark(&mut self, span: &Interval) {
        self.annotated.push_str("<mark class=\"boilerplate\" data-label=\"");
        push_escaped(&mut self.annotated, &span.label);
        self.annotated.push_str("\">");
    }

    fn close_mark(&mut self) {
        self.annotated.push_str("</mark>");
    }

    /// Close every open span ending at `pos`. Spans opened inside one of them but
    /// still running are closed too and reopened afterwards, keeping the markup
    /// properly nested when spans cross.
    fn close_ending_at<'a>(&mut self, pos: usize, open: &mut Vec<&'a Interval>) {
        if !open.iter().any(|span| span.end == pos) {
            return;
        }
        let mut reopen: Vec<&'a Interval> = Vec::new();
        while open.iter().any(|span| span.end == pos) {
            let Some(top) = open.pop() else { break };
            self.close_mark();
            if top.end != pos {
                reopen.push(top);
            }
        }
        for span in reopen.into_iter().rev() {
            self.open_mark(span);
            open.push(span);
        }
    }

    fn emit_char(&mut self, c: char, class: Classification) {
        match class {
            Classification::Hidden(label) => {
                self.annotated.push_str("<span class=\"hidden\" title=\"");
                self.annotated.push_str(label);
                self.annotated.push_str("\">[");
                self.annotated.push_str(label);
                self.annotated.push_str("]</span>");
                self.stats.hidden_chars += 1;
                self.stats.bump_label(label);
            }
            Classification::SuspiciousSpace(label) => {
                self.annotated.push_str("<span class=\"space\" title=\"");
                self.annotated.push_str(label);
                self.annotated.push_str("\"> </span>");
                self.clean.push(' ');
                self.stats.suspicious_spaces += 1;
                self.stats.bump_label(label);
            }
            Classification::Homoglyph(replacement) => {
                let label = format!("{}\u{2192}{}", c, replacement);
                self.annotated.push_str("<span class=\"homoglyph\" title=\"");
                self.annotated.push_str(&label);
                self.annotated.push_str("\">");
                self.annotated.push(replacement);
                self.annotated.push_str("</span>");
                self.clean.push(replacement);
                self.stats.homoglyphs += 1;
                self.stats.bump_label(&label);
            }
            Classification::Normal => {
                if c == '\n' {
                    self.annotated.push_str("<br>");
                } else {
                    push_escaped_char(&mut self.annotated, c);
                }
                self.clean.push(c);
            }
        }
    }
}

fn push_escaped(buf: &mut String, s: &str) {
    for c in s.chars() {
        push_escaped_char(buf, c);
    }
}

fn push_escaped_char(buf: &mut String, c: char) {
    match c {
        '&' => buf.push_str("&amp;"),
        '<' => buf.push_str("&lt;"),
        '>' => buf.push_str("&gt;"),
        '"' => buf.push_str("&quot;"),
        '\'' => buf.push_str("&#39;"),
        _ => buf.push(c),
    }
}
