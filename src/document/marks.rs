//! Inline mark spans
//!
//! Spans are half-open char ranges `[start, end)` over a block's text. Edits
//! shift them; same-mark spans that touch or overlap are merged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkSpan {
    pub start: usize,
    pub end: usize,
    pub mark: Mark,
}

impl MarkSpan {
    pub fn new(start: usize, end: usize, mark: Mark) -> Self {
        Self { start, end, mark }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Shift spans for `len` chars inserted at `at`.
///
/// A span ending exactly at `at` grows, so typing at the end of bold text
/// stays bold. A span starting at `at` moves right.
pub fn shift_for_insert(spans: &mut [MarkSpan], at: usize, len: usize) {
    for span in spans.iter_mut() {
        if span.start >= at {
            span.start += len;
            span.end += len;
        } else if span.end >= at {
            span.end += len;
        }
    }
}

/// Shrink spans for the char range `[start, end)` being deleted
pub fn shift_for_delete(spans: &mut Vec<MarkSpan>, start: usize, end: usize) {
    if end <= start {
        return;
    }
    let len = end - start;
    let adjust = |x: usize| {
        if x <= start {
            x
        } else if x >= end {
            x - len
        } else {
            start
        }
    };
    for span in spans.iter_mut() {
        span.start = adjust(span.start);
        span.end = adjust(span.end);
    }
    spans.retain(|s| !s.is_empty());
}

/// Split spans at `at`, returning the spans for the right-hand part rebased to 0
pub fn split_at(spans: &mut Vec<MarkSpan>, at: usize) -> Vec<MarkSpan> {
    let right = spans
        .iter()
        .filter(|s| s.end > at)
        .map(|s| MarkSpan::new(s.start.max(at) - at, s.end - at, s.mark))
        .collect();
    for span in spans.iter_mut() {
        span.end = span.end.min(at);
    }
    spans.retain(|s| !s.is_empty());
    right
}

/// Append `other` spans after a block of `offset` chars
pub fn append(spans: &mut Vec<MarkSpan>, other: &[MarkSpan], offset: usize) {
    spans.extend(
        other
            .iter()
            .map(|s| MarkSpan::new(s.start + offset, s.end + offset, s.mark)),
    );
    normalize(spans);
}

/// Whether every char of `[start, end)` carries `mark`
pub fn covers(spans: &[MarkSpan], start: usize, end: usize, mark: Mark) -> bool {
    if end <= start {
        return false;
    }
    let mut cursor = start;
    let mut matching: Vec<&MarkSpan> = spans.iter().filter(|s| s.mark == mark).collect();
    matching.sort_by_key(|s| s.start);
    for span in matching {
        if span.start > cursor {
            break;
        }
        if span.end > cursor {
            cursor = span.end;
        }
        if cursor >= end {
            return true;
        }
    }
    false
}

pub fn add_mark(spans: &mut Vec<MarkSpan>, start: usize, end: usize, mark: Mark) {
    if end <= start {
        return;
    }
    spans.push(MarkSpan::new(start, end, mark));
    normalize(spans);
}

pub fn remove_mark(spans: &mut Vec<MarkSpan>, start: usize, end: usize, mark: Mark) {
    if end <= start {
        return;
    }
    let mut result = Vec::with_capacity(spans.len() + 1);
    for span in spans.drain(..) {
        if span.mark != mark || span.end <= start || span.start >= end {
            result.push(span);
            continue;
        }
        if span.start < start {
            result.push(MarkSpan::new(span.start, start, mark));
        }
        if span.end > end {
            result.push(MarkSpan::new(end, span.end, mark));
        }
    }
    *spans = result;
    normalize(spans);
}

/// Marks active on the char at `offset`
pub fn marks_at(spans: &[MarkSpan], offset: usize) -> Vec<Mark> {
    let mut marks: Vec<Mark> = spans
        .iter()
        .filter(|s| s.start <= offset && offset < s.end)
        .map(|s| s.mark)
        .collect();
    marks.sort();
    marks.dedup();
    marks
}

/// Drop empty spans and merge touching or overlapping spans of the same mark
pub fn normalize(spans: &mut Vec<MarkSpan>) {
    spans.retain(|s| !s.is_empty());
    spans.sort_by_key(|s| (s.mark, s.start, s.end));

    let mut merged: Vec<MarkSpan> = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        match merged.last_mut() {
            Some(last) if last.mark == span.mark && span.start <= last.end => {
                last.end = last.end.max(span.end);
            }
            _ => merged.push(span),
        }
    }
    merged.sort_by_key(|s| (s.start, s.mark));
    *spans = merged;
}
