pub mod align;
pub mod boxfile;

use crate::model::{is_line_break, is_word_break, push_marker, CharBox, QuotePolicy, StreamItem};
use align::{Opcode, Tag};
use serde::Serialize;
use std::collections::VecDeque;

/// Counts of every adjustment made while fitting box data to a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Boxes relabelled in place (1→1 and N→N replacements).
    pub relabeled: usize,
    /// N→1 replacements merged into a single box.
    pub merged: usize,
    /// 1→M replacements split into boxes sharing one geometry.
    pub split: usize,
    /// N→M replacements with N≠M, resolved by delete-then-insert.
    pub ambiguous: usize,
    /// Characters given cloned anchor geometry.
    pub inserted: usize,
    /// Boxes with no transcript counterpart.
    pub deleted: usize,
    /// Transcript characters that ended up without a box.
    pub dropped_chars: usize,
    /// Boxes discarded while walking the transcript.
    pub dropped_boxes: usize,
    pub mismatch_warned: bool,
}

impl ReconcileReport {
    /// Whether the box data matched the transcript without any adjustment.
    pub fn is_clean(&self) -> bool {
        *self == ReconcileReport::default()
    }
}

#[derive(Debug, Clone)]
pub struct Reconciled {
    pub items: Vec<StreamItem>,
    pub report: ReconcileReport,
}

/// Fit geometric character boxes to an independently recognized transcript.
///
/// The boxes are patched so their labels spell the transcript with whitespace
/// removed, then the transcript is walked to interleave `Space` and `Newline`
/// markers between the boxes.
pub fn reconcile(boxes: &[CharBox], text: &str, policy: QuotePolicy) -> Reconciled {
    let box_text: Vec<char> = boxes.iter().map(|b| b.ch).collect();
    let target: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();

    // Compute the whole script first; applying it builds a new buffer so the
    // ranges of later opcodes stay valid.
    let ops = align::opcodes(&box_text, &target);
    let mut report = ReconcileReport::default();
    let patched = apply_opcodes(boxes, &ops, &target, &mut report);
    let items = walk(text, patched, policy, &mut report);

    tracing::debug!(
        boxes = boxes.len(),
        items = items.len(),
        clean = report.is_clean(),
        "reconciled box data with transcript"
    );
    Reconciled { items, report }
}

fn apply_opcodes(
    boxes: &[CharBox],
    ops: &[Opcode],
    target: &[char],
    report: &mut ReconcileReport,
) -> Vec<CharBox> {
    let mut out = Vec::with_capacity(target.len());

    for op in ops {
        let src = &boxes[op.src.clone()];
        let dst = &target[op.dst.clone()];

        match op.tag {
            Tag::Equal => out.extend_from_slice(src),
            Tag::Delete => report.deleted += src.len(),
            Tag::Insert => match anchor(boxes, op.src.start) {
                Some(anchor) => {
                    out.extend(dst.iter().map(|&c| anchor.relabel(c)));
                    report.inserted += dst.len();
                }
                None => {
                    tracing::debug!(chars = dst.len(), "no anchor box for inserted text");
                }
            },
            Tag::Replace => match (src.len(), dst.len()) {
                (1, 1) => {
                    out.push(src[0].relabel(dst[0]));
                    report.relabeled += 1;
                }
                (_, 1) => {
                    out.push(union(src).relabel(dst[0]));
                    report.merged += 1;
                }
                (1, _) => {
                    out.extend(dst.iter().map(|&c| src[0].relabel(c)));
                    report.split += 1;
                }
                (n, m) if n == m => {
                    out.extend(src.iter().zip(dst).map(|(b, &c)| b.relabel(c)));
                    report.relabeled += n;
                }
                (n, m) => {
                    let from: String = src.iter().map(|b| b.ch).collect();
                    let to: String = dst.iter().collect();
                    tracing::warn!(
                        from = %from,
                        to = %to,
                        "ambiguous {n}->{m} replacement, cloning anchor geometry"
                    );
                    report.ambiguous += 1;
                    report.deleted += n;
                    report.inserted += m;
                    out.extend(dst.iter().map(|&c| src[0].relabel(c)));
                }
            },
        }
    }

    out
}

/// The box an insertion at `index` borrows its geometry from: the next
/// unconsumed box, or the last box when inserting at the end.
fn anchor(boxes: &[CharBox], index: usize) -> Option<CharBox> {
    boxes.get(index).or_else(|| boxes.last()).copied()
}

/// Bounding union of a non-empty run of boxes, labelled after the first.
fn union(src: &[CharBox]) -> CharBox {
    src.iter().skip(1).fold(src[0], |acc, b| CharBox {
        ch: acc.ch,
        xmin: acc.xmin.min(b.xmin),
        ymin: acc.ymin.min(b.ymin),
        xmax: acc.xmax.max(b.xmax),
        ymax: acc.ymax.max(b.ymax),
    })
}

/// Walk the transcript in lockstep with the patched boxes.
fn walk(
    text: &str,
    patched: Vec<CharBox>,
    policy: QuotePolicy,
    report: &mut ReconcileReport,
) -> Vec<StreamItem> {
    let chars: Vec<char> = text.chars().collect();
    let mut pending: VecDeque<CharBox> = patched.into();
    let mut items = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if is_line_break(ch) {
            push_marker(&mut items, StreamItem::Newline);
            i += 1;
            continue;
        }
        if is_word_break(ch) {
            push_marker(&mut items, StreamItem::Space);
            i += 1;
            continue;
        }

        let second = pending.get(1).map(|b| b.ch);
        match pending.front().copied() {
            Some(head) if head.ch == ch => {
                pending.pop_front();
                if policy.keeps(ch) {
                    items.push(StreamItem::Char(head));
                }
                i += 1;
            }
            // An uncertain character: skip it in both sequences.
            Some(_) if second.is_some() && chars.get(i + 1).copied() == second => {
                pending.pop_front();
                report.dropped_boxes += 1;
                report.dropped_chars += 1;
                i += 1;
            }
            // A spurious box: drop it and retry the same character.
            Some(_) if second == Some(ch) => {
                pending.pop_front();
                report.dropped_boxes += 1;
            }
            _ => {
                if !report.mismatch_warned {
                    report.mismatch_warned = true;
                    tracing::warn!(
                        "significant mismatch between transcript and character boxes, \
                         this page may have partial text"
                    );
                }
                report.dropped_chars += 1;
                i += 1;
            }
        }
    }

    report.dropped_boxes += pending.len();
    items
}
