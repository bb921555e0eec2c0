//! Ratcliff/Obershelp sequence alignment.
//!
//! Finds the longest matching block, then recurses on the unmatched pieces to
//! either side of it. The matching blocks are turned into an ordered edit
//! script that covers both sequences without gaps or overlaps.

use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// How `src` in the first sequence maps onto `dst` in the second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    pub tag: Tag,
    pub src: Range<usize>,
    pub dst: Range<usize>,
}

impl Opcode {
    fn new(tag: Tag, src: Range<usize>, dst: Range<usize>) -> Self {
        Opcode { tag, src, dst }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Block {
    a: usize,
    b: usize,
    len: usize,
}

/// Edit script turning `a` into `b`.
pub fn opcodes<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<Opcode> {
    let mut ops = Vec::new();
    let (mut i, mut j) = (0, 0);

    for block in matching_blocks(a, b) {
        let tag = match (i < block.a, j < block.b) {
            (true, true) => Some(Tag::Replace),
            (true, false) => Some(Tag::Delete),
            (false, true) => Some(Tag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            ops.push(Opcode::new(tag, i..block.a, j..block.b));
        }
        i = block.a + block.len;
        j = block.b + block.len;
        if block.len > 0 {
            ops.push(Opcode::new(Tag::Equal, block.a..i, block.b..j));
        }
    }

    ops
}

/// Non-overlapping matching blocks in ascending order, adjacent blocks merged,
/// terminated by a zero-length sentinel at `(a.len(), b.len())`.
fn matching_blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<Block> {
    let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
    for (j, item) in b.iter().enumerate() {
        b2j.entry(item).or_default().push(j);
    }

    let mut found = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let block = longest_match(a, &b2j, alo..ahi, blo..bhi);
        if block.len == 0 {
            continue;
        }
        if alo < block.a && blo < block.b {
            queue.push((alo, block.a, blo, block.b));
        }
        if block.a + block.len < ahi && block.b + block.len < bhi {
            queue.push((block.a + block.len, ahi, block.b + block.len, bhi));
        }
        found.push(block);
    }
    found.sort();

    let mut merged: Vec<Block> = Vec::with_capacity(found.len() + 1);
    for block in found {
        match merged.last_mut() {
            Some(last) if last.a + last.len == block.a && last.b + last.len == block.b => {
                last.len += block.len;
            }
            _ => merged.push(block),
        }
    }
    merged.push(Block {
        a: a.len(),
        b: b.len(),
        len: 0,
    });
    merged
}

/// Longest block common to `a[arange]` and `b[brange]`, earliest in `a` (then
/// in `b`) on ties.
fn longest_match<T: Eq + Hash>(
    a: &[T],
    b2j: &HashMap<&T, Vec<usize>>,
    arange: Range<usize>,
    brange: Range<usize>,
) -> Block {
    let mut best = Block {
        a: arange.start,
        b: brange.start,
        len: 0,
    };
    // Length of the match ending at (i - 1, j), keyed by j.
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for i in arange {
        let mut next: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b2j.get(&a[i]) {
            for &j in positions {
                if j < brange.start {
                    continue;
                }
                if j >= brange.end {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| j2len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next.insert(j, k);
                if k > best.len {
                    best = Block {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        len: k,
                    };
                }
            }
        }
        j2len = next;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn apply(a: &[char], b: &[char], ops: &[Opcode]) -> Vec<char> {
        let mut out = Vec::new();
        for op in ops {
            match op.tag {
                Tag::Equal => out.extend_from_slice(&a[op.src.clone()]),
                Tag::Replace | Tag::Insert => out.extend_from_slice(&b[op.dst.clone()]),
                Tag::Delete => {}
            }
        }
        out
    }

    #[test]
    fn test_identical_sequences() {
        let a = chars("hello");
        let ops = opcodes(&a, &a);
        assert_eq!(ops, vec![Opcode::new(Tag::Equal, 0..5, 0..5)]);
    }

    #[test]
    fn test_empty_sequences() {
        let empty: Vec<char> = Vec::new();
        assert!(opcodes(&empty, &empty).is_empty());
        assert_eq!(
            opcodes(&empty, &chars("ab")),
            vec![Opcode::new(Tag::Insert, 0..0, 0..2)]
        );
        assert_eq!(
            opcodes(&chars("ab"), &empty),
            vec![Opcode::new(Tag::Delete, 0..2, 0..0)]
        );
    }

    #[test]
    fn test_merge_replace() {
        let ops = opcodes(&chars("arnb"), &chars("amb"));
        assert_eq!(
            ops,
            vec![
                Opcode::new(Tag::Equal, 0..1, 0..1),
                Opcode::new(Tag::Replace, 1..3, 1..2),
                Opcode::new(Tag::Equal, 3..4, 2..3),
            ]
        );
    }

    #[test]
    fn test_insert_and_delete() {
        let ops = opcodes(&chars("abcd"), &chars("abxcd"));
        assert_eq!(
            ops,
            vec![
                Opcode::new(Tag::Equal, 0..2, 0..2),
                Opcode::new(Tag::Insert, 2..2, 2..3),
                Opcode::new(Tag::Equal, 2..4, 3..5),
            ]
        );

        let ops = opcodes(&chars("abxcd"), &chars("abcd"));
        assert_eq!(ops[1], Opcode::new(Tag::Delete, 2..3, 2..2));
    }

    #[test]
    fn test_opcodes_cover_both_sequences() {
        let a = chars("the quick brown fox");
        let b = chars("a quack brawn fax!");
        let ops = opcodes(&a, &b);
        assert_eq!(apply(&a, &b, &ops), b);

        let mut i = 0;
        let mut j = 0;
        for op in &ops {
            assert_eq!(op.src.start, i);
            assert_eq!(op.dst.start, j);
            i = op.src.end;
            j = op.dst.end;
        }
        assert_eq!((i, j), (a.len(), b.len()));
    }
}
