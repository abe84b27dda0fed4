//! Fork-path values — immutable tree positions threaded through a traversal.
//!
//! A [`TreePath`] is a snapshot of the fork decisions taken from the tree
//! root down to one node. The traversal driver derives a child path with
//! [`push_fork`] before descending and simply drops the value when the
//! subtree is done; there is no shared stack to unwind, so sibling
//! subtrees can run interleaved, suspended, or in any completion order
//! without observing each other's state. Two traversals of the same tree
//! reach bit-identical paths at structurally corresponding nodes, which
//! is the whole consistency story: the upfront pass and the takeover pass
//! never talk, they just agree.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::layout::{
    DIGIT_BITS, WORD_PATH_BITS, bit_length, digit_value, encode_group, encode_word,
};
use crate::validate::MalformedIdentifier;

/// An immutable fork path from the tree root to one position.
///
/// The most recent decisions live in `word`, newest in the highest
/// payload bits, with a length-marker bit kept just above them. Older
/// decisions that no longer fit the word budget live in `overflow` as
/// already-encoded digits, newest group first. Cloning is cheap for the
/// common shallow tree (the overflow string stays empty).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTreePath")]
pub struct TreePath {
    word: u64,
    overflow: String,
}

/// Unchecked mirror of [`TreePath`] for the serde boundary.
///
/// Everything in this module leans on the marker-bit invariant
/// (`word >= 1`) and on the overflow holding only alphabet digits, so
/// external data must not be able to smuggle in a value that violates
/// either.
#[derive(Deserialize)]
struct RawTreePath {
    word: u64,
    overflow: String,
}

impl TryFrom<RawTreePath> for TreePath {
    type Error = MalformedIdentifier;

    fn try_from(raw: RawTreePath) -> Result<Self, Self::Error> {
        if raw.word == 0 {
            return Err(MalformedIdentifier::MissingLengthMarker);
        }
        for c in raw.overflow.chars() {
            if digit_value(c).is_none() {
                return Err(MalformedIdentifier::InvalidDigit(c));
            }
        }
        Ok(TreePath {
            word: raw.word,
            overflow: raw.overflow,
        })
    }
}

impl TreePath {
    /// The designated empty path at the tree root.
    ///
    /// Distinct from "no path at all" (`Option::<TreePath>::None`), which
    /// is how a client-only mount with no upfront-pass position presents.
    pub const ROOT: TreePath = TreePath {
        word: 1,
        overflow: String::new(),
    };

    /// The packed word, marker bit included.
    #[inline]
    pub fn word(&self) -> u64 {
        self.word
    }

    /// Digits already spilled out of the word, newest group first.
    #[inline]
    pub fn overflow_digits(&self) -> &str {
        &self.overflow
    }

    /// True if no fork decision has been taken yet.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.word == 1 && self.overflow.is_empty()
    }

    /// Total number of fork-decision bits on this path.
    #[inline]
    pub fn depth_bits(&self) -> u32 {
        (bit_length(self.word) - 1) + self.overflow.len() as u32 * DIGIT_BITS
    }

    /// The full fork-decision sequence this path encodes, newest first.
    pub fn fork_bits(&self) -> PathBits {
        let base_len = bit_length(self.word) - 1;
        let payload = self.word & !(1u64 << base_len);
        let mut bits =
            Vec::with_capacity(base_len as usize + self.overflow.len() * DIGIT_BITS as usize);
        for i in (0..base_len).rev() {
            bits.push((payload >> i) & 1 == 1);
        }
        for c in self.overflow.chars() {
            debug_assert!(digit_value(c).is_some(), "overflow holds only alphabet digits");
            let value = digit_value(c).unwrap_or(0);
            for i in (0..DIGIT_BITS).rev() {
                bits.push((value >> i) & 1 == 1);
            }
        }
        PathBits(bits)
    }
}

impl Default for TreePath {
    fn default() -> Self {
        Self::ROOT
    }
}

/// Derive the path of child `child_index` under a fork with
/// `total_children` ordered children.
///
/// Pure: `parent` is untouched, so the caller keeps its own binding for
/// the remaining siblings. The child is appended as the slot
/// `child_index + 1` — never all-zero bits — in enough bits to represent
/// every sibling slot, so lists of different lengths at the same position
/// still fork apart. When the word budget would overflow, the oldest
/// whole-digit groups of the word spill into the overflow string; depth
/// is unbounded and nothing truncates.
///
/// Call this once per fork on descent; the child value is dropped when
/// the subtree is done. Which sibling renders first (or at all) has no
/// bearing on any other sibling's path.
pub fn push_fork(parent: &TreePath, child_index: u32, total_children: u32) -> TreePath {
    debug_assert!(total_children > 0, "a fork has at least one child");
    debug_assert!(child_index < total_children, "child index out of range");

    let base_len = bit_length(parent.word) - 1;
    let base_payload = parent.word & !(1u64 << base_len);
    let slot = (child_index + 1) as u64;
    let slot_len = bit_length(total_children as u64);
    let len = slot_len + base_len;

    if len > WORD_PATH_BITS {
        // Spill the oldest word bits in whole-digit groups; what remains
        // keeps the word aligned so later spills stay digit-exact.
        let spill_len = base_len - base_len % DIGIT_BITS;
        let spilled = base_payload & ((1u64 << spill_len) - 1);
        let rest = base_payload >> spill_len;
        let rest_len = base_len - spill_len;
        let word = (1u64 << (slot_len + rest_len)) | (slot << rest_len) | rest;
        let mut overflow = encode_group(spilled, spill_len);
        overflow.push_str(&parent.overflow);
        TreePath { word, overflow }
    } else {
        let word = (1u64 << len) | (slot << base_len) | base_payload;
        TreePath {
            word,
            overflow: parent.overflow.clone(),
        }
    }
}

/// Push the single-slot level a component that materialized an identifier
/// inserts above its children.
///
/// Without this, a component's first descendant would share the
/// component's own path and collide with it.
#[inline]
pub fn push_materialized(parent: &TreePath) -> TreePath {
    push_fork(parent, 0, 1)
}

/// Encode a path as base-32 digits, length marker included.
///
/// The marker bit is emitted (the root encodes as `"1"`), so the digit
/// string alone determines the exact bit sequence and [`decode_path`] is
/// a true inverse. The leading digit is therefore never `0`.
pub fn encode_path(path: &TreePath) -> String {
    let mut out = encode_word(path.word);
    out.push_str(&path.overflow);
    out
}

/// Decode a digit string produced by [`encode_path`].
///
/// Only ever called on externally-sourced markup; internally produced
/// digits always decode. Fails on an empty string, a character outside
/// the alphabet, or a missing length marker (leading `0` digit).
pub fn decode_path(digits: &str) -> Result<PathBits, MalformedIdentifier> {
    let mut chars = digits.chars();
    let first = chars.next().ok_or(MalformedIdentifier::EmptyPayload)?;
    let value = digit_value(first).ok_or(MalformedIdentifier::InvalidDigit(first))?;
    if value == 0 {
        return Err(MalformedIdentifier::MissingLengthMarker);
    }

    let mut bits = Vec::new();
    // The first digit's highest set bit is the marker; everything below
    // it is payload. Every later digit is exactly five payload bits.
    for i in (0..bit_length(value) - 1).rev() {
        bits.push((value >> i) & 1 == 1);
    }
    for c in chars {
        let value = digit_value(c).ok_or(MalformedIdentifier::InvalidDigit(c))?;
        for i in (0..DIGIT_BITS).rev() {
            bits.push((value >> i) & 1 == 1);
        }
    }
    Ok(PathBits(bits))
}

/// A decoded fork-decision sequence, newest decision first.
///
/// Displays as a `0`/`1` string, which keeps test assertions and
/// diagnostics readable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct PathBits(Vec<bool>);

impl PathBits {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PathBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            f.write_char(if *bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}
