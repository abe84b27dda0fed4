//! Identifier requests — the entry point a component instance calls.
//!
//! The emitted string is an opaque value to the markup serializer; its
//! internal shape is:
//!
//! ```text
//! ┌───┬────────┬────────┬───┬─────────────┬───────────────┬───┐
//! │ _ │ prefix │ R or r │ _ │ path digits │ H + req index │ _ │
//! │   │ config │ marker │   │ base-32     │ (2nd req on)  │   │
//! └───┴────────┴────────┴───┴─────────────┴───────────────┴───┘
//! ```
//!
//! `R` marks an identifier derived from a matched tree position; both
//! passes recompute it and must agree byte for byte. `r` marks a
//! client-only identifier minted with no matching position. The leading
//! underscore keeps the whole string a valid CSS identifier no matter
//! what the prefix is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::encode_word;
use crate::path::{TreePath, encode_path};

/// Separator between the path digits and the request index.
///
/// Uppercase on purpose: it can never be mistaken for a path digit.
pub const REQUEST_SUFFIX: char = 'H';

/// Where an identifier came from, fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Derived from a matched tree position; stable across passes.
    Derived,
    /// Minted with no matching upfront-pass position. Unique within one
    /// traversal, but **not stable** across traversals or mount orders —
    /// callers must not use these for cross-session identity.
    ClientOnly,
}

impl Provenance {
    /// The single-character wire marker.
    #[inline]
    pub const fn marker(self) -> char {
        match self {
            Provenance::Derived => 'R',
            Provenance::ClientOnly => 'r',
        }
    }

    /// Inverse of [`marker`](Self::marker).
    #[inline]
    pub const fn from_marker(c: char) -> Option<Self> {
        match c {
            'R' => Some(Provenance::Derived),
            'r' => Some(Provenance::ClientOnly),
            _ => None,
        }
    }
}

/// An emitted identifier: the final string plus its provenance tag.
///
/// Immutable once minted; never reused for a different position within
/// one traversal. Consumers that only need the text use [`as_str`]
/// (or `Display`) and stay unaware of the internal structure.
///
/// [`as_str`]: Identifier::as_str
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    value: String,
    provenance: Provenance,
}

impl Identifier {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[inline]
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    #[inline]
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Per-component-instance request counter.
///
/// Lives in the driver's instance-durable storage: a re-render that keeps
/// the instance reuses the identifiers already minted instead of calling
/// back in, so the counter survives re-renders and resets only on a fresh
/// mount. Diagnostic double-invocation re-renders call [`reset`] first
/// and replay; derived identifiers are pure in (path, index), so the
/// replayed sequence is identical rather than drifting.
///
/// [`reset`]: RequestCounter::reset
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestCounter {
    next: u32,
}

impl RequestCounter {
    #[inline]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Requests issued by this instance so far.
    #[inline]
    pub const fn issued(&self) -> u32 {
        self.next
    }

    /// Take the next request index (0 for the first request).
    #[inline]
    pub fn advance(&mut self) -> u32 {
        let index = self.next;
        self.next += 1;
        index
    }

    /// Rewind for a deliberate replay of the same commit.
    #[inline]
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Mint the derived identifier for a tree position.
///
/// Pure: both passes call this independently with the same prefix, path,
/// and request index and get the same bytes. The request index suffix
/// appears only from the second request on, so every identifier of one
/// instance shares the same path-derived root.
pub fn derived_identifier(prefix: &str, path: &TreePath, request_index: u32) -> Identifier {
    let digits = encode_path(path);
    let mut value = String::with_capacity(prefix.len() + digits.len() + 6);
    value.push('_');
    value.push_str(prefix);
    value.push(Provenance::Derived.marker());
    value.push('_');
    value.push_str(&digits);
    if request_index > 0 {
        value.push(REQUEST_SUFFIX);
        value.push_str(&encode_word(request_index as u64));
    }
    value.push('_');
    Identifier {
        value,
        provenance: Provenance::Derived,
    }
}

/// Traversal-scoped identifier allocator.
///
/// Owns the configured prefix and the monotonic fallback counter for
/// client-only mounts. Each top-level traversal (one upfront pass, one
/// takeover pass) constructs its own allocator; nothing is shared, so
/// concurrent sibling subtrees need no locking — paths are values on the
/// walk and the only mutation here is the documented counter bump.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdAllocator {
    prefix: String,
    next_client_only: u64,
}

impl IdAllocator {
    /// An allocator with the given identifier prefix.
    ///
    /// The prefix is applied verbatim to every identifier; both passes
    /// must be configured with the same prefix for consistency to hold.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_client_only: 0,
        }
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Handle one identifier request from a component instance.
    ///
    /// With a path (the traversal position is known) this is
    /// [`derived_identifier`] plus the instance-counter bump. Without one
    /// (a client-only mount) it mints from the fallback counter; each
    /// such request draws a fresh value and needs no index suffix.
    pub fn request(
        &mut self,
        path: Option<&TreePath>,
        counter: &mut RequestCounter,
    ) -> Identifier {
        match path {
            Some(path) => {
                let index = counter.advance();
                derived_identifier(&self.prefix, path, index)
            }
            None => {
                let n = self.next_client_only;
                self.next_client_only += 1;
                let digits = encode_word(n);
                let mut value = String::with_capacity(self.prefix.len() + digits.len() + 4);
                value.push('_');
                value.push_str(&self.prefix);
                value.push(Provenance::ClientOnly.marker());
                value.push('_');
                value.push_str(&digits);
                value.push('_');
                Identifier {
                    value,
                    provenance: Provenance::ClientOnly,
                }
            }
        }
    }
}
