//! # Stable Tree-Position Identifiers (treeid)
//!
//! Assigns stable, collision-free string identifiers to positions in a
//! hierarchical component tree, such that two traversals that never
//! communicate — an asynchronous, streaming, possibly-suspending upfront
//! pass and a later synchronous takeover pass over the already-emitted
//! markup — derive **byte-identical** identifiers for every structurally
//! corresponding position.
//!
//! ## Identifier format
//!
//! ```text
//! ┌───┬────────┬────────┬───┬─────────────┬───────────────┬───┐
//! │ _ │ prefix │ R or r │ _ │ path digits │ H + req index │ _ │
//! └───┴────────┴────────┴───┴─────────────┴───────────────┴───┘
//! ```
//!
//! The path digits are base-32 (`0-9a-v`), one fork decision field per
//! tree level, newest first, with a length-marker bit so the exact bit
//! sequence survives base conversion. `R` means the identifier was
//! derived from a matched tree position and must match across passes;
//! `r` means it was minted client-only from a fallback counter and is
//! exempt from matching.
//!
//! ## Position, not timing
//!
//! A path is a pure function of structural position: parent path + child
//! index + sibling count. [`TreePath`] values are immutable and threaded
//! through the traversal call graph, so sibling subtrees may render
//! interleaved, suspend, finish out of order, or be cancelled without
//! affecting anyone else's identifiers:
//!
//! ```
//! use treeid::{IdAllocator, RequestCounter, TreePath, push_fork};
//!
//! let mut ids = IdAllocator::new("app-");
//! let mut counter = RequestCounter::new();
//!
//! // The driver forks toward the second of three children...
//! let child = push_fork(&TreePath::ROOT, 1, 3);
//! // ...and a component instance there requests an identifier.
//! let id = ids.request(Some(&child), &mut counter);
//! assert_eq!(id.as_str(), "_app-R_6_");
//! ```
//!
//! The takeover pass checks markup it did not emit with
//! [`check_takeover`], which recomputes the identifier for its own
//! position and reports a [`Verdict`]; recovery from a mismatch belongs
//! to the reconciliation collaborator.

pub mod layout;
pub mod path;
pub mod request;
pub mod validate;

pub use path::{PathBits, TreePath, decode_path, encode_path, push_fork, push_materialized};
pub use request::{
    IdAllocator, Identifier, Provenance, REQUEST_SUFFIX, RequestCounter, derived_identifier,
};
pub use validate::{
    MalformedIdentifier, ParsedIdentifier, Verdict, check_takeover, parse_identifier,
};
