//! Takeover-pass validation of identifiers found in existing markup.
//!
//! The takeover pass walks already-materialized output in document order
//! and meets identifier strings it did not emit itself. This module
//! classifies them: a derived identifier must equal the one the takeover
//! traversal recomputes for that position, a client-only identifier is
//! exempt from matching (the takeover pass mints a fresh one instead),
//! and anything that is not valid output of this crate at all is a
//! [`MalformedIdentifier`].
//!
//! A mismatch is a structural divergence between the two passes. It is
//! reported as a [`Verdict`], not handled here — discarding and
//! re-rendering the affected subtree is the reconciliation collaborator's
//! call.

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::digit_value;
use crate::path::{TreePath, decode_path};
use crate::request::{Provenance, REQUEST_SUFFIX, derived_identifier};

/// A string that is not valid output of the identifier generator.
///
/// Only ever produced for externally-sourced markup; internally minted
/// identifiers always parse.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MalformedIdentifier {
    #[error("identifier `{0}` is missing its `_…_` frame")]
    MissingFrame(String),
    #[error("identifier `{found}` does not carry the configured prefix `{prefix}`")]
    PrefixMismatch { prefix: String, found: String },
    #[error("unknown provenance marker `{0}`")]
    UnknownProvenance(char),
    #[error("empty path payload")]
    EmptyPayload,
    #[error("`{0}` is not a base-32 path digit")]
    InvalidDigit(char),
    #[error("path payload is missing its length marker (leading zero digit)")]
    MissingLengthMarker,
    #[error("request-index suffix `{0}` is not valid")]
    BadRequestIndex(String),
}

/// The pieces of a previously emitted identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedIdentifier {
    pub provenance: Provenance,
    /// The base-32 payload: path digits for a derived identifier, the
    /// fallback counter for a client-only one.
    pub payload: String,
    /// 0 for an instance's first request; the `H` suffix value otherwise.
    pub request_index: u32,
}

/// Outcome of checking one markup identifier against the takeover
/// traversal's own position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Derived, and byte-identical to the recomputation.
    Matches,
    /// Derived, but the passes disagree about this position. Carries the
    /// identifier the takeover pass derived, for the collaborator's
    /// diagnostics.
    Mismatch { expected: String },
    /// Client-only: exempt from matching by design.
    ClientOnly,
}

/// Split an identifier string into its parts, verifying the frame, the
/// configured prefix, the provenance marker, and the payload digits.
pub fn parse_identifier(
    raw: &str,
    prefix: &str,
) -> Result<ParsedIdentifier, MalformedIdentifier> {
    let frame_err = || MalformedIdentifier::MissingFrame(raw.to_string());
    let inner = raw.strip_prefix('_').ok_or_else(frame_err)?;
    let inner = inner.strip_suffix('_').ok_or_else(frame_err)?;
    let inner = inner
        .strip_prefix(prefix)
        .ok_or_else(|| MalformedIdentifier::PrefixMismatch {
            prefix: prefix.to_string(),
            found: raw.to_string(),
        })?;

    let mut chars = inner.chars();
    let marker = chars.next().ok_or_else(frame_err)?;
    let provenance = Provenance::from_marker(marker)
        .ok_or(MalformedIdentifier::UnknownProvenance(marker))?;
    let rest = chars.as_str().strip_prefix('_').ok_or_else(frame_err)?;

    let (payload, request_index) = match provenance {
        Provenance::Derived => match rest.split_once(REQUEST_SUFFIX) {
            Some((payload, index_digits)) => (payload, parse_request_index(index_digits)?),
            None => (rest, 0),
        },
        // Client-only identifiers never carry a request suffix; a stray
        // `H` falls through to digit validation below and is rejected.
        Provenance::ClientOnly => (rest, 0),
    };

    match provenance {
        // A derived payload must decode; this is where a stray alphabet
        // violation or missing length marker surfaces.
        Provenance::Derived => {
            decode_path(payload)?;
        }
        Provenance::ClientOnly => validate_counter_digits(payload)?,
    }

    Ok(ParsedIdentifier {
        provenance,
        payload: payload.to_string(),
        request_index,
    })
}

/// Check one markup identifier against the position and request index the
/// takeover traversal reached.
///
/// Derived identifiers are recomputed with [`derived_identifier`] and
/// compared for exact string equality. Client-only identifiers skip the
/// comparison. Parse failures surface as [`MalformedIdentifier`] rather
/// than crossing the traversal boundary silently.
pub fn check_takeover(
    raw: &str,
    prefix: &str,
    expected: &TreePath,
    request_index: u32,
) -> Result<Verdict, MalformedIdentifier> {
    let parsed = parse_identifier(raw, prefix)?;
    match parsed.provenance {
        Provenance::ClientOnly => Ok(Verdict::ClientOnly),
        Provenance::Derived => {
            let recomputed = derived_identifier(prefix, expected, request_index);
            if raw == recomputed.as_str() {
                Ok(Verdict::Matches)
            } else {
                warn!(
                    "tree-position mismatch: markup carries `{raw}`, takeover pass derived `{recomputed}`"
                );
                Ok(Verdict::Mismatch {
                    expected: recomputed.into_string(),
                })
            }
        }
    }
}

fn parse_request_index(digits: &str) -> Result<u32, MalformedIdentifier> {
    let bad = || MalformedIdentifier::BadRequestIndex(digits.to_string());
    if digits.is_empty() {
        return Err(bad());
    }
    let mut value: u64 = 0;
    for c in digits.chars() {
        let d = digit_value(c).ok_or_else(bad)?;
        value = value * 32 + d;
        if value > u32::MAX as u64 {
            return Err(bad());
        }
    }
    // The suffix is only ever emitted from the second request on.
    if value == 0 {
        return Err(bad());
    }
    Ok(value as u32)
}

fn validate_counter_digits(digits: &str) -> Result<(), MalformedIdentifier> {
    if digits.is_empty() {
        return Err(MalformedIdentifier::EmptyPayload);
    }
    for c in digits.chars() {
        if digit_value(c).is_none() {
            return Err(MalformedIdentifier::InvalidDigit(c));
        }
    }
    Ok(())
}
