//! Digit alphabet and bit layout for fork-path encoding.
//!
//! Fork decisions are packed into a `u64` word with a length-marker bit
//! kept just above the payload, then rendered as base-32 digits:
//!
//! ```text
//! ┌──────────────┬────────┬──────────────────────────────┐
//! │ zero         │ marker │ payload (fork decisions)     │
//! │ 63..len+1    │ 1 bit  │ up to WORD_PATH_BITS bits    │
//! └──────────────┴────────┴──────────────────────────────┘
//! ```
//!
//! The marker bit makes the payload length recoverable from the digits
//! alone: without it, a path that forked toward slot `01` and a path one
//! level shorter would render to the same string. Paths deeper than the
//! word budget spill their oldest bits into pre-encoded digit strings,
//! always in whole-digit (5-bit) groups, so every overflow digit carries
//! exactly [`DIGIT_BITS`] path bits.

/// Bits carried by one path digit (base-32 = 5 bits per symbol).
pub const DIGIT_BITS: u32 = 5;

/// The 32-symbol digit alphabet, in digit-value order.
pub const ALPHABET: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Payload bit budget of the fast-path word.
///
/// One extra bit above the payload is reserved for the length marker, so
/// this must stay below `u64::BITS`. Fork decisions past this budget are
/// spilled into overflow digits instead of widening the arithmetic.
pub const WORD_PATH_BITS: u32 = 60;

/// Static assertions tying the layout constants together.
const _: () = {
    assert!(ALPHABET.len() == 1usize << DIGIT_BITS);
    assert!(
        WORD_PATH_BITS < u64::BITS,
        "word budget must leave room for the length-marker bit"
    );
};

/// Number of bits needed to represent `n` (0 for 0).
#[inline]
pub const fn bit_length(n: u64) -> u32 {
    u64::BITS - n.leading_zeros()
}

/// Digit value → digit character.
#[inline]
pub const fn digit_char(value: u64) -> char {
    debug_assert!(value < 32, "digit value must be < 32");
    ALPHABET[value as usize] as char
}

/// Digit character → digit value. `None` for anything outside the alphabet.
#[inline]
pub const fn digit_value(c: char) -> Option<u64> {
    match c {
        '0'..='9' => Some(c as u64 - '0' as u64),
        'a'..='v' => Some(10 + c as u64 - 'a' as u64),
        _ => None,
    }
}

/// Encode a word as minimal base-32 digits (no leading zero digit).
///
/// `0` encodes as `"0"`; a path word always has its marker bit set and so
/// never produces a leading zero.
pub fn encode_word(word: u64) -> String {
    if word == 0 {
        return String::from("0");
    }
    let mut digits = Vec::new();
    let mut rest = word;
    while rest != 0 {
        digits.push(ALPHABET[(rest & 0x1f) as usize]);
        rest >>= DIGIT_BITS;
    }
    digits.reverse();
    // ALPHABET is ASCII, so the byte buffer is valid UTF-8.
    String::from_utf8(digits).unwrap_or_default()
}

/// Encode exactly `bit_len / DIGIT_BITS` digits, zero padded.
///
/// Used for overflow spills, which are always whole-digit groups.
pub fn encode_group(bits: u64, bit_len: u32) -> String {
    debug_assert!(bit_len % DIGIT_BITS == 0, "spills are whole-digit groups");
    debug_assert!(
        bit_len == u64::BITS || bits < (1u64 << bit_len),
        "bits must fit in bit_len"
    );
    let mut out = String::with_capacity((bit_len / DIGIT_BITS) as usize);
    let mut shift = bit_len;
    while shift != 0 {
        shift -= DIGIT_BITS;
        out.push(digit_char((bits >> shift) & 0x1f));
    }
    out
}
