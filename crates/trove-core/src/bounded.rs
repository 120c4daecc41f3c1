//! Bounded text support
//!
//! Every textual field in a row is bounded by a configured maximum byte
//! length. Normalization never fails and never rejects: oversized input is
//! truncated at a character boundary, empty input is replaced by a fixed
//! fallback. This keeps the write path free of length errors.

/// Fallback for empty kind/category fields.
pub const FALLBACK_LABEL: &str = "UNKNOWN";

/// Fallback for an empty payload.
pub const FALLBACK_PAYLOAD: &str = "<no payload>";

/// Truncate `s` to at most `max_bytes`, backing up to a char boundary.
#[inline]
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// A length-bounded, normalized text field.
///
/// Construction goes through [`BoundedText::normalize`], so a value of this
/// type is always non-empty (given a non-empty fallback) and never longer
/// than the cap it was built with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoundedText {
    text: String,
}

impl BoundedText {
    /// Normalize `input` against `max_bytes`: empty input becomes
    /// `fallback`, and the result is truncated at a char boundary.
    /// The fallback itself is subject to the same truncation.
    pub fn normalize(input: &str, max_bytes: usize, fallback: &str) -> Self {
        let src = if input.is_empty() { fallback } else { input };
        BoundedText {
            text: truncate_str(src, max_bytes).to_owned(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for BoundedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for BoundedText {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl PartialEq<str> for BoundedText {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for BoundedText {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}
