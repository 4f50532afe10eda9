use encoding_rs::{Encoding, UTF_8};
use std::borrow::Cow;
use std::fmt;

use crate::errors::{AnagramError, AnagramResult};

/// Turns raw dictionary bytes into text.
///
/// Implementations are shared by every verification worker, so they must be
/// `Sync`. The pipeline only ever splits the dictionary on `0x0A`, which means
/// a decoder is only meaningful for ASCII-compatible encodings.
pub trait Decoder: Sync {
    /// Canonical name of the source encoding, used in logs and errors
    fn name(&self) -> &str;

    /// Decodes one dictionary line. Malformed input is an error, never replaced.
    fn decode<'b>(&self, raw: &'b [u8]) -> AnagramResult<Cow<'b, str>>;

    /// Length in bytes `word` would occupy in the source encoding
    fn encoded_len(&self, word: &str) -> usize {
        word.len()
    }
}

/// A single-file charset backed by the WHATWG encoding tables
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Charset {
    encoding: &'static Encoding,
}

impl Charset {
    /// Looks up a charset by any WHATWG label (`"windows-1257"`, `"latin1"`, `"utf8"`, ...)
    pub fn for_label(label: &str) -> AnagramResult<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| AnagramError::unknown_encoding(label))?;
        if !encoding.is_ascii_compatible() {
            return Err(AnagramError::unsupported_encoding(encoding.name()));
        }
        Ok(Self { encoding })
    }

    pub fn utf8() -> Self {
        Self { encoding: UTF_8 }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.encoding.name()).finish()
    }
}

impl Decoder for Charset {
    fn name(&self) -> &str {
        self.encoding.name()
    }

    fn decode<'b>(&self, raw: &'b [u8]) -> AnagramResult<Cow<'b, str>> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(raw)
            .ok_or_else(|| AnagramError::decode(self.encoding.name(), raw))
    }

    fn encoded_len(&self, word: &str) -> usize {
        if self.encoding == UTF_8 {
            return word.len();
        }
        let (bytes, _, _) = self.encoding.encode(word);
        bytes.len()
    }
}
