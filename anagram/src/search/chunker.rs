//! Newline-aligned splitting of a mapped dictionary.
//!
//! The splitter hands out borrowed sub-slices of the buffer, so no dictionary
//! bytes are copied. Invariants:
//! - Chunks are disjoint and contiguous; concatenated they equal the buffer.
//! - Every chunk except the last ends with `\n`, so no line is ever split.
//! - At most `k` chunks are produced; an empty buffer produces none.

use memchr::memchr;
use std::num::NonZeroUsize;

/// Iterator over newline-aligned chunks of a byte buffer.
///
/// Each cut is placed at the first `\n` found at or after `len / k` bytes past
/// the previous cut. The newline stays with the chunk it terminates. Whatever
/// remains once no further cut is possible becomes the final chunk.
#[derive(Debug, Clone)]
pub struct LineChunker<'a> {
    rest: &'a [u8],
    approx_size: usize,
}

impl<'a> LineChunker<'a> {
    /// Splits `buf` into at most `parts` chunks
    pub fn new(buf: &'a [u8], parts: NonZeroUsize) -> Self {
        Self {
            rest: buf,
            approx_size: buf.len() / parts.get(),
        }
    }
}

impl<'a> Iterator for LineChunker<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let cut = if self.rest.len() > self.approx_size {
            memchr(b'\n', &self.rest[self.approx_size..])
                .map_or(self.rest.len(), |i| self.approx_size + i + 1)
        } else {
            self.rest.len()
        };

        let (chunk, rest) = self.rest.split_at(cut);
        self.rest = rest;
        Some(chunk)
    }
}
