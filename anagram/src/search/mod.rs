//! The concurrent anagram search pipeline.
//!
//! # Stages
//!
//! 1. **Chunk splitting** ([`chunker`]): the mapped dictionary is cut into at
//!    most `workers` newline-aligned slices. Nothing is copied.
//! 2. **Candidate production** (`producer`): a rayon pool scans the chunks in
//!    parallel and forwards only lines whose byte length equals the target's
//!    length in the dictionary encoding. This cheap filter discards almost every
//!    line before any decoding happens.
//! 3. **Verification** (`worker`): `workers` threads decode candidates, compare
//!    character counts and run the histogram check ([`is_anagram`]). Matches go
//!    into a sharded concurrent set.
//!
//! Stages 2 and 3 are connected by a bounded channel whose capacity is the
//! worker count, so memory use does not grow with the dictionary size:
//!
//! ```rust,ignore
//! let (tx, rx) = crossbeam_channel::bounded(workers.get());
//! // producers block on tx.send() while the channel is full
//! // workers loop on rx.iter() until every producer is done and tx is dropped
//! ```
//!
//! # Error Handling
//!
//! Any stage may stop the run. The first fatal error raises a shared stop flag,
//! producers and workers notice it on their next iteration, the channel is torn
//! down and the error is returned from [`AnagramSession::find`].
pub mod chunker;
pub mod engine;
pub mod matcher;
mod producer;
mod worker;

pub use chunker::LineChunker;
pub use engine::{find_anagrams, AnagramSession, Cancellation};
pub use matcher::is_anagram;
