use crossbeam_channel::{Receiver, Sender};
use dashmap::DashSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info};

use super::producer::run_producers;
use super::worker::VerificationWorker;
use crate::codec::Decoder;
use crate::config::EncodingMode;
use crate::errors::{AnagramError, AnagramResult};
use crate::metrics::PipelineMetrics;
use crate::results::AnagramSet;

/// Caller-side handle for stopping a running search.
///
/// Clones share the same flag. Once cancelled, every later
/// [`AnagramSession::find`] on a session holding it returns
/// [`AnagramError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Per-run stop flag: raised by the caller's [`Cancellation`] or by the first
/// fatal error inside the pipeline. Checked by producers and workers on every
/// loop iteration.
#[derive(Debug)]
pub(crate) struct StopSignal<'s> {
    external: &'s Cancellation,
    aborted: AtomicBool,
}

impl<'s> StopSignal<'s> {
    pub(crate) fn new(external: &'s Cancellation) -> Self {
        Self {
            external,
            aborted: AtomicBool::new(false),
        }
    }

    pub(crate) fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    pub(crate) fn should_stop(&self) -> bool {
        self.aborted.load(Ordering::Relaxed) || self.external.is_cancelled()
    }
}

/// The bounded hand-off between producers and workers.
///
/// Its capacity equals the worker count, so at most `workers` candidates are
/// ever buffered and producers block until a worker drains one.
pub(crate) fn candidate_channel<'a>(
    workers: NonZeroUsize,
) -> (Sender<&'a [u8]>, Receiver<&'a [u8]>) {
    crossbeam_channel::bounded(workers.get())
}

/// One dictionary buffer prepared for anagram searches.
///
/// The session borrows the buffer and the decoder; each [`find`](Self::find)
/// runs the full pipeline and blocks until it completes:
///
/// ```text
/// splitter thread:   buffer -> LineChunker -> chunk channel ─┐
///                                                             │
/// producer pool:     chunk -> lines -> byte-length filter -> candidate channel ─┐
///                                                                                │
/// workers (N):       decode -> character count -> histogram -> result set
/// ```
///
/// # Examples
///
/// ```rust
/// use anagram::{AnagramSession, Charset};
/// use std::num::NonZeroUsize;
///
/// let dictionary = b"listen\nenlist\nsilent\nhello\n";
/// let charset = Charset::utf8();
/// let session = AnagramSession::new(dictionary, &charset, NonZeroUsize::new(4).unwrap());
///
/// let found = session.find("listen").unwrap();
/// assert_eq!(found.to_sorted_vec(), vec!["enlist", "listen", "silent"]);
/// ```
#[derive(Debug)]
pub struct AnagramSession<'a, D: Decoder + ?Sized> {
    buffer: &'a [u8],
    decoder: &'a D,
    workers: NonZeroUsize,
    encoding_mode: EncodingMode,
    cancellation: Cancellation,
    metrics: PipelineMetrics,
}

impl<'a, D: Decoder + ?Sized> AnagramSession<'a, D> {
    /// Creates a session that skips undecodable lines
    pub fn new(buffer: &'a [u8], decoder: &'a D, workers: NonZeroUsize) -> Self {
        Self {
            buffer,
            decoder,
            workers,
            encoding_mode: EncodingMode::default(),
            cancellation: Cancellation::new(),
            metrics: PipelineMetrics::new(),
        }
    }

    pub fn with_encoding_mode(mut self, mode: EncodingMode) -> Self {
        self.encoding_mode = mode;
        self
    }

    /// Uses `cancellation` instead of the session's own handle
    pub fn with_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// Counters accumulated over every run of this session
    pub fn metrics(&self) -> &PipelineMetrics {
        &self.metrics
    }

    /// Finds every dictionary line that is an anagram of `target`.
    ///
    /// Blocks until all workers have exited. The first fatal error wins; no
    /// partial results are returned alongside it.
    pub fn find(&self, target: &str) -> AnagramResult<AnagramSet> {
        info!(
            "Searching {} bytes of {} text for anagrams of '{}' with {} workers",
            self.buffer.len(),
            self.decoder.name(),
            target,
            self.workers
        );

        if self.cancellation.is_cancelled() {
            return Err(AnagramError::Cancelled);
        }
        if target.is_empty() {
            debug!("Empty target word, returning empty result");
            return Ok(AnagramSet::new());
        }

        let target_len = self.decoder.encoded_len(target);
        let target_chars = target.chars().count();
        let results = DashSet::new();
        let stop = StopSignal::new(&self.cancellation);

        self.run_pipeline(target, target_len, target_chars, &results, &stop)?;

        if self.cancellation.is_cancelled() {
            return Err(AnagramError::Cancelled);
        }

        self.metrics.log_stats();
        let found: AnagramSet = results.into_iter().collect();
        info!("Search complete. Found {} anagrams", found.len());
        Ok(found)
    }

    fn run_pipeline(
        &self,
        target: &str,
        target_len: usize,
        target_chars: usize,
        results: &DashSet<String>,
        stop: &StopSignal<'_>,
    ) -> AnagramResult<()> {
        let (tx, rx) = candidate_channel(self.workers);
        let metrics = &self.metrics;
        let buffer = self.buffer;
        let workers = self.workers;

        thread::scope(|s| {
            let mut first_error: Option<AnagramError> = None;

            let producer = thread::Builder::new()
                .name("anagram-splitter".to_string())
                .spawn_scoped(s, move || {
                    run_producers(buffer, workers, target_len, tx, stop, metrics)
                });
            let producer = match producer {
                Ok(handle) => Some(handle),
                Err(e) => {
                    stop.abort();
                    first_error = Some(AnagramError::IoError(e));
                    None
                }
            };

            let mut handles = Vec::with_capacity(workers.get());
            for id in 0..workers.get() {
                let worker = VerificationWorker {
                    id,
                    target,
                    target_chars,
                    decoder: self.decoder,
                    encoding_mode: self.encoding_mode,
                    results,
                    stop,
                    metrics,
                };
                let candidates = rx.clone();
                let spawned = thread::Builder::new()
                    .name(format!("anagram-worker-{}", id))
                    .spawn_scoped(s, move || worker.run(candidates));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        stop.abort();
                        first_error.get_or_insert(AnagramError::IoError(e));
                        break;
                    }
                }
            }

            // Channel disconnection is driven by worker exits from here on
            drop(rx);

            for handle in handles {
                let outcome = handle.join().unwrap_or_else(|_| {
                    stop.abort();
                    Err(AnagramError::WorkerPanicked)
                });
                if let Err(e) = outcome {
                    first_error.get_or_insert(e);
                }
            }

            if let Some(handle) = producer {
                let outcome = handle
                    .join()
                    .unwrap_or(Err(AnagramError::WorkerPanicked));
                if let Err(e) = outcome {
                    first_error.get_or_insert(e);
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })
    }
}

/// Finds every line of `buffer` that is an anagram of `target`.
///
/// Shorthand for [`AnagramSession::new`] followed by
/// [`find`](AnagramSession::find), skipping undecodable lines.
pub fn find_anagrams<D: Decoder + ?Sized>(
    buffer: &[u8],
    decoder: &D,
    target: &str,
    workers: NonZeroUsize,
) -> AnagramResult<AnagramSet> {
    AnagramSession::new(buffer, decoder, workers).find(target)
}
