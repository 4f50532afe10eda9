use crossbeam_channel::Receiver;
use dashmap::DashSet;
use tracing::{debug, trace, warn};

use super::engine::StopSignal;
use super::matcher::is_anagram;
use crate::codec::Decoder;
use crate::config::EncodingMode;
use crate::errors::AnagramResult;
use crate::metrics::PipelineMetrics;

/// Verifies candidates pulled from the shared channel.
///
/// Every worker of a session shares the same decoder, result set, stop signal
/// and metrics. The result set insert is the only synchronized step.
pub(crate) struct VerificationWorker<'s, D: Decoder + ?Sized> {
    pub(crate) id: usize,
    pub(crate) target: &'s str,
    pub(crate) target_chars: usize,
    pub(crate) decoder: &'s D,
    pub(crate) encoding_mode: EncodingMode,
    pub(crate) results: &'s DashSet<String>,
    pub(crate) stop: &'s StopSignal<'s>,
    pub(crate) metrics: &'s PipelineMetrics,
}

impl<'s, D: Decoder + ?Sized> VerificationWorker<'s, D> {
    /// Consumes candidates until the channel is closed and drained.
    ///
    /// A fatal error raises the stop signal before it is returned, so the
    /// producers and the other workers wind down too.
    pub(crate) fn run(self, candidates: Receiver<&[u8]>) -> AnagramResult<()> {
        debug!("Worker {} started", self.id);

        for raw in candidates.iter() {
            if self.stop.should_stop() {
                debug!("Worker {} stopping early", self.id);
                break;
            }
            if let Err(e) = self.verify(raw) {
                self.stop.abort();
                return Err(e);
            }
        }

        debug!("Worker {} finished", self.id);
        Ok(())
    }

    fn verify(&self, raw: &[u8]) -> AnagramResult<()> {
        let word = match self.decoder.decode(raw) {
            Ok(word) => word,
            Err(e) => match self.encoding_mode {
                EncodingMode::Skip => {
                    warn!("Skipping undecodable line: {}", e);
                    self.metrics.record_decode_failure();
                    return Ok(());
                }
                EncodingMode::FailFast => return Err(e),
            },
        };
        self.metrics.record_decoded();

        if word.chars().count() != self.target_chars {
            trace!("Rejected '{}': character count differs", word);
            return Ok(());
        }

        if is_anagram(self.target, &word) && self.results.insert(word.into_owned()) {
            self.metrics.record_match();
        }
        Ok(())
    }
}
