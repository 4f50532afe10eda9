use crossbeam_channel::Sender;
use memchr::memchr;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::num::NonZeroUsize;
use std::thread;
use tracing::{debug, trace};

use super::chunker::LineChunker;
use super::engine::StopSignal;
use crate::errors::AnagramResult;
use crate::metrics::PipelineMetrics;

/// Lines of a chunk, split on `\n` with the terminator removed.
///
/// A trailing `\r` is kept. A final line without `\n` is still yielded, but
/// the empty remainder after a final `\n` is not.
#[derive(Debug, Clone)]
pub(crate) struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Lines<'a> {
    pub(crate) fn new(chunk: &'a [u8]) -> Self {
        Self { rest: chunk }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let (line, rest) = match memchr(b'\n', self.rest) {
            Some(i) => (&self.rest[..i], &self.rest[i + 1..]),
            None => (self.rest, &self.rest[self.rest.len()..]),
        };
        self.rest = rest;
        Some(line)
    }
}

/// Sends every line of `chunk` whose byte length is `target_len`.
///
/// Returns early when the search is stopped or every receiver is gone.
pub(crate) fn scan_chunk<'a>(
    chunk: &'a [u8],
    target_len: usize,
    candidates: &Sender<&'a [u8]>,
    stop: &StopSignal<'_>,
    metrics: &PipelineMetrics,
) {
    let mut lines = 0u64;
    let mut queued = 0u64;

    for line in Lines::new(chunk) {
        if stop.should_stop() {
            break;
        }
        lines += 1;
        if line.len() != target_len {
            continue;
        }
        if candidates.send(line).is_err() {
            trace!("Candidate channel disconnected, producer exiting");
            break;
        }
        queued += 1;
    }

    metrics.record_scan(lines, queued);
}

/// Runs the whole producer stage and closes the candidate channel.
///
/// One thread cuts `buffer` into at most `parts` chunks and hands them over a
/// bounded channel, so scanning starts before the last cut is known. A
/// dedicated rayon pool of `parts` threads scans the chunks concurrently.
/// `candidates` is dropped only after every chunk has been scanned.
pub(crate) fn run_producers<'a>(
    buffer: &'a [u8],
    parts: NonZeroUsize,
    target_len: usize,
    candidates: Sender<&'a [u8]>,
    stop: &StopSignal<'_>,
    metrics: &PipelineMetrics,
) -> AnagramResult<()> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(parts.get())
        .thread_name(|i| format!("anagram-producer-{}", i))
        .build()?;

    let (chunk_tx, chunk_rx) = crossbeam_channel::bounded::<&'a [u8]>(parts.get());

    thread::scope(|s| {
        s.spawn(move || {
            for chunk in LineChunker::new(buffer, parts) {
                if chunk_tx.send(chunk).is_err() {
                    break;
                }
            }
            // chunk_tx drops here, closing the chunk channel
        });

        pool.install(|| {
            chunk_rx.into_iter().par_bridge().for_each(|chunk| {
                metrics.record_chunk(chunk.len());
                scan_chunk(chunk, target_len, &candidates, stop, metrics);
            });
        });
    });

    debug!("All producers finished, closing candidate channel");
    drop(candidates);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::engine::Cancellation;

    fn lines(buf: &[u8]) -> Vec<&[u8]> {
        Lines::new(buf).collect()
    }

    #[test]
    fn test_lines_split_on_newline() {
        assert_eq!(lines(b"ab\ncd\n"), vec![&b"ab"[..], &b"cd"[..]]);
        assert_eq!(lines(b"ab\n\ncd"), vec![&b"ab"[..], &b""[..], &b"cd"[..]]);
        assert!(lines(b"").is_empty());
    }

    #[test]
    fn test_lines_keep_carriage_return() {
        assert_eq!(lines(b"ab\r\ncd"), vec![&b"ab\r"[..], &b"cd"[..]]);
    }

    #[test]
    fn test_scan_chunk_filters_by_byte_length() {
        let cancellation = Cancellation::new();
        let stop = StopSignal::new(&cancellation);
        let metrics = PipelineMetrics::new();
        let (tx, rx) = crossbeam_channel::unbounded();

        scan_chunk(b"listen\nhello\nenlist\nsilents\n", 6, &tx, &stop, &metrics);
        drop(tx);

        let sent: Vec<&[u8]> = rx.iter().collect();
        assert_eq!(sent, vec![&b"listen"[..], &b"enlist"[..]]);
        let stats = metrics.get_stats();
        assert_eq!(stats.lines_scanned, 4);
        assert_eq!(stats.candidates_queued, 2);
    }

    #[test]
    fn test_scan_chunk_stops_when_cancelled() {
        let cancellation = Cancellation::new();
        cancellation.cancel();
        let stop = StopSignal::new(&cancellation);
        let metrics = PipelineMetrics::new();
        let (tx, rx) = crossbeam_channel::unbounded();

        scan_chunk(b"abc\nabc\n", 3, &tx, &stop, &metrics);
        drop(tx);

        assert_eq!(rx.iter().count(), 0);
    }

    #[test]
    fn test_run_producers_sends_every_candidate_once() {
        let mut buffer = Vec::new();
        for i in 0..1000 {
            buffer.extend_from_slice(format!("w{:04}\nlonger-line-{}\n", i, i).as_bytes());
        }

        let cancellation = Cancellation::new();
        let stop = StopSignal::new(&cancellation);
        let metrics = PipelineMetrics::new();
        let (tx, rx) = crossbeam_channel::bounded(4);

        let received = thread::scope(|s| {
            let consumer = s.spawn(|| rx.iter().collect::<Vec<&[u8]>>());
            run_producers(&buffer, NonZeroUsize::new(7).unwrap(), 5, tx, &stop, &metrics)
                .unwrap();
            consumer.join().unwrap()
        });

        let mut words: Vec<String> = received
            .iter()
            .map(|w| String::from_utf8(w.to_vec()).unwrap())
            .collect();
        words.sort();
        let expected: Vec<String> = (0..1000).map(|i| format!("w{:04}", i)).collect();
        assert_eq!(words, expected);
        assert_eq!(metrics.get_stats().lines_scanned, 2000);
        assert!(metrics.get_stats().chunks <= 7);
    }
}
