pub mod codec;
pub mod config;
pub mod dictionary;
pub mod errors;
pub mod metrics;
pub mod results;
pub mod search;

pub use codec::{Charset, Decoder};
pub use config::{AnagramConfig, ConfigOverrides, EncodingMode};
pub use dictionary::Dictionary;
pub use errors::{AnagramError, AnagramResult};
pub use metrics::{PipelineMetrics, PipelineStats};
pub use results::AnagramSet;
pub use search::{find_anagrams, is_anagram, AnagramSession, Cancellation, LineChunker};
