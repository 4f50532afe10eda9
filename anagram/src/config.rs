use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::codec::Charset;
use crate::errors::{AnagramError, AnagramResult};

/// Configuration for an anagram search.
///
/// # Configuration Locations
///
/// Values are layered from these sources, later ones winning:
/// 1. Global `$HOME/.config/anagram/config.yaml`
/// 2. Local `.anagram.yaml` in the current directory
/// 3. Custom config file specified via `--config` flag
///
/// Command-line flags are applied last through [`AnagramConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Dictionary file, one word per line
/// dictionary: "/usr/share/dict/lt.txt"
///
/// # Encoding of the dictionary (any WHATWG label)
/// charset: "windows-1257"
///
/// # Verification workers (default: CPU cores)
/// thread_count: 8
///
/// # What to do with lines that fail to decode (skip|failfast)
/// encoding_mode: "skip"
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnagramConfig {
    /// Dictionary file to search
    #[serde(default)]
    pub dictionary: Option<PathBuf>,

    /// Encoding label of the dictionary file
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Number of verification workers, also the candidate channel capacity
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// How undecodable dictionary lines are handled
    #[serde(default)]
    pub encoding_mode: EncodingMode,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Policy for dictionary lines that are not valid in the configured charset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Log the line, count it and keep searching
    #[default]
    Skip,
    /// Abort the whole search with [`AnagramError::Decode`]
    FailFast,
}

impl FromStr for EncodingMode {
    type Err = AnagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(EncodingMode::Skip),
            "failfast" | "fail-fast" => Ok(EncodingMode::FailFast),
            other => Err(AnagramError::config_error(format!(
                "Unknown encoding mode '{}' (expected skip or failfast)",
                other
            ))),
        }
    }
}

impl fmt::Display for EncodingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingMode::Skip => write!(f, "skip"),
            EncodingMode::FailFast => write!(f, "failfast"),
        }
    }
}

/// Values given on the command line; `None` leaves the configured value alone
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub dictionary: Option<PathBuf>,
    pub charset: Option<String>,
    pub thread_count: Option<NonZeroUsize>,
    pub encoding_mode: Option<EncodingMode>,
    pub log_level: Option<String>,
}

fn default_charset() -> String {
    "windows-1257".to_string()
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AnagramConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            charset: default_charset(),
            thread_count: default_thread_count(),
            encoding_mode: EncodingMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl AnagramConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus an explicit file.
    ///
    /// The explicit file is required to exist; the default locations are optional.
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let default_files = [
            // Global config
            dirs::config_dir().map(|p| p.join("anagram/config.yaml")),
            // Local config
            Some(PathBuf::from(".anagram.yaml")),
        ];

        for path in default_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges command-line values over the loaded configuration
    pub fn merge_with_cli(mut self, cli: ConfigOverrides) -> Self {
        if cli.dictionary.is_some() {
            self.dictionary = cli.dictionary;
        }
        if let Some(charset) = cli.charset {
            self.charset = charset;
        }
        if let Some(threads) = cli.thread_count {
            self.thread_count = threads;
        }
        if let Some(mode) = cli.encoding_mode {
            self.encoding_mode = mode;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Resolves the configured charset label
    pub fn charset(&self) -> AnagramResult<Charset> {
        Charset::for_label(&self.charset)
    }

    /// Returns the dictionary path or a configuration error when none is set
    pub fn dictionary_path(&self) -> AnagramResult<&Path> {
        self.dictionary
            .as_deref()
            .ok_or_else(|| AnagramError::config_error("No dictionary file specified"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Decoder;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            dictionary: "words/lt.txt"
            charset: "iso-8859-13"
            thread_count: 4
            encoding_mode: "failfast"
            log_level: "debug"
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = AnagramConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.dictionary, Some(PathBuf::from("words/lt.txt")));
        assert_eq!(config.charset, "iso-8859-13");
        assert_eq!(config.thread_count, NonZeroUsize::new(4).unwrap());
        assert_eq!(config.encoding_mode, EncodingMode::FailFast);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.charset().unwrap().name(), "ISO-8859-13");
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"dictionary: \"dict.txt\"\n").unwrap();

        let config = AnagramConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.dictionary, Some(PathBuf::from("dict.txt")));
        assert_eq!(config.charset, "windows-1257");
        assert_eq!(
            config.thread_count,
            NonZeroUsize::new(num_cpus::get()).unwrap()
        );
        assert_eq!(config.encoding_mode, EncodingMode::Skip);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_merge_with_cli() {
        let file_config = AnagramConfig {
            dictionary: Some(PathBuf::from("file.txt")),
            charset: "windows-1257".to_string(),
            thread_count: NonZeroUsize::new(4).unwrap(),
            encoding_mode: EncodingMode::Skip,
            log_level: "warn".to_string(),
        };

        let cli = ConfigOverrides {
            dictionary: Some(PathBuf::from("cli.txt")),
            charset: None,
            thread_count: Some(NonZeroUsize::new(16).unwrap()),
            encoding_mode: Some(EncodingMode::FailFast),
            log_level: None,
        };

        let merged = file_config.merge_with_cli(cli);
        assert_eq!(merged.dictionary, Some(PathBuf::from("cli.txt"))); // CLI value
        assert_eq!(merged.charset, "windows-1257"); // File value (CLI None)
        assert_eq!(merged.thread_count, NonZeroUsize::new(16).unwrap()); // CLI value
        assert_eq!(merged.encoding_mode, EncodingMode::FailFast); // CLI value
        assert_eq!(merged.log_level, "warn"); // File value (CLI None)
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"thread_count: \"many\"\nencoding_mode: \"sometimes\"\n")
            .unwrap();

        let result = AnagramConfig::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid config");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = AnagramConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_encoding_mode_from_str() {
        assert_eq!("skip".parse::<EncodingMode>().unwrap(), EncodingMode::Skip);
        assert_eq!(
            "FailFast".parse::<EncodingMode>().unwrap(),
            EncodingMode::FailFast
        );
        assert!("lossy".parse::<EncodingMode>().is_err());
    }

    #[test]
    fn test_missing_dictionary_is_config_error() {
        let config = AnagramConfig::default();
        assert!(matches!(
            config.dictionary_path(),
            Err(AnagramError::ConfigError(_))
        ));
    }
}
