use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandLangConfig {
    /// Maximum nesting of conditional bodies, and of custom commands started from one
    /// another, before the work is aborted.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Return sources without any CommandLang sequence untouched, skipping the lexer.
    #[serde(default = "default_true")]
    pub fast_path: bool,

    /// Sent to the channel when an exec block names a command the invoker cannot run.
    #[serde(default = "default_denied_message")]
    pub denied_message: String,
}

impl Default for CommandLangConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            fast_path: default_true(),
            denied_message: default_denied_message(),
        }
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, ConfigError> {
    let config = serde_json::from_str(s)?;
    Ok(config)
}

fn default_max_depth() -> usize {
    32
}

fn default_true() -> bool {
    true
}

fn default_denied_message() -> String {
    "Cannot Execute Command: Insufficient Permissions".to_string()
}
