//! Quick phrase configuration.
//!
//! Every field has a default, so a TOML file only needs the keys it changes:
//!
//! ```rust
//! use quickphrase_core::Config;
//!
//! let config = Config::from_toml_str(r#"
//!     data_dirs = ["/usr/share/quickphrase"]
//!     enable_spell = false
//! "#).unwrap();
//! assert_eq!(config.base_file, "QuickPhrase.mb");
//! assert!(!config.enable_spell);
//! ```
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Data directories, highest priority first.
    pub data_dirs: Vec<PathBuf>,

    /// Name of the base phrase file looked up in each data directory.
    pub base_file: String,
    /// Name of the fragment directory inside each data directory.
    pub fragment_dir: String,
    /// Suffix a fragment file must carry to be loaded.
    pub fragment_suffix: String,
    /// Appended to a fragment's file name to form its disable marker
    /// (`emoji.mb` is disabled by `emoji.mb.disable`).
    pub disable_suffix: String,

    pub enable_spell: bool,
    /// Spell language used when the input context has none, or has one the
    /// spell backend does not support.
    pub fallback_spell_language: String,
    /// Maximum number of spell suggestions per query.
    pub spell_limit: usize,

    pub enable_calc: bool,

    pub converter: ConverterConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dirs: Vec::new(),
            base_file: "QuickPhrase.mb".to_string(),
            fragment_dir: "quickphrase.d".to_string(),
            fragment_suffix: ".mb".to_string(),
            disable_suffix: ".disable".to_string(),
            enable_spell: true,
            fallback_spell_language: "en".to_string(),
            spell_limit: 5,
            enable_calc: true,
            converter: ConverterConfig::default(),
        }
    }
}

/// Settings for the external document converter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub enabled: bool,
    /// Queries must start with this prefix to reach the converter.
    pub trigger_prefix: String,
    pub program: String,
    pub args: Vec<String>,
    /// Wrap the query body in `$...$` so it is read as inline math.
    pub wrap_math: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            trigger_prefix: "pd:".to_string(),
            program: "pandoc".to_string(),
            args: ["-f", "latex", "-", "-t", "plain"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            wrap_math: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Add a data directory with lower priority than the existing ones.
    pub fn push_data_dir<P: Into<PathBuf>>(&mut self, dir: P) {
        self.data_dirs.push(dir.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn nested_converter_section() {
        let cfg = Config::from_toml_str(
            r#"
            enable_calc = false
            [converter]
            enabled = true
            program = "/usr/bin/pandoc"
            "#,
        )
        .unwrap();
        assert!(!cfg.enable_calc);
        assert!(cfg.converter.enabled);
        assert_eq!(cfg.converter.program, "/usr/bin/pandoc");
        assert_eq!(cfg.converter.trigger_prefix, "pd:");
    }

    #[test]
    fn toml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quickphrase.toml");
        let mut cfg = Config::default();
        cfg.push_data_dir("/tmp/a");
        cfg.spell_limit = 9;
        cfg.save_toml(&path).unwrap();
        assert_eq!(Config::load_toml(&path).unwrap(), cfg);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Config::from_toml_str("spell_limit = \"many\"").is_err());
    }
}
