//! Phrase sources and dictionary loading.
//!
//! A dictionary is assembled from an ordered list of [`Layer`]s: the base
//! phrase file followed by every fragment file. Layers are concatenated, never
//! overridden, so the same key defined in two files yields two entries.
//!
//! Nothing in here aborts on bad input. Missing files, unreadable fragments
//! and malformed lines are logged and skipped.

use crate::config::Config;
use crate::dictionary::{DictionaryBuilder, PrefixDictionary};
use crate::error::Result;
use crate::record::parse_record;
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// One named phrase file taking part in a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub path: PathBuf,
    pub enabled: bool,
}

impl Layer {
    pub fn new<N: Into<String>, P: Into<PathBuf>>(name: N, path: P, enabled: bool) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            enabled,
        }
    }
}

/// Ordered set of layers to merge into one dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    layers: Vec<Layer>,
}

impl SourceSet {
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// One optional base file plus one fragment directory, using the default
    /// `.mb` / `.mb.disable` naming.
    pub fn from_paths(base: Option<&Path>, fragment_dir: &Path) -> Self {
        let defaults = Config::default();
        let mut layers = Vec::new();
        if let Some(base) = base {
            let name = base
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| defaults.base_file.clone());
            layers.push(Layer::new(name, base, true));
        }
        layers.extend(scan_fragments(
            &[fragment_dir.to_path_buf()],
            &defaults.fragment_suffix,
            &defaults.disable_suffix,
        ));
        Self { layers }
    }

    /// Resolve the layers named by `config` across its data directories.
    ///
    /// The base file is the first one found. Fragments are collected from
    /// every data directory; a file name seen in a higher-priority directory
    /// hides the same name further down the list, and a disable marker in any
    /// directory disables the fragment.
    pub fn discover(config: &Config) -> Self {
        let mut layers = Vec::new();
        if let Some(base) = config
            .data_dirs
            .iter()
            .map(|dir| dir.join(&config.base_file))
            .find(|path| path.is_file())
        {
            layers.push(Layer::new(config.base_file.clone(), base, true));
        }
        let fragment_dirs: Vec<PathBuf> = config
            .data_dirs
            .iter()
            .map(|dir| dir.join(&config.fragment_dir))
            .collect();
        layers.extend(scan_fragments(
            &fragment_dirs,
            &config.fragment_suffix,
            &config.disable_suffix,
        ));
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Build a fresh dictionary from every enabled layer.
    pub fn load(&self) -> Result<PrefixDictionary> {
        load_layers(&self.layers)
    }
}

/// List fragment files across `dirs` (highest priority first), sorted by name.
fn scan_fragments(dirs: &[PathBuf], suffix: &str, disable_suffix: &str) -> Vec<Layer> {
    let marker_suffix = format!("{suffix}{disable_suffix}");
    let mut fragments: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut disabled: HashSet<String> = HashSet::new();

    for dir in dirs {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "fragment directory not readable");
                continue;
            }
        };
        for entry in entries.flatten() {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if entry.path().is_dir() {
                continue;
            }
            if !disable_suffix.is_empty() && name.ends_with(&marker_suffix) {
                disabled.insert(name[..name.len() - disable_suffix.len()].to_string());
            } else if name.ends_with(suffix) {
                fragments.entry(name).or_insert_with(|| entry.path());
            }
        }
    }

    fragments
        .into_iter()
        .map(|(name, path)| {
            let enabled = !disabled.contains(&name);
            Layer::new(name, path, enabled)
        })
        .collect()
}

/// Concatenate every enabled layer into a new dictionary.
pub fn load_layers(layers: &[Layer]) -> Result<PrefixDictionary> {
    let mut builder = DictionaryBuilder::new();
    for layer in layers {
        if !layer.enabled {
            debug!(layer = %layer.name, "fragment disabled");
            continue;
        }
        match load_file(&layer.path, &mut builder) {
            Ok(count) => debug!(layer = %layer.name, count, "loaded phrases"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(layer = %layer.name, path = %layer.path.display(), "phrase file missing")
            }
            Err(e) => {
                warn!(
                    layer = %layer.name,
                    path = %layer.path.display(),
                    error = %e,
                    "cannot read phrase file"
                )
            }
        }
    }
    builder.build()
}

/// Load the one-base, one-directory layout.
pub fn load(base: Option<&Path>, fragment_dir: &Path) -> Result<PrefixDictionary> {
    SourceSet::from_paths(base, fragment_dir).load()
}

/// Parse every line of `path` into `builder`, returning the number of entries.
pub fn load_file<P: AsRef<Path>>(path: P, builder: &mut DictionaryBuilder) -> io::Result<usize> {
    let file = File::open(path)?;
    Ok(read_records(BufReader::new(file), builder))
}

/// Parse records from a reader. A read error ends the input early; entries
/// parsed before it are kept.
pub fn read_records<R: BufRead>(reader: R, builder: &mut DictionaryBuilder) -> usize {
    let mut count = 0;
    for (lineno, line) in reader.split(b'\n').enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(line = lineno + 1, error = %e, "read error, stopping");
                break;
            }
        };
        match parse_record(&line) {
            Some(entry) => {
                builder.insert(entry);
                count += 1;
            }
            None => trace!(line = lineno + 1, "skipped line"),
        }
    }
    count
}
