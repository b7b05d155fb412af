//! Ordered prefix dictionary.
//!
//! Keys are indexed by an `fst::Map` mapping each distinct key to a slot in a
//! payload table; the slot holds every phrase loaded for that key, in load
//! order. The fst keeps keys in byte-lexicographic order, so all keys that
//! start with a prefix form one contiguous run beginning at the first key
//! `>= prefix`.
//!
//! A dictionary is immutable once built. Reloading means building a new one
//! with [`DictionaryBuilder`] and swapping it in.

use crate::error::{Error, Result};
use crate::record::Entry;
use fst::{IntoStreamer, Map, MapBuilder, Streamer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Collects entries before the fst index is built.
#[derive(Debug, Clone, Default)]
pub struct DictionaryBuilder {
    map: BTreeMap<String, Vec<String>>,
    entries: usize,
}

impl DictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Entries sharing a key are all kept, in insertion order.
    pub fn insert(&mut self, entry: Entry) {
        self.map.entry(entry.key).or_default().push(entry.phrase);
        self.entries += 1;
    }

    /// Number of entries inserted so far.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Build the immutable dictionary.
    pub fn build(self) -> Result<PrefixDictionary> {
        let mut index = MapBuilder::memory();
        let mut payloads = Vec::with_capacity(self.map.len());
        // BTreeMap<String, _> iterates in byte order with unique keys, which is
        // exactly what the fst builder requires.
        for (slot, (key, phrases)) in self.map.into_iter().enumerate() {
            index.insert(key.as_bytes(), slot as u64)?;
            payloads.push(phrases);
        }
        let index = Map::new(index.into_inner()?)?;
        Ok(PrefixDictionary {
            index,
            payloads,
            entries: self.entries,
        })
    }
}

impl Extend<Entry> for DictionaryBuilder {
    fn extend<I: IntoIterator<Item = Entry>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

/// Immutable multi-map from key to phrases supporting prefix scans.
#[derive(Debug, Clone)]
pub struct PrefixDictionary {
    index: Map<Vec<u8>>,
    payloads: Vec<Vec<String>>,
    entries: usize,
}

impl Default for PrefixDictionary {
    fn default() -> Self {
        Self {
            index: Map::default(),
            payloads: Vec::new(),
            entries: 0,
        }
    }
}

impl PrefixDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary directly from entries.
    pub fn from_entries<I: IntoIterator<Item = Entry>>(entries: I) -> Result<Self> {
        let mut builder = DictionaryBuilder::new();
        builder.extend(entries);
        builder.build()
    }

    /// Total number of entries (a key with three phrases counts three times).
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.payloads.len()
    }

    /// All phrases stored under exactly `key`.
    pub fn get(&self, key: &str) -> &[String] {
        self.index
            .get(key)
            .and_then(|slot| self.payloads.get(slot as usize))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Entries whose key starts with `prefix`, ordered by key and then by
    /// load order. An empty prefix walks the whole dictionary.
    pub fn lookup(&self, prefix: &str) -> PrefixIter<'_> {
        PrefixIter {
            stream: self.index.range().ge(prefix).into_stream(),
            payloads: &self.payloads,
            prefix: prefix.as_bytes().to_vec(),
            key: String::new(),
            phrases: <&[String]>::default().iter(),
            done: false,
        }
    }

    /// Walk every entry in order.
    pub fn iter(&self) -> PrefixIter<'_> {
        self.lookup("")
    }

    /// Write the dictionary as an fst index plus a bincode payload table.
    pub fn save_artifacts<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        fst_path: P,
        payload_path: Q,
    ) -> Result<()> {
        std::fs::write(fst_path, self.index.as_fst().as_bytes())?;
        let writer = BufWriter::new(File::create(payload_path)?);
        bincode::serialize_into(writer, &self.payloads)?;
        Ok(())
    }

    /// Load artifacts written by [`save_artifacts`](Self::save_artifacts).
    pub fn load_artifacts<P: AsRef<Path>, Q: AsRef<Path>>(
        fst_path: P,
        payload_path: Q,
    ) -> Result<Self> {
        let index = Map::new(std::fs::read(fst_path)?)?;
        let reader = BufReader::new(File::open(payload_path)?);
        let payloads: Vec<Vec<String>> = bincode::deserialize_from(reader)?;
        if index.len() != payloads.len() {
            return Err(Error::ArtifactMismatch {
                keys: index.len(),
                payloads: payloads.len(),
            });
        }
        let entries = payloads.iter().map(Vec::len).sum();
        Ok(Self {
            index,
            payloads,
            entries,
        })
    }
}

/// Lazy prefix scan over a [`PrefixDictionary`].
///
/// Stops at the first key that no longer starts with the prefix.
pub struct PrefixIter<'a> {
    stream: fst::map::Stream<'a>,
    payloads: &'a [Vec<String>],
    prefix: Vec<u8>,
    key: String,
    phrases: std::slice::Iter<'a, String>,
    done: bool,
}

impl Iterator for PrefixIter<'_> {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        loop {
            if let Some(phrase) = self.phrases.next() {
                return Some(Entry::new(self.key.clone(), phrase.clone()));
            }
            if self.done {
                return None;
            }
            let Some((key, slot)) = self.stream.next() else {
                self.done = true;
                return None;
            };
            if !key.starts_with(&self.prefix) {
                self.done = true;
                return None;
            }
            // keys were inserted from &str
            self.key = String::from_utf8_lossy(key).into_owned();
            self.phrases = self
                .payloads
                .get(slot as usize)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(pairs: &[(&str, &str)]) -> PrefixDictionary {
        PrefixDictionary::from_entries(pairs.iter().map(|(k, p)| Entry::new(*k, *p))).unwrap()
    }

    fn keys(it: PrefixIter<'_>) -> Vec<String> {
        it.map(|e| e.key).collect()
    }

    #[test]
    fn prefix_scan_is_ordered_and_bounded() {
        let d = dict(&[("b", "2"), ("ab", "x"), ("a", "1"), ("abc", "y"), ("ac", "z")]);
        assert_eq!(keys(d.lookup("ab")), vec!["ab", "abc"]);
        assert_eq!(keys(d.lookup("a")), vec!["a", "ab", "abc", "ac"]);
        assert_eq!(keys(d.lookup("c")), Vec::<String>::new());
    }

    #[test]
    fn empty_prefix_returns_everything() {
        let d = dict(&[("z", "1"), ("m", "2"), ("a", "3")]);
        assert_eq!(keys(d.lookup("")), vec!["a", "m", "z"]);
        assert_eq!(d.iter().count(), 3);
    }

    #[test]
    fn duplicate_keys_keep_load_order() {
        let d = dict(&[("k", "first"), ("j", "other"), ("k", "second")]);
        let phrases: Vec<String> = d.lookup("k").map(|e| e.phrase).collect();
        assert_eq!(phrases, vec!["first", "second"]);
        assert_eq!(d.len(), 3);
        assert_eq!(d.key_count(), 2);
        assert_eq!(d.get("k"), &["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn multibyte_prefix() {
        let d = dict(&[("中国", "China"), ("中文", "Chinese"), ("日本", "Japan")]);
        assert_eq!(keys(d.lookup("中")), vec!["中国", "中文"]);
    }

    #[test]
    fn empty_dictionary() {
        let d = PrefixDictionary::new();
        assert!(d.is_empty());
        assert_eq!(d.lookup("").count(), 0);
        assert!(d.get("x").is_empty());
    }

    #[test]
    fn artifacts_reload_identically() {
        let dir = tempfile::tempdir().unwrap();
        let fst_path = dir.path().join("phrases.fst");
        let payload_path = dir.path().join("phrases.bincode");
        let d = dict(&[("a", "1"), ("a", "2"), ("b", "3")]);
        d.save_artifacts(&fst_path, &payload_path).unwrap();

        let loaded = PrefixDictionary::load_artifacts(&fst_path, &payload_path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.iter().collect::<Vec<_>>(), d.iter().collect::<Vec<_>>());
    }

    #[test]
    fn mismatched_artifacts_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let fst_path = dir.path().join("a.fst");
        let payload_path = dir.path().join("a.bincode");
        dict(&[("a", "1"), ("b", "2")])
            .save_artifacts(&fst_path, dir.path().join("unused.bincode"))
            .unwrap();
        dict(&[("a", "1")])
            .save_artifacts(dir.path().join("unused.fst"), &payload_path)
            .unwrap();

        let err = PrefixDictionary::load_artifacts(&fst_path, &payload_path).unwrap_err();
        assert!(matches!(err, Error::ArtifactMismatch { keys: 2, payloads: 1 }));
    }
}
