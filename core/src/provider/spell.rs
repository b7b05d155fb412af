//! Spell-suggestion provider.
//!
//! The spell checker itself lives outside this crate behind [`SpellBackend`].
//! [`WordListSpell`] is a small backend built from plain word lists, good
//! enough for completion by prefix.

use super::Provider;
use crate::candidate::{Candidate, CandidateAction};
use crate::config::Config;
use crate::context::InputContext;
use crate::error::Result;
use fst::{IntoStreamer, Set, Streamer};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// External spell-suggestion service.
pub trait SpellBackend: Send + Sync {
    fn supports_language(&self, language: &str) -> bool;

    /// Up to `limit` completions of `prefix` in `language`.
    fn suggest(&self, language: &str, prefix: &str, limit: usize) -> Vec<String>;
}

/// Offers spelling completions for the query.
pub struct SpellProvider {
    backend: Option<Arc<dyn SpellBackend>>,
    enabled: bool,
    fallback_language: String,
    limit: usize,
}

impl SpellProvider {
    pub fn new(backend: Option<Arc<dyn SpellBackend>>, config: &Config) -> Self {
        Self {
            backend,
            enabled: config.enable_spell,
            fallback_language: config.fallback_spell_language.clone(),
            limit: config.spell_limit,
        }
    }

    /// Pick the language to ask for: the context's when the backend has it,
    /// otherwise the fallback, provided the backend has that one.
    fn language<'a>(
        &'a self,
        backend: &dyn SpellBackend,
        ic: &'a dyn InputContext,
    ) -> Option<&'a str> {
        match ic.language_code() {
            Some(lang) if backend.supports_language(lang) => Some(lang),
            Some(_) if !backend.supports_language(&self.fallback_language) => None,
            _ => Some(&self.fallback_language),
        }
    }
}

impl std::fmt::Debug for SpellProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellProvider")
            .field("has_backend", &self.backend.is_some())
            .field("enabled", &self.enabled)
            .field("fallback_language", &self.fallback_language)
            .field("limit", &self.limit)
            .finish()
    }
}

impl Provider for SpellProvider {
    fn populate(&self, ic: &dyn InputContext, input: &str, add: &mut dyn FnMut(Candidate)) -> bool {
        if !self.enabled {
            return true;
        }
        let Some(backend) = self.backend.as_deref() else {
            return true;
        };
        let Some(language) = self.language(backend, ic) else {
            debug!(language = ?ic.language_code(), "no spell dictionary for context");
            return true;
        };
        for word in backend.suggest(language, input, self.limit) {
            add(Candidate::new(word.clone(), word, CandidateAction::Commit));
        }
        true
    }

    fn name(&self) -> &'static str {
        "spell"
    }
}

/// Word lists per language, each stored as an `fst::Set`.
#[derive(Debug, Clone, Default)]
pub struct WordListSpell {
    languages: HashMap<String, Set<Vec<u8>>>,
}

impl WordListSpell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the word list for `language`.
    pub fn insert_language<L, I, W>(&mut self, language: L, words: I) -> Result<()>
    where
        L: Into<String>,
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let sorted: BTreeSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        self.languages.insert(language.into(), Set::from_iter(sorted)?);
        Ok(())
    }

    /// Load every `<language>.dict` file (one word per line) in `dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut spell = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("dict") {
                continue;
            }
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let language = language.to_string();
            let content = std::fs::read_to_string(&path)?;
            spell.insert_language(language.clone(), content.lines())?;
            debug!(%language, path = %path.display(), "loaded spell word list");
        }
        Ok(spell)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }
}

impl SpellBackend for WordListSpell {
    fn supports_language(&self, language: &str) -> bool {
        self.languages.contains_key(language)
    }

    fn suggest(&self, language: &str, prefix: &str, limit: usize) -> Vec<String> {
        let mut words = Vec::new();
        let Some(set) = self.languages.get(language) else {
            return words;
        };
        if limit == 0 {
            return words;
        }
        let mut stream = set.range().ge(prefix).into_stream();
        while let Some(word) = stream.next() {
            if !word.starts_with(prefix.as_bytes()) {
                break;
            }
            words.push(String::from_utf8_lossy(word).into_owned());
            if words.len() == limit {
                break;
            }
        }
        words
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::QueryContext;

    fn backend() -> Arc<dyn SpellBackend> {
        let mut spell = WordListSpell::new();
        spell
            .insert_language("en", ["hello", "help", "helmet", "world", "he"])
            .unwrap();
        spell.insert_language("de", ["hallo", "helfen"]).unwrap();
        Arc::new(spell)
    }

    fn query(p: &SpellProvider, ic: &QueryContext, input: &str) -> Vec<String> {
        let mut out = Vec::new();
        assert!(p.populate(ic, input, &mut |c| {
            assert_eq!(c.action, CandidateAction::Commit);
            out.push(c.label)
        }));
        out
    }

    #[test]
    fn word_list_prefix_suggestions() {
        let b = backend();
        assert_eq!(b.suggest("en", "hel", 10), vec!["hello", "helmet", "help"]);
        assert_eq!(b.suggest("en", "hel", 2), vec!["hello", "helmet"]);
        assert!(b.suggest("en", "hel", 0).is_empty());
        assert!(b.suggest("fr", "hel", 10).is_empty());
    }

    #[test]
    fn context_language_wins_when_supported() {
        let p = SpellProvider::new(Some(backend()), &Config::default());
        assert_eq!(query(&p, &QueryContext::with_language("de"), "h"), vec!["hallo", "helfen"]);
    }

    #[test]
    fn unsupported_context_language_uses_fallback() {
        let p = SpellProvider::new(Some(backend()), &Config::default());
        let got = query(&p, &QueryContext::with_language("ja"), "wor");
        assert_eq!(got, vec!["world"]);
    }

    #[test]
    fn unsupported_fallback_emits_nothing() {
        let mut cfg = Config::default();
        cfg.fallback_spell_language = "fr".into();
        let p = SpellProvider::new(Some(backend()), &cfg);
        assert!(query(&p, &QueryContext::with_language("ja"), "h").is_empty());
    }

    #[test]
    fn disabled_or_missing_backend_emits_nothing() {
        let mut cfg = Config::default();
        cfg.enable_spell = false;
        let disabled = SpellProvider::new(Some(backend()), &cfg);
        assert!(query(&disabled, &QueryContext::new(), "h").is_empty());

        let missing = SpellProvider::new(None, &Config::default());
        assert!(query(&missing, &QueryContext::new(), "h").is_empty());
    }

    #[test]
    fn limit_comes_from_config() {
        let mut cfg = Config::default();
        cfg.spell_limit = 1;
        let p = SpellProvider::new(Some(backend()), &cfg);
        assert_eq!(query(&p, &QueryContext::new(), "he"), vec!["he"]);
    }

    #[test]
    fn load_dir_reads_dict_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.dict"), "apple\n\n  apricot \n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored\n").unwrap();
        let spell = WordListSpell::load_dir(dir.path()).unwrap();
        assert!(spell.supports_language("en"));
        assert!(!spell.supports_language("notes"));
        assert_eq!(spell.suggest("en", "ap", 5), vec!["apple", "apricot"]);
    }
}
