//! Built-in phrase dictionary provider.

use super::Provider;
use crate::candidate::{Candidate, CandidateAction};
use crate::context::InputContext;
use crate::dictionary::PrefixDictionary;
use crate::error::Result;
use crate::loader::SourceSet;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Offers every phrase whose key starts with the query.
///
/// The label is the phrase; the commit text is the phrase followed by a space
/// and whatever part of the key the user has not typed yet. The dictionary is
/// replaced as a whole on reload, so a query sees either the old or the new
/// dictionary and never a partially loaded one.
#[derive(Debug, Default)]
pub struct DictionaryProvider {
    dictionary: RwLock<Arc<PrefixDictionary>>,
}

impl DictionaryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dictionary(dictionary: PrefixDictionary) -> Self {
        Self {
            dictionary: RwLock::new(Arc::new(dictionary)),
        }
    }

    /// The dictionary currently in use.
    pub fn dictionary(&self) -> Arc<PrefixDictionary> {
        Arc::clone(&self.dictionary.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swap in a new dictionary.
    pub fn replace(&self, dictionary: PrefixDictionary) {
        *self.dictionary.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(dictionary);
    }

    /// Rebuild from `sources` and swap the result in. On error the previous
    /// dictionary stays in place. Returns the number of entries loaded.
    pub fn reload(&self, sources: &SourceSet) -> Result<usize> {
        let dictionary = sources.load()?;
        let entries = dictionary.len();
        info!(
            layers = sources.layers().len(),
            entries,
            keys = dictionary.key_count(),
            "phrase dictionary reloaded"
        );
        self.replace(dictionary);
        Ok(entries)
    }
}

impl Provider for DictionaryProvider {
    fn populate(
        &self,
        _ic: &dyn InputContext,
        input: &str,
        add: &mut dyn FnMut(Candidate),
    ) -> bool {
        let dictionary = self.dictionary();
        for entry in dictionary.lookup(input) {
            let rest = &entry.key[input.len()..];
            let commit_text = format!("{} {}", entry.phrase, rest);
            add(Candidate::new(entry.phrase, commit_text, CandidateAction::Commit));
        }
        true
    }

    fn name(&self) -> &'static str {
        "dictionary"
    }
}
