//! Quick phrase engine.
//!
//! `QuickPhrase` owns the configuration and the provider chain and is what a
//! host talks to. Providers run in this order:
//!
//! 1. registered callbacks (may veto everything below)
//! 2. the phrase dictionary
//! 3. the calculator, when `enable_calc` is set
//! 4. spell suggestions, when a spell backend was supplied
//! 5. the document converter, when `converter.enabled` is set

use crate::candidate::{Candidate, CandidateList};
use crate::config::Config;
use crate::context::InputContext;
use crate::dictionary::PrefixDictionary;
use crate::error::Result;
use crate::loader::SourceSet;
use crate::provider::{
    CalculatorProvider, CallbackProvider, CommandConverter, Converter, ConverterProvider,
    DictionaryProvider, Provider, ProviderChain, SpellBackend, SpellProvider,
};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct QuickPhrase {
    config: Config,
    callbacks: Arc<CallbackProvider>,
    dictionary: Arc<DictionaryProvider>,
    spell: Option<Arc<dyn SpellBackend>>,
    converter: Option<Arc<dyn Converter>>,
    chain: ProviderChain,
}

impl QuickPhrase {
    /// Create an engine with an empty dictionary. Call [`reload`](Self::reload)
    /// to load phrases from the configured data directories.
    pub fn new(config: Config) -> Self {
        let mut engine = Self {
            config,
            callbacks: Arc::new(CallbackProvider::new()),
            dictionary: Arc::new(DictionaryProvider::new()),
            spell: None,
            converter: None,
            chain: ProviderChain::new(),
        };
        engine.rebuild_chain();
        engine
    }

    /// Create an engine and load its dictionary.
    pub fn load(config: Config) -> Result<Self> {
        let engine = Self::new(config);
        engine.reload()?;
        Ok(engine)
    }

    pub fn with_spell_backend(mut self, backend: Arc<dyn SpellBackend>) -> Self {
        self.spell = Some(backend);
        self.rebuild_chain();
        self
    }

    /// Use `converter` instead of running `config.converter.program`.
    pub fn with_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.converter = Some(converter);
        self.rebuild_chain();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registration point for callback handlers.
    pub fn callbacks(&self) -> &CallbackProvider {
        &self.callbacks
    }

    /// Snapshot of the phrase dictionary currently in use.
    pub fn dictionary(&self) -> Arc<PrefixDictionary> {
        self.dictionary.dictionary()
    }

    /// Provider names in the order they run.
    pub fn providers(&self) -> Vec<&'static str> {
        self.chain.names()
    }

    /// Reload the phrase dictionary from the configured data directories.
    ///
    /// The new dictionary replaces the old one only once it is fully built.
    pub fn reload(&self) -> Result<usize> {
        let sources = SourceSet::discover(&self.config);
        debug!(layers = ?sources.layers(), "reloading phrase sources");
        self.dictionary.reload(&sources)
    }

    /// Apply a changed configuration: rebuild the provider chain and reload.
    pub fn set_config(&mut self, config: Config) -> Result<usize> {
        self.config = config;
        self.rebuild_chain();
        self.reload()
    }

    /// Run the chain, forwarding candidates to `add`. Returns `false` if a
    /// provider stopped propagation.
    pub fn populate(
        &self,
        ic: &dyn InputContext,
        input: &str,
        add: &mut dyn FnMut(Candidate),
    ) -> bool {
        self.chain.populate(ic, input, add)
    }

    /// Run the chain and collect its candidates.
    pub fn query(&self, ic: &dyn InputContext, input: &str) -> CandidateList {
        let mut list = CandidateList::new();
        self.populate(ic, input, &mut |candidate| list.push(candidate));
        list
    }

    fn rebuild_chain(&mut self) {
        let mut chain = ProviderChain::new();
        chain.push(Arc::clone(&self.callbacks));
        chain.push(Arc::clone(&self.dictionary));
        if self.config.enable_calc {
            chain.push(CalculatorProvider::new());
        }
        if let Some(backend) = &self.spell {
            chain.push(SpellProvider::new(Some(Arc::clone(backend)), &self.config));
        } else if self.config.enable_spell {
            debug!("spell suggestions enabled but no spell backend supplied");
        }
        if self.config.converter.enabled {
            let converter: Arc<dyn Converter> = match &self.converter {
                Some(converter) => Arc::clone(converter),
                None => Arc::new(CommandConverter::from_config(&self.config.converter)),
            };
            chain.push(ConverterProvider::new(converter, &self.config.converter));
        } else if self.converter.is_some() {
            warn!("converter supplied but converter.enabled is false");
        }
        self.chain = chain;
    }
}

impl std::fmt::Debug for QuickPhrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickPhrase")
            .field("config", &self.config)
            .field("providers", &self.chain.names())
            .field("entries", &self.dictionary.dictionary().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateAction;
    use crate::context::QueryContext;
    use crate::record::Entry;

    #[test]
    fn default_chain_order() {
        let engine = QuickPhrase::new(Config::default());
        assert_eq!(engine.providers(), vec!["callback", "dictionary", "calculator"]);
    }

    #[test]
    fn calc_can_be_disabled() {
        let mut cfg = Config::default();
        cfg.enable_calc = false;
        let engine = QuickPhrase::new(cfg);
        assert_eq!(engine.providers(), vec!["callback", "dictionary"]);
        assert!(engine.query(&QueryContext::new(), "1+1").is_empty());
    }

    #[test]
    fn dictionary_and_calculator_both_answer() {
        let engine = QuickPhrase::new(Config::default());
        engine
            .dictionary
            .replace(PrefixDictionary::from_entries([Entry::new("12", "dozen")]).unwrap());

        let list = engine.query(&QueryContext::new(), "12");
        let labels: Vec<&str> = list.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["dozen", "12"]);
        assert_eq!(
            list.auto_commit().map(|c| c.action),
            Some(CandidateAction::NoneSelectionCommit)
        );
    }

    #[test]
    fn callback_veto_hides_builtin_providers() {
        let engine = QuickPhrase::new(Config::default());
        engine.callbacks().add_callback(|_ic, input, add| {
            if input == "secret" {
                add(Candidate::new("***", "***", CandidateAction::Commit));
                return false;
            }
            true
        });
        engine
            .dictionary
            .replace(PrefixDictionary::from_entries([Entry::new("secret", "visible")]).unwrap());

        let ctx = QueryContext::new();
        let mut labels = Vec::new();
        let keep_going = engine.populate(&ctx, "secret", &mut |c| labels.push(c.label));
        assert!(!keep_going);
        assert_eq!(labels, vec!["***"]);
        assert_eq!(engine.query(&ctx, "secr").len(), 1);
    }
}
