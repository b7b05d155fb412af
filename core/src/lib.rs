//! quickphrase-core
//!
//! Candidate generation for quick phrase input: the user types a short key
//! and gets back phrases, a computed arithmetic result, spelling suggestions
//! or converted text.
//!
//! Public API:
//! - `QuickPhrase` - engine owning the configuration and provider chain
//! - `PrefixDictionary` - fst-indexed key → phrases multi-map with prefix scan
//! - `SourceSet` - base file plus fragment layers merged into one dictionary
//! - `Provider` / `ProviderChain` - composable candidate sources
//! - `CallbackProvider` - host-registered handlers that may veto the chain
//! - `calc::evaluate` - four-operator arithmetic
//! - `Config` - TOML configuration
//!
//! ```rust
//! use quickphrase_core::{Config, QueryContext, QuickPhrase};
//!
//! let engine = QuickPhrase::new(Config::default());
//! let list = engine.query(&QueryContext::new(), "6*7");
//! assert_eq!(list.auto_commit().map(|c| c.commit_text.as_str()), Some("42"));
//! ```

pub mod calc;
pub use calc::{evaluate, format_number};

pub mod candidate;
pub use candidate::{Candidate, CandidateAction, CandidateList};

pub mod config;
pub use config::{Config, ConverterConfig};

pub mod context;
pub use context::{InputContext, QueryContext};

pub mod dictionary;
pub use dictionary::{DictionaryBuilder, PrefixDictionary, PrefixIter};

pub mod engine;
pub use engine::QuickPhrase;

pub mod error;
pub use error::{Error, Result};

pub mod loader;
pub use loader::{Layer, SourceSet};

pub mod provider;
pub use provider::{
    CalculatorProvider, CallbackId, CallbackProvider, CommandConverter, Converter,
    ConverterProvider, DictionaryProvider, Provider, ProviderChain, QuickPhraseCallback,
    SpellBackend, SpellProvider, WordListSpell,
};

pub mod record;
pub use record::{format_record, parse_line, parse_record, Entry};
