//! Provider trait and implementations.
//!
//! A provider turns a query into zero or more candidates. Providers are run
//! in order by a [`ProviderChain`]; each one hands its candidates to a shared
//! callback and returns whether the providers after it should still run.

pub mod calculator;
pub mod callback;
pub mod chain;
pub mod converter;
pub mod dictionary;
pub mod spell;

pub use calculator::CalculatorProvider;
pub use callback::{CallbackId, CallbackProvider, QuickPhraseCallback};
pub use chain::ProviderChain;
pub use converter::{CommandConverter, Converter, ConverterProvider};
pub use dictionary::DictionaryProvider;
pub use spell::{SpellBackend, SpellProvider, WordListSpell};

use crate::candidate::Candidate;
use crate::context::InputContext;
use std::sync::Arc;

/// Candidate generation for one kind of query.
///
/// # Example
///
/// ```
/// use quickphrase_core::{Candidate, CandidateAction, InputContext, Provider, QueryContext};
///
/// struct Shout;
///
/// impl Provider for Shout {
///     fn populate(
///         &self,
///         _ic: &dyn InputContext,
///         input: &str,
///         add: &mut dyn FnMut(Candidate),
///     ) -> bool {
///         let loud = input.to_uppercase();
///         add(Candidate::new(loud.clone(), loud, CandidateAction::Commit));
///         true
///     }
///
///     fn name(&self) -> &'static str {
///         "shout"
///     }
/// }
///
/// let mut seen = Vec::new();
/// Shout.populate(&QueryContext::new(), "hi", &mut |c| seen.push(c.label));
/// assert_eq!(seen, vec!["HI"]);
/// ```
pub trait Provider: Send + Sync {
    /// Emit candidates for `input` through `add`.
    ///
    /// Returns `false` to stop the providers after this one from running for
    /// this query. Failures inside a provider are never propagated; a provider
    /// that cannot answer simply emits nothing.
    fn populate(&self, ic: &dyn InputContext, input: &str, add: &mut dyn FnMut(Candidate)) -> bool;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

impl<P: Provider + ?Sized> Provider for Arc<P> {
    fn populate(&self, ic: &dyn InputContext, input: &str, add: &mut dyn FnMut(Candidate)) -> bool {
        (**self).populate(ic, input, add)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn populate(&self, ic: &dyn InputContext, input: &str, add: &mut dyn FnMut(Candidate)) -> bool {
        (**self).populate(ic, input, add)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
