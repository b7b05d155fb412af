//! Ordered, short-circuiting sequence of providers.

use super::Provider;
use crate::candidate::Candidate;
use crate::context::InputContext;
use tracing::debug;

/// Runs providers in registration order until one returns `false`.
#[derive(Default)]
pub struct ProviderChain {
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider; it runs after every provider already registered.
    pub fn push<P: Provider + 'static>(&mut self, provider: P) {
        self.providers.push(Box::new(provider));
    }

    pub fn with<P: Provider + 'static>(mut self, provider: P) -> Self {
        self.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in invocation order.
    pub fn names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.names())
            .finish()
    }
}

impl Provider for ProviderChain {
    fn populate(&self, ic: &dyn InputContext, input: &str, add: &mut dyn FnMut(Candidate)) -> bool {
        for provider in &self.providers {
            if !provider.populate(ic, input, add) {
                debug!(provider = provider.name(), "provider stopped the chain");
                return false;
            }
        }
        true
    }

    fn name(&self) -> &'static str {
        "chain"
    }
}
