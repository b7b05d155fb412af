//! Callback chain provider.
//!
//! Hosts and other modules register plain closures here instead of full
//! providers. The callbacks run in registration order and any of them can
//! veto the rest of the query by returning `false`, which also stops every
//! provider after this one.

use super::Provider;
use crate::candidate::Candidate;
use crate::context::InputContext;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// A registered query handler. Returning `false` stops propagation.
pub type QuickPhraseCallback =
    dyn Fn(&dyn InputContext, &str, &mut dyn FnMut(Candidate)) -> bool + Send + Sync;

/// Handle returned by [`CallbackProvider::add_callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

#[derive(Default)]
pub struct CallbackProvider {
    callbacks: RwLock<Vec<(CallbackId, Arc<QuickPhraseCallback>)>>,
    next_id: AtomicU64,
}

impl CallbackProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback after all existing ones.
    pub fn add_callback<F>(&self, callback: F) -> CallbackId
    where
        F: Fn(&dyn InputContext, &str, &mut dyn FnMut(Candidate)) -> bool + Send + Sync + 'static,
    {
        let id = CallbackId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let callback: Arc<QuickPhraseCallback> = Arc::new(callback);
        self.callbacks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        id
    }

    /// Unregister a callback. Returns `false` if the id was not registered.
    pub fn remove_callback(&self, id: CallbackId) -> bool {
        let mut callbacks = self.callbacks.write().unwrap_or_else(PoisonError::into_inner);
        let before = callbacks.len();
        callbacks.retain(|(cid, _)| *cid != id);
        callbacks.len() != before
    }

    pub fn len(&self) -> usize {
        self.callbacks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for CallbackProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackProvider")
            .field("callbacks", &self.len())
            .finish()
    }
}

impl Provider for CallbackProvider {
    fn populate(&self, ic: &dyn InputContext, input: &str, add: &mut dyn FnMut(Candidate)) -> bool {
        // Snapshot so a callback may register or remove callbacks itself.
        let callbacks: Vec<Arc<QuickPhraseCallback>> = self
            .callbacks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            if !callback(ic, input, add) {
                return false;
            }
        }
        true
    }

    fn name(&self) -> &'static str {
        "callback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateAction;
    use crate::context::QueryContext;
    use std::sync::Mutex;

    fn recorder(
        log: &Arc<Mutex<Vec<&'static str>>>,
        name: &'static str,
        result: bool,
    ) -> impl Fn(&dyn InputContext, &str, &mut dyn FnMut(Candidate)) -> bool + Send + Sync + 'static
    {
        let log = Arc::clone(log);
        move |_ic: &dyn InputContext, input: &str, add: &mut dyn FnMut(Candidate)| {
            log.lock().unwrap().push(name);
            add(Candidate::new(name, input, CandidateAction::Commit));
            result
        }
    }

    #[test]
    fn veto_stops_later_callbacks() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let provider = CallbackProvider::new();
        provider.add_callback(recorder(&log, "A", true));
        provider.add_callback(recorder(&log, "B", false));
        provider.add_callback(recorder(&log, "C", true));

        let mut emitted = Vec::new();
        let keep_going =
            provider.populate(&QueryContext::new(), "x", &mut |c| emitted.push(c.label));

        assert!(!keep_going);
        assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
        assert_eq!(emitted, vec!["A", "B"]);
    }

    #[test]
    fn all_true_continues() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let provider = CallbackProvider::new();
        provider.add_callback(recorder(&log, "A", true));
        provider.add_callback(recorder(&log, "B", true));
        assert!(provider.populate(&QueryContext::new(), "x", &mut |_| {}));
        assert_eq!(*log.lock().unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn removed_callback_is_not_invoked() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let provider = CallbackProvider::new();
        let veto = provider.add_callback(recorder(&log, "veto", false));
        provider.add_callback(recorder(&log, "after", true));

        assert!(provider.remove_callback(veto));
        assert!(!provider.remove_callback(veto));
        assert!(provider.populate(&QueryContext::new(), "x", &mut |_| {}));
        assert_eq!(*log.lock().unwrap(), vec!["after"]);
        assert_eq!(provider.len(), 1);
    }
}
