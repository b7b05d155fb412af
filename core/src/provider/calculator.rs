//! Calculator provider.

use super::Provider;
use crate::calc::{evaluate, format_number};
use crate::candidate::{Candidate, CandidateAction};
use crate::context::InputContext;

/// Offers the value of the query when it is an arithmetic expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorProvider;

impl CalculatorProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Provider for CalculatorProvider {
    fn populate(
        &self,
        _ic: &dyn InputContext,
        input: &str,
        add: &mut dyn FnMut(Candidate),
    ) -> bool {
        if let Some(value) = evaluate(input) {
            let text = format_number(value);
            add(Candidate::new(text.clone(), text, CandidateAction::NoneSelectionCommit));
        }
        true
    }

    fn name(&self) -> &'static str {
        "calculator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::QueryContext;

    fn query(input: &str) -> Vec<Candidate> {
        let mut out = Vec::new();
        assert!(CalculatorProvider.populate(&QueryContext::new(), input, &mut |c| out.push(c)));
        out
    }

    #[test]
    fn emits_single_auto_commit_result() {
        assert_eq!(
            query("(2+3)*4"),
            vec![Candidate::new("20", "20", CandidateAction::NoneSelectionCommit)]
        );
    }

    #[test]
    fn invalid_expressions_emit_nothing() {
        for input in ["", "(1+2", "1+", "abc"] {
            assert!(query(input).is_empty(), "input: {input:?}");
        }
    }

    #[test]
    fn deeply_nested_input_emits_nothing() {
        let deep = format!("{}1{}", "(".repeat(20_000), ")".repeat(20_000));
        assert!(query(&deep).is_empty());
        let shallow = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(query(&shallow).len(), 1);
    }
}
