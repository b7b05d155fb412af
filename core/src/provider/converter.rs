//! Document-converter provider.
//!
//! Queries starting with a trigger prefix (`pd:` by default) are sent to an
//! external converter, by default `pandoc -f latex - -t plain`, and the
//! plain-text result is offered for immediate commit.
//!
//! This is a stop-gap integration. The converter runs synchronously on the
//! calling thread and may be slow; there is no timeout here, so hosts that
//! enable it should run queries off their UI thread.

use super::Provider;
use crate::candidate::{Candidate, CandidateAction};
use crate::config::ConverterConfig;
use crate::context::InputContext;
use crate::error::{Error, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::warn;

/// External text conversion service.
pub trait Converter: Send + Sync {
    fn convert(&self, text: &str) -> Result<String>;
}

/// Runs a program, feeding the text on stdin and reading stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl CommandConverter {
    pub fn new<P: Into<String>>(program: P, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    fn failure(&self, reason: impl std::fmt::Display) -> Error {
        Error::Converter {
            program: self.program.clone(),
            reason: reason.to_string(),
        }
    }
}

impl Converter for CommandConverter {
    fn convert(&self, text: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failure(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                // reap the child so a failed write does not leave a zombie
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.failure(format!("cannot write input: {e}")));
            }
        }
        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(self.failure(format!("{}: {}", output.status, stderr.trim())));
        }
        String::from_utf8(output.stdout).map_err(|_| self.failure("output is not valid UTF-8"))
    }
}

/// Offers the converted form of prefixed queries.
pub struct ConverterProvider {
    converter: Arc<dyn Converter>,
    trigger_prefix: String,
    wrap_math: bool,
}

impl ConverterProvider {
    pub fn new(converter: Arc<dyn Converter>, config: &ConverterConfig) -> Self {
        Self {
            converter,
            trigger_prefix: config.trigger_prefix.clone(),
            wrap_math: config.wrap_math,
        }
    }
}

impl std::fmt::Debug for ConverterProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterProvider")
            .field("trigger_prefix", &self.trigger_prefix)
            .field("wrap_math", &self.wrap_math)
            .finish()
    }
}

impl Provider for ConverterProvider {
    fn populate(
        &self,
        _ic: &dyn InputContext,
        input: &str,
        add: &mut dyn FnMut(Candidate),
    ) -> bool {
        let Some(body) = input.strip_prefix(self.trigger_prefix.as_str()) else {
            return true;
        };
        let payload = if self.wrap_math {
            format!("${body}$\n")
        } else {
            format!("{body}\n")
        };
        match self.converter.convert(&payload) {
            Ok(output) => {
                let joined: String = output.lines().collect();
                let result = joined.trim();
                if !result.is_empty() {
                    add(Candidate::new(result, result, CandidateAction::NoneSelectionCommit));
                }
            }
            Err(e) => warn!(error = %e, "conversion failed"),
        }
        true
    }

    fn name(&self) -> &'static str {
        "converter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::QueryContext;
    use std::sync::Mutex;

    /// Records what it was asked and answers from a fixed script.
    struct Scripted {
        seen: Mutex<Vec<String>>,
        reply: Option<&'static str>,
    }

    impl Converter for Scripted {
        fn convert(&self, text: &str) -> Result<String> {
            self.seen.lock().unwrap().push(text.to_string());
            self.reply
                .map(str::to_string)
                .ok_or_else(|| Error::Converter {
                    program: "scripted".into(),
                    reason: "no reply".into(),
                })
        }
    }

    fn provider(
        reply: Option<&'static str>,
        wrap_math: bool) -> (ConverterProvider, Arc<Scripted>,
    ) {
        let scripted = Arc::new(Scripted {
            seen: Mutex::new(Vec::new()),
            reply,
        });
        let config = ConverterConfig {
            enabled: true,
            wrap_math,
            ..ConverterConfig::default()
        };
        let converter: Arc<dyn Converter> = scripted.clone();
        (ConverterProvider::new(converter, &config), scripted)
    }

    fn query(p: &ConverterProvider, input: &str) -> Vec<Candidate> {
        let mut out = Vec::new();
        assert!(p.populate(&QueryContext::new(), input, &mut |c| out.push(c)));
        out
    }

    #[test]
    fn prefixed_query_is_wrapped_and_joined() {
        let (p, scripted) = provider(Some("α\n + β\n"), true);
        let cands = query(&p, "pd:\\alpha + \\beta");
        assert_eq!(*scripted.seen.lock().unwrap(), vec!["$\\alpha + \\beta$\n"]);
        assert_eq!(
            cands,
            vec![Candidate::new("α + β", "α + β", CandidateAction::NoneSelectionCommit)]
        );
    }

    #[test]
    fn unprefixed_query_is_ignored() {
        let (p, scripted) = provider(Some("x"), true);
        assert!(query(&p, "alpha").is_empty());
        assert!(scripted.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn plain_payload_without_math_wrapping() {
        let (p, scripted) = provider(Some("text"), false);
        query(&p, "pd:\\emph{text}");
        assert_eq!(*scripted.seen.lock().unwrap(), vec!["\\emph{text}\n"]);
    }

    #[test]
    fn failures_and_empty_output_emit_nothing() {
        let (failing, _) = provider(None, true);
        assert!(query(&failing, "pd:x").is_empty());
        let (blank, _) = provider(Some("\n  \n"), true);
        assert!(query(&blank, "pd:x").is_empty());
    }

    #[test]
    fn missing_program_is_a_converter_error() {
        let converter = CommandConverter::new("/nonexistent/quickphrase-converter", Vec::new());
        let err = converter.convert("x").unwrap_err();
        assert!(matches!(err, Error::Converter { .. }), "got {err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn program_that_ignores_stdin_is_a_converter_error() {
        // `true` exits without reading, so writing more than a pipe buffer fails
        let converter = CommandConverter::new("true", Vec::new());
        let input = "x".repeat(4 * 1024 * 1024);
        let err = converter.convert(&input).unwrap_err();
        match err {
            Error::Converter { program, reason } => {
                assert_eq!(program, "true");
                assert!(reason.starts_with("cannot write input"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
