//! Error-handling code.

use std::fmt;

use anyhow::Error;
use thiserror::Error as ThisError;

use crate::models::ResourceKind;

/// User-facing failures with a fixed meaning.
///
/// Anything else (a failed `kubectl` call, an unparseable object) travels as
/// an opaque [`anyhow::Error`] and is reported unchanged. Callers which need
/// to tell these apart can use `err.downcast_ref::<CliError>()`.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum CliError {
    /// The namespace passed with `-n` does not exist.
    #[error("namespace {namespace} not found")]
    NamespaceNotFound {
        /// The namespace we looked for.
        namespace: String,
    },

    /// We needed at least one resource to choose from, and found none.
    #[error("no {} found", .kind.plural())]
    NoResourcesFound {
        /// The kind of resource we listed.
        kind: ResourceKind,
    },

    /// The operator was offered a choice, but didn't make one.
    #[error("no {} selected", .kind.singular())]
    SelectionAborted {
        /// The kind of resource we were choosing.
        kind: ResourceKind,
    },

    /// `--limit` must allow at least one candidate.
    #[error("limit was {limit} but must be a positive number")]
    InvalidLimit {
        /// The limit we were given.
        limit: usize,
    },
}

/// Support for displaying an error with a complete list of causes, and an
/// optional backtrace.
pub trait DisplayCausesAndBacktraceExt {
    /// Display the error and its causes, plus a backtrace (if available).
    fn display_causes_and_backtrace(&self) -> DisplayCauses<'_>;

    /// Display the error and its causes.
    fn display_causes_without_backtrace(&self) -> DisplayCauses<'_>;
}

impl DisplayCausesAndBacktraceExt for Error {
    fn display_causes_and_backtrace(&self) -> DisplayCauses<'_> {
        DisplayCauses {
            err: self,
            show_backtrace: true,
        }
    }

    fn display_causes_without_backtrace(&self) -> DisplayCauses<'_> {
        DisplayCauses {
            err: self,
            show_backtrace: false,
        }
    }
}

/// Helper type used to display errors.
pub struct DisplayCauses<'a> {
    /// The error to display.
    err: &'a Error,

    /// Should we show the backtrace?
    show_backtrace: bool,
}

impl fmt::Display for DisplayCauses<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.err)?;
        for cause in self.err.chain().skip(1) {
            writeln!(f, "  caused by: {}", cause)?;
        }

        if self.show_backtrace {
            write!(f, "{}", self.err.backtrace())?;
        }
        Ok(())
    }
}

/// Generate a `main` function which calls the specified function. If the
/// function returns `Result::Err(_)`, then `main` will print the error and exit
/// with a non-zero status code.
///
/// Backtraces are only printed when `RUST_BACKTRACE` is set, because most of
/// our errors are meant for operators, not developers.
#[macro_export]
macro_rules! quick_main {
    ($wrapped:ident) => {
        fn main() {
            if let Err(err) = $wrapped() {
                use ::std::io::Write;
                use $crate::errors::DisplayCausesAndBacktraceExt;
                let display = if ::std::env::var_os("RUST_BACKTRACE").is_some() {
                    err.display_causes_and_backtrace()
                } else {
                    err.display_causes_without_backtrace()
                };
                let stderr = ::std::io::stderr();
                write!(&mut stderr.lock(), "{}", display)
                    .expect("Error occurred while trying to display error");
                ::std::process::exit(1);
            }
        }
    };
}

#[test]
fn display_causes_lists_every_cause() {
    use anyhow::Context;

    let err = Err::<(), _>(Error::from(CliError::NamespaceNotFound {
        namespace: "nope".to_owned(),
    }))
    .context("could not list PipelineRuns")
    .unwrap_err();
    let shown = format!("{}", err.display_causes_without_backtrace());
    assert_eq!(
        shown,
        "ERROR: could not list PipelineRuns\n  caused by: namespace nope not found\n",
    );
    assert!(err.downcast_ref::<CliError>().is_some());
}

#[test]
fn typed_errors_have_operator_friendly_messages() {
    let err = CliError::NoResourcesFound {
        kind: ResourceKind::PipelineRun,
    };
    assert_eq!(err.to_string(), "no PipelineRuns found");
    let err = CliError::SelectionAborted {
        kind: ResourceKind::EventListener,
    };
    assert_eq!(err.to_string(), "no EventListener selected");
    let err = CliError::InvalidLimit { limit: 0 };
    assert_eq!(err.to_string(), "limit was 0 but must be a positive number");
}
