//! Code shared between the `runctl` binary and its tests.

#![warn(missing_docs)]

pub use chrono;
pub use serde_json;
pub use url;

pub mod backend;
pub mod errors;
pub mod kubernetes;
pub mod models;
pub mod tracing_support;

/// Common imports used by many modules.
pub mod prelude {
    pub use anyhow::{format_err, Context as _};
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
    pub use std::{fmt, io::Write};
    pub use tracing::{debug, error, instrument, trace, warn};
    pub use url::Url;

    pub use super::backend::{Backend, Scope};
    pub use super::errors::CliError;
    pub use super::models::*;
    pub use super::{Error, Result};
}

/// Error type for this crate's functions.
pub type Error = anyhow::Error;

/// Result type for this crate's functions.
pub type Result<T, E = Error> = std::result::Result<T, E>;
