//! Subcommands shared by every resource kind.

use clap::Subcommand;
use runctl_common::prelude::*;

use crate::prompt::Prompt;

pub mod describe;
pub mod list;

/// Everything a subcommand needs from the outside world.
pub struct Session<'a> {
    /// Where resources come from.
    pub backend: &'a dyn Backend,
    /// The time we treat as "now" when computing ages.
    pub now: DateTime<Utc>,
    /// Pick resources with fuzzy search instead of a numbered list.
    pub fuzzy: bool,
}

impl Session<'_> {
    /// The namespace named by `-n`, or the current context's namespace.
    pub fn namespace(&self, explicit: Option<&str>) -> Result<String> {
        match explicit {
            Some(namespace) => Ok(namespace.to_owned()),
            None => self.backend.current_namespace(),
        }
    }
}

/// Subcommands for a resource kind.
#[derive(Debug, Subcommand)]
pub enum Opt {
    /// List resources, newest first.
    #[command(name = "list", visible_alias = "ls")]
    List(list::Opt),

    /// Describe a single resource.
    #[command(name = "describe", visible_alias = "desc")]
    Describe(describe::Opt),
}

/// Run a subcommand for `kind`.
pub fn run(
    session: &Session<'_>,
    kind: ResourceKind,
    opt: &Opt,
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
) -> Result<()> {
    match opt {
        Opt::List(opt) => list::run(session, kind, opt, out),
        Opt::Describe(opt) => describe::run(session, kind, opt, prompt, out),
    }
}
