//! The `describe` subcommand.

use clap::Args;
use runctl_common::prelude::*;

use super::Session;
use crate::{
    description::describe_record,
    lister::ResourceLister,
    printer::{print_object, OutputFormat},
    prompt::Prompt,
    selection::{Resolution, Selection, SelectionResolver, DEFAULT_LIMIT},
};

/// `describe` options.
#[derive(Debug, Args)]
pub struct Opt {
    /// The resource to describe. If omitted, choose from the most recent.
    pub name: Option<String>,

    /// The namespace to look in. Defaults to the current context's namespace.
    #[arg(short = 'n', long)]
    pub namespace: Option<String>,

    /// Describe the most recent resource.
    #[arg(short = 'L', long)]
    pub last: bool,

    /// How many recent resources to choose from.
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Choose using fuzzy search. Also enabled by setting `RUNCTL_USE_FZF`.
    #[arg(short = 'F', long)]
    pub fzf: bool,

    /// Output format: json, yaml, name or template=<handlebars>.
    #[arg(short = 'o', long)]
    pub output: Option<OutputFormat>,
}

/// The `describe` subcommand.
pub fn run(
    session: &Session<'_>,
    kind: ResourceKind,
    opt: &Opt,
    prompt: &mut dyn Prompt,
    out: &mut dyn Write,
) -> Result<()> {
    let namespace = session.namespace(opt.namespace.as_deref())?;
    let selection = Selection::choose(
        opt.name.clone(),
        opt.last,
        opt.limit,
        session.fuzzy || opt.fzf,
    );
    let lister = ResourceLister::new(session.backend, kind);
    let name = match SelectionResolver::new(lister, namespace.clone())
        .resolve(selection, prompt)?
    {
        Resolution::Resolved(name) => name,
        Resolution::Nothing(message) => {
            writeln!(out, "{}", message)?;
            return Ok(());
        }
    };

    // Look up the information to display.
    let object = session.backend.get(kind, &namespace, &name)?;
    match &opt.output {
        Some(format) => print_object(out, format, kind, &object)?,
        None => {
            let record = ResourceRecord::from_object(object)?;
            write!(out, "{}", describe_record(kind, &record, session.now)?)?;
        }
    }
    Ok(())
}
