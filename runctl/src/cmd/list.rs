//! The `list` subcommand.

use clap::Args;
use runctl_common::prelude::*;

use super::Session;
use crate::{
    lister::{ListQuery, ResourceLister},
    printer::{print_list, OutputFormat},
    table::{self, TableOptions},
};

/// `list` options.
#[derive(Debug, Args)]
pub struct Opt {
    /// The namespace to list. Defaults to the current context's namespace.
    #[arg(short = 'n', long, conflicts_with = "all_namespaces")]
    pub namespace: Option<String>,

    /// List resources in every namespace.
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Don't print the header row.
    #[arg(long)]
    pub no_headers: bool,

    /// Ask for at most this many resources.
    #[arg(long)]
    pub limit: Option<usize>,

    /// Only list resources matching this label selector.
    #[arg(short = 'l', long)]
    pub label: Option<String>,

    /// Output format: json, yaml, name or template=<handlebars>.
    #[arg(short = 'o', long)]
    pub output: Option<OutputFormat>,
}

/// The `list` subcommand.
pub fn run(
    session: &Session<'_>,
    kind: ResourceKind,
    opt: &Opt,
    out: &mut dyn Write,
) -> Result<()> {
    let mut query = if opt.all_namespaces {
        ListQuery::all_namespaces()
    } else {
        ListQuery::in_namespace(session.namespace(opt.namespace.as_deref())?)
    };
    query.limit = opt.limit;
    query.label_selector = opt.label.clone();

    let records = ResourceLister::new(session.backend, kind).list(&query)?;
    match &opt.output {
        Some(format) => print_list(out, format, kind, &records)?,
        None => {
            let options = TableOptions {
                no_headers: opt.no_headers,
                all_namespaces: opt.all_namespaces,
            };
            write!(out, "{}", table::render(kind, &records, options, session.now))?;
        }
    }
    Ok(())
}
