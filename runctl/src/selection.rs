//! Deciding which resource `describe` should show.
//!
//! An operator can name a resource, ask for the most recent one, or pick one
//! from a short list of the most recent. We model this as a [`Selection`],
//! chosen from the command-line flags, which [`SelectionResolver`] turns into
//! a single name.

use runctl_common::prelude::*;

use crate::{
    lister::{ListQuery, ResourceLister},
    prompt::{PickMode, Prompt},
};

/// How many recent resources we offer when the operator doesn't say.
pub const DEFAULT_LIMIT: usize = 5;

/// How to pick a resource.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Selection {
    /// The operator named the resource.
    Explicit(String),
    /// Use the most recent resource.
    LastOnly,
    /// Offer the `limit` most recent resources as a numbered list.
    Interactive { limit: usize },
    /// Offer the `limit` most recent resources for fuzzy search.
    Fuzzy { limit: usize },
}

impl Selection {
    /// Choose a selection strategy. A name always wins, followed by `last`.
    pub fn choose(name: Option<String>, last: bool, limit: usize, fuzzy: bool) -> Selection {
        match name {
            Some(name) => Selection::Explicit(name),
            None if last => Selection::LastOnly,
            None if fuzzy => Selection::Fuzzy { limit },
            None => Selection::Interactive { limit },
        }
    }
}

/// The outcome of a successful resolution.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// Describe this resource.
    Resolved(String),
    /// There's nothing to describe, and that's fine. Print this message.
    Nothing(String),
}

/// Resolves a [`Selection`] to a resource name in one namespace.
pub struct SelectionResolver<'a> {
    lister: ResourceLister<'a>,
    namespace: String,
}

impl<'a> SelectionResolver<'a> {
    /// Create a resolver which looks in `namespace`.
    pub fn new(lister: ResourceLister<'a>, namespace: String) -> SelectionResolver<'a> {
        SelectionResolver { lister, namespace }
    }

    /// Resolve `selection`, asking `prompt` if we need to.
    pub fn resolve(
        &self,
        selection: Selection,
        prompt: &mut dyn Prompt,
    ) -> Result<Resolution> {
        debug!("resolving {:?}", selection);
        let kind = self.lister.kind();
        let (limit, mode) = match selection {
            Selection::Explicit(name) => return Ok(Resolution::Resolved(name)),
            Selection::LastOnly => {
                let mut records = self.list(1)?;
                return Ok(match records.pop() {
                    Some(record) => Resolution::Resolved(record.name),
                    None => Resolution::Nothing(format!(
                        "No {} present in namespace {}",
                        kind.plural(),
                        self.namespace,
                    )),
                });
            }
            Selection::Interactive { limit } => (limit, PickMode::Interactive),
            Selection::Fuzzy { limit } => (limit, PickMode::Fuzzy),
        };

        if limit == 0 {
            return Err(CliError::InvalidLimit { limit }.into());
        }
        let mut names = self
            .list(limit)?
            .into_iter()
            .map(|record| record.name)
            .collect::<Vec<_>>();
        match names.len() {
            0 => Err(CliError::NoResourcesFound { kind }.into()),
            1 => Ok(Resolution::Resolved(names.remove(0))),
            _ => match prompt.select(kind, mode, &names)? {
                Some(name) => Ok(Resolution::Resolved(name)),
                None => Err(CliError::SelectionAborted { kind }.into()),
            },
        }
    }

    /// The `limit` most recent records. Backends apply their own limits in
    /// key order, so we fetch everything and truncate after sorting.
    fn list(&self, limit: usize) -> Result<Vec<ResourceRecord>> {
        let mut records = self
            .lister
            .list(&ListQuery::in_namespace(self.namespace.as_str()))?;
        records.truncate(limit);
        Ok(records)
    }
}
