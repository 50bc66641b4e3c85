//! Fetching resources from the backend, newest first.

use runctl_common::{backend::ListParams, prelude::*};
use std::cmp::Reverse;

/// What to list.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListQuery {
    /// The namespace to list. An empty namespace means all namespaces.
    pub namespace: String,
    /// List every namespace, ignoring `namespace`.
    pub all_namespaces: bool,
    /// Ask the backend for at most this many resources.
    pub limit: Option<usize>,
    /// Only list resources matching this label selector.
    pub label_selector: Option<String>,
}

impl ListQuery {
    /// List resources in `namespace`.
    pub fn in_namespace<S: Into<String>>(namespace: S) -> ListQuery {
        ListQuery {
            namespace: namespace.into(),
            ..ListQuery::default()
        }
    }

    /// List resources in every namespace.
    pub fn all_namespaces() -> ListQuery {
        ListQuery {
            all_namespaces: true,
            ..ListQuery::default()
        }
    }
}

/// Lists resources of a single kind.
#[derive(Clone, Copy)]
pub struct ResourceLister<'a> {
    backend: &'a dyn Backend,
    kind: ResourceKind,
}

impl<'a> ResourceLister<'a> {
    /// Create a lister for `kind`.
    pub fn new(backend: &'a dyn Backend, kind: ResourceKind) -> ResourceLister<'a> {
        ResourceLister { backend, kind }
    }

    /// The kind of resource we list.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// List the resources matching `query`, newest first. Resources without
    /// a creation time come last, in the order the backend returned them.
    ///
    /// Fails with [`CliError::NamespaceNotFound`] if `query` names a
    /// namespace which doesn't exist.
    pub fn list(&self, query: &ListQuery) -> Result<Vec<ResourceRecord>> {
        let scope = if query.all_namespaces || query.namespace.is_empty() {
            Scope::AllNamespaces
        } else {
            if !self.backend.namespace_exists(&query.namespace)? {
                return Err(CliError::NamespaceNotFound {
                    namespace: query.namespace.clone(),
                }
                .into());
            }
            Scope::Namespace(&query.namespace)
        };

        debug!("listing {} in {:?}", self.kind.plural(), scope);
        let objects = self.backend.list(
            self.kind,
            &ListParams {
                scope,
                limit: query.limit,
                label_selector: query.label_selector.as_deref(),
            },
        )?;
        let mut records = objects
            .into_iter()
            .map(ResourceRecord::from_object)
            .collect::<Result<Vec<_>>>()?;
        sort_newest_first(&mut records);
        Ok(records)
    }
}

/// Sort `records` by descending creation time. The sort is stable, and
/// `None` sorts below every timestamp, so records without one stay at the
/// end in their original order.
pub fn sort_newest_first(records: &mut [ResourceRecord]) {
    records.sort_by_key(|record| Reverse(record.creation_time));
}

#[cfg(test)]
mod tests {
    use runctl_common::{backend::InMemoryBackend, chrono::Duration};

    use super::*;

    fn listener(namespace: &str, name: &str, created: Option<DateTime<Utc>>) -> Value {
        let factory = ObjectFactory::new(ResourceKind::EventListener, namespace, name);
        match created {
            Some(created) => factory.created_at(created).build(),
            None => factory.build(),
        }
    }

    fn names(records: &[ResourceRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn backend(now: DateTime<Utc>) -> InMemoryBackend {
        let objects = vec![
            listener("bar", "tb0", Some(now - Duration::minutes(2))),
            listener("foo", "tb1", Some(now - Duration::minutes(2))),
            listener("foo", "tb2", Some(now - Duration::seconds(30))),
            listener("foo", "tb3", Some(now - Duration::hours(200))),
            listener("foo", "tb4", None),
            listener("foo", "tb5", Some(now - Duration::seconds(10))),
            listener("foo", "tb6", None),
        ];
        objects.into_iter().fold(
            InMemoryBackend::new()
                .with_namespace("foo")
                .with_namespace("bar")
                .with_namespace("empty"),
            |backend, object| backend.with_object(ResourceKind::EventListener, object),
        )
    }

    #[test]
    fn all_namespaces_sorts_newest_first_with_unknown_ages_last() {
        let now = Utc::now();
        let backend = backend(now);
        let lister = ResourceLister::new(&backend, ResourceKind::EventListener);
        let records = lister.list(&ListQuery::all_namespaces()).unwrap();
        assert_eq!(
            names(&records),
            &["tb5", "tb2", "tb0", "tb1", "tb3", "tb4", "tb6"],
        );

        let times = records
            .iter()
            .filter_map(|r| r.creation_time)
            .collect::<Vec<_>>();
        assert!(times.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn single_namespace_only_lists_that_namespace() {
        let backend = backend(Utc::now());
        let lister = ResourceLister::new(&backend, ResourceKind::EventListener);
        let records = lister.list(&ListQuery::in_namespace("bar")).unwrap();
        assert_eq!(names(&records), &["tb0"]);
        let records = lister.list(&ListQuery::in_namespace("empty")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_namespace_is_an_error() {
        let backend = backend(Utc::now());
        let lister = ResourceLister::new(&backend, ResourceKind::EventListener);
        let err = lister.list(&ListQuery::in_namespace("nope")).unwrap_err();
        assert_eq!(
            err.downcast_ref::<CliError>(),
            Some(&CliError::NamespaceNotFound {
                namespace: "nope".to_owned()
            }),
        );

        // All-namespaces mode never checks.
        let query = ListQuery {
            namespace: "nope".to_owned(),
            all_namespaces: true,
            ..ListQuery::default()
        };
        assert_eq!(lister.list(&query).unwrap().len(), 7);
    }

    #[test]
    fn limit_is_passed_to_the_backend() {
        let backend = backend(Utc::now());
        let lister = ResourceLister::new(&backend, ResourceKind::EventListener);
        // The in-memory backend truncates in insertion order, before we sort.
        let query = ListQuery {
            limit: Some(2),
            ..ListQuery::in_namespace("foo")
        };
        let records = lister.list(&query).unwrap();
        assert_eq!(names(&records), &["tb2", "tb1"]);
    }

    #[test]
    fn other_kinds_are_ignored() {
        let backend = backend(Utc::now());
        let lister = ResourceLister::new(&backend, ResourceKind::PipelineRun);
        assert!(lister.list(&ListQuery::all_namespaces()).unwrap().is_empty());
    }
}
