//! The control plane that owns our resources.
//!
//! Everything the CLI knows about the cluster comes through [`Backend`], which
//! is deliberately small: check that a namespace exists, list objects of a
//! kind, and get one object by name. Each call is a single blocking request.

use url::form_urlencoded;

use crate::kubernetes::{Kubectl, ObjectList, DEFAULT_NAMESPACE};
use crate::prelude::*;

/// Where to look for resources.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope<'a> {
    /// Only look in this namespace.
    Namespace(&'a str),
    /// Look everywhere.
    AllNamespaces,
}

/// Parameters for [`Backend::list`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ListParams<'a> {
    /// Where to look.
    pub scope: Scope<'a>,
    /// Ask the backend for at most this many objects. Backends may return more.
    pub limit: Option<usize>,
    /// A Kubernetes label selector, such as `app=build,tier!=test`.
    pub label_selector: Option<&'a str>,
}

/// A source of resources.
pub trait Backend {
    /// The namespace to use when the operator doesn't pick one.
    fn current_namespace(&self) -> Result<String>;

    /// Does `namespace` exist?
    fn namespace_exists(&self, namespace: &str) -> Result<bool>;

    /// List objects of `kind`, in whatever order the backend prefers.
    fn list(&self, kind: ResourceKind, params: &ListParams<'_>) -> Result<Vec<Value>>;

    /// Fetch a single object.
    fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Value>;
}

/// A backend which asks the Kubernetes API server, using `kubectl` to handle
/// authentication and cluster selection.
#[derive(Clone, Debug, Default)]
pub struct KubectlBackend {
    kubectl: Kubectl,
}

impl KubectlBackend {
    /// Create a backend which runs `kubectl` as configured.
    pub fn new(kubectl: Kubectl) -> KubectlBackend {
        KubectlBackend { kubectl }
    }
}

impl Backend for KubectlBackend {
    fn current_namespace(&self) -> Result<String> {
        self.kubectl.current_namespace()
    }

    fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        // `--ignore-not-found` lets us tell "missing" apart from "couldn't
        // reach the cluster", which `kubectl` would report the same way.
        let stdout = self.kubectl.output(&[
            "get",
            "namespace",
            namespace,
            "--ignore-not-found",
            "--output",
            "name",
        ])?;
        Ok(!String::from_utf8_lossy(&stdout).trim().is_empty())
    }

    #[instrument(level = "debug", skip(self))]
    fn list(&self, kind: ResourceKind, params: &ListParams<'_>) -> Result<Vec<Value>> {
        let path = list_path(kind, params);
        let list: ObjectList = self
            .kubectl
            .parse_json(&["get", "--raw", &path])
            .with_context(|| format!("could not list {}", kind.plural()))?;
        debug!("backend returned {} {}", list.items.len(), kind.plural());
        Ok(list.items)
    }

    #[instrument(level = "debug", skip(self))]
    fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Value> {
        let path = format!(
            "/apis/{}/namespaces/{}/{}/{}",
            kind.api_version(),
            namespace,
            kind.resource(),
            name,
        );
        self.kubectl
            .parse_json(&["get", "--raw", &path])
            .with_context(|| format!("could not get {} {}", kind, name))
    }
}

/// Build the API server path for a list request.
fn list_path(kind: ResourceKind, params: &ListParams<'_>) -> String {
    let mut path = format!("/apis/{}", kind.api_version());
    if let Scope::Namespace(namespace) = params.scope {
        path.push_str("/namespaces/");
        path.push_str(namespace);
    }
    path.push('/');
    path.push_str(kind.resource());

    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(limit) = params.limit {
        query.append_pair("limit", &limit.to_string());
    }
    if let Some(label_selector) = params.label_selector {
        query.append_pair("labelSelector", label_selector);
    }
    let query = query.finish();
    if !query.is_empty() {
        path.push('?');
        path.push_str(&query);
    }
    path
}

/// A backend which serves a fixed set of objects from memory.
///
/// Objects are returned in the order they were added, which lets tests check
/// that we do our own sorting.
#[derive(Clone, Debug, Default)]
pub struct InMemoryBackend {
    current_namespace: Option<String>,
    namespaces: Vec<Namespace>,
    objects: Vec<(ResourceKind, Value)>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> InMemoryBackend {
        InMemoryBackend::default()
    }

    /// Pretend the current context selects `namespace`.
    pub fn with_current_namespace(mut self, namespace: &str) -> InMemoryBackend {
        self.current_namespace = Some(namespace.to_owned());
        self
    }

    /// Add a namespace.
    pub fn with_namespace(mut self, name: &str) -> InMemoryBackend {
        self.namespaces.push(Namespace::new(name));
        self
    }

    /// Add an object of `kind`.
    pub fn with_object(mut self, kind: ResourceKind, object: Value) -> InMemoryBackend {
        self.objects.push((kind, object));
        self
    }

    /// All objects of `kind` in `scope`, in insertion order.
    fn objects_in<'a>(
        &'a self,
        kind: ResourceKind,
        scope: Scope<'a>,
    ) -> impl Iterator<Item = &'a Value> + 'a {
        self.objects
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, object)| object)
            .filter(move |object| match scope {
                Scope::Namespace(namespace) => {
                    object_str(object, "/metadata/namespace") == Some(namespace)
                }
                Scope::AllNamespaces => true,
            })
    }
}

impl Backend for InMemoryBackend {
    fn current_namespace(&self) -> Result<String> {
        Ok(self
            .current_namespace
            .clone()
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned()))
    }

    fn namespace_exists(&self, namespace: &str) -> Result<bool> {
        Ok(self.namespaces.iter().any(|ns| ns.name == namespace))
    }

    fn list(&self, kind: ResourceKind, params: &ListParams<'_>) -> Result<Vec<Value>> {
        let selector = params
            .label_selector
            .map(LabelSelector::parse)
            .transpose()?;
        Ok(self
            .objects_in(kind, params.scope)
            .filter(|object| selector.as_ref().map_or(true, |s| s.matches(object)))
            .take(params.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    fn get(&self, kind: ResourceKind, namespace: &str, name: &str) -> Result<Value> {
        self.objects_in(kind, Scope::Namespace(namespace))
            .find(|object| object_str(object, "/metadata/name") == Some(name))
            .cloned()
            .ok_or_else(|| {
                format_err!("{} {} not found in namespace {}", kind, name, namespace)
            })
    }
}

/// Look up a string field in a JSON object.
fn object_str<'a>(object: &'a Value, pointer: &str) -> Option<&'a str> {
    object.pointer(pointer).and_then(Value::as_str)
}

/// The equality-based subset of Kubernetes label selectors: `key`, `!key`,
/// `key=value`, `key==value` and `key!=value`, joined by commas.
#[derive(Debug)]
struct LabelSelector {
    requirements: Vec<Requirement>,
}

#[derive(Debug)]
enum Requirement {
    Exists(String),
    DoesNotExist(String),
    Equals(String, String),
    NotEquals(String, String),
}

impl LabelSelector {
    fn parse(selector: &str) -> Result<LabelSelector> {
        let mut requirements = vec![];
        for term in selector.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let requirement = if let Some((key, value)) = term.split_once("!=") {
                Requirement::NotEquals(key.trim().to_owned(), value.trim().to_owned())
            } else if let Some((key, value)) = term.split_once("==") {
                Requirement::Equals(key.trim().to_owned(), value.trim().to_owned())
            } else if let Some((key, value)) = term.split_once('=') {
                Requirement::Equals(key.trim().to_owned(), value.trim().to_owned())
            } else if let Some(key) = term.strip_prefix('!') {
                Requirement::DoesNotExist(key.trim().to_owned())
            } else if term.contains(|c: char| c.is_whitespace()) {
                return Err(format_err!("unsupported label selector {:?}", term));
            } else {
                Requirement::Exists(term.to_owned())
            };
            requirements.push(requirement);
        }
        Ok(LabelSelector { requirements })
    }

    fn matches(&self, object: &Value) -> bool {
        let label = |key: &str| {
            object
                .get("metadata")
                .and_then(|m| m.get("labels"))
                .and_then(|labels| labels.get(key))
                .and_then(Value::as_str)
        };
        self.requirements.iter().all(|requirement| match requirement {
            Requirement::Exists(key) => label(key).is_some(),
            Requirement::DoesNotExist(key) => label(key).is_none(),
            Requirement::Equals(key, value) => label(key) == Some(value.as_str()),
            Requirement::NotEquals(key, value) => label(key) != Some(value.as_str()),
        })
    }
}

#[test]
fn list_paths_cover_scope_limit_and_selector() {
    let params = ListParams {
        scope: Scope::Namespace("ci"),
        limit: Some(5),
        label_selector: Some("app=build,tier!=test"),
    };
    assert_eq!(
        list_path(ResourceKind::PipelineRun, &params),
        concat!(
            "/apis/tekton.dev/v1/namespaces/ci/pipelineruns",
            "?limit=5&labelSelector=app%3Dbuild%2Ctier%21%3Dtest",
        ),
    );
    let params = ListParams {
        scope: Scope::AllNamespaces,
        limit: None,
        label_selector: None,
    };
    assert_eq!(
        list_path(ResourceKind::EventListener, &params),
        "/apis/triggers.tekton.dev/v1beta1/eventlisteners",
    );
}

#[test]
fn in_memory_backend_filters_by_kind_namespace_and_labels() {
    let backend = InMemoryBackend::new()
        .with_namespace("foo")
        .with_object(
            ResourceKind::PipelineRun,
            ObjectFactory::new(ResourceKind::PipelineRun, "foo", "pr1")
                .label("app", "build")
                .build(),
        )
        .with_object(
            ResourceKind::PipelineRun,
            ObjectFactory::new(ResourceKind::PipelineRun, "bar", "pr2").build(),
        )
        .with_object(
            ResourceKind::EventListener,
            ObjectFactory::new(ResourceKind::EventListener, "foo", "el1").build(),
        );
    assert_eq!(backend.current_namespace().unwrap(), "default");
    assert!(backend.namespace_exists("foo").unwrap());
    assert!(!backend.namespace_exists("bar").unwrap());

    let names = |params: ListParams<'_>| {
        backend
            .list(ResourceKind::PipelineRun, &params)
            .unwrap()
            .iter()
            .map(|o| object_str(o, "/metadata/name").unwrap().to_owned())
            .collect::<Vec<_>>()
    };
    let everything = ListParams {
        scope: Scope::AllNamespaces,
        limit: None,
        label_selector: None,
    };
    assert_eq!(names(everything), &["pr1", "pr2"]);
    assert_eq!(names(ListParams { limit: Some(1), ..everything }), &["pr1"]);
    assert_eq!(
        names(ListParams { scope: Scope::Namespace("bar"), ..everything }),
        &["pr2"],
    );
    assert_eq!(
        names(ListParams { label_selector: Some("app=build"), ..everything }),
        &["pr1"],
    );
    assert_eq!(
        names(ListParams { label_selector: Some("!app"), ..everything }),
        &["pr2"],
    );

    assert!(backend.get(ResourceKind::PipelineRun, "bar", "pr2").is_ok());
    let err = backend
        .get(ResourceKind::PipelineRun, "foo", "pr2")
        .unwrap_err();
    assert_eq!(err.to_string(), "PipelineRun pr2 not found in namespace foo");
}
