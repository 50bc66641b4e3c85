//! Resource models.

use crate::prelude::*;

mod condition;
mod factory;
mod record;

pub use self::condition::*;
pub use self::factory::*;
pub use self::record::*;

/// The kinds of resource we know how to list and describe.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum ResourceKind {
    /// A single execution of a pipeline.
    PipelineRun,
    /// A long-lived watcher which creates runs in response to events.
    EventListener,
}

impl ResourceKind {
    /// The kind's name, as it appears in an object's `kind` field.
    pub fn singular(self) -> &'static str {
        match self {
            ResourceKind::PipelineRun => "PipelineRun",
            ResourceKind::EventListener => "EventListener",
        }
    }

    /// The plural used in messages like "No PipelineRuns found".
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::PipelineRun => "PipelineRuns",
            ResourceKind::EventListener => "EventListeners",
        }
    }

    /// The API group which serves this kind.
    pub fn group(self) -> &'static str {
        match self {
            ResourceKind::PipelineRun => "tekton.dev",
            ResourceKind::EventListener => "triggers.tekton.dev",
        }
    }

    /// The API version we request.
    pub fn version(self) -> &'static str {
        match self {
            ResourceKind::PipelineRun => "v1",
            ResourceKind::EventListener => "v1beta1",
        }
    }

    /// The lowercase plural used in API paths.
    pub fn resource(self) -> &'static str {
        match self {
            ResourceKind::PipelineRun => "pipelineruns",
            ResourceKind::EventListener => "eventlisteners",
        }
    }

    /// The `apiVersion` field of objects of this kind.
    pub fn api_version(self) -> String {
        format!("{}/{}", self.group(), self.version())
    }

    /// A `kind.group` name, as printed by `-o name`.
    pub fn qualified_name(self) -> String {
        format!("{}.{}", self.singular().to_ascii_lowercase(), self.group())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.singular().fmt(f)
    }
}

/// A namespace known to the backend. We only ever check that these exist.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Namespace {
    /// The namespace's name.
    pub name: String,
}

impl Namespace {
    /// Create a namespace with the specified name.
    pub fn new<S: Into<String>>(name: S) -> Namespace {
        Namespace { name: name.into() }
    }
}

#[test]
fn kinds_know_their_api_coordinates() {
    let kind = ResourceKind::EventListener;
    assert_eq!(kind.api_version(), "triggers.tekton.dev/v1beta1");
    assert_eq!(kind.qualified_name(), "eventlistener.triggers.tekton.dev");
    assert_eq!(ResourceKind::PipelineRun.to_string(), "PipelineRun");
}
