use chrono::Datelike;

use crate::prelude::*;

/// One resource returned by the backend, reduced to the fields we display.
///
/// Records are snapshots: we parse them fresh on every call and never write
/// them back.
#[derive(Clone, Debug, Serialize)]
pub struct ResourceRecord {
    /// The resource's name, unique within its namespace.
    pub name: String,
    /// The namespace containing the resource.
    pub namespace: String,
    /// When the resource was created, if the backend knows.
    pub creation_time: Option<DateTime<Utc>>,
    /// The resource's status conditions, in the order the controller wrote
    /// them. The first one is authoritative.
    pub conditions: Vec<Condition>,
    /// Where the resource can be reached, for resources with an address.
    pub address: Option<Url>,
    /// The complete object, for structured output.
    #[serde(skip)]
    pub object: Value,
}

impl ResourceRecord {
    /// Extract a record from a raw backend object.
    pub fn from_object(object: Value) -> Result<ResourceRecord> {
        let wire = WireObject::deserialize(&object).with_context(|| {
            let name = object
                .pointer("/metadata/name")
                .and_then(Value::as_str)
                .unwrap_or("<unnamed>");
            format!("could not parse resource {:?}", name)
        })?;
        let status = wire.status.unwrap_or_default();
        Ok(ResourceRecord {
            name: wire.metadata.name,
            namespace: wire.metadata.namespace.unwrap_or_default(),
            // Unset timestamps sometimes arrive as Go's zero time,
            // `0001-01-01T00:00:00Z`, instead of `null`.
            creation_time: wire
                .metadata
                .creation_timestamp
                .filter(|created| created.year() > 1),
            conditions: status.conditions.unwrap_or_default(),
            address: status.address.and_then(|address| address.url),
            object,
        })
    }

    /// The address as an operator would write it, without the `/` that URL
    /// normalization adds to a bare host.
    pub fn address_text(&self) -> Option<&str> {
        self.address.as_ref().map(|url| {
            let text = url.as_str();
            if url.path() == "/" && url.query().is_none() && url.fragment().is_none() {
                text.strip_suffix('/').unwrap_or(text)
            } else {
                text
            }
        })
    }
}

/// The subset of a Kubernetes-style object that we care about.
#[derive(Debug, Deserialize)]
struct WireObject {
    metadata: WireMetadata,
    #[serde(default)]
    status: Option<WireStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMetadata {
    name: String,
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    creation_timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct WireStatus {
    #[serde(default)]
    conditions: Option<Vec<Condition>>,
    #[serde(default)]
    address: Option<WireAddress>,
}

#[derive(Debug, Deserialize)]
struct WireAddress {
    #[serde(default)]
    url: Option<Url>,
}

#[test]
fn parse_event_listener_object() {
    let json = r#"
{
  "apiVersion": "triggers.tekton.dev/v1beta1",
  "kind": "EventListener",
  "metadata": {
    "name": "tb0",
    "namespace": "bar",
    "creationTimestamp": "2024-03-01T10:00:00Z"
  },
  "status": {
    "conditions": [
      { "type": "Ready", "status": "False", "reason": "Starting" },
      { "type": "Deployment", "status": "True" }
    ],
    "address": { "url": "http://tb0-listener.bar.svc.cluster.local" }
  }
}"#;
    let object: Value = serde_json::from_str(json).expect("parse error");
    let record = ResourceRecord::from_object(object).expect("bad record");
    assert_eq!(record.name, "tb0");
    assert_eq!(record.namespace, "bar");
    assert_eq!(
        record.creation_time.map(|t| t.to_rfc3339()),
        Some("2024-03-01T10:00:00+00:00".to_owned()),
    );
    assert_eq!(record.conditions.len(), 2);
    assert_eq!(record.conditions[0].status, ConditionStatus::False);
    assert_eq!(
        record.address_text(),
        Some("http://tb0-listener.bar.svc.cluster.local"),
    );
}

#[test]
fn zero_and_null_timestamps_are_absent() {
    let zero = serde_json::json!({
        "metadata": { "name": "a", "creationTimestamp": "0001-01-01T00:00:00Z" },
    });
    let null = serde_json::json!({
        "metadata": { "name": "b", "creationTimestamp": null },
        "status": null,
    });
    assert_eq!(ResourceRecord::from_object(zero).unwrap().creation_time, None);
    let epoch = serde_json::json!({
        "metadata": { "name": "c", "creationTimestamp": "1970-01-01T00:00:00Z" },
    });
    assert_eq!(
        ResourceRecord::from_object(epoch)
            .unwrap()
            .creation_time
            .map(|t| t.timestamp()),
        Some(0),
    );
    let record = ResourceRecord::from_object(null).unwrap();
    assert_eq!(record.creation_time, None);
    assert!(record.conditions.is_empty());
    assert!(record.address.is_none());
}

#[test]
fn objects_without_names_are_rejected() {
    let object = serde_json::json!({ "metadata": {} });
    let err = ResourceRecord::from_object(object).unwrap_err();
    assert_eq!(err.to_string(), "could not parse resource \"<unnamed>\"");
}
