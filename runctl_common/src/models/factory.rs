use serde_json::json;

use crate::prelude::*;

/// Builds minimal backend objects. Used by our tests and by anyone seeding an
/// [`InMemoryBackend`](crate::backend::InMemoryBackend).
#[derive(Clone, Debug)]
pub struct ObjectFactory {
    object: Value,
}

impl ObjectFactory {
    /// Start building an object of `kind` named `name` in `namespace`.
    pub fn new(kind: ResourceKind, namespace: &str, name: &str) -> ObjectFactory {
        ObjectFactory {
            object: json!({
                "apiVersion": kind.api_version(),
                "kind": kind.singular(),
                "metadata": {
                    "name": name,
                    "namespace": namespace,
                },
            }),
        }
    }

    /// Set `metadata.creationTimestamp`.
    pub fn created_at(mut self, created: DateTime<Utc>) -> ObjectFactory {
        self.object["metadata"]["creationTimestamp"] =
            json!(created.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
        self
    }

    /// Set a label.
    pub fn label(mut self, key: &str, value: &str) -> ObjectFactory {
        self.object["metadata"]["labels"][key] = json!(value);
        self
    }

    /// Append a condition to `status.conditions`.
    pub fn condition(mut self, condition: Condition) -> ObjectFactory {
        let conditions = &mut self.object["status"]["conditions"];
        if conditions.is_null() {
            *conditions = json!([]);
        }
        if let Value::Array(conditions) = conditions {
            conditions.push(json!(condition));
        }
        self
    }

    /// Set `status.address.url`.
    pub fn address(mut self, url: &str) -> ObjectFactory {
        self.object["status"]["address"]["url"] = json!(url);
        self
    }

    /// Return the finished object.
    pub fn build(self) -> Value {
        self.object
    }
}

#[test]
fn factory_objects_parse_as_records() {
    let created = Utc::now();
    let object = ObjectFactory::new(ResourceKind::EventListener, "foo", "tb1")
        .created_at(created)
        .condition(Condition::new(ConditionStatus::True))
        .condition(Condition::new(ConditionStatus::False))
        .address("http://tb1-listener.foo.svc.cluster.local")
        .build();
    let record = ResourceRecord::from_object(object).expect("bad record");
    assert_eq!(record.name, "tb1");
    assert_eq!(record.namespace, "foo");
    assert_eq!(
        record.creation_time.map(|t| t.timestamp()),
        Some(created.timestamp()),
    );
    let statuses = record
        .conditions
        .iter()
        .map(|c| c.status)
        .collect::<Vec<_>>();
    assert_eq!(statuses, vec![ConditionStatus::True, ConditionStatus::False]);
    assert!(record.address.is_some());
}
