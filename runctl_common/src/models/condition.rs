use crate::prelude::*;

/// The tri-state status of a [`Condition`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ConditionStatus {
    /// The condition holds.
    True,
    /// The condition does not hold.
    False,
    /// The controller hasn't decided yet.
    Unknown,
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        };
        s.fmt(f)
    }
}

/// A status assertion attached to a resource by its controller.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Condition {
    /// What this condition is about, for example `Succeeded` or `Ready`.
    #[serde(rename = "type", default)]
    pub condition_type: String,
    /// Whether the condition holds.
    pub status: ConditionStatus,
    /// A machine-readable reason for the last transition.
    #[serde(default)]
    pub reason: String,
    /// A human-readable explanation.
    #[serde(default)]
    pub message: String,
}

impl Condition {
    /// Create a condition with an empty type, reason and message.
    pub fn new(status: ConditionStatus) -> Condition {
        Condition {
            condition_type: String::new(),
            status,
            reason: String::new(),
            message: String::new(),
        }
    }
}

#[test]
fn parse_condition_with_missing_fields() {
    let json = r#"{ "type": "Succeeded", "status": "Unknown" }"#;
    let condition: Condition = serde_json::from_str(json).expect("parse error");
    assert_eq!(condition.condition_type, "Succeeded");
    assert_eq!(condition.status, ConditionStatus::Unknown);
    assert_eq!(condition.reason, "");
}
