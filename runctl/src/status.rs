//! Readiness of a resource, as shown in the `CONDITIONS` column.

use runctl_common::prelude::*;

/// The status of the first condition, if there is one.
///
/// The first condition is authoritative. We never look at the rest, even
/// when they disagree.
pub fn evaluate(conditions: &[Condition]) -> Option<ConditionStatus> {
    conditions.first().map(|condition| condition.status)
}

/// Like [`evaluate`], but as display text. No conditions means an empty
/// string.
pub fn status_text(conditions: &[Condition]) -> String {
    evaluate(conditions)
        .map(|status| status.to_string())
        .unwrap_or_default()
}

#[test]
fn first_condition_wins() {
    let conditions = vec![
        Condition::new(ConditionStatus::Unknown),
        Condition::new(ConditionStatus::True),
        Condition::new(ConditionStatus::True),
    ];
    assert_eq!(evaluate(&conditions), Some(ConditionStatus::Unknown));
    assert_eq!(status_text(&conditions), "Unknown");
    assert_eq!(status_text(&conditions[1..]), "True");
}

#[test]
fn no_conditions_is_blank() {
    assert_eq!(evaluate(&[]), None);
    assert_eq!(status_text(&[]), "");
}
