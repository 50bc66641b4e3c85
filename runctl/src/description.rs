//! Human-readable descriptions of a resource.

use handlebars::{no_escape, Handlebars};
use runctl_common::prelude::*;

use crate::{age::format_age, status::status_text};

/// Template for `pipelinerun describe`.
const PIPELINE_RUN_TEMPLATE: &str = include_str!("pipelinerun.txt.hbs");

/// Template for `eventlistener describe`.
const EVENT_LISTENER_TEMPLATE: &str = include_str!("eventlistener.txt.hbs");

/// Render the specified template, filling in the supplied values using
/// [Handlebars][]. Output is plain text, so nothing is HTML-escaped, and
/// missing values are errors.
///
/// [Handlebars]: https://handlebarsjs.com/
pub fn render_template<T: Serialize>(template: &str, params: &T) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(no_escape);
    Ok(handlebars.render_template(template, params)?)
}

// Everything our description templates can see.
#[derive(Serialize)]
struct Params<'a> {
    kind: &'static str,
    record: &'a ResourceRecord,
    age: String,
    status: String,
    url: &'a str,
}

/// Describe `record` for a human.
pub fn describe_record(
    kind: ResourceKind,
    record: &ResourceRecord,
    now: DateTime<Utc>,
) -> Result<String> {
    let template = match kind {
        ResourceKind::PipelineRun => PIPELINE_RUN_TEMPLATE,
        ResourceKind::EventListener => EVENT_LISTENER_TEMPLATE,
    };
    let params = Params {
        kind: kind.singular(),
        record,
        age: format_age(record.creation_time, now),
        status: status_text(&record.conditions),
        url: record.address_text().unwrap_or(""),
    };
    render_template(template, &params)
        .with_context(|| format!("could not describe {} {}", kind, record.name))
}

#[cfg(test)]
mod tests {
    use runctl_common::chrono::Duration;

    use super::*;

    #[test]
    fn render_templates_without_escaping() {
        let text = render_template("{{a}} & {{b}}\n", &serde_json::json!({ "a": "<x>", "b": 1 }))
            .expect("could not render template");
        assert_eq!(text, "<x> & 1\n");
    }

    #[test]
    fn missing_values_are_errors() {
        assert!(render_template("{{nope}}", &serde_json::json!({})).is_err());
    }

    #[test]
    fn describe_pipeline_run() {
        let now = Utc::now();
        let object = ObjectFactory::new(ResourceKind::PipelineRun, "ci", "build-42")
            .created_at(now - Duration::minutes(3))
            .condition(Condition {
                condition_type: "Succeeded".to_owned(),
                status: ConditionStatus::False,
                reason: "Failed".to_owned(),
                message: "Tasks Completed: 2 (Failed: 1)".to_owned(),
            })
            .build();
        let record = ResourceRecord::from_object(object).unwrap();
        let text = describe_record(ResourceKind::PipelineRun, &record, now)
            .expect("could not render template");
        assert!(text.contains("build-42"));
        assert!(text.contains("ci"));
        assert!(text.contains("3m"));
        assert!(text.contains("Succeeded"));
        assert!(text.contains("Tasks Completed: 2 (Failed: 1)"));
    }

    #[test]
    fn describe_event_listener_without_status() {
        let object = ObjectFactory::new(ResourceKind::EventListener, "ci", "github").build();
        let record = ResourceRecord::from_object(object).unwrap();
        let text = describe_record(ResourceKind::EventListener, &record, Utc::now())
            .expect("could not render template");
        assert!(text.contains("github"));
        assert!(text.contains("---"));
    }
}
