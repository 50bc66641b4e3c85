//! Structured output for `-o`.

use runctl_common::prelude::*;
use serde_json::json;
use std::str::FromStr;

use crate::{description::render_template, jsonpath::JsonPathTemplate};

/// A structured output format.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
    /// One `kind.group/name` line per object.
    Name,
    /// A Handlebars template, rendered once with the object as its context.
    Template(String),
    /// A `kubectl`-style JSONPath template.
    JsonPath(String),
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            "name" => Ok(OutputFormat::Name),
            _ => {
                if let Some(template) = s.strip_prefix("template=") {
                    Ok(OutputFormat::Template(template.to_owned()))
                } else if let Some(template) = s.strip_prefix("jsonpath=") {
                    JsonPathTemplate::parse(template).map_err(|err| format!("{:#}", err))?;
                    Ok(OutputFormat::JsonPath(template.to_owned()))
                } else {
                    Err(format!(
                        "unknown output format {:?} (expected json, yaml, name, \
                         template=... or jsonpath=...)",
                        s,
                    ))
                }
            }
        }
    }
}

/// Print a single object.
pub fn print_object(
    out: &mut dyn Write,
    format: &OutputFormat,
    kind: ResourceKind,
    object: &Value,
) -> Result<()> {
    print_value(out, format, kind, object)
}

/// Print listed records, in order, wrapped in a `List` object.
pub fn print_list(
    out: &mut dyn Write,
    format: &OutputFormat,
    kind: ResourceKind,
    records: &[ResourceRecord],
) -> Result<()> {
    let list = json!({
        "apiVersion": "v1",
        "kind": "List",
        "items": records.iter().map(|r| &r.object).collect::<Vec<_>>(),
    });
    print_value(out, format, kind, &list)
}

fn print_value(
    out: &mut dyn Write,
    format: &OutputFormat,
    kind: ResourceKind,
    value: &Value,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(value)?)?,
        // Lists print one name per item.
        OutputFormat::Name => match value.get("items").and_then(Value::as_array) {
            Some(items) => {
                for item in items {
                    writeln!(out, "{}", object_name(kind, item))?;
                }
            }
            None => writeln!(out, "{}", object_name(kind, value))?,
        },
        OutputFormat::Template(template) => {
            write!(out, "{}", render_template(template, value)?)?
        }
        OutputFormat::JsonPath(template) => {
            write!(out, "{}", JsonPathTemplate::parse(template)?.render(value))?
        }
    }
    Ok(())
}

/// The `kind.group/name` form of an object's name.
fn object_name(kind: ResourceKind, object: &Value) -> String {
    let name = object
        .pointer("/metadata/name")
        .and_then(Value::as_str)
        .unwrap_or_default();
    format!("{}/{}", kind.qualified_name(), name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ResourceRecord> {
        ["tb5", "tb2"]
            .iter()
            .map(|name| {
                let object =
                    ObjectFactory::new(ResourceKind::EventListener, "foo", name).build();
                ResourceRecord::from_object(object).unwrap()
            })
            .collect()
    }

    fn list_output(format: &str) -> String {
        let mut out = vec![];
        let format = format.parse::<OutputFormat>().unwrap();
        print_list(&mut out, &format, ResourceKind::EventListener, &records()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_formats() {
        assert_eq!("json".parse(), Ok(OutputFormat::Json));
        assert_eq!("yaml".parse(), Ok(OutputFormat::Yaml));
        assert_eq!(
            "template={{metadata.name}}".parse(),
            Ok(OutputFormat::Template("{{metadata.name}}".to_owned())),
        );
        assert_eq!(
            "jsonpath={.kind}".parse(),
            Ok(OutputFormat::JsonPath("{.kind}".to_owned())),
        );
        assert!("wide".parse::<OutputFormat>().is_err());
        assert!("jsonpath={range .items[*]}".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn list_names_in_order() {
        assert_eq!(
            list_output("name"),
            "eventlistener.triggers.tekton.dev/tb5\neventlistener.triggers.tekton.dev/tb2\n",
        );
    }

    #[test]
    fn list_as_json_wraps_items() {
        let list: Value = serde_json::from_str(&list_output("json")).unwrap();
        assert_eq!(list["kind"], "List");
        assert_eq!(list["items"][0]["metadata"]["name"], "tb5");
        assert_eq!(list["items"][1]["metadata"]["name"], "tb2");
    }

    #[test]
    fn list_as_template() {
        assert_eq!(
            list_output("template={{#each items}}{{metadata.name}} {{/each}}"),
            "tb5 tb2 ",
        );
    }

    #[test]
    fn list_as_jsonpath() {
        assert_eq!(
            list_output(r#"jsonpath={range .items[*]}{.metadata.name}{"\n"}{end}"#),
            "tb5\ntb2\n",
        );
    }

    #[test]
    fn object_as_yaml() {
        let object = ObjectFactory::new(ResourceKind::PipelineRun, "ci", "build-1").build();
        let mut out = vec![];
        print_object(&mut out, &OutputFormat::Yaml, ResourceKind::PipelineRun, &object).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("name: build-1"));
        assert!(text.contains("apiVersion: tekton.dev/v1"));
    }
}
