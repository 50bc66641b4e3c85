//! Rendering listed resources as a table.

use prettytable::{format::FormatBuilder, Cell, Row, Table};
use runctl_common::prelude::*;

use crate::{age::format_age, status::status_text};

/// How to render a table.
#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    /// Leave out the header row.
    pub no_headers: bool,
    /// Add a `NAMESPACE` column.
    pub all_namespaces: bool,
}

/// One row of the table, before layout.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListedRow {
    /// The resource's name.
    pub name: String,
    /// Only shown in all-namespaces mode.
    pub namespace: String,
    /// The resource's address, or empty.
    pub url: String,
    /// See [`format_age`].
    pub age: String,
    /// See [`status_text`].
    pub status: String,
}

impl ListedRow {
    /// Compute the displayed fields for `record`.
    pub fn new(record: &ResourceRecord, now: DateTime<Utc>) -> ListedRow {
        ListedRow {
            name: record.name.clone(),
            namespace: record.namespace.clone(),
            url: record.address_text().unwrap_or_default().to_owned(),
            age: format_age(record.creation_time, now),
            status: status_text(&record.conditions),
        }
    }
}

/// The message we print instead of an empty table.
pub fn empty_message(kind: ResourceKind) -> String {
    format!("No {} found", kind.plural())
}

/// Render `records` as text, in the order given.
pub fn render(
    kind: ResourceKind,
    records: &[ResourceRecord],
    options: TableOptions,
    now: DateTime<Utc>,
) -> String {
    // An empty list gets a message, never a lonely header row.
    if records.is_empty() {
        return format!("{}\n", empty_message(kind));
    }

    // Create a new table. This library makes some rather unusual API choices,
    // but it does the job well enough.
    let mut table = Table::new();
    table.set_format(FormatBuilder::new().padding(0, 3).build());
    if !options.no_headers {
        let mut titles = vec!["NAME"];
        if options.all_namespaces {
            titles.push("NAMESPACE");
        }
        titles.extend(&["URL", "AGE", "CONDITIONS"]);
        table.add_row(Row::new(titles.into_iter().map(Cell::new).collect()));
    }

    for record in records {
        let row = ListedRow::new(record, now);
        let mut cells = vec![Cell::new(&row.name)];
        if options.all_namespaces {
            cells.push(Cell::new(&row.namespace));
        }
        cells.push(Cell::new(&row.url));
        cells.push(Cell::new(&row.age));
        cells.push(Cell::new(&row.status));
        table.add_row(Row::new(cells));
    }

    // Cells are padded to the column width, so trim the last column.
    let mut out = String::new();
    for line in table.to_string().lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
