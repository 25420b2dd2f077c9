use std::{fmt, str::FromStr};

use comfy_table::{presets, Table};
use serde::Serialize;
use sqlbridge::{Cell, ResultRow, StatementSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: `{s}`, expected `text` or `json`")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Document<'a> {
    Rows { columns: &'a [String], rows: Vec<&'a [Cell]> },
    Count { rows_affected: u64 },
    Sets(Vec<Document<'a>>),
}

pub(crate) fn render(summary: &StatementSummary, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(text(summary)),
        OutputFormat::Json => json(summary),
    }
}

fn text(summary: &StatementSummary) -> String {
    match summary {
        StatementSummary::RowsAffected(count) => format!("{count} row(s) affected"),
        StatementSummary::Rows { columns, rows } => table(columns, rows),
        StatementSummary::ResultSets(sets) => sets.iter().map(text).collect::<Vec<_>>().join("\n\n"),
    }
}

/// A header, a rule under it and one line per row.
fn table(columns: &[String], rows: &[ResultRow]) -> String {
    let mut table = Table::new();

    table.load_preset(presets::ASCII_MARKDOWN);
    table.set_header(columns);

    for row in rows {
        table.add_row(row.values().iter().map(Cell::to_string));
    }

    table.to_string()
}

fn json(summary: &StatementSummary) -> anyhow::Result<String> {
    Ok(serde_json::to_string(&document(summary))?)
}

fn document(summary: &StatementSummary) -> Document<'_> {
    match summary {
        StatementSummary::RowsAffected(count) => Document::Count { rows_affected: *count },
        StatementSummary::Rows { columns, rows } => Document::Rows {
            columns,
            rows: rows.iter().map(|row| row.values()).collect(),
        },
        StatementSummary::ResultSets(sets) => Document::Sets(sets.iter().map(document).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;

    fn employees() -> StatementSummary {
        let columns = vec!["EMPLOYEE_ID".to_string(), "EMAIL".to_string(), "MANAGER_ID".to_string()];

        StatementSummary::Rows {
            rows: vec![
                ResultRow::new(
                    columns.clone(),
                    vec![Cell::Integer(1001), Cell::from("john.doe@example.com"), Cell::Null],
                ),
                ResultRow::new(columns.clone(), vec![Cell::Integer(1002), Cell::from("o'brien@example.com"), Cell::Integer(1001)]),
            ],
            columns,
        }
    }

    #[test]
    fn text_tables() {
        let rendered = render(&employees(), OutputFormat::Text).unwrap();
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(4, lines.len(), "{rendered}");

        let header: Vec<_> = lines[0].split('|').map(str::trim).filter(|s| !s.is_empty()).collect();
        assert_eq!(vec!["EMPLOYEE_ID", "EMAIL", "MANAGER_ID"], header);

        assert!(lines[1].contains("---"), "{rendered}");
        assert!(lines[1].chars().all(|c| c == '|' || c == '-' || c == '+' || c == ':'), "{rendered}");

        assert!(lines[2].contains("john.doe@example.com") && lines[2].contains("NULL"), "{rendered}");
        assert!(lines[3].contains("o'brien@example.com"), "{rendered}");

        // Columns line up.
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|line| line.chars().count() == width), "{rendered}");
    }

    #[test]
    fn text_result_sets_are_separated() {
        let summary = StatementSummary::ResultSets(vec![employees(), employees()]);
        let rendered = render(&summary, OutputFormat::Text).unwrap();

        let blocks: Vec<_> = rendered.split("\n\n").collect();
        assert_eq!(2, blocks.len(), "{rendered}");
        assert_eq!(blocks[0], blocks[1]);
    }

    #[test]
    fn text_counts() {
        let expected = expect!["0 row(s) affected"];
        expected.assert_eq(&render(&StatementSummary::RowsAffected(0), OutputFormat::Text).unwrap());
    }

    #[test]
    fn json_documents() {
        let expected = expect![[r#"{"columns":["EMPLOYEE_ID","EMAIL","MANAGER_ID"],"rows":[[1001,"john.doe@example.com",null],[1002,"o'brien@example.com",1001]]}"#]];
        expected.assert_eq(&render(&employees(), OutputFormat::Json).unwrap());

        let expected = expect![[r#"{"rows_affected":3}"#]];
        expected.assert_eq(&render(&StatementSummary::RowsAffected(3), OutputFormat::Json).unwrap());
    }

    #[test]
    fn json_result_sets_are_an_array() {
        let columns = vec!["id".to_string()];
        let summary = StatementSummary::ResultSets(vec![
            StatementSummary::Rows {
                rows: vec![ResultRow::new(columns.clone(), vec![Cell::Integer(1)])],
                columns: columns.clone(),
            },
            StatementSummary::Rows { columns, rows: vec![] },
        ]);

        let expected = expect![[r#"[{"columns":["id"],"rows":[[1]]},{"columns":["id"],"rows":[]}]"#]];
        expected.assert_eq(&render(&summary, OutputFormat::Json).unwrap());
    }
}
