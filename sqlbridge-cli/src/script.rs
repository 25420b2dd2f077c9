use sqlbridge::{StatementKind, StatementRequest};

/// Split a script on `;` outside of quotes. `--` comments run to the end
/// of the line and are dropped.
pub(crate) fn split(script: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, '-') if chars.peek() == Some(&'-') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        current.push('\n');
                        break;
                    }
                }
            }
            (None, ';') => push_statement(&mut statements, &mut current),
            (None, c) => current.push(c),
        }
    }

    push_statement(&mut statements, &mut current);

    statements
}

fn push_statement(statements: &mut Vec<String>, current: &mut String) {
    let statement = current.trim();

    if !statement.is_empty() {
        statements.push(statement.to_string());
    }

    current.clear();
}

/// Label a statement by its leading keyword.
pub(crate) fn request(sql: impl Into<String>) -> StatementRequest {
    let sql = sql.into();
    let keyword = sql
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase();

    let kind = match keyword.as_str() {
        "SELECT" | "WITH" => StatementKind::Query,
        "CREATE" | "DROP" | "ALTER" | "TRUNCATE" => StatementKind::Ddl,
        _ => StatementKind::Mutation,
    };

    StatementRequest::new(sql, kind)
}
