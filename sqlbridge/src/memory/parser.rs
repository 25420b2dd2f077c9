//! Lowers the `sqlparser` AST into the handful of statement shapes the
//! in-memory library serves.
//!
//! Session options (`SET ...`) and, for Sybase, stored procedures
//! (`CREATE PROCEDURE`, `EXEC`) are recognized before the text reaches
//! `sqlparser`, which doesn't know their vendor forms.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use sqlparser::{
    ast::{self, BinaryOperator, ColumnOption, Expr, ObjectType, SelectItem, SetExpr, TableFactor, UnaryOperator, Value},
    dialect::{Dialect as SqlDialect, GenericDialect, MsSqlDialect},
    parser::{Parser, ParserError},
};

use crate::config::DriverKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Literal {
    Null,
    Integer(i64),
    Text(String),
    /// `SYSDATE`, `GETDATE()` or `CURRENT_TIMESTAMP`, fixed when parsed.
    Timestamp(NaiveDateTime),
    /// A procedure parameter such as `@id`.
    Param(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnType {
    Integer,
    Text,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnDef {
    pub(crate) name: String,
    pub(crate) ty: ColumnType,
    pub(crate) primary_key: bool,
    pub(crate) not_null: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Projection {
    All,
    Columns(Vec<String>),
}

/// `column = literal` terms joined by `AND`.
pub(crate) type Filter = Vec<(String, Literal)>;

/// One argument of `EXEC`, by name (`@id = 1`) or by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Arg {
    pub(crate) name: Option<String>,
    pub(crate) value: Literal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement {
    CreateTable {
        name: String,
        columns: Vec<ColumnDef>,
    },
    DropTable {
        name: String,
    },
    Insert {
        table: String,
        columns: Option<Vec<String>>,
        values: Vec<Literal>,
    },
    Select {
        table: String,
        projection: Projection,
        filter: Filter,
    },
    Update {
        table: String,
        assignments: Vec<(String, Literal)>,
        filter: Filter,
    },
    Delete {
        table: String,
        filter: Filter,
    },
    CreateProcedure {
        name: String,
        /// Lowercased, with the `@`.
        params: Vec<String>,
        body: Vec<Statement>,
    },
    Exec {
        name: String,
        args: Vec<Arg>,
    },
    /// Session options such as `set chained on`. Accepted and ignored.
    Set,
}

impl Statement {
    /// Statements that change the store and so belong to the transaction.
    pub(crate) fn is_write(&self) -> bool {
        !matches!(self, Statement::Select { .. } | Statement::Set)
    }

    pub(crate) fn is_ddl(&self) -> bool {
        matches!(
            self,
            Statement::CreateTable { .. } | Statement::DropTable { .. } | Statement::CreateProcedure { .. }
        )
    }

    /// Replace every parameter with its value. Fails with the name of the
    /// first parameter `params` has no value for.
    pub(crate) fn bind(&mut self, params: &BTreeMap<String, Literal>) -> Result<(), String> {
        for literal in self.literals_mut() {
            let bound = match &*literal {
                Literal::Param(name) => params.get(&name.to_lowercase()).cloned().ok_or_else(|| name.clone())?,
                _ => continue,
            };

            *literal = bound;
        }

        Ok(())
    }

    /// Literals of this statement. A procedure body is bound per call, so
    /// it is left out.
    fn literals_mut(&mut self) -> Box<dyn Iterator<Item = &mut Literal> + '_> {
        match self {
            Statement::Insert { values, .. } => Box::new(values.iter_mut()),
            Statement::Select { filter, .. } | Statement::Delete { filter, .. } => {
                Box::new(filter.iter_mut().map(|(_, literal)| literal))
            }
            Statement::Update {
                assignments, filter, ..
            } => Box::new(
                assignments
                    .iter_mut()
                    .chain(filter.iter_mut())
                    .map(|(_, literal)| literal),
            ),
            Statement::Exec { args, .. } => Box::new(args.iter_mut().map(|arg| &mut arg.value)),
            Statement::CreateTable { .. }
            | Statement::DropTable { .. }
            | Statement::CreateProcedure { .. }
            | Statement::Set => Box::new(std::iter::empty()),
        }
    }
}

/// Where parsing stopped: the offending token, or `None` at the end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    pub(crate) near: Option<String>,
}

impl ParseError {
    fn near(token: impl Into<String>) -> Self {
        Self {
            near: Some(token.into()),
        }
    }

    fn at_end() -> Self {
        Self { near: None }
    }

    /// Points at the leading word of a construct this library doesn't serve.
    fn unsupported(construct: impl ToString) -> Self {
        let rendered = construct.to_string();
        match rendered.split_whitespace().next() {
            Some(word) => Self::near(word),
            None => Self::at_end(),
        }
    }
}

impl From<ParserError> for ParseError {
    fn from(err: ParserError) -> Self {
        // "Expected ..., found: <token>", optionally followed by a location.
        let near = match &err {
            ParserError::ParserError(message) => message.split_once("found: ").map(|(_, found)| {
                let found = found.split(" at Line:").next().unwrap_or(found);
                found.trim().trim_matches('\'').to_string()
            }),
            _ => None,
        };

        Self {
            near: near.filter(|token| token != "EOF"),
        }
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// Parse one statement in the dialect of `kind`. Clock functions read as
/// `now`.
pub(crate) fn parse(kind: DriverKind, sql: &str, now: NaiveDateTime) -> ParseResult<Statement> {
    Lowering { kind, now }.statement(sql)
}

struct Lowering {
    kind: DriverKind,
    now: NaiveDateTime,
}

impl Lowering {
    fn dialect(&self) -> &'static dyn SqlDialect {
        match self.kind {
            DriverKind::Oracle => &GenericDialect {},
            DriverKind::Sybase => &MsSqlDialect {},
        }
    }

    fn statement(&self, sql: &str) -> ParseResult<Statement> {
        let text = sql.trim().trim_end_matches(';');
        let (first, rest) = split_word(text).ok_or_else(ParseError::at_end)?;

        if first.eq_ignore_ascii_case("SET") {
            return Ok(Statement::Set);
        }

        if self.kind == DriverKind::Sybase {
            if first.eq_ignore_ascii_case("EXEC") || first.eq_ignore_ascii_case("EXECUTE") {
                return self.exec(rest);
            }

            if let Some((object, rest)) = split_word(rest) {
                let procedure = object.eq_ignore_ascii_case("PROCEDURE") || object.eq_ignore_ascii_case("PROC");

                if first.eq_ignore_ascii_case("CREATE") && procedure {
                    return self.create_procedure(rest);
                }
            }
        }

        let mut statements = Parser::parse_sql(self.dialect(), text)?;

        match (statements.pop(), statements.is_empty()) {
            (Some(statement), true) => self.lower(statement),
            (Some(statement), false) => Err(ParseError::unsupported(statement)),
            (None, _) => Err(ParseError::at_end()),
        }
    }

    fn lower(&self, statement: ast::Statement) -> ParseResult<Statement> {
        match statement {
            ast::Statement::CreateTable {
                name,
                columns,
                constraints,
                ..
            } => self.create_table(&name, columns, constraints),
            ast::Statement::Drop {
                object_type: ObjectType::Table,
                mut names,
                ..
            } => match (names.pop(), names.is_empty()) {
                (Some(name), true) => Ok(Statement::DropTable {
                    name: object_name(&name)?,
                }),
                _ => Err(ParseError::near(",")),
            },
            ast::Statement::Insert {
                table_name,
                columns,
                source,
                ..
            } => self.insert(&table_name, columns, *source),
            ast::Statement::Query(query) => self.select(*query),
            ast::Statement::Update {
                table,
                assignments,
                selection,
                ..
            } => {
                if !table.joins.is_empty() {
                    return Err(ParseError::near("JOIN"));
                }

                let assignments = assignments
                    .into_iter()
                    .map(|assignment| {
                        let column = assignment
                            .id
                            .last()
                            .map(|ident| ident.value.clone())
                            .ok_or_else(ParseError::at_end)?;

                        Ok((column, self.literal(assignment.value)?))
                    })
                    .collect::<ParseResult<Vec<_>>>()?;

                Ok(Statement::Update {
                    table: table_name(&table.relation)?,
                    assignments,
                    filter: self.filter(selection)?,
                })
            }
            ast::Statement::Delete {
                table_name: table,
                selection,
                ..
            } => Ok(Statement::Delete {
                table: table_name(&table)?,
                filter: self.filter(selection)?,
            }),
            other => Err(ParseError::unsupported(other)),
        }
    }

    fn create_table(
        &self,
        name: &ast::ObjectName,
        columns: Vec<ast::ColumnDef>,
        constraints: Vec<ast::TableConstraint>,
    ) -> ParseResult<Statement> {
        let primary_key: Vec<String> = constraints
            .into_iter()
            .filter_map(|constraint| match constraint {
                ast::TableConstraint::Unique {
                    columns, is_primary: true, ..
                } => Some(columns),
                _ => None,
            })
            .flatten()
            .map(|ident| ident.value.to_lowercase())
            .collect();

        let columns = columns
            .into_iter()
            .map(|column| {
                let mut def = ColumnDef {
                    ty: column_type(&column.data_type)?,
                    primary_key: primary_key.contains(&column.name.value.to_lowercase()),
                    not_null: false,
                    name: column.name.value,
                };

                for option in column.options {
                    match option.option {
                        ColumnOption::Unique { is_primary: true, .. } => def.primary_key = true,
                        ColumnOption::NotNull => def.not_null = true,
                        _ => (),
                    }
                }

                // A primary key implies NOT NULL.
                def.not_null |= def.primary_key;

                Ok(def)
            })
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(Statement::CreateTable {
            name: object_name(name)?,
            columns,
        })
    }

    fn insert(&self, table: &ast::ObjectName, columns: Vec<ast::Ident>, source: ast::Query) -> ParseResult<Statement> {
        let mut rows = match *source.body {
            SetExpr::Values(values) => values.rows,
            other => return Err(ParseError::unsupported(other)),
        };

        let values = match (rows.pop(), rows.is_empty()) {
            (Some(row), true) => row,
            (Some(_), false) => return Err(ParseError::near(",")),
            (None, _) => return Err(ParseError::at_end()),
        };

        let columns = match columns.is_empty() {
            true => None,
            false => Some(columns.into_iter().map(|ident| ident.value).collect()),
        };

        Ok(Statement::Insert {
            table: object_name(table)?,
            columns,
            values: values
                .into_iter()
                .map(|expr| self.literal(expr))
                .collect::<ParseResult<_>>()?,
        })
    }

    fn select(&self, query: ast::Query) -> ParseResult<Statement> {
        let select = match *query.body {
            SetExpr::Select(select) => *select,
            other => return Err(ParseError::unsupported(other)),
        };

        let mut from = select.from;

        let source = match (from.pop(), from.is_empty()) {
            (Some(source), true) if source.joins.is_empty() => source,
            (Some(_), _) => return Err(ParseError::near("JOIN")),
            (None, _) => return Err(ParseError::at_end()),
        };

        let projection = match select.projection.as_slice() {
            [SelectItem::Wildcard(..)] => Projection::All,
            items => Projection::Columns(
                items
                    .iter()
                    .map(|item| match item {
                        SelectItem::UnnamedExpr(Expr::Identifier(ident)) => Ok(ident.value.clone()),
                        other => Err(ParseError::unsupported(other)),
                    })
                    .collect::<ParseResult<_>>()?,
            ),
        };

        Ok(Statement::Select {
            table: table_name(&source.relation)?,
            projection,
            filter: self.filter(select.selection)?,
        })
    }

    fn filter(&self, selection: Option<Expr>) -> ParseResult<Filter> {
        let mut filter = Vec::new();

        if let Some(expr) = selection {
            self.conjunction(expr, &mut filter)?;
        }

        Ok(filter)
    }

    fn conjunction(&self, expr: Expr, filter: &mut Filter) -> ParseResult<()> {
        match expr {
            Expr::Nested(inner) => self.conjunction(*inner, filter),
            Expr::BinaryOp {
                left,
                op: BinaryOperator::And,
                right,
            } => {
                self.conjunction(*left, filter)?;
                self.conjunction(*right, filter)
            }
            Expr::BinaryOp {
                left,
                op: BinaryOperator::Eq,
                right,
            } => match *left {
                Expr::Identifier(column) => {
                    filter.push((column.value, self.literal(*right)?));
                    Ok(())
                }
                other => Err(ParseError::unsupported(other)),
            },
            other => Err(ParseError::unsupported(other)),
        }
    }

    fn literal(&self, expr: Expr) -> ParseResult<Literal> {
        match expr {
            Expr::Value(Value::Null) => Ok(Literal::Null),
            Expr::Value(Value::Number(n, _)) => n.parse().map(Literal::Integer).map_err(|_| ParseError::near(n)),
            Expr::Value(Value::SingleQuotedString(s)) | Expr::Value(Value::NationalStringLiteral(s)) => {
                Ok(Literal::Text(s))
            }
            Expr::Value(Value::Placeholder(name)) if name.starts_with('@') => Ok(Literal::Param(name)),
            Expr::UnaryOp {
                op: UnaryOperator::Minus,
                expr,
            } => match self.literal(*expr)? {
                Literal::Integer(n) => Ok(Literal::Integer(-n)),
                other => Err(ParseError::unsupported(format!("{other:?}"))),
            },
            Expr::Nested(inner) => self.literal(*inner),
            Expr::Identifier(ident) if ident.value.starts_with('@') => Ok(Literal::Param(ident.value)),
            Expr::Identifier(ident) if ident.value.eq_ignore_ascii_case("SYSDATE") => Ok(Literal::Timestamp(self.now)),
            Expr::Function(function) if is_clock(&function.name) => Ok(Literal::Timestamp(self.now)),
            other => Err(ParseError::unsupported(other)),
        }
    }

    /// `name @a INT, @b VARCHAR(20) AS <body>`, the body being one or more
    /// `;` separated statements.
    fn create_procedure(&self, text: &str) -> ParseResult<Statement> {
        let (name, mut rest) = split_word(text).ok_or_else(ParseError::at_end)?;
        let mut params = Vec::new();

        let body = loop {
            let (word, tail) = split_word(rest).ok_or_else(ParseError::at_end)?;

            if word.eq_ignore_ascii_case("AS") {
                break tail;
            }

            for piece in word.split(',') {
                let piece = piece.trim_matches(|c| c == '(' || c == ')');

                if piece.starts_with('@') {
                    params.push(piece.to_lowercase());
                }
            }

            rest = tail;
        };

        let body = Parser::parse_sql(self.dialect(), body)?
            .into_iter()
            .map(|statement| self.lower(statement))
            .collect::<ParseResult<Vec<_>>>()?;

        if body.is_empty() {
            return Err(ParseError::at_end());
        }

        Ok(Statement::CreateProcedure {
            name: name.to_string(),
            params,
            body,
        })
    }

    /// `name [@param =] value, ...`
    fn exec(&self, text: &str) -> ParseResult<Statement> {
        let (name, rest) = split_word(text).ok_or_else(ParseError::at_end)?;
        let rest = rest.trim();

        if rest.is_empty() {
            return Ok(Statement::Exec {
                name: name.to_string(),
                args: Vec::new(),
            });
        }

        // The argument list reads as a projection: `@id = 1` is an equality.
        let mut parsed = Parser::parse_sql(self.dialect(), &format!("SELECT {rest}"))?;

        let items = match (parsed.pop(), parsed.is_empty()) {
            (Some(ast::Statement::Query(query)), true) => match *query.body {
                SetExpr::Select(select) => select.projection,
                other => return Err(ParseError::unsupported(other)),
            },
            (Some(other), _) => return Err(ParseError::unsupported(other)),
            (None, _) => return Err(ParseError::at_end()),
        };

        let args = items
            .into_iter()
            .map(|item| match item {
                SelectItem::UnnamedExpr(Expr::BinaryOp {
                    left,
                    op: BinaryOperator::Eq,
                    right,
                }) => match *left {
                    Expr::Identifier(param) if param.value.starts_with('@') => Ok(Arg {
                        name: Some(param.value.to_lowercase()),
                        value: self.literal(*right)?,
                    }),
                    other => Err(ParseError::unsupported(other)),
                },
                SelectItem::UnnamedExpr(expr) => Ok(Arg {
                    name: None,
                    value: self.literal(expr)?,
                }),
                other => Err(ParseError::unsupported(other)),
            })
            .collect::<ParseResult<_>>()?;

        Ok(Statement::Exec {
            name: name.to_string(),
            args,
        })
    }
}

fn column_type(data_type: &ast::DataType) -> ParseResult<ColumnType> {
    // Custom types such as `VARCHAR2(50)` or `NUMBER(10)` render with
    // their modifiers; only the base name matters here.
    let rendered = data_type.to_string().to_ascii_uppercase();
    let base = rendered
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or_default();

    match base {
        "INT" | "INTEGER" | "NUMBER" | "NUMERIC" | "DECIMAL" | "SMALLINT" | "BIGINT" | "TINYINT" => {
            Ok(ColumnType::Integer)
        }
        "VARCHAR" | "VARCHAR2" | "NVARCHAR" | "NVARCHAR2" | "CHAR" | "CHARACTER" | "NCHAR" | "TEXT" | "STRING" => {
            Ok(ColumnType::Text)
        }
        "DATE" | "DATETIME" | "SMALLDATETIME" | "TIMESTAMP" => Ok(ColumnType::Date),
        _ => Err(ParseError::near(base)),
    }
}

fn is_clock(name: &ast::ObjectName) -> bool {
    let name = name.to_string();
    ["GETDATE", "CURRENT_TIMESTAMP", "SYSDATE"]
        .iter()
        .any(|clock| name.eq_ignore_ascii_case(clock))
}

/// The unqualified name: `dbo.t` is `t`.
fn object_name(name: &ast::ObjectName) -> ParseResult<String> {
    name.0
        .last()
        .map(|ident| ident.value.clone())
        .ok_or_else(ParseError::at_end)
}

fn table_name(factor: &TableFactor) -> ParseResult<String> {
    match factor {
        TableFactor::Table { name, .. } => object_name(name),
        other => Err(ParseError::unsupported(other)),
    }
}

/// Splits off the first whitespace separated word.
fn split_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();

    if text.is_empty() {
        return None;
    }

    let end = text.find(char::is_whitespace).unwrap_or(text.len());

    Some((&text[..end], &text[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn sybase(sql: &str) -> ParseResult<Statement> {
        parse(DriverKind::Sybase, sql, noon())
    }

    fn oracle(sql: &str) -> ParseResult<Statement> {
        parse(DriverKind::Oracle, sql, noon())
    }

    #[test]
    fn reads_the_sybase_example_table() {
        let statement = sybase("CREATE TABLE example_table (id INT PRIMARY KEY, name VARCHAR(50), age INT)").unwrap();

        let Statement::CreateTable { name, columns } = statement else {
            panic!("expected CREATE TABLE");
        };

        assert_eq!("example_table", name);
        assert_eq!(3, columns.len());
        assert!(columns[0].primary_key && columns[0].not_null);
        assert_eq!(ColumnType::Text, columns[1].ty);
        assert!(!columns[2].not_null);
    }

    #[test]
    fn reads_oracle_types_and_table_keys() {
        let statement = oracle(
            "CREATE TABLE employees (employee_id NUMBER(6), email VARCHAR2(100) NOT NULL, hire_date DATE, \
             PRIMARY KEY (employee_id))",
        )
        .unwrap();

        let Statement::CreateTable { columns, .. } = statement else {
            panic!("expected CREATE TABLE");
        };

        assert_eq!(
            vec![ColumnType::Integer, ColumnType::Text, ColumnType::Date],
            columns.iter().map(|c| c.ty).collect::<Vec<_>>()
        );
        assert!(columns[0].primary_key && columns[0].not_null);
        assert!(columns[1].not_null && !columns[1].primary_key);
    }

    #[test]
    fn reads_insert_with_sysdate_and_quotes() {
        let statement = oracle(
            "INSERT INTO employees (employee_id, first_name, last_name, email, hire_date) \
             VALUES (1001, 'John', 'O''Brien', 'john.doe@example.com', SYSDATE);",
        )
        .unwrap();

        assert_eq!(
            Statement::Insert {
                table: "employees".into(),
                columns: Some(vec![
                    "employee_id".into(),
                    "first_name".into(),
                    "last_name".into(),
                    "email".into(),
                    "hire_date".into(),
                ]),
                values: vec![
                    Literal::Integer(1001),
                    Literal::Text("John".into()),
                    Literal::Text("O'Brien".into()),
                    Literal::Text("john.doe@example.com".into()),
                    Literal::Timestamp(noon()),
                ],
            },
            statement
        );
    }

    #[test]
    fn reads_getdate_on_sybase() {
        let Statement::Insert { values, .. } = sybase("INSERT INTO t VALUES (GETDATE())").unwrap() else {
            panic!("expected INSERT");
        };

        assert_eq!(vec![Literal::Timestamp(noon())], values);
    }

    #[test]
    fn reads_update_with_compound_filter() {
        let statement = sybase("UPDATE my_table SET column1 = 'new_value' WHERE column2 = 'value2' AND id = -1").unwrap();

        assert_eq!(
            Statement::Update {
                table: "my_table".into(),
                assignments: vec![("column1".into(), Literal::Text("new_value".into()))],
                filter: vec![
                    ("column2".into(), Literal::Text("value2".into())),
                    ("id".into(), Literal::Integer(-1)),
                ],
            },
            statement
        );
    }

    #[test]
    fn reads_projection_and_delete() {
        assert_eq!(
            Statement::Select {
                table: "employees".into(),
                projection: Projection::Columns(vec!["employee_id".into(), "email".into()]),
                filter: vec![],
            },
            oracle("SELECT employee_id, email FROM employees").unwrap()
        );

        assert_eq!(
            Statement::Delete {
                table: "employees".into(),
                filter: vec![("employee_id".into(), Literal::Integer(1001))],
            },
            oracle("DELETE FROM employees WHERE employee_id = 1001").unwrap()
        );
    }

    #[test]
    fn session_options_are_accepted() {
        assert_eq!(Statement::Set, sybase("set chained on").unwrap());
        assert_eq!(Statement::Set, oracle("SET TRANSACTION READ WRITE").unwrap());
    }

    #[test]
    fn reads_stored_procedures() {
        let statement =
            sybase("CREATE PROCEDURE get_user @id INT AS SELECT * FROM example_table WHERE id = @id").unwrap();

        assert_eq!(
            Statement::CreateProcedure {
                name: "get_user".into(),
                params: vec!["@id".into()],
                body: vec![Statement::Select {
                    table: "example_table".into(),
                    projection: Projection::All,
                    filter: vec![("id".into(), Literal::Param("@id".into()))],
                }],
            },
            statement
        );

        assert_eq!(
            Statement::Exec {
                name: "get_user".into(),
                args: vec![Arg {
                    name: Some("@id".into()),
                    value: Literal::Integer(1),
                }],
            },
            sybase("EXEC get_user @id = 1").unwrap()
        );

        assert_eq!(
            Statement::Exec {
                name: "get_user".into(),
                args: vec![Arg {
                    name: None,
                    value: Literal::Integer(1),
                }],
            },
            sybase("exec get_user 1").unwrap()
        );
    }

    #[test]
    fn binding_replaces_parameters() {
        let mut statement = sybase("UPDATE t SET name = @name WHERE id = @id").unwrap();

        let mut params = BTreeMap::new();
        params.insert("@id".to_string(), Literal::Integer(3));

        assert_eq!(Err("@name".to_string()), statement.bind(&params));

        params.insert("@name".to_string(), Literal::Text("x".into()));
        statement.bind(&params).unwrap();

        assert_eq!(
            Statement::Update {
                table: "t".into(),
                assignments: vec![("name".into(), Literal::Text("x".into()))],
                filter: vec![("id".into(), Literal::Integer(3))],
            },
            statement
        );
    }

    #[test]
    fn reports_where_parsing_stopped() {
        assert_eq!(Some("SELEC".to_string()), sybase("SELEC * FROM t").unwrap_err().near);
        assert_eq!(None, sybase("SELECT * FROM").unwrap_err().near);
        assert_eq!(Some("ALTER".to_string()), sybase("ALTER TABLE t ADD x INT").unwrap_err().near);
        assert!(oracle("EXEC get_user 1").is_err());
    }
}
