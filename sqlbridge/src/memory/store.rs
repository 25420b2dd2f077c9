use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use super::parser::{Arg, ColumnDef, ColumnType, Filter, Literal, ParseError, Projection, Statement};
use crate::{
    config::DriverKind,
    native::{NativeError, NativeValue},
};

/// Sybase refuses deeper procedure calls.
const MAX_NESTING: usize = 16;

/// Tables and stored procedures, keyed by their lowercased name.
#[derive(Debug, Clone, Default)]
pub(crate) struct Database {
    pub(crate) tables: BTreeMap<String, Table>,
    pub(crate) procedures: BTreeMap<String, Procedure>,
}

#[derive(Debug, Clone)]
pub(crate) struct Table {
    pub(crate) name: String,
    pub(crate) columns: Vec<ColumnDef>,
    pub(crate) rows: Vec<Vec<NativeValue>>,
}

impl Table {
    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name.eq_ignore_ascii_case(column))
    }

    fn primary_key(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.primary_key)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Procedure {
    pub(crate) name: String,
    pub(crate) params: Vec<String>,
    pub(crate) body: Vec<Statement>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RowSet {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<NativeValue>>,
}

/// What a statement produced against the store. A procedure yields one
/// row set per query in its body.
#[derive(Debug)]
pub(crate) enum Output {
    Count(u64),
    Rows(Vec<RowSet>),
}

/// Native codes and message texts of one vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Dialect {
    pub(crate) kind: DriverKind,
}

impl Dialect {
    pub(crate) fn syntax(self, err: &ParseError) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(900, "invalid SQL statement"),
            DriverKind::Sybase => {
                let near = err.near.as_deref().unwrap_or("end of statement");
                NativeError::new(102, format!("Incorrect syntax near '{near}'."))
            }
        }
    }

    fn no_table(self, name: &str) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(942, "table or view does not exist"),
            DriverKind::Sybase => NativeError::new(
                208,
                format!("{name} not found. Specify owner.objectname or use sp_help to check whether the object exists."),
            ),
        }
    }

    fn no_column(self, name: &str) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(904, format!("\"{}\": invalid identifier", name.to_uppercase())),
            DriverKind::Sybase => NativeError::new(207, format!("Invalid column name '{name}'.")),
        }
    }

    fn name_in_use(self, name: &str) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(955, "name is already used by an existing object"),
            DriverKind::Sybase => NativeError::new(
                2714,
                format!("There is already an object named '{name}' in the database."),
            ),
        }
    }

    fn duplicate_key(self, table: &Table) -> NativeError {
        let index = format!("{}_pk", table.name);

        match self.kind {
            DriverKind::Oracle => NativeError::new(1, format!("unique constraint ({}) violated", index.to_uppercase())),
            DriverKind::Sybase => NativeError::new(
                2601,
                format!(
                    "Attempt to insert duplicate key row in object '{}' with unique index '{index}'",
                    table.name
                ),
            ),
        }
    }

    fn null_violation(self, table: &Table, column: &ColumnDef) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(
                1400,
                format!(
                    "cannot insert NULL into (\"{}\".\"{}\")",
                    table.name.to_uppercase(),
                    column.name.to_uppercase()
                ),
            ),
            DriverKind::Sybase => NativeError::new(
                233,
                format!(
                    "The column {} in table {} does not allow null values.",
                    column.name, table.name
                ),
            ),
        }
    }

    fn value_count(self) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(947, "not enough values"),
            DriverKind::Sybase => NativeError::new(
                213,
                "Insert error: column name or number of supplied values does not match table definition.",
            ),
        }
    }

    fn type_mismatch(self, column: &ColumnDef) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(932, "inconsistent datatypes"),
            DriverKind::Sybase => NativeError::new(
                257,
                format!("Implicit conversion to column '{}' is not allowed.", column.name),
            ),
        }
    }

    fn undeclared(self, param: &str) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(1008, "not all variables bound"),
            DriverKind::Sybase => NativeError::new(137, format!("Must declare variable '{param}'.")),
        }
    }

    fn no_procedure(self, name: &str) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(
                6550,
                format!("PLS-00201: identifier '{}' must be declared", name.to_uppercase()),
            ),
            DriverKind::Sybase => NativeError::new(
                2812,
                format!(
                    "Stored procedure '{name}' not found. Specify owner.objectname or use sp_help to check whether the object exists."
                ),
            ),
        }
    }

    fn missing_argument(self, procedure: &Procedure, param: &str) -> NativeError {
        match self.kind {
            DriverKind::Oracle => self.wrong_arguments(procedure),
            DriverKind::Sybase => NativeError::new(
                201,
                format!(
                    "Procedure {} expects parameter {param}, which was not supplied.",
                    procedure.name
                ),
            ),
        }
    }

    fn unknown_argument(self, procedure: &Procedure, param: &str) -> NativeError {
        match self.kind {
            DriverKind::Oracle => self.wrong_arguments(procedure),
            DriverKind::Sybase => NativeError::new(
                8145,
                format!("{param} is not a parameter for procedure {}.", procedure.name),
            ),
        }
    }

    fn too_many_arguments(self, procedure: &Procedure) -> NativeError {
        match self.kind {
            DriverKind::Oracle => self.wrong_arguments(procedure),
            DriverKind::Sybase => NativeError::new(
                8144,
                format!("Procedure {} has too many arguments specified.", procedure.name),
            ),
        }
    }

    fn wrong_arguments(self, procedure: &Procedure) -> NativeError {
        NativeError::new(
            6550,
            format!(
                "PLS-00306: wrong number or types of arguments in call to '{}'",
                procedure.name.to_uppercase()
            ),
        )
    }

    fn nesting_exceeded(self) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(36, "maximum number of recursive SQL levels (50) exceeded"),
            DriverKind::Sybase => NativeError::new(
                217,
                format!("Maximum stored procedure nesting level exceeded (limit {MAX_NESTING})."),
            ),
        }
    }

    /// Oracle commits the open transaction around every DDL statement.
    pub(crate) fn commits_ddl(self) -> bool {
        self.kind == DriverKind::Oracle
    }

    pub(crate) fn connection_lost(self) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(3113, "end-of-file on communication channel"),
            DriverKind::Sybase => NativeError::new(20047, "DBPROCESS is dead or not enabled."),
        }
    }

    pub(crate) fn login_failed(self) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(1017, "invalid username/password; logon denied"),
            DriverKind::Sybase => NativeError::new(4002, "Login failed."),
        }
    }

    pub(crate) fn unreachable(self) -> NativeError {
        match self.kind {
            DriverKind::Oracle => NativeError::new(12541, "TNS:no listener"),
            DriverKind::Sybase => NativeError::new(20009, "Unable to connect: Adaptive Server is unavailable or does not exist."),
        }
    }

    /// Column names as the server reports them.
    fn column_label(self, name: &str) -> String {
        match self.kind {
            DriverKind::Oracle => name.to_uppercase(),
            DriverKind::Sybase => name.to_string(),
        }
    }

    /// Integers as the client library hands them back.
    fn integer(self, value: i64) -> NativeValue {
        match self.kind {
            DriverKind::Oracle => NativeValue::Decimal(value.to_string()),
            DriverKind::Sybase => NativeValue::Integer(value),
        }
    }
}

/// Runs statements against a database.
pub(crate) struct Engine<'a> {
    dialect: Dialect,
    db: &'a mut Database,
    depth: usize,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(dialect: Dialect, db: &'a mut Database) -> Self {
        Self { dialect, db, depth: 0 }
    }

    /// Runs a statement sent by a client, which has no parameters in scope.
    pub(crate) fn run(&mut self, mut statement: Statement) -> Result<Output, NativeError> {
        let dialect = self.dialect;

        statement
            .bind(&BTreeMap::new())
            .map_err(|param| dialect.undeclared(&param))?;

        self.execute(statement)
    }

    fn execute(&mut self, statement: Statement) -> Result<Output, NativeError> {
        match statement {
            Statement::CreateTable { name, columns } => self.create_table(name, columns),
            Statement::DropTable { name } => self.drop_table(&name),
            Statement::Insert { table, columns, values } => self.insert(&table, columns, values),
            Statement::Select {
                table,
                projection,
                filter,
            } => self.select(&table, projection, &filter),
            Statement::Update {
                table,
                assignments,
                filter,
            } => self.update(&table, assignments, &filter),
            Statement::Delete { table, filter } => self.delete(&table, &filter),
            Statement::CreateProcedure { name, params, body } => self.create_procedure(name, params, body),
            Statement::Exec { name, args } => self.exec(&name, args),
            Statement::Set => Ok(Output::Count(0)),
        }
    }

    fn table(&self, name: &str) -> Result<&Table, NativeError> {
        self.db
            .tables
            .get(&name.to_lowercase())
            .ok_or_else(|| self.dialect.no_table(name))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut Table, NativeError> {
        let dialect = self.dialect;

        self.db
            .tables
            .get_mut(&name.to_lowercase())
            .ok_or_else(|| dialect.no_table(name))
    }

    fn name_taken(&self, key: &str) -> bool {
        self.db.tables.contains_key(key) || self.db.procedures.contains_key(key)
    }

    fn create_table(&mut self, name: String, columns: Vec<ColumnDef>) -> Result<Output, NativeError> {
        let key = name.to_lowercase();

        if self.name_taken(&key) {
            return Err(self.dialect.name_in_use(&name));
        }

        self.db.tables.insert(
            key,
            Table {
                name,
                columns,
                rows: Vec::new(),
            },
        );

        Ok(Output::Count(0))
    }

    fn drop_table(&mut self, name: &str) -> Result<Output, NativeError> {
        let key = name.to_lowercase();

        match self.db.tables.remove(&key) {
            Some(_) => Ok(Output::Count(0)),
            None => Err(self.dialect.no_table(name)),
        }
    }

    fn insert(
        &mut self,
        table: &str,
        columns: Option<Vec<String>>,
        values: Vec<Literal>,
    ) -> Result<Output, NativeError> {
        let dialect = self.dialect;
        let table = self.table_mut(table)?;

        let positions = match columns {
            Some(columns) => columns
                .iter()
                .map(|c| table.position(c).ok_or_else(|| dialect.no_column(c)))
                .collect::<Result<Vec<_>, _>>()?,
            None => (0..table.columns.len()).collect(),
        };

        if positions.len() != values.len() {
            return Err(dialect.value_count());
        }

        let mut row = vec![NativeValue::Null; table.columns.len()];

        for (position, literal) in positions.into_iter().zip(values) {
            row[position] = coerce(dialect, &table.columns[position], literal)?;
        }

        check_row(dialect, table, &row, None)?;
        table.rows.push(row);

        Ok(Output::Count(1))
    }

    fn select(&self, table: &str, projection: Projection, filter: &Filter) -> Result<Output, NativeError> {
        let dialect = self.dialect;
        let table = self.table(table)?;
        let filter = resolve_filter(dialect, table, filter)?;

        let positions = match projection {
            Projection::All => (0..table.columns.len()).collect(),
            Projection::Columns(columns) => columns
                .iter()
                .map(|c| table.position(c).ok_or_else(|| dialect.no_column(c)))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let columns = positions
            .iter()
            .map(|&p| dialect.column_label(&table.columns[p].name))
            .collect();

        let rows = table
            .rows
            .iter()
            .filter(|row| matches(row, &filter))
            .map(|row| positions.iter().map(|&p| row[p].clone()).collect())
            .collect();

        Ok(Output::Rows(vec![RowSet { columns, rows }]))
    }

    fn update(
        &mut self,
        table: &str,
        assignments: Vec<(String, Literal)>,
        filter: &Filter,
    ) -> Result<Output, NativeError> {
        let dialect = self.dialect;
        let table = self.table_mut(table)?;
        let filter = resolve_filter(dialect, table, filter)?;

        let assignments = assignments
            .into_iter()
            .map(|(column, literal)| {
                let position = table.position(&column).ok_or_else(|| dialect.no_column(&column))?;
                let value = coerce(dialect, &table.columns[position], literal)?;
                Ok((position, value))
            })
            .collect::<Result<Vec<_>, NativeError>>()?;

        let targets: Vec<usize> = (0..table.rows.len())
            .filter(|&i| matches(&table.rows[i], &filter))
            .collect();

        // Validate every changed row before touching any of them.
        let mut updated = Vec::with_capacity(targets.len());

        for &i in &targets {
            let mut row = table.rows[i].clone();

            for (position, value) in &assignments {
                row[*position] = value.clone();
            }

            updated.push((i, row));
        }

        for (i, row) in &updated {
            check_row(dialect, table, row, Some(*i))?;
        }

        if let Some(pk) = table.primary_key() {
            let keys: BTreeSet<_> = updated.iter().map(|(_, row)| key_of(&row[pk])).collect();

            if keys.len() < updated.len() {
                return Err(dialect.duplicate_key(table));
            }
        }

        let count = updated.len() as u64;

        for (i, row) in updated {
            table.rows[i] = row;
        }

        Ok(Output::Count(count))
    }

    fn delete(&mut self, table: &str, filter: &Filter) -> Result<Output, NativeError> {
        let dialect = self.dialect;
        let table = self.table_mut(table)?;
        let filter = resolve_filter(dialect, table, filter)?;

        let before = table.rows.len();
        table.rows.retain(|row| !matches(row, &filter));

        Ok(Output::Count((before - table.rows.len()) as u64))
    }

    fn create_procedure(&mut self, name: String, params: Vec<String>, body: Vec<Statement>) -> Result<Output, NativeError> {
        let key = name.to_lowercase();

        if self.name_taken(&key) {
            return Err(self.dialect.name_in_use(&name));
        }

        self.db.procedures.insert(key, Procedure { name, params, body });

        Ok(Output::Count(0))
    }

    /// Binds `args` to the procedure's parameters and runs its body. Row
    /// counts of the body add up unless it produced rows.
    fn exec(&mut self, name: &str, args: Vec<Arg>) -> Result<Output, NativeError> {
        let dialect = self.dialect;

        let procedure = self
            .db
            .procedures
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| dialect.no_procedure(name))?;

        if args.len() > procedure.params.len() {
            return Err(dialect.too_many_arguments(&procedure));
        }

        if self.depth >= MAX_NESTING {
            return Err(dialect.nesting_exceeded());
        }

        let mut bound = BTreeMap::new();

        for (position, arg) in args.into_iter().enumerate() {
            let param = match arg.name {
                Some(param) if procedure.params.contains(&param) => param,
                Some(param) => return Err(dialect.unknown_argument(&procedure, &param)),
                None => procedure.params[position].clone(),
            };

            bound.insert(param, arg.value);
        }

        if let Some(missing) = procedure.params.iter().find(|param| !bound.contains_key(*param)) {
            return Err(dialect.missing_argument(&procedure, missing));
        }

        let mut sets = Vec::new();
        let mut count = 0;

        self.depth += 1;

        let result: Result<(), NativeError> = procedure.body.into_iter().try_for_each(|mut statement| {
            statement.bind(&bound).map_err(|param| dialect.undeclared(&param))?;

            match self.execute(statement)? {
                Output::Count(n) => count += n,
                Output::Rows(mut produced) => sets.append(&mut produced),
            }

            Ok(())
        });

        self.depth -= 1;
        result?;

        match sets.is_empty() {
            true => Ok(Output::Count(count)),
            false => Ok(Output::Rows(sets)),
        }
    }
}

fn resolve_filter(
    dialect: Dialect,
    table: &Table,
    filter: &Filter,
) -> Result<Vec<(usize, NativeValue)>, NativeError> {
    filter
        .iter()
        .map(|(column, literal)| {
            let position = table.position(column).ok_or_else(|| dialect.no_column(column))?;
            let value = coerce(dialect, &table.columns[position], literal.clone())?;
            Ok((position, value))
        })
        .collect()
}

/// NULL never compares equal.
fn matches(row: &[NativeValue], filter: &[(usize, NativeValue)]) -> bool {
    filter
        .iter()
        .all(|(position, value)| *value != NativeValue::Null && row[*position] == *value)
}

fn key_of(value: &NativeValue) -> String {
    format!("{value:?}")
}

/// Constraint checks for `row`, which replaces row `replacing` if given.
fn check_row(dialect: Dialect, table: &Table, row: &[NativeValue], replacing: Option<usize>) -> Result<(), NativeError> {
    for (column, value) in table.columns.iter().zip(row) {
        if column.not_null && *value == NativeValue::Null {
            return Err(dialect.null_violation(table, column));
        }
    }

    if let Some(pk) = table.primary_key() {
        let duplicate = table
            .rows
            .iter()
            .enumerate()
            .any(|(i, existing)| Some(i) != replacing && existing[pk] == row[pk]);

        if duplicate {
            return Err(dialect.duplicate_key(table));
        }
    }

    Ok(())
}

fn coerce(dialect: Dialect, column: &ColumnDef, literal: Literal) -> Result<NativeValue, NativeError> {
    let value = match (column.ty, literal) {
        (_, Literal::Null) => NativeValue::Null,
        (ColumnType::Integer, Literal::Integer(i)) => dialect.integer(i),
        (ColumnType::Integer, Literal::Text(s)) => match s.trim().parse::<i64>() {
            Ok(i) => dialect.integer(i),
            Err(_) => return Err(dialect.type_mismatch(column)),
        },
        // Oracle treats the empty string as NULL.
        (ColumnType::Text, Literal::Text(s)) if s.is_empty() && dialect.kind == DriverKind::Oracle => NativeValue::Null,
        (ColumnType::Text, Literal::Text(s)) => NativeValue::Char(s),
        (ColumnType::Text, Literal::Integer(i)) => NativeValue::Char(i.to_string()),
        (ColumnType::Date, Literal::Timestamp(at)) => NativeValue::DateTime(at),
        (ColumnType::Date, Literal::Text(s)) => match parse_date(&s) {
            Some(dt) => NativeValue::DateTime(dt),
            None => return Err(dialect.type_mismatch(column)),
        },
        _ => return Err(dialect.type_mismatch(column)),
    };

    Ok(value)
}

/// The server clock, to the second.
pub(crate) fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn parse_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0))
}
