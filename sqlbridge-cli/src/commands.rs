use std::{io::Write, path::Path, sync::Arc};

use anyhow::Context;
use sqlbridge::{
    memory::MemoryLibrary, ConnectionConfig, ConnectionFactory, ConnectionHandle, DriverKind, StatementRequest,
    StatementSummary,
};

use crate::{
    config_file,
    render::{self, OutputFormat},
    script,
};

/// Resolve the connection: `--url` wins over `--config`, which wins over
/// `DATABASE_URL`.
pub(crate) fn connection_config(
    url: Option<&str>,
    config: Option<&Path>,
    env_url: Option<String>,
) -> anyhow::Result<ConnectionConfig> {
    match (url, config, env_url) {
        (Some(url), _, _) => Ok(ConnectionConfig::from_url(url)?),
        (None, Some(path), _) => config_file::load(path),
        (None, None, Some(url)) => {
            ConnectionConfig::from_url(&url).context("Error parsing the DATABASE_URL environment variable")
        }
        (None, None, None) => anyhow::bail!("No connection given: pass --url or --config, or set DATABASE_URL"),
    }
}

/// The native libraries this build ships with: the in-memory ones only.
/// Any host accepts the connection, and each run starts from an empty
/// store that is gone when the process exits.
pub(crate) fn factory() -> ConnectionFactory {
    ConnectionFactory::new()
        .with_library(DriverKind::Oracle, Arc::new(MemoryLibrary::new(DriverKind::Oracle)))
        .with_library(DriverKind::Sybase, Arc::new(MemoryLibrary::new(DriverKind::Sybase)))
}

/// Run `f` on a fresh connection, closing it whatever `f` returns.
fn with_connection<T>(
    factory: &ConnectionFactory,
    config: ConnectionConfig,
    f: impl FnOnce(&mut ConnectionHandle) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let mut conn = factory.open(config)?;
    let result = f(&mut conn);
    conn.close();

    result
}

pub(crate) fn ping(factory: &ConnectionFactory, config: ConnectionConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    let vendor = match config.driver_kind() {
        DriverKind::Oracle => "Oracle",
        DriverKind::Sybase => "Sybase",
    };

    let message = format!(
        "Successfully connected to {vendor} database {} at {}:{}",
        config.service(),
        config.host(),
        config.port()
    );

    with_connection(factory, config, |_| Ok(()))?;
    writeln!(out, "{message}")?;

    Ok(())
}

/// Run every statement on one connection. Without `transaction` each
/// mutation is committed on its own.
pub(crate) fn exec(
    factory: &ConnectionFactory,
    config: ConnectionConfig,
    statements: &[String],
    transaction: bool,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let requests: Vec<StatementRequest> = statements.iter().map(|sql| script::request(sql.as_str())).collect();

    let summaries = with_connection(factory, config, |conn| {
        if transaction {
            return Ok(conn.run_script(&requests)?);
        }

        requests
            .iter()
            .map(|request| -> anyhow::Result<StatementSummary> {
                let summary = conn.execute(request)?.into_summary()?;

                if let StatementSummary::RowsAffected(_) = summary {
                    conn.commit()?;
                }

                Ok(summary)
            })
            .collect()
    })?;

    print(&summaries, format, out)
}

/// Run a script file as one transaction scope.
pub(crate) fn run_script(
    factory: &ConnectionFactory,
    config: ConnectionConfig,
    contents: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let requests: Vec<_> = script::split(contents).into_iter().map(script::request).collect();

    if requests.is_empty() {
        anyhow::bail!("The script contains no statements");
    }

    let summaries = with_connection(factory, config, |conn| Ok(conn.run_script(&requests)?))?;

    print(&summaries, format, out)
}

fn print(summaries: &[StatementSummary], format: OutputFormat, out: &mut dyn Write) -> anyhow::Result<()> {
    for summary in summaries {
        writeln!(out, "{}", render::render(summary, format)?)?;
    }

    Ok(())
}

/// The message for stderr. Database errors show their kind and, when
/// known, the native code and message.
pub(crate) fn report(err: &anyhow::Error) -> String {
    let db_err = match err.downcast_ref::<sqlbridge::Error>() {
        Some(db_err) => db_err,
        None => return format!("error: {err:#}"),
    };

    let mut message = format!("error[{}]: {db_err}", db_err.kind().name());

    if let Some(native) = db_err.original_message() {
        let code = db_err.original_code().unwrap_or("?");
        message.push_str(&format!("\n  native: {code}: {native}"));
    }

    message
}
