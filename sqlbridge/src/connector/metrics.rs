use std::time::Instant;

use crate::config::DriverKind;

pub(crate) fn statement(driver: DriverKind, sql: &str, start: Instant) {
    tracing::debug!(
        driver = driver.as_str(),
        sql,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "statement sent"
    );
}

pub(crate) fn connect<F, T>(driver: DriverKind, f: F) -> T
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let res = f();

    tracing::debug!(
        driver = driver.as_str(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "session created"
    );

    res
}
