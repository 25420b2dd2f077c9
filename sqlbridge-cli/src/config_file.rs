use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use sqlbridge::{ConnectionConfig, DriverKind};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    connection: ConnectionSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConnectionSection {
    driver: String,
    host: String,
    port: Option<u16>,
    service: String,
    username: String,
    password: String,
}

/// Read a `[connection]` table from a TOML file.
pub(crate) fn load(path: &Path) -> anyhow::Result<ConnectionConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("Error reading {}", path.display()))?;
    parse(&contents).with_context(|| format!("Error parsing {}", path.display()))
}

pub(crate) fn parse(contents: &str) -> anyhow::Result<ConnectionConfig> {
    let file: ConfigFile = toml::from_str(contents)?;
    let section = file.connection;

    let kind: DriverKind = section.driver.parse()?;

    Ok(ConnectionConfig::builder(kind)
        .host(section.host)
        .port(section.port.unwrap_or_else(|| kind.default_port()))
        .service(section.service)
        .username(section.username)
        .password(section.password)
        .build())
}
