use anyhow::{Context, Result};
use cashflow_core::time::{DEFAULT_TIMEZONE, parse_timezone};
use cashflow_ingest::{MpesaParser, SavingsProvider, UnrecognizedPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_cashflow_home;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub parser: ParserSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSection {
    /// IANA timezone used for "today" when a message carries no date
    pub timezone: String,
    /// Counterparty substrings that mark a transfer as a savings deposit
    pub savings_tokens: Vec<String>,
    pub unrecognized: UnrecognizedPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// tracing-subscriber filter directive, overridden by RUST_LOG
    pub filter: String,
}

impl Default for ParserSection {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            savings_tokens: SavingsProvider::default().tokens().to_vec(),
            unrecognized: UnrecognizedPolicy::default(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

impl Config {
    /// Parser configured from this file, on the wall clock.
    pub fn build_parser(&self) -> Result<MpesaParser> {
        let tz = parse_timezone(&self.parser.timezone).context("config [parser].timezone")?;
        Ok(MpesaParser::new()
            .timezone(tz)
            .savings_provider(SavingsProvider::new(&self.parser.savings_tokens))
            .policy(self.parser.unrecognized))
    }
}

/// Keys a config file may set. Anything absent falls back to `Config::default()`.
const KNOWN_KEYS: [(&str, &str); 4] = [
    ("parser", "timezone"),
    ("parser", "savings_tokens"),
    ("parser", "unrecognized"),
    ("logging", "filter"),
];

/// Effective config plus the dotted keys that were not set in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: Config,
    pub defaulted: Vec<String>,
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_cashflow_home()?.join("config.toml"))
}

fn defaulted_keys(table: &toml::Table) -> Vec<String> {
    KNOWN_KEYS
        .iter()
        .filter(|(section, key)| {
            table
                .get(*section)
                .and_then(|v| v.as_table())
                .is_none_or(|t| !t.contains_key(*key))
        })
        .map(|(section, key)| format!("{section}.{key}"))
        .collect()
}

/// Parse config text, noting which keys came from defaults.
pub fn parse_config(text: &str) -> Result<LoadedConfig> {
    let table: toml::Table = toml::from_str(text)?;
    let defaulted = defaulted_keys(&table);
    let config: Config = toml::Value::Table(table).try_into()?;
    Ok(LoadedConfig { config, defaulted })
}

pub fn load_config() -> Result<LoadedConfig> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(LoadedConfig {
            config: Config::default(),
            defaulted: defaulted_keys(&toml::Table::new()),
        });
    }
    let text = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&text).with_context(|| format!("parse {}", p.display()))
}

/// Write the default config unless one exists. Returns the path and whether
/// a file was written.
pub fn init_config() -> Result<(PathBuf, bool)> {
    let p = config_path()?;
    if p.exists() {
        return Ok((p, false));
    }
    let text = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(&p, text).with_context(|| format!("write {}", p.display()))?;
    Ok((p, true))
}
