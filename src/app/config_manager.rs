//! Configuration loading: built-in defaults overlaid with an optional config file.
//!
//! The file uses a `key = value` TOML subset: double-quoted strings,
//! non-negative integers, `#` comments. Unknown keys are rejected.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use nitter_dl::ScraperConfig;
use tracing::debug;

/// Values read from the config file; `None` keeps the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FileConfig {
    pub(crate) username: Option<String>,
    pub(crate) instance: Option<String>,
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) max_pages: Option<u32>,
    pub(crate) page_delay_ms: Option<u64>,
    pub(crate) download_delay_ms: Option<u64>,
    pub(crate) timeout_secs: Option<u64>,
    pub(crate) log_filename: Option<String>,
    pub(crate) error_log_filename: Option<String>,
}

impl FileConfig {
    /// Validates numeric ranges before they reach the crawler.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(max_pages) = self.max_pages
            && !(1..=10_000).contains(&max_pages)
        {
            bail!("Invalid config value for `max_pages`: {max_pages}. Expected range: 1..=10000");
        }
        validate_delay_ms("page_delay_ms", self.page_delay_ms)?;
        validate_delay_ms("download_delay_ms", self.download_delay_ms)?;
        if let Some(timeout) = self.timeout_secs
            && !(1..=3600).contains(&timeout)
        {
            bail!("Invalid config value for `timeout_secs`: {timeout}. Expected range: 1..=3600");
        }
        Ok(())
    }

    /// Overlays file values on `base`.
    pub(crate) fn apply(self, mut base: ScraperConfig) -> ScraperConfig {
        if let Some(username) = self.username {
            base.username = username;
        }
        if let Some(instance) = self.instance {
            base.instance = instance;
        }
        if let Some(output_dir) = self.output_dir {
            base.output_dir = output_dir;
        }
        if let Some(max_pages) = self.max_pages {
            base.max_pages = max_pages;
        }
        if let Some(ms) = self.page_delay_ms {
            base.page_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.download_delay_ms {
            base.download_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = self.timeout_secs {
            base.request_timeout = Duration::from_secs(secs);
        }
        if let Some(name) = self.log_filename {
            base.log_filename = name;
        }
        if let Some(name) = self.error_log_filename {
            base.error_log_filename = name;
        }
        base
    }
}

fn validate_delay_ms(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value > 60_000 {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 0..=60000");
    }
    Ok(())
}

/// Builds the run configuration.
///
/// An explicit `--config` path must exist; the default path is optional.
pub(crate) fn resolve_config(explicit: Option<&Path>) -> Result<ScraperConfig> {
    let file_config = match explicit {
        Some(path) => Some(load_file_config(path)?),
        None => match resolve_default_config_path() {
            Some(path) if path.exists() => Some(load_file_config(&path)?),
            _ => None,
        },
    };

    let config = file_config
        .unwrap_or_default()
        .apply(ScraperConfig::default());
    config.validate().context("Invalid configuration")?;
    debug!(?config, "configuration resolved");
    Ok(config)
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/nitter-dl/config.toml`
/// 2. `$HOME/.config/nitter-dl/config.toml`
#[must_use]
pub(crate) fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("nitter-dl")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("nitter-dl")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "username" => cfg.username = Some(parse_string_literal(value).with_context(invalid)?),
            "instance" => cfg.instance = Some(parse_string_literal(value).with_context(invalid)?),
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "max_pages" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                cfg.max_pages = Some(
                    u32::try_from(parsed)
                        .map_err(|_| anyhow::anyhow!("max_pages out of range for u32"))?,
                );
            }
            "page_delay_ms" => cfg.page_delay_ms = Some(parse_integer_u64(value).with_context(invalid)?),
            "download_delay_ms" => {
                cfg.download_delay_ms = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "timeout_secs" => cfg.timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?),
            "log_filename" => {
                cfg.log_filename = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "error_log_filename" => {
                cfg.error_log_filename = Some(parse_string_literal(value).with_context(invalid)?);
            }
            unknown => bail!("Unknown configuration key: '{unknown}' on line {line_no}"),
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}
