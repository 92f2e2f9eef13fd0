use serde::{Deserialize, Serialize};
use std::{
  env,
  fs,
  path::{Path, PathBuf},
};

pub const CONFIG_FILE_NAME: &str = "brackets.json";

/// Where the runner reads its snapshot from and writes its report to.
/// Empty strings mean "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RunnerConfig {
  pub snapshot_path: String,
  /// Report destination; stdout when empty
  pub output_path: String,
  /// Daily rolling log files go here; stderr when empty
  pub log_dir: String,
  pub pretty: bool,
}

impl RunnerConfig {
  /// A snapshot path given on the command line beats config and environment.
  pub fn with_snapshot_arg(mut self, arg: Option<String>) -> Self {
    if let Some(path) = arg.map(|raw| raw.trim().to_string()).filter(|raw| !raw.is_empty()) {
      self.snapshot_path = path;
    }
    self
  }

  pub fn output_file(&self) -> Option<PathBuf> {
    non_empty_path(&self.output_path)
  }

  pub fn log_directory(&self) -> Option<PathBuf> {
    non_empty_path(&self.log_dir)
  }
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    None
  } else {
    Some(PathBuf::from(trimmed))
  }
}

pub fn config_path() -> PathBuf {
  env_default("BRACKETS_CONFIG_PATH")
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

pub fn env_default(key: &str) -> Option<String> {
  clean_value(env::var(key).ok())
}

fn clean_value(raw: Option<String>) -> Option<String> {
  raw
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

fn flag_true(raw: &str) -> bool {
  let value = raw.trim().to_ascii_lowercase();
  matches!(value.as_str(), "1" | "true" | "yes" | "on")
}

pub fn apply_env_defaults(config: RunnerConfig) -> RunnerConfig {
  apply_env_defaults_with(config, |key| env::var(key).ok())
}

/// Fill every unset field from `lookup`. Values already present in the
/// config file are kept.
pub fn apply_env_defaults_with(mut config: RunnerConfig, lookup: impl Fn(&str) -> Option<String>) -> RunnerConfig {
  if config.snapshot_path.trim().is_empty() {
    if let Some(value) = clean_value(lookup("LEAGUE_SNAPSHOT_PATH")) {
      config.snapshot_path = value;
    }
  }
  if config.output_path.trim().is_empty() {
    if let Some(value) = clean_value(lookup("BRACKETS_OUTPUT_PATH")) {
      config.output_path = value;
    }
  }
  if config.log_dir.trim().is_empty() {
    if let Some(value) = clean_value(lookup("BRACKETS_LOG_DIR")) {
      config.log_dir = value;
    }
  }
  if !config.pretty {
    config.pretty = lookup("BRACKETS_PRETTY").map(|value| flag_true(&value)).unwrap_or(false);
  }
  config
}

pub fn load_runner_config() -> Result<RunnerConfig, String> {
  load_runner_config_from(&config_path()).map(apply_env_defaults)
}

/// Parse the config file at `path`. A missing file is an empty config.
pub fn load_runner_config_from(path: &Path) -> Result<RunnerConfig, String> {
  if !path.is_file() {
    return Ok(RunnerConfig::default());
  }
  let data = fs::read_to_string(path).map_err(|e| format!("read config {}: {e}", path.display()))?;
  serde_json::from_str::<RunnerConfig>(&data).map_err(|e| format!("parse config {}: {e}", path.display()))
}

/// Export `KEY=value` lines from `<dir>/.env`. Variables the shell already
/// set win, and so does the first line for a repeated key.
pub fn load_env_file(dir: &Path) {
  let Ok(contents) = fs::read_to_string(dir.join(".env")) else {
    return;
  };
  contents
    .lines()
    .filter_map(parse_env_line)
    .filter(|(key, _)| env::var_os(key).is_none())
    .for_each(|(key, value)| env::set_var(key, value));
}

/// One `.env` line as `(key, value)`. Blank lines, comments and lines without
/// a key give `None`.
pub fn parse_env_line(line: &str) -> Option<(String, String)> {
  let line = line.trim();
  if line.starts_with('#') {
    return None;
  }
  let (key, raw) = line.strip_prefix("export ").unwrap_or(line).split_once('=')?;
  let key = key.trim();
  if key.is_empty() {
    return None;
  }
  Some((key.to_string(), env_value(raw.trim()).to_string()))
}

/// Quoted values are taken verbatim; bare values stop at a `#` comment.
fn env_value(raw: &str) -> &str {
  ['"', '\'']
    .into_iter()
    .find_map(|quote| raw.strip_prefix(quote)?.strip_suffix(quote))
    .unwrap_or_else(|| raw.split('#').next().unwrap_or_default().trim_end())
}
