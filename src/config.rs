//! インポート設定
//!
//! 優先順位: コマンドライン引数 > 環境変数 > 設定ファイル(TOML) > デフォルト値

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATABASE: &str = "omop.sqlite3";
pub const DEFAULT_PROGRESS_INTERVAL: usize = 500;

pub const DATABASE_ENV: &str = "OMOP_IMPORT_DATABASE";
pub const PROGRESS_INTERVAL_ENV: &str = "OMOP_IMPORT_PROGRESS_INTERVAL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// 設定ファイルの内容（全キー省略可）
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub database: Option<PathBuf>,
    pub progress_interval: Option<usize>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// コマンドラインから渡される上書き値
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

/// 解決済みのインポート設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// SQLite データベースのパス
    pub database: PathBuf,
    /// 進捗を報告する行間隔（1以上）
    pub progress_interval: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl ImportConfig {
    /// プロセス環境変数を使って設定を解決
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let file = match &overrides.config_file {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        Self::resolve_with(overrides, file, env_value)
    }

    /// 環境変数の取得元を差し替え可能な解決処理（テスト用）
    fn resolve_with(
        overrides: &ConfigOverrides,
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database = overrides
            .database
            .clone()
            .or_else(|| env(DATABASE_ENV).map(PathBuf::from))
            .or(file.database)
            .unwrap_or(defaults.database);

        let progress_interval = match env(PROGRESS_INTERVAL_ENV) {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "progress_interval",
                    value: raw.clone(),
                })?,
            None => file
                .progress_interval
                .unwrap_or(defaults.progress_interval),
        };

        if progress_interval == 0 {
            return Err(ConfigError::InvalidValue {
                key: "progress_interval",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database,
            progress_interval,
        })
    }
}

/// 環境変数を取得（空文字列はNoneとして扱う）
fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
