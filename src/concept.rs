//! OMOP CONCEPT レコード
//!
//! 語彙ファイルの1行に対応するドメイン型と、`YYYYMMDD` 形式の日付パース。

mod date;

pub use date::{parse_omop_date, DateParseError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// CONCEPT の自然キー
///
/// ファイル上の値をトリム済み文字列のまま保持する。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(String);

impl ConceptId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 語彙コンセプト1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub concept_id: ConceptId,
    pub concept_code: String,
    pub concept_name: String,
    pub standard_concept: String,
    /// 有効開始日（UTC 0時）
    pub valid_start_date: DateTime<Utc>,
    /// 有効終了日（UTC 0時）
    pub valid_end_date: DateTime<Utc>,
    pub invalid_reason: String,
}
