//! OMOP CONCEPT インポート
//!
//! タブ区切りファイル → ヘッダー検証 → 行パース → upsert → 集計 → 進捗通知

mod count;
mod header;
mod importer;
mod lines;
mod row;

pub use importer::{ConceptImporter, ImportSummary};
