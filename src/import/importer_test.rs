//! ConceptImporter のユニットテスト

use super::*;
use crate::concept::ConceptId;
use crate::progress::{RecordingProgress, SilentProgress};
use crate::store::{InMemoryConceptStore, SqliteConceptStore};
use proptest::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "concept_id\tconcept_name\tdomain_id\tvocabulary_id\tconcept_class_id\tstandard_concept\tconcept_code\tvalid_start_date\tvalid_end_date\tinvalid_reason";

fn row(id: &str, name: &str) -> String {
    format!("{id}\t{name}\tDrug\tRxNorm\tIngredient\tS\tcode-{id}\t19700101\t20991231\t")
}

fn concept_file(rows: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn import(store: &mut InMemoryConceptStore, path: &Path) -> Result<ImportSummary> {
    let mut progress = SilentProgress;
    ConceptImporter::new(store, &mut progress).run(path)
}

fn name_of(store: &InMemoryConceptStore, id: &str) -> String {
    store
        .get(&ConceptId::new(id))
        .map(|c| c.concept_name.clone())
        .unwrap()
}

mod upsert_tests {
    use super::*;

    #[test]
    fn first_import_creates_every_row() {
        let file = concept_file(&[row("1", "aspirin"), row("2", "ibuprofen"), row("3", "naproxen")]);
        let mut store = InMemoryConceptStore::new();

        let summary = import(&mut store, file.path()).unwrap();

        assert_eq!((summary.created, summary.updated), (3, 0));
        assert_eq!(summary.total_rows, 3);
        assert_eq!(store.len(), 3);
        assert_eq!(store.transactions_committed(), 1);
    }

    #[test]
    fn reimport_updates_in_place() {
        let first = concept_file(&[row("1", "aspirin"), row("2", "ibuprofen"), row("3", "naproxen")]);
        let second = concept_file(&[row("1", "aspirin"), row("2", "ibuprofen lysine"), row("3", "naproxen")]);
        let mut store = InMemoryConceptStore::new();

        import(&mut store, first.path()).unwrap();
        let summary = import(&mut store, second.path()).unwrap();

        assert_eq!((summary.created, summary.updated), (0, 3));
        assert_eq!(store.len(), 3);
        assert_eq!(name_of(&store, "1"), "aspirin");
        assert_eq!(name_of(&store, "2"), "ibuprofen lysine");
        assert_eq!(name_of(&store, "3"), "naproxen");
    }

    #[test]
    fn duplicate_id_within_file_counts_as_update() {
        let file = concept_file(&[row("1", "aspirin"), row("1", "acetylsalicylic acid")]);
        let mut store = InMemoryConceptStore::new();

        let summary = import(&mut store, file.path()).unwrap();

        assert_eq!((summary.created, summary.updated), (1, 1));
        assert_eq!(name_of(&store, "1"), "acetylsalicylic acid");
    }

    #[test]
    fn header_only_commits_nothing_new() {
        let file = concept_file(&[]);
        let mut store = InMemoryConceptStore::new();

        let summary = import(&mut store, file.path()).unwrap();

        assert_eq!(summary.processed(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn quoted_field_keeps_inner_tab() {
        let file = concept_file(&[
            "1\t\"aspirin\t81 mg\"\tDrug\tRxNorm\tIngredient\tS\t1191\t19700101\t20991231\t".to_string(),
        ]);
        let mut store = InMemoryConceptStore::new();

        import(&mut store, file.path()).unwrap();

        assert_eq!(name_of(&store, "1"), "aspirin\t81 mg");
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{HEADER}\r\n{}\r\n", row("1", "aspirin")).unwrap();
        file.flush().unwrap();
        let mut store = InMemoryConceptStore::new();

        let summary = import(&mut store, file.path()).unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(store.get(&ConceptId::new("1")).unwrap().invalid_reason, "");
    }
}

mod failure_tests {
    use super::*;

    #[test]
    fn missing_header_column_writes_nothing() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", HEADER.replace("\tdomain_id", "")).unwrap();
        writeln!(file, "1\taspirin\tRxNorm\tIngredient\tS\t1191\t19700101\t20991231\t").unwrap();
        file.flush().unwrap();
        let mut store = InMemoryConceptStore::new();

        let err = import(&mut store, file.path()).unwrap_err();

        assert!(matches!(err, ImportError::SchemaMismatch { .. }));
        assert_eq!(store.transactions_begun(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn empty_file_is_schema_mismatch() {
        let file = NamedTempFile::new().unwrap();
        let mut store = InMemoryConceptStore::new();

        let err = import(&mut store, file.path()).unwrap_err();

        match err {
            ImportError::SchemaMismatch { actual, .. } => assert!(actual.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.transactions_begun(), 0);
    }

    #[test]
    fn short_row_rolls_back_whole_run() {
        let seed = concept_file(&[row("1", "aspirin")]);
        let mut store = InMemoryConceptStore::new();
        import(&mut store, seed.path()).unwrap();

        let short = "4\tparacetamol\tDrug\tRxNorm\tIngredient\tS\t161\t19700101\t20991231";
        let file = concept_file(&[
            row("1", "renamed"),
            row("2", "ibuprofen"),
            short.to_string(),
            row("3", "naproxen"),
        ]);

        let err = import(&mut store, file.path()).unwrap_err();

        assert!(matches!(
            err,
            ImportError::MalformedRow {
                line: 4,
                expected: 10,
                found: 9
            }
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(name_of(&store, "1"), "aspirin");
        assert_eq!(store.transactions_committed(), 1);
    }

    #[test]
    fn bad_date_rolls_back_whole_run() {
        let file = concept_file(&[
            row("1", "aspirin"),
            "2\tibuprofen\tDrug\tRxNorm\tIngredient\tS\t5640\t2020-01-01\t20991231\t".to_string(),
        ]);
        let mut store = InMemoryConceptStore::new();

        let err = import(&mut store, file.path()).unwrap_err();

        assert!(matches!(
            err,
            ImportError::DateParse {
                line: 3,
                column: "valid_start_date",
                ..
            }
        ));
        assert!(store.is_empty());
        assert_eq!(store.transactions_begun(), 1);
        assert_eq!(store.transactions_committed(), 0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = InMemoryConceptStore::new();

        let err = import(&mut store, &dir.path().join("CONCEPT.csv")).unwrap_err();

        match err {
            ImportError::Io { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.transactions_begun(), 0);
    }

    #[test]
    fn sqlite_store_rolls_back_on_bad_row() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("vocab.sqlite3");
        let file = concept_file(&[row("1", "aspirin"), "2\tbroken".to_string()]);

        {
            let mut store = SqliteConceptStore::open(&db).unwrap();
            let mut progress = SilentProgress;
            let err = ConceptImporter::new(&mut store, &mut progress)
                .run(file.path())
                .unwrap_err();
            assert!(matches!(err, ImportError::MalformedRow { .. }));
        }

        let store = SqliteConceptStore::open(&db).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}

mod blank_line_tests {
    use super::*;

    #[test]
    fn blank_line_between_rows_rolls_back() {
        let seed = concept_file(&[row("1", "aspirin")]);
        let mut store = InMemoryConceptStore::new();
        import(&mut store, seed.path()).unwrap();

        let file = concept_file(&[row("1", "renamed"), String::new(), row("2", "ibuprofen")]);

        let err = import(&mut store, file.path()).unwrap_err();

        assert!(matches!(
            err,
            ImportError::MalformedRow {
                line: 3,
                expected: 10,
                found: 0
            }
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(name_of(&store, "1"), "aspirin");
        assert_eq!(store.transactions_committed(), 1);
    }

    #[test]
    fn trailing_blank_line_rolls_back() {
        let file = concept_file(&[row("1", "aspirin"), String::new()]);
        let mut store = InMemoryConceptStore::new();

        let err = import(&mut store, file.path()).unwrap_err();

        assert!(matches!(err, ImportError::MalformedRow { line: 3, found: 0, .. }));
        assert!(store.is_empty());
        assert_eq!(store.transactions_committed(), 0);
    }

    #[test]
    fn crlf_blank_line_rolls_back() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "{HEADER}\r\n{}\r\n\r\n{}\r\n",
            row("1", "aspirin"),
            row("2", "ibuprofen")
        )
        .unwrap();
        file.flush().unwrap();
        let mut store = InMemoryConceptStore::new();

        let err = import(&mut store, file.path()).unwrap_err();

        assert!(matches!(err, ImportError::MalformedRow { line: 3, found: 0, .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn blank_line_before_header_is_schema_mismatch() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "\n{HEADER}\n{}\n", row("1", "aspirin")).unwrap();
        file.flush().unwrap();
        let mut store = InMemoryConceptStore::new();

        let err = import(&mut store, file.path()).unwrap_err();

        match err {
            ImportError::SchemaMismatch { actual, .. } => assert!(actual.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.transactions_begun(), 0);
    }

    #[test]
    fn multiline_quoted_name_is_one_row() {
        let file = concept_file(&[
            "1\t\"aspirin\n\n81 mg\"\tDrug\tRxNorm\tIngredient\tS\t1191\t19700101\t20991231\t".to_string(),
            row("2", "ibuprofen"),
        ]);
        let mut store = InMemoryConceptStore::new();

        let summary = import(&mut store, file.path()).unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(name_of(&store, "1"), "aspirin\n\n81 mg");
    }

    #[test]
    fn sqlite_store_rolls_back_on_blank_line() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("vocab.sqlite3");
        let file = concept_file(&[row("1", "aspirin"), String::new(), row("2", "ibuprofen")]);

        {
            let mut store = SqliteConceptStore::open(&db).unwrap();
            let mut progress = SilentProgress;
            let err = ConceptImporter::new(&mut store, &mut progress)
                .run(file.path())
                .unwrap_err();
            assert!(matches!(err, ImportError::MalformedRow { found: 0, .. }));
        }

        let store = SqliteConceptStore::open(&db).unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }
}

mod progress_tests {
    use super::*;

    #[test]
    fn reports_every_500_rows_from_zero() {
        let rows: Vec<String> = (0..1201).map(|i| row(&i.to_string(), "x")).collect();
        let file = concept_file(&rows);
        let mut store = InMemoryConceptStore::new();
        let mut progress = RecordingProgress::default();

        ConceptImporter::new(&mut store, &mut progress)
            .run(file.path())
            .unwrap();

        let positions: Vec<u64> = progress.reports.iter().map(|r| r.0).collect();
        assert_eq!(positions, vec![0, 500, 1000]);
        assert!(progress.reports.iter().all(|r| r.1 == 1201));
        assert_eq!(progress.reports[2].2, PROGRESS_PREFIX);
        assert_eq!(progress.reports[2].3, "1,000/1,201");
        assert!(progress.finished);
    }

    #[test]
    fn custom_interval() {
        let rows: Vec<String> = (0..5).map(|i| row(&i.to_string(), "x")).collect();
        let file = concept_file(&rows);
        let mut store = InMemoryConceptStore::new();
        let mut progress = RecordingProgress::default();

        ConceptImporter::new(&mut store, &mut progress)
            .with_progress_interval(2)
            .run(file.path())
            .unwrap();

        let positions: Vec<u64> = progress.reports.iter().map(|r| r.0).collect();
        assert_eq!(positions, vec![0, 2, 4]);
    }

    #[test]
    fn progress_finished_on_failure() {
        let file = concept_file(&["1\tbroken".to_string()]);
        let mut store = InMemoryConceptStore::new();
        let mut progress = RecordingProgress::default();

        let result = ConceptImporter::new(&mut store, &mut progress).run(file.path());

        assert!(result.is_err());
        assert!(progress.finished);
        assert!(progress.reports.is_empty());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_created_plus_updated_equals_rows(ids in prop::collection::vec(0u32..20, 0..40)) {
        let rows: Vec<String> = ids.iter().map(|id| row(&id.to_string(), "x")).collect();
        let file = concept_file(&rows);
        let mut store = InMemoryConceptStore::new();

        let summary = import(&mut store, file.path()).unwrap();

        let distinct: std::collections::BTreeSet<_> = ids.iter().collect();
        prop_assert_eq!(summary.processed(), ids.len() as u64);
        prop_assert_eq!(summary.created, distinct.len() as u64);
        prop_assert_eq!(store.len(), distinct.len());
    }

    #[test]
    fn prop_second_run_only_updates(ids in prop::collection::btree_set(0u32..1000, 1..30)) {
        let rows: Vec<String> = ids.iter().map(|id| row(&id.to_string(), "x")).collect();
        let file = concept_file(&rows);
        let mut store = InMemoryConceptStore::new();

        let first = import(&mut store, file.path()).unwrap();
        let second = import(&mut store, file.path()).unwrap();

        prop_assert_eq!((first.created, first.updated), (ids.len() as u64, 0));
        prop_assert_eq!((second.created, second.updated), (0, ids.len() as u64));
    }
}
