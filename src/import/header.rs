use crate::error::{ImportError, Result};

/// Column order of an Athena `CONCEPT.csv` export
pub const EXPECTED_COLUMNS: [&str; 10] = [
    "concept_id",
    "concept_name",
    "domain_id",
    "vocabulary_id",
    "concept_class_id",
    "standard_concept",
    "concept_code",
    "valid_start_date",
    "valid_end_date",
    "invalid_reason",
];

/// Check that `header` lists exactly `expected`, in order.
pub fn validate_header<'h, I>(header: I, expected: &[&str]) -> Result<()>
where
    I: IntoIterator<Item = &'h str>,
{
    let actual: Vec<&str> = header.into_iter().collect();

    if actual != expected {
        return Err(ImportError::SchemaMismatch {
            expected: expected.iter().map(|c| c.to_string()).collect(),
            actual: actual.iter().map(|c| c.to_string()).collect(),
        });
    }
    Ok(())
}
