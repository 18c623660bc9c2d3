use super::header::EXPECTED_COLUMNS;
use crate::concept::{parse_omop_date, Concept, ConceptId};
use crate::error::{ImportError, Result};
use csv::StringRecord;

/// Parse one data row. `line` is the 1-based line in the file, used in errors.
///
/// Fields are trimmed. `domain_id`, `vocabulary_id` and `concept_class_id`
/// are not stored.
pub fn parse_row(record: &StringRecord, line: u64) -> Result<Concept> {
    let fields: Vec<&str> = record.iter().map(str::trim).collect();

    let [concept_id, concept_name, _domain_id, _vocabulary_id, _concept_class_id, standard_concept, concept_code, valid_start_date, valid_end_date, invalid_reason] =
        fields.as_slice()
    else {
        return Err(ImportError::MalformedRow {
            line,
            expected: EXPECTED_COLUMNS.len(),
            found: fields.len(),
        });
    };

    let valid_start_date =
        parse_omop_date(valid_start_date).map_err(|source| ImportError::DateParse {
            line,
            column: "valid_start_date",
            source,
        })?;
    let valid_end_date =
        parse_omop_date(valid_end_date).map_err(|source| ImportError::DateParse {
            line,
            column: "valid_end_date",
            source,
        })?;

    Ok(Concept {
        concept_id: ConceptId::new(*concept_id),
        concept_code: concept_code.to_string(),
        concept_name: concept_name.to_string(),
        standard_concept: standard_concept.to_string(),
        valid_start_date,
        valid_end_date,
        invalid_reason: invalid_reason.to_string(),
    })
}

#[cfg(test)]
#[path = "row_test.rs"]
mod tests;
