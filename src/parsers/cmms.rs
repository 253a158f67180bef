// ==============================================================================
// parsers/cmms.rs - Sample Identifier Convention Check
// ==============================================================================
// Description: Cross-checks sex and phenotype against the values encoded in
//              CMMS-style sample identifiers
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format: <family>-<generation>-<number><status>
// Example:
//   11-1-2A    female (even number), affected
//   11-1-1U    male (odd number), unaffected
//   11-2-3X    male, affection status unknown
// ==============================================================================

use tracing::trace;

use crate::error::PedParseError;
use crate::individual::Individual;
use crate::models::{Phenotype, Sex};

/// Affection status letters: affected, unaffected, unknown
pub const VALID_AFFECTION_STATUSES: [char; 3] = ['A', 'U', 'X'];

/// Check an individual against the identifier convention.
///
/// Identifiers that do not have exactly three `-`-separated segments are
/// not covered by the convention and pass unchecked.
///
/// # Errors
/// * `WrongAffectionStatus` - status letter outside [`VALID_AFFECTION_STATUSES`]
/// * `WrongPhenotype` - `A` without phenotype 2, or `U` without phenotype 1
/// * `WrongGender` - odd number on a non-male, even number on a non-female
/// * `InvalidSampleId` - number part is missing or not numeric
pub fn check_sample_id(individual: &Individual) -> Result<(), PedParseError> {
    let sample_id = individual.individual_id();
    let segments: Vec<&str> = sample_id.split('-').collect();

    if segments.len() != 3 {
        trace!("Sample id {} does not follow the identifier convention", sample_id);
        return Ok(());
    }

    let last = segments[2];
    let status = last.chars().last().ok_or_else(|| PedParseError::InvalidSampleId {
        sample_id: sample_id.to_string(),
        details: "last segment is empty".to_string(),
    })?;

    if !VALID_AFFECTION_STATUSES.contains(&status) {
        return Err(PedParseError::WrongAffectionStatus {
            sample_id: sample_id.to_string(),
            valid_statuses: VALID_AFFECTION_STATUSES
                .iter()
                .map(char::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    let phenotype = individual.phenotype();
    let phenotype_mismatch = match status {
        'A' => phenotype != Phenotype::Affected,
        'U' => phenotype != Phenotype::Unaffected,
        _ => false,
    };
    if phenotype_mismatch {
        return Err(PedParseError::WrongPhenotype {
            sample_id: sample_id.to_string(),
            phenotype: phenotype.code(),
            affection_status: status,
        });
    }

    let sex_code = &last[..last.len() - status.len_utf8()];
    let number = sex_code
        .parse::<u64>()
        .map_err(|_| PedParseError::InvalidSampleId {
            sample_id: sample_id.to_string(),
            details: format!("gender code '{}' is not numeric", sex_code),
        })?;

    // Males always have odd numbers, females even
    let expected = if number % 2 == 0 { Sex::Female } else { Sex::Male };
    if individual.sex() != expected {
        return Err(PedParseError::WrongGender {
            sample_id: sample_id.to_string(),
            sex: individual.sex().code(),
            sex_code: sex_code.to_string(),
        });
    }

    Ok(())
}
