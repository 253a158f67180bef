// ==============================================================================
// error.rs - Pedigree Parsing Errors
// ==============================================================================
// Description: Error taxonomy shared by the loader, validator and writers
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use thiserror::Error;

/// Errors that can occur while loading, validating or writing a pedigree
#[derive(Error, Debug)]
pub enum PedParseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Row arity or header shape is wrong
    #[error("Invalid line format at line {line}: {details}")]
    InvalidFormat { line: usize, details: String },

    /// Sex or phenotype code is not an integer
    #[error("Invalid {field} code: '{value}' (sex and phenotype have to be integers)")]
    InvalidCode { field: &'static str, value: String },

    /// Parent missing from the family, parent with the wrong sex, or a
    /// record that does not belong in the family
    #[error("Pedigree error in family {family_id}, individual {individual_id}: {message}")]
    Pedigree {
        family_id: String,
        individual_id: String,
        message: String,
    },

    #[error("Affection status of {sample_id} is not one of {valid_statuses}")]
    WrongAffectionStatus {
        sample_id: String,
        valid_statuses: String,
    },

    #[error("Phenotype {phenotype} of {sample_id} disagrees with affection status '{affection_status}'")]
    WrongPhenotype {
        sample_id: String,
        phenotype: u8,
        affection_status: char,
    },

    #[error("Sex {sex} of {sample_id} disagrees with gender code {sex_code}")]
    WrongGender {
        sample_id: String,
        sex: u8,
        sex_code: String,
    },

    #[error("Malformed sample id {sample_id}: {details}")]
    InvalidSampleId { sample_id: String, details: String },

    #[error("Unknown genetic model '{model}' for {sample_id}")]
    UnknownModel { sample_id: String, model: String },

    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PedParseError {
    pub(crate) fn pedigree(
        family_id: impl Into<String>,
        individual_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Pedigree {
            family_id: family_id.into(),
            individual_id: individual_id.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pedigree_error_message() {
        let err = PedParseError::pedigree("FAM1", "father", "Parent is not in family.");
        assert_eq!(
            err.to_string(),
            "Pedigree error in family FAM1, individual father: Parent is not in family."
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.ped");
        let err: PedParseError = io.into();
        assert!(matches!(err, PedParseError::IoError(_)));
    }
}
