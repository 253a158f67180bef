// ==============================================================================
// models.rs - Pedigree Attribute Models
// ==============================================================================
// Description: Coded pedigree attributes (sex, phenotype, tri-state flags) and
//              genetic inheritance model tags with their alias table
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::warn;

use crate::error::PedParseError;

/// Reserved parent id meaning "unknown parent"
pub const UNKNOWN_PARENT: &str = "0";

/// Biological sex as coded in column 5 of a PED file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Sex {
    /// Numeric PED code (0, 1, 2)
    pub fn code(&self) -> u8 {
        match self {
            Sex::Unknown => 0,
            Sex::Male => 1,
            Sex::Female => 2,
        }
    }

    /// Lenient mapping used by the row loaders: anything but `1`/`2` is unknown
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "1" => Sex::Male,
            "2" => Sex::Female,
            _ => Sex::Unknown,
        }
    }

    /// Strict mapping: the code must be an integer, unrecognised integers are unknown
    pub fn from_code(code: &str) -> Result<Self, PedParseError> {
        let value = code.trim().parse::<i64>().map_err(|_| PedParseError::InvalidCode {
            field: "sex",
            value: code.to_string(),
        })?;
        Ok(match value {
            1 => Sex::Male,
            2 => Sex::Female,
            _ => Sex::Unknown,
        })
    }

    /// Single-letter Madeline gender
    pub fn madeline_token(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => ".",
        }
    }
}

/// Affection status as coded in column 6 of a PED file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phenotype {
    /// Missing (`0`, `-9` or anything unrecognised)
    #[default]
    Unknown,
    Unaffected,
    Affected,
}

impl Phenotype {
    pub fn code(&self) -> u8 {
        match self {
            Phenotype::Unknown => 0,
            Phenotype::Unaffected => 1,
            Phenotype::Affected => 2,
        }
    }

    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "1" => Phenotype::Unaffected,
            "2" => Phenotype::Affected,
            _ => Phenotype::Unknown,
        }
    }

    pub fn from_code(code: &str) -> Result<Self, PedParseError> {
        let value = code.trim().parse::<i64>().map_err(|_| PedParseError::InvalidCode {
            field: "phenotype",
            value: code.to_string(),
        })?;
        Ok(match value {
            1 => Phenotype::Unaffected,
            2 => Phenotype::Affected,
            _ => Phenotype::Unknown,
        })
    }

    pub fn madeline_token(&self) -> &'static str {
        match self {
            Phenotype::Affected => "A",
            Phenotype::Unaffected => "U",
            Phenotype::Unknown => ".",
        }
    }
}

/// Yes/no/unknown flag used for the Proband, Consultand and Alive columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Unknown,
}

impl TriState {
    /// Free text to flag. Never fails: everything but yes/no is unknown.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => TriState::Yes,
            "no" | "n" => TriState::No,
            _ => TriState::Unknown,
        }
    }

    pub fn madeline_token(&self) -> &'static str {
        match self {
            TriState::Yes => "Y",
            TriState::No => "N",
            TriState::Unknown => ".",
        }
    }
}

/// Canonical genetic inheritance model tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeneticModel {
    /// Autosomal recessive, homozygous
    ArHom,
    /// Autosomal recessive, homozygous de novo
    ArHomDn,
    /// Autosomal dominant
    Ad,
    /// Autosomal dominant de novo
    AdDn,
    /// Autosomal recessive, compound heterozygous
    ArComp,
    /// X-linked
    X,
    XR,
    XRDn,
    XD,
    XDDn,
    /// Not available / unknown
    Na,
}

impl GeneticModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneticModel::ArHom => "AR_hom",
            GeneticModel::ArHomDn => "AR_hom_dn",
            GeneticModel::Ad => "AD",
            GeneticModel::AdDn => "AD_dn",
            GeneticModel::ArComp => "AR_comp",
            GeneticModel::X => "X",
            GeneticModel::XR => "XR",
            GeneticModel::XRDn => "XR_dn",
            GeneticModel::XD => "XD",
            GeneticModel::XDDn => "XD_dn",
            GeneticModel::Na => "NA",
        }
    }
}

/// Accepted spellings of model names, typos included
const DEFAULT_MODEL_ALIASES: &[(&str, GeneticModel)] = &[
    ("AR", GeneticModel::ArHom),
    ("AR_hom", GeneticModel::ArHom),
    ("AR_denovo", GeneticModel::ArHomDn),
    ("AR_hom_denovo", GeneticModel::ArHomDn),
    ("AR_hom_dn", GeneticModel::ArHomDn),
    ("AR_dn", GeneticModel::ArHomDn),
    ("AD", GeneticModel::Ad),
    ("AD_denovo", GeneticModel::AdDn),
    ("AD_dn", GeneticModel::AdDn),
    ("AR_compound", GeneticModel::ArComp),
    ("AR_comp", GeneticModel::ArComp),
    ("X", GeneticModel::X),
    ("X_denovo", GeneticModel::X),
    ("XR", GeneticModel::XR),
    ("XR_dn", GeneticModel::XRDn),
    ("XD", GeneticModel::XD),
    ("XD_dn", GeneticModel::XDDn),
    ("NA", GeneticModel::Na),
    ("Na", GeneticModel::Na),
];

/// What to do with a model name missing from the alias table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelPolicy {
    /// Reject the whole load
    #[default]
    Strict,
    /// Drop the tag with a warning
    Lenient,
}

/// Lookup from model name spelling to canonical tag
#[derive(Debug, Clone)]
pub struct ModelAliases {
    table: HashMap<String, GeneticModel>,
}

impl Default for ModelAliases {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_ALIASES.iter().copied())
    }
}

impl ModelAliases {
    /// Build a table from scratch (no default aliases)
    pub fn new<'a>(aliases: impl IntoIterator<Item = (&'a str, GeneticModel)>) -> Self {
        Self {
            table: aliases
                .into_iter()
                .map(|(alias, model)| (alias.to_string(), model))
                .collect(),
        }
    }

    /// Add or override one alias
    pub fn with_alias(mut self, alias: impl Into<String>, model: GeneticModel) -> Self {
        self.table.insert(alias.into(), model);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<GeneticModel> {
        self.table.get(name.trim()).copied()
    }

    /// Parse a `;`-separated model list for one sample.
    ///
    /// `NA` tags are dropped, so an empty set means "no model given".
    pub fn parse_list(
        &self,
        raw: &str,
        sample_id: &str,
        policy: ModelPolicy,
    ) -> Result<BTreeSet<GeneticModel>, PedParseError> {
        let mut models = BTreeSet::new();

        for name in raw.split(';').map(str::trim).filter(|n| !n.is_empty()) {
            match (self.resolve(name), policy) {
                (Some(GeneticModel::Na), _) => {}
                (Some(model), _) => {
                    models.insert(model);
                }
                (None, ModelPolicy::Strict) => {
                    return Err(PedParseError::UnknownModel {
                        sample_id: sample_id.to_string(),
                        model: name.to_string(),
                    });
                }
                (None, ModelPolicy::Lenient) => {
                    warn!("Dropping unknown genetic model '{}' for {}", name, sample_id);
                }
            }
        }

        Ok(models)
    }
}
