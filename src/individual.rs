// ==============================================================================
// individual.rs - Pedigree Individual
// ==============================================================================
// Description: One person of a pedigree with relationship flags derived at
//              construction time
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

use crate::error::PedParseError;
use crate::models::{GeneticModel, Phenotype, Sex, TriState, UNKNOWN_PARENT};

/// Parent token meaning "explicitly unknown", stored as [`UNKNOWN_PARENT`]
const DOT_PARENT: &str = ".";

/// A single pedigree member
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    individual_id: String,
    family_id: String,
    mother: String,
    father: String,
    sex: Sex,
    phenotype: Phenotype,
    genetic_models: BTreeSet<GeneticModel>,
    proband: TriState,
    consultand: TriState,
    alive: TriState,

    /// Format-specific columns keyed by header name
    pub extra_info: BTreeMap<String, String>,

    /// Filled in by `Family::family_check`
    pub(crate) siblings: BTreeSet<String>,

    has_parents: bool,
    has_both_parents: bool,
    affected: bool,
    healthy: bool,
}

fn normalize_parent(parent: impl Into<String>) -> String {
    let parent = parent.into();
    if parent == DOT_PARENT {
        UNKNOWN_PARENT.to_string()
    } else {
        parent
    }
}

impl Individual {
    pub fn new(
        individual_id: impl Into<String>,
        family_id: impl Into<String>,
        mother: impl Into<String>,
        father: impl Into<String>,
        sex: Sex,
        phenotype: Phenotype,
    ) -> Self {
        let individual_id = individual_id.into();
        let mother = normalize_parent(mother);
        let father = normalize_parent(father);

        let has_mother = mother != UNKNOWN_PARENT;
        let has_father = father != UNKNOWN_PARENT;

        debug!(
            "Creating individual {} (mother: {}, father: {}, sex: {}, phenotype: {})",
            individual_id,
            mother,
            father,
            sex.code(),
            phenotype.code()
        );

        Self {
            individual_id,
            family_id: family_id.into(),
            mother,
            father,
            sex,
            phenotype,
            genetic_models: BTreeSet::new(),
            proband: TriState::Unknown,
            consultand: TriState::Unknown,
            alive: TriState::Unknown,
            extra_info: BTreeMap::new(),
            siblings: BTreeSet::new(),
            has_parents: has_mother || has_father,
            has_both_parents: has_mother && has_father,
            affected: phenotype == Phenotype::Affected,
            healthy: phenotype == Phenotype::Unaffected,
        }
    }

    /// Build from raw PED codes.
    ///
    /// # Errors
    /// `InvalidCode` when sex or phenotype is not an integer. Integers other
    /// than 1 and 2 are accepted as unknown.
    pub fn from_codes(
        individual_id: impl Into<String>,
        family_id: impl Into<String>,
        mother: impl Into<String>,
        father: impl Into<String>,
        sex: &str,
        phenotype: &str,
    ) -> Result<Self, PedParseError> {
        let sex = Sex::from_code(sex)?;
        let phenotype = Phenotype::from_code(phenotype)?;
        Ok(Self::new(individual_id, family_id, mother, father, sex, phenotype))
    }

    pub fn with_genetic_models(mut self, models: BTreeSet<GeneticModel>) -> Self {
        self.genetic_models = models;
        self
    }

    pub fn with_proband(mut self, proband: TriState) -> Self {
        self.proband = proband;
        self
    }

    pub fn with_consultand(mut self, consultand: TriState) -> Self {
        self.consultand = consultand;
        self
    }

    pub fn with_alive(mut self, alive: TriState) -> Self {
        self.alive = alive;
        self
    }

    pub fn individual_id(&self) -> &str {
        &self.individual_id
    }

    pub fn family_id(&self) -> &str {
        &self.family_id
    }

    pub fn mother(&self) -> &str {
        &self.mother
    }

    pub fn father(&self) -> &str {
        &self.father
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }

    pub fn phenotype(&self) -> Phenotype {
        self.phenotype
    }

    pub fn genetic_models(&self) -> &BTreeSet<GeneticModel> {
        &self.genetic_models
    }

    pub fn proband(&self) -> TriState {
        self.proband
    }

    pub fn consultand(&self) -> TriState {
        self.consultand
    }

    pub fn alive(&self) -> TriState {
        self.alive
    }

    pub fn siblings(&self) -> &BTreeSet<String> {
        &self.siblings
    }

    /// At least one parent is known
    pub fn has_parents(&self) -> bool {
        self.has_parents
    }

    pub fn has_both_parents(&self) -> bool {
        self.has_both_parents
    }

    pub fn is_affected(&self) -> bool {
        self.affected
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ind_id: {} family: {} mother: {} father: {} sex: {} phenotype: {}",
            self.individual_id,
            self.family_id,
            self.mother,
            self.father,
            self.sex.code(),
            self.phenotype.code()
        )?;
        if !self.siblings.is_empty() {
            let siblings: Vec<&str> = self.siblings.iter().map(String::as_str).collect();
            write!(f, " siblings: {}", siblings.join(","))?;
        }
        Ok(())
    }
}
