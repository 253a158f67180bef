// ==============================================================================
// family.rs - Family Aggregate and Relationship Validation
// ==============================================================================
// Description: Holds the members of one family and checks that their
//              relationships are consistent (parents present and correctly
//              sexed), extracting trios, duos, siblings and affected members
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, error, info, trace};

use crate::error::PedParseError;
use crate::individual::Individual;
use crate::models::{GeneticModel, Phenotype, Sex, UNKNOWN_PARENT};

/// All members sharing one family id
#[derive(Debug, Clone, PartialEq)]
pub struct Family {
    family_id: String,
    individuals: BTreeMap<String, Individual>,

    /// Models of inheritance to prioritise for this family
    pub models_of_inheritance: BTreeSet<GeneticModel>,

    trios: Vec<BTreeSet<String>>,
    duos: Vec<BTreeSet<String>>,
    affected_individuals: BTreeSet<String>,
    no_relations: bool,
}

impl Family {
    pub fn new(family_id: impl Into<String>) -> Self {
        let family_id = family_id.into();
        info!("Initiating family with id: {}", family_id);

        Self {
            family_id,
            individuals: BTreeMap::new(),
            models_of_inheritance: BTreeSet::from([GeneticModel::Na]),
            trios: Vec::new(),
            duos: Vec::new(),
            affected_individuals: BTreeSet::new(),
            no_relations: true,
        }
    }

    /// Add a member to the family.
    ///
    /// The individual's models of inheritance are merged into the family's.
    ///
    /// # Errors
    /// `Pedigree` if the individual carries another family id or its id is
    /// already taken in this family.
    pub fn add_individual(&mut self, individual: Individual) -> Result<(), PedParseError> {
        let individual_id = individual.individual_id().to_string();

        if individual.family_id() != self.family_id {
            return Err(PedParseError::pedigree(
                &self.family_id,
                individual_id,
                format!(
                    "Family id {} of individual is not the same as family id of the family",
                    individual.family_id()
                ),
            ));
        }

        if self.individuals.contains_key(&individual_id) {
            return Err(PedParseError::pedigree(
                &self.family_id,
                individual_id,
                "Individual id appears more than once in family.",
            ));
        }

        if !individual.genetic_models().is_empty() {
            self.models_of_inheritance.remove(&GeneticModel::Na);
            self.models_of_inheritance
                .extend(individual.genetic_models().iter().copied());
        }

        debug!("Added individual {} to family {}", individual_id, self.family_id);
        self.individuals.insert(individual_id, individual);
        Ok(())
    }

    /// Check that the members do not break the structure of the family
    /// (nonexistent parent, wrong sex on a parent) and extract trios, duos,
    /// siblings and affected members.
    ///
    /// Derived state is rebuilt from scratch on every call, so running the
    /// check again on unchanged data gives the same result. On error the
    /// derived state is left empty.
    pub fn family_check(&mut self) -> Result<(), PedParseError> {
        info!("Checking family relations for {}", self.family_id);

        self.trios.clear();
        self.duos.clear();
        self.affected_individuals.clear();
        self.no_relations = true;
        for individual in self.individuals.values_mut() {
            individual.siblings.clear();
        }

        let mut trios = Vec::new();
        let mut duos = Vec::new();
        let mut affected = BTreeSet::new();
        let mut no_relations = true;

        for (individual_id, individual) in &self.individuals {
            trace!("Checking individual {}", individual_id);

            if individual.is_affected() {
                debug!("Found affected individual {}", individual_id);
                affected.insert(individual_id.clone());
            }

            if !individual.has_parents() {
                continue;
            }
            no_relations = false;

            let father = individual.father();
            let mother = individual.mother();

            if let Err(e) = self
                .check_parent(individual_id, father, true)
                .and_then(|_| self.check_parent(individual_id, mother, false))
            {
                error!("{}", e);
                return Err(e);
            }

            if individual.has_both_parents() {
                trios.push(BTreeSet::from([
                    individual_id.clone(),
                    father.to_string(),
                    mother.to_string(),
                ]));
            } else if father != UNKNOWN_PARENT {
                duos.push(BTreeSet::from([individual_id.clone(), father.to_string()]));
            } else {
                duos.push(BTreeSet::from([individual_id.clone(), mother.to_string()]));
            }
        }

        let siblings: Vec<(String, BTreeSet<String>)> = self
            .individuals
            .keys()
            .map(|id| (id.clone(), self.sibling_ids(id)))
            .collect();

        for (individual_id, sibling_ids) in siblings {
            if let Some(individual) = self.individuals.get_mut(&individual_id) {
                individual.siblings = sibling_ids;
            }
        }

        debug!(
            "Family {}: {} trios, {} duos, {} affected",
            self.family_id,
            trios.len(),
            duos.len(),
            affected.len()
        );

        self.trios = trios;
        self.duos = duos;
        self.affected_individuals = affected;
        self.no_relations = no_relations;
        Ok(())
    }

    /// Check a parent reference. `0` is always accepted.
    ///
    /// # Errors
    /// `Pedigree` when the parent is the individual itself, is not a member
    /// of the family or is not recorded as male (father) / female (mother).
    pub fn check_parent(
        &self,
        individual_id: &str,
        parent_id: &str,
        father: bool,
    ) -> Result<(), PedParseError> {
        trace!("Checking parent {} of {}", parent_id, individual_id);

        if parent_id == UNKNOWN_PARENT {
            return Ok(());
        }
        if parent_id == individual_id {
            return Err(PedParseError::pedigree(
                &self.family_id,
                parent_id,
                "Individual is its own parent.",
            ));
        }

        let parent = self.individuals.get(parent_id).ok_or_else(|| {
            PedParseError::pedigree(&self.family_id, parent_id, "Parent is not in family.")
        })?;

        match (father, parent.sex()) {
            (true, Sex::Male) | (false, Sex::Female) => Ok(()),
            (true, _) => Err(PedParseError::pedigree(
                &self.family_id,
                parent_id,
                "Father is not specified as male.",
            )),
            (false, _) => Err(PedParseError::pedigree(
                &self.family_id,
                parent_id,
                "Mother is not specified as female.",
            )),
        }
    }

    /// Two members are siblings when they share a known father or a known mother
    pub fn check_siblings(&self, individual_1_id: &str, individual_2_id: &str) -> bool {
        if individual_1_id == individual_2_id {
            return false;
        }
        let (Some(ind_1), Some(ind_2)) = (
            self.individuals.get(individual_1_id),
            self.individuals.get(individual_2_id),
        ) else {
            return false;
        };

        (ind_1.father() != UNKNOWN_PARENT && ind_1.father() == ind_2.father())
            || (ind_1.mother() != UNKNOWN_PARENT && ind_1.mother() == ind_2.mother())
    }

    /// Cousin detection is not determined; always `None`
    pub fn check_cousins(&self, individual_1_id: &str, individual_2_id: &str) -> Option<bool> {
        trace!(
            "Cousin relation of {} and {} is not determined",
            individual_1_id,
            individual_2_id
        );
        None
    }

    fn sibling_ids(&self, individual_id: &str) -> BTreeSet<String> {
        self.individuals
            .keys()
            .filter(|other| self.check_siblings(individual_id, other))
            .cloned()
            .collect()
    }

    pub fn family_id(&self) -> &str {
        &self.family_id
    }

    pub fn individuals(&self) -> &BTreeMap<String, Individual> {
        &self.individuals
    }

    pub fn individual(&self, individual_id: &str) -> Option<&Individual> {
        self.individuals.get(individual_id)
    }

    /// Phenotype of a member, unknown if the member does not exist
    pub fn get_phenotype(&self, individual_id: &str) -> Phenotype {
        self.individuals
            .get(individual_id)
            .map(Individual::phenotype)
            .unwrap_or_default()
    }

    pub fn get_trios(&self) -> &[BTreeSet<String>] {
        &self.trios
    }

    pub fn get_duos(&self) -> &[BTreeSet<String>] {
        &self.duos
    }

    pub fn affected_individuals(&self) -> &BTreeSet<String> {
        &self.affected_individuals
    }

    /// True until a member with at least one known parent is found
    pub fn no_relations(&self) -> bool {
        self.no_relations
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<&str> = self.individuals.keys().map(String::as_str).collect();
        write!(f, "{}", members.join("\t"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn member(id: &str, father: &str, mother: &str, sex: Sex, phenotype: Phenotype) -> Individual {
        Individual::new(id, "1", mother, father, sex, phenotype)
    }

    /// Sick daughter 1, healthy son 4, healthy father 2, healthy mother 3
    fn nuclear_family() -> Family {
        let mut family = Family::new("1");
        family
            .add_individual(member("1", "2", "3", Sex::Female, Phenotype::Affected))
            .unwrap();
        family
            .add_individual(member("4", "2", "3", Sex::Male, Phenotype::Unaffected))
            .unwrap();
        family
            .add_individual(member("2", "0", "0", Sex::Male, Phenotype::Unaffected))
            .unwrap();
        family
            .add_individual(member("3", "0", "0", Sex::Female, Phenotype::Unaffected))
            .unwrap();
        family.family_check().unwrap();
        family
    }

    #[test]
    fn test_individuals_in_place() {
        let family = nuclear_family();
        for id in ["1", "2", "3", "4"] {
            assert!(family.individuals().contains_key(id));
        }
        assert!(!family.individuals().contains_key("5"));
    }

    #[test]
    fn test_family_relations() {
        let family = nuclear_family();
        let daughter = family.individual("1").unwrap();
        let son = family.individual("4").unwrap();
        let mother = family.individual("3").unwrap();

        assert!(son.siblings().contains("1"));
        assert!(daughter.siblings().contains("4"));
        // Parents are founders and must not become siblings
        assert!(!mother.siblings().contains("2"));
        assert!(mother.siblings().is_empty());
    }

    #[test]
    fn test_trios_and_affected() {
        let family = nuclear_family();
        assert_eq!(family.get_trios().len(), 2);
        assert!(family.get_trios().contains(&ids(&["1", "2", "3"])));
        assert!(family.get_trios().contains(&ids(&["4", "2", "3"])));
        assert!(family.get_duos().is_empty());
        assert_eq!(family.affected_individuals(), &ids(&["1"]));
        assert!(!family.no_relations());
    }

    #[test]
    fn test_duos() {
        let mut family = Family::new("1");
        family
            .add_individual(member("a", "dad", "0", Sex::Male, Phenotype::Affected))
            .unwrap();
        family
            .add_individual(member("b", "0", "mom", Sex::Female, Phenotype::Unknown))
            .unwrap();
        family
            .add_individual(member("dad", "0", "0", Sex::Male, Phenotype::Unaffected))
            .unwrap();
        family
            .add_individual(member("mom", "0", "0", Sex::Female, Phenotype::Unaffected))
            .unwrap();
        family.family_check().unwrap();

        assert!(family.get_trios().is_empty());
        assert_eq!(family.get_duos().len(), 2);
        assert!(family.get_duos().contains(&ids(&["a", "dad"])));
        assert!(family.get_duos().contains(&ids(&["b", "mom"])));
        // a and b share no known parent
        assert!(!family.check_siblings("a", "b"));
    }

    #[test]
    fn test_half_siblings_through_mother() {
        let mut family = Family::new("1");
        family
            .add_individual(member("a", "0", "mom", Sex::Male, Phenotype::Unknown))
            .unwrap();
        family
            .add_individual(member("b", "dad", "mom", Sex::Female, Phenotype::Unknown))
            .unwrap();
        family
            .add_individual(member("dad", "0", "0", Sex::Male, Phenotype::Unknown))
            .unwrap();
        family
            .add_individual(member("mom", "0", "0", Sex::Female, Phenotype::Unknown))
            .unwrap();
        family.family_check().unwrap();

        assert!(family.individual("a").unwrap().siblings().contains("b"));
        assert!(family.individual("b").unwrap().siblings().contains("a"));
    }

    #[test]
    fn test_siblings_are_symmetric() {
        let family = nuclear_family();
        for (id, individual) in family.individuals() {
            for sibling in individual.siblings() {
                let other = family.individual(sibling).unwrap();
                assert!(other.siblings().contains(id), "{} <-> {}", id, sibling);
                assert!(
                    (individual.father() != UNKNOWN_PARENT && individual.father() == other.father())
                        || (individual.mother() != UNKNOWN_PARENT
                            && individual.mother() == other.mother())
                );
            }
        }
    }

    #[test]
    fn test_no_relations() {
        let mut family = Family::new("1");
        family
            .add_individual(member("a", "0", "0", Sex::Male, Phenotype::Affected))
            .unwrap();
        family
            .add_individual(member("b", "0", "0", Sex::Female, Phenotype::Affected))
            .unwrap();
        family.family_check().unwrap();

        assert!(family.no_relations());
        assert!(family.get_trios().is_empty());
        assert!(family.get_duos().is_empty());
        assert_eq!(family.affected_individuals(), &ids(&["a", "b"]));
    }

    #[test]
    fn test_father_with_wrong_sex() {
        let mut family = Family::new("1");
        family
            .add_individual(member("proband", "father", "mother", Sex::Male, Phenotype::Affected))
            .unwrap();
        family
            .add_individual(member("father", "0", "0", Sex::Female, Phenotype::Unaffected))
            .unwrap();
        family
            .add_individual(member("mother", "0", "0", Sex::Female, Phenotype::Unaffected))
            .unwrap();

        match family.family_check().unwrap_err() {
            PedParseError::Pedigree {
                family_id,
                individual_id,
                message,
            } => {
                assert_eq!(family_id, "1");
                assert_eq!(individual_id, "father");
                assert_eq!(message, "Father is not specified as male.");
            }
            _ => panic!("Expected Pedigree error"),
        }
        assert!(family.get_trios().is_empty());
        assert!(family.get_duos().is_empty());
    }

    #[test]
    fn test_mother_with_wrong_sex() {
        let mut family = Family::new("1");
        family
            .add_individual(member("proband", "0", "mother", Sex::Male, Phenotype::Affected))
            .unwrap();
        family
            .add_individual(member("mother", "0", "0", Sex::Unknown, Phenotype::Unaffected))
            .unwrap();

        match family.check_parent("proband", "mother", false).unwrap_err() {
            PedParseError::Pedigree { message, .. } => {
                assert_eq!(message, "Mother is not specified as female.");
            }
            _ => panic!("Expected Pedigree error"),
        }
        assert!(family.family_check().is_err());
    }

    #[test]
    fn test_missing_parent() {
        let mut family = Family::new("1");
        family
            .add_individual(member("proband", "father", "0", Sex::Male, Phenotype::Affected))
            .unwrap();

        match family.family_check().unwrap_err() {
            PedParseError::Pedigree {
                individual_id,
                message,
                ..
            } => {
                assert_eq!(individual_id, "father");
                assert_eq!(message, "Parent is not in family.");
            }
            _ => panic!("Expected Pedigree error"),
        }
    }

    #[test]
    fn test_unknown_parent_is_valid() {
        let family = Family::new("1");
        assert!(family.check_parent("proband", "0", true).is_ok());
        assert!(family.check_parent("proband", "0", false).is_ok());
    }

    #[test]
    fn test_individual_as_own_father() {
        let mut family = Family::new("1");
        family
            .add_individual(member("a", "a", "0", Sex::Male, Phenotype::Affected))
            .unwrap();

        match family.family_check().unwrap_err() {
            PedParseError::Pedigree {
                family_id,
                individual_id,
                message,
            } => {
                assert_eq!(family_id, "1");
                assert_eq!(individual_id, "a");
                assert_eq!(message, "Individual is its own parent.");
            }
            _ => panic!("Expected Pedigree error"),
        }
        assert!(family.get_duos().is_empty());
    }

    #[test]
    fn test_individual_as_own_mother() {
        let mut family = Family::new("1");
        family
            .add_individual(member("a", "father", "a", Sex::Female, Phenotype::Affected))
            .unwrap();
        family
            .add_individual(member("father", "0", "0", Sex::Male, Phenotype::Unaffected))
            .unwrap();

        match family.check_parent("a", "a", false).unwrap_err() {
            PedParseError::Pedigree { message, .. } => {
                assert_eq!(message, "Individual is its own parent.");
            }
            _ => panic!("Expected Pedigree error"),
        }
        assert!(family.family_check().is_err());
        assert!(family.get_trios().is_empty());
    }

    #[test]
    fn test_family_check_is_idempotent() {
        let mut family = nuclear_family();
        let before = family.clone();
        family.family_check().unwrap();
        assert_eq!(family, before);
    }

    #[test]
    fn test_add_individual_from_other_family() {
        let mut family = Family::new("1");
        let stranger = Individual::new("x", "2", "0", "0", Sex::Male, Phenotype::Unknown);
        match family.add_individual(stranger).unwrap_err() {
            PedParseError::Pedigree {
                family_id,
                individual_id,
                ..
            } => {
                assert_eq!(family_id, "1");
                assert_eq!(individual_id, "x");
            }
            _ => panic!("Expected Pedigree error"),
        }
    }

    #[test]
    fn test_add_duplicate_individual() {
        let mut family = Family::new("1");
        family
            .add_individual(member("a", "0", "0", Sex::Male, Phenotype::Unknown))
            .unwrap();
        let result = family.add_individual(member("a", "0", "0", Sex::Female, Phenotype::Unknown));
        assert!(matches!(result, Err(PedParseError::Pedigree { .. })));
        assert_eq!(family.individual("a").unwrap().sex(), Sex::Male);
    }

    #[test]
    fn test_models_of_inheritance() {
        let mut family = Family::new("1");
        assert_eq!(family.models_of_inheritance, BTreeSet::from([GeneticModel::Na]));

        family
            .add_individual(
                member("a", "0", "0", Sex::Male, Phenotype::Affected)
                    .with_genetic_models(BTreeSet::from([GeneticModel::ArHom])),
            )
            .unwrap();
        family
            .add_individual(
                member("b", "0", "0", Sex::Female, Phenotype::Affected)
                    .with_genetic_models(BTreeSet::from([GeneticModel::AdDn])),
            )
            .unwrap();

        assert_eq!(
            family.models_of_inheritance,
            BTreeSet::from([GeneticModel::ArHom, GeneticModel::AdDn])
        );
    }

    #[test]
    fn test_get_phenotype_and_cousins() {
        let family = nuclear_family();
        assert_eq!(family.get_phenotype("1"), Phenotype::Affected);
        assert_eq!(family.get_phenotype("missing"), Phenotype::Unknown);
        assert_eq!(family.check_cousins("1", "4"), None);
    }
}
