// ==============================================================================
// parsers/ped.rs - Pedigree File Parser
// ==============================================================================
// Description: Loads PED/FAM files and header-driven extended pedigree files
//              into families of individuals, then validates every family
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Format (ped/fam): 6 tab- or whitespace-delimited columns
//   #FamilyID  SampleID  Father  Mother  Sex  Phenotype
//   FAM1       proband   father  mother  1    2
//   FAM1       mother    0       0       2    1
//
// Format (alt/cmms/mip): tab-delimited, '#' line defines the header, first six
// columns as above, extra columns by header name
//   #FamilyID  SampleID  Father  Mother  Sex  Phenotype  InheritanceModel  Proband
//   FAM1       proband   father  mother  1    2          AR_hom;AD_dn      Yes
// ==============================================================================

use clap::ValueEnum;
use flate2::read::GzDecoder;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::error::PedParseError;
use crate::family::Family;
use crate::individual::Individual;
use crate::models::{GeneticModel, ModelAliases, ModelPolicy, Phenotype, Sex, TriState};
use crate::parsers::cmms;

/// Number of mandatory pedigree columns
pub const PED_COLUMNS: usize = 6;

const DEFAULT_HEADER: [&str; PED_COLUMNS] =
    ["FamilyID", "SampleID", "Father", "Mother", "Sex", "Phenotype"];

/// Header name of the genetic model column
pub const INHERITANCE_MODEL: &str = "InheritanceModel";
const LEGACY_INHERITANCE_MODEL: &str = "Inheritance_model";

/// Pedigree file flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FamilyType {
    /// Standard 6-column PED
    #[default]
    Ped,
    /// PLINK FAM (same layout as PED)
    Fam,
    /// Header-driven file with extra columns
    Alt,
    /// Extended file with identifier convention checks
    Cmms,
    /// Extended file as produced by the MIP pipeline
    Mip,
}

impl FamilyType {
    pub fn is_extended(&self) -> bool {
        matches!(self, FamilyType::Alt | FamilyType::Cmms | FamilyType::Mip)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyType::Ped => "ped",
            FamilyType::Fam => "fam",
            FamilyType::Alt => "alt",
            FamilyType::Cmms => "cmms",
            FamilyType::Mip => "mip",
        }
    }
}

impl fmt::Display for FamilyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parser for pedigree files
#[derive(Debug, Clone)]
pub struct FamilyParser {
    pub family_type: FamilyType,
    pub model_policy: ModelPolicy,
    aliases: ModelAliases,
    families: BTreeMap<String, Family>,
    /// individual id -> family id
    individuals: HashMap<String, String>,
}

/// Rows of one load before validation
#[derive(Default)]
struct PendingLoad {
    families: BTreeMap<String, Family>,
    header: Vec<String>,
    /// (individual id, family id) in row order
    members: Vec<(String, String)>,
}

impl Default for FamilyParser {
    fn default() -> Self {
        Self::new(FamilyType::default())
    }
}

impl FamilyParser {
    pub fn new(family_type: FamilyType) -> Self {
        Self {
            family_type,
            model_policy: ModelPolicy::default(),
            aliases: ModelAliases::default(),
            families: BTreeMap::new(),
            individuals: HashMap::new(),
        }
    }

    /// Set how unknown genetic model names are handled
    pub fn with_model_policy(mut self, policy: ModelPolicy) -> Self {
        self.model_policy = policy;
        self
    }

    /// Replace the model alias table
    pub fn with_model_aliases(mut self, aliases: ModelAliases) -> Self {
        self.aliases = aliases;
        self
    }

    /// Parse a pedigree file, gzip-compressed if the name ends in `.gz`
    pub fn parse(&mut self, path: impl AsRef<Path>) -> Result<(), PedParseError> {
        let path = path.as_ref();
        info!("Parsing {} pedigree file {:?}", self.family_type, path);

        let file = File::open(path)?;
        if path.extension().is_some_and(|ext| ext == "gz") {
            self.parse_reader(BufReader::new(GzDecoder::new(file)))
        } else {
            self.parse_reader(BufReader::new(file))
        }
    }

    pub fn parse_reader<R: BufRead>(&mut self, reader: R) -> Result<(), PedParseError> {
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        self.parse_lines(lines)
    }

    /// Load rows, then run `family_check` on every family.
    ///
    /// The load is all-or-nothing: families become visible through the
    /// parser only when every row is well formed and every family validates.
    pub fn parse_lines<I, S>(&mut self, lines: I) -> Result<(), PedParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut load = PendingLoad {
            header: DEFAULT_HEADER.iter().map(|h| h.to_string()).collect(),
            ..PendingLoad::default()
        };

        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let line_number = idx + 1;

            if self.family_type.is_extended() {
                self.extended_line(&mut load, line, line_number)?;
            } else {
                self.ped_line(&mut load, line, line_number)?;
            }
        }

        for family in load.families.values_mut() {
            family.family_check()?;
        }

        if let Some(family_id) = load
            .families
            .keys()
            .find(|family_id| self.families.contains_key(*family_id))
        {
            return Err(PedParseError::pedigree(
                family_id,
                "0",
                "Family was already loaded by this parser.",
            ));
        }

        self.individuals.extend(load.members);
        self.families.extend(load.families);

        info!(
            "Loaded {} families with {} individuals",
            self.families.len(),
            self.individuals.len()
        );
        Ok(())
    }

    /// Standard ped/fam row
    fn ped_line(
        &self,
        load: &mut PendingLoad,
        line: &str,
        line_number: usize,
    ) -> Result<(), PedParseError> {
        if line.starts_with('#') || line.trim().is_empty() {
            return Ok(());
        }

        let line = line.trim_end();
        let mut fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != PED_COLUMNS {
            fields = line.split_whitespace().collect();
        }
        if fields.len() != PED_COLUMNS {
            return Err(PedParseError::InvalidFormat {
                line: line_number,
                details: format!(
                    "Expected {} fields, found {}: {}",
                    PED_COLUMNS,
                    fields.len(),
                    line
                ),
            });
        }

        let individual = Self::get_individual(&fields);
        Self::add_to_family(load, individual)
    }

    /// Header-driven alt/cmms/mip row
    fn extended_line(
        &self,
        load: &mut PendingLoad,
        line: &str,
        line_number: usize,
    ) -> Result<(), PedParseError> {
        if let Some(header) = line.strip_prefix('#') {
            load.header = strip_line_ending(header)
                .split('\t')
                .map(str::to_string)
                .collect();
            debug!("Header at line {}: {:?}", line_number, load.header);
            return Ok(());
        }
        if line.trim().is_empty() {
            return Ok(());
        }

        // Empty trailing cells are kept, so only the line ending is removed
        let line = strip_line_ending(line);
        let fields: Vec<&str> = line.split('\t').collect();

        if load.header.len() < PED_COLUMNS {
            return Err(PedParseError::InvalidFormat {
                line: line_number,
                details: format!(
                    "Header has {} columns, at least {} are required",
                    load.header.len(),
                    PED_COLUMNS
                ),
            });
        }
        if fields.len() != load.header.len() {
            return Err(PedParseError::InvalidFormat {
                line: line_number,
                details: format!(
                    "Number of entries ({}) differs from header ({}): {}",
                    fields.len(),
                    load.header.len(),
                    line
                ),
            });
        }

        let mut individual = Self::get_individual(&fields);
        let sample_id = individual.individual_id().to_string();
        let mut models = BTreeSet::new();

        for (column, value) in load.header.iter().zip(&fields).skip(PED_COLUMNS) {
            match column.as_str() {
                INHERITANCE_MODEL | LEGACY_INHERITANCE_MODEL => {
                    models = self
                        .aliases
                        .parse_list(value, &sample_id, self.model_policy)?;
                    individual
                        .extra_info
                        .insert(INHERITANCE_MODEL.to_string(), value.to_string());
                    continue;
                }
                "Proband" => individual = individual.with_proband(TriState::parse(value)),
                "Consultand" => individual = individual.with_consultand(TriState::parse(value)),
                "Alive" => individual = individual.with_alive(TriState::parse(value)),
                _ => {}
            }
            individual
                .extra_info
                .insert(column.clone(), value.to_string());
        }
        let individual = individual.with_genetic_models(models);

        if self.family_type == FamilyType::Cmms {
            cmms::check_sample_id(&individual)?;
        }

        Self::add_to_family(load, individual)
    }

    /// Build an individual from the six pedigree columns.
    ///
    /// Sex and phenotype tokens other than `1`/`2` are stored as unknown.
    fn get_individual(fields: &[&str]) -> Individual {
        let family_id = fields[0];
        let individual_id = fields[1];
        let father = fields[2];
        let mother = fields[3];
        let sex = Sex::from_token(fields[4]);
        let phenotype = Phenotype::from_token(fields[5]);

        Individual::new(individual_id, family_id, mother, father, sex, phenotype)
    }

    fn add_to_family(load: &mut PendingLoad, individual: Individual) -> Result<(), PedParseError> {
        let family_id = individual.family_id().to_string();
        let member = (individual.individual_id().to_string(), family_id.clone());
        load.families
            .entry(family_id.clone())
            .or_insert_with(|| Family::new(family_id))
            .add_individual(individual)?;
        load.members.push(member);
        Ok(())
    }

    pub fn families(&self) -> &BTreeMap<String, Family> {
        &self.families
    }

    pub fn family(&self, family_id: &str) -> Option<&Family> {
        self.families.get(family_id)
    }

    /// Look up an individual by id across all loaded families.
    ///
    /// When several families share an id, the row read last wins.
    pub fn individual(&self, individual_id: &str) -> Option<&Individual> {
        let family_id = self.individuals.get(individual_id)?;
        self.families.get(family_id)?.individual(individual_id)
    }

    /// Union of the models of inheritance over all families
    pub fn models_of_inheritance(&self) -> BTreeSet<GeneticModel> {
        self.families
            .values()
            .flat_map(|family| family.models_of_inheritance.iter().copied())
            .collect()
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(|c: char| c == '\r' || c == '\n')
}
