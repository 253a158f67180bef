// ==============================================================================
// output.rs - Pedigree Output Generation
// ==============================================================================
// Description: Re-serialize loaded families as PED, JSON or Madeline files
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use clap::ValueEnum;
use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::debug;

use crate::error::PedParseError;
use crate::family::Family;
use crate::individual::Individual;
use crate::models::UNKNOWN_PARENT;

const PED_HEADER: [&str; 6] = [
    "#FamilyID",
    "IndividualID",
    "PaternalID",
    "MaternalID",
    "Sex",
    "Phenotype",
];

/// Extra columns carried over to PED output when present in `extra_info`
const PED_EXTRA_HEADERS: [&str; 4] = ["InheritanceModel", "Proband", "Consultand", "Alive"];

const MADELINE_HEADER: [&str; 9] = [
    "FamilyID",
    "IndividualID",
    "Gender",
    "Father",
    "Mother",
    "Affected",
    "Proband",
    "Consultand",
    "Alive",
];

/// Missing value in PED extra columns and Madeline parents
const MISSING: &str = ".";

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated PED with recognised extra columns
    Ped,
    /// JSON list of families
    Json,
    /// Madeline 2 pedigree drawing import
    Madeline,
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Ped => "ped",
            OutputFormat::Json => "json",
            OutputFormat::Madeline => "txt",
        }
    }
}

/// One family in JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyOutput {
    pub family_id: String,
    pub individuals: Vec<IndividualOutput>,
}

/// One individual in JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualOutput {
    pub family_id: String,
    pub id: String,
    pub sex: String,
    pub phenotype: String,
    pub mother: String,
    pub father: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_info: BTreeMap<String, String>,
}

impl From<&Individual> for IndividualOutput {
    fn from(individual: &Individual) -> Self {
        Self {
            family_id: individual.family_id().to_string(),
            id: individual.individual_id().to_string(),
            sex: individual.sex().code().to_string(),
            phenotype: individual.phenotype().code().to_string(),
            mother: individual.mother().to_string(),
            father: individual.father().to_string(),
            extra_info: individual.extra_info.clone(),
        }
    }
}

impl From<&Family> for FamilyOutput {
    fn from(family: &Family) -> Self {
        Self {
            family_id: family.family_id().to_string(),
            individuals: family
                .individuals()
                .values()
                .map(IndividualOutput::from)
                .collect(),
        }
    }
}

/// Write families in the requested format
pub fn write_output<'a, W: Write>(
    format: OutputFormat,
    families: impl IntoIterator<Item = &'a Family>,
    writer: W,
) -> Result<(), PedParseError> {
    match format {
        OutputFormat::Ped => write_ped(families, writer),
        OutputFormat::Json => write_json(families, writer),
        OutputFormat::Madeline => write_madeline(families, writer),
    }
}

pub fn to_json<'a>(families: impl IntoIterator<Item = &'a Family>) -> Vec<FamilyOutput> {
    families.into_iter().map(FamilyOutput::from).collect()
}

pub fn write_json<'a, W: Write>(
    families: impl IntoIterator<Item = &'a Family>,
    mut writer: W,
) -> Result<(), PedParseError> {
    serde_json::to_writer_pretty(&mut writer, &to_json(families))?;
    writeln!(writer)?;
    Ok(())
}

/// PED header: the six standard columns plus every recognised extra
/// column found among the individuals
pub fn ped_header<'a>(families: impl IntoIterator<Item = &'a Family>) -> Vec<String> {
    let individuals: Vec<&Individual> = families
        .into_iter()
        .flat_map(|family| family.individuals().values())
        .collect();

    let mut header: Vec<String> = PED_HEADER.iter().map(|h| h.to_string()).collect();
    header.extend(
        PED_EXTRA_HEADERS
            .iter()
            .filter(|extra| individuals.iter().any(|ind| ind.extra_info.contains_key(**extra)))
            .map(|extra| extra.to_string()),
    );

    debug!("Ped headers found: {}", header.join(", "));
    header
}

pub fn write_ped<'a, W: Write>(
    families: impl IntoIterator<Item = &'a Family>,
    writer: W,
) -> Result<(), PedParseError> {
    let families: Vec<&Family> = families.into_iter().collect();
    let header = ped_header(families.iter().copied());

    let mut wtr = tab_writer(writer);
    wtr.write_record(&header)?;

    for individual in families.iter().flat_map(|f| f.individuals().values()) {
        let mut row = vec![
            individual.family_id().to_string(),
            individual.individual_id().to_string(),
            individual.father().to_string(),
            individual.mother().to_string(),
            individual.sex().code().to_string(),
            individual.phenotype().code().to_string(),
        ];
        row.extend(header.iter().skip(PED_HEADER.len()).map(|column| {
            individual
                .extra_info
                .get(column)
                .cloned()
                .unwrap_or_else(|| MISSING.to_string())
        }));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_madeline<'a, W: Write>(
    families: impl IntoIterator<Item = &'a Family>,
    writer: W,
) -> Result<(), PedParseError> {
    let mut wtr = tab_writer(writer);
    wtr.write_record(MADELINE_HEADER)?;

    for family in families {
        for individual in family.individuals().values() {
            wtr.write_record([
                individual.family_id(),
                individual.individual_id(),
                individual.sex().madeline_token(),
                madeline_parent(individual.father()),
                madeline_parent(individual.mother()),
                individual.phenotype().madeline_token(),
                individual.proband().madeline_token(),
                individual.consultand().madeline_token(),
                individual.alive().madeline_token(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

fn madeline_parent(parent: &str) -> &str {
    if parent == UNKNOWN_PARENT {
        MISSING
    } else {
        parent
    }
}

fn tab_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(QuoteStyle::Never)
        .has_headers(false)
        .from_writer(writer)
}
