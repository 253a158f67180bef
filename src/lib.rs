// ==============================================================================
// lib.rs - Pedigree Parser Library
// ==============================================================================
// Description: Library interface for pedigree parsing, validation and output
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod error;
pub mod models;
pub mod individual;
pub mod family;
pub mod parsers;
pub mod output;

pub use error::PedParseError;
pub use family::Family;
pub use individual::Individual;
pub use models::{GeneticModel, ModelAliases, ModelPolicy, Phenotype, Sex, TriState, UNKNOWN_PARENT};
pub use parsers::{FamilyParser, FamilyType};
