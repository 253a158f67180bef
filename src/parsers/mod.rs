// ==============================================================================
// parsers/mod.rs - Pedigree parser modules
// ==============================================================================
// Description: Loaders for pedigree file formats and identifier checks
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

pub mod ped;
pub mod cmms;

pub use ped::{FamilyParser, FamilyType, INHERITANCE_MODEL, PED_COLUMNS};
pub use cmms::{check_sample_id, VALID_AFFECTION_STATUSES};
