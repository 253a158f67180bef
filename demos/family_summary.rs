// ==============================================================================
// family_summary.rs - Example of Pedigree Parser Usage
// ==============================================================================
// Description: Demonstrates loading a pedigree, inspecting the validated
//              relationships and writing Madeline output
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use ped_parser::output::{write_output, OutputFormat};
use ped_parser::{FamilyParser, FamilyType};
use std::io::Write;
use tempfile::NamedTempFile;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Pedigree Parser Example ===\n");

    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "#FamilyID\tSampleID\tFather\tMother\tSex\tPhenotype\tInheritanceModel\tProband")?;
    writeln!(temp_file, "FAM1\tproband\tfather\tmother\t1\t2\tAR_hom;AD_dn\tYes")?;
    writeln!(temp_file, "FAM1\tdaughter\tfather\tmother\t2\t1\tNA\tNo")?;
    writeln!(temp_file, "FAM1\tmother\t0\t0\t2\t1\tNA\tNo")?;
    writeln!(temp_file, "FAM1\tfather\t0\t0\t1\t1\tNA\tNo")?;
    temp_file.flush()?;

    let mut parser = FamilyParser::new(FamilyType::Alt);
    parser.parse(temp_file.path())?;

    for family in parser.families().values() {
        println!("Family {}", family.family_id());

        let models: Vec<&str> = family
            .models_of_inheritance
            .iter()
            .map(|m| m.as_str())
            .collect();
        println!("  Models: {}", models.join(", "));

        for trio in family.get_trios() {
            let members: Vec<&str> = trio.iter().map(String::as_str).collect();
            println!("  Trio: {}", members.join(", "));
        }

        for individual in family.individuals().values() {
            let siblings: Vec<&str> = individual.siblings().iter().map(String::as_str).collect();
            println!(
                "  {:<10} affected={:<5} siblings=[{}]",
                individual.individual_id(),
                individual.is_affected(),
                siblings.join(", ")
            );
        }
    }

    println!("\n--- Madeline ---");
    write_output(OutputFormat::Madeline, parser.families().values(), std::io::stdout())?;

    Ok(())
}
