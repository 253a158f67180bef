// ==============================================================================
// main.rs - Pedigree Parser Entry Point
// ==============================================================================
// Description: Command line tool to validate pedigree files and convert them
//              to PED, JSON or Madeline format
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ped_parser::output::{self, OutputFormat};
use ped_parser::{FamilyParser, FamilyType, ModelPolicy};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// A file with pedigree information
    pedigree_file: PathBuf,

    /// Pedigree file flavour
    #[arg(short = 't', long, value_enum, env = "PED_FAMILY_TYPE", default_value_t = FamilyType::Ped)]
    family_type: FamilyType,

    /// Output format (prints a summary when omitted)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write output here instead of stdout
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Drop unknown genetic model names instead of failing
    #[arg(long, env = "PED_LENIENT_MODELS")]
    lenient_models: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = match args.verbose {
        0 => "ped_parser=warn",
        1 => "ped_parser=info",
        _ => "ped_parser=debug",
    };

    // Initialize tracing (stderr, stdout carries the output)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let policy = if args.lenient_models {
        ModelPolicy::Lenient
    } else {
        ModelPolicy::Strict
    };

    let mut parser = FamilyParser::new(args.family_type).with_model_policy(policy);
    parser
        .parse(&args.pedigree_file)
        .with_context(|| format!("Failed to parse pedigree file {:?}", args.pedigree_file))?;

    let writer: Box<dyn Write> = match &args.outfile {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    match args.format {
        Some(format) => {
            output::write_output(format, parser.families().values(), &mut writer)
                .context("Failed to write output")?;
            info!("Wrote {} output", format.extension());
        }
        None => write_summary(&parser, &mut writer)?,
    }

    writer.flush()?;
    Ok(())
}

fn write_summary(parser: &FamilyParser, writer: &mut impl Write) -> Result<()> {
    let family_ids: Vec<&str> = parser.families().keys().map(String::as_str).collect();
    writeln!(writer, "Families: {}", family_ids.join(","))?;

    for family in parser.families().values() {
        let models: Vec<&str> = family
            .models_of_inheritance
            .iter()
            .map(|m| m.as_str())
            .collect();
        let affected: Vec<&str> = family
            .affected_individuals()
            .iter()
            .map(String::as_str)
            .collect();

        writeln!(writer, "Fam {}", family.family_id())?;
        writeln!(writer, "Models: {}", models.join(","))?;
        writeln!(writer, "Individuals: ")?;
        for individual in family.individuals().values() {
            writeln!(writer, "{}", individual)?;
        }
        writeln!(writer, "Trios: {}", family.get_trios().len())?;
        writeln!(writer, "Duos: {}", family.get_duos().len())?;
        writeln!(writer, "Affected individuals: {}", affected.join(","))?;
        writeln!(writer)?;
    }

    Ok(())
}
