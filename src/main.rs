//! Binary entry point for the `hcre` command-line tool.
//!
//! Thin by design: argument parsing lives in [`hcre::cli::args`], rule-file
//! ingestion in [`hcre::io::rules_file`], and the word/rule loop in
//! [`hcre::io::driver`] (or [`hcre::io::parallel`] under the `parallel`
//! feature). `main` only wires them together and maps outcomes to an exit
//! code (spec §6.2).

use std::io::{self, BufReader};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use hcre::cli::args::Cli;
use hcre::cli::constants::set_display_level;
use hcre::displaylevel;
use hcre::io::{driver, rules_file};
use hcre::registry::RuleRegistry;

fn main() -> ExitCode {
    let cli = Cli::parse();
    set_display_level(cli.display_level());

    if cli.rule_files.is_empty() {
        print_usage();
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("hcre: {:#}", e);
            // spec §6.2: exit -1 on failure to open a rule file. Rust
            // process exit codes are unsigned bytes; -1 as u8 is the
            // same wire value a shell observes from a C program returning
            // -1. I/O errors during the word/rule loop share the same exit
            // path, since neither is recoverable at this level.
            ExitCode::from(255)
        }
    }
}

/// Load every rule file and run the driver, bundling failures into a single
/// `anyhow::Result` chain the way the teacher's `cli::args::parse_args`
/// bundles argument-parsing failures for `main` to report uniformly.
fn run(cli: &Cli) -> Result<()> {
    let mut registry = RuleRegistry::new();
    for path in &cli.rule_files {
        let n = rules_file::load_rule_file(path, &mut registry)
            .with_context(|| format!("cannot open rule file {}", path.display()))?;
        displaylevel!(3, "loaded {} rule(s) from {}", n, path.display());
    }

    if registry.is_empty() {
        eprintln!("hcre: no valid rules loaded, nothing to do");
        return Ok(());
    }

    let stdin = io::stdin();
    let input = BufReader::new(stdin.lock());
    let stdout = io::stdout();
    let output = stdout.lock();

    run_driver(cli, input, output, &mut registry).context("I/O error while mangling words")
}

#[cfg(feature = "parallel")]
fn run_driver<R: io::BufRead, W: io::Write>(
    cli: &Cli,
    input: R,
    output: W,
    registry: &mut RuleRegistry,
) -> io::Result<()> {
    let jobs = cli.jobs.unwrap_or_else(hcre::io::parallel::default_jobs);
    if jobs > 1 {
        hcre::io::parallel::run(input, output, registry, cli.debug_rules, jobs)
    } else {
        driver::run(input, output, registry, cli.debug_rules)
    }
}

#[cfg(not(feature = "parallel"))]
fn run_driver<R: io::BufRead, W: io::Write>(
    cli: &Cli,
    input: R,
    output: W,
    registry: &mut RuleRegistry,
) -> io::Result<()> {
    driver::run(input, output, registry, cli.debug_rules)
}

fn print_usage() {
    println!("hcre {} — hashcat/John-the-Ripper compatible rules engine", hcre::VERSION);
    println!();
    println!("USAGE:");
    println!("    hcre <rule_file> [<rule_file> ...] < words.txt > candidates.txt");
    println!();
    println!("Words are read from standard input, one per line. Every loaded rule is");
    println!("applied to every word; successful transformations go to standard output.");
}
