//! CLI command implementations.
//!
//! Each subcommand has its own module with an Args struct and a run()
//! function. The two subcommands are the two instances of the one
//! compiler engine, parameterized by their variant descriptor.

pub mod competencies;
pub mod skills;

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::Cli;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::compiler::{CompileOptions, Compiler};
use crate::config::Config;
use crate::error::{Result, SkcError};
use crate::variant::Variant;

pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Skills(args) => skills::run(cli, &config, args),
        Commands::Competencies(args) => competencies::run(cli, &config, args),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile skill records into a collection artifact
    Skills(skills::SkillsArgs),

    /// Compile competency records into a collection artifact
    Competencies(competencies::CompetenciesArgs),
}

/// `--write` XOR `--check`, shared by both engine instances.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ModeArgs {
    /// Write the artifact, overwriting any previous version
    #[arg(long)]
    pub write: bool,

    /// Verify the existing artifact matches the current sources
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Write,
    Check,
}

impl ModeArgs {
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.write { Mode::Write } else { Mode::Check }
    }
}

/// Unresolved per-invocation inputs, as given on the command line.
pub(crate) struct RawArgs<'a> {
    pub meta: Option<&'a Path>,
    pub dir: Option<&'a Path>,
    pub out: Option<&'a Path>,
    pub sort_by: Option<&'a str>,
    pub mode: Mode,
}

pub(crate) fn run_compile(
    cli: &Cli,
    config: &Config,
    variant: &'static Variant,
    raw: &RawArgs<'_>,
) -> Result<()> {
    let options = resolve_options(config, variant, raw)?;
    let compiler = Compiler::new(variant, options);
    let compiled = compiler.compile()?;

    match raw.mode {
        Mode::Write => {
            compiler.write(&compiled.bytes)?;
            report(cli, variant, &compiler, &compiled, "write", "written")
        }
        Mode::Check => {
            compiler.check(&compiled.bytes)?;
            // An up-to-date artifact succeeds silently in human mode.
            if cli.robot {
                report(cli, variant, &compiler, &compiled, "check", "up-to-date")
            } else {
                Ok(())
            }
        }
    }
}

fn resolve_options(
    config: &Config,
    variant: &'static Variant,
    raw: &RawArgs<'_>,
) -> Result<CompileOptions> {
    let section = config.variant(variant);
    let meta_path = raw
        .meta
        .map(Path::to_path_buf)
        .or_else(|| section.meta.clone())
        .unwrap_or_else(|| PathBuf::from(variant.default_meta));
    let records_dir = raw
        .dir
        .map(Path::to_path_buf)
        .or_else(|| section.dir.clone())
        .unwrap_or_else(|| PathBuf::from(variant.default_dir));
    let out_path = raw
        .out
        .map(Path::to_path_buf)
        .or_else(|| section.out.clone())
        .unwrap_or_else(|| PathBuf::from(variant.default_out));

    let sort_name = raw
        .sort_by
        .map(str::to_string)
        .or_else(|| section.sort_by.clone())
        .unwrap_or_else(|| variant.default_sort.to_string());
    let sort_field = variant.sort_field(&sort_name).ok_or_else(|| {
        SkcError::InvalidArgument(format!(
            "--sort-by {sort_name:?} is not valid for {}; expected one of: {}",
            variant.name,
            variant.sort_key_list()
        ))
    })?;

    Ok(CompileOptions {
        meta_path,
        records_dir,
        out_path,
        sort_field: sort_field.to_string(),
    })
}

#[derive(Serialize)]
struct CompileReport<'a> {
    variant: &'a str,
    action: &'a str,
    artifact: String,
    records: usize,
    digest: String,
    status: &'a str,
}

fn report(
    cli: &Cli,
    variant: &Variant,
    compiler: &Compiler,
    compiled: &crate::compiler::Compiled,
    action: &str,
    status: &str,
) -> Result<()> {
    if cli.robot {
        return emit_json(&CompileReport {
            variant: variant.name,
            action,
            artifact: compiler.out_path().display().to_string(),
            records: compiled.records,
            digest: compiled.digest(),
            status,
        });
    }

    let mut layout = HumanLayout::new();
    layout.kv("Artifact", &compiler.out_path().display().to_string());
    layout.kv("Records", &compiled.records.to_string());
    layout.bullet(status);
    emit_human(layout);
    Ok(())
}
