//! skc skills - compile skill records into a collection artifact.

use std::path::PathBuf;

use clap::Args;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::Result;
use crate::variant;

use super::{ModeArgs, RawArgs, run_compile};

#[derive(Args, Debug)]
pub struct SkillsArgs {
    /// Path to the collection metadata file
    #[arg(long, value_name = "PATH")]
    pub meta: Option<PathBuf>,

    /// Root directory of skill record files
    #[arg(long = "skills-dir", value_name = "DIR")]
    pub skills_dir: Option<PathBuf>,

    /// Artifact output path
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Sort key: id or skillName
    #[arg(long = "sort-by", value_name = "KEY")]
    pub sort_by: Option<String>,

    #[command(flatten)]
    pub mode: ModeArgs,
}

pub fn run(cli: &Cli, config: &Config, args: &SkillsArgs) -> Result<()> {
    run_compile(
        cli,
        config,
        &variant::SKILLS,
        &RawArgs {
            meta: args.meta.as_deref(),
            dir: args.skills_dir.as_deref(),
            out: args.out.as_deref(),
            sort_by: args.sort_by.as_deref(),
            mode: args.mode.mode(),
        },
    )
}
