// Copyright 2024 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::{io::Write, path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cliutil::{cli_main, ConfigBuilder};
use gn2bp::{
    blueprint::{render_blueprint, DEFAULT_MODULE_PREFIX},
    desc::BuildGraph,
    generate::generate_modules,
    rust_flags::normalize_rust_flags,
};

#[derive(Parser, Debug)]
#[command(name = "gn2bp")]
#[command(about = "Converts GN rust targets into Android.bp modules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    commands: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    NormalizeFlags(NormalizeFlagsArgs),
    Generate(GenerateArgs),
}

/// Prints the normalized table of the given rust flags as JSON.
///
/// Pass `--` before the flags so that they are not taken as options.
#[derive(Parser, Debug)]
struct NormalizeFlagsArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    flags: Vec<String>,
}

/// Generates Android.bp rust modules from a `gn desc --format=json` dump.
#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Build graph description in JSON.
    #[arg(long, value_name = "FILE")]
    desc: PathBuf,

    /// GN label of a target to convert. May be repeated. Defaults to every
    /// rust target in the build graph.
    #[arg(long = "target", value_name = "LABEL")]
    targets: Vec<String>,

    /// Prefix for generated module names.
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_MODULE_PREFIX)]
    module_prefix: String,

    /// Where to write the Android.bp. Defaults to stdout.
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,
}

fn do_normalize_flags(args: NormalizeFlagsArgs) -> Result<()> {
    let flags = normalize_rust_flags(&args.flags)?;
    println!("{}", serde_json::to_string_pretty(&flags.into_inner())?);
    Ok(())
}

fn do_generate(args: GenerateArgs) -> Result<()> {
    let graph = BuildGraph::load(&args.desc)?;
    let modules = generate_modules(&graph, &args.module_prefix, &args.targets)?;
    let content = render_blueprint(&modules)?;

    match &args.output {
        Some(output) => std::fs::write(output, content)
            .with_context(|| format!("Failed to write {}", output.display()))?,
        None => std::io::stdout().lock().write_all(content.as_bytes())?,
    }
    Ok(())
}

fn do_main() -> Result<()> {
    let cli = Cli::try_parse()?;
    match cli.commands {
        Commands::NormalizeFlags(args) => do_normalize_flags(args),
        Commands::Generate(args) => do_generate(args),
    }
}

fn main() -> ExitCode {
    let config = match ConfigBuilder::new().log_command_line(false).build() {
        Ok(config) => config,
        Err(error) => return cliutil::handle_top_level_result::<(), _>(Err(error)),
    };
    cli_main(do_main, config)
}
