//! Minimal CLI: pattern registry → (introspection | binding)
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::lookup::Lookup;
use crate::pattern::{PatternRegistry, RegistryError};
use crate::value::StructValue;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// inspect pattern argument schemas and bind flat `key=value` parameters against them
#[derive(Parser, Debug)]
#[command(name = "pattern-lens", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print `true` if the name is a registered pattern
    IsPattern(PatternName),
    /// print the pattern's name, docs and parameter tree as JSON
    Info(InfoOut),
    /// print only the parameter tree as JSON
    Params(PatternName),
    /// bind parameters and print the typed result as JSON
    Bind(BindOut),
    /// bind every parameter file independently and report pass/fail
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct PatternName {
    /// registered pattern name (e.g. saga)
    name: String,
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// Parameter files: literal paths or quoted glob patterns
    #[arg(long, short)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct InfoOut {
    #[command(flatten)]
    pattern: PatternName,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct BindOut {
    #[command(flatten)]
    pattern: PatternName,

    #[command(flatten)]
    input_settings: InputSettings,

    /// inline parameter, applied after files (`-p item.0.service=orders`)
    #[arg(long = "param", short = 'p', value_parser = crate::params_file::parse_assignment)]
    params: Vec<(String, String)>,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    pattern: PatternName,

    #[command(flatten)]
    input_settings: InputSettings,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn resolve(&self) -> Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input)
    }

    /// Merge every file in order; later files override earlier keys.
    fn load_merged(&self) -> Result<IndexMap<String, String>> {
        let mut merged = IndexMap::new();
        for path in self.resolve()? {
            tracing::debug!(path = %path.display(), "loading parameter file");
            merged.extend(crate::params_file::from_path(&path)?);
        }
        Ok(merged)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self, registry: &PatternRegistry) -> Result<()> {
        match &self.cmd {
            Command::IsPattern(target) => {
                println!("{}", registry.is_pattern(&target.name));
            }
            Command::Info(target) => {
                let info = registry.info(&target.pattern.name)?;
                let info_src = serde_json::to_string_pretty(&info)?;
                emit(target.out.as_deref(), &info_src)?;
            }
            Command::Params(target) => {
                let info = registry.info(&target.name)?;
                println!("{}", serde_json::to_string_pretty(&info.params)?);
            }
            Command::Bind(target) => {
                let mut params = target.input_settings.load_merged()?;
                params.extend(target.params.iter().cloned());
                tracing::debug!(pattern = %target.pattern.name, count = params.len(), "binding parameters");

                let bound = bind_located(registry, &target.pattern.name, &params)?;
                let bound_src = serde_json::to_string_pretty(&bound)?;
                emit(target.out.as_deref(), &bound_src)?;
            }
            Command::Check(target) => {
                let name = &target.pattern.name;
                // fail on unknown pattern before touching any file
                registry.get(name)?;
                let paths = target.input_settings.resolve()?;
                if paths.is_empty() {
                    bail!("no parameter files given");
                }

                let outcomes = paths
                    .par_iter()
                    .map(|path| -> Result<()> {
                        let params = crate::params_file::from_path(path)?;
                        bind_located(registry, name, &params)?;
                        Ok(())
                    })
                    .collect::<Vec<_>>();

                let mut failed = 0usize;
                for (path, outcome) in paths.iter().zip(outcomes) {
                    match outcome {
                        Ok(()) => eprintln!("{} {}", "✅ ok".green(), path.display()),
                        Err(error) => {
                            failed += 1;
                            eprintln!("{} {}: {error:#}", "❌ failed".red(), path.display());
                        }
                    }
                }
                if failed > 0 {
                    bail!("{failed} of {} parameter files failed to bind", paths.len());
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Bind through the registry; parse failures carry the key path they point at.
fn bind_located(registry: &PatternRegistry, name: &str, lookup: &dyn Lookup) -> Result<StructValue> {
    registry.bind(name, lookup).map_err(|error| match &error {
        RegistryError::Parse { source, .. } => {
            let key = source.key().to_string();
            anyhow::Error::new(error).context(format!("binding failed at '{key}'"))
        }
        _ => error.into(),
    })
}

fn emit(out: Option<&Path>, src: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))?;
        }
        None => println!("{src}"),
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
