//! Prune the `"definitions"` object of a JSON document.
//!
//! Reads the input document, keeps only the allow-listed definitions, and
//! writes the result as indented JSON (or prints it with `--stdout`). Without
//! flags it reproduces the historical batch job: `mon_fichier.json` in,
//! `mon_fichier_filtré.json` out, keeping `Adresse`, `Utilisateur` and
//! `Commande`.

use anyhow::{Context, Result, bail};
use definitions_filter::{
    AllowList, DEFAULT_DEFINITIONS_KEY, FilterOptions, filter_definitions_with, parse_allow_list,
    split_list, to_pretty_string, write_document,
};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT: &str = "mon_fichier.json";
const DEFAULT_OUTPUT: &str = "mon_fichier_filtré.json";
const DEFAULT_KEYS: [&str; 3] = ["Adresse", "Utilisateur", "Commande"];

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let args = match CliArgs::parse()? {
        Invocation::Run(args) => args,
        Invocation::Help => {
            print_usage();
            return Ok(());
        }
    };
    debug!(
        input = %args.input.display(),
        keys = ?args.allow.names(),
        definitions_key = %args.options.definitions_key,
        "filtering definitions"
    );

    let filtered = filter_definitions_with(&args.input, &args.allow, &args.options)?;

    match args.destination {
        Destination::Stdout => {
            println!("{}", to_pretty_string(&filtered)?);
        }
        Destination::File(path) => {
            write_document(&filtered, &path)?;
            println!("Filtered file saved: {}", path.display());
        }
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Destination {
    File(PathBuf),
    Stdout,
}

#[derive(Debug)]
enum Invocation {
    Run(CliArgs),
    Help,
}

#[derive(Debug)]
struct CliArgs {
    input: PathBuf,
    destination: Destination,
    allow: AllowList,
    options: FilterOptions,
}

impl CliArgs {
    fn parse() -> Result<Invocation> {
        Self::parse_from(env::args_os().skip(1))
    }

    fn parse_from(args: impl IntoIterator<Item = std::ffi::OsString>) -> Result<Invocation> {
        let mut args = args.into_iter();
        let mut input: Option<PathBuf> = None;
        let mut output: Option<PathBuf> = None;
        let mut to_stdout = false;
        let mut keep: Vec<String> = Vec::new();
        let mut keep_given = false;
        let mut keys_file: Option<PathBuf> = None;
        let mut definitions_key: Option<String> = None;

        while let Some(arg_os) = args.next() {
            let arg = arg_os
                .into_string()
                .map_err(|_| anyhow::anyhow!("argument is not valid UTF-8"))?;
            match arg.as_str() {
                "--input" => {
                    if input.is_some() {
                        bail!("--input may only be provided once");
                    }
                    input = Some(PathBuf::from(next_value(&mut args, "--input")?));
                }
                "--output" => {
                    if output.is_some() {
                        bail!("--output may only be provided once");
                    }
                    output = Some(PathBuf::from(next_value(&mut args, "--output")?));
                }
                "--stdout" => to_stdout = true,
                "--keep" => {
                    let raw = next_value(&mut args, "--keep")?;
                    keep_given = true;
                    keep.extend(split_list(&raw));
                }
                "--keys-file" => {
                    if keys_file.is_some() {
                        bail!("--keys-file may only be provided once");
                    }
                    keys_file = Some(PathBuf::from(next_value(&mut args, "--keys-file")?));
                }
                "--definitions-key" => {
                    if definitions_key.is_some() {
                        bail!("--definitions-key may only be provided once");
                    }
                    let raw = next_value(&mut args, "--definitions-key")?;
                    if raw.is_empty() {
                        bail!("--definitions-key must not be empty");
                    }
                    definitions_key = Some(raw);
                }
                "--help" | "-h" => return Ok(Invocation::Help),
                other => bail!("unknown flag: {other}"),
            }
        }

        let destination = match (output, to_stdout) {
            (Some(_), true) => bail!("--output cannot be combined with --stdout"),
            (_, true) => Destination::Stdout,
            (Some(path), false) => Destination::File(path),
            (None, false) => Destination::File(PathBuf::from(DEFAULT_OUTPUT)),
        };

        let mut allow = match &keys_file {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading keys file {}", path.display()))?;
                parse_allow_list(&raw)
                    .with_context(|| format!("parsing keys file {}", path.display()))?
            }
            None => AllowList::default(),
        };
        allow.extend(keep.iter().cloned());
        if keys_file.is_none() && !keep_given {
            allow.extend(DEFAULT_KEYS);
        }

        Ok(Invocation::Run(CliArgs {
            input: input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            destination,
            allow,
            options: FilterOptions {
                definitions_key: definitions_key
                    .unwrap_or_else(|| DEFAULT_DEFINITIONS_KEY.to_string()),
            },
        }))
    }
}

fn next_value(args: &mut impl Iterator<Item = std::ffi::OsString>, flag: &str) -> Result<String> {
    args.next()
        .map(|os| {
            os.into_string()
                .map_err(|_| anyhow::anyhow!("value for {flag} is not valid UTF-8"))
        })
        .transpose()?
        .ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))
}

fn usage() -> &'static str {
    "Usage: filter-definitions [--input PATH] [--output PATH|--stdout] [--keep NAMES]... [--keys-file PATH] [--definitions-key NAME]\n\
Keeps only the named entries of the document's top-level definitions object and writes the result as indented JSON.\n\
Defaults: --input mon_fichier.json --output mon_fichier_filtré.json --keep Adresse,Utilisateur,Commande\n"
}

fn print_usage() {
    print!("{}", usage());
}
