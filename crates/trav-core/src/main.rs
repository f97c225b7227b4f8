//! `trav` command line: run or explain bytecode programs

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use trav_core::{Bytecode, Compiler, MachineConfig, Value};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let bytecode = Arg::new("bytecode")
        .long("bytecode")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Bytecode program as JSON");

    Command::new("trav")
        .version(trav_core::VERSION)
        .about("Traversal machine")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("run")
                .about("Compile a bytecode program and print its outputs")
                .arg(bytecode.clone())
                .arg(
                    Arg::new("input")
                        .long("input")
                        .action(ArgAction::Append)
                        .help("Input object as JSON (repeatable, defaults to a single null)"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Machine configuration (TOML)"),
                ),
        )
        .subcommand(
            Command::new("explain")
                .about("Compile a bytecode program and print its pipeline")
                .arg(bytecode),
        )
}

fn load_bytecode(args: &ArgMatches) -> Result<Bytecode> {
    let path = args
        .get_one::<PathBuf>("bytecode")
        .context("missing --bytecode")?;
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Bytecode::from_json(&json).with_context(|| format!("invalid bytecode in {}", path.display()))
}

fn run(args: &ArgMatches) -> Result<()> {
    let config = match args.get_one::<PathBuf>("config") {
        Some(path) => MachineConfig::from_file(path)?,
        None => MachineConfig::default(),
    };
    let inputs = match args.get_many::<String>("input") {
        Some(raw) => raw
            .map(|json| {
                serde_json::from_str::<serde_json::Value>(json)
                    .map(Value::from)
                    .with_context(|| format!("invalid input {json}"))
            })
            .collect::<Result<Vec<_>>>()?,
        None => vec![Value::Null],
    };

    let bytecode = load_bytecode(args)?;
    let program = Compiler::with_defaults().with_config(config).compile(&bytecode)?;
    tracing::info!(program = %program, inputs = inputs.len(), "running");

    for output in program.evaluate_objects(inputs)? {
        println!("{output}");
    }
    Ok(())
}

fn explain(args: &ArgMatches) -> Result<()> {
    let bytecode = load_bytecode(args)?;
    let program = Compiler::with_defaults().compile(&bytecode)?;
    println!("{bytecode}");
    println!("{program}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("run", args)) => run(args),
        Some(("explain", args)) => explain(args),
        _ => unreachable!("subcommand_required"),
    }
}
