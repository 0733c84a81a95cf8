use clap::{Arg, ArgAction, ArgMatches, Command};
use pulsec_core::analysis::{IsConstantAnalogCircuit, IsConstantWaveform};
use pulsec_core::generate_error_report;
use pulsec_core::ir::{AnalogCircuit, Assignments};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::io;
use std::str::FromStr;

mod output;

use output::{DriveRow, OutputHandler, drive_table};

fn main() {
    let cli = Command::new("pulsec")
        .version("0.1.0")
        .about("Inspect and analyze compiled analog pulse programs");

    let cli = setup_cli(cli);
    let matches = cli.get_matches();
    std::process::exit(dispatch_commands(&matches));
}

/// Sets up the CLI with subcommands and arguments.
fn setup_cli(cli: Command) -> Command {
    cli.subcommand(
        Command::new("check")
            .about("Decide whether a circuit is constant in time")
            .arg(
                Arg::new("file")
                    .help("Circuit JSON file")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("assign")
                    .help("Bind a free variable, e.g. --assign delta=1.5")
                    .short('a')
                    .long("assign")
                    .action(ArgAction::Append)
                    .value_parser(parse_assignment)
                    .value_name("NAME=VALUE"),
            )
            .arg(
                Arg::new("assignments")
                    .help("JSON object of variable bindings; --assign overrides it")
                    .long("assignments")
                    .value_parser(clap::value_parser!(String))
                    .value_name("FILE"),
            )
            .arg(
                Arg::new("json")
                    .help("Print machine-readable output")
                    .long("json")
                    .action(ArgAction::SetTrue),
            ),
    )
    .subcommand(
        Command::new("show")
            .about("Print a circuit")
            .arg(
                Arg::new("file")
                    .help("Circuit JSON file")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::new("json")
                    .help("Print the normalized JSON instead of the tree")
                    .long("json")
                    .action(ArgAction::SetTrue),
            ),
    )
}

/// Dispatches the command based on the parsed arguments and returns the
/// process exit code.
fn dispatch_commands(matches: &ArgMatches) -> i32 {
    let result = match matches.subcommand() {
        Some(("check", sub_m)) => run_check(sub_m),
        Some(("show", sub_m)) => run_show(sub_m),
        _ => {
            println!("No valid subcommand was used. Use --help for more information.");
            return 2;
        }
    };

    match result {
        Ok(()) => 0,
        Err(message) => {
            let style = output::FormatStyle::default().error;
            eprintln!("{}", style.apply_to(message));
            1
        }
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    is_constant: bool,
    drives: Vec<DriveRow>,
    effective_analog_circuit: &'a AnalogCircuit,
}

fn run_check(sub_m: &ArgMatches) -> Result<(), String> {
    let file = sub_m
        .get_one::<String>("file")
        .ok_or("missing circuit file")?;
    let circuit = load_circuit(file)?;
    let assignments = load_assignments(sub_m)?;

    let result = IsConstantAnalogCircuit::new(&assignments)
        .emit(&circuit)
        .map_err(|e| generate_error_report(&e))?;

    let mut drives = Vec::new();
    for (coupling, field, modulation, waveform) in circuit.sequence.drives() {
        let folded = IsConstantWaveform::new(&assignments)
            .emit(waveform)
            .map_err(|e| generate_error_report(&e))?;
        drives.push(DriveRow {
            coupling: coupling.to_string(),
            field: field.to_string(),
            modulation: modulation.to_string(),
            duration: folded.duration().unwrap_or_default(),
            value: folded.value().unwrap_or_default(),
            is_constant: folded.is_constant,
        });
    }

    let mut out = OutputHandler::new(io::stdout().lock());
    let written = if sub_m.get_flag("json") {
        out.json(&CheckReport {
            is_constant: result.is_constant,
            drives,
            effective_analog_circuit: &result.effective_analog_circuit,
        })
    } else {
        out.title(file)
            .and_then(|_| out.table(&drive_table(&drives)))
            .and_then(|_| out.verdict(result.is_constant))
    };
    written.map_err(|e| format!("Failed to write output: {e}"))
}

fn run_show(sub_m: &ArgMatches) -> Result<(), String> {
    let file = sub_m
        .get_one::<String>("file")
        .ok_or("missing circuit file")?;
    let circuit = load_circuit(file)?;

    let mut out = OutputHandler::new(io::stdout().lock());
    let written = if sub_m.get_flag("json") {
        out.json(&circuit)
    } else {
        out.title(file)
            .and_then(|_| out.line(&circuit.to_string(), None))
    };
    written.map_err(|e| format!("Failed to write output: {e}"))
}

fn load_circuit(path: &str) -> Result<AnalogCircuit, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("Invalid circuit in {path}: {e}"))
}

fn load_assignments(sub_m: &ArgMatches) -> Result<Assignments, String> {
    let mut assignments = match sub_m.get_one::<String>("assignments") {
        Some(path) => {
            let text =
                fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))?;
            serde_json::from_str::<Assignments>(&text)
                .map_err(|e| format!("Invalid assignments in {path}: {e}"))?
        }
        None => Assignments::new(),
    };
    if let Some(pairs) = sub_m.get_many::<(String, Decimal)>("assign") {
        assignments.extend(pairs.cloned());
    }
    Ok(assignments)
}

fn parse_assignment(raw: &str) -> Result<(String, Decimal), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let value = Decimal::from_str(value.trim())
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.trim().to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_flag_parses_name_and_decimal() {
        let (name, value) = parse_assignment("delta = 1.25").unwrap();
        assert_eq!(name, "delta");
        assert_eq!(value, Decimal::new(125, 2));
        assert!(parse_assignment("delta").is_err());
        assert!(parse_assignment("delta=abc").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        setup_cli(Command::new("pulsec")).debug_assert();
    }
}
