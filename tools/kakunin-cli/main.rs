use clap::{Parser, Subcommand};
use itertools::Itertools;
use kakunin::prelude::*;
use std::io::{self, Write};
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Validate and calculate physics formula inputs from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a formula catalog JSON file. Defaults to the built-in catalog.
    #[arg(short, long, global = true)]
    catalog: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace). Overridden by RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the formulas in the catalog
    List,
    /// Report per-field status and solvability without calculating
    Check(InputArgs),
    /// Validate the inputs and calculate the result
    Calc(InputArgs),
}

#[derive(clap::Args, Debug)]
struct InputArgs {
    /// Formula id, e.g. `force_on_wire`. Optional when the snapshot names one.
    formula: Option<String>,

    /// Field value as NAME=VALUE or NAME=VALUE:UNIT. Repeatable.
    #[arg(short, long = "set", value_name = "NAME=VALUE[:UNIT]")]
    set: Vec<String>,

    /// Path to a snapshot JSON file
    #[arg(long)]
    snapshot: Option<String>,

    /// Prompt for every field of the formula
    #[arg(short = 'i', long)]
    interactive: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = load_catalog(cli.catalog.as_deref());
    let registry = FormulaRegistry::with_defaults();

    let exit_code = match cli.command {
        Command::List => {
            run_list(&catalog, &registry);
            0
        }
        Command::Check(args) => run_check(&catalog, args),
        Command::Calc(args) => run_calc(&catalog, &registry, args),
    };
    std::process::exit(exit_code);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_catalog(path: Option<&str>) -> Catalog {
    let start = Instant::now();
    let catalog = match path {
        Some(path) => Catalog::from_file(path),
        None => Catalog::builtin(),
    }
    .unwrap_or_else(|e| exit_with_error(&format!("Failed to load formula catalog: {}", e)));
    debug!(elapsed = ?start.elapsed(), "catalog ready");
    catalog
}

fn run_list(catalog: &Catalog, registry: &FormulaRegistry) {
    println!("{} formulas:", catalog.len());
    for schema in catalog.schemas() {
        let variables = schema.variables().iter().map(|v| v.name()).join(", ");
        let evaluator = if registry.contains(schema.id()) {
            ""
        } else {
            " (no evaluator)"
        };
        println!(
            "  {:<20} {} -> {} [{} of {}]{}",
            schema.id(),
            schema.title(),
            schema.result().map_or("(empty fields)", |r| r.name()),
            schema.min_required(),
            variables,
            evaluator
        );
    }
}

fn run_check(catalog: &Catalog, args: InputArgs) -> i32 {
    let (schema, snapshot) = resolve_inputs(catalog, args);
    let assessment = Validator::new(schema).assess(&snapshot);
    let messages = MessageFormatter::new(schema);

    println!("{}:", schema.title());
    for report in &assessment.fields {
        let name = &report.value.variable_name;
        let status = match &report.status {
            FieldStatus::Empty => "-".to_string(),
            FieldStatus::Valid => format!("ok ({})", report.value.raw_text.trim()),
            FieldStatus::Suppressed => "disabled".to_string(),
            FieldStatus::Invalid(e) => messages.format_error(e),
        };
        println!("  {:<24} {}", schema.label_for(name), status);
    }

    match messages.format_outcome(&assessment.outcome) {
        None => {
            println!("\n  -> Ready to calculate");
            0
        }
        Some(message) => {
            println!("\n  -> {}", message);
            1
        }
    }
}

fn run_calc(catalog: &Catalog, registry: &FormulaRegistry, args: InputArgs) -> i32 {
    let (schema, snapshot) = resolve_inputs(catalog, args);
    let calculator = Calculator::from_catalog(catalog, registry, schema.id())
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));
    let messages = MessageFormatter::new(schema);

    let start = Instant::now();
    let result = calculator.calculate(&snapshot);
    debug!(elapsed = ?start.elapsed(), "calculation finished");

    match result {
        Ok(calc) => {
            println!("{}:", schema.title());
            for (name, value) in calc.inputs.iter() {
                let unit = schema
                    .variable(name)
                    .map(|v| v.canonical_unit())
                    .unwrap_or("");
                println!(
                    "  {:<24} {} {}",
                    schema.label_for(name),
                    MessageFormatter::format_value(value),
                    unit
                );
            }
            println!();
            for q in &calc.results {
                println!(
                    "  -> {} = {} {}",
                    schema.label_for(&q.name),
                    MessageFormatter::format_value(q.value),
                    q.unit
                );
            }
            0
        }
        Err(e) => {
            eprintln!("\nError ({}): {}", e.kind(), messages.format_error(&e));
            1
        }
    }
}

/// Builds the snapshot from the snapshot file, `--set` flags, and prompts, in that order.
fn resolve_inputs(catalog: &Catalog, args: InputArgs) -> (&FormulaSchema, InputSnapshot) {
    let mut snapshot = match &args.snapshot {
        Some(path) => InputSnapshot::from_file(path).unwrap_or_else(|e| {
            exit_with_error(&format!("Failed to load snapshot from '{}': {}", path, e))
        }),
        None => InputSnapshot::new(),
    };

    let formula_id = args
        .formula
        .or_else(|| snapshot.formula.clone())
        .unwrap_or_else(|| exit_with_error("A formula id is required (see `kakunin-cli list`)."));
    let schema = catalog
        .get(&formula_id)
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    for assignment in &args.set {
        let (name, raw, unit) = parse_assignment(assignment).unwrap_or_else(|| {
            exit_with_error(&format!(
                "Invalid --set value '{}', expected NAME=VALUE[:UNIT]",
                assignment
            ))
        });
        snapshot.set(name, raw, unit);
    }

    if args.interactive {
        println!("--- {} ---", schema.title());
        println!("Leave a field empty to skip it.");
        for spec in schema.variables() {
            let units = spec.units().join(", ");
            let raw = prompt_for_input(&format!("{} [{}]", spec.label(), units), None);
            if raw.is_empty() {
                continue;
            }
            let unit = if spec.units().len() > 1 {
                prompt_for_input("  unit", Some(spec.canonical_unit()))
            } else {
                String::new()
            };
            snapshot.set(spec.name(), &raw, &unit);
        }
    }

    (schema, snapshot.for_formula(&formula_id))
}

fn parse_assignment(assignment: &str) -> Option<(&str, &str, &str)> {
    let (name, rest) = assignment.split_once('=')?;
    let (raw, unit) = rest.split_once(':').unwrap_or((rest, ""));
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, raw.trim(), unit.trim()))
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to write prompt: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read line: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
