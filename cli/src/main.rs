//! typefind CLI — driving adapter for the typefind document scanner.
//!
//! Subcommands:
//! - `find <schema> <type> <document> [--count | --trace]` — print the text
//!   values of the document that conform to the named type
//! - `check <schema>` — validate a schema loads without errors
//! - `info` — print registered type URLs
//!
//! Schemas and documents ending in `.json` are read as JSON, anything else as
//! YAML. YAML documents accept the `!symbol`, `!sexp`, `!null` and `!bytes`
//! tags. JSON documents nested deeper than `typefind::MAX_JSON_DEPTH` fail to
//! parse. Set `RUST_LOG=typefind=debug` to see traversal events on stderr.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;
use typefind::{Node, SchemaConfig, StepOutcome};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "find" => cmd_find(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "info" => cmd_info(),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

/// Output mode of `find`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FindMode {
    /// One matched value per line, as a JSON string.
    Values,
    /// Only the number of matches.
    Count,
    /// One line per visited node.
    Trace,
}

#[derive(Debug, PartialEq, Eq)]
struct FindArgs<'a> {
    schema: &'a str,
    type_name: &'a str,
    document: &'a str,
    mode: FindMode,
}

fn cmd_find(args: &[String]) -> Result<(), String> {
    let args = parse_find_args(args)?;

    let registry = build_registry();
    let schema = registry
        .load_schema(load_schema(args.schema)?)
        .map_err(|e| format!("schema load failed: {e}"))?;
    let finder = schema.require(args.type_name).map_err(|e| e.to_string())?;
    let document = load_document(args.document)?;

    match args.mode {
        FindMode::Values => {
            for value in finder.find(&document).map_err(|e| e.to_string())? {
                println!("{}", serde_json::Value::String(value));
            }
        }
        FindMode::Count => {
            println!("{}", finder.count(&document).map_err(|e| e.to_string())?);
        }
        FindMode::Trace => {
            let trace = finder.find_with_trace(&document);
            for step in &trace.steps {
                println!(
                    "{:>6} {}{} {}",
                    step.ordinal,
                    "  ".repeat(step.depth),
                    step.node_type,
                    describe(step.outcome)
                );
            }
            let found = trace.result.map_err(|e| e.to_string())?;
            println!("{} matched", found.len());
        }
    }

    Ok(())
}

fn cmd_check(args: &[String]) -> Result<(), String> {
    if args.is_empty() {
        return Err("check requires a schema file path".into());
    }

    let config = load_schema(&args[0])?;
    let registry = build_registry();

    let schema = registry
        .load_schema(config)
        .map_err(|e| format!("schema invalid: {e}"))?;

    println!("Schema valid (max_depth {})", schema.max_depth());
    for name in schema.names() {
        println!("  {name}");
    }
    Ok(())
}

#[allow(clippy::unnecessary_wraps)] // Uniform return type for all commands
fn cmd_info() -> Result<(), String> {
    let registry = build_registry();

    println!("Registered predicates:");
    for url in registry.type_urls() {
        println!("  {url}");
    }

    Ok(())
}

fn describe(outcome: StepOutcome) -> String {
    match outcome {
        StepOutcome::SkippedNull => "skipped".into(),
        StepOutcome::Descended { children } => format!("descended ({children})"),
        StepOutcome::Matched => "matched".into(),
        StepOutcome::Rejected => "rejected".into(),
        StepOutcome::NotText => "not text".into(),
        StepOutcome::Failed => "FAILED".into(),
        StepOutcome::TooDeep => "TOO DEEP".into(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry assembly (composition root)
// ═══════════════════════════════════════════════════════════════════════════════

fn build_registry() -> typefind::Registry {
    let builder = typefind::RegistryBuilder::new();
    typefind_test::register(builder).build()
}

// ═══════════════════════════════════════════════════════════════════════════════
// File loading
// ═══════════════════════════════════════════════════════════════════════════════

fn is_json(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))
}

fn load_schema(path: &str) -> Result<SchemaConfig, String> {
    let content = read(path)?;

    if is_json(path) {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

fn load_document(path: &str) -> Result<Node, String> {
    let content = read(path)?;

    if is_json(path) {
        Node::from_json_str(&content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        let value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))?;
        typefind_test::document::node_from_yaml(&value).map_err(|e| format!("\"{path}\": {e}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_find_args(args: &[String]) -> Result<FindArgs<'_>, String> {
    let mut positional = Vec::with_capacity(3);
    let mut mode = FindMode::Values;

    for arg in args {
        match arg.as_str() {
            "--count" => mode = FindMode::Count,
            "--trace" => mode = FindMode::Trace,
            flag if flag.starts_with("--") => {
                return Err(format!("unexpected argument \"{flag}\""));
            }
            value => positional.push(value),
        }
    }

    match *positional.as_slice() {
        [schema, type_name, document] => Ok(FindArgs {
            schema,
            type_name,
            document,
            mode,
        }),
        _ => Err("find requires <schema> <type> <document>".into()),
    }
}

fn print_usage() {
    eprintln!(
        "Usage: typefind <command> [options]

Commands:
  find <schema> <type> <document> [--count | --trace]
                        Print text values conforming to <type>
  check <schema>        Validate schema
  info                  Print registered type URLs
  help                  Show this help"
    );
}
