use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use schemacpp_compiler::{
    check_preconditions, compile_document, load_document, CompileError, CompileReport, Compiler, EmitOptions,
};

#[derive(Parser)]
#[command(name = "schema2cpp")]
#[command(about = "Generate C++ declarations from an allof-composed JSON schema", long_about = None)]
struct Cli {
    /// Input schema document (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output header; parent directories are created if missing
    #[arg(short, long)]
    output: PathBuf,

    /// Namespace wrapping the generated declarations
    #[arg(long, default_value = schemacpp_compiler::options::DEFAULT_NAMESPACE)]
    namespace: String,

    /// Header to include, without angle brackets (repeatable; replaces the defaults)
    #[arg(long = "include", value_name = "HEADER")]
    includes: Vec<String>,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Print the resolved definitions and enums as JSON to stdout
    #[arg(long)]
    dump_resolved: bool,

    /// Log resolution details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), CompileError> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    let report = run(cli)?;
    if !report.is_success() {
        eprintln!(
            "Completed with {} error(s) and {} warning(s); the output may be incomplete.",
            report.errors().count(),
            report.warnings().count()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<CompileReport, CompileError> {
    check_preconditions(&cli.input, &cli.output)?;

    let mut options = EmitOptions {
        namespace:    cli.namespace,
        indent_width: cli.indent,
        ..EmitOptions::default()
    };
    if !cli.includes.is_empty() {
        options.includes = cli.includes;
    }

    let document = load_document(&cli.input)?;
    let report = compile_document(&document, &cli.output, &options)?;
    info!(
        definitions = report.definitions,
        enums = report.enums,
        "generated {} → {}",
        cli.input.display(),
        cli.output.display()
    );

    if cli.dump_resolved {
        let (compiled, _) = Compiler::new(&document, &options).resolve_all();
        let json = serde_json::to_string_pretty(&compiled).map_err(std::io::Error::from)?;
        println!("{}", json);
    }

    Ok(report)
}
