//! Command-line front end for the Heptachord compiler and interpreter.

mod diagnostics;
mod loader;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hepta_core::{Error, HaltSelection, HeptaConfig};
use hepta_ir::optimize::listing;
use hepta_ir::{
    validate_program, Catalog, Decoder, Generator, Operation, Program, RepetitionValidator,
};
use hepta_runtime::Interpreter;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "heptachord",
    version,
    about = "Seven-glyph notation compiler and tape interpreter"
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline stages at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate notation and loop structure
    Check {
        /// Source file, or `-` for stdin
        file: PathBuf,
    },
    /// Translate notation into classic instruction codes
    Decode {
        file: PathBuf,
        /// List every matched pattern with its position
        #[arg(long)]
        explain: bool,
        /// Print the run-length listing instead of classic codes
        #[arg(long)]
        collapse: bool,
        /// Also write a binary program snapshot to this path
        #[arg(long, value_name = "PATH")]
        emit_bin: Option<PathBuf>,
    },
    /// Translate classic instruction codes into notation
    Encode {
        file: PathBuf,
        /// Pick the halt pattern with this seed
        #[arg(long)]
        halt_seed: Option<u64>,
    },
    /// Decode and execute notation
    Run {
        file: PathBuf,
        /// Bytes supplied to input instructions
        #[arg(long, default_value = "")]
        input: String,
        #[arg(long, conflicts_with = "unlimited")]
        max_steps: Option<u64>,
        /// Disable the step budget
        #[arg(long)]
        unlimited: bool,
    },
    /// List every operation and its patterns
    Catalog {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    telemetry::init_telemetry(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Check { file } => check(&config, &file),
        Command::Decode {
            file,
            explain,
            collapse,
            emit_bin,
        } => decode(&config, &file, explain, collapse, emit_bin.as_deref()),
        Command::Encode { file, halt_seed } => encode(config, &file, halt_seed),
        Command::Run {
            file,
            input,
            max_steps,
            unlimited,
        } => run(config, &file, input.as_bytes(), max_steps, unlimited),
        Command::Catalog { json } => catalog(json),
    }
}

fn load_config(path: Option<&Path>) -> Result<HeptaConfig> {
    match path {
        Some(path) => {
            let config = HeptaConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => Ok(HeptaConfig::default()),
    }
}

fn decoder(config: &HeptaConfig) -> Decoder<'static> {
    Decoder::new(
        Catalog::standard(),
        RepetitionValidator::from_config(&config.validator),
    )
}

/// Decode `source`, printing a rendered diagnostic for compile errors.
/// `Ok(None)` means the diagnostic was already reported.
fn compile(config: &HeptaConfig, source: &str) -> Result<Option<Program>> {
    let program = match decoder(config).decode(source) {
        Ok(program) => program,
        Err(err) => return report(source, err),
    };
    if let Err(err) = validate_program(program.as_slice()) {
        return report(source, err);
    }
    Ok(Some(program))
}

fn report<T>(source: &str, err: Error) -> Result<Option<T>> {
    match err {
        Error::InvalidEncoding(_) | Error::UnbalancedStructure { .. } => {
            eprintln!("{}", diagnostics::render(source, &err));
            Ok(None)
        }
        other => Err(other.into()),
    }
}

fn check(config: &HeptaConfig, file: &Path) -> Result<ExitCode> {
    let source = loader::load_source(file)?;
    match compile(config, &source)? {
        Some(program) => {
            println!("ok: {} instructions", program.len());
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}

fn decode(
    config: &HeptaConfig,
    file: &Path,
    explain: bool,
    collapse: bool,
    emit_bin: Option<&Path>,
) -> Result<ExitCode> {
    let source = loader::load_source(file)?;
    let decoded = match decoder(config).decode_with_trace(&source) {
        Ok(decoded) => decoded,
        Err(err) => {
            report::<()>(&source, err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    if explain {
        for token in &decoded.tokens {
            println!(
                "{}:{}\t{}\t{}",
                token.line + 1,
                token.column + 1,
                token.pattern,
                token.operation
            );
        }
        if decoded.skipped > 0 {
            println!("({} unmatched characters skipped)", decoded.skipped);
        }
    }

    if collapse {
        println!("{}", listing(&decoded.program.collapse()));
    } else {
        let classic = decoded
            .program
            .to_classic()
            .context("Program cannot be printed as classic codes, try --collapse")?;
        println!("{}", classic);
    }

    if let Some(path) = emit_bin {
        let bytes = decoded.program.to_bytes()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        info!("Wrote program snapshot to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn encode(mut config: HeptaConfig, file: &Path, halt_seed: Option<u64>) -> Result<ExitCode> {
    if let Some(seed) = halt_seed {
        config.generator.halt = HaltSelection::Seeded(seed);
    }

    let source = loader::load_source(file)?;
    let program = Program::from_classic(&source);

    let generator = Generator::new(
        Catalog::standard(),
        RepetitionValidator::from_config(&config.validator),
        config.generator.clone(),
    );
    let generated = generator.generate(program.as_slice());

    for flush in &generated.forced {
        warn!(
            "instruction {} forced a line break at line {}; output may not validate",
            flush.instruction,
            flush.line + 1
        );
    }

    println!("{}", generated.source());
    Ok(ExitCode::SUCCESS)
}

fn run(
    mut config: HeptaConfig,
    file: &Path,
    input: &[u8],
    max_steps: Option<u64>,
    unlimited: bool,
) -> Result<ExitCode> {
    if unlimited {
        config.interpreter.max_steps = None;
    } else if max_steps.is_some() {
        config.interpreter.max_steps = max_steps;
    }

    let source = loader::load_source(file)?;
    let Some(program) = compile(&config, &source)? else {
        return Ok(ExitCode::FAILURE);
    };

    let interpreter = Interpreter::new(config.interpreter.clone());
    match interpreter.run(program.as_slice(), input) {
        Ok(execution) => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&execution.output)?;
            stdout.flush()?;
            info!(steps = execution.steps, "Program halted");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", diagnostics::render(&source, &err));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn catalog(json: bool) -> Result<ExitCode> {
    let catalog = Catalog::standard();

    if json {
        let rows: Vec<serde_json::Value> = catalog
            .entries()
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "pattern": entry.pattern.as_str(),
                    "operation": entry.operation.name(),
                    "description": entry.description,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(ExitCode::SUCCESS);
    }

    for op in Operation::ALL {
        println!("{}", op);
        for pattern in catalog.patterns_for(op) {
            let description = catalog
                .lookup(pattern.as_str())
                .map(|entry| entry.description.as_str())
                .unwrap_or_default();
            println!("  {:<6}{}", pattern.as_str(), description);
        }
    }
    Ok(ExitCode::SUCCESS)
}
