//! # Agony CLI
//!
//! Command-line interface for the Agony VM.
//!
//! Usage:
//!   agony run <file>
//!   agony eval <program>
//!   agony arena <file> <file>...
//!   agony dump <file>
//!   agony schema
//!
//! Examples:
//!   echo hello | agony eval ",[.,]"
//!   agony arena warriors/bomber.ag warriors/runner.ag --rounds 100 --seed 7
//!   agony -vv run hello.ag

use agony_vm::{
    Arena, ArenaConfig, Error, ErrorKind, ExecutionResult, Interpreter, InterpreterConfig,
    Opcode, Program, Result, StreamHost,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agony")]
#[command(author, version, about = "Agony - a nibble-addressed esoteric VM and arena")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program file with stdin/stdout attached
    Run {
        /// Path to the program source
        file: String,

        #[command(flatten)]
        machine: MachineArgs,
    },
    /// Run program text given on the command line
    Eval {
        /// Program source
        program: String,

        #[command(flatten)]
        machine: MachineArgs,
    },
    /// Battle two or more programs in the arena
    Arena(ArenaArgs),
    /// Show the instruction table
    Schema,
    /// Load a program and print the core
    Dump {
        /// Path to the program source
        file: String,

        /// Number of cells in the core
        #[arg(long)]
        core_size: Option<usize>,
    },
}

#[derive(Args, Default)]
struct MachineArgs {
    /// Number of cells in the core (default: 1500)
    #[arg(long)]
    core_size: Option<usize>,

    /// Maximum execution steps (default: 100000000)
    #[arg(long)]
    max_cycles: Option<u64>,
}

impl MachineArgs {
    fn config(&self) -> InterpreterConfig {
        let mut config = InterpreterConfig::default();
        if let Some(core_size) = self.core_size {
            config = config.with_core_size(core_size);
        }
        if let Some(max_cycles) = self.max_cycles {
            config = config.with_max_cycles(max_cycles);
        }
        config
    }
}

#[derive(Args, Default)]
struct ArenaArgs {
    /// Program files, one per warrior
    #[arg(required = true, num_args = 2..)]
    files: Vec<String>,

    /// JSON file with arena settings; flags below override it
    #[arg(short, long)]
    config: Option<String>,

    #[arg(long)]
    core_size: Option<usize>,

    /// Minimum gap between two warriors' programs
    #[arg(long)]
    separation: Option<usize>,

    /// Longest accepted program, in source characters
    #[arg(long)]
    max_length: Option<usize>,

    /// Turn limit per round
    #[arg(long)]
    max_cycles: Option<u64>,

    #[arg(long)]
    rounds: Option<u32>,

    /// Seed for reproducible placement
    #[arg(long)]
    seed: Option<u64>,

    /// Print the score report as JSON
    #[arg(long)]
    json: bool,
}

impl ArenaArgs {
    fn config(&self) -> Result<ArenaConfig> {
        let mut config = match &self.config {
            Some(path) => ArenaConfig::from_json(&read_file(path)?)?,
            None => ArenaConfig::default(),
        };

        if let Some(v) = self.core_size {
            config.core_size = v;
        }
        if let Some(v) = self.separation {
            config.separation = v;
        }
        if let Some(v) = self.max_length {
            config.max_length = v;
        }
        if let Some(v) = self.max_cycles {
            config.max_cycles = v;
        }
        if let Some(v) = self.rounds {
            config.rounds = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_file(path: &str) -> Result<String> {
    std::fs::read_to_string(Path::new(path)).map_err(|e| {
        Error::from(e)
            .with_operation("cli::read_file")
            .with_context("path", path)
    })
}

/// Read a program file. Line breaks are dropped, so a program may be
/// spread over several lines.
fn read_program(path: &str) -> Result<Program> {
    let text = read_file(path)?;
    Ok(Program::parse(text.lines().collect::<String>()))
}

fn run_program(program: &Program, machine: &MachineArgs) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let host = StreamHost::new(stdin.lock(), BufWriter::new(stdout.lock()));

    let mut interp = Interpreter::with_config(machine.config(), program, host)?;
    let result = interp.run();
    interp.host_mut().flush()?;

    match result? {
        ExecutionResult::Halted { reason, cycles } => {
            tracing::info!(?reason, cycles, "program halted");
        }
        ExecutionResult::CycleLimitReached { cycles } => {
            tracing::info!(cycles, "program stopped on cycle limit");
        }
    }
    Ok(())
}

fn run_arena(args: &ArenaArgs) -> Result<()> {
    let config = args.config()?;
    let programs = args
        .files
        .iter()
        .map(|path| read_file(path).map(|text| text.lines().collect::<String>()))
        .collect::<Result<Vec<_>>>()?;

    let mut arena = Arena::new(config, programs)?;
    let report = arena.battle()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            Error::new(ErrorKind::SerializationFailed, "failed to encode score report")
                .with_operation("cli::arena")
                .set_source(e)
        })?;
        writeln!(out, "{}", json)?;
    } else {
        for (i, score) in report.scores.iter().enumerate() {
            writeln!(out, "W{} scores: {}", i + 1, score)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn show_schema() {
    println!("Agony instruction set:\n");
    println!("{:>6}  {:<6}  {:<10}  {}", "nibble", "symbol", "mnemonic", "description");
    for op in Opcode::ALL {
        println!(
            "{:>6}  {:<6}  {:<10}  {}",
            op.nibble(),
            op.symbol(),
            op.mnemonic(),
            op.description()
        );
    }
}

fn dump(path: &str, core_size: Option<usize>) -> Result<()> {
    let program = read_program(path)?;
    let machine = MachineArgs {
        core_size,
        max_cycles: None,
    };
    let interp = Interpreter::with_config(machine.config(), &program, StreamHost::new(io::empty(), io::sink()))?;
    let regs = interp.registers();

    println!("Program: {} ({} instructions)", path, program.len());
    println!("{}", interp.core().disassemble());
    println!("{}", interp.core().pointer_line(regs.cell, regs.exec));
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Run { file, machine } => read_program(file).and_then(|p| run_program(&p, machine)),
        Commands::Eval { program, machine } => run_program(&Program::parse(program.as_str()), machine),
        Commands::Arena(args) => run_arena(args),
        Commands::Schema => {
            show_schema();
            Ok(())
        }
        Commands::Dump { file, core_size } => dump(file, *core_size),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_program_joins_lines() {
        let file = temp_file(",[\n.,\n]\n");
        let program = read_program(file.path().to_str().unwrap()).unwrap();
        assert_eq!(program.to_source(), ",[.,]");
        assert_eq!(program.source_len(), 5);
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_program("/definitely/not/here.ag").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert_eq!(err.operation(), "cli::read_file");
    }

    #[test]
    fn test_arena_flags_override_config_file() {
        let file = temp_file(r#"{"core_size": 4000, "rounds": 5, "seed": 1}"#);
        let args = ArenaArgs {
            config: Some(file.path().to_str().unwrap().to_string()),
            rounds: Some(9),
            ..ArenaArgs::default()
        };
        let config = args.config().unwrap();
        assert_eq!(config.core_size, 4000);
        assert_eq!(config.rounds, 9);
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.separation, ArenaConfig::default().separation);
    }

    #[test]
    fn test_arena_config_rejects_bad_json() {
        let file = temp_file("{ not json");
        let args = ArenaArgs {
            config: Some(file.path().to_str().unwrap().to_string()),
            ..ArenaArgs::default()
        };
        assert_eq!(args.config().unwrap_err().kind(), ErrorKind::ParseFailed);
    }

    #[test]
    fn test_machine_args_default_to_interpreter_defaults() {
        let config = MachineArgs::default().config();
        assert_eq!(config, InterpreterConfig::default());

        let config = MachineArgs {
            core_size: Some(64),
            max_cycles: Some(10),
        }
        .config();
        assert_eq!(config.core_size, 64);
        assert_eq!(config.max_cycles, 10);
    }

    #[test]
    fn test_cli_parses_arena_command() {
        let cli = Cli::try_parse_from(["agony", "-vv", "arena", "a.ag", "b.ag", "--rounds", "3", "--json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Arena(args) => {
                assert_eq!(args.files, vec!["a.ag", "b.ag"]);
                assert_eq!(args.rounds, Some(3));
                assert!(args.json);
            }
            _ => panic!("expected arena command"),
        }
    }

    #[test]
    fn test_cli_arena_needs_two_files() {
        assert!(Cli::try_parse_from(["agony", "arena", "a.ag"]).is_err());
    }
}
