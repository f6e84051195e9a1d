//! Ladder-logic VM host CLI.
//!
//! This binary loads a compiled ladder container and runs it. It provides:
//! 1. **Run:** Execute the scan loop, optionally paced to the container's
//!    cycle period, with named variables printed after each cycle.
//! 2. **Disasm:** Print the program listing and exit.
//!
//! With no subcommand the positional file is run exactly like `ldvm run`.

use std::path::{Path, PathBuf};
use std::time::Instant;
use std::{process, thread};

use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use ldvm_core::common::Bank;
use ldvm_core::core::{CycleOutcome, Memory};
use ldvm_core::sim::{IoDriver, IoMap, PinKind};
use ldvm_core::{Config, Simulator};

const DEFAULT_FILE: &str = "program.int";

#[derive(Parser, Debug)]
#[command(
    name = "ldvm",
    author,
    version,
    about = "Ladder-logic bytecode interpreter",
    long_about = "Load a compiled ladder container and run its scan cycle.\n\nExamples:\n  ldvm program.int\n  ldvm run program.int --cycles 100 --watch count --stats --dump\n  ldvm run program.int --realtime --osc X0\n  ldvm disasm program.int"
)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file; built-in defaults otherwise.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the scan loop.
    Run(RunArgs),

    /// Print the program listing.
    Disasm {
        /// Container file.
        #[arg(default_value = DEFAULT_FILE)]
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)] // independent clap flags
struct RunArgs {
    /// Container file.
    #[arg(default_value = DEFAULT_FILE)]
    file: PathBuf,

    /// Stop after this many cycles; runs until killed otherwise.
    #[arg(short = 'n', long)]
    cycles: Option<u64>,

    /// Sleep out the remainder of each cycle period.
    #[arg(long)]
    realtime: bool,

    /// Print the program listing before running.
    #[arg(long)]
    disasm: bool,

    /// Print a named variable after every cycle (repeatable).
    #[arg(short, long = "watch", value_name = "NAME")]
    watch: Vec<String>,

    /// Toggle a named bit before every cycle, as a square-wave input.
    #[arg(long, value_name = "NAME")]
    osc: Option<String>,

    /// Print statistics on exit.
    #[arg(long)]
    stats: bool,

    /// Print every non-zero memory cell on exit.
    #[arg(long)]
    dump: bool,
}

/// Host driver for a machine with no real pins.
///
/// Optionally drives one bit as a square wave and logs output pins after
/// every cycle.
#[derive(Debug, Default)]
struct ConsoleIo {
    osc: Option<usize>,
    level: bool,
}

impl IoDriver for ConsoleIo {
    fn read_inputs(&mut self, _io: &IoMap, memory: &mut Memory) {
        if let Some(addr) = self.osc {
            self.level = !self.level;
            if let Err(e) = memory.set_bit(addr, self.level) {
                warn!("oscillator: {e}");
            }
        }
    }

    fn write_outputs(&mut self, io: &IoMap, memory: &Memory) {
        for (pin, addr) in io.mapped(PinKind::Output) {
            debug!(
                pin = %format_args!("{}{pin}", PinKind::Output.prefix()),
                value = memory.bit(addr).unwrap_or(false),
                "output"
            );
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Some(Commands::Run(args)) => cmd_run(&args, &config),
        Some(Commands::Disasm { file }) => cmd_disasm(&file, &config),
        None => cmd_run(&cli.run, &config),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    Config::from_file(path).unwrap_or_else(|e| fatal(&e))
}

fn fatal(err: &dyn std::fmt::Display) -> ! {
    eprintln!("[!] FATAL: {err}");
    process::exit(1);
}

/// Loads the container and loops on `tick`, pacing and reporting as requested.
fn cmd_run(args: &RunArgs, config: &Config) {
    let mut sim = Simulator::from_file(&args.file, config).unwrap_or_else(|e| fatal(&e));

    println!("[*] Loaded {}", args.file.display());
    println!(
        "    Instructions: {}  Cycle: {} us  Bits: {}  Integers: {}",
        sim.interpreter().program().len(),
        sim.cycle_time_us(),
        config.memory.bits,
        config.memory.integers
    );

    if args.disasm {
        print!("{}", sim.interpreter().program().disassemble());
    }

    let osc = args
        .osc
        .as_deref()
        .map(|name| sim.resolve(Bank::Bit, name).unwrap_or_else(|e| fatal(&e)));
    sim.set_io(Box::new(ConsoleIo { osc, level: false }));

    for name in &args.watch {
        if sim.resolve(Bank::Int, name).is_err() {
            let _ = sim.resolve(Bank::Bit, name).unwrap_or_else(|e| fatal(&e));
        }
    }

    let period = sim.cycle_period();
    let mut cycle: u64 = 0;
    while args.cycles.is_none_or(|n| cycle < n) {
        let start = Instant::now();
        match sim.tick() {
            CycleOutcome::Completed => {}
            CycleOutcome::RanOffEnd => debug!(cycle, "ran off end of program"),
            CycleOutcome::WatchdogTripped { steps } => {
                warn!(cycle, steps, "watchdog tripped");
            }
            CycleOutcome::InvalidJump { pc, target } => {
                warn!(cycle, pc, target, "invalid jump");
            }
        }
        cycle += 1;

        if !args.watch.is_empty() {
            println!("{:>6}: {}", cycle, watch_line(&sim, &args.watch));
        }

        if args.realtime {
            if let Some(rest) = period.checked_sub(start.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    if args.dump {
        print!("{}", sim.memory().dump());
    }
    if args.stats {
        sim.stats().print();
    }
}

/// Formats every watched variable as `name=value`; integers win over bits.
fn watch_line(sim: &Simulator, names: &[String]) -> String {
    names
        .iter()
        .map(|name| {
            let value = sim
                .int_named(name)
                .map(|v| v.to_string())
                .or_else(|_| sim.bit_named(name).map(|b| u8::from(b).to_string()))
                .unwrap_or_else(|_| "?".to_string());
            format!("{name}={value}")
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn cmd_disasm(file: &Path, config: &Config) {
    let sim = Simulator::from_file(file, config).unwrap_or_else(|e| fatal(&e));
    let listing = sim.interpreter().program().disassemble();
    print!("{listing}");
    if let Err(e) = listing.check() {
        fatal(&e);
    }
}
