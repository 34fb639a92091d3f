use std::path::PathBuf;
use std::process;

use clap::builder::TypedValueParser;
use clap::Parser;
use log::{error, LevelFilter};
use simple_logger::SimpleLogger;

use ls8::device::StdoutDevice;
use ls8::loader;
use ls8::{CpuConfig, CPU};

/// Exit code for a fault raised while the program runs.
const EXIT_CPU_FAULT: i32 = 3;

/// LS-8 emulator
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Program to run (`.ls8` binary listing or `.asm` source)
    #[arg(value_parser = clap::builder::OsStringValueParser::new().map(PathBuf::from))]
    program: Option<PathBuf>,

    /// Log a trace line before every instruction
    #[arg(short, long)]
    trace: bool,

    /// Initial value of the stack pointer (R7)
    #[arg(long, default_value_t = ls8::registers::INITIAL_SP)]
    sp: u8,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn log_level(&self) -> LevelFilter {
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        if self.trace {
            level.max(LevelFilter::Info)
        } else {
            level
        }
    }
}

fn usage() {
    println!("Usage: ls8 [OPTIONS] <PROGRAM>");
    println!("Error: no program given. Pass a .ls8 or .asm file as the first argument.");
}

fn run(args: &Args) -> i32 {
    let path = match &args.program {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => {
            usage();
            return 0;
        }
    };

    let program = match loader::load_file(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("{}", e);
            return e.exit_code();
        }
    };

    let mut cpu = CPU::with_config(CpuConfig { initial_sp: args.sp }, StdoutDevice);
    if let Err(e) = cpu.load(&program) {
        error!("{}", e);
        return e.exit_code();
    }

    let result = if args.trace {
        cpu.run_with_trace()
    } else {
        cpu.run()
    };
    cpu.dump_state();
    match result {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            EXIT_CPU_FAULT
        }
    }
}

fn main() {
    let args = Args::parse();
    if let Err(e) = SimpleLogger::new().with_level(args.log_level()).init() {
        eprintln!("logger: {}", e);
    }
    process::exit(run(&args));
}
