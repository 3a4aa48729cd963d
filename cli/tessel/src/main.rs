//! tessel CLI: synthesize processor and NPU architectures from a few knobs.

mod commands;
mod settings;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::OutputFormat;
use settings::DesignArgs;
use tessel_estimate::DEFAULT_ACTIVITY;

#[derive(Parser)]
#[command(name = "tessel", version, about = "Parameterized processor architecture synthesizer")]
struct Cli {
    /// Verbose output (debug logging, design stats after generation)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a design and write structural Verilog
    Generate {
        #[command(flatten)]
        design: DesignArgs,
        /// Output file
        #[arg(short, long, default_value = "output.v")]
        output: PathBuf,
        /// Append the support-module library to the output
        #[arg(long)]
        with_library: bool,
    },
    /// Print timing, area, and power estimates
    Estimate {
        #[command(flatten)]
        design: DesignArgs,
        /// Switching activity factor in [0, 1]
        #[arg(long, default_value_t = DEFAULT_ACTIVITY)]
        activity: f64,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Run design checks; exits non-zero when errors are found
    Validate {
        #[command(flatten)]
        design: DesignArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print design statistics
    Stats {
        #[command(flatten)]
        design: DesignArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Write a template configuration file
    Init {
        /// File to create
        #[arg(default_value = tessel_core::parse::CONFIG_FILE_NAME)]
        file: PathBuf,
        /// Target kind for the template
        #[arg(long, default_value = "CPU")]
        target: String,
        /// Parallelism for the template
        #[arg(short = 'p', long, default_value_t = 4)]
        parallelism: i64,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List the operator catalog
    Operators,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Generate {
            design,
            output,
            with_library,
        } => commands::generate::run(&cwd, &design, &output, with_library, cli.verbose),

        Commands::Estimate {
            design,
            activity,
            format,
        } => commands::estimate::run(&cwd, &design, activity, format),

        Commands::Validate { design, format } => commands::validate::run(&cwd, &design, format),

        Commands::Stats { design, format } => commands::stats::run(&cwd, &design, format),

        Commands::Init {
            file,
            target,
            parallelism,
            force,
        } => commands::init::run(&file, &target, parallelism, force),

        Commands::Operators => commands::operators::run(),
    }
}
