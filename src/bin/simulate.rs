//! Deck depletion simulator CLI.
//!
//! Runs a Monte Carlo sweep over copy counts and elapsed rounds.
//!
//! Usage:
//!   cargo run --release --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --release --bin simulate                       # Full study: 10,000 trials per point
//!   cargo run --release --bin simulate -- --quick            # 500 trials per point
//!   cargo run --release --bin simulate -- -c 3,4 -r 10       # Two decks, rounds 0-9
//!   cargo run --release --bin simulate -- --seed 42 --json   # Reproducible, save JSON

use decksim::build_info::version_line;
use decksim::simulator::{run_sweep, FuzzMode, SimConfig};
use decksim::DrawPolicy;
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

struct CliOptions {
    config: SimConfig,
    write_json: bool,
    log_level: &'static str,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("Run with --help for usage.");
            process::exit(1);
        }
    };

    init_logging(options.log_level);
    let config = &options.config;

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              DECK DEPLETION SIMULATOR                         ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!("{}", version_line());
    println!();
    println!("Configuration:");
    println!("  Trials/point:   {}", config.num_trials);
    println!("  Copies:         {:?}", config.copies_sweep);
    println!("  Rounds:         0-{}", config.total_rounds.saturating_sub(1));
    println!("  Types:          {}", config.num_types);
    println!("  Batch size:     {}", config.batch_size);
    println!("  Fuzz:           {:?}", config.fuzz);
    println!("  Draw policy:    {:?}", config.draw_policy);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = match run_sweep(config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {}", err);
            process::exit(1);
        }
    };

    println!("{}", report.to_text());

    if options.write_json {
        let filename = format!(
            "deck_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, report.to_json()) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(err) => {
                eprintln!("error: failed to write {}: {}", filename, err);
                process::exit(1);
            }
        }
    }
}

fn init_logging(default_level: &str) {
    // RUST_LOG wins over -v/--quiet
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions {
        config: SimConfig::default(),
        write_json: false,
        log_level: "warn",
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "-n" | "--trials" => {
                options.config.num_trials = parse_value(args, &mut i, flag)?;
            }
            "-s" | "--seed" => {
                options.config.seed = Some(parse_value(args, &mut i, flag)?);
            }
            "-r" | "--rounds" => {
                options.config.total_rounds = parse_value(args, &mut i, flag)?;
            }
            "-c" | "--copies" => {
                let raw: String = parse_value(args, &mut i, flag)?;
                options.config.copies_sweep = parse_copies(&raw)?;
            }
            "-t" | "--types" => {
                options.config.num_types = parse_value(args, &mut i, flag)?;
            }
            "-b" | "--batch" => {
                options.config.batch_size = parse_value(args, &mut i, flag)?;
            }
            "--fuzz" => {
                let raw: String = parse_value(args, &mut i, flag)?;
                options.config.fuzz = parse_fuzz(&raw)?;
            }
            "--strict" => {
                options.config.draw_policy = DrawPolicy::Strict;
            }
            "--quick" => {
                options.config.num_trials = SimConfig::quick().num_trials;
            }
            "--json" => {
                options.write_json = true;
            }
            "-v" | "--verbose" => {
                options.log_level = "debug";
            }
            "-q" | "--quiet" => {
                options.log_level = "error";
            }
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
        i += 1;
    }

    Ok(options)
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: &mut usize, flag: &str) -> Result<T, String> {
    *i += 1;
    let raw = args
        .get(*i)
        .ok_or_else(|| format!("{} requires a value", flag))?;
    raw.parse()
        .map_err(|_| format!("invalid value for {}: {}", flag, raw))
}

fn parse_copies(raw: &str) -> Result<Vec<usize>, String> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse()
                .map_err(|_| format!("invalid copy count: {}", part))
        })
        .collect()
}

fn parse_fuzz(raw: &str) -> Result<FuzzMode, String> {
    match raw {
        "reference" | "ref" => Ok(FuzzMode::Reference),
        n => n
            .parse()
            .map(FuzzMode::Constant)
            .map_err(|_| format!("--fuzz expects 'reference' or a number, got {}", n)),
    }
}

fn print_help() {
    println!("Deck Depletion Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --release --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --trials <N>    Trials per sweep point (default: 10000)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -r, --rounds <R>    Sweep rounds 0..R (default: 6)");
    println!("    -c, --copies <LIST> Comma-separated copies per type (default: 2,3,4,5,6,7)");
    println!("    -t, --types <K>     Distinct token types (default: 6)");
    println!("    -b, --batch <B>     Nominal batch size (default: 5)");
    println!("    --fuzz <MODE>       'reference' (0-3 extra, default) or a fixed number");
    println!("    --strict            Fail trials that run out of tokens instead of short-drawing");
    println!("    --quick             500 trials per point");
    println!("    --json              Save JSON report");
    println!("    -v, --verbose       Debug logging (RUST_LOG overrides)");
    println!("    -q, --quiet         Errors only");
    println!("    -h, --help          Show this help");
}
