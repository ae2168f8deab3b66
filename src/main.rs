//! Prosumer engine entry point: CLI wiring, one simulated day, report.

use std::path::Path;
use std::process;

use chrono::{NaiveDate, Utc};
use tracing::{error, info};

use prosumer_engine::config::ScenarioConfig;
use prosumer_engine::io::export::export_csv;
use prosumer_engine::runner::run_day;
use prosumer_engine::telemetry::init_tracing;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    date: Option<NaiveDate>,
    telemetry_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("prosumer-engine: household energy-flow simulator and sustainability scorer");
    eprintln!();
    eprintln!("Usage: prosumer-engine [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --date <YYYY-MM-DD>      Day to simulate (default: scenario date or today)");
    eprintln!("  --telemetry-out <path>   Export snapshots to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the run");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Set RUST_LOG=prosumer_engine=debug for per-tick logs.");
}

/// Returns the value following flag `args[*i]`, exiting if it is missing.
fn flag_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> &'a str {
    *i += 1;
    match args.get(*i) {
        Some(v) => v.as_str(),
        None => {
            eprintln!("error: {} requires {what}", args[*i - 1]);
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        seed_override: None,
        date: None,
        telemetry_out: None,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                cli.scenario_path = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            "--preset" => {
                cli.preset = Some(flag_value(&args, &mut i, "a name argument").to_string());
            }
            "--seed" => {
                let raw = flag_value(&args, &mut i, "a u64 argument");
                if let Ok(s) = raw.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{raw}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--date" => {
                let raw = flag_value(&args, &mut i, "a YYYY-MM-DD argument");
                if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                    cli.date = Some(d);
                } else {
                    eprintln!("error: --date value \"{raw}\" is not a valid YYYY-MM-DD date");
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                cli.telemetry_out = Some(flag_value(&args, &mut i, "a path argument").to_string());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                let raw = flag_value(&args, &mut i, "a u16 argument");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();
    init_tracing();

    // Load config: --scenario takes priority, then --preset, then baseline default
    let loaded = if let Some(ref path) = cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name)
    } else {
        Ok(ScenarioConfig::baseline())
    };
    let mut scenario = match loaded {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }

    let date = cli
        .date
        .or(scenario.simulation.date)
        .unwrap_or_else(|| Utc::now().date_naive());

    let run = match run_day(&scenario, date) {
        Ok(run) => run,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    for s in &run.snapshots {
        println!("{s}");
    }
    println!("\n{}", run.totals);
    println!("\n{}", run.metrics);
    println!("\n{}", run.gamification);

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&run.snapshots, Path::new(path)) {
            error!("failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path, "snapshots written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        use prosumer_engine::runner::load_catalogs;
        use prosumer_engine::sim::FlowSimulator;

        let built = FlowSimulator::from_scenario(&scenario)
            .and_then(|simulator| Ok((simulator, load_catalogs(&scenario)?)));
        let (simulator, catalogs) = match built {
            Ok(parts) => parts,
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        };
        let state = Arc::new(prosumer_engine::api::AppState {
            simulator,
            catalogs,
            run,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            error!("failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(prosumer_engine::api::serve(state, addr)) {
            error!("server error: {e}");
            process::exit(1);
        }
    }
}
