use clap::{Parser, Subcommand};
use pc_app::{AppResult, RunOutput, RunOverrides, query, run_service};
use pc_project::{Format, Scenario};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

#[derive(Parser)]
#[command(name = "pc-cli")]
#[command(about = "PneumaCyl CLI - closed-loop pneumatic cylinder simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file
    Validate {
        /// Path to the scenario file (.yaml, .yml or .json)
        scenario_path: PathBuf,
    },
    /// Write the documented step-to-50-mm scenario
    Template {
        /// Output file (format from extension, defaults to YAML on stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the variables a scenario exposes
    Variables {
        /// Path to the scenario file
        scenario_path: PathBuf,
    },
    /// Run a scenario
    Run {
        /// Path to the scenario file
        scenario_path: PathBuf,
        /// Output CSV file (overrides `output_csv` in the scenario)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Stop time in seconds
        #[arg(long)]
        stop_time: Option<f64>,
        /// Integration step in seconds
        #[arg(long)]
        step_size: Option<f64>,
    },
    /// Run several scenarios in parallel
    Batch {
        /// Scenario files
        #[arg(required = true)]
        scenario_paths: Vec<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Template { output } => cmd_template(output.as_deref()),
        Commands::Variables { scenario_path } => cmd_variables(&scenario_path),
        Commands::Run {
            scenario_path,
            output,
            stop_time,
            step_size,
        } => cmd_run(
            &scenario_path,
            output.as_deref(),
            RunOverrides {
                stop_time_s: stop_time,
                step_size_s: step_size,
            },
        ),
        Commands::Batch { scenario_paths } => cmd_batch(&scenario_paths),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = pc_project::load(scenario_path)?;
    pc_app::compile_scenario(&scenario)?;
    println!("✓ Scenario is valid: {}", scenario.name);
    Ok(())
}

fn cmd_template(output: Option<&Path>) -> AppResult<()> {
    let scenario = Scenario::template();
    match output {
        Some(path) => {
            pc_project::save(path, &scenario)?;
            println!("✓ Wrote template to {}", path.display());
        }
        None => print!("{}", pc_project::to_string(&scenario, Format::Yaml)?),
    }
    Ok(())
}

fn cmd_variables(scenario_path: &Path) -> AppResult<()> {
    let scenario = pc_project::load(scenario_path)?;
    println!(
        "{:<14} {:<10} {:<6} {:>14}  description",
        "name", "causality", "unit", "start"
    );
    for var in query::list_variables(&scenario) {
        let start = var.start.map(|v| format!("{v}")).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<14} {:<10} {:<6} {:>14}  {}",
            var.name,
            var.causality.as_str(),
            var.unit,
            start,
            var.description
        );
    }
    Ok(())
}

fn cmd_run(scenario_path: &Path, output: Option<&Path>, overrides: RunOverrides) -> AppResult<()> {
    let scenario = pc_project::load(scenario_path)?;
    println!("Running scenario: {}", scenario.name);

    let out = run_service::run_scenario_with(&scenario, &overrides)?;
    print_summary(&out);

    // -o wins; otherwise `output_csv` is taken relative to the scenario file
    let csv_path = output.map(Path::to_path_buf).or_else(|| {
        scenario.output_csv.as_ref().map(|name| {
            scenario_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(name)
        })
    });

    match csv_path {
        Some(path) => {
            query::write_csv(&path, &out.record, &out.outputs)?;
            println!("✓ Exported {} samples to {}", out.record.len(), path.display());
        }
        None => print!("{}", query::to_csv(&out.record, &out.outputs)),
    }
    Ok(())
}

fn cmd_batch(scenario_paths: &[PathBuf]) -> AppResult<()> {
    let scenarios = scenario_paths
        .iter()
        .map(|p| pc_project::load(p))
        .collect::<Result<Vec<_>, _>>()?;

    println!("Running {} scenarios", scenarios.len());
    let results = run_service::run_batch(&scenarios);

    let mut failed = 0usize;
    for (path, result) in scenario_paths.iter().zip(results) {
        match result {
            Ok(out) => print_summary(&out),
            Err(err) => {
                failed += 1;
                error!(path = %path.display(), error = %err, "scenario failed");
            }
        }
    }

    if failed > 0 {
        return Err(pc_app::AppError::Simulation(format!(
            "{failed} of {} scenarios failed",
            scenario_paths.len()
        )));
    }
    Ok(())
}

fn print_summary(out: &RunOutput) {
    let s = &out.summary;
    println!("✓ {} completed in {:.3} s", s.name, s.wall_time_s);
    println!(
        "  t = {:.3} .. {:.3} s, {} steps, {} samples",
        s.time_range.0, s.time_range.1, s.steps, s.record_count
    );
    println!(
        "  Final state: {}",
        query::format_state(&s.final_state, s.final_flow)
    );
    println!("  Final setpoint: {:.6} m", s.final_setpoint);
    match s.settling_time {
        Some(t) => println!("  Settled (1%) at t = {:.3} s", t),
        None => println!("  Not settled within 1% at end of run"),
    }
    if s.truncated {
        warn!(
            name = %s.name,
            t_reached = s.time_range.1,
            "run stopped at the step cap before its stop time"
        );
    }
}
