use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use nrgs_app::{
    AppError, AppResult, CompiledProject, GridRunResponse, GridScenario, TransientRunResponse,
    TransientScenario, compile_project, load_demand, load_project, read_demand_csv,
    run_grid_scenario, run_transient, summarize, sweep_drought, validate_project,
    write_dispatch_csv, write_transient_csv,
};
use nrgs_grid::{DroughtSeverity, OutagePlan};
use nrgs_reactor::{
    InitialPrecursors, LoadFollowingRamp, ReactorKind, StepInsertion, TransientOptions,
};

#[derive(Parser)]
#[command(name = "nrgs")]
#[command(about = "NRGS - nuclear and renewable grid simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// List generation sources in merit order
    Sources {
        /// Project file (built-in Kenya mix when omitted)
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// Merit-order dispatch of a load profile
    Dispatch {
        #[command(flatten)]
        grid: GridArgs,
        /// Exclude nuclear from the mix
        #[arg(long)]
        no_nuclear: bool,
    },
    /// Dispatch with hydro de-rated by drought severity
    Drought {
        /// mild, moderate, severe or extreme
        severity: DroughtSeverity,
        #[command(flatten)]
        grid: GridArgs,
        #[arg(long)]
        no_nuclear: bool,
    },
    /// Dispatch with nuclear offline for part of the profile
    Outage {
        /// First hour of the outage
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Outage length in hours
        #[arg(long, default_value_t = 24)]
        duration: usize,
        /// Keep nuclear offline outside the outage window too
        #[arg(long)]
        no_nuclear_outside: bool,
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Run every drought severity and compare
    SweepDrought {
        #[command(flatten)]
        grid: GridArgs,
        #[arg(long)]
        no_nuclear: bool,
    },
    /// Reactor point-kinetics transients
    #[command(subcommand)]
    Reactor(ReactorCommands),
}

#[derive(Args)]
struct GridArgs {
    /// Project file (built-in Kenya mix when omitted)
    #[arg(long)]
    project: Option<PathBuf>,
    /// Load profile CSV with a load_mw column (overrides the project's)
    #[arg(long)]
    demand: Option<PathBuf>,
    /// Write the hourly dispatch table to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ReactorCommands {
    /// Step reactivity insertion over 0..30 s
    Step {
        #[command(flatten)]
        reactor: ReactorArgs,
        /// Inserted reactivity (absolute, dk/k)
        #[arg(long, default_value_t = 0.005)]
        rho: f64,
        /// Insertion time in seconds
        #[arg(long, default_value_t = 5.0)]
        t_insert: f64,
    },
    /// Ramped load-following over 0..120 s
    LoadFollow {
        #[command(flatten)]
        reactor: ReactorArgs,
        /// Target power as a fraction of nominal
        #[arg(long, default_value_t = 0.8)]
        target: f64,
        /// Ramp duration in seconds
        #[arg(long, default_value_t = 30.0)]
        ramp: f64,
    },
}

#[derive(Args)]
struct ReactorArgs {
    /// Reactor variant (PWR or SMR)
    #[arg(long, default_value = "SMR")]
    reactor: ReactorKind,
    /// Project file with reactor overrides
    #[arg(long)]
    project: Option<PathBuf>,
    /// Number of output samples
    #[arg(long, default_value_t = 1000)]
    samples: usize,
    /// Start with precursors in equilibrium with the initial power
    #[arg(long)]
    equilibrium: bool,
    /// Write the trajectory to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Sources { project } => cmd_sources(project.as_deref()),
        Commands::Dispatch { grid, no_nuclear } => cmd_grid(
            &grid,
            GridScenario::Baseline {
                include_nuclear: !no_nuclear,
            },
        ),
        Commands::Drought {
            severity,
            grid,
            no_nuclear,
        } => cmd_grid(
            &grid,
            GridScenario::Drought {
                severity,
                include_nuclear: !no_nuclear,
            },
        ),
        Commands::Outage {
            start,
            duration,
            no_nuclear_outside,
            grid,
        } => cmd_grid(
            &grid,
            GridScenario::Outage(OutagePlan {
                start_hour: start,
                duration_hours: duration,
                include_nuclear_before_after: !no_nuclear_outside,
            }),
        ),
        Commands::SweepDrought { grid, no_nuclear } => cmd_sweep_drought(&grid, !no_nuclear),
        Commands::Reactor(cmd) => match cmd {
            ReactorCommands::Step {
                reactor,
                rho,
                t_insert,
            } => cmd_reactor(
                &reactor,
                TransientScenario::Step(StepInsertion {
                    rho_step: rho,
                    t_insert,
                }),
            ),
            ReactorCommands::LoadFollow {
                reactor,
                target,
                ramp,
            } => cmd_reactor(
                &reactor,
                TransientScenario::LoadFollow(LoadFollowingRamp {
                    target_power_ratio: target,
                    ramp_time: ramp,
                }),
            ),
        },
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = load_project(project_path)?;
    validate_project(&project)?;
    compile_project(&project)?;
    let summary = summarize(&project);
    println!("✓ Project is valid");
    println!(
        "  {} (v{}): {} sources, {:.0} MW installed",
        summary.name, summary.version, summary.source_count, summary.total_capacity_mw
    );
    if !summary.reactor_overrides.is_empty() {
        println!(
            "  Reactor overrides: {}",
            summary.reactor_overrides.join(", ")
        );
    }
    if let Some(profile) = &summary.load_profile {
        println!("  Load profile: {profile}");
    }
    Ok(())
}

fn compiled_or_builtin(project: Option<&Path>) -> AppResult<CompiledProject> {
    match project {
        Some(path) => compile_project(&load_project(path)?),
        None => Ok(CompiledProject::builtin()),
    }
}

fn cmd_sources(project: Option<&Path>) -> AppResult<()> {
    let compiled = compiled_or_builtin(project)?;
    let sources = compiled.sources.sources();
    let order = nrgs_grid::merit_order(sources);

    println!("Merit order for {}:", compiled.name);
    println!(
        "  {:<12} {:>12} {:>14} {:>12}",
        "source", "capacity MW", "cost USD/MWh", "gCO2/kWh"
    );
    for idx in order {
        let src = &sources[idx];
        let factor = compiled
            .emission_factors
            .get(src.kind)
            .map_or_else(|| "-".to_string(), |g| format!("{g:.0}"));
        println!(
            "  {:<12} {:>12.1} {:>14.2} {:>12}",
            src.kind.name(),
            src.capacity_mw,
            src.variable_cost_usd_per_mwh,
            factor
        );
    }
    println!(
        "  Total capacity: {:.1} MW",
        compiled.sources.total_capacity_mw()
    );
    Ok(())
}

/// Catalogs plus hourly demand for a grid command.
fn grid_inputs(args: &GridArgs) -> AppResult<(CompiledProject, Vec<f64>)> {
    let (compiled, project_demand) = match &args.project {
        Some(path) => {
            let project = load_project(path)?;
            let demand = if args.demand.is_none() {
                load_demand(path, &project)?
            } else {
                None
            };
            (compile_project(&project)?, demand)
        }
        None => (CompiledProject::builtin(), None),
    };

    let demand = match (&args.demand, project_demand) {
        (Some(csv), _) => read_demand_csv(csv)?,
        (None, Some(demand)) => demand,
        (None, None) => {
            return Err(AppError::InvalidInput(
                "no demand profile: pass --demand or set load_profile in the project".to_string(),
            ));
        }
    };
    debug!(
        project = %compiled.name,
        hours = demand.len(),
        from_csv = args.demand.is_some(),
        "Loaded demand profile"
    );
    Ok((compiled, demand))
}

fn cmd_grid(args: &GridArgs, scenario: GridScenario) -> AppResult<()> {
    let (compiled, demand) = grid_inputs(args)?;
    println!("Running {scenario} over {} hours", demand.len());
    let response = run_grid_scenario(&compiled, &demand, scenario)?;
    print_grid_response(&response);

    if let Some(path) = &args.output {
        let file = BufWriter::new(File::create(path)?);
        write_dispatch_csv(
            file,
            &response.dispatch,
            response.outage_active.as_deref(),
        )?;
        info!(path = %path.display(), "Wrote dispatch CSV");
        println!(
            "✓ Exported {} hours to {}",
            response.dispatch.hours(),
            path.display()
        );
    }
    Ok(())
}

fn print_grid_response(response: &GridRunResponse) {
    let m = &response.metrics;
    if let Some(factor) = response.hydro_capacity_factor {
        println!("  Hydro capacity factor: {factor:.2}");
    }
    if let Some(mask) = &response.outage_active {
        println!(
            "  Hours under outage:    {}",
            mask.iter().filter(|&&a| a).count()
        );
    }
    println!("  Demand:                {:.1} MWh", m.total_demand_mwh);
    println!("  Dispatched:            {:.1} MWh", m.total_dispatched_mwh);
    println!(
        "  Unserved:              {:.1} MWh ({:.2}%), peak {:.1} MW",
        m.unserved_mwh, m.unserved_pct, m.peak_unserved_mw
    );
    println!("  Variable cost:         {:.0} USD", m.total_cost_usd);
    if let Some(avg) = m.average_cost_usd_per_mwh() {
        println!("  Average cost:          {avg:.2} USD/MWh");
    }
    println!("  Emissions:             {:.1} tCO2eq", m.total_emissions_t);
    println!(
        "  {:<12} {:>12} {:>14} {:>12}",
        "source", "energy MWh", "cost USD", "tCO2eq"
    );
    for b in &m.per_source {
        println!(
            "  {:<12} {:>12.1} {:>14.0} {:>12.1}",
            b.kind.name(),
            b.energy_mwh,
            b.cost_usd,
            b.emissions_t
        );
    }
    println!("  ({:.3} s)", response.elapsed_s);
}

fn cmd_sweep_drought(args: &GridArgs, include_nuclear: bool) -> AppResult<()> {
    let (compiled, demand) = grid_inputs(args)?;
    let runs = sweep_drought(&compiled, &demand, include_nuclear)?;

    println!(
        "  {:<10} {:>8} {:>14} {:>14} {:>10} {:>12}",
        "severity", "hydro", "cost USD", "unserved MWh", "unserved%", "tCO2eq"
    );
    for run in &runs {
        let severity = match run.scenario {
            GridScenario::Drought { severity, .. } => severity.label(),
            _ => "-",
        };
        let m = &run.metrics;
        println!(
            "  {:<10} {:>8.2} {:>14.0} {:>14.1} {:>10.2} {:>12.1}",
            severity,
            run.hydro_capacity_factor.unwrap_or(1.0),
            m.total_cost_usd,
            m.unserved_mwh,
            m.unserved_pct,
            m.total_emissions_t
        );
    }

    if let Some(path) = &args.output {
        // One file per severity next to the requested path.
        for run in &runs {
            if let GridScenario::Drought { severity, .. } = run.scenario {
                let out = severity_path(path, severity);
                let file = BufWriter::new(File::create(&out)?);
                write_dispatch_csv(file, &run.dispatch, None)?;
                info!(path = %out.display(), severity = %severity, "Wrote dispatch CSV");
                println!("✓ Exported {}", out.display());
            }
        }
    }
    Ok(())
}

fn severity_path(path: &Path, severity: DroughtSeverity) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dispatch".to_string());
    path.with_file_name(format!("{stem}_{}.csv", severity.label()))
}

fn cmd_reactor(args: &ReactorArgs, scenario: TransientScenario) -> AppResult<()> {
    let compiled = compiled_or_builtin(args.project.as_deref())?;
    let opts = TransientOptions {
        samples: args.samples,
        initial_precursors: if args.equilibrium {
            InitialPrecursors::Equilibrium
        } else {
            InitialPrecursors::Zero
        },
        ..TransientOptions::default()
    };

    println!(
        "Running {} transient on {}",
        scenario_name(&scenario),
        args.reactor.label()
    );
    let response = run_transient(&compiled, args.reactor, scenario, &opts)?;
    print_transient_response(&response);

    if let Some(path) = &args.output {
        let file = BufWriter::new(File::create(path)?);
        write_transient_csv(file, &response.result)?;
        info!(path = %path.display(), "Wrote transient CSV");
        println!(
            "✓ Exported {} samples to {}",
            response.result.len(),
            path.display()
        );
    }
    Ok(())
}

fn scenario_name(scenario: &TransientScenario) -> String {
    match scenario {
        TransientScenario::Step(step) => format!(
            "step insertion ({:.1} cents at t = {} s)",
            step.rho_step * 100.0,
            step.t_insert
        ),
        TransientScenario::LoadFollow(ramp) => format!(
            "load-following ({:.0}% over {} s)",
            ramp.target_power_ratio * 100.0,
            ramp.ramp_time
        ),
    }
}

fn print_transient_response(response: &TransientRunResponse) {
    let m = &response.metrics;
    println!(
        "  Peak power:       {:.4} (t = {:.2} s)",
        m.peak_power, m.t_peak_power
    );
    println!("  Min power:        {:.4}", m.min_power);
    println!("  Final power:      {:.4}", m.final_power);
    println!("  Peak overshoot:   {:.2}%", m.peak_overshoot_pct);
    println!("  Peak fuel temp:   {:.1} °C", m.peak_fuel_temp);
    println!("  Peak coolant temp:{:.1} °C", m.peak_coolant_temp);

    let samples = response.result.samples();
    let stride = (samples.len() / 10).max(1);
    println!(
        "  {:>8} {:>10} {:>12} {:>12} {:>10} {:>10}",
        "t [s]", "P", "rho_ext", "rho_fb", "Tf [°C]", "Tc [°C]"
    );
    let last = samples.len().saturating_sub(1);
    for (_, s) in samples
        .iter()
        .enumerate()
        .filter(|&(i, _)| i % stride == 0 || i == last)
    {
        println!(
            "  {:>8.2} {:>10.4} {:>12.6} {:>12.6} {:>10.1} {:>10.1}",
            s.t, s.power, s.rho_ext, s.rho_fb, s.t_fuel, s.t_coolant
        );
    }
    println!("  ({:.3} s)", response.elapsed_s);
}
