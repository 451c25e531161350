use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use epinet::scenario::Scenario;
use epinet::utils::{logger, plot};

#[derive(Parser, Debug)]
#[command(name = "epinet")]
#[command(about = "Compose an epidemic model as a Petri net, and simulate it")]
struct CliConfig {
    /// Scenario file (.yaml, .yml, or .json); the SIR tutorial when absent
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Directory for one CSV per solver, and the net and diagram as .dot
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, help = "Override the scenario seed")]
    seed: Option<u64>,

    #[arg(long, help = "Override the end of the time span")]
    tmax: Option<f64>,

    #[arg(long, help = "Spacing of the reported time grid")]
    samples: Option<f64>,

    #[arg(long, help = "Print an ASCII chart of every run")]
    plot: bool,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() -> Result<()> {
    let config = CliConfig::parse();
    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    let mut scenario = match &config.scenario {
        Some(path) => Scenario::from_path(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?,
        None => Scenario::sir_tutorial(),
    };
    if let Some(seed) = config.seed {
        scenario.set_seed(seed);
    }
    if let Some(tmax) = config.tmax {
        scenario.set_tmax(tmax);
    }
    if config.samples.is_some() {
        scenario.set_samples(config.samples);
    }

    let net = scenario.compose().context("failed to compose the model")?;
    println!("{}: {}", scenario.name(), scenario.model());
    print!("{}", net.apex());

    let runs = scenario.run().context("failed to run the scenario")?;
    for run in &runs {
        let (time, value) = run
            .trajectory
            .peak("I")
            .unwrap_or((f64::NAN, f64::NAN));
        println!("{:>6}  {}  (peak I = {:.1} at t = {:.2})", run.id, run.status, value, time);
        if config.plot {
            println!("{}", plot::ascii_chart(&run.trajectory, 72, 20)?);
        }
    }

    if let Some(directory) = &config.output {
        fs::create_dir_all(directory)
            .with_context(|| format!("failed to create {}", directory.display()))?;
        for run in &runs {
            let path = directory.join(format!("{}.csv", run.id));
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            run.trajectory.write_csv(BufWriter::new(file))?;
            tracing::info!("wrote {}", path.display());
        }
        let mut net_file = File::create(directory.join("net.dot"))?;
        net.apex().write_as_dot(&mut net_file)?;
        let mut diagram_file = File::create(directory.join("diagram.dot"))?;
        scenario.diagram()?.write_as_dot(&mut diagram_file)?;
        tracing::info!("wrote net.dot and diagram.dot to {}", directory.display());
    }
    Ok(())
}
