mod beta_posterior;
mod config;
mod constants;
mod environments;
mod errors;
mod plots;
mod seed_sweep;
mod simulation;
mod static_baseline_agent;
mod statistics_calculator;
mod thompson_sampling_agent;

use std::error::Error;

use clap::Parser;

use config::Cli;
use statistics_calculator::BanditStatisticsWrapper;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = simulation::simulate(&cli.probs, cli.trials, cli.seed())?;

    let mut stats = BanditStatisticsWrapper::new(&result, cli.seed());
    stats.write_statistics(&cli.output_dir)?;

    if !cli.skip_plots {
        let paths = plots::render_all(&result, &cli.output_dir)?;
        log::info!("Plots saved: {:?}", paths);
    }

    if cli.sweep_seeds > 0 {
        seed_sweep::run_seed_sweep(&cli.probs, cli.trials, cli.sweep_seeds())?;
    }
    Ok(())
}
