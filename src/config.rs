use std::path::PathBuf;

use clap::Parser;

use crate::constants::{ DEFAULT_SEED, NUM_OF_TRIALS, OUTPUT_DIRECTORY, TRUE_PROBABILITIES };

/// Thompson Sampling on a Bernoulli multi-armed bandit, compared against a
/// static random-assignment A/B test.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "bernoulli_thompson_sampling", version)]
pub struct Cli {
    /// True success probability of each arm, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = TRUE_PROBABILITIES.to_vec())]
    pub probs: Vec<f64>,

    /// Number of trials in the simulation.
    #[arg(long, default_value_t = NUM_OF_TRIALS)]
    pub trials: usize,

    /// Seed for the random number generator.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Ignore the seed and draw one from the operating system.
    #[arg(long)]
    pub unseeded: bool,

    /// Directory where statistics and plots are written.
    #[arg(long, default_value = OUTPUT_DIRECTORY)]
    pub output_dir: PathBuf,

    /// Also compare both strategies over this many seeds (seed, seed + 1, ...).
    #[arg(long, default_value_t = 0)]
    pub sweep_seeds: u64,

    /// Do not render plots.
    #[arg(long)]
    pub skip_plots: bool,
}

impl Cli {
    pub fn seed(&self) -> Option<u64> {
        if self.unseeded {
            None
        } else {
            Some(self.seed)
        }
    }

    /// Seeds used by the seed sweep, empty when the sweep is disabled.
    pub fn sweep_seeds(&self) -> std::ops::Range<u64> {
        self.seed..self.seed.saturating_add(self.sweep_seeds)
    }
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_come_from_constants() {
        let cli = Cli::try_parse_from(["bernoulli_thompson_sampling"]).unwrap();

        assert_eq!(cli.probs, TRUE_PROBABILITIES.to_vec());
        assert_eq!(cli.trials, NUM_OF_TRIALS);
        assert_eq!(cli.seed(), Some(DEFAULT_SEED));
        assert_eq!(cli.output_dir, PathBuf::from(OUTPUT_DIRECTORY));
        assert!(cli.sweep_seeds().is_empty());
        assert!(!cli.skip_plots);
    }

    #[test]
    fn test_parse_custom_arguments() {
        let cli = Cli::try_parse_from([
            "bernoulli_thompson_sampling",
            "--probs",
            "0.1,0.9",
            "--trials",
            "500",
            "--seed",
            "7",
            "--sweep-seeds",
            "3",
            "--output-dir",
            "out",
            "--skip-plots",
        ]).unwrap();

        assert_eq!(cli.probs, vec![0.1, 0.9]);
        assert_eq!(cli.trials, 500);
        assert_eq!(cli.seed(), Some(7));
        assert_eq!(cli.sweep_seeds().collect::<Vec<u64>>(), vec![7, 8, 9]);
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert!(cli.skip_plots);
    }

    #[test]
    fn test_unseeded_flag_drops_the_seed() {
        let cli = Cli::try_parse_from(["bernoulli_thompson_sampling", "--unseeded"]).unwrap();

        assert_eq!(cli.seed(), None);
    }
}
