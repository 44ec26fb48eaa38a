use crate::errors::SimulationError;
use crate::simulation::simulate;

/// Final regrets of one seeded run.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct SeedOutcome {
    pub seed: u64,
    pub thompson_regret: f64,
    pub static_regret: f64,
}

impl SeedOutcome {
    pub fn thompson_wins(&self) -> bool {
        self.thompson_regret < self.static_regret
    }
}

/// Comparison of both strategies over several independently seeded runs.
#[derive(PartialEq, Debug, Clone)]
pub struct SeedSweepSummary {
    pub outcomes: Vec<SeedOutcome>,
}

impl SeedSweepSummary {
    pub fn num_of_runs(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of runs where Thompson Sampling finished with strictly less regret.
    pub fn thompson_wins(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.thompson_wins())
            .count()
    }

    pub fn win_rate(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        (self.thompson_wins() as f64) / (self.num_of_runs() as f64)
    }

    pub fn mean_thompson_regret(&self) -> f64 {
        self.mean_of(|outcome| outcome.thompson_regret)
    }

    pub fn mean_static_regret(&self) -> f64 {
        self.mean_of(|outcome| outcome.static_regret)
    }

    fn mean_of(&self, value: impl Fn(&SeedOutcome) -> f64) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        let total: f64 = self.outcomes.iter().map(value).sum();
        total / (self.outcomes.len() as f64)
    }
}

/// Runs one simulation per seed, one after another.
pub fn run_seed_sweep(
    true_probs: &[f64],
    n_trials: usize,
    seeds: impl IntoIterator<Item = u64>
) -> Result<SeedSweepSummary, SimulationError> {
    let mut outcomes = Vec::new();
    for seed in seeds {
        let result = simulate(true_probs, n_trials, Some(seed))?;
        outcomes.push(SeedOutcome {
            seed,
            thompson_regret: result.final_regret(),
            static_regret: result.final_static_regret(),
        });
    }
    let summary = SeedSweepSummary { outcomes };
    log::info!(
        "Seed sweep: {} runs \t Thompson wins: {} ({:.1}%) \t Mean Thompson regret: {:.3} \t Mean Static regret: {:.3}",
        summary.num_of_runs(),
        summary.thompson_wins(),
        summary.win_rate() * 100.0,
        summary.mean_thompson_regret(),
        summary.mean_static_regret()
    );
    Ok(summary)
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;
    use crate::constants::{ NUM_OF_TRIALS, TRUE_PROBABILITIES };

    #[test]
    fn test_sweep_runs_once_per_seed() {
        let summary = run_seed_sweep(&TRUE_PROBABILITIES, 100, [3, 1, 4]).unwrap();

        assert_eq!(summary.num_of_runs(), 3);
        let seeds: Vec<u64> = summary.outcomes
            .iter()
            .map(|outcome| outcome.seed)
            .collect();
        assert_eq!(seeds, vec![3, 1, 4]);
    }

    #[test]
    fn test_sweep_outcome_matches_single_simulation() {
        let summary = run_seed_sweep(&TRUE_PROBABILITIES, 200, [17]).unwrap();
        let result = simulate(&TRUE_PROBABILITIES, 200, Some(17)).unwrap();

        assert_relative_eq!(summary.outcomes[0].thompson_regret, result.final_regret());
        assert_relative_eq!(summary.outcomes[0].static_regret, result.final_static_regret());
    }

    #[test]
    fn test_thompson_wins_most_seeded_runs() {
        let summary = run_seed_sweep(&TRUE_PROBABILITIES, NUM_OF_TRIALS, 100..130).unwrap();

        assert!(summary.win_rate() > 0.9, "Win rate was {}", summary.win_rate());
        assert!(summary.mean_thompson_regret() < summary.mean_static_regret());
    }

    #[test]
    fn test_sweep_propagates_invalid_input() {
        let result = run_seed_sweep(&[], 10, 0..3);

        assert!(matches!(result, Err(SimulationError::InvalidParameter(_))));
    }

    #[test]
    fn test_empty_sweep_summary() {
        let summary = run_seed_sweep(&TRUE_PROBABILITIES, 10, std::iter::empty()).unwrap();

        assert_eq!(summary.num_of_runs(), 0);
        assert_eq!(summary.win_rate(), 0.0);
        assert_eq!(summary.mean_static_regret(), 0.0);
    }
}
