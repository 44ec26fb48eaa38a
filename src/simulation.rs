use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::beta_posterior::BetaPosterior;
use crate::environments::bernoulli_bandit::BernoulliBanditEnvironment;
use crate::errors::SimulationError;
use crate::static_baseline_agent::StaticBaselineAgent;
use crate::thompson_sampling_agent::ThompsonSamplingAgent;

/// What happened on one trial of the Thompson Sampling run.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct TrialRecord {
    /// 1-indexed trial number.
    pub trial: usize,
    pub chosen_arm: usize,
    pub reward: u8,
    /// best true probability - true probability of the chosen arm
    pub regret: f64,
}

/// Everything produced by one call to [`simulate`]. Read-only once built,
/// this is the only thing handed to statistics and plotting.
#[derive(PartialEq, Debug, Clone)]
pub struct SimulationResult {
    choices: Vec<usize>,
    rewards: Vec<u8>,
    cumulative_regret: Vec<f64>,
    static_choices: Vec<usize>,
    static_cumulative_regret: Vec<f64>,
    alpha: Vec<f64>,
    beta: Vec<f64>,
    true_probs: Vec<f64>,
}

/// Checks the inputs before any random number is drawn.
fn validate(true_probs: &[f64], n_trials: usize) -> Result<(), SimulationError> {
    if true_probs.is_empty() {
        return Err(SimulationError::invalid("true_probs must contain at least one arm"));
    }
    if n_trials == 0 {
        return Err(SimulationError::invalid("n_trials must be at least 1"));
    }
    Ok(())
}

fn best_probability_of(true_probs: &[f64]) -> f64 {
    true_probs.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
}

/// Running sum of instantaneous regrets.
fn cumulative_sum(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    values
        .into_iter()
        .scan(0.0, |total, value| {
            *total += value;
            Some(*total)
        })
        .collect()
}

/// Runs Thompson Sampling for `n_trials` against arms with the given true
/// probabilities, followed by a static random-assignment pass of the same
/// length for comparison.
///
/// With `Some(seed)` the whole run is reproducible. Random numbers are drawn in
/// a fixed order: every trial samples all posteriors in arm order, then the
/// reward; the baseline draws its arms from the same stream after the
/// Thompson loop is finished.
pub fn simulate(
    true_probs: &[f64],
    n_trials: usize,
    rng_seed: Option<u64>
) -> Result<SimulationResult, SimulationError> {
    validate(true_probs, n_trials)?;
    let environment = BernoulliBanditEnvironment::new_as_vector(true_probs)?;

    let mut rng = match rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let num_of_arms = true_probs.len();
    let best_probability = best_probability_of(true_probs);
    log::debug!(
        "Starting simulation: {} arms, {} trials, seed {:?}, best probability {}",
        num_of_arms,
        n_trials,
        rng_seed,
        best_probability
    );

    let mut agent = ThompsonSamplingAgent::new(num_of_arms);
    let mut choices = Vec::with_capacity(n_trials);
    let mut rewards = Vec::with_capacity(n_trials);
    let mut regrets = Vec::with_capacity(n_trials);

    for trial in 1..=n_trials {
        let sampled_beliefs = agent.sample_beliefs(&mut rng)?;
        let chosen_arm = agent.select_arm(&sampled_beliefs);
        let reward = environment[chosen_arm].step(&mut rng);
        agent.update(chosen_arm, reward);

        let regret = best_probability - environment[chosen_arm].actual_probability();
        log::trace!(
            "Trial={} \t Playing arm {} \t Reward is {} \t Regret is {}",
            trial,
            chosen_arm,
            reward,
            regret
        );

        choices.push(chosen_arm);
        rewards.push(reward);
        regrets.push(regret);
    }

    let baseline = StaticBaselineAgent::new(num_of_arms);
    let static_choices: Vec<usize> = (0..n_trials).map(|_| baseline.select_arm(&mut rng)).collect();
    let static_cumulative_regret = cumulative_sum(
        static_choices.iter().map(|&arm| best_probability - true_probs[arm])
    );

    let result = SimulationResult {
        choices,
        rewards,
        cumulative_regret: cumulative_sum(regrets),
        static_choices,
        static_cumulative_regret,
        alpha: agent.alphas(),
        beta: agent.betas(),
        true_probs: true_probs.to_vec(),
    };
    log::info!(
        "Simulation finished: best arm {} \t Thompson regret {:.3} \t Static regret {:.3} \t Total reward {}",
        result.best_arm(),
        result.final_regret(),
        result.final_static_regret(),
        result.total_reward()
    );
    Ok(result)
}

impl SimulationResult {
    pub fn n_trials(&self) -> usize {
        self.choices.len()
    }

    pub fn n_arms(&self) -> usize {
        self.true_probs.len()
    }

    pub fn choices(&self) -> &[usize] {
        &self.choices
    }

    pub fn rewards(&self) -> &[u8] {
        &self.rewards
    }

    pub fn cumulative_regret(&self) -> &[f64] {
        &self.cumulative_regret
    }

    pub fn static_choices(&self) -> &[usize] {
        &self.static_choices
    }

    pub fn static_cumulative_regret(&self) -> &[f64] {
        &self.static_cumulative_regret
    }

    pub fn alpha(&self) -> &[f64] {
        &self.alpha
    }

    pub fn beta(&self) -> &[f64] {
        &self.beta
    }

    pub fn true_probs(&self) -> &[f64] {
        &self.true_probs
    }

    pub fn best_probability(&self) -> f64 {
        best_probability_of(&self.true_probs)
    }

    /// Lowest index among the arms with the highest true probability.
    pub fn best_arm(&self) -> usize {
        let best_probability = self.best_probability();
        self.true_probs
            .iter()
            .position(|&p| p == best_probability)
            .unwrap_or(0)
    }

    /// Record of trial `t`, 1-indexed. `None` outside 1..=n_trials.
    pub fn trial(&self, t: usize) -> Option<TrialRecord> {
        if t == 0 || t > self.n_trials() {
            return None;
        }
        let chosen_arm = self.choices[t - 1];
        Some(TrialRecord {
            trial: t,
            chosen_arm,
            reward: self.rewards[t - 1],
            regret: self.best_probability() - self.true_probs[chosen_arm],
        })
    }

    pub fn trials(&self) -> impl Iterator<Item = TrialRecord> + '_ {
        (1..=self.n_trials()).filter_map(move |t| self.trial(t))
    }

    /// How many times each arm was played by Thompson Sampling.
    pub fn selection_counts(&self) -> Vec<usize> {
        count_choices(&self.choices, self.n_arms())
    }

    /// How many times each arm was played by the static baseline.
    pub fn static_selection_counts(&self) -> Vec<usize> {
        count_choices(&self.static_choices, self.n_arms())
    }

    /// Share of trials in which each arm was played by Thompson Sampling.
    pub fn selection_proportions(&self) -> Vec<f64> {
        let n_trials = self.n_trials() as f64;
        self.selection_counts()
            .into_iter()
            .map(|count| (count as f64) / n_trials)
            .collect()
    }

    pub fn total_reward(&self) -> usize {
        self.rewards
            .iter()
            .map(|&reward| reward as usize)
            .sum()
    }

    pub fn final_regret(&self) -> f64 {
        self.cumulative_regret.last().copied().unwrap_or(0.0)
    }

    pub fn final_static_regret(&self) -> f64 {
        self.static_cumulative_regret.last().copied().unwrap_or(0.0)
    }

    pub fn posteriors(&self) -> Vec<BetaPosterior> {
        self.alpha
            .iter()
            .zip(self.beta.iter())
            .map(|(&alpha, &beta)| BetaPosterior { alpha, beta })
            .collect()
    }

    pub fn posterior_means(&self) -> Vec<f64> {
        self.posteriors()
            .iter()
            .map(BetaPosterior::mean)
            .collect()
    }
}

fn count_choices(choices: &[usize], num_of_arms: usize) -> Vec<usize> {
    let mut counts = vec![0; num_of_arms];
    for &arm in choices {
        counts[arm] += 1;
    }
    counts
}
