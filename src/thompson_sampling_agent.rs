use rand::Rng;

use crate::beta_posterior::BetaPosterior;
use crate::errors::SimulationError;

/// This agent solves the Bernoulli Multi-Armed Bandit problem with Thompson Sampling.
/// For every arm it keeps a Beta posterior over the arm's unknown probability of
/// winning. On each turn it draws one sample from every posterior, plays the arm
/// whose sample is the largest and updates only that arm with the observed reward.
#[derive(PartialEq, Debug, Clone)]
pub struct ThompsonSamplingAgent {
    /// Index of this vector is the arm number.
    posteriors: Vec<BetaPosterior>,
}

impl ThompsonSamplingAgent {
    /// Every arm starts from the uniform Beta(1, 1) prior.
    pub fn new(num_of_arms: usize) -> Self {
        ThompsonSamplingAgent {
            posteriors: vec![BetaPosterior::new(); num_of_arms],
        }
    }

    pub fn num_of_arms(&self) -> usize {
        self.posteriors.len()
    }

    /// Draws one belief per arm, in arm order.
    pub fn sample_beliefs<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<f64>, SimulationError> {
        self.posteriors
            .iter()
            .map(|posterior| posterior.sample(rng))
            .collect()
    }

    /// Arm with the largest sampled belief. Ties go to the lowest index.
    pub fn select_arm(&self, sampled_beliefs: &[f64]) -> usize {
        let mut best_arm = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (arm, &value) in sampled_beliefs.iter().enumerate() {
            if value > best_value {
                best_arm = arm;
                best_value = value;
            }
        }
        best_arm
    }

    /// Updates the posterior of the played arm. No other arm changes.
    pub fn update(&mut self, arm: usize, reward: u8) {
        self.posteriors[arm].update(reward);
        log::trace!(
            "Updated arm {} with reward {}: alpha={} beta={}",
            arm,
            reward,
            self.posteriors[arm].alpha,
            self.posteriors[arm].beta
        );
    }

    pub fn posteriors(&self) -> &[BetaPosterior] {
        &self.posteriors
    }

    pub fn alphas(&self) -> Vec<f64> {
        self.posteriors
            .iter()
            .map(|posterior| posterior.alpha)
            .collect()
    }

    pub fn betas(&self) -> Vec<f64> {
        self.posteriors
            .iter()
            .map(|posterior| posterior.beta)
            .collect()
    }
}
