use rand::distributions::{ Bernoulli, Distribution };
use rand::Rng;

use crate::errors::SimulationError;

/// Generates random number in range: [min, max)
pub fn generate_random_number_in_range<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> usize {
    assert!(min < max, "Minimum number cannot be bigger than maximum number!");
    rng.gen_range(min..max)
}

/// BernoulliBanditEnvironment object represents one arm of the bandit.
/// It has a certain probability of winning or loosing that is constant
/// and does not change over time.
/// This probability is not known to the agent playing it.
#[derive(PartialEq, Debug, Clone)]
pub struct BernoulliBanditEnvironment {
    probability: f64,
    distribution: Bernoulli,
}

impl BernoulliBanditEnvironment {
    /// Creates an arm with the given success probability. The probability
    /// must be in the range [0, 1].
    pub fn new(probability: f64) -> Result<Self, SimulationError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(
                SimulationError::invalid(
                    format!("probability must be in the range [0, 1], got {probability}")
                )
            );
        }
        let distribution = Bernoulli::new(probability).map_err(|err|
            SimulationError::invalid(err.to_string())
        )?;
        log::trace!("Creating Bernoulli arm with probability: {probability}");
        Ok(BernoulliBanditEnvironment {
            probability,
            distribution,
        })
    }

    /// Creates one arm for each probability, in the same order.
    pub fn new_as_vector(
        probabilities: &[f64]
    ) -> Result<Vec<BernoulliBanditEnvironment>, SimulationError> {
        probabilities
            .iter()
            .enumerate()
            .map(|(arm, &probability)| {
                BernoulliBanditEnvironment::new(probability).map_err(|_| {
                    SimulationError::invalid(
                        format!("arm {arm}: probability must be in the range [0, 1], got {probability}")
                    )
                })
            })
            .collect()
    }

    /// Each step represents pulling the arm once.
    /// Returns 1 for a win and 0 for a loss.
    pub fn step<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        match self.distribution.sample(rng) {
            true => 1,
            false => 0,
        }
    }

    /// Used only for regret and reporting, never by the agent.
    pub fn actual_probability(&self) -> f64 {
        self.probability
    }
}
