use rand::Rng;

use crate::environments::bernoulli_bandit::generate_random_number_in_range;

/// Static A/B test: every turn an arm is picked uniformly at random.
/// It never learns and is used only as a point of comparison.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct StaticBaselineAgent {
    num_of_arms: usize,
}

impl StaticBaselineAgent {
    pub fn new(num_of_arms: usize) -> Self {
        StaticBaselineAgent { num_of_arms }
    }

    pub fn select_arm<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        generate_random_number_in_range(rng, 0, self.num_of_arms)
    }
}
