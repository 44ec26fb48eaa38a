use rand::Rng;
use rand_distr::{ Beta, Distribution };

use crate::constants::{ PRIOR_ALPHA, PRIOR_BETA };
use crate::errors::SimulationError;

/// Lanczos approximation of ln(Gamma(x)).
fn ln_gamma(x: f64) -> f64 {
    // Lanczos coefficients (g=7, n=9).
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];
    const G: f64 = 7.0;

    if x <= 0.0 {
        return f64::INFINITY;
    }

    if x < 0.5 {
        // Reflection formula.
        let sin_val = (std::f64::consts::PI * x).sin();
        return std::f64::consts::PI.ln() - sin_val.abs().ln() - ln_gamma(1.0 - x);
    }

    let z = x - 1.0;
    let mut sum = COEFFS[0];
    for (i, &c) in COEFFS[1..].iter().enumerate() {
        sum += c / (z + (i as f64) + 1.0);
    }

    let t = z + G + 0.5;
    (z + 0.5) * t.ln() + 0.5 * (2.0 * std::f64::consts::PI).ln() - t + sum.ln()
}

/// ln(B(a, b)) = ln(Gamma(a)) + ln(Gamma(b)) - ln(Gamma(a + b))
fn ln_beta_function(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// What the agent believes about the success probability of one arm.
/// It is a Beta(alpha, beta) distribution that starts from the uniform
/// prior Beta(1, 1) and is updated after every reward observed on that arm.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct BetaPosterior {
    /// Prior alpha plus the number of observed successes.
    pub alpha: f64,
    /// Prior beta plus the number of observed failures.
    pub beta: f64,
}

impl Default for BetaPosterior {
    fn default() -> Self {
        BetaPosterior::new()
    }
}

impl BetaPosterior {
    /// Uniform prior, every probability in [0, 1] is equally likely.
    pub fn new() -> Self {
        BetaPosterior {
            alpha: PRIOR_ALPHA,
            beta: PRIOR_BETA,
        }
    }

    /// Custom prior. Both parameters must be positive and finite.
    pub fn with_prior(alpha: f64, beta: f64) -> Result<Self, SimulationError> {
        let is_valid = |value: f64| value.is_finite() && value > 0.0;
        if !is_valid(alpha) || !is_valid(beta) {
            return Err(
                SimulationError::invalid(
                    format!("Beta parameters must be positive, got alpha={alpha}, beta={beta}")
                )
            );
        }
        Ok(BetaPosterior { alpha, beta })
    }

    /// Thompson Sampling step: draws one plausible success probability
    /// given all the evidence observed so far.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, SimulationError> {
        let distribution = Beta::new(self.alpha, self.beta).map_err(|err|
            SimulationError::invalid(err.to_string())
        )?;
        Ok(distribution.sample(rng))
    }

    /// Conjugate update with one Bernoulli observation.
    pub fn update(&mut self, reward: u8) {
        if reward == 1 {
            self.alpha += 1.0;
        } else {
            self.beta += 1.0;
        }
    }

    /// Number of times the arm has been played (for the uniform prior).
    pub fn plays(&self) -> usize {
        (self.alpha + self.beta - PRIOR_ALPHA - PRIOR_BETA).round() as usize
    }

    /// Number of observed successes (for the uniform prior).
    pub fn successes(&self) -> usize {
        (self.alpha - PRIOR_ALPHA).round() as usize
    }

    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Probability density of the posterior at `x`. Zero outside [0, 1].
    pub fn density(&self, x: f64) -> f64 {
        if !(0.0..=1.0).contains(&x) {
            return 0.0;
        }
        // (alpha - 1) * ln(0) is NaN when alpha == 1, the term is 0 there.
        let log_x_term = if self.alpha == 1.0 { 0.0 } else { (self.alpha - 1.0) * x.ln() };
        let log_one_minus_x_term = if self.beta == 1.0 {
            0.0
        } else {
            (self.beta - 1.0) * (1.0 - x).ln()
        };
        (log_x_term + log_one_minus_x_term - ln_beta_function(self.alpha, self.beta)).exp()
    }

    /// `n_points` evenly spaced (x, density) pairs covering [0, 1].
    pub fn density_curve(&self, n_points: usize) -> Vec<(f64, f64)> {
        match n_points {
            0 => Vec::new(),
            1 => vec![(0.0, self.density(0.0))],
            _ => {
                let step = 1.0 / ((n_points - 1) as f64);
                (0..n_points)
                    .map(|i| {
                        let x = ((i as f64) * step).min(1.0);
                        (x, self.density(x))
                    })
                    .collect()
            }
        }
    }
}
