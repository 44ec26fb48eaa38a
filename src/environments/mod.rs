pub mod bernoulli_bandit;
