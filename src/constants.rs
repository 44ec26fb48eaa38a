/// True success probability of each arm. Index in this array is the arm number.
/// The agent never sees these values, it only observes rewards.
pub const TRUE_PROBABILITIES: [f64; 5] = [0.25, 0.18, 0.13, 0.22, 0.02];
/// Represents the number of trials (turns) in one simulation.
pub const NUM_OF_TRIALS: usize = 2000;
/// Seed used for the random number generator when none is given on the command line.
pub const DEFAULT_SEED: u64 = 666;
/// Directory where statistics and plots are written.
pub const OUTPUT_DIRECTORY: &str = ".output";
/// Prefix of the timestamped statistics file.
pub const STATISTICS_FILE_NAME: &str = "run_result";
/// Width of each rendered plot in pixels.
pub const PLOT_WIDTH: u32 = 900;
/// Height of each rendered plot in pixels.
pub const PLOT_HEIGHT: u32 = 700;
/// Number of evenly spaced points over [0, 1] used to draw a posterior density.
pub const NUM_OF_DENSITY_POINTS: usize = 1000;
/// Uniform Beta(1, 1) prior every arm starts from.
pub const PRIOR_ALPHA: f64 = 1.0;
pub const PRIOR_BETA: f64 = 1.0;
pub const POLARS_MAX_COLS: &str = "12";
