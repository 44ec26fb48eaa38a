use std::{ path::{ Path, PathBuf }, fs::{ self, File } };

use polars::prelude::*;
use chrono::prelude::*;
use std::io::prelude::*;

use crate::{
    constants::{ POLARS_MAX_COLS, STATISTICS_FILE_NAME },
    errors::ReportError,
    simulation::SimulationResult,
};

/// Set environment variabls so that the whole dataframe is printed
fn set_polars_environment_variables(num_of_rows: usize) {
    std::env::set_var("POLARS_FMT_MAX_COLS", POLARS_MAX_COLS);
    std::env::set_var("POLARS_FMT_MAX_ROWS", num_of_rows.to_string());
}

/// Creates directory (and missing parents) if it doesn't exist
pub fn create_directory(directory: &Path) -> std::io::Result<()> {
    if directory.is_dir() {
        log::debug!("Directory '{}' already exists", directory.display());
        return Ok(());
    }
    fs::create_dir_all(directory)?;
    log::debug!("Directory '{}' created successfully", directory.display());
    Ok(())
}

fn get_timestamped_file_path(directory: &Path, file_name: &str) -> PathBuf {
    let local: DateTime<Local> = Local::now();
    let datetime_str: &str = &local.format("%Y-%m-%d_%H:%M:%S").to_string();
    let file_name = format!("{}_{}.txt", file_name, datetime_str);
    directory.join(file_name)
}

/// One row per arm: what the arm really is, what the agent learned about it
/// and how often it was played.
pub fn arm_summary_dataframe(result: &SimulationResult) -> PolarsResult<DataFrame> {
    let num_of_arms = result.n_arms();
    let counts = result.selection_counts();

    let mut total_rewards = vec![0.0; num_of_arms];
    for record in result.trials() {
        total_rewards[record.chosen_arm] += record.reward as f64;
    }
    let mean_rewards: Vec<f64> = total_rewards
        .iter()
        .zip(counts.iter())
        .map(|(&total, &count)| if count == 0 { 0.0 } else { total / (count as f64) })
        .collect();
    let frequencies: Vec<u32> = counts
        .iter()
        .map(|&count| count as u32)
        .collect();

    let df = DataFrame::new(
        vec![
            Series::new("arm", Vec::from_iter(0..num_of_arms as u32)),
            Series::new("actual_probability", result.true_probs()),
            Series::new("alpha", result.alpha()),
            Series::new("beta", result.beta()),
            Series::new("learned_probability", &result.posterior_means()),
            Series::new("frequency", frequencies),
            Series::new("proportion", &result.selection_proportions()),
            Series::new("total_reward", &total_rewards),
            Series::new("mean_reward", &mean_rewards)
        ]
    )?;

    let df = df
        .lazy()
        .with_column(
            (col("actual_probability") - col("learned_probability")).alias("diff_actual_learned")
        )
        .collect()?;

    df.sort(["actual_probability"], true)
}

/// One row per trial with the cumulative regret of both strategies.
pub fn regret_dataframe(result: &SimulationResult) -> PolarsResult<DataFrame> {
    DataFrame::new(
        vec![
            Series::new("trial", Vec::from_iter(1..=result.n_trials() as u32)),
            Series::new("ts_regret", result.cumulative_regret()),
            Series::new("static_regret", result.static_cumulative_regret())
        ]
    )
}

/// Numerical value that represent's how good the learning is.
/// The closer to 0 the better the learning.
pub fn learning_score(arm_summary: &DataFrame) -> PolarsResult<f64> {
    let data = arm_summary.column("diff_actual_learned")?;
    let abs_series: Vec<f64> = data
        .f64()?
        .into_iter()
        .map(|n| n.unwrap_or(0.0).abs())
        .collect();
    Ok(abs_series.into_iter().sum())
}

/// Turns one finished simulation into a per-arm summary and writes it, with
/// the final regrets, to a timestamped text file.
pub struct BanditStatisticsWrapper<'a> {
    result: &'a SimulationResult,
    seed: Option<u64>,
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl<'a> BanditStatisticsWrapper<'a> {
    pub fn new(result: &'a SimulationResult, seed: Option<u64>) -> Self {
        BanditStatisticsWrapper {
            result,
            seed,
            df: None,
            file_path: None,
        }
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Per-arm summary, computed on first use.
    pub fn summary(&mut self) -> Result<&DataFrame, ReportError> {
        let df = match self.df.take() {
            Some(df) => df,
            None => arm_summary_dataframe(self.result)?,
        };
        Ok(self.df.insert(df))
    }

    fn get_data_to_write_in_file(&mut self) -> Result<Vec<String>, ReportError> {
        let result = self.result;
        let seed = self.seed;
        let df = self.summary()?.clone();
        let score = learning_score(&df)?;
        let regret_df = regret_dataframe(result)?;

        let mut lines: Vec<String> = Vec::new();
        lines.push("### Thompson Sampling Bernoulli Bandit ###".to_string());
        lines.push(
            format!(
                "Run {} trials with {} arms \t Seed: {}",
                result.n_trials(),
                result.n_arms(),
                seed.map_or_else(|| "none".to_string(), |seed| seed.to_string())
            )
        );
        lines.push(format!("True probabilities: {:?}", result.true_probs()));
        lines.push("### Statistics for each arm ###".to_string());
        lines.push(format!("{:?}", df));
        lines.push(format!("Learning score: {}", score));
        lines.push(format!("Total reward: {}", result.total_reward()));
        lines.push("### Cumulative regret ###".to_string());
        lines.push(format!("{:?}", regret_df));
        lines.push(
            format!(
                "Final cumulative regret: Thompson Sampling {} \t Static {}",
                result.final_regret(),
                result.final_static_regret()
            )
        );
        Ok(lines)
    }

    /// Writes the statistics into `directory` and returns the file's path.
    pub fn write_statistics(&mut self, directory: &Path) -> Result<PathBuf, ReportError> {
        set_polars_environment_variables(self.result.n_arms());
        create_directory(directory)?;

        let file_path = get_timestamped_file_path(directory, STATISTICS_FILE_NAME);
        let mut output = File::create(&file_path)?;

        for line in self.get_data_to_write_in_file()? {
            writeln!(output, "{}", line)?;
        }

        log::info!("Statistics saved in file: {:?}", file_path);
        self.file_path = Some(file_path.clone());
        Ok(file_path)
    }
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;
    use crate::constants::{ DEFAULT_SEED, TRUE_PROBABILITIES };
    use crate::simulation::simulate;

    fn sample_result() -> SimulationResult {
        simulate(&TRUE_PROBABILITIES, 500, Some(DEFAULT_SEED)).unwrap()
    }

    #[test]
    fn test_create_directory_new_nested_directory() {
        let temp = tempfile::tempdir().unwrap();
        let directory = temp.path().join("a").join("b");

        create_directory(&directory).unwrap();

        assert!(directory.is_dir(), "Directory should be created");
    }

    #[test]
    fn test_create_directory_existing_directory() {
        let temp = tempfile::tempdir().unwrap();

        create_directory(temp.path()).unwrap();

        assert!(temp.path().is_dir(), "Directory should still exist");
    }

    #[test]
    fn test_get_timestamped_file_path() {
        let directory = Path::new("test_directory");
        let file_name = "test_file";

        let path = get_timestamped_file_path(directory, file_name);

        assert_eq!(path.parent(), Some(directory));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("test_file_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_arm_summary_has_row_per_arm_sorted_by_probability() {
        let result = sample_result();

        let df = arm_summary_dataframe(&result).unwrap();

        assert_eq!(df.shape().0, TRUE_PROBABILITIES.len());
        let probabilities: Vec<f64> = df
            .column("actual_probability")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .map(|value| value.unwrap())
            .collect();
        assert!(probabilities.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(probabilities[0], 0.25);
    }

    #[test]
    fn test_arm_summary_proportions_sum_to_one() {
        let result = sample_result();
        let df = arm_summary_dataframe(&result).unwrap();

        let total: f64 = df.column("proportion").unwrap().f64().unwrap().into_iter().flatten().sum();

        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_regret_dataframe_has_row_per_trial() {
        let result = sample_result();

        let df = regret_dataframe(&result).unwrap();

        assert_eq!(df.shape(), (500, 3));
    }

    #[test]
    fn test_learning_score_is_non_negative() {
        let result = sample_result();
        let df = arm_summary_dataframe(&result).unwrap();

        let score = learning_score(&df).unwrap();

        let expected: f64 = result
            .true_probs()
            .iter()
            .zip(result.posterior_means())
            .map(|(actual, learned)| (actual - learned).abs())
            .sum();
        assert!(score >= 0.0);
        assert_relative_eq!(score, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_summary_is_cached() {
        let result = sample_result();
        let mut stats = BanditStatisticsWrapper::new(&result, Some(DEFAULT_SEED));

        assert!(stats.df.is_none());
        let rows = stats.summary().unwrap().shape().0;

        assert!(stats.df.is_some());
        assert_eq!(rows, TRUE_PROBABILITIES.len());
    }

    #[test]
    fn test_data_to_write_in_file() {
        let result = sample_result();
        let mut stats = BanditStatisticsWrapper::new(&result, Some(DEFAULT_SEED));

        let lines = stats.get_data_to_write_in_file().unwrap();

        assert_eq!(lines[0], "### Thompson Sampling Bernoulli Bandit ###");
        assert_eq!(lines[1], "Run 500 trials with 5 arms \t Seed: 666");
        assert!(lines.iter().any(|line| line.starts_with("Learning score: ")));
        assert_eq!(lines.last().unwrap().starts_with("Final cumulative regret"), true);
    }

    #[test]
    fn test_write_statistics_creates_file() {
        let temp = tempfile::tempdir().unwrap();
        let directory = temp.path().join("statistics");
        let result = sample_result();
        let mut stats = BanditStatisticsWrapper::new(&result, None);

        let path = stats.write_statistics(&directory).unwrap();

        assert!(path.exists());
        assert_eq!(stats.file_path(), Some(path.as_path()));
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Seed: none"));
        assert!(contents.contains("Total reward: "));
    }
}
