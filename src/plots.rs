use std::path::{ Path, PathBuf };

use plotters::prelude::*;

use crate::constants::{ NUM_OF_DENSITY_POINTS, PLOT_HEIGHT, PLOT_WIDTH };
use crate::errors::ReportError;
use crate::simulation::SimulationResult;
use crate::statistics_calculator::create_directory;

const FIREBRICK: RGBColor = RGBColor(178, 34, 34);
const STEELBLUE: RGBColor = RGBColor(70, 130, 180);
const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);

pub const CUMULATIVE_REGRET_FILE: &str = "cumulative_regret.svg";
pub const SELECTION_PROPORTIONS_FILE: &str = "selection_proportions.svg";
pub const POSTERIOR_DISTRIBUTIONS_FILE: &str = "posterior_distributions.svg";

fn plot_error<E: std::fmt::Display>(err: E) -> ReportError {
    ReportError::Plot(err.to_string())
}

/// Cumulative regret of Thompson Sampling and of the static A/B test over the trials.
pub fn plot_cumulative_regret(result: &SimulationResult, path: &Path) -> Result<(), ReportError> {
    let root = SVGBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let max_regret = result.final_regret().max(result.final_static_regret()).max(1.0) * 1.05;
    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative Regret: Thompson Sampling vs. Static A/B Test", CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0usize..result.n_trials(), 0f64..max_regret)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Trial Number")
        .y_desc("Cumulative Regret")
        .draw()
        .map_err(plot_error)?;

    let series = [
        ("TSRegret", result.cumulative_regret(), FIREBRICK),
        ("StaticRegret", result.static_cumulative_regret(), STEELBLUE),
    ];
    for (label, regret, color) in series {
        chart
            .draw_series(
                LineSeries::new(
                    regret
                        .iter()
                        .enumerate()
                        .map(|(trial, &value)| (trial, value)),
                    color.stroke_width(2)
                )
            )
            .map_err(plot_error)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Share of trials in which Thompson Sampling played each arm, one bar per arm.
pub fn plot_selection_proportions(result: &SimulationResult, path: &Path) -> Result<(), ReportError> {
    let root = SVGBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let num_of_arms = result.n_arms();
    let mut chart = ChartBuilder::on(&root)
        .caption("Arm Selection Proportions", CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(num_of_arms as f64) - 0.5, 0f64..1f64)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(num_of_arms)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .x_desc("Arm")
        .y_desc("Proportion of Times Selected")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(
            result
                .selection_proportions()
                .into_iter()
                .enumerate()
                .map(|(arm, proportion)| {
                    let x = arm as f64;
                    Rectangle::new(
                        [
                            (x - 0.4, 0.0),
                            (x + 0.4, proportion),
                        ],
                        Palette99::pick(arm).filled()
                    )
                })
        )
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Final Beta posterior of every arm with a dashed marker at the arm's true probability.
pub fn plot_posterior_distributions(
    result: &SimulationResult,
    path: &Path
) -> Result<(), ReportError> {
    let root = SVGBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let curves: Vec<Vec<(f64, f64)>> = result
        .posteriors()
        .iter()
        .map(|posterior| posterior.density_curve(NUM_OF_DENSITY_POINTS))
        .collect();
    let max_density =
        curves
            .iter()
            .flatten()
            .map(|&(_, density)| density)
            .filter(|density| density.is_finite())
            .fold(0.0, f64::max)
            .max(1.0) * 1.05;

    let mut chart = ChartBuilder::on(&root)
        .caption("Final Posterior Distributions of Arm Probabilities", CAPTION_FONT)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..1f64, 0f64..max_density)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("Success Probability (theta)")
        .y_desc("Density")
        .draw()
        .map_err(plot_error)?;

    for (arm, curve) in curves.into_iter().enumerate() {
        let color = Palette99::pick(arm);
        chart
            .draw_series(LineSeries::new(curve, color.stroke_width(2)))
            .map_err(plot_error)?
            .label(format!("Arm {}", arm))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], Palette99::pick(arm).stroke_width(2))
            });

        let true_probability = result.true_probs()[arm];
        chart
            .draw_series(
                DashedLineSeries::new(
                    vec![(true_probability, 0.0), (true_probability, max_density)],
                    10u32,
                    5u32,
                    color.stroke_width(2)
                )
            )
            .map_err(plot_error)?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Renders all three plots into `directory` and returns their paths.
pub fn render_all(result: &SimulationResult, directory: &Path) -> Result<Vec<PathBuf>, ReportError> {
    create_directory(directory)?;

    let regret_path = directory.join(CUMULATIVE_REGRET_FILE);
    plot_cumulative_regret(result, &regret_path)?;

    let proportions_path = directory.join(SELECTION_PROPORTIONS_FILE);
    plot_selection_proportions(result, &proportions_path)?;

    let posteriors_path = directory.join(POSTERIOR_DISTRIBUTIONS_FILE);
    plot_posterior_distributions(result, &posteriors_path)?;

    let paths = vec![regret_path, proportions_path, posteriors_path];
    for path in &paths {
        log::debug!("Plot saved in file: {:?}", path);
    }
    Ok(paths)
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;
    use crate::constants::{ DEFAULT_SEED, TRUE_PROBABILITIES };
    use crate::simulation::simulate;

    #[test]
    fn test_render_all_writes_three_svg_files() {
        let temp = tempfile::tempdir().unwrap();
        let directory = temp.path().join("plots");
        let result = simulate(&TRUE_PROBABILITIES, 300, Some(DEFAULT_SEED)).unwrap();

        let paths = render_all(&result, &directory).unwrap();

        assert_eq!(paths.len(), 3);
        for path in &paths {
            assert!(path.exists(), "Plot not written: {:?}", path);
            let contents = fs::read_to_string(path).unwrap();
            assert!(contents.contains("<svg"));
        }
        assert_eq!(paths[0].file_name().unwrap(), CUMULATIVE_REGRET_FILE);
        assert_eq!(paths[1].file_name().unwrap(), SELECTION_PROPORTIONS_FILE);
        assert_eq!(paths[2].file_name().unwrap(), POSTERIOR_DISTRIBUTIONS_FILE);
    }

    #[test]
    fn test_plots_carry_their_titles() {
        let temp = tempfile::tempdir().unwrap();
        let result = simulate(&[0.3, 0.7], 50, Some(1)).unwrap();

        let path = temp.path().join("proportions.svg");
        plot_selection_proportions(&result, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Arm Selection Proportions"));

        let path = temp.path().join("posteriors.svg");
        plot_posterior_distributions(&result, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Final Posterior Distributions of Arm Probabilities"));
    }

    #[test]
    fn test_single_trial_result_can_be_plotted() {
        let temp = tempfile::tempdir().unwrap();
        let result = simulate(&[0.5], 1, Some(0)).unwrap();

        let path = temp.path().join("regret.svg");

        assert!(plot_cumulative_regret(&result, &path).is_ok());
        assert!(path.exists());
    }
}
