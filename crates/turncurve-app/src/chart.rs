use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use thiserror::Error;

use turncurve_core::ChartSpec;

const SVG_SIZE: (u32, u32) = (900, 540);
const PNG_SIZE: (u32, u32) = (1000, 600);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render chart: {0}")]
    Render(String),
}

/// Render the comparison chart as an SVG document for inline embedding.
pub fn render_svg(spec: &ChartSpec) -> Result<String, ChartError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SVG_SIZE).into_drawing_area();
        draw_chart(&root, spec)?;
        root.present()
            .map_err(|err| ChartError::Render(err.to_string()))?;
    }
    Ok(svg)
}

/// Render the comparison chart as a PNG under `dir`.
///
/// Bitmap text needs font support that not every environment provides, so the
/// attempt runs behind a panic guard and failures surface as `Render` errors.
pub fn render_png(spec: &ChartSpec, dir: impl AsRef<Path>) -> Result<PathBuf, ChartError> {
    let dir = dir.as_ref();
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir).map_err(|source| ChartError::Io {
            context: "creating plots directory",
            source,
        })?;
    }

    let output_path = dir.join("random_card.png");
    let spec = spec.clone();

    let prev_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(|_| {}));

    let attempt = std::panic::catch_unwind(move || {
        let root = BitMapBackend::new(&output_path, PNG_SIZE).into_drawing_area();
        draw_chart(&root, &spec)?;
        root.present()
            .map_err(|err| ChartError::Render(err.to_string()))?;
        drop(root);
        Ok(output_path)
    });

    std::panic::set_hook(prev_hook);

    match attempt {
        Ok(result) => result,
        Err(_) => Err(ChartError::Render(
            "plotters panicked while rendering (missing font support?)".into(),
        )),
    }
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
) -> Result<(), ChartError> {
    root.fill(&WHITE)
        .map_err(|err| ChartError::Render(err.to_string()))?;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(&spec.title, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(0u32..spec.x_max + 1, spec.y_range.0..spec.y_range.1)
        .map_err(|err| ChartError::Render(err.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(spec.x_max as usize + 2)
        .x_label_formatter(&|turn| turn.to_string())
        .x_desc("Turn")
        .y_desc("Win Rate")
        .draw()
        .map_err(|err| ChartError::Render(err.to_string()))?;

    chart
        .draw_series(LineSeries::new(
            spec.card_points.iter().copied(),
            BLUE.stroke_width(2),
        ))
        .map_err(|err| ChartError::Render(err.to_string()))?
        .label(spec.card_name.clone())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], BLUE.stroke_width(2)));

    chart
        .draw_series(
            spec.card_points
                .iter()
                .map(|&(turn, rate)| Circle::new((turn, rate), 3, BLUE.filled())),
        )
        .map_err(|err| ChartError::Render(err.to_string()))?;

    chart
        .draw_series(DashedLineSeries::new(
            spec.baseline_points.iter().copied(),
            6,
            4,
            RED.stroke_width(2),
        ))
        .map_err(|err| ChartError::Render(err.to_string()))?
        .label("Average Win Rate")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|err| ChartError::Render(err.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_spec() -> ChartSpec {
        ChartSpec {
            title: "Win Rate of Twitching Doll Over Turns".to_string(),
            card_name: "Twitching Doll".to_string(),
            card_points: vec![(3, 0.52), (4, 0.57), (6, 0.6)],
            baseline_points: vec![(3, 0.54), (4, 0.55), (6, 0.58)],
            x_max: 6,
            y_range: (0.4, 0.7),
        }
    }

    #[test]
    fn svg_render_embeds_title_and_legend() {
        let svg = render_svg(&sample_spec()).expect("svg renders");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Twitching Doll"));
        assert!(svg.contains("Average Win Rate"));
    }

    #[test]
    fn svg_render_handles_a_single_point_series() {
        let spec = ChartSpec {
            title: "Win Rate of Abandoned Campground Over Turns".to_string(),
            card_name: "Abandoned Campground".to_string(),
            card_points: vec![(0, 0.5)],
            baseline_points: vec![(0, 0.5)],
            x_max: 0,
            y_range: (0.4, 0.7),
        };
        let svg = render_svg(&spec).expect("svg renders");
        assert!(svg.contains("Abandoned Campground"));
    }

    #[test]
    fn png_render_reports_failures_instead_of_panicking() {
        let dir = tempfile::tempdir().expect("temp dir");
        // Either outcome is fine in a font-less environment; a panic is not.
        match render_png(&sample_spec(), dir.path()) {
            Ok(path) => assert!(path.exists()),
            Err(ChartError::Render(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
}
