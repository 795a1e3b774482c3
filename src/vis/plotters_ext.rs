//! Rendering figures with plotters

use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use crate::error::{Error, Result};
use crate::vis::figure::Figure;
use crate::vis::palette::Color;

impl From<Color> for RGBColor {
    fn from(color: Color) -> Self {
        RGBColor(color.r, color.g, color.b)
    }
}

impl Figure {
    /// Draw the figure as an SVG file
    pub fn render_svg<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let root = SVGBackend::new(path.as_ref(), (self.width, self.height)).into_drawing_area();
        draw(self, &root)
    }

    /// Draw the figure as a PNG file
    pub fn render_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), (self.width, self.height)).into_drawing_area();
        draw(self, &root)
    }
}

fn draw<DB: DrawingBackend>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let ((x_min, x_max), (y_min, y_max)) = figure
        .axis
        .bounds()
        .ok_or_else(|| Error::Visualization("figure has no curves to draw".to_string()))?;

    let x_margin = ((x_max - x_min) * 0.02).max(0.5);
    let y_margin = ((y_max - y_min) * 0.05).max(1e-3);

    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(
            (x_min - x_margin)..(x_max + x_margin),
            (y_min - y_margin)..(y_max + y_margin),
        )?;

    chart
        .configure_mesh()
        .x_labels(12)
        .y_labels(10)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.3}", v))
        .x_desc(figure.axis.x_label.as_str())
        .y_desc(figure.axis.y_label.as_str())
        .draw()?;

    for curve in &figure.axis.curves {
        let color = RGBColor::from(curve.color);
        let points = curve
            .points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite());
        chart
            .draw_series(LineSeries::new(points, color))?
            .label(curve.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vis::figure::Curve;
    use tempfile::tempdir;

    fn figure() -> Figure {
        let mut figure = Figure::new("Yearly seasonality").with_size(400, 300);
        figure.axis.add_curve(Curve {
            label: "A".to_string(),
            color: Color::BLUE,
            points: (0..365)
                .map(|d| (d as f64, (d as f64 / 58.0).sin()))
                .collect(),
        });
        figure
    }

    #[test]
    #[ignore = "text layout needs system fonts"]
    fn writes_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("season.svg");
        figure().render_svg(&path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn empty_figure_is_rejected() {
        let dir = tempdir().unwrap();
        let err = Figure::default()
            .render_svg(dir.path().join("empty.svg"))
            .unwrap_err();
        assert!(matches!(err, Error::Visualization(_)));
    }
}
