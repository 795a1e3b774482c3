use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::debug;

use crate::error::{Error, Result};
use crate::forecast::Forecaster;
use crate::vis::figure::{Curve, Figure};
use crate::vis::palette::Palette;

/// Number of days drawn for one seasonal cycle
pub const DAYS_IN_CYCLE: usize = 365;

/// Overlay the yearly component of each model on the figure's axis
///
/// Every curve spans days 0 to 364 of a non-leap year. Curves are labelled
/// `names[i]`, or `i + 1` when no names are given, and colored from
/// `palette`. The updated figure is returned.
pub fn season_compare<M: Forecaster>(
    models: &[M],
    names: Option<&[&str]>,
    mut figure: Figure,
    palette: &Palette,
) -> Result<Figure> {
    if let Some(names) = names {
        if names.len() != models.len() {
            return Err(Error::LengthMismatch {
                expected: models.len(),
                actual: names.len(),
            });
        }
    }

    let days = cycle_days()?;
    let offset = figure.axis.curves.len();
    for (i, model) in models.iter().enumerate() {
        let label = match names {
            Some(names) => names[i].to_string(),
            None => (i + 1).to_string(),
        };
        let values = model.yearly_component(&days)?;
        let points = values
            .into_iter()
            .enumerate()
            .map(|(day, v)| (day as f64, v))
            .collect();
        let color = palette.color_for(&label, offset + i);
        debug!("adding yearly curve {} in {}", label, color);
        figure.axis.add_curve(Curve {
            label,
            color,
            points,
        });
    }

    if figure.axis.x_label.is_empty() {
        figure.axis.x_label = "Day of year".to_string();
    }
    if figure.axis.y_label.is_empty() {
        figure.axis.y_label = "yearly".to_string();
    }
    Ok(figure)
}

fn cycle_days() -> Result<Vec<NaiveDateTime>> {
    let start = NaiveDate::from_ymd_opt(2017, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::Format("invalid cycle start".to_string()))?;
    Ok((0..DAYS_IN_CYCLE as i64)
        .map(|d| start + Duration::days(d))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ForecastConfig, SeasonalityMode};
    use crate::forecast::SeasonalTrendModel;
    use crate::index::DatetimeIndex;
    use crate::vis::palette::Color;
    use crate::DataFrame;

    fn fitted(amplitude: f64) -> SeasonalTrendModel {
        let dates: Vec<NaiveDateTime> = (0..36)
            .map(|i| {
                NaiveDate::from_ymd_opt(2018 + (i / 12) as i32, (i % 12) as u32 + 1, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap()
            })
            .collect();
        let values: Vec<f64> = (0..36)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * (i % 12) as f64 / 12.0;
                100.0 + amplitude * phase.sin()
            })
            .collect();
        let mut df = DataFrame::with_index(DatetimeIndex::new(dates));
        df.add_column("y", values).unwrap();

        let config = ForecastConfig::default()
            .with_mode(SeasonalityMode::Additive)
            .with_yearly_order(3);
        let (model, _) = crate::forecast::fit_and_forecast(&df, "y", &config).unwrap();
        model
    }

    #[test]
    fn one_curve_per_model_with_numeric_labels() {
        let models = vec![fitted(5.0), fitted(20.0)];
        let figure = season_compare(&models, None, Figure::new("Seasonality"), &Palette::default())
            .unwrap();

        let curves = &figure.axis.curves;
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].label, "1");
        assert_eq!(curves[1].label, "2");
        assert_eq!(curves[0].color, Color::BLUE);
        assert_eq!(curves[1].color, Color::GREEN);
        assert_eq!(curves[0].points.len(), DAYS_IN_CYCLE);
        assert_eq!(curves[0].points[0].0, 0.0);
        assert_eq!(curves[0].points[364].0, 364.0);

        let spread = |c: &Curve| {
            let ys: Vec<f64> = c.points.iter().map(|p| p.1).collect();
            ys.iter().cloned().fold(f64::MIN, f64::max) - ys.iter().cloned().fold(f64::MAX, f64::min)
        };
        assert!(spread(&curves[1]) > spread(&curves[0]));
    }

    #[test]
    fn names_and_assigned_colors() {
        let models = vec![fitted(5.0), fitted(10.0)];
        let palette = Palette::default().with_assignment("B", Color::BLACK);
        let figure = season_compare(
            &models,
            Some(&["A", "B"][..]),
            Figure::default(),
            &palette,
        )
        .unwrap();
        assert_eq!(figure.axis.curves[0].label, "A");
        assert_eq!(figure.axis.curve("B").unwrap().color, Color::BLACK);
    }

    #[test]
    fn name_count_must_match() {
        let models = vec![fitted(5.0)];
        let err = season_compare(&models, Some(&["A", "B"][..]), Figure::default(), &Palette::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn unfitted_model_fails() {
        let models = vec![SeasonalTrendModel::new(&ForecastConfig::default())];
        let err = season_compare(&models, None, Figure::default(), &Palette::default()).unwrap_err();
        assert!(err.is_fit_error());
    }
}
