use super::error::CurveError;
use super::model::{
    AxisSpec, CurveGeometry, CurveOptions, DisplayMode, GammaMetric, OdSequence, FIXED_Y_CEILING,
    FIXED_Y_FLOOR, FIXED_Y_TICKS, MAX_STEPS, MIN_STEPS, Y_PADDING,
};

// ---------------------------------------------------------------------------
// Readings → chart geometry
// ---------------------------------------------------------------------------

/// Build the chart bundle for one submission.
///
/// Entry order runs from the densest step to the lightest, the chart runs
/// from low to high exposure, so the plotted series is the readings reversed.
pub fn transform(readings: &OdSequence, options: CurveOptions) -> Result<CurveGeometry, CurveError> {
    validate(readings)?;

    let series: Vec<f64> = readings.values().iter().rev().copied().collect();
    let n = series.len();

    let (y_ticks, y_range) = y_axis(&series, options.mode);
    let axes = AxisSpec {
        y_ticks,
        y_range,
        x_ticks: x_ticks(n),
        x_range: (0.5, n as f64 + 0.5),
    };
    let gamma = options.gamma.then(|| gamma(&series));

    Ok(CurveGeometry {
        series,
        axes,
        gamma,
        mode: options.mode,
    })
}

fn validate(readings: &OdSequence) -> Result<(), CurveError> {
    let n = readings.len();
    if !(MIN_STEPS..=MAX_STEPS).contains(&n) {
        return Err(CurveError::StepCountOutOfRange { count: n });
    }
    if let Some(i) = readings.values().iter().position(|v| !v.is_finite()) {
        return Err(CurveError::NonFinite { step: i + 1 });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Axes
// ---------------------------------------------------------------------------

/// Density axis ticks and range. `series` must not be empty.
pub fn y_axis(series: &[f64], mode: DisplayMode) -> (Option<Vec<f64>>, (f64, f64)) {
    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = (min - Y_PADDING, max + Y_PADDING);

    match mode {
        DisplayMode::Fixed => (
            Some(FIXED_Y_TICKS.to_vec()),
            (lo.min(FIXED_Y_FLOOR), hi.max(FIXED_Y_CEILING)),
        ),
        DisplayMode::AutoScale => (None, (lo, hi)),
    }
}

/// Spacing between labelled exposure steps.
pub fn x_tick_interval(n: usize) -> usize {
    match n {
        0..=25 => 1,
        26..=30 => 2,
        31..=70 => 5,
        _ => 10,
    }
}

/// Labelled exposure steps: every `interval`-th step from 1, and always the last one.
pub fn x_ticks(n: usize) -> Vec<usize> {
    let interval = x_tick_interval(n);
    let mut ticks: Vec<usize> = (1..=n).step_by(interval).collect();
    if interval > 1 && ticks.last() != Some(&n) {
        ticks.push(n);
    }
    ticks
}

// ---------------------------------------------------------------------------
// Gamma
// ---------------------------------------------------------------------------

/// Steepest rise between neighbouring plotted steps.
///
/// A single step has no slope; it is reported as 0.0 with no position.
pub fn gamma(series: &[f64]) -> GammaMetric {
    series
        .windows(2)
        .enumerate()
        .map(|(i, w)| (i + 1, w[1] - w[0]))
        .fold(None, |best: Option<(usize, f64)>, (pos, diff)| match best {
            Some((_, top)) if top >= diff => best,
            _ => Some((pos, diff)),
        })
        .map_or(
            GammaMetric {
                value: 0.0,
                from_position: None,
            },
            |(pos, value)| GammaMetric {
                value,
                from_position: Some(pos),
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DEFAULT_READINGS;

    fn fixed() -> CurveOptions {
        CurveOptions::default()
    }

    fn auto() -> CurveOptions {
        CurveOptions {
            mode: DisplayMode::AutoScale,
            gamma: true,
        }
    }

    #[test]
    fn test_default_wedge_end_to_end() {
        let readings = OdSequence::new(DEFAULT_READINGS.to_vec());
        let geo = transform(&readings, fixed()).unwrap();

        assert_eq!(geo.len(), 21);
        assert_eq!(&geo.series[..3], &[0.91, 0.86, 0.95]);
        assert_eq!(&geo.series[17..], &[3.08, 3.08, 3.08, 3.08]);
        assert_eq!(geo.axes.x_ticks, (1..=21).collect::<Vec<_>>());
        assert_eq!(geo.axes.x_range, (0.5, 21.5));
        assert_eq!(geo.axes.y_range, (0.2, 3.6));
        assert_eq!(geo.axes.y_ticks.as_deref(), Some(&FIXED_Y_TICKS[..]));
    }

    #[test]
    fn test_series_is_exact_reverse() {
        for n in [1, 2, 21, 57, 200] {
            let values: Vec<f64> = (0..n).map(|i| (i as f64 * 0.37).sin() + 1.5).collect();
            let geo = transform(&OdSequence::new(values.clone()), fixed()).unwrap();
            assert_eq!(geo.series.len(), n);
            for i in 0..n {
                assert_eq!(geo.series[i], values[n - 1 - i]);
            }
            assert_eq!(geo.entered_step(1), n);
        }
    }

    #[test]
    fn test_step_count_bounds() {
        assert_eq!(
            transform(&OdSequence::default(), fixed()),
            Err(CurveError::StepCountOutOfRange { count: 0 })
        );
        assert_eq!(
            transform(&OdSequence::new(vec![1.0; 201]), fixed()),
            Err(CurveError::StepCountOutOfRange { count: 201 })
        );
        assert!(transform(&OdSequence::new(vec![1.0; 200]), fixed()).is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let readings = OdSequence::new(vec![1.0, f64::NAN, 2.0]);
        assert_eq!(transform(&readings, fixed()), Err(CurveError::NonFinite { step: 2 }));
        let readings = OdSequence::new(vec![f64::INFINITY]);
        assert_eq!(transform(&readings, fixed()), Err(CurveError::NonFinite { step: 1 }));
    }

    #[test]
    fn test_x_ticks_small_wedges_label_every_step() {
        for n in 1..=25 {
            assert_eq!(x_ticks(n), (1..=n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_x_ticks_thirty() {
        let mut expected: Vec<usize> = (1..=29).step_by(2).collect();
        expected.push(30);
        assert_eq!(x_ticks(30), expected);
    }

    #[test]
    fn test_x_ticks_fifty_labels_last() {
        assert_eq!(x_tick_interval(50), 5);
        assert_eq!(x_ticks(50), vec![1, 6, 11, 16, 21, 26, 31, 36, 41, 46, 50]);
    }

    #[test]
    fn test_x_ticks_last_step_already_on_interval() {
        assert_eq!(x_ticks(31), vec![1, 6, 11, 16, 21, 26, 31]);
        assert_eq!(x_ticks(71), vec![1, 11, 21, 31, 41, 51, 61, 71]);
    }

    #[test]
    fn test_x_tick_intervals() {
        assert_eq!(x_tick_interval(25), 1);
        assert_eq!(x_tick_interval(26), 2);
        assert_eq!(x_tick_interval(30), 2);
        assert_eq!(x_tick_interval(31), 5);
        assert_eq!(x_tick_interval(70), 5);
        assert_eq!(x_tick_interval(71), 10);
        assert_eq!(x_tick_interval(200), 10);
    }

    #[test]
    fn test_fixed_range_always_covers_calibration_band() {
        for values in [vec![1.0, 1.1], vec![-0.5, 0.4], vec![2.0, 4.2], vec![0.0]] {
            let (_, (lo, hi)) = y_axis(&values, DisplayMode::Fixed);
            assert!(lo <= FIXED_Y_FLOOR);
            assert!(hi >= FIXED_Y_CEILING);
        }
        let (_, range) = y_axis(&[-0.5, 4.2], DisplayMode::Fixed);
        assert!((range.0 - -0.7).abs() < 1e-12);
        assert!((range.1 - 4.4).abs() < 1e-12);
    }

    #[test]
    fn test_auto_range_hugs_data() {
        let geo = transform(&OdSequence::new(vec![1.5, 1.0, 1.2]), auto()).unwrap();
        assert_eq!(geo.axes.y_ticks, None);
        assert_eq!(geo.axes.y_range, (1.0 - 0.2, 1.5 + 0.2));
        assert_eq!(geo.mode, DisplayMode::AutoScale);
    }

    #[test]
    fn test_gamma_single_step_is_zero() {
        let g = gamma(&[1.3]);
        assert_eq!(g.value, 0.0);
        assert_eq!(g.from_position, None);
    }

    #[test]
    fn test_gamma_arithmetic_series() {
        let series: Vec<f64> = (0..10).map(|i| 0.5 + 0.25 * i as f64).collect();
        let g = gamma(&series);
        assert!((g.value - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_gamma_finds_steepest_segment() {
        let g = gamma(&[0.2, 0.3, 1.0, 1.2, 1.25]);
        assert!((g.value - 0.7).abs() < 1e-12);
        assert_eq!(g.from_position, Some(2));
    }

    #[test]
    fn test_gamma_of_falling_series_is_negative() {
        let g = gamma(&[3.0, 2.0, 1.5]);
        assert!((g.value - -0.5).abs() < 1e-12);
        assert_eq!(g.from_position, Some(2));
    }

    #[test]
    fn test_gamma_only_when_requested() {
        let readings = OdSequence::new(DEFAULT_READINGS.to_vec());
        let off = CurveOptions {
            mode: DisplayMode::Fixed,
            gamma: false,
        };
        assert_eq!(transform(&readings, off).unwrap().gamma, None);

        let on = transform(&readings, fixed()).unwrap().gamma.unwrap();
        let series: Vec<f64> = DEFAULT_READINGS.iter().rev().copied().collect();
        let direct = series
            .windows(2)
            .map(|w| w[1] - w[0])
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(on.value, direct);
    }
}
