use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Smallest step wedge accepted.
pub const MIN_STEPS: usize = 1;
/// Largest step wedge accepted.
pub const MAX_STEPS: usize = 200;
/// Classic 21-step sensitometric wedge.
pub const DEFAULT_STEPS: usize = 21;

/// Calibration marks drawn on the density axis in fixed mode.
pub const FIXED_Y_TICKS: [f64; 8] = [0.3, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5];
/// Fixed-mode density axis never starts above this.
pub const FIXED_Y_FLOOR: f64 = 0.2;
/// Fixed-mode density axis never ends below this.
pub const FIXED_Y_CEILING: f64 = 3.6;
/// Head-room added above and below the data.
pub const Y_PADDING: f64 = 0.2;

/// Example readings of a 21-step wedge, step 1 (densest) first.
pub const DEFAULT_READINGS: [f64; DEFAULT_STEPS] = [
    3.08, 3.08, 3.08, 3.08, 3.07, //
    3.05, 2.99, 2.89, 2.84, 2.74, //
    2.58, 2.44, 2.28, 2.04, 1.77, //
    1.56, 1.34, 1.14, 0.95, 0.86, //
    0.91,
];

// ---------------------------------------------------------------------------
// OdSequence – the readings as entered
// ---------------------------------------------------------------------------

/// Optical densities in entry order: index 0 is step 1, the most exposed patch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OdSequence(Vec<f64>);

impl OdSequence {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Display mode
// ---------------------------------------------------------------------------

/// How the density axis is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    /// Calibration ticks, range always covers 0.2..=3.6.
    #[default]
    Fixed,
    /// Range hugs the data, ticks chosen by the chart.
    AutoScale,
}

/// Knobs for a single transform run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveOptions {
    pub mode: DisplayMode,
    /// Compute the Gamma metric.
    pub gamma: bool,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Fixed,
            gamma: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart geometry
// ---------------------------------------------------------------------------

/// Axis ticks and bounds handed to the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// `None` lets the chart pick its own density ticks.
    pub y_ticks: Option<Vec<f64>>,
    pub y_range: (f64, f64),
    pub x_ticks: Vec<usize>,
    pub x_range: (f64, f64),
}

/// Steepest rise between two neighbouring plotted steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaMetric {
    pub value: f64,
    /// 1-based plot position where the steepest segment starts.
    /// `None` when there is only one step.
    pub from_position: Option<usize>,
}

/// Everything the chart needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGeometry {
    /// Densities in plot order: position 1 is the last entered step.
    pub series: Vec<f64>,
    pub axes: AxisSpec,
    pub gamma: Option<GammaMetric>,
    pub mode: DisplayMode,
}

impl CurveGeometry {
    /// Number of plotted steps.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// `(plot position, density)` pairs, positions starting at 1.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.series.iter().enumerate().map(|(i, &od)| (i + 1, od))
    }

    /// Entry step number shown at a plot position.
    pub fn entered_step(&self, position: usize) -> usize {
        self.series.len() + 1 - position
    }
}
