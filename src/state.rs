use crate::data::curve::transform;
use crate::data::error::{CurveError, FieldWarning};
use crate::data::model::{
    CurveGeometry, CurveOptions, DisplayMode, DEFAULT_READINGS, DEFAULT_STEPS, MAX_STEPS,
    MIN_STEPS,
};
use crate::data::parse::{parse_bulk, parse_fields};

/// How many defaulted fields are spelled out in the status line.
const MAX_LISTED_WARNINGS: usize = 3;

// ---------------------------------------------------------------------------
// Status line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Message shown in the top bar after the last user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Number of steps in the current grid.
    pub step_count: usize,

    /// Value of the step-count field, applied by "Generate grid".
    pub pending_step_count: usize,

    /// Raw text of each step field, step 1 first. Always `step_count` long.
    pub fields: Vec<String>,

    /// Density axis mode.
    pub mode: DisplayMode,

    /// Whether Gamma is computed and shown.
    pub show_gamma: bool,

    /// Pasted block of readings waiting to be applied.
    pub bulk_text: String,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,

    /// Last successfully computed chart (None after an error or a new grid).
    pub geometry: Option<CurveGeometry>,
}

impl Default for AppState {
    fn default() -> Self {
        let mut state = Self {
            step_count: DEFAULT_STEPS,
            pending_step_count: DEFAULT_STEPS,
            fields: DEFAULT_READINGS.iter().map(|v| v.to_string()).collect(),
            mode: DisplayMode::Fixed,
            show_gamma: true,
            bulk_text: String::new(),
            status: None,
            geometry: None,
        };
        state.submit();
        state.status = None;
        state
    }
}

impl AppState {
    pub fn options(&self) -> CurveOptions {
        CurveOptions {
            mode: self.mode,
            gamma: self.show_gamma,
        }
    }

    /// Parse every field, run the transform and store the chart.
    ///
    /// This is the submission boundary: any failure ends up in `status`, the
    /// chart is dropped and the field texts stay as typed.
    pub fn submit(&mut self) {
        match self.try_submit() {
            Ok(warnings) if warnings.is_empty() => {
                log::info!("Plotted {} steps", self.step_count);
                self.status = Some(Status::info(format!(
                    "Read {} OD values",
                    self.step_count
                )));
            }
            Ok(warnings) => {
                log::warn!(
                    "Plotted {} steps, {} fields defaulted to 0.0",
                    self.step_count,
                    warnings.len()
                );
                self.status = Some(Status::warning(describe_warnings(
                    self.step_count,
                    &warnings,
                )));
            }
            Err(e) => {
                log::error!("Submission rejected: {e}");
                self.geometry = None;
                self.status = Some(Status::error(format!("Input error: {e}")));
            }
        }
    }

    fn try_submit(&mut self) -> Result<Vec<FieldWarning>, CurveError> {
        if self.fields.len() != self.step_count {
            return Err(CurveError::CountMismatch {
                expected: self.step_count,
                found: self.fields.len(),
            });
        }
        let parsed = parse_fields(&self.fields)?;
        self.geometry = Some(transform(&parsed.values, self.options())?);
        Ok(parsed.warnings)
    }

    /// Rebuild the step grid with `count` fields, keeping what was typed.
    pub fn generate_grid(&mut self, count: usize) {
        match self.resize_grid(count) {
            Ok(()) => {
                log::info!("Step grid resized to {count}");
                self.status = Some(Status::info(format!("Grid ready for {count} steps")));
            }
            Err(e) => {
                log::error!("Grid not resized: {e}");
                self.status = Some(Status::error(format!("Input error: {e}")));
            }
        }
    }

    fn resize_grid(&mut self, count: usize) -> Result<(), CurveError> {
        if !(MIN_STEPS..=MAX_STEPS).contains(&count) {
            return Err(CurveError::StepCountOutOfRange { count });
        }
        self.fields.resize(count, String::new());
        self.step_count = count;
        self.pending_step_count = count;
        self.geometry = None;
        Ok(())
    }

    /// Spread the pasted block over the step fields and plot.
    ///
    /// The block must hold exactly one finite number per step; otherwise nothing changes.
    pub fn apply_bulk(&mut self) {
        let parsed = parse_bulk(&self.bulk_text, self.step_count)
            .and_then(|values| ensure_finite(&values).map(|()| values));
        match parsed {
            Ok(values) => {
                self.fields = values.iter().map(|v| v.to_string()).collect();
                self.submit();
            }
            Err(e) => {
                log::error!("Pasted readings rejected: {e}");
                self.status = Some(Status::error(format!("Input error: {e}")));
            }
        }
    }

    /// Replace the grid with readings loaded from `source` and plot them.
    pub fn load_readings(&mut self, values: &[f64], source: &str) {
        let checked = ensure_finite(values).and_then(|()| self.resize_grid(values.len()));
        if let Err(e) = checked {
            log::error!("Readings from {source} rejected: {e}");
            self.status = Some(Status::error(format!("{source}: {e}")));
            return;
        }
        log::info!("Loaded {} readings from {source}", values.len());
        self.fields = values.iter().map(|v| v.to_string()).collect();
        self.submit();
    }

    /// Switch the density axis mode, redrawing a shown chart.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
        self.refresh();
    }

    pub fn set_show_gamma(&mut self, show: bool) {
        self.show_gamma = show;
        self.refresh();
    }

    fn refresh(&mut self) {
        if self.geometry.is_some() {
            self.submit();
        }
    }

    /// Back to the 21-step example readings.
    pub fn reset(&mut self) {
        log::info!("Session reset");
        *self = Self::default();
    }
}

/// Readings written back into step fields must survive the round trip as text.
fn ensure_finite(values: &[f64]) -> Result<(), CurveError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(CurveError::NonFinite { step: i + 1 }),
        None => Ok(()),
    }
}

fn describe_warnings(count: usize, warnings: &[FieldWarning]) -> String {
    let mut listed: Vec<String> = warnings
        .iter()
        .take(MAX_LISTED_WARNINGS)
        .map(|w| w.to_string())
        .collect();
    if warnings.len() > MAX_LISTED_WARNINGS {
        listed.push(format!("and {} more", warnings.len() - MAX_LISTED_WARNINGS));
    }
    format!("Read {count} OD values; {}", listed.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_session_has_chart() {
        let state = AppState::default();
        assert_eq!(state.step_count, 21);
        assert_eq!(state.fields.len(), 21);
        assert_eq!(state.fields[0], "3.08");
        assert!(state.status.is_none());
        let geo = state.geometry.as_ref().unwrap();
        assert_eq!(geo.series[0], 0.91);
        assert!(geo.gamma.is_some());
    }

    #[test]
    fn test_malformed_field_warns_and_plots() {
        let mut state = AppState::default();
        state.fields[4] = "abc".to_string();
        state.submit();

        let status = state.status.clone().unwrap();
        assert_eq!(status.level, StatusLevel::Warning);
        assert!(status.message.contains("step 5"));
        let geo = state.geometry.as_ref().unwrap();
        assert_eq!(geo.len(), 21);
        assert_eq!(geo.series[21 - 5], 0.0);
    }

    #[test]
    fn test_many_warnings_are_summarised() {
        let mut state = AppState::default();
        for field in state.fields.iter_mut().skip(1).take(5) {
            field.clear();
        }
        state.submit();
        let message = state.status.unwrap().message;
        assert!(message.contains("and 2 more"));
    }

    #[test]
    fn test_all_blank_keeps_text_and_drops_chart() {
        let mut state = AppState::default();
        state.generate_grid(3);
        state.fields = vec![" ".into(), String::new(), String::new()];
        state.submit();

        assert_eq!(state.status.as_ref().unwrap().level, StatusLevel::Error);
        assert!(state.geometry.is_none());
        assert_eq!(state.fields, vec![" ".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn test_generate_grid_keeps_typed_values() {
        let mut state = AppState::default();
        state.generate_grid(25);
        assert_eq!(state.fields.len(), 25);
        assert_eq!(state.fields[20], "0.91");
        assert_eq!(state.fields[24], "");
        assert!(state.geometry.is_none());

        state.generate_grid(2);
        assert_eq!(state.fields, vec!["3.08".to_string(), "3.08".to_string()]);
    }

    #[test]
    fn test_generate_grid_rejects_out_of_range() {
        let mut state = AppState::default();
        state.generate_grid(0);
        assert_eq!(state.status.as_ref().unwrap().level, StatusLevel::Error);
        assert_eq!(state.step_count, 21);

        state.generate_grid(201);
        assert_eq!(state.step_count, 21);
        assert!(state.geometry.is_some());
    }

    #[test]
    fn test_bulk_count_mismatch_leaves_fields() {
        let mut state = AppState::default();
        let before = state.fields.clone();
        state.bulk_text = "1.0, 2.0, 3.0".to_string();
        state.apply_bulk();

        let status = state.status.unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.message.contains("3 values"));
        assert_eq!(state.fields, before);
    }

    #[test]
    fn test_bulk_fills_fields_and_plots() {
        let mut state = AppState::default();
        state.generate_grid(3);
        state.bulk_text = "2.5\n1.5\n0.5".to_string();
        state.apply_bulk();

        assert_eq!(state.fields, vec!["2.5", "1.5", "0.5"]);
        assert_eq!(state.geometry.unwrap().series, vec![0.5, 1.5, 2.5]);
    }

    #[test]
    fn test_load_readings_resizes_grid() {
        let mut state = AppState::default();
        let values: Vec<f64> = (0..40).map(|i| i as f64 * 0.05).collect();
        state.load_readings(&values, "wedge.csv");

        assert_eq!(state.step_count, 40);
        let geo = state.geometry.unwrap();
        assert_eq!(geo.axes.x_ticks, vec![1, 6, 11, 16, 21, 26, 31, 36, 40]);
    }

    #[test]
    fn test_load_readings_too_many() {
        let mut state = AppState::default();
        state.load_readings(&[1.0; 250], "big.json");
        let status = state.status.unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.message.starts_with("big.json"));
        assert_eq!(state.step_count, 21);
    }

    #[test]
    fn test_load_readings_rejects_non_finite() {
        let mut state = AppState::default();
        let before = state.fields.clone();
        state.load_readings(&[1.0, f64::NAN, f64::INFINITY, 2.0], "wedge.csv");

        let status = state.status.unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert!(status.message.contains("step 2"));
        assert_eq!(state.step_count, 21);
        assert_eq!(state.fields, before);
    }

    #[test]
    fn test_bulk_overflowing_literal_is_rejected() {
        let mut state = AppState::default();
        state.generate_grid(2);
        let before = state.fields.clone();
        state.bulk_text = format!("1.5, {}", "9".repeat(400));
        state.apply_bulk();

        let status = state.status.unwrap();
        assert_eq!(status.level, StatusLevel::Error);
        assert_eq!(
            status.message,
            format!("Input error: {}", CurveError::NonFinite { step: 2 })
        );
        assert_eq!(state.fields, before);
    }

    #[test]
    fn test_mode_switch_recomputes() {
        let mut state = AppState::default();
        state.set_mode(DisplayMode::AutoScale);
        let geo = state.geometry.as_ref().unwrap();
        assert_eq!(geo.axes.y_ticks, None);
        assert!((geo.axes.y_range.0 - (0.86 - 0.2)).abs() < 1e-12);

        state.set_show_gamma(false);
        assert!(state.geometry.unwrap().gamma.is_none());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut state = AppState::default();
        state.generate_grid(60);
        state.mode = DisplayMode::AutoScale;
        state.bulk_text = "1 2 3".into();
        state.reset();

        assert_eq!(state.step_count, 21);
        assert_eq!(state.mode, DisplayMode::Fixed);
        assert!(state.bulk_text.is_empty());
        assert!(state.geometry.is_some());
    }
}
