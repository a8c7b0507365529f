use std::fmt;

use thiserror::Error;

use super::model::{MAX_STEPS, MIN_STEPS};

/// Reasons a submission is rejected before anything is drawn.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    #[error("step count {count} is outside the supported range {}..={}", MIN_STEPS, MAX_STEPS)]
    StepCountOutOfRange { count: usize },

    #[error("step {step} does not hold a finite density")]
    NonFinite { step: usize },

    #[error("every step field is blank, enter at least one density")]
    AllBlank,

    #[error("you entered {found} values but exactly {expected} are needed")]
    CountMismatch { expected: usize, found: usize },
}

/// A field whose text held no number. Its value defaulted to 0.0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWarning {
    /// 1-based entry step.
    pub step: usize,
    pub text: String,
}

impl fmt::Display for FieldWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.trim().is_empty() {
            write!(f, "step {} is blank, using 0.0", self.step)
        } else {
            write!(f, "step {}: no number in {:?}, using 0.0", self.step, self.text)
        }
    }
}
