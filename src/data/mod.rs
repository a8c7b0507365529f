/// Data layer: readings, parsing, the curve transform, import and export.
///
/// Architecture:
/// ```text
///  step fields / pasted text        .csv / .json / .txt
///        │                                  │
///        ▼                                  ▼
///   ┌──────────┐                      ┌──────────┐
///   │  parse    │  text → OdSequence   │  loader   │  file → Vec<f64>
///   └──────────┘                      └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  curve    │  reverse, axes, Gamma → CurveGeometry
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  CurveGeometry → .csv / .json
///   └──────────┘
/// ```

pub mod curve;
pub mod error;
pub mod export;
pub mod loader;
pub mod model;
pub mod parse;
