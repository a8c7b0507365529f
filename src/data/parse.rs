use super::error::{CurveError, FieldWarning};
use super::model::OdSequence;

// ---------------------------------------------------------------------------
// Number scanning
// ---------------------------------------------------------------------------

/// If a number starts exactly at `start`, return the byte offset where it ends.
///
/// Grammar: optional sign, then `digits* '.' digits+` or `digits+`.
/// A fraction is taken whenever one follows, so `.5` and `-3.25` are whole
/// numbers while `1.` stops before the dot.
///
/// The sign is read on integers as well (`-3` is −3). The original tool's
/// pattern only kept it on decimals and read `-3` as 3; this differs on purpose.
fn number_end(bytes: &[u8], start: usize) -> Option<usize> {
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut i = start;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while is_digit(i) {
        i += 1;
    }
    let int_end = i;

    if bytes.get(i) == Some(&b'.') && is_digit(i + 1) {
        i += 1;
        while is_digit(i) {
            i += 1;
        }
        return Some(i);
    }
    (int_end > int_start).then_some(int_end)
}

/// Iterator over every number embedded in free-form text.
struct Numbers<'a> {
    text: &'a str,
    pos: usize,
}

impl Iterator for Numbers<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let start = self.pos;
            match number_end(bytes, start) {
                Some(end) => {
                    self.pos = end;
                    // Matches only ever start on ASCII, so the slice is on a char boundary.
                    if let Ok(value) = self.text[start..end].parse::<f64>() {
                        return Some(value);
                    }
                }
                None => self.pos += 1,
            }
        }
        None
    }
}

fn numbers(text: &str) -> Numbers<'_> {
    Numbers { text, pos: 0 }
}

/// Every number found in a block of text, in order.
///
/// Separators do not matter: commas, spaces, newlines and labels are all skipped.
pub fn extract_numbers(text: &str) -> Vec<f64> {
    numbers(text).collect()
}

// ---------------------------------------------------------------------------
// Per-field parsing
// ---------------------------------------------------------------------------

/// Result of reading one step field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedField {
    pub value: f64,
    /// `false` when the text held no number and `value` is the 0.0 default.
    pub found: bool,
}

/// Read the first number in a field, falling back to 0.0.
pub fn parse_field(text: &str) -> ParsedField {
    match numbers(text).next() {
        Some(value) => ParsedField { value, found: true },
        None => ParsedField {
            value: 0.0,
            found: false,
        },
    }
}

/// Values for every step field plus the fields that had to be defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReadings {
    pub values: OdSequence,
    pub warnings: Vec<FieldWarning>,
}

/// Turn the step fields into one density per field.
///
/// A field without a number never fails the batch; it becomes 0.0 and is
/// reported in `warnings`. Only a batch where every field is blank fails.
pub fn parse_fields<S: AsRef<str>>(fields: &[S]) -> Result<ParsedReadings, CurveError> {
    if fields.iter().all(|f| f.as_ref().trim().is_empty()) {
        return Err(CurveError::AllBlank);
    }

    let mut values = Vec::with_capacity(fields.len());
    let mut warnings = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        let text = field.as_ref();
        let parsed = parse_field(text);
        if !parsed.found {
            warnings.push(FieldWarning {
                step: i + 1,
                text: text.to_string(),
            });
        }
        values.push(parsed.value);
    }

    Ok(ParsedReadings {
        values: OdSequence::new(values),
        warnings,
    })
}

/// Read a pasted block that must hold exactly `expected` numbers.
pub fn parse_bulk(text: &str, expected: usize) -> Result<Vec<f64>, CurveError> {
    let values = extract_numbers(text);
    if values.len() != expected {
        return Err(CurveError::CountMismatch {
            expected,
            found: values.len(),
        });
    }
    Ok(values)
}
