use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Log-exposure increment between neighbouring steps of a standard wedge.
const LOG_E_STEP: f64 = 0.15;

/// S-shaped characteristic curve: fog level in the toe, `d_max` at the shoulder.
fn density(log_e: f64, fog: f64, d_max: f64, speed_point: f64, contrast: f64) -> f64 {
    fog + (d_max - fog) / (1.0 + (-(log_e - speed_point) * contrast).exp())
}

/// Readings in entry order: step 1 (most exposed) first.
fn generate_wedge(steps: usize, fog: f64, d_max: f64, contrast: f64, noise: f64, rng: &mut SplitMix) -> Vec<f64> {
    let mid = steps as f64 * LOG_E_STEP / 2.0;
    (0..steps)
        .map(|i| {
            let log_e = (steps - 1 - i) as f64 * LOG_E_STEP;
            let od = density(log_e, fog, d_max, mid, contrast) + rng.gauss(0.0, noise);
            (od.max(0.0) * 100.0).round() / 100.0
        })
        .collect()
}

/// Small deterministic PRNG (SplitMix64).
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        mean + std_dev * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }
}

#[derive(Serialize)]
struct Record {
    step: usize,
    od: f64,
}

fn write_csv(path: &Path, readings: &[f64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for (i, &od) in readings.iter().enumerate() {
        writer.serialize(Record { step: i + 1, od })?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, readings: &[f64]) -> Result<()> {
    let records: Vec<Record> = readings
        .iter()
        .enumerate()
        .map(|(i, &od)| Record { step: i + 1, od })
        .collect();
    fs::write(path, serde_json::to_string_pretty(&records)?).context("writing JSON")?;
    Ok(())
}

fn write_txt(path: &Path, readings: &[f64]) -> Result<()> {
    let lines: Vec<String> = readings
        .chunks(5)
        .map(|row| {
            row.iter()
                .map(|od| format!("{od:.2}"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect();
    fs::write(path, lines.join(",\n") + "\n").context("writing text")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SplitMix(42);
    let out_dir = Path::new("sample_data");
    fs::create_dir_all(out_dir).context("creating sample_data/")?;

    // Normal-contrast film on a 21-step wedge.
    let normal = generate_wedge(21, 0.12, 3.1, 1.9, 0.01, &mut rng);
    write_csv(&out_dir.join("wedge_21.csv"), &normal)?;

    // Soft paper-like curve on 31 steps.
    let soft = generate_wedge(31, 0.08, 2.1, 1.1, 0.015, &mut rng);
    write_json(&out_dir.join("wedge_31.json"), &soft)?;

    // Dense 101-step calibration strip.
    let fine = generate_wedge(101, 0.2, 3.4, 0.6, 0.02, &mut rng);
    write_txt(&out_dir.join("wedge_101.txt"), &fine)?;

    println!("Wrote sample wedges to {}", out_dir.display());
    Ok(())
}
