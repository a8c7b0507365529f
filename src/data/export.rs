use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::CurveGeometry;

/// Write the plotted series as `exposure_step,entered_step,od` rows.
pub fn export_csv(path: &Path, geometry: &CurveGeometry) -> Result<()> {
    let file = std::fs::File::create(path).context("creating CSV file")?;
    write_csv(file, geometry)
}

fn write_csv<W: Write>(sink: W, geometry: &CurveGeometry) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer
        .write_record(["exposure_step", "entered_step", "od"])
        .context("writing CSV header")?;
    for (position, od) in geometry.points() {
        writer
            .write_record([
                position.to_string(),
                geometry.entered_step(position).to_string(),
                od.to_string(),
            ])
            .with_context(|| format!("writing CSV row {position}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Write the whole chart bundle (series, axes, Gamma) as pretty JSON.
pub fn export_json(path: &Path, geometry: &CurveGeometry) -> Result<()> {
    let text = serde_json::to_string_pretty(geometry).context("serializing curve")?;
    std::fs::write(path, text).context("writing JSON file")?;
    Ok(())
}
