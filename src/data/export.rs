use serde::Serialize;

use super::error::Result;
use super::model::{ExportFormat, ExportedTable, PointCloud};

/// Header row of the CSV export.
const CSV_HEADER: [&str; 3] = ["X", "Y", "Z"];

#[derive(Serialize)]
struct CsvRow {
    x: f64,
    y: f64,
    z: f64,
}

/// Serialize `cloud` into `format`, tagging the result with `file_name`.
pub fn export(cloud: &PointCloud, format: ExportFormat, file_name: &str) -> Result<ExportedTable> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(cloud)?,
        ExportFormat::Xyz => to_xyz(cloud).into_bytes(),
    };
    Ok(ExportedTable {
        format,
        file_name: file_name.to_string(),
        bytes,
    })
}

/// `X,Y,Z` header, then one row per point in shortest round-trip notation.
///
/// The header is written explicitly so an empty cloud still gets it.
fn to_csv(cloud: &PointCloud) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for [x, y, z] in cloud.points() {
        writer.serialize(CsvRow { x, y, z })?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

/// `x y z` per line with three decimals, no header, no trailing newline.
fn to_xyz(cloud: &PointCloud) -> String {
    cloud
        .points()
        .map(|[x, y, z]| format!("{x:.3} {y:.3} {z:.3}"))
        .collect::<Vec<_>>()
        .join("\n")
}
