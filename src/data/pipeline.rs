use super::decoder::decode_laz;
use super::error::Result;
use super::export::export;
use super::model::{ExportFormat, ExportedTable, PointCloud, RawSource, SourceOrigin};

/// Outcome of one upload/fetch pass.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub origin: SourceOrigin,
    pub cloud: PointCloud,
    pub table: ExportedTable,
}

impl Conversion {
    /// Re-export the same cloud in another format.
    pub fn reexport(&mut self, format: ExportFormat) -> Result<()> {
        if self.table.format != format {
            let name = self.origin.suggested_file_name(format);
            self.table = export(&self.cloud, format, &name)?;
        }
        Ok(())
    }
}

/// Decode `source` and export it as `format`. Either everything succeeds or
/// nothing is returned.
pub fn convert(source: RawSource, format: ExportFormat) -> Result<Conversion> {
    let RawSource {
        origin,
        bytes,
        content_type,
        status,
    } = source;
    log::debug!(
        "decoding {} bytes from {origin} (status: {status:?}, content-type: {content_type:?})",
        bytes.len()
    );
    let cloud = decode_laz(bytes)?;
    let table = export(&cloud, format, &origin.suggested_file_name(format))?;
    Ok(Conversion {
        origin,
        cloud,
        table,
    })
}
