use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{ConvertError, Result};

// ---------------------------------------------------------------------------
// ExportFormat – the two text targets
// ---------------------------------------------------------------------------

/// Output format chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xyz,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Xyz];

    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xyz => "xyz",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xyz => "text/plain",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xyz => "XYZ",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// SourceOrigin / RawSource – bytes before decoding
// ---------------------------------------------------------------------------

/// Where the raw bytes came from. Drives the suggested output file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    /// Local file, identified by its file name (e.g. `tile_01.laz`).
    Upload(String),
    /// Remote URL fetched by the app.
    Url(String),
}

impl SourceOrigin {
    /// Output file name for `format`.
    ///
    /// Uploads keep their stem and swap (or gain) the extension; URL sources
    /// always map to `downloaded_file.<ext>`.
    pub fn suggested_file_name(&self, format: ExportFormat) -> String {
        match self {
            SourceOrigin::Upload(name) => Path::new(name)
                .with_extension(format.extension())
                .to_string_lossy()
                .into_owned(),
            SourceOrigin::Url(_) => format!("downloaded_file.{}", format.extension()),
        }
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::Upload(name) => write!(f, "{name}"),
            SourceOrigin::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Undecoded file content, consumed once by the decoder.
#[derive(Debug, Clone)]
pub struct RawSource {
    pub origin: SourceOrigin,
    pub bytes: Vec<u8>,
    /// Declared `Content-Type` (fetch only, lowercased).
    pub content_type: Option<String>,
    /// HTTP status of the response (fetch only).
    pub status: Option<u16>,
}

impl RawSource {
    /// Wrap bytes that are already in memory. No validation is done.
    pub fn from_upload(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            origin: SourceOrigin::Upload(name.into()),
            bytes,
            content_type: None,
            status: None,
        }
    }
}

// ---------------------------------------------------------------------------
// PointCloud – three parallel coordinate columns
// ---------------------------------------------------------------------------

/// Decoded X/Y/Z coordinates. All three columns always have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointCloud {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
}

impl PointCloud {
    /// Build from columns, refusing unequal lengths instead of truncating.
    pub fn from_columns(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() || y.len() != z.len() {
            return Err(ConvertError::ShapeMismatch {
                x: x.len(),
                y: y.len(),
                z: z.len(),
            });
        }
        Ok(Self { x, y, z })
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> &[f64] {
        &self.z
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Points in decoder order.
    pub fn points(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| [x, y, z])
    }

    /// Every n-th point so that at most `max` points are yielded.
    pub fn sample(&self, max: usize) -> impl Iterator<Item = [f64; 3]> + '_ {
        let step = if max == 0 {
            usize::MAX
        } else {
            self.len().div_ceil(max).max(1)
        };
        self.points().step_by(step).take(max)
    }

    /// Min/max of the Z column, `None` for an empty cloud.
    pub fn z_range(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let min = self.z.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

// ---------------------------------------------------------------------------
// ExportedTable – serialized output ready to save
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedTable {
    pub format: ExportFormat,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ExportedTable {
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }
}
