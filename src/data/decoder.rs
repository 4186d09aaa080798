use std::io::Cursor;

use las::Reader;

use super::error::Result;
use super::model::PointCloud;

/// Smallest LAS point record (format 0), in bytes.
const MIN_RECORD_LEN: usize = 20;

/// Decode LAZ (or plain LAS) bytes into X/Y/Z columns.
///
/// Coordinates come out scaled and offset per the file header, in the order
/// the records are stored. A missing LAZ backend surfaces as
/// [`ConvertError::BackendUnavailable`](super::error::ConvertError::BackendUnavailable).
pub fn decode_laz(bytes: Vec<u8>) -> Result<PointCloud> {
    // The header count is untrusted; never reserve more than the buffer can hold.
    let max_records = bytes.len() / MIN_RECORD_LEN;
    let mut reader = Reader::new(Cursor::new(bytes))?;
    let expected = reader.header().number_of_points();
    let capacity = usize::try_from(expected).map_or(max_records, |n| n.min(max_records));

    let mut x = Vec::with_capacity(capacity);
    let mut y = Vec::with_capacity(capacity);
    let mut z = Vec::with_capacity(capacity);

    for point in reader.points() {
        let point = point?;
        x.push(point.x);
        y.push(point.y);
        z.push(point.z);
    }

    log::debug!("decoded {} of {expected} declared points", x.len());
    PointCloud::from_columns(x, y, z)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::Path;

    use las::{Builder, Point, Writer};

    use super::*;
    use crate::data::error::ConvertError;

    /// Write `points` to `path` as LAS, or LAZ when `compressed`.
    pub(crate) fn write_cloud(path: &Path, points: &[[f64; 3]], compressed: bool) {
        let mut builder = Builder::from((1, 2));
        builder.point_format.is_compressed = compressed;
        let header = builder.into_header().unwrap();

        let mut writer = Writer::from_path(path, header).unwrap();
        for &[x, y, z] in points {
            writer
                .write_point(Point {
                    x,
                    y,
                    z,
                    ..Default::default()
                })
                .unwrap();
        }
        writer.close().unwrap();
    }

    /// In-memory LAZ bytes for `points`.
    pub(crate) fn laz_bytes(points: &[[f64; 3]]) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.laz");
        write_cloud(&path, points, true);
        std::fs::read(path).unwrap()
    }

    fn las_bytes(points: &[[f64; 3]]) -> Vec<u8> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.las");
        write_cloud(&path, points, false);
        std::fs::read(path).unwrap()
    }

    #[cfg(feature = "laz")]
    #[test]
    fn decodes_every_laz_point_in_order() {
        let points: Vec<[f64; 3]> = (0..250)
            .map(|i| [i as f64 * 0.5, 100.0 - i as f64, (i % 7) as f64 * 0.25])
            .collect();

        let cloud = decode_laz(laz_bytes(&points)).unwrap();

        assert_eq!(cloud.len(), points.len());
        assert_eq!(cloud.x().len(), cloud.y().len());
        assert_eq!(cloud.y().len(), cloud.z().len());
        for (decoded, original) in cloud.points().zip(&points) {
            for axis in 0..3 {
                assert!((decoded[axis] - original[axis]).abs() < 1e-9);
            }
        }
    }

    #[cfg(feature = "laz")]
    #[test]
    fn single_point_file_gives_length_one_columns() {
        let cloud = decode_laz(laz_bytes(&[[12.5, 7.25, 0.0]])).unwrap();
        assert_eq!(cloud.x().len(), 1);
        assert_eq!(cloud.y().len(), 1);
        assert_eq!(cloud.z().len(), 1);
        assert!((cloud.x()[0] - 12.5).abs() < 1e-9);
    }

    #[test]
    fn plain_las_decodes_without_backend() {
        let cloud = decode_laz(las_bytes(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]])).unwrap();
        assert_eq!(cloud.len(), 2);
    }

    #[test]
    fn empty_file_gives_empty_cloud() {
        let cloud = decode_laz(las_bytes(&[])).unwrap();
        assert!(cloud.is_empty());
    }

    #[test]
    fn oversized_point_count_does_not_preallocate() {
        let mut bytes = las_bytes(&[[1.0, 2.0, 3.0]]);
        // Legacy point count of a LAS 1.2 header.
        bytes[107..111].copy_from_slice(&u32::MAX.to_le_bytes());

        match decode_laz(bytes) {
            Ok(cloud) => assert_eq!(cloud.len(), 1),
            Err(err) => assert!(matches!(err, ConvertError::Decode(_)), "got {err:?}"),
        }
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode_laz(b"definitely not a point cloud".to_vec()).unwrap_err();
        assert!(matches!(err, ConvertError::Decode(_)), "got {err:?}");
    }
}
