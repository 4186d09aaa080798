use thiserror::Error;

/// Result type alias for the conversion pipeline.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Everything that can go wrong between getting the bytes and producing the table.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Decoded coordinate columns disagree in length.
    #[error("coordinate arrays have mismatched lengths (x: {x}, y: {y}, z: {z})")]
    ShapeMismatch { x: usize, y: usize, z: usize },

    /// The decoder was built without a LAZ decompression backend.
    #[error("LAZ backend not available: cannot decompress .laz data")]
    BackendUnavailable,

    /// Any other failure while parsing the point format.
    #[error("failed to decode point data: {0}")]
    Decode(#[source] las::Error),

    /// Fetch answered with something other than `200 OK`.
    #[error("HTTP {status}: {reason}")]
    HttpStatus {
        status: u16,
        reason: String,
        /// Leading part of the response body, for display.
        body_preview: String,
    },

    /// Fetch body looks like an HTML/XML page rather than point data.
    #[error("URL returned HTML (likely an error/redirect page) instead of a .laz file")]
    UnexpectedContent {
        content_type: String,
        preview: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

impl From<las::Error> for ConvertError {
    fn from(err: las::Error) -> Self {
        match err {
            las::Error::LaszipNotEnabled => ConvertError::BackendUnavailable,
            other => ConvertError::Decode(other),
        }
    }
}

impl ConvertError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ConvertError::HttpStatus { status: 401, .. })
    }

    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, ConvertError::BackendUnavailable)
    }

    /// Follow-up hint shown under the error message, if any.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            ConvertError::BackendUnavailable => Some(
                "Install a LAZ backend: rebuild with the `laz` feature enabled \
                 (it is part of the default features).",
            ),
            ConvertError::HttpStatus { status: 401, .. } => Some(
                "The URL requires credentials or a presigned URL. \
                 Use a presigned URL (S3) or provide a token or username and password.",
            ),
            ConvertError::HttpStatus { .. }
            | ConvertError::UnexpectedContent { .. }
            | ConvertError::Network(_) => Some(
                "Ensure the URL points directly to the .laz file \
                 (use a presigned S3 URL, add ?dl=1 for Dropbox, or enable public GET).",
            ),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_laszip_maps_to_backend_unavailable() {
        let err = ConvertError::from(las::Error::LaszipNotEnabled);
        assert!(err.is_backend_unavailable());
        assert!(err.remediation().unwrap().contains("laz"));
    }

    #[test]
    fn other_las_errors_are_decode_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        let err = ConvertError::from(las::Error::from(io));
        assert!(matches!(err, ConvertError::Decode(_)));
        assert!(err.remediation().is_none());
    }

    #[test]
    fn unauthorized_gets_credential_hint() {
        let err = ConvertError::HttpStatus {
            status: 401,
            reason: "Unauthorized".into(),
            body_preview: String::new(),
        };
        assert!(err.is_unauthorized());
        assert!(err.remediation().unwrap().contains("presigned"));
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
    }

    #[test]
    fn not_found_is_not_unauthorized() {
        let err = ConvertError::HttpStatus {
            status: 404,
            reason: "Not Found".into(),
            body_preview: String::new(),
        };
        assert!(!err.is_unauthorized());
        assert!(err.remediation().unwrap().contains("points directly"));
    }
}
