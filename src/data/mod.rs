//! Data layer: acquisition, decoding, and export.
//!
//! Architecture:
//! ```text
//!  upload bytes ── or ── GET url (+ auth)
//!        │                    │
//!        │             ┌──────────┐
//!        │             │  source   │  status / HTML checks → RawSource
//!        │             └──────────┘
//!        ▼                    ▼
//!   ┌──────────┐
//!   │ decoder   │  las::Reader → PointCloud (X, Y, Z columns)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  CSV (X,Y,Z header) or XYZ (3 decimals) → ExportedTable
//!   └──────────┘
//! ```
//!
//! `pipeline::convert` chains decoder and export for a single pass.

pub mod decoder;
pub mod error;
pub mod export;
pub mod model;
pub mod pipeline;
pub mod source;
