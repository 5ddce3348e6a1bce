//! Vehicle Dashboard Common Library
//!
//! CLIとWeb(WASM)で共有される型とパイプライン

pub mod types;
pub mod error;
pub mod platform;
pub mod normalizer;
pub mod query;
pub mod selection;
pub mod dashboard;
pub mod export;

pub use types::{VehicleField, VehicleRecord};
pub use error::{Error, ExportError, FetchError, NormalizeError, Result};
pub use platform::{Platform, PlatformScope, PlatformTable};
pub use normalizer::{normalize_payload, normalize_str, NormalizeReport};
pub use query::{
    DerivedView, FilterDimension, FilterState, Query, SortDirection, SortState,
};
pub use selection::SelectionSet;
pub use dashboard::{Dashboard, FetchOutcome, FetchTicket};
pub use export::{ExportScope, EXPORT_FILE_NAME, SHEET_NAME};
