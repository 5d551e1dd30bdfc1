//! iTunes Exporter - iTunes library to playlist file exporter
//!
//! This library reads an iTunes XML library and writes each playlist as
//! an M3U, PLS or WPL file, optionally copying the referenced media next
//! to it.

pub mod error;
pub mod export;
pub mod itunes;
pub mod model;

pub use error::{Error, Result};
pub use export::config::ExportConfig;
pub use export::pipeline::{ExportPipeline, ExportSummary};

use std::path::Path;

/// Load the library at `database` and export it according to `config`
pub fn run(database: &Path, config: &ExportConfig) -> Result<ExportSummary> {
    let library = itunes::parse_library(database, config.missing_tracks)?;
    ExportPipeline::new(config.clone()).export(&library)
}
