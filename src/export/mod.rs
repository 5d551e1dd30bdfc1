//! Playlist resolution, file writing and media copying

pub mod config;
pub mod organizer;
pub mod paths;
pub mod pipeline;
pub mod resolver;
pub mod writer;

pub use config::{CopyMode, ExportConfig, MissingTrackPolicy, PlaylistFormat, PlaylistSelection};
pub use organizer::OutputOrganizer;
pub use paths::{normalize_location, PrefixRewrite};
pub use pipeline::{ExportPipeline, ExportSummary};
pub use resolver::{resolve_playlist, ResolvedTrack};
pub use writer::{writer_for, PlaylistWriter};
