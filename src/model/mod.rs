//! Data model for the parsed music library
//!
//! These structures are independent of both the input database
//! format and the output playlist formats.

mod library;
mod playlist;
mod track;

pub use library::Library;
pub use playlist::{Playlist, PlaylistEntry};
pub use track::Track;
