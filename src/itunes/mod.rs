//! iTunes library parsing
//!
//! Parses the "iTunes Music Library.xml" property list to extract
//! track locations and playlist structure.

mod library;
pub mod plist;

pub use library::library_from_plist;

use crate::error::{Error, Result};
use crate::export::config::MissingTrackPolicy;
use crate::model::Library;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse a complete iTunes library from its XML file
///
/// # Arguments
/// * `path` - Path to the library XML (typically ~/Music/iTunes/iTunes Music Library.xml)
/// * `missing_tracks` - What to do with playlist items that reference unknown tracks
///
/// # Returns
/// A Library containing all tracks and playlists
pub fn parse_library(path: &Path, missing_tracks: MissingTrackPolicy) -> Result<Library> {
    log::info!("Parsing iTunes library from {:?}", path);

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let root = plist::read_plist(BufReader::new(file))
        .map_err(|e| Error::parse(path, e.to_string()))?;

    let library = library_from_plist(path, &root, missing_tracks)?;

    log::info!(
        "Loaded library: {} tracks, {} playlists",
        library.track_count(),
        library.playlist_count()
    );

    Ok(library)
}
