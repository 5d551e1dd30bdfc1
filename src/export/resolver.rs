//! Resolution of playlist entries to normalized file locations

use super::paths::{normalize_location, PrefixRewrite};
use crate::error::{Error, Result};
use crate::model::{Library, Playlist, Track};

/// A playlist entry with its track and normalized location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack<'a> {
    pub track: &'a Track,
    pub location: String,
}

/// Resolve every entry of `playlist`, in order
///
/// Pure function of its inputs. An entry whose track id is not in the
/// library yields a reference error.
pub fn resolve_playlist<'a>(
    playlist: &Playlist,
    library: &'a Library,
    rewrite: Option<&PrefixRewrite>,
) -> Result<Vec<ResolvedTrack<'a>>> {
    playlist
        .entries
        .iter()
        .map(|entry| {
            let track = library
                .get_track(&entry.track_id)
                .ok_or_else(|| Error::Reference {
                    playlist: playlist.name.clone(),
                    track_id: entry.track_id.clone(),
                })?;
            Ok(ResolvedTrack {
                track,
                location: normalize_location(&track.location, rewrite),
            })
        })
        .collect()
}
