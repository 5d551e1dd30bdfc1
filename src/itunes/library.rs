//! Conversion of the iTunes plist tree into the unified Library model

use super::plist::{Dict, Value};
use crate::error::{Error, Result};
use crate::export::config::MissingTrackPolicy;
use crate::model::{Library, Playlist, Track};
use std::path::Path;

/// Build a Library from the root value of an iTunes library plist
///
/// `source` is only used to label parse errors.
pub fn library_from_plist(
    source: &Path,
    root: &Value,
    missing_tracks: MissingTrackPolicy,
) -> Result<Library> {
    let root = root
        .as_dict()
        .ok_or_else(|| Error::parse(source, "root element is not a <dict>"))?;

    let mut library = Library::new();

    let tracks = root
        .get("Tracks")
        .and_then(Value::as_dict)
        .ok_or_else(|| Error::parse(source, "missing 'Tracks' dictionary"))?;
    for (key, value) in tracks.iter() {
        let entry = value
            .as_dict()
            .ok_or_else(|| Error::parse(source, format!("track entry '{}' is not a <dict>", key)))?;
        library.add_track(convert_track(source, key, entry)?);
    }

    let playlists = root
        .get("Playlists")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::parse(source, "missing 'Playlists' array"))?;
    for (index, value) in playlists.iter().enumerate() {
        let entry = value.as_dict().ok_or_else(|| {
            Error::parse(source, format!("playlist #{} is not a <dict>", index))
        })?;
        let playlist = convert_playlist(source, index, entry, &library, missing_tracks)?;
        log::debug!(
            "Playlist '{}': {} entries",
            playlist.name,
            playlist.len()
        );
        library.add_playlist(playlist);
    }

    Ok(library)
}

fn convert_track(source: &Path, key: &str, entry: &Dict) -> Result<Track> {
    let id = entry
        .get_integer("Track ID")
        .ok_or_else(|| Error::parse(source, format!("track entry '{}' has no Track ID", key)))?;

    let location = entry
        .get_str("Location")
        .ok_or_else(|| Error::parse(source, format!("track {} has no Location", id)))?;

    let mut track = Track::new(id.to_string(), location);
    track.title = entry.get_str("Name").map(str::to_string);
    track.artist = entry.get_str("Artist").map(str::to_string);
    track.duration_ms = entry
        .get_integer("Total Time")
        .and_then(|ms| u64::try_from(ms).ok());

    Ok(track)
}

fn convert_playlist(
    source: &Path,
    index: usize,
    entry: &Dict,
    library: &Library,
    missing_tracks: MissingTrackPolicy,
) -> Result<Playlist> {
    let name = entry
        .get_str("Name")
        .ok_or_else(|| Error::parse(source, format!("playlist #{} has no Name", index)))?;

    let mut playlist = Playlist::new(name.to_string());
    playlist.is_folder = entry.get_flag("Folder");
    playlist.is_master = entry.get_flag("Master");
    playlist.distinguished_kind = entry.get_integer("Distinguished Kind");

    let items = match entry.get("Playlist Items") {
        Some(value) => value.as_array().ok_or_else(|| {
            Error::parse(source, format!("'Playlist Items' of '{}' is not an <array>", name))
        })?,
        None => return Ok(playlist),
    };

    for item in items {
        let track_id = item
            .as_dict()
            .and_then(|d| d.get_integer("Track ID"))
            .ok_or_else(|| {
                Error::parse(source, format!("item in playlist '{}' has no Track ID", name))
            })?
            .to_string();

        if !library.contains_track(&track_id) {
            match missing_tracks {
                MissingTrackPolicy::Fail => {
                    return Err(Error::Reference {
                        playlist: name.to_string(),
                        track_id,
                    });
                }
                MissingTrackPolicy::Skip => {
                    log::warn!(
                        "Skipping unknown track id {} in playlist '{}'",
                        track_id,
                        name
                    );
                    continue;
                }
            }
        }

        playlist.add_track(track_id);
    }

    Ok(playlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itunes::plist::read_plist;

    const LIBRARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>Tracks</key>
    <dict>
        <key>100</key>
        <dict>
            <key>Track ID</key><integer>100</integer>
            <key>Name</key><string>First</string>
            <key>Artist</key><string>Band</string>
            <key>Total Time</key><integer>183000</integer>
            <key>Location</key><string>file://localhost/music/first.mp3</string>
        </dict>
        <key>200</key>
        <dict>
            <key>Track ID</key><integer>200</integer>
            <key>Location</key><string>file://localhost/music/second.mp3</string>
        </dict>
    </dict>
    <key>Playlists</key>
    <array>
        <dict>
            <key>Name</key><string>Library</string>
            <key>Master</key><true/>
            <key>Playlist Items</key>
            <array>
                <dict><key>Track ID</key><integer>100</integer></dict>
                <dict><key>Track ID</key><integer>200</integer></dict>
            </array>
        </dict>
        <dict>
            <key>Name</key><string>Mix</string>
            <key>Playlist Persistent ID</key><string>ABC</string>
            <key>Parent Persistent ID</key><string>DEF</string>
            <key>Playlist Items</key>
            <array>
                <dict><key>Track ID</key><integer>200</integer></dict>
                <dict><key>Track ID</key><integer>999</integer></dict>
                <dict><key>Track ID</key><integer>100</integer></dict>
                <dict><key>Track ID</key><integer>200</integer></dict>
            </array>
        </dict>
        <dict>
            <key>Name</key><string>Folder</string>
            <key>Folder</key><true/>
        </dict>
    </array>
</dict>
</plist>"#;

    fn convert(xml: &str, policy: MissingTrackPolicy) -> Result<Library> {
        let root = read_plist(xml.as_bytes()).unwrap();
        library_from_plist(Path::new("test.xml"), &root, policy)
    }

    #[test]
    fn test_skip_policy_drops_unknown_references() {
        let library = convert(LIBRARY, MissingTrackPolicy::Skip).unwrap();

        assert_eq!(library.track_count(), 2);
        assert_eq!(library.playlist_count(), 3);

        let first = library.get_track("100").unwrap();
        assert_eq!(first.title.as_deref(), Some("First"));
        assert_eq!(first.artist.as_deref(), Some("Band"));
        assert_eq!(first.duration_ms, Some(183_000));
        assert_eq!(first.location, "file://localhost/music/first.mp3");

        let mix = library.find_playlist("Mix").unwrap();
        let ids: Vec<_> = mix.entries.iter().map(|e| e.track_id.as_str()).collect();
        assert_eq!(ids, ["200", "100", "200"]);

        assert!(library.find_playlist("Library").unwrap().is_master);
        let folder = library.find_playlist("Folder").unwrap();
        assert!(folder.is_folder);
        assert!(folder.is_empty());
    }

    #[test]
    fn test_fail_policy_reports_unknown_reference() {
        let err = convert(LIBRARY, MissingTrackPolicy::Fail).unwrap_err();
        match err {
            Error::Reference { playlist, track_id } => {
                assert_eq!(playlist, "Mix");
                assert_eq!(track_id, "999");
            }
            other => panic!("expected reference error, got {:?}", other),
        }
    }

    #[test]
    fn test_track_without_location_is_parse_error() {
        let xml = r#"<plist><dict>
            <key>Tracks</key><dict>
                <key>1</key><dict><key>Track ID</key><integer>1</integer></dict>
            </dict>
            <key>Playlists</key><array/>
        </dict></plist>"#;
        let err = convert(xml, MissingTrackPolicy::Fail).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("no Location"));
    }

    #[test]
    fn test_track_without_id_is_parse_error() {
        let xml = r#"<plist><dict>
            <key>Tracks</key><dict>
                <key>1</key><dict><key>Location</key><string>/a.mp3</string></dict>
            </dict>
            <key>Playlists</key><array/>
        </dict></plist>"#;
        let err = convert(xml, MissingTrackPolicy::Fail).unwrap_err();
        assert!(err.to_string().contains("no Track ID"));
    }

    #[test]
    fn test_playlist_without_name_is_parse_error() {
        let xml = r#"<plist><dict>
            <key>Tracks</key><dict/>
            <key>Playlists</key><array><dict><key>Master</key><true/></dict></array>
        </dict></plist>"#;
        let err = convert(xml, MissingTrackPolicy::Fail).unwrap_err();
        assert!(err.to_string().contains("has no Name"));
    }

    #[test]
    fn test_missing_sections_are_parse_errors() {
        let no_playlists = "<plist><dict><key>Tracks</key><dict/></dict></plist>";
        assert!(matches!(
            convert(no_playlists, MissingTrackPolicy::Fail),
            Err(Error::Parse { .. })
        ));

        let not_a_dict = "<plist><array/></plist>";
        assert!(matches!(
            convert(not_a_dict, MissingTrackPolicy::Fail),
            Err(Error::Parse { .. })
        ));
    }
}
