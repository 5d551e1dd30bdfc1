use super::{Playlist, Track};
use std::collections::HashMap;

/// Complete music library containing tracks and playlists
#[derive(Debug, Clone)]
pub struct Library {
    /// All tracks indexed by their ID
    tracks: HashMap<String, Track>,

    /// All playlists, in database order
    playlists: Vec<Playlist>,
}

impl Library {
    /// Create a new empty library
    pub fn new() -> Self {
        Self {
            tracks: HashMap::new(),
            playlists: Vec::new(),
        }
    }

    /// Add a track to the library
    pub fn add_track(&mut self, track: Track) {
        self.tracks.insert(track.id.clone(), track);
    }

    /// Add a playlist to the library
    pub fn add_playlist(&mut self, playlist: Playlist) {
        self.playlists.push(playlist);
    }

    /// Get a track by ID
    pub fn get_track(&self, id: &str) -> Option<&Track> {
        self.tracks.get(id)
    }

    /// Whether a track with this ID exists
    pub fn contains_track(&self, id: &str) -> bool {
        self.tracks.contains_key(id)
    }

    /// Get all playlists
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// First playlist with the given name
    pub fn find_playlist(&self, name: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.name == name)
    }

    /// Total number of tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Total number of playlists
    pub fn playlist_count(&self) -> usize {
        self.playlists.len()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_creation() {
        let lib = Library::new();
        assert_eq!(lib.track_count(), 0);
        assert_eq!(lib.playlist_count(), 0);
    }

    #[test]
    fn test_add_track() {
        let mut lib = Library::new();

        let mut track = Track::new("1001", "file:///music/test.mp3");
        track.title = Some("Test Song".to_string());
        lib.add_track(track);

        assert_eq!(lib.track_count(), 1);
        assert!(lib.contains_track("1001"));
        assert!(!lib.contains_track("1002"));
        assert_eq!(
            lib.get_track("1001").unwrap().title.as_deref(),
            Some("Test Song")
        );
    }

    #[test]
    fn test_add_playlist() {
        let mut lib = Library::new();

        lib.add_playlist(Playlist::new("My Playlist".to_string()));
        lib.add_playlist(Playlist::new("Other".to_string()));

        assert_eq!(lib.playlist_count(), 2);
        assert_eq!(lib.playlists()[0].name, "My Playlist");
        assert!(lib.find_playlist("Other").is_some());
        assert!(lib.find_playlist("Missing").is_none());
    }
}
