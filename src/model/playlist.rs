/// Represents a playlist
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    /// Playlist name
    pub name: String,

    /// Playlist entries (ordered, duplicates allowed)
    pub entries: Vec<PlaylistEntry>,

    /// Whether this is a folder (can contain sub-playlists)
    pub is_folder: bool,

    /// Whether this is the master "Library" pseudo playlist
    pub is_master: bool,

    /// Built-in playlist kind (Music, Movies, Podcasts, ...)
    pub distinguished_kind: Option<i64>,
}

/// Entry in a playlist, referencing a track by ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Track ID (references Track::id)
    pub track_id: String,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Add a track to this playlist
    pub fn add_track(&mut self, track_id: String) {
        self.entries.push(PlaylistEntry { track_id });
    }

    /// Whether iTunes maintains this playlist itself
    pub fn is_builtin(&self) -> bool {
        self.is_master || self.distinguished_kind.is_some()
    }

    /// Number of tracks in this playlist
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if playlist is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_track_keeps_order_and_duplicates() {
        let mut playlist = Playlist::new("Mix".to_string());
        playlist.add_track("7".to_string());
        playlist.add_track("3".to_string());
        playlist.add_track("7".to_string());

        let ids: Vec<_> = playlist.entries.iter().map(|e| e.track_id.as_str()).collect();
        assert_eq!(ids, ["7", "3", "7"]);
        assert_eq!(playlist.len(), 3);
    }

    #[test]
    fn test_is_builtin() {
        let mut playlist = Playlist::new("Music".to_string());
        assert!(!playlist.is_builtin());
        playlist.distinguished_kind = Some(4);
        assert!(playlist.is_builtin());
    }
}
