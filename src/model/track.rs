use std::path::Path;

/// Represents a single library track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Unique identifier for this track
    pub id: String,

    /// File location as recorded in the library (file:// URI or plain path)
    pub location: String,

    /// Track title (optional)
    pub title: Option<String>,

    /// Artist name (optional)
    pub artist: Option<String>,

    /// Track duration in milliseconds (optional)
    pub duration_ms: Option<u64>,
}

impl Track {
    /// Create a track with only the required fields set
    pub fn new(id: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            title: None,
            artist: None,
            duration_ms: None,
        }
    }

    /// Human-readable name used by extended playlist formats
    ///
    /// "Artist - Title" when both are known, otherwise the title,
    /// otherwise the file stem of `location`.
    pub fn display_title(&self, location: &str) -> String {
        match (&self.artist, &self.title) {
            (Some(artist), Some(title)) => format!("{} - {}", artist, title),
            (None, Some(title)) => title.clone(),
            _ => Path::new(location)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| location.to_string()),
        }
    }

    /// Duration in whole seconds, if known
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration_ms.map(|ms| ms / 1000)
    }
}
