//! Export configuration

use super::paths::PrefixRewrite;
use std::path::PathBuf;

/// Configuration for the export process
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Directory that receives playlist files (and copied media)
    pub output_dir: PathBuf,

    /// Output playlist format
    pub format: PlaylistFormat,

    /// Which playlists to export
    pub selection: PlaylistSelection,

    /// Playlist names to leave out, applied after `selection`
    pub exclude: Vec<String>,

    /// Whether `PlaylistSelection::All` also covers built-in iTunes playlists
    pub include_builtin: bool,

    /// Whether media files are copied next to the playlists
    pub copy_mode: CopyMode,

    /// Optional location prefix substitution
    pub rewrite: Option<PrefixRewrite>,

    /// Handling of playlist items that reference unknown tracks
    pub missing_tracks: MissingTrackPolicy,
}

/// Output playlist format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaylistFormat {
    /// `#EXTM3U` header followed by one location per line
    #[default]
    M3u,
    /// M3U with `#EXTINF` duration/title lines
    ExtM3u,
    /// Winamp/Shoutcast PLS
    Pls,
    /// Windows Media Player playlist
    Wpl,
}

impl PlaylistFormat {
    /// File extension (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            PlaylistFormat::M3u | PlaylistFormat::ExtM3u => "m3u",
            PlaylistFormat::Pls => "pls",
            PlaylistFormat::Wpl => "wpl",
        }
    }
}

/// Playlist selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlaylistSelection {
    /// Every user playlist (no master library, no folders)
    #[default]
    All,
    /// Only the playlists with these names
    Named(Vec<String>),
}

/// Media copy behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    /// Playlists reference the original files
    #[default]
    None,
    /// Files are copied to `<output>/<playlist>/` and referenced there
    Playlist,
}

/// What to do when a playlist references a track id the library lacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTrackPolicy {
    /// Abort loading with a reference error
    #[default]
    Fail,
    /// Drop the entry and log a warning
    Skip,
}

impl ExportConfig {
    /// Create a new export configuration
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            format: PlaylistFormat::default(),
            selection: PlaylistSelection::default(),
            exclude: Vec::new(),
            include_builtin: false,
            copy_mode: CopyMode::default(),
            rewrite: None,
            missing_tracks: MissingTrackPolicy::default(),
        }
    }

    /// Set the output format
    pub fn with_format(mut self, format: PlaylistFormat) -> Self {
        self.format = format;
        self
    }

    /// Set specific playlists to export
    pub fn with_playlists(mut self, playlists: Vec<String>) -> Self {
        self.selection = PlaylistSelection::Named(playlists);
        self
    }

    /// Leave these playlists out
    pub fn with_excluded(mut self, playlists: Vec<String>) -> Self {
        self.exclude = playlists;
        self
    }

    /// Include built-in playlists when exporting all
    pub fn with_builtin(mut self, include_builtin: bool) -> Self {
        self.include_builtin = include_builtin;
        self
    }

    /// Set copy mode
    pub fn with_copy_mode(mut self, copy_mode: CopyMode) -> Self {
        self.copy_mode = copy_mode;
        self
    }

    /// Replace `original` with `replacement` at the start of track locations
    pub fn with_rewrite(
        mut self,
        original: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.rewrite = Some(PrefixRewrite::new(original, replacement));
        self
    }

    /// Set the unknown-track policy
    pub fn with_missing_tracks(mut self, policy: MissingTrackPolicy) -> Self {
        self.missing_tracks = policy;
        self
    }
}
