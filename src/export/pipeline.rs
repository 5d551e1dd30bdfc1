//! Main export pipeline orchestration

use super::config::{CopyMode, ExportConfig, PlaylistSelection};
use super::organizer::OutputOrganizer;
use super::paths::sanitize_file_name;
use super::resolver::{resolve_playlist, ResolvedTrack};
use super::writer::{writer_for, PlaylistWriter};
use crate::error::{Error, Result};
use crate::model::{Library, Playlist};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of a completed export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Playlist files written, in export order
    pub playlist_files: Vec<PathBuf>,

    /// Total number of entries across all playlist files
    pub entries_written: usize,

    /// Number of media files copied (copy mode only)
    ///
    /// Repeated entries and files already in place are not counted.
    pub files_copied: usize,
}

/// Main export pipeline
pub struct ExportPipeline {
    config: ExportConfig,
    organizer: OutputOrganizer,
    writer: Box<dyn PlaylistWriter>,
}

impl ExportPipeline {
    /// Create a new export pipeline
    pub fn new(config: ExportConfig) -> Self {
        let organizer = OutputOrganizer::new(config.output_dir.clone());
        let writer = writer_for(config.format);

        Self {
            config,
            organizer,
            writer,
        }
    }

    /// Run the complete export process
    ///
    /// Stops at the first error. Files written or copied before the error
    /// stay on disk.
    pub fn export(&self, library: &Library) -> Result<ExportSummary> {
        log::info!("Starting playlist export");
        log::info!("Target: {:?}", self.organizer.output_dir());

        let playlists = self.select_playlists(library);
        log::info!("Exporting {} playlist(s)", playlists.len());

        // Step 1: Initialize output directory
        self.organizer.init()?;

        // Step 2: Resolve, copy and write each playlist
        let mut summary = ExportSummary::default();
        let mut stems = HashSet::new();

        for (i, playlist) in playlists.iter().enumerate() {
            let stem = unique_stem(&mut stems, &playlist.name);
            log::info!(
                "[{}/{}] Exporting: {} ({} tracks)",
                i + 1,
                playlists.len(),
                playlist.name,
                playlist.len()
            );
            self.export_playlist(library, playlist, &stem, &mut summary)?;
        }

        log::info!(
            "Export complete: {} playlist file(s), {} entries, {} file(s) copied",
            summary.playlist_files.len(),
            summary.entries_written,
            summary.files_copied
        );
        Ok(summary)
    }

    /// Playlists covered by the configured selection, in library order
    pub fn select_playlists<'a>(&self, library: &'a Library) -> Vec<&'a Playlist> {
        let mut selected: Vec<&Playlist> = match &self.config.selection {
            PlaylistSelection::All => library
                .playlists()
                .iter()
                .filter(|p| !p.is_folder && (self.config.include_builtin || !p.is_builtin()))
                .collect(),
            PlaylistSelection::Named(names) => {
                for name in names {
                    if library.find_playlist(name).is_none() {
                        log::warn!("Playlist not found in library: {}", name);
                    }
                }
                library
                    .playlists()
                    .iter()
                    .filter(|p| names.contains(&p.name))
                    .collect()
            }
        };

        selected.retain(|p| !self.config.exclude.contains(&p.name));
        selected
    }

    fn export_playlist(
        &self,
        library: &Library,
        playlist: &Playlist,
        stem: &str,
        summary: &mut ExportSummary,
    ) -> Result<()> {
        let mut entries = resolve_playlist(playlist, library, self.config.rewrite.as_ref())?;

        if self.config.copy_mode == CopyMode::Playlist {
            summary.files_copied += self.copy_entries(stem, &mut entries)?;
        }

        let path = self
            .organizer
            .playlist_file_path(stem, self.config.format.extension());
        self.write_playlist_file(&path, &playlist.name, &entries)?;
        log::debug!("Wrote {:?}", path);

        summary.entries_written += entries.len();
        summary.playlist_files.push(path);
        Ok(())
    }

    /// Copy each entry's file into the playlist folder and point the entry at the copy
    ///
    /// Repeated entries share one copy. Files already in the folder are
    /// referenced in place and keep their names; other sources whose
    /// basename is taken get a numbered name. Returns the number of files
    /// actually copied.
    fn copy_entries(&self, stem: &str, entries: &mut [ResolvedTrack<'_>]) -> Result<usize> {
        let copy_dir = self.organizer.copy_dir(stem);
        std::fs::create_dir_all(&copy_dir).map_err(|e| Error::io(&copy_dir, e))?;

        // source location -> destination
        let mut destinations: HashMap<String, PathBuf> = HashMap::new();
        let mut taken = HashSet::new();

        for entry in entries.iter() {
            let source = Path::new(&entry.location);
            if destinations.contains_key(&entry.location)
                || !self.organizer.is_in_copy_dir(stem, source)
            {
                continue;
            }
            let dest = self.organizer.copied_file_path(stem, source, &mut taken)?;
            destinations.insert(entry.location.clone(), dest);
        }

        let mut copied = 0;
        for entry in entries.iter_mut() {
            let dest = match destinations.get(&entry.location) {
                Some(dest) => dest.clone(),
                None => {
                    let source = PathBuf::from(&entry.location);
                    let dest = self.organizer.copied_file_path(stem, &source, &mut taken)?;
                    if self.organizer.copy_media_file(&source, &dest)? {
                        copied += 1;
                    }
                    destinations.insert(entry.location.clone(), dest.clone());
                    dest
                }
            };
            entry.location = dest.to_string_lossy().into_owned();
        }

        Ok(copied)
    }

    fn write_playlist_file(
        &self,
        path: &Path,
        name: &str,
        entries: &[ResolvedTrack<'_>],
    ) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let mut out = BufWriter::new(file);
        self.writer
            .write(&mut out, name, entries)
            .and_then(|()| out.flush())
            .map_err(|e| Error::io(path, e))
    }
}

/// Sanitized output stem, suffixed with " (n)" when already taken
///
/// Case-insensitive so exports stay distinct on case-folding filesystems.
fn unique_stem(used: &mut HashSet<String>, name: &str) -> String {
    let base = sanitize_file_name(name);
    let mut n = 1;
    loop {
        let candidate = if n == 1 {
            base.clone()
        } else {
            format!("{} ({})", base, n)
        };
        if used.insert(candidate.to_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}
