//! Output directory layout and media copying

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Manages the export directory structure
///
/// ```text
/// <output>/<stem>.<ext>        playlist file
/// <output>/<stem>/<basename>   copied media (copy mode only)
/// ```
///
/// Copied files that would share a basename within one playlist are told
/// apart as `<name> (2).<ext>`, `<name> (3).<ext>`, ...
#[derive(Debug, Clone)]
pub struct OutputOrganizer {
    /// Root output path
    output_dir: PathBuf,
}

impl OutputOrganizer {
    /// Create a new organizer for the given output directory
    ///
    /// A relative directory is anchored at the current working directory so
    /// that every path handed out (and written into playlists) is absolute.
    pub fn new(output_dir: PathBuf) -> Self {
        let output_dir = std::path::absolute(&output_dir).unwrap_or(output_dir);
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;
        log::debug!("Output directory ready at {:?}", self.output_dir);
        Ok(())
    }

    /// Path of the playlist file for a playlist stem
    pub fn playlist_file_path(&self, stem: &str, extension: &str) -> PathBuf {
        self.output_dir.join(format!("{}.{}", stem, extension))
    }

    /// Directory receiving the copied media of a playlist
    pub fn copy_dir(&self, stem: &str) -> PathBuf {
        self.output_dir.join(stem)
    }

    /// Destination of a copied media file, keeping its base filename
    ///
    /// When the name is already in `taken` (compared case-insensitively),
    /// " (n)" is inserted before the extension: `01.mp3`, `01 (2).mp3`, ...
    /// The chosen name is added to `taken`.
    pub fn copied_file_path(
        &self,
        stem: &str,
        source: &Path,
        taken: &mut HashSet<String>,
    ) -> Result<PathBuf> {
        let base = file_name_of(source)?;
        let name_stem = Path::new(&base)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| base.clone());
        let extension = Path::new(&base)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut n = 1;
        loop {
            let candidate = if n == 1 {
                base.clone()
            } else {
                format!("{} ({}){}", name_stem, n, extension)
            };
            if taken.insert(candidate.to_lowercase()) {
                return Ok(self.copy_dir(stem).join(candidate));
            }
            n += 1;
        }
    }

    /// Whether `source` is an existing file directly inside the playlist's copy directory
    pub fn is_in_copy_dir(&self, stem: &str, source: &Path) -> bool {
        match source.parent() {
            Some(parent) => source.is_file() && is_same_file(parent, &self.copy_dir(stem)),
            None => false,
        }
    }

    /// Copy a media file, creating the destination directory if needed
    ///
    /// Returns `false` without touching anything when `source` and `dest`
    /// are the same file; copying a file onto itself would truncate it.
    pub fn copy_media_file(&self, source: &Path, dest: &Path) -> Result<bool> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        if is_same_file(source, dest) {
            log::debug!("{:?} is already in place", source);
            return Ok(false);
        }

        fs::copy(source, dest).map_err(|e| Error::io(source, e))?;

        log::debug!("Copied {:?} to {:?}", source, dest);
        Ok(true)
    }
}

fn file_name_of(source: &Path) -> Result<String> {
    source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::io(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "location has no file name"),
            )
        })
}

/// Both paths exist and resolve to the same file
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let organizer = OutputOrganizer::new(PathBuf::from("/out"));
        assert_eq!(
            organizer.playlist_file_path("My Playlist", "m3u"),
            PathBuf::from("/out/My Playlist.m3u")
        );
        assert_eq!(
            organizer
                .copied_file_path(
                    "My Playlist",
                    Path::new("/music/a/Song.mp3"),
                    &mut HashSet::new()
                )
                .unwrap(),
            PathBuf::from("/out/My Playlist/Song.mp3")
        );
    }

    #[test]
    fn test_relative_output_dir_is_made_absolute() {
        let organizer = OutputOrganizer::new(PathBuf::from("out"));
        let cwd = std::env::current_dir().unwrap();

        assert!(organizer.output_dir().is_absolute());
        assert_eq!(organizer.output_dir(), cwd.join("out"));

        let playlist = organizer.playlist_file_path("Mix", "m3u");
        assert!(playlist.is_absolute());
        let copied = organizer
            .copied_file_path("Mix", Path::new("x/a.mp3"), &mut HashSet::new())
            .unwrap();
        assert_eq!(copied, cwd.join("out").join("Mix").join("a.mp3"));
    }

    #[test]
    fn test_copied_file_path_numbers_taken_names() {
        let organizer = OutputOrganizer::new(PathBuf::from("/out"));
        let mut taken = HashSet::new();

        let first = organizer
            .copied_file_path("Mix", Path::new("/x/01.mp3"), &mut taken)
            .unwrap();
        let second = organizer
            .copied_file_path("Mix", Path::new("/y/01.MP3"), &mut taken)
            .unwrap();
        let third = organizer
            .copied_file_path("Mix", Path::new("/z/01.mp3"), &mut taken)
            .unwrap();
        let bare = organizer
            .copied_file_path("Mix", Path::new("/x/README"), &mut taken)
            .unwrap();
        let bare_again = organizer
            .copied_file_path("Mix", Path::new("/y/README"), &mut taken)
            .unwrap();

        assert_eq!(first, PathBuf::from("/out/Mix/01.mp3"));
        assert_eq!(second, PathBuf::from("/out/Mix/01 (2).MP3"));
        assert_eq!(third, PathBuf::from("/out/Mix/01 (3).mp3"));
        assert_eq!(bare, PathBuf::from("/out/Mix/README"));
        assert_eq!(bare_again, PathBuf::from("/out/Mix/README (2)"));
    }

    #[test]
    fn test_copied_file_path_requires_file_name() {
        let organizer = OutputOrganizer::new(PathBuf::from("/out"));
        assert!(matches!(
            organizer.copied_file_path("Mix", Path::new("/"), &mut HashSet::new()),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_copy_media_file() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source.mp3");
        fs::write(&source, b"audio bytes").unwrap();

        let organizer = OutputOrganizer::new(temp.path().join("out"));
        organizer.init().unwrap();
        let dest = organizer
            .copied_file_path("Mix", &source, &mut HashSet::new())
            .unwrap();

        assert!(organizer.copy_media_file(&source, &dest).unwrap());
        assert_eq!(fs::read(&dest).unwrap(), b"audio bytes");
    }

    #[test]
    fn test_copy_onto_itself_keeps_contents() {
        let temp = TempDir::new().unwrap();
        let organizer = OutputOrganizer::new(temp.path().join("out"));
        let in_place = organizer.copy_dir("Mix").join("a.mp3");
        fs::create_dir_all(in_place.parent().unwrap()).unwrap();
        fs::write(&in_place, b"only copy").unwrap();

        // same file reached through a different spelling
        let dotted = organizer.copy_dir("Mix").join(".").join("a.mp3");

        assert!(!organizer.copy_media_file(&in_place, &in_place).unwrap());
        assert!(!organizer.copy_media_file(&dotted, &in_place).unwrap());
        assert_eq!(fs::read(&in_place).unwrap(), b"only copy");
    }

    #[test]
    fn test_is_in_copy_dir() {
        let temp = TempDir::new().unwrap();
        let organizer = OutputOrganizer::new(temp.path().join("out"));
        fs::create_dir_all(organizer.copy_dir("Mix")).unwrap();
        let in_place = organizer.copy_dir("Mix").join("a.mp3");
        fs::write(&in_place, b"audio").unwrap();
        fs::write(temp.path().join("a.mp3"), b"audio").unwrap();

        assert!(organizer.is_in_copy_dir("Mix", &in_place));
        assert!(!organizer.is_in_copy_dir("Mix", &organizer.copy_dir("Mix").join("gone.mp3")));
        assert!(!organizer.is_in_copy_dir("Mix", &temp.path().join("a.mp3")));
        assert!(!organizer.is_in_copy_dir("Other", &organizer.copy_dir("Other").join("a.mp3")));
    }

    #[test]
    fn test_copy_missing_source_names_source() {
        let temp = TempDir::new().unwrap();
        let organizer = OutputOrganizer::new(temp.path().to_path_buf());
        let source = temp.path().join("missing.mp3");
        let dest = organizer
            .copied_file_path("Mix", &source, &mut HashSet::new())
            .unwrap();

        match organizer.copy_media_file(&source, &dest) {
            Err(Error::Io { path, .. }) => assert_eq!(path, source),
            other => panic!("expected I/O error, got {:?}", other),
        }
    }
}
