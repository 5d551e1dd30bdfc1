//! Playlist file formats
//!
//! Every format implements [`PlaylistWriter`]; [`writer_for`] picks the
//! implementation for a configured [`PlaylistFormat`].

use super::config::PlaylistFormat;
use super::resolver::ResolvedTrack;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{self, Write};

/// Host line terminator
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Serializes a resolved playlist
pub trait PlaylistWriter {
    /// Write the playlist `name` with `entries` (one per track, in order)
    fn write(
        &self,
        out: &mut dyn Write,
        name: &str,
        entries: &[ResolvedTrack<'_>],
    ) -> io::Result<()>;
}

/// Writer implementation for a format
pub fn writer_for(format: PlaylistFormat) -> Box<dyn PlaylistWriter> {
    match format {
        PlaylistFormat::M3u => Box::new(M3uWriter { extended: false }),
        PlaylistFormat::ExtM3u => Box::new(M3uWriter { extended: true }),
        PlaylistFormat::Pls => Box::new(PlsWriter),
        PlaylistFormat::Wpl => Box::new(WplWriter),
    }
}

fn write_line(out: &mut dyn Write, line: &str) -> io::Result<()> {
    write!(out, "{}{}", line, LINE_ENDING)
}

/// Seconds for `#EXTINF` / `LengthN`, -1 when unknown
fn length_secs(entry: &ResolvedTrack<'_>) -> i64 {
    entry
        .track
        .duration_secs()
        .and_then(|secs| i64::try_from(secs).ok())
        .unwrap_or(-1)
}

/// M3U, optionally with `#EXTINF` lines
pub struct M3uWriter {
    pub extended: bool,
}

impl PlaylistWriter for M3uWriter {
    fn write(
        &self,
        out: &mut dyn Write,
        _name: &str,
        entries: &[ResolvedTrack<'_>],
    ) -> io::Result<()> {
        write_line(out, "#EXTM3U")?;
        for entry in entries {
            if self.extended {
                let info = format!(
                    "#EXTINF:{},{}",
                    length_secs(entry),
                    entry.track.display_title(&entry.location)
                );
                write_line(out, &info)?;
            }
            write_line(out, &entry.location)?;
        }
        Ok(())
    }
}

/// PLS version 2
pub struct PlsWriter;

impl PlaylistWriter for PlsWriter {
    fn write(
        &self,
        out: &mut dyn Write,
        _name: &str,
        entries: &[ResolvedTrack<'_>],
    ) -> io::Result<()> {
        write_line(out, "[playlist]")?;
        for (i, entry) in entries.iter().enumerate() {
            let n = i + 1;
            write_line(out, &format!("File{}={}", n, entry.location))?;
            write_line(
                out,
                &format!("Title{}={}", n, entry.track.display_title(&entry.location)),
            )?;
            write_line(out, &format!("Length{}={}", n, length_secs(entry)))?;
        }
        write_line(out, &format!("NumberOfEntries={}", entries.len()))?;
        write_line(out, "Version=2")
    }
}

/// Windows Media Player playlist (SMIL based XML)
pub struct WplWriter;

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> io::Result<()> {
    writer.write_event(event).map_err(io::Error::other)
}

impl PlaylistWriter for WplWriter {
    fn write(
        &self,
        out: &mut dyn Write,
        name: &str,
        entries: &[ResolvedTrack<'_>],
    ) -> io::Result<()> {
        write_line(out, "<?wpl version=\"1.0\"?>")?;

        let mut writer = Writer::new_with_indent(out, b' ', 4);
        let item_count = entries.len().to_string();

        emit(&mut writer, Event::Start(BytesStart::new("smil")))?;
        emit(&mut writer, Event::Start(BytesStart::new("head")))?;
        emit(
            &mut writer,
            Event::Empty(
                BytesStart::new("meta")
                    .with_attributes([("name", "Generator"), ("content", env!("CARGO_PKG_NAME"))]),
            ),
        )?;
        emit(
            &mut writer,
            Event::Empty(
                BytesStart::new("meta")
                    .with_attributes([("name", "ItemCount"), ("content", item_count.as_str())]),
            ),
        )?;
        emit(&mut writer, Event::Start(BytesStart::new("title")))?;
        emit(&mut writer, Event::Text(BytesText::new(name)))?;
        emit(&mut writer, Event::End(BytesEnd::new("title")))?;
        emit(&mut writer, Event::End(BytesEnd::new("head")))?;

        emit(&mut writer, Event::Start(BytesStart::new("body")))?;
        emit(&mut writer, Event::Start(BytesStart::new("seq")))?;
        for entry in entries {
            emit(
                &mut writer,
                Event::Empty(
                    BytesStart::new("media").with_attributes([("src", entry.location.as_str())]),
                ),
            )?;
        }
        emit(&mut writer, Event::End(BytesEnd::new("seq")))?;
        emit(&mut writer, Event::End(BytesEnd::new("body")))?;
        emit(&mut writer, Event::End(BytesEnd::new("smil")))?;

        write!(writer.get_mut(), "{}", LINE_ENDING)
    }
}
