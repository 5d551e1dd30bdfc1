use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, ValueEnum};
use itunes_exporter::export::{CopyMode, MissingTrackPolicy, PlaylistFormat};
use itunes_exporter::ExportConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "itunes-exporter")]
#[command(about = "Export iTunes playlists to M3U, PLS or WPL files", long_about = None)]
#[command(group(ArgGroup::new("selection").required(true).args(["include_all", "playlists"])))]
struct Args {
    /// Path to the iTunes library XML
    #[arg(
        short = 'l',
        long,
        default_value = "~/Music/iTunes/iTunes Music Library.xml"
    )]
    library: String,

    /// Directory receiving the playlist files
    #[arg(short = 'o', long)]
    output: String,

    /// Output playlist format
    #[arg(short = 't', long = "type", value_enum, ignore_case = true, default_value = "m3u")]
    format: FormatArg,

    /// Export every user playlist
    #[arg(long)]
    include_all: bool,

    /// Export only specific playlists (can be specified multiple times)
    #[arg(long = "playlist")]
    playlists: Vec<String>,

    /// Skip these playlists (can be specified multiple times)
    #[arg(long = "exclude")]
    exclude: Vec<String>,

    /// Also export built-in playlists (Library, Music, Podcasts, ...) with --include-all
    #[arg(long)]
    include_builtin: bool,

    /// Copy media files into a folder per playlist
    #[arg(long, value_enum, ignore_case = true, default_value = "none")]
    copy: CopyArg,

    /// New music path prefix, replacing --music-path-orig in track locations
    #[arg(long, requires = "music_path_orig")]
    music_path: Option<String>,

    /// Music path prefix as recorded in the library
    #[arg(long, requires = "music_path")]
    music_path_orig: Option<String>,

    /// Drop playlist entries that reference unknown tracks instead of failing
    #[arg(long)]
    skip_missing: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Plain M3U
    M3u,
    /// Extended M3U with #EXTINF lines
    Ext,
    /// PLS
    Pls,
    /// Windows Media Player playlist
    Wpl,
}

impl From<FormatArg> for PlaylistFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::M3u => PlaylistFormat::M3u,
            FormatArg::Ext => PlaylistFormat::ExtM3u,
            FormatArg::Pls => PlaylistFormat::Pls,
            FormatArg::Wpl => PlaylistFormat::Wpl,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CopyArg {
    /// Reference the original files
    None,
    /// Copy files to <output>/<playlist>/
    Playlist,
}

impl From<CopyArg> for CopyMode {
    fn from(arg: CopyArg) -> Self {
        match arg {
            CopyArg::None => CopyMode::None,
            CopyArg::Playlist => CopyMode::Playlist,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    log::info!("iTunes Exporter");
    log::info!("===============");

    // Expand ~ in paths
    let library_path = PathBuf::from(shellexpand::tilde(&args.library).as_ref());
    let output_dir = PathBuf::from(shellexpand::tilde(&args.output).as_ref());

    // Playlist entries must not depend on the working directory
    let output_dir = std::path::absolute(&output_dir)
        .with_context(|| format!("Invalid output directory {:?}", output_dir))?;

    // Create export configuration
    let mut config = ExportConfig::new(output_dir.clone())
        .with_format(args.format.into())
        .with_copy_mode(args.copy.into())
        .with_builtin(args.include_builtin)
        .with_excluded(args.exclude);

    // Apply playlist filter if specified
    if !args.include_all {
        log::info!(
            "Filtering to {} playlist(s): {:?}",
            args.playlists.len(),
            args.playlists
        );
        config = config.with_playlists(args.playlists);
    }

    if let (Some(new_prefix), Some(orig_prefix)) = (args.music_path, args.music_path_orig) {
        log::info!("Rewriting locations: {:?} -> {:?}", orig_prefix, new_prefix);
        config = config.with_rewrite(orig_prefix, new_prefix);
    }

    if args.skip_missing {
        config = config.with_missing_tracks(MissingTrackPolicy::Skip);
    }

    let summary = itunes_exporter::run(&library_path, &config)
        .with_context(|| format!("Failed to export playlists from {:?}", library_path))?;

    log::info!(
        "Export completed successfully: {} playlist(s) in {:?}",
        summary.playlist_files.len(),
        output_dir
    );

    Ok(())
}
