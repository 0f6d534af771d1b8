//! rek: export Rekordbox playlists without Rekordbox
//!
//! Reads the XML export, lets the user pick playlists (interactively or via
//! `--playlist`) and writes each one as a numbered folder of audio files.

mod menu;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use rek_core::encoder::DEFAULT_ENCODER;
use rek_core::{ExportConfig, ExportDocument, Ffmpeg, PlaylistExporter};

const EXIT_ENCODER_MISSING: u8 = 1;
const EXIT_EXPORT_MISSING: u8 = 2;
const EXIT_PLAYLIST_FAILED: u8 = 3;

#[derive(Parser)]
#[command(name = "rek")]
#[command(about = "Export playlists from a Rekordbox XML export without using Rekordbox")]
#[command(
    long_about = "Export playlists from a Rekordbox XML export without using Rekordbox.\n\n\
    FLAC files are converted to WAV along the way, WAV/AIFF above 48 kHz or at 24 bit \
    are re-encoded, and incompatible WAV headers (e.g. bandcamp downloads) are fixed."
)]
#[command(version)]
struct Cli {
    /// Rekordbox XML export
    exportfile: PathBuf,

    /// Output directory, one subdirectory per playlist
    #[arg(short, long, default_value = ".")]
    outpath: PathBuf,

    /// Replaces the drive of Windows paths in the export (e.g. /mnt/c)
    #[arg(short, long, default_value = "")]
    prefix: String,

    /// Copy FLAC files as they are instead of converting them to WAV
    #[arg(long)]
    keep_flac: bool,

    /// Never re-encode files above 48 kHz or with 24 bit and more
    #[arg(long)]
    no_reencode: bool,

    /// Encoder binary
    #[arg(long, default_value = DEFAULT_ENCODER)]
    encoder: PathBuf,

    /// Playlist to export, by name or index (repeatable, skips the menu)
    #[arg(short = 'l', long = "playlist")]
    playlists: Vec<String>,

    /// List playlists and exit
    #[arg(long)]
    list: bool,

    /// Print export reports as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Cannot initialize logging: {}", e);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ExportConfig::new(&cli.outpath)
        .with_prefix(&cli.prefix)
        .with_flac_to_wav(!cli.keep_flac)
        .with_reencode(!cli.no_reencode);
    let encoder = Ffmpeg::new(&cli.encoder);

    if config.needs_encoder() {
        if let Err(e) = encoder.check_available() {
            error!("{}", e);
            eprintln!("Please install ffmpeg (or point --encoder at it).");
            return Ok(ExitCode::from(EXIT_ENCODER_MISSING));
        }
    }

    if !cli.exportfile.is_file() {
        error!("Export file not found: {:?}", cli.exportfile);
        return Ok(ExitCode::from(EXIT_EXPORT_MISSING));
    }

    let doc = ExportDocument::open(&cli.exportfile)
        .with_context(|| format!("Cannot read export {:?}", cli.exportfile))?;
    info!(
        "Loaded {:?}: {} tracks, {} playlists",
        cli.exportfile,
        doc.collection_len(),
        doc.playlists().len()
    );

    if cli.list {
        menu::print_playlists(&doc, &mut io::stdout())?;
        return Ok(ExitCode::SUCCESS);
    }

    std::fs::create_dir_all(&config.output_root)
        .with_context(|| format!("Cannot create {:?}", config.output_root))?;

    let exporter = PlaylistExporter::new(&doc, &config, &encoder);

    let mut failed = 0;
    let reports = if cli.playlists.is_empty() {
        menu::run(&doc, &exporter, io::stdin().lock(), io::stdout())?
    } else {
        let mut reports = Vec::new();
        for selection in &cli.playlists {
            match doc.select(selection) {
                Ok(playlist) => match exporter.export(playlist) {
                    Ok(report) => reports.push(report),
                    Err(e) => {
                        error!("Cannot export playlist {}: {}", playlist.name, e);
                        failed += 1;
                    }
                },
                Err(e) => warn!("{}", e),
            }
        }
        reports
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if failed > 0 {
        return Ok(ExitCode::from(EXIT_PLAYLIST_FAILED));
    }
    Ok(ExitCode::SUCCESS)
}
