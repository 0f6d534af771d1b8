//! Interactive playlist selection
//!
//! A thin loop over the exporter: list, read a choice, export, repeat.

use std::io::{BufRead, Write};

use rek_core::{ExportDocument, ExportReport, PlaylistExporter, Result};
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Exit,
    Playlist(usize),
    Invalid,
}

pub fn parse_choice(input: &str, playlist_count: usize) -> Choice {
    let input = input.trim();
    if input.eq_ignore_ascii_case("e") {
        return Choice::Exit;
    }
    match input.parse::<usize>() {
        Ok(index) if index < playlist_count => Choice::Playlist(index),
        _ => Choice::Invalid,
    }
}

pub fn print_playlists<W: Write>(doc: &ExportDocument, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{} playlists found:", doc.playlists().len())?;
    for (index, playlist) in doc.playlists().iter().enumerate() {
        writeln!(out, "{} - {}", index, playlist.display_path())?;
    }
    Ok(())
}

/// Prompt until the user exits or input ends
pub fn run<R: BufRead, W: Write>(
    doc: &ExportDocument,
    exporter: &PlaylistExporter,
    mut input: R,
    mut out: W,
) -> Result<Vec<ExportReport>> {
    let mut reports = Vec::new();

    loop {
        print_playlists(doc, &mut out)?;
        writeln!(out, "E - Exit")?;
        write!(out, "Select playlist number to export: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match parse_choice(&line, doc.playlists().len()) {
            Choice::Exit => break,
            Choice::Playlist(index) => {
                let playlist = &doc.playlists()[index];
                match exporter.export(playlist) {
                    Ok(report) => {
                        writeln!(out, "{}: {}", report.playlist, report.summary())?;
                        reports.push(report);
                    }
                    Err(e) => {
                        error!("Cannot export playlist {}: {}", playlist.name, e);
                        writeln!(out, "Cannot export {}: {}", playlist.name, e)?;
                    }
                }
            }
            Choice::Invalid => writeln!(out, "Not valid playlist number")?,
        }
    }

    Ok(reports)
}
