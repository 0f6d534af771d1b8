#![cfg(unix)]

use assert_cmd::Command;
use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Export with two playlists over three MP3s living under `<root>/Music`
fn write_export(dir: &Path, root: &Path) -> Result<std::path::PathBuf, Box<dyn Error>> {
    let music = root.join("Music");
    fs::create_dir_all(&music)?;
    for (name, content) in [("a.mp3", "aaa"), ("b.mp3", "bbb"), ("c.mp3", "ccc")] {
        fs::write(music.join(name), content)?;
    }

    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<DJ_PLAYLISTS Version="1.0.0">
  <COLLECTION Entries="3">
    <TRACK TrackID="1" Location="file://localhost/E:/Music/a.mp3"/>
    <TRACK TrackID="2" Location="file://localhost/E:/Music/b.mp3"/>
    <TRACK TrackID="3" Location="file://localhost/E:/Music/c.mp3"/>
  </COLLECTION>
  <PLAYLISTS>
    <NODE Type="0" Name="ROOT" Count="2">
      <NODE Type="1" Name="Techno" KeyType="0" Entries="3">
        <TRACK Key="1"/>
        <TRACK Key="2"/>
        <TRACK Key="3"/>
      </NODE>
      <NODE Type="1" Name="House" KeyType="0" Entries="1">
        <TRACK Key="1"/>
      </NODE>
    </NODE>
  </PLAYLISTS>
</DJ_PLAYLISTS>
"#;
    let path = dir.join("rekordbox.xml");
    fs::write(&path, xml)?;
    Ok(path)
}

#[test]
fn missing_encoder_exits_with_1() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let export = write_export(tmp.path(), tmp.path())?;

    let mut cmd = Command::cargo_bin("rek")?;
    cmd.arg("--encoder")
        .arg("/nonexistent/bin/ffmpeg")
        .arg(&export);
    cmd.assert().code(1);
    Ok(())
}

#[test]
fn missing_export_exits_nonzero() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;

    let mut cmd = Command::cargo_bin("rek")?;
    cmd.args(["--encoder", "true"])
        .arg(tmp.path().join("missing.xml"));
    cmd.assert().code(2);
    Ok(())
}

#[test]
fn list_prints_playlists() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let export = write_export(tmp.path(), tmp.path())?;

    let mut cmd = Command::cargo_bin("rek")?;
    let output = cmd
        .args(["--encoder", "true", "--list"])
        .arg(&export)
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("2 playlists found:"));
    assert!(stdout.contains("0 - Techno"));
    assert!(stdout.contains("1 - House"));
    Ok(())
}

#[test]
fn exports_named_playlist_with_prefix() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let mount = tmp.path().join("mnt");
    let export = write_export(tmp.path(), &mount)?;
    let out = tmp.path().join("usb");

    let mut cmd = Command::cargo_bin("rek")?;
    let output = cmd
        .args(["--encoder", "true", "--json", "--playlist", "Techno"])
        .arg("--outpath")
        .arg(&out)
        .arg("--prefix")
        .arg(&mount)
        .arg(&export)
        .output()?;
    assert!(output.status.success());

    let dir = out.join("Techno");
    assert_eq!(fs::read_to_string(dir.join("00_a.mp3"))?, "aaa");
    assert_eq!(fs::read_to_string(dir.join("01_b.mp3"))?, "bbb");
    assert_eq!(fs::read_to_string(dir.join("02_c.mp3"))?, "ccc");

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(reports[0]["playlist"], "Techno");
    assert_eq!(reports[0]["tracks"][2]["outcome"]["status"], "copied");
    Ok(())
}

#[test]
fn interactive_menu_reprompts_on_invalid_input() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let export = write_export(tmp.path(), tmp.path())?;

    let mut cmd = Command::cargo_bin("rek")?;
    let output = cmd
        .args(["--encoder", "true", "--outpath"])
        .arg(tmp.path().join("out"))
        .arg(&export)
        .write_stdin("9\nE\n")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Not valid playlist number"));
    assert!(stdout.contains("E - Exit"));
    Ok(())
}

#[test]
fn blocked_playlist_directory_does_not_stop_the_run() -> Result<(), Box<dyn Error>> {
    let tmp = tempdir()?;
    let mount = tmp.path().join("mnt");
    let export = write_export(tmp.path(), &mount)?;
    let out = tmp.path().join("usb");
    fs::create_dir_all(&out)?;
    fs::write(out.join("Techno"), "not a directory")?;

    let mut cmd = Command::cargo_bin("rek")?;
    let output = cmd
        .args(["--encoder", "true", "--json", "-l", "Techno", "-l", "House"])
        .arg("--outpath")
        .arg(&out)
        .arg("--prefix")
        .arg(&mount)
        .arg(&export)
        .output()?;

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(fs::read_to_string(out.join("House").join("00_a.mp3"))?, "aaa");
    assert_eq!(fs::read_to_string(out.join("Techno"))?, "not a directory");

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Cannot export playlist Techno"));
    assert!(stderr.contains(&format!("{:?}", out.join("Techno"))));

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(reports.as_array().map(Vec::len), Some(1));
    assert_eq!(reports[0]["playlist"], "House");
    Ok(())
}
