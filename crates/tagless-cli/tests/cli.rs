use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

const SONG: &[u8] = b"not really mpeg audio, but bytes all the same";

// sha1 of SONG
const SONG_SHA1: &str = "5e4b52f59402a30ed3859fcb0fb2857ad149c1c4";

fn write(dir: &Path, name: &str, content: Vec<u8>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn tagged_song() -> Vec<u8> {
    let mut data = b"ID3\x03\x00\x00\x00\x00\x00\x14".to_vec();
    data.extend([0u8; 20]);
    data.extend(SONG);
    data.extend(b"TAG");
    data.resize(data.len() + 125, b' ');
    data
}

/// Command isolated from any user config
fn tagless(tmp: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("tagless"));
    cmd.env("TAGLESS_CONFIG", tmp.path().join("absent.toml"));
    cmd.env_remove("TAGLESS_LOG");
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn tagged_and_untagged_print_the_same_hash() {
    let tmp = tempdir().unwrap();
    let plain = write(tmp.path(), "plain.mp3", SONG.to_vec());
    let tagged = write(tmp.path(), "tagged.mp3", tagged_song());

    tagless(&tmp)
        .args(["hash", plain.to_str().unwrap(), tagged.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{SONG_SHA1} plain.mp3")))
        .stdout(predicate::str::contains(format!("{SONG_SHA1} tagged.mp3")));
}

#[test]
fn hash_only_flag_drops_the_file_name() {
    let tmp = tempdir().unwrap();
    let tagged = write(tmp.path(), "tagged.mp3", tagged_song());

    tagless(&tmp)
        .args(["hash", "-q", tagged.to_str().unwrap()])
        .assert()
        .success()
        .stdout(format!("{SONG_SHA1}\n"));
}

#[test]
fn algorithms_are_listed() {
    let tmp = tempdir().unwrap();
    tagless(&tmp)
        .arg("algorithms")
        .assert()
        .success()
        .stdout(predicate::str::contains("sha1\n"))
        .stdout(predicate::str::contains("md5\n"))
        .stdout(predicate::str::contains("blake3\n"));
}

#[test]
fn unknown_algorithm_exits_with_usage_error() {
    let tmp = tempdir().unwrap();
    let plain = write(tmp.path(), "plain.mp3", SONG.to_vec());

    tagless(&tmp)
        .args(["hash", "-a", "whirlpool", plain.to_str().unwrap()])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown 'whirlpool' algorithm"));
}

#[test]
fn missing_file_does_not_stop_the_others() {
    let tmp = tempdir().unwrap();
    let plain = write(tmp.path(), "plain.mp3", SONG.to_vec());
    let missing = tmp.path().join("missing.mp3");

    tagless(&tmp)
        .args(["hash", missing.to_str().unwrap(), plain.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("plain.mp3"))
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn zero_maxbytes_is_invalid() {
    let tmp = tempdir().unwrap();
    tagless(&tmp)
        .args(["hash", "--maxbytes", "0", "a.mp3"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("maxbytes"));
}

#[test]
fn no_arguments_prints_usage() {
    let tmp = tempdir().unwrap();
    tagless(&tmp)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn output_file_receives_results() {
    let tmp = tempdir().unwrap();
    let plain = write(tmp.path(), "plain.mp3", SONG.to_vec());
    let out = tmp.path().join("hashes.txt");

    tagless(&tmp)
        .args(["hash", "-o", out.to_str().unwrap(), plain.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, format!("{SONG_SHA1} plain.mp3\n"));
}

#[test]
fn json_output_from_config() {
    let tmp = tempdir().unwrap();
    let plain = write(tmp.path(), "plain.mp3", SONG.to_vec());
    let cfg = tmp.path().join("tagless.toml");
    std::fs::write(&cfg, "[hash]\nalgorithm = \"md5\"\n\n[output]\nformat = \"json\"\n").unwrap();

    tagless(&tmp)
        .env("TAGLESS_CONFIG", &cfg)
        .args(["hash", plain.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"algorithm\":\"md5\""))
        .stdout(predicate::str::contains("\"hash\":\""));
}

#[test]
fn info_reports_tag_layout() {
    let tmp = tempdir().unwrap();
    let tagged = write(tmp.path(), "tagged.mp3", tagged_song());

    tagless(&tmp)
        .args(["info", tagged.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("music:     30..75"))
        .stdout(predicate::str::contains("id3v2:     v2.3"))
        .stdout(predicate::str::contains("id3v1:     yes"));
}

#[test]
fn info_json() {
    let tmp = tempdir().unwrap();
    let tagged = write(tmp.path(), "tagged.mp3", tagged_song());

    tagless(&tmp)
        .args(["info", "--json", tagged.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"startbyte\":30"))
        .stdout(predicate::str::contains("\"has_id3v1\":true"));
}

#[test]
fn config_show_prints_defaults() {
    let tmp = tempdir().unwrap();
    tagless(&tmp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults"))
        .stdout(predicate::str::contains("algorithm = \"sha1\""));
}

fn corrupt_song() -> Vec<u8> {
    // id3v2 size field claims far more than the file holds
    let mut data = b"ID3\x03\x00\x00\x7f\x7f\x7f\x7f".to_vec();
    data.extend(SONG);
    data
}

#[test]
fn corrupt_tag_size_is_logged_and_whole_file_hashed() {
    let tmp = tempdir().unwrap();
    let corrupt = write(tmp.path(), "corrupt.mp3", corrupt_song());

    tagless(&tmp)
        .args(["--log", "warn", "info", corrupt.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("music:     0..55"))
        .stdout(predicate::str::contains("whole file is hashed"))
        .stderr(predicate::str::contains("malformed tag size"));
}

#[test]
fn huge_chunk_size_still_hashes() {
    let tmp = tempdir().unwrap();
    let tagged = write(tmp.path(), "tagged.mp3", tagged_song());

    tagless(&tmp)
        .args(["hash", "-q", "--chunk-size", "100000000000", tagged.to_str().unwrap()])
        .assert()
        .success()
        .stdout(format!("{SONG_SHA1}\n"));
}
