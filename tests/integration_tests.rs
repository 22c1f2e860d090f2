mod common;

use assert_cmd::Command;
use assert_fs::prelude::*;
use common::{list_file_names, write_corrupt_image, write_rgb_png, write_rgba_png};
use image::GenericImageView;
use predicates::prelude::*;

fn hikari() -> Command {
    Command::cargo_bin("hikari").unwrap()
}

#[test]
fn test_cli_help() {
    hikari().arg("--help").assert().success();
}

#[test]
fn test_subcommand_help() {
    for sub in ["compress", "estimate", "info"] {
        hikari().args([sub, "--help"]).assert().success();
    }
}

#[test]
fn test_compress_missing_args() {
    hikari().arg("compress").assert().failure();
}

#[test]
fn test_compress_nothing_matched_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    hikari()
        .current_dir(temp.path())
        .args(["compress", "nonexistent.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No images"));
}

#[test]
fn test_compress_invalid_settings() {
    hikari()
        .args(["compress", "a.png", "-q", "ultra"])
        .assert()
        .failure();
    hikari()
        .args(["compress", "a.png", "-f", "avif"])
        .assert()
        .failure();
    hikari()
        .args(["compress", "a.png", "-e", "magick"])
        .assert()
        .failure();
}

#[test]
fn test_compress_defaults_to_source_folder() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_rgb_png(temp.path(), "a.png", 40, 20);

    hikari()
        .args(["compress", temp.path().join("a.png").to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compressed: 1 of 1"));

    temp.child("a_compressed-High.jpg")
        .assert(predicate::path::exists());
}

#[test]
fn test_compress_webp_with_resize() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("out");
    let source = write_rgb_png(temp.path(), "photo.png", 64, 40);

    hikari()
        .args(["compress", source.to_str().unwrap()])
        .args(["-o", out.path().to_str().unwrap()])
        .args(["-q", "medium", "-f", "webp", "--resize", "50"])
        .assert()
        .success();

    let produced = out.child("photo_compressed-Medium-50pct.webp");
    produced.assert(predicate::path::exists());
    let img = image::open(produced.path()).unwrap();
    assert_eq!(img.dimensions(), (32, 20));
}

#[test]
fn test_compress_png_with_oxipng_engine() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("out");
    let source = write_rgb_png(temp.path(), "chart.png", 32, 32);

    hikari()
        .args(["compress", source.to_str().unwrap()])
        .args(["-o", out.path().to_str().unwrap()])
        .args(["-f", "png", "-e", "oxipng", "-q", "maximum"])
        .assert()
        .success();

    let produced = out.child("chart_compressed-Maximum.png");
    produced.assert(predicate::path::exists());
    assert_eq!(image::open(produced.path()).unwrap().dimensions(), (32, 32));
}

#[test]
fn test_corrupt_file_does_not_stop_batch() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("out");
    let a = write_rgb_png(temp.path(), "a.png", 16, 16);
    let b = write_corrupt_image(temp.path(), "b.png");
    let c = write_rgb_png(temp.path(), "c.png", 16, 16);

    hikari()
        .arg("compress")
        .args([a.to_str().unwrap(), b.to_str().unwrap(), c.to_str().unwrap()])
        .args(["-o", out.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compressed: 2 of 3"))
        .stderr(predicate::str::contains("b.png"));

    assert_eq!(
        list_file_names(out.path()),
        vec!["a_compressed-High.jpg", "c_compressed-High.jpg"]
    );
}

#[test]
fn test_different_settings_do_not_overwrite() {
    let temp = assert_fs::TempDir::new().unwrap();
    let out = temp.child("out");
    let source = write_rgb_png(temp.path(), "a.png", 24, 24);

    for tier in ["low", "high", "high"] {
        hikari()
            .args(["compress", source.to_str().unwrap(), "--quiet"])
            .args(["-o", out.path().to_str().unwrap(), "-q", tier])
            .assert()
            .success();
    }

    assert_eq!(
        list_file_names(out.path()),
        vec!["a_compressed-High.jpg", "a_compressed-Low.jpg"]
    );
}

#[test]
fn test_transparent_png_flattened_to_white_jpeg() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = write_rgba_png(temp.path(), "logo.png", 20, 20);

    hikari()
        .args(["compress", source.to_str().unwrap(), "--quiet"])
        .assert()
        .success();

    let img = image::open(temp.child("logo_compressed-High.jpg").path())
        .unwrap()
        .to_rgb8();
    let corner = img.get_pixel(1, 1);
    assert!(corner.0.iter().all(|&c| c > 240), "got {:?}", corner);
}

#[test]
fn test_directory_input_recursive() {
    let temp = assert_fs::TempDir::new().unwrap();
    let album = temp.child("album");
    album.create_dir_all().unwrap();
    let nested = album.child("2024");
    nested.create_dir_all().unwrap();
    write_rgb_png(album.path(), "top.png", 8, 8);
    write_rgb_png(nested.path(), "deep.png", 8, 8);
    album.child("notes.txt").write_str("not an image").unwrap();

    let out = temp.child("flat");
    hikari()
        .args(["compress", album.path().to_str().unwrap(), "--quiet"])
        .args(["-o", out.path().to_str().unwrap()])
        .assert()
        .success();
    assert_eq!(list_file_names(out.path()), vec!["top_compressed-High.jpg"]);

    let out = temp.child("deep");
    hikari()
        .args(["compress", album.path().to_str().unwrap(), "-r", "--quiet"])
        .args(["-o", out.path().to_str().unwrap()])
        .assert()
        .success();
    assert_eq!(
        list_file_names(out.path()),
        vec!["deep_compressed-High.jpg", "top_compressed-High.jpg"]
    );
}

#[test]
fn test_estimate_does_not_write_files() {
    let temp = assert_fs::TempDir::new().unwrap();
    write_rgb_png(temp.path(), "a.png", 40, 40);

    hikari()
        .args(["estimate", temp.path().join("a.png").to_str().unwrap()])
        .args(["-q", "low", "-f", "webp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Estimated:"))
        .stdout(predicate::str::contains("reduction"));

    assert_eq!(list_file_names(temp.path()), vec!["a.png"]);
}

#[test]
fn test_info_reports_dimensions_and_output_name() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = write_rgb_png(temp.path(), "a.png", 40, 20);

    hikari()
        .args(["info", source.to_str().unwrap(), "--resize", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("40x20"))
        .stdout(predicate::str::contains("20x10"))
        .stdout(predicate::str::contains("a_compressed-High-50pct.jpg"));
}

#[test]
fn test_info_nonexistent_file() {
    hikari().args(["info", "nonexistent.jpg"]).assert().failure();
}
