use std::path::Path;

use assert_cmd::Command;
use circle_sweep::io::{SweepReport, SweepRunConfig};
use circle_sweep::SweepConfig;
use image::{Rgb, RgbImage};
use predicates::prelude::*;

fn write_frame(path: &Path, width: u32, height: u32, disks: &[(f32, f32, f32)], color: Rgb<u8>) {
    let background = Rgb([40, 120, 40]);
    let mut img = RgbImage::from_pixel(width, height, background);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let inside = disks.iter().any(|&(cx, cy, r)| {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            dx * dx + dy * dy <= r * r
        });
        if inside {
            *px = color;
        }
    }
    img.save(path).expect("write test frame");
}

fn small_run_config(path: &Path) {
    let cfg = SweepRunConfig {
        sweep: SweepConfig {
            min_circle_size: 20,
            max_circle_size: 50,
            max_vote_threshold: 60,
            vote_threshold_step: 10,
            vote_threshold_floor: 25,
            scale_ceiling: 3.0,
            radius_floor: 20,
            ..SweepConfig::default()
        },
        blur_sigma: Some(2.0),
        ..SweepRunConfig::default()
    };
    cfg.write_json(path).expect("write config");
}

fn bin() -> Command {
    Command::cargo_bin("circle-sweep").expect("binary built")
}

#[test]
fn sweep_requires_an_image() {
    bin()
        .arg("sweep")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--image"));
}

#[test]
fn unreadable_image_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    bin()
        .args(["sweep", "--no-review", "--image"])
        .arg(dir.path().join("missing.png"))
        .assert()
        .failure();
}

#[test]
fn blank_image_succeeds_with_an_empty_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = dir.path().join("blank.png");
    write_frame(&image, 64, 48, &[], Rgb([0, 0, 0]));
    let report = dir.path().join("report.json");

    bin()
        .args(["sweep", "-q", "--image"])
        .arg(&image)
        .arg("--out-dir")
        .arg(dir.path().join("review"))
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("no circle found"));

    let parsed = SweepReport::load_json(&report).expect("report");
    assert!(parsed.entries.is_empty());
    assert!(parsed.best.is_none());
    assert_eq!(parsed.stats.combinations_tried, 6900);
    assert!(dir.path().join("review").join("gray.png").exists());
}

#[test]
fn disk_image_writes_review_frames() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = dir.path().join("disk.png");
    write_frame(&image, 160, 160, &[(80.0, 80.0, 40.0)], Rgb([220, 220, 220]));
    let config = dir.path().join("cfg.json");
    small_run_config(&config);
    let out = dir.path().join("review");
    let report = dir.path().join("report.json");

    bin()
        .args(["sweep", "--image"])
        .arg(&image)
        .arg("--config")
        .arg(&config)
        .arg("--out-dir")
        .arg(&out)
        .arg("--report")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("best: center="));

    assert!(out.join("entry_000.png").exists());
    let parsed = SweepReport::load_json(&report).expect("report");
    assert!(!parsed.entries.is_empty());
    assert_eq!(parsed.review.len(), parsed.entries.len());
    let frame = image::open(out.join("entry_000.png")).expect("review frame");
    assert_eq!((frame.width(), frame.height()), (320, 160));
}

#[test]
fn ambiguous_entries_abort_unless_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = dir.path().join("pair.png");
    write_frame(
        &image,
        240,
        120,
        &[(60.0, 60.0, 30.0), (180.0, 60.0, 30.0)],
        Rgb([220, 220, 220]),
    );
    let config = dir.path().join("cfg.json");
    small_run_config(&config);

    let run = |extra: &[&str]| {
        let mut cmd = bin();
        cmd.args(["sweep", "--expected-count", "2", "--first-match", "--image"])
            .arg(&image)
            .arg("--config")
            .arg(&config)
            .arg("--out-dir")
            .arg(dir.path().join("review"))
            .args(extra);
        cmd.assert()
    };

    run(&[])
        .failure()
        .stderr(predicate::str::contains("holds 2 candidates"));
    run(&["--on-ambiguous", "skip"]).success();
}

#[test]
fn invalid_override_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = dir.path().join("blank.png");
    write_frame(&image, 16, 16, &[], Rgb([0, 0, 0]));
    bin()
        .args(["sweep", "--no-review", "--expected-count", "0", "--image"])
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected_count"));
}

#[test]
fn ball_reports_position_of_blue_ball() {
    let dir = tempfile::tempdir().expect("tempdir");
    let image = dir.path().join("ball.png");
    write_frame(&image, 200, 160, &[(100.0, 80.0, 40.0)], Rgb([20, 60, 200]));
    let report = dir.path().join("ball.json");
    let overlay = dir.path().join("overlay.png");

    bin()
        .args(["ball", "--alliance", "blue", "--image"])
        .arg(&image)
        .arg("--report")
        .arg(&report)
        .arg("--overlay")
        .arg(&overlay)
        .assert()
        .success()
        .stdout(predicate::str::contains("ball: x="));
    assert!(report.exists());
    let drawn = image::open(&overlay).expect("overlay").to_rgb8();
    assert_eq!(drawn.dimensions(), (200, 160));
    assert!(drawn.pixels().any(|p| *p == Rgb([255, 0, 255])));

    bin()
        .args(["ball", "--alliance", "red", "--image"])
        .arg(&image)
        .assert()
        .success()
        .stdout(predicate::str::contains("ball: none"));
}

#[test]
fn magazine_classifies_each_frame() {
    let dir = tempfile::tempdir().expect("tempdir");
    let empty = dir.path().join("empty.png");
    write_frame(&empty, 80, 60, &[], Rgb([0, 0, 0]));
    let full = dir.path().join("full.png");
    write_frame(&full, 80, 60, &[(40.0, 30.0, 60.0)], Rgb([20, 60, 200]));

    bin()
        .args(["magazine", "--window", "1", "--image"])
        .arg(&empty)
        .arg(&full)
        .assert()
        .success()
        .stdout(predicate::str::contains("empty.png: none"))
        .stdout(predicate::str::contains("full.png: blue"));
}
