use circle_sweep::detect::{prepare_detector, sweep_image};
use circle_sweep::hough::EdgeParams;
use circle_sweep::io::SweepRunConfig;
use circle_sweep::review::{review, ReviewVerdict};
use circle_sweep::{run_sweep, SweepConfig, SweepPolicy};
use image::{Rgb, RgbImage};

const BACKGROUND: Rgb<u8> = Rgb([30, 30, 30]);
const DISK: Rgb<u8> = Rgb([200, 200, 200]);

fn frame_with_disks(width: u32, height: u32, disks: &[(f32, f32, f32)]) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let inside = disks.iter().any(|&(cx, cy, r)| {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            dx * dx + dy * dy <= r * r
        });
        if inside {
            *px = DISK;
        }
    }
    img
}

/// A sweep small enough for tests: 4 thresholds, 2 scales, 5 radius guesses.
fn small_sweep() -> SweepConfig {
    SweepConfig {
        min_circle_size: 30,
        max_circle_size: 50,
        max_vote_threshold: 60,
        vote_threshold_step: 10,
        vote_threshold_floor: 25,
        scale_start: 1.0,
        scale_step: 1.5,
        scale_ceiling: 3.0,
        radius_step: 5,
        radius_floor: 30,
        ..SweepConfig::default()
    }
}

fn run_config(sweep: SweepConfig) -> SweepRunConfig {
    SweepRunConfig {
        sweep,
        blur_sigma: Some(2.0),
        ..SweepRunConfig::default()
    }
}

#[test]
fn finds_a_single_disk_within_tolerance() {
    let frame = frame_with_disks(160, 160, &[(80.0, 80.0, 40.0)]);
    let run = run_config(small_sweep());
    let outcome = sweep_image(&frame, &run).expect("sweep");

    assert!(!outcome.log.is_empty(), "stats: {:?}", outcome.stats);
    for entry in &outcome.log {
        assert_eq!(entry.candidates.len(), 1);
        let c = entry.candidates[0];
        let slack = run.sweep.radius_tolerance as f32 + entry.params.scale;
        assert!((c.radius - 40.0).abs() <= slack, "radius {}", c.radius);
        assert!((c.center.x - 80.0).abs() <= 2.0 + entry.params.scale);
        assert!((c.center.y - 80.0).abs() <= 2.0 + entry.params.scale);
    }

    let best = outcome.log.best().expect("best");
    let strictest = outcome
        .log
        .iter()
        .map(|e| e.params.vote_threshold)
        .max()
        .unwrap_or(0);
    assert_eq!(best.params.vote_threshold, strictest);
}

#[test]
fn blank_frame_exhausts_the_default_grid() {
    let frame = RgbImage::from_pixel(64, 48, BACKGROUND);
    let outcome = sweep_image(&frame, &SweepRunConfig::default()).expect("sweep");
    assert!(outcome.log.is_empty());
    assert_eq!(outcome.stats.combinations_tried, 50 * 6 * 23);
}

/// Filled polygon given by its vertices in order, via half-plane tests.
fn frame_with_polygon(width: u32, height: u32, vertices: &[(f32, f32)]) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let (x, y) = (x as f32, y as f32);
        let inside = vertices.iter().zip(vertices.iter().cycle().skip(1)).all(
            |(&(ax, ay), &(bx, by))| (bx - ax) * (y - ay) - (by - ay) * (x - ax) >= 0.0,
        );
        if inside {
            *px = DISK;
        }
    }
    img
}

#[test]
fn straight_edged_shapes_are_never_logged() {
    let square = frame_with_polygon(
        400,
        400,
        &[(100.0, 100.0), (300.0, 100.0), (300.0, 300.0), (100.0, 300.0)],
    );
    // equilateral, incircle of radius 100 centered at (200, 220)
    let triangle = frame_with_polygon(
        400,
        400,
        &[(200.0, 20.0), (373.2, 320.0), (26.8, 320.0)],
    );
    for (name, frame) in [("square", square), ("triangle", triangle)] {
        let outcome = sweep_image(&frame, &SweepRunConfig::default()).expect("sweep");
        assert!(
            outcome.log.is_empty(),
            "{name}: {} entries, first {:?}",
            outcome.log.len(),
            outcome.log.entries().first()
        );
        assert_eq!(outcome.stats.accepted, 0, "{name}");
    }
}

#[test]
fn two_disks_never_log_a_pair_when_one_is_expected() {
    let frame = frame_with_disks(240, 120, &[(60.0, 60.0, 30.0), (180.0, 60.0, 30.0)]);
    let sweep = SweepConfig {
        min_circle_size: 20,
        max_circle_size: 40,
        radius_floor: 20,
        ..small_sweep()
    };
    let outcome = sweep_image(&frame, &run_config(sweep)).expect("sweep");
    assert!(outcome.log.iter().all(|e| e.candidates.len() == 1));
    assert!(outcome.stats.rejected > 0, "stats: {:?}", outcome.stats);
}

#[test]
fn repeated_sweeps_agree() {
    let frame = frame_with_disks(160, 160, &[(76.0, 84.0, 40.0)]);
    let run = run_config(small_sweep());
    let detector = prepare_detector(&frame, &EdgeParams::default(), run.blur_sigma);
    let a = run_sweep(&detector, &run.sweep).expect("first");
    let b = run_sweep(&detector, &run.sweep).expect("second");
    assert_eq!(a, b);
}

#[test]
fn first_match_logs_at_most_one_entry() {
    let frame = frame_with_disks(160, 160, &[(80.0, 80.0, 40.0)]);
    let sweep = SweepConfig {
        policy: SweepPolicy::FirstMatch,
        ..small_sweep()
    };
    let outcome = sweep_image(&frame, &run_config(sweep)).expect("sweep");
    assert_eq!(outcome.log.len(), 1);
    assert!(outcome.stats.stopped_early);
}

#[test]
fn review_leaves_the_original_untouched() {
    let frame = frame_with_disks(160, 160, &[(80.0, 80.0, 40.0)]);
    let pristine = frame.clone();
    let outcome = sweep_image(&frame, &run_config(small_sweep())).expect("sweep");

    let frames: Vec<_> = review(&frame, &outcome.log).collect();
    assert_eq!(frames.len(), outcome.log.len());
    for reviewed in &frames {
        assert!(matches!(reviewed.verdict, ReviewVerdict::Single(_)));
        let img = reviewed.image.as_ref().expect("frame");
        assert_eq!(img.dimensions(), (320, 160));
        // left half is the original
        assert_eq!(img.get_pixel(0, 0), frame.get_pixel(0, 0));
    }
    assert_eq!(frame, pristine);
}
