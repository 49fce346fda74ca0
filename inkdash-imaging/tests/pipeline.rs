//! Pipeline behavior on full-size canvases and generated inputs.

use inkdash_core::{DeviceProfile, PipelineError, LEVEL_STEP};
use inkdash_imaging::{
    dither, encode_png, process, process_png, process_with, to_grayscale, Filter, GrayBuffer,
    Letterbox, PipelineOptions, RgbBuffer,
};
use inkdash_test_utils::assertions::{assert_levels_in_range, assert_pipeline_err, mean_gray};
use inkdash_test_utils::fixtures::{flat_canvas, gradient_canvas, portrait_profile, stripes_canvas};
use inkdash_test_utils::generators::{arb_gray_buffer, arb_profile_and_canvas};
use proptest::prelude::*;

#[test]
fn portrait_panel_letterbox_geometry() {
    let profile = portrait_profile();
    let levels = process(&flat_canvas(1680, 1264, 0), &profile).unwrap();

    assert_eq!(levels.dimensions(), (758, 1024));

    // Black content 758x570 starting at row 227, white margins above and below.
    assert_eq!(levels.get(0, 226), Some(&15));
    assert_eq!(levels.get(0, 227), Some(&0));
    assert_eq!(levels.get(757, 796), Some(&0));
    assert_eq!(levels.get(757, 797), Some(&15));
    assert_eq!(levels.get(379, 1023), Some(&15));
}

#[test]
fn flat_mid_gray_uses_two_adjacent_levels() {
    let profile = DeviceProfile::oasis_landscape();
    let levels = process(&flat_canvas(1680, 1264, 128), &profile).unwrap();

    assert!(levels.samples().iter().all(|&l| l == 7 || l == 8));
    assert!(levels.samples().contains(&7));
    assert!(levels.samples().contains(&8));
    assert!((mean_gray(&levels) - 128.0).abs() <= f64::from(LEVEL_STEP));

    // Error diffusion interleaves the two levels finely instead of banding.
    for y in [316, 632, 948] {
        let middle = &levels.row(y)[420..1260];
        let transitions = middle.windows(2).filter(|w| w[0] != w[1]).count();
        let longest_run = middle
            .chunk_by(|a, b| a == b)
            .map(<[u8]>::len)
            .max()
            .unwrap();

        assert!(
            transitions >= middle.len() * 3 / 4,
            "row {}: only {} transitions",
            y,
            transitions
        );
        assert!(longest_run <= 3, "row {}: run of {}", y, longest_run);
    }
}

#[test]
fn process_is_deterministic() {
    let profile = portrait_profile();
    let canvas = gradient_canvas(1680, 1264);
    let first = process(&canvas, &profile).unwrap();
    let second = process(&canvas, &profile).unwrap();
    assert_eq!(first, second);
}

#[test]
fn canvas_mismatch_is_rejected() {
    let result = process(&flat_canvas(800, 600, 0), &portrait_profile());
    assert_pipeline_err(&result, |e| {
        matches!(
            e,
            PipelineError::CanvasMismatch {
                expected_width: 1680,
                width: 800,
                ..
            }
        )
    });
}

#[test]
fn zero_profile_is_rejected() {
    let result = process(&flat_canvas(4, 4, 0), &DeviceProfile::new(4, 4, 0, 4));
    assert_pipeline_err(&result, |e| matches!(e, PipelineError::InvalidProfile { .. }));
}

#[test]
fn background_option_fills_margin() {
    let profile = DeviceProfile::new(8, 4, 8, 8);
    let options = PipelineOptions {
        filter: Filter::Bilinear,
        background: 0,
    };
    let levels = process_with(&flat_canvas(8, 4, 255), &profile, &options).unwrap();
    assert_eq!(levels.get(0, 0), Some(&0));
    assert_eq!(levels.get(0, 2), Some(&15));
}

#[test]
fn process_png_round_trips_through_encoder() {
    let profile = DeviceProfile::new(64, 48, 32, 32);
    let capture = process(&stripes_canvas(64, 48), &DeviceProfile::new(64, 48, 64, 48))
        .and_then(|levels| encode_png(&levels))
        .unwrap();

    let output = process_png(&capture, &profile).unwrap();
    let decoded = inkdash_imaging::decode_png(&output).unwrap();
    assert_eq!(decoded.dimensions(), (32, 32));
    assert!(decoded
        .samples()
        .iter()
        .all(|px| px[0] == px[1] && px[1] == px[2] && px[0] % 17 == 0));
}

#[test]
fn gradient_dither_is_monotone_on_average() {
    let canvas = gradient_canvas(256, 64);
    let gray = to_grayscale(&canvas);
    let levels = dither(&gray);

    let column_mean = |x: u32| -> f64 {
        (0..64).map(|y| f64::from(*levels.get(x, y).unwrap())).sum::<f64>() / 64.0
    };
    assert!(column_mean(16) < column_mean(128));
    assert!(column_mean(128) < column_mean(240));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dithering_conserves_energy_up_to_boundary(gray in arb_gray_buffer(1..40, 1..40)) {
        let levels = dither(&gray);
        let (w, h) = gray.dimensions();

        let original: f64 = gray.samples().iter().map(|&v| f64::from(v)).sum();
        let rebuilt: f64 = levels
            .samples()
            .iter()
            .map(|&l| f64::from(l) * f64::from(LEVEL_STEP))
            .sum();
        let bound = f64::from(LEVEL_STEP) / 2.0 * f64::from(w + h) + 1e-2 * f64::from(w * h);

        prop_assert!((rebuilt - original).abs() <= bound,
            "drift {} exceeds {}", (rebuilt - original).abs(), bound);
    }

    #[test]
    fn content_region_keeps_aspect_ratio((profile, canvas) in arb_profile_and_canvas()) {
        let levels = process(&canvas, &profile).unwrap();
        prop_assert_eq!(levels.dimensions(), (profile.target_width, profile.target_height));
        assert_levels_in_range(&levels);

        let lb = Letterbox::for_profile(&profile);
        let source_ratio = f64::from(profile.canvas_width) / f64::from(profile.canvas_height);
        let content_ratio = f64::from(lb.content_width) / f64::from(lb.content_height);
        // One pixel of rounding on either axis.
        let tolerance = source_ratio * (1.0 / f64::from(lb.content_width) + 1.0 / f64::from(lb.content_height)) * 1.5;
        if lb.content_width > 1 && lb.content_height > 1 {
            prop_assert!((source_ratio - content_ratio).abs() <= tolerance.max(1e-9),
                "ratio {} vs {}", source_ratio, content_ratio);
        }
        prop_assert!(lb.content_width == profile.target_width || lb.content_height == profile.target_height);
    }

    #[test]
    fn process_is_pure((profile, canvas) in arb_profile_and_canvas()) {
        let a = process(&canvas, &profile).unwrap();
        let b = process(&canvas.clone(), &profile).unwrap();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn dither_handles_degenerate_shapes() {
    for (w, h) in [(1u32, 1u32), (1, 50), (50, 1)] {
        let gray = GrayBuffer::filled(w, h, 200.0);
        let levels = dither(&gray);
        assert_eq!(levels.dimensions(), (w, h));
        assert_levels_in_range(&levels);
    }
    let empty = RgbBuffer::filled(0, 0, [0; 3]);
    assert!(process(&empty, &DeviceProfile::new(1, 1, 1, 1)).is_err());
}
