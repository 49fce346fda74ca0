//! inkdash Test Utilities
//!
//! Shared test infrastructure for the inkdash workspace:
//! - Proptest generators for buffers, profiles and records
//! - Fixtures for common canvases and source payloads
//! - Assertions for pipeline output

pub use inkdash_core::{
    DeviceProfile, PipelineError, Record, SourceId, SourceKind, Timestamp, LEVEL_STEP, MAX_LEVEL,
};
pub use inkdash_imaging::{GrayBuffer, LevelBuffer, RgbBuffer};

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for inkdash types.

    use super::*;
    use proptest::prelude::*;

    /// Generate an RGB pixel.
    pub fn arb_rgb() -> impl Strategy<Value = [u8; 3]> {
        any::<[u8; 3]>()
    }

    /// Generate an RGB buffer with dimensions in the given ranges.
    pub fn arb_rgb_buffer(
        width: std::ops::Range<u32>,
        height: std::ops::Range<u32>,
    ) -> impl Strategy<Value = RgbBuffer> {
        (width, height).prop_flat_map(|(w, h)| {
            prop::collection::vec(arb_rgb(), (w * h) as usize).prop_map(move |data| {
                RgbBuffer::from_vec(w, h, data).unwrap_or_else(|_| RgbBuffer::filled(w, h, [255; 3]))
            })
        })
    }

    /// Generate a gray buffer with samples in `0.0..=255.0`.
    pub fn arb_gray_buffer(
        width: std::ops::Range<u32>,
        height: std::ops::Range<u32>,
    ) -> impl Strategy<Value = GrayBuffer> {
        (width, height).prop_flat_map(|(w, h)| {
            prop::collection::vec(0.0f32..=255.0, (w * h) as usize).prop_map(move |data| {
                GrayBuffer::from_vec(w, h, data).unwrap_or_else(|_| GrayBuffer::filled(w, h, 255.0))
            })
        })
    }

    /// Generate a small device profile (every dimension in 1..64).
    pub fn arb_device_profile() -> impl Strategy<Value = DeviceProfile> {
        (1u32..64, 1u32..64, 1u32..64, 1u32..64)
            .prop_map(|(cw, ch, tw, th)| DeviceProfile::new(cw, ch, tw, th))
    }

    /// Generate a profile together with a source buffer of its canvas size.
    pub fn arb_profile_and_canvas() -> impl Strategy<Value = (DeviceProfile, RgbBuffer)> {
        arb_device_profile().prop_flat_map(|profile| {
            let canvas = arb_rgb_buffer(
                profile.canvas_width..profile.canvas_width + 1,
                profile.canvas_height..profile.canvas_height + 1,
            );
            (Just(profile), canvas)
        })
    }

    /// Generate one of the well-known source kinds.
    pub fn arb_source_kind() -> impl Strategy<Value = SourceKind> {
        prop_oneof![
            Just(SourceKind::Weather),
            Just(SourceKind::Financial),
            Just(SourceKind::News),
            Just(SourceKind::Calendar),
        ]
    }

    /// Generate a source id: well-known or a short lowercase extra.
    pub fn arb_source_id() -> impl Strategy<Value = SourceId> {
        prop_oneof![
            arb_source_kind().prop_map(SourceId::from),
            "[a-z]{3,10}".prop_map(SourceId::new),
        ]
    }

    /// Generate a record, either small JSON or opaque bytes.
    pub fn arb_record() -> impl Strategy<Value = Record> {
        prop_oneof![
            (any::<i64>(), "[a-zA-Z ]{0,20}").prop_map(|(n, s)| {
                Record::json(serde_json::json!({ "value": n, "label": s }))
            }),
            prop::collection::vec(any::<u8>(), 0..64).prop_map(Record::bytes),
        ]
    }

    /// Generate a Timestamp between 2020 and 2030.
    pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
        (1577836800i64..1893456000i64).prop_map(|secs| {
            chrono::DateTime::from_timestamp(secs, 0).unwrap_or_else(chrono::Utc::now)
        })
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built canvases and payloads.

    use super::*;
    use serde_json::json;

    /// Dashboard canvas held in landscape, rendered for a portrait panel.
    pub fn portrait_profile() -> DeviceProfile {
        DeviceProfile::new(1680, 1264, 758, 1024)
    }

    /// Uniform canvas of one gray value.
    pub fn flat_canvas(width: u32, height: u32, value: u8) -> RgbBuffer {
        RgbBuffer::filled(width, height, [value; 3])
    }

    /// Horizontal black-to-white ramp.
    pub fn gradient_canvas(width: u32, height: u32) -> RgbBuffer {
        let span = width.saturating_sub(1).max(1);
        let data = (0..height)
            .flat_map(|_| (0..width).map(move |x| [((x * 255) / span) as u8; 3]))
            .collect();
        RgbBuffer::from_vec(width, height, data)
            .unwrap_or_else(|_| RgbBuffer::filled(width, height, [255; 3]))
    }

    /// Colored stripes, one per primary plus black and white.
    pub fn stripes_canvas(width: u32, height: u32) -> RgbBuffer {
        const COLORS: [[u8; 3]; 5] = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [0, 0, 0], [255, 255, 255]];
        let band = (height / COLORS.len() as u32).max(1);
        let data = (0..height)
            .flat_map(|y| {
                let color = COLORS[((y / band) as usize).min(COLORS.len() - 1)];
                (0..width).map(move |_| color)
            })
            .collect();
        RgbBuffer::from_vec(width, height, data)
            .unwrap_or_else(|_| RgbBuffer::filled(width, height, [255; 3]))
    }

    /// A plausible payload for each well-known source.
    pub fn sample_record(kind: SourceKind) -> Record {
        match kind {
            SourceKind::Weather => Record::json(json!({
                "current": {"temp": 31, "humidity": 74, "aqi": 42},
                "forecast": [{"day": "Sat", "max": 32, "min": 26}],
            })),
            SourceKind::Financial => Record::json(json!([
                {"name": "SGD/CNY", "price": 5.3722, "change": 0.12},
                {"name": "BTC/USD", "price": 67234.5, "change": -1.8},
            ])),
            SourceKind::News => Record::json(json!([
                {"title": "Tide tables updated", "source": "harbour"},
            ])),
            SourceKind::Calendar => Record::json(json!({
                "date_str": "2026-10-16", "weekday": "Friday",
            })),
        }
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for pipeline output.

    use super::*;

    /// Assert that every level is in `0..=15`.
    #[track_caller]
    pub fn assert_levels_in_range(levels: &LevelBuffer) {
        if let Some(bad) = levels.samples().iter().find(|&&l| l > MAX_LEVEL) {
            panic!("level {} out of range 0..={}", bad, MAX_LEVEL);
        }
    }

    /// Assert that a pipeline call failed with a specific error shape.
    #[track_caller]
    pub fn assert_pipeline_err<T: std::fmt::Debug>(
        result: &Result<T, PipelineError>,
        matches: impl Fn(&PipelineError) -> bool,
    ) {
        match result {
            Err(e) if matches(e) => {}
            other => panic!("unexpected pipeline result: {:?}", other),
        }
    }

    /// Mean of the reconstructed gray values.
    pub fn mean_gray(levels: &LevelBuffer) -> f64 {
        if levels.is_empty() {
            return 0.0;
        }
        let total: f64 = levels
            .samples()
            .iter()
            .map(|&l| f64::from(l) * f64::from(LEVEL_STEP))
            .sum();
        total / levels.len() as f64
    }
}
