//! End-to-end behavior of the daemon commands.

use std::path::Path;

use inkdash_core::{PanelConfig, Snapshot};
use inkdash_daemon::{app, config};
use inkdash_imaging::{decode_png, encode_png, process};
use inkdash_test_utils::fixtures::{gradient_canvas, portrait_profile};

fn example_config_path() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/inkdash.example.toml"))
}

#[test]
fn example_config_is_valid() {
    let config = config::from_path(example_config_path()).unwrap();
    config.validate().unwrap();

    assert_eq!(config.display.profile(), portrait_profile());
    assert_eq!(config.sources.len(), 4);
    assert!(config.sources.iter().all(|s| s.url.is_some()));
    assert_eq!(config.finance_tickers, PanelConfig::default().finance_tickers);
}

#[tokio::test]
async fn process_file_writes_panel_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.png");
    let output = dir.path().join("panel.png");

    // A capture of the full canvas, already quantized so it round-trips exactly.
    let profile = portrait_profile();
    let canvas_profile = inkdash_core::DeviceProfile::new(1680, 1264, 1680, 1264);
    let capture = encode_png(&process(&gradient_canvas(1680, 1264), &canvas_profile).unwrap()).unwrap();
    std::fs::write(&input, capture).unwrap();

    let config = PanelConfig {
        display: inkdash_core::DisplayConfig {
            canvas_width: profile.canvas_width,
            canvas_height: profile.canvas_height,
            target_width: profile.target_width,
            target_height: profile.target_height,
        },
        ..PanelConfig::default()
    };
    app::process_file(&config, &input, &output).await.unwrap();

    let panel = decode_png(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(panel.dimensions(), (758, 1024));
    // Letterbox margin is white.
    assert_eq!(panel.get(0, 0), Some(&[255, 255, 255]));
}

#[tokio::test]
async fn process_file_rejects_wrong_canvas() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.png");
    let output = dir.path().join("panel.png");
    let small = encode_png(&inkdash_imaging::LevelBuffer::filled(10, 10, 4)).unwrap();
    std::fs::write(&input, small).unwrap();

    let err = app::process_file(&PanelConfig::default(), &input, &output)
        .await
        .unwrap_err();
    assert!(matches!(err, inkdash_daemon::DaemonError::Pipeline(_)));
    assert!(!output.exists());
}

#[tokio::test]
async fn snapshot_without_sources_is_empty_json() {
    let json = app::snapshot_once(&PanelConfig::default()).await.unwrap();
    let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot.present_count(), 0);
    assert!(snapshot.stale_sources().is_empty());

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for field in ["weather", "financial", "news", "calendar", "generated_at", "stale_sources"] {
        assert!(value.get(field).is_some(), "missing field {}", field);
    }
}

#[tokio::test]
async fn shared_render_service_reuses_unchanged_capture() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("capture.png");
    let output = dir.path().join("panel.png");
    let service = inkdash_daemon::RenderService::new(
        inkdash_core::DeviceProfile::new(40, 30, 20, 20),
        std::time::Duration::from_secs(600),
    );

    for (round, level) in [3u8, 3, 9, 9, 9].into_iter().enumerate() {
        let capture = encode_png(&inkdash_imaging::LevelBuffer::filled(40, 30, level)).unwrap();
        std::fs::write(&input, capture).unwrap();
        app::render_file(&service, &input, &output).await.unwrap();
        assert!(output.exists(), "round {} wrote nothing", round);
    }

    let stats = service.cache_stats();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.entry_count, 1);
}
