//! Headless replay of the bundled walkthrough recording.

use std::path::PathBuf;

use slide_control::app::run_session;
use slide_control::config::{AppConfig, OutputKind, SourceKind};

fn walkthrough() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../demos/walkthrough.jsonl")
}

fn headless() -> AppConfig {
    let mut cfg = AppConfig { overlay: false, output: OutputKind::Log, ..AppConfig::default() };
    cfg.sensor.source = SourceKind::Replay { path: walkthrough(), looping: false };
    cfg.sensor.fps = 1000;
    cfg
}

#[test]
fn walkthrough_pages_forward_twice_and_back_once() {
    let stats = run_session(headless()).unwrap();

    assert_eq!(stats.frames, 151);
    assert_eq!(stats.invalid_frames, 1);
    assert_eq!(stats.untracked_joints, 10);
    assert_eq!(stats.no_subject, 0);
    assert_eq!(stats.processed, 140);
    assert_eq!(stats.commands_sent, 3);
    assert_eq!(stats.dispatch_failures, 0);
}
