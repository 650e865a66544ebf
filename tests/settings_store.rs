use clip_canvas::draw::session::CanvasSession;
use clip_canvas::draw::settings::CanvasSettings;
use clip_canvas::draw::settings_store::{load_from_path, save_to_path, CANVAS_SETTINGS_FILE_NAME};

#[test]
fn saved_settings_are_sanitized_and_reloaded() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(CANVAS_SETTINGS_FILE_NAME);

    let mut settings = CanvasSettings::default();
    settings.nudge_step_fast = 25.0;
    settings.handle_hit_pad = f64::INFINITY;
    save_to_path(&path, &settings).expect("save");

    let loaded = load_from_path(&path).expect("load").expect("file exists");
    assert_eq!(loaded.nudge_step_fast, 25.0);
    assert_eq!(loaded.handle_hit_pad, CanvasSettings::default().handle_hit_pad);
}

#[test]
fn hand_edited_file_with_invalid_values_still_loads() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(CANVAS_SETTINGS_FILE_NAME);
    std::fs::write(
        &path,
        r#"{ "clip_min_size": -2.0, "snap_angle_degrees": 30.0 }"#,
    )
    .expect("write settings");

    let loaded = load_from_path(&path).expect("load").expect("file exists");
    assert_eq!(loaded.clip_min_size, 1.0);
    assert_eq!(loaded.snap_angle_degrees, 30.0);

    let session = CanvasSession::new(loaded);
    assert_eq!(session.settings().snap_angle_degrees, 30.0);
}
