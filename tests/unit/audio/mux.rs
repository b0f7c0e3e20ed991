use super::*;

#[test]
fn audio_output_sits_next_to_the_video() {
    assert_eq!(
        audio_output_path(Path::new("/x/video/output_2024-01-02_03-04-05.mp4")),
        PathBuf::from("/x/video/output_2024-01-02_03-04-05_audio.mp4")
    );
}

#[test]
fn missing_audio_file_is_a_mux_error() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AudioConfig {
        path: dir.path().join("nope.mp3"),
        fade_out_secs: 2.0,
    };
    let err = attach_audio(
        &dir.path().join("v.mp4"),
        &cfg,
        1.0,
        &dir.path().join("o.mp4"),
    )
    .unwrap_err();
    assert!(matches!(err, ReelError::AudioMux(_)));
}

#[test]
fn temp_guard_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("t.f32le");
    std::fs::write(&path, [0u8; 4]).unwrap();
    drop(TempFileGuard(Some(path.clone())));
    assert!(!path.exists());
}
