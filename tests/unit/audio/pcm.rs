use super::*;

#[test]
fn frames_and_duration_count_per_channel() {
    let pcm = AudioPcm {
        sample_rate: 4,
        channels: 2,
        interleaved_f32: vec![0.0; 16],
    };
    assert_eq!(pcm.frames(), 8);
    assert!((pcm.duration_secs() - 2.0).abs() < 1e-12);
}

#[test]
fn f32le_file_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("x.f32le");
    let samples = [0.0f32, 0.5, -1.0, 0.25];
    write_pcm_f32le(&samples, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 16);
    assert_eq!(f32le_to_samples(&bytes).unwrap(), samples);
}

#[test]
fn misaligned_pcm_is_rejected() {
    let err = f32le_to_samples(&[0, 0, 0]).unwrap_err();
    assert!(err.to_string().starts_with("audio mux error:"));
}
