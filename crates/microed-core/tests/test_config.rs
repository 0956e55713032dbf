use std::path::PathBuf;

use microed_core::acquisition::{Sampling, TiltSpeedCalibration};
use microed_core::io::InputSource;
use microed_core::pipeline::config::PipelineConfig;

#[test]
fn test_minimal_toml_uses_defaults() {
    let config: PipelineConfig = toml::from_str(
        r#"
        input = ["series.mrc"]
        output = "aligned.tif"
        "#,
    )
    .unwrap();

    assert_eq!(config.input, vec![PathBuf::from("series.mrc")]);
    assert_eq!(config.output, PathBuf::from("aligned.tif"));
    assert!(!config.alignment.parallel);
    assert_eq!(config.exposure_s, None);
    assert_eq!(config.sampling, None);
    assert_eq!(
        config.input_source().unwrap(),
        InputSource::Stack(PathBuf::from("series.mrc"))
    );
}

#[test]
fn test_full_toml() {
    let config: PipelineConfig = toml::from_str(
        r#"
        input = ["a.tif", "b.tif", "c.tif"]
        output = "aligned.mrc"
        exposure_s = 0.5
        sampling = "2k"

        [alignment]
        parallel = true
        "#,
    )
    .unwrap();

    assert!(config.alignment.parallel);
    assert_eq!(config.exposure_s, Some(0.5));
    assert_eq!(config.sampling, Some(Sampling::TwoK));
    assert!(matches!(
        config.input_source().unwrap(),
        InputSource::Files(ref files) if files.len() == 3
    ));
}

#[test]
fn test_config_survives_serialization() {
    let mut config = PipelineConfig::new(
        vec![PathBuf::from("one.png"), PathBuf::from("two.png")],
        PathBuf::from("out.tiff"),
    );
    config.sampling = Some(Sampling::HalfK);

    let text = toml::to_string_pretty(&config).unwrap();
    let parsed: PipelineConfig = toml::from_str(&text).unwrap();
    assert_eq!(parsed.input, config.input);
    assert_eq!(parsed.output, config.output);
    assert_eq!(parsed.sampling, Some(Sampling::HalfK));
    assert_eq!(parsed.alignment, config.alignment);
}

#[test]
fn test_unknown_sampling_in_toml_is_rejected() {
    let parsed: Result<PipelineConfig, _> = toml::from_str(
        r#"
        input = ["series.mrc"]
        output = "aligned.tif"
        sampling = "3k"
        "#,
    );
    assert!(parsed.is_err());
}

#[test]
fn test_calibration_from_toml() {
    let calibration: TiltSpeedCalibration = toml::from_str("gain = 1.5\noffset = 0.0").unwrap();
    assert_eq!(calibration.tilt_speed(3.0, 3.0), 1.5);
    assert_ne!(calibration, TiltSpeedCalibration::default());
}
