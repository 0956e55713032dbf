use approx::assert_relative_eq;

use microed_core::acquisition::shifts::interpolate_shifts;
use microed_core::acquisition::{alpha_range, AcquisitionProperties, Sampling, TiltSpeedCalibration};
use microed_core::error::MicroedError;
use microed_core::frame::AlignmentOffset;

fn uniform(start: f64, step: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

#[test]
fn test_midpoints_for_uniform_spacing() {
    for &(start, step, n) in &[(-35.0, 1.0, 66), (0.0, 0.5, 2), (10.0, -2.0, 7), (-1.0, 0.25, 13)] {
        let alpha_arr = uniform(start, step, n);
        let props = AcquisitionProperties::builder("BM-Ceta", alpha_arr.clone())
            .build()
            .unwrap();
        assert_eq!(props.alphas().len(), n - 1);
        for (i, &mid) in props.alphas().iter().enumerate() {
            assert_relative_eq!(mid, alpha_arr[i] + step / 2.0, epsilon = 1e-12);
        }
        assert_relative_eq!(props.alpha_step(), step, epsilon = 1e-12);
    }
}

#[test]
fn test_defaults() {
    let props = AcquisitionProperties::builder("BM-Ceta", vec![-1.0, 0.0, 1.0])
        .build()
        .unwrap();
    assert_eq!(props.integration_time(), 3.0);
    assert_eq!(props.sampling(), Sampling::OneK);
    assert!(props.out_file().is_none());
    assert_eq!(props.image_count(), 2);
    assert_relative_eq!(props.total_tilt_duration(), 6.0);
}

#[test]
fn test_tilt_speed_formula() {
    let props = AcquisitionProperties::new("BM-Ceta", vec![0.0, 1.5, 3.0], 3.0, "2k", None).unwrap();
    assert_relative_eq!(props.tilt_speed(), 1.4768 * (1.5 / 3.0) + 0.0001, epsilon = 1e-12);
}

#[test]
fn test_tilt_speed_is_deterministic() {
    let a = AcquisitionProperties::new("BM-Ceta", uniform(-30.0, 0.3, 201), 0.5, "4k", None).unwrap();
    let b = AcquisitionProperties::new("BM-Ceta", uniform(-30.0, 0.3, 201), 0.5, "4k", None).unwrap();
    assert_eq!(a.tilt_speed().to_bits(), b.tilt_speed().to_bits());
    assert_eq!(a, b);
}

#[test]
fn test_custom_calibration() {
    let props = AcquisitionProperties::builder("BM-Ceta", vec![0.0, 2.0])
        .integration_time(4.0)
        .calibration(TiltSpeedCalibration {
            gain: 2.0,
            offset: 0.5,
        })
        .build()
        .unwrap();
    assert_relative_eq!(props.tilt_speed(), 2.0 * 0.5 + 0.5);
}

#[test]
fn test_unknown_sampling_rejected() {
    for bad in ["3k", "1K", "", "8k", "0.25k"] {
        let err = AcquisitionProperties::new("BM-Ceta", vec![0.0, 1.0], 3.0, bad, None).unwrap_err();
        assert!(
            matches!(err, MicroedError::UnknownSamplingMode(ref s) if s == bad),
            "{bad:?} gave {err:?}"
        );
    }
}

#[test]
fn test_short_alpha_arr_rejected() {
    for alpha_arr in [vec![], vec![5.0]] {
        let err = AcquisitionProperties::builder("BM-Ceta", alpha_arr).build().unwrap_err();
        assert!(matches!(err, MicroedError::InvalidAcquisitionInput(_)));
    }
}

#[test]
fn test_non_positive_integration_time_rejected() {
    for t in [0.0, -1.0, f64::NAN] {
        let err = AcquisitionProperties::new("BM-Ceta", vec![0.0, 1.0], t, "1k", None).unwrap_err();
        assert!(matches!(err, MicroedError::InvalidAcquisitionInput(_)));
    }
}

#[test]
fn test_non_uniform_spacing_rejected() {
    let err = AcquisitionProperties::builder("BM-Ceta", vec![0.0, 1.0, 3.0])
        .build()
        .unwrap_err();
    assert!(matches!(err, MicroedError::InvalidAcquisitionInput(_)));
}

#[test]
fn test_non_monotonic_rejected() {
    for alpha_arr in [vec![0.0, 0.0], vec![0.0, 1.0, 0.0]] {
        let err = AcquisitionProperties::builder("BM-Ceta", alpha_arr).build().unwrap_err();
        assert!(matches!(err, MicroedError::InvalidAcquisitionInput(_)));
    }
}

#[test]
fn test_empty_camera_name_rejected() {
    let err = AcquisitionProperties::builder(" ", vec![0.0, 1.0]).build().unwrap_err();
    assert!(matches!(err, MicroedError::InvalidAcquisitionInput(_)));
}

#[test]
fn test_alpha_range_includes_endpoints() {
    let alpha_arr = alpha_range(-35.0, 30.0, 1.0).unwrap();
    assert_eq!(alpha_arr.len(), 66);
    assert_relative_eq!(alpha_arr[0], -35.0);
    assert_relative_eq!(alpha_arr[65], 30.0);

    let props = AcquisitionProperties::builder("BM-Ceta", alpha_arr).build().unwrap();
    assert_eq!(props.image_count(), 65);
    assert_relative_eq!(props.alphas()[0], -34.5);
}

#[test]
fn test_alpha_range_descending() {
    let alpha_arr = alpha_range(10.0, -10.0, -5.0).unwrap();
    assert_eq!(alpha_arr, vec![10.0, 5.0, 0.0, -5.0, -10.0]);
}

#[test]
fn test_alpha_range_rejects_wrong_direction() {
    assert!(alpha_range(0.0, 10.0, -1.0).is_err());
    assert!(alpha_range(0.0, 10.0, 0.0).is_err());
    assert!(alpha_range(5.0, 5.0, 1.0).is_err());
}

#[test]
fn test_alpha_range_rejects_tiny_step() {
    for step in [1e-300, 1e-9] {
        let err = alpha_range(-30.0, 30.0, step).unwrap_err();
        assert!(matches!(err, MicroedError::InvalidAcquisitionInput(_)), "{err}");
    }
    // A fine but sane step is still accepted.
    assert_eq!(alpha_range(-30.0, 30.0, 0.01).unwrap().len(), 6001);
}

#[test]
fn test_display_lists_tilt_speed() {
    let props = AcquisitionProperties::new("BM-Ceta", vec![0.0, 1.0], 3.0, "0.5k", None).unwrap();
    let text = props.to_string();
    assert!(text.contains("BM-Ceta"));
    assert!(text.contains("0.5k (512x512)"));
    assert!(text.contains("code 8, binning 8"));
    assert!(text.contains("Tilt speed"));
}

#[test]
fn test_interpolate_shifts() {
    let samples = [-10.0, 0.0, 10.0];
    let shifts = [
        AlignmentOffset::new(-50.0, 30.0),
        AlignmentOffset::new(0.0, 0.0),
        AlignmentOffset::new(40.0, -10.0),
    ];
    let alphas = [-20.0, -10.0, -5.0, 0.0, 2.5, 10.0, 15.0];
    let out = interpolate_shifts(&alphas, &samples, &shifts).unwrap();

    assert_eq!(out.len(), alphas.len());
    assert_eq!(out[0], shifts[0]);
    assert_eq!(out[1], shifts[0]);
    assert_relative_eq!(out[2].dx, -25.0);
    assert_relative_eq!(out[2].dy, 15.0);
    assert_eq!(out[3], shifts[1]);
    assert_relative_eq!(out[4].dx, 10.0);
    assert_relative_eq!(out[4].dy, -2.5);
    assert_eq!(out[5], shifts[2]);
    assert_eq!(out[6], shifts[2]);
}

#[test]
fn test_interpolate_shifts_validates_samples() {
    let shift = AlignmentOffset::default();
    assert!(interpolate_shifts(&[0.0], &[], &[]).is_err());
    assert!(interpolate_shifts(&[0.0], &[0.0, 1.0], &[shift]).is_err());
    assert!(interpolate_shifts(&[0.0], &[1.0, 0.0], &[shift, shift]).is_err());
}
