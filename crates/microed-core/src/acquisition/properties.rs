use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    ALPHA_SPACING_TOLERANCE, DEFAULT_INTEGRATION_TIME, MAX_TILT_INTERVALS, TILT_SPEED_GAIN,
    TILT_SPEED_OFFSET,
};
use crate::error::{MicroedError, Result};

use super::Sampling;

/// Linear conversion from degrees-per-second to stage speed units.
///
/// The default values are an empirical calibration of the stage controller.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TiltSpeedCalibration {
    pub gain: f64,
    pub offset: f64,
}

impl Default for TiltSpeedCalibration {
    fn default() -> Self {
        Self {
            gain: TILT_SPEED_GAIN,
            offset: TILT_SPEED_OFFSET,
        }
    }
}

impl TiltSpeedCalibration {
    pub fn tilt_speed(&self, alpha_step: f64, integration_time: f64) -> f64 {
        self.gain * (alpha_step / integration_time) + self.offset
    }
}

/// Numeric plan for one tilt-series acquisition.
///
/// Every derived field is computed in the constructor; the value is read-only
/// afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct AcquisitionProperties {
    camera_name: String,
    alpha_arr: Vec<f64>,
    alpha_step: f64,
    alphas: Vec<f64>,
    integration_time: f64,
    sampling: Sampling,
    tilt_speed: f64,
    out_file: Option<PathBuf>,
}

impl AcquisitionProperties {
    pub fn new(
        camera_name: impl Into<String>,
        alpha_arr: Vec<f64>,
        integration_time: f64,
        sampling: &str,
        out_file: Option<PathBuf>,
    ) -> Result<Self> {
        Self::builder(camera_name, alpha_arr)
            .integration_time(integration_time)
            .sampling(sampling)
            .out_file(out_file)
            .build()
    }

    /// Start a builder with the default integration time (3 s) and 1k sampling.
    pub fn builder(
        camera_name: impl Into<String>,
        alpha_arr: Vec<f64>,
    ) -> AcquisitionPropertiesBuilder {
        AcquisitionPropertiesBuilder {
            camera_name: camera_name.into(),
            alpha_arr,
            integration_time: DEFAULT_INTEGRATION_TIME,
            sampling: Sampling::default().as_str().to_string(),
            out_file: None,
            calibration: TiltSpeedCalibration::default(),
        }
    }

    pub fn camera_name(&self) -> &str {
        &self.camera_name
    }

    /// Tilt boundary angles in degrees.
    pub fn alpha_arr(&self) -> &[f64] {
        &self.alpha_arr
    }

    pub fn alpha_step(&self) -> f64 {
        self.alpha_step
    }

    /// Midpoint angle of each image in the series.
    pub fn alphas(&self) -> &[f64] {
        &self.alphas
    }

    pub fn integration_time(&self) -> f64 {
        self.integration_time
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    /// Alpha tilt speed in stage controller units.
    pub fn tilt_speed(&self) -> f64 {
        self.tilt_speed
    }

    pub fn out_file(&self) -> Option<&PathBuf> {
        self.out_file.as_ref()
    }

    /// Number of images the acquisition will produce.
    pub fn image_count(&self) -> usize {
        self.alphas.len()
    }

    /// Time spent tilting, in seconds.
    pub fn total_tilt_duration(&self) -> f64 {
        self.image_count() as f64 * self.integration_time
    }
}

impl fmt::Display for AcquisitionProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Camera:            {}", self.camera_name)?;
        writeln!(f, "Alpha boundaries:  {:?}", self.alpha_arr)?;
        writeln!(f, "Alpha midpoints:   {:?}", self.alphas)?;
        writeln!(f, "Alpha step:        {} [deg]", self.alpha_step)?;
        writeln!(f, "Integration time:  {} [s]", self.integration_time)?;
        writeln!(f, "Sampling:          {}", self.sampling)?;
        writeln!(
            f,
            "Readout:           code {}, binning {}",
            self.sampling.readout_code(),
            self.sampling.binning()
        )?;
        match &self.out_file {
            Some(path) => writeln!(f, "Out file:          {}", path.display())?,
            None => writeln!(f, "Out file:          none")?,
        }
        write!(f, "Tilt speed:        {} [stage speed units]", self.tilt_speed)
    }
}

pub struct AcquisitionPropertiesBuilder {
    camera_name: String,
    alpha_arr: Vec<f64>,
    integration_time: f64,
    sampling: String,
    out_file: Option<PathBuf>,
    calibration: TiltSpeedCalibration,
}

impl AcquisitionPropertiesBuilder {
    pub fn integration_time(mut self, seconds: f64) -> Self {
        self.integration_time = seconds;
        self
    }

    pub fn sampling(mut self, sampling: &str) -> Self {
        self.sampling = sampling.to_string();
        self
    }

    pub fn out_file(mut self, out_file: Option<PathBuf>) -> Self {
        self.out_file = out_file;
        self
    }

    pub fn calibration(mut self, calibration: TiltSpeedCalibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn build(self) -> Result<AcquisitionProperties> {
        if self.camera_name.trim().is_empty() {
            return Err(MicroedError::InvalidAcquisitionInput(
                "camera name must not be empty".into(),
            ));
        }
        if !(self.integration_time.is_finite() && self.integration_time > 0.0) {
            return Err(MicroedError::InvalidAcquisitionInput(format!(
                "integration time must be positive, got {}",
                self.integration_time
            )));
        }
        let alpha_step = validate_alpha_arr(&self.alpha_arr)?;
        let sampling: Sampling = self.sampling.parse()?;

        let alphas = self.alpha_arr[..self.alpha_arr.len() - 1]
            .iter()
            .map(|a| a + alpha_step / 2.0)
            .collect();
        let tilt_speed = self.calibration.tilt_speed(alpha_step, self.integration_time);

        Ok(AcquisitionProperties {
            camera_name: self.camera_name,
            alpha_arr: self.alpha_arr,
            alpha_step,
            alphas,
            integration_time: self.integration_time,
            sampling,
            tilt_speed,
            out_file: self.out_file,
        })
    }
}

/// Check that the boundaries are finite, strictly monotonic and evenly
/// spaced; returns the step.
fn validate_alpha_arr(alpha_arr: &[f64]) -> Result<f64> {
    if alpha_arr.len() < 2 {
        return Err(MicroedError::InvalidAcquisitionInput(format!(
            "alpha_arr needs at least 2 values, got {}",
            alpha_arr.len()
        )));
    }
    if let Some(bad) = alpha_arr.iter().find(|a| !a.is_finite()) {
        return Err(MicroedError::InvalidAcquisitionInput(format!(
            "alpha_arr contains a non-finite value: {}",
            bad
        )));
    }

    let step = alpha_arr[1] - alpha_arr[0];
    if step == 0.0 {
        return Err(MicroedError::InvalidAcquisitionInput(
            "alpha_arr must be strictly monotonic".into(),
        ));
    }

    let tolerance = ALPHA_SPACING_TOLERANCE * step.abs();
    for (i, pair) in alpha_arr.windows(2).enumerate() {
        let diff = pair[1] - pair[0];
        if diff.signum() != step.signum() {
            return Err(MicroedError::InvalidAcquisitionInput(
                "alpha_arr must be strictly monotonic".into(),
            ));
        }
        if (diff - step).abs() > tolerance {
            return Err(MicroedError::InvalidAcquisitionInput(format!(
                "alpha_arr is not evenly spaced: interval {} is {} but the first is {}",
                i, diff, step
            )));
        }
    }

    Ok(step)
}

/// Evenly spaced tilt boundaries from `start` to `stop` inclusive.
pub fn alpha_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !(start.is_finite() && stop.is_finite() && step.is_finite()) || step == 0.0 {
        return Err(MicroedError::InvalidAcquisitionInput(format!(
            "invalid tilt range {} to {} in steps of {}",
            start, stop, step
        )));
    }
    let span = stop - start;
    if span == 0.0 || span.signum() != step.signum() {
        return Err(MicroedError::InvalidAcquisitionInput(format!(
            "step {} does not lead from {} to {}",
            step, start, stop
        )));
    }

    let count = (span / step).round();
    if !count.is_finite() || count > MAX_TILT_INTERVALS as f64 {
        return Err(MicroedError::InvalidAcquisitionInput(format!(
            "step {} gives more than {} tilt intervals from {} to {}",
            step, MAX_TILT_INTERVALS, start, stop
        )));
    }
    let intervals = (count as usize).max(1);
    let spacing = span / intervals as f64;
    Ok((0..=intervals)
        .map(|i| start + spacing * i as f64)
        .collect())
}
