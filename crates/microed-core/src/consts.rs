/// Empirical gain converting degrees-per-second into the stage controller's
/// alpha speed units.
pub const TILT_SPEED_GAIN: f64 = 1.4768;

/// Empirical offset of the tilt speed calibration.
pub const TILT_SPEED_OFFSET: f64 = 0.0001;

/// Default exposure time per image, in seconds.
pub const DEFAULT_INTEGRATION_TIME: f64 = 3.0;

/// Relative tolerance used when checking that tilt boundaries are evenly spaced.
pub const ALPHA_SPACING_TOLERANCE: f64 = 1e-6;

/// Upper bound on the number of tilt intervals `alpha_range` will produce.
pub const MAX_TILT_INTERVALS: usize = 100_000;

/// Minimum frame count to use frame-level Rayon parallelism during alignment.
pub const PARALLEL_FRAME_THRESHOLD: usize = 20;

/// Magnitude below which a cross-power spectrum bin is treated as zero.
pub const CROSS_POWER_EPSILON: f64 = 1e-12;

/// MRC main header size in bytes.
pub const MRC_HEADER_SIZE: usize = 1024;

/// MRC data mode for 32-bit float pixels.
pub const MRC_MODE_FLOAT32: i32 = 2;
