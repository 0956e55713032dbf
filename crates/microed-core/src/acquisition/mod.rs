mod properties;
mod sampling;
pub mod shifts;

pub use properties::{
    alpha_range, AcquisitionProperties, AcquisitionPropertiesBuilder, TiltSpeedCalibration,
};
pub use sampling::Sampling;
