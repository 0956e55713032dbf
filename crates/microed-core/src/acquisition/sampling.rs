use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MicroedError;

/// Camera readout resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sampling {
    #[serde(rename = "4k")]
    FourK,
    #[serde(rename = "2k")]
    TwoK,
    #[default]
    #[serde(rename = "1k")]
    OneK,
    #[serde(rename = "0.5k")]
    HalfK,
}

impl Sampling {
    pub const ALL: [Sampling; 4] = [Self::FourK, Self::TwoK, Self::OneK, Self::HalfK];

    /// Image edge length in pixels (images are square).
    pub fn dimension(&self) -> u32 {
        match self {
            Self::FourK => 4096,
            Self::TwoK => 2048,
            Self::OneK => 1024,
            Self::HalfK => 512,
        }
    }

    /// Pixel binning relative to the full 4k sensor.
    pub fn binning(&self) -> u32 {
        4096 / self.dimension()
    }

    /// Sampling code understood by the camera scripting interface.
    pub fn readout_code(&self) -> u32 {
        match self {
            Self::FourK => 1,
            Self::TwoK => 2,
            Self::OneK => 3,
            Self::HalfK => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FourK => "4k",
            Self::TwoK => "2k",
            Self::OneK => "1k",
            Self::HalfK => "0.5k",
        }
    }
}

impl FromStr for Sampling {
    type Err = MicroedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| MicroedError::UnknownSamplingMode(s.to_string()))
    }
}

impl fmt::Display for Sampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = self.dimension();
        write!(f, "{} ({}x{})", self.as_str(), d, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_modes() {
        assert_eq!("4k".parse::<Sampling>().unwrap(), Sampling::FourK);
        assert_eq!("0.5k".parse::<Sampling>().unwrap(), Sampling::HalfK);
    }

    #[test]
    fn test_binning_follows_dimension() {
        assert_eq!(Sampling::FourK.binning(), 1);
        assert_eq!(Sampling::OneK.binning(), 4);
        assert_eq!(Sampling::HalfK.binning(), 8);
    }

    #[test]
    fn test_readout_codes() {
        let codes: Vec<u32> = Sampling::ALL.iter().map(|s| s.readout_code()).collect();
        assert_eq!(codes, vec![1, 2, 3, 8]);
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let err = "3k".parse::<Sampling>().unwrap_err();
        assert!(matches!(err, MicroedError::UnknownSamplingMode(ref s) if s == "3k"));
    }
}
