//! Host-visible records and enumerations of the DIRP API.
//!
//! These mirror the fixed-size native structures field by
//! field. The native layouts themselves only appear in the
//! `dji` backend; everything above the
//! [`Dirp`][crate::native::Dirp] seam works with these.

use std::{convert::TryFrom, fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde_derive::*;
use thiserror::Error;

/// Number of selectable pseudo-color schemes (the native
/// `DIRP_PSEUDO_COLOR_NUM` sentinel).
pub const PSEUDO_COLOR_NUM: usize = 10;

/// Entries per channel in each row of the pseudo-color LUT.
pub const PSEUDO_COLOR_LUT_DEPTH: usize = 256;

/// Number of verbose levels (the native
/// `DIRP_VERBOSE_LEVEL_NUM` sentinel).
pub const VERBOSE_LEVEL_NUM: i32 = 3;

/// Raw status code reported by the native library on
/// success.
pub const DIRP_SUCCESS: i32 = 0;

/// Status codes returned by the native library.
///
/// Commands (destroy, setters, registration) hand these
/// back as raw `i32`s; use [`RetCode::from_code`] or
/// [`RetCode::check`] to interpret them. Values the SDK
/// does not document are kept as [`RetCode::Unknown`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetCode {
    #[error("success")]
    Success,
    #[error("memory allocation failed")]
    Malloc,
    #[error("null pointer")]
    PointerNull,
    #[error("invalid parameters")]
    InvalidParams,
    #[error("invalid raw data")]
    InvalidRaw,
    #[error("invalid header")]
    InvalidHeader,
    #[error("invalid curve")]
    InvalidCurve,
    #[error("r-jpeg parsing failed")]
    RjpegParse,
    #[error("buffer size mismatch")]
    Size,
    #[error("invalid handle")]
    InvalidHandle,
    #[error("unsupported input format")]
    FormatInput,
    #[error("unsupported output format")]
    FormatOutput,
    #[error("unsupported function")]
    UnsupportedFunc,
    #[error("not ready")]
    NotReady,
    #[error("activation failed")]
    Activation,
    #[error("invalid ini file")]
    InvalidIni,
    #[error("invalid sub library")]
    InvalidSubDll,
    #[error("advanced feature not available")]
    Advanced,
    #[error("unknown status code {0}")]
    Unknown(i32),
}

impl RetCode {
    /// Every documented code.
    pub const ALL: [RetCode; 18] = [
        RetCode::Success,
        RetCode::Malloc,
        RetCode::PointerNull,
        RetCode::InvalidParams,
        RetCode::InvalidRaw,
        RetCode::InvalidHeader,
        RetCode::InvalidCurve,
        RetCode::RjpegParse,
        RetCode::Size,
        RetCode::InvalidHandle,
        RetCode::FormatInput,
        RetCode::FormatOutput,
        RetCode::UnsupportedFunc,
        RetCode::NotReady,
        RetCode::Activation,
        RetCode::InvalidIni,
        RetCode::InvalidSubDll,
        RetCode::Advanced,
    ];

    /// The raw native value.
    pub fn code(self) -> i32 {
        match self {
            RetCode::Success => 0,
            RetCode::Malloc => -1,
            RetCode::PointerNull => -2,
            RetCode::InvalidParams => -3,
            RetCode::InvalidRaw => -4,
            RetCode::InvalidHeader => -5,
            RetCode::InvalidCurve => -6,
            RetCode::RjpegParse => -7,
            RetCode::Size => -8,
            RetCode::InvalidHandle => -9,
            RetCode::FormatInput => -10,
            RetCode::FormatOutput => -11,
            RetCode::UnsupportedFunc => -12,
            RetCode::NotReady => -13,
            RetCode::Activation => -14,
            RetCode::InvalidIni => -15,
            RetCode::InvalidSubDll => -16,
            RetCode::Advanced => -32,
            RetCode::Unknown(code) => code,
        }
    }

    /// Interpret a raw native value.
    pub fn from_code(code: i32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .unwrap_or(RetCode::Unknown(code))
    }

    /// `Ok` on [`DIRP_SUCCESS`], otherwise the code as an
    /// error.
    pub fn check(code: i32) -> std::result::Result<(), RetCode> {
        match Self::from_code(code) {
            RetCode::Success => Ok(()),
            err => Err(err),
        }
    }
}

/// Pseudo-color schemes understood by the ISP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum PseudoColor {
    WhiteHot = 0,
    Fulgurite = 1,
    IronRed = 2,
    HotIron = 3,
    Medical = 4,
    Arctic = 5,
    Rainbow1 = 6,
    Rainbow2 = 7,
    Tint = 8,
    BlackHot = 9,
}

impl PseudoColor {
    pub const ALL: [PseudoColor; PSEUDO_COLOR_NUM] = [
        PseudoColor::WhiteHot,
        PseudoColor::Fulgurite,
        PseudoColor::IronRed,
        PseudoColor::HotIron,
        PseudoColor::Medical,
        PseudoColor::Arctic,
        PseudoColor::Rainbow1,
        PseudoColor::Rainbow2,
        PseudoColor::Tint,
        PseudoColor::BlackHot,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PseudoColor::WhiteHot => "whitehot",
            PseudoColor::Fulgurite => "fulgurite",
            PseudoColor::IronRed => "ironred",
            PseudoColor::HotIron => "hotiron",
            PseudoColor::Medical => "medical",
            PseudoColor::Arctic => "arctic",
            PseudoColor::Rainbow1 => "rainbow1",
            PseudoColor::Rainbow2 => "rainbow2",
            PseudoColor::Tint => "tint",
            PseudoColor::BlackHot => "blackhot",
        }
    }
}

impl TryFrom<i32> for PseudoColor {
    type Error = anyhow::Error;

    fn try_from(value: i32) -> Result<Self> {
        PseudoColor::ALL
            .iter()
            .copied()
            .find(|c| *c as i32 == value)
            .ok_or_else(|| anyhow!("unknown pseudo color: {}", value))
    }
}

impl FromStr for PseudoColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.to_ascii_lowercase();
        PseudoColor::ALL
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| anyhow!("unknown pseudo color `{}`", s))
    }
}

impl fmt::Display for PseudoColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Log level of the native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i32)]
pub enum VerboseLevel {
    None = 0,
    Debug = 1,
    Detail = 2,
}

impl FromStr for VerboseLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(VerboseLevel::None),
            "debug" => Ok(VerboseLevel::Debug),
            "detail" => Ok(VerboseLevel::Detail),
            _ => Err(anyhow!("unknown verbose level `{}`", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApiVersion {
    pub api: u32,
    pub magic: [u8; 8],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RjpegVersion {
    pub rjpeg: u32,
    pub header: u32,
    pub curve: u32,
}

/// Image resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: i32,
    pub height: i32,
}

impl Resolution {
    /// Number of elements in a `width x height` buffer with
    /// `channels` values per pixel. `None` if either
    /// dimension is not positive or the product overflows.
    pub fn element_count(&self, channels: usize) -> Option<usize> {
        if self.width <= 0 || self.height <= 0 {
            return None;
        }
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(channels)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Isotherm {
    pub enable: bool,
    pub high: f32,
    pub low: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorBar {
    pub manual_enable: bool,
    pub high: f32,
    pub low: f32,
}

/// The global pseudo-color lookup table: one row per
/// [`PseudoColor`] scheme, [`PSEUDO_COLOR_LUT_DEPTH`]
/// entries per row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PseudoColorLut {
    pub red: Vec<Vec<u8>>,
    pub green: Vec<Vec<u8>>,
    pub blue: Vec<Vec<u8>>,
}

impl PseudoColorLut {
    /// The `(r, g, b)` triple at `index` for `scheme`.
    pub fn color(&self, scheme: PseudoColor, index: u8) -> Option<[u8; 3]> {
        let row = scheme as usize;
        let idx = index as usize;
        Some([
            *self.red.get(row)?.get(idx)?,
            *self.green.get(row)?.get(idx)?,
            *self.blue.get(row)?.get(idx)?,
        ])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnhancementParams {
    pub brightness: i32,
}

/// Ambient parameters used by temperature measurement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasurementParams {
    /// Distance to the target, in meters.
    pub distance: f32,
    /// Relative humidity, in percent.
    pub humidity: f32,
    pub emissivity: f32,
    /// Reflected apparent temperature, in celsius.
    pub reflection: f32,
}
