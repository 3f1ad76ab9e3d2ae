//! The native call contract.
//!
//! [`Dirp`] has one method per entry point of the DIRP
//! library. Methods follow the native conventions: an `i32`
//! status ([`DIRP_SUCCESS`][crate::types::DIRP_SUCCESS] on
//! success), results written through out-parameters, and
//! caller-sized output buffers accompanied by their byte
//! length. Out-parameters carry meaning only when the call
//! reports success.
//!
//! [`Bridge`][crate::bridge::Bridge] is written against this
//! trait; the SDK itself is reached through `DjiThermal`
//! (feature `dji`).

use std::fmt::Debug;

use crate::types::*;

pub trait Dirp {
    /// Opaque native handle for one parsed R-JPEG.
    type Handle: Copy + Default + Debug;

    fn create_from_rjpeg(&self, data: &[u8], size: i32, handle: &mut Self::Handle) -> i32;
    fn destroy(&self, handle: Self::Handle) -> i32;

    fn get_api_version(&self, version: &mut ApiVersion) -> i32;
    fn get_rjpeg_version(&self, handle: Self::Handle, version: &mut RjpegVersion) -> i32;
    fn get_rjpeg_resolution(&self, handle: Self::Handle, resolution: &mut Resolution) -> i32;

    fn get_original_raw(&self, handle: Self::Handle, raw: &mut [u16], size: i32) -> i32;
    fn process(&self, handle: Self::Handle, color_image: &mut [u8], size: i32) -> i32;
    fn process_stretch(&self, handle: Self::Handle, stretch: &mut [f32], size: i32) -> i32;
    fn measure(&self, handle: Self::Handle, temperature: &mut [i16], size: i32) -> i32;
    fn measure_ex(&self, handle: Self::Handle, temperature: &mut [f32], size: i32) -> i32;

    fn set_isotherm(&self, handle: Self::Handle, isotherm: &Isotherm) -> i32;
    fn get_isotherm(&self, handle: Self::Handle, isotherm: &mut Isotherm) -> i32;

    fn set_color_bar(&self, handle: Self::Handle, color_bar: &ColorBar) -> i32;
    fn get_color_bar(&self, handle: Self::Handle, color_bar: &mut ColorBar) -> i32;
    fn get_color_bar_adaptive_params(&self, handle: Self::Handle, color_bar: &mut ColorBar) -> i32;

    /// `pseudo_color` is the native enumeration value.
    fn set_pseudo_color(&self, handle: Self::Handle, pseudo_color: i32) -> i32;
    fn get_pseudo_color(&self, handle: Self::Handle, pseudo_color: &mut i32) -> i32;
    fn get_pseudo_color_lut(&self, lut: &mut PseudoColorLut) -> i32;

    fn set_enhancement_params(&self, handle: Self::Handle, params: &EnhancementParams) -> i32;
    fn get_enhancement_params(&self, handle: Self::Handle, params: &mut EnhancementParams) -> i32;

    fn set_measurement_params(&self, handle: Self::Handle, params: &MeasurementParams) -> i32;
    fn get_measurement_params(&self, handle: Self::Handle, params: &mut MeasurementParams) -> i32;

    fn register_app(&self, key: &str) -> i32;
    fn set_verbose_level(&self, level: VerboseLevel);
    fn set_logger_file(&self, file_name: &str);
}
