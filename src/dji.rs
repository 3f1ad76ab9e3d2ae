//! [`Dirp`] backed by the DJI Thermal SDK.
//!
//! Every method is a single `unsafe` call into
//! `dji-thermal-sys`. Native structures live on the stack
//! and are converted to the crate's records only after the
//! call reports success.
use std::{ffi::CString, mem::MaybeUninit, os::raw::c_char};

use dji_thermal_sys as sys;
use tracing::warn;

use crate::{native::Dirp, types::*};

// Exported by libdirp but missing from the v1.3 bindings of
// `dji-thermal-sys`.
extern "C" {
    fn dirp_register_app(key: *const c_char) -> i32;
}

/// Raw SDK handle.
#[derive(Debug, Clone, Copy)]
pub struct RawHandle(sys::DIRP_HANDLE);

impl Default for RawHandle {
    fn default() -> Self {
        RawHandle(std::ptr::null_mut())
    }
}

/// The DJI Thermal SDK. The library state is process-global,
/// so this type carries no data.
#[derive(Debug, Default, Clone, Copy)]
pub struct DjiThermal;

unsafe impl Send for RawHandle {}

impl Dirp for DjiThermal {
    type Handle = RawHandle;

    fn create_from_rjpeg(&self, data: &[u8], size: i32, handle: &mut RawHandle) -> i32 {
        let mut ph = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_create_from_rjpeg(data.as_ptr(), size, ph.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            *handle = RawHandle(unsafe { ph.assume_init() });
        }
        ret
    }

    fn destroy(&self, handle: RawHandle) -> i32 {
        unsafe { sys::dirp_destroy(handle.0) }
    }

    fn get_api_version(&self, version: &mut ApiVersion) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_api_version(native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            let native: sys::dirp_api_version_t = unsafe { native.assume_init() };
            let mut magic = [0u8; 8];
            for (m, c) in magic.iter_mut().zip(native.magic.iter()) {
                *m = *c as u8;
            }
            *version = ApiVersion {
                api: native.api,
                magic,
            };
        }
        ret
    }

    fn get_rjpeg_version(&self, handle: RawHandle, version: &mut RjpegVersion) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_rjpeg_version(handle.0, native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            let native: sys::dirp_rjpeg_version_t = unsafe { native.assume_init() };
            *version = RjpegVersion {
                rjpeg: native.rjpeg,
                header: native.header,
                curve: native.curve,
            };
        }
        ret
    }

    fn get_rjpeg_resolution(&self, handle: RawHandle, resolution: &mut Resolution) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_rjpeg_resolution(handle.0, native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            let native = unsafe { native.assume_init() };
            *resolution = Resolution {
                width: native.width,
                height: native.height,
            };
        }
        ret
    }

    fn get_original_raw(&self, handle: RawHandle, raw: &mut [u16], size: i32) -> i32 {
        unsafe { sys::dirp_get_original_raw(handle.0, raw.as_mut_ptr(), size) }
    }

    fn process(&self, handle: RawHandle, color_image: &mut [u8], size: i32) -> i32 {
        unsafe { sys::dirp_process(handle.0, color_image.as_mut_ptr(), size) }
    }

    fn process_stretch(&self, handle: RawHandle, stretch: &mut [f32], size: i32) -> i32 {
        unsafe { sys::dirp_process_strech(handle.0, stretch.as_mut_ptr(), size) }
    }

    fn measure(&self, handle: RawHandle, temperature: &mut [i16], size: i32) -> i32 {
        unsafe { sys::dirp_measure(handle.0, temperature.as_mut_ptr(), size) }
    }

    fn measure_ex(&self, handle: RawHandle, temperature: &mut [f32], size: i32) -> i32 {
        unsafe { sys::dirp_measure_ex(handle.0, temperature.as_mut_ptr(), size) }
    }

    fn set_isotherm(&self, handle: RawHandle, isotherm: &Isotherm) -> i32 {
        let native = sys::dirp_isotherm_t {
            enable: isotherm.enable,
            high: isotherm.high,
            low: isotherm.low,
        };
        unsafe { sys::dirp_set_isotherm(handle.0, &native) }
    }

    fn get_isotherm(&self, handle: RawHandle, isotherm: &mut Isotherm) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_isotherm(handle.0, native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            let native: sys::dirp_isotherm_t = unsafe { native.assume_init() };
            *isotherm = Isotherm {
                enable: native.enable,
                high: native.high,
                low: native.low,
            };
        }
        ret
    }

    fn set_color_bar(&self, handle: RawHandle, color_bar: &ColorBar) -> i32 {
        let native = native_color_bar(color_bar);
        unsafe { sys::dirp_set_color_bar(handle.0, &native) }
    }

    fn get_color_bar(&self, handle: RawHandle, color_bar: &mut ColorBar) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_color_bar(handle.0, native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            *color_bar = color_bar_from(unsafe { native.assume_init() });
        }
        ret
    }

    fn get_color_bar_adaptive_params(&self, handle: RawHandle, color_bar: &mut ColorBar) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_color_bar_adaptive_params(handle.0, native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            *color_bar = color_bar_from(unsafe { native.assume_init() });
        }
        ret
    }

    fn set_pseudo_color(&self, handle: RawHandle, pseudo_color: i32) -> i32 {
        unsafe { sys::dirp_set_pseudo_color(handle.0, pseudo_color as _) }
    }

    fn get_pseudo_color(&self, handle: RawHandle, pseudo_color: &mut i32) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_pseudo_color(handle.0, native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            *pseudo_color = unsafe { native.assume_init() } as i32;
        }
        ret
    }

    fn get_pseudo_color_lut(&self, lut: &mut PseudoColorLut) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_pseudo_color_lut(native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            let native: sys::dirp_isp_pseudo_color_lut_t = unsafe { native.assume_init() };
            let rows = |table: &[[u8; PSEUDO_COLOR_LUT_DEPTH]]| -> Vec<Vec<u8>> {
                table.iter().take(PSEUDO_COLOR_NUM).map(|row| row.to_vec()).collect()
            };
            *lut = PseudoColorLut {
                red: rows(&native.red[..]),
                green: rows(&native.green[..]),
                blue: rows(&native.blue[..]),
            };
        }
        ret
    }

    fn set_enhancement_params(&self, handle: RawHandle, params: &EnhancementParams) -> i32 {
        let native = sys::dirp_enhancement_params_t {
            brightness: params.brightness,
        };
        unsafe { sys::dirp_set_enhancement_params(handle.0, &native) }
    }

    fn get_enhancement_params(&self, handle: RawHandle, params: &mut EnhancementParams) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_enhancement_params(handle.0, native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            let native: sys::dirp_enhancement_params_t = unsafe { native.assume_init() };
            params.brightness = native.brightness;
        }
        ret
    }

    fn set_measurement_params(&self, handle: RawHandle, params: &MeasurementParams) -> i32 {
        let native = sys::dirp_measurement_params_t {
            distance: params.distance,
            humidity: params.humidity,
            emissivity: params.emissivity,
            reflection: params.reflection,
        };
        unsafe { sys::dirp_set_measurement_params(handle.0, &native) }
    }

    fn get_measurement_params(&self, handle: RawHandle, params: &mut MeasurementParams) -> i32 {
        let mut native = MaybeUninit::uninit();
        let ret = unsafe { sys::dirp_get_measurement_params(handle.0, native.as_mut_ptr()) };
        if ret == DIRP_SUCCESS {
            let native: sys::dirp_measurement_params_t = unsafe { native.assume_init() };
            *params = MeasurementParams {
                distance: native.distance,
                humidity: native.humidity,
                emissivity: native.emissivity,
                reflection: native.reflection,
            };
        }
        ret
    }

    fn register_app(&self, key: &str) -> i32 {
        match CString::new(key) {
            Ok(key) => unsafe { dirp_register_app(key.as_ptr()) },
            Err(_) => RetCode::InvalidParams.code(),
        }
    }

    fn set_verbose_level(&self, level: VerboseLevel) {
        unsafe { sys::dirp_set_verbose_level(level as i32 as _) }
    }

    fn set_logger_file(&self, file_name: &str) {
        match CString::new(file_name) {
            Ok(file_name) => unsafe { sys::dirp_set_logger_file(file_name.as_ptr()) },
            Err(_) => warn!(file_name, "logger file name contains NUL; ignored"),
        }
    }
}

fn native_color_bar(color_bar: &ColorBar) -> sys::dirp_color_bar_t {
    sys::dirp_color_bar_t {
        manual_enable: color_bar.manual_enable,
        high: color_bar.high,
        low: color_bar.low,
    }
}

fn color_bar_from(native: sys::dirp_color_bar_t) -> ColorBar {
    ColorBar {
        manual_enable: native.manual_enable,
        high: native.high,
        low: native.low,
    }
}

#[cfg(test)]
mod tests {
    use anyhow::{Context, Result};
    use glob::{glob_with, MatchOptions};

    use std::{env, path::Path};

    use super::DjiThermal;

    use crate::{bridge::Bridge, native::Dirp, rjpeg::RJpeg, stats::Stats, types::RetCode};

    #[test]
    fn register_app_rejects_nul_key() {
        assert_eq!(DjiThermal.register_app("ab\0cd"), RetCode::InvalidParams.code());
    }

    #[test]
    fn measure_samples() -> Result<()> {
        let base = match env::var("DJI_SAMPLES") {
            Ok(base) => base,
            Err(_) => {
                eprintln!("`DJI_SAMPLES` not set; skipping");
                return Ok(());
            }
        };
        let bridge = Bridge::new(DjiThermal);
        let mut opts = MatchOptions::new();
        opts.case_sensitive = false;
        eprintln!("Verifying {base}/**/*.jpg");
        for path in glob_with(&format!("{base}/**/*.jpg"), opts)? {
            let path = path?;
            eprintln!("Reading {path}...", path = path.display());
            let stats = measure_at_path(&bridge, &path)?;
            eprintln!("\t{stats:?}");
        }
        assert_eq!(bridge.live_handles(), 0);
        Ok(())
    }

    fn measure_at_path(bridge: &Bridge<DjiThermal>, path: &Path) -> Result<Stats> {
        let rj = RJpeg::try_from_path(bridge, path).context("dji rjpeg parsing failed")?;
        let (wid, ht) = rj.dimensions()?;
        eprintln!("\tdims: {wid}x{ht}");

        let params = rj.measurement_params()?;
        eprintln!("\tparams: {params:?}");
        rj.set_measurement_params(&params)?;
        assert_eq!(rj.measurement_params()?, params);

        let temps = rj.temperatures()?;
        let coarse = rj.temperatures_decicelsius()?;
        assert_eq!(temps.dim(), (ht, wid));
        assert_eq!(coarse.dim(), (ht, wid));

        let mut stats = Stats::default();
        for (t, c) in temps.iter().zip(coarse.iter()) {
            assert!((*t - *c as f32 / 10.).abs() < 1.);
            stats += *t as f64;
        }
        rj.close()?;
        Ok(stats)
    }
}
