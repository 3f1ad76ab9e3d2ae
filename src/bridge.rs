//! Handle-scoped bridge over a [`Dirp`] implementation.
//!
//! The bridge owns the native library and every native
//! handle created through it. Callers hold [`Handle`]s and
//! are responsible for [destroying][Bridge::destroy] them;
//! nothing is released implicitly.
//!
//! Two result policies apply, and they are deliberately not
//! unified:
//!
//! - Queries return `Option`: `None` whenever the native call
//!   reports anything but success. The specific code is not
//!   surfaced, and a record is converted only after the
//!   native call succeeded.
//! - Commands (destroy, setters, registration) return the
//!   native `i32` code unmodified.
//!
//! Buffer-sized queries (raw data, color image, stretched
//! image, temperature grids) size their output from a fresh
//! resolution query on every call. If the resolution query
//! fails, the data call is never made.
//!
//! A [`Handle`] that was destroyed (or never created here)
//! is rejected before reaching native code: queries yield
//! `None`, commands yield [`RetCode::InvalidHandle`]. Whether
//! the native library validates its own handles is not
//! assumed either way.

use std::{cell::RefCell, convert::TryFrom, mem::size_of};

use tracing::{debug, warn};

use crate::{
    arena::{Handle, HandleTable},
    native::Dirp,
    types::*,
};

pub struct Bridge<D: Dirp> {
    dirp: D,
    handles: RefCell<HandleTable<D::Handle>>,
}

impl<D: Dirp> Bridge<D> {
    pub fn new(dirp: D) -> Self {
        Bridge {
            dirp,
            handles: RefCell::new(HandleTable::new()),
        }
    }

    /// The underlying native implementation.
    pub fn native(&self) -> &D {
        &self.dirp
    }

    /// Number of handles created and not yet destroyed.
    pub fn live_handles(&self) -> usize {
        self.handles.borrow().len()
    }

    fn raw(&self, handle: Handle) -> Option<D::Handle> {
        let raw = self.handles.borrow().get(handle);
        if raw.is_none() {
            warn!(%handle, "stale or unknown handle");
        }
        raw
    }

    /// Parse the first `size` bytes of `data` as an R-JPEG.
    ///
    /// `None` if `size` exceeds `data`, or on any native
    /// failure.
    pub fn create_from_rjpeg(&self, data: &[u8], size: usize) -> Option<Handle> {
        if size > data.len() {
            warn!(size, len = data.len(), "r-jpeg size exceeds buffer");
            return None;
        }
        let native_size = i32::try_from(size).ok()?;

        let mut raw = D::Handle::default();
        let ret = self.dirp.create_from_rjpeg(data, native_size, &mut raw);
        if ret != DIRP_SUCCESS {
            debug!(ret, "create_from_rjpeg failed");
            return None;
        }
        let handle = self.handles.borrow_mut().insert(raw);
        debug!(%handle, ?raw, "created");
        Some(handle)
    }

    /// Release `handle`. Returns the native code unmodified,
    /// or [`RetCode::InvalidHandle`] if `handle` is not live.
    ///
    /// The handle is retired even if the native call fails,
    /// so a native handle is never destroyed twice.
    pub fn destroy(&self, handle: Handle) -> i32 {
        let raw = match self.handles.borrow_mut().remove(handle) {
            Some(raw) => raw,
            None => {
                warn!(%handle, "destroy of stale or unknown handle");
                return RetCode::InvalidHandle.code();
            }
        };
        let ret = self.dirp.destroy(raw);
        debug!(%handle, ret, "destroyed");
        ret
    }

    pub fn get_api_version(&self) -> Option<ApiVersion> {
        let mut version = ApiVersion::default();
        let ret = self.dirp.get_api_version(&mut version);
        success(ret, "get_api_version").then(|| version)
    }

    pub fn get_rjpeg_version(&self, handle: Handle) -> Option<RjpegVersion> {
        self.query(handle, "get_rjpeg_version", |d, h, v| {
            d.get_rjpeg_version(h, v)
        })
    }

    pub fn get_rjpeg_resolution(&self, handle: Handle) -> Option<Resolution> {
        self.query(handle, "get_rjpeg_resolution", |d, h, v| {
            d.get_rjpeg_resolution(h, v)
        })
    }

    /// Original 16-bit raw sensor data, `width x height`
    /// values in row-major order.
    pub fn get_original_raw(&self, handle: Handle) -> Option<Vec<u16>> {
        self.sized_query(handle, 1, "get_original_raw", |d, h, buf, size| {
            d.get_original_raw(h, buf, size)
        })
    }

    /// Pseudo-color RGB image from the ISP, `width x height x
    /// 3` bytes, pixels interleaved.
    pub fn process(&self, handle: Handle) -> Option<Vec<u8>> {
        self.sized_query(handle, 3, "process", |d, h, buf, size| {
            d.process(h, buf, size)
        })
    }

    /// Stretched single-channel float image from the ISP.
    pub fn process_stretch(&self, handle: Handle) -> Option<Vec<f32>> {
        self.sized_query(handle, 1, "process_stretch", |d, h, buf, size| {
            d.process_stretch(h, buf, size)
        })
    }

    /// Per-pixel temperature in tenths of a degree celsius.
    pub fn measure(&self, handle: Handle) -> Option<Vec<i16>> {
        self.sized_query(handle, 1, "measure", |d, h, buf, size| {
            d.measure(h, buf, size)
        })
    }

    /// Per-pixel temperature in degrees celsius.
    pub fn measure_ex(&self, handle: Handle) -> Option<Vec<f32>> {
        self.sized_query(handle, 1, "measure_ex", |d, h, buf, size| {
            d.measure_ex(h, buf, size)
        })
    }

    pub fn set_isotherm(&self, handle: Handle, isotherm: &Isotherm) -> i32 {
        self.command(handle, |d, h| d.set_isotherm(h, isotherm))
    }

    pub fn get_isotherm(&self, handle: Handle) -> Option<Isotherm> {
        self.query(handle, "get_isotherm", |d, h, v| d.get_isotherm(h, v))
    }

    pub fn set_color_bar(&self, handle: Handle, color_bar: &ColorBar) -> i32 {
        self.command(handle, |d, h| d.set_color_bar(h, color_bar))
    }

    pub fn get_color_bar(&self, handle: Handle) -> Option<ColorBar> {
        self.query(handle, "get_color_bar", |d, h, v| d.get_color_bar(h, v))
    }

    /// Color bar bounds the ISP picks in automatic mode.
    pub fn get_color_bar_adaptive_params(&self, handle: Handle) -> Option<ColorBar> {
        self.query(handle, "get_color_bar_adaptive_params", |d, h, v| {
            d.get_color_bar_adaptive_params(h, v)
        })
    }

    pub fn set_pseudo_color(&self, handle: Handle, pseudo_color: PseudoColor) -> i32 {
        self.command(handle, |d, h| d.set_pseudo_color(h, pseudo_color as i32))
    }

    pub fn get_pseudo_color(&self, handle: Handle) -> Option<PseudoColor> {
        let value = self.query(handle, "get_pseudo_color", |d, h, v| {
            d.get_pseudo_color(h, v)
        })?;
        match PseudoColor::try_from(value) {
            Ok(color) => Some(color),
            Err(e) => {
                warn!(%handle, "{:#}", e);
                None
            }
        }
    }

    /// The global pseudo-color table, one row per scheme.
    pub fn get_pseudo_color_lut(&self) -> Option<PseudoColorLut> {
        let mut lut = PseudoColorLut::default();
        let ret = self.dirp.get_pseudo_color_lut(&mut lut);
        success(ret, "get_pseudo_color_lut").then(|| lut)
    }

    pub fn set_enhancement_params(&self, handle: Handle, params: &EnhancementParams) -> i32 {
        self.command(handle, |d, h| d.set_enhancement_params(h, params))
    }

    pub fn get_enhancement_params(&self, handle: Handle) -> Option<EnhancementParams> {
        self.query(handle, "get_enhancement_params", |d, h, v| {
            d.get_enhancement_params(h, v)
        })
    }

    pub fn set_measurement_params(&self, handle: Handle, params: &MeasurementParams) -> i32 {
        self.command(handle, |d, h| d.set_measurement_params(h, params))
    }

    pub fn get_measurement_params(&self, handle: Handle) -> Option<MeasurementParams> {
        self.query(handle, "get_measurement_params", |d, h, v| {
            d.get_measurement_params(h, v)
        })
    }

    pub fn register_app(&self, key: &str) -> i32 {
        self.dirp.register_app(key)
    }

    pub fn set_verbose_level(&self, level: VerboseLevel) {
        self.dirp.set_verbose_level(level)
    }

    pub fn set_logger_file(&self, file_name: &str) {
        self.dirp.set_logger_file(file_name)
    }

    fn command<F>(&self, handle: Handle, call: F) -> i32
    where
        F: FnOnce(&D, D::Handle) -> i32,
    {
        match self.raw(handle) {
            Some(raw) => call(&self.dirp, raw),
            None => RetCode::InvalidHandle.code(),
        }
    }

    fn query<T, F>(&self, handle: Handle, op: &'static str, call: F) -> Option<T>
    where
        T: Default,
        F: FnOnce(&D, D::Handle, &mut T) -> i32,
    {
        let raw = self.raw(handle)?;
        let mut value = T::default();
        let ret = call(&self.dirp, raw, &mut value);
        success(ret, op).then(|| value)
    }

    fn sized_query<T, F>(
        &self,
        handle: Handle,
        channels: usize,
        op: &'static str,
        call: F,
    ) -> Option<Vec<T>>
    where
        T: Copy + Default,
        F: FnOnce(&D, D::Handle, &mut [T], i32) -> i32,
    {
        let raw = self.raw(handle)?;

        let mut resolution = Resolution::default();
        let ret = self.dirp.get_rjpeg_resolution(raw, &mut resolution);
        if !success(ret, op) {
            return None;
        }

        let count = resolution.element_count(channels);
        let size = count
            .and_then(|c| c.checked_mul(size_of::<T>()))
            .and_then(|s| i32::try_from(s).ok());
        let (count, size) = match (count, size) {
            (Some(count), Some(size)) => (count, size),
            _ => {
                warn!(%handle, ?resolution, op, "cannot size output buffer");
                return None;
            }
        };

        let mut values = vec![T::default(); count];
        let ret = call(&self.dirp, raw, &mut values[..], size);
        success(ret, op).then(|| values)
    }
}

fn success(ret: i32, op: &'static str) -> bool {
    if ret != DIRP_SUCCESS {
        debug!(ret, op, "native call failed");
        return false;
    }
    true
}

impl<D: Dirp> Drop for Bridge<D> {
    fn drop(&mut self) {
        let live = self.handles.get_mut().len();
        if live > 0 {
            warn!(live, "bridge dropped with live handles; they are not destroyed");
        }
    }
}
