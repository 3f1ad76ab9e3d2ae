//! In-memory [`Dirp`] used by the unit tests.
//!
//! Parameter blocks are stored per handle and echoed back.
//! Any entry point can be forced to fail with a chosen code;
//! failing getters scribble over their out-parameters first.
//! Every call is recorded by name.

use std::{
    cell::{Ref, RefCell, RefMut},
    collections::HashMap,
    mem::size_of,
};

use crate::{native::Dirp, types::*};

#[derive(Debug, Clone, Default)]
pub struct StubImage {
    pub isotherm: Isotherm,
    pub color_bar: ColorBar,
    pub pseudo_color: i32,
    pub enhancement: EnhancementParams,
    pub measurement: MeasurementParams,
}

#[derive(Debug)]
pub struct StubState {
    /// Resolution reported for every image.
    pub resolution: Resolution,
    pub images: HashMap<u64, StubImage>,
    next_handle: u64,
    failures: HashMap<String, i32>,
    calls: Vec<&'static str>,
    pub last_create_size: Option<i32>,
    pub last_buffer_size: Option<i32>,
    pub app_key: Option<String>,
    pub verbose_level: Option<VerboseLevel>,
    pub logger_file: Option<String>,
}

impl Default for StubState {
    fn default() -> Self {
        StubState {
            resolution: Resolution { width: 4, height: 3 },
            images: HashMap::new(),
            next_handle: 1,
            failures: HashMap::new(),
            calls: vec![],
            last_create_size: None,
            last_buffer_size: None,
            app_key: None,
            verbose_level: None,
            logger_file: None,
        }
    }
}

#[derive(Debug, Default)]
pub struct StubDirp {
    state: RefCell<StubState>,
}

impl StubDirp {
    pub fn state(&self) -> Ref<'_, StubState> {
        self.state.borrow()
    }

    pub fn state_mut(&self) -> RefMut<'_, StubState> {
        self.state.borrow_mut()
    }

    /// Make every later call to `op` return `code`.
    pub fn fail(&self, op: &str, code: i32) {
        self.state_mut().failures.insert(op.to_string(), code);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state_mut().calls.clear();
    }

    fn enter(&self, op: &'static str) -> Option<i32> {
        let mut state = self.state_mut();
        state.calls.push(op);
        state.failures.get(op).copied()
    }

    fn with_image<F>(&self, op: &'static str, handle: u64, f: F) -> i32
    where
        F: FnOnce(&mut StubImage),
    {
        if let Some(code) = self.enter(op) {
            return code;
        }
        match self.state_mut().images.get_mut(&handle) {
            Some(image) => {
                f(image);
                DIRP_SUCCESS
            }
            None => RetCode::InvalidHandle.code(),
        }
    }

    fn get<T, F>(&self, op: &'static str, handle: u64, out: &mut T, garbage: T, f: F) -> i32
    where
        F: FnOnce(&StubImage) -> T,
    {
        if let Some(code) = self.enter(op) {
            *out = garbage;
            return code;
        }
        match self.state().images.get(&handle) {
            Some(image) => {
                *out = f(image);
                DIRP_SUCCESS
            }
            None => RetCode::InvalidHandle.code(),
        }
    }

    fn fill<T, F>(
        &self,
        op: &'static str,
        handle: u64,
        buf: &mut [T],
        size: i32,
        channels: usize,
        value: F,
    ) -> i32
    where
        F: Fn(usize) -> T,
    {
        if let Some(code) = self.enter(op) {
            return code;
        }
        let mut state = self.state_mut();
        state.last_buffer_size = Some(size);
        if !state.images.contains_key(&handle) {
            return RetCode::InvalidHandle.code();
        }
        let expected = state.resolution.element_count(channels);
        if expected != Some(buf.len()) || size as usize != buf.len() * size_of::<T>() {
            return RetCode::Size.code();
        }
        for (i, v) in buf.iter_mut().enumerate() {
            *v = value(i);
        }
        DIRP_SUCCESS
    }
}

impl Dirp for StubDirp {
    type Handle = u64;

    fn create_from_rjpeg(&self, data: &[u8], size: i32, handle: &mut u64) -> i32 {
        if let Some(code) = self.enter("create_from_rjpeg") {
            return code;
        }
        let mut state = self.state_mut();
        state.last_create_size = Some(size);
        if size as usize > data.len() {
            return RetCode::Size.code();
        }
        let h = state.next_handle;
        state.next_handle += 1;
        state.images.insert(h, StubImage::default());
        *handle = h;
        DIRP_SUCCESS
    }

    fn destroy(&self, handle: u64) -> i32 {
        if let Some(code) = self.enter("destroy") {
            return code;
        }
        match self.state_mut().images.remove(&handle) {
            Some(_) => DIRP_SUCCESS,
            None => RetCode::InvalidHandle.code(),
        }
    }

    fn get_api_version(&self, version: &mut ApiVersion) -> i32 {
        if let Some(code) = self.enter("get_api_version") {
            version.api = 0xdead;
            return code;
        }
        *version = ApiVersion {
            api: 0x0103_0000,
            magic: *b"DIRP\0\0\0\0",
        };
        DIRP_SUCCESS
    }

    fn get_rjpeg_version(&self, handle: u64, version: &mut RjpegVersion) -> i32 {
        let garbage = RjpegVersion { rjpeg: 7, header: 7, curve: 7 };
        self.get("get_rjpeg_version", handle, version, garbage, |_| RjpegVersion {
            rjpeg: 0x0001_0000,
            header: 0x0002_0000,
            curve: 0x0001_0000,
        })
    }

    fn get_rjpeg_resolution(&self, handle: u64, resolution: &mut Resolution) -> i32 {
        let garbage = Resolution { width: 7, height: 7 };
        let current = self.state().resolution;
        self.get("get_rjpeg_resolution", handle, resolution, garbage, |_| current)
    }

    fn get_original_raw(&self, handle: u64, raw: &mut [u16], size: i32) -> i32 {
        self.fill("get_original_raw", handle, raw, size, 1, |i| i as u16)
    }

    fn process(&self, handle: u64, color_image: &mut [u8], size: i32) -> i32 {
        self.fill("process", handle, color_image, size, 3, |i| (i % 256) as u8)
    }

    fn process_stretch(&self, handle: u64, stretch: &mut [f32], size: i32) -> i32 {
        self.fill("process_stretch", handle, stretch, size, 1, |i| i as f32 / 10.)
    }

    fn measure(&self, handle: u64, temperature: &mut [i16], size: i32) -> i32 {
        self.fill("measure", handle, temperature, size, 1, |i| i as i16)
    }

    fn measure_ex(&self, handle: u64, temperature: &mut [f32], size: i32) -> i32 {
        self.fill("measure_ex", handle, temperature, size, 1, |i| 20. + i as f32)
    }

    fn set_isotherm(&self, handle: u64, isotherm: &Isotherm) -> i32 {
        self.with_image("set_isotherm", handle, |img| img.isotherm = *isotherm)
    }

    fn get_isotherm(&self, handle: u64, isotherm: &mut Isotherm) -> i32 {
        let garbage = Isotherm { enable: true, high: 7., low: 7. };
        self.get("get_isotherm", handle, isotherm, garbage, |img| img.isotherm)
    }

    fn set_color_bar(&self, handle: u64, color_bar: &ColorBar) -> i32 {
        self.with_image("set_color_bar", handle, |img| img.color_bar = *color_bar)
    }

    fn get_color_bar(&self, handle: u64, color_bar: &mut ColorBar) -> i32 {
        let garbage = ColorBar { manual_enable: true, high: 7., low: 7. };
        self.get("get_color_bar", handle, color_bar, garbage, |img| img.color_bar)
    }

    fn get_color_bar_adaptive_params(&self, handle: u64, color_bar: &mut ColorBar) -> i32 {
        let garbage = ColorBar { manual_enable: true, high: 7., low: 7. };
        self.get("get_color_bar_adaptive_params", handle, color_bar, garbage, |_| ColorBar {
            manual_enable: false,
            high: 38.5,
            low: 12.25,
        })
    }

    fn set_pseudo_color(&self, handle: u64, pseudo_color: i32) -> i32 {
        self.with_image("set_pseudo_color", handle, |img| img.pseudo_color = pseudo_color)
    }

    fn get_pseudo_color(&self, handle: u64, pseudo_color: &mut i32) -> i32 {
        self.get("get_pseudo_color", handle, pseudo_color, 7, |img| img.pseudo_color)
    }

    fn get_pseudo_color_lut(&self, lut: &mut PseudoColorLut) -> i32 {
        if let Some(code) = self.enter("get_pseudo_color_lut") {
            lut.red = vec![vec![7; 3]];
            return code;
        }
        let rows = |f: &dyn Fn(usize, usize) -> u8| -> Vec<Vec<u8>> {
            (0..PSEUDO_COLOR_NUM)
                .map(|i| (0..PSEUDO_COLOR_LUT_DEPTH).map(|j| f(i, j)).collect())
                .collect()
        };
        *lut = PseudoColorLut {
            red: rows(&|_: usize, j: usize| j as u8),
            green: rows(&|_: usize, j: usize| 255 - j as u8),
            blue: rows(&|i: usize, _: usize| (i * 25) as u8),
        };
        DIRP_SUCCESS
    }

    fn set_enhancement_params(&self, handle: u64, params: &EnhancementParams) -> i32 {
        self.with_image("set_enhancement_params", handle, |img| img.enhancement = *params)
    }

    fn get_enhancement_params(&self, handle: u64, params: &mut EnhancementParams) -> i32 {
        let garbage = EnhancementParams { brightness: 7 };
        self.get("get_enhancement_params", handle, params, garbage, |img| img.enhancement)
    }

    fn set_measurement_params(&self, handle: u64, params: &MeasurementParams) -> i32 {
        self.with_image("set_measurement_params", handle, |img| img.measurement = *params)
    }

    fn get_measurement_params(&self, handle: u64, params: &mut MeasurementParams) -> i32 {
        let garbage = MeasurementParams {
            distance: 7.,
            humidity: 7.,
            emissivity: 7.,
            reflection: 7.,
        };
        self.get("get_measurement_params", handle, params, garbage, |img| img.measurement)
    }

    fn register_app(&self, key: &str) -> i32 {
        if let Some(code) = self.enter("register_app") {
            return code;
        }
        self.state_mut().app_key = Some(key.to_string());
        DIRP_SUCCESS
    }

    fn set_verbose_level(&self, level: VerboseLevel) {
        self.enter("set_verbose_level");
        self.state_mut().verbose_level = Some(level);
    }

    fn set_logger_file(&self, file_name: &str) {
        self.enter("set_logger_file");
        self.state_mut().logger_file = Some(file_name.to_string());
    }
}
