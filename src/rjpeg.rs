//! Owning wrapper around a single bridge handle.
//!
//! [`RJpeg`] turns the absent/raw-code conventions of the
//! [`Bridge`] into `anyhow` errors and shapes buffers into
//! `ndarray` arrays indexed `(row, col)`. The handle is
//! destroyed by [`RJpeg::close`], or on drop if still open.
use std::{convert::TryFrom, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use ndarray::{Array2, Array3};
use tracing::warn;

use crate::{arena::Handle, bridge::Bridge, native::Dirp, types::*};

pub struct RJpeg<'b, D: Dirp> {
    bridge: &'b Bridge<D>,
    handle: Option<Handle>,
}

impl<'b, D: Dirp> RJpeg<'b, D> {
    pub fn try_from_path(bridge: &'b Bridge<D>, path: &Path) -> Result<Self> {
        let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Self::try_from_bytes(bridge, &data)
    }

    pub fn try_from_bytes(bridge: &'b Bridge<D>, bytes: &[u8]) -> Result<Self> {
        let handle = bridge
            .create_from_rjpeg(bytes, bytes.len())
            .ok_or_else(|| anyhow!("could not parse rjpeg!"))?;
        Ok(RJpeg {
            bridge,
            handle: Some(handle),
        })
    }

    pub fn handle(&self) -> Option<Handle> {
        self.handle
    }

    fn live(&self) -> Result<Handle> {
        self.handle.ok_or_else(|| anyhow!("rjpeg already closed"))
    }

    pub fn version(&self) -> Result<RjpegVersion> {
        self.bridge
            .get_rjpeg_version(self.live()?)
            .ok_or_else(|| anyhow!("could not read rjpeg version!"))
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> Result<(usize, usize)> {
        let resolution = self
            .bridge
            .get_rjpeg_resolution(self.live()?)
            .ok_or_else(|| anyhow!("could not read rjpeg dimensions!"))?;
        if resolution.element_count(1).is_none() {
            bail!("invalid rjpeg dimensions: {:?}", resolution);
        }
        Ok((resolution.width as usize, resolution.height as usize))
    }

    pub fn raw(&self) -> Result<Array2<u16>> {
        let values = self
            .bridge
            .get_original_raw(self.live()?)
            .ok_or_else(|| anyhow!("could not read rjpeg raw data!"))?;
        self.grid(values)
    }

    /// Pseudo-color image as `(row, col, channel)`.
    pub fn color_image(&self) -> Result<Array3<u8>> {
        let values = self
            .bridge
            .process(self.live()?)
            .ok_or_else(|| anyhow!("could not process rjpeg!"))?;
        let (width, height) = self.dimensions()?;
        Ok(Array3::from_shape_vec((height, width, 3), values)?)
    }

    pub fn stretched(&self) -> Result<Array2<f32>> {
        let values = self
            .bridge
            .process_stretch(self.live()?)
            .ok_or_else(|| anyhow!("could not stretch rjpeg!"))?;
        self.grid(values)
    }

    /// Temperatures in tenths of a degree celsius.
    pub fn temperatures_decicelsius(&self) -> Result<Array2<i16>> {
        let values = self
            .bridge
            .measure(self.live()?)
            .ok_or_else(|| anyhow!("could not calculate rjpeg temperatures!"))?;
        self.grid(values)
    }

    /// Temperatures in degrees celsius.
    pub fn temperatures(&self) -> Result<Array2<f32>> {
        let values = self
            .bridge
            .measure_ex(self.live()?)
            .ok_or_else(|| anyhow!("could not calculate rjpeg temperatures!"))?;
        self.grid(values)
    }

    fn grid<T>(&self, values: Vec<T>) -> Result<Array2<T>> {
        let (width, height) = self.dimensions()?;
        Ok(Array2::from_shape_vec((height, width), values)?)
    }

    pub fn measurement_params(&self) -> Result<MeasurementParams> {
        self.bridge
            .get_measurement_params(self.live()?)
            .ok_or_else(|| anyhow!("could not read measurement params!"))
    }

    pub fn set_measurement_params(&self, params: &MeasurementParams) -> Result<()> {
        let ret = self.bridge.set_measurement_params(self.live()?, params);
        RetCode::check(ret).context("could not set measurement params")
    }

    pub fn isotherm(&self) -> Result<Isotherm> {
        self.bridge
            .get_isotherm(self.live()?)
            .ok_or_else(|| anyhow!("could not read isotherm!"))
    }

    pub fn set_isotherm(&self, isotherm: &Isotherm) -> Result<()> {
        let ret = self.bridge.set_isotherm(self.live()?, isotherm);
        RetCode::check(ret).context("could not set isotherm")
    }

    pub fn color_bar(&self) -> Result<ColorBar> {
        self.bridge
            .get_color_bar(self.live()?)
            .ok_or_else(|| anyhow!("could not read color bar!"))
    }

    pub fn adaptive_color_bar(&self) -> Result<ColorBar> {
        self.bridge
            .get_color_bar_adaptive_params(self.live()?)
            .ok_or_else(|| anyhow!("could not read adaptive color bar!"))
    }

    pub fn set_color_bar(&self, color_bar: &ColorBar) -> Result<()> {
        let ret = self.bridge.set_color_bar(self.live()?, color_bar);
        RetCode::check(ret).context("could not set color bar")
    }

    pub fn pseudo_color(&self) -> Result<PseudoColor> {
        self.bridge
            .get_pseudo_color(self.live()?)
            .ok_or_else(|| anyhow!("could not read pseudo color!"))
    }

    pub fn set_pseudo_color(&self, pseudo_color: PseudoColor) -> Result<()> {
        let ret = self.bridge.set_pseudo_color(self.live()?, pseudo_color);
        RetCode::check(ret).with_context(|| format!("could not set pseudo color {}", pseudo_color))
    }

    pub fn enhancement_params(&self) -> Result<EnhancementParams> {
        self.bridge
            .get_enhancement_params(self.live()?)
            .ok_or_else(|| anyhow!("could not read enhancement params!"))
    }

    pub fn set_enhancement_params(&self, params: &EnhancementParams) -> Result<()> {
        let ret = self.bridge.set_enhancement_params(self.live()?, params);
        RetCode::check(ret).context("could not set enhancement params")
    }

    /// Destroy the handle, reporting the native status.
    pub fn close(mut self) -> Result<()> {
        let handle = self.live()?;
        self.handle = None;
        RetCode::check(self.bridge.destroy(handle)).context("could not destroy rjpeg")
    }
}

impl<'b, D: Dirp> Drop for RJpeg<'b, D> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let ret = self.bridge.destroy(handle);
            if ret != DIRP_SUCCESS {
                warn!(%handle, ret, "could not destroy rjpeg on drop");
            }
        }
    }
}

impl<'b, D: Dirp> TryFrom<(&'b Bridge<D>, &[u8])> for RJpeg<'b, D> {
    type Error = anyhow::Error;

    fn try_from((bridge, bytes): (&'b Bridge<D>, &[u8])) -> Result<Self> {
        RJpeg::try_from_bytes(bridge, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubDirp;

    fn stub_bridge(width: i32, height: i32) -> Bridge<StubDirp> {
        let stub = StubDirp::default();
        stub.state_mut().resolution = Resolution { width, height };
        Bridge::new(stub)
    }

    #[test]
    fn arrays_are_row_major() -> Result<()> {
        let bridge = stub_bridge(3, 2);
        let rj = RJpeg::try_from_bytes(&bridge, b"rjpeg")?;

        assert_eq!(rj.dimensions()?, (3, 2));

        let raw = rj.raw()?;
        assert_eq!(raw.dim(), (2, 3));
        assert_eq!(raw[(1, 0)], 3);

        let temps = rj.temperatures()?;
        assert_eq!(temps.dim(), (2, 3));
        assert_eq!(temps[(1, 2)], 25.);

        assert_eq!(rj.temperatures_decicelsius()?.dim(), (2, 3));
        assert_eq!(rj.stretched()?.dim(), (2, 3));

        let color = rj.color_image()?;
        assert_eq!(color.dim(), (2, 3, 3));
        assert_eq!(color[(0, 1, 2)], 5);

        rj.close()?;
        assert_eq!(bridge.live_handles(), 0);
        Ok(())
    }

    #[test]
    fn parameters_through_wrapper() -> Result<()> {
        let bridge = stub_bridge(4, 4);
        let rj = RJpeg::try_from((&bridge, &b"rjpeg"[..]))?;

        let params = MeasurementParams {
            distance: 5.,
            humidity: 40.,
            emissivity: 0.9,
            reflection: 20.,
        };
        rj.set_measurement_params(&params)?;
        assert_eq!(rj.measurement_params()?, params);

        rj.set_pseudo_color(PseudoColor::HotIron)?;
        assert_eq!(rj.pseudo_color()?, PseudoColor::HotIron);

        rj.set_enhancement_params(&EnhancementParams { brightness: 12 })?;
        assert_eq!(rj.enhancement_params()?.brightness, 12);

        assert!(!rj.adaptive_color_bar()?.manual_enable);
        Ok(())
    }

    #[test]
    fn native_errors_surface() {
        let bridge = stub_bridge(4, 4);
        let rj = RJpeg::try_from_bytes(&bridge, b"rjpeg").unwrap();

        bridge.native().fail("set_isotherm", RetCode::InvalidParams.code());
        let err = rj.set_isotherm(&Isotherm::default()).unwrap_err();
        assert_eq!(err.downcast_ref::<RetCode>(), Some(&RetCode::InvalidParams));

        bridge.native().fail("measure_ex", RetCode::NotReady.code());
        assert!(rj.temperatures().is_err());

        bridge.native().fail("create_from_rjpeg", RetCode::RjpegParse.code());
        assert!(RJpeg::try_from_bytes(&bridge, b"junk").is_err());
    }

    #[test]
    fn drop_releases_handle() {
        let bridge = stub_bridge(4, 4);
        {
            let _rj = RJpeg::try_from_bytes(&bridge, b"rjpeg").unwrap();
            assert_eq!(bridge.live_handles(), 1);
        }
        assert_eq!(bridge.live_handles(), 0);
        assert!(bridge.native().state().images.is_empty());
    }
}
