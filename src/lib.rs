//! Safe, handle-scoped access to the DJI Thermal SDK.
//!
//! The SDK (`libdirp`) decodes radiometric R-JPEGs, runs its
//! ISP to produce pseudo-color images, and measures per-pixel
//! temperatures. This crate does none of that itself: it
//! manages native handles, sizes output buffers, and
//! converts between native structures and Rust records.
//!
//! # Usage
//!
//! A [`Bridge`] owns the native library and hands out
//! [`Handle`]s. Queries return `Option` and collapse every
//! native failure to `None`; commands return the raw native
//! status code. See the [`bridge`] module for the details.
//!
//! ```rust,ignore
//! use rjpeg::{dji::DjiThermal, Bridge, DIRP_SUCCESS};
//!
//! let bridge = Bridge::new(DjiThermal);
//! let data = std::fs::read("image.jpg")?;
//! let handle = bridge.create_from_rjpeg(&data, data.len()).expect("r-jpeg");
//! let temps: Option<Vec<f32>> = bridge.measure_ex(handle);
//! assert_eq!(bridge.destroy(handle), DIRP_SUCCESS);
//! ```
//!
//! [`RJpeg`] wraps one handle with `anyhow` errors and
//! `ndarray` outputs, and releases it when dropped:
//!
//! ```rust,ignore
//! use rjpeg::{dji::DjiThermal, Bridge, RJpeg};
//!
//! let bridge = Bridge::new(DjiThermal);
//! let image = RJpeg::try_from_path(&bridge, "image.jpg".as_ref())?;
//! let temps = image.temperatures()?; // (height, width)
//! ```
//!
//! The native backend requires the `dji` feature. Process
//! wide SDK settings (app key, native log level and file)
//! are applied through [`SdkConfig`].

pub mod arena;
pub mod bridge;
pub mod config;
pub mod native;
pub mod rjpeg;
pub mod stats;
pub mod types;

#[cfg(feature = "dji")]
pub mod dji;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(test)]
mod stub;

pub use crate::arena::Handle;
pub use crate::bridge::Bridge;
pub use crate::config::SdkConfig;
pub use crate::native::Dirp;
pub use crate::rjpeg::RJpeg;
pub use crate::types::*;
