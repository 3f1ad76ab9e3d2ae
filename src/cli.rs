//! Helpers shared by the accompanying binaries.
//!
//! APIs here shouldn't be considered stable / used as a
//! library.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
pub use clap::{App, Arg, ArgMatches};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
pub use inflector::Inflector;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::SdkConfig;

#[cfg(feature = "dji")]
use crate::{bridge::Bridge, dji::DjiThermal};

#[macro_export]
macro_rules! args_parser {
    ($name:expr) => {{
        $crate::cli::App::new($name)
            .version(clap::crate_version!())
            .author(clap::crate_authors!())
    }};
}

#[macro_export]
macro_rules! arg {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name).value_name(&$name.to_screaming_snake_case())
    }};
}

#[macro_export]
macro_rules! opt {
    ($name:expr) => {{
        use $crate::cli::Inflector;
        $crate::cli::Arg::with_name($name)
            .long(&$name.to_kebab_case())
            .value_name(&$name.to_screaming_snake_case())
    }};
}

/// Log to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

/// Options configuring the native SDK, common to all
/// binaries.
pub fn sdk_args<'a, 'b>(app: App<'a, 'b>) -> App<'a, 'b> {
    app.arg(
        Arg::with_name("config")
            .long("config")
            .value_name("CONFIG")
            .help("JSON file with `app_key`, `verbose_level`, `logger_file`"),
    )
    .arg(
        Arg::with_name("app key")
            .long("app-key")
            .value_name("APP_KEY")
            .help("Register the SDK with this app key"),
    )
    .arg(
        Arg::with_name("verbose level")
            .long("verbose-level")
            .value_name("VERBOSE_LEVEL")
            .possible_values(&["none", "debug", "detail"])
            .help("Log level of the native SDK"),
    )
    .arg(
        Arg::with_name("logger file")
            .long("logger-file")
            .value_name("LOGGER_FILE")
            .help("File the native SDK logs to"),
    )
}

/// Configuration from `--config`, overridden by the other
/// options of [`sdk_args`].
pub fn sdk_config(matches: &ArgMatches) -> Result<SdkConfig> {
    let base = match matches.value_of("config") {
        Some(path) => SdkConfig::from_json_path(Path::new(path))?,
        None => SdkConfig::default(),
    };
    let overrides = SdkConfig {
        app_key: matches.value_of("app key").map(String::from),
        verbose_level: matches.value_of("verbose level").map(str::parse).transpose()?,
        logger_file: matches.value_of("logger file").map(PathBuf::from),
    };
    Ok(base.merge(overrides))
}

/// Create the SDK bridge and apply `config` to it.
#[cfg(feature = "dji")]
pub fn open_bridge(config: &SdkConfig) -> Result<Bridge<DjiThermal>> {
    let bridge = Bridge::new(DjiThermal);
    config.apply(&bridge)?;
    if let Some(version) = bridge.get_api_version() {
        tracing::info!(api = version.api, "dirp sdk ready");
    }
    Ok(bridge)
}

pub struct InputFile {
    pub filename: String,
    pub data: Result<Vec<u8>>,
}

/// Read `paths` in parallel, in order, with a progress bar.
/// Native calls are not made here; the bridge stays on the
/// caller's thread.
pub fn read_paths_par(paths: Vec<String>) -> Vec<InputFile> {
    let bar = ProgressBar::new(paths.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {wide_bar:cyan/blue} {pos:>7}/{len:7}"),
    );

    paths
        .into_par_iter()
        .progress_with(bar)
        .map(|filename| {
            let data = fs::read(&filename).with_context(|| format!("reading {}", filename));
            InputFile { filename, data }
        })
        .collect()
}
