use anyhow::Result;
use serde_derive::*;
use tracing::warn;

use rjpeg::cli::{init_logging, open_bridge, read_paths_par, sdk_args, sdk_config, InputFile};
use rjpeg::{arg, args_parser, dji::DjiThermal, Bridge, RJpeg};
use rjpeg::{ColorBar, EnhancementParams, Isotherm, MeasurementParams, PseudoColor, RjpegVersion};

#[derive(Serialize, Debug)]
struct ImageInfo {
    path: String,
    width: usize,
    height: usize,
    version: RjpegVersion,
    pseudo_color: PseudoColor,
    isotherm: Isotherm,
    color_bar: ColorBar,
    adaptive_color_bar: ColorBar,
    enhancement: EnhancementParams,
    measurement: MeasurementParams,
}

impl ImageInfo {
    fn from_bytes(bridge: &Bridge<DjiThermal>, path: String, data: &[u8]) -> Result<Self> {
        let rj = RJpeg::try_from_bytes(bridge, data)?;
        let (width, height) = rj.dimensions()?;
        let info = ImageInfo {
            path,
            width,
            height,
            version: rj.version()?,
            pseudo_color: rj.pseudo_color()?,
            isotherm: rj.isotherm()?,
            color_bar: rj.color_bar()?,
            adaptive_color_bar: rj.adaptive_color_bar()?,
            enhancement: rj.enhancement_params()?,
            measurement: rj.measurement_params()?,
        };
        rj.close()?;
        Ok(info)
    }
}

fn main() -> Result<()> {
    init_logging();

    let matches = sdk_args(
        args_parser!("rjpeg-info")
            .about("Print R-JPEG versions and processing parameters as JSON lines."),
    )
    .arg(
        arg!("paths")
            .required(true)
            .multiple(true)
            .help("R-JPEG paths"),
    )
    .get_matches();

    let bridge = open_bridge(&sdk_config(&matches)?)?;
    if let Some(version) = bridge.get_api_version() {
        println!("{}", serde_json::to_string(&version)?);
    }

    let paths = matches
        .values_of("paths")
        .map(|v| v.map(String::from).collect())
        .unwrap_or_default();

    for InputFile { filename, data } in read_paths_par(paths) {
        let info =
            data.and_then(|data| ImageInfo::from_bytes(&bridge, filename.clone(), &data));
        match info {
            Ok(info) => println!("{}", serde_json::to_string(&info)?),
            Err(e) => warn!(path = %filename, "{:#}", e),
        }
    }
    Ok(())
}
