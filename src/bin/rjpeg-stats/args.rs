use anyhow::Result;
use clap::value_t_or_exit;
use rjpeg::cli::{sdk_args, sdk_config};
use rjpeg::{arg, args_parser, opt, SdkConfig};

pub struct Args {
    pub paths: Vec<String>,
    pub distance: Option<f32>,
    pub humidity: Option<f32>,
    pub emissivity: Option<f32>,
    pub reflection: Option<f32>,
    pub sdk: SdkConfig,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = sdk_args(
            args_parser!("rjpeg-stats").about("Compute temperature stats from R-JPEGs."),
        )
        .arg(
            opt!("distance")
                .short("d")
                .help("Distance to the target in meters (default: from image)"),
        )
        .arg(opt!("humidity").help("Relative humidity in percent (default: from image)"))
        .arg(opt!("emissivity").help("Target emissivity (default: from image)"))
        .arg(
            opt!("reflection")
                .help("Reflected apparent temperature in celsius (default: from image)"),
        )
        .arg(
            arg!("paths")
                .required(true)
                .multiple(true)
                .help("R-JPEG paths"),
        )
        .get_matches();

        let paths = matches
            .values_of("paths")
            .unwrap()
            .map(|f| f.into())
            .collect();
        let float_opt = |name: &str| {
            matches
                .is_present(name)
                .then(|| value_t_or_exit!(matches.value_of(name), f32))
        };

        Ok(Args {
            paths,
            distance: float_opt("distance"),
            humidity: float_opt("humidity"),
            emissivity: float_opt("emissivity"),
            reflection: float_opt("reflection"),
            sdk: sdk_config(&matches)?,
        })
    }
}
