use anyhow::Result;
use clap::value_t_or_exit;
use rjpeg::cli::{sdk_args, sdk_config};
use rjpeg::{arg, args_parser, opt, PseudoColor, SdkConfig};
use std::path::PathBuf;

pub struct Args {
    pub paths: Vec<String>,
    pub output: PathBuf,
    pub palette: Option<PseudoColor>,
    pub brightness: Option<i32>,
    pub raw: bool,
    pub sdk: SdkConfig,
}

impl Args {
    pub fn from_cmd_line() -> Result<Args> {
        let matches = sdk_args(
            args_parser!("rjpeg-transform")
                .about("Render R-JPEGs to pseudo-color PNGs (and raw 16-bit TIFFs)."),
        )
        .arg(
            opt!("output")
                .short("o")
                .required(true)
                .help("Output directory"),
        )
        .arg(
            opt!("palette")
                .short("p")
                .help("Pseudo-color scheme, e.g. ironred (default: from image)"),
        )
        .arg(opt!("brightness").help("ISP brightness (default: from image)"))
        .arg(
            opt!("raw")
                .takes_value(false)
                .short("r")
                .help("Also write the original raw data as a 16-bit TIFF"),
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
        let output = value_t_or_exit!(matches, "output", PathBuf);
        let palette = matches
            .is_present("palette")
            .then(|| value_t_or_exit!(matches.value_of("palette"), PseudoColor));
        let brightness = matches
            .is_present("brightness")
            .then(|| value_t_or_exit!(matches.value_of("brightness"), i32));

        Ok(Args {
            paths,
            output,
            palette,
            brightness,
            raw: matches.is_present("raw"),
            sdk: sdk_config(&matches)?,
        })
    }
}
