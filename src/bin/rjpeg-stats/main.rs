mod args;

use anyhow::Result;
use args::Args;
use ndarray::Array2;
use rayon::prelude::*;
use serde_derive::*;
use tracing::{info, warn};

use rjpeg::cli::{init_logging, open_bridge, read_paths_par, InputFile};
use rjpeg::{dji::DjiThermal, stats::Stats, Bridge, MeasurementParams, RJpeg};

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;
    let bridge = open_bridge(&args.sdk)?;

    let mut image_stats = vec![];
    let mut cumulative = Stats::default();
    for InputFile { filename, data } in read_paths_par(args.paths.clone()) {
        let stats =
            data.and_then(|data| ImageStats::from_bytes(&bridge, &args, filename.clone(), &data));
        match stats {
            Ok(stats) => {
                cumulative += &stats.stats;
                image_stats.push(stats);
            }
            Err(e) => warn!(path = %filename, "{:#}", e),
        }
    }
    info!(images = image_stats.len(), "measured");

    #[derive(Debug, Serialize)]
    struct OutputJson {
        image_stats: Vec<ImageStats>,
        cumulative: Stats,
        mean: Option<f64>,
    }

    let mean = cumulative.mean();
    serde_json::to_writer(
        std::io::stdout().lock(),
        &OutputJson {
            image_stats,
            cumulative,
            mean,
        },
    )?;

    Ok(())
}

#[derive(Serialize, Debug)]
pub struct ImageStats {
    path: String,
    width: usize,
    height: usize,
    params: MeasurementParams,
    pub(crate) stats: Stats,
}

impl ImageStats {
    pub fn from_bytes(
        bridge: &Bridge<DjiThermal>,
        args: &Args,
        path: String,
        data: &[u8],
    ) -> Result<Self> {
        let rj = RJpeg::try_from_bytes(bridge, data)?;

        let mut params = rj.measurement_params()?;
        params.distance = args.distance.unwrap_or(params.distance);
        params.humidity = args.humidity.unwrap_or(params.humidity);
        params.emissivity = args.emissivity.unwrap_or(params.emissivity);
        params.reflection = args.reflection.unwrap_or(params.reflection);
        rj.set_measurement_params(&params)?;

        let values = rj.temperatures()?;
        rj.close()?;

        let (height, width) = values.dim();
        Ok(ImageStats {
            path,
            width,
            height,
            params,
            stats: grid_stats(&values),
        })
    }
}

fn grid_stats(values: &Array2<f32>) -> Stats {
    values
        .into_par_iter()
        .fold(Stats::default, |mut acc, val| {
            acc += *val as f64;
            acc
        })
        .reduce(Stats::default, |mut acc, val| {
            acc += &val;
            acc
        })
}
