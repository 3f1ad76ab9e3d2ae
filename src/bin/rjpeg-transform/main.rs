mod args;
mod proc;

use anyhow::Result;
use tracing::{info, warn};

use rjpeg::cli::{init_logging, open_bridge, read_paths_par, InputFile};
use rjpeg::RJpeg;

use crate::{args::Args, proc::transform_image};

fn main() -> Result<()> {
    init_logging();
    let args = Args::from_cmd_line()?;
    std::fs::create_dir_all(&args.output)?;
    let bridge = open_bridge(&args.sdk)?;

    let mut count = 0usize;
    for InputFile { filename, data } in read_paths_par(args.paths.clone()) {
        let outputs = data.and_then(|data| {
            let rj = RJpeg::try_from_bytes(&bridge, &data)?;
            let outputs = transform_image(&rj, filename.as_ref(), &args)?;
            rj.close()?;
            Ok(outputs)
        });
        match outputs {
            Ok(outputs) => {
                info!(path = %filename, color = %outputs.color.display(), "rendered");
                if let Some(raw) = outputs.raw {
                    info!(path = %filename, raw = %raw.display(), "raw written");
                }
                count += 1;
            }
            Err(e) => warn!(path = %filename, "{:#}", e),
        }
    }

    eprintln!("Processed {} images", count);
    Ok(())
}
