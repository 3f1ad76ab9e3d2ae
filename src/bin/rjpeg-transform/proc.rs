use super::Args;
use anyhow::{anyhow, Result};
use byteordered::ByteOrdered;
use image::{codecs::tiff::TiffEncoder, ColorType, RgbImage};
use ndarray::{Array2, Array3};
use rjpeg::{dji::DjiThermal, EnhancementParams, RJpeg};
use std::{
    fs::File,
    io::{BufWriter, Cursor},
    path::{Path, PathBuf},
};

pub struct Outputs {
    pub color: PathBuf,
    pub raw: Option<PathBuf>,
}

pub fn output_stem_for(args: &Args, path: &Path) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .ok_or_else(|| anyhow!("no file name in {}", path.display()))?;
    Ok(args.output.join(stem))
}

pub fn transform_image(rj: &RJpeg<'_, DjiThermal>, path: &Path, args: &Args) -> Result<Outputs> {
    if let Some(palette) = args.palette {
        rj.set_pseudo_color(palette)?;
    }
    if let Some(brightness) = args.brightness {
        rj.set_enhancement_params(&EnhancementParams { brightness })?;
    }

    let stem = output_stem_for(args, path)?;
    let color = stem.with_extension("png");
    write_color_png(&rj.color_image()?, &color)?;

    let raw = if args.raw {
        let raw_path = stem.with_extension("tif");
        write_raw_tiff(&rj.raw()?, &raw_path)?;
        Some(raw_path)
    } else {
        None
    };

    Ok(Outputs { color, raw })
}

pub fn write_color_png(image: &Array3<u8>, path: &Path) -> Result<()> {
    let (ht, wid, _) = image.dim();
    let pixels = image.iter().copied().collect();
    let image = RgbImage::from_raw(wid as u32, ht as u32, pixels)
        .ok_or_else(|| anyhow!("color image does not match {}x{}", wid, ht))?;
    image.save(path)?;
    Ok(())
}

pub fn write_raw_tiff(raw: &Array2<u16>, path: &Path) -> Result<()> {
    let (ht, wid) = raw.dim();
    let mut image_buffer = {
        let vec = Vec::with_capacity(2 * ht * wid);
        let cursor = Cursor::new(vec);
        ByteOrdered::native(cursor)
    };
    for val in raw.iter() {
        image_buffer.write_u16(*val)?;
    }

    let image_writer = BufWriter::new(File::create(path)?);
    TiffEncoder::new(image_writer).encode(
        &image_buffer.into_inner().into_inner(),
        wid as u32,
        ht as u32,
        ColorType::L16,
    )?;
    Ok(())
}
