//! Handles writing farbfeld images.

use std::io::Write;

use anyhow::Context as _;
use image::{codecs::farbfeld::FarbfeldEncoder, DynamicImage};

use crate::convert::Rgba16Image;

/// Writes the image as farbfeld and flushes the writer.
pub(crate) fn write<W: Write>(img: Rgba16Image, mut out: W) -> anyhow::Result<()> {
    let (width, height) = img.dimensions();
    // the encoder takes native endian samples and swaps them itself
    let img = DynamicImage::ImageRgba16(img);

    FarbfeldEncoder::new(&mut out)
        .encode(img.as_bytes(), width, height)
        .context("failed to write the farbfeld image")?;
    out.flush().context("failed to write the farbfeld image")?;

    Ok(())
}
