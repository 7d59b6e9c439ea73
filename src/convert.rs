//! Converts captured framebuffers into 16 bit RGBA.

use image::{ImageBuffer, Rgba};

/// An image with four 16 bit channels per pixel.
pub(crate) type Rgba16Image = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// The channel masks of the root visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Visual {
    /// The bits holding the red channel.
    pub(crate) red_mask: u32,
    /// The bits holding the green channel.
    pub(crate) green_mask: u32,
    /// The bits holding the blue channel.
    pub(crate) blue_mask: u32,
}

/// The order of the bytes making up a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteOrder {
    /// Least significant byte first.
    Lsb,
    /// Most significant byte first.
    Msb,
}

impl From<x11rb::protocol::xproto::ImageOrder> for ByteOrder {
    fn from(order: x11rb::protocol::xproto::ImageOrder) -> Self {
        if order == x11rb::protocol::xproto::ImageOrder::MSB_FIRST {
            ByteOrder::Msb
        } else {
            ByteOrder::Lsb
        }
    }
}

/// A captured image in the server's packed pixel format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawImage {
    /// The width in pixels.
    pub(crate) width: u32,
    /// The height in pixels.
    pub(crate) height: u32,
    /// The bits per pixel.
    pub(crate) bits_per_pixel: u8,
    /// The length of one row in bytes, including padding.
    pub(crate) stride: usize,
    /// The byte order of each pixel.
    pub(crate) byte_order: ByteOrder,
    /// The pixel data.
    pub(crate) data: Vec<u8>,
}

impl RawImage {
    /// Creates an image without any pixels.
    pub(crate) fn empty(width: u32, height: u32) -> Self {
        RawImage {
            width,
            height,
            bits_per_pixel: 32,
            stride: 0,
            byte_order: ByteOrder::Lsb,
            data: Vec::new(),
        }
    }

    /// Computes the row length of a `ZPixmap` image.
    pub(crate) fn stride_for(width: u32, bits_per_pixel: u8, scanline_pad: u8) -> usize {
        let pad = usize::from(scanline_pad.max(8));
        let bits = width as usize * usize::from(bits_per_pixel);
        bits.div_ceil(pad) * pad / 8
    }

    /// Reads the packed value of the pixel at the given position.
    ///
    /// The position and the data length must have been checked beforehand.
    fn pixel(&self, x: u32, y: u32) -> u32 {
        let bytes = usize::from(self.bits_per_pixel / 8);
        let offset = y as usize * self.stride + x as usize * bytes;
        let bytes = &self.data[offset..offset + bytes];

        match self.byte_order {
            ByteOrder::Lsb => bytes
                .iter()
                .rev()
                .fold(0, |acc, &byte| (acc << 8) | u32::from(byte)),
            ByteOrder::Msb => bytes
                .iter()
                .fold(0, |acc, &byte| (acc << 8) | u32::from(byte)),
        }
    }
}

/// The shifts and scale factors expanding each channel to 16 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Expansion {
    /// The position of the lowest red bit.
    red_shift: u32,
    /// The position of the lowest green bit.
    green_shift: u32,
    /// The factor taking red to the 16 bit range.
    red_scale: u32,
    /// The factor taking green to the 16 bit range.
    green_scale: u32,
    /// The factor taking blue to the 16 bit range.
    blue_scale: u32,
}

impl Expansion {
    /// Picks the expansion for the given bits per pixel.
    fn for_bpp(bits_per_pixel: u8) -> anyhow::Result<Self> {
        match bits_per_pixel {
            // only 5-6-5 is supported
            16 => Ok(Expansion {
                red_shift: 11,
                green_shift: 5,
                red_scale: 2047,
                green_scale: 1023,
                blue_scale: 2047,
            }),
            // alpha bits of 32 bit images are ignored
            24 | 32 => Ok(Expansion {
                red_shift: 16,
                green_shift: 8,
                red_scale: 257,
                green_scale: 257,
                blue_scale: 257,
            }),
            bpp => anyhow::bail!("unsupported bpp: {bpp}"),
        }
    }

    /// Maps a packed pixel to RGBA16.
    fn apply(self, pixel: u32, visual: Visual) -> Rgba<u16> {
        let channel = |mask: u32, shift: u32, scale: u32| {
            ((pixel & mask) >> shift).wrapping_mul(scale) as u16
        };

        Rgba([
            channel(visual.red_mask, self.red_shift, self.red_scale),
            channel(visual.green_mask, self.green_shift, self.green_scale),
            channel(visual.blue_mask, 0, self.blue_scale),
            u16::MAX,
        ])
    }
}

/// Converts a captured image to RGBA16 using the masks of the given visual.
pub(crate) fn to_rgba16(raw: &RawImage, visual: Visual) -> anyhow::Result<Rgba16Image> {
    if raw.width == 0 || raw.height == 0 {
        return Ok(Rgba16Image::new(raw.width, raw.height));
    }

    let expansion = Expansion::for_bpp(raw.bits_per_pixel)?;

    let row_bytes = raw.width as usize * usize::from(raw.bits_per_pixel / 8);
    if raw.stride < row_bytes {
        anyhow::bail!(
            "row stride of {} bytes is too short for {} pixels",
            raw.stride,
            raw.width
        );
    }
    let needed = (raw.height as usize - 1) * raw.stride + row_bytes;
    if raw.data.len() < needed {
        anyhow::bail!(
            "image data holds {} bytes, but {needed} are needed",
            raw.data.len()
        );
    }

    Ok(ImageBuffer::from_fn(raw.width, raw.height, |x, y| {
        expansion.apply(raw.pixel(x, y), visual)
    }))
}
