//! Handles taking screenshots through the X server.

use anyhow::Context as _;
use x11rb::{
    connection::Connection,
    protocol::xproto::{self, ConnectionExt as _},
    rust_connection::RustConnection,
};

use crate::{
    convert::{RawImage, Visual},
    Rect,
};

/// An open connection to the X server together with its chosen screen.
pub(crate) struct Display {
    /// The connection to the server.
    conn: RustConnection,
    /// The index of the screen in the setup block.
    screen_num: usize,
}

impl Display {
    /// Connects to the named display, or to `$DISPLAY` if no name is given.
    pub(crate) fn connect(name: Option<&str>) -> anyhow::Result<Self> {
        let (conn, screen_num) = x11rb::connect(name).with_context(|| match name {
            Some(name) => format!("failed to connect to display {name}"),
            None => "failed to connect to the X server".to_owned(),
        })?;

        log::info!("connected to screen {screen_num}");

        Ok(Display { conn, screen_num })
    }

    /// The connection to the server.
    pub(crate) fn conn(&self) -> &RustConnection {
        &self.conn
    }

    /// The screen in use.
    pub(crate) fn screen(&self) -> &xproto::Screen {
        &self.conn.setup().roots[self.screen_num]
    }

    /// The root window of the screen in use.
    pub(crate) fn root(&self) -> xproto::Window {
        self.screen().root
    }

    /// Looks up the channel masks of the root visual.
    pub(crate) fn root_visual(&self) -> anyhow::Result<Visual> {
        let screen = self.screen();

        screen
            .allowed_depths
            .iter()
            .flat_map(|depth| &depth.visuals)
            .find(|visual| visual.visual_id == screen.root_visual)
            .map(|visual| Visual {
                red_mask: visual.red_mask,
                green_mask: visual.green_mask,
                blue_mask: visual.blue_mask,
            })
            .ok_or_else(|| anyhow::anyhow!("root visual {} not found", screen.root_visual))
    }

    /// Returns the rectangle covering the whole root window.
    pub(crate) fn root_rect(&self) -> anyhow::Result<Rect> {
        let geometry = self
            .conn
            .get_geometry(self.root())?
            .reply()
            .context("failed to query the root window geometry")?;

        Ok(Rect {
            x: 0,
            y: 0,
            width: geometry.width.into(),
            height: geometry.height.into(),
        })
    }

    /// Takes a screenshot of the given rectangle of the root window.
    pub(crate) fn take_screenshot(&self, rect: Rect) -> anyhow::Result<RawImage> {
        if rect.is_empty() {
            log::warn!("capture region {rect} is empty");
            return Ok(RawImage::empty(rect.width, rect.height));
        }

        let Rect {
            x,
            y,
            width,
            height,
        } = rect;
        let coord = |value: i32| {
            i16::try_from(value).with_context(|| format!("coordinate {value} is out of range"))
        };
        let extent = |value: u32| {
            u16::try_from(value).with_context(|| format!("extent {value} is out of range"))
        };

        let reply = self
            .conn
            .get_image(
                xproto::ImageFormat::Z_PIXMAP,
                self.root(),
                coord(x)?,
                coord(y)?,
                extent(width)?,
                extent(height)?,
                !0,
            )?
            .reply()
            .with_context(|| format!("failed to capture {rect}"))?;

        let setup = self.conn.setup();
        let format = setup
            .pixmap_formats
            .iter()
            .find(|format| format.depth == reply.depth)
            .ok_or_else(|| anyhow::anyhow!("no pixmap format for depth {}", reply.depth))?;

        log::debug!(
            "captured depth {} at {} bpp, scanline pad {}",
            reply.depth,
            format.bits_per_pixel,
            format.scanline_pad
        );

        Ok(RawImage {
            width,
            height,
            bits_per_pixel: format.bits_per_pixel,
            stride: RawImage::stride_for(width, format.bits_per_pixel, format.scanline_pad),
            byte_order: setup.image_byte_order.into(),
            data: reply.data,
        })
    }
}
