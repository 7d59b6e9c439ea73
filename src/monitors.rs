//! Handles resolving monitor geometry through RandR.

use anyhow::Context as _;
use x11rb::{connection::Connection, protocol::randr::ConnectionExt as _, protocol::xproto};

use crate::Rect;

/// An output that is driven by an active CRTC.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub(crate) struct Monitor {
    /// The name of the output.
    pub(crate) name: String,
    /// The area of the root window shown on the output.
    #[serde(flatten)]
    pub(crate) rect: Rect,
}

/// Lists the outputs with an active CRTC in server order.
pub(crate) fn enumerate(
    conn: &impl Connection,
    root: xproto::Window,
) -> anyhow::Result<Vec<Monitor>> {
    let resources = conn
        .randr_get_screen_resources(root)?
        .reply()
        .context("failed to query the RandR screen resources")?;

    let mut monitors = Vec::new();

    for &output in &resources.outputs {
        let info = conn
            .randr_get_output_info(output, resources.config_timestamp)?
            .reply()?;
        let name = String::from_utf8_lossy(&info.name).into_owned();

        if info.crtc == x11rb::NONE {
            log::trace!("skipping output {name} without a CRTC");
            continue;
        }

        let crtc = conn
            .randr_get_crtc_info(info.crtc, resources.config_timestamp)?
            .reply()?;
        let rect = Rect {
            x: crtc.x.into(),
            y: crtc.y.into(),
            width: crtc.width.into(),
            height: crtc.height.into(),
        };

        log::debug!("monitor {}: {name} at {rect}", monitors.len());
        monitors.push(Monitor { name, rect });
    }

    Ok(monitors)
}

/// Looks up the monitor with the given index.
fn get(monitors: &[Monitor], index: i64) -> anyhow::Result<&Monitor> {
    usize::try_from(index)
        .ok()
        .and_then(|index| monitors.get(index))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "monitor index {index} is out of range, {} monitors are connected",
                monitors.len()
            )
        })
}

/// Computes the rectangle from the top-left corner of the `start` monitor
/// to the bottom-right corner of the `end` monitor.
///
/// Monitors between the two anchors are not taken into account.
pub(crate) fn span(monitors: &[Monitor], start: i64, end: i64) -> anyhow::Result<Rect> {
    let first = get(monitors, start)?.rect;
    let last = get(monitors, end)?.rect;

    let extent = |origin: i32, far: i32| u32::try_from(far - origin).unwrap_or(0);

    Ok(Rect {
        x: first.x,
        y: first.y,
        width: extent(first.x, last.right()),
        height: extent(first.y, last.bottom()),
    })
}

/// Renders the monitor list for `--list-monitors`.
pub(crate) fn to_json(monitors: &[Monitor]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(monitors)?)
}
