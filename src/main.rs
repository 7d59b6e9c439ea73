use std::fmt;

use structopt::StructOpt;

mod capture;
mod convert;
mod farbfeld;
mod monitors;
mod request;

use request::CaptureRequest;

/// A rectangle of the root window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub(crate) struct Rect {
    /// The lowest x position.
    pub(crate) x: i32,
    /// The lowest y position.
    pub(crate) y: i32,
    /// The width of the rectangle.
    pub(crate) width: u32,
    /// The height of the rectangle.
    pub(crate) height: u32,
}

impl Rect {
    /// The x position just past the right edge.
    pub(crate) fn right(self) -> i32 {
        self.x + self.width as i32
    }

    /// The y position just past the bottom edge.
    pub(crate) fn bottom(self) -> i32 {
        self.y + self.height as i32
    }

    /// Whether the rectangle covers no pixels.
    pub(crate) fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Rect {
            x,
            y,
            width,
            height,
        } = self;
        write!(f, "{{ x: {x}, y: {y}, w: {width}, h: {height} }}")
    }
}

/// Takes a screenshot of an X display and writes it to stdout as farbfeld.
///
/// Without words the whole screen is captured. `start N` and `end M` capture
/// from the top-left corner of monitor N to the bottom-right corner of
/// monitor M; a missing bound, or one given as -1, defaults to the other one.
#[derive(Debug, StructOpt)]
#[structopt(
    setting = structopt::clap::AppSettings::AllowNegativeNumbers,
    after_help = "Every failure, including a failed connection, exits with status 1."
)]
struct Config {
    /// the X display to connect to, defaults to $DISPLAY
    #[structopt(long)]
    display: Option<String>,
    /// print the connected monitors as JSON instead of taking a screenshot
    #[structopt(long)]
    list_monitors: bool,
    /// log more, can be repeated
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
    /// `start N`, `end N` or `draw`
    words: Vec<String>,
}

/// Sets up logging to stderr, raising the level once per `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Error,
        1 => log::LevelFilter::Warn,
        2 => log::LevelFilter::Info,
        3 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_args();
    init_logging(config.verbose);

    let request = CaptureRequest::from_words(&config.words);
    log::debug!("request: {request:?}");

    let display = capture::Display::connect(config.display.as_deref())?;

    if config.list_monitors {
        let monitors = monitors::enumerate(display.conn(), display.root())?;
        println!("{}", monitors::to_json(&monitors)?);
        return Ok(());
    }

    let rect = match request {
        CaptureRequest::Screen => display.root_rect()?,
        CaptureRequest::Monitors { start, end } => {
            let monitors = monitors::enumerate(display.conn(), display.root())?;
            monitors::span(&monitors, start, end)?
        }
        CaptureRequest::Draw => anyhow::bail!("drawing a capture region is not implemented"),
    };
    log::info!("capturing {rect}");

    let raw = display.take_screenshot(rect)?;
    let visual = display.root_visual()?;
    drop(display);

    let img = convert::to_rgba16(&raw, visual)?;
    drop(raw);

    farbfeld::write(img, std::io::BufWriter::new(std::io::stdout().lock()))
}
