//! Command-line configuration, with `CLIPVIEW_*` environment fallbacks.

use anyhow::bail;
use clap::Parser;
use clipview_core::DEFAULT_SURFACE_WIDTH;
use url::Url;

use crate::logging::LogDestination;

pub const DEFAULT_SERVER: &str = "http://localhost:8000/";
pub const DEFAULT_PLATFORM: &str = "auto";

/// Submit a video for clipping and follow the job until it settles.
#[derive(Parser, Debug)]
#[command(name = "clipview", author, version, about, long_about = None)]
pub struct Cli {
    /// Video URL to submit
    pub video_url: String,

    /// Origin of the job processor; also serves /proxy-thumbnail
    #[arg(long, env = "CLIPVIEW_SERVER", default_value = DEFAULT_SERVER)]
    pub server: Url,

    /// Source platform hint passed to the processor
    #[arg(short, long, env = "CLIPVIEW_PLATFORM", default_value = DEFAULT_PLATFORM)]
    pub platform: String,

    /// Preview surface width in pixels
    #[arg(
        short,
        long,
        env = "CLIPVIEW_WIDTH",
        default_value_t = DEFAULT_SURFACE_WIDTH,
        value_parser = parse_width
    )]
    pub width: f64,

    /// Where log output goes
    #[arg(
        long,
        env = "CLIPVIEW_LOG",
        value_enum,
        ignore_case = true,
        default_value_t = LogDestination::Terminal
    )]
    pub log: LogDestination,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub video_url: String,
    pub server: Url,
    pub platform: String,
    pub surface_width: f64,
    pub log: LogDestination,
}

impl AppConfig {
    /// Parse the process command line; `--help` and usage errors exit here.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::try_from(Cli::parse())
    }
}

impl TryFrom<Cli> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> anyhow::Result<Self> {
        let video_url = cli.video_url.trim().to_string();
        if video_url.is_empty() {
            bail!("video url must not be blank");
        }
        if cli.server.cannot_be_a_base() {
            bail!("server url '{}' cannot be used as an origin", cli.server);
        }
        let platform = match cli.platform.trim() {
            "" => DEFAULT_PLATFORM.to_string(),
            platform => platform.to_string(),
        };

        Ok(Self {
            video_url,
            server: cli.server,
            platform,
            surface_width: cli.width,
            log: cli.log,
        })
    }
}

fn parse_width(raw: &str) -> Result<f64, String> {
    let width: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if width.is_finite() && width > 0.0 {
        Ok(width)
    } else {
        Err(format!("width must be positive, got {raw}"))
    }
}
