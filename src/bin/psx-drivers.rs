use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use psx_drivers::{
    DriverConfig, FrameSubmission, HalEvent, PixelFormat, SoftwareConsole, VideoDriver,
    VideoHandle,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "psx-drivers", version)]
struct Cli {
    /// Driver settings JSON; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Present one frame through the video pipeline and save the screenshot as PNG.
    Frame(FrameArgs),
    /// Present a menu texture instead of a game frame.
    Menu(MenuArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Raw frame file. A generated checkerboard is used when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Frame width in pixels.
    #[arg(long, default_value_t = 320)]
    width: u32,

    /// Frame height in pixels.
    #[arg(long, default_value_t = 240)]
    height: u32,

    /// Bytes per row; tightly packed when omitted.
    #[arg(long)]
    pitch: Option<usize>,

    /// Pixel encoding of the input.
    #[arg(long, value_enum, default_value_t = FormatChoice::Argb8888)]
    format: FormatChoice,

    /// Bilinear filtering.
    #[arg(long)]
    smooth: bool,

    /// On-screen message.
    #[arg(long)]
    message: Option<String>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct MenuArgs {
    /// Raw ARGB8888 texture; a generated checkerboard is used when omitted.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Texture width in pixels.
    #[arg(long, default_value_t = 64)]
    width: u32,

    /// Texture height in pixels.
    #[arg(long, default_value_t = 64)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Rgb565,
    Argb8888,
}

impl From<FormatChoice> for PixelFormat {
    fn from(f: FormatChoice) -> Self {
        match f {
            FormatChoice::Rgb565 => PixelFormat::Rgb565,
            FormatChoice::Argb8888 => PixelFormat::Argb8888,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => DriverConfig::from_path(path)
            .with_context(|| format!("load settings '{}'", path.display()))?,
        None => DriverConfig::default(),
    };
    match cli.cmd {
        Command::Frame(args) => cmd_frame(config, args),
        Command::Menu(args) => cmd_menu(config, args),
    }
}

fn cmd_frame(mut config: DriverConfig, args: FrameArgs) -> anyhow::Result<()> {
    let format = PixelFormat::from(args.format);
    config.video.smooth |= args.smooth;
    config.video.rgb32 = format == PixelFormat::Argb8888;

    let bpp = format.bytes_per_pixel();
    let data = match &args.in_path {
        Some(path) => read_raw(path)?,
        None => checkerboard(args.width, args.height, format),
    };
    let pitch = args.pitch.unwrap_or(args.width as usize * bpp);

    let mut video = VideoHandle::init(SoftwareConsole::new(), &config.video);
    let mut submission = FrameSubmission::new(&data, args.width, args.height, pitch, format);
    if let Some(msg) = args.message.as_deref() {
        submission = submission.with_message(msg);
    }
    if !video.render(&submission) {
        anyhow::bail!(
            "frame rejected: {}x{} at pitch {pitch} does not fit {} bytes",
            args.width,
            args.height,
            data.len()
        );
    }
    save_screenshot(&video, &args.out)
}

fn cmd_menu(config: DriverConfig, args: MenuArgs) -> anyhow::Result<()> {
    let data = match &args.in_path {
        Some(path) => read_raw(path)?,
        None => checkerboard(args.width, args.height, PixelFormat::Argb8888),
    };

    let mut video = VideoHandle::init(SoftwareConsole::new(), &config.video);
    video.set_texture(&data, true, args.width, args.height, 1.0);
    video.set_texture_enabled(true);
    video.render(&FrameSubmission::dupe());
    save_screenshot(&video, &args.out)
}

fn read_raw(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read frame '{}'", path.display()))
}

fn save_screenshot(video: &VideoHandle<SoftwareConsole>, out: &Path) -> anyhow::Result<()> {
    let shot = video
        .read_frame()
        .context("no frame was presented")?;
    shot.save(out)
        .with_context(|| format!("write png '{}'", out.display()))?;

    if let Some(HalEvent::Upload { fingerprint, .. }) = video
        .driver()
        .and_then(|v| v.hal().events().last().cloned())
    {
        println!("{} xxh3={fingerprint:016x}", out.display());
    }
    Ok(())
}

/// 8-pixel checkerboard in `format`.
fn checkerboard(width: u32, height: u32, format: PixelFormat) -> Vec<u8> {
    let (light, dark): (&[u8], &[u8]) = match format {
        PixelFormat::Rgb565 => (&[0xFF, 0xFF], &[0x00, 0x00]),
        _ => (&[0xFF, 0xFF, 0xFF, 0xFF], &[0x00, 0x00, 0x00, 0xFF]),
    };
    let mut out = Vec::with_capacity(width as usize * height as usize * light.len());
    for y in 0..height {
        for x in 0..width {
            let cell = ((x / 8) + (y / 8)) % 2 == 0;
            out.extend_from_slice(if cell { light } else { dark });
        }
    }
    out
}
