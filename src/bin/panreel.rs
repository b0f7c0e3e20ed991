use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "panreel", version, about = "Scrolling panorama videos from a folder of images")]
struct Cli {
    /// Log debug details (timeline numbers, encoder setup).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Print the computed timeline as JSON.
    Plan(PlanArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct InputArgs {
    /// Folder with the source images.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// JSON configuration; omitted fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Soundtrack looped and trimmed to the video length.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Soundtrack fade-out in seconds.
    #[arg(long, requires = "audio")]
    fade: Option<f64>,

    /// Outro caption.
    #[arg(long)]
    text: Option<String>,

    /// Outro logo image.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Scroll speed in pixels per frame.
    #[arg(long)]
    speed: Option<f64>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    input: InputArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<panreel::ReelConfig> {
    Ok(match path {
        Some(p) => panreel::ReelConfig::from_path(p)?,
        None => panreel::ReelConfig::default(),
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.input.config.as_deref())?;
    if let Some(path) = args.audio {
        let fade_out_secs = args
            .fade
            .or(cfg.audio.as_ref().map(|a| a.fade_out_secs))
            .unwrap_or(2.0);
        cfg.audio = Some(panreel::AudioConfig {
            path,
            fade_out_secs,
        });
    }
    if let Some(text) = args.text {
        let mut t = cfg.outro_text.take().unwrap_or(panreel::TextOverlayConfig {
            text: String::new(),
            font_size: 64.0,
            color: panreel::Rgb8::WHITE,
            font_file: None,
        });
        t.text = text;
        cfg.outro_text = Some(t);
    }
    if let Some(path) = args.logo {
        let scale = cfg.logo.as_ref().map_or(1.0, |l| l.scale);
        cfg.logo = Some(panreel::LogoConfig { path, scale });
    }
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if let Some(speed) = args.speed {
        cfg.scroll_px_per_frame = speed;
    }

    let report = panreel::render_reel(
        &args.input.in_dir,
        cfg,
        &panreel::LogProgress::new(),
        &panreel::CancelToken::new(),
    )?;
    for w in &report.warnings {
        eprintln!("warning: {w}");
    }
    println!("{}", report.output.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.input.config.as_deref())?;
    let reel = panreel::PreparedReel::from_dir(&args.input.in_dir, cfg)?;
    let json = serde_json::to_string_pretty(reel.timeline()).context("serialize timeline")?;
    println!("{json}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.input.config.as_deref())?;
    let reel = panreel::PreparedReel::from_dir(&args.input.in_dir, cfg)?;
    let frame = reel.render_frame_at(panreel::FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
