use std::io::Read as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use typereel::{
    flatten_to_opaque_rgba8, parse_highlight_spec, render_single_frame, render_to_gif,
    AnimationConfig, ChromeStyle, RenderThreading, RenderToGifOpts, Token,
};

#[derive(Parser, Debug)]
#[command(name = "typereel", version, about = "Typing-animation GIFs of code")]
struct Cli {
    /// Log progress at debug level.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an animated GIF of the input being typed.
    Render(RenderArgs),
    /// Render a single animation frame as a PNG (debugging aid).
    Frame(FrameArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WindowStyle {
    None,
    Macos,
    Windows,
}

impl From<WindowStyle> for ChromeStyle {
    fn from(w: WindowStyle) -> Self {
        match w {
            WindowStyle::None => ChromeStyle::None,
            WindowStyle::Macos => ChromeStyle::MacOs,
            WindowStyle::Windows => ChromeStyle::Windows,
        }
    }
}

#[derive(Parser, Debug)]
struct CommonArgs {
    /// Input file; reads stdin when omitted or "-".
    input: Option<PathBuf>,

    /// Color theme (affects the ambient glow tint).
    #[arg(short, long, default_value = "dracula")]
    theme: String,

    /// Typing speed multiplier.
    #[arg(short, long, default_value_t = 1.0)]
    speed: f64,

    /// Image width in pixels.
    #[arg(short, long, default_value_t = 800)]
    width: u32,

    /// Font size.
    #[arg(short, long, default_value_t = 16.0)]
    font_size: f64,

    /// Frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Disable the cursor animation.
    #[arg(long)]
    no_cursor: bool,

    /// Lines to highlight (e.g. '5,7-9').
    #[arg(long)]
    highlight: Option<String>,

    /// Window style.
    #[arg(long, value_enum, default_value = "none")]
    window: WindowStyle,

    /// Double all spatial constants for high-DPI output.
    #[arg(long)]
    hidpi: bool,

    /// Render a line-number gutter.
    #[arg(long)]
    line_numbers: bool,

    /// Explicit monospace font file (a system font is discovered otherwise).
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output GIF path.
    #[arg(short, long, default_value = "code.gif")]
    output: PathBuf,

    /// Enable frame-level parallelism.
    #[arg(long)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Output PNG path.
    #[arg(short, long, default_value = "frame.png")]
    output: PathBuf,
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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn build_config(common: &CommonArgs) -> anyhow::Result<AnimationConfig> {
    let highlighted_lines = match common.highlight.as_deref() {
        Some(spec) => parse_highlight_spec(spec).context("invalid highlight format")?,
        None => Default::default(),
    };

    Ok(AnimationConfig {
        canvas_width: common.width,
        font_size: common.font_size,
        speed: common.speed,
        fps: common.fps,
        cursor: !common.no_cursor,
        highlighted_lines,
        chrome: common.window.into(),
        theme: common.theme.clone(),
        hidpi: common.hidpi,
        line_numbers: common.line_numbers,
        font_path: common.font.clone(),
    })
}

/// Read the input as a single uncolored token; tokenization and styling are
/// the business of an external highlighter feeding the library API.
fn read_tokens(input: Option<&PathBuf>) -> anyhow::Result<Vec<Token>> {
    let text = match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    Ok(vec![Token::plain(text)])
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = build_config(&args.common)?;
    if args.common.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let tokens = read_tokens(args.common.input.as_ref())?;
    let opts = RenderToGifOpts {
        threading: RenderThreading {
            parallel: args.parallel,
            threads: args.threads,
            ..RenderThreading::default()
        },
        ..RenderToGifOpts::default()
    };
    let stats = render_to_gif(&tokens, &config, &args.output, opts)?;

    let size = std::fs::metadata(&args.output).map(|m| m.len()).unwrap_or(0);
    eprintln!(
        "wrote {} ({} frames, {:.2} MiB)",
        args.output.display(),
        stats.frames_total,
        size as f64 / 1024.0 / 1024.0
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = build_config(&args.common)?;
    if args.common.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let tokens = read_tokens(args.common.input.as_ref())?;
    let frame = render_single_frame(&tokens, &config, args.index)?;

    let mut opaque = vec![0u8; frame.data.len()];
    flatten_to_opaque_rgba8(&mut opaque, &frame.data, frame.premultiplied, [0, 0, 0, 255])?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    image::save_buffer_with_format(
        &args.output,
        &opaque,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.output.display()))?;

    eprintln!("wrote {}", args.output.display());
    Ok(())
}
