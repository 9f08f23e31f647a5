use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the show's timing: effective transition, slide windows and frame count.
    Plan(PlanArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render every frame (or every Nth) as numbered PNGs.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Input show manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input show manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input show manifest JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for `frame_NNNNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Only write every Nth frame.
    #[arg(long, default_value_t = 1)]
    every: u64,
}

#[derive(serde::Serialize)]
struct PlanSummary {
    slides: usize,
    fps: storyreel::Fps,
    canvas: storyreel::Canvas,
    requested_transition_us: i64,
    transition_us: i64,
    total_us: i64,
    frames: u64,
    windows: Vec<storyreel::SlideWindow>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn load_show(path: &Path) -> anyhow::Result<storyreel::SlideshowSource> {
    let manifest = storyreel::ShowManifest::from_path(path)?;
    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let prepared = manifest
        .prepare(root)
        .with_context(|| format!("prepare show '{}'", path.display()))?;
    Ok(prepared.into_source()?)
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let source = load_show(&args.in_path)?;
    let timeline = source.timeline();
    let format = storyreel::FrameSource::output_format(&source);
    let summary = PlanSummary {
        slides: timeline.slide_count(),
        fps: format.fps,
        canvas: format.canvas,
        requested_transition_us: timeline.requested_transition_us(),
        transition_us: timeline.transition_us(),
        total_us: timeline.total_us(),
        frames: source.expected_frame_count(),
        windows: timeline.windows(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} slides, {}x{} @ {}/{} fps",
        summary.slides,
        summary.canvas.width,
        summary.canvas.height,
        summary.fps.num,
        summary.fps.den
    );
    if summary.transition_us != summary.requested_transition_us {
        println!(
            "transition: {}us (requested {}us, clamped)",
            summary.transition_us, summary.requested_transition_us
        );
    } else {
        println!("transition: {}us", summary.transition_us);
    }
    for w in &summary.windows {
        println!(
            "  slide {:>3}: visible {}..{}us, exclusive {}..{}us",
            w.index, w.visible_start_us, w.visible_end_us, w.start_us, w.exclusive_end_us
        );
    }
    println!("total: {}us, {} frames", summary.total_us, summary.frames);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut source = load_show(&args.in_path)?;
    let (ts, frame) = storyreel::render_frame_at(&mut source, storyreel::FrameIndex(args.frame))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    storyreel::write_png(&args.out, &frame)?;

    eprintln!("wrote {} (t={}us)", args.out.display(), ts);
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut source = load_show(&args.in_path)?;
    let mut sink = storyreel::PngSequenceSink::new(&args.out_dir).with_every(args.every);
    let stats = storyreel::pump(&mut source, &mut sink)?;

    eprintln!(
        "wrote {} of {} frames to {}",
        sink.written().len(),
        stats.frames,
        args.out_dir.display()
    );
    Ok(())
}
