use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use raylab::{
    ControllerOpts, InMemorySurface, PatternEngine, RenderController, RenderEngine,
    RenderParameters,
};

#[derive(Parser, Debug)]
#[command(name = "raylab", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the scenes the built-in engine can render.
    Scenes,
    /// Render a scene to a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene name (see `raylab scenes`). Defaults to the first catalog entry.
    #[arg(long)]
    scene: Option<String>,

    /// Output width in pixels.
    #[arg(long, default_value_t = 400)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 225)]
    height: u32,

    /// Samples per pixel.
    #[arg(long, default_value_t = 4)]
    samples: u32,

    /// Read all parameters from a JSON file instead of the flags above.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Abort the render after this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Render on the calling thread instead of a background worker.
    #[arg(long, default_value_t = false)]
    foreground: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Scenes => cmd_scenes(),
        Command::Render(args) => cmd_render(args),
    }
}

fn cmd_scenes() -> anyhow::Result<()> {
    for scene in PatternEngine::new().list_scenes() {
        println!("{scene}");
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let engine = Arc::new(PatternEngine::new());

    let params = match &args.params {
        Some(path) => RenderParameters::from_path(path)?,
        None => {
            let scene_name = match args.scene {
                Some(s) => s,
                None => engine
                    .list_scenes()
                    .first()
                    .cloned()
                    .context("engine lists no scenes")?,
            };
            RenderParameters {
                scene_name,
                width: args.width,
                height: args.height,
                sample_count: args.samples,
            }
        }
    };

    let opts = ControllerOpts {
        background: !args.foreground,
        render_timeout: args.timeout_secs.map(Duration::from_secs),
    };
    let mut ctl = RenderController::new(engine, InMemorySurface::new(params), opts)?;
    ctl.dispatch();
    ctl.run_to_idle(Duration::from_millis(5));

    let surface = ctl.into_surface();
    if let Some(msg) = surface.errors().first() {
        anyhow::bail!("{msg}");
    }
    let frame = surface.last_frame().context("render produced no frame")?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
