use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shotframe", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a scene at a device resolution and write PNG or JPEG.
    Render(RenderArgs),
    /// Render the screenshot on a device mesh after easing toward a rotation.
    Preview3d(Preview3dArgs),
    /// List the built-in device profiles.
    Devices,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Device profile key (see `devices`) or `WIDTHxHEIGHT`.
    #[arg(long, default_value = "iphone-6.7")]
    device: shotframe::OutputResolution,

    /// Active language for headline and subheadline.
    #[arg(long, default_value = "en")]
    lang: String,

    /// Directory bitmap sources are resolved against (defaults to the scene's directory).
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Font file to register (repeatable). Text and badges are skipped without fonts.
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Grain mode; overrides `SHOTFRAME_NOISE_MODE`.
    #[arg(long, value_enum)]
    noise: Option<NoiseChoice>,

    /// Fixed grain seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Resize factor applied before encoding.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Encode JPEG at this quality instead of PNG.
    #[arg(long)]
    jpeg_quality: Option<u8>,

    /// How long to wait for bitmap decodes.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Output path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct Preview3dArgs {
    /// Screenshot image.
    #[arg(long)]
    screenshot: PathBuf,

    /// Wavefront OBJ device mesh. Without one, a flat plane is used.
    #[arg(long)]
    mesh: Option<PathBuf>,

    /// Target rotation in degrees as `X,Y,Z`.
    #[arg(long, default_value = "0,0,0")]
    rotate: String,

    /// Frames to run before writing the last one.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Viewport as `WIDTHxHEIGHT`.
    #[arg(long, default_value = "540x960")]
    size: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NoiseChoice {
    Blend,
    Legacy,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Preview3d(args) => cmd_preview3d(args),
        Command::Devices => {
            for (key, res) in shotframe::OutputResolution::named() {
                let (w, h) = res.size();
                println!("{key:<10} {w}x{h}");
            }
            Ok(())
        }
    }
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(&args.scene)
        .with_context(|| format!("read scene '{}'", args.scene.display()))?;
    let scene = shotframe::Scene::from_json(&json)?;
    scene.validate()?;

    let mut opts = shotframe::CompositorOpts::from_env()?.with_noise_seed(args.seed);
    if let Some(choice) = args.noise {
        opts = opts.with_noise_mode(match choice {
            NoiseChoice::Blend => shotframe::NoiseMode::Blend,
            NoiseChoice::Legacy => shotframe::NoiseMode::LegacyReplace,
        });
    }
    let mut compositor = shotframe::Compositor::new(opts);
    for font in &args.fonts {
        let bytes =
            std::fs::read(font).with_context(|| format!("read font '{}'", font.display()))?;
        let family = compositor.register_font(bytes)?;
        tracing::info!(family = %family, path = %font.display(), "font registered");
    }

    let assets_root = args.assets.clone().unwrap_or_else(|| {
        args.scene
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let mut session =
        shotframe::PreviewSession::new(compositor, assets_root, args.device, args.lang.clone());
    session.set_scene(scene)?;
    session.wait_for_assets(Duration::from_secs(args.timeout_secs))?;
    if let Some(frame) = session.last_frame()
        && !frame.skipped.is_empty()
    {
        eprintln!("warning: layers skipped: {:?}", frame.skipped);
    }

    let format = match args.jpeg_quality {
        Some(quality) => shotframe::ExportFormat::Jpeg { quality },
        None => shotframe::ExportFormat::Png,
    };
    let export = shotframe::ExportOpts::default()
        .with_format(format)
        .with_scale(args.scale);
    let bytes = session.export(&export)?;
    if bytes.is_empty() {
        anyhow::bail!("frame is tainted by a cross-origin bitmap; nothing exported");
    }
    write_output(&args.out, &bytes)
}

fn parse_triplet(s: &str) -> anyhow::Result<glam::Vec3> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("parse rotation '{s}'"))?;
    match parts.as_slice() {
        [x, y, z] => Ok(glam::Vec3::new(*x, *y, *z)),
        _ => anyhow::bail!("rotation must be X,Y,Z (got '{s}')"),
    }
}

fn parse_size(s: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("size must be WIDTHxHEIGHT (got '{s}')"))?;
    Ok((
        w.trim().parse().context("parse width")?,
        h.trim().parse().context("parse height")?,
    ))
}

fn cmd_preview3d(args: Preview3dArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.screenshot)
        .with_context(|| format!("read screenshot '{}'", args.screenshot.display()))?;
    let bitmap = Arc::new(shotframe::decode_image(&bytes)?);
    let target = parse_triplet(&args.rotate)?;
    let (w, h) = parse_size(&args.size)?;

    let opts = shotframe::Preview3dOpts::default().with_size(w, h);
    let mut renderer = shotframe::PreviewRenderer::new(opts)?;
    let mesh = match args.mesh {
        Some(path) => shotframe::MeshSource::ObjFile(path),
        None => shotframe::MeshSource::Plane,
    };
    renderer.enter(mesh, &args.screenshot.display().to_string(), bitmap);
    if !renderer.wait_ready(Duration::from_secs(30)) {
        anyhow::bail!("device mesh did not load in time");
    }
    renderer.set_rotation_target(target);

    let mut last = None;
    for _ in 0..args.frames.max(1) {
        if let Some(frame) = renderer.tick() {
            last = Some(frame);
        }
    }
    let frame = last.context("no frame rendered")?;
    tracing::info!(
        frames = renderer.frames(),
        remaining_deg = renderer.rotation().remaining(),
        "preview rendered"
    );
    let png = shotframe::encode_raster(&frame, &shotframe::ExportOpts::default())?;
    renderer.exit();
    write_output(&args.out, &png)
}
