//! Block Model Exporter CLI
//!
//! Render Minecraft block models and export whole resource packs.

use block_model_exporter::atlas::{pack_sprites, SpriteImage, DEFAULT_TILE_SIZE};
use block_model_exporter::{
    load_resource_pack, AssetSource, DirectorySink, ExportConfig, ExportMode,
    ExportOrchestrator, ExportProgress, ModelResolver, RawModel, RenderOptions, ResolvedModel,
    ResourcePack, SoftwareSurface,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "block-model-exporter")]
#[command(author, version, about = "Render and export Minecraft block models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a resource pack
    Info {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,
    },

    /// Print a model with its parent chain merged in
    Resolve {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,

        /// Model id (e.g., "block/stone" or "minecraft:block/stone")
        #[arg(short, long)]
        model: String,
    },

    /// Render a single model to a PNG
    Render {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: Option<PathBuf>,

        /// Model id (e.g., "block/stone")
        #[arg(short, long, required_unless_present = "model_file")]
        model: Option<String>,

        /// Standalone model JSON file instead of a pack model id
        #[arg(long, conflicts_with = "model")]
        model_file: Option<PathBuf>,

        /// PNG used for every texture the model file names but the pack lacks
        #[arg(long, requires = "model_file")]
        texture: Option<PathBuf>,

        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,

        /// Image size in pixels
        #[arg(long, default_value = "128")]
        size: u32,

        /// Draw the ground grid
        #[arg(long)]
        grid: bool,

        /// Draw the axes
        #[arg(long)]
        axes: bool,

        /// Game ticks to advance animations before capturing
        #[arg(long, default_value = "0")]
        ticks: u32,

        /// Orbit the camera while ticks advance
        #[arg(long)]
        auto_rotate: bool,
    },

    /// Export every block model and item texture into a ZIP
    Export {
        /// Path to resource pack (ZIP or directory)
        #[arg(short, long)]
        resource_pack: PathBuf,

        /// Directory the archive is written to
        #[arg(short, long)]
        output: PathBuf,

        /// Packaging
        #[arg(long, value_enum, default_value = "individual")]
        mode: Mode,

        /// Archive name prefix
        #[arg(long, default_value = "minecraft")]
        prefix: String,

        /// Rendered image size in pixels
        #[arg(long, default_value = "128")]
        size: u32,

        /// Sprite map tile size in pixels
        #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
        tile_size: u32,
    },

    /// Pack a directory of PNGs into a sprite map
    Spritemap {
        /// Directory containing PNG files
        #[arg(short, long)]
        input: PathBuf,

        /// Output path without extension; writes .png and .json
        #[arg(short, long)]
        output: PathBuf,

        /// Tile size in pixels
        #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
        tile_size: u32,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One PNG per asset
    Individual,
    /// A single combined sprite map
    Atlas,
}

impl From<Mode> for ExportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Individual => ExportMode::Individual,
            Mode::Atlas => ExportMode::Atlas,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info { resource_pack } => {
            show_pack_info(&resource_pack)?;
        }
        Commands::Resolve {
            resource_pack,
            model,
        } => {
            resolve_model(&resource_pack, &model)?;
        }
        Commands::Render {
            resource_pack,
            model,
            model_file,
            texture,
            output,
            size,
            grid,
            axes,
            ticks,
            auto_rotate,
        } => {
            let options = RenderOptions::default()
                .with_size(size)
                .with_grid(grid)
                .with_axes(axes)
                .with_auto_rotate(auto_rotate);
            let source = match (model_file, model) {
                (Some(path), _) => ModelInput::File { path, texture },
                (None, Some(id)) => ModelInput::Pack(id),
                (None, None) => return Err("either --model or --model-file is required".into()),
            };
            render_model(resource_pack.as_deref(), source, &output, options, ticks)?;
        }
        Commands::Export {
            resource_pack,
            output,
            mode,
            prefix,
            size,
            tile_size,
        } => {
            let config = ExportConfig::new()
                .with_archive_prefix(prefix)
                .with_tile_size(tile_size);
            export_pack(&resource_pack, &output, mode.into(), config, size)?;
        }
        Commands::Spritemap {
            input,
            output,
            tile_size,
        } => {
            build_spritemap(&input, &output, tile_size)?;
        }
    }

    Ok(())
}

fn show_pack_info(resource_pack_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading resource pack from {:?}...", resource_pack_path);
    let pack = load_resource_pack(resource_pack_path)?;
    let catalog = pack.catalog()?;

    println!("\nResource Pack Info:");
    println!("  Models: {}", pack.model_count());
    println!("    block: {}", catalog.models.block.len());
    println!("    item: {}", catalog.models.item.len());
    println!("  Textures: {}", pack.texture_count());
    println!("    block: {}", catalog.textures.block.len());
    println!("    item: {}", catalog.textures.item.len());
    println!("  Animated textures: {}", pack.animated_texture_count());

    Ok(())
}

fn resolve_model(resource_pack_path: &Path, model: &str) -> Result<(), Box<dyn std::error::Error>> {
    let pack = load_resource_pack(resource_pack_path)?;
    let resolved = ModelResolver::new(&pack).resolve_path(model)?;
    println!("{}", resolved.to_json_pretty()?);
    Ok(())
}

/// Where the model to render comes from.
enum ModelInput {
    /// A model id inside the resource pack.
    Pack(String),
    /// A model JSON file, optionally with one texture for whatever it names.
    File {
        path: PathBuf,
        texture: Option<PathBuf>,
    },
}

fn render_model(
    resource_pack_path: Option<&Path>,
    input: ModelInput,
    output_path: &Path,
    options: RenderOptions,
    ticks: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pack = match resource_pack_path {
        Some(path) => {
            println!("Loading resource pack from {:?}...", path);
            load_resource_pack(path)?
        }
        None => ResourcePack::new(),
    };

    let (model, resolved) = match input {
        ModelInput::Pack(id) => {
            let resolved = ModelResolver::new(&pack).resolve_path(&id)?;
            (id, resolved)
        }
        ModelInput::File { path, texture } => {
            let resolved = resolve_model_file(&mut pack, &path, texture.as_deref())?;
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "model".to_string());
            (name, resolved)
        }
    };
    println!(
        "  {} elements, {} texture slots",
        resolved.elements.len(),
        resolved.textures.len()
    );

    let mut surface = SoftwareSurface::new(&pack, options);
    surface.load(&model, &resolved);
    if ticks > 0 {
        surface.advance_ticks(ticks);
    }
    let png = surface.snapshot()?;

    let png_path = if output_path.extension().is_some() {
        output_path.to_path_buf()
    } else {
        output_path.with_extension("png")
    };
    fs::write(&png_path, &png)?;
    println!("Rendered {} ({} bytes) to {:?}", model, png.len(), png_path);

    Ok(())
}

/// Parse a model file, resolve its parents against `pack` and register
/// `texture` for every concrete path the pack cannot supply.
fn resolve_model_file(
    pack: &mut ResourcePack,
    path: &Path,
    texture: Option<&Path>,
) -> Result<ResolvedModel, Box<dyn std::error::Error>> {
    println!("Reading model from {:?}...", path);
    let raw = RawModel::from_json(&fs::read_to_string(path)?)?;
    let resolved = ModelResolver::new(&*pack).resolve(&raw)?;

    if let Some(texture_path) = texture {
        let data = fs::read(texture_path)?;
        let filled = pack.add_missing_textures(resolved.texture_paths(), &data);
        if filled.is_empty() {
            tracing::warn!("{:?} was not used; the model names no missing texture", texture_path);
        } else {
            println!("  Using {:?} for {}", texture_path, filled.join(", "));
        }
    }

    Ok(resolved)
}

fn export_pack(
    resource_pack_path: &Path,
    output_dir: &Path,
    mode: ExportMode,
    config: ExportConfig,
    size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading resource pack from {:?}...", resource_pack_path);
    let pack = load_resource_pack(resource_pack_path)?;

    let surface = SoftwareSurface::new(&pack, RenderOptions::default().with_size(size));
    let mut last_percent = None;
    let orchestrator: ExportOrchestrator<_, _> = ExportOrchestrator::new(&pack, surface, config)
        .with_progress_listener(move |progress: &ExportProgress| {
            let percent = progress.percent();
            if last_percent != Some(percent) {
                last_percent = Some(percent);
                tracing::info!(
                    "{}% ({}/{}, {} exported)",
                    percent,
                    progress.processed,
                    progress.total,
                    progress.exported
                );
            }
        });
    let stop = orchestrator.stop_handle();
    let mut sink = DirectorySink::new(output_dir);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let outcome = rt.block_on(async {
        let export = orchestrator.start_export(mode, &mut sink);
        tokio::pin!(export);

        tokio::select! {
            outcome = &mut export => outcome,
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("Interrupted, finishing the current asset...");
                stop.stop();
                export.await
            }
        }
    })?;

    println!(
        "Export {:?}: {} of {} assets exported",
        outcome.state, outcome.exported, outcome.total
    );
    match &outcome.archive_name {
        Some(name) => println!("  Archive: {:?}", output_dir.join(name)),
        None => println!("  Nothing exported, no archive written"),
    }

    Ok(())
}

fn build_spritemap(
    input_dir: &Path,
    output_path: &Path,
    tile_size: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    paths.sort();

    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        images.push(SpriteImage::new(name, fs::read(path)?));
    }
    println!("Packing {} images from {:?}...", images.len(), input_dir);

    let atlas = pack_sprites(&images, tile_size)?;
    let png_path = output_path.with_extension("png");
    let json_path = output_path.with_extension("json");
    fs::write(&png_path, atlas.to_png()?)?;
    fs::write(&json_path, atlas.manifest_json()?)?;

    println!(
        "  Atlas: {}x{} ({} cols, {} rows) with {} sprites",
        atlas.manifest.width,
        atlas.manifest.height,
        atlas.manifest.cols,
        atlas.manifest.rows,
        atlas.manifest.sprites.len()
    );
    println!("Exported {:?} and {:?}", png_path, json_path);

    Ok(())
}
