//! Batch export over the whole asset catalog.

use super::archive::{ArchiveWriter, DownloadSink, ZipArchiveWriter};
use super::filter::should_ignore_model;
use crate::atlas::{pack_sprites, SpriteImage, DEFAULT_TILE_SIZE};
use crate::error::{ExporterError, Result};
use crate::render::{RenderRequest, RenderSurface};
use crate::resolver::ModelResolver;
use crate::resource_pack::{AssetCatalog, AssetSource, RawModel};
use crate::types::asset_name;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Archive file names for atlas mode.
pub const SPRITEMAP_IMAGE: &str = "combined_spritemap.png";
pub const SPRITEMAP_MANIFEST: &str = "combined_spritemap.json";

/// How exported assets are packaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    /// One PNG per asset under `blocks/` and `items/`.
    #[default]
    Individual,
    /// Everything in one sprite atlas plus a manifest.
    Atlas,
}

impl ExportMode {
    /// Label used in archive names.
    pub fn label(self) -> &'static str {
        match self {
            ExportMode::Individual => "individual",
            ExportMode::Atlas => "spritemaps",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Configuration for export runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// First part of the archive name.
    pub archive_prefix: String,
    /// Tile edge in pixels for atlas mode.
    pub tile_size: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            archive_prefix: "minecraft".to_string(),
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_archive_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.archive_prefix = prefix.into();
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }
}

/// Cooperative cancellation flag, checked before each asset.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Counters reported after every asset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportProgress {
    pub processed: usize,
    pub total: usize,
    pub exported: usize,
    /// Queue index of the asset being exported, or of the last one finished.
    pub current_index: usize,
    /// Name of that asset; `None` before the first one starts.
    pub current_asset: Option<String>,
}

impl ExportProgress {
    /// Rounded percentage of processed assets.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (100.0 * self.processed as f64 / self.total as f64).round() as u32
    }
}

/// Result of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    /// `Completed` or `Cancelled`.
    pub state: ExportState,
    pub processed: usize,
    pub total: usize,
    pub exported: usize,
    /// Name of the delivered archive; `None` when nothing was exported.
    pub archive_name: Option<String>,
}

/// `<prefix>_<individual|spritemaps>_<complete|partial>_<count>.zip`
pub fn archive_name(prefix: &str, mode: ExportMode, cancelled: bool, count: usize) -> String {
    let status = if cancelled { "partial" } else { "complete" };
    format!("{}_{}_{}_{}.zip", prefix, mode.label(), status, count)
}

/// One entry of the export queue.
#[derive(Debug, Clone)]
enum QueuedAsset {
    Block { name: String, model: RawModel },
    Item { name: String, path: String },
}

impl QueuedAsset {
    fn name(&self) -> &str {
        match self {
            QueuedAsset::Block { name, .. } | QueuedAsset::Item { name, .. } => name,
        }
    }

    fn archive_path(&self) -> String {
        match self {
            QueuedAsset::Block { name, .. } => format!("blocks/{}.png", name),
            QueuedAsset::Item { name, .. } => format!("items/{}.png", name),
        }
    }

    fn sprite_name(&self) -> String {
        match self {
            QueuedAsset::Block { name, .. } => format!("block:{}", name),
            QueuedAsset::Item { name, .. } => format!("item:{}", name),
        }
    }
}

impl fmt::Display for QueuedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueuedAsset::Block { name, .. } => write!(f, "block model {}", name),
            QueuedAsset::Item { name, .. } => write!(f, "item texture {}", name),
        }
    }
}

type ProgressListener<'a> = Box<dyn FnMut(&ExportProgress) + 'a>;

/// Puts the orchestrator back to idle when a run ends, including when the
/// run future is dropped mid-flight.
struct RunGuard<'r> {
    state: &'r Cell<ExportState>,
    progress: &'r RefCell<ExportProgress>,
    stop: &'r StopHandle,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        *self.progress.borrow_mut() = ExportProgress::default();
        self.stop.reset();
        self.state.set(ExportState::Idle);
    }
}

/// Drives export runs: renders every block model and collects item textures,
/// one asset at a time, then packages them into an archive.
///
/// Runs take `&self` so a second start while one is running can be refused
/// with [`ExporterError::ExportInProgress`].
pub struct ExportOrchestrator<'a, S, R, A = ZipArchiveWriter>
where
    S: AssetSource + ?Sized,
    R: RenderSurface,
    A: ArchiveWriter + Default,
{
    source: &'a S,
    surface: RefCell<R>,
    config: ExportConfig,
    state: Cell<ExportState>,
    progress: RefCell<ExportProgress>,
    stop: StopHandle,
    listener: RefCell<Option<ProgressListener<'a>>>,
    _archive: PhantomData<fn() -> A>,
}

impl<'a, S, R, A> ExportOrchestrator<'a, S, R, A>
where
    S: AssetSource + ?Sized,
    R: RenderSurface,
    A: ArchiveWriter + Default,
{
    pub fn new(source: &'a S, surface: R, config: ExportConfig) -> Self {
        Self {
            source,
            surface: RefCell::new(surface),
            config,
            state: Cell::new(ExportState::Idle),
            progress: RefCell::new(ExportProgress::default()),
            stop: StopHandle::new(),
            listener: RefCell::new(None),
            _archive: PhantomData,
        }
    }

    /// Call `listener` with fresh counters after every asset.
    pub fn with_progress_listener(self, listener: impl FnMut(&ExportProgress) + 'a) -> Self {
        *self.listener.borrow_mut() = Some(Box::new(listener));
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn state(&self) -> ExportState {
        self.state.get()
    }

    pub fn progress(&self) -> ExportProgress {
        self.progress.borrow().clone()
    }

    /// Handle for stopping the current run from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn into_surface(self) -> R {
        self.surface.into_inner()
    }

    /// Export every eligible asset and hand the archive to `sink`.
    ///
    /// Only a catalog failure, an unusable configuration or another run in
    /// progress is an error; individual assets that fail are logged and left
    /// out.
    pub async fn start_export<K>(&self, mode: ExportMode, sink: &mut K) -> Result<ExportOutcome>
    where
        K: DownloadSink + ?Sized,
    {
        if self.state.get() == ExportState::Running {
            return Err(ExporterError::ExportInProgress);
        }
        if mode == ExportMode::Atlas && self.config.tile_size == 0 {
            return Err(ExporterError::Export(
                "sprite map tile size must be positive".to_string(),
            ));
        }

        self.state.set(ExportState::Running);
        self.stop.reset();
        let _guard = RunGuard {
            state: &self.state,
            progress: &self.progress,
            stop: &self.stop,
        };

        self.run(mode, sink).await
    }

    async fn run<K>(&self, mode: ExportMode, sink: &mut K) -> Result<ExportOutcome>
    where
        K: DownloadSink + ?Sized,
    {
        let catalog = self
            .source
            .catalog()
            .map_err(|e| ExporterError::Catalog(e.to_string()))?;
        let queue = self.build_queue(&catalog);
        let total = queue.len();
        tracing::info!("Exporting {} assets ({})", total, mode.label());

        let mut progress = ExportProgress {
            total,
            ..Default::default()
        };
        self.publish(&progress);

        let mut archive = A::default();
        if mode == ExportMode::Individual {
            archive.add_folder("blocks")?;
            archive.add_folder("items")?;
        }

        let resolver = ModelResolver::new(self.source);
        let mut sprites = Vec::new();

        for (i, asset) in queue.iter().enumerate() {
            if self.stop.is_stopped() {
                tracing::info!("Export stopped at asset {}/{}", i + 1, total);
                break;
            }

            progress.current_index = i;
            progress.current_asset = Some(asset.name().to_string());
            *self.progress.borrow_mut() = progress.clone();

            match self.export_asset(asset, &resolver).await {
                Ok(png) => match mode {
                    ExportMode::Individual => match archive.add_file(&asset.archive_path(), &png) {
                        Ok(()) => progress.exported += 1,
                        Err(e) => tracing::error!("Failed to store {}: {}", asset, e),
                    },
                    ExportMode::Atlas => {
                        sprites.push(SpriteImage::new(asset.sprite_name(), png));
                        progress.exported += 1;
                    }
                },
                Err(e) => tracing::error!("Failed to export {}: {}", asset, e),
            }

            if progress.exported > 0 && progress.exported % 100 == 0 {
                tracing::debug!("Exported {}/{}", progress.exported, total);
            }

            progress.processed += 1;
            self.publish(&progress);
            tokio::task::yield_now().await;
        }

        let cancelled = self.stop.is_stopped();
        self.state.set(if cancelled {
            ExportState::Cancelled
        } else {
            ExportState::Completed
        });

        if mode == ExportMode::Atlas && !sprites.is_empty() {
            sprites.sort_by(|a, b| a.name.cmp(&b.name));
            let atlas = pack_sprites(&sprites, self.config.tile_size)?;
            archive.add_file(SPRITEMAP_IMAGE, &atlas.to_png()?)?;
            archive.add_file(SPRITEMAP_MANIFEST, atlas.manifest_json()?.as_bytes())?;
            tracing::info!("Packed {} sprites into {}", sprites.len(), SPRITEMAP_IMAGE);
        }

        let archive_name = if progress.exported > 0 {
            let name = archive_name(
                &self.config.archive_prefix,
                mode,
                cancelled,
                progress.exported,
            );
            let data = archive.finish()?;
            sink.deliver(&name, data)?;
            tracing::info!("Archive {} delivered", name);
            Some(name)
        } else {
            tracing::warn!("No assets were exported, no archive generated");
            None
        };

        Ok(ExportOutcome {
            state: self.state.get(),
            processed: progress.processed,
            total,
            exported: progress.exported,
            archive_name,
        })
    }

    /// Block models first (filtered, parsed), then item textures.
    fn build_queue(&self, catalog: &AssetCatalog) -> Vec<QueuedAsset> {
        let mut queue = Vec::new();

        for path in &catalog.models.block {
            let name = asset_name(path);
            if should_ignore_model(name) {
                tracing::debug!("Skipping {}", name);
                continue;
            }
            match self.source.model(path) {
                Ok(model) => queue.push(QueuedAsset::Block {
                    name: name.to_string(),
                    model,
                }),
                Err(e) => tracing::warn!("Dropping block model {}: {}", path, e),
            }
        }

        for path in &catalog.textures.item {
            queue.push(QueuedAsset::Item {
                name: asset_name(path).to_string(),
                path: path.clone(),
            });
        }

        queue
    }

    async fn export_asset(&self, asset: &QueuedAsset, resolver: &ModelResolver<'_, S>) -> Result<Vec<u8>> {
        match asset {
            QueuedAsset::Block { name, model } => {
                let resolved = resolver.resolve(model)?;
                let (request, ready) = RenderRequest::new(name.as_str(), resolved);
                self.surface.borrow_mut().submit(request);

                let snapshot = ready.await.map_err(|_| {
                    ExporterError::Render(format!("no frame was produced for {}", asset.name()))
                })?;
                snapshot()
            }
            QueuedAsset::Item { path, .. } => self.source.texture_bytes(path),
        }
    }

    fn publish(&self, progress: &ExportProgress) {
        *self.progress.borrow_mut() = progress.clone();
        if let Some(listener) = self.listener.borrow_mut().as_mut() {
            listener(progress);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::archive::MemorySink;
    use crate::render::{channel_surface, RenderOptions, SoftwareSurface};
    use crate::resource_pack::texture::encode_png;
    use crate::resource_pack::{AnimationMeta, ResourcePack};
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;
    use std::rc::Rc;

    fn png(color: [u8; 4]) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(16, 16, Rgba(color))).unwrap()
    }

    fn test_pack() -> ResourcePack {
        let mut pack = ResourcePack::new();
        pack.add_model_json(
            "block/cube_all",
            r##"{"elements": [{"from": [0, 0, 0], "to": [16, 16, 16],
                "faces": {"up": {"texture": "#all"}, "north": {"texture": "#all"}}}]}"##,
        );
        pack.add_model_json(
            "block/stone",
            r#"{"parent": "block/cube_all", "textures": {"all": "block/stone"}}"#,
        );
        pack.add_model_json(
            "block/dirt",
            r#"{"parent": "minecraft:block/cube_all", "textures": {"all": "block/dirt"}}"#,
        );
        pack.add_model_json("block/oak_fence_side", r#"{"parent": "block/cube_all"}"#);
        pack.add_model_json("block/broken", "{ nope");
        pack.add_texture("block/stone", png([100, 100, 100, 255]));
        pack.add_texture("block/dirt", png([120, 80, 40, 255]));
        pack.add_texture("item/apple", png([200, 0, 0, 255]));
        pack
    }

    fn entries(data: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    fn surface(pack: &ResourcePack) -> SoftwareSurface<'_, ResourcePack> {
        SoftwareSurface::new(pack, RenderOptions::default().with_size(16))
    }

    #[tokio::test]
    async fn test_individual_export() {
        let pack = test_pack();
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, surface(&pack), ExportConfig::default());
        let mut sink = MemorySink::new();

        let outcome = orchestrator
            .start_export(ExportMode::Individual, &mut sink)
            .await
            .unwrap();

        // dirt, stone, apple; cube_all, the fence side and the broken model are dropped
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.exported, 3);
        assert_eq!(outcome.state, ExportState::Completed);
        assert_eq!(
            outcome.archive_name.as_deref(),
            Some("minecraft_individual_complete_3.zip")
        );

        let (name, data) = sink.last().unwrap();
        assert_eq!(name, "minecraft_individual_complete_3.zip");
        assert_eq!(
            entries(data),
            vec![
                "blocks/",
                "blocks/dirt.png",
                "blocks/stone.png",
                "items/",
                "items/apple.png"
            ]
        );

        assert_eq!(orchestrator.state(), ExportState::Idle);
        assert_eq!(orchestrator.progress(), ExportProgress::default());
    }

    #[tokio::test]
    async fn test_atlas_export() {
        let pack = test_pack();
        let orchestrator: ExportOrchestrator<_, _> = ExportOrchestrator::new(
            &pack,
            surface(&pack),
            ExportConfig::new().with_archive_prefix("pack"),
        );
        let mut sink = MemorySink::new();

        let outcome = orchestrator
            .start_export(ExportMode::Atlas, &mut sink)
            .await
            .unwrap();
        assert_eq!(outcome.archive_name.as_deref(), Some("pack_spritemaps_complete_3.zip"));

        let (_, data) = sink.last().unwrap();
        assert_eq!(entries(data), vec![SPRITEMAP_MANIFEST, SPRITEMAP_IMAGE]);

        let mut archive = zip::ZipArchive::new(Cursor::new(data.clone())).unwrap();
        let manifest: serde_json::Value =
            serde_json::from_reader(archive.by_name(SPRITEMAP_MANIFEST).unwrap()).unwrap();
        assert_eq!(manifest["cols"], 2);
        assert_eq!(manifest["rows"], 2);
        // Sorted by name: block:dirt, block:stone, item:apple
        assert_eq!(manifest["sprites"]["block:dirt"]["x"], 0);
        assert_eq!(manifest["sprites"]["block:stone"]["x"], 64);
        assert_eq!(manifest["sprites"]["item:apple"]["y"], 64);
    }

    #[tokio::test]
    async fn test_empty_catalog_produces_no_archive() {
        let pack = ResourcePack::new();
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, surface(&pack), ExportConfig::default());
        let mut sink = MemorySink::new();

        let outcome = orchestrator
            .start_export(ExportMode::Individual, &mut sink)
            .await
            .unwrap();
        assert_eq!(outcome.exported, 0);
        assert_eq!(outcome.archive_name, None);
        assert!(sink.archives.is_empty());
    }

    #[tokio::test]
    async fn test_stop_produces_partial_archive() {
        let pack = test_pack();
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, surface(&pack), ExportConfig::default());
        let stop = orchestrator.stop_handle();
        let orchestrator = orchestrator.with_progress_listener(move |progress| {
            if progress.processed == 2 {
                stop.stop();
            }
        });
        let mut sink = MemorySink::new();

        let outcome = orchestrator
            .start_export(ExportMode::Individual, &mut sink)
            .await
            .unwrap();
        assert_eq!(outcome.state, ExportState::Cancelled);
        assert_eq!(outcome.processed, 2);
        assert_eq!(
            outcome.archive_name.as_deref(),
            Some("minecraft_individual_partial_2.zip")
        );

        let (_, data) = sink.last().unwrap();
        let files: Vec<String> = entries(data).into_iter().filter(|n| !n.ends_with('/')).collect();
        assert_eq!(files, vec!["blocks/dirt.png", "blocks/stone.png"]);

        // The stop flag is cleared for the next run
        assert!(!orchestrator.stop_handle().is_stopped());
    }

    #[tokio::test]
    async fn test_progress_is_rounded() {
        let pack = test_pack();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&seen);
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, surface(&pack), ExportConfig::default())
                .with_progress_listener(move |p| recorder.borrow_mut().push(p.percent()));

        orchestrator
            .start_export(ExportMode::Individual, &mut MemorySink::new())
            .await
            .unwrap();
        assert_eq!(*seen.borrow(), vec![0, 33, 67, 100]);
    }

    #[tokio::test]
    async fn test_dropped_render_is_skipped() {
        let pack = test_pack();
        let (channel, requests) = channel_surface();
        drop(requests);
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, channel, ExportConfig::default());
        let mut sink = MemorySink::new();

        let outcome = orchestrator
            .start_export(ExportMode::Individual, &mut sink)
            .await
            .unwrap();
        assert_eq!(outcome.processed, 3);
        assert_eq!(outcome.exported, 1);
        assert_eq!(
            outcome.archive_name.as_deref(),
            Some("minecraft_individual_complete_1.zip")
        );
    }

    #[tokio::test]
    async fn test_deferred_render_loop() {
        let pack = test_pack();
        let (channel, mut requests) = channel_surface();
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, channel, ExportConfig::default());
        let mut sink = MemorySink::new();

        let render_loop = async {
            let mut rendered = Vec::new();
            for _ in 0..2 {
                let Some(request) = requests.recv().await else { break };
                rendered.push(request.name.clone());
                tokio::task::yield_now().await;
                request.ready(Box::new(|| Ok(png([0, 0, 255, 255]))));
            }
            rendered
        };

        let (outcome, rendered) =
            tokio::join!(orchestrator.start_export(ExportMode::Individual, &mut sink), render_loop);
        assert_eq!(rendered, vec!["dirt", "stone"]);
        assert_eq!(outcome.unwrap().exported, 3);
    }

    #[tokio::test]
    async fn test_progress_names_the_pending_asset() {
        let pack = test_pack();
        let (channel, mut requests) = channel_surface();
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, channel, ExportConfig::default());
        let mut sink = MemorySink::new();

        let render_loop = async {
            let mut pending = Vec::new();
            for _ in 0..2 {
                let Some(request) = requests.recv().await else { break };
                let progress = orchestrator.progress();
                pending.push((progress.current_index, progress.current_asset, progress.processed));
                request.ready(Box::new(|| Ok(png([0, 0, 255, 255]))));
            }
            pending
        };

        let (outcome, pending) =
            tokio::join!(orchestrator.start_export(ExportMode::Individual, &mut sink), render_loop);
        assert!(outcome.is_ok());
        assert_eq!(
            pending,
            vec![(0, Some("dirt".to_string()), 0), (1, Some("stone".to_string()), 1)]
        );
    }

    #[tokio::test]
    async fn test_listener_sees_current_asset() {
        let pack = test_pack();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&seen);
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, surface(&pack), ExportConfig::default())
                .with_progress_listener(move |p| {
                    recorder.borrow_mut().push((p.current_index, p.current_asset.clone()))
                });

        orchestrator
            .start_export(ExportMode::Individual, &mut MemorySink::new())
            .await
            .unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![
                (0, None),
                (0, Some("dirt".to_string())),
                (1, Some("stone".to_string())),
                (2, Some("apple".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_abandoned_export_returns_to_idle() {
        let pack = test_pack();
        let (channel, requests) = channel_surface();
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, channel, ExportConfig::default());
        let mut sink = MemorySink::new();

        // The first render is never answered, so the run is dropped while waiting
        tokio::select! {
            biased;
            _ = orchestrator.start_export(ExportMode::Individual, &mut sink) => {
                panic!("export finished without a frame");
            }
            _ = tokio::task::yield_now() => {}
        }
        assert_eq!(orchestrator.state(), ExportState::Idle);
        assert_eq!(orchestrator.progress(), ExportProgress::default());
        assert!(!orchestrator.stop_handle().is_stopped());
        assert!(sink.archives.is_empty());

        drop(requests);
        let outcome = orchestrator
            .start_export(ExportMode::Individual, &mut sink)
            .await
            .unwrap();
        assert_eq!(outcome.state, ExportState::Completed);
        assert_eq!(outcome.exported, 1);
    }

    #[tokio::test]
    async fn test_zero_tile_size_is_rejected_before_rendering() {
        let pack = test_pack();
        let (channel, mut requests) = channel_surface();
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, channel, ExportConfig::new().with_tile_size(0));
        let mut sink = MemorySink::new();

        let result = orchestrator.start_export(ExportMode::Atlas, &mut sink).await;
        assert!(matches!(result, Err(ExporterError::Export(_))));
        assert!(requests.try_recv().is_err());
        assert!(sink.archives.is_empty());
        assert_eq!(orchestrator.state(), ExportState::Idle);

        // Individual mode never packs sprites
        drop(requests);
        let outcome = orchestrator
            .start_export(ExportMode::Individual, &mut sink)
            .await
            .unwrap();
        assert_eq!(outcome.exported, 1);
    }

    #[tokio::test]
    async fn test_second_start_is_refused() {
        let pack = test_pack();
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&pack, surface(&pack), ExportConfig::default());
        let mut first = MemorySink::new();
        let mut second = MemorySink::new();

        let (a, b) = tokio::join!(
            orchestrator.start_export(ExportMode::Individual, &mut first),
            orchestrator.start_export(ExportMode::Atlas, &mut second)
        );
        assert!(a.is_ok());
        assert!(matches!(b, Err(ExporterError::ExportInProgress)));
        assert_eq!(first.archives.len(), 1);
        assert!(second.archives.is_empty());
    }

    struct Offline;

    impl AssetSource for Offline {
        fn catalog(&self) -> Result<AssetCatalog> {
            Err(ExporterError::ResourceNotFound("assets-index.json".to_string()))
        }
        fn model(&self, path: &str) -> Result<RawModel> {
            Err(ExporterError::ResourceNotFound(path.to_string()))
        }
        fn texture_bytes(&self, path: &str) -> Result<Vec<u8>> {
            Err(ExporterError::ResourceNotFound(path.to_string()))
        }
        fn animation_meta(&self, _: &str) -> Result<Option<AnimationMeta>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_catalog_failure_blocks() {
        let (channel, _requests) = channel_surface();
        let orchestrator: ExportOrchestrator<_, _> =
            ExportOrchestrator::new(&Offline, channel, ExportConfig::default());
        let result = orchestrator
            .start_export(ExportMode::Individual, &mut MemorySink::new())
            .await;
        assert!(matches!(result, Err(ExporterError::Catalog(_))));
        assert_eq!(orchestrator.state(), ExportState::Idle);
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(
            archive_name("minecraft", ExportMode::Atlas, true, 12),
            "minecraft_spritemaps_partial_12.zip"
        );
        assert_eq!(
            archive_name("minecraft", ExportMode::Individual, false, 1),
            "minecraft_individual_complete_1.zip"
        );
    }
}
