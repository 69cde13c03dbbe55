//! Render surfaces: where resolved models get drawn and snapshotted.
//!
//! The exporter hands a surface one [`RenderRequest`] at a time and waits for
//! the surface to call [`RenderRequest::ready`] with a snapshot function once
//! geometry and textures are in place.

pub mod software;

pub use software::SoftwareSurface;

use crate::error::Result;
use crate::resolver::ResolvedModel;
use tokio::sync::{mpsc, oneshot};

/// Captures the current frame as PNG bytes.
pub type SnapshotFn = Box<dyn FnOnce() -> Result<Vec<u8>> + Send>;

/// Ask a surface to draw one model.
///
/// Fulfilled at most once through [`RenderRequest::ready`]. Dropping a request
/// without fulfilling it tells the waiting side the render failed.
pub struct RenderRequest {
    /// Asset name, for logging.
    pub name: String,
    pub model: ResolvedModel,
    sender: oneshot::Sender<SnapshotFn>,
}

impl RenderRequest {
    /// Create a request and the receiver that resolves when it is ready.
    pub fn new(
        name: impl Into<String>,
        model: ResolvedModel,
    ) -> (Self, oneshot::Receiver<SnapshotFn>) {
        let (sender, receiver) = oneshot::channel();
        let request = Self {
            name: name.into(),
            model,
            sender,
        };
        (request, receiver)
    }

    /// Signal that the scene is built and can be snapshotted.
    pub fn ready(self, snapshot: SnapshotFn) {
        if self.sender.send(snapshot).is_err() {
            tracing::debug!("Nobody is waiting for the render of {}", self.name);
        }
    }
}

impl std::fmt::Debug for RenderRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderRequest")
            .field("name", &self.name)
            .field("elements", &self.model.elements.len())
            .finish_non_exhaustive()
    }
}

/// Something that can draw a resolved model.
pub trait RenderSurface {
    /// Start drawing `request.model`. The surface calls `request.ready` when
    /// the frame can be captured, now or later.
    fn submit(&mut self, request: RenderRequest);
}

/// Display settings for a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Output edge length in pixels.
    pub size: u32,
    pub show_grid: bool,
    pub show_axes: bool,
    pub auto_rotate: bool,
    /// Orbit speed; 2.0 is one turn every 30 seconds.
    pub auto_rotate_speed: f32,
    /// Clear colour (RGBA).
    pub background: [u8; 4],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            size: 128,
            show_grid: false,
            show_axes: false,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            background: [0, 0, 0, 0],
        }
    }
}

impl RenderOptions {
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    pub fn with_axes(mut self, show: bool) -> Self {
        self.show_axes = show;
        self
    }

    pub fn with_auto_rotate(mut self, enabled: bool) -> Self {
        self.auto_rotate = enabled;
        self
    }

    pub fn with_background(mut self, background: [u8; 4]) -> Self {
        self.background = background;
        self
    }
}

/// A surface that forwards requests to a render loop elsewhere.
///
/// The loop receives each [`RenderRequest`] from the paired receiver and
/// fulfils it when its frame is ready. If the loop has gone away, submitted
/// requests are dropped and count as failed renders.
#[derive(Clone)]
pub struct ChannelSurface {
    sender: mpsc::UnboundedSender<RenderRequest>,
}

/// Create a forwarding surface and the receiving end for the render loop.
pub fn channel_surface() -> (ChannelSurface, mpsc::UnboundedReceiver<RenderRequest>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ChannelSurface { sender }, receiver)
}

impl RenderSurface for ChannelSurface {
    fn submit(&mut self, request: RenderRequest) {
        if let Err(e) = self.sender.send(request) {
            tracing::warn!("Render loop is gone, dropping request for {}", e.0.name);
        }
    }
}
