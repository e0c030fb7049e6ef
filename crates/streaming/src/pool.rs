use foundation::arena::Arena;
use foundation::handles::Handle;
use serde::Serialize;
use tracing::{debug, warn};

use crate::residency::{GpuTexture, ResidencyState};

/// Stable reference to a texture slot in a [`TexturePool`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureHandle(pub Handle);

/// Host side of texture loading.
///
/// `begin_load` starts a fetch and must not block; the host reports the result
/// later through [`TexturePool::complete`]. `dispose` frees GPU storage for a
/// texture the pool no longer owns.
pub trait TextureBackend {
    fn begin_load(&mut self, handle: TextureHandle, url: &str);
    fn dispose(&mut self, texture: GpuTexture);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureLoadError {
    pub reason: String,
}

impl TextureLoadError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for TextureLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "texture load failed: {}", self.reason)
    }
}

impl std::error::Error for TextureLoadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    StaleHandle(TextureHandle),
}

impl std::fmt::Display for PoolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolError::StaleHandle(h) => write!(f, "stale texture handle: {h:?}"),
        }
    }
}

impl std::error::Error for PoolError {}

/// What happened to a completed load.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Resident,
    Failed,
    /// The slot was released (or already settled) before the load finished;
    /// any texture it produced has been disposed.
    Stale,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PoolStats {
    pub live: usize,
    pub requested_total: u64,
    pub released_total: u64,
    pub disposed_total: u64,
    pub stale_loads: u64,
}

#[derive(Debug)]
struct TextureSlot {
    url: String,
    state: ResidencyState,
}

/// Owns every tile texture slot and guarantees each GPU texture is disposed
/// exactly once: on release, or on arrival if its slot is already gone.
#[derive(Debug, Default)]
pub struct TexturePool {
    slots: Arena<TextureSlot>,
    stats: PoolStats,
}

impl TexturePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            live: self.slots.len(),
            ..self.stats
        }
    }

    pub fn state(&self, h: TextureHandle) -> Option<ResidencyState> {
        self.slots.get(h.0).map(|s| s.state)
    }

    pub fn url(&self, h: TextureHandle) -> Option<&str> {
        self.slots.get(h.0).map(|s| s.url.as_str())
    }

    /// Allocate a slot and ask the backend to start fetching `url`.
    pub fn request<B>(&mut self, url: impl Into<String>, backend: &mut B) -> TextureHandle
    where
        B: TextureBackend + ?Sized,
    {
        let url = url.into();
        let handle = TextureHandle(self.slots.alloc(TextureSlot {
            url: url.clone(),
            state: ResidencyState::Loading,
        }));
        self.stats.requested_total += 1;
        backend.begin_load(handle, &url);
        handle
    }

    /// Record the result of a fetch started by [`TexturePool::request`].
    pub fn complete<B>(
        &mut self,
        h: TextureHandle,
        result: Result<GpuTexture, TextureLoadError>,
        backend: &mut B,
    ) -> LoadOutcome
    where
        B: TextureBackend + ?Sized,
    {
        let slot = match self.slots.get_mut(h.0) {
            Some(slot) if slot.state == ResidencyState::Loading => slot,
            _ => {
                self.stats.stale_loads += 1;
                if let Ok(texture) = result {
                    debug!(?h, texture_id = texture.id, "disposing texture for released slot");
                    backend.dispose(texture);
                    self.stats.disposed_total += 1;
                }
                return LoadOutcome::Stale;
            }
        };

        match result {
            Ok(texture) => {
                slot.state = ResidencyState::Resident(texture);
                LoadOutcome::Resident
            }
            Err(err) => {
                warn!(url = %slot.url, "{err}");
                slot.state = ResidencyState::Failed;
                LoadOutcome::Failed
            }
        }
    }

    /// Release a slot, disposing its texture if one was resident.
    pub fn release<B>(&mut self, h: TextureHandle, backend: &mut B) -> Result<(), PoolError>
    where
        B: TextureBackend + ?Sized,
    {
        let slot = self.slots.remove(h.0).ok_or(PoolError::StaleHandle(h))?;
        self.stats.released_total += 1;
        if let ResidencyState::Resident(texture) = slot.state {
            backend.dispose(texture);
            self.stats.disposed_total += 1;
        }
        Ok(())
    }
}
