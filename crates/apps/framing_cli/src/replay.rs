//! Scripted sessions: feed recorded host events through a framing session and
//! report what it emitted.

use foundation::math::EulerXyz;
use framing::{
    FramingConfig, FramingEvent, FramingSession, GroundTarget, HostEvent, OrbitalPose, Viewport,
};
use serde::{Deserialize, Serialize};
use streaming::{
    GpuTexture, PoolStats, ResidencyState, TextureBackend, TextureHandle, TextureLoadError,
    TileLayer,
};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayScript {
    #[serde(default)]
    pub viewport: Option<Viewport>,
    #[serde(default)]
    pub pass: Option<PassSelection>,
    /// Orientation persisted from an earlier session, applied after the pass.
    #[serde(default)]
    pub restore_euler: Option<[f64; 3]>,
    #[serde(default)]
    pub events: Vec<HostEvent>,
    /// Loads whose URL contains any of these fail instead of resolving.
    #[serde(default)]
    pub fail_urls_containing: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PassSelection {
    pub pose: OrbitalPose,
    pub target: GroundTarget,
}

/// Backend that resolves every fetch on the next [`settle_loads`] call and
/// only logs what a GPU would do.
#[derive(Debug, Default)]
pub struct LoggingBackend {
    next_id: u64,
    pending: Vec<(TextureHandle, String)>,
    pub requested: u64,
    pub disposed: u64,
}

impl LoggingBackend {
    fn next_texture(&mut self) -> GpuTexture {
        self.next_id += 1;
        GpuTexture {
            id: self.next_id,
            width: 256,
            height: 256,
        }
    }
}

impl TextureBackend for LoggingBackend {
    fn begin_load(&mut self, handle: TextureHandle, url: &str) {
        debug!(?handle, url, "texture requested");
        self.requested += 1;
        self.pending.push((handle, url.to_string()));
    }

    fn dispose(&mut self, texture: GpuTexture) {
        debug!(texture_id = texture.id, "texture disposed");
        self.disposed += 1;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRecord {
    PassSelected {
        seq: u64,
        lat: f64,
        lng: f64,
        height_km: f64,
        target_lat: f64,
        target_lng: f64,
        euler: [f64; 3],
    },
    Settled {
        seq: u64,
        euler: [f64; 3],
    },
    TilesRebuilt {
        seq: u64,
        z: u8,
        x: u32,
        y: u32,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub events: Vec<EventRecord>,
    pub final_euler: [f64; 3],
    pub textures_requested: u64,
    pub textures_disposed: u64,
    /// Layers of the final neighborhood whose fetch failed.
    pub textures_failed: usize,
    pub pool: PoolStats,
}

fn record(seq: u64, kind: FramingEvent) -> EventRecord {
    match kind {
        FramingEvent::PassSelected {
            pose,
            target,
            euler,
        } => EventRecord::PassSelected {
            seq,
            lat: pose.lat,
            lng: pose.lng,
            height_km: pose.height_km,
            target_lat: target.lat,
            target_lng: target.lng,
            euler: [euler.x, euler.y, euler.z],
        },
        FramingEvent::Settled { euler } => EventRecord::Settled {
            seq,
            euler: [euler.x, euler.y, euler.z],
        },
        FramingEvent::TilesRebuilt { center } => EventRecord::TilesRebuilt {
            seq,
            z: center.z,
            x: center.x,
            y: center.y,
        },
    }
}

/// Resolve every outstanding fetch, failing the ones matched by `fail`.
fn settle_loads(session: &mut FramingSession<LoggingBackend>, fail: &[String]) {
    let pending = std::mem::take(&mut session.backend_mut().pending);
    for (handle, url) in pending {
        let result = if fail.iter().any(|pat| url.contains(pat.as_str())) {
            Err(TextureLoadError::new(format!("simulated failure for {url}")))
        } else {
            Ok(session.backend_mut().next_texture())
        };
        session.on_texture_loaded(handle, result);
    }
}

fn failed_layers(session: &FramingSession<LoggingBackend>) -> usize {
    let Some(hood) = session.tiles() else {
        return 0;
    };
    hood.tiles
        .iter()
        .flat_map(|tile| TileLayer::ALL.map(|layer| tile.handle(layer)))
        .filter(|&handle| {
            session.tile_set().texture_state(handle) == Some(ResidencyState::Failed)
        })
        .count()
}

pub fn run_replay(config: FramingConfig, script: &ReplayScript) -> Result<ReplayReport, String> {
    let viewport = script.viewport.unwrap_or(config.viewport);
    let mut session =
        FramingSession::new(config, LoggingBackend::default()).map_err(|e| e.to_string())?;
    session.mount(viewport);

    if let Some(pass) = script.pass {
        if session.select_pass(pass.pose, pass.target).is_none() {
            return Err("pass pose coincides with its target".to_string());
        }
        settle_loads(&mut session, &script.fail_urls_containing);
    }

    if let Some([x, y, z]) = script.restore_euler {
        if !session.restore_orientation(EulerXyz::new(x, y, z)) {
            return Err("restoreEuler needs a pass to place the camera".to_string());
        }
        settle_loads(&mut session, &script.fail_urls_containing);
    }

    for event in &script.events {
        session.handle_host_event(event);
        settle_loads(&mut session, &script.fail_urls_containing);
    }

    let events = session
        .drain_events()
        .into_iter()
        .map(|e| record(e.seq, e.kind))
        .collect();
    let euler = session.controller().euler();
    let pool = session.tile_set().pool_stats();
    let textures_failed = failed_layers(&session);

    session.unmount();
    let backend = session.backend();
    Ok(ReplayReport {
        events,
        final_euler: [euler.x, euler.y, euler.z],
        textures_requested: backend.requested,
        textures_disposed: backend.disposed,
        textures_failed,
        pool,
    })
}
