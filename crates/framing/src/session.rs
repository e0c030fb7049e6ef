use foundation::math::{EulerXyz, Vec3};
use scene::camera::Camera;
use scene::lighting::LightRig;
use scene::prefabs::globe::Globe;
use streaming::{GpuTexture, LoadOutcome, TextureBackend, TextureHandle, TextureLoadError};
use tracing::{debug, info, warn};

use crate::config::{FramingConfig, Viewport};
use crate::error::FramingError;
use crate::controller::{ControlEvent, ControlInput, FlyController};
use crate::ephemeris::{LowPrecisionSun, SunEphemeris};
use crate::events::{Event, EventBus, FramingEvent};
use crate::input::{HostEvent, InputAdapter};
use crate::pose::{GroundTarget, OrbitalPose};
use crate::targeting::{CameraPlacement, look_at, place_sun};
use crate::tileset::{TileNeighborhood, TileSetManager};

/// The framing preview as the host sees it.
///
/// Owns the controller, the tile set and the lights, and wires them together:
/// selecting a pass re-aims the camera and the sun, and every settled drag
/// rebuilds the tiles. Until [`FramingSession::mount`] is called every
/// operation is a no-op.
pub struct FramingSession<B: TextureBackend> {
    config: FramingConfig,
    globe: Globe,
    adapter: InputAdapter,
    controller: FlyController,
    tiles: TileSetManager,
    lights: LightRig,
    ephemeris: Box<dyn SunEphemeris>,
    backend: B,
    mounted: bool,
    position: Option<Vec3>,
    events: EventBus<FramingEvent>,
}

impl<B: TextureBackend> FramingSession<B> {
    /// Fails with [`FramingError::InvalidConfig`] when `config` does not
    /// validate.
    pub fn new(config: FramingConfig, backend: B) -> Result<Self, FramingError> {
        Self::with_ephemeris(config, backend, Box::new(LowPrecisionSun))
    }

    pub fn with_ephemeris(
        config: FramingConfig,
        backend: B,
        ephemeris: Box<dyn SunEphemeris>,
    ) -> Result<Self, FramingError> {
        config.validate()?;
        Ok(Self {
            globe: Globe::unit(),
            adapter: InputAdapter::new(config.controls.modifier_key.clone()),
            controller: FlyController::new(config.optics, &config.controls, config.viewport),
            tiles: TileSetManager::new(config.tiles.clone())?,
            lights: LightRig::new(
                config.lighting.directional_intensity,
                config.lighting.ambient_intensity,
            ),
            ephemeris,
            backend,
            mounted: false,
            position: None,
            events: EventBus::new(),
            config,
        })
    }

    pub fn config(&self) -> &FramingConfig {
        &self.config
    }

    pub fn globe(&self) -> &Globe {
        &self.globe
    }

    pub fn controller(&self) -> &FlyController {
        &self.controller
    }

    pub fn tiles(&self) -> Option<&TileNeighborhood> {
        self.tiles.current()
    }

    pub fn tile_set(&self) -> &TileSetManager {
        &self.tiles
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Attach to a viewport. Input and pass selection take effect from here on.
    pub fn mount(&mut self, viewport: Viewport) {
        self.mounted = true;
        self.controller.handle(ControlInput::Resize {
            width: viewport.width,
            height: viewport.height,
        });
        debug!(width = viewport.width, height = viewport.height, "framing view mounted");
    }

    /// Detach and free every tile texture.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.tiles.release_all(&mut self.backend);
        self.mounted = false;
        self.position = None;
        debug!("framing view unmounted");
    }

    /// Current preview camera, once mounted and placed by a pass.
    pub fn camera(&self) -> Option<Camera> {
        if !self.is_mounted() {
            return None;
        }
        let position = self.position?;
        Some(Camera::new(
            position,
            self.controller.orientation(),
            self.config.optics.fov_y_deg,
            self.controller.viewport().aspect(),
        ))
    }

    /// Aim the camera from `pose` at `target`, relight the scene for the pass
    /// time and rebuild the tiles.
    pub fn select_pass(
        &mut self,
        pose: OrbitalPose,
        target: GroundTarget,
    ) -> Option<CameraPlacement> {
        if !self.is_mounted() {
            return None;
        }
        let Some(placement) = look_at(&self.globe, &pose, &target) else {
            warn!(?pose, ?target, "camera coincides with target; pass ignored");
            return None;
        };

        self.position = Some(placement.position);
        self.controller.set_orientation(placement.orientation);
        let subsolar = place_sun(
            &mut self.lights,
            self.ephemeris.as_ref(),
            &self.globe,
            pose.time(),
            self.config.lighting.sun_distance_radii,
        );
        info!(
            lat = pose.lat,
            lng = pose.lng,
            height_km = pose.height_km,
            sun_lat = subsolar.lat,
            sun_lng = subsolar.lng,
            "pass selected"
        );
        let euler = self.controller.euler();
        self.events.emit(FramingEvent::PassSelected {
            pose,
            target,
            euler,
        });
        self.rebuild_tiles();
        Some(placement)
    }

    /// Re-apply an orientation the host persisted from an earlier
    /// [`FramingEvent::Settled`] and rebuild the tiles around it. Ignored
    /// until a pass has placed the camera.
    pub fn restore_orientation(&mut self, euler: EulerXyz) -> bool {
        if self.camera().is_none() {
            return false;
        }
        let previous = self.controller.orientation();
        self.controller.set_orientation_euler(euler);
        debug!(
            turned_rad = previous.angle_to(self.controller.orientation()),
            "orientation restored"
        );
        self.rebuild_tiles();
        true
    }

    pub fn handle_input(&mut self, input: ControlInput) -> Option<ControlEvent> {
        if !self.is_mounted() {
            return None;
        }
        let event = self.controller.handle(input)?;
        if let ControlEvent::Settled { euler } = event {
            self.events.emit(FramingEvent::Settled { euler });
            self.rebuild_tiles();
        }
        Some(event)
    }

    pub fn handle_host_event(&mut self, event: &HostEvent) -> Vec<ControlEvent> {
        self.adapter
            .translate(event)
            .into_iter()
            .filter_map(|input| self.handle_input(input))
            .collect()
    }

    /// Report a finished texture fetch. Accepted after unmount too, so late
    /// loads still get disposed.
    pub fn on_texture_loaded(
        &mut self,
        handle: TextureHandle,
        result: Result<GpuTexture, TextureLoadError>,
    ) -> LoadOutcome {
        self.tiles.on_texture_loaded(handle, result, &mut self.backend)
    }

    pub fn drain_events(&mut self) -> Vec<Event<FramingEvent>> {
        self.events.drain()
    }

    fn rebuild_tiles(&mut self) {
        let Some(camera) = self.camera() else {
            return;
        };
        if let Some(hood) = self.tiles.recompute(&camera, &self.globe, &mut self.backend) {
            let center = hood.center;
            self.events.emit(FramingEvent::TilesRebuilt { center });
        }
    }
}
