use foundation::math::{LatLng, tile_height_deg, tiles_per_axis};
use scene::camera::Camera;
use scene::picking::pick_globe;
use scene::prefabs::globe::Globe;
use streaming::{
    GpuTexture, LoadOutcome, PoolStats, ResidencyState, TextureBackend, TextureHandle,
    TextureLoadError, TexturePool, TileBounds, TileCoord, TileLayer, TileSourceConfig,
};
use tracing::{debug, warn};

use crate::config::validate_tile_source;
use crate::error::FramingError;

/// One tile of the neighborhood with its two imagery layers.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodTile {
    pub coord: TileCoord,
    pub bounds: TileBounds,
    /// Latitude span of the tile; shrinks away from the equator.
    pub height_deg: f64,
    pub day: TextureHandle,
    pub night: TextureHandle,
}

impl NeighborhoodTile {
    pub fn handle(&self, layer: TileLayer) -> TextureHandle {
        match layer {
            TileLayer::Day => self.day,
            TileLayer::Night => self.night,
        }
    }
}

/// Square grid of tiles around the point the camera is aimed at.
#[derive(Debug, Clone, PartialEq)]
pub struct TileNeighborhood {
    pub center: TileCoord,
    pub look_at: LatLng,
    /// Row-major, north to south then west to east.
    pub tiles: Vec<NeighborhoodTile>,
}

impl TileNeighborhood {
    pub fn coords(&self) -> Vec<TileCoord> {
        self.tiles.iter().map(|t| t.coord).collect()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Tile coordinates of the `(2r+1)²` grid around `center`.
///
/// Columns wrap across the antimeridian. Near the poles the window slides
/// toward the equator instead of shrinking, so the grid is always full as long
/// as the zoom level has at least `2r+1` rows.
pub fn neighborhood_coords(center: TileCoord, radius: u32) -> Vec<TileCoord> {
    let n = u64::from(tiles_per_axis(center.z));
    let r = u64::from(radius);
    let cy = if n > 2 * r {
        u64::from(center.y).clamp(r, n - r - 1)
    } else {
        u64::from(center.y)
    };
    let cy = u32::try_from(cy).unwrap_or(center.y);
    let anchor = TileCoord::new(center.z, center.x, cy);
    let r = i64::from(radius);

    (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter_map(|(dx, dy)| anchor.offset(dx, dy))
        .collect()
}

/// Keeps the textured tile neighborhood in step with the camera aim.
#[derive(Debug)]
pub struct TileSetManager {
    source: TileSourceConfig,
    pool: TexturePool,
    current: Option<TileNeighborhood>,
}

impl TileSetManager {
    /// Fails when the zoom level cannot hold a full neighborhood grid.
    pub fn new(source: TileSourceConfig) -> Result<Self, FramingError> {
        validate_tile_source(&source)?;
        Ok(Self {
            source,
            pool: TexturePool::new(),
            current: None,
        })
    }

    pub fn current(&self) -> Option<&TileNeighborhood> {
        self.current.as_ref()
    }

    pub fn texture_state(&self, handle: TextureHandle) -> Option<ResidencyState> {
        self.pool.state(handle)
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Rebuild the neighborhood around the point under the view center.
    ///
    /// When the center ray misses the globe nothing changes and `None` is
    /// returned; the previous neighborhood stays current. Otherwise the new
    /// tiles are requested first and every texture of the old set is released.
    pub fn recompute<B>(
        &mut self,
        camera: &Camera,
        globe: &Globe,
        backend: &mut B,
    ) -> Option<&TileNeighborhood>
    where
        B: TextureBackend + ?Sized,
    {
        let Some(hit) = pick_globe(globe, camera.center_ray()) else {
            debug!("view center misses the globe; keeping tile neighborhood");
            return None;
        };
        let look_at = hit.lat_lng.wrapped();
        let center = TileCoord::containing(look_at, self.source.zoom);

        let tiles = neighborhood_coords(center, self.source.neighborhood_radius)
            .into_iter()
            .map(|coord| NeighborhoodTile {
                coord,
                bounds: coord.bounds(),
                height_deg: tile_height_deg(coord.y, coord.z),
                day: self
                    .pool
                    .request(self.source.url_for(TileLayer::Day, coord), &mut *backend),
                night: self
                    .pool
                    .request(self.source.url_for(TileLayer::Night, coord), &mut *backend),
            })
            .collect::<Vec<_>>();

        debug!(
            z = center.z,
            x = center.x,
            y = center.y,
            lat = look_at.lat,
            lng = look_at.lng,
            tiles = tiles.len(),
            "rebuilt tile neighborhood"
        );

        let previous = self.current.replace(TileNeighborhood {
            center,
            look_at,
            tiles,
        });
        if let Some(previous) = previous {
            self.release_tiles(&previous, backend);
        }
        self.current.as_ref()
    }

    /// Forward a finished texture fetch to the pool.
    pub fn on_texture_loaded<B>(
        &mut self,
        handle: TextureHandle,
        result: Result<GpuTexture, TextureLoadError>,
        backend: &mut B,
    ) -> LoadOutcome
    where
        B: TextureBackend + ?Sized,
    {
        self.pool.complete(handle, result, backend)
    }

    /// Drop the current neighborhood and free its textures.
    pub fn release_all<B>(&mut self, backend: &mut B)
    where
        B: TextureBackend + ?Sized,
    {
        if let Some(previous) = self.current.take() {
            self.release_tiles(&previous, backend);
        }
    }

    fn release_tiles<B>(&mut self, neighborhood: &TileNeighborhood, backend: &mut B)
    where
        B: TextureBackend + ?Sized,
    {
        for tile in &neighborhood.tiles {
            for layer in TileLayer::ALL {
                if let Err(err) = self.pool.release(tile.handle(layer), backend) {
                    warn!(coord = ?tile.coord, ?layer, "{err}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TileSetManager, neighborhood_coords};
    use crate::error::FramingError;
    use crate::testing::{RecordingBackend, nadir_camera, texture};
    use foundation::math::{LatLng, Quat, Vec3};
    use pretty_assertions::assert_eq;
    use scene::camera::{Camera, look_at_rotation};
    use scene::prefabs::globe::Globe;
    use streaming::{
        LoadOutcome, ResidencyState, TextureLoadError, TileCoord, TileLayer, TileSourceConfig,
    };

    fn source() -> TileSourceConfig {
        TileSourceConfig {
            day_url_template: "day/{z}/{x}/{y}".into(),
            night_url_template: "night/{z}/{x}/{y}".into(),
            ..TileSourceConfig::default()
        }
    }

    #[test]
    fn grid_is_row_major_north_to_south() {
        let coords = neighborhood_coords(TileCoord::new(8, 40, 87), 2);
        assert_eq!(coords.len(), 25);
        assert_eq!(coords[0], TileCoord::new(8, 38, 85));
        assert_eq!(coords[4], TileCoord::new(8, 42, 85));
        assert_eq!(coords[12], TileCoord::new(8, 40, 87));
        assert_eq!(coords[24], TileCoord::new(8, 42, 89));
    }

    #[test]
    fn grid_wraps_columns_across_antimeridian() {
        let coords = neighborhood_coords(TileCoord::new(8, 255, 120), 2);
        let xs: Vec<u32> = coords[..5].iter().map(|c| c.x).collect();
        assert_eq!(xs, vec![253, 254, 255, 0, 1]);
    }

    #[test]
    fn grid_slides_away_from_the_poles() {
        let north = neighborhood_coords(TileCoord::new(8, 10, 0), 2);
        assert_eq!(north.len(), 25);
        assert_eq!(north[0].y, 0);
        assert_eq!(north[12].y, 2);

        let south = neighborhood_coords(TileCoord::new(8, 10, 255), 2);
        assert_eq!(south.len(), 25);
        assert_eq!(south[24].y, 255);
    }

    #[test]
    fn grid_clamps_rows_at_small_zoom_levels() {
        let coords = neighborhood_coords(TileCoord::new(1, 0, 1), 0);
        assert_eq!(coords, vec![TileCoord::new(1, 0, 1)]);
        let wide = neighborhood_coords(TileCoord::new(2, 0, 3), 1);
        assert_eq!(wide.len(), 9);
        assert_eq!(wide[4], TileCoord::new(2, 0, 2));
    }

    #[test]
    fn manager_rejects_zoom_without_room_for_the_grid() {
        let err = TileSetManager::new(TileSourceConfig {
            zoom: 1,
            ..source()
        })
        .unwrap_err();
        assert!(matches!(err, FramingError::InvalidConfig(_)), "{err}");

        let huge = TileSetManager::new(TileSourceConfig {
            neighborhood_radius: u32::MAX,
            ..source()
        });
        assert!(huge.is_err());
        assert!(TileSetManager::new(TileSourceConfig { zoom: 3, ..source() }).is_ok());
    }

    #[test]
    fn recompute_builds_25_tiles_with_day_and_night() {
        let globe = Globe::unit();
        let mut backend = RecordingBackend::default();
        let mut tiles = TileSetManager::new(source()).unwrap();

        let camera = nadir_camera(&globe, LatLng::new(49.1584, -122.9288));
        let hood = tiles.recompute(&camera, &globe, &mut backend).unwrap();
        assert_eq!(hood.len(), 25);
        assert_eq!(hood.center, TileCoord::new(8, 40, 87));
        assert_eq!(backend.started.len(), 50);
        assert!(backend.started.iter().any(|(_, url)| url == "day/8/40/87"));
        assert!(backend.started.iter().any(|(_, url)| url == "night/8/40/87"));

        let middle = &hood.tiles[12];
        assert!((middle.height_deg - (middle.bounds.north - middle.bounds.south)).abs() < 1e-9);
    }

    #[test]
    fn same_pose_gives_same_coords() {
        let globe = Globe::unit();
        let mut backend = RecordingBackend::default();
        let mut tiles = TileSetManager::new(source()).unwrap();
        let camera = nadir_camera(&globe, LatLng::new(-33.9, 18.4));

        let first = tiles.recompute(&camera, &globe, &mut backend).unwrap().coords();
        let second = tiles.recompute(&camera, &globe, &mut backend).unwrap().coords();
        assert_eq!(first, second);
        assert_eq!(tiles.pool_stats().live, 50);
    }

    #[test]
    fn miss_keeps_previous_neighborhood() {
        let globe = Globe::unit();
        let mut backend = RecordingBackend::default();
        let mut tiles = TileSetManager::new(source()).unwrap();
        tiles.recompute(&nadir_camera(&globe, LatLng::new(10.0, 10.0)), &globe, &mut backend);
        let before = tiles.current().cloned();

        let eye = Vec3::new(3.0, 0.0, 0.0);
        let away = look_at_rotation(eye, Vec3::new(4.0, 0.0, 0.0), Vec3::Y).unwrap();
        let camera = Camera::new(eye, away, 45.0, 1.0);
        assert!(tiles.recompute(&camera, &globe, &mut backend).is_none());
        assert_eq!(tiles.current().cloned(), before);
        assert_eq!(backend.started.len(), 50);
    }

    #[test]
    fn miss_before_any_hit_leaves_nothing() {
        let globe = Globe::unit();
        let mut backend = RecordingBackend::default();
        let mut tiles = TileSetManager::new(source()).unwrap();
        let camera = Camera::new(Vec3::new(0.0, 3.0, 0.0), Quat::IDENTITY, 45.0, 1.0);
        assert!(tiles.recompute(&camera, &globe, &mut backend).is_none());
        assert!(tiles.current().is_none());
    }

    #[test]
    fn rebuild_disposes_previous_textures() {
        let globe = Globe::unit();
        let mut backend = RecordingBackend::default();
        let mut tiles = TileSetManager::new(source()).unwrap();
        tiles.recompute(&nadir_camera(&globe, LatLng::new(0.0, 0.0)), &globe, &mut backend);

        let handles: Vec<_> = backend.started.iter().map(|(h, _)| *h).collect();
        for (i, h) in handles.iter().enumerate() {
            let outcome = tiles.on_texture_loaded(*h, Ok(texture(i as u64)), &mut backend);
            assert_eq!(outcome, LoadOutcome::Resident);
        }

        tiles.recompute(&nadir_camera(&globe, LatLng::new(40.0, 60.0)), &globe, &mut backend);
        let mut disposed = backend.disposed.clone();
        disposed.sort_unstable();
        assert_eq!(disposed, (0..50).collect::<Vec<u64>>());

        let stats = tiles.pool_stats();
        assert_eq!(stats.live, 50);
        assert_eq!(stats.released_total, 50);
    }

    #[test]
    fn late_load_after_rebuild_is_disposed() {
        let globe = Globe::unit();
        let mut backend = RecordingBackend::default();
        let mut tiles = TileSetManager::new(source()).unwrap();
        tiles.recompute(&nadir_camera(&globe, LatLng::new(0.0, 0.0)), &globe, &mut backend);
        let old = backend.started[0].0;

        tiles.recompute(&nadir_camera(&globe, LatLng::new(20.0, 20.0)), &globe, &mut backend);
        assert_eq!(
            tiles.on_texture_loaded(old, Ok(texture(77)), &mut backend),
            LoadOutcome::Stale
        );
        assert_eq!(backend.disposed, vec![77]);
    }

    #[test]
    fn failed_layer_is_left_empty() {
        let globe = Globe::unit();
        let mut backend = RecordingBackend::default();
        let mut tiles = TileSetManager::new(source()).unwrap();
        let hood = tiles
            .recompute(&nadir_camera(&globe, LatLng::new(5.0, 5.0)), &globe, &mut backend)
            .unwrap();
        let night = hood.tiles[0].handle(TileLayer::Night);

        let outcome =
            tiles.on_texture_loaded(night, Err(TextureLoadError::new("503")), &mut backend);
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(tiles.texture_state(night), Some(ResidencyState::Failed));
        assert_eq!(backend.started.len(), 50);
    }

    #[test]
    fn release_all_frees_everything() {
        let globe = Globe::unit();
        let mut backend = RecordingBackend::default();
        let mut tiles = TileSetManager::new(source()).unwrap();
        tiles.recompute(&nadir_camera(&globe, LatLng::new(0.0, 0.0)), &globe, &mut backend);
        let first = backend.started[0].0;
        tiles.on_texture_loaded(first, Ok(texture(5)), &mut backend);

        tiles.release_all(&mut backend);
        assert!(tiles.current().is_none());
        assert_eq!(tiles.pool_stats().live, 0);
        assert_eq!(backend.disposed, vec![5]);
    }
}
