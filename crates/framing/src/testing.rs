use foundation::math::{LatLng, Vec3};
use scene::camera::{Camera, look_at_rotation};
use scene::prefabs::globe::Globe;
use streaming::{GpuTexture, TextureBackend, TextureHandle};

/// Backend that records requests and disposals instead of touching a GPU.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub started: Vec<(TextureHandle, String)>,
    pub disposed: Vec<u64>,
}

impl TextureBackend for RecordingBackend {
    fn begin_load(&mut self, handle: TextureHandle, url: &str) {
        self.started.push((handle, url.to_string()));
    }

    fn dispose(&mut self, texture: GpuTexture) {
        self.disposed.push(texture.id);
    }
}

pub fn texture(id: u64) -> GpuTexture {
    GpuTexture {
        id,
        width: 256,
        height: 256,
    }
}

/// Camera 550 km above `at`, looking straight down.
pub fn nadir_camera(globe: &Globe, at: LatLng) -> Camera {
    let eye = globe.position(at, 550.0);
    let q = look_at_rotation(eye, globe.surface_point(at), Vec3::Y).unwrap();
    Camera::new(eye, q, 45.0, 1.0)
}
