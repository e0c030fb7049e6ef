use foundation::math::{LatLng, Vec3, scene_to_lat_lng};

use crate::prefabs::globe::Globe;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir.scale(t)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlobeHit {
    /// Distance along the normalized ray.
    pub distance: f64,
    pub point: Vec3,
    pub lat_lng: LatLng,
}

/// Nearest non-negative ray parameter where `ray` meets the sphere.
///
/// A ray starting inside the sphere reports the exit point.
pub fn ray_sphere_t(ray: Ray, center: Vec3, radius: f64) -> Option<f64> {
    let dir = ray.dir.try_normalize()?;
    let oc = ray.origin - center;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sdisc = disc.sqrt();
    let t0 = -b - sdisc;
    let t1 = -b + sdisc;

    if t0 >= 0.0 {
        Some(t0)
    } else if t1 >= 0.0 {
        Some(t1)
    } else {
        None
    }
}

/// Intersect a ray with the globe and resolve the geographic coordinate.
pub fn pick_globe(globe: &Globe, ray: Ray) -> Option<GlobeHit> {
    let dir = ray.dir.try_normalize()?;
    let ray = Ray::new(ray.origin, dir);
    let t = ray_sphere_t(ray, globe.center, globe.radius)?;
    let point = ray.at(t);
    let lat_lng = scene_to_lat_lng(point - globe.center)?;
    Some(GlobeHit {
        distance: t,
        point,
        lat_lng,
    })
}
