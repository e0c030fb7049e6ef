use foundation::math::Vec3;

/// Directional light placed at a point and aimed at a target.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
    pub intensity: f64,
}

impl DirectionalLight {
    /// Unit vector from the target towards the light.
    pub fn direction(&self) -> Vec3 {
        (self.position - self.target).normalize_or_zero()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub intensity: f64,
}

/// The lights of the framing scene, owned by the host and passed by reference
/// to whatever repositions them.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightRig {
    pub sun: DirectionalLight,
    pub ambient: AmbientLight,
}

impl LightRig {
    pub fn new(directional_intensity: f64, ambient_intensity: f64) -> Self {
        Self {
            sun: DirectionalLight {
                position: Vec3::X,
                target: Vec3::ZERO,
                intensity: directional_intensity,
            },
            ambient: AmbientLight {
                intensity: ambient_intensity,
            },
        }
    }
}
