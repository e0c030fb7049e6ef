pub mod camera;
pub mod lighting;
pub mod picking;
pub mod prefabs;

pub use camera::*;
pub use lighting::*;
pub use picking::*;
