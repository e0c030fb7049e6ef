pub mod footprint;
pub mod geodesy;
pub mod projection;
pub mod quat;
pub mod vec;

pub use footprint::*;
pub use geodesy::*;
pub use projection::*;
pub use quat::*;
pub use vec::*;
