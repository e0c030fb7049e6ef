pub mod config;
pub mod pool;
pub mod residency;
pub mod tile;

pub use config::*;
pub use pool::*;
pub use residency::*;
pub use tile::*;
