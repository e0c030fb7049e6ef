//! Framing preview for satellite image requests.
//!
//! A camera is placed at the satellite's predicted position and aimed at the
//! requested ground target. The operator can then fine-tune the aim, and after
//! every gesture the imagery tiles around the new look-at point are rebuilt.

pub mod config;
pub mod controller;
pub mod ephemeris;
pub mod error;
pub mod events;
pub mod input;
pub mod pose;
pub mod session;
pub mod targeting;
pub mod tileset;

#[cfg(test)]
mod testing;

pub use config::*;
pub use controller::*;
pub use ephemeris::*;
pub use error::*;
pub use events::*;
pub use input::*;
pub use pose::*;
pub use session::*;
pub use targeting::*;
pub use tileset::*;
