//! Barrier bars — an animated demonstration of two-phase barrier
//! synchronization.
//!
//! Bars fill at random toward a low capacity and wait at a barrier; once all
//! of them arrive the barrier is lifted and they fill toward a higher one.

pub mod bar;
pub mod config;
pub mod demo;
pub mod error;
pub mod factory;
pub mod logging;
pub mod phase;
pub mod player;
pub mod renderer;
pub mod shapes;
pub mod surface;
pub mod timer;
pub mod types;

pub use demo::{Demo, Stage};
pub use error::DemoError;
