//! Defocus Simulator - binocular refractive blur over live video
//!
//! Renders a camera feed (or a bundled sample clip when no camera is
//! available) twice: once untouched for reference, once through a Gaussian
//! blur whose radius is driven by a two-eye prescription model.

pub mod app;
pub mod model;
pub mod source;
pub mod ui;

pub use app::App;
