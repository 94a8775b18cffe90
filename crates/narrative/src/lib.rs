//! Scroll-driven narrative for the portfolio globe.
//!
//! Scroll offsets become progress and region edge events ([`scroll`]), the
//! [`controller`] resolves them into a [`SectionState`] and applies the
//! section's side effects to the scene, and the [`render_loop`] ticks the
//! shared clock and hands one [`FrameView`] per frame to a draw surface.

pub mod config;
pub mod controller;
pub mod pose;
pub mod render_loop;
pub mod scroll;
pub mod section;

pub use config::*;
pub use controller::*;
pub use pose::*;
pub use render_loop::*;
pub use scroll::*;
pub use section::*;
