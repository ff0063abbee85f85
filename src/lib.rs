//! Spinning cube renderer with a mirrored cast display.
//!
//! The math core lives in [`alg`]; [`render::NativeRenderer`] drives a
//! graphics [`render::Backend`] and hands finished remote frames to a
//! [`render::Presentation`].

pub mod alg;
pub mod config;
pub mod cube;
pub mod error;
pub mod graphics;
pub mod render;
pub mod scene;
pub mod targets;

pub use error::{Error, MathError, Result};
pub use render::{Backend, Frame, NativeRenderer, Pass, Presentation};
