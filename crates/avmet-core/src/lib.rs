//! Report model and decode engine for METAR observations
//!
//! This crate provides the strongly-typed report model, the token-cursor
//! decode driver with its per-field decoders, and the unit conversions
//! they share. The decoder is a pure function over the raw report string
//! and a reference date; everything network- or storage-shaped lives in
//! the collaborator crates.

pub mod decode;
pub mod pipeline;
pub mod sky;
pub mod types;
pub mod units;
pub mod visibility;
pub mod wind;

pub use decode::*;
pub use pipeline::*;
pub use types::*;
pub use units::SpeedUnit;
