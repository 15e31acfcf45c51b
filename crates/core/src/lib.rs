//! Domain types and pure logic for the dialogue generator.
//!
//! Everything here is free of I/O except [`thumbnail::downscale_avatar`],
//! which hops onto the blocking pool to decode images.

pub mod character;
pub mod clock;
pub mod error;
pub mod export;
pub mod mock;
pub mod prompt;
pub mod render;
pub mod sanitize;
pub mod settings;
pub mod thumbnail;
pub mod transcript;
pub mod types;
