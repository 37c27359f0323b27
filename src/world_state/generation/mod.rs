//! # Generation Module
//!
//! Procedural content: the seeded noise fields, the terrain generator that
//! populates chunks from them, and the deferred structure spawner.

pub mod noise_field;
pub mod structures;
pub mod terrain;
