//! # Simulation Module
//!
//! Environment consistency passes that run against the loaded chunk
//! collections; currently the bounded water flood simulator.

pub mod water;
