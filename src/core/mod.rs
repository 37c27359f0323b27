//! # Core Module
//!
//! Fundamental concurrency primitives shared across the world core.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write
//!   locking, used to share the chunk collections between the owner thread
//!   and read-only consumers such as parallel mesh builds.

pub mod mt_resource;

pub use mt_resource::MtResource;
