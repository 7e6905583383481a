//! Background removal backends
//!
//! This module provides the concrete removers used by the compositing pipeline:
//! - Remote backend (HTTP segmentation service)
//! - Color-key backend (local, for plain studio backdrops)

pub mod color_key;
pub mod remote;

// Test utilities for pipeline testing
#[cfg(test)]
pub mod test_utils;

pub use self::color_key::ColorKeyRemover;
pub use self::remote::RemoteBackgroundRemover;
