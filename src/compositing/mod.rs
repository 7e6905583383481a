//! Pixel-level building blocks of the compositing pipeline
//!
//! - [`alpha`]: bounding boxes, crops and alpha-masked pastes
//! - [`enhance`]: sharpness and color boosts
//! - [`shadow`]: drop shadow synthesis with silent fallback
//! - [`canvas`]: shrink-to-fit scaling and centering on a solid canvas

pub mod alpha;
pub mod canvas;
pub mod enhance;
pub mod shadow;

pub use alpha::{alpha_bbox, crop_to_bbox, crop_to_content};
pub use canvas::{CanvasComposer, Placement};
pub use enhance::ImageEnhancer;
pub use shadow::ShadowSynthesizer;
