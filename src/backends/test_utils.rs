//! Test utilities and mock removers
//!
//! Mock implementations of the `BackgroundRemover` trait so the pipeline can
//! be exercised without a segmentation service.

use crate::{
    error::{Result, StudioError},
    remover::BackgroundRemover,
};
use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use std::sync::{Arc, Mutex};

/// What the mock hands back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Keep the center half of the image opaque, clear the rest
    CenterCutout,
    /// Return a fully transparent image of the same size
    FullyTransparent,
    /// Fail as if the service were offline
    Unavailable,
}

/// Mock background remover with call history
#[derive(Debug, Clone)]
pub struct MockBackgroundRemover {
    name: String,
    behavior: MockBehavior,
    call_history: Arc<Mutex<Vec<(u32, u32)>>>,
}

impl MockBackgroundRemover {
    #[must_use]
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            name: "mock".to_string(),
            behavior,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Dimensions of every image this mock was asked to process
    pub fn get_call_history(&self) -> Vec<(u32, u32)> {
        self.call_history.lock().unwrap().clone()
    }

    fn record_call(&self, image: &DynamicImage) {
        if let Ok(mut history) = self.call_history.lock() {
            history.push((image.width(), image.height()));
        }
    }
}

#[async_trait]
impl BackgroundRemover for MockBackgroundRemover {
    fn name(&self) -> &str {
        &self.name
    }

    async fn remove(&self, image: &DynamicImage) -> Result<RgbaImage> {
        self.record_call(image);

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        match self.behavior {
            MockBehavior::Unavailable => Err(StudioError::dependency_unavailable(
                "Mock remover is offline",
            )),
            MockBehavior::FullyTransparent => {
                Ok(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])))
            },
            MockBehavior::CenterCutout => Ok(RgbaImage::from_fn(width, height, |x, y| {
                let inside = x >= width / 4 && x < width * 3 / 4 && y >= height / 4 && y < height * 3 / 4;
                let p = rgba.get_pixel(x, y);
                Rgba([p[0], p[1], p[2], if inside { 255 } else { 0 }])
            })),
        }
    }
}
