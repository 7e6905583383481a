//! Background removal collaborator abstraction

use crate::error::Result;
use async_trait::async_trait;
use image::{DynamicImage, RgbaImage};

/// Segments a product photo, returning the foreground with transparent background
///
/// Implementations make a single attempt per call; retries and timeouts are
/// their own business. Failures should surface as
/// [`StudioError::DependencyUnavailable`](crate::StudioError::DependencyUnavailable).
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Remove the background from `image`
    ///
    /// # Errors
    /// - Remover unreachable or misconfigured
    /// - Remover reply cannot be decoded as an image
    async fn remove(&self, image: &DynamicImage) -> Result<RgbaImage>;
}
