//! Services layer
//!
//! I/O, encoding, progress reporting and the text-side collaborators
//! (page scraping, vision captioning) kept apart from the pixel algorithms.

pub mod captioner;
pub mod format;
pub mod io;
pub mod progress;
pub mod scraper;

pub use self::captioner::{caption_or_fallback, HuggingFaceCaptioner, VisionCaptioner, FALLBACK_CAPTION};
pub use self::format::OutputFormatHandler;
pub use self::io::ImageIOService;
pub use self::progress::{
    ConsoleProgressReporter, NoOpProgressReporter, ProcessingStage, ProgressReporter,
    ProgressTracker, ProgressUpdate,
};
pub use self::scraper::{extract_features, HttpPageScraper, PageScraper};
