//! Progress reporting service
//!
//! This module separates progress reporting concerns from the compositing
//! logic, allowing different frontends to implement their own progress handling.

use crate::types::ProcessingTimings;
use instant::Instant;

/// Progress stages of one compositing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Loading and decoding input image
    ImageLoading,
    /// Waiting on the background remover
    BackgroundRemoval,
    /// Cropping to the visible foreground
    Cropping,
    /// Sharpness and color boosts
    Enhancement,
    /// Drop shadow synthesis
    ShadowSynthesis,
    /// Scaling and pasting onto the canvas
    Composition,
    /// Encoding the composite
    Encoding,
    /// Processing completed
    Completed,
}

impl ProcessingStage {
    /// Get a human-readable description of the processing stage
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ProcessingStage::ImageLoading => "Loading input image",
            ProcessingStage::BackgroundRemoval => "Removing background",
            ProcessingStage::Cropping => "Cropping to product",
            ProcessingStage::Enhancement => "Enhancing sharpness and color",
            ProcessingStage::ShadowSynthesis => "Adding drop shadow",
            ProcessingStage::Composition => "Composing on canvas",
            ProcessingStage::Encoding => "Encoding output",
            ProcessingStage::Completed => "Processing completed",
        }
    }

    /// Get the typical progress percentage for this stage
    #[must_use]
    pub fn progress_percentage(&self) -> u8 {
        match self {
            ProcessingStage::ImageLoading => 5,
            ProcessingStage::BackgroundRemoval => 60,
            ProcessingStage::Cropping => 65,
            ProcessingStage::Enhancement => 75,
            ProcessingStage::ShadowSynthesis => 85,
            ProcessingStage::Composition => 95,
            ProcessingStage::Encoding => 98,
            ProcessingStage::Completed => 100,
        }
    }
}

/// Progress update containing stage and timing information
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    /// Current processing stage
    pub stage: ProcessingStage,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Human-readable stage description
    pub description: String,
    /// Elapsed time since processing started (milliseconds)
    pub elapsed_ms: u64,
}

impl ProgressUpdate {
    /// Create a new progress update
    #[must_use]
    pub fn new(stage: ProcessingStage, start_time: Instant) -> Self {
        Self {
            progress: stage.progress_percentage(),
            description: stage.description().to_string(),
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            stage,
        }
    }
}

/// Trait for reporting progress during compositing
pub trait ProgressReporter: Send + Sync {
    /// Report a progress update
    fn report_progress(&self, update: ProgressUpdate);

    /// Report processing completion with final timings
    fn report_completion(&self, timings: ProcessingTimings);

    /// Report an error during processing
    fn report_error(&self, stage: ProcessingStage, error: &str);
}

/// No-op progress reporter that discards all progress updates
pub struct NoOpProgressReporter;

impl ProgressReporter for NoOpProgressReporter {
    fn report_progress(&self, _update: ProgressUpdate) {}

    fn report_completion(&self, _timings: ProcessingTimings) {}

    fn report_error(&self, _stage: ProcessingStage, _error: &str) {}
}

/// Console progress reporter that emits progress as tracing events
pub struct ConsoleProgressReporter {
    verbose: bool,
}

impl ConsoleProgressReporter {
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn report_progress(&self, update: ProgressUpdate) {
        if self.verbose {
            tracing::info!(
                "[{}%] {} ({}ms elapsed)",
                update.progress,
                update.description,
                update.elapsed_ms
            );
        } else {
            tracing::debug!("[{}%] {}", update.progress, update.description);
        }
    }

    fn report_completion(&self, timings: ProcessingTimings) {
        tracing::info!("✅ Composite ready in {}ms", timings.total_ms);
        if self.verbose {
            tracing::info!("  📊 {}", timings.summary());
        }
    }

    fn report_error(&self, stage: ProcessingStage, error: &str) {
        tracing::error!("❌ Error during {}: {}", stage.description(), error);
    }
}

/// Progress tracker that manages timing and progress reporting
pub struct ProgressTracker {
    reporter: Box<dyn ProgressReporter>,
    start_time: Instant,
    current_stage: Option<ProcessingStage>,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified reporter
    #[must_use]
    pub fn new(reporter: Box<dyn ProgressReporter>) -> Self {
        Self {
            reporter,
            start_time: Instant::now(),
            current_stage: None,
        }
    }

    /// Create a progress tracker with no-op reporter
    #[must_use]
    pub fn no_op() -> Self {
        Self::new(Box::new(NoOpProgressReporter))
    }

    /// Create a progress tracker with console reporter
    #[must_use]
    pub fn console(verbose: bool) -> Self {
        Self::new(Box::new(ConsoleProgressReporter::new(verbose)))
    }

    /// Restart the clock for a new item
    pub fn restart(&mut self) {
        self.start_time = Instant::now();
        self.current_stage = None;
    }

    /// Report progress for a specific stage
    pub fn report_stage(&mut self, stage: ProcessingStage) {
        self.current_stage = Some(stage.clone());
        let update = ProgressUpdate::new(stage, self.start_time);
        self.reporter.report_progress(update);
    }

    /// Report completion with final timings
    pub fn report_completion(&self, timings: ProcessingTimings) {
        self.reporter.report_completion(timings);
    }

    /// Report an error against the current stage
    pub fn report_error(&self, error: &str) {
        let stage = self
            .current_stage
            .clone()
            .unwrap_or(ProcessingStage::ImageLoading);
        self.reporter.report_error(stage, error);
    }

    /// Get the current processing stage
    #[must_use]
    pub fn current_stage(&self) -> Option<&ProcessingStage> {
        self.current_stage.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingReporter {
        stages: Arc<Mutex<Vec<ProcessingStage>>>,
        errors: Arc<Mutex<Vec<(ProcessingStage, String)>>>,
        completions: Arc<Mutex<usize>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report_progress(&self, update: ProgressUpdate) {
            self.stages.lock().unwrap().push(update.stage);
        }

        fn report_completion(&self, _timings: ProcessingTimings) {
            *self.completions.lock().unwrap() += 1;
        }

        fn report_error(&self, stage: ProcessingStage, error: &str) {
            self.errors.lock().unwrap().push((stage, error.to_string()));
        }
    }

    #[test]
    fn test_processing_stage_progress_increases() {
        let stages = [
            ProcessingStage::ImageLoading,
            ProcessingStage::BackgroundRemoval,
            ProcessingStage::Cropping,
            ProcessingStage::Enhancement,
            ProcessingStage::ShadowSynthesis,
            ProcessingStage::Composition,
            ProcessingStage::Encoding,
            ProcessingStage::Completed,
        ];
        for pair in stages.windows(2) {
            if let [a, b] = pair {
                assert!(a.progress_percentage() < b.progress_percentage());
            }
        }
        assert_eq!(ProcessingStage::Completed.progress_percentage(), 100);
        assert_eq!(ProcessingStage::ShadowSynthesis.description(), "Adding drop shadow");
    }

    #[test]
    fn test_progress_tracker() {
        let reporter = RecordingReporter::default();
        let mut tracker = ProgressTracker::new(Box::new(reporter.clone()));
        assert!(tracker.current_stage().is_none());

        tracker.report_stage(ProcessingStage::BackgroundRemoval);
        tracker.report_error("remover offline");
        tracker.report_stage(ProcessingStage::Composition);
        tracker.report_completion(ProcessingTimings::default());

        assert_eq!(
            *reporter.stages.lock().unwrap(),
            vec![ProcessingStage::BackgroundRemoval, ProcessingStage::Composition]
        );
        assert_eq!(
            reporter.errors.lock().unwrap().first().map(|(s, _)| s.clone()),
            Some(ProcessingStage::BackgroundRemoval)
        );
        assert_eq!(*reporter.completions.lock().unwrap(), 1);

        tracker.restart();
        assert!(tracker.current_stage().is_none());
    }
}
