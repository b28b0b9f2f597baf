// file: src/utils/telemetry.rs
// description: timing of external service calls
// reference: Production observability best practices

use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Operation timer for performance tracking
pub struct OperationTimer {
    operation: String,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        info!("Starting operation: {}", operation);
        Self {
            operation: operation.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "Completed operation: {} in {:.2}s",
            self.operation,
            elapsed.as_secs_f64()
        );
        elapsed
    }

    pub fn warn_if_slow(&self, threshold: Duration) -> bool {
        let elapsed = self.elapsed();
        if elapsed > threshold {
            warn!(
                "Slow operation [{}] took {:.2}s (threshold: {:.2}s)",
                self.operation,
                elapsed.as_secs_f64(),
                threshold.as_secs_f64()
            );
            return true;
        }
        false
    }
}
