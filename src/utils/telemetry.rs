// file: src/utils/telemetry.rs
// description: stage timing for imports and other multi-step operations

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Times an operation and the named stages inside it.
pub struct OperationTimer {
    operation: String,
    start: Instant,
    lap_start: Instant,
    stages: Vec<(String, Duration)>,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        debug!("Starting operation: {}", operation);
        let now = Instant::now();
        Self {
            operation: operation.to_string(),
            start: now,
            lap_start: now,
            stages: Vec::new(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Closes the current stage under `name` and starts the next one.
    pub fn stage(&mut self, name: &str) -> Duration {
        let now = Instant::now();
        let lap = now - self.lap_start;
        self.lap_start = now;

        debug!(
            "{} / {}: {:.1}ms",
            self.operation,
            name,
            lap.as_secs_f64() * 1000.0
        );
        self.stages.push((name.to_string(), lap));
        lap
    }

    pub fn stages(&self) -> &[(String, Duration)] {
        &self.stages
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.elapsed();
        info!("{} finished in {:.2}s", self.operation, elapsed.as_secs_f64());
        elapsed
    }

    /// Like [`finish`](Self::finish), also reporting items per second.
    pub fn finish_with_count(self, count: usize) -> Duration {
        let elapsed = self.elapsed();
        info!(
            "{} finished: {} items in {:.2}s ({:.1} items/sec)",
            self.operation,
            count,
            elapsed.as_secs_f64(),
            throughput(count, elapsed)
        );
        elapsed
    }
}

/// Items per second; zero for an instant operation.
pub fn throughput(count: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { count as f64 / secs } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_are_recorded_in_order() {
        let mut timer = OperationTimer::new("import");
        std::thread::sleep(Duration::from_millis(5));
        let first = timer.stage("extract");
        timer.stage("reconcile");

        let names: Vec<&str> = timer.stages().iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["extract", "reconcile"]);
        assert!(first >= Duration::from_millis(5));

        let total = timer.finish_with_count(3);
        assert!(total >= first);
    }

    #[test]
    fn test_throughput() {
        assert_eq!(throughput(100, Duration::from_secs(10)), 10.0);
        assert_eq!(throughput(100, Duration::ZERO), 0.0);
    }
}
