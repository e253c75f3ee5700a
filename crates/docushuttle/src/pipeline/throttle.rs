use std::time::Duration;

/// Pause between successful forwards.
pub trait Throttle: Send + Sync {
    fn wait(&self, delay: Duration);
}

/// Blocks the worker thread for the full delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct SleepThrottle;

impl Throttle for SleepThrottle {
    fn wait(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}
