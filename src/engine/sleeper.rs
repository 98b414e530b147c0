// src/engine/sleeper.rs

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Backoff waits go through this so tests don't actually sleep.
pub trait Sleeper: Send {
    fn sleep(&mut self, delay: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&mut self, delay: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(delay))
    }
}
