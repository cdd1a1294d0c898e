use std::time::Duration;

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    pub every: usize,
    pub pause: Duration,
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self {
            every: 100,
            pause: Duration::from_secs(30),
        }
    }
}

/// Fixed-window flow control: one pause after every `every` processed items.
#[derive(Debug)]
pub struct CooldownLimiter {
    policy: CooldownPolicy,
    processed: usize,
    pauses: usize,
}

impl CooldownLimiter {
    pub fn new(policy: CooldownPolicy) -> Self {
        Self {
            policy: CooldownPolicy {
                every: policy.every.max(1),
                pause: policy.pause,
            },
            processed: 0,
            pauses: 0,
        }
    }

    /// Counts one processed item and returns the pause owed before the next
    /// one. No pause is owed when nothing remains.
    pub fn record(&mut self, more_remaining: bool) -> Option<Duration> {
        self.processed += 1;
        if more_remaining && self.processed % self.policy.every == 0 {
            self.pauses += 1;
            Some(self.policy.pause)
        } else {
            None
        }
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn pauses(&self) -> usize {
        self.pauses
    }
}
