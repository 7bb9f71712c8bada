use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory fixed-window call counter, keyed by caller-chosen strings.
///
/// Bounds how often the metered Gemini API is called from one process. It is
/// intentionally approximate: no persistence, no cross-instance coordination.
/// Construct one at startup, share it behind an `Arc`, and let it live for
/// the whole process; state resets only on restart.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    window_start: Instant,
    count: u32,
}

impl RateLimiter {
    /// Allow `max_requests` calls per `window`, per key.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Check the key against its window, consuming one slot when allowed.
    ///
    /// Returns `true` when the key has exhausted its window. A limited call
    /// leaves the counter untouched, so probing does not extend the window.
    pub fn is_limited(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match entries.get_mut(key) {
            None => {
                // First call on this key
                entries.insert(
                    key.to_string(),
                    WindowEntry {
                        window_start: now,
                        count: 1,
                    },
                );
                false
            }
            Some(entry) => {
                if now.duration_since(entry.window_start) > self.window {
                    // Window elapsed, start a fresh one
                    *entry = WindowEntry {
                        window_start: now,
                        count: 1,
                    };
                    false
                } else if entry.count < self.max_requests {
                    entry.count += 1;
                    false
                } else {
                    true
                }
            }
        }
    }
}
