//! Process-wide transport state.
//!
//! [`global_init`] builds one HTTP client that every [`HttpTransport`]
//! created afterwards shares, so sessions reuse pooled connections.
//! Init and cleanup are serialized by a mutex and both are idempotent.
//!
//! [`HttpTransport`]: crate::HttpTransport

use std::sync::{Mutex, MutexGuard};

use reqwest::blocking::Client;

use crate::transport::build_client;

struct GlobalState {
    client: Option<Client>,
}

static STATE: Mutex<GlobalState> = Mutex::new(GlobalState { client: None });

fn lock() -> MutexGuard<'static, GlobalState> {
    STATE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Initialize process-wide state. Calling it again while initialized is a no-op.
pub fn global_init() {
    let mut state = lock();
    if state.client.is_none() {
        state.client = Some(build_client(None));
        tracing::debug!("Global transport state initialized");
    }
}

/// Release process-wide state. Calling it while not initialized is a no-op.
///
/// Transports that already cloned the shared client keep working.
pub fn global_cleanup() {
    let client = lock().client.take();
    if client.is_some() {
        tracing::debug!("Global transport state released");
    }
}

pub fn is_initialized() -> bool {
    lock().client.is_some()
}

pub(crate) fn shared_client() -> Option<Client> {
    lock().client.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the state is process-wide and unit tests share one process.
    #[test]
    fn test_init_cleanup_cycle() {
        global_init();
        assert!(is_initialized());
        global_init();
        assert!(is_initialized());
        assert!(shared_client().is_some());

        global_cleanup();
        assert!(!is_initialized());
        global_cleanup();
        assert!(!is_initialized());
        assert!(shared_client().is_none());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        global_init();
                    } else {
                        global_cleanup();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        global_cleanup();
        assert!(!is_initialized());
    }
}
