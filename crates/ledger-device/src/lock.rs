use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Name of the lock every device operation runs under.
pub const LOCK_NAME: &str = "LedgerDevice";

/// Async lock keyed by a constant name; at most one device operation holds it.
#[derive(Debug)]
pub struct DeviceLock {
    name: &'static str,
    inner: Mutex<()>,
}

impl Default for DeviceLock {
    fn default() -> Self {
        Self::new(LOCK_NAME)
    }
}

impl DeviceLock {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wait for the lock. Released when the returned guard drops.
    pub async fn acquire(&self, operation: &'static str) -> DeviceGuard<'_> {
        let guard = self.inner.lock().await;
        debug!(lock = self.name, operation, "device lock acquired");
        DeviceGuard {
            _guard: guard,
            name: self.name,
            operation,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.inner.try_lock().is_err()
    }
}

pub struct DeviceGuard<'a> {
    _guard: MutexGuard<'a, ()>,
    name: &'static str,
    operation: &'static str,
}

impl Drop for DeviceGuard<'_> {
    fn drop(&mut self) {
        debug!(lock = self.name, operation = self.operation, "device lock released");
    }
}
