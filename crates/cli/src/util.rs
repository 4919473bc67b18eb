use hop_storage::StoreError;
use std::time::Duration;

const BUSY_ATTEMPTS: u32 = 3;
const BUSY_BACKOFF_MS: u64 = 50;

/// Runs a store operation, retrying a bounded number of times when another
/// process holds the database lock. Anything but lock contention surfaces
/// on the first attempt.
pub fn with_busy_retry<T>(
    mut op: impl FnMut() -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let mut attempt = 0u32;
    loop {
        match op() {
            Err(err) if err.is_busy() && attempt + 1 < BUSY_ATTEMPTS => {
                attempt += 1;
                tracing::debug!(attempt, "store busy, retrying");
                std::thread::sleep(Duration::from_millis(BUSY_BACKOFF_MS * u64::from(attempt)));
            }
            result => return result,
        }
    }
}
