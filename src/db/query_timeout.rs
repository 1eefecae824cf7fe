// Database query timeout protection
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

pub struct QueryTimeout;

impl QueryTimeout {
    /// Runs a store call under a deadline. An elapsed deadline surfaces as
    /// `sqlx::Error::Io(TimedOut)`, the same shape as a lost connection.
    pub async fn execute_with_timeout<F, T>(
        query_fn: F,
        timeout_duration: Duration,
    ) -> Result<T, sqlx::Error>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match timeout(timeout_duration, query_fn).await {
            Ok(result) => result,
            Err(_) => Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("Query timed out after {:?}", timeout_duration),
            ))),
        }
    }

    /// Default timeout for most queries (5 seconds)
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Longer timeout for aggregation queries (30 seconds)
    pub const AGGREGATION_TIMEOUT: Duration = Duration::from_secs(30);
}
