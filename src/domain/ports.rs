use crate::utils::error::Result;

/// Durable key-value storage backing the session. `read` returns `None` for
/// an absent key rather than an error.
pub trait SessionStorage: Send + Sync {
    fn read(&self, key: &str)
        -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn write(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn remove(&self, key: &str) -> impl std::future::Future<Output = Result<()>> + Send;
}
