use crate::error::StorageResult;
use std::future::Future;

/// Key/value store for the controller's persistent state.
///
/// This trait defines the contract for credential persistence, enabling
/// testability through the in-memory implementation and separation of
/// concerns. The methods are desugared `async fn`s returning
/// `impl Future + Send`, so callers that are generic over the store (the
/// binary is) can still spawn the controller task; implementations write
/// plain `async fn` and the compiler checks the `Send` bound.
///
/// # Staging semantics
///
/// `put` stages a value; only `commit` makes staged values durable and
/// visible to a later `get`. Callers that need atomicity across keys
/// (the controller always does) stage every key and commit once.
pub trait CredentialStore: Send {
    /// Read the committed value for a key.
    fn get(&self, key: &str) -> impl Future<Output = StorageResult<Option<String>>> + Send;

    /// Stage a value for a key. Not durable until [`commit`](Self::commit).
    fn put(&mut self, key: &str, value: &str) -> impl Future<Output = StorageResult<()>> + Send;

    /// Flush all staged values atomically.
    ///
    /// On success the staged set is empty and every staged value is
    /// durable. On failure nothing staged is applied.
    fn commit(&mut self) -> impl Future<Output = StorageResult<()>> + Send;
}
