//! Single-assignment promises.
//!
//! A promise is produced in one task and read from any number of others.
//! Reading before the value exists suspends the reader; every reader is
//! released with the same value once it is set.
//!
//! Writing goes through a [`Resolver`], which is consumed by
//! [`Resolver::resolve`]. There is exactly one resolver per promise, so a
//! value can be set at most once. If the resolver is dropped without
//! resolving (the producing task panicked or gave up), readers get
//! [`PromiseError::Abandoned`] instead of waiting forever.
//!
//! ```
//! use tessera_core::Promise;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (resolver, promise) = Promise::pending();
//! tokio::spawn(async move { resolver.resolve(42) });
//! assert_eq!(promise.get().await, Ok(42));
//! # }
//! ```

use crate::error::PromiseError;
use tokio::sync::watch;
use tracing::debug;

/// The read side of a single-assignment value.
///
/// Clones share the same slot.
#[derive(Debug, Clone)]
pub struct Promise<T> {
    rx: watch::Receiver<Option<T>>,
}

/// The write side of a [`Promise`].
#[derive(Debug)]
pub struct Resolver<T> {
    tx: watch::Sender<Option<T>>,
}

impl<T: Clone> Promise<T> {
    /// Creates an unset promise together with its only resolver.
    pub fn pending() -> (Resolver<T>, Promise<T>) {
        let (tx, rx) = watch::channel(None);
        (Resolver { tx }, Promise { rx })
    }

    /// Creates a promise that already holds `value`.
    pub fn ready(value: T) -> Self {
        let (resolver, promise) = Self::pending();
        resolver.resolve(value);
        promise
    }

    /// Waits until the value is set and returns a copy of it.
    ///
    /// Returns immediately if the value is already there.
    pub async fn get(&self) -> Result<T, PromiseError> {
        let mut rx = self.rx.clone();
        let slot = rx
            .wait_for(Option::is_some)
            .await
            .map_err(|_| PromiseError::Abandoned)?;

        (*slot).clone().ok_or(PromiseError::Abandoned)
    }

    /// Returns the value if it has been set, without waiting.
    pub fn try_get(&self) -> Option<T> {
        self.rx.borrow().clone()
    }

    /// Returns true once a value has been set.
    pub fn is_resolved(&self) -> bool {
        self.rx.borrow().is_some()
    }
}

impl<T> Resolver<T> {
    /// Sets the value and wakes every waiting reader.
    pub fn resolve(self, value: T) {
        // send_replace stores the value even when no reader is left.
        self.tx.send_replace(Some(value));
    }
}

impl<T> Drop for Resolver<T> {
    fn drop(&mut self) {
        if self.tx.borrow().is_none() {
            debug!(
                "Resolver dropped unresolved, {} reader(s) abandoned",
                self.tx.receiver_count()
            );
        }
    }
}
