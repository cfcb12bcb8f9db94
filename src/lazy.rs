//! Memoization slot for lazily fetched collections.

use std::future::Future;

use crate::error::Result;

/// A value fetched on first access and kept until invalidated.
///
/// The cell is either unpopulated or holds the fetched value. Population
/// needs `&mut self`, so at most one fetch per cell can be in flight.
#[derive(Debug, Clone)]
pub struct Lazy<T> {
    slot: Option<T>,
}

impl<T> Default for Lazy<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Lazy<T> {
    /// An unpopulated cell.
    #[must_use]
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// A cell that already holds `value`.
    #[must_use]
    pub fn populated(value: T) -> Self {
        Self { slot: Some(value) }
    }

    /// Returns true once a value has been fetched.
    pub fn is_populated(&self) -> bool {
        self.slot.is_some()
    }

    /// The cached value, without fetching.
    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    /// The cached value, mutably, without fetching.
    pub fn peek_mut(&mut self) -> Option<&mut T> {
        self.slot.as_mut()
    }

    /// Return the cached value, running `fetch` first if unpopulated.
    ///
    /// A failed fetch leaves the cell unpopulated.
    pub async fn get_or_fetch<F, Fut>(&mut self, fetch: F) -> Result<&mut T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let value = match self.slot.take() {
            Some(value) => value,
            None => fetch().await?,
        };
        Ok(self.slot.insert(value))
    }

    /// Drop the cached value; the next access fetches again.
    pub fn invalidate(&mut self) -> Option<T> {
        self.slot.take()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::SemaphoreError;

    #[test]
    fn test_fetches_once() {
        let calls = Cell::new(0);
        let counter = &calls;
        let mut lazy = Lazy::new();

        tokio_test::block_on(async {
            let first = *lazy
                .get_or_fetch(move || async move {
                    counter.set(counter.get() + 1);
                    Ok(42)
                })
                .await
                .unwrap();
            let second = *lazy
                .get_or_fetch(move || async move {
                    counter.set(counter.get() + 1);
                    Ok(0)
                })
                .await
                .unwrap();

            assert_eq!(first, 42);
            assert_eq!(second, 42);
        });

        assert_eq!(calls.get(), 1);
        assert!(lazy.is_populated());
    }

    #[test]
    fn test_invalidate_forces_refetch() {
        let mut lazy = Lazy::populated(vec![1]);
        assert_eq!(lazy.invalidate(), Some(vec![1]));
        assert!(!lazy.is_populated());

        let value = tokio_test::block_on(lazy.get_or_fetch(|| async { Ok(vec![2, 3]) })).unwrap();
        assert_eq!(value, &vec![2, 3]);
    }

    #[test]
    fn test_failed_fetch_stays_unpopulated() {
        let mut lazy: Lazy<u32> = Lazy::new();
        let result = tokio_test::block_on(lazy.get_or_fetch(|| async {
            Err(SemaphoreError::NotFound {
                url: "http://semaphore.test".to_string(),
            })
        }));

        assert!(result.is_err());
        assert!(lazy.peek().is_none());
    }
}
