//! Natural-key extraction for cached entities.

use std::fmt::Debug;

/// An entity identified by a natural key.
///
/// Cached collections use the key, not structural equality, for membership:
/// two builds with the same number are the same build even if one of them
/// has since finished.
///
/// # Example
///
/// ```ignore
/// use semaphoreapi::{Keyed, Webhook};
///
/// let hook: Webhook = serde_json::from_str(r#"{"id":7,"url":"https://x","hook_type":"all"}"#)?;
/// assert_eq!(hook.key(), 7);
/// ```
pub trait Keyed {
    /// The key type (e.g., a build number).
    type Key: Ord + Clone + Debug;

    /// Extract the key.
    fn key(&self) -> Self::Key;
}
