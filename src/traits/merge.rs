//! Merging of paginated list envelopes.

/// Combine one page of a paginated response into the accumulated value.
///
/// Implementations take the union of the member collections. Duplicates
/// are left for the keyed container to absorb.
pub trait Merge {
    /// Fold `next` into `self`.
    fn merge(&mut self, next: Self);
}

impl<T> Merge for Vec<T> {
    fn merge(&mut self, next: Self) {
        self.extend(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_merge_keeps_duplicates() {
        let mut first = vec![1, 2];
        first.merge(vec![2, 3]);
        assert_eq!(first, vec![1, 2, 2, 3]);
    }
}
