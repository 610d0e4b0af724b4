use crate::error::{Error, Result};

/// Extension trait for reordering vectors by an old-to-new index map
pub trait PermuteExt<T> {
    /// Move every item `i` to position `map[i]`
    ///
    /// The map must contain every index in `0..len` exactly once.
    ///
    /// ```rust
    /// # use ffeatools_utils::PermuteExt;
    /// let items = vec!['a', 'b', 'c'];
    /// assert_eq!(items.permute(&[2, 0, 1]).unwrap(), vec!['b', 'c', 'a']);
    /// ```
    fn permute(self, map: &[usize]) -> Result<Vec<T>>;
}

impl<T> PermuteExt<T> for Vec<T> {
    fn permute(self, map: &[usize]) -> Result<Vec<T>> {
        let length = self.len();
        if map.len() != length {
            return Err(Error::InvalidPermutation {
                length,
                index: map.len(),
            });
        }

        let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(length).collect();
        for (item, &target) in self.into_iter().zip(map) {
            match slots.get_mut(target) {
                Some(slot) if slot.is_none() => *slot = Some(item),
                _ => return Err(Error::InvalidPermutation { length, index: target }),
            }
        }

        // every slot is filled once the map is a bijection
        Ok(slots.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity() {
        let v = vec![1, 2, 3];
        assert_eq!(v.permute(&[0, 1, 2]).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn rejects_duplicates() {
        let v = vec![1, 2, 3];
        assert!(v.permute(&[0, 0, 2]).is_err());
    }

    #[test]
    fn rejects_out_of_range() {
        let v = vec![1, 2];
        assert!(v.permute(&[0, 5]).is_err());
        let v = vec![1, 2];
        assert!(v.permute(&[0]).is_err());
    }
}
