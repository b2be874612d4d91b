//! Point-in-time copy of the live buffer contents

use std::fmt;

/// Live elements of a buffer in FIFO order, copied out under its lock.
///
/// Holds at most `N` values inline; taking one never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot<const N: usize> {
    items: [u32; N],
    len: usize,
}

impl<const N: usize> Snapshot<N> {
    pub(crate) const fn empty() -> Self {
        Self {
            items: [0; N],
            len: 0,
        }
    }

    pub(crate) fn push(&mut self, value: u32) {
        self.items[self.len] = value;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.items[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Oldest value first
    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.as_slice().iter()
    }
}

impl<'a, const N: usize> IntoIterator for &'a Snapshot<N> {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<const N: usize> IntoIterator for Snapshot<N> {
    type Item = u32;
    type IntoIter = std::iter::Take<std::array::IntoIter<u32, N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter().take(self.len)
    }
}

/// Space-separated values, the way the serial console listing prints them
impl<const N: usize> fmt::Display for Snapshot<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}
