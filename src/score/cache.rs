//! Lazily computed, explicitly invalidated values

use once_cell::sync::OnceCell;

/// Observable state of a cached value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheState {
    Unset,
    Computed,
}

/// A derived value: `Unset` until first read, then `Computed` until reset
///
/// Reads go through `&self` and are safe from several threads; the first
/// reader computes the value. Invalidation needs `&mut self`, so it can never
/// interleave with a reader of the same entity.
#[derive(Clone, Debug)]
pub struct Cached<T> {
    cell: OnceCell<T>,
}

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self { cell: OnceCell::new() }
    }
}

impl<T> Cached<T> {
    /// Cached value, computing it first when unset
    pub fn get_or_compute(&self, compute: impl FnOnce() -> T) -> &T {
        self.cell.get_or_init(compute)
    }

    /// Cached value, without computing it
    pub fn peek(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn reset(&mut self) {
        self.cell = OnceCell::new();
    }

    pub fn state(&self) -> CacheState {
        if self.cell.get().is_some() {
            CacheState::Computed
        } else {
            CacheState::Unset
        }
    }
}
