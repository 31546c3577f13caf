use std::collections::BTreeSet;

/// Listing positions marked for bulk deletion.
///
/// Indices are only meaningful against the listing they were marked on, so
/// the owner clears the set whenever the listing is fetched again.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    marked: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `index`
    pub fn toggle(&mut self, index: usize) {
        if !self.marked.remove(&index) {
            self.marked.insert(index);
        }
    }

    /// Mark every index in `0..len`
    pub fn select_all(&mut self, len: usize) {
        self.marked = (0..len).collect();
    }

    pub fn clear(&mut self) {
        self.marked.clear();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    /// Marked indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.marked.iter().copied()
    }
}
