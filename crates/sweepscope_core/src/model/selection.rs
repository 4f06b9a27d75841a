use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

/// Ordered set of result variables chosen for rendering.
///
/// Insertion order is render order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotSelection {
    names: Vec<String>,
}

impl PlotSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, name: &str) -> bool {
        match self.names.iter().position(|n| n == name) {
            Some(pos) => {
                self.names.remove(pos);
                false
            }
            None => {
                self.names.push(name.to_string());
                true
            }
        }
    }

    /// Add `name` at the end unless already selected
    pub fn select(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Plot grid layout settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    columns_per_row: NonZeroUsize,
}

impl LayoutConfig {
    /// `None` when `columns_per_row` is zero
    pub fn new(columns_per_row: usize) -> Option<Self> {
        NonZeroUsize::new(columns_per_row).map(|columns_per_row| Self { columns_per_row })
    }

    pub fn columns_per_row(&self) -> usize {
        self.columns_per_row.get()
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns_per_row: NonZeroUsize::MIN.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_keeps_insertion_order() {
        let mut sel = PlotSelection::new();
        assert!(sel.toggle("b"));
        assert!(sel.toggle("a"));
        assert!(sel.toggle("c"));
        assert!(!sel.toggle("a"));
        assert!(sel.toggle("a"));
        assert_eq!(sel.names(), &["b", "c", "a"]);
    }

    #[test]
    fn test_layout_rejects_zero() {
        assert!(LayoutConfig::new(0).is_none());
        assert_eq!(LayoutConfig::new(3).unwrap().columns_per_row(), 3);
        assert_eq!(LayoutConfig::default().columns_per_row(), 2);
    }
}
