//! Carried packages.

use courier_events::PackageId;
use rand::Rng;

/// Packages held by one carrier, in pickup order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<PackageId>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package. Returns false if it was already held.
    pub fn add(&mut self, id: PackageId) -> bool {
        if self.items.contains(&id) {
            return false;
        }
        self.items.push(id);
        true
    }

    pub fn remove(&mut self, id: PackageId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| *item != id);
        self.items.len() != before
    }

    pub fn contains(&self, id: PackageId) -> bool {
        self.items.contains(&id)
    }

    /// Removes and returns a uniformly random package.
    pub fn take_random<R: Rng>(&mut self, rng: &mut R) -> Option<PackageId> {
        if self.items.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.items.len());
        Some(self.items.remove(index))
    }

    /// Removes and returns every package.
    pub fn take_all(&mut self) -> Vec<PackageId> {
        std::mem::take(&mut self.items)
    }

    pub fn first(&self) -> Option<PackageId> {
        self.items.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
