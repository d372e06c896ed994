use std::collections::btree_map::{self, BTreeMap};

/// Values keyed by residue sequence number, at most one per residue.
///
/// Backed by a `BTreeMap` so iteration is always in residue order and two
/// maps built from the same input compare equal regardless of how they were
/// assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueMap<T> {
    entries: BTreeMap<i32, T>,
}

impl<T> ResidueMap<T> {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert `value` unless `residue` already has an entry. Returns whether
    /// the value was stored.
    pub fn insert_first(&mut self, residue: i32, value: T) -> bool {
        match self.entries.entry(residue) {
            btree_map::Entry::Vacant(slot) => {
                let _ = slot.insert(value);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Value for `residue`, if present.
    #[must_use]
    pub fn get(&self, residue: i32) -> Option<&T> {
        self.entries.get(&residue)
    }

    /// Whether `residue` has an entry.
    #[must_use]
    pub fn contains(&self, residue: i32) -> bool {
        self.entries.contains_key(&residue)
    }

    /// Number of residues with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending residue order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &T)> + '_ {
        self.entries.iter().map(|(&residue, value)| (residue, value))
    }

    /// Residue numbers in ascending order.
    pub fn residues(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.keys().copied()
    }
}

impl<T> Default for ResidueMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Later duplicates of a residue are ignored, matching [`ResidueMap::insert_first`].
impl<T> FromIterator<(i32, T)> for ResidueMap<T> {
    fn from_iter<I: IntoIterator<Item = (i32, T)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (residue, value) in iter {
            let _ = map.insert_first(residue, value);
        }
        map
    }
}

impl<T: Copy> ResidueMap<T> {
    /// Copied value for `residue`, if present.
    #[must_use]
    pub fn value(&self, residue: i32) -> Option<T> {
        self.entries.get(&residue).copied()
    }
}

impl ResidueMap<f64> {
    /// Arithmetic mean of all values, `None` when empty.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries.values().sum::<f64>() / self.entries.len() as f64)
    }

    /// Largest value and its residue. Ties resolve to the lowest residue.
    #[must_use]
    pub fn max_entry(&self) -> Option<(i32, f64)> {
        self.iter().fold(None, |best, (residue, &value)| match best {
            Some((_, top)) if top >= value => best,
            _ => Some((residue, value)),
        })
    }
}
