use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An ordered sequence whose entries may be tombstoned in place.
///
/// Removing an entry through [`Slots::tombstone`] leaves an empty slot behind, so the positions
/// of its siblings, and any [Path](super::Path) pointing at them, stay valid. Only
/// [`Slots::retain`] and [`Slots::compact`] physically shift entries, after which paths have to
/// be rebuilt by re-analyzing the schema.
///
/// Tombstones are invisible from the outside: iteration, equality and serialization only ever
/// see live entries.
#[derive(Debug, Clone)]
pub struct Slots<T> {
    entries: Vec<Option<T>>,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Slots {
            entries: Vec::new(),
        }
    }
}

impl<T> Slots<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots, including tombstoned ones.
    #[inline]
    pub fn capacity_len(&self) -> usize {
        self.entries.len()
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    pub fn push(&mut self, item: T) {
        self.entries.push(Some(item));
    }

    /// Returns the live entry at slot `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.entries.get_mut(index).and_then(Option::as_mut)
    }

    /// Whether `index` points at a slot at all, live or tombstoned.
    #[inline]
    pub fn has_slot(&self, index: usize) -> bool {
        index < self.entries.len()
    }

    /// Empties slot `index` and returns what was in it.
    pub fn tombstone(&mut self, index: usize) -> Option<T> {
        self.entries.get_mut(index).and_then(Option::take)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().flatten()
    }

    /// Iterates live entries together with their slot index.
    pub fn enumerate(&self) -> impl Iterator<Item = (usize, &T)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_ref().map(|entry| (index, entry)))
    }

    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.iter().find(|entry| predicate(entry))
    }

    /// Keeps only the live entries matching `keep` and drops all tombstones.
    ///
    /// Returns the number of live entries that were removed.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.len();
        self.entries.retain(|entry| match entry {
            Some(entry) => keep(entry),
            None => false,
        });
        before - self.entries.len()
    }

    /// Tombstones every live entry matching `remove` without shifting any other entry.
    ///
    /// Returns the number of entries that were tombstoned.
    pub fn tombstone_where(&mut self, mut remove: impl FnMut(&T) -> bool) -> usize {
        let mut removed = 0;
        for entry in self.entries.iter_mut() {
            if entry.as_ref().map_or(false, &mut remove) {
                *entry = None;
                removed += 1;
            }
        }
        removed
    }

    /// Drops all tombstones.
    pub fn compact(&mut self) {
        self.entries.retain(Option::is_some);
    }
}

impl<T> From<Vec<T>> for Slots<T> {
    fn from(items: Vec<T>) -> Self {
        Slots {
            entries: items.into_iter().map(Some).collect(),
        }
    }
}

impl<T> FromIterator<T> for Slots<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Slots {
            entries: iter.into_iter().map(Some).collect(),
        }
    }
}

impl<T: PartialEq> PartialEq for Slots<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Serialize> Serialize for Slots<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Slots<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Slots::from)
    }
}
