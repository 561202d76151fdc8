//! Type-partitioned archive mapping table.
//!
//! Callers address mappings by their position within one type's partition,
//! never by position in the flat stored sequence. The table keeps the two
//! partitions as parallel ordered collections with a stable id per entry, so
//! an edit in one partition can never renumber the other. The type-relative
//! index is translated only at this boundary.

use crate::models::{ArchiveMapping, MediaType};

/// Opaque stable identifier of one mapping entry. Survives edits to other
/// entries; never reused within one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingId(u64);

/// The editable field of a mapping. The `type` of an entry is fixed at
/// creation; retyping a mapping is an add plus a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingField {
    Source,
    Destination,
}

#[derive(Debug, Clone)]
struct Entry {
    id: MappingId,
    source: String,
    destination: String,
}

/// Ordered source → destination mappings, partitioned by media type.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    tv: Vec<Entry>,
    movies: Vec<Entry>,
    next_id: u64,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from the flat stored sequence, preserving the order
    /// of each type's entries.
    pub fn from_flat(mappings: &[ArchiveMapping]) -> Self {
        let mut table = Self::new();
        for mapping in mappings {
            let id = MappingId(table.next_id);
            table.next_id += 1;
            table.partition_mut(mapping.media_type).push(Entry {
                id,
                source: mapping.source.clone(),
                destination: mapping.destination.clone(),
            });
        }
        table
    }

    /// Flattens back to the stored wire sequence: the tv partition in order,
    /// then the movie partition in order. Relative order across partitions is
    /// not part of the addressing contract.
    pub fn to_flat(&self) -> Vec<ArchiveMapping> {
        let mut flat = self.list_by_type(MediaType::Tv);
        flat.extend(self.list_by_type(MediaType::Movie));
        flat
    }

    /// Appends an empty mapping, logically last within its partition.
    pub fn add(&mut self, media_type: MediaType) -> MappingId {
        let id = MappingId(self.next_id);
        self.next_id += 1;
        self.partition_mut(media_type).push(Entry {
            id,
            source: String::new(),
            destination: String::new(),
        });
        id
    }

    /// Mutates one field of the entry at `index` within the `media_type`
    /// partition. Out-of-range indices are silently ignored: the index is
    /// always derived from a freshly rendered, bounded view.
    pub fn update_at(
        &mut self,
        index: usize,
        field: MappingField,
        value: &str,
        media_type: MediaType,
    ) {
        if let Some(entry) = self.partition_mut(media_type).get_mut(index) {
            match field {
                MappingField::Source => entry.source = value.to_string(),
                MappingField::Destination => entry.destination = value.to_string(),
            }
        }
    }

    /// Removes the entry at `index` within the `media_type` partition.
    /// Removing never renumbers the other partition. Out of range is a no-op.
    pub fn delete_at(&mut self, index: usize, media_type: MediaType) {
        let partition = self.partition_mut(media_type);
        if index < partition.len() {
            partition.remove(index);
        }
    }

    /// The ordered view of one partition. Positions in this view are exactly
    /// the type-relative indices accepted by [`update_at`](Self::update_at)
    /// and [`delete_at`](Self::delete_at); callers must re-derive them from
    /// the current table after every mutation.
    pub fn list_by_type(&self, media_type: MediaType) -> Vec<ArchiveMapping> {
        self.partition(media_type)
            .iter()
            .map(|entry| ArchiveMapping {
                source: entry.source.clone(),
                destination: entry.destination.clone(),
                media_type,
            })
            .collect()
    }

    /// The stable id of the entry currently at a type-relative index.
    /// Unlike the index, the id survives edits elsewhere in the table.
    pub fn id_at(&self, index: usize, media_type: MediaType) -> Option<MappingId> {
        self.partition(media_type).get(index).map(|entry| entry.id)
    }

    pub fn count(&self, media_type: MediaType) -> usize {
        self.partition(media_type).len()
    }

    pub fn len(&self) -> usize {
        self.tv.len() + self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tv.is_empty() && self.movies.is_empty()
    }

    fn partition(&self, media_type: MediaType) -> &Vec<Entry> {
        match media_type {
            MediaType::Tv => &self.tv,
            MediaType::Movie => &self.movies,
        }
    }

    fn partition_mut(&mut self, media_type: MediaType) -> &mut Vec<Entry> {
        match media_type {
            MediaType::Tv => &mut self.tv,
            MediaType::Movie => &mut self.movies,
        }
    }
}
