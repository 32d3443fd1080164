//! In-memory record sink

use crate::StoreError;
use folio_domain::{Record, RecordSink};

/// Keeps upserted records in memory, replacing records that share an id
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Vec<Record>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored records, in first-write order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == Some(id))
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSink for MemorySink {
    type Error = StoreError;

    fn upsert(&mut self, record: &Record) -> Result<(), Self::Error> {
        let id = record
            .id()
            .ok_or_else(|| StoreError::InvalidData("record has no string 'id'".to_string()))?;

        match self.records.iter_mut().find(|r| r.id() == Some(id)) {
            Some(existing) => *existing = record.clone(),
            None => self.records.push(record.clone()),
        }
        Ok(())
    }
}
