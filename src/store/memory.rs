// In-memory PersonStore, keyed by user id.

use std::collections::HashMap;

use super::{PersonStore, Result, StoreError};
use crate::network::PersonData;

#[derive(Debug, Clone, Default)]
struct UserRecords {
    root: Option<PersonData>,
    /// Insertion order is load order.
    connections: Vec<PersonData>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    users: HashMap<String, UserRecords>,
}

impl MemoryStore {
    pub fn connection_count(&self, user_id: &str) -> usize {
        self.users.get(user_id).map(|u| u.connections.len()).unwrap_or(0)
    }
}

impl PersonStore for MemoryStore {
    fn root(&self, user_id: &str) -> Result<Option<PersonData>> {
        Ok(self.users.get(user_id).and_then(|u| u.root.clone()))
    }

    fn put_root(&mut self, user_id: &str, person: PersonData) -> Result<PersonData> {
        self.users.entry(user_id.to_string()).or_default().root = Some(person.clone());
        Ok(person)
    }

    fn connections(&self, user_id: &str) -> Result<Vec<PersonData>> {
        Ok(self.users.get(user_id).map(|u| u.connections.clone()).unwrap_or_default())
    }

    fn put_connection(&mut self, user_id: &str, person: PersonData) -> Result<PersonData> {
        let records = self.users.entry(user_id.to_string()).or_default();
        match records.connections.iter_mut().find(|c| c.id.is_some() && c.id == person.id) {
            Some(existing) => *existing = person.clone(),
            None => records.connections.push(person.clone()),
        }
        Ok(person)
    }

    fn update_connection(&mut self, user_id: &str, id: &str, person: PersonData) -> Result<PersonData> {
        let existing = self
            .users
            .get_mut(user_id)
            .and_then(|u| u.connections.iter_mut().find(|c| c.id.as_deref() == Some(id)))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        // id and parent are fixed once created
        let updated = PersonData {
            id: existing.id.clone(),
            parent_id: existing.parent_id.clone(),
            ..person
        };
        *existing = updated.clone();
        Ok(updated)
    }

    fn delete_connection(&mut self, user_id: &str, id: &str) -> Result<()> {
        let records = self
            .users
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let before = records.connections.len();
        records.connections.retain(|c| c.id.as_deref() != Some(id));
        if records.connections.len() == before {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
