//! Boundary to the person-record backend.
//!
//! The layout engine never talks to storage. This module defines the narrow
//! contract a host implements (`PersonStore`), the session rules around it
//! (guests can look but not touch), and the glue that turns a stored
//! snapshot into a laid-out `Network`.

use log::{debug, warn};
use thiserror::Error;
use uuid::Uuid;

use crate::layout::LayoutConfig;
use crate::network::{LayoutPass, Network, PersonData};

mod memory;

pub use memory::MemoryStore;

pub const GUEST_WARNING: &str = "Guest mode: data is not being saved.";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("cannot create or modify data in guest mode")]
    GuestReadOnly,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("id '{0}' is reserved for the root")]
    ReservedId(String),
    #[error("person '{0}' not found")]
    NotFound(String),
    #[error("backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether the host should offer the user a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Backend(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Who is using the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Guest,
    Authenticated { user_id: String },
}

impl Session {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Session::Guest => None,
            Session::Authenticated { user_id } => Some(user_id.as_str()),
        }
    }
}

/// CRUD over one user's root record and their connections.
pub trait PersonStore {
    fn root(&self, user_id: &str) -> Result<Option<PersonData>>;
    fn put_root(&mut self, user_id: &str, person: PersonData) -> Result<PersonData>;
    fn connections(&self, user_id: &str) -> Result<Vec<PersonData>>;
    fn put_connection(&mut self, user_id: &str, person: PersonData) -> Result<PersonData>;
    fn update_connection(&mut self, user_id: &str, id: &str, person: PersonData) -> Result<PersonData>;
    fn delete_connection(&mut self, user_id: &str, id: &str) -> Result<()>;
}

/// What the host loads on startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub root: PersonData,
    pub connections: Vec<PersonData>,
    pub warning: Option<String>,
}

pub struct ConnectionService<S> {
    store: S,
    session: Session,
    root_id: String,
}

impl<S: PersonStore> ConnectionService<S> {
    pub fn new(store: S, session: Session) -> Self {
        Self {
            store,
            session,
            root_id: LayoutConfig::default().root_id,
        }
    }

    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_guest(&self) -> bool {
        self.session.user_id().is_none()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn user(&self) -> Result<String> {
        self.session
            .user_id()
            .map(str::to_string)
            .ok_or(StoreError::GuestReadOnly)
    }

    /// Load the root and connections. First-time users get a root record created.
    pub fn snapshot(&mut self) -> Result<Snapshot> {
        let Some(user_id) = self.session.user_id().map(str::to_string) else {
            return Ok(Snapshot {
                root: guest_root(),
                connections: Vec::new(),
                warning: Some(GUEST_WARNING.to_string()),
            });
        };

        let root = match self.store.root(&user_id)? {
            Some(root) if !root.first_name.is_empty() => root,
            _ => {
                debug!("creating root record for {user_id}");
                let fresh = PersonData {
                    id: Some(user_id.clone()),
                    ..PersonData::default()
                };
                self.store.put_root(&user_id, fresh)?
            }
        };
        let connections = self.store.connections(&user_id)?;

        Ok(Snapshot { root, connections, warning: None })
    }

    /// Update the signed-in user's own record.
    pub fn save_root(&mut self, person: PersonData) -> Result<PersonData> {
        let user_id = self.user()?;
        let person = PersonData {
            id: Some(user_id.clone()),
            parent_id: None,
            ..person
        };
        self.store.put_root(&user_id, person)
    }

    /// Persist a new connection. Names are required; id and parent default.
    pub fn create_connection(&mut self, person: PersonData) -> Result<PersonData> {
        let user_id = self.user()?;
        if person.first_name.trim().is_empty() {
            return Err(StoreError::MissingField("firstName"));
        }
        if person.last_name.trim().is_empty() {
            return Err(StoreError::MissingField("lastName"));
        }

        if person.id.as_deref() == Some(self.root_id.as_str()) {
            return Err(StoreError::ReservedId(self.root_id.clone()));
        }

        let person = PersonData {
            id: Some(person.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string())),
            parent_id: Some(person.parent_id.clone().unwrap_or_else(|| self.root_id.clone())),
            ..person
        };
        self.store.put_connection(&user_id, person).inspect_err(|e| {
            warn!("put_connection failed: {e}");
        })
    }

    pub fn update_connection(&mut self, id: &str, person: PersonData) -> Result<PersonData> {
        let user_id = self.user()?;
        self.store.update_connection(&user_id, id, person)
    }

    pub fn delete_connection(&mut self, id: &str) -> Result<()> {
        let user_id = self.user()?;
        self.store.delete_connection(&user_id, id)
    }

    /// Load the snapshot and lay it out.
    pub fn load_network(&mut self, config: LayoutConfig) -> Result<(Network, LayoutPass, Option<String>)> {
        let snapshot = self.snapshot()?;
        let (network, pass) = Network::from_snapshot(snapshot.root, snapshot.connections, config);
        Ok((network, pass, snapshot.warning))
    }
}

fn guest_root() -> PersonData {
    PersonData {
        id: Some("guest".to_string()),
        first_name: "Guest".to_string(),
        last_name: "User".to_string(),
        notes: Some("You are in guest mode. Sign in to save your data.".to_string()),
        ..PersonData::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutState;

    fn signed_in() -> ConnectionService<MemoryStore> {
        ConnectionService::new(
            MemoryStore::default(),
            Session::Authenticated { user_id: "u1".to_string() },
        )
    }

    /// Store whose every call fails like a network outage.
    struct DownStore;

    impl PersonStore for DownStore {
        fn root(&self, _: &str) -> Result<Option<PersonData>> {
            Err(StoreError::Backend("timeout".to_string()))
        }
        fn put_root(&mut self, _: &str, _: PersonData) -> Result<PersonData> {
            Err(StoreError::Backend("timeout".to_string()))
        }
        fn connections(&self, _: &str) -> Result<Vec<PersonData>> {
            Err(StoreError::Backend("timeout".to_string()))
        }
        fn put_connection(&mut self, _: &str, _: PersonData) -> Result<PersonData> {
            Err(StoreError::Backend("timeout".to_string()))
        }
        fn update_connection(&mut self, _: &str, _: &str, _: PersonData) -> Result<PersonData> {
            Err(StoreError::Backend("timeout".to_string()))
        }
        fn delete_connection(&mut self, _: &str, _: &str) -> Result<()> {
            Err(StoreError::Backend("timeout".to_string()))
        }
    }

    #[test]
    fn test_guest_snapshot() {
        let mut svc = ConnectionService::new(MemoryStore::default(), Session::Guest);
        let snap = svc.snapshot().unwrap();
        assert_eq!(snap.root.full_name(), "Guest User");
        assert!(snap.connections.is_empty());
        assert_eq!(snap.warning.as_deref(), Some(GUEST_WARNING));
    }

    #[test]
    fn test_guest_cannot_mutate() {
        let mut svc = ConnectionService::new(MemoryStore::default(), Session::Guest);
        let err = svc.create_connection(PersonData::named("A", "B")).unwrap_err();
        assert_eq!(err, StoreError::GuestReadOnly);
        assert!(!err.is_retryable());
        assert_eq!(svc.delete_connection("x"), Err(StoreError::GuestReadOnly));
    }

    #[test]
    fn test_create_requires_names() {
        let mut svc = signed_in();
        assert_eq!(
            svc.create_connection(PersonData::named("", "B")),
            Err(StoreError::MissingField("firstName"))
        );
        assert_eq!(
            svc.create_connection(PersonData::named("A", " ")),
            Err(StoreError::MissingField("lastName"))
        );
    }

    #[test]
    fn test_create_defaults_id_and_parent() {
        let mut svc = signed_in();
        let saved = svc.create_connection(PersonData::named("Ada", "Lovelace")).unwrap();
        assert!(saved.id.as_deref().is_some_and(|id| !id.is_empty()));
        assert_eq!(saved.parent_id.as_deref(), Some("root"));
    }

    #[test]
    fn test_create_rejects_root_id() {
        let mut svc = signed_in();
        let mut imposter = PersonData::named("Ada", "Lovelace");
        imposter.id = Some("root".to_string());
        assert_eq!(svc.create_connection(imposter), Err(StoreError::ReservedId("root".to_string())));
        assert!(svc.store().connections("u1").unwrap().is_empty());

        let mut svc = signed_in().with_root_id("me");
        let mut imposter = PersonData::named("Ada", "Lovelace");
        imposter.id = Some("me".to_string());
        assert!(matches!(svc.create_connection(imposter), Err(StoreError::ReservedId(_))));
    }

    #[test]
    fn test_first_login_creates_root() {
        let mut svc = signed_in();
        let snap = svc.snapshot().unwrap();
        assert_eq!(snap.root.id.as_deref(), Some("u1"));
        assert!(svc.store().root("u1").unwrap().is_some());
    }

    #[test]
    fn test_backend_errors_are_retryable() {
        let mut svc = ConnectionService::new(DownStore, Session::Authenticated { user_id: "u1".to_string() });
        let err = svc.snapshot().unwrap_err();
        assert!(err.is_retryable());
        assert!(svc.create_connection(PersonData::named("A", "B")).unwrap_err().is_retryable());
    }

    #[test]
    fn test_load_network_lays_out() {
        let mut svc = signed_in();
        let mut a = PersonData::named("A", "One");
        a.id = Some("a".to_string());
        svc.create_connection(a).unwrap();
        let mut b = PersonData::named("B", "Two");
        b.id = Some("b".to_string());
        b.parent_id = Some("a".to_string());
        svc.create_connection(b).unwrap();

        let (net, pass, warning) = svc.load_network(LayoutConfig::default()).unwrap();
        assert!(warning.is_none());
        assert_eq!(pass.state, LayoutState::LaidOut);
        assert_eq!(net.node("b").unwrap().distance, Some(2));
    }
}
