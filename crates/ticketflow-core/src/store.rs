//! The ticket store: an ordered, newest-first collection mirrored into
//! storage under the `tickets` key.
//!
//! Every mutation rewrites the whole collection. If that write fails the
//! in-memory collection is rolled back to its previous contents and the
//! error is returned, so memory and storage never disagree.

use crate::error::StorageError;
use crate::model::{Priority, Status, Ticket, TicketDraft};
use crate::storage::{KeyValueStore, keys};
use tracing::{debug, warn};

/// Source of timestamp-derived ids (milliseconds since the Unix epoch).
pub type Clock = fn() -> i64;

fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// The three example tickets a fresh install starts with.
#[must_use]
pub fn seed_tickets() -> Vec<Ticket> {
    vec![
        Ticket::from_draft(
            "1",
            TicketDraft::new("Fix login bug")
                .with_description("Users are unable to login with their credentials")
                .with_status(Status::Open)
                .with_priority(Priority::High),
        ),
        Ticket::from_draft(
            "2",
            TicketDraft::new("Update dashboard UI")
                .with_description("Refresh the dashboard with new design system")
                .with_status(Status::InProgress)
                .with_priority(Priority::Medium),
        ),
        Ticket::from_draft(
            "3",
            TicketDraft::new("Add export feature")
                .with_description("Allow users to export reports as PDF")
                .with_status(Status::Closed)
                .with_priority(Priority::Low),
        ),
    ]
}

#[derive(Debug)]
pub struct TicketStore<S> {
    storage: S,
    tickets: Vec<Ticket>,
    last_issued: i64,
    clock: Clock,
}

impl<S: KeyValueStore> TicketStore<S> {
    /// Load the collection from `storage`.
    ///
    /// A missing or unparsable `tickets` value falls back to [`seed_tickets`]
    /// (or an empty collection when `seed_examples` is false). Only I/O
    /// failures of the backend itself are errors.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StorageError`] if the read fails.
    pub fn load(storage: S, seed_examples: bool) -> Result<Self, StorageError> {
        let tickets = match storage.get(keys::TICKETS)? {
            Some(raw) => match serde_json::from_str::<Vec<Ticket>>(&raw) {
                Ok(tickets) => tickets,
                Err(err) => {
                    warn!(error = %err, "stored tickets are unparsable; using defaults");
                    default_collection(seed_examples)
                }
            },
            None => default_collection(seed_examples),
        };

        debug!(count = tickets.len(), "ticket store loaded");
        Ok(Self::from_parts(storage, tickets))
    }

    fn from_parts(storage: S, tickets: Vec<Ticket>) -> Self {
        let last_issued = tickets
            .iter()
            .filter_map(|t| t.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            storage,
            tickets,
            last_issued,
            clock: system_clock,
        }
    }

    /// Replace the id clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Current collection, newest first.
    #[must_use]
    pub fn list(&self) -> &[Ticket] {
        &self.tickets
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Create a ticket with a fresh id and put it at the front.
    ///
    /// The title is not checked here; forms validate before calling.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StorageError`] if the collection cannot be
    /// persisted. The in-memory collection is left as it was.
    pub fn add(&mut self, draft: TicketDraft) -> Result<Ticket, StorageError> {
        let id = self.next_id();
        let ticket = Ticket::from_draft(id, draft);
        let previous = self.tickets.clone();
        self.tickets.insert(0, ticket.clone());
        self.commit(previous)?;
        debug!(id = %ticket.id, "ticket added");
        Ok(ticket)
    }

    /// Overwrite every field but `id` of the matching ticket.
    ///
    /// Returns `false` (and leaves the collection untouched) when no ticket
    /// has that id.
    ///
    /// # Errors
    ///
    /// Same as [`TicketStore::add`].
    pub fn update(&mut self, id: &str, draft: TicketDraft) -> Result<bool, StorageError> {
        let previous = self.tickets.clone();
        let found = match self.tickets.iter_mut().find(|t| t.id == id) {
            Some(ticket) => {
                ticket.apply(draft);
                true
            }
            None => false,
        };
        self.commit(previous)?;
        debug!(id, found, "ticket update");
        Ok(found)
    }

    /// Remove the matching ticket. Returns whether one was removed.
    ///
    /// # Errors
    ///
    /// Same as [`TicketStore::add`].
    pub fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let previous = self.tickets.clone();
        self.tickets.retain(|t| t.id != id);
        let removed = self.tickets.len() != previous.len();
        self.commit(previous)?;
        debug!(id, removed, "ticket delete");
        Ok(removed)
    }

    /// Borrow the backing storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Next free id: the clock, bumped past the last issued id. When that
    /// would overflow, the first free id at or below the clock is used.
    fn next_id(&mut self) -> String {
        let now = (self.clock)();
        let start = self
            .last_issued
            .checked_add(1)
            .map_or(now, |floor| now.max(floor));
        let free = (start..=i64::MAX)
            .find(|id| !self.contains(&id.to_string()))
            .or_else(|| (i64::MIN..start).rev().find(|id| !self.contains(&id.to_string())));

        match free {
            Some(id) => {
                self.last_issued = self.last_issued.max(id);
                id.to_string()
            }
            None => {
                warn!("numeric ids exhausted; using a suffixed id");
                let mut suffix = self.tickets.len();
                while self.contains(&format!("{start}-{suffix}")) {
                    suffix += 1;
                }
                format!("{start}-{suffix}")
            }
        }
    }

    fn contains(&self, id: &str) -> bool {
        self.tickets.iter().any(|t| t.id == id)
    }

    fn commit(&mut self, previous: Vec<Ticket>) -> Result<(), StorageError> {
        if let Err(err) = self.persist() {
            warn!(error = %err, "persisting tickets failed; rolling back");
            self.tickets = previous;
            return Err(err);
        }
        Ok(())
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let body =
            serde_json::to_string(&self.tickets).map_err(|source| StorageError::Encode {
                key: keys::TICKETS.to_string(),
                source,
            })?;
        self.storage.set(keys::TICKETS, &body)
    }
}

fn default_collection(seed_examples: bool) -> Vec<Ticket> {
    if seed_examples {
        seed_tickets()
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{TicketStore, seed_tickets};
    use crate::error::StorageError;
    use crate::model::{Priority, Status, TicketDraft};
    use crate::storage::{KeyValueStore, MemoryStorage, keys};

    fn empty_store() -> TicketStore<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        storage.set(keys::TICKETS, "[]").expect("set");
        TicketStore::load(storage, true).expect("load")
    }

    fn fixed_clock() -> i64 {
        1_700_000_000_000
    }

    /// Accepts reads, refuses every write.
    struct ReadOnlyStorage(MemoryStorage);

    impl KeyValueStore for ReadOnlyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".into()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".into()))
        }
    }

    #[test]
    fn missing_key_seeds_three_examples() {
        let store = TicketStore::load(MemoryStorage::new(), true).expect("load");
        assert_eq!(store.list(), seed_tickets().as_slice());
        assert_eq!(store.list()[0].title, "Fix login bug");
    }

    #[test]
    fn seeding_can_be_disabled() {
        let store = TicketStore::load(MemoryStorage::new(), false).expect("load");
        assert!(store.is_empty());
    }

    #[test]
    fn unparsable_value_falls_back_to_seed() {
        let mut storage = MemoryStorage::new();
        storage.set(keys::TICKETS, "not json").expect("set");
        let store = TicketStore::load(storage, true).expect("load");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn unknown_status_value_counts_as_unparsable() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                keys::TICKETS,
                r#"[{"id":"1","title":"x","description":"","status":"blocked","priority":"low"}]"#,
            )
            .expect("set");
        let store = TicketStore::load(storage, true).expect("load");
        assert_eq!(store.list(), seed_tickets().as_slice());
    }

    #[test]
    fn empty_array_is_not_reseeded() {
        assert!(empty_store().is_empty());
    }

    #[test]
    fn add_prepends_and_persists() {
        let mut store = empty_store();
        let first = store.add(TicketDraft::new("first")).expect("add");
        let second = store.add(TicketDraft::new("second")).expect("add");

        let titles: Vec<_> = store.list().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);
        assert_ne!(first.id, second.id);

        let raw = store
            .storage()
            .get(keys::TICKETS)
            .expect("get")
            .expect("tickets persisted");
        let stored: Vec<crate::model::Ticket> = serde_json::from_str(&raw).expect("parse");
        assert_eq!(stored, store.list());
    }

    #[test]
    fn ids_stay_unique_when_the_clock_stands_still() {
        let mut store = empty_store().with_clock(fixed_clock);
        let a = store.add(TicketDraft::new("a")).expect("add");
        let b = store.add(TicketDraft::new("b")).expect("add");
        let c = store.add(TicketDraft::new("c")).expect("add");
        assert_eq!(a.id, "1700000000000");
        assert_eq!(b.id, "1700000000001");
        assert_eq!(c.id, "1700000000002");
    }

    #[test]
    fn ids_continue_past_the_largest_loaded_id() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                keys::TICKETS,
                r#"[{"id":"1800000000000","title":"future","status":"open","priority":"low"}]"#,
            )
            .expect("set");
        let mut store = TicketStore::load(storage, true)
            .expect("load")
            .with_clock(fixed_clock);
        let added = store.add(TicketDraft::new("next")).expect("add");
        assert_eq!(added.id, "1800000000001");
    }

    #[test]
    fn largest_possible_loaded_id_does_not_block_new_ids() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                keys::TICKETS,
                r#"[{"id":"9223372036854775807","title":"max","status":"open","priority":"low"}]"#,
            )
            .expect("set");
        let mut store = TicketStore::load(storage, true)
            .expect("load")
            .with_clock(fixed_clock);

        let a = store.add(TicketDraft::new("a")).expect("add");
        let b = store.add(TicketDraft::new("b")).expect("add");
        assert_eq!(a.id, "1700000000000");
        assert_eq!(b.id, "1700000000001");
        assert_eq!(store.list().len(), 3);
    }

    #[test]
    fn update_replaces_everything_but_id() {
        let mut store = empty_store();
        let created = store
            .add(TicketDraft::new("draft").with_priority(Priority::Low))
            .expect("add");

        let found = store
            .update(
                &created.id,
                TicketDraft::new("final")
                    .with_description("done now")
                    .with_status(Status::Closed)
                    .with_priority(Priority::High),
            )
            .expect("update");
        assert!(found);

        let ticket = store.get(&created.id).expect("still present");
        assert_eq!(ticket.title, "final");
        assert_eq!(ticket.description, "done now");
        assert_eq!(ticket.status, Status::Closed);
        assert_eq!(ticket.priority, Priority::High);
    }

    #[test]
    fn update_unknown_id_is_a_noop() {
        let mut store = TicketStore::load(MemoryStorage::new(), true).expect("load");
        let before = store.list().to_vec();
        let found = store.update("nope", TicketDraft::new("x")).expect("update");
        assert!(!found);
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn delete_removes_only_the_matching_ticket() {
        let mut store = TicketStore::load(MemoryStorage::new(), true).expect("load");
        assert!(store.delete("2").expect("delete"));
        let ids: Vec<_> = store.list().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert!(!store.delete("2").expect("delete again"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn failed_write_rolls_back_add() {
        let mut store = TicketStore::load(ReadOnlyStorage(MemoryStorage::new()), true)
            .expect("load");
        let err = store
            .add(TicketDraft::new("lost"))
            .expect_err("write must fail");
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert_eq!(store.list(), seed_tickets().as_slice());
    }

    #[test]
    fn failed_write_rolls_back_update_and_delete() {
        let mut store = TicketStore::load(ReadOnlyStorage(MemoryStorage::new()), true)
            .expect("load");
        assert!(store.update("1", TicketDraft::new("changed")).is_err());
        assert!(store.delete("3").is_err());
        assert_eq!(store.list(), seed_tickets().as_slice());
    }

    #[test]
    fn reload_sees_the_same_collection() {
        let storage = MemoryStorage::new();
        let mut store = TicketStore::load(storage.clone(), true).expect("load");
        store.add(TicketDraft::new("persisted")).expect("add");
        store.delete("1").expect("delete");

        let reloaded = TicketStore::load(storage, true).expect("reload");
        assert_eq!(reloaded.list(), store.list());
    }
}
