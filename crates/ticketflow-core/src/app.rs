//! Application state: one ticket store and one session over a shared backend.

use crate::config::ProjectConfig;
use crate::dashboard::DashboardSummary;
use crate::error::{StorageError, TicketflowError};
use crate::model::Page;
use crate::session::Session;
use crate::storage::KeyValueStore;
use crate::store::TicketStore;

#[derive(Debug)]
pub struct App<S> {
    tickets: TicketStore<S>,
    session: Session<S>,
    recent_limit: usize,
}

impl<S: KeyValueStore + Clone> App<S> {
    /// Load tickets (seeding a fresh install per `config`) and the session
    /// from `storage`.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StorageError`] if reading fails.
    pub fn open(storage: S, config: &ProjectConfig) -> Result<Self, StorageError> {
        let tickets = TicketStore::load(storage.clone(), config.tickets.seed_examples)?;
        let session = Session::load(storage)?;
        Ok(Self {
            tickets,
            session,
            recent_limit: config.dashboard.recent_limit,
        })
    }
}

impl<S: KeyValueStore> App<S> {
    #[must_use]
    pub const fn tickets(&self) -> &TicketStore<S> {
        &self.tickets
    }

    pub const fn tickets_mut(&mut self) -> &mut TicketStore<S> {
        &mut self.tickets
    }

    #[must_use]
    pub const fn session(&self) -> &Session<S> {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    /// Ticket store access for a page behind the login wall.
    ///
    /// # Errors
    ///
    /// Returns [`TicketflowError::NotAuthenticated`] while logged out.
    pub fn authorized_tickets(&mut self) -> Result<&mut TicketStore<S>, TicketflowError> {
        if self.session.is_authenticated() {
            Ok(&mut self.tickets)
        } else {
            Err(TicketflowError::NotAuthenticated)
        }
    }

    /// Switch to `page`, then resolve what is actually shown.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StorageError`] if the page cannot be saved.
    pub fn open_page(&mut self, page: Page) -> Result<Page, StorageError> {
        self.session.navigate(page)?;
        Ok(self.session.view())
    }

    /// Stats and recent activity, if logged in.
    ///
    /// # Errors
    ///
    /// Returns [`TicketflowError::NotAuthenticated`] while logged out.
    pub fn dashboard(&self) -> Result<DashboardSummary, TicketflowError> {
        if !self.session.is_authenticated() {
            return Err(TicketflowError::NotAuthenticated);
        }
        Ok(DashboardSummary::build(
            self.tickets.list(),
            self.recent_limit,
        ))
    }
}
