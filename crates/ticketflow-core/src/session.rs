//! Mocked login state and the page the user is on.

use crate::error::StorageError;
use crate::model::Page;
use crate::storage::{KeyValueStore, keys};
use tracing::{debug, info, warn};

const AUTHENTICATED_FLAG: &str = "true";

#[derive(Debug)]
pub struct Session<S> {
    storage: S,
    is_authenticated: bool,
    current_page: Page,
}

impl<S: KeyValueStore> Session<S> {
    /// Restore the session from storage.
    ///
    /// A stored `isAuthenticated == "true"` restores the last saved page, or
    /// the dashboard when none was saved or the name is not a known page.
    /// Anything else starts logged out on the landing page.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StorageError`] if a read fails.
    pub fn load(storage: S) -> Result<Self, StorageError> {
        let authenticated =
            storage.get(keys::IS_AUTHENTICATED)?.as_deref() == Some(AUTHENTICATED_FLAG);

        let current_page = if authenticated {
            match storage.get(keys::CURRENT_PAGE)? {
                Some(name) => name.parse().unwrap_or_else(|err| {
                    warn!(%err, "saved page is unknown; defaulting to dashboard");
                    Page::Dashboard
                }),
                None => Page::Dashboard,
            }
        } else {
            Page::Landing
        };

        debug!(authenticated, page = %current_page, "session loaded");
        Ok(Self {
            storage,
            is_authenticated: authenticated,
            current_page,
        })
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// The page last navigated to, whether or not it may be shown.
    #[must_use]
    pub const fn current_page(&self) -> Page {
        self.current_page
    }

    /// The page actually displayed: protected pages resolve to the login
    /// page while logged out.
    #[must_use]
    pub const fn view(&self) -> Page {
        if self.current_page.requires_auth() && !self.is_authenticated {
            Page::Login
        } else {
            self.current_page
        }
    }

    /// Authenticate and land on the dashboard.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StorageError`] if either key cannot be written;
    /// the previous state is restored.
    pub fn log_in(&mut self) -> Result<(), StorageError> {
        self.transition(true, Page::Dashboard)?;
        info!("logged in");
        Ok(())
    }

    /// Drop the auth flag and go to the login page.
    ///
    /// # Errors
    ///
    /// Same as [`Session::log_in`].
    pub fn log_out(&mut self) -> Result<(), StorageError> {
        self.transition(false, Page::Login)?;
        info!("logged out");
        Ok(())
    }

    /// Switch pages and remember the choice.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`StorageError`]; the page is left unchanged.
    pub fn navigate(&mut self, page: Page) -> Result<(), StorageError> {
        let previous = self.current_page;
        self.current_page = page;
        if let Err(err) = self.storage.set(keys::CURRENT_PAGE, page.as_str()) {
            self.current_page = previous;
            return Err(err);
        }
        debug!(%page, "navigated");
        Ok(())
    }

    /// Borrow the backing storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn transition(&mut self, authenticated: bool, page: Page) -> Result<(), StorageError> {
        let saved_flag = self.storage.get(keys::IS_AUTHENTICATED)?;
        let saved_page = self.storage.get(keys::CURRENT_PAGE)?;
        let previous = (self.is_authenticated, self.current_page);
        self.is_authenticated = authenticated;
        self.current_page = page;

        let flag_written = if authenticated {
            self.storage.set(keys::IS_AUTHENTICATED, AUTHENTICATED_FLAG)
        } else {
            self.storage.remove(keys::IS_AUTHENTICATED)
        };
        let written =
            flag_written.and_then(|()| self.storage.set(keys::CURRENT_PAGE, page.as_str()));

        if let Err(err) = written {
            warn!(error = %err, "persisting session failed; rolling back");
            (self.is_authenticated, self.current_page) = previous;
            self.restore(keys::IS_AUTHENTICATED, saved_flag.as_deref());
            self.restore(keys::CURRENT_PAGE, saved_page.as_deref());
            return Err(err);
        }
        Ok(())
    }

    /// Put a key back to its raw value from before a failed transition.
    fn restore(&mut self, key: &str, value: Option<&str>) {
        let restored = match value {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        };
        if let Err(err) = restored {
            warn!(key, error = %err, "restoring session key failed");
        }
    }
}
