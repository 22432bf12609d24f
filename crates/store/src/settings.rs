//! Store settings and the admin password gate.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};

use tienda_core::{Clock, Settings};

use crate::backend::Backend;
use crate::error::StoreError;
use crate::store::{Store, WriteBatch};

/// Read and replace the store settings.
pub struct SettingsService<'a, B> {
    store: &'a Store<B>,
}

impl<'a, B: Backend> SettingsService<'a, B> {
    #[must_use]
    pub const fn new(store: &'a Store<B>) -> Self {
        Self { store }
    }

    /// Current settings, or the seed defaults if never saved.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the settings snapshot cannot be read.
    pub fn get(&self) -> Result<Settings, StoreError> {
        self.store.get_settings()
    }

    /// Replace the settings wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the store name or admin password
    /// is blank, or a storage error if the snapshot cannot be written.
    pub fn save(&self, settings: Settings) -> Result<Settings, StoreError> {
        if settings.store_name.trim().is_empty() {
            return Err(StoreError::validation("store name is required"));
        }
        if settings.admin_password.trim().is_empty() {
            return Err(StoreError::validation("admin password is required"));
        }

        self.store
            .commit(WriteBatch::new().settings(&settings)?)?;
        tracing::info!(store_name = %settings.store_name, "settings saved");
        Ok(settings)
    }
}

/// Proof that the admin password was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSession {
    authenticated_at: DateTime<Utc>,
}

impl AdminSession {
    #[must_use]
    pub const fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}

/// Checks a candidate password against the stored admin password.
///
/// The password is stored and compared in plaintext. This gate keeps casual
/// visitors out of the admin pages; it is not an authentication system.
pub struct AdminGate<'a, B> {
    store: &'a Store<B>,
    clock: &'a dyn Clock,
}

impl<'a, B: Backend> AdminGate<'a, B> {
    #[must_use]
    pub const fn new(store: &'a Store<B>, clock: &'a dyn Clock) -> Self {
        Self { store, clock }
    }

    /// Returns a session if `candidate` matches, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the settings snapshot cannot be read.
    pub fn verify(&self, candidate: &SecretString) -> Result<Option<AdminSession>, StoreError> {
        let settings = self.store.get_settings()?;
        if candidate.expose_secret() == settings.admin_password {
            tracing::debug!("admin password accepted");
            Ok(Some(AdminSession {
                authenticated_at: self.clock.now(),
            }))
        } else {
            tracing::warn!("admin password rejected");
            Ok(None)
        }
    }
}
