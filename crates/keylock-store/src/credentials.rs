//! The persisted credential snapshot the controller works with.

use crate::error::{StorageError, StorageResult};
use crate::traits::CredentialStore;
use keylock_core::constants::{
    DEFAULT_GUEST_CODE, DEFAULT_MASTER_CODE, KEY_GUEST_CODE, KEY_GUEST_USED, KEY_MASTER_CODE,
};
use keylock_core::types::{Credential, CredentialKind};
use tracing::warn;

/// The complete persistent state of the lock: both credentials and the
/// guest single-use flag.
///
/// The controller owns one of these in memory and writes the whole
/// snapshot back through [`persist`](Self::persist) whenever any part of
/// it changes, so the stored keys can never drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSet {
    /// Reusable master credential.
    pub master: Credential,

    /// Single-use guest credential.
    pub guest: Credential,

    /// Whether the guest credential has been consumed since it was last
    /// changed.
    pub guest_used: bool,
}

impl CredentialSet {
    /// The factory-fresh state: default codes, guest unused.
    ///
    /// # Errors
    ///
    /// Returns an internal error only if the compiled-in default codes
    /// fail validation, which would be a build defect.
    pub fn factory_defaults() -> StorageResult<Self> {
        Ok(Self {
            master: default_credential(DEFAULT_MASTER_CODE)?,
            guest: default_credential(DEFAULT_GUEST_CODE)?,
            guest_used: false,
        })
    }

    /// Load the snapshot from a store, installing factory defaults for
    /// anything missing or unreadable.
    ///
    /// On first boot (or after data corruption) the repaired snapshot is
    /// written back and committed immediately, so the next boot finds a
    /// complete, valid state.
    ///
    /// # Errors
    ///
    /// Returns an error if the store itself fails; a missing or invalid
    /// stored value is repaired, not propagated.
    pub async fn load<S: CredentialStore>(store: &mut S) -> StorageResult<Self> {
        let (master, master_repaired) = load_credential(
            store.get(KEY_MASTER_CODE).await?,
            CredentialKind::Master,
            DEFAULT_MASTER_CODE,
        )?;
        let (guest, guest_repaired) = load_credential(
            store.get(KEY_GUEST_CODE).await?,
            CredentialKind::Guest,
            DEFAULT_GUEST_CODE,
        )?;
        let (guest_used, flag_repaired) = load_guest_flag(store.get(KEY_GUEST_USED).await?);

        let set = Self {
            master,
            guest,
            guest_used,
        };

        if master_repaired || guest_repaired || flag_repaired {
            set.persist(store).await?;
        }

        Ok(set)
    }

    /// Write the full snapshot to the store and commit it.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or the commit fails; on failure the
    /// previously committed snapshot is untouched.
    pub async fn persist<S: CredentialStore>(&self, store: &mut S) -> StorageResult<()> {
        store.put(KEY_MASTER_CODE, self.master.as_str()).await?;
        store.put(KEY_GUEST_CODE, self.guest.as_str()).await?;
        store
            .put(KEY_GUEST_USED, if self.guest_used { "1" } else { "0" })
            .await?;
        store.commit().await
    }

    /// Replace a credential. Changing the guest credential re-arms it.
    pub fn set_credential(&mut self, kind: CredentialKind, credential: Credential) {
        match kind {
            CredentialKind::Master => self.master = credential,
            CredentialKind::Guest => {
                self.guest = credential;
                self.guest_used = false;
            }
        }
    }

    /// Mark the guest credential consumed.
    pub fn consume_guest(&mut self) {
        self.guest_used = true;
    }
}

fn default_credential(code: &str) -> StorageResult<Credential> {
    Credential::new(code)
        .map_err(|e| StorageError::Internal(format!("Factory default credential invalid: {e}")))
}

fn load_credential(
    stored: Option<String>,
    kind: CredentialKind,
    default: &str,
) -> StorageResult<(Credential, bool)> {
    match stored {
        Some(value) => match Credential::new(&value) {
            Ok(credential) => Ok((credential, false)),
            Err(e) => {
                warn!(%kind, error = %e, "Stored credential invalid, restoring factory default");
                Ok((default_credential(default)?, true))
            }
        },
        None => Ok((default_credential(default)?, true)),
    }
}

fn load_guest_flag(stored: Option<String>) -> (bool, bool) {
    match stored.as_deref() {
        Some("1") => (true, false),
        Some("0") => (false, false),
        Some(other) => {
            warn!(value = other, "Stored guest-used flag invalid, re-arming guest credential");
            (false, true)
        }
        None => (false, true),
    }
}
