//
//  moysklad-cli
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Credential Storage Module
//!
//! Credentials are kept in the system's native keyring:
//!
//! - **macOS**: Keychain Services
//! - **Linux**: Secret Service API (GNOME Keyring, KWallet)
//! - **Windows**: Windows Credential Manager
//!
//! ## Storage Model
//!
//! - **Service**: Application identifier (`moysklad-cli`)
//! - **Username/Key**: The API host
//! - **Password/Value**: The credential serialized as JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use moysklad::auth::{AuthCredential, KeyringStore};
//!
//! fn manage_credentials() -> anyhow::Result<()> {
//!     let store = KeyringStore::new();
//!
//!     store.store_credential("api.moysklad.ru", &AuthCredential::bearer("token"))?;
//!
//!     if let Some(credential) = store.get_credential("api.moysklad.ru")? {
//!         println!("Found {} credential", credential.kind());
//!     }
//!
//!     store.delete("api.moysklad.ru")?;
//!     Ok(())
//! }
//! ```

use anyhow::{Context, Result};
use keyring::Entry;

use super::AuthCredential;

/// The service name used to identify this application in the system keyring.
const SERVICE_NAME: &str = "moysklad-cli";

/// Secure credential storage using the system's native keyring service.
///
/// # Notes
///
/// - The keyring may require user interaction (password, biometrics) on first access.
/// - On Linux, ensure a secret service daemon (GNOME Keyring, KWallet) is running.
pub struct KeyringStore {
    /// The service name identifying this application in the keyring.
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Creates a store using the `moysklad-cli` service name.
    ///
    /// No keyring access occurs during construction.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Stores a raw string for `host`, replacing any existing entry.
    pub fn store(&self, host: &str, secret: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        entry.set_password(secret)?;
        Ok(())
    }

    /// Retrieves the raw string stored for `host`.
    ///
    /// Returns `Ok(None)` if no entry exists for the host.
    pub fn get(&self, host: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, host)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes the entry for `host`. Deleting a missing entry succeeds.
    pub fn delete(&self, host: &str) -> Result<()> {
        let entry = Entry::new(&self.service, host)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Stores `credential` for `host` as JSON.
    pub fn store_credential(&self, host: &str, credential: &AuthCredential) -> Result<()> {
        let json = serde_json::to_string(credential)?;
        self.store(host, &json)
    }

    /// Retrieves the credential stored for `host`.
    ///
    /// A stored value that is not a JSON credential is taken as a bare
    /// access token.
    pub fn get_credential(&self, host: &str) -> Result<Option<AuthCredential>> {
        let Some(secret) = self
            .get(host)
            .with_context(|| format!("Failed to read keyring entry for {}", host))?
        else {
            return Ok(None);
        };
        Ok(Some(parse_stored(&secret)))
    }
}

/// Decodes a keyring value.
pub(crate) fn parse_stored(secret: &str) -> AuthCredential {
    serde_json::from_str(secret).unwrap_or_else(|_| AuthCredential::bearer(secret.trim()))
}
