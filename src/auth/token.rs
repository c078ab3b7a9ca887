//
//  moysklad-cli
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Token Handling
//!
//! Reading secrets from stdin, cheap format checks, and deciding which
//! credential a command runs with.
//!
//! ## Resolution Order
//!
//! [`resolve_credential`] picks the first available of:
//!
//! 1. `MOYSKLAD_TOKEN` - bearer token
//! 2. `MOYSKLAD_LOGIN` + `MOYSKLAD_PASSWORD` - Basic credential
//! 3. The keyring entry for the host
//!
//! Environment variables win so that CI jobs never touch the keyring.

use anyhow::Result;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::{AuthCredential, KeyringStore};
use crate::api::model::EmployeeContext;
use crate::api::{ApiError, MoySkladClient};

/// Environment variable holding a bearer token.
pub const TOKEN_ENV: &str = "MOYSKLAD_TOKEN";

/// Environment variable holding a login for Basic credentials.
pub const LOGIN_ENV: &str = "MOYSKLAD_LOGIN";

/// Environment variable holding a password for Basic credentials.
pub const PASSWORD_ENV: &str = "MOYSKLAD_PASSWORD";

/// Body of `POST security/token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    /// The new access token.
    pub access_token: String,
}

/// Reads one line from standard input, trimmed.
///
/// Can be used with piped input: `echo "$TOKEN" | msk auth login --with-token`
pub fn read_secret_from_stdin() -> Result<String> {
    use std::io::{self, BufRead};

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;

    Ok(line.trim().to_string())
}

/// Checks the format of a token: non-empty, no whitespace.
///
/// Does not contact the server; see [`verify_credential`] for that.
///
/// # Example
///
/// ```rust
/// use moysklad::auth::validate_token;
///
/// assert!(validate_token("a1b2c3d4e5"));
/// assert!(!validate_token(""));
/// assert!(!validate_token("has space"));
/// ```
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

/// Builds a credential from environment lookups.
///
/// `lookup` is `std::env::var(..).ok()` in production; tests pass a map.
/// Empty values count as unset.
pub fn credential_from_env<F>(lookup: F) -> Option<AuthCredential>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(token) = get(TOKEN_ENV) {
        return Some(AuthCredential::bearer(token.trim()));
    }
    match (get(LOGIN_ENV), get(PASSWORD_ENV)) {
        (Some(login), Some(password)) => Some(AuthCredential::basic(login.trim(), password)),
        _ => None,
    }
}

/// Resolves the credential to use for `host`.
///
/// Returns `Ok(None)` when no credential is configured anywhere.
pub fn resolve_credential(host: &str) -> Result<Option<AuthCredential>> {
    if let Some(credential) = credential_from_env(|name| std::env::var(name).ok()) {
        tracing::debug!(kind = credential.kind(), "Using credential from environment");
        return Ok(Some(credential));
    }

    let credential = KeyringStore::new().get_credential(host)?;
    if let Some(credential) = &credential {
        tracing::debug!(kind = credential.kind(), host, "Using credential from keyring");
    }
    Ok(credential)
}

/// Checks a credential against the server by fetching the employee context.
///
/// Returns `Ok(None)` when the server rejects the credential (401).
pub async fn verify_credential(
    client: &MoySkladClient,
) -> std::result::Result<Option<EmployeeContext>, ApiError> {
    match client.employee_context().await {
        Ok(response) => Ok(Some(response.data)),
        Err(e) if e.status() == Some(StatusCode::UNAUTHORIZED) => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_token_wins() {
        let credential = credential_from_env(env(&[
            (TOKEN_ENV, "tok"),
            (LOGIN_ENV, "admin@shop"),
            (PASSWORD_ENV, "p"),
        ]));
        assert_eq!(credential, Some(AuthCredential::bearer("tok")));
    }

    #[test]
    fn test_login_password_pair() {
        let credential = credential_from_env(env(&[(LOGIN_ENV, "admin@shop"), (PASSWORD_ENV, "p")]));
        assert_eq!(credential, Some(AuthCredential::basic("admin@shop", "p")));
    }

    #[test]
    fn test_incomplete_pair_and_empty_values() {
        assert_eq!(credential_from_env(env(&[(LOGIN_ENV, "admin@shop")])), None);
        assert_eq!(credential_from_env(env(&[(TOKEN_ENV, "  ")])), None);
        assert_eq!(credential_from_env(env(&[])), None);
    }

    #[test]
    fn test_validate_token() {
        assert!(validate_token("0123abcd"));
        assert!(!validate_token("a\tb"));
    }

    #[test]
    fn test_issued_token_decodes() {
        let token: IssuedToken = serde_json::from_str(r#"{"access_token":"xyz"}"#).unwrap();
        assert_eq!(token.access_token, "xyz");
    }
}
