use keyring::Entry;
use std::error::Error;
use std::fmt;
use std::sync::Mutex;

const KEYRING_SERVICE: &str = "mason";
const KEYRING_ACCOUNT: &str = "api-token";

/// Describes failures when saving or retrieving the API credential.
///
/// `Empty` is a validation failure: tokens that trim to nothing are rejected
/// before touching the backend, leaving any stored value unchanged. `Backend`
/// surfaces the underlying keyring cause directly so callers can report it.
#[derive(Debug)]
pub enum CredentialError {
    Empty,
    Backend(keyring::Error),
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialError::Empty => write!(f, "API token must not be empty"),
            CredentialError::Backend(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CredentialError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CredentialError::Empty => None,
            CredentialError::Backend(err) => Some(err),
        }
    }
}

impl From<keyring::Error> for CredentialError {
    fn from(err: keyring::Error) -> Self {
        CredentialError::Backend(err)
    }
}

/// Storage for the single user-supplied API credential.
///
/// The store is an explicit dependency handed to whoever needs the token; the
/// credential is never reachable through ambient global state. No validation
/// against the inference service happens at save time — a bad token is only
/// discovered when a request is made with it.
pub trait CredentialStore {
    /// Persists the token, overwriting any previous value. Fails with
    /// [`CredentialError::Empty`] if the token trims to nothing.
    fn store(&self, token: &str) -> Result<(), CredentialError>;

    /// Returns the persisted token, or `Ok(None)` when no token is set.
    fn load(&self) -> Result<Option<String>, CredentialError>;

    /// Removes the persisted token. Safe to call when nothing is stored.
    fn clear(&self) -> Result<(), CredentialError>;
}

fn validate(token: &str) -> Result<&str, CredentialError> {
    let token = token.trim();
    if token.is_empty() {
        Err(CredentialError::Empty)
    } else {
        Ok(token)
    }
}

/// Credential store backed by the platform keyring.
#[derive(Debug, Default)]
pub struct KeyringCredentialStore;

impl KeyringCredentialStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self) -> Result<Entry, CredentialError> {
        Ok(Entry::new(KEYRING_SERVICE, KEYRING_ACCOUNT)?)
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn store(&self, token: &str) -> Result<(), CredentialError> {
        let token = validate(token)?;
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, CredentialError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory credential store, useful for tests and for running without a
/// platform keyring.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn store(&self, token: &str) -> Result<(), CredentialError> {
        let token = validate(token)?;
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.token.lock().unwrap().clone())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected_and_store_unchanged() {
        let store = MemoryCredentialStore::with_token("hf_existing");

        assert!(matches!(store.store(""), Err(CredentialError::Empty)));
        assert!(matches!(store.store("   \t"), Err(CredentialError::Empty)));
        assert_eq!(store.load().unwrap().as_deref(), Some("hf_existing"));
    }

    #[test]
    fn stored_token_round_trips() {
        let store = MemoryCredentialStore::new();
        store.store("hf_abc123").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("hf_abc123"));
    }

    #[test]
    fn stored_token_is_trimmed() {
        let store = MemoryCredentialStore::new();
        store.store("  hf_abc123\n").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("hf_abc123"));
    }

    #[test]
    fn clear_is_idempotent() {
        let store = MemoryCredentialStore::with_token("hf_abc123");
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn overwrite_replaces_previous_token() {
        let store = MemoryCredentialStore::with_token("hf_old");
        store.store("hf_new").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("hf_new"));
    }
}
