//! Process-wide credential state: the Gemini API key and the active-model
//! sticky preference. Carried in `AppState` as an `Arc<CredentialStore>` and
//! passed explicitly to the invoker rather than living in a module global.

pub mod handlers;

use std::sync::RwLock;

struct Inner {
    api_key: String,
    active_model: String,
}

/// Thread-safe holder for the two pieces of mutable server state.
///
/// Concurrency contract: credential writes are administrative and
/// last-writer-wins; concurrent turns may race on the active-model update,
/// which at worst costs one wasted first attempt against a stale identifier
/// before the fallback loop corrects it. Neither race can corrupt the stored
/// strings: every access goes through the lock.
pub struct CredentialStore {
    inner: RwLock<Inner>,
}

impl CredentialStore {
    pub fn new(api_key: impl Into<String>, active_model: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                api_key: api_key.into(),
                active_model: active_model.into(),
            }),
        }
    }

    pub fn has_key(&self) -> bool {
        !self.read().api_key.is_empty()
    }

    pub fn api_key(&self) -> String {
        self.read().api_key.clone()
    }

    pub fn set_api_key(&self, key: impl Into<String>) {
        self.write().api_key = key.into();
    }

    pub fn clear_api_key(&self) {
        self.write().api_key.clear();
    }

    /// The most recently successful model identifier, tried first on the
    /// next invocation.
    pub fn active_model(&self) -> String {
        self.read().active_model.clone()
    }

    pub fn set_active_model(&self, model: impl Into<String>) {
        self.write().active_model = model.into();
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("credential store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("credential store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_key_reports_unset() {
        let store = CredentialStore::new("", "gemini-2.0-flash");
        assert!(!store.has_key());
    }

    #[test]
    fn test_set_and_clear_key() {
        let store = CredentialStore::new("", "gemini-2.0-flash");
        store.set_api_key("secret");
        assert!(store.has_key());
        assert_eq!(store.api_key(), "secret");

        store.clear_api_key();
        assert!(!store.has_key());
        assert_eq!(store.api_key(), "");
    }

    #[test]
    fn test_set_key_overwrites_previous_value() {
        let store = CredentialStore::new("first", "gemini-2.0-flash");
        store.set_api_key("second");
        assert_eq!(store.api_key(), "second");
    }

    #[test]
    fn test_active_model_is_sticky() {
        let store = CredentialStore::new("k", "gemini-2.0-flash");
        assert_eq!(store.active_model(), "gemini-2.0-flash");

        store.set_active_model("gemini-2.5-pro");
        assert_eq!(store.active_model(), "gemini-2.5-pro");
    }
}
