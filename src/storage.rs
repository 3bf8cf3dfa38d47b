//! Key-value storage backends.
//!
//! `SaveManager` never touches `window.localStorage` directly; it talks to a
//! [`Storage`] handed in by the host. In the browser that's [`LocalStorage`],
//! in tests and native hosts it's [`MemoryStorage`].

use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("quota exceeded: need {needed} bytes, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("storage call failed: {0}")]
    Js(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Synchronous string key-value store (the `localStorage` API surface).
pub trait Storage {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// In-process store. An optional byte quota makes oversized writes fail the
/// way a full browser store does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of all keys and values, in bytes.
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: RefCell::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Bytes used if `key` were set to `value`.
    fn usage_with(&self, key: &str, value: &str) -> usize {
        let items = self.items.borrow();
        let others: usize = items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota {
            let needed = self.usage_with(key, value);
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage`. WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// localStorage を取得する。プライベートモード等で無効な場合は `Unavailable`。
    pub fn open() -> StorageResult<Self> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let inner = window
            .local_storage()
            .map_err(|e| StorageError::Js(format!("{e:?}")))?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Js(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner
            .set_item(key, value)
            .map_err(|e| StorageError::Js(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::Js(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v1").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v1"));

        storage.set("k", "v2").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(storage.len(), 1);

        storage.remove("k").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("nothing").is_ok());
    }

    #[test]
    fn quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);
        storage.set("k", "12345").unwrap();

        let err = storage.set("k", "0123456789").unwrap_err();
        assert_eq!(
            err,
            StorageError::QuotaExceeded {
                needed: 11,
                quota: 10
            }
        );
        // 失敗した書き込みは既存値を壊さない
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("12345"));
    }

    #[test]
    fn quota_counts_replaced_value_once() {
        let storage = MemoryStorage::with_quota(6);
        storage.set("k", "aaaaa").unwrap();
        // Overwrite: old value must not count against the new one.
        storage.set("k", "bbbbb").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("bbbbb"));
    }

    #[test]
    fn borrowed_storage_is_storage() {
        fn write<S: Storage>(s: S) {
            s.set("a", "b").unwrap();
        }
        let storage = MemoryStorage::new();
        write(&storage);
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("b"));
    }
}
