use anyhow::Result;
use serde_json::Value;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Keys of the durable store. This list is exhaustive; everything else the
/// client holds is session-scoped.
pub mod keys {
    pub const CHATROOMS: &str = "chatrooms";
    pub const THEME: &str = "theme";
    pub const AUTH_TOKEN: &str = "authToken";
    pub const PHONE_NUMBER: &str = "phoneNumber";
    pub const COUNTRY_CODE: &str = "countryCode";
}

/// Simple JSON based key-value storage for the client.
///
/// The whole map is rewritten on every mutation. The single event-loop task
/// is the only writer, so no lock is needed.
pub struct Storage {
    file: PathBuf,
    data: HashMap<String, Value>,
}

impl Storage {
    /// Open or create the backing file under the data directory.
    pub async fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        fs::create_dir_all(data_dir.as_ref()).await?;
        let file = data_dir.as_ref().join("storage.json");
        let data = if let Ok(bytes) = fs::read(&file).await {
            serde_json::from_slice(&bytes).unwrap_or_default()
        } else {
            HashMap::new()
        };
        Ok(Self { file, data })
    }

    /// Retrieve a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Retrieve a string value by key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Store a value under a key.
    pub async fn put(&mut self, key: &str, value: Value) -> Result<()> {
        self.data.insert(key.to_string(), value);
        self.flush().await
    }

    /// Remove a key. No-op when absent.
    pub async fn remove(&mut self, key: &str) -> Result<()> {
        if self.data.remove(key).is_some() {
            self.flush().await?;
        }
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&self.data)?;
        fs::write(&self.file, bytes).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn put_get_remove_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let mut storage = Storage::open(tmp.path()).await.unwrap();
        assert!(storage.get(keys::THEME).is_none());

        storage.put(keys::THEME, json!("dark")).await.unwrap();
        assert_eq!(storage.get_str(keys::THEME), Some("dark"));

        storage.remove(keys::THEME).await.unwrap();
        assert!(storage.get(keys::THEME).is_none());
        // removing again is fine
        storage.remove(keys::THEME).await.unwrap();
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut storage = Storage::open(tmp.path()).await.unwrap();
            storage.put(keys::AUTH_TOKEN, json!("fake-token-1")).await.unwrap();
            storage
                .put(keys::CHATROOMS, json!([{"id": "1", "title": "General Chat", "createdAt": "2025-01-01T00:00:00Z"}]))
                .await
                .unwrap();
        }
        let storage = Storage::open(tmp.path()).await.unwrap();
        assert_eq!(storage.get_str(keys::AUTH_TOKEN), Some("fake-token-1"));
        assert_eq!(storage.get(keys::CHATROOMS).unwrap()[0]["title"], "General Chat");
    }

    #[tokio::test]
    async fn removed_keys_stay_absent_after_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut storage = Storage::open(tmp.path()).await.unwrap();
            storage.put(keys::PHONE_NUMBER, json!("1234567890")).await.unwrap();
            storage.remove(keys::PHONE_NUMBER).await.unwrap();
        }
        let storage = Storage::open(tmp.path()).await.unwrap();
        assert!(storage.get(keys::PHONE_NUMBER).is_none());
    }

    #[tokio::test]
    async fn corrupt_file_starts_empty() {
        let tmp = tempfile::tempdir().unwrap();
        tokio::fs::write(tmp.path().join("storage.json"), b"not json")
            .await
            .unwrap();
        let storage = Storage::open(tmp.path()).await.unwrap();
        assert!(storage.get(keys::THEME).is_none());
    }
}
