//! Settings Storage
//!
//! String-keyed option storage holding the API credentials and the
//! product/tag rule list. Writes are last-write-wins; there is no
//! concurrency control beyond the lock around a single read-modify-write.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use crate::error::{CoreError, Result};
use crate::model::{Credentials, ProductTagRule};

/// Option key for the Stripe secret key
pub const STRIPE_API_KEY: &str = "ptm_stripe_api_key";

/// Option key for the Mailchimp API key
pub const MAILCHIMP_API_KEY: &str = "ptm_mailchimp_api_key";

/// Option key for the Mailchimp audience id
pub const MAILCHIMP_LIST_ID: &str = "ptm_mailchimp_list_id";

/// Option key for the serialized rule list
pub const PRODUCT_TAGS: &str = "custom_product_tags";

/// Key/value settings backend
pub trait SettingsStore: Send + Sync {
    /// Read an option
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write an option, replacing any previous value
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Load the three credentials in one pass
    fn load_credentials(&self) -> Result<Credentials> {
        Ok(Credentials {
            stripe_api_key: self.get_string(STRIPE_API_KEY)?,
            mailchimp_api_key: self.get_string(MAILCHIMP_API_KEY)?,
            mailchimp_list_id: self.get_string(MAILCHIMP_LIST_ID)?,
        })
    }

    /// Persist all three credentials; `None` stores an empty string
    fn save_credentials(&self, credentials: &Credentials) -> Result<()> {
        let fields = [
            (STRIPE_API_KEY, &credentials.stripe_api_key),
            (MAILCHIMP_API_KEY, &credentials.mailchimp_api_key),
            (MAILCHIMP_LIST_ID, &credentials.mailchimp_list_id),
        ];
        for (key, value) in fields {
            self.set(key, Value::String(value.clone().unwrap_or_default()))?;
        }
        Ok(())
    }

    /// Current rule list in insertion order.
    ///
    /// A missing or malformed stored value reads as an empty list.
    fn load_rules(&self) -> Result<Vec<ProductTagRule>> {
        let Some(value) = self.get(PRODUCT_TAGS)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_value(value) {
            Ok(rules) => Ok(rules),
            Err(e) => {
                tracing::warn!(error = %e, "Stored product tags are malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Append a rule to the end of the list
    fn add_rule(&self, rule: ProductTagRule) -> Result<()> {
        let mut rules = self.load_rules()?;
        rules.push(rule);
        self.set(PRODUCT_TAGS, serde_json::to_value(&rules)?)
    }

    /// Remove the rule at `index`; later rules shift down by one.
    ///
    /// Returns `false` without writing when the index is out of range.
    fn delete_rule(&self, index: usize) -> Result<bool> {
        let mut rules = self.load_rules()?;
        if index >= rules.len() {
            return Ok(false);
        }
        rules.remove(index);
        self.set(PRODUCT_TAGS, serde_json::to_value(&rules)?)?;
        Ok(true)
    }

    #[doc(hidden)]
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key)?.and_then(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        }))
    }
}

/// In-memory settings (for development and tests)
#[derive(Default)]
pub struct MemorySettingsStore {
    options: RwLock<HashMap<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let options = self
            .options
            .read()
            .map_err(|_| CoreError::Storage("settings lock poisoned".into()))?;
        Ok(options.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut options = self
            .options
            .write()
            .map_err(|_| CoreError::Storage("settings lock poisoned".into()))?;
        options.insert(key.to_string(), value);
        Ok(())
    }
}

/// Settings persisted as a single JSON object on disk.
///
/// A missing file reads as empty settings. Reads and writes are blocking
/// `std::fs` calls on the caller's thread, including async handlers; the
/// file only holds a handful of keys.
pub struct JsonFileSettingsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(map),
            _ => Err(CoreError::Storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, options: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(options)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| CoreError::Storage("settings lock poisoned".into()))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| CoreError::Storage("settings lock poisoned".into()))?;
        let mut options = self.read_all()?;
        options.insert(key.to_string(), value);
        self.write_all(&options)?;

        tracing::debug!(key, path = %self.path.display(), "Saved setting");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("tagbridge-settings-{}", uuid::Uuid::new_v4()))
            .join("settings.json")
    }

    fn seeded() -> MemorySettingsStore {
        let store = MemorySettingsStore::new();
        for (title, tag) in [("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")] {
            store.add_rule(ProductTagRule::new(title, tag)).unwrap();
        }
        store
    }

    #[test]
    fn test_rules_keep_insertion_order_and_duplicates() {
        let store = MemorySettingsStore::new();
        store.add_rule(ProductTagRule::new("Room", "stay")).unwrap();
        store.add_rule(ProductTagRule::new("Room", "stay")).unwrap();
        store.add_rule(ProductTagRule::new("Spa", "wellness")).unwrap();

        let rules = store.load_rules().unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[0], rules[1]);
        assert_eq!(rules[2].title, "Spa");
    }

    #[test]
    fn test_delete_preserves_order_without_gaps() {
        let store = seeded();
        assert!(store.delete_rule(1).unwrap());

        let titles: Vec<_> = store
            .load_rules()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["a", "c", "d"]);

        // Re-indexed: index 1 is now "c"
        assert!(store.delete_rule(1).unwrap());
        let titles: Vec<_> = store
            .load_rules()
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["a", "d"]);
    }

    #[test]
    fn test_delete_out_of_range_is_noop() {
        let store = seeded();
        assert!(!store.delete_rule(4).unwrap());
        assert_eq!(store.load_rules().unwrap().len(), 4);
    }

    #[test]
    fn test_malformed_rules_read_as_empty() {
        let store = MemorySettingsStore::new();
        store
            .set(PRODUCT_TAGS, Value::String("not a list".into()))
            .unwrap();
        assert!(store.load_rules().unwrap().is_empty());
    }

    #[test]
    fn test_credentials_round_trip_through_options() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.load_credentials().unwrap(), Credentials::default());

        let creds = Credentials {
            stripe_api_key: Some("sk_test_1".into()),
            mailchimp_api_key: Some("abc-us21".into()),
            mailchimp_list_id: None,
        };
        store.save_credentials(&creds).unwrap();

        let loaded = store.load_credentials().unwrap();
        assert_eq!(loaded.stripe_key(), Some("sk_test_1"));
        assert_eq!(loaded.mailchimp_list_id.as_deref(), Some(""));
        assert_eq!(loaded.mailchimp(), None);
    }

    #[test]
    fn test_json_file_store_persists_across_instances() {
        let path = temp_path();
        let store = JsonFileSettingsStore::new(&path);
        assert!(store.load_rules().unwrap().is_empty());

        store.add_rule(ProductTagRule::new("Room", "stay")).unwrap();
        store
            .set(STRIPE_API_KEY, Value::String("sk_test_1".into()))
            .unwrap();

        let reopened = JsonFileSettingsStore::new(&path);
        assert_eq!(
            reopened.load_rules().unwrap(),
            vec![ProductTagRule::new("Room", "stay")]
        );
        assert_eq!(
            reopened.load_credentials().unwrap().stripe_key(),
            Some("sk_test_1")
        );

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
