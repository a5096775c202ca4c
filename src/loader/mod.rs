//! Remote schema loading (spec §4.G): fetch bytes for an external reference
//! path, parse them as JSON, then as a schema. Grounded in the teacher's
//! `registry.rs`, whose schema map is an `Arc<RwLock<HashMap<...>>>`;
//! extended here with the single-flight load-once-per-path guarantee spec
//! §5 requires, which the teacher's registry never needed (it never loads
//! remotely).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock};
use serde_json::Value;
use thiserror::Error;

use crate::schema::ast::SchemaNode;

/// Gives the loader bytes for a path; implementations decide what a path
/// means (filesystem, HTTP, an in-memory map for tests).
pub trait ResourceLoader: Send + Sync {
    fn load(&self, path: &str) -> Result<Vec<u8>, LoaderError>;
}

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to load resource '{path}': {message}")]
    LoadFailure { path: String, message: String },
    #[error("resource '{path}' is not valid JSON: {message}")]
    JsonSerializationError { path: String, message: String },
    #[error("resource '{path}' is not a valid schema: {message}")]
    InvalidSchema { path: String, message: String },
}

enum CacheEntry {
    Loading(Arc<(Mutex<bool>, Condvar)>),
    Loaded(Arc<SchemaNode>),
}

/// Keyed by normalized external path; a document is loaded and parsed at
/// most once per engine lifetime even under concurrent callers (spec §5).
pub struct SchemaCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    #[tracing::instrument(skip(self, loader, parse), fields(path = %path))]
    pub fn get_or_load(
        &self,
        path: &str,
        loader: &dyn ResourceLoader,
        parse: impl FnOnce(&Value) -> Result<SchemaNode, LoaderError>,
    ) -> Result<Arc<SchemaNode>, LoaderError> {
        loop {
            {
                let entries = self.entries.read();
                match entries.get(path) {
                    Some(CacheEntry::Loaded(node)) => return Ok(node.clone()),
                    Some(CacheEntry::Loading(latch)) => {
                        let latch = latch.clone();
                        drop(entries);
                        let (lock, cvar) = &*latch;
                        let mut done = lock.lock();
                        if !*done {
                            cvar.wait(&mut done);
                        }
                        continue;
                    }
                    None => {}
                }
            }

            let mut entries = self.entries.write();
            if entries.contains_key(path) {
                continue;
            }
            let latch = Arc::new((Mutex::new(false), Condvar::new()));
            entries.insert(path.to_string(), CacheEntry::Loading(latch.clone()));
            drop(entries);

            let result = self.load_and_parse(path, loader, parse);

            let mut entries = self.entries.write();
            match &result {
                Ok(node) => {
                    entries.insert(path.to_string(), CacheEntry::Loaded(node.clone()));
                }
                Err(_) => {
                    entries.remove(path);
                }
            }
            drop(entries);

            let (lock, cvar) = &*latch;
            *lock.lock() = true;
            cvar.notify_all();

            return result;
        }
    }

    #[tracing::instrument(skip(self, loader, parse), fields(path = %path))]
    fn load_and_parse(
        &self,
        path: &str,
        loader: &dyn ResourceLoader,
        parse: impl FnOnce(&Value) -> Result<SchemaNode, LoaderError>,
    ) -> Result<Arc<SchemaNode>, LoaderError> {
        let bytes = loader.load(path)?;
        let value: Value = serde_json::from_slice(&bytes).map_err(|e| LoaderError::JsonSerializationError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let node = parse(&value)?;
        Ok(Arc::new(node))
    }
}

impl Default for SchemaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader {
        calls: AtomicUsize,
    }

    impl ResourceLoader for CountingLoader {
        fn load(&self, _path: &str) -> Result<Vec<u8>, LoaderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(b"{\"type\":\"string\"}".to_vec())
        }
    }

    #[test]
    fn loads_a_path_at_most_once() {
        let cache = SchemaCache::new();
        let loader = CountingLoader { calls: AtomicUsize::new(0) };
        for _ in 0..3 {
            cache
                .get_or_load("other.json", &loader, |_| {
                    Ok(SchemaNode::BooleanValue(true))
                })
                .unwrap();
        }
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        struct FailingLoader;
        impl ResourceLoader for FailingLoader {
            fn load(&self, path: &str) -> Result<Vec<u8>, LoaderError> {
                Err(LoaderError::LoadFailure {
                    path: path.to_string(),
                    message: "not found".to_string(),
                })
            }
        }
        let cache = SchemaCache::new();
        assert!(cache
            .get_or_load("missing.json", &FailingLoader, |_| Ok(SchemaNode::BooleanValue(true)))
            .is_err());
    }
}
