//! Cookie access.
//!
//! The session cookie pair is the only state shared across pages. Reads
//! happen on every guard check and every outgoing request, so the store
//! is consulted at call time and never cached.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub trait CookieStore {
    fn get(&self, name: &str) -> Option<String>;
    fn set(&self, name: &str, value: &str);
    fn remove(&self, name: &str);
}

impl<T: CookieStore + ?Sized> CookieStore for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: &str) {
        (**self).set(name, value)
    }

    fn remove(&self, name: &str) {
        (**self).remove(name)
    }
}

/// In-memory store. Clones share the same jar.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookies {
    jar: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jar.lock().map(|jar| jar.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CookieStore for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.jar.lock().ok()?.get(name).cloned()
    }

    fn set(&self, name: &str, value: &str) {
        if let Ok(mut jar) = self.jar.lock() {
            jar.insert(name.to_string(), value.to_string());
        }
    }

    fn remove(&self, name: &str) {
        if let Ok(mut jar) = self.jar.lock() {
            jar.remove(name);
        }
    }
}
