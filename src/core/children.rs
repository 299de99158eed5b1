//! Named child loggers

use super::logger::Logger;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Children of one logger, keyed by name.
///
/// Lookups take the read lock. On a miss the child is derived outside of any
/// lock and inserted only if the name is still free, so racing first requests
/// all receive the instance that was stored first.
pub struct ChildRegistry {
    items: RwLock<HashMap<String, Arc<Logger>>>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.items.read().get(name).cloned()
    }

    pub fn get_or_create(&self, name: &str, parent: &Logger) -> Arc<Logger> {
        if let Some(child) = self.get(name) {
            return child;
        }

        let candidate = parent.clone();
        candidate.set_prefix(child_prefix(name));

        let mut items = self.items.write();
        Arc::clone(
            items
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(candidate)),
        )
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.items.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ChildRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChildRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// `"db"` becomes `"db: "`; a name already ending in whitespace is kept as is.
pub fn child_prefix(name: &str) -> String {
    match name.chars().last() {
        Some(last) if last.is_whitespace() => name.to_string(),
        _ => format!("{}: ", name),
    }
}
