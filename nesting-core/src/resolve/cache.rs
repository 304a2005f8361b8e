//! Value-keyed memoization of resolved layouts.

use std::collections::HashMap;
use std::sync::Arc;

use super::resolve;
use crate::config::ResolverConfig;
use crate::model::{Layout, Pattern};

/// Cache of layouts keyed by the *value* of `(pattern, config)`.
///
/// Two equal patterns hit the same entry no matter where they came from;
/// cached layouts are shared read-only and never updated in place.
#[derive(Debug, Default)]
pub struct LayoutCache {
    entries: HashMap<String, Arc<Layout>>,
    hits: usize,
    misses: usize,
}

impl LayoutCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a pattern, reusing a previous result for an equal input.
    pub fn resolve(&mut self, pattern: &Pattern, config: &ResolverConfig) -> Arc<Layout> {
        let Ok(key) = serde_json::to_string(&(pattern, config)) else {
            self.misses += 1;
            return Arc::new(resolve(pattern, config));
        };

        if let Some(layout) = self.entries.get(&key) {
            self.hits += 1;
            return Arc::clone(layout);
        }

        self.misses += 1;
        let layout = Arc::new(resolve(pattern, config));
        self.entries.insert(key, Arc::clone(&layout));
        layout
    }

    /// Number of cached layouts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Lookups that had to resolve.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drop all cached layouts.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Part;

    fn pattern() -> Pattern {
        Pattern::new(6000.0)
            .with_part(Part::new("b1", 2500.0).with_angles(None, Some(45.0.into())))
            .with_part(Part::new("b1", 2500.0).with_angles(None, Some(45.0.into())))
            .with_waste(1000.0)
    }

    #[test]
    fn test_equal_values_share_entry() {
        let mut cache = LayoutCache::new();
        let config = ResolverConfig::default();
        let first = cache.resolve(&pattern(), &config);
        let second = cache.resolve(&pattern().clone(), &config);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_changed_value_misses() {
        let mut cache = LayoutCache::new();
        let config = ResolverConfig::default();
        cache.resolve(&pattern(), &config);
        cache.resolve(&pattern().with_waste(999.0), &config);
        cache.resolve(&pattern(), &config.clone().with_near_straight(1.0));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.hits(), 0);
    }

    #[test]
    fn test_cached_layout_matches_fresh_resolve() {
        let mut cache = LayoutCache::new();
        let config = ResolverConfig::default();
        let cached = cache.resolve(&pattern(), &config);
        assert_eq!(*cached, resolve(&pattern(), &config));
        cache.clear();
        assert!(cache.is_empty());
    }
}
