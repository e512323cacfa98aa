//! Registry of tracked metadata keys
//!
//! Each tracked key may carry a renderer that formats its values for the
//! revision comparison view. The registry is filled during application
//! wiring and read by every capture, restore and render afterwards.

use std::fmt;
use std::sync::Arc;

use revmeta_store::MetaValue;

/// Formats one stored value for display.
///
/// The returned markup is embedded verbatim, so a renderer is responsible
/// for its own escaping.
pub type Renderer = Arc<dyn Fn(&MetaValue) -> String + Send + Sync>;

/// Wrap a closure as a [`Renderer`]
pub fn renderer<F>(f: F) -> Renderer
where
    F: Fn(&MetaValue) -> String + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A tracked metadata key and how its values render
#[derive(Clone)]
pub struct KeyDescriptor {
    key: String,
    renderer: Option<Renderer>,
}

impl KeyDescriptor {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn renderer(&self) -> Option<&Renderer> {
        self.renderer.as_ref()
    }
}

impl fmt::Debug for KeyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDescriptor")
            .field("key", &self.key)
            .field("renderer", &self.renderer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Ordered set of tracked keys.
///
/// Iteration follows registration order. A key appears at most once.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<KeyDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `key`, optionally with a renderer.
    ///
    /// Registering a key that is already tracked changes nothing; the
    /// first registration and its renderer stay in place. Always returns
    /// `true`; an empty key is logged and not tracked.
    pub fn register(&mut self, key: impl Into<String>, renderer: Option<Renderer>) -> bool {
        let key = key.into();
        if key.is_empty() {
            tracing::warn!("Ignoring empty metadata key");
            return true;
        }
        if !self.contains(&key) {
            tracing::debug!(key = %key, custom_renderer = renderer.is_some(), "Tracking metadata key");
            self.descriptors.push(KeyDescriptor { key, renderer });
        }
        true
    }

    /// Whether at least one key is tracked
    pub fn has_keys(&self) -> bool {
        !self.descriptors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.descriptors.iter().any(|d| d.key == key)
    }

    pub fn get(&self, key: &str) -> Option<&KeyDescriptor> {
        self.descriptors.iter().find(|d| d.key == key)
    }

    /// Tracked keys in registration order
    pub fn keys(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.key.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyDescriptor> {
        self.descriptors.iter()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a KeyDescriptor;
    type IntoIter = std::slice::Iter<'a, KeyDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.descriptors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_registry_has_no_keys() {
        let registry = Registry::new();
        assert!(!registry.has_keys());
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_register_returns_true_and_tracks() {
        let mut registry = Registry::new();
        assert!(registry.register("color", None));
        assert!(registry.has_keys());
        assert!(registry.contains("color"));
        assert!(!registry.contains("size"));
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = Registry::new();
        assert!(registry.register("color", None));
        assert!(registry.register("color", None));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_first_renderer_wins() {
        let mut registry = Registry::new();
        registry.register("color", Some(renderer(|_| "first".to_string())));
        registry.register("color", Some(renderer(|_| "second".to_string())));

        let descriptor = registry.get("color").unwrap();
        let render = descriptor.renderer().unwrap();
        assert_eq!(render(&MetaValue::Null), "first");
    }

    #[test]
    fn test_duplicate_without_renderer_keeps_existing_renderer() {
        let mut registry = Registry::new();
        registry.register("color", Some(renderer(|_| "r".to_string())));
        registry.register("color", None);
        assert!(registry.get("color").unwrap().renderer().is_some());
    }

    #[test]
    fn test_keys_follow_registration_order() {
        let mut registry = Registry::new();
        for key in ["zeta", "alpha", "mid", "alpha"] {
            registry.register(key, None);
        }
        assert_eq!(registry.keys(), vec!["zeta", "alpha", "mid"]);
        let iterated: Vec<&str> = (&registry).into_iter().map(|d| d.key()).collect();
        assert_eq!(iterated, registry.keys());
    }

    #[test]
    fn test_empty_key_is_ignored() {
        let mut registry = Registry::new();
        assert!(registry.register("", None));
        assert!(!registry.has_keys());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_iter_yields_descriptors_with_renderers() {
        let mut registry = Registry::new();
        registry.register("color", None);
        registry.register("gallery", Some(renderer(|_| "<b>g</b>".to_string())));

        let bound: Vec<(&str, bool)> = registry
            .iter()
            .map(|d| (d.key(), d.renderer().is_some()))
            .collect();
        assert_eq!(bound, vec![("color", false), ("gallery", true)]);
    }

    #[test]
    fn test_descriptor_debug_hides_closure() {
        let mut registry = Registry::new();
        registry.register("color", Some(renderer(|_| String::new())));
        let debug = format!("{:?}", registry.get("color").unwrap());
        assert!(debug.contains("color"));
        assert!(debug.contains("<fn>"));
    }
}
