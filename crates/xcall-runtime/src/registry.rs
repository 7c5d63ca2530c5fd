//! Plugin identity registry

use rustc_hash::FxHashMap;
use xcall_sdk::{BoundaryError, BoundaryResult, PluginInfo, Side};

/// Identity records of loaded plugins, looked up by name.
#[derive(Debug, Default)]
pub struct PluginRegistry {
    plugins: Vec<(Side, PluginInfo)>,
    by_name: FxHashMap<String, usize>,
}

impl PluginRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a plugin loaded on `side`; names must be unique.
    pub fn register(&mut self, side: Side, info: PluginInfo) -> BoundaryResult<()> {
        if self.by_name.contains_key(&info.name) {
            return Err(BoundaryError::Malformed(format!(
                "plugin '{}' is already loaded",
                info.name
            )));
        }
        self.by_name.insert(info.name.clone(), self.plugins.len());
        self.plugins.push((side, info));
        Ok(())
    }

    /// Identity of the plugin named `name`
    pub fn find_by_name(&self, name: &str) -> Option<&PluginInfo> {
        self.by_name.get(name).map(|&i| &self.plugins[i].1)
    }

    /// Identity of the plugin with numeric id `id`
    pub fn find_by_id(&self, id: u64) -> Option<&PluginInfo> {
        self.plugins
            .iter()
            .map(|(_, info)| info)
            .find(|info| info.id == id)
    }

    /// Side a plugin was loaded on
    pub fn side_of(&self, name: &str) -> Option<Side> {
        self.by_name.get(name).map(|&i| self.plugins[i].0)
    }

    /// All plugins in load order
    pub fn iter(&self) -> impl Iterator<Item = (Side, &PluginInfo)> {
        self.plugins.iter().map(|(side, info)| (*side, info))
    }

    /// Number of plugins
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is loaded
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Side::Managed, PluginInfo::new(7, "cross_call_worker", "1.0.0"))
            .unwrap();
        registry
            .register(Side::Native, PluginInfo::new(8, "cross_call_master", "1.0.0"))
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_by_name("cross_call_worker").unwrap().id, 7);
        assert_eq!(registry.find_by_id(8).unwrap().name, "cross_call_master");
        assert_eq!(registry.side_of("cross_call_master"), Some(Side::Native));
        assert!(registry.find_by_name("missing").is_none());
    }

    #[test]
    fn test_duplicate_name() {
        let mut registry = PluginRegistry::new();
        registry
            .register(Side::Managed, PluginInfo::new(1, "dup", "1.0.0"))
            .unwrap();
        assert!(registry
            .register(Side::Native, PluginInfo::new(2, "dup", "2.0.0"))
            .is_err());
        assert_eq!(registry.len(), 1);
    }
}
