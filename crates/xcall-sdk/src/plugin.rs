//! Plugin identity and lifecycle interface

use crate::context::CallContext;
use crate::error::BoundaryResult;
use crate::export::Export;

/// Identity record of a loaded plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    /// Numeric id, unique within a process
    pub id: u64,
    /// Name used for lookups
    pub name: String,
    /// Version string
    pub version: String,
    /// Human-readable description
    pub description: String,
    /// Author, if declared
    pub author: Option<String>,
}

impl PluginInfo {
    /// Identity with an empty description and no author
    pub fn new(id: u64, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            version: version.into(),
            description: String::new(),
            author: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// A unit of exports living on one side of the boundary.
pub trait Plugin: Send + Sync {
    /// Identity record
    fn info(&self) -> PluginInfo;

    /// Entry points this plugin contributes
    fn exports(&self) -> Vec<Export>;

    /// Called once after both sides are loaded
    fn on_start(&self, _ctx: &dyn CallContext) -> BoundaryResult<()> {
        Ok(())
    }

    /// Called once before the boundary is torn down
    fn on_end(&self, _ctx: &dyn CallContext) {}
}
