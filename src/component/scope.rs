//! State a tool shares with the components it owns.

use crate::config::ConfigStore;
use crate::observability::Logger;
use std::cell::{Ref, RefCell};

/// Shared tool state reachable from components through a weak parent link.
///
/// Created when a tool initializes; components hold `Weak<ToolScope>` so the
/// scope is never kept alive by its children.
#[derive(Debug)]
pub struct ToolScope {
    name: String,
    logger: Logger,
    store: RefCell<ConfigStore>,
}

impl ToolScope {
    /// Create a scope for the tool called `name`.
    pub fn new(name: impl Into<String>, logger: Logger, store: ConfigStore) -> Self {
        let name = name.into();
        Self {
            logger: logger.named(name.clone()),
            name,
            store: RefCell::new(store),
        }
    }

    /// Tool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tool logger
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Borrow the merged configuration.
    pub fn store(&self) -> Ref<'_, ConfigStore> {
        self.store.borrow()
    }

    /// Write a programmatic assignment through to the store.
    pub(crate) fn record(&self, class: &str, attribute: &str, value: &crate::component::Value) {
        self.store
            .borrow_mut()
            .assign(class, attribute, value.clone());
    }
}
