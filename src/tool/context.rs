//! Runtime context handed to tool hooks.

use crate::component::{Component, ComponentClass, ToolScope, TraitResult};
use crate::config::{Sections, UnrecognizedKey};
use crate::observability::Logger;
use std::rc::Rc;
use std::sync::Arc;

/// Components and shared state of an initialized tool.
///
/// Owns the tool's own component and every sub-component; the components
/// link back to the shared [`ToolScope`] weakly.
#[derive(Debug)]
pub struct ToolContext {
    scope: Rc<ToolScope>,
    tool: Component,
    components: Vec<Component>,
}

impl ToolContext {
    pub(crate) fn new(scope: Rc<ToolScope>, tool: Component, components: Vec<Component>) -> Self {
        Self {
            scope,
            tool,
            components,
        }
    }

    /// The tool's own component
    pub fn tool(&self) -> &Component {
        &self.tool
    }

    /// Mutable access to the tool's own component
    pub fn tool_mut(&mut self) -> &mut Component {
        &mut self.tool
    }

    /// Sub-component by instance name
    pub fn component(&self, instance_name: &str) -> Option<&Component> {
        self.components
            .iter()
            .find(|c| c.instance_name() == instance_name)
    }

    /// Mutable sub-component by instance name
    pub fn component_mut(&mut self, instance_name: &str) -> Option<&mut Component> {
        self.components
            .iter_mut()
            .find(|c| c.instance_name() == instance_name)
    }

    /// All sub-components in construction order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Construct another configured component linked to this tool.
    ///
    /// The new instance reads its class section from the merged store, so
    /// several instances of one class start from the same configuration.
    pub fn instantiate(
        &mut self,
        class: Arc<ComponentClass>,
        instance_name: impl Into<String>,
    ) -> TraitResult<&mut Component> {
        let component = Component::configured(class, instance_name, &self.scope)?;
        self.scope.logger().debug(&format!(
            "instantiated {} ({})",
            component.instance_name(),
            component.class_name()
        ));
        self.components.push(component);
        let index = self.components.len() - 1;
        Ok(&mut self.components[index])
    }

    /// Tool-level logger
    pub fn logger(&self) -> &Logger {
        self.scope.logger()
    }

    /// Shared scope components link back to
    pub fn scope(&self) -> &Rc<ToolScope> {
        &self.scope
    }

    /// The resolved configuration, including programmatic assignments
    pub fn current_config(&self) -> Sections {
        self.scope.store().snapshot()
    }

    /// Keys the store rejected while merging
    pub fn unrecognized_keys(&self) -> Vec<UnrecognizedKey> {
        self.scope.store().unrecognized_keys().to_vec()
    }
}
