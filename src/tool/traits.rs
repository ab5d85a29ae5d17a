//! The trait concrete tools implement.

use super::context::ToolContext;
use crate::cli::AliasTable;
use crate::component::ComponentClass;
use anyhow::Result;
use std::sync::Arc;

/// A command-line tool built from configurable components.
///
/// The tool's own attributes live in [`Tool::class`]; every class returned by
/// [`Tool::classes`] gets one configured component (named after the class)
/// before [`Tool::setup`] runs. The hooks are driven by
/// [`ToolRunner`](super::ToolRunner).
///
/// # Example
///
/// ```
/// use ctk::component::{AttrType, AttributeDescriptor, ComponentClass};
/// use ctk::tool::{Tool, ToolContext, ToolRunner};
/// use std::sync::Arc;
///
/// struct Counter;
///
/// impl Tool for Counter {
///     fn name(&self) -> &str {
///         "counter"
///     }
///
///     fn class(&self) -> Arc<ComponentClass> {
///         Arc::new(
///             ComponentClass::new("Counter")
///                 .with_attribute(AttributeDescriptor::new("count", AttrType::Integer, 3))
///                 .unwrap(),
///         )
///     }
///
///     fn start(&mut self, ctx: &mut ToolContext) -> anyhow::Result<()> {
///         let count = ctx.tool().get_i64("count").unwrap_or_default();
///         ctx.logger().info(&format!("counting to {}", count));
///         Ok(())
///     }
/// }
///
/// let status = ToolRunner::new(Counter).run(["--Counter.count", "2"]);
/// assert!(status.is_success());
/// ```
pub trait Tool {
    /// Program name used in usage text and log output
    fn name(&self) -> &str;

    /// One-line description shown in help output
    fn description(&self) -> &str {
        ""
    }

    /// Version reported by `--version`
    fn version(&self) -> &str {
        ""
    }

    /// The tool's own attribute table
    fn class(&self) -> Arc<ComponentClass>;

    /// Component classes the tool configures, in order
    fn classes(&self) -> Vec<Arc<ComponentClass>> {
        Vec::new()
    }

    /// Short command-line names for `Class.attribute` paths
    fn aliases(&self) -> AliasTable {
        AliasTable::new()
    }

    /// Wire components together once configuration is merged
    ///
    /// Runs during `initialize`; an error fails setup.
    fn setup(&mut self, ctx: &mut ToolContext) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Main body of the tool
    fn start(&mut self, ctx: &mut ToolContext) -> Result<()>;

    /// Best-effort cleanup; errors are logged and suppressed
    fn finish(&mut self, ctx: &mut ToolContext) -> Result<()> {
        let _ = ctx;
        Ok(())
    }
}
