//! Lifecycle driver for [`Tool`] implementations.

use super::context::ToolContext;
use super::error::{ToolError, ToolResult};
use super::state::{ExitStatus, LifecycleState};
use super::traits::Tool;
use crate::cli::{display_error_with_suggestions, ArgumentParser, ParseOutcome, ParsedArgs, UsageRequest};
use crate::component::{Component, ComponentClass, ToolScope, TraitError, Value};
use crate::config::{ConfigFileLoader, ConfigStore};
use crate::observability::Logger;
use anyhow::{anyhow, bail, Context};
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::Arc;

/// What `initialize` did with the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Initialization {
    /// Components are configured; `start` may run
    Ready,
    /// Help text was printed; the tool is finished
    Usage(UsageRequest),
    /// The version was printed; the tool is finished
    Version(String),
}

/// Drives a [`Tool`] through `initialize`, `start` and `finish`.
pub struct ToolRunner<T: Tool> {
    tool: T,
    state: LifecycleState,
    context: Option<ToolContext>,
    pending: Vec<(String, Value)>,
    cleaned_up: bool,
    logger: Logger,
}

impl<T: Tool> ToolRunner<T> {
    /// Wrap a tool in the `Created` state.
    pub fn new(tool: T) -> Self {
        let logger = Logger::default().named(tool.name().to_string());
        Self {
            tool,
            state: LifecycleState::Created,
            context: None,
            pending: Vec::new(),
            cleaned_up: false,
            logger,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The wrapped tool
    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Mutable access to the wrapped tool
    pub fn tool_mut(&mut self) -> &mut T {
        &mut self.tool
    }

    /// Components of an initialized tool
    pub fn context(&self) -> Option<&ToolContext> {
        self.context.as_ref()
    }

    /// Mutable components of an initialized tool
    pub fn context_mut(&mut self) -> Option<&mut ToolContext> {
        self.context.as_mut()
    }

    fn logger(&self) -> &Logger {
        self.context
            .as_ref()
            .map(ToolContext::logger)
            .unwrap_or(&self.logger)
    }

    fn transition(&mut self, next: LifecycleState) {
        self.logger()
            .debug(&format!("state {} -> {}", self.state, next));
        self.state = next;
    }

    /// Assign one of the tool's own attributes from code.
    ///
    /// Once components exist this goes through [`Component::set`]. Before
    /// `initialize` the value is validated and queued; it is applied after
    /// file and command-line values, so it always wins.
    pub fn set(&mut self, attribute: &str, value: impl Into<Value>) -> ToolResult<()> {
        if let Some(context) = self.context.as_mut() {
            context.tool_mut().set(attribute, value)?;
            return Ok(());
        }

        if self.state != LifecycleState::Created {
            return Err(ToolError::IllegalState {
                operation: "set",
                state: self.state,
            });
        }

        let class = self.tool.class();
        let descriptor = class
            .attribute(attribute)
            .ok_or_else(|| TraitError::UnknownAttribute {
                class: class.name().to_string(),
                attribute: attribute.to_string(),
            })?;
        let value = descriptor.validate(&value.into())?;
        self.pending.push((attribute.to_string(), value));
        Ok(())
    }

    /// Parse arguments, merge configuration, construct components and run
    /// the `setup` hook.
    pub fn initialize<I, S>(&mut self, args: I) -> ToolResult<Initialization>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.state != LifecycleState::Created {
            return Err(ToolError::IllegalState {
                operation: "initialize",
                state: self.state,
            });
        }

        let mut registered = vec![self.tool.class()];
        registered.extend(self.tool.classes());

        let mut seen = BTreeSet::new();
        if let Some(class) = registered.iter().find(|class| !seen.insert(class.name())) {
            let e = anyhow!("component class {} is registered twice", class.name());
            self.logger().error(&format!("setup failed: {:#}", e));
            self.transition(LifecycleState::Failed);
            return Err(ToolError::Setup(e));
        }

        let parsed = ArgumentParser::new(self.tool.name(), &registered, &self.tool.aliases())
            .map(|parser| {
                parser
                    .about(self.tool.description())
                    .version(self.tool.version())
            })
            .and_then(|parser| parser.parse(args));

        let parsed = match parsed {
            Ok(ParseOutcome::Usage(request)) => {
                println!("{}", request.text);
                self.transition(LifecycleState::Finished);
                return Ok(Initialization::Usage(request));
            }
            Ok(ParseOutcome::Version(version)) => {
                println!("{}", version);
                self.transition(LifecycleState::Finished);
                return Ok(Initialization::Version(version));
            }
            Ok(ParseOutcome::Configure(parsed)) => parsed,
            Err(e) => {
                self.transition(LifecycleState::Failed);
                return Err(ToolError::Argument(e));
            }
        };

        if let Err(e) = self.configure(parsed, registered) {
            self.logger().error(&format!("setup failed: {:#}", e));
            self.transition(LifecycleState::Failed);
            return Err(ToolError::Setup(e));
        }

        self.transition(LifecycleState::Initialized);
        Ok(Initialization::Ready)
    }

    fn configure(
        &mut self,
        parsed: ParsedArgs,
        registered: Vec<Arc<ComponentClass>>,
    ) -> anyhow::Result<()> {
        let mut logger = Logger::new(parsed.log_file.as_deref(), None)?
            .with_level(parsed.log_level.unwrap_or_default());
        if let Some(format) = parsed.log_format {
            logger = logger.with_format(format);
        }

        let mut store = ConfigStore::from_defaults(&registered);
        if let Some(path) = &parsed.config_file {
            let fragment = ConfigFileLoader::load(path)?;
            store.merge(&fragment);
            logger.info(&format!(
                "merged {} value(s) from {}",
                fragment.len(),
                path.display()
            ));
        }
        store.merge(&parsed.fragment);

        let scope = Rc::new(ToolScope::new(self.tool.name(), logger, store));
        for key in scope.store().unrecognized_keys() {
            scope.logger().warning(&key.to_string());
        }

        let (tool_class, classes) = match registered.split_first() {
            Some((first, rest)) => (Arc::clone(first), rest.to_vec()),
            None => bail!("tool has no component class"),
        };

        let tool_name = tool_class.name().to_string();
        let mut tool = Component::configured(tool_class, tool_name, &scope)
            .context("failed to configure tool")?;
        for (attribute, value) in self.pending.drain(..) {
            tool.set(&attribute, value)?;
        }

        let mut components = Vec::with_capacity(classes.len());
        for class in classes {
            let name = class.name().to_string();
            let component = Component::configured(class, name.clone(), &scope)
                .with_context(|| format!("failed to configure component {}", name))?;
            components.push(component);
        }

        let context = self
            .context
            .insert(ToolContext::new(scope, tool, components));
        self.tool.setup(context).context("setup hook failed")?;
        Ok(())
    }

    /// Run the `start` hook.
    pub fn start(&mut self) -> ToolResult<()> {
        let illegal = ToolError::IllegalState {
            operation: "start",
            state: self.state,
        };
        if self.state != LifecycleState::Initialized {
            return Err(illegal);
        }
        let Some(context) = self.context.as_mut() else {
            return Err(illegal);
        };

        match serde_json::to_string(&context.current_config()) {
            Ok(config) => context.logger().debug(&format!("configuration: {}", config)),
            Err(e) => context
                .logger()
                .debug(&format!("configuration not serializable: {}", e)),
        }

        self.transition(LifecycleState::Running);
        let Some(context) = self.context.as_mut() else {
            unreachable!("context checked above");
        };
        let result = self.tool.start(context);
        match result {
            Ok(()) => {
                self.transition(LifecycleState::Finished);
                Ok(())
            }
            Err(e) => {
                self.logger().error(&format!("runtime error: {:#}", e));
                self.transition(LifecycleState::Failed);
                Err(ToolError::Runtime(e))
            }
        }
    }

    /// Run the `finish` hook at most once.
    ///
    /// Errors from the hook are logged and suppressed. Calling this again is
    /// a no-op.
    pub fn finish(&mut self) {
        if self.cleaned_up || self.state == LifecycleState::Created {
            return;
        }
        self.cleaned_up = true;

        if let Some(context) = self.context.as_mut() {
            if let Err(e) = self.tool.finish(context) {
                context
                    .logger()
                    .error(&format!("finish hook failed: {:#}", e));
            }
        }

        if matches!(
            self.state,
            LifecycleState::Initialized | LifecycleState::Running
        ) {
            self.transition(LifecycleState::Finished);
        }
    }

    /// `initialize`, then `start`, then `finish`; returns the first error.
    pub fn execute<I, S>(&mut self, args: I) -> ToolResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let result = match self.initialize(args) {
            Ok(Initialization::Ready) => self.start(),
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };
        self.finish();
        result
    }

    /// Run the whole lifecycle and map the outcome to an exit status.
    ///
    /// Errors are reported on stderr together with the lifecycle state.
    pub fn run<I, S>(&mut self, args: I) -> ExitStatus
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.execute(args) {
            Ok(()) => ExitStatus::Success,
            Err(e) => {
                let name = self.tool.name().to_string();
                display_error_with_suggestions(
                    &e,
                    &format!("{} stopped in state {}", name, self.state),
                    Some(&name),
                );
                e.exit_status()
            }
        }
    }

    /// [`ToolRunner::run`] with the process arguments.
    pub fn run_from_env(&mut self) -> ExitStatus {
        self.run(std::env::args().skip(1))
    }
}
