//! Integration tests for the tool lifecycle and exit statuses

use anyhow::Result;
use ctk::prelude::*;
use ctk::tool::Initialization;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

type Events = Rc<RefCell<Vec<String>>>;

#[derive(Default)]
struct Behaviour {
    fail_setup: bool,
    fail_start: bool,
    fail_finish: bool,
}

struct RecordingTool {
    events: Events,
    behaviour: Behaviour,
}

impl RecordingTool {
    fn new(behaviour: Behaviour) -> (Self, Events) {
        let events = Events::default();
        (
            Self {
                events: Rc::clone(&events),
                behaviour,
            },
            events,
        )
    }

    fn record(&self, event: impl Into<String>) {
        self.events.borrow_mut().push(event.into());
    }
}

impl Tool for RecordingTool {
    fn name(&self) -> &str {
        "mytool"
    }

    fn description(&self) -> &str {
        "do some things and stuff"
    }

    fn version(&self) -> &str {
        "1.2.3"
    }

    fn class(&self) -> Arc<ComponentClass> {
        Arc::new(
            ComponentClass::new("MyTool")
                .with_attribute(
                    AttributeDescriptor::new("iterations", AttrType::Integer, 5)
                        .help("Number of times to run"),
                )
                .unwrap()
                .with_attribute(
                    AttributeDescriptor::new("label", AttrType::Text, "none").configurable(false),
                )
                .unwrap(),
        )
    }

    fn classes(&self) -> Vec<Arc<ComponentClass>> {
        vec![Arc::new(
            ComponentClass::new("AdvancedComponent")
                .with_attribute(
                    AttributeDescriptor::new("outfile", AttrType::Text, "out.txt")
                        .help("output file name"),
                )
                .unwrap()
                .with_attribute(AttributeDescriptor::new("value1", AttrType::Integer, -1))
                .unwrap(),
        )]
    }

    fn aliases(&self) -> AliasTable {
        AliasTable::new()
            .add("iterations", "MyTool.iterations")
            .add("outfile", "AdvancedComponent.outfile")
    }

    fn setup(&mut self, ctx: &mut ToolContext) -> Result<()> {
        self.record(format!("setup:{}", ctx.components().len()));
        if self.behaviour.fail_setup {
            anyhow::bail!("setup refused");
        }
        Ok(())
    }

    fn start(&mut self, ctx: &mut ToolContext) -> Result<()> {
        let iterations = ctx.tool().get_i64("iterations").unwrap_or_default();
        self.record(format!("start:{}", iterations));
        if self.behaviour.fail_start {
            anyhow::bail!("start exploded");
        }
        Ok(())
    }

    fn finish(&mut self, _ctx: &mut ToolContext) -> Result<()> {
        self.record("finish");
        if self.behaviour.fail_finish {
            anyhow::bail!("finish failed");
        }
        Ok(())
    }
}

fn events(events: &Events) -> Vec<String> {
    events.borrow().clone()
}

#[test]
fn test_successful_run() {
    let (tool, log) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    let status = runner.run(["--iterations", "2"]);

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(runner.state(), LifecycleState::Finished);
    assert_eq!(events(&log), vec!["setup:1", "start:2", "finish"]);
}

#[test]
fn test_help_constructs_no_components() {
    for flag in ["--help", "--help-all"] {
        let (tool, log) = RecordingTool::new(Behaviour::default());
        let mut runner = ToolRunner::new(tool);

        let status = runner.run([flag]);

        assert_eq!(status.code(), 0);
        assert_eq!(runner.state(), LifecycleState::Finished);
        assert!(runner.context().is_none());
        assert!(events(&log).is_empty());
    }
}

#[test]
fn test_help_all_lists_configurable_attributes() {
    let (tool, _) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    let Ok(Initialization::Usage(usage)) = runner.initialize(["--help-all"]) else {
        panic!("expected usage output");
    };
    assert!(usage.all);
    assert!(usage.text.contains("--MyTool.iterations"));
    assert!(usage.text.contains("--AdvancedComponent.outfile"));
    assert!(usage.text.contains("--AdvancedComponent.value1"));
    assert!(!usage.text.contains("MyTool.label"));
}

#[test]
fn test_version_flag() {
    let (tool, _) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    let outcome = runner.initialize(["--version"]).unwrap();
    assert_eq!(outcome, Initialization::Version("mytool 1.2.3".to_string()));
    assert_eq!(runner.state(), LifecycleState::Finished);
}

#[test]
fn test_malformed_config_is_setup_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[MyTool\niterations = ").unwrap();

    let (tool, log) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);
    let status = runner.run(["--config", path.to_str().unwrap()]);

    assert_eq!(status.code(), 2);
    assert_eq!(runner.state(), LifecycleState::Failed);
    assert!(!events(&log).iter().any(|e| e.starts_with("start")));
}

#[test]
fn test_missing_config_is_setup_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.toml");

    let (tool, _) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);
    let err = runner
        .initialize(["--config", path.to_str().unwrap()])
        .unwrap_err();

    assert!(matches!(err, ToolError::Setup(_)));
    let ToolError::Setup(source) = err else {
        unreachable!()
    };
    assert!(matches!(
        source.downcast_ref::<ctk::config::ConfigError>(),
        Some(ctk::config::ConfigError::ConfigFileNotFound { .. })
    ));
}

#[test]
fn test_invalid_value_is_setup_error() {
    let (tool, log) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    let status = runner.run(["--iterations", "many"]);

    assert_eq!(status, ExitStatus::SetupError);
    assert!(events(&log).is_empty());
}

#[test]
fn test_unrecognized_argument_exits_3() {
    let (tool, log) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    let status = runner.run(["--MyTool.bogus", "1"]);

    assert_eq!(status.code(), 3);
    assert_eq!(runner.state(), LifecycleState::Failed);
    assert!(events(&log).is_empty());

    let (tool, _) = RecordingTool::new(Behaviour::default());
    assert_eq!(ToolRunner::new(tool).run(["--MyTool.label", "x"]).code(), 3);
}

struct DuplicateClassTool;

impl Tool for DuplicateClassTool {
    fn name(&self) -> &str {
        "dup"
    }

    fn class(&self) -> Arc<ComponentClass> {
        Arc::new(
            ComponentClass::new("A")
                .with_attribute(AttributeDescriptor::new("x", AttrType::Integer, 1))
                .unwrap(),
        )
    }

    fn classes(&self) -> Vec<Arc<ComponentClass>> {
        vec![self.class()]
    }

    fn start(&mut self, _ctx: &mut ToolContext) -> Result<()> {
        anyhow::bail!("start must not run")
    }
}

#[test]
fn test_class_registered_twice_is_setup_error() {
    let mut runner = ToolRunner::new(DuplicateClassTool);

    let status = runner.run(Vec::<String>::new());

    assert_eq!(status, ExitStatus::SetupError);
    assert_eq!(runner.state(), LifecycleState::Failed);
    assert!(runner.context().is_none());

    let err = ToolRunner::new(DuplicateClassTool)
        .initialize(["--help"])
        .unwrap_err();
    assert!(matches!(err, ToolError::Setup(_)));
    assert!(err.to_string().contains("component class A is registered twice"));
}

#[test]
fn test_state_changes_are_logged() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("tool.log");
    let (tool, _) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    runner
        .initialize([
            "--log-level",
            "DEBUG",
            "--log-file",
            log_path.to_str().unwrap(),
            "--log-format",
            "{level}|{message}",
        ])
        .unwrap();
    runner.start().unwrap();

    let content = fs::read_to_string(&log_path).unwrap();
    assert!(content.contains("DEBUG|state initialized -> running"));
    assert!(content.contains("DEBUG|state running -> finished"));
}

#[test]
fn test_start_before_initialize_is_illegal() {
    let (tool, log) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    let err = runner.start().unwrap_err();

    assert!(matches!(
        err,
        ToolError::IllegalState {
            operation: "start",
            state: LifecycleState::Created
        }
    ));
    assert_eq!(runner.state(), LifecycleState::Created);
    assert!(events(&log).is_empty());
}

#[test]
fn test_initialize_twice_is_illegal() {
    let (tool, _) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    runner.initialize(Vec::<String>::new()).unwrap();
    assert_eq!(runner.state(), LifecycleState::Initialized);

    let err = runner.initialize(Vec::<String>::new()).unwrap_err();
    assert!(matches!(err, ToolError::IllegalState { operation: "initialize", .. }));
}

#[test]
fn test_finish_twice_equals_once() {
    let (tool, log) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    runner.initialize(Vec::<String>::new()).unwrap();
    runner.start().unwrap();
    runner.finish();
    runner.finish();

    assert_eq!(runner.state(), LifecycleState::Finished);
    assert_eq!(events(&log), vec!["setup:1", "start:5", "finish"]);
}

#[test]
fn test_setup_failure() {
    let (tool, log) = RecordingTool::new(Behaviour {
        fail_setup: true,
        ..Behaviour::default()
    });
    let mut runner = ToolRunner::new(tool);

    let status = runner.run(Vec::<String>::new());

    assert_eq!(status, ExitStatus::SetupError);
    assert_eq!(runner.state(), LifecycleState::Failed);
    assert_eq!(events(&log), vec!["setup:1", "finish"]);
}

#[test]
fn test_runtime_failure_is_reraised() {
    let (tool, log) = RecordingTool::new(Behaviour {
        fail_start: true,
        ..Behaviour::default()
    });
    let mut runner = ToolRunner::new(tool);

    runner.initialize(Vec::<String>::new()).unwrap();
    let err = runner.start().unwrap_err();
    assert!(matches!(err, ToolError::Runtime(_)));
    assert!(err.to_string().contains("start exploded"));
    assert_eq!(runner.state(), LifecycleState::Failed);

    runner.finish();
    assert_eq!(runner.state(), LifecycleState::Failed);
    assert_eq!(events(&log), vec!["setup:1", "start:5", "finish"]);
}

#[test]
fn test_runtime_failure_exit_status() {
    let (tool, _) = RecordingTool::new(Behaviour {
        fail_start: true,
        ..Behaviour::default()
    });
    assert_eq!(ToolRunner::new(tool).run(Vec::<String>::new()).code(), 1);
}

#[test]
fn test_finish_errors_are_suppressed() {
    let (tool, log) = RecordingTool::new(Behaviour {
        fail_finish: true,
        ..Behaviour::default()
    });
    let mut runner = ToolRunner::new(tool);

    let status = runner.run(Vec::<String>::new());

    assert_eq!(status, ExitStatus::Success);
    assert_eq!(events(&log).last().map(String::as_str), Some("finish"));
}

#[test]
fn test_programmatic_set_before_and_after_initialize() {
    let (tool, _) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);

    runner.set("iterations", 11).unwrap();
    runner.set("label", "tagged").unwrap();
    assert!(matches!(
        runner.set("iterations", "eleven"),
        Err(ToolError::Trait(TraitError::TypeMismatch { .. }))
    ));

    runner.initialize(["--iterations", "3"]).unwrap();
    let context = runner.context().unwrap();
    assert_eq!(context.tool().get_i64("iterations"), Some(11));
    assert_eq!(context.tool().get_str("label"), Some("tagged"));
    assert_eq!(
        context.scope().store().precedence_of("MyTool", "iterations"),
        Some(Precedence::Programmatic)
    );

    runner.set("iterations", 12).unwrap();
    let context = runner.context().unwrap();
    assert_eq!(context.tool().get_i64("iterations"), Some(12));
    assert_eq!(
        context.current_config()["MyTool"]["iterations"],
        Value::Int(12)
    );
}

#[test]
fn test_instantiate_shares_class_configuration() {
    let (tool, _) = RecordingTool::new(Behaviour::default());
    let mut runner = ToolRunner::new(tool);
    runner.initialize(["--outfile", "shared.txt"]).unwrap();

    let context = runner.context_mut().unwrap();
    let class = Arc::clone(context.components()[0].class());
    let second = context.instantiate(class, "second").unwrap();
    assert_eq!(second.get_str("outfile"), Some("shared.txt"));
    assert_eq!(second.log_context(), "mytool.second");
    assert!(second.parent().is_some());

    assert_eq!(context.components().len(), 2);
    assert!(context.component("second").is_some());
    assert!(context.component("AdvancedComponent").is_some());
}
