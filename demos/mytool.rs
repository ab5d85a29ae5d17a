//! Example tool with three configured components.
//!
//! ```text
//! cargo run --example mytool -- --help-all
//! cargo run --example mytool -- --iterations 3 --log-level INFO
//! cargo run --example mytool -- --config mytool.toml --AdvancedComponent.value1 4
//! ```

use anyhow::Result;
use ctk::prelude::*;
use std::process::ExitCode;

fn my_component() -> Result<ComponentClass> {
    Ok(ComponentClass::new("MyComponent")
        .with_description("a component that does stuff")
        .with_attribute(
            AttributeDescriptor::new("value", AttrType::Integer, 0).help("Value to use"),
        )?)
}

fn secondary_component() -> Result<ComponentClass> {
    Ok(ComponentClass::new("SecondaryMyComponent")
        .with_description("a second component sharing the MyComponent fields")
        .extend(&my_component()?)?)
}

fn advanced_component() -> Result<ComponentClass> {
    Ok(ComponentClass::new("AdvancedComponent")
        .with_description("an advanced component with an observer")
        .with_attribute(
            AttributeDescriptor::new("infile", AttrType::Text, "").help("input file name"),
        )?
        .with_attribute(
            AttributeDescriptor::new("outfile", AttrType::Text, "out.txt")
                .help("output file name"),
        )?
        .with_attribute(
            AttributeDescriptor::new("value1", AttrType::Integer, -1).help("Value 1"),
        )?
        .with_attribute(
            AttributeDescriptor::new("value2", AttrType::Integer, 0)
                .help("derived from value1")
                .configurable(false),
        )?)
}

fn tool_class() -> Result<ComponentClass> {
    Ok(ComponentClass::new("MyTool")
        .with_description("do some things and stuff")
        .with_attribute(
            AttributeDescriptor::new("iterations", AttrType::Integer, 5)
                .help("Number of times to run"),
        )?)
}

struct MyTool {
    class: Arc<ComponentClass>,
    classes: Vec<Arc<ComponentClass>>,
}

impl MyTool {
    fn new() -> Result<Self> {
        Ok(Self {
            class: Arc::new(tool_class()?),
            classes: vec![
                Arc::new(my_component()?),
                Arc::new(secondary_component()?),
                Arc::new(advanced_component()?),
            ],
        })
    }
}

impl Tool for MyTool {
    fn name(&self) -> &str {
        "mytool"
    }

    fn description(&self) -> &str {
        "do some things and stuff"
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    fn class(&self) -> Arc<ComponentClass> {
        Arc::clone(&self.class)
    }

    fn classes(&self) -> Vec<Arc<ComponentClass>> {
        self.classes.clone()
    }

    fn aliases(&self) -> AliasTable {
        AliasTable::new()
            .add("iterations", "MyTool.iterations")
            .add("infile", "AdvancedComponent.infile")
            .add("outfile", "AdvancedComponent.outfile")
    }

    fn setup(&mut self, ctx: &mut ToolContext) -> Result<()> {
        ctx.logger().info("Performing setup");

        let logger = ctx.logger().clone();
        let advanced = ctx
            .component_mut("AdvancedComponent")
            .ok_or_else(|| anyhow::anyhow!("AdvancedComponent was not constructed"))?;
        advanced.observe("outfile", move |change| {
            logger.warning(&format!(
                "{}: outfile changed from {} to {}",
                change.owner, change.old, change.new
            ));
            Ok(())
        })?;

        let value1 = advanced.get_i64("value1").unwrap_or_default();
        advanced.set("value2", value1 * 2)?;

        ctx.instantiate(Arc::clone(&self.classes[0]), "extra")?;
        Ok(())
    }

    fn start(&mut self, ctx: &mut ToolContext) -> Result<()> {
        ctx.logger().info("Performing start");

        let iterations = ctx.tool().get_i64("iterations").unwrap_or_default();
        for i in 0..iterations {
            ctx.logger().info(&format!("iteration {}", i));
        }

        if let Some(advanced) = ctx.component_mut("AdvancedComponent") {
            advanced.set("outfile", "Test.txt")?;
            println!(
                "value1={} value2={} outfile={}",
                advanced.get_i64("value1").unwrap_or_default(),
                advanced.get_i64("value2").unwrap_or_default(),
                advanced.get_str("outfile").unwrap_or_default(),
            );
        }
        Ok(())
    }

    fn finish(&mut self, ctx: &mut ToolContext) -> Result<()> {
        ctx.logger().info("Shutting down");
        for component in ctx.components() {
            ctx.logger().debug(&format!(
                "{}: {:?}",
                component.instance_name(),
                component.values()
            ));
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    let tool = match MyTool::new() {
        Ok(tool) => tool,
        Err(e) => {
            eprintln!("failed to declare components: {:#}", e);
            return ExitStatus::SetupError.into();
        }
    };
    ToolRunner::new(tool).run_from_env().into()
}
