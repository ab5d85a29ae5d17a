//! Component instances: current attribute values plus change observers.

use super::descriptor::{AttributeDescriptor, ComponentClass};
use super::error::{TraitError, TraitResult};
use super::scope::ToolScope;
use super::value::Value;
use crate::observability::Logger;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Change record passed to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// Instance name of the component that changed
    pub owner: String,
    /// Attribute that changed
    pub attribute: String,
    /// Value before the assignment
    pub old: Value,
    /// Value after the assignment
    pub new: Value,
}

/// Callback invoked after an attribute is assigned.
pub type Observer = Box<dyn FnMut(&Change) -> anyhow::Result<()>>;

/// A named, independently-configurable unit.
pub struct Component {
    class: Arc<ComponentClass>,
    instance_name: String,
    values: BTreeMap<String, Value>,
    observers: BTreeMap<String, Vec<Observer>>,
    parent: Option<Weak<ToolScope>>,
    logger: Logger,
}

impl Component {
    /// Standalone component holding the declared defaults.
    pub fn new(class: Arc<ComponentClass>) -> Self {
        let instance_name = class.name().to_string();
        let values = class
            .attributes()
            .iter()
            .map(|d| (d.name().to_string(), d.default_value().clone()))
            .collect();
        Self {
            logger: Logger::default().named(instance_name.clone()),
            class,
            instance_name,
            values,
            observers: BTreeMap::new(),
            parent: None,
        }
    }

    /// Standalone component configured from an explicit section.
    pub fn from_config(
        class: Arc<ComponentClass>,
        section: &BTreeMap<String, Value>,
    ) -> TraitResult<Self> {
        let mut component = Self::new(class);
        component.apply_section(section)?;
        Ok(component)
    }

    /// Component owned by a tool, configured from the tool's merged store.
    pub fn configured(
        class: Arc<ComponentClass>,
        instance_name: impl Into<String>,
        scope: &Rc<ToolScope>,
    ) -> TraitResult<Self> {
        let section = scope.store().section_for(class.name());
        let mut component = Self::new(class).with_instance_name(instance_name);
        component.logger = scope
            .logger()
            .named(format!("{}.{}", scope.name(), component.instance_name));
        component.parent = Some(Rc::downgrade(scope));
        component.apply_section(&section)?;
        Ok(component)
    }

    /// Rename this instance.
    pub fn with_instance_name(mut self, instance_name: impl Into<String>) -> Self {
        self.instance_name = instance_name.into();
        if self.parent.is_none() {
            self.logger = self.logger.named(self.instance_name.clone());
        }
        self
    }

    fn apply_section(&mut self, section: &BTreeMap<String, Value>) -> TraitResult<()> {
        for (name, raw) in section {
            let value = self.descriptor(name)?.validate(raw)?;
            self.values.insert(name.clone(), value);
        }
        Ok(())
    }

    fn descriptor(&self, name: &str) -> TraitResult<&AttributeDescriptor> {
        self.class
            .attribute(name)
            .ok_or_else(|| TraitError::UnknownAttribute {
                class: self.class.name().to_string(),
                attribute: name.to_string(),
            })
    }

    /// Register an observer for `attribute`.
    ///
    /// Observers fire in registration order; registering the same callback
    /// twice makes it fire twice.
    pub fn observe<F>(&mut self, attribute: &str, callback: F) -> TraitResult<()>
    where
        F: FnMut(&Change) -> anyhow::Result<()> + 'static,
    {
        self.descriptor(attribute)?;
        self.observers
            .entry(attribute.to_string())
            .or_default()
            .push(Box::new(callback));
        Ok(())
    }

    /// Validate and assign an attribute, then notify its observers.
    ///
    /// The value is committed before observers run. If an observer fails the
    /// remaining observers are skipped and the error is returned, but the new
    /// value stays in place.
    pub fn set(&mut self, attribute: &str, value: impl Into<Value>) -> TraitResult<()> {
        let class = Arc::clone(&self.class);
        let descriptor = class
            .attribute(attribute)
            .ok_or_else(|| TraitError::UnknownAttribute {
                class: class.name().to_string(),
                attribute: attribute.to_string(),
            })?;
        let new = descriptor.validate(&value.into())?;

        let old = self
            .values
            .insert(attribute.to_string(), new.clone())
            .unwrap_or_else(|| descriptor.default_value().clone());

        if descriptor.is_configurable() {
            if let Some(scope) = self.parent() {
                scope.record(class.name(), attribute, &new);
            }
        }

        self.logger.debug(&format!(
            "{} changed from {} to {}",
            attribute, old, new
        ));

        let change = Change {
            owner: self.instance_name.clone(),
            attribute: attribute.to_string(),
            old,
            new,
        };

        if let Some(observers) = self.observers.get_mut(attribute) {
            for observer in observers.iter_mut() {
                observer(&change).map_err(|source| TraitError::Observer {
                    attribute: attribute.to_string(),
                    source,
                })?;
            }
        }

        Ok(())
    }

    /// Current value of an attribute.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    /// Get integer attribute value.
    pub fn get_i64(&self, attribute: &str) -> Option<i64> {
        self.get(attribute).and_then(Value::as_i64)
    }

    /// Get float attribute value.
    pub fn get_f64(&self, attribute: &str) -> Option<f64> {
        self.get(attribute).and_then(Value::as_f64)
    }

    /// Get boolean attribute value.
    pub fn get_bool(&self, attribute: &str) -> Option<bool> {
        self.get(attribute).and_then(Value::as_bool)
    }

    /// Get text attribute value.
    pub fn get_str(&self, attribute: &str) -> Option<&str> {
        self.get(attribute).and_then(Value::as_str)
    }

    /// All current values
    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// Class definition
    pub fn class(&self) -> &Arc<ComponentClass> {
        &self.class
    }

    /// Class name
    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    /// Instance name (defaults to the class name)
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    /// Identifier used in diagnostic output
    pub fn log_context(&self) -> &str {
        self.logger.name()
    }

    /// Logger scoped to this component
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Owning tool scope, if it is still alive
    pub fn parent(&self) -> Option<Rc<ToolScope>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("class", &self.class.name())
            .field("instance_name", &self.instance_name)
            .field("values", &self.values)
            .field(
                "observers",
                &self
                    .observers
                    .iter()
                    .map(|(name, list)| (name.as_str(), list.len()))
                    .collect::<BTreeMap<_, _>>(),
            )
            .field("log_context", &self.log_context())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::AttrType;
    use crate::config::{ConfigStore, Precedence};
    use std::cell::RefCell;

    fn advanced_class() -> Arc<ComponentClass> {
        Arc::new(
            ComponentClass::new("AdvancedComponent")
                .with_attribute(AttributeDescriptor::new("value1", AttrType::Integer, -1))
                .unwrap()
                .with_attribute(AttributeDescriptor::new("outfile", AttrType::Text, "out.txt"))
                .unwrap()
                .with_attribute(
                    AttributeDescriptor::new("value2", AttrType::Integer, 0).configurable(false),
                )
                .unwrap(),
        )
    }

    #[test]
    fn test_defaults_and_typed_getters() {
        let component = Component::new(advanced_class());
        assert_eq!(component.instance_name(), "AdvancedComponent");
        assert_eq!(component.get_i64("value1"), Some(-1));
        assert_eq!(component.get_str("outfile"), Some("out.txt"));
        assert!(component.parent().is_none());
    }

    #[test]
    fn test_type_mismatch_leaves_value_unchanged() {
        let mut component = Component::new(advanced_class());
        component.set("value1", 4).unwrap();

        let err = component.set("value1", "four").unwrap_err();
        assert!(matches!(err, TraitError::TypeMismatch { .. }));
        assert_eq!(component.get_i64("value1"), Some(4));

        let err = component.set("missing", 1).unwrap_err();
        assert!(matches!(err, TraitError::UnknownAttribute { .. }));
    }

    #[test]
    fn test_observers_fire_in_order_with_change_record() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut component = Component::new(advanced_class());

        for tag in ["first", "second"] {
            let seen = Rc::clone(&seen);
            component
                .observe("value1", move |change| {
                    seen.borrow_mut()
                        .push((tag, change.old.clone(), change.new.clone()));
                    Ok(())
                })
                .unwrap();
        }

        component.set("value1", "7").unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                ("first", Value::Int(-1), Value::Int(7)),
                ("second", Value::Int(-1), Value::Int(7)),
            ]
        );

        component.set("outfile", "other.txt").unwrap();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_observer_error_aborts_chain_but_keeps_value() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut component = Component::new(advanced_class());

        let first = Rc::clone(&calls);
        component
            .observe("value1", move |_| {
                first.borrow_mut().push("first");
                anyhow::bail!("refusing change")
            })
            .unwrap();
        let second = Rc::clone(&calls);
        component
            .observe("value1", move |_| {
                second.borrow_mut().push("second");
                Ok(())
            })
            .unwrap();

        let err = component.set("value1", 9).unwrap_err();
        assert!(matches!(err, TraitError::Observer { ref attribute, .. } if attribute == "value1"));
        assert_eq!(*calls.borrow(), vec!["first"]);
        assert_eq!(component.get_i64("value1"), Some(9));
    }

    #[test]
    fn test_observe_unknown_attribute() {
        let mut component = Component::new(advanced_class());
        assert!(component.observe("nope", |_| Ok(())).is_err());
    }

    #[test]
    fn test_from_config_validates_section() {
        let mut section = BTreeMap::new();
        section.insert("value1".to_string(), Value::from("12"));
        let component = Component::from_config(advanced_class(), &section).unwrap();
        assert_eq!(component.get_i64("value1"), Some(12));

        section.insert("value1".to_string(), Value::from("twelve"));
        assert!(Component::from_config(advanced_class(), &section).is_err());
    }

    #[test]
    fn test_configured_writes_through_to_scope() {
        let class = advanced_class();
        let store = ConfigStore::from_defaults(&[Arc::clone(&class)]);
        let scope = Rc::new(ToolScope::new("MyTool", Logger::default(), store));

        let mut component = Component::configured(class, "adv", &scope).unwrap();
        assert_eq!(component.log_context(), "MyTool.adv");
        assert!(component.parent().is_some());

        component.set("value1", 3).unwrap();
        component.set("value2", 8).unwrap();

        let store = scope.store();
        assert_eq!(store.get("AdvancedComponent", "value1"), Some(&Value::Int(3)));
        assert_eq!(
            store.precedence_of("AdvancedComponent", "value1"),
            Some(Precedence::Programmatic)
        );
        assert!(store.get("AdvancedComponent", "value2").is_none());
    }

    #[test]
    fn test_parent_link_is_weak() {
        let class = advanced_class();
        let scope = Rc::new(ToolScope::new(
            "MyTool",
            Logger::default(),
            ConfigStore::from_defaults(&[Arc::clone(&class)]),
        ));
        let mut component = Component::configured(class, "adv", &scope).unwrap();

        drop(scope);
        assert!(component.parent().is_none());
        component.set("value1", 1).unwrap();
    }
}
