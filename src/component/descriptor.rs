//! Attribute descriptors and per-class descriptor tables.

use super::error::{TraitError, TraitResult};
use super::value::{AttrType, Value};

/// A typed, named, validated field declared on a component class.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    name: String,
    ty: AttrType,
    default: Value,
    help: String,
    configurable: bool,
}

impl AttributeDescriptor {
    /// Create a configurable descriptor with empty help text.
    pub fn new(name: impl Into<String>, ty: AttrType, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            ty,
            default: default.into(),
            help: String::new(),
            configurable: true,
        }
    }

    /// Set the help text shown in usage output.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Mark whether the attribute may be set from config files and the CLI.
    pub fn configurable(mut self, configurable: bool) -> Self {
        self.configurable = configurable;
        self
    }

    /// Attribute name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn ty(&self) -> AttrType {
        self.ty
    }

    /// Default value
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Help text
    pub fn help_text(&self) -> &str {
        &self.help
    }

    /// Whether config files and the CLI may set this attribute
    pub fn is_configurable(&self) -> bool {
        self.configurable
    }

    /// Check `value` against the declared type.
    ///
    /// Returns the coerced value (numeric text becomes a number, boolean
    /// tokens become booleans) or [`TraitError::TypeMismatch`].
    pub fn validate(&self, value: &Value) -> TraitResult<Value> {
        self.ty
            .coerce(value)
            .ok_or_else(|| TraitError::TypeMismatch {
                attribute: self.name.clone(),
                expected: self.ty,
                given: value.clone(),
            })
    }
}

/// A reusable component definition: a class name plus its descriptor table.
///
/// Specialization is done by composition: [`ComponentClass::extend`] copies
/// the field set of another class into this one.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentClass {
    name: String,
    description: String,
    attributes: Vec<AttributeDescriptor>,
}

impl ComponentClass {
    /// Create an empty class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Set the one-line description used in `--help-all`.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Register a descriptor on this class.
    ///
    /// Fails with [`TraitError::DuplicateAttribute`] if the name is taken and
    /// with [`TraitError::TypeMismatch`] if the default does not satisfy the
    /// declared type.
    pub fn declare(&mut self, descriptor: AttributeDescriptor) -> TraitResult<()> {
        if self.attribute(descriptor.name()).is_some() {
            return Err(TraitError::DuplicateAttribute {
                class: self.name.clone(),
                attribute: descriptor.name,
            });
        }
        let default = descriptor.validate(&descriptor.default)?;
        self.attributes.push(AttributeDescriptor {
            default,
            ..descriptor
        });
        Ok(())
    }

    /// Builder form of [`ComponentClass::declare`].
    pub fn with_attribute(mut self, descriptor: AttributeDescriptor) -> TraitResult<Self> {
        self.declare(descriptor)?;
        Ok(self)
    }

    /// Copy every descriptor of `base` into this class.
    pub fn extend(mut self, base: &ComponentClass) -> TraitResult<Self> {
        for descriptor in &base.attributes {
            self.declare(descriptor.clone())?;
        }
        Ok(self)
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Descriptors in declaration order
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Look up a descriptor by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|d| d.name == name)
    }

    /// Descriptors that config files and the CLI may set
    pub fn configurable_attributes(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.iter().filter(|d| d.configurable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_rejects_duplicates() {
        let mut class = ComponentClass::new("Cleaner");
        class
            .declare(AttributeDescriptor::new("threshold", AttrType::Float, 5.0))
            .unwrap();

        let err = class
            .declare(AttributeDescriptor::new("threshold", AttrType::Integer, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            TraitError::DuplicateAttribute { ref class, ref attribute }
                if class == "Cleaner" && attribute == "threshold"
        ));
        assert_eq!(class.attributes().len(), 1);
    }

    #[test]
    fn test_declare_validates_default() {
        let mut class = ComponentClass::new("Cleaner");
        let err = class
            .declare(AttributeDescriptor::new("neighbors", AttrType::Integer, "two"))
            .unwrap_err();
        assert!(matches!(err, TraitError::TypeMismatch { .. }));

        class
            .declare(AttributeDescriptor::new("scale", AttrType::Float, 2))
            .unwrap();
        assert_eq!(
            class.attribute("scale").unwrap().default_value(),
            &Value::Float(2.0)
        );
    }

    #[test]
    fn test_validate_reports_expected_type() {
        let descriptor = AttributeDescriptor::new("iterations", AttrType::Integer, 5);
        assert_eq!(descriptor.validate(&"7".into()).unwrap(), Value::Int(7));

        match descriptor.validate(&Value::Float(1.5)) {
            Err(TraitError::TypeMismatch {
                attribute,
                expected,
                given,
            }) => {
                assert_eq!(attribute, "iterations");
                assert_eq!(expected, AttrType::Integer);
                assert_eq!(given, Value::Float(1.5));
            }
            other => panic!("Expected type mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_extend_shares_field_set() {
        let base = ComponentClass::new("MyComponent")
            .with_attribute(AttributeDescriptor::new("value", AttrType::Integer, -1))
            .unwrap();
        let secondary = ComponentClass::new("SecondaryMyComponent")
            .extend(&base)
            .unwrap()
            .with_attribute(
                AttributeDescriptor::new("label", AttrType::Text, "secondary").configurable(false),
            )
            .unwrap();

        assert_eq!(secondary.attributes().len(), 2);
        assert_eq!(secondary.configurable_attributes().count(), 1);
        assert!(ComponentClass::new("Again")
            .extend(&secondary)
            .unwrap()
            .extend(&base)
            .is_err());
    }
}
