//! Declarative schema descriptions for structured model output.
//!
//! A [`Schema`] is an ordered list of named fields, each with a
//! [`FieldKind`] describing the expected shape. The same description is
//! used twice: rendered into a machine-readable manifest that instructs
//! the model, and walked by the validator against raw output.

use serde_json::{json, Map, Value};

/// Expected shape of a single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Whole number, optionally bounded on either side.
    Integer {
        /// Inclusive lower bound.
        min: Option<i64>,
        /// Inclusive upper bound.
        max: Option<i64>,
    },
    /// Any JSON number.
    Float,
    /// Boolean.
    Bool,
    /// String, optionally constrained.
    Text {
        /// Minimum length in characters.
        min_len: Option<usize>,
        /// Reject values containing lowercase characters.
        require_uppercase: bool,
    },
    /// One of a fixed set of string literals.
    Choice(Vec<String>),
    /// Nested object with its own schema.
    Object(Schema),
    /// Homogeneous array of the given element kind.
    List(Box<FieldKind>),
    /// Absent or `null` is accepted; otherwise the inner kind applies.
    Optional(Box<FieldKind>),
}

impl FieldKind {
    /// Unconstrained integer.
    #[must_use]
    pub const fn integer() -> Self {
        Self::Integer {
            min: None,
            max: None,
        }
    }

    /// Unconstrained string.
    #[must_use]
    pub const fn text() -> Self {
        Self::Text {
            min_len: None,
            require_uppercase: false,
        }
    }

    /// String literal choice set.
    #[must_use]
    pub fn choice<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Choice(options.into_iter().map(Into::into).collect())
    }

    /// List of the given element kind.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Optional wrapper around the given kind.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Optional(Box::new(inner))
    }

    fn manifest(&self) -> Value {
        match self {
            Self::Integer { min, max } => {
                let mut out = Map::new();
                out.insert("type".to_string(), json!("integer"));
                if let Some(min) = min {
                    out.insert("minimum".to_string(), json!(min));
                }
                if let Some(max) = max {
                    out.insert("maximum".to_string(), json!(max));
                }
                Value::Object(out)
            }
            Self::Float => json!({ "type": "number" }),
            Self::Bool => json!({ "type": "boolean" }),
            Self::Text {
                min_len,
                require_uppercase,
            } => {
                let mut out = Map::new();
                out.insert("type".to_string(), json!("string"));
                if let Some(min_len) = min_len {
                    out.insert("minLength".to_string(), json!(min_len));
                }
                if *require_uppercase {
                    // No lowercase letters anywhere in the value.
                    out.insert("pattern".to_string(), json!("^[^a-z]*$"));
                }
                Value::Object(out)
            }
            Self::Choice(options) => json!({ "type": "string", "enum": options }),
            Self::Object(schema) => schema.describe(),
            Self::List(element) => json!({ "type": "array", "items": element.manifest() }),
            Self::Optional(inner) => inner.manifest(),
        }
    }
}

/// A named field within a [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name as it must appear in the output object.
    pub name: String,
    /// Expected shape of the value.
    pub kind: FieldKind,
    /// Optional human-readable hint passed through to the manifest.
    pub description: Option<String>,
}

/// Ordered, immutable description of an expected output object.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Returns a builder for assembling a schema field by field.
    #[must_use]
    pub const fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Declared fields, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Renders the schema into a machine-readable manifest.
    ///
    /// The manifest uses the familiar `type`/`properties`/`required`/`enum`
    /// vocabulary so backends that accept a structured shape description
    /// can consume it directly, and text-only backends can be shown the
    /// serialized form.
    #[must_use]
    pub fn describe(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            let mut manifest = field.kind.manifest();
            if let (Some(text), Some(obj)) = (&field.description, manifest.as_object_mut()) {
                obj.insert("description".to_string(), json!(text));
            }
            if !matches!(field.kind, FieldKind::Optional(_)) {
                required.push(field.name.clone());
            }
            properties.insert(field.name.clone(), manifest);
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Fluent builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Appends a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
            description: None,
        });
        self
    }

    /// Appends a field with a description hint for the model.
    #[must_use]
    pub fn described_field(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        description: impl Into<String>,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            kind,
            description: Some(description.into()),
        });
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}
