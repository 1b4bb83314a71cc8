//! Input stream declarations.
use crate::ast::Formula;
use linked_hash_map::LinkedHashMap;
use std::rc::Rc;
use streamv_utils::{Error, Id, StreamvResult};

/// Type of a declared stream field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Str,
}

/// Shared handle to a [`StreamSchema`]. Schemas are immutable once built;
/// both the handle's identity and the schema name are valid lookup keys
/// for backend source resolution.
pub type SchemaRef = Rc<StreamSchema>;

/// A stream declaration: a name plus an ordered set of typed fields.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct StreamSchema {
    name: Id,
    fields: LinkedHashMap<Id, FieldType>,
}

impl StreamSchema {
    /// Build a schema, rejecting duplicate field names.
    pub fn new<S, I, F>(name: S, fields: I) -> StreamvResult<SchemaRef>
    where
        S: Into<Id>,
        I: IntoIterator<Item = (F, FieldType)>,
        F: Into<Id>,
    {
        let name = name.into();
        let mut map = LinkedHashMap::new();
        for (field, ty) in fields {
            let field = field.into();
            if map.insert(field.clone(), ty).is_some() {
                return Err(Error::construction(format!(
                    "field `{}` declared twice on stream `{}`",
                    field, name
                )));
            }
        }
        Ok(Rc::new(StreamSchema { name, fields: map }))
    }

    pub fn name(&self) -> &Id {
        &self.name
    }

    pub fn has_field<F: AsRef<str>>(&self, field: F) -> bool {
        self.fields.contains_key(field.as_ref())
    }

    pub fn field_type<F: AsRef<str>>(&self, field: F) -> Option<FieldType> {
        self.fields.get(field.as_ref()).copied()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&Id, FieldType)> {
        self.fields.iter().map(|(id, ty)| (id, *ty))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Cheaply clonable handle to a declared input stream. Mints field-access
/// formulas and rejects undeclared fields at build time.
#[derive(Debug, Clone)]
pub struct InputStream {
    schema: SchemaRef,
}

impl InputStream {
    pub fn new<S, I, F>(name: S, fields: I) -> StreamvResult<Self>
    where
        S: Into<Id>,
        I: IntoIterator<Item = (F, FieldType)>,
        F: Into<Id>,
    {
        Ok(InputStream {
            schema: StreamSchema::new(name, fields)?,
        })
    }

    pub fn from_schema(schema: SchemaRef) -> Self {
        InputStream { schema }
    }

    pub fn name(&self) -> &Id {
        self.schema.name()
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Reference a declared field of this stream.
    pub fn field<F: Into<Id>>(&self, field: F) -> StreamvResult<Formula> {
        let field = field.into();
        if !self.schema.has_field(&field) {
            return Err(Error::construction(format!(
                "stream `{}` has no field `{}`",
                self.schema.name(),
                field
            )));
        }
        Ok(Formula::FieldAccess {
            schema: Rc::clone(&self.schema),
            field,
        })
    }

    /// Wrap this stream with an item arrival-time field named `time`.
    /// Idempotent: a stream that already declares `time` is returned as-is.
    pub fn timestamped(&self) -> Self {
        if self.schema.has_field("time") {
            return self.clone();
        }
        let fields = self
            .schema
            .fields()
            .map(|(id, ty)| (id.clone(), ty))
            .chain(std::iter::once((Id::from("time"), FieldType::Float)));
        let schema = StreamSchema::new(self.schema.name().clone(), fields)
            .expect("wrapped schema preserves field uniqueness");
        InputStream { schema }
    }
}
