//! # Semantic Types
//!
//! The closed set of type descriptors a method signature is expressed in.
//!
//! Registration never looks at Rust types directly. Every parameter and result
//! of a declared method is described with a [`Type`], and every shape rule
//! (by-reference aggregates, exported result types) is a check against
//! [`Type::class`].

use std::fmt;

use crate::naming::is_exported;
use crate::val::Val;

/// A named aggregate: a record type with ordered fields.
///
/// The name carries the exported/unexported distinction used when the record
/// appears as a method result.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordType {
    name: String,
    fields: Vec<(String, Type)>,
}

impl RecordType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field. Field order is the order of declaration.
    pub fn field(mut self, name: impl Into<String>, ty: Type) -> Self {
        self.fields.push((name.into(), ty));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[(String, Type)] {
        &self.fields
    }

    /// Looks up the type of a field by name.
    pub fn field_type(&self, name: &str) -> Option<&Type> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, ty)| ty)
    }
}

/// Semantic type descriptor for a parameter or result slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Type {
    Bool,
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    Float32,
    Float64,
    Char,
    String,
    /// Homogeneous sequence.
    List(Box<Type>),
    /// Key/value association. Entries keep insertion order.
    Map(Box<Type>, Box<Type>),
    Option(Box<Type>),
    /// A reference to a value of the inner type. Values are transparent:
    /// a `Ref(T)` slot holds a `T`.
    Ref(Box<Type>),
    /// A named aggregate passed by value.
    Record(RecordType),
    /// The error indicator. Only meaningful as the last result of a method.
    Error,
}

/// Closed classification of a [`Type`] for signature validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeClass {
    /// Scalars, strings and the error indicator.
    Primitive,
    /// A reference to a non-aggregate.
    Reference,
    /// A reference to a record.
    AggregateByReference,
    /// A record passed by value. Never accepted as a call argument.
    AggregateByValue,
    /// Lists, maps and options.
    Container,
}

impl Type {
    pub fn list(inner: Type) -> Self {
        Type::List(Box::new(inner))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn option(inner: Type) -> Self {
        Type::Option(Box::new(inner))
    }

    pub fn reference(inner: Type) -> Self {
        Type::Ref(Box::new(inner))
    }

    pub fn class(&self) -> TypeClass {
        match self {
            Type::Bool
            | Type::U8 | Type::U16 | Type::U32 | Type::U64
            | Type::S8 | Type::S16 | Type::S32 | Type::S64
            | Type::Float32 | Type::Float64
            | Type::Char | Type::String
            | Type::Error => TypeClass::Primitive,

            Type::List(_) | Type::Map(..) | Type::Option(_) => TypeClass::Container,

            Type::Ref(inner) => match &**inner {
                Type::Record(_) => TypeClass::AggregateByReference,
                _ => TypeClass::Reference,
            },

            Type::Record(_) => TypeClass::AggregateByValue,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// True if the type, with one level of reference removed, is either a
    /// builtin or a record with an exported name.
    ///
    /// Only records carry a name, so every other type counts as builtin.
    pub fn is_exported_or_builtin(&self) -> bool {
        let target = match self {
            Type::Ref(inner) => &**inner,
            other => other,
        };
        match target {
            Type::Record(record) => is_exported(record.name()),
            _ => true,
        }
    }

    /// Produces the zero value for this type.
    ///
    /// References are transparent, so the zero value of `Ref(T)` is the zero
    /// value of `T`. Records are zeroed field by field.
    pub fn zero(&self) -> Val {
        match self {
            Type::Bool => Val::Bool(false),
            Type::U8 => Val::U8(0),
            Type::U16 => Val::U16(0),
            Type::U32 => Val::U32(0),
            Type::U64 => Val::U64(0),
            Type::S8 => Val::S8(0),
            Type::S16 => Val::S16(0),
            Type::S32 => Val::S32(0),
            Type::S64 => Val::S64(0),
            Type::Float32 => Val::Float32(0.0),
            Type::Float64 => Val::Float64(0.0),
            Type::Char => Val::Char('\0'),
            Type::String => Val::String(String::new()),
            Type::List(_) => Val::List(Vec::new()),
            Type::Map(..) => Val::Map(Vec::new()),
            Type::Option(_) => Val::Option(None),
            Type::Ref(inner) => inner.zero(),
            Type::Record(record) => Val::Record(
                record
                    .fields()
                    .iter()
                    .map(|(name, ty)| (name.clone(), ty.zero()))
                    .collect(),
            ),
            Type::Error => Val::Error(None),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => write!(f, "bool"),
            Type::U8 => write!(f, "u8"),
            Type::U16 => write!(f, "u16"),
            Type::U32 => write!(f, "u32"),
            Type::U64 => write!(f, "u64"),
            Type::S8 => write!(f, "s8"),
            Type::S16 => write!(f, "s16"),
            Type::S32 => write!(f, "s32"),
            Type::S64 => write!(f, "s64"),
            Type::Float32 => write!(f, "f32"),
            Type::Float64 => write!(f, "f64"),
            Type::Char => write!(f, "char"),
            Type::String => write!(f, "string"),
            Type::List(inner) => write!(f, "list<{}>", inner),
            Type::Map(k, v) => write!(f, "map<{}, {}>", k, v),
            Type::Option(inner) => write!(f, "option<{}>", inner),
            Type::Ref(inner) => write!(f, "*{}", inner),
            Type::Record(record) => write!(f, "{}", record.name()),
            Type::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> RecordType {
        RecordType::new("Point")
            .field("x", Type::S64)
            .field("y", Type::S64)
    }

    #[test]
    fn test_classification_is_closed() {
        assert_eq!(Type::S32.class(), TypeClass::Primitive);
        assert_eq!(Type::Error.class(), TypeClass::Primitive);
        assert_eq!(Type::reference(Type::String).class(), TypeClass::Reference);
        assert_eq!(Type::reference(Type::Record(point())).class(), TypeClass::AggregateByReference);
        assert_eq!(Type::Record(point()).class(), TypeClass::AggregateByValue);
        assert_eq!(Type::list(Type::Record(point())).class(), TypeClass::Container);
        assert_eq!(Type::option(Type::U8).class(), TypeClass::Container);
    }

    #[test]
    fn test_exported_or_builtin_unwraps_one_reference() {
        let hidden = Type::Record(RecordType::new("point"));
        assert!(!hidden.is_exported_or_builtin());
        assert!(!Type::reference(hidden.clone()).is_exported_or_builtin());
        assert!(Type::Record(point()).is_exported_or_builtin());
        assert!(Type::reference(Type::Record(point())).is_exported_or_builtin());
        // Unnamed containers count as builtin, even over unexported records.
        assert!(Type::list(hidden).is_exported_or_builtin());
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Type::S64.zero(), Val::S64(0));
        assert_eq!(Type::reference(Type::String).zero(), Val::String(String::new()));
        assert_eq!(
            Type::reference(Type::Record(point())).zero(),
            Val::Record(vec![("x".into(), Val::S64(0)), ("y".into(), Val::S64(0))])
        );
        assert_eq!(Type::option(Type::Bool).zero(), Val::Option(None));
    }

    #[test]
    fn test_display() {
        let ty = Type::map(Type::String, Type::reference(Type::Record(point())));
        assert_eq!(ty.to_string(), "map<string, *Point>");
    }
}
