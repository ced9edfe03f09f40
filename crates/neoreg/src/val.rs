//! Dynamic values carried in and out of registered methods.

use crate::types::Type;

/// A dynamically typed value.
///
/// There is no reference variant: a value written into a `Ref(T)` slot is
/// simply a `T`.
#[derive(Clone, Debug, PartialEq)]
pub enum Val {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    Float32(f32),
    Float64(f64),
    Char(char),
    String(String),
    List(Vec<Val>),
    Map(Vec<(Val, Val)>),
    Option(Option<Box<Val>>),
    Record(Vec<(String, Val)>),
    /// An error indicator value; `None` is the nil error.
    Error(Option<String>),
}

impl Val {
    /// Short name of the value's shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Val::Bool(_) => "bool",
            Val::U8(_) => "u8",
            Val::U16(_) => "u16",
            Val::U32(_) => "u32",
            Val::U64(_) => "u64",
            Val::S8(_) => "s8",
            Val::S16(_) => "s16",
            Val::S32(_) => "s32",
            Val::S64(_) => "s64",
            Val::Float32(_) => "f32",
            Val::Float64(_) => "f64",
            Val::Char(_) => "char",
            Val::String(_) => "string",
            Val::List(_) => "list",
            Val::Map(_) => "map",
            Val::Option(_) => "option",
            Val::Record(_) => "record",
            Val::Error(_) => "error",
        }
    }

    /// Checks structurally that this value inhabits `ty`.
    ///
    /// Records must carry exactly the declared fields, in declaration order.
    pub fn conforms_to(&self, ty: &Type) -> bool {
        match (self, ty) {
            (val, Type::Ref(inner)) => val.conforms_to(inner),

            (Val::Bool(_), Type::Bool)
            | (Val::U8(_), Type::U8)
            | (Val::U16(_), Type::U16)
            | (Val::U32(_), Type::U32)
            | (Val::U64(_), Type::U64)
            | (Val::S8(_), Type::S8)
            | (Val::S16(_), Type::S16)
            | (Val::S32(_), Type::S32)
            | (Val::S64(_), Type::S64)
            | (Val::Float32(_), Type::Float32)
            | (Val::Float64(_), Type::Float64)
            | (Val::Char(_), Type::Char)
            | (Val::String(_), Type::String)
            | (Val::Error(_), Type::Error) => true,

            (Val::List(items), Type::List(inner)) => items.iter().all(|v| v.conforms_to(inner)),
            (Val::Map(entries), Type::Map(k, v)) => entries
                .iter()
                .all(|(key, value)| key.conforms_to(k) && value.conforms_to(v)),
            (Val::Option(None), Type::Option(_)) => true,
            (Val::Option(Some(v)), Type::Option(inner)) => v.conforms_to(inner),
            (Val::Record(fields), Type::Record(record)) => {
                fields.len() == record.fields().len()
                    && fields
                        .iter()
                        .zip(record.fields())
                        .all(|((name, val), (expected, ty))| name == expected && val.conforms_to(ty))
            }

            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Val::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Widens any signed integer to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Val::S8(v) => Some(i64::from(*v)),
            Val::S16(v) => Some(i64::from(*v)),
            Val::S32(v) => Some(i64::from(*v)),
            Val::S64(v) => Some(*v),
            _ => None,
        }
    }

    /// Widens any unsigned integer to `u64`.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Val::U8(v) => Some(u64::from(*v)),
            Val::U16(v) => Some(u64::from(*v)),
            Val::U32(v) => Some(u64::from(*v)),
            Val::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Val::Float32(v) => Some(f64::from(*v)),
            Val::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Val::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Val]> {
        match self {
            Val::List(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a record field by name.
    pub fn field(&self, name: &str) -> Option<&Val> {
        match self {
            Val::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Mutable access to a record field, for codecs filling in a holder.
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Val> {
        match self {
            Val::Record(fields) => fields.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<bool> for Val {
    fn from(v: bool) -> Self { Val::Bool(v) }
}

impl From<i32> for Val {
    fn from(v: i32) -> Self { Val::S32(v) }
}

impl From<i64> for Val {
    fn from(v: i64) -> Self { Val::S64(v) }
}

impl From<u32> for Val {
    fn from(v: u32) -> Self { Val::U32(v) }
}

impl From<u64> for Val {
    fn from(v: u64) -> Self { Val::U64(v) }
}

impl From<f64> for Val {
    fn from(v: f64) -> Self { Val::Float64(v) }
}

impl From<&str> for Val {
    fn from(v: &str) -> Self { Val::String(v.to_string()) }
}

impl From<String> for Val {
    fn from(v: String) -> Self { Val::String(v) }
}
