//! # Method Descriptors
//!
//! A [`MethodDescriptor`] holds exactly what is needed to marshal a call into
//! one registered method and a result back out: the bound handle, the ordered
//! parameter types, and the optional result type.

use std::fmt;
use std::sync::Arc;

use crate::error::CallError;
use crate::error::MethodError;
use crate::types::Type;
use crate::val::Val;

/// An invocable bound to its receiver.
///
/// `Ok(Some(v))` is a result value, `Ok(None)` is the bare success of an
/// error-only method, `Err(e)` is the method's error output.
pub type Handle = Arc<dyn Fn(&[Val]) -> std::result::Result<Option<Val>, MethodError> + Send + Sync>;

pub type Result<T> = std::result::Result<T, CallError>;

/// Immutable description of one callable method.
pub struct MethodDescriptor {
    name: String,
    handle: Handle,
    param_types: Arc<[Type]>,
    return_type: Option<Type>,
}

impl MethodDescriptor {
    pub(crate) fn new(name: String, handle: Handle, param_types: Vec<Type>, return_type: Option<Type>) -> Self {
        Self {
            name,
            handle,
            param_types: param_types.into(),
            return_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter types in call order, excluding the receiver.
    pub fn param_types(&self) -> &[Type] {
        &self.param_types
    }

    /// The non-error result type, absent for error-only methods.
    pub fn return_type(&self) -> Option<&Type> {
        self.return_type.as_ref()
    }

    /// Allocates one zero-valued holder per parameter.
    ///
    /// The returned [`Arguments`] owns the holders; [`Arguments::slots`] hands
    /// out the typed mutable references a codec writes into.
    pub fn allocate_arguments(&self) -> Arguments {
        Arguments {
            values: self.param_types.iter().map(Type::zero).collect(),
            types: Arc::clone(&self.param_types),
        }
    }

    /// Invokes the method with a fully populated argument list.
    ///
    /// Arity and per-argument types are checked before the handle runs, and
    /// the handle's output is checked against the declared result.
    pub fn invoke(&self, args: &[Val]) -> Result<Option<Val>> {
        if args.len() != self.param_types.len() {
            return Err(CallError::ArgumentCount {
                expected: self.param_types.len(),
                found: args.len(),
            });
        }

        for (index, (arg, ty)) in args.iter().zip(self.param_types.iter()).enumerate() {
            if !arg.conforms_to(ty) {
                return Err(CallError::ArgumentType {
                    index,
                    expected: ty.to_string(),
                    found: arg.kind(),
                });
            }
        }

        let output = (self.handle)(args)?;

        match (&self.return_type, output) {
            (None, None) => Ok(None),
            (None, Some(val)) => Err(CallError::ResultShape(format!(
                "{} declares no result but returned {}",
                self.name,
                val.kind()
            ))),
            (Some(ty), None) => Err(CallError::ResultShape(format!(
                "{} declares result {} but returned nothing",
                self.name, ty
            ))),
            (Some(ty), Some(val)) if val.conforms_to(ty) => Ok(Some(val)),
            (Some(ty), Some(val)) => Err(CallError::ResultShape(format!(
                "{} declares result {} but returned {}",
                self.name,
                ty,
                val.kind()
            ))),
        }
    }

    /// Invokes the method with holders obtained from [`allocate_arguments`](Self::allocate_arguments).
    pub fn invoke_with(&self, args: &Arguments) -> Result<Option<Val>> {
        self.invoke(args.values())
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("param_types", &self.param_types)
            .field("return_type", &self.return_type)
            .finish_non_exhaustive()
    }
}

/// Freshly allocated argument holders for one call.
#[derive(Clone, Debug)]
pub struct Arguments {
    types: Arc<[Type]>,
    values: Vec<Val>,
}

impl Arguments {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// The holders, in call order.
    pub fn values(&self) -> &[Val] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Val> {
        self.values
    }

    /// One writable slot per holder, parallel to [`values`](Self::values).
    pub fn slots(&mut self) -> Vec<Slot<'_>> {
        self.types
            .iter()
            .zip(self.values.iter_mut())
            .enumerate()
            .map(|(index, (ty, val))| Slot { index, ty, val })
            .collect()
    }

    /// Replaces the holder at `index`, checking the value against its type.
    pub fn set(&mut self, index: usize, val: Val) -> Result<()> {
        let len = self.values.len();
        match self.slots().into_iter().nth(index) {
            Some(mut slot) => slot.write(val),
            None => Err(CallError::NoSuchArgument { index, len }),
        }
    }
}

/// A typed, mutable view of one argument holder.
#[derive(Debug)]
pub struct Slot<'a> {
    index: usize,
    ty: &'a Type,
    val: &'a mut Val,
}

impl Slot<'_> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn ty(&self) -> &Type {
        self.ty
    }

    pub fn get(&self) -> &Val {
        &*self.val
    }

    /// Direct access to the holder. Conformance is re-checked at invocation.
    pub fn value_mut(&mut self) -> &mut Val {
        &mut *self.val
    }

    pub fn write(&mut self, val: Val) -> Result<()> {
        if !val.conforms_to(self.ty) {
            return Err(CallError::ArgumentType {
                index: self.index,
                expected: self.ty.to_string(),
                found: val.kind(),
            });
        }
        *self.val = val;
        Ok(())
    }
}
