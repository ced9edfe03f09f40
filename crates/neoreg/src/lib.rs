//! # NeoReg
//!
//! A registry of services whose methods are addressed by dotted name.
//!
//! ## Architecture
//!
//! A receiver implements [`Receiver`] to declare its methods as
//! [`Signature`]s paired with handler closures. [`Registry::register`] keeps the
//! methods that fit the calling contract, validates them once, and stores the
//! result as a [`ServiceDescriptor`]. A hosting RPC layer then resolves
//! `Service.Method` to a [`MethodDescriptor`], asks it for zero-valued argument
//! holders, lets its codec fill them in, and invokes the method.
//!
//! ## Calling contract
//!
//! - Service and method names are exported: the first character is upper-case.
//! - Parameters may be anything but a record passed by value.
//! - Outputs are either `[error]` or `[result, error]`, where `result` is an
//!   exported record (possibly by reference) or a builtin type.
//!
//! ```
//! use std::sync::Arc;
//! use neoreg::{MethodSet, Receiver, Registry, Signature, Type, Val};
//!
//! struct Calc;
//!
//! impl Receiver for Calc {
//!     fn methods(set: &mut MethodSet<Self>) {
//!         set.add(
//!             Signature::new("Add")
//!                 .params([Type::S64, Type::S64])
//!                 .results([Type::S64, Type::Error]),
//!             |_calc, args| {
//!                 let a = args[0].as_i64().unwrap_or_default();
//!                 let b = args[1].as_i64().unwrap_or_default();
//!                 Ok(Some(Val::S64(a + b)))
//!             },
//!         );
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.register(Arc::new(Calc), "").unwrap();
//! let sum = registry.call("Calc.Add", &[Val::S64(2), Val::S64(3)]).unwrap();
//! assert_eq!(sum, Some(Val::S64(5)));
//! ```

mod discover;
mod error;
mod method;
mod naming;
mod registry;
mod service;
mod types;
mod val;


pub use crate::error::CallError;
pub use crate::error::DispatchError;
pub use crate::error::MethodError;
pub use crate::error::RegistrationError;
pub use crate::error::ResolutionError;

pub use crate::method::Arguments;
pub use crate::method::Handle;
pub use crate::method::MethodDescriptor;
pub use crate::method::Slot;

pub use crate::naming::SEPARATOR;
pub use crate::naming::is_exported;

pub use crate::registry::Registry;
pub use crate::registry::RegistryBuilder;

pub use crate::service::MethodSet;
pub use crate::service::Receiver;
pub use crate::service::ServiceDescriptor;
pub use crate::service::Signature;

pub use crate::types::RecordType;
pub use crate::types::Type;
pub use crate::types::TypeClass;

pub use crate::val::Val;
