//! # Capability Discovery
//!
//! Turns a receiver's declared methods into a validated [`ServiceDescriptor`].
//!
//! Everything here runs before the registry table is touched, so a rejected
//! receiver never leaves a trace in it.
//!
//! - Methods whose names are not exported are never scanned.
//! - An exported method name containing the separator rejects the whole service.
//! - A by-value aggregate parameter rejects the whole service.
//! - Outputs must be `[error]` or `[result, error]`. Any other output list is
//!   silently excluded, but a `[result, error]` method whose result type is
//!   unexported (or a by-value aggregate) rejects the whole service.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use crate::error::RegistrationError;
use crate::method::MethodDescriptor;
use crate::naming::SEPARATOR;
use crate::naming::is_exported;
use crate::naming::short_type_name;
use crate::service::MethodSet;
use crate::service::Receiver;
use crate::service::ServiceDescriptor;
use crate::service::Signature;
use crate::types::Type;
use crate::types::TypeClass;

pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Accepted output shapes of a method.
enum Shape {
    ErrorOnly,
    Valued(Type),
    Ineligible,
}

/// Picks the service name: the explicit one if given, otherwise the short
/// type name of `R`.
pub(crate) fn effective_name<R: Receiver>(explicit: &str) -> Result<String> {
    if explicit.is_empty() {
        let derived = short_type_name(std::any::type_name::<R>());
        if derived.is_empty() {
            return Err(RegistrationError::InvalidName {
                name: std::any::type_name::<R>().to_string(),
                reason: "no service name for type",
            });
        }
        if !is_exported(derived) {
            return Err(RegistrationError::InvalidName {
                name: derived.to_string(),
                reason: "type is not exported",
            });
        }
        return Ok(derived.to_string());
    }

    if !is_exported(explicit) {
        return Err(RegistrationError::InvalidName {
            name: explicit.to_string(),
            reason: "name is not exported",
        });
    }
    if explicit.contains(SEPARATOR) {
        return Err(RegistrationError::InvalidName {
            name: explicit.to_string(),
            reason: "name contains the method separator",
        });
    }
    Ok(explicit.to_string())
}

/// Scans the methods `R` declares and builds the service descriptor.
pub(crate) fn discover<R: Receiver>(name: String, receiver: Arc<R>) -> Result<ServiceDescriptor> {
    let set = MethodSet::<R>::of();
    trace!(service = %name, declared = set.len(), "scanning receiver");

    let mut methods: HashMap<String, Arc<MethodDescriptor>> = HashMap::new();

    for decl in set.into_decls() {
        let signature = decl.signature();
        if !is_exported(signature.name()) {
            trace!(service = %name, method = %signature.name(), "skipping unexported method");
            continue;
        }
        if signature.name().contains(SEPARATOR) {
            return Err(invalid_signature(&name, signature, "method name contains the method separator".to_string()));
        }

        for (index, ty) in signature.param_types().iter().enumerate() {
            check_param(&name, signature, index, ty)?;
        }

        let return_type = match result_shape(&name, signature)? {
            Shape::ErrorOnly => None,
            Shape::Valued(ty) => Some(ty),
            Shape::Ineligible => {
                trace!(service = %name, method = %signature.name(), "skipping method with ineligible outputs");
                continue;
            }
        };

        if methods.contains_key(signature.name()) {
            return Err(invalid_signature(&name, signature, "method is declared more than once".to_string()));
        }

        let (signature, handle) = decl.bind(&receiver);
        let (method_name, params, _) = signature.into_parts();
        let descriptor = MethodDescriptor::new(method_name.clone(), handle, params, return_type);
        methods.insert(method_name, Arc::new(descriptor));
    }

    if methods.is_empty() {
        return Err(RegistrationError::NoEligibleMethods(name));
    }

    Ok(ServiceDescriptor::new(name, receiver, methods))
}

fn check_param(service: &str, signature: &Signature, index: usize, ty: &Type) -> Result<()> {
    if ty.class() == TypeClass::AggregateByValue {
        return Err(invalid_signature(
            service,
            signature,
            format!("parameter {} has type {} passed by value; pass by reference, i.e. *{}", index, ty, ty),
        ));
    }
    Ok(())
}

fn result_shape(service: &str, signature: &Signature) -> Result<Shape> {
    match signature.result_types() {
        [err] if err.is_error() => Ok(Shape::ErrorOnly),
        [result, err] if err.is_error() => {
            if !result.is_exported_or_builtin() {
                return Err(invalid_signature(
                    service,
                    signature,
                    format!("result type {} is not exported", result),
                ));
            }
            if result.class() == TypeClass::AggregateByValue {
                return Err(invalid_signature(
                    service,
                    signature,
                    format!("result type {} is returned by value; return by reference, i.e. *{}", result, result),
                ));
            }
            Ok(Shape::Valued(result.clone()))
        }
        _ => Ok(Shape::Ineligible),
    }
}

fn invalid_signature(service: &str, signature: &Signature, details: String) -> RegistrationError {
    RegistrationError::InvalidSignature {
        service: service.to_string(),
        method: signature.name().to_string(),
        details,
    }
}
