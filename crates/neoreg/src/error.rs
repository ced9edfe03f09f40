//! # Error Definitions
//!
//! Registration failures, resolution misses, and invocation failures are kept
//! apart: the first two are about the table, the last is about a single call.

use std::fmt;

/// Failures returned by [`Registry::register`](crate::Registry::register).
///
/// Nothing is inserted into the registry when any of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The supplied or derived service name is empty or not exported.
    InvalidName { name: String, reason: &'static str },
    /// A method's parameters or result violate the calling contract.
    InvalidSignature { service: String, method: String, details: String },
    /// The receiver declares no method that qualifies for the RPC surface.
    NoEligibleMethods(String),
    /// A service with this name is already registered.
    DuplicateService(String),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { name, reason } => write!(f, "invalid service name {:?}: {}", name, reason),
            Self::InvalidSignature { service, method, details } => {
                write!(f, "invalid signature for {}.{}: {}", service, method, details)
            }
            Self::NoEligibleMethods(name) => write!(f, "{:?} has no exported methods of suitable type", name),
            Self::DuplicateService(name) => write!(f, "service already defined: {:?}", name),
        }
    }
}

impl std::error::Error for RegistrationError {}

/// Failures returned when looking a method up by dotted name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The name is not exactly `Service.Method` with two non-empty parts.
    MalformedName(String),
    ServiceNotFound(String),
    MethodNotFound { service: String, method: String },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedName(name) => write!(f, "service/method request ill-formed: {:?}", name),
            Self::ServiceNotFound(name) => write!(f, "can't find service {:?}", name),
            Self::MethodNotFound { service, method } => write!(f, "can't find method {:?} on service {:?}", method, service),
        }
    }
}

impl std::error::Error for ResolutionError {}

/// The error a method handler reports back to its caller.
///
/// This is the "error" output of a registered method, not a registry failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodError {
    message: String,
}

impl MethodError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for MethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for MethodError {}

impl From<String> for MethodError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for MethodError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// Failures of a single invocation through a [`MethodDescriptor`](crate::MethodDescriptor).
#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    /// The number of arguments does not match the parameter list.
    ArgumentCount { expected: usize, found: usize },
    /// An argument does not inhabit its declared parameter type.
    ArgumentType { index: usize, expected: String, found: &'static str },
    /// A holder index past the end of the parameter list.
    NoSuchArgument { index: usize, len: usize },
    /// The handler produced an output that disagrees with the declared result.
    ResultShape(String),
    /// The method ran and reported an error.
    Method(MethodError),
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgumentCount { expected, found } => {
                write!(f, "argument count mismatch: expected {}, found {}", expected, found)
            }
            Self::ArgumentType { index, expected, found } => {
                write!(f, "argument {} has wrong type: expected {}, found {}", index, expected, found)
            }
            Self::NoSuchArgument { index, len } => {
                write!(f, "no argument at index {}: method takes {}", index, len)
            }
            Self::ResultShape(msg) => write!(f, "result does not match signature: {}", msg),
            Self::Method(e) => write!(f, "method failed: {}", e),
        }
    }
}

impl std::error::Error for CallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Method(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MethodError> for CallError {
    fn from(e: MethodError) -> Self {
        Self::Method(e)
    }
}

/// Failure of a resolve-then-invoke call made through [`Registry::call`](crate::Registry::call).
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    Resolve(ResolutionError),
    Call(CallError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve(e) => write!(f, "Resolve error: {}", e),
            Self::Call(e) => write!(f, "Call error: {}", e),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Resolve(e) => Some(e),
            Self::Call(e) => Some(e),
        }
    }
}

impl From<ResolutionError> for DispatchError {
    fn from(e: ResolutionError) -> Self {
        Self::Resolve(e)
    }
}

impl From<CallError> for DispatchError {
    fn from(e: CallError) -> Self {
        Self::Call(e)
    }
}
