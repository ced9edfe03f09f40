//! # Services
//!
//! A receiver declares its callable surface by implementing [`Receiver`]:
//! each method is a [`Signature`] plus a handler closure, added to a
//! [`MethodSet`]. Registration turns the eligible part of that set into a
//! [`ServiceDescriptor`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::MethodError;
use crate::error::ResolutionError;
use crate::method::Handle;
use crate::method::MethodDescriptor;
use crate::types::Type;
use crate::val::Val;

/// An object whose methods can be registered as a service.
///
/// `methods` is called once per registration and must declare every method
/// the receiver wants considered, in a stable order. Methods that do not fit
/// the calling contract are skipped or rejected during registration.
///
/// ```
/// use neoreg::{MethodSet, Receiver, Signature, Type, Val};
///
/// struct Echo;
///
/// impl Receiver for Echo {
///     fn methods(set: &mut MethodSet<Self>) {
///         set.add(
///             Signature::new("Say").param(Type::String).result(Type::String).result(Type::Error),
///             |_echo, args| Ok(Some(args[0].clone())),
///         );
///     }
/// }
/// ```
pub trait Receiver: Send + Sync + 'static {
    fn methods(set: &mut MethodSet<Self>)
    where
        Self: Sized;
}

/// The declared shape of one method: its name, its parameters (excluding the
/// receiver) and its full output list, error indicator included.
#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    name: String,
    params: Vec<Type>,
    results: Vec<Type>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn param(mut self, ty: Type) -> Self {
        self.params.push(ty);
        self
    }

    pub fn params(mut self, tys: impl IntoIterator<Item = Type>) -> Self {
        self.params.extend(tys);
        self
    }

    pub fn result(mut self, ty: Type) -> Self {
        self.results.push(ty);
        self
    }

    pub fn results(mut self, tys: impl IntoIterator<Item = Type>) -> Self {
        self.results.extend(tys);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_types(&self) -> &[Type] {
        &self.params
    }

    pub fn result_types(&self) -> &[Type] {
        &self.results
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Type>, Vec<Type>) {
        (self.name, self.params, self.results)
    }
}

type Handler<R> = Box<dyn Fn(&R, &[Val]) -> Result<Option<Val>, MethodError> + Send + Sync>;

/// One declared method, not yet validated or bound to a receiver.
pub(crate) struct MethodDecl<R> {
    signature: Signature,
    handler: Handler<R>,
}

impl<R: Receiver> MethodDecl<R> {
    pub(crate) fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Binds the handler to a shared receiver.
    pub(crate) fn bind(self, receiver: &Arc<R>) -> (Signature, Handle) {
        let receiver = Arc::clone(receiver);
        let handler = self.handler;
        let handle: Handle = Arc::new(move |args: &[Val]| handler(&receiver, args));
        (self.signature, handle)
    }
}

/// The ordered collection of methods a [`Receiver`] declares.
pub struct MethodSet<R> {
    decls: Vec<MethodDecl<R>>,
}

impl<R: Receiver> MethodSet<R> {
    pub(crate) fn new() -> Self {
        Self { decls: Vec::new() }
    }

    /// Collects the declarations of `R`.
    pub(crate) fn of() -> Self {
        let mut set = Self::new();
        R::methods(&mut set);
        set
    }

    pub fn add<F>(&mut self, signature: Signature, handler: F) -> &mut Self
    where
        F: Fn(&R, &[Val]) -> Result<Option<Val>, MethodError> + Send + Sync + 'static,
    {
        self.decls.push(MethodDecl {
            signature,
            handler: Box::new(handler),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub(crate) fn into_decls(self) -> Vec<MethodDecl<R>> {
        self.decls
    }
}

/// A registered service: its name, its receiver and its eligible methods.
///
/// Immutable once built. The receiver is shared, never copied.
pub struct ServiceDescriptor {
    name: String,
    receiver: Arc<dyn Any + Send + Sync>,
    receiver_type: &'static str,
    methods: HashMap<String, Arc<MethodDescriptor>>,
}

impl ServiceDescriptor {
    pub(crate) fn new<R: Receiver>(
        name: String,
        receiver: Arc<R>,
        methods: HashMap<String, Arc<MethodDescriptor>>,
    ) -> Self {
        Self {
            name,
            receiver,
            receiver_type: std::any::type_name::<R>(),
            methods,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full Rust type name of the receiver.
    pub fn receiver_type(&self) -> &'static str {
        self.receiver_type
    }

    /// Returns the receiver if it is an `R`.
    pub fn receiver<R: Any + Send + Sync>(&self) -> Option<Arc<R>> {
        Arc::clone(&self.receiver).downcast::<R>().ok()
    }

    /// Exact, case-sensitive method lookup.
    pub fn method_by_name(&self, name: &str) -> Result<Arc<MethodDescriptor>, ResolutionError> {
        self.methods
            .get(name)
            .cloned()
            .ok_or_else(|| ResolutionError::MethodNotFound {
                service: self.name.clone(),
                method: name.to_string(),
            })
    }

    pub fn methods(&self) -> impl Iterator<Item = &Arc<MethodDescriptor>> {
        self.methods.values()
    }

    /// Method names in lexical order.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("name", &self.name)
            .field("receiver_type", &self.receiver_type)
            .field("methods", &self.method_names())
            .finish()
    }
}
