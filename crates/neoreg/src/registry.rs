//! # Service Registry
//!
//! Concurrent table from service names to [`ServiceDescriptor`]s.
//!
//! Uses DashMap so lookups of one service never wait on registration of
//! another. Registration does its discovery and validation outside the table
//! and only takes the shard lock for the final check-and-insert.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::discover::discover;
use crate::discover::effective_name;
use crate::error::DispatchError;
use crate::error::RegistrationError;
use crate::error::ResolutionError;
use crate::method::MethodDescriptor;
use crate::naming::split_dotted;
use crate::service::Receiver;
use crate::service::ServiceDescriptor;
use crate::val::Val;

pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Fluent configuration for a [`Registry`].
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    capacity: usize,
    shard_amount: Option<usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-sizes the table for `capacity` services.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Number of independently locked shards.
    ///
    /// Rounded up to a power of two, with a minimum of 2.
    pub fn shard_amount(mut self, shard_amount: usize) -> Self {
        self.shard_amount = Some(shard_amount.max(2).next_power_of_two());
        self
    }

    pub fn build(self) -> Registry {
        let services = match self.shard_amount {
            Some(shards) => DashMap::with_capacity_and_shard_amount(self.capacity, shards),
            None => DashMap::with_capacity(self.capacity),
        };
        Registry { services }
    }
}

/// A registry of services addressed by name.
///
/// Services are only ever added; a name, once taken, keeps its descriptor for
/// the lifetime of the registry. Each registry is independent, so several
/// can coexist in one process.
pub struct Registry {
    services: DashMap<String, Arc<ServiceDescriptor>>,
}

impl Registry {
    pub fn new() -> Self {
        RegistryBuilder::new().build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registers `receiver` under `name`, or under its type name if `name` is empty.
    ///
    /// Fails without modifying the registry if the name is invalid, a method
    /// signature violates the calling contract, no method is eligible, or the
    /// name is already taken.
    pub fn register<R: Receiver>(&self, receiver: Arc<R>, name: &str) -> Result<()> {
        let name = effective_name::<R>(name)?;
        let service = discover(name, receiver)?;

        match self.services.entry(service.name().to_string()) {
            Entry::Occupied(entry) => Err(RegistrationError::DuplicateService(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(
                    service = %service.name(),
                    receiver = service.receiver_type(),
                    methods = ?service.method_names(),
                    "registered service"
                );
                entry.insert(Arc::new(service));
                Ok(())
            }
        }
    }

    /// Direct lookup by service name.
    pub fn get_service(&self, name: &str) -> Option<Arc<ServiceDescriptor>> {
        self.services.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Resolves a `Service.Method` name.
    pub fn resolve(&self, dotted: &str) -> std::result::Result<(Arc<ServiceDescriptor>, Arc<MethodDescriptor>), ResolutionError> {
        let (service_name, method_name) =
            split_dotted(dotted).ok_or_else(|| ResolutionError::MalformedName(dotted.to_string()))?;

        let service = self.get_service(service_name).ok_or_else(|| {
            debug!(name = %dotted, "service not found");
            ResolutionError::ServiceNotFound(service_name.to_string())
        })?;

        let method = service.method_by_name(method_name).inspect_err(|_| {
            debug!(name = %dotted, "method not found");
        })?;

        Ok((service, method))
    }

    /// Resolves `dotted` and invokes the method with `args`.
    pub fn call(&self, dotted: &str, args: &[Val]) -> std::result::Result<Option<Val>, DispatchError> {
        let (_, method) = self.resolve(dotted)?;
        Ok(method.invoke(args)?)
    }

    /// Names of all registered services, in lexical order.
    pub fn service_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.services.iter().map(|entry| entry.key().clone()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("services", &self.service_names())
            .finish()
    }
}
