use cb_util::dashmap::mapref::entry::Entry;
use cb_util::dashmap::DashMap;
use cb_util::itertools::Itertools;
use cb_util::log;
use std::sync::Arc;

pub type IntegrationLoadError = Box<dyn std::error::Error + Send + Sync>;

/// A pluggable capability provider with an explicit load/unload lifecycle.
///
/// Integrations are identified by [`Integration::name`].
pub trait Integration: Send + Sync {
    fn name(&self) -> &str;
    /// Checked every time the integration is added
    fn is_supported(&self) -> bool;
    fn load(&self) -> Result<(), IntegrationLoadError>;
    fn unload(&self);
}

#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    #[error("integration {name} failed to load: {source}")]
    LoadFailed {
        name: String,
        #[source]
        source: IntegrationLoadError,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AddOutcome {
    Loaded,
    AlreadyLoaded,
    Unsupported,
}

/// The set of loaded integrations. Being present means `load()` succeeded and
/// `unload()` has not been called yet.
#[derive(Default)]
pub struct IntegrationRegistry {
    integrations: DashMap<String, Arc<dyn Integration>>,
}

impl IntegrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, integration: Arc<dyn Integration>) -> Result<AddOutcome, IntegrationError> {
        let name = integration.name().to_owned();
        if !integration.is_supported() {
            log::warn!(
                "Not loading integration {} because it is not supported",
                name
            );
            return Ok(AddOutcome::Unsupported);
        }

        match self.integrations.entry(name.clone()) {
            Entry::Occupied(_) => return Ok(AddOutcome::AlreadyLoaded),
            Entry::Vacant(slot) => {
                slot.insert(integration.clone());
            }
        }

        log::info!("Loading {} integration", name);
        if let Err(source) = integration.load() {
            self.integrations
                .remove_if(&name, |_, present| Arc::ptr_eq(present, &integration));
            return Err(IntegrationError::LoadFailed { name, source });
        }
        Ok(AddOutcome::Loaded)
    }

    /// Unloads the integration if it is present, returns whether it was
    pub fn remove(&self, integration: &dyn Integration) -> bool {
        self.remove_by_name(integration.name())
    }

    pub fn remove_by_name(&self, name: &str) -> bool {
        match self.integrations.remove(name) {
            Some((name, removed)) => {
                log::info!("Unloading ClosedBlocks integration {}", name);
                removed.unload();
                true
            }
            None => false,
        }
    }

    /// Unloads every present integration, returns how many were unloaded
    pub fn shutdown_all(&self) -> usize {
        let names = self
            .integrations
            .iter()
            .map(|e| e.key().clone())
            .collect_vec();
        names
            .iter()
            .filter(|name| self.remove_by_name(name))
            .count()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.integrations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.integrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.integrations.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.integrations
            .iter()
            .map(|e| e.key().clone())
            .sorted()
            .collect_vec()
    }
}
