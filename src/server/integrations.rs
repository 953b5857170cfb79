use crate::config::Config;
use cb_blocks::registry::{Integration, IntegrationLoadError};
use cb_util::log;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Always available; provides the plain block behaviour
#[derive(Default)]
pub struct CoreIntegration {
    active: AtomicBool,
}

impl CoreIntegration {
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Integration for CoreIntegration {
    fn name(&self) -> &str {
        "core"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn load(&self) -> Result<(), IntegrationLoadError> {
        self.active.store(true, Ordering::Release);
        Ok(())
    }

    fn unload(&self) {
        self.active.store(false, Ordering::Release);
    }
}

/// Disguises backed by an external item provider, found on disk
pub struct ItemProviderIntegration {
    provider_dir: Option<PathBuf>,
    active: AtomicBool,
}

impl ItemProviderIntegration {
    pub fn new(provider_dir: Option<PathBuf>) -> Self {
        Self {
            provider_dir,
            active: AtomicBool::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Integration for ItemProviderIntegration {
    fn name(&self) -> &str {
        "item-provider"
    }

    fn is_supported(&self) -> bool {
        self.provider_dir.as_ref().map_or(false, |d| d.is_dir())
    }

    fn load(&self) -> Result<(), IntegrationLoadError> {
        let dir = self
            .provider_dir
            .as_ref()
            .ok_or("no item provider directory configured")?;
        let entries = std::fs::read_dir(dir)?.count();
        log::debug!("Item provider at {} has {} entries", dir.display(), entries);
        self.active.store(true, Ordering::Release);
        Ok(())
    }

    fn unload(&self) {
        self.active.store(false, Ordering::Release);
    }
}

pub fn builtin(cfg: &Config) -> Vec<Arc<dyn Integration>> {
    vec![
        Arc::new(CoreIntegration::default()),
        Arc::new(ItemProviderIntegration::new(
            cfg.integrations.item_provider_dir.clone(),
        )),
    ]
}
