use crate::bus::{Message, MessageBus, PluginState};
use crate::config::{Config, ConfigHandle, CONFIG_FILE};
use crate::logging;
use crate::server::host::DedicatedHost;
use crate::server::integrations;
use cb_blocks::registry::IntegrationError;
use cb_blocks::storage::loader::LoadError;
use cb_blocks::{BlockStorage, IntegrationRegistry, TreeLoader};
use cb_util::log;
use std::path::Path;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

static KEEP_RUNNING: AtomicBool = AtomicBool::new(true);

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Integration(#[from] IntegrationError),
}

/// Everything the running service owns, passed explicitly to whoever needs it
pub struct ClosedBlocks {
    pub cfg: ConfigHandle,
    pub storage: Arc<BlockStorage>,
    pub integrations: IntegrationRegistry,
    pub host: Arc<DedicatedHost>,
    pub bus: MessageBus,
}

impl ClosedBlocks {
    pub fn new(cfg: ConfigHandle) -> Self {
        let host = Arc::new(DedicatedHost::from_config(&cfg.read().host));
        Self {
            cfg,
            storage: Arc::new(BlockStorage::new()),
            integrations: IntegrationRegistry::new(),
            host,
            bus: MessageBus::new(),
        }
    }

    /// Loads stored blocks, then registers the built-in integrations
    pub fn start(&mut self) -> Result<(), StartupError> {
        self.bus.submit(Message::StateChanged(PluginState::Start));
        self.bus.dispatch();

        let (data_dir, document_name, threads) = {
            let cfg = self.cfg.read();
            (
                cfg.storage.data_dir.clone(),
                cfg.storage.document_name.clone(),
                cfg.performance.load_threads as usize,
            )
        };
        log::info!("Preparing to load stored blocks data. This may take a while...");
        let loader = TreeLoader::new(self.storage.clone(), self.host.clone())
            .document_name(&document_name)
            .threads(threads);
        loader.load_all(&data_dir)?;
        self.bus.submit(Message::BlocksLoaded(self.storage.size()));
        self.bus.dispatch();
        log::debug!("Storage load summary:\n{}", loader.stats().summary_format());

        for integration in integrations::builtin(&self.cfg.read()) {
            if let Err(e) = self.integrations.add(integration) {
                self.integrations.shutdown_all();
                return Err(e.into());
            }
        }
        Ok(())
    }

    pub fn status(&self) -> String {
        format!(
            "{} blocks in {} worlds ({} tagged), integrations: [{}]",
            self.storage.size(),
            self.host.world_count(),
            self.host.tagged_count(),
            self.integrations.names().join(", ")
        )
    }

    pub fn shutdown(&mut self) {
        let unloaded = self.integrations.shutdown_all();
        log::debug!("Unloaded {} integrations", unloaded);
        self.bus.submit(Message::StateChanged(PluginState::Stop));
        self.bus.dispatch();
    }
}

pub fn server_main() -> ExitCode {
    let log_handle = match logging::init() {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    ctrlc::set_handler(|| {
        KEEP_RUNNING.store(false, Ordering::SeqCst);
    })
    .unwrap_or_else(|_| log::warn!("Could not install Ctrl-C/SIGTERM handler"));

    let cfg = match Config::standard_load(Path::new(CONFIG_FILE)) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = logging::apply_config(&log_handle, &cfg.read().debugging) {
        log::warn!("{}, keeping console logging", e);
    }
    if let Ok(cfg_text) = cfg.read().save_toml() {
        log::debug!(
            "Configuration:\n<START CONFIGURATION>\n{}\n<END CONFIGURATION>\n",
            cfg_text
        );
    }

    let mut service = ClosedBlocks::new(cfg);
    if let Err(e) = service.start() {
        log::error!("Couldn't start ClosedBlocks: {}", e);
        return ExitCode::FAILURE;
    }

    let stdin = stdin_reader();
    'running: while KEEP_RUNNING.load(Ordering::SeqCst) {
        match stdin.recv_timeout(Duration::from_millis(250)) {
            Ok(cmd) if cmd == "quit" || cmd == "stop" => break 'running,
            Ok(cmd) if cmd == "status" => log::info!("{}", service.status()),
            Ok(cmd) => log::warn!("Unrecognized command: `{}`", cmd),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break 'running,
        }
    }
    log::info!("Shutting down...");
    service.shutdown();
    ExitCode::SUCCESS
}

fn stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    if let Err(e) = std::thread::Builder::new()
        .name("cb-stdin-reader".into())
        .spawn(|| stdin_reader_worker(tx))
    {
        log::warn!("Couldn't start stdin reader thread, console commands disabled: {}", e);
    }
    rx
}

fn stdin_reader_worker(tx: mpsc::Sender<String>) {
    let mut linebuf = String::with_capacity(128);
    while let Ok(count) = std::io::stdin().read_line(&mut linebuf) {
        if count == 0 {
            break;
        }
        let cmd = linebuf.trim();
        if !cmd.is_empty() && tx.send(cmd.to_owned()).is_err() {
            break;
        }
        if !KEEP_RUNNING.load(Ordering::SeqCst) {
            break;
        }
        linebuf.clear();
    }
}
