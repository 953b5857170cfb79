//! Rebuilds the block index from the on-disk storage tree:
//!
//! ```text
//! <root>/storage/<player-token>/<world-token>/data.json
//! ```
//!
//! Each document maps `x -> z -> {"elevators": y -> record}`. Anything that is
//! malformed is skipped at the smallest scope possible so that valid siblings
//! still load.

use super::document::{read_document, ElevatorRecord};
use super::BlockStorage;
use crate::chain::link_column;
use crate::host::{Host, HostWorld, PlayerHandle};
use crate::{BlockKind, BlockPosition, BlockSettings, ClosedBlock, ElevatorBlock, PlayerId, WorldId};
use cb_util::load_stats::{LoadStats, LoadStatsSnapshot};
use cb_util::log;
use cb_util::rayon::prelude::*;
use cb_util::rayon::{ThreadPoolBuildError, ThreadPoolBuilder};
use cb_util::serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const STORAGE_DIR: &str = "storage";
pub const DEFAULT_DOCUMENT_NAME: &str = "data.json";
const ELEVATORS_KEY: &str = "elevators";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("couldn't list storage directory {}: {source}", .path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't start storage loading threads: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

pub struct TreeLoader {
    storage: Arc<BlockStorage>,
    host: Arc<dyn Host>,
    document_name: String,
    threads: usize,
    stats: LoadStats,
}

impl TreeLoader {
    pub fn new(storage: Arc<BlockStorage>, host: Arc<dyn Host>) -> Self {
        Self {
            storage,
            host,
            document_name: DEFAULT_DOCUMENT_NAME.to_owned(),
            threads: 1,
            stats: LoadStats::new(),
        }
    }

    pub fn document_name(mut self, name: &str) -> Self {
        self.document_name = name.to_owned();
        self
    }

    /// Player directories are independent, so they are loaded in parallel
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn stats(&self) -> LoadStatsSnapshot {
        self.stats.snapshot()
    }

    /// Loads every elevator under `<root>/storage` into the storage and returns
    /// how many were loaded. A missing storage directory loads nothing.
    pub fn load_all(&self, root: &Path) -> Result<usize, LoadError> {
        let storage_dir = root.join(STORAGE_DIR);
        let listing = match std::fs::read_dir(&storage_dir) {
            Ok(listing) => listing,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No storage directory at {}", storage_dir.display());
                return Ok(0);
            }
            Err(source) => {
                return Err(LoadError::RootUnreadable {
                    path: storage_dir,
                    source,
                })
            }
        };
        let mut player_dirs: Vec<PathBuf> = listing
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    log::error!("Failed to read an entry of {}: {}", storage_dir.display(), e);
                    None
                }
            })
            .collect();
        player_dirs.sort();

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("cb-storage-load-{}", i))
            .build()?;
        let loaded: usize = pool.install(|| {
            player_dirs
                .par_iter()
                .map(|dir| self.load_player_directory(dir))
                .sum()
        });
        Ok(loaded)
    }

    fn load_player_directory(&self, dir: &Path) -> usize {
        if !dir.is_dir() {
            return 0;
        }
        let Some(player) = parse_dir_token::<PlayerId>(dir) else {
            LoadStats::bump(&self.stats.malformed_tokens);
            log::trace!("Skipping non-player directory {}", dir.display());
            return 0;
        };
        LoadStats::bump(&self.stats.players_visited);
        let owner = self.host.resolve_player(player);

        let mut batch: Vec<ClosedBlock> = Vec::new();
        for world_dir in list_directory(dir) {
            self.load_world_directory(&world_dir, &owner, &mut batch);
        }

        let loaded = batch.len();
        if loaded > 0 {
            log::debug!("Loaded {} elevators owned by {}", loaded, owner);
            self.storage.add_all(batch);
        }
        loaded
    }

    fn load_world_directory(&self, dir: &Path, owner: &PlayerHandle, batch: &mut Vec<ClosedBlock>) {
        if !dir.is_dir() {
            return;
        }
        let Some(world_id) = parse_dir_token::<WorldId>(dir) else {
            LoadStats::bump(&self.stats.malformed_tokens);
            log::trace!("Skipping non-world directory {}", dir.display());
            return;
        };
        let Some(world) = self.host.resolve_world(world_id) else {
            LoadStats::bump(&self.stats.unresolved_worlds);
            log::debug!("World {} is not loaded, leaving its blocks on disk", world_id);
            return;
        };
        LoadStats::bump(&self.stats.worlds_visited);

        let document_path = dir.join(&self.document_name);
        if !document_path.is_file() {
            return;
        }
        let document = match read_document(&document_path) {
            Ok(document) => document,
            Err(e) => {
                LoadStats::bump(&self.stats.unreadable_documents);
                log::error!("Failed to read file {}: {}", document_path.display(), e);
                return;
            }
        };
        LoadStats::bump(&self.stats.documents_read);

        let Value::Object(x_axis) = document else {
            return;
        };
        for (raw_x, x_value) in &x_axis {
            let Some(z_axis) = x_value.as_object() else {
                continue;
            };
            let Some(x) = self.parse_coordinate(raw_x) else {
                continue;
            };
            for (raw_z, z_value) in z_axis {
                let Some(z_object) = z_value.as_object() else {
                    continue;
                };
                let Some(z) = self.parse_coordinate(raw_z) else {
                    continue;
                };
                let Some(elevators) = z_object.get(ELEVATORS_KEY).and_then(Value::as_object) else {
                    continue;
                };
                let column = self.parse_column(owner.id, world_id, x, z, elevators);
                batch.extend(self.link_and_tag(world.as_ref(), column));
            }
        }
    }

    fn parse_column(
        &self,
        owner: PlayerId,
        world: WorldId,
        x: i32,
        z: i32,
        elevators: &Map<String, Value>,
    ) -> Vec<ElevatorBlock> {
        elevators
            .iter()
            .filter_map(|(raw_y, record)| {
                let Some(record) = ElevatorRecord::from_value(record) else {
                    LoadStats::bump(&self.stats.invalid_records);
                    log::trace!("Skipping invalid elevator record at y={} ({}, {})", raw_y, x, z);
                    return None;
                };
                let y = self.parse_coordinate(raw_y)?;
                let settings = self.settings_from_record(record);
                Some(ElevatorBlock::new(
                    owner,
                    world,
                    BlockPosition::new(x, y, z),
                    settings,
                ))
            })
            .collect()
    }

    fn settings_from_record(&self, record: ElevatorRecord) -> BlockSettings {
        let viewers = record.viewers.iter().filter_map(|v| {
            let viewer = v.as_str().and_then(|s| s.parse::<PlayerId>().ok());
            if viewer.is_none() {
                LoadStats::bump(&self.stats.invalid_viewers);
            }
            viewer
        });
        BlockSettings::new(
            record.name,
            record.disguise,
            record.enabled,
            record.particles,
            record.visible,
            viewers.collect::<Vec<_>>(),
        )
    }

    fn link_and_tag(
        &self,
        world: &dyn HostWorld,
        column: Vec<ElevatorBlock>,
    ) -> impl Iterator<Item = ClosedBlock> {
        let chain = link_column(column);
        if !chain.is_empty() {
            LoadStats::bump(&self.stats.columns_linked);
            LoadStats::add(&self.stats.elevators_loaded, chain.len());
        }
        for stop in &chain {
            world.tag_block(stop.position(), BlockKind::Elevator);
        }
        chain.into_iter().map(ClosedBlock::from)
    }

    fn parse_coordinate(&self, raw: &str) -> Option<i32> {
        let parsed = raw.parse::<i32>().ok();
        if parsed.is_none() {
            LoadStats::bump(&self.stats.malformed_tokens);
        }
        parsed
    }
}

fn parse_dir_token<T: std::str::FromStr>(dir: &Path) -> Option<T> {
    dir.file_name()?.to_str()?.parse().ok()
}

fn list_directory(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(listing) => {
            let mut paths: Vec<PathBuf> = listing
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .collect();
            paths.sort();
            paths
        }
        Err(e) => {
            log::error!("Failed to read directory {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}
