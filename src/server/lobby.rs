//! Лобби: реестр столов процесса.
//!
//! Список столов читается из watch-сводок акторов и никогда не ждёт
//! очередь стола.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::errors::ApiError;
use crate::api::queries::TableSummary;
use crate::config::EngineConfig;
use crate::domain::table::{Table, TableConfig};
use crate::domain::TableId;
use crate::eval::{HandEvaluator, StandardEvaluator};
use crate::infra::ids::IdGenerator;
use crate::infra::persistence::{ArchiveError, HandArchive, InMemoryHandArchive, JsonLinesArchive};
use crate::infra::rng::{OsSeedSource, SeedSource};
use crate::time_ctrl::TimeRules;
use crate::engine::table_runtime::TableRuntime;

use super::actor::{TableActor, TableHandle};

pub type ArchiveFactory = Arc<dyn Fn(TableId) -> Box<dyn HandArchive> + Send + Sync>;
pub type SeedFactory = Arc<dyn Fn(TableId) -> Box<dyn SeedSource> + Send + Sync>;

pub struct Lobby {
    config: EngineConfig,
    ids: Arc<IdGenerator>,
    tables: RwLock<HashMap<TableId, TableHandle>>,
    archive: ArchiveFactory,
    seeds: SeedFactory,
    evaluator: Arc<dyn HandEvaluator>,
}

impl Lobby {
    /// Лобби по конфигу. С `archive_path` все столы пишут в один JSON-lines файл.
    pub fn new(config: EngineConfig) -> Result<Self, ArchiveError> {
        let archive: ArchiveFactory = match &config.archive_path {
            Some(path) => {
                let shared = JsonLinesArchive::open(path)?;
                Arc::new(move |_| Box::new(shared.clone()) as Box<dyn HandArchive>)
            }
            None => Arc::new(|_| Box::new(InMemoryHandArchive::new()) as Box<dyn HandArchive>),
        };
        Ok(Self {
            config,
            ids: Arc::new(IdGenerator::new()),
            tables: RwLock::new(HashMap::new()),
            archive,
            seeds: Arc::new(|_| Box::new(OsSeedSource::new()) as Box<dyn SeedSource>),
            evaluator: Arc::new(StandardEvaluator),
        })
    }

    pub fn with_archive_factory(mut self, archive: ArchiveFactory) -> Self {
        self.archive = archive;
        self
    }

    pub fn with_seed_factory(mut self, seeds: SeedFactory) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn HandEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn ids(&self) -> &Arc<IdGenerator> {
        &self.ids
    }

    /// Создать стол и запустить его актор.
    pub async fn create_table(&self, config: TableConfig) -> Result<TableId, ApiError> {
        config.validate()?;

        let table_id = self.ids.next_table_id();
        let rules = TimeRules::for_table(&config, &self.config);
        let runtime = TableRuntime::new(Table::new(table_id, config), rules, Arc::clone(&self.ids))
            .with_archive((self.archive)(table_id))
            .with_seed_source((self.seeds)(table_id))
            .with_evaluator(Arc::clone(&self.evaluator));

        let (handle, _join) = TableActor::spawn(runtime, self.config.inbox_capacity);
        self.tables.write().await.insert(table_id, handle);
        info!(table_id, "table created");
        Ok(table_id)
    }

    pub async fn table(&self, table_id: TableId) -> Result<TableHandle, ApiError> {
        self.tables
            .read()
            .await
            .get(&table_id)
            .cloned()
            .ok_or_else(|| ApiError::table_not_found(table_id))
    }

    pub async fn list_tables(&self) -> Vec<TableSummary> {
        let mut list: Vec<TableSummary> = self
            .tables
            .read()
            .await
            .values()
            .map(TableHandle::summary)
            .collect();
        list.sort_by_key(|s| s.table_id);
        list
    }

    /// Закрыть стол: таймеры отменяются, архив сбрасывается.
    pub async fn close_table(&self, table_id: TableId) -> Result<(), ApiError> {
        let handle = self
            .tables
            .write()
            .await
            .remove(&table_id)
            .ok_or_else(|| ApiError::table_not_found(table_id))?;
        handle.shutdown().await
    }

    /// Закрыть все столы.
    pub async fn shutdown(&self) {
        let handles: Vec<TableHandle> = self.tables.write().await.drain().map(|(_, h)| h).collect();
        for handle in handles {
            if let Err(err) = handle.shutdown().await {
                warn!(table_id = handle.table_id(), error = %err.message, "table shutdown failed");
            }
        }
    }
}
