//! Application service context.
//!
//! The entry point owns the store lifecycle: it resolves the data directory,
//! runs migrations, builds the pool and writer, seeds the reason catalog,
//! and wires the repositories into the services. Nothing here is a global;
//! every consumer receives its dependencies explicitly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lossbook_core::entries::{EntryRepositoryTrait, EntryService};
use lossbook_core::errors::Result;
use lossbook_core::export::{ExportConfig, ExportService};
use lossbook_core::import::{ImportRunRepositoryTrait, ImportService};
use lossbook_core::products::ProductRepositoryTrait;
use lossbook_core::reasons::{standard_reasons, ReasonRepositoryTrait};
use lossbook_storage_sqlite::db;
use lossbook_storage_sqlite::{
    EntryRepository, ImportRunRepository, ProductRepository, ReasonRepository,
};

pub struct ServiceContext {
    pub data_dir: PathBuf,
    pub entry_repository: Arc<dyn EntryRepositoryTrait>,
    pub product_repository: Arc<dyn ProductRepositoryTrait>,
    pub reason_repository: Arc<dyn ReasonRepositoryTrait>,
    pub import_run_repository: Arc<dyn ImportRunRepositoryTrait>,
    pub entry_service: EntryService,
}

impl ServiceContext {
    pub async fn initialize(data_dir: PathBuf) -> Result<Self> {
        let db_path = db::init(&data_dir.to_string_lossy())?;
        db::run_migrations(&db_path)?;
        let pool = db::create_pool(&db_path)?;
        let writer = db::spawn_writer(pool.as_ref().clone());

        let reason_repository: Arc<dyn ReasonRepositoryTrait> =
            Arc::new(ReasonRepository::new(pool.clone(), writer.clone()));
        reason_repository.ensure_seeded(standard_reasons()).await?;

        let entry_repository: Arc<dyn EntryRepositoryTrait> =
            Arc::new(EntryRepository::new(pool.clone(), writer.clone()));
        let product_repository: Arc<dyn ProductRepositoryTrait> =
            Arc::new(ProductRepository::new(pool.clone(), writer.clone()));
        let import_run_repository: Arc<dyn ImportRunRepositoryTrait> =
            Arc::new(ImportRunRepository::new(pool, writer));

        let entry_service = EntryService::new(
            entry_repository.clone(),
            product_repository.clone(),
            reason_repository.clone(),
        );

        Ok(Self {
            data_dir,
            entry_repository,
            product_repository,
            reason_repository,
            import_run_repository,
            entry_service,
        })
    }

    /// Default export destination inside the data directory.
    pub fn default_export_dir(&self) -> PathBuf {
        self.data_dir.join("exports")
    }

    pub fn export_service(&self, base_dir: &Path) -> ExportService {
        ExportService::new(
            self.reason_repository.clone(),
            self.entry_repository.clone(),
            ExportConfig::new(base_dir),
        )
    }

    pub fn import_service(&self) -> ImportService {
        ImportService::new(
            self.product_repository.clone(),
            self.entry_repository.clone(),
            self.import_run_repository.clone(),
        )
    }
}

/// Platform data dir, overridable with `--data-dir`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        dirs::data_dir()
            .map(|dir| dir.join("lossbook"))
            .unwrap_or_else(|| PathBuf::from(".lossbook"))
    })
}
