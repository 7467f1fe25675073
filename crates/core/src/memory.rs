//! In-memory repository implementations.
//!
//! The single non-SQLite backend: it exists for unit tests of the pipelines
//! and services, which only see the repository traits.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::entries::{DateRange, Entry, EntryRepositoryTrait, LossAggregate, NewEntry};
use crate::errors::Result;
use crate::import::{ImportRun, ImportRunRepositoryTrait, NewImportRun};
use crate::products::{NewProduct, Product, ProductRepositoryTrait, UNREGISTERED_PRODUCT_NAME};
use crate::reasons::{standard_reasons, NewReason, Reason, ReasonRepositoryTrait};

pub struct InMemoryEntryRepository {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicI64,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for InMemoryEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryRepositoryTrait for InMemoryEntryRepository {
    async fn insert(&self, new_entry: NewEntry) -> Result<i64> {
        new_entry.validate()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entry = Entry {
            id,
            product_code: new_entry.product_code,
            product_name: new_entry
                .product_name
                .unwrap_or_else(|| UNREGISTERED_PRODUCT_NAME.to_string()),
            reason_id: new_entry.reason_id,
            quantity: new_entry.quantity,
            unit_cost: new_entry.unit_cost,
            notes: new_entry.notes,
            is_synchronized: new_entry.synchronized,
            created_at: new_entry.created_at.unwrap_or_else(Utc::now),
        };
        self.entries.lock().unwrap().push(entry);
        Ok(id)
    }

    fn find_unsynchronized_by_reason(&self, reason_id: &str) -> Result<Vec<Entry>> {
        let mut matching: Vec<Entry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.reason_id == reason_id && !e.is_synchronized)
            .cloned()
            .collect();
        matching.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(matching)
    }

    async fn mark_synchronized(&self, entry_ids: Vec<i64>) -> Result<usize> {
        if entry_ids.is_empty() {
            return Ok(0);
        }
        let mut entries = self.entries.lock().unwrap();
        let mut matched = 0;
        for entry in entries.iter_mut() {
            if entry_ids.contains(&entry.id) {
                entry.is_synchronized = true;
                matched += 1;
            }
        }
        Ok(matched)
    }

    fn aggregate_loss_value(&self, range: Option<&DateRange>) -> Result<LossAggregate> {
        let mut aggregate = LossAggregate::default();
        for entry in self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| range.map_or(true, |r| r.contains(e.created_at)))
        {
            aggregate.accumulate(entry);
        }
        Ok(aggregate)
    }

    fn find_in_range(&self, range: Option<&DateRange>) -> Result<Vec<Entry>> {
        let mut matching: Vec<Entry> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| range.map_or(true, |r| r.contains(e.created_at)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(matching)
    }

    fn find_recent(&self, limit: i64) -> Result<Vec<Entry>> {
        let mut all: Vec<Entry> = self.entries.lock().unwrap().clone();
        all.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepositoryTrait for InMemoryProductRepository {
    fn find_by_code(&self, code: &str) -> Result<Option<Product>> {
        Ok(self
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.code == code && p.deleted_at.is_none())
            .cloned())
    }

    fn list(&self) -> Result<Vec<Product>> {
        let mut products: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.deleted_at.is_none())
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn upsert(&self, product: NewProduct) -> Result<Product> {
        let now = Utc::now();
        let mut products = self.products.lock().unwrap();
        if let Some(existing) = products.iter_mut().find(|p| p.code == product.code) {
            existing.name = product.name;
            existing.unit_type = product.unit_type;
            existing.regular_price = product.regular_price;
            existing.club_price = product.club_price;
            existing.updated_at = now;
            existing.deleted_at = None;
            return Ok(existing.clone());
        }
        let created = Product {
            code: product.code,
            name: product.name,
            unit_type: product.unit_type,
            regular_price: product.regular_price,
            club_price: product.club_price,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        products.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct InMemoryReasonRepository {
    reasons: Mutex<Vec<Reason>>,
}

impl InMemoryReasonRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository pre-seeded with the standard catalog.
    pub fn with_standard_reasons() -> Self {
        let now = Utc::now();
        let reasons = standard_reasons()
            .into_iter()
            .map(|r| Reason {
                id: r.id,
                code: r.code,
                description: r.description,
                is_active: r.is_active,
                created_at: now,
                updated_at: now,
            })
            .collect();
        Self {
            reasons: Mutex::new(reasons),
        }
    }
}

#[async_trait]
impl ReasonRepositoryTrait for InMemoryReasonRepository {
    fn list_active(&self) -> Result<Vec<Reason>> {
        let mut active: Vec<Reason> = self
            .reasons
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(active)
    }

    fn find_by_id(&self, reason_id: &str) -> Result<Option<Reason>> {
        Ok(self
            .reasons
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == reason_id)
            .cloned())
    }

    async fn ensure_seeded(&self, reasons: Vec<NewReason>) -> Result<usize> {
        let now = Utc::now();
        let mut stored = self.reasons.lock().unwrap();
        if !stored.is_empty() {
            return Ok(0);
        }
        let inserted = reasons.len();
        stored.extend(reasons.into_iter().map(|r| Reason {
            id: r.id,
            code: r.code,
            description: r.description,
            is_active: r.is_active,
            created_at: now,
            updated_at: now,
        }));
        Ok(inserted)
    }
}

#[derive(Default)]
pub struct InMemoryImportRunRepository {
    runs: Mutex<Vec<ImportRun>>,
}

impl InMemoryImportRunRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImportRunRepositoryTrait for InMemoryImportRunRepository {
    async fn record(&self, run: NewImportRun) -> Result<ImportRun> {
        let mut runs = self.runs.lock().unwrap();
        let recorded = ImportRun {
            id: format!("run-{}", runs.len() + 1),
            file_name: run.file_name,
            total_lines: run.total_lines,
            imported_lines: run.imported_lines,
            failed_lines: run.failed_lines,
            status: run.status,
            error_log: run.error_log,
            created_at: Utc::now(),
        };
        runs.push(recorded.clone());
        Ok(recorded)
    }

    fn list_recent(&self, limit: i64) -> Result<Vec<ImportRun>> {
        let mut runs: Vec<ImportRun> = self.runs.lock().unwrap().clone();
        runs.reverse();
        runs.truncate(limit.max(0) as usize);
        Ok(runs)
    }
}
