//! Catalog registry
//!
//! CRUD operations over the catalog collection, persisted as a JSON array
//! under the `catalogs` key. Every mutating call rewrites the whole
//! collection; collections are small, and the store adapter keeps each
//! write atomic.
//!
//! Upload acceptance validates the metadata and the raw bytes before any
//! store write happens. Conversion is an explicit async job with a handle:
//! the caller can await completion or cancel it, and a cancelled job never
//! writes its result.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{Catalog, CatalogStatus, FileMeta};
use crate::pdf;
use crate::storage::{KvStore, StoreError};

/// Collection key in the key-value store
pub const CATALOGS_KEY: &str = "catalogs";

/// Path prefix of the public viewer, as shared links expect it
pub const PUBLIC_VIEWER_PREFIX: &str = "/visualizar";

/// Errors from catalog registry operations
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A required field is missing or empty
    #[error("Missing required field: {0}")]
    Validation(&'static str),

    /// The uploaded file is not a PDF
    #[error("Only PDF files are accepted: '{file_name}'")]
    FileType { file_name: String },

    /// The uploaded file exceeds the configured size limit
    #[error("File is {size} bytes, above the {limit} byte upload limit")]
    FileSize { size: u64, limit: u64 },

    /// No catalog with the given id
    #[error("Catalog not found: {0}")]
    NotFound(Uuid),

    /// The conversion job was cancelled before it completed
    #[error("Conversion cancelled")]
    ConversionCancelled,

    /// Underlying persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for a new catalog upload
#[derive(Debug, Clone)]
pub struct CatalogDraft {
    pub title: String,
    pub description: Option<String>,
    pub brand: String,
    pub file: FileMeta,
}

/// Registry of catalog records backed by the key-value store
#[derive(Clone)]
pub struct CatalogRegistry {
    kv: Arc<dyn KvStore>,
    max_upload_bytes: u64,
    conversion_delay: Duration,
}

impl CatalogRegistry {
    /// Create a registry over the given store handle
    pub fn new(kv: Arc<dyn KvStore>, config: &Config) -> Self {
        Self {
            kv,
            max_upload_bytes: config.max_upload_bytes,
            conversion_delay: config.conversion_delay(),
        }
    }

    /// All catalogs in insertion order
    pub fn list(&self) -> Result<Vec<Catalog>, CatalogError> {
        let Some(value) = self.kv.get(CATALOGS_KEY)? else {
            return Ok(Vec::new());
        };

        let catalogs = serde_json::from_value(value).map_err(|e| StoreError::Serialization {
            key: CATALOGS_KEY.to_string(),
            source: e,
        })?;
        Ok(catalogs)
    }

    /// Get a catalog by id
    pub fn get(&self, id: Uuid) -> Result<Option<Catalog>, CatalogError> {
        Ok(self.list()?.into_iter().find(|c| c.id == id))
    }

    /// Find a catalog by slug, regardless of status
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Catalog>, CatalogError> {
        Ok(self.list()?.into_iter().find(|c| c.slug == slug))
    }

    /// Find a converted catalog by slug, the public viewing path
    pub fn find_published(&self, slug: &str) -> Result<Option<Catalog>, CatalogError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|c| c.slug == slug && c.is_published()))
    }

    /// Case-insensitive search over titles and descriptions
    pub fn search(&self, term: &str) -> Result<Vec<Catalog>, CatalogError> {
        let needle = term.to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|c| {
                c.title.to_lowercase().contains(&needle)
                    || c.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .collect())
    }

    /// Accept an upload and append the new catalog record
    ///
    /// Validates required fields, the PDF magic, and the size limit before
    /// touching the store; a rejected upload leaves the collection
    /// untouched. The record starts in `converting` status with its page
    /// count extracted from the uploaded bytes. Call
    /// [`start_conversion`](Self::start_conversion) to run the conversion
    /// step.
    pub fn create(&self, draft: CatalogDraft, data: &[u8]) -> Result<Catalog, CatalogError> {
        if draft.title.trim().is_empty() {
            return Err(CatalogError::Validation("title"));
        }
        if draft.brand.trim().is_empty() {
            return Err(CatalogError::Validation("brand"));
        }
        if !draft.file.has_pdf_extension() || !pdf::is_pdf(data) {
            return Err(CatalogError::FileType {
                file_name: draft.file.name,
            });
        }
        if draft.file.size > self.max_upload_bytes {
            return Err(CatalogError::FileSize {
                size: draft.file.size,
                limit: self.max_upload_bytes,
            });
        }

        let pages = pdf::count_pages(data);
        let catalog = Catalog::new(draft.title, draft.description, draft.brand, &draft.file, pages);

        let mut catalogs = self.list()?;
        catalogs.push(catalog.clone());
        self.save_all(&catalogs)?;

        info!(
            "Accepted catalog '{}' ({} pages) as {}",
            catalog.title, catalog.pages, catalog.slug
        );
        Ok(catalog)
    }

    /// Start the conversion job for an uploaded catalog
    ///
    /// The job completes after the configured delay and flips the record
    /// to `converted`, or to `error` when the document yielded no pages.
    /// Cancelling the job aborts it before its completion write, so an
    /// abandoned upload leaves the record in `converting`.
    pub fn start_conversion(&self, id: Uuid) -> Result<ConversionJob, CatalogError> {
        if self.get(id)?.is_none() {
            return Err(CatalogError::NotFound(id));
        }

        let registry = self.clone();
        let delay = self.conversion_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            registry.finish_conversion(id)
        });

        debug!("Conversion started for catalog {}", id);
        Ok(ConversionJob {
            catalog_id: id,
            handle,
        })
    }

    /// Replace an existing record, matched by id
    pub fn update(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let mut catalogs = self.list()?;
        let slot = catalogs
            .iter_mut()
            .find(|c| c.id == catalog.id)
            .ok_or(CatalogError::NotFound(catalog.id))?;
        *slot = catalog.clone();
        self.save_all(&catalogs)
    }

    /// Remove a catalog by id
    pub fn delete(&self, id: Uuid) -> Result<(), CatalogError> {
        let mut catalogs = self.list()?;
        let before = catalogs.len();
        catalogs.retain(|c| c.id != id);
        if catalogs.len() == before {
            return Err(CatalogError::NotFound(id));
        }
        self.save_all(&catalogs)?;

        info!("Deleted catalog {}", id);
        Ok(())
    }

    /// The public share path for a catalog, e.g. `/visualizar/moda-verao-2025`
    pub fn public_path(catalog: &Catalog) -> String {
        format!("{}/{}", PUBLIC_VIEWER_PREFIX, catalog.slug)
    }

    /// Seed the demo catalogs shown on a fresh install
    ///
    /// Writes only when the collection is absent, so existing data is
    /// never touched. Returns `true` on the run that seeded.
    pub fn seed_demo(&self) -> Result<bool, CatalogError> {
        if self.kv.get(CATALOGS_KEY)?.is_some() {
            return Ok(false);
        }

        let demos = [
            (
                "Catálogo de Teste",
                "Catálogo de demonstração do sistema",
                "teste",
                629_146u64,
                110u32,
                "sample-catalog.pdf",
            ),
            (
                "Catálogo Eletrônicos 2025",
                "Últimos lançamentos em eletrônicos",
                "TechStore",
                2_202_010,
                85,
                "electronics-catalog.pdf",
            ),
            (
                "Moda Verão 2025",
                "Coleção completa de verão",
                "FashionPlus",
                4_508_877,
                156,
                "summer-fashion.pdf",
            ),
        ];

        let catalogs: Vec<Catalog> = demos
            .into_iter()
            .map(|(title, description, brand, size, pages, file_name)| {
                let mut catalog = Catalog::new(
                    title,
                    Some(description.to_string()),
                    brand,
                    &FileMeta::new(file_name, size),
                    pages,
                );
                catalog.status = CatalogStatus::Converted;
                catalog
            })
            .collect();
        self.save_all(&catalogs)?;

        info!("Seeded {} demo catalogs", catalogs.len());
        Ok(true)
    }

    /// Completion step of the conversion job
    fn finish_conversion(&self, id: Uuid) -> Result<Catalog, CatalogError> {
        let status = if self.get(id)?.ok_or(CatalogError::NotFound(id))?.pages == 0 {
            warn!("Catalog {} has no readable pages, marking as failed", id);
            CatalogStatus::Error
        } else {
            CatalogStatus::Converted
        };
        self.set_status(id, status)
    }

    /// Set a record's status and persist the collection
    fn set_status(&self, id: Uuid, status: CatalogStatus) -> Result<Catalog, CatalogError> {
        let mut catalogs = self.list()?;
        let slot = catalogs
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CatalogError::NotFound(id))?;
        slot.status = status;
        let updated = slot.clone();
        self.save_all(&catalogs)?;

        debug!("Catalog {} is now {}", id, status);
        Ok(updated)
    }

    /// Persist the whole collection
    fn save_all(&self, catalogs: &[Catalog]) -> Result<(), CatalogError> {
        let value = serde_json::to_value(catalogs).map_err(|e| StoreError::Serialization {
            key: CATALOGS_KEY.to_string(),
            source: e,
        })?;
        self.kv.set(CATALOGS_KEY, &value)?;
        Ok(())
    }
}

/// Handle to a running conversion job
///
/// Await [`wait`](Self::wait) for the converted record, or
/// [`cancel`](Self::cancel) to abort. Dropping the handle detaches the
/// job; it will still complete and write its result.
#[derive(Debug)]
pub struct ConversionJob {
    catalog_id: Uuid,
    handle: JoinHandle<Result<Catalog, CatalogError>>,
}

impl ConversionJob {
    /// The catalog this job is converting
    pub fn catalog_id(&self) -> Uuid {
        self.catalog_id
    }

    /// Abort the job before its completion write
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Wait for the job to finish and return the updated record
    pub async fn wait(self) -> Result<Catalog, CatalogError> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => match e.try_into_panic() {
                Ok(panic) => std::panic::resume_unwind(panic),
                Err(_) => Err(CatalogError::ConversionCancelled),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileKvStore, MemoryKvStore};
    use tempfile::TempDir;

    fn test_config() -> Config {
        Config {
            conversion_delay_ms: 0,
            ..Config::default()
        }
    }

    fn registry() -> CatalogRegistry {
        CatalogRegistry::new(Arc::new(MemoryKvStore::new()), &test_config())
    }

    fn pdf_bytes(pages: u32) -> Vec<u8> {
        let mut data = b"%PDF-1.4\n".to_vec();
        data.extend_from_slice(b"<< /Type /Pages /Kids [] >>\n");
        for _ in 0..pages {
            data.extend_from_slice(b"<< /Type /Page >>\n");
        }
        data
    }

    fn draft(title: &str, brand: &str) -> CatalogDraft {
        CatalogDraft {
            title: title.to_string(),
            description: Some("Seasonal collection".to_string()),
            brand: brand.to_string(),
            file: FileMeta::new("catalog.pdf", 1024),
        }
    }

    #[test]
    fn test_list_empty() {
        assert!(registry().list().unwrap().is_empty());
    }

    #[test]
    fn test_create_and_list() {
        let registry = registry();
        let catalog = registry
            .create(draft("Moda Verão 2025", "FashionPlus"), &pdf_bytes(12))
            .unwrap();

        assert_eq!(catalog.slug, "moda-verao-2025");
        assert_eq!(catalog.status, CatalogStatus::Converting);
        assert_eq!(catalog.pages, 12);
        assert_eq!(catalog.file_size, "0.0 MB");

        let listed = registry.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], catalog);
    }

    #[test]
    fn test_create_preserves_insertion_order() {
        let registry = registry();
        registry.create(draft("First", "B"), &pdf_bytes(1)).unwrap();
        registry.create(draft("Second", "B"), &pdf_bytes(1)).unwrap();
        registry.create(draft("Third", "B"), &pdf_bytes(1)).unwrap();

        let titles: Vec<_> = registry
            .list()
            .unwrap()
            .into_iter()
            .map(|c| c.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_create_rejects_empty_title() {
        let registry = registry();
        let err = registry
            .create(draft("   ", "Brand"), &pdf_bytes(5))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation("title")));
        // No store write happened
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_empty_brand() {
        let registry = registry();
        let err = registry
            .create(draft("Title", ""), &pdf_bytes(5))
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation("brand")));
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_non_pdf_bytes() {
        let registry = registry();
        let err = registry
            .create(draft("Title", "Brand"), b"PK\x03\x04 not a pdf")
            .unwrap_err();
        assert!(matches!(err, CatalogError::FileType { .. }));
        assert!(registry.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_rejects_wrong_extension() {
        let registry = registry();
        let mut d = draft("Title", "Brand");
        d.file = FileMeta::new("catalog.docx", 1024);
        let err = registry.create(d, &pdf_bytes(5)).unwrap_err();
        assert!(matches!(err, CatalogError::FileType { .. }));
    }

    #[test]
    fn test_create_rejects_oversized_file() {
        let config = Config {
            max_upload_bytes: 1000,
            conversion_delay_ms: 0,
            ..Config::default()
        };
        let registry = CatalogRegistry::new(Arc::new(MemoryKvStore::new()), &config);

        let err = registry
            .create(draft("Title", "Brand"), &pdf_bytes(5))
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::FileSize {
                size: 1024,
                limit: 1000
            }
        ));
        assert!(registry.list().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conversion_completes() {
        let registry = registry();
        let catalog = registry
            .create(draft("Title", "Brand"), &pdf_bytes(8))
            .unwrap();

        let job = registry.start_conversion(catalog.id).unwrap();
        assert_eq!(job.catalog_id(), catalog.id);

        let converted = job.wait().await.unwrap();
        assert_eq!(converted.status, CatalogStatus::Converted);
        assert!(registry.get(catalog.id).unwrap().unwrap().is_published());
    }

    #[tokio::test]
    async fn test_conversion_fails_on_zero_pages() {
        let registry = registry();
        let catalog = registry
            .create(draft("Title", "Brand"), &pdf_bytes(0))
            .unwrap();

        let converted = registry
            .start_conversion(catalog.id)
            .unwrap()
            .wait()
            .await
            .unwrap();
        assert_eq!(converted.status, CatalogStatus::Error);
    }

    #[tokio::test]
    async fn test_conversion_cancel_leaves_record_converting() {
        let config = Config {
            conversion_delay_ms: 60_000,
            ..Config::default()
        };
        let registry = CatalogRegistry::new(Arc::new(MemoryKvStore::new()), &config);
        let catalog = registry
            .create(draft("Title", "Brand"), &pdf_bytes(8))
            .unwrap();

        let job = registry.start_conversion(catalog.id).unwrap();
        job.cancel();

        let err = job.wait().await.unwrap_err();
        assert!(matches!(err, CatalogError::ConversionCancelled));
        // The completion write never happened
        assert_eq!(
            registry.get(catalog.id).unwrap().unwrap().status,
            CatalogStatus::Converting
        );
    }

    #[tokio::test]
    async fn test_start_conversion_unknown_id() {
        let registry = registry();
        let err = registry.start_conversion(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let registry = registry();
        let a = registry.create(draft("Alpha", "B"), &pdf_bytes(3)).unwrap();
        let b = registry.create(draft("Beta", "B"), &pdf_bytes(4)).unwrap();
        let c = registry.create(draft("Gamma", "B"), &pdf_bytes(5)).unwrap();

        registry.delete(b.id).unwrap();

        let remaining = registry.list().unwrap();
        assert_eq!(remaining, vec![a, c]);
    }

    #[test]
    fn test_delete_unknown_id() {
        let registry = registry();
        let err = registry.delete(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_by_slug_and_published() {
        let registry = registry();
        let catalog = registry
            .create(draft("Catálogo de Teste", "teste"), &pdf_bytes(2))
            .unwrap();

        // Present by slug, but not yet public
        assert!(registry
            .find_by_slug("catalogo-de-teste")
            .unwrap()
            .is_some());
        assert!(registry
            .find_published("catalogo-de-teste")
            .unwrap()
            .is_none());

        registry
            .start_conversion(catalog.id)
            .unwrap()
            .wait()
            .await
            .unwrap();
        assert!(registry
            .find_published("catalogo-de-teste")
            .unwrap()
            .is_some());

        assert!(registry.find_by_slug("missing").unwrap().is_none());
    }

    #[test]
    fn test_search() {
        let registry = registry();
        registry
            .create(draft("Eletrônicos 2025", "TechStore"), &pdf_bytes(2))
            .unwrap();
        registry
            .create(draft("Moda Verão", "FashionPlus"), &pdf_bytes(2))
            .unwrap();

        let hits = registry.search("eletrônicos").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Eletrônicos 2025");

        // Matches descriptions too
        let hits = registry.search("seasonal").unwrap();
        assert_eq!(hits.len(), 2);

        assert!(registry.search("nothing").unwrap().is_empty());
    }

    #[test]
    fn test_update() {
        let registry = registry();
        let mut catalog = registry
            .create(draft("Title", "Brand"), &pdf_bytes(2))
            .unwrap();

        catalog.set_description(Some("Updated copy".to_string()));
        registry.update(&catalog).unwrap();

        let reloaded = registry.get(catalog.id).unwrap().unwrap();
        assert_eq!(reloaded.description.as_deref(), Some("Updated copy"));
    }

    #[test]
    fn test_update_unknown_id() {
        let registry = registry();
        let catalog = Catalog::new("X", None, "Y", &FileMeta::new("x.pdf", 1), 1);
        assert!(matches!(
            registry.update(&catalog).unwrap_err(),
            CatalogError::NotFound(_)
        ));
    }

    #[test]
    fn test_public_path() {
        let catalog = Catalog::new("Moda Verão 2025", None, "B", &FileMeta::new("m.pdf", 1), 1);
        assert_eq!(
            CatalogRegistry::public_path(&catalog),
            "/visualizar/moda-verao-2025"
        );
    }

    #[test]
    fn test_seed_demo_only_when_absent() {
        let registry = registry();

        assert!(registry.seed_demo().unwrap());
        let seeded = registry.list().unwrap();
        assert_eq!(seeded.len(), 3);
        assert!(seeded.iter().all(|c| c.is_published()));
        assert_eq!(seeded[0].slug, "catalogo-de-teste");

        // A second run leaves existing data alone
        assert!(!registry.seed_demo().unwrap());
        assert_eq!(registry.list().unwrap(), seeded);
    }

    #[test]
    fn test_seed_demo_respects_existing_collection() {
        let registry = registry();
        registry.create(draft("Mine", "B"), &pdf_bytes(1)).unwrap();

        assert!(!registry.seed_demo().unwrap());
        assert_eq!(registry.list().unwrap().len(), 1);
    }

    #[test]
    fn test_records_round_trip_through_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let kv: Arc<dyn KvStore> = Arc::new(FileKvStore::new(temp_dir.path()));

        let registry = CatalogRegistry::new(Arc::clone(&kv), &test_config());
        let created = registry
            .create(draft("Catálogo Primavera 2024", "Leililind"), &pdf_bytes(24))
            .unwrap();

        // A fresh registry over the same directory sees the identical record
        let reopened = CatalogRegistry::new(Arc::new(FileKvStore::new(temp_dir.path())), &test_config());
        let loaded = reopened.get(created.id).unwrap().unwrap();
        assert_eq!(loaded, created);
    }
}
