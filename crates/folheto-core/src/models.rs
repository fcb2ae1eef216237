//! Data models for Folheto
//!
//! Defines the core data structures: Catalog, User, and their supporting
//! enums. Records are serialized as JSON arrays in the key-value store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversion status of an uploaded catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogStatus {
    /// Upload accepted, conversion pipeline still running
    Converting,
    /// Ready for public viewing
    Converted,
    /// Conversion failed
    Error,
}

impl std::fmt::Display for CatalogStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CatalogStatus::Converting => "converting",
            CatalogStatus::Converted => "converted",
            CatalogStatus::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Metadata of an uploaded file, supplied by the caller alongside the bytes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileMeta {
    /// Original file name, e.g. `spring-2024.pdf`
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Whether the file name carries a `.pdf` extension
    pub fn has_pdf_extension(&self) -> bool {
        self.name
            .rsplit('.')
            .next()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }
}

/// A published (or publishing) PDF catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    /// Unique identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Brand the catalog belongs to
    pub brand: String,
    /// When the catalog was uploaded
    pub uploaded_at: DateTime<Utc>,
    /// Conversion status
    pub status: CatalogStatus,
    /// URL-safe slug derived from the title at creation time
    pub slug: String,
    /// Human-readable size label, e.g. `2.1 MB`
    pub file_size: String,
    /// Number of pages in the document
    pub pages: u32,
    /// Original file name
    pub file_name: String,
}

impl Catalog {
    /// Create a new catalog record from an accepted upload
    ///
    /// The slug is derived from the title and the size label from the file
    /// metadata. Status starts as `converting`.
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        brand: impl Into<String>,
        file: &FileMeta,
        pages: u32,
    ) -> Self {
        let title = title.into();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&title),
            title,
            description,
            brand: brand.into(),
            uploaded_at: Utc::now(),
            status: CatalogStatus::Converting,
            file_size: format_file_size(file.size),
            pages,
            file_name: file.name.clone(),
        }
    }

    /// Whether the catalog is ready for public viewing
    pub fn is_published(&self) -> bool {
        self.status == CatalogStatus::Converted
    }

    /// Update the title, re-deriving the slug
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.slug = slugify(&self.title);
    }

    /// Update the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }
}

/// Access role of a user account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::User => write!(f, "user"),
        }
    }
}

/// A user account as seen by callers; never carries the secret
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Login name, unique within the collection
    pub username: String,
    /// Access role
    pub role: Role,
    /// When this account was created
    pub created_at: DateTime<Utc>,
}

/// A user account as stored, including the login secret
///
/// Secrets are stored and compared in plaintext to match the behavior of
/// the system this replaces. Read paths hand out [`User`] via
/// [`UserRecord::to_user`] so the secret never leaves the identity store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    /// Login secret (plaintext)
    pub secret: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a new user record
    pub fn new(username: impl Into<String>, secret: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            secret: secret.into(),
            role,
            created_at: Utc::now(),
        }
    }

    /// The sanitized view of this record
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Derive a URL-safe slug from a title
///
/// Lowercases, strips diacritics, collapses runs of non-alphanumeric
/// characters to a single `-`, and trims leading/trailing separators.
/// Deterministic: the same title always yields the same slug.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_sep = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        let c = fold_accent(c);
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// Map accented Latin characters to their ASCII base letter
///
/// Covers the Latin-1 and Latin Extended-A ranges seen in catalog titles;
/// anything left non-alphanumeric is treated as a separator by `slugify`.
fn fold_accent(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'è'..='ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ì'..='ï' | 'ī' | 'į' => 'i',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò'..='ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ù'..='ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' | 'ś' => 's',
        'ž' | 'ź' | 'ż' => 'z',
        other => other,
    }
}

/// Format a byte count as the upload dialog's size label, e.g. `2.1 MB`
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}
