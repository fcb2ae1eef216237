//! Catalog command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use folheto_core::{Catalog, CatalogDraft, CatalogRegistry, FileMeta, Store};

use crate::commands::auth::require_admin;
use crate::output::Output;
use crate::prompt::confirm;

/// Upload a PDF and run it through conversion
pub async fn upload(
    store: &Store,
    file: PathBuf,
    title: String,
    brand: String,
    description: Option<String>,
    output: &Output,
) -> Result<()> {
    require_admin(store)?;

    let data = std::fs::read(&file).with_context(|| format!("Failed to read {:?}", file))?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let draft = CatalogDraft {
        title,
        description,
        brand,
        file: FileMeta::new(file_name, data.len() as u64),
    };

    let catalog = store
        .catalogs()
        .create(draft, &data)
        .context("Upload rejected")?;

    output.message("Processing...");
    let job = store
        .catalogs()
        .start_conversion(catalog.id)
        .context("Failed to start conversion")?;
    let catalog = job.wait().await.context("Conversion failed")?;

    output.success(&format!("Uploaded catalog: {}", catalog.slug));
    output.print_catalog(&catalog);
    Ok(())
}

/// List all catalogs
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let catalogs = store.catalogs().list()?;
    output.print_catalogs(&catalogs);
    Ok(())
}

/// Show a single catalog by id, id prefix, or slug
pub fn show(store: &Store, reference: String, output: &Output) -> Result<()> {
    let catalog = resolve_catalog(store, &reference)?;
    output.print_catalog(&catalog);
    Ok(())
}

/// Search catalogs by title or description
pub fn search(store: &Store, query: String, output: &Output) -> Result<()> {
    let catalogs = store.catalogs().search(&query)?;
    output.print_catalogs(&catalogs);
    Ok(())
}

/// Delete a catalog
pub fn delete(store: &Store, reference: String, output: &Output) -> Result<()> {
    require_admin(store)?;

    let catalog = resolve_catalog(store, &reference)?;

    if output.should_prompt() {
        println!(
            "Delete catalog: {} - {}",
            &catalog.id.to_string()[..8],
            catalog.title
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .catalogs()
        .delete(catalog.id)
        .context("Failed to delete catalog")?;

    output.success(&format!("Deleted catalog: {}", catalog.id));
    Ok(())
}

/// Print the public share path for a published catalog
pub fn link(store: &Store, slug: String, output: &Output) -> Result<()> {
    let catalog = store
        .catalogs()
        .find_published(&slug)?
        .ok_or_else(|| anyhow::anyhow!("No published catalog with slug: {}", slug))?;

    match output.format {
        crate::output::OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "slug": catalog.slug,
                    "path": CatalogRegistry::public_path(&catalog)
                })
            );
        }
        _ => println!("{}", CatalogRegistry::public_path(&catalog)),
    }
    Ok(())
}

/// Seed the demo catalogs on a fresh install
pub fn seed(store: &Store, output: &Output) -> Result<()> {
    if store.catalogs().seed_demo()? {
        output.success("Seeded demo catalogs");
    } else {
        output.message("Catalog collection already exists, nothing seeded.");
    }
    Ok(())
}

/// Resolve a catalog reference: full UUID, UUID prefix, or slug
pub fn resolve_catalog(store: &Store, reference: &str) -> Result<Catalog> {
    if let Ok(id) = Uuid::parse_str(reference) {
        return store
            .catalogs()
            .get(id)?
            .ok_or_else(|| anyhow::anyhow!("Catalog not found: {}", reference));
    }

    if let Some(catalog) = store.catalogs().find_by_slug(reference)? {
        return Ok(catalog);
    }

    // Fall back to id prefix match
    let catalogs = store.catalogs().list()?;
    let matches: Vec<_> = catalogs
        .iter()
        .filter(|c| c.id.to_string().starts_with(reference))
        .collect();

    match matches.len() {
        0 => bail!("No catalog found matching: {}", reference),
        1 => Ok(matches[0].clone()),
        _ => {
            eprintln!("Multiple catalogs match '{}':", reference);
            for catalog in &matches {
                eprintln!("  {} - {}", catalog.id, catalog.title);
            }
            bail!("Ambiguous reference. Please provide more characters.");
        }
    }
}
