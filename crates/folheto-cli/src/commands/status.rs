//! Status command handler

use anyhow::Result;

use folheto_core::{CatalogStatus, Store};

use crate::output::{Output, OutputFormat};

/// Show storage location, collection counts, and the current session
pub fn show(store: &Store, output: &Output) -> Result<()> {
    let catalogs = store.catalogs().list()?;
    let users = store.identity().list_users()?;
    let session = store.identity().current_user()?;

    let published = catalogs
        .iter()
        .filter(|c| c.status == CatalogStatus::Converted)
        .count();
    let converting = catalogs
        .iter()
        .filter(|c| c.status == CatalogStatus::Converting)
        .count();
    let failed = catalogs
        .iter()
        .filter(|c| c.status == CatalogStatus::Error)
        .count();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": store.config().data_dir,
                    "session": session,
                    "counts": {
                        "catalogs": catalogs.len(),
                        "published": published,
                        "converting": converting,
                        "failed": failed,
                        "users": users.len()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", catalogs.len());
        }
        OutputFormat::Human => {
            println!("Folheto Status");
            println!("==============");
            println!();
            println!("Storage:");
            println!("  Location: {}", store.config().data_dir.display());
            println!();
            println!("Catalogs: {}", catalogs.len());
            println!("  Published:  {}", published);
            println!("  Converting: {}", converting);
            println!("  Failed:     {}", failed);
            println!();
            println!("Users: {}", users.len());
            println!();
            match session {
                Some(user) => println!("Session: {} ({})", user.username, user.role),
                None => println!("Session: not logged in"),
            }
        }
    }

    Ok(())
}
