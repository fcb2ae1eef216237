//! User management command handlers

use anyhow::{bail, Context, Result};
use uuid::Uuid;

use folheto_core::{Role, Store, User};

use crate::commands::auth::require_admin;
use crate::output::Output;
use crate::prompt::{confirm, prompt_password};

/// Create a new account
pub fn add(
    store: &Store,
    username: String,
    role: Role,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    require_admin(store)?;

    let password = match password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };

    let user = store
        .identity()
        .add_user(&username, &password, role)
        .context("Failed to create user")?;

    output.success(&format!("Created user: {}", user.username));
    output.print_user(&user);
    Ok(())
}

/// List all accounts
pub fn list(store: &Store, output: &Output) -> Result<()> {
    require_admin(store)?;

    let users = store.identity().list_users()?;
    output.print_users(&users);
    Ok(())
}

/// Change an account's password
pub fn passwd(
    store: &Store,
    reference: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    require_admin(store)?;

    let user = resolve_user(store, &reference)?;
    let password = match password {
        Some(p) => p,
        None => prompt_password("New password")?,
    };

    store
        .identity()
        .change_password(user.id, &password)
        .context("Failed to change password")?;

    output.success(&format!("Password changed for {}", user.username));
    Ok(())
}

/// Delete an account
pub fn delete(store: &Store, reference: String, output: &Output) -> Result<()> {
    let acting = require_admin(store)?;

    let user = resolve_user(store, &reference)?;

    if output.should_prompt() {
        println!("Delete user: {} - {}", &user.id.to_string()[..8], user.username);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .identity()
        .delete_user(user.id, &acting)
        .context("Failed to delete user")?;

    output.success(&format!("Deleted user: {}", user.username));
    Ok(())
}

/// Resolve a user reference: full UUID, UUID prefix, or username
fn resolve_user(store: &Store, reference: &str) -> Result<User> {
    let users = store.identity().list_users()?;

    if let Ok(id) = Uuid::parse_str(reference) {
        return users
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| anyhow::anyhow!("User not found: {}", reference));
    }

    if let Some(user) = users.iter().find(|u| u.username == reference) {
        return Ok(user.clone());
    }

    let matches: Vec<_> = users
        .iter()
        .filter(|u| u.id.to_string().starts_with(reference))
        .collect();

    match matches.len() {
        0 => bail!("No user found matching: {}", reference),
        1 => Ok(matches[0].clone()),
        _ => {
            eprintln!("Multiple users match '{}':", reference);
            for user in &matches {
                eprintln!("  {} - {}", user.id, user.username);
            }
            bail!("Ambiguous reference. Please provide more characters.");
        }
    }
}
