//! Session command handlers

use anyhow::{bail, Context, Result};

use folheto_core::{Role, Store, User};

use crate::output::{Output, OutputFormat};
use crate::prompt::prompt_password;

/// Log in and open a session
pub fn login(store: &Store, username: String, password: Option<String>, output: &Output) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_password("Password")?,
    };

    let user = store
        .identity()
        .login(&username, &password)
        .context("Login failed")?;

    output.success(&format!("Logged in as {} ({})", user.username, user.role));
    Ok(())
}

/// Close the current session
pub fn logout(store: &Store, output: &Output) -> Result<()> {
    store.identity().logout().context("Logout failed")?;
    output.success("Logged out");
    Ok(())
}

/// Show the current session
pub fn whoami(store: &Store, output: &Output) -> Result<()> {
    match store.identity().current_user()? {
        Some(user) => match output.format {
            OutputFormat::Json | OutputFormat::Quiet => output.print_user(&user),
            OutputFormat::Human => {
                println!("{} ({})", user.username, user.role);
            }
        },
        None => output.message("Not logged in."),
    }
    Ok(())
}

/// The authenticated admin behind the current session
///
/// Management commands call this before mutating anything.
pub fn require_admin(store: &Store) -> Result<User> {
    let Some(user) = store.identity().current_user()? else {
        bail!("Not logged in. Run `folheto login <username>` first.");
    };

    if user.role != Role::Admin {
        bail!("This command requires an admin account.");
    }

    Ok(user)
}
