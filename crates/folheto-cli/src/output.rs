//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use folheto_core::{Catalog, CatalogRegistry, User};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single catalog in full
    pub fn print_catalog(&self, catalog: &Catalog) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", catalog.id);
                println!("Title:       {}", catalog.title);
                println!("Brand:       {}", catalog.brand);
                if let Some(ref desc) = catalog.description {
                    println!("Description: {}", desc);
                }
                println!("Status:      {}", catalog.status);
                println!("Pages:       {}", catalog.pages);
                println!("Size:        {}", catalog.file_size);
                println!("File:        {}", catalog.file_name);
                println!("Uploaded:    {}", catalog.uploaded_at.format("%Y-%m-%d %H:%M"));
                println!("Slug:        {}", catalog.slug);
                if catalog.is_published() {
                    println!("Share path:  {}", CatalogRegistry::public_path(catalog));
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(catalog).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", catalog.id);
            }
        }
    }

    /// Print a list of catalogs
    pub fn print_catalogs(&self, catalogs: &[Catalog]) {
        match self.format {
            OutputFormat::Human => {
                if catalogs.is_empty() {
                    println!("No catalogs found.");
                    return;
                }
                for catalog in catalogs {
                    println!(
                        "{} | {} | {} | {} | {} page(s)",
                        &catalog.id.to_string()[..8],
                        truncate(&catalog.title, 35),
                        truncate(&catalog.brand, 15),
                        catalog.status,
                        catalog.pages
                    );
                }
                println!("\n{} catalog(s)", catalogs.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(catalogs).unwrap());
            }
            OutputFormat::Quiet => {
                for catalog in catalogs {
                    println!("{}", catalog.id);
                }
            }
        }
    }

    /// Print a single user
    pub fn print_user(&self, user: &User) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", user.id);
                println!("Username: {}", user.username);
                println!("Role:     {}", user.role);
                println!("Created:  {}", user.created_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(user).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", user.id);
            }
        }
    }

    /// Print a list of users
    pub fn print_users(&self, users: &[User]) {
        match self.format {
            OutputFormat::Human => {
                if users.is_empty() {
                    println!("No users found.");
                    return;
                }
                for user in users {
                    println!(
                        "{} | {} | {} | {}",
                        &user.id.to_string()[..8],
                        truncate(&user.username, 25),
                        user.role,
                        user.created_at.format("%Y-%m-%d")
                    );
                }
                println!("\n{} user(s)", users.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(users).unwrap());
            }
            OutputFormat::Quiet => {
                for user in users {
                    println!("{}", user.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // Accented titles must not split a character
        assert_eq!(truncate("Catálogo Eletrônicos", 10), "Catálog...");
    }
}
