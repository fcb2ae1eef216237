//! Viewer command handler
//!
//! Opens a published catalog and drives the viewer state machine from
//! stdin. Without a TTY (or in json/quiet mode) it prints the opening
//! state once and returns.

use std::io::{self, BufRead, Write};

use anyhow::Result;

use folheto_core::{Catalog, Store, ViewerState};

use crate::output::{Output, OutputFormat};

/// Open a catalog for viewing
pub fn view(store: &Store, slug: String, output: &Output) -> Result<()> {
    let catalog = store
        .catalogs()
        .find_published(&slug)?
        .ok_or_else(|| anyhow::anyhow!("No published catalog with slug: {}", slug))?;

    let mut state = ViewerState::with_bounds(catalog.pages, store.zoom_bounds());

    let interactive = output.format == OutputFormat::Human && atty::is(atty::Stream::Stdin);
    if !interactive {
        match output.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "slug": catalog.slug,
                        "title": catalog.title,
                        "pages": catalog.pages,
                        "page": state.page(),
                        "zoom": state.zoom(),
                        "rotation": state.rotation()
                    })
                );
            }
            _ => println!("{}", status_line(&catalog, &state)),
        }
        return Ok(());
    }

    println!("Viewing: {} ({})", catalog.title, catalog.brand);
    println!("Keys: n)ext p)rev f)irst l)ast g <page> +/- zoom r)otate 0 reset q)uit");
    println!("{}", status_line(&catalog, &state));

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let mut parts = line.trim().split_whitespace();
        match parts.next() {
            Some("n") | Some("next") => state.next_page(),
            Some("p") | Some("prev") => state.prev_page(),
            Some("f") | Some("first") => state.first_page(),
            Some("l") | Some("last") => state.last_page_jump(),
            Some("g") | Some("goto") => match parts.next().and_then(|n| n.parse().ok()) {
                Some(page) => state.go_to(page),
                None => {
                    println!("Usage: g <page>");
                    continue;
                }
            },
            Some("+") => state.zoom_in(),
            Some("-") => state.zoom_out(),
            Some("r") | Some("rotate") => state.rotate(),
            Some("0") | Some("reset") => state.reset(),
            Some("q") | Some("quit") => break,
            Some(other) => {
                println!("Unknown command: {}", other);
                continue;
            }
            None => {}
        }

        println!("{}", status_line(&catalog, &state));
    }

    Ok(())
}

/// One-line rendering of the current viewer state
fn status_line(catalog: &Catalog, state: &ViewerState) -> String {
    format!(
        "page {}/{}  zoom {}%  rotation {}°",
        state.page(),
        catalog.pages,
        (state.zoom() * 100.0).round() as u32,
        state.rotation()
    )
}
