use anyhow::{Context, Result};
use sheetsync::{config::Config, fetch::RestSource, session::Session, table::Table};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) load config ──────────────────────────────────────────────
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sheetsync.yaml"));
    let config = Config::load(&config_path)?;
    info!(
        spreadsheet = %config.spreadsheet_id,
        worksheets = config.worksheets.len(),
        "configured"
    );

    // ─── 3) build source + session ───────────────────────────────────
    let source = RestSource::new(
        &config.base_url,
        &config.spreadsheet_id,
        &config.credentials_path,
    )
    .context("building spreadsheet source")?;
    let mut session = Session::new(
        source,
        config.worksheets.clone(),
        config.boolean_keywords.clone(),
        config.cache_ttl(),
    );

    // ─── 4) fetch + render ───────────────────────────────────────────
    let snapshot = match session.load() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, "load failed");
            println!("warning: {}", e);
            return Ok(());
        }
    };

    println!(
        "data as of {}",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for sheet in &snapshot.sheets {
        println!("\n== {} ==", sheet.name);
        if let Some(err) = &sheet.error {
            println!("warning: {}", err);
            continue;
        }
        if sheet.table.is_empty() {
            println!("(no data)");
            continue;
        }
        print_table(&sheet.table);
    }

    Ok(())
}

/// Fixed-width text rendering, a stand-in for the editable grid.
fn print_table(table: &Table) {
    let widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|c| {
            c.cells
                .iter()
                .map(|cell| cell.to_string().chars().count())
                .max()
                .unwrap_or(0)
                .max(c.name.chars().count())
        })
        .collect();

    let header: Vec<String> = table
        .columns()
        .iter()
        .zip(&widths)
        .map(|(c, &w)| format!("{:width$}", c.name, width = w))
        .collect();
    println!("{}", header.join(" | "));

    for row in 0..table.row_count() {
        let cells: Vec<String> = table
            .columns()
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{:width$}", c.cells[row].to_string(), width = w))
            .collect();
        println!("{}", cells.join(" | "));
    }
}
