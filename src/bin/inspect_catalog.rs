use anyhow::{Context, Result};
use po_compiler::mo::MoCatalog;
use std::path::PathBuf;
use tracing::info;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("inspect=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: inspect <catalog.mo>")?;

    let catalog = MoCatalog::open(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let header = &catalog.header;
    info!(
        "{}: magic {:#010x}, revision {}, {} entries, tables at {}/{}, {}",
        path.display(),
        header.magic,
        header.revision,
        header.count,
        header.origin_table_offset,
        header.translation_table_offset,
        if catalog.big_endian { "big-endian" } else { "little-endian" }
    );

    println!("{}", serde_json::to_string_pretty(&catalog)?);
    Ok(())
}
