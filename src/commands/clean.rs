//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Wabisabi;

/// Delete the generated site. The post store is left alone.
pub fn run(app: &Wabisabi) -> Result<()> {
    if app.public_dir.exists() {
        fs::remove_dir_all(&app.public_dir)?;
        tracing::info!("Deleted: {:?}", app.public_dir);
    }
    Ok(())
}
