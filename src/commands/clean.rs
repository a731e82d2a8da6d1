//! Clean the publish directory

use std::fs;

use crate::error::{Error, Result};
use crate::Press;

/// Delete the publish directory and everything in it
pub fn run(press: &Press) -> Result<()> {
    if press.publish_dir.exists() {
        fs::remove_dir_all(&press.publish_dir).map_err(Error::io(&press.publish_dir))?;
        tracing::info!("Deleted: {:?}", press.publish_dir);
    }
    Ok(())
}
