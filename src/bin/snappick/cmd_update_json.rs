use anyhow::Result;

use SnapPick::catalog::{catalog_update, DecompressInspector};
use SnapPick::config::SnapConfig;

pub fn exec(cfg: &SnapConfig) -> Result<()> {
    let inspector = DecompressInspector::new(cfg.bzcat.clone());
    let path = cfg.metadata_path();
    let upd = catalog_update(&cfg.project_root, &path, &inspector)?;

    for id in &upd.found {
        println!("Found {}", id);
    }
    if upd.changed {
        println!("Update {}", upd.path.display());
    } else {
        println!("No changes");
    }
    Ok(())
}
