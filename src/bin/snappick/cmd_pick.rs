use anyhow::Result;

use SnapPick::config::SnapConfig;
use SnapPick::locator::SnapshotLocator;

/// Resolve filter expressions and print the selected files, ascending by version.
pub fn exec(cfg: &SnapConfig, exprs: &[String], json: bool) -> Result<()> {
    let locator = SnapshotLocator::from_config(cfg);
    let mut rng = cfg.rng();
    let files = locator.find(exprs, &mut rng)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
    } else {
        for f in files {
            println!("{}", f);
        }
    }
    Ok(())
}
