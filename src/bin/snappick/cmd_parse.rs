use anyhow::Result;

use SnapPick::filter::parse_filter_expr;

pub fn exec(expr: &str) -> Result<()> {
    let range = parse_filter_expr(expr)?;
    println!("{}", serde_json::to_string(&range)?);
    Ok(())
}
