//! Convoy command handlers.

use anyhow::{Context, Result};
use gtsh_core::convoy::ConvoyContext;

pub fn info(json: bool) -> Result<()> {
    let context = ConvoyContext::from_env();
    tracing::debug!(in_convoy = context.is_in_convoy(), "convoy context read");

    if json {
        let out = serde_json::to_string_pretty(&context).context("serialize convoy context")?;
        println!("{out}");
        return Ok(());
    }

    for line in context.report_lines() {
        println!("{line}");
    }
    Ok(())
}
