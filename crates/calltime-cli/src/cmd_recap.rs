use calltime_core::{RecapSnapshot, SlideKind};
use calltime_store::Config;

/// Fetch one recap on a short-lived runtime.
pub fn fetch(config: &Config) -> anyhow::Result<RecapSnapshot> {
    let source = calltime_client::recap_source(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let snapshot = rt.block_on(source.fetch(&config.user_id, config.year))?;
    tracing::info!(user_id = %snapshot.user_id, year = snapshot.year, "recap loaded");
    Ok(snapshot)
}

/// Print every slide as plain text.
pub fn print_slides(snapshot: &RecapSnapshot) {
    for kind in SlideKind::SEQUENCE {
        for line in crate::present::slide_lines(kind, snapshot) {
            println!("{line}");
        }
        println!();
    }
}

/// `calltime recap [--json]`
pub fn execute(config: &Config, json: bool) -> anyhow::Result<()> {
    let snapshot = fetch(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_slides(&snapshot);
    }
    Ok(())
}
