use calltime_store::{Config, StorePaths};

/// Launch the recap slideshow.
///
/// With the `tui` feature (default): opens the interactive ratatui carousel.
/// Without: prints every slide as plain text.
pub fn execute(paths: &StorePaths, config: Config) -> anyhow::Result<()> {
    #[cfg(feature = "tui")]
    {
        crate::tui::run(paths, config)
    }

    #[cfg(not(feature = "tui"))]
    {
        let _ = paths;
        eprintln!("calltime show (plain mode, rebuild with the `tui` feature for the slideshow)\n");
        let snapshot = crate::cmd_recap::fetch(&config)?;
        crate::cmd_recap::print_slides(&snapshot);
        Ok(())
    }
}
