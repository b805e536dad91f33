use crate::output::{describe, print_json};
use crate::settings::Settings;
use dotclaude_core::link;
use std::path::Path;

/// `dotclaude uninstall`: remove managed symlinks. Never fails; config and
/// per-link problems are reported as warnings.
pub fn run(
    root: &Path,
    target: Option<&Path>,
    afk_flag: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let loaded = Settings::load_tolerant(root, target, afk_flag).and_then(|s| {
        let specs = s.link_specs()?;
        Ok((s, specs))
    });
    let (settings, specs) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("warning: nothing removed: {e:#}");
            return Ok(());
        }
    };
    let reports = link::uninstall(&specs);

    if json {
        return print_json(&reports);
    }

    println!("Removing links from: {}", settings.target_dir.display());
    for report in &reports {
        println!("{}", describe(report));
    }
    if reports.iter().any(|r| r.action.is_failure()) {
        println!("\nSome links could not be removed; see above.");
    } else {
        println!("\nDone. Backups were left in place.");
    }
    Ok(())
}
