use crate::output::{describe, print_json};
use crate::settings::Settings;
use dotclaude_core::link::{self, AssumeNo, AssumeYes, Confirm};
use std::io::Write;

/// Asks on the terminal. EOF or anything but y/yes declines.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        // Prompt on stderr so `--json` output stays parseable.
        eprint!("  {prompt} [y/N] ");
        let _ = std::io::stderr().flush();
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => {
                eprintln!();
                false
            }
            Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

/// `dotclaude install`: link every configured entry into the target dir.
///
/// Conflicts are backed up only after confirmation. Every link is attempted;
/// the command fails afterwards if any of them failed.
pub fn run(settings: &Settings, yes: bool, no: bool, json: bool) -> anyhow::Result<()> {
    let specs = settings.link_specs()?;

    let mut confirm: Box<dyn Confirm> = if yes {
        Box::new(AssumeYes)
    } else if no {
        Box::new(AssumeNo)
    } else {
        Box::new(TerminalConfirm)
    };

    if !json {
        println!(
            "Installing from: {}",
            settings.config.source_dir(&settings.root)?.display()
        );
        println!("            into: {}", settings.target_dir.display());
    }

    let reports = link::install(&specs, confirm.as_mut(), chrono::Local::now());

    if json {
        print_json(&reports)?;
    } else {
        for report in &reports {
            println!("{}", describe(report));
        }
    }

    let failed = reports.iter().filter(|r| r.action.is_failure()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} links could not be installed", reports.len());
    }

    if !json {
        println!("\nDone.");
    }
    Ok(())
}
