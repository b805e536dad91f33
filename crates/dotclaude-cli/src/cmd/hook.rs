use crate::settings::Settings;
use clap::Subcommand;
use dotclaude_core::afk::{self, FileFlag};
use dotclaude_core::alerts::AlertDb;
use dotclaude_core::hooks::{advisory, afk_notify, afk_stop, due_alerts};
use dotclaude_core::speech::{CommandSpeaker, Silent, Speaker};

// ---------------------------------------------------------------------------
// Subcommand tree
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum HookSubcommand {
    /// PreToolUse: add an advisory note when the trigger tool is used
    Advisory,

    /// Notification: speak a canned phrase while AFK mode is on
    AfkNotify,

    /// Stop: while AFK, ask the assistant to speak and listen before stopping
    AfkStop,

    /// UserPromptSubmit: print alerts that have come due
    Alerts,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Hooks always succeed: problems are logged to stderr and the host sees a
/// neutral response with exit code 0.
pub fn run(settings: &Settings, subcommand: HookSubcommand) -> anyhow::Result<()> {
    match subcommand {
        HookSubcommand::Advisory => {
            let out = advisory::evaluate(&read_stdin(), &settings.config.advisory.trigger_tool);
            println!("{}", out.to_json());
        }

        HookSubcommand::AfkNotify => {
            // Flag check comes before anything else touches stdin.
            let state = afk::current(&FileFlag::new(&settings.afk_flag));
            if !state.is_on() {
                return Ok(());
            }
            let speaker: Box<dyn Speaker> =
                match CommandSpeaker::resolve(settings.config.speech.command.as_deref()) {
                    Some(s) => Box::new(s),
                    None => Box::new(Silent),
                };
            afk_notify::handle(&read_stdin(), state, speaker.as_ref());
        }

        HookSubcommand::AfkStop => {
            let state = afk::current(&FileFlag::new(&settings.afk_flag));
            if !state.is_on() {
                return Ok(());
            }
            if let Some(out) = afk_stop::evaluate(&read_stdin(), state, &settings.afk_flag) {
                println!("{}", out.to_json());
            }
        }

        HookSubcommand::Alerts => {
            let db_path = settings.alerts_db();
            // No database yet means nothing was ever scheduled.
            if !db_path.exists() {
                return Ok(());
            }
            let now = chrono::Local::now().naive_local();
            match AlertDb::open(&db_path).and_then(|db| due_alerts::check(&db, now)) {
                Ok(Some(text)) => println!("{text}"),
                Ok(None) => {}
                Err(e) => tracing::warn!("alert check failed: {e}"),
            }
        }
    }
    Ok(())
}

fn read_stdin() -> String {
    std::io::read_to_string(std::io::stdin()).unwrap_or_else(|e| {
        tracing::warn!("failed to read hook input: {e}");
        String::new()
    })
}
