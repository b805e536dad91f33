use crate::output::{print_json, print_table};
use crate::settings::Settings;
use anyhow::Context;
use clap::Subcommand;
use dotclaude_core::alerts::{self, AlertDb};

// ---------------------------------------------------------------------------
// Subcommand tree
// ---------------------------------------------------------------------------

#[derive(Subcommand)]
pub enum AlertSubcommand {
    /// Queue an alert
    Add {
        /// When: HH:MM, "YYYY-MM-DD HH:MM", +30m or +2h
        time: String,

        /// Alert text
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// List pending alerts
    List {
        /// Include acknowledged alerts
        #[arg(long)]
        all: bool,
    },

    /// Acknowledge (dismiss) an alert
    Ack {
        /// Alert ID
        id: u64,
    },
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(settings: &Settings, subcommand: AlertSubcommand, json: bool) -> anyhow::Result<()> {
    let db_path = settings.alerts_db();
    let db = AlertDb::open(&db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;

    match subcommand {
        AlertSubcommand::Add { time, message } => {
            let now = chrono::Local::now().naive_local();
            let due_at = alerts::parse_due(&time, now)?;
            let alert = db.add(due_at, message.join(" "))?;
            if json {
                print_json(&alert)?;
            } else {
                println!(
                    "Alert {} set for {}: {}",
                    alert.id,
                    alert.due_display(),
                    alert.message
                );
            }
            Ok(())
        }

        AlertSubcommand::List { all } => {
            let items = if all {
                db.list_all()?
            } else {
                db.list_pending()?
            };
            if json {
                return print_json(&items);
            }
            if items.is_empty() {
                println!("no alerts");
                return Ok(());
            }
            print_table(
                &["ID", "DUE", "STATUS", "MESSAGE"],
                items
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.due_display(),
                            if a.acknowledged { "acked" } else { "pending" }.to_string(),
                            a.message.clone(),
                        ]
                    })
                    .collect(),
            );
            Ok(())
        }

        AlertSubcommand::Ack { id } => {
            let alert = db.ack(id)?;
            if json {
                print_json(&alert)?;
            } else {
                println!("Alert {} acknowledged", alert.id);
            }
            Ok(())
        }
    }
}
