use crate::output::print_json;
use crate::settings::Settings;
use dotclaude_core::afk::{self, AfkState, FileFlag};

/// `dotclaude afk [on|off]`: flip AFK mode, or force it.
pub fn run(settings: &Settings, state: Option<&str>, json: bool) -> anyhow::Result<()> {
    let request = state.map(str::parse::<AfkState>).transpose()?;
    let mut flag = FileFlag::new(&settings.afk_flag);
    let next = afk::toggle(&mut flag, request)?;

    if json {
        print_json(&serde_json::json!({
            "afk": next,
            "flag": flag.path(),
        }))?;
    } else {
        println!("AFK mode {next}");
    }
    Ok(())
}
