use crate::output::{print_json, print_table};
use crate::settings::Settings;
use dotclaude_core::link::{self, LinkState};

pub fn run(settings: &Settings, json: bool) -> anyhow::Result<()> {
    let statuses = link::status(&settings.link_specs()?);

    if json {
        return print_json(&statuses);
    }

    print_table(
        &["NAME", "KIND", "STATE", "TARGET"],
        statuses
            .iter()
            .map(|s| {
                let mut state = match s.state {
                    LinkState::Linked => "linked".to_string(),
                    LinkState::WrongTarget => match &s.points_to {
                        Some(p) => format!("wrong target ({})", p.display()),
                        None => "wrong target".to_string(),
                    },
                    LinkState::Conflict => "conflict".to_string(),
                    LinkState::Missing => "missing".to_string(),
                };
                if !s.source_exists {
                    state.push_str(", source missing");
                }
                vec![
                    s.name.clone(),
                    s.kind.to_string(),
                    state,
                    s.target.display().to_string(),
                ]
            })
            .collect(),
    );
    Ok(())
}
