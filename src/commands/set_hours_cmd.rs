use crate::commands::base_commands::Commands;
use crate::services::hours_yaml::HoursStore;

pub fn set_hours_command(cmd: Commands) {
    if let Commands::SetHours {
        board,
        sprint,
        availability,
        burnup_budget,
        hours,
    } = cmd
    {
        let mut store = match HoursStore::load(&hours) {
            Ok(store) => store,
            Err(e) => {
                eprintln!("Failed to load hours: {e:?}");
                return;
            }
        };

        if let Some(availability) = availability {
            if let Err(e) = store.set_availability(board, sprint, availability) {
                eprintln!("Failed to set availability: {e:?}");
                return;
            }
        }
        if let Some(burnup_budget) = burnup_budget {
            if let Err(e) = store.set_burnup_budget(board, sprint, burnup_budget) {
                eprintln!("Failed to set burnup budget: {e:?}");
                return;
            }
        }

        if let Err(e) = store.save(&hours) {
            eprintln!("Failed to write hours: {e:?}");
            return;
        }

        let stored = store.get(board, sprint);
        println!(
            "Sprint {sprint} of board {board}: availability {} h, burnup budget {} h",
            stored.availability, stored.burnup_budget
        );
    }
}
