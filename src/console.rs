use lazy_static::lazy_static;
use regex::Regex;

use crate::commands::{CommandContext, CommandOutput};
use crate::error::{Error, Result};
use crate::giveaway::models::{Giveaway, Participant, Reward};

lazy_static! {
    static ref LINE_REGEX: Regex =
        Regex::new(r"^\s*(?P<user_id>\d+):(?P<username>[^\s]+)\s+(?P<command>.+?)\s*$").unwrap();
}

// A line read from the console: the author and the command they have sent.
#[derive(Debug, Clone)]
pub struct ConsoleLine {
    pub context: CommandContext,
    pub command: String,
}

// Parses the `<user-id>:<username> <command>` line. A literal `\n` inside
// the command stands for a line break, so `gaddm` fits on one console line.
pub fn parse_line(line: &str) -> Result<ConsoleLine> {
    let captures = match LINE_REGEX.captures(line) {
        Some(captures) => captures,
        None => {
            let message = "Expected a line in the `<user-id>:<username> <command>` format.".to_string();
            return Err(Error::Command(message));
        }
    };

    let user_id = captures["user_id"]
        .parse::<u64>()
        .map_err(|err| Error::Command(format!("Invalid user id: {}.", err)))?;
    let participant = Participant::new(user_id, &captures["username"]);

    Ok(ConsoleLine {
        context: CommandContext::new(participant),
        command: captures["command"].replace("\\n", "\n"),
    })
}

pub fn render(output: &CommandOutput) -> String {
    match output {
        CommandOutput::Giveaways(giveaways) => match giveaways.is_empty() {
            true => "There are no giveaways.".to_string(),
            false => giveaways
                .iter()
                .map(render_giveaway)
                .collect::<Vec<String>>()
                .join("\n"),
        },
        CommandOutput::Giveaway(giveaway) => render_giveaway(giveaway),
        CommandOutput::Deleted(giveaway) => format!("Deleted giveaway #{}.", giveaway.id()),
        CommandOutput::Rewards(rewards) => match rewards.is_empty() {
            true => "There are no rewards.".to_string(),
            false => rewards
                .iter()
                .enumerate()
                .map(|(index, reward)| format!("{}. {}", index + 1, render_reward(reward)))
                .collect::<Vec<String>>()
                .join("\n"),
        },
        CommandOutput::Reward(reward) => render_reward(reward),
        CommandOutput::Removed(reward) => format!("Removed {}.", reward.value()),
        CommandOutput::Help(commands) => commands
            .iter()
            .map(|info| format!("{:<40} {}", info.usage, info.description))
            .collect::<Vec<String>>()
            .join("\n"),
    }
}

pub fn render_error(err: &Error) -> String {
    format!("Error: {}", err)
}

fn render_giveaway(giveaway: &Giveaway) -> String {
    format!(
        "#{} [{}] {} (participants: {})",
        giveaway.id(),
        giveaway.state().as_str(),
        giveaway.description(),
        giveaway.participants().len()
    )
}

fn render_reward(reward: &Reward) -> String {
    let mut text = format!(
        "[{}/{}] {}",
        reward.object_type().as_str(),
        reward.object_state().as_str(),
        reward.value()
    );
    if let Some(info) = reward.object_info() {
        text.push_str(&format!(" {}", info));
    }
    if let Some(description) = reward.description() {
        text.push_str(&format!(" -> {}", description));
    }
    if let Some(holder) = reward.holder() {
        text.push_str(&format!(" (holder: {})", holder.get_username()));
    }
    text
}
