use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};
use crate::giveaway::models::GiveawayId;

lazy_static! {
    static ref COMMAND_REGEX: Regex =
        Regex::new(r"(?s)^(?P<name>[a-z]+)(?:\s+(?P<args>.*?))?\s*$").unwrap();
    static ref NUMBER_REGEX: Regex = Regex::new(r"^#?(?P<number>\d+)$").unwrap();
}

// A command line turned into the call it stands for.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Command {
    List,
    Create { description: String },
    Describe { giveaway: GiveawayId, description: String },
    Start { giveaway: GiveawayId },
    Deactivate { giveaway: GiveawayId },
    Finish { giveaway: GiveawayId },
    Delete { giveaway: GiveawayId },
    Join { giveaway: GiveawayId },
    Items { giveaway: GiveawayId },
    Add { giveaway: GiveawayId, text: String },
    AddMany { giveaway: GiveawayId, text: String },
    Remove { giveaway: GiveawayId, reward_number: usize },
    Roll { giveaway: GiveawayId, reward_number: Option<usize> },
    Confirm { giveaway: GiveawayId, reward_number: usize },
    Deny { giveaway: GiveawayId, reward_number: usize },
    Help,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::List => "glist",
            Command::Create { .. } => "gcreate",
            Command::Describe { .. } => "gdescribe",
            Command::Start { .. } => "gstart",
            Command::Deactivate { .. } => "gdeactivate",
            Command::Finish { .. } => "gfinish",
            Command::Delete { .. } => "gdelete",
            Command::Join { .. } => "gjoin",
            Command::Items { .. } => "gitems",
            Command::Add { .. } => "gadd",
            Command::AddMany { .. } => "gaddm",
            Command::Remove { .. } => "gremove",
            Command::Roll { .. } => "groll",
            Command::Confirm { .. } => "gconfirm",
            Command::Deny { .. } => "gdeny",
            Command::Help => "help",
        }
    }
}

// Parses a single `<prefix><name> [args]` line. Reward texts for `gaddm`
// go on the lines after the giveaway number.
pub fn parse_command(prefix: &str, line: &str) -> Result<Command> {
    let body = match line.trim_start().strip_prefix(prefix) {
        Some(body) => body,
        None => {
            let message = format!("The command must start with `{}`.", prefix);
            return Err(Error::Command(message));
        }
    };

    let captures = match COMMAND_REGEX.captures(body) {
        Some(captures) => captures,
        None => return Err(Error::Command("The command name is missing.".to_string())),
    };
    let name = captures.name("name").map_or("", |found| found.as_str());
    let args = captures.name("args").map_or("", |found| found.as_str());

    let command = match name {
        "glist" => {
            ensure_no_args(name, args)?;
            Command::List
        }
        "help" => {
            ensure_no_args(name, args)?;
            Command::Help
        }
        "gcreate" => Command::Create {
            description: required_text(name, args, "description")?,
        },
        "gdescribe" => {
            let (giveaway, rest) = split_giveaway(name, args)?;
            Command::Describe {
                giveaway,
                description: required_text(name, rest, "description")?,
            }
        }
        "gstart" => Command::Start {
            giveaway: single_giveaway(name, args)?,
        },
        "gdeactivate" => Command::Deactivate {
            giveaway: single_giveaway(name, args)?,
        },
        "gfinish" => Command::Finish {
            giveaway: single_giveaway(name, args)?,
        },
        "gdelete" => Command::Delete {
            giveaway: single_giveaway(name, args)?,
        },
        "gjoin" => Command::Join {
            giveaway: single_giveaway(name, args)?,
        },
        "gitems" => Command::Items {
            giveaway: single_giveaway(name, args)?,
        },
        "gadd" => {
            let (giveaway, rest) = split_giveaway(name, args)?;
            Command::Add {
                giveaway,
                text: required_text(name, rest, "reward")?,
            }
        }
        "gaddm" => {
            let (giveaway, rest) = split_giveaway(name, args)?;
            Command::AddMany {
                giveaway,
                text: required_text(name, rest, "rewards")?,
            }
        }
        "gremove" => {
            let (giveaway, reward_number) = giveaway_and_reward(name, args)?;
            Command::Remove {
                giveaway,
                reward_number,
            }
        }
        "groll" => {
            let (giveaway, rest) = split_giveaway(name, args)?;
            let reward_number = match rest.is_empty() {
                true => None,
                false => Some(parse_number(name, rest, "reward number")?),
            };
            Command::Roll {
                giveaway,
                reward_number,
            }
        }
        "gconfirm" => {
            let (giveaway, reward_number) = giveaway_and_reward(name, args)?;
            Command::Confirm {
                giveaway,
                reward_number,
            }
        }
        "gdeny" => {
            let (giveaway, reward_number) = giveaway_and_reward(name, args)?;
            Command::Deny {
                giveaway,
                reward_number,
            }
        }
        _ => {
            let message = format!("Unknown command `{}{}`.", prefix, name);
            return Err(Error::Command(message));
        }
    };

    Ok(command)
}

fn ensure_no_args(name: &str, args: &str) -> Result<()> {
    if !args.trim().is_empty() {
        let message = format!("The `{}` command doesn't take any more arguments.", name);
        return Err(Error::Command(message));
    }
    Ok(())
}

fn required_text(name: &str, text: &str, what: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        let message = format!("The `{}` command requires the {}.", name, what);
        return Err(Error::Command(message));
    }
    Ok(text.to_string())
}

fn parse_number(name: &str, text: &str, what: &str) -> Result<usize> {
    let number = NUMBER_REGEX
        .captures(text.trim())
        .and_then(|captures| captures.name("number"))
        .and_then(|found| found.as_str().parse::<usize>().ok());

    match number {
        Some(number) if number > 0 => Ok(number),
        _ => {
            let message = format!(
                "The `{}` command expects a positive {}, got `{}`.",
                name,
                what,
                text.trim()
            );
            Err(Error::Command(message))
        }
    }
}

// Takes the giveaway number off the front of the arguments.
fn split_giveaway<'a>(name: &str, args: &'a str) -> Result<(GiveawayId, &'a str)> {
    let args = args.trim_start();
    let (head, rest) = match args.find(char::is_whitespace) {
        Some(position) => (&args[..position], args[position..].trim()),
        None => (args, ""),
    };

    if head.is_empty() {
        let message = format!("The `{}` command requires the giveaway number.", name);
        return Err(Error::Command(message));
    }

    let number = parse_number(name, head, "giveaway number")?;
    Ok((GiveawayId(number as u64), rest))
}

fn single_giveaway(name: &str, args: &str) -> Result<GiveawayId> {
    let (giveaway, rest) = split_giveaway(name, args)?;
    ensure_no_args(name, rest)?;
    Ok(giveaway)
}

fn giveaway_and_reward(name: &str, args: &str) -> Result<(GiveawayId, usize)> {
    let (giveaway, rest) = split_giveaway(name, args)?;
    if rest.is_empty() {
        let message = format!("The `{}` command requires the reward number.", name);
        return Err(Error::Command(message));
    }
    Ok((giveaway, parse_number(name, rest, "reward number")?))
}
