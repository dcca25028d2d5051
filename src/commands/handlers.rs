use tracing::{info, instrument, warn};

use crate::commands::context::CommandContext;
use crate::commands::help::{get_commands_list, CommandInfo};
use crate::commands::parser::{parse_command, Command};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::giveaway::manager::GiveawayManager;
use crate::giveaway::models::{Giveaway, GiveawayId, Reward, RewardId};

// Result of a single command. Rendering is up to the caller.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CommandOutput {
    Giveaways(Vec<Giveaway>),
    Giveaway(Giveaway),
    Deleted(Giveaway),
    Rewards(Vec<Reward>),
    Reward(Reward),
    Removed(Reward),
    Help(&'static [CommandInfo]),
}

// Turns command lines into the calls of the giveaway engine.
#[derive(Clone)]
pub struct CommandHandler {
    manager: GiveawayManager,
    prefix: String,
}

impl CommandHandler {
    pub fn new(manager: GiveawayManager, config: &Config) -> Self {
        CommandHandler {
            manager,
            prefix: config.command_prefix().to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn manager(&self) -> &GiveawayManager {
        &self.manager
    }

    // Parses and runs the command line on behalf of the author.
    pub fn execute(&self, ctx: &CommandContext, line: &str) -> Result<CommandOutput> {
        let command = parse_command(&self.prefix, line)?;
        self.handle(ctx, command)
    }

    #[instrument(skip(self, ctx), fields(user = ctx.author().get_user_id()))]
    pub fn handle(&self, ctx: &CommandContext, command: Command) -> Result<CommandOutput> {
        info!(
            "Got command '{}' by user '{}'",
            command.name(),
            ctx.author().get_username()
        );

        let result = self.dispatch(ctx, command);
        if let Err(err) = &result {
            warn!("Command failed: {}", err);
        }
        result
    }

    fn dispatch(&self, ctx: &CommandContext, command: Command) -> Result<CommandOutput> {
        let registry = self.manager.registry();
        let inventory = self.manager.inventory();
        let allocator = self.manager.allocator();

        let output = match command {
            Command::List => CommandOutput::Giveaways(registry.list()?),
            Command::Create { description } => CommandOutput::Giveaway(registry.create(&description)?),
            Command::Describe {
                giveaway,
                description,
            } => CommandOutput::Giveaway(registry.describe(giveaway, &description)?),
            Command::Start { giveaway } => CommandOutput::Giveaway(registry.start(giveaway)?),
            Command::Deactivate { giveaway } => CommandOutput::Giveaway(registry.deactivate(giveaway)?),
            Command::Finish { giveaway } => CommandOutput::Giveaway(registry.finish(giveaway)?),
            Command::Delete { giveaway } => CommandOutput::Deleted(registry.delete(giveaway)?),
            Command::Join { giveaway } => CommandOutput::Giveaway(registry.join(giveaway, ctx.author())?),
            Command::Items { giveaway } => CommandOutput::Rewards(inventory.list(giveaway)?),
            Command::Add { giveaway, text } => CommandOutput::Reward(inventory.add_parsed(giveaway, &text)?),
            Command::AddMany { giveaway, text } => CommandOutput::Rewards(inventory.add_many(giveaway, &text)?),
            Command::Remove {
                giveaway,
                reward_number,
            } => {
                let reward_id = self.resolve_reward(giveaway, reward_number)?;
                CommandOutput::Removed(inventory.remove(reward_id)?)
            }
            Command::Roll {
                giveaway,
                reward_number,
            } => {
                let reward = match reward_number {
                    Some(number) => allocator.roll_numbered(giveaway, ctx.author(), number)?,
                    None => allocator.roll(giveaway, ctx.author())?,
                };
                CommandOutput::Reward(reward)
            }
            Command::Confirm {
                giveaway,
                reward_number,
            } => {
                let reward_id = self.resolve_reward(giveaway, reward_number)?;
                CommandOutput::Reward(allocator.confirm(reward_id)?)
            }
            Command::Deny {
                giveaway,
                reward_number,
            } => {
                let reward_id = self.resolve_reward(giveaway, reward_number)?;
                CommandOutput::Reward(allocator.deny(reward_id)?)
            }
            Command::Help => CommandOutput::Help(get_commands_list()),
        };

        Ok(output)
    }

    // Maps the 1-based number from the rewards list onto the reward id.
    fn resolve_reward(&self, giveaway: GiveawayId, reward_number: usize) -> Result<RewardId> {
        let rewards = self.manager.inventory().list(giveaway)?;
        match reward_number > 0 && reward_number < rewards.len() + 1 {
            true => Ok(rewards[reward_number - 1].id()),
            false => {
                let message = format!(
                    "The reward #{} was not found in the giveaway #{}.",
                    reward_number, giveaway
                );
                Err(Error::NotFound(message))
            }
        }
    }
}
