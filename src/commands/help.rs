// Description of a command for the `help` output.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

static COMMANDS: [CommandInfo; 16] = [
    CommandInfo {
        name: "glist",
        usage: "glist",
        description: "Get a list of the giveaways",
    },
    CommandInfo {
        name: "gcreate",
        usage: "gcreate <description>",
        description: "Create a new giveaway",
    },
    CommandInfo {
        name: "gdescribe",
        usage: "gdescribe <giveaway> <description>",
        description: "Change the description of the giveaway",
    },
    CommandInfo {
        name: "gstart",
        usage: "gstart <giveaway>",
        description: "Start or resume the giveaway",
    },
    CommandInfo {
        name: "gdeactivate",
        usage: "gdeactivate <giveaway>",
        description: "Suspend the giveaway",
    },
    CommandInfo {
        name: "gfinish",
        usage: "gfinish <giveaway>",
        description: "Finish the giveaway when all rewards are resolved",
    },
    CommandInfo {
        name: "gdelete",
        usage: "gdelete <giveaway>",
        description: "Delete the giveaway with its rewards",
    },
    CommandInfo {
        name: "gjoin",
        usage: "gjoin <giveaway>",
        description: "Join the started giveaway",
    },
    CommandInfo {
        name: "gitems",
        usage: "gitems <giveaway>",
        description: "Get a list of the rewards in the giveaway",
    },
    CommandInfo {
        name: "gadd",
        usage: "gadd <giveaway> <reward>",
        description: "Add a reward in the `VALUE [info] -> description` format or as a plain text",
    },
    CommandInfo {
        name: "gaddm",
        usage: "gaddm <giveaway> followed by one reward per line",
        description: "Add multiple rewards at once",
    },
    CommandInfo {
        name: "gremove",
        usage: "gremove <giveaway> <reward>",
        description: "Remove the reward by its number",
    },
    CommandInfo {
        name: "groll",
        usage: "groll <giveaway> [reward]",
        description: "Roll a reward, or take the certain one by its number",
    },
    CommandInfo {
        name: "gconfirm",
        usage: "gconfirm <giveaway> <reward>",
        description: "Confirm that the rolled reward has been activated",
    },
    CommandInfo {
        name: "gdeny",
        usage: "gdeny <giveaway> <reward>",
        description: "Return the rolled reward back to the giveaway",
    },
    CommandInfo {
        name: "help",
        usage: "help",
        description: "Get a list of the available commands",
    },
];

pub fn get_commands_list() -> &'static [CommandInfo] {
    &COMMANDS
}
