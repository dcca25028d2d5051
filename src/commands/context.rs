use crate::giveaway::models::Participant;

// Who has sent the command. Passed to every command invocation.
#[derive(Debug, Clone)]
pub struct CommandContext {
    author: Participant,
}

impl CommandContext {
    pub fn new(author: Participant) -> Self {
        CommandContext { author }
    }

    pub fn author(&self) -> &Participant {
        &self.author
    }
}
