use super::CommandResult;

pub type CommandHandler = fn(CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub names: &'static [&'static str],
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.names.contains(&name))
}

const COMMANDS: &[Command] = &[
    Command {
        names: &["help"],
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        names: &["models"],
        usage: "/models",
        help: "List the models the endpoint offers.",
        handler: super::handle_models,
    },
    Command {
        names: &["context"],
        usage: "/context [full|summary|minimal]",
        help: "Show or change how much history is sent with each message.",
        handler: super::handle_context,
    },
    Command {
        names: &["save"],
        usage: "/save [path]",
        help: "Write the conversation to a JSON transcript.",
        handler: super::handle_save,
    },
    Command {
        names: &["load"],
        usage: "/load <path>",
        help: "Replace the conversation with a saved transcript.",
        handler: super::handle_load,
    },
    Command {
        names: &["exit", "bye", "quit"],
        usage: "/exit, /bye, /quit",
        help: "End the conversation.",
        handler: super::handle_exit,
    },
];
