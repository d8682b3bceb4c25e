// completions command
use clap::Args;
use clap_complete::Shell;
use std::io;

/// Generate shell completion scripts
#[derive(Args)]
pub struct CompletionsCommand {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn execute(args: &CompletionsCommand, command: &mut clap::Command) -> anyhow::Result<()> {
    let name = command.get_name().to_string();
    clap_complete::generate(args.shell, command, name, &mut io::stdout());

    Ok(())
}
