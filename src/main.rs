use crate::cli::config::Config;
use crate::cmd::completions::{self, CompletionsCommand};
use crate::cmd::extension::add::{self, AddCommand};
use crate::cmd::extension::info::{self, InfoCommand};
use crate::cmd::extension::list::{self, ListCommand};
use crate::cmd::extension::remove::{self, RemoveCommand};
use crate::cmd::extension::scan::{self, ScanCommand};
use crate::cmd::extension::status::{self, StatusCommand};
use crate::cmd::extension::update::{self, UpdateCommand};
use clap::{crate_authors, crate_version, Args, CommandFactory, Parser, Subcommand};
use simplelog::{
    error, ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode,
};
use std::path::PathBuf;

mod cli;
mod cmd;
mod errors;

#[derive(Parser)]
#[clap(author = crate_authors!("\n"), version = crate_version!(), about = "Manage PostgreSQL extensions", long_about = None)]
struct App {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[clap(subcommand)]
    command: SubCommands,
}

// Enum representing all available commands
#[derive(Subcommand)]
enum SubCommands {
    #[clap(visible_aliases = ["l", "ls", "find"])]
    List(ListCommand),
    #[clap(visible_alias = "i")]
    Info(InfoCommand),
    #[clap(visible_aliases = ["a", "install", "ins"])]
    Add(AddCommand),
    #[clap(visible_aliases = ["r", "remove"])]
    Rm(RemoveCommand),
    #[clap(visible_aliases = ["u", "up", "upgrade"])]
    Update(UpdateCommand),
    #[clap(visible_aliases = ["s", "st", "stat"])]
    Status(StatusCommand),
    #[clap(visible_alias = "sc")]
    Scan(ScanCommand),
    Completions(CompletionsCommand),
}

#[derive(Args)]
struct GlobalOpts {
    /// Config file, defaults to ~/.config/pgext/config.toml
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logs
    #[clap(long, global = true)]
    debug: bool,
}

fn main() {
    let app = App::parse();

    let config = Config::load(&Config::full_path(app.global_opts.config.as_deref()));
    let level = match &config {
        _ if app.global_opts.debug => LevelFilter::Debug,
        Ok(config) => config.log_level(),
        Err(_) => LevelFilter::Info,
    };
    init_logger(level);

    let result = config.and_then(|config| run(app.command, &config));
    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(errors::exit_code(&e));
    }
}

fn run(command: SubCommands, config: &Config) -> Result<(), anyhow::Error> {
    match command {
        SubCommands::List(args) => list::execute(&args, config),
        SubCommands::Info(args) => info::execute(&args, config),
        SubCommands::Add(args) => add::execute(&args, config),
        SubCommands::Rm(args) => remove::execute(&args, config),
        SubCommands::Update(args) => update::execute(&args, config),
        SubCommands::Status(args) => status::execute(&args, config),
        SubCommands::Scan(args) => scan::execute(&args),
        SubCommands::Completions(args) => completions::execute(&args, &mut App::command()),
    }
}

// logs go to stderr, stdout only carries command output
fn init_logger(level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}
