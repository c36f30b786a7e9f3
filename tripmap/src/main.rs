use colored::Colorize;
use tracing::Level;
use tripmap::command_argument_builder;
use tripmap::handlers::{handle_build, handle_cache_clear, handle_cache_stats, handle_decode};

#[tokio::main]
async fn main() {
    let chosen_command = command_argument_builder().get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match chosen_command.subcommand() {
        Some(("build", primary_command)) => handle_build(primary_command, quiet).await,
        Some(("decode", primary_command)) => handle_decode(primary_command).await,
        Some(("cache", primary_command)) => match primary_command.subcommand() {
            Some(("stats", secondary_command)) => handle_cache_stats(secondary_command),
            Some(("clear", secondary_command)) => handle_cache_clear(secondary_command),
            _ => unreachable!("clap should ensure we don't get here"),
        },
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
