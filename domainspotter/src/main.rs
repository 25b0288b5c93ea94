use colored::Colorize;
use domainspotter::commands::command_argument_builder;
use domainspotter::handlers::{SearchMode, handle_search};
use domainspotter_core::print_banner;
use std::process::ExitCode;
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(chosen_command.get_flag("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    let result = match chosen_command.subcommand() {
        Some(("fuzz", primary_command)) => {
            handle_search(primary_command, SearchMode::Fuzzy, quiet).await
        }
        Some(("scan", primary_command)) => {
            handle_search(primary_command, SearchMode::Exact, quiet).await
        }
        Some(_) => unreachable!("clap should ensure we don't get here"),
        None => {
            // No mode chosen: usage, not an error
            if let Err(e) = command_argument_builder().print_help() {
                eprintln!("{} {}", "[!]".red().bold(), e);
            }
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "[!]".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

// Logs go to stderr so they never interleave with match output
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
