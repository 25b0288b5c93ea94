use clap::{Command, arg, command};
use domainspotter_core::config::parse_score_cutoff;
use domainspotter_fetch::source::DEFAULT_BASE_URL;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("domainspotter")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("domainspotter")
        .about("Search the daily list of newly registered domains for lookalikes of a keyword")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log fetch and ranking details to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            shared_args(
                command!("fuzz")
                    .visible_alias("rfuzz")
                    .about(
                        "Rank newly registered domains by similarity to a keyword, or to each \
                    keyword in a file.",
                    ),
            )
            .arg(
                arg!(-l --"limit" <COUNT>)
                    .required(false)
                    .help("Number of best matches to report per keyword")
                    .value_parser(clap::value_parser!(usize))
                    .default_value("10"),
            )
            .arg(
                arg!(--"scorer" <SCORER>)
                    .required(false)
                    .help("Similarity metric used for ranking")
                    .value_parser(["weighted", "ratio", "partial", "token-sort", "token-set"])
                    .default_value("weighted"),
            )
            .arg(
                arg!(--"score-cutoff" <SCORE>)
                    .required(false)
                    .help("Ignore candidates scoring below this value (0-100)")
                    .value_parser(parse_score_cutoff)
                    .default_value("0"),
            )
            .arg(
                arg!(--"no-process")
                    .required(false)
                    .help("Score the raw text instead of lowercased alphanumeric tokens")
                    .action(clap::ArgAction::SetTrue),
            ),
        )
        .subcommand(shared_args(
            command!("scan")
                .visible_alias("all")
                .about("Report every newly registered domain containing the keyword verbatim."),
        ))
}

fn shared_args(cmd: Command) -> Command {
    cmd.arg(
        arg!([KEYWORD])
            .help("Keyword to search for")
            .value_parser(clap::builder::NonEmptyStringValueParser::new())
            .required_unless_present("keyword-file")
            .conflicts_with("keyword-file"),
    )
    .arg(
        arg!(-f --"keyword-file" <PATH>)
            .required(false)
            .help("Newline-delimited file of keywords, searched against a single download")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
    )
    .arg(
        arg!(--"days-back" <DAYS>)
            .required(false)
            .help("Fetch the list published this many days ago")
            .value_parser(clap::value_parser!(u32))
            .default_value("1")
            .conflicts_with("date"),
    )
    .arg(
        arg!(--"date" <DATE>)
            .required(false)
            .help("Fetch the list for a specific day (YYYY-MM-DD)"),
    )
    .arg(
        arg!(-o --"output-dir" <DIR>)
            .required(false)
            .help("Directory for <keyword>_matches.txt result files")
            .default_value("."),
    )
    .arg(
        arg!(--"format" <FORMAT>)
            .required(false)
            .help("Console output format")
            .value_parser(["text", "json"])
            .default_value("text"),
    )
    .arg(
        arg!(--"no-save")
            .required(false)
            .help("Print matches without appending them to result files")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        arg!(--"enrich")
            .required(false)
            .help("Look up each match on IBM X-Force Exchange (needs XFE_KEY and XFE_PASS)")
            .action(clap::ArgAction::SetTrue),
    )
    .arg(
        arg!(--"enrich-delay-ms" <MS>)
            .required(false)
            .help("Pause between reputation lookups")
            .value_parser(clap::value_parser!(u64))
            .default_value("1000"),
    )
    .arg(
        arg!(--"enrich-limit" <COUNT>)
            .required(false)
            .help("Most reputation lookups per keyword")
            .value_parser(clap::value_parser!(usize))
            .default_value("10"),
    )
    .arg(
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Download timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("30"),
    )
    .arg(
        arg!(--"base-url" <URL>)
            .required(false)
            .help("Newly registered domains service endpoint")
            .default_value(DEFAULT_BASE_URL)
            .hide(true),
    )
}
