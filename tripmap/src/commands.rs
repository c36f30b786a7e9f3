use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub const DEFAULT_CACHE_DIR: &str = "~/.cache/tripmap/";

fn cache_arg() -> clap::Arg {
    arg!(--"cache" <DIR>)
        .required(false)
        .help("Directory holding the resolved short link cache")
        .default_value(DEFAULT_CACHE_DIR)
}

fn timeout_arg() -> clap::Arg {
    arg!(--"timeout" <SECONDS>)
        .required(false)
        .help("Timeout for each short link lookup, in seconds")
        .value_parser(clap::value_parser!(u64).range(1..))
        .default_value("10")
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("tripmap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("tripmap")
        .about("Turn the map links in a travel document into a KML overlay")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Only print errors").required(false))
        .arg(
            arg!(-v --"verbose" "Log every link decision")
                .required(false)
                .conflicts_with("quiet"),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("build")
                .about(
                    "Read a .docx document and write every place and route it links to into a \
                KML file.",
                )
                .arg(
                    arg!(<DOCUMENT>)
                        .help("The .docx document to read")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-o --"out" <PATH>)
                        .required(false)
                        .help("Where to write the KML file (default: DOCUMENT with a .kml extension)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(cache_arg().conflicts_with("no-cache"))
                .arg(
                    arg!(--"no-cache")
                        .required(false)
                        .help("Do not read or write the persistent short link cache")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-c --"concurrency" <NUM>)
                        .required(false)
                        .help("How many links to resolve at the same time")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("4"),
                )
                .arg(timeout_arg())
                .arg(
                    arg!(--"report" <PATH>)
                        .required(false)
                        .help("Also write a JSON report of the points and routes found")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            command!("decode")
                .about("Print the coordinates encoded in a single maps URL")
                .arg(arg!(<URL>).help("A place, directions or short maps link"))
                .arg(timeout_arg()),
        )
        .subcommand(
            command!("cache")
                .about("Inspect or empty the short link cache")
                .subcommand_required(true)
                .subcommand(
                    command!("stats")
                        .about("Show where the cache lives and how many links it holds")
                        .arg(cache_arg()),
                )
                .subcommand(
                    command!("clear")
                        .about("Forget every cached short link")
                        .arg(cache_arg()),
                ),
        )
}
