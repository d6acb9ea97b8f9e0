use clap::{Parser, ValueEnum};
use codespan_reporting::term::termcolor::{BufferedStandardStream, ColorChoice};
use std::path::{Path, PathBuf};

use cdecl::driver::{self, Driver, Status};
use cdecl::help::Topic;
use cdecl::lang::{self, Lang};
use cdecl::operators::Graph;
use cdecl::options::{self, Options, WestDecl};
use cdecl::parse::{self, CommandKind};
use cdecl::session::Session;
use cdecl::types::{ExplicitInt, TypeId};

/// Translate between C/C++ declarations and pseudo-English
///
/// Commands given as arguments are run and the program exits. Otherwise
/// commands are read from standard input, or from `--file`.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// A command to run, e.g. `explain int *p`
    #[clap(value_name = "COMMAND")]
    command: Vec<String>,

    /// Use a language, e.g. `c99` or `c++17`
    #[clap(short = 'x', long = "language", value_parser = parse_lang, display_order = 0)]
    lang: Option<Lang>,

    /// Print alternative tokens like `bitand` in operator names
    #[clap(short = 'a', long)]
    alt_tokens: bool,
    /// Print digraphs
    #[clap(short = '2', long, conflicts_with = "trigraphs")]
    digraphs: bool,
    /// Print trigraphs
    #[clap(short = '3', long)]
    trigraphs: bool,
    /// Print `const` and `volatile` after the type
    #[clap(short = 'E', long)]
    east_const: bool,
    /// Print `*`, `&` and `&&` next to the type, e.g. `b,f,l,o,r,t`, `*` or `-`
    #[clap(short = 'w', long, value_parser = parse_west_decl, value_name = "WEST_MASK")]
    west_decl: Option<WestDecl>,
    /// Print `int` where it is implied, e.g. `i,s,l,ll`, `u` prefixed, or `*`
    #[clap(short = 'i', long, value_parser = parse_explicit_int, value_name = "INT_MASK")]
    explicit_int: Option<ExplicitInt>,
    /// Print `enum`, `class`, `struct` or `union` before a C++ type name, e.g. `su`
    #[clap(short = 'S', long, value_parser = parse_explicit_ecsu, value_name = "ECSU_MASK")]
    explicit_ecsu: Option<TypeId>,
    /// Print `auto f() -> T` rather than `T f()`
    #[clap(short = 'r', long)]
    trailing_return: bool,
    /// Do not end declarations with `;`
    #[clap(short = 's', long)]
    no_semicolon: bool,
    /// Print English words for types, e.g. `integer` for `int`
    #[clap(long, conflicts_with = "no_english_types")]
    english_types: bool,
    /// Print C/C++ type keywords in pseudo-English
    #[clap(short = 'T', long)]
    no_english_types: bool,
    /// Print `typedef` rather than `using`
    #[clap(short = 'u', long)]
    no_using: bool,

    /// Read commands from a configuration file first
    #[clap(short = 'c', long, value_name = "CONFIG_FILE", conflicts_with = "no_config")]
    config: Option<PathBuf>,
    /// Do not read a configuration file
    #[clap(short = 'C', long)]
    no_config: bool,
    /// Do not load the predefined type names
    #[clap(long)]
    no_typedefs: bool,
    /// Echo each command read from a file
    #[clap(short = 'e', long)]
    echo_commands: bool,
    /// Read commands from a file, `-` for standard input
    #[clap(short = 'f', long, value_name = "FILE")]
    file: Option<PathBuf>,
    /// Write results to a file
    #[clap(short = 'o', long, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,
    /// Do not print a prompt
    #[clap(short = 'p', long)]
    no_prompt: bool,
    /// Treat a line without a command as `explain`
    #[clap(short = 'I', long)]
    infer_command: bool,
    /// Report line numbers as if the input started after this many lines
    #[clap(short = 'L', long, value_name = "N", default_value_t = 0)]
    lineno: usize,
    /// Write each result as soon as it is ready
    #[clap(short = 'b', long)]
    no_buffer_stdout: bool,
    /// When to use colors in diagnostics
    #[clap(long, value_enum, value_name = "WHEN", default_value_t = Color::Auto)]
    color: Color,

    /// Print each declaration's tree and log what the parser does
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the commands and exit
    #[clap(short = 'K', long, conflicts_with = "options")]
    commands: bool,
    /// Print the options of `set` and exit
    #[clap(short = 'O', long)]
    options: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum Color {
    Always,
    Auto,
    Never,
}

impl Color {
    fn choice(self, stream: atty::Stream) -> ColorChoice {
        match self {
            Color::Always => ColorChoice::Always,
            Color::Auto => driver::color_choice(stream),
            Color::Never => ColorChoice::Never,
        }
    }
}

fn parse_lang(name: &str) -> Result<Lang, String> {
    lang::find(name).ok_or_else(|| {
        let names = lang::names().collect::<Vec<_>>();
        format!("unknown language, expected one of: {}", names.join(", "))
    })
}

fn parse_west_decl(mask: &str) -> Result<WestDecl, String> {
    WestDecl::parse(mask).ok_or_else(|| "expected letters from `bflort`, `*` or `-`".to_owned())
}

fn parse_explicit_int(mask: &str) -> Result<ExplicitInt, String> {
    ExplicitInt::parse(mask).ok_or_else(|| "expected `i`, `s`, `l` or `ll`, optionally prefixed by `u`, or `*`".to_owned())
}

fn parse_explicit_ecsu(mask: &str) -> Result<TypeId, String> {
    options::parse_explicit_ecsu(mask).ok_or_else(|| "expected letters from `ecsu`".to_owned())
}

impl Cli {
    /// The options the session starts with. `prog_lang` is the language
    /// implied by the name the program was run as.
    fn options(&self, prog_lang: Option<Lang>) -> Options {
        let defaults = Options::default();
        Options {
            lang: self.lang.or(prog_lang).unwrap_or(defaults.lang),
            alt_tokens: self.alt_tokens,
            debug: self.debug,
            graph: match (self.digraphs, self.trigraphs) {
                (true, _) => Graph::Digraphs,
                (_, true) => Graph::Trigraphs,
                _ => defaults.graph,
            },
            east_const: self.east_const,
            echo_commands: self.echo_commands,
            english_types: self.english_types && !self.no_english_types,
            explicit_ecsu: self.explicit_ecsu.unwrap_or(defaults.explicit_ecsu),
            explicit_int: self.explicit_int.unwrap_or(defaults.explicit_int),
            infer_command: self.infer_command,
            prompt: !self.no_prompt,
            semicolon: !self.no_semicolon,
            trailing_return: self.trailing_return,
            using: !self.no_using,
            west_decl: self.west_decl.unwrap_or(defaults.west_decl),
            predefined_typedefs: !self.no_typedefs,
        }
    }
}

/// The command and language implied by the name the program was run as, as
/// in `explain int *p` or `c++decl`.
fn prog_name() -> (Option<&'static str>, Option<Lang>) {
    let arg0 = std::env::args_os().next().map(PathBuf::from);
    let stem = arg0.as_deref().and_then(Path::file_stem).and_then(|stem| stem.to_str());
    match stem {
        Some("c++decl" | "cppdecl") => (None, Some(Lang::CPP_NEW)),
        Some(stem) => {
            let command = parse::find_command(stem)
                .filter(|info| info.kind != CommandKind::LangOnly && info.literal == stem)
                .map(|info| info.literal);
            (command, None)
        }
        None => (None, None),
    }
}

fn install_tracing(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = match std::env::var_os("RUST_LOG") {
        Some(_) => EnvFilter::from_default_env(),
        None if debug => EnvFilter::new("cdecl=debug"),
        None => return,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_unless_ok(status: Status) {
    if status != Status::Ok {
        std::process::exit(status.exit_code());
    }
}

const MAX_PRETTY_WIDTH: usize = 80;

fn get_pretty_width() -> usize {
    let term_width = termsize::get().map_or(usize::MAX, |size| usize::from(size.cols));
    std::cmp::min(term_width, MAX_PRETTY_WIDTH)
}

fn main() -> ! {
    let cli = Cli::parse();
    install_tracing(cli.debug);

    let (mut prog_command, prog_lang) = prog_name();
    if cli.command.is_empty() {
        prog_command = None;
    }
    let mut driver = Driver::new(Session::new(cli.options(prog_lang)));
    driver.install_panic_hook();
    driver.set_emit_width(get_pretty_width());
    driver.set_first_line(cli.lineno);
    driver.set_unbuffered(cli.no_buffer_stdout);
    driver.set_diagnostic_writer(BufferedStandardStream::stderr(cli.color.choice(atty::Stream::Stderr)));
    driver.set_emit_writer(BufferedStandardStream::stdout(cli.color.choice(atty::Stream::Stdout)));

    if let Some(output) = &cli.output {
        exit_unless_ok(driver.create_output(output));
    }

    if cli.commands || cli.options {
        let topic = match cli.commands {
            true => Topic::Commands,
            false => Topic::Options,
        };
        std::process::exit(driver.run_help(topic).exit_code());
    }

    if !cli.no_config {
        if let Some((path, explicit)) = driver::config_path(cli.config.clone()) {
            exit_unless_ok(driver.run_config(&path, explicit));
        }
    }

    let words = prog_command.map(str::to_owned).into_iter().chain(cli.command).collect::<Vec<_>>();
    let status = match cli.file {
        _ if !words.is_empty() => driver.run_args(&words.join(" ")),
        Some(file) if file != Path::new("-") => driver.run_file(&file),
        _ => driver.run_stdin(),
    };

    std::process::exit(status.exit_code());
}
