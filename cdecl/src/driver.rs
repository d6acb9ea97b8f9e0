//! Reading commands, running them, and reporting what happened.

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{BufferedStandardStream, ColorChoice, NoColor, WriteColor};

use crate::ast::{Ast, Kind};
use crate::check;
use crate::dym;
use crate::files::{FileId, Files};
use crate::help::{self, Topic};
use crate::parse::{self, Command, CommandKind, ShowFormat, ShowWhich};
use crate::print::{english, gibberish, Style};
use crate::reporting::{Message, ParseMessage, SemanticMessage, Unknown};
use crate::session::Session;
use crate::source::ByteRange;
use crate::typedefs::{Added, Typedef, Typedefs, Which};
use crate::types::TypeId;
use crate::BUG_REPORT_URL;

/// How a run ended, following the `sysexits.h` conventions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    Usage,
    DataErr,
    NoInput,
    Software,
    CantCreate,
    IoErr,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Usage => 64,
            Status::DataErr => 65,
            Status::NoInput => 66,
            Status::Software => 70,
            Status::CantCreate => 73,
            Status::IoErr => 74,
        }
    }
}

/// Whether to keep reading commands.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Where lines of input come from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Mode {
    /// A terminal: print a prompt before each line.
    Interactive,
    /// A script: echo each command if asked to.
    Batch,
    /// A configuration file or an `include`d file: neither prompt nor echo.
    Quiet,
}

/// Why a command failed.
enum Error {
    Message(Message),
    Io(io::Error),
}

impl From<Message> for Error {
    fn from(message: Message) -> Error {
        Error::Message(message)
    }
}

impl From<SemanticMessage> for Error {
    fn from(message: SemanticMessage) -> Error {
        Error::Message(message.into())
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Error {
        Error::Io(error)
    }
}

pub fn color_choice(stream: atty::Stream) -> ColorChoice {
    match atty::is(stream) {
        true => ColorChoice::Auto,
        false => ColorChoice::Never,
    }
}

/// The configuration file to read: the one given, then `$CDECLRC`, then
/// `~/.cdeclrc`. The flag is set if the file was named explicitly, in which
/// case it must exist.
pub fn config_path(explicit: Option<PathBuf>) -> Option<(PathBuf, bool)> {
    if let Some(path) = explicit {
        return Some((path, true));
    }
    if let Some(path) = std::env::var_os("CDECLRC").filter(|path| !path.is_empty()) {
        return Some((PathBuf::from(path), false));
    }
    let home = std::env::var_os("HOME").filter(|home| !home.is_empty())?;
    Some((Path::new(&home).join(".cdeclrc"), false))
}

/// Is `line` nothing but whitespace and comments?
fn is_blank(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.starts_with("//") {
        return true;
    }
    if let Some(comment) = line.strip_prefix("/*") {
        return comment.find("*/").map_or(true, |end| is_blank(&comment[end + 2..]));
    }
    match line.strip_prefix('#') {
        Some(directive) => {
            let directive = directive.trim_start();
            !["define", "include", "undef"]
                .iter()
                .any(|name| directive.starts_with(name))
        }
        None => false,
    }
}

/// Is `ast` the declaration of a class-like type, e.g. `struct S`?
fn is_ecsu_decl(ast: &Ast) -> bool {
    match &ast.kind {
        Kind::Ecsu { ecsu_sname, .. } => ast.sname == *ecsu_sname,
        _ => false,
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => Path::new(&home).join(rest),
        _ => PathBuf::from(path),
    }
}

pub struct Driver {
    session: Session,
    files: Files,
    /// Files being `include`d, innermost last.
    includes: Vec<PathBuf>,
    /// Line number offset for the first line of a script.
    first_line: usize,
    /// Flush results after every line rather than after every command.
    unbuffered: bool,

    seen_errors: RefCell<bool>,
    codespan_config: codespan_reporting::term::Config,
    diagnostic_writer: RefCell<Box<dyn WriteColor>>,

    emit_width: usize,
    emit_writer: RefCell<Box<dyn WriteColor>>,
}

impl Driver {
    pub fn new(session: Session) -> Driver {
        Driver {
            session,
            files: Files::new(),
            includes: Vec::new(),
            first_line: 0,
            unbuffered: false,

            seen_errors: RefCell::new(false),
            codespan_config: codespan_reporting::term::Config::default(),
            diagnostic_writer: RefCell::new(Box::new(BufferedStandardStream::stderr(color_choice(
                atty::Stream::Stderr,
            )))),

            emit_width: usize::MAX,
            emit_writer: RefCell::new(Box::new(BufferedStandardStream::stdout(color_choice(
                atty::Stream::Stdout,
            )))),
        }
    }

    /// Setup a global panic hook
    pub fn install_panic_hook(&self) {
        let term_config = self.codespan_config.clone();
        let default_hook = std::panic::take_hook();

        std::panic::set_hook(Box::new(move |info| {
            let location = info.location();
            let message = if let Some(message) = info.payload().downcast_ref::<String>() {
                message.as_str()
            } else if let Some(message) = info.payload().downcast_ref::<&str>() {
                message
            } else {
                "unknown panic type"
            };

            let diagnostic = Diagnostic::bug()
                .with_message(format!("cdecl panicked at '{message}'"))
                .with_notes(vec![
                    match location {
                        Some(location) => format!("panicked at: {location}"),
                        None => "panicked at: unknown location".to_owned(),
                    },
                    format!("please file a bug report at: {BUG_REPORT_URL}"),
                ]);

            let mut writer = BufferedStandardStream::stderr(color_choice(atty::Stream::Stderr));
            let dummy_files = SimpleFiles::<String, String>::new();

            default_hook(info);
            eprintln!();
            // A failure to write to stderr can not be reported anywhere.
            let _ = codespan_reporting::term::emit(&mut writer, &term_config, &dummy_files, &diagnostic);
            let _ = writer.flush();
            std::process::exit(Status::Software.exit_code());
        }));
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Set the writer to use when rendering diagnostics
    pub fn set_diagnostic_writer(&mut self, stream: impl 'static + WriteColor) {
        self.diagnostic_writer = RefCell::new(Box::new(stream) as Box<dyn WriteColor>);
    }

    /// Set the width to use when laying out help text
    pub fn set_emit_width(&mut self, emit_width: usize) {
        self.emit_width = emit_width;
    }

    /// Set the writer to use when printing results
    pub fn set_emit_writer(&mut self, stream: impl 'static + WriteColor) {
        self.emit_writer = RefCell::new(Box::new(stream) as Box<dyn WriteColor>);
    }

    /// Report line numbers of scripts as if they started after `first_line`
    /// lines.
    pub fn set_first_line(&mut self, first_line: usize) {
        self.first_line = first_line;
    }

    pub fn set_unbuffered(&mut self, unbuffered: bool) {
        self.unbuffered = unbuffered;
    }

    /// The status of a run that has finished without an I/O error. Errors in
    /// commands typed at a terminal do not affect it.
    pub fn status(&self, interactive: bool) -> Status {
        match *self.seen_errors.borrow() && !interactive {
            true => Status::DataErr,
            false => Status::Ok,
        }
    }

    /// Write results to a new file at `path` rather than to stdout.
    pub fn create_output(&mut self, path: &Path) -> Status {
        match File::create(path) {
            Ok(file) => {
                self.set_emit_writer(NoColor::new(io::BufWriter::new(file)));
                Status::Ok
            }
            Err(error) => {
                let message = format!("couldn't create `{}`: {error}", path.display());
                self.emit_diagnostic(Diagnostic::error().with_message(message));
                Status::CantCreate
            }
        }
    }

    /// Print the help for `topic`.
    pub fn run_help(&mut self, topic: Topic) -> Status {
        let help = help::render(topic, self.session.lang(), self.emit_width);
        match self.emit_line(&help).and_then(|()| self.flush()) {
            Ok(()) => Status::Ok,
            Err(error) => self.emit_write_diagnostic(error),
        }
    }

    /// Run the commands in a configuration file. A missing file is only an
    /// error if it was named explicitly.
    pub fn run_config(&mut self, path: &Path, explicit: bool) -> Status {
        tracing::debug!(path = %path.display(), "reading configuration");
        let file = match File::open(path) {
            Ok(file) => file,
            Err(error) if !explicit && error.kind() == io::ErrorKind::NotFound => return Status::Ok,
            Err(error) => {
                self.emit_read_diagnostic(path.display(), error);
                return Status::NoInput;
            }
        };
        let name = path.display().to_string();
        match self.run_lines(&name, BufReader::new(file), Mode::Quiet, 0) {
            Ok(_) => Status::Ok,
            Err(error) => {
                self.emit_read_diagnostic(name, error);
                Status::IoErr
            }
        }
    }

    /// Run a single command given as command-line arguments.
    pub fn run_args(&mut self, line: &str) -> Status {
        let file_id = self.files.add("<command line>", line);

        let start = line.len() - line.trim_start().len();
        if let Some(word) = line.split_whitespace().next() {
            let lang_only = parse::find_command(word).filter(|info| info.kind == CommandKind::LangOnly);
            if let Some(info) = lang_only {
                let range = ByteRange::new(start as u32, (start + word.len()) as u32);
                self.emit_diagnostic(
                    Diagnostic::error()
                        .with_message(format!("\"{}\": command not supported from the command line", info.literal))
                        .with_labels(vec![Label::primary(file_id, range)]),
                );
                return Status::Usage;
            }
        }

        match self.execute(file_id, line).and_then(|_| self.flush()) {
            Ok(()) => self.status(false),
            Err(error) => self.emit_write_diagnostic(error),
        }
    }

    /// Run the commands in a script.
    pub fn run_file(&mut self, path: &Path) -> Status {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(error) => {
                self.emit_read_diagnostic(path.display(), error);
                return Status::NoInput;
            }
        };
        let name = path.display().to_string();
        match self.run_lines(&name, BufReader::new(file), Mode::Batch, self.first_line) {
            Ok(_) => self.status(false),
            Err(error) => self.emit_write_diagnostic(error),
        }
    }

    /// Run commands from standard input, prompting for them if it is a
    /// terminal.
    pub fn run_stdin(&mut self) -> Status {
        let interactive = atty::is(atty::Stream::Stdin);
        let mode = match interactive {
            true => Mode::Interactive,
            false => Mode::Batch,
        };
        let stdin = io::stdin();
        let result = self.run_lines("<stdin>", stdin.lock(), mode, self.first_line);
        match result {
            Ok(_) => self.status(interactive),
            Err(error) => self.emit_write_diagnostic(error),
        }
    }

    /// Run each line of `reader` as a command, joining lines that end in `\`.
    fn run_lines(&mut self, name: &str, mut reader: impl BufRead, mode: Mode, first_line: usize) -> io::Result<Flow> {
        let mut buf = String::new();
        let mut command = String::new();
        let mut line_number = first_line;
        let mut command_line = first_line;
        loop {
            if mode == Mode::Interactive && self.session.options().prompt {
                let prompt = match command.is_empty() {
                    true => self.session.prompt(),
                    false => "> ",
                };
                self.emit_text(prompt)?;
            }

            buf.clear();
            if reader.read_line(&mut buf)? == 0 {
                break;
            }
            let line = buf.trim_end_matches(['\n', '\r']);
            if command.is_empty() {
                command_line = line_number;
            }
            line_number += 1;
            if let Some(line) = line.strip_suffix('\\') {
                command.push_str(line);
                command.push(' ');
                continue;
            }
            command.push_str(line);

            let flow = self.run_command(name, &command, command_line, mode)?;
            command.clear();
            if flow == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
        if !command.is_empty() {
            return self.run_command(name, &command, command_line, mode);
        }
        Ok(Flow::Continue)
    }

    fn run_command(&mut self, name: &str, command: &str, line: usize, mode: Mode) -> io::Result<Flow> {
        if is_blank(command) {
            return Ok(Flow::Continue);
        }
        if mode == Mode::Batch && self.session.options().echo_commands {
            let echo = format!("{}{}", self.session.prompt(), command.trim());
            self.emit_line(&echo)?;
        }
        let file_id = self.files.add_at_line(name, command, line);
        let flow = self.execute(file_id, command)?;
        self.flush()?;
        Ok(flow)
    }

    /// Parse and run one command.
    fn execute(&mut self, file_id: FileId, source: &str) -> io::Result<Flow> {
        let parsed = match parse::command(source, &self.session) {
            Ok(parsed) => parsed,
            Err(message) => {
                self.emit_diagnostic(message.to_diagnostic(file_id));
                return Ok(Flow::Continue);
            }
        };
        for warning in &parsed.warnings {
            self.emit_diagnostic(warning.to_diagnostic(file_id));
        }
        let Some(command) = parsed.command else {
            return Ok(Flow::Continue);
        };

        match self.command(file_id, command) {
            Ok(flow) => Ok(flow),
            Err(Error::Message(message)) => {
                self.emit_diagnostic(message.to_diagnostic(file_id));
                Ok(Flow::Continue)
            }
            Err(Error::Io(error)) => Err(error),
        }
    }

    fn command(&mut self, file_id: FileId, command: Command) -> Result<Flow, Error> {
        let lang = self.session.lang();
        let style = Style::new(self.session.options());
        match command {
            Command::Cast { kind, sname, ast } => {
                let warnings = check::check_cast(kind, &sname, &ast, lang)?;
                self.emit_messages(file_id, warnings);
                self.emit_debug(std::slice::from_ref(&ast))?;
                self.emit_line(&gibberish::cast(kind, &sname, &ast, &style))?;
            }
            Command::ExplainCast { kind, sname, ast } => {
                let warnings = check::check_cast(kind, &sname, &ast, lang)?;
                self.emit_messages(file_id, warnings);
                self.emit_debug(std::slice::from_ref(&ast))?;
                self.emit_line(&english::cast(kind, &sname, &ast, &style))?;
            }
            Command::Declare(asts) => {
                let warnings = check::check_decls(&asts, lang)?;
                self.emit_messages(file_id, warnings);
                self.emit_debug(&asts)?;
                self.emit_line(&gibberish::decls(&asts, &style))?;
            }
            Command::Explain(asts) => {
                let warnings = check::check_decls(&asts, lang)?;
                self.emit_messages(file_id, warnings);
                self.emit_debug(&asts)?;
                self.emit_line(&english::decls(&asts, &style))?;
                // `explain typedef` defines the type too.
                for mut ast in asts {
                    if ast.ty.contains(TypeId::TYPEDEF) {
                        ast.ty -= TypeId::TYPEDEF;
                        self.add_typedef(file_id, ast);
                    }
                }
            }
            Command::Define(ast) => {
                self.emit_debug(std::slice::from_ref(&ast))?;
                self.define(file_id, vec![ast])?;
            }
            Command::Typedefs(asts) => {
                self.emit_debug(&asts)?;
                self.define(file_id, asts)?;
            }
            Command::Show { which, format } => self.show(which, format)?,
            Command::Set(options) if options.is_empty() => {
                let description = self.session.options().describe();
                self.emit_text(&description)?;
            }
            Command::Set(options) => {
                for option in &options {
                    if let Some(warning) = self.session.set_option(option)? {
                        self.emit_diagnostic(warning.to_diagnostic(file_id));
                    }
                }
            }
            Command::Help(topic) => {
                let topic = match topic {
                    None => Topic::Commands,
                    Some((word, range)) => help::find_topic(&word, range)?,
                };
                self.emit_line(&help::render(topic, lang, self.emit_width))?;
            }
            Command::Include { path, range } => self.include(&path, range)?,
            Command::MacroDefine {
                name,
                range,
                params,
                body,
            } => {
                if let Some(warning) = self.session.macros_mut().define(&name, range, params, &body)? {
                    self.emit_diagnostic(warning.to_diagnostic(file_id));
                }
            }
            Command::MacroUndef { name, range } => self.session.macros_mut().undef(&name, range)?,
            Command::Expand { text, offset } => {
                let steps = self.session.macros().expand(&text, offset)?;
                if steps.is_empty() {
                    self.emit_line(text.trim())?;
                }
                for step in steps {
                    self.emit_line(&step.to_string())?;
                }
            }
            Command::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    /// Check type declarations and add them to the registry.
    fn define(&mut self, file_id: FileId, asts: Vec<Ast>) -> Result<(), Error> {
        let lang = self.session.lang();
        for ast in &asts {
            // Declaring `struct S` makes `S` a type name but is no typedef.
            if is_ecsu_decl(ast) {
                continue;
            }
            let mut typedef = ast.clone();
            typedef.ty |= TypeId::TYPEDEF;
            let warnings = check::check_decl(&typedef, lang)?;
            self.emit_messages(file_id, warnings);
        }
        for ast in asts {
            self.add_typedef(file_id, ast);
        }
        Ok(())
    }

    fn add_typedef(&mut self, file_id: FileId, ast: Ast) {
        let range = ast.range;
        let name = ast.sname.to_string();
        let warn_on_equivalent = self.session.typedefs().warn_on_equivalent();
        match self.session.typedefs_mut().add(ast) {
            Added::Added => {}
            Added::Equivalent if warn_on_equivalent => self.emit_diagnostic(
                Diagnostic::warning()
                    .with_message(format!("\"{name}\": type redefined with an equivalent type"))
                    .with_labels(vec![Label::primary(file_id, range)]),
            ),
            Added::Equivalent => {}
            Added::Conflict(old) => {
                let style = Style::new(self.session.options()).with_lang(self.show_lang(&old));
                self.emit_diagnostic(
                    Diagnostic::error()
                        .with_message(format!("\"{name}\": type redefinition with a different type"))
                        .with_labels(vec![Label::primary(file_id, range)])
                        .with_notes(vec![format!("previously declared as: {}", gibberish::typedef(&old, &style))]),
                );
            }
        }
    }

    /// The language to print a type name in: the current one, unless it is C
    /// and the name is scoped.
    fn show_lang(&self, typedef: &Typedef) -> crate::lang::Lang {
        let lang = self.session.lang();
        match lang.is_c() && typedef.sname().count() > 1 {
            true => Typedefs::lang_for(typedef),
            false => lang,
        }
    }

    fn show(&mut self, which: ShowWhich, format: ShowFormat) -> Result<(), Error> {
        let typedefs = self.session.typedefs();
        let lang = self.session.lang();
        let listed = |which: Which| -> Vec<Rc<Typedef>> {
            typedefs
                .iter(which)
                // C++ names can not be used in C.
                .filter(|typedef| lang.is_cpp() || typedef.sname().count() == 1)
                .cloned()
                .collect()
        };
        let shown = match which {
            ShowWhich::All => listed(Which::All),
            ShowWhich::Predefined => listed(Which::Predefined),
            ShowWhich::User => listed(Which::User),
            ShowWhich::Name(sname, range) => match typedefs.find(&sname) {
                Some(typedef) => vec![typedef.clone()],
                None => {
                    let name = sname.to_string();
                    let names = typedefs.names().collect::<Vec<_>>();
                    let suggestions = dym::suggestions(&name, names.iter().map(String::as_str));
                    return Err(Message::from(ParseMessage::Unknown {
                        range,
                        what: Unknown::Type,
                        suggestions,
                        name,
                    })
                    .into());
                }
            },
        };

        let style = Style::new(self.session.options());
        for typedef in &shown {
            let text = match format {
                ShowFormat::English => english::typedef(typedef, &style),
                ShowFormat::Gibberish => gibberish::typedef(typedef, &style.with_lang(self.show_lang(typedef))),
            };
            self.emit_line(&text)?;
        }
        Ok(())
    }

    fn include(&mut self, path: &str, range: ByteRange) -> Result<(), Error> {
        let path = expand_home(path);
        let cant_open = |error: io::Error| SemanticMessage::error(range, format!("\"{}\": {error}", path.display()));
        let canonical = std::fs::canonicalize(&path).map_err(cant_open)?;
        if self.includes.contains(&canonical) {
            return Err(SemanticMessage::error(range, format!("\"{}\": recursive include", path.display())).into());
        }
        let file = File::open(&canonical).map_err(cant_open)?;

        tracing::debug!(path = %canonical.display(), "including file");
        self.includes.push(canonical);
        let result = self.run_lines(&path.display().to_string(), BufReader::new(file), Mode::Quiet, 0);
        self.includes.pop();
        // `exit` in an included file only ends that file.
        result.map(|_| ()).map_err(Error::Io)
    }

    fn emit_messages(&self, file_id: FileId, messages: Vec<SemanticMessage>) {
        for message in messages {
            self.emit_diagnostic(message.to_diagnostic(file_id));
        }
    }

    fn emit_debug(&self, asts: &[Ast]) -> io::Result<()> {
        if !self.session.options().debug {
            return Ok(());
        }
        for ast in asts {
            self.emit_line(&format!("{ast:#?}"))?;
        }
        Ok(())
    }

    fn emit_text(&self, text: &str) -> io::Result<()> {
        let mut emit_writer = self.emit_writer.borrow_mut();
        write!(emit_writer, "{text}")?;
        emit_writer.flush()
    }

    fn emit_line(&self, line: &str) -> io::Result<()> {
        let mut emit_writer = self.emit_writer.borrow_mut();
        writeln!(emit_writer, "{line}")?;
        match self.unbuffered {
            true => emit_writer.flush(),
            false => Ok(()),
        }
    }

    fn flush(&self) -> io::Result<()> {
        self.emit_writer.borrow_mut().flush()
    }

    fn emit_diagnostic(&self, diagnostic: Diagnostic<FileId>) {
        let mut writer = self.diagnostic_writer.borrow_mut();
        let config = &self.codespan_config;

        // A failure to write to stderr can not be reported anywhere.
        let _ = codespan_reporting::term::emit(&mut *writer, config, &self.files, &diagnostic);
        let _ = writer.flush();

        if diagnostic.severity >= Severity::Error {
            *self.seen_errors.borrow_mut() = true;
        }
    }

    fn emit_read_diagnostic(&self, name: impl std::fmt::Display, error: io::Error) {
        let diagnostic = Diagnostic::error().with_message(format!("couldn't read `{name}`: {error}"));
        self.emit_diagnostic(diagnostic);
    }

    fn emit_write_diagnostic(&self, error: io::Error) -> Status {
        let diagnostic = Diagnostic::error().with_message(format!("couldn't write output: {error}"));
        self.emit_diagnostic(diagnostic);
        Status::IoErr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    /// A writer whose contents can be read after the driver has written to
    /// it.
    #[derive(Clone, Default)]
    struct Shared(Rc<RefCell<Vec<u8>>>);

    impl io::Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    fn test_driver(options: Options) -> (Driver, Shared, Shared) {
        let out = Shared::default();
        let err = Shared::default();
        let mut driver = Driver::new(Session::new(options));
        driver.set_emit_writer(NoColor::new(out.clone()));
        driver.set_diagnostic_writer(NoColor::new(err.clone()));
        (driver, out, err)
    }

    fn run(driver: &mut Driver, script: &str) -> io::Result<Flow> {
        driver.run_lines("<test>", script.as_bytes(), Mode::Batch, 0)
    }

    #[test]
    fn exit_codes() {
        assert_eq!(Status::Ok.exit_code(), 0);
        assert_eq!(Status::DataErr.exit_code(), 65);
        assert_eq!(Status::NoInput.exit_code(), 66);
        assert_eq!(Status::CantCreate.exit_code(), 73);
    }

    #[test]
    fn blank_lines_and_comments() {
        assert!(is_blank("   "));
        assert!(is_blank("// explain int x"));
        assert!(is_blank("/* a */ /* b */"));
        assert!(is_blank("# a comment"));
        assert!(!is_blank("#define X int"));
        assert!(!is_blank("explain int x"));
        assert!(!is_blank("/* a */ explain int x"));
    }

    #[test]
    fn commands_and_continuations() {
        let (mut driver, out, err) = test_driver(Options::default());
        run(&mut driver, "declare x as \\\n  pointer to int\nexplain char *p\n").unwrap();
        assert_eq!(out.contents(), "int *x;\ndeclare p as pointer to char\n");
        assert_eq!(err.contents(), "");
        assert_eq!(driver.status(false), Status::Ok);
    }

    #[test]
    fn errors_make_the_run_fail() {
        let (mut driver, out, err) = test_driver(Options::default());
        run(&mut driver, "declare x as array of function returning int\nexplain int y\n").unwrap();
        assert_eq!(out.contents(), "declare y as int\n");
        assert!(err.contents().contains("array of function"), "{}", err.contents());
        assert_eq!(driver.status(false), Status::DataErr);
        assert_eq!(driver.status(true), Status::Ok);
    }

    #[test]
    fn exit_stops_reading() {
        let (mut driver, out, _) = test_driver(Options::default());
        assert_eq!(run(&mut driver, "exit\nexplain int x\n").unwrap(), Flow::Exit);
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn typedefs_are_remembered() {
        let (mut driver, out, err) = test_driver(Options::default());
        run(&mut driver, "define T as pointer to int\nexplain T x\nshow user\nshow T as english\n").unwrap();
        assert_eq!(err.contents(), "");
        assert_eq!(
            out.contents(),
            "declare x as T\ntypedef int *T;\ndefine T as pointer to int\n"
        );

        run(&mut driver, "typedef char *T\n").unwrap();
        assert!(err.contents().contains("\"T\": type redefinition"), "{}", err.contents());
    }

    #[test]
    fn echo_commands() {
        let (mut driver, out, _) = test_driver(Options {
            echo_commands: true,
            ..Options::default()
        });
        run(&mut driver, "declare x as int\n").unwrap();
        assert_eq!(out.contents(), "cdecl> declare x as int\nint x;\n");
    }

    #[test]
    fn command_line_only_takes_some_commands() {
        let (mut driver, _, err) = test_driver(Options::default());
        assert_eq!(driver.run_args("set nosemicolon"), Status::Usage);
        assert!(err.contents().contains("\"set\": command not supported"), "{}", err.contents());

        let (mut driver, out, _) = test_driver(Options::default());
        assert_eq!(driver.run_args("declare x as int"), Status::Ok);
        assert_eq!(out.contents(), "int x;\n");
    }

    #[test]
    fn macros() {
        let (mut driver, out, _) = test_driver(Options::default());
        run(&mut driver, "#define PTR(T) T *\nexpand PTR(int)\n").unwrap();
        assert_eq!(out.contents(), "PTR(int) => int *\n");
    }

    #[test]
    fn inferred_expand_keeps_the_whole_line() {
        let expected = "PTR(int) => int *\nPTR(int) p => int * p\n";

        let (mut driver, out, err) = test_driver(Options::default());
        run(&mut driver, "#define PTR(T) T *\nexpand PTR(int) p\n").unwrap();
        assert_eq!(err.contents(), "");
        assert_eq!(out.contents(), expected);

        let (mut driver, out, err) = test_driver(Options {
            infer_command: true,
            ..Options::default()
        });
        run(&mut driver, "#define PTR(T) T *\nPTR(int) p\n").unwrap();
        assert_eq!(err.contents(), "");
        assert_eq!(out.contents(), expected);
    }
}
