//! Commands, e.g. `explain int *p` or `set c++17`.

use crate::ast::{Align, Ast};
use crate::keywords::{self, Context, KeywordKind};
use crate::lang::{self, LangIds};
use crate::reporting::{Message, ParseMessage, SemanticMessage, Unknown};
use crate::session::Session;
use crate::sname::Sname;
use crate::source::ByteRange;
use crate::types::TypeId;
use crate::dym;

use super::lexer::Token;
use super::Parser;

/// Where a command can be given.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum CommandKind {
    /// Only as a line of input.
    LangOnly,
    /// Also as the first command-line argument, e.g. `cdecl declare ...`.
    FirstArg,
    /// Also as the name the program is run as, e.g. `explain ...`.
    ProgName,
}

#[derive(Debug)]
pub struct CommandInfo {
    pub literal: &'static str,
    pub kind: CommandKind,
    pub langs: LangIds,
}

const fn cmd(literal: &'static str, kind: CommandKind, langs: LangIds) -> CommandInfo {
    CommandInfo { literal, kind, langs }
}

pub const COMMANDS: &[CommandInfo] = &[
    cmd("cast", CommandKind::ProgName, LangIds::ANY),
    cmd("class", CommandKind::FirstArg, LangIds::CPP_ANY),
    cmd("const", CommandKind::FirstArg, LangIds::CPP_ANY),
    cmd("declare", CommandKind::ProgName, LangIds::ANY),
    cmd("define", CommandKind::FirstArg, LangIds::ANY),
    cmd("dynamic", CommandKind::FirstArg, LangIds::CPP_ANY),
    cmd("enum", CommandKind::FirstArg, lang::feature::ENUM),
    cmd("exit", CommandKind::LangOnly, LangIds::ANY),
    cmd("expand", CommandKind::LangOnly, LangIds::ANY),
    cmd("explain", CommandKind::ProgName, LangIds::ANY),
    cmd("help", CommandKind::LangOnly, LangIds::ANY),
    cmd("include", CommandKind::LangOnly, LangIds::ANY),
    cmd("inline", CommandKind::FirstArg, lang::feature::INLINE_NAMESPACE),
    cmd("namespace", CommandKind::FirstArg, LangIds::CPP_ANY),
    cmd("quit", CommandKind::LangOnly, LangIds::ANY),
    cmd("reinterpret", CommandKind::FirstArg, LangIds::CPP_ANY),
    cmd("set", CommandKind::LangOnly, LangIds::ANY),
    cmd("show", CommandKind::LangOnly, LangIds::ANY),
    cmd("static", CommandKind::FirstArg, LangIds::CPP_ANY),
    cmd("struct", CommandKind::FirstArg, LangIds::ANY),
    cmd("typedef", CommandKind::FirstArg, LangIds::ANY),
    cmd("union", CommandKind::FirstArg, LangIds::ANY),
    cmd("using", CommandKind::FirstArg, lang::feature::USING_DECLARATION),
];

/// Find the command spelled `literal`, e.g. `explain` or `q`.
pub fn find_command(literal: &str) -> Option<&'static CommandInfo> {
    let literal = keywords::english_synonym(literal);
    COMMANDS.iter().find(|info| info.literal == literal)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastKind {
    /// `(T)x`
    C,
    Const,
    Dynamic,
    Reinterpret,
    Static,
}

impl CastKind {
    /// The word before `cast` in pseudo-English, if any.
    pub fn english(self) -> Option<&'static str> {
        match self {
            CastKind::C => None,
            CastKind::Const => Some("const"),
            CastKind::Dynamic => Some("dynamic"),
            CastKind::Reinterpret => Some("reinterpret"),
            CastKind::Static => Some("static"),
        }
    }

    /// The C++ keyword, e.g. `static_cast`.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            CastKind::C => None,
            CastKind::Const => Some("const_cast"),
            CastKind::Dynamic => Some("dynamic_cast"),
            CastKind::Reinterpret => Some("reinterpret_cast"),
            CastKind::Static => Some("static_cast"),
        }
    }

    pub fn langs(self) -> LangIds {
        match self {
            CastKind::C => LangIds::ANY,
            _ => LangIds::CPP_ANY,
        }
    }
}

/// Which type names `show` lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowWhich {
    All,
    Predefined,
    User,
    Name(Sname, ByteRange),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ShowFormat {
    English,
    #[default]
    Gibberish,
}

/// A `set` option as given, e.g. `lang=c++17` or `noprompt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOption {
    pub name: String,
    pub value: Option<String>,
    pub range: ByteRange,
}

#[derive(Debug, Clone)]
pub enum Command {
    /// `cast x into T`: print a C/C++ cast.
    Cast {
        kind: CastKind,
        sname: Sname,
        ast: Ast,
    },
    /// `explain (T)x`: print a cast in pseudo-English.
    ExplainCast {
        kind: CastKind,
        sname: Sname,
        ast: Ast,
    },
    /// `declare x as T`: print C/C++ declarations.
    Declare(Vec<Ast>),
    /// `define T as ...`: add a type name.
    Define(Ast),
    /// `explain int *p`: print declarations in pseudo-English.
    Explain(Vec<Ast>),
    /// `typedef`, `using`, `struct`, `namespace` and so on: add type names
    /// without printing anything.
    Typedefs(Vec<Ast>),
    Show {
        which: ShowWhich,
        format: ShowFormat,
    },
    Set(Vec<SetOption>),
    Help(Option<(String, ByteRange)>),
    Include {
        path: String,
        range: ByteRange,
    },
    /// `#define NAME(PARAMS) BODY`
    MacroDefine {
        name: String,
        range: ByteRange,
        params: Option<Vec<String>>,
        body: String,
    },
    /// `#undef NAME`
    MacroUndef {
        name: String,
        range: ByteRange,
    },
    /// `expand NAME(ARGS)`: the text to expand and where it starts.
    Expand {
        text: String,
        offset: u32,
    },
    Exit,
}

/// The result of parsing one line of input.
#[derive(Debug)]
pub struct Parsed {
    /// Nothing for a blank line.
    pub command: Option<Command>,
    pub warnings: Vec<Message>,
}

/// Parse a line of input as a command.
pub fn command(source: &str, session: &Session) -> Result<Parsed, Message> {
    let mut parser = Parser::new(source, session.lang(), session.typedefs())?;
    let command = parser.command(session)?;
    if command.is_some() {
        parser.eat(Token::Semicolon);
        parser.expect_end()?;
    }
    tracing::debug!(command = ?command.as_ref().map(command_name), "parsed command");
    Ok(Parsed {
        command,
        warnings: parser.take_warnings(),
    })
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Cast { .. } => "cast",
        Command::ExplainCast { .. } | Command::Explain(_) => "explain",
        Command::Declare(_) => "declare",
        Command::Define(_) => "define",
        Command::Typedefs(_) => "typedefs",
        Command::Show { .. } => "show",
        Command::Set(_) => "set",
        Command::Help(_) => "help",
        Command::Include { .. } => "include",
        Command::MacroDefine { .. } => "#define",
        Command::MacroUndef { .. } => "#undef",
        Command::Expand { .. } => "expand",
        Command::Exit => "exit",
    }
}

impl<'a> Parser<'a> {
    fn command(&mut self, session: &Session) -> Result<Option<Command>, Message> {
        if self.at_end() {
            return Ok(None);
        }
        if self.is(Token::Hash) {
            return self.directive().map(Some);
        }

        let info = self.peek_name().and_then(find_command).filter(|info| match info.literal {
            // Types unless followed by `cast` or `namespace`.
            "const" | "static" | "dynamic" | "reinterpret" => self.peek_name_at(1) == Some("cast"),
            "inline" => self.peek_name_at(1) == Some("namespace"),
            _ => true,
        });
        let Some(info) = info else {
            return self.inferred_command(session).map(Some);
        };

        if !self.lang.is_any(info.langs) {
            return Err(SemanticMessage::error(
                self.range(),
                format!("\"{}\" not supported{}", info.literal, lang::which(info.langs, self.lang)),
            )
            .into());
        }

        let command = match info.literal {
            "cast" => {
                self.pos += 1;
                self.cast(CastKind::C)?
            }
            "const" | "dynamic" | "reinterpret" | "static" => {
                let kind = match info.literal {
                    "const" => CastKind::Const,
                    "dynamic" => CastKind::Dynamic,
                    "reinterpret" => CastKind::Reinterpret,
                    _ => CastKind::Static,
                };
                self.pos += 2;
                self.cast(kind)?
            }
            "declare" => {
                self.pos += 1;
                self.declare()?
            }
            "define" => {
                self.pos += 1;
                self.define()?
            }
            "explain" => {
                self.pos += 1;
                self.explain()?
            }
            "class" | "enum" | "inline" | "namespace" | "struct" | "typedef" | "union" | "using" => {
                let mut asts = Vec::new();
                while !self.at_end() {
                    asts.extend(self.scoped_decl()?);
                }
                Command::Typedefs(asts)
            }
            "show" => {
                self.pos += 1;
                self.show()?
            }
            "set" => {
                self.pos += 1;
                Command::Set(self.set_options())
            }
            "help" => {
                self.pos += 1;
                let topic = match self.word_at(0) {
                    Some((word, len)) => {
                        let range = self.range();
                        self.pos += len;
                        Some((word.to_owned(), self.range_from(range)))
                    }
                    None => None,
                };
                Command::Help(topic)
            }
            "include" => {
                self.pos += 1;
                self.include()?
            }
            "expand" => {
                self.pos += 1;
                self.expand()?
            }
            _ => {
                self.pos += 1;
                Command::Exit
            }
        };
        Ok(Some(command))
    }

    /// A line that does not start with a command: an error, or with
    /// `infer-command` an implied `explain`, or `expand` if it starts with a
    /// macro's name.
    fn inferred_command(&mut self, session: &Session) -> Result<Command, Message> {
        if !session.options().infer_command {
            return Err(self.unknown_command());
        }
        match self.peek_name() {
            Some(name) if session.macros().is_defined(name) => self.expand(),
            _ => self.explain(),
        }
    }

    fn unknown_command(&self) -> Message {
        let (name, range) = match self.word_at(0) {
            Some((word, _)) => (word.to_owned(), self.range()),
            None => (self.rest().to_owned(), self.range()),
        };
        let candidates = COMMANDS.iter().map(|info| info.literal);
        ParseMessage::Unknown {
            range,
            what: Unknown::Command,
            suggestions: dym::suggestions(&name, candidates),
            name,
        }
        .into()
    }

    /// `cast [NAME] into T`, after `cast`.
    fn cast(&mut self, kind: CastKind) -> Result<Command, Message> {
        let mut sname = Sname::new();
        if !matches!(self.peek_word(), Some("into" | "as")) {
            sname = self.english_sname()?.0;
        }
        if !self.eat_word("into") {
            self.expect_word("as")?;
        }
        let ast = self.english()?;
        Ok(Command::Cast { kind, sname, ast })
    }

    /// `declare NAME[, NAME...] as T [width N [bits]] [aligned [as|to] N [bytes]]`,
    /// after `declare`.
    fn declare(&mut self) -> Result<Command, Message> {
        if self.is_unnamed_declare() {
            let ast = self.english()?;
            return Ok(Command::Declare(vec![ast]));
        }

        let mut names = Vec::new();
        loop {
            names.push(self.declare_name()?);
            if !self.eat(Token::Comma) {
                break;
            }
        }
        let oper_named = self.oper.is_some();
        self.expect_word("as")?;
        let start = self.range();
        let mut ast = self.english()?;

        if self.eat_word("width") {
            let (width, range) = self.number()?;
            self.eat_word("bits");
            ast.bit_width = u32::try_from(width)
                .ok()
                .filter(|width| *width > 0)
                .ok_or_else(|| SemanticMessage::error(range, "invalid bit-field width"))?;
        }
        if self.eat_word("aligned") {
            if !self.eat_word("as") {
                self.eat_word("to");
            }
            ast.align = match self.peek() {
                Some(Token::Number(_)) => {
                    let (bytes, range) = self.number()?;
                    self.eat_word("bytes");
                    let bytes = u32::try_from(bytes)
                        .map_err(|_| SemanticMessage::error(range, "alignment too large"))?;
                    Align::Bytes(bytes)
                }
                _ => Align::Type(Box::new(self.english()?)),
            };
        }
        ast.range = self.range_from(start);

        let asts = names
            .into_iter()
            .map(|sname| {
                let mut ast = ast.clone();
                ast.sname = match ast.oper() {
                    // In `declare S::op as operator +` only the scope of the
                    // name is kept.
                    Some(_) if !oper_named => sname.scope_sname(),
                    _ => sname,
                };
                ast
            })
            .collect();
        Ok(Command::Declare(asts))
    }

    /// Does a user-defined conversion follow, possibly after storage
    /// classes? Conversions have no name of their own.
    fn is_unnamed_declare(&self) -> bool {
        let mut n = 0;
        while let Some((word, len)) = self.word_at(n) {
            match word {
                "user-defined" => return true,
                "as" => return false,
                _ => n += len,
            }
        }
        false
    }

    /// `x`, `S::x`, `~S`, `S::~S`, `x of class S`, or an operator like `+`
    /// optionally followed by `of class S`.
    fn declare_name(&mut self) -> Result<Sname, Message> {
        if self.eat(Token::Tilde) {
            return Ok(self.english_sname()?.0);
        }
        if self.peek_name().is_none() {
            let Some(oper) = self.oper_id() else {
                return Err(self.unexpected(&["name"]));
            };
            self.oper = Some(oper);
            let mut sname = Sname::new();
            if self.eat_word("of") {
                let kind = self.english_scope_kind()?;
                sname = self.english_sname()?.0;
                sname.set_local_kind(kind);
            }
            return Ok(sname);
        }
        let (name, _) = self.expect_name()?;
        let mut sname = Sname::from_name(name);
        while self.eat(Token::Colon2) {
            // `S::~S` names the destructor `S::S`.
            self.eat(Token::Tilde);
            let (name, _) = self.expect_name()?;
            sname.push(name, Default::default());
        }
        while self.peek_word() == Some("of") {
            self.pos += 1;
            let kind = self.english_scope_kind()?;
            let (mut scope, _) = self.sname()?;
            scope.set_local_kind(kind);
            sname.prepend(&scope);
        }
        Ok(sname)
    }

    /// `define NAME as T`, after `define`.
    fn define(&mut self) -> Result<Command, Message> {
        let (sname, _) = self.english_sname()?;
        self.expect_word("as")?;
        let mut ast = self.english()?;
        ast.sname = sname;
        Ok(Command::Define(ast))
    }

    /// A C/C++ declaration or cast, after `explain` if given.
    fn explain(&mut self) -> Result<Command, Message> {
        if self.is(Token::OpenParen) {
            self.pos += 1;
            let ast = self.type_name()?;
            self.expect(Token::CloseParen)?;
            let sname = match self.peek() {
                Some(Token::Name(_)) => self.sname()?.0,
                _ => Sname::new(),
            };
            return Ok(Command::ExplainCast {
                kind: CastKind::C,
                sname,
                ast,
            });
        }

        let keyword = self
            .peek_name()
            .and_then(|name| self.keyword(name, Context::Default))
            .map(|keyword| keyword.kind);
        let kind = match keyword {
            Some(KeywordKind::ConstCast) => Some(CastKind::Const),
            Some(KeywordKind::DynamicCast) => Some(CastKind::Dynamic),
            Some(KeywordKind::ReinterpretCast) => Some(CastKind::Reinterpret),
            Some(KeywordKind::StaticCast) => Some(CastKind::Static),
            Some(KeywordKind::Using) => {
                let mut ast = self.using()?;
                ast.ty |= TypeId::TYPEDEF;
                return Ok(Command::Explain(vec![ast]));
            }
            _ => None,
        };
        match kind {
            Some(kind) => {
                self.pos += 1;
                self.expect(Token::Less)?;
                let ast = self.type_name()?;
                self.expect(Token::Greater)?;
                self.expect(Token::OpenParen)?;
                let (sname, _) = self.sname()?;
                self.expect(Token::CloseParen)?;
                Ok(Command::ExplainCast { kind, sname, ast })
            }
            None => Ok(Command::Explain(self.decls()?)),
        }
    }

    /// `show [NAME|all|predefined|user] [typedefs] [as english|as gibberish]`,
    /// after `show`.
    fn show(&mut self) -> Result<Command, Message> {
        let which = match self.peek_word() {
            Some("all") => ShowWhich::All,
            Some("predefined") => ShowWhich::Predefined,
            Some("user") => ShowWhich::User,
            Some("typedefs" | "types" | "as" | "in" | "english" | "gibberish") | None => ShowWhich::User,
            Some(_) => {
                let (sname, range) = self.sname()?;
                ShowWhich::Name(sname, range)
            }
        };
        if matches!(which, ShowWhich::All | ShowWhich::Predefined) || self.is_name("user") {
            self.pos += 1;
        }
        if !self.eat_word("typedefs") {
            self.eat_word("types");
        }
        if !self.eat_word("as") {
            self.eat_word("in");
        }
        let format = match self.peek_word() {
            Some("english") => ShowFormat::English,
            Some("gibberish") | Some("c") | Some("c++") => ShowFormat::Gibberish,
            None => ShowFormat::Gibberish,
            Some(_) => return Err(self.unexpected(&["\"english\"", "\"gibberish\""])),
        };
        if !self.at_end() {
            self.pos += 1;
        }
        Ok(Command::Show { which, format })
    }

    /// Everything after `set` as whitespace-separated options.
    fn set_options(&mut self) -> Vec<SetOption> {
        let start = self.range().start();
        let rest = self.rest();
        self.skip_to_end();
        let mut options = Vec::new();
        let mut offset = 0;
        for word in rest.split_whitespace() {
            let at = rest[offset..].find(word).map_or(offset, |at| at + offset);
            offset = at + word.len();
            let range = ByteRange::new(start + at as u32, start + offset as u32);
            let (name, value) = match word.split_once('=') {
                Some((name, value)) => (name, Some(value.to_owned())),
                None => (word, None),
            };
            options.push(SetOption {
                name: name.to_owned(),
                value,
                range,
            });
        }
        options
    }

    /// `include "FILE"`, after `include`.
    fn include(&mut self) -> Result<Command, Message> {
        match self.peek() {
            Some(Token::StringLiteral(path)) => {
                let range = self.range();
                self.pos += 1;
                Ok(Command::Include {
                    path: path.to_owned(),
                    range,
                })
            }
            _ => Err(self.unexpected(&["string literal"])),
        }
    }

    /// The rest of the line as text to expand.
    fn expand(&mut self) -> Result<Command, Message> {
        if self.at_end() {
            return Err(self.unexpected(&["name"]));
        }
        let offset = self.range().start();
        let text = self.rest().to_owned();
        self.skip_to_end();
        Ok(Command::Expand { text, offset })
    }

    /// `#define`, `#undef` and `#include`.
    fn directive(&mut self) -> Result<Command, Message> {
        self.expect(Token::Hash)?;
        let (directive, range) = self.expect_name()?;
        match directive {
            "define" => {
                let (name, range) = self.expect_name()?;
                // Only a `(` right after the name starts parameters.
                let params = match self.is(Token::OpenParen) && self.range().start() == range.end() {
                    true => Some(self.macro_params()?),
                    false => None,
                };
                let body = self.rest().to_owned();
                self.skip_to_end();
                Ok(Command::MacroDefine {
                    name: name.to_owned(),
                    range,
                    params,
                    body,
                })
            }
            "undef" => {
                let (name, range) = self.expect_name()?;
                Ok(Command::MacroUndef {
                    name: name.to_owned(),
                    range,
                })
            }
            "include" => self.include(),
            _ => Err(SemanticMessage::error(range, format!("\"{directive}\": unknown preprocessor directive")).into()),
        }
    }

    fn macro_params(&mut self) -> Result<Vec<String>, Message> {
        self.expect(Token::OpenParen)?;
        let mut params = Vec::new();
        if self.eat(Token::CloseParen) {
            return Ok(params);
        }
        loop {
            match self.peek() {
                Some(Token::Ellipsis) => {
                    self.pos += 1;
                    params.push("...".to_owned());
                }
                _ => params.push(self.expect_name()?.0.to_owned()),
            }
            if !self.eat(Token::Comma) {
                break;
            }
        }
        self.expect(Token::CloseParen)?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Kind;
    use crate::lang::Lang;
    use crate::options::Options;

    fn session(lang: Lang) -> Session {
        Session::new(Options {
            lang,
            ..Options::default()
        })
    }

    fn parse(source: &str, lang: Lang) -> Command {
        command(source, &session(lang)).unwrap().command.unwrap()
    }

    #[test]
    fn blank_lines() {
        assert!(command("  ", &session(Lang::C_17)).unwrap().command.is_none());
    }

    #[test]
    fn declare_several_names() {
        let Command::Declare(asts) = parse("declare x, y as pointer to int", Lang::C_17) else { panic!() };
        assert_eq!(asts.len(), 2);
        assert_eq!(asts[1].sname.to_string(), "y");
    }

    #[test]
    fn declare_bit_fields_and_alignment() {
        let Command::Declare(asts) = parse("declare x as unsigned int width 3 bits", Lang::C_17) else { panic!() };
        assert_eq!(asts[0].bit_width, 3);
        let Command::Declare(asts) = parse("declare x as int aligned as 8 bytes", Lang::C_17) else { panic!() };
        assert!(matches!(asts[0].align, Align::Bytes(8)));
    }

    #[test]
    fn declare_operators() {
        let Command::Declare(asts) = parse("declare + as non-member operator (int, int) returning int", Lang::CPP_17) else { panic!() };
        assert!(asts[0].oper().is_some());
        assert!(asts[0].sname.is_empty());
        let Command::Declare(asts) = parse("declare op as operator + (int, int) returning int", Lang::CPP_17) else { panic!() };
        assert!(asts[0].sname.is_empty());
        let Command::Declare(asts) = parse("declare S::op as member operator + (int) returning int", Lang::CPP_17) else { panic!() };
        assert_eq!(asts[0].sname.to_string(), "S");
        let Command::Declare(asts) = parse("declare + of class S as operator (int) returning int", Lang::CPP_17) else { panic!() };
        assert_eq!(asts[0].sname.to_string(), "S");
    }

    #[test]
    fn declare_destructors() {
        let Command::Declare(asts) = parse("declare S::~S as destructor", Lang::CPP_17) else { panic!() };
        assert_eq!(asts[0].sname.to_string(), "S::S");
        assert!(matches!(asts[0].kind, Kind::Destructor(_)));
    }

    #[test]
    fn casts() {
        let Command::Cast { kind, sname, .. } = parse("static cast x into pointer to int", Lang::CPP_17) else { panic!() };
        assert_eq!(kind, CastKind::Static);
        assert_eq!(sname.to_string(), "x");
        let Command::ExplainCast { kind, .. } = parse("explain (int *)x", Lang::C_17) else { panic!() };
        assert_eq!(kind, CastKind::C);
        let Command::ExplainCast { kind, .. } = parse("explain const_cast<int *>(x)", Lang::CPP_17) else { panic!() };
        assert_eq!(kind, CastKind::Const);
    }

    #[test]
    fn static_is_only_a_command_before_cast() {
        let error = command("static int x", &session(Lang::C_17)).unwrap_err();
        assert!(matches!(error, Message::Parse(ParseMessage::Unknown { what: Unknown::Command, .. })));

        let mut options = Options::default();
        options.infer_command = true;
        let session = Session::new(options);
        let parsed = command("static int x", &session).unwrap();
        assert!(matches!(parsed.command, Some(Command::Explain(_))));
    }

    #[test]
    fn unknown_commands_suggest() {
        let error = command("explian int x", &session(Lang::C_17)).unwrap_err();
        let Message::Parse(ParseMessage::Unknown { suggestions, .. }) = error else { panic!() };
        assert_eq!(suggestions, ["explain"]);
    }

    #[test]
    fn scoped_type_declarations() {
        let Command::Typedefs(asts) = parse("namespace N { struct S; typedef S *P; }", Lang::CPP_17) else { panic!() };
        let names = asts.iter().map(|ast| ast.sname.to_string()).collect::<Vec<_>>();
        assert_eq!(names, ["N::S", "N::P"]);
    }

    #[test]
    fn show_and_set() {
        let Command::Show { which, format } = parse("show all as english", Lang::C_17) else { panic!() };
        assert_eq!(which, ShowWhich::All);
        assert_eq!(format, ShowFormat::English);
        let Command::Show { which, .. } = parse("show size_t", Lang::C_17) else { panic!() };
        assert!(matches!(which, ShowWhich::Name(..)));

        let Command::Set(options) = parse("set lang=c++17 noprompt", Lang::C_17) else { panic!() };
        assert_eq!(options[0].name, "lang");
        assert_eq!(options[0].value.as_deref(), Some("c++17"));
        assert_eq!(options[1].range, ByteRange::new(15, 23));
    }

    #[test]
    fn macros() {
        let Command::MacroDefine { name, params, body, .. } = parse("#define P(x) x *", Lang::C_17) else { panic!() };
        assert_eq!(name, "P");
        assert_eq!(params, Some(vec!["x".to_owned()]));
        assert_eq!(body, "x *");
        let Command::MacroDefine { params, .. } = parse("#define P (x)", Lang::C_17) else { panic!() };
        assert!(params.is_none());
    }

    #[test]
    fn commands_depend_on_language() {
        let error = command("using T = int", &session(Lang::C_17)).unwrap_err();
        assert!(format!("{error:?}").contains("not supported"));
    }
}
