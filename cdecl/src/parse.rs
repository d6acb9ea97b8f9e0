//! Parsers for commands, C/C++ declarations ("gibberish") and pseudo-English.
//!
//! Both declaration parsers are hand-written recursive descent parsers over
//! the same [`lexer::Token`]s. They build declarations outside-in around a
//! [`Kind::Placeholder`](crate::ast::Kind::Placeholder) and fill it in with
//! [`join`](crate::ast::join) once the type it applies to is known.

use std::rc::Rc;

use crate::ast::Ast;
use crate::dym;
use crate::keywords::{self, Context, Keyword};
use crate::lang::Lang;
use crate::operators::OperId;
use crate::reporting::{Message, ParseMessage, SemanticMessage, Unknown};
use crate::sname::{ScopeKind, Sname};
use crate::source::ByteRange;
use crate::typedefs::{Typedef, Typedefs};

pub mod lexer;

mod command;
mod english;
mod gibberish;

pub use command::{
    command, find_command, CastKind, Command, CommandInfo, CommandKind, Parsed, SetOption, ShowFormat, ShowWhich,
    COMMANDS,
};

use self::lexer::Token;

/// Parse a sequence of `typedef`, `using`, `namespace` and `class`-like
/// declarations, returning the type names they declare.
pub fn typedef_decls(source: &str, lang: Lang, typedefs: &Typedefs) -> Result<Vec<Ast>, Message> {
    let mut parser = Parser::new(source, lang, typedefs)?;
    let mut asts = Vec::new();
    while !parser.at_end() {
        asts.extend(parser.scoped_decl()?);
    }
    Ok(asts)
}

/// Parse a C/C++ declaration.
pub fn gibberish_decls(source: &str, lang: Lang, typedefs: &Typedefs) -> Result<Vec<Ast>, Message> {
    let mut parser = Parser::new(source, lang, typedefs)?;
    let asts = parser.decls()?;
    parser.expect_end()?;
    Ok(asts)
}

/// Parse a pseudo-English declaration of a type, e.g. `pointer to int`.
pub fn english_decl(source: &str, lang: Lang, typedefs: &Typedefs) -> Result<Ast, Message> {
    let mut parser = Parser::new(source, lang, typedefs)?;
    let ast = parser.english()?;
    parser.expect_end()?;
    Ok(ast)
}

/// The state shared by every parser.
pub struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(Token<'a>, ByteRange)>,
    pos: usize,
    lang: Lang,
    typedefs: &'a Typedefs,
    /// Type names declared earlier in the current command, not yet added to
    /// `typedefs`.
    pending: Vec<Rc<Typedef>>,
    /// The enclosing namespaces and classes.
    scope: Sname,
    /// The operator named before `as` in `declare + as operator ...`.
    oper: Option<OperId>,
    warnings: Vec<Message>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, lang: Lang, typedefs: &'a Typedefs) -> Result<Parser<'a>, Message> {
        let tokens = lexer::tokens(source).collect::<Result<Vec<_>, _>>()?;
        Ok(Parser {
            source,
            tokens,
            pos: 0,
            lang,
            typedefs,
            pending: Vec::new(),
            scope: Sname::new(),
            oper: None,
            warnings: Vec::new(),
        })
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    /// Warnings about things that were accepted but ignored.
    pub fn take_warnings(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.warnings)
    }

    fn warn(&mut self, range: ByteRange, message: impl Into<String>) {
        self.warnings.push(SemanticMessage::warning(range, message).into());
    }

    // Tokens.

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + n).map(|(token, _)| *token)
    }

    fn is(&self, token: Token<'_>) -> bool {
        self.peek() == Some(token)
    }

    fn is_at(&self, n: usize, token: Token<'_>) -> bool {
        self.peek_at(n) == Some(token)
    }

    /// The range of the next token, or an empty range at the end of input.
    fn range(&self) -> ByteRange {
        match self.tokens.get(self.pos) {
            Some((_, range)) => *range,
            None => ByteRange::at(self.source.len() as u32),
        }
    }

    fn range_at(&self, n: usize) -> ByteRange {
        match self.tokens.get(self.pos + n) {
            Some((_, range)) => *range,
            None => ByteRange::at(self.source.len() as u32),
        }
    }

    /// The range of the last token consumed.
    fn prev_range(&self) -> ByteRange {
        match self.pos.checked_sub(1).and_then(|pos| self.tokens.get(pos)) {
            Some((_, range)) => *range,
            None => ByteRange::at(0),
        }
    }

    /// The range from `start` up to the end of the last token consumed.
    fn range_from(&self, start: ByteRange) -> ByteRange {
        start.merge(self.prev_range())
    }

    fn advance(&mut self) -> Option<(Token<'a>, ByteRange)> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: Token<'_>) -> bool {
        let matches = self.is(token);
        if matches {
            self.pos += 1;
        }
        matches
    }

    fn expect(&mut self, token: Token<'_>) -> Result<ByteRange, Message> {
        match self.eat(token) {
            true => Ok(self.prev_range()),
            false => Err(self.unexpected(&[&token.description()])),
        }
    }

    fn expect_end(&mut self) -> Result<(), Message> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(ParseMessage::ExtraToken {
                range: self.range(),
                token: token.description(),
            }
            .into()),
        }
    }

    /// An error for the next token, which is not one of `expected`.
    fn unexpected(&self, expected: &[&str]) -> Message {
        let expected = expected.iter().map(|s| s.to_string()).collect();
        match self.peek() {
            None => ParseMessage::UnexpectedEnd {
                range: self.range(),
                expected,
            },
            Some(token) => ParseMessage::UnexpectedToken {
                range: self.range(),
                token: token.description(),
                expected,
            },
        }
        .into()
    }

    /// The source text from `range` to the end of input.
    fn rest_from(&self, range: ByteRange) -> &'a str {
        self.source
            .get(range.start() as usize..)
            .unwrap_or_default()
            .trim()
    }

    /// The source text of everything not yet consumed.
    fn rest(&self) -> &'a str {
        match self.at_end() {
            true => "",
            false => self.rest_from(self.range()),
        }
    }

    fn skip_to_end(&mut self) {
        self.pos = self.tokens.len();
    }

    // Names and keywords.

    fn peek_name(&self) -> Option<&'a str> {
        self.peek_name_at(0)
    }

    fn peek_name_at(&self, n: usize) -> Option<&'a str> {
        match self.peek_at(n) {
            Some(Token::Name(name)) => Some(name),
            _ => None,
        }
    }

    fn is_name(&self, name: &str) -> bool {
        self.peek_name() == Some(name)
    }

    fn eat_name(&mut self, name: &str) -> bool {
        let matches = self.is_name(name);
        if matches {
            self.pos += 1;
        }
        matches
    }

    fn expect_name(&mut self) -> Result<(&'a str, ByteRange), Message> {
        match self.peek() {
            Some(Token::Name(name)) => {
                self.pos += 1;
                Ok((name, self.prev_range()))
            }
            _ => Err(self.unexpected(&["name"])),
        }
    }

    /// The keyword `name` is in the current language.
    fn keyword(&self, name: &str, context: Context) -> Option<&'static Keyword> {
        keywords::find(name, self.lang, context)
    }

    /// A name that is not a keyword of the current language.
    fn is_identifier(&self, name: &str) -> bool {
        self.keyword(name, Context::Default).is_none()
    }

    /// A scoped name like `a::b::c`.
    fn sname(&mut self) -> Result<(Sname, ByteRange), Message> {
        let (name, start) = self.expect_name()?;
        let mut sname = Sname::from_name(name);
        while self.is(Token::Colon2) && matches!(self.peek_at(1), Some(Token::Name(_))) {
            self.pos += 1;
            let (name, _) = self.expect_name()?;
            sname.push(name, ScopeKind::Scope);
        }
        Ok((sname, self.range_from(start)))
    }

    /// The number of tokens a scoped name starting at `n` spans.
    fn sname_len_at(&self, n: usize) -> usize {
        if self.peek_name_at(n).is_none() {
            return 0;
        }
        let mut len = 1;
        while self.is_at(n + len, Token::Colon2) && self.peek_name_at(n + len + 1).is_some() {
            len += 2;
        }
        len
    }

    fn number(&mut self) -> Result<(u64, ByteRange), Message> {
        match self.peek() {
            Some(Token::Number(literal)) => {
                let range = self.range();
                self.pos += 1;
                match parse_number(literal) {
                    Some(number) => Ok((number, range)),
                    None => Err(SemanticMessage::error(range, format!("\"{literal}\": invalid number")).into()),
                }
            }
            _ => Err(self.unexpected(&["number"])),
        }
    }

    // Type names.

    /// Find a type name, looking in the enclosing scopes.
    fn find_type(&self, sname: &Sname) -> Option<Rc<Typedef>> {
        let mut scope = self.scope.clone();
        loop {
            let mut name = sname.clone();
            name.prepend(&scope);
            if let Some(typedef) = self.pending.iter().rev().find(|typedef| *typedef.sname() == name) {
                return Some(typedef.clone());
            }
            if scope.pop().is_none() {
                break;
            }
        }
        self.typedefs.find_in_scope(sname, &self.scope).cloned()
    }

    /// Remember a type name declared by the current command.
    fn declare_type(&mut self, ast: &Ast) {
        self.pending.push(Rc::new(Typedef {
            ast: ast.clone(),
            user_defined: true,
        }));
    }

    fn unknown_type(&self, name: &str, range: ByteRange) -> Message {
        let names = self.typedefs.names().collect::<Vec<_>>();
        let mut candidates = names.iter().map(String::as_str).collect::<Vec<&str>>();
        candidates.extend(keywords::suggestions(self.lang).filter(|keyword| keywords::find_type(keyword).is_some()).map(|keyword| -> &str { keyword }));
        ParseMessage::Unknown {
            range,
            what: Unknown::Type,
            name: name.to_owned(),
            suggestions: dym::suggestions(name, candidates),
        }
        .into()
    }
}

/// Parse an integer literal in decimal, octal, hexadecimal or binary,
/// ignoring digit separators and integer suffixes.
fn parse_number(literal: &str) -> Option<u64> {
    let literal = literal.replace('\'', "");
    let literal = literal.trim_end_matches(|c: char| matches!(c, 'u' | 'U' | 'l' | 'L' | 'z' | 'Z'));
    let (digits, radix) = if let Some(hex) = literal.strip_prefix("0x").or_else(|| literal.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = literal.strip_prefix("0b").or_else(|| literal.strip_prefix("0B")) {
        (bin, 2)
    } else if literal.len() > 1 && literal.starts_with('0') {
        (&literal[1..], 8)
    } else {
        (literal, 10)
    };
    u64::from_str_radix(digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(parse_number("10"), Some(10));
        assert_eq!(parse_number("0x1F"), Some(31));
        assert_eq!(parse_number("010"), Some(8));
        assert_eq!(parse_number("0b101"), Some(5));
        assert_eq!(parse_number("1'000u"), Some(1000));
        assert_eq!(parse_number("0"), Some(0));
        assert_eq!(parse_number("12abc"), None);
    }

    #[test]
    fn lexer_errors_are_messages() {
        let typedefs = Typedefs::new();
        let error = gibberish_decls("int @x", Lang::C_17, &typedefs).unwrap_err();
        assert!(matches!(error, Message::Lexer(_)));
    }

    #[test]
    fn extra_tokens() {
        let typedefs = Typedefs::new();
        let error = english_decl("pointer to int )", Lang::C_17, &typedefs).unwrap_err();
        assert!(matches!(error, Message::Parse(ParseMessage::ExtraToken { .. })));
    }
}
