use codespan_reporting::diagnostic::{Diagnostic, Label};
use logos::{Filter, Logos};

use crate::files::FileId;
use crate::source::{BytePos, ByteRange};

/// Tokens of both C/C++ declarations and pseudo-English.
///
/// Keywords are not distinguished here since which words are keywords
/// depends on the current language. Digraphs and trigraphs are lexed as the
/// tokens they stand for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Logos)]
pub enum Token<'source> {
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*")]
    Name(&'source str),
    #[regex(r"[0-9][a-zA-Z0-9_']*")]
    Number(&'source str),
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| &lex.slice()[1..(lex.slice().len() - 1)])]
    StringLiteral(&'source str),
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| &lex.slice()[1..(lex.slice().len() - 1)])]
    CharLiteral(&'source str),

    #[token("&")]
    Amper,
    #[token("&&")]
    Amper2,
    #[token("&=")]
    AmperEq,
    #[token("->")]
    Arrow,
    #[token("->*")]
    ArrowStar,
    #[token("^")]
    #[token("??'")]
    Circ,
    #[token("^=")]
    #[token("??'=")]
    CircEq,
    #[token(":")]
    Colon,
    #[token("::")]
    Colon2,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(".*")]
    DotStar,
    #[token("...")]
    Ellipsis,
    #[token("=")]
    Eq,
    #[token("==")]
    Eq2,
    #[token("!")]
    Exclam,
    #[token("!=")]
    ExclamEq,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEq,
    #[token(">>")]
    Greater2,
    #[token(">>=")]
    Greater2Eq,
    #[token("#")]
    #[token("%:")]
    #[token("??=")]
    Hash,
    #[token("##")]
    #[token("%:%:")]
    Hash2,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEq,
    #[token("<=>")]
    LessEqGreater,
    #[token("<<")]
    Less2,
    #[token("<<=")]
    Less2Eq,
    #[token("-")]
    Minus,
    #[token("--")]
    Minus2,
    #[token("-=")]
    MinusEq,
    #[token("%")]
    Percent,
    #[token("%=")]
    PercentEq,
    #[token("|")]
    #[token("??!")]
    Pipe,
    #[token("||")]
    #[token("??!??!")]
    Pipe2,
    #[token("|=")]
    #[token("??!=")]
    PipeEq,
    #[token("+")]
    Plus,
    #[token("++")]
    Plus2,
    #[token("+=")]
    PlusEq,
    #[token("?")]
    Qmark,
    #[token(";")]
    Semicolon,
    #[token("/")]
    Slash,
    #[token("/=")]
    SlashEq,
    #[token("*")]
    Star,
    #[token("*=")]
    StarEq,
    #[token("~")]
    #[token("??-")]
    Tilde,

    #[token("{")]
    #[token("<%")]
    #[token("??<")]
    OpenBrace,
    #[token("}")]
    #[token("%>")]
    #[token("??>")]
    CloseBrace,
    #[token("[")]
    #[token("<:")]
    #[token("??(")]
    OpenBracket,
    #[token("]")]
    #[token(":>")]
    #[token("??)")]
    CloseBracket,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,

    #[token("/*", block_comment)]
    UnclosedBlockComment,

    #[error]
    #[regex(r"\p{Whitespace}", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)]
    Error,
}

fn block_comment<'source>(lexer: &mut logos::Lexer<'source, Token<'source>>) -> Filter<()> {
    match lexer.remainder().find("*/") {
        Some(end) => {
            lexer.bump(end + 2);
            Filter::Skip
        }
        None => {
            lexer.bump(lexer.remainder().len());
            Filter::Emit(())
        }
    }
}

#[derive(Clone, Debug)]
pub enum Error {
    UnclosedBlockComment { range: ByteRange },
    UnexpectedCharacter { range: ByteRange },
}

impl Error {
    pub fn range(&self) -> ByteRange {
        match self {
            Error::UnclosedBlockComment { range } | Error::UnexpectedCharacter { range } => *range,
        }
    }

    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic<FileId> {
        match self {
            Error::UnexpectedCharacter { range } => Diagnostic::error()
                .with_message("unexpected character")
                .with_labels(vec![Label::primary(file_id, *range)]),
            Error::UnclosedBlockComment { range } => Diagnostic::error()
                .with_message("unclosed block comment")
                .with_labels(vec![Label::primary(file_id, *range).with_message("first `/*`")])
                .with_notes(vec!["Help: `*/` needed".to_owned()]),
        }
    }
}

/// The tokens of `source`, with their ranges.
pub fn tokens(source: &str) -> impl Iterator<Item = Result<(Token<'_>, ByteRange), Error>> {
    assert!(
        source.len() <= u32::MAX as usize,
        "`source` must be less than 4GiB in length"
    );

    Token::lexer(source).spanned().map(move |(token, range)| {
        let range = ByteRange::new(range.start as BytePos, range.end as BytePos);
        match token {
            Token::UnclosedBlockComment => Err(Error::UnclosedBlockComment {
                range: ByteRange::new(range.start(), range.start() + 2),
            }),
            Token::Error => Err(Error::UnexpectedCharacter { range }),
            token => Ok((token, range)),
        }
    })
}

impl<'source> Token<'source> {
    pub fn description(&self) -> String {
        match self {
            Token::Name(name) => format!("name \"{name}\""),
            Token::Number(number) => format!("number {number}"),
            Token::StringLiteral(_) => "string literal".to_owned(),
            Token::CharLiteral(_) => "character literal".to_owned(),
            token => format!("`{}`", token.punctuator()),
        }
    }

    /// The canonical spelling of a punctuator, or `""`.
    pub fn punctuator(&self) -> &'static str {
        match self {
            Token::Amper => "&",
            Token::Amper2 => "&&",
            Token::AmperEq => "&=",
            Token::Arrow => "->",
            Token::ArrowStar => "->*",
            Token::Circ => "^",
            Token::CircEq => "^=",
            Token::Colon => ":",
            Token::Colon2 => "::",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::DotStar => ".*",
            Token::Ellipsis => "...",
            Token::Eq => "=",
            Token::Eq2 => "==",
            Token::Exclam => "!",
            Token::ExclamEq => "!=",
            Token::Greater => ">",
            Token::GreaterEq => ">=",
            Token::Greater2 => ">>",
            Token::Greater2Eq => ">>=",
            Token::Hash => "#",
            Token::Hash2 => "##",
            Token::Less => "<",
            Token::LessEq => "<=",
            Token::LessEqGreater => "<=>",
            Token::Less2 => "<<",
            Token::Less2Eq => "<<=",
            Token::Minus => "-",
            Token::Minus2 => "--",
            Token::MinusEq => "-=",
            Token::Percent => "%",
            Token::PercentEq => "%=",
            Token::Pipe => "|",
            Token::Pipe2 => "||",
            Token::PipeEq => "|=",
            Token::Plus => "+",
            Token::Plus2 => "++",
            Token::PlusEq => "+=",
            Token::Qmark => "?",
            Token::Semicolon => ";",
            Token::Slash => "/",
            Token::SlashEq => "/=",
            Token::Star => "*",
            Token::StarEq => "*=",
            Token::Tilde => "~",
            Token::OpenBrace => "{",
            Token::CloseBrace => "}",
            Token::OpenBracket => "[",
            Token::CloseBracket => "]",
            Token::OpenParen => "(",
            Token::CloseParen => ")",
            Token::Name(_)
            | Token::Number(_)
            | Token::StringLiteral(_)
            | Token::CharLiteral(_)
            | Token::UnclosedBlockComment
            | Token::Error => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token<'_>> {
        tokens(source).map(|result| result.unwrap().0).collect()
    }

    #[test]
    fn declaration() {
        assert_eq!(
            lex("int (*p)[10]; // comment"),
            [
                Token::Name("int"),
                Token::OpenParen,
                Token::Star,
                Token::Name("p"),
                Token::CloseParen,
                Token::OpenBracket,
                Token::Number("10"),
                Token::CloseBracket,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn graphs() {
        assert_eq!(lex("<: :> ??( ??)"), lex("[ ] [ ]"));
        assert_eq!(lex("operator <::>"), [Token::Name("operator"), Token::OpenBracket, Token::CloseBracket]);
        assert_eq!(lex("??!??! %:"), [Token::Pipe2, Token::Hash]);
    }

    #[test]
    fn comments_and_literals() {
        assert_eq!(
            lex(r#"/* x */ operator"" _km"#),
            [Token::Name("operator"), Token::StringLiteral(""), Token::Name("_km")]
        );
        let ranges = tokens("a /* b").map(|result| result.is_err()).collect::<Vec<_>>();
        assert_eq!(ranges, [false, true]);
    }

    #[test]
    fn ranges() {
        let ranges = tokens("a->*b").map(|result| result.unwrap().1).collect::<Vec<_>>();
        assert_eq!(ranges, [ByteRange::new(0, 1), ByteRange::new(1, 4), ByteRange::new(4, 5)]);
    }
}
