//! Overloadable C++ operators.

use std::fmt;

use crate::lang::{self, Lang, LangIds};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperId {
    CoAwait,
    New,
    NewArray,
    Delete,
    DeleteArray,
    Exclam,
    ExclamEq,
    Percent,
    PercentEq,
    Amper,
    Amper2,
    AmperEq,
    Parens,
    Star,
    StarEq,
    Plus,
    Plus2,
    PlusEq,
    Comma,
    Minus,
    Minus2,
    MinusEq,
    Arrow,
    ArrowStar,
    Dot,
    DotStar,
    Slash,
    SlashEq,
    Colon2,
    Less,
    Less2,
    Less2Eq,
    LessEq,
    LessEqGreater,
    Eq,
    Eq2,
    Greater,
    GreaterEq,
    Greater2,
    Greater2Eq,
    QmarkColon,
    Brackets,
    Circ,
    CircEq,
    Pipe,
    PipeEq,
    Pipe2,
    Tilde,
}

/// Whether an operator can be overloaded as a member, a non-member, or
/// either.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Overload {
    None,
    Member,
    Either,
}

pub const UNLIMITED: usize = usize::MAX;

#[derive(Debug)]
pub struct Operator {
    pub id: OperId,
    pub literal: &'static str,
    pub langs: LangIds,
    pub overload: Overload,
    pub params_min: usize,
    pub params_max: usize,
}

const CPP: LangIds = LangIds::CPP_ANY;

const fn op(
    id: OperId,
    literal: &'static str,
    langs: LangIds,
    overload: Overload,
    params_min: usize,
    params_max: usize,
) -> Operator {
    Operator {
        id,
        literal,
        langs,
        overload,
        params_min,
        params_max,
    }
}

use Overload::{Either as EIT, Member as MBR, None as XXX};
const UNL: usize = UNLIMITED;

/// Every operator, in [`OperId`] order. An operator whose parameters changed
/// between revisions has one entry per set of revisions.
#[rustfmt::skip]
const OPERATORS: &[Operator] = &[
    op(OperId::CoAwait,       "co_await", lang::min(Lang::CPP_20),     EIT, 0, 1),
    op(OperId::New,           "new",      CPP,                         EIT, 1, UNL),
    op(OperId::NewArray,      "new[]",    CPP,                         EIT, 1, UNL),
    op(OperId::Delete,        "delete",   CPP,                         EIT, 1, UNL),
    op(OperId::DeleteArray,   "delete[]", CPP,                         EIT, 1, UNL),
    op(OperId::Exclam,        "!",        CPP,                         EIT, 0, 1),
    op(OperId::ExclamEq,      "!=",       CPP,                         EIT, 1, 2),
    op(OperId::Percent,       "%",        CPP,                         EIT, 1, 2),
    op(OperId::PercentEq,     "%=",       CPP,                         EIT, 1, 2),
    op(OperId::Amper,         "&",        CPP,                         EIT, 0, 2),
    op(OperId::Amper2,        "&&",       CPP,                         EIT, 1, 2),
    op(OperId::AmperEq,       "&=",       CPP,                         EIT, 1, 2),
    op(OperId::Parens,        "()",       CPP,                         MBR, 0, UNL),
    op(OperId::Star,          "*",        CPP,                         EIT, 0, 2),
    op(OperId::StarEq,        "*=",       CPP,                         EIT, 1, 2),
    op(OperId::Plus,          "+",        CPP,                         EIT, 0, 2),
    op(OperId::Plus2,         "++",       CPP,                         EIT, 0, 2),
    op(OperId::PlusEq,        "+=",       CPP,                         EIT, 1, 2),
    op(OperId::Comma,         ",",        CPP,                         EIT, 1, 2),
    op(OperId::Minus,         "-",        CPP,                         EIT, 0, 2),
    op(OperId::Minus2,        "--",       CPP,                         EIT, 0, 2),
    op(OperId::MinusEq,       "-=",       CPP,                         EIT, 1, 2),
    op(OperId::Arrow,         "->",       CPP,                         MBR, 0, 0),
    op(OperId::ArrowStar,     "->*",      CPP,                         EIT, 1, 2),
    op(OperId::Dot,           ".",        CPP,                         XXX, 0, 0),
    op(OperId::DotStar,       ".*",       CPP,                         XXX, 0, 0),
    op(OperId::Slash,         "/",        CPP,                         EIT, 1, 2),
    op(OperId::SlashEq,       "/=",       CPP,                         EIT, 1, 2),
    op(OperId::Colon2,        "::",       CPP,                         XXX, 0, 0),
    op(OperId::Less,          "<",        CPP,                         EIT, 1, 2),
    op(OperId::Less2,         "<<",       CPP,                         EIT, 1, 2),
    op(OperId::Less2Eq,       "<<=",      CPP,                         EIT, 1, 2),
    op(OperId::LessEq,        "<=",       CPP,                         EIT, 1, 2),
    op(OperId::LessEqGreater, "<=>",      lang::min(Lang::CPP_20),     EIT, 1, 2),
    op(OperId::Eq,            "=",        CPP,                         MBR, 1, 1),
    op(OperId::Eq2,           "==",       CPP,                         EIT, 1, 2),
    op(OperId::Greater,       ">",        CPP,                         EIT, 1, 2),
    op(OperId::GreaterEq,     ">=",       CPP,                         EIT, 1, 2),
    op(OperId::Greater2,      ">>",       CPP,                         EIT, 1, 2),
    op(OperId::Greater2Eq,    ">>=",      CPP,                         EIT, 1, 2),
    op(OperId::QmarkColon,    "?:",       CPP,                         XXX, 0, 0),
    op(OperId::Brackets,      "[]",       lang::cpp_max(Lang::CPP_20), MBR, 1, 1),
    op(OperId::Brackets,      "[]",       lang::min(Lang::CPP_23),     MBR, 0, UNL),
    op(OperId::Circ,          "^",        CPP,                         EIT, 1, 2),
    op(OperId::CircEq,        "^=",       CPP,                         EIT, 1, 2),
    op(OperId::Pipe,          "|",        CPP,                         EIT, 1, 2),
    op(OperId::PipeEq,        "|=",       CPP,                         EIT, 1, 2),
    op(OperId::Pipe2,         "||",       CPP,                         EIT, 1, 2),
    op(OperId::Tilde,         "~",        CPP,                         EIT, 0, 1),
];

/// How to spell operator tokens.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Graph {
    #[default]
    None,
    Digraphs,
    Trigraphs,
}

impl OperId {
    /// The operator's entry for `lang`, or its newest entry if none is legal
    /// in `lang`.
    pub fn get(self, lang: Lang) -> &'static Operator {
        let mut entries = OPERATORS.iter().filter(|op| op.id == self).peekable();
        let mut best = None;
        while let Some(entry) = entries.next() {
            if lang.is_any(entry.langs) || entries.peek().is_none() {
                return entry;
            }
            best = Some(entry);
        }
        // Every identifier has an entry.
        best.unwrap_or(&OPERATORS[0])
    }

    /// The operator's spelling, e.g. `->`.
    pub fn literal(self) -> &'static str {
        self.get(Lang::CPP_NEW).literal
    }

    /// Find the operator spelled `literal`.
    pub fn find(literal: &str) -> Option<OperId> {
        OPERATORS
            .iter()
            .find(|op| op.literal == literal)
            .map(|op| op.id)
    }

    /// Can this operator's only parameter be an `int` sentinel, i.e. is it
    /// `++` or `--`?
    pub fn has_postfix_form(self) -> bool {
        matches!(self, OperId::Plus2 | OperId::Minus2)
    }

    pub fn is_new_delete(self) -> bool {
        matches!(
            self,
            OperId::New | OperId::NewArray | OperId::Delete | OperId::DeleteArray
        )
    }

    pub fn is_delete(self) -> bool {
        matches!(self, OperId::Delete | OperId::DeleteArray)
    }

    /// Is this `==`, `!=`, `<`, `<=`, `>`, `>=`, or `<=>`?
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            OperId::Eq2
                | OperId::ExclamEq
                | OperId::Less
                | OperId::LessEq
                | OperId::Greater
                | OperId::GreaterEq
                | OperId::LessEqGreater
        )
    }

    /// The token to print for this operator, taking alternative tokens and
    /// di/trigraphs into account.
    pub fn token(self, alt_tokens: bool, graph: Graph) -> &'static str {
        if alt_tokens {
            let alt = match self {
                OperId::Amper2 => Some("and"),
                OperId::AmperEq => Some("and_eq"),
                OperId::Amper => Some("bitand"),
                OperId::Pipe => Some("bitor"),
                OperId::Tilde => Some("compl"),
                OperId::Exclam => Some("not"),
                OperId::ExclamEq => Some("not_eq"),
                OperId::Pipe2 => Some("or"),
                OperId::PipeEq => Some("or_eq"),
                OperId::Circ => Some("xor"),
                OperId::CircEq => Some("xor_eq"),
                _ => None,
            };
            if let Some(alt) = alt {
                return alt;
            }
        }
        match (graph, self) {
            (Graph::Digraphs, OperId::Brackets) => "<::>",
            (Graph::Trigraphs, OperId::Brackets) => "?\x3F(?\x3F)",
            (Graph::Trigraphs, OperId::Circ) => "?\x3F'",
            (Graph::Trigraphs, OperId::CircEq) => "?\x3F'=",
            (Graph::Trigraphs, OperId::Pipe) => "?\x3F!",
            (Graph::Trigraphs, OperId::PipeEq) => "?\x3F!=",
            (Graph::Trigraphs, OperId::Pipe2) => "?\x3F!?\x3F!",
            (Graph::Trigraphs, OperId::Tilde) => "?\x3F-",
            _ => self.literal(),
        }
    }
}

impl fmt::Display for OperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

impl Operator {
    pub fn is_overloadable(&self) -> bool {
        self.overload != Overload::None
    }

    /// Could the number of parameters make this either a member or a
    /// non-member, e.g. the unary or binary `*`?
    pub fn is_ambiguous(&self) -> bool {
        self.params_min == 0 && self.params_max == 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_depend_on_language() {
        let op = OperId::Brackets.get(Lang::CPP_20);
        assert_eq!((op.params_min, op.params_max), (1, 1));
        let op = OperId::Brackets.get(Lang::CPP_23);
        assert_eq!((op.params_min, op.params_max), (0, UNLIMITED));
        // Not legal in C at all, so the newest entry is used.
        assert_eq!(OperId::Brackets.get(Lang::C_17).params_max, UNLIMITED);
    }

    #[test]
    fn literals() {
        assert_eq!(OperId::find("->*"), Some(OperId::ArrowStar));
        assert_eq!(OperId::find("new[]"), Some(OperId::NewArray));
        assert_eq!(OperId::ArrowStar.to_string(), "->*");
        assert!(OperId::find("**").is_none());
    }

    #[test]
    fn tokens() {
        assert_eq!(OperId::Amper2.token(true, Graph::None), "and");
        assert_eq!(OperId::Plus.token(true, Graph::None), "+");
        assert_eq!(OperId::Brackets.token(false, Graph::Digraphs), "<::>");
        assert_eq!(OperId::Brackets.token(false, Graph::Trigraphs), "??(??)");
    }

    #[test]
    fn table_is_sorted() {
        for pair in OPERATORS.windows(2) {
            assert!(pair[0].id <= pair[1].id);
        }
        assert!(OperId::Star.get(Lang::CPP_17).is_ambiguous());
        assert!(!OperId::Dot.get(Lang::CPP_17).is_overloadable());
    }
}
