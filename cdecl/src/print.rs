//! Printing declarations as C/C++ ("gibberish") and as pseudo-English.
//!
//! Both printers work from the same [`Ast`](crate::ast::Ast) the parsers
//! build, so anything that can be parsed in one direction can be printed in
//! the other.

use crate::lang::{feature, Lang};
use crate::operators::Graph;
use crate::options::{Options, WestDecl};
use crate::types::{ExplicitInt, NameStyle, TypeId};

pub mod english;
pub mod gibberish;

/// The options that affect how declarations are printed.
#[derive(Debug, Copy, Clone)]
pub struct Style {
    pub lang: Lang,
    pub alt_tokens: bool,
    /// Di- or trigraphs, if the language has them.
    pub graph: Graph,
    pub east_const: bool,
    pub english_types: bool,
    pub explicit_ecsu: TypeId,
    pub explicit_int: ExplicitInt,
    pub semicolon: bool,
    pub trailing_return: bool,
    pub using: bool,
    pub west_decl: WestDecl,
}

impl Style {
    pub fn new(options: &Options) -> Style {
        let lang = options.lang;
        let graph = match options.graph {
            Graph::Digraphs if lang.is_any(feature::DIGRAPHS) => Graph::Digraphs,
            Graph::Trigraphs if lang.is_any(feature::TRIGRAPHS) => Graph::Trigraphs,
            _ => Graph::None,
        };
        Style {
            lang,
            alt_tokens: options.alt_tokens,
            graph,
            east_const: options.east_const,
            english_types: options.english_types,
            explicit_ecsu: options.explicit_ecsu,
            explicit_int: options.explicit_int,
            semicolon: options.semicolon,
            trailing_return: options.trailing_return,
            using: options.using,
            west_decl: options.west_decl,
        }
    }

    /// The same style in another language, e.g. for a predefined type name
    /// that only exists in C++.
    pub fn with_lang(self, lang: Lang) -> Style {
        Style { lang, ..self }
    }

    /// How to print type keywords in C/C++.
    fn gibberish_names(&self) -> NameStyle {
        let attr_brackets = match self.lang.is_any(feature::ATTRIBUTES) {
            true => Some(("[[", "]]")),
            false => None,
        };
        NameStyle {
            east_const: self.east_const,
            explicit_int: self.explicit_int,
            explicit_ecsu: Some(self.explicit_ecsu),
            attr_brackets,
            ..NameStyle::gibberish(self.lang)
        }
    }

    /// How to print type words in pseudo-English.
    fn english_names(&self) -> NameStyle {
        NameStyle::english(self.lang, self.english_types)
    }
}

impl Default for Style {
    fn default() -> Style {
        Style::new(&Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::util;
    use crate::ast::Ast;
    use crate::parse::{self, Command};
    use crate::session::Session;

    const DECLS: &[&str] = &[
        "int x",
        "int (*p)(char, double)",
        "char *const *p",
        "const int *a[10]",
        "int (*f(int))[3]",
        "void (*signal(int, void (*)(int)))(int)",
        "static unsigned long x",
        "volatile short **q",
        "void f(int x, ...)",
        "size_t n",
    ];

    const CPP_DECLS: &[&str] = &["int &r", "int (&ra)[4]", "int &&rr", "const char *const &s"];

    const LANGS: &[Lang] = &[Lang::C_89, Lang::C_99, Lang::C_17, Lang::CPP_11, Lang::CPP_23];

    fn session(lang: Lang) -> Session {
        Session::new(Options {
            lang,
            semicolon: false,
            ..Options::default()
        })
    }

    fn decls(lang: Lang) -> impl Iterator<Item = &'static str> {
        let cpp: &'static [&'static str] = if lang.is_cpp() { CPP_DECLS } else { &[] };
        DECLS.iter().chain(cpp).copied()
    }

    fn parse_decl(source: &str, session: &Session) -> Ast {
        let mut asts = parse::gibberish_decls(source, session.lang(), session.typedefs())
            .unwrap_or_else(|error| panic!("{source}: {error:?}"));
        assert_eq!(asts.len(), 1, "{source}");
        asts.remove(0)
    }

    #[test]
    fn gibberish_round_trips() {
        for &lang in LANGS {
            let session = session(lang);
            let style = Style::new(session.options());
            for source in decls(lang) {
                let ast = parse_decl(source, &session);
                let printed = gibberish::decl(&ast, &style);
                let reparsed = parse_decl(&printed, &session);
                assert!(util::equiv(&ast, &reparsed), "{lang}: {source} printed as {printed}");
            }
        }
    }

    #[test]
    fn english_round_trips() {
        for &lang in LANGS {
            let session = session(lang);
            let style = Style::new(session.options());
            for source in decls(lang) {
                let ast = parse_decl(source, &session);
                let printed = english::decl(&ast, &style);
                let parsed = parse::command(&printed, &session)
                    .unwrap_or_else(|error| panic!("{lang}: {printed}: {error:?}"));
                let Some(Command::Declare(asts)) = parsed.command else {
                    panic!("{lang}: {printed}: {:?}", parsed.command)
                };
                assert_eq!(asts.len(), 1, "{printed}");
                assert!(util::equiv(&ast, &asts[0]), "{lang}: {source} printed as {printed}");
            }
        }
    }
}
