//! User-settable options, given on the command line or with `set`.

use std::fmt;

use bitflags::bitflags;
use itertools::Itertools;

use crate::dym;
use crate::lang::{self, Lang};
use crate::operators::Graph;
use crate::parse::SetOption;
use crate::reporting::{Message, ParseMessage, SemanticMessage, Unknown};
use crate::types::{ExplicitInt, TypeId};

bitflags! {
    /// The kinds of declaration printed with `*`, `&` and `&&` next to the
    /// type rather than the name, e.g. `int* f()`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
    pub struct WestDecl: u8 {
        const BLOCK = 1 << 0;
        const FUNC = 1 << 1;
        const LITERAL = 1 << 2;
        const OPERATOR = 1 << 3;
        const CONVERSION = 1 << 4;
        /// Everything that is not function-like.
        const NON_FUNC = 1 << 5;
    }
}

const WEST_DECL_LETTERS: &[(char, WestDecl)] = &[
    ('b', WestDecl::BLOCK),
    ('f', WestDecl::FUNC),
    ('l', WestDecl::LITERAL),
    ('o', WestDecl::OPERATOR),
    ('r', WestDecl::CONVERSION),
    ('t', WestDecl::NON_FUNC),
];

impl WestDecl {
    /// Parse a mask like `bf`, or `*` for everything or `-` for nothing.
    pub fn parse(mask: &str) -> Option<WestDecl> {
        match mask {
            "*" => return Some(WestDecl::all()),
            "-" => return Some(WestDecl::empty()),
            _ => {}
        }
        mask.chars().try_fold(WestDecl::empty(), |acc, c| {
            let c = c.to_ascii_lowercase();
            let (_, bit) = WEST_DECL_LETTERS.iter().find(|(letter, _)| *letter == c)?;
            Some(acc | *bit)
        })
    }
}

impl fmt::Display for WestDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == WestDecl::all() {
            return f.write_str("*");
        }
        if self.is_empty() {
            return f.write_str("-");
        }
        for (letter, bit) in WEST_DECL_LETTERS {
            if self.contains(*bit) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

const ECSU_LETTERS: &[(char, TypeId)] = &[
    ('e', TypeId::ENUM),
    ('c', TypeId::CLASS),
    ('s', TypeId::STRUCT),
    ('u', TypeId::UNION),
];

/// Parse an `explicit-ecsu` mask like `su`, or `*` or `-`.
pub fn parse_explicit_ecsu(mask: &str) -> Option<TypeId> {
    match mask {
        "*" => return Some(TypeId::ANY_ECSU),
        "-" => return Some(TypeId::empty()),
        _ => {}
    }
    mask.chars().try_fold(TypeId::empty(), |acc, c| {
        let c = c.to_ascii_lowercase();
        let (_, ty) = ECSU_LETTERS.iter().find(|(letter, _)| *letter == c)?;
        Some(acc | *ty)
    })
}

fn explicit_ecsu_mask(ecsu: TypeId) -> String {
    if ecsu.contains(TypeId::ANY_ECSU) {
        return "*".to_owned();
    }
    ECSU_LETTERS
        .iter()
        .filter(|(_, ty)| ecsu.contains(*ty))
        .map(|(letter, _)| *letter)
        .collect()
}

#[derive(Debug, Clone)]
pub struct Options {
    pub lang: Lang,
    /// Print alternative tokens like `bitand` in operator names.
    pub alt_tokens: bool,
    /// Dump each parsed declaration.
    pub debug: bool,
    pub graph: Graph,
    pub east_const: bool,
    /// Echo each command read from a file.
    pub echo_commands: bool,
    /// Use `integer` rather than `int` and so on in pseudo-English.
    pub english_types: bool,
    /// Which of `enum`, `class`, `struct` and `union` are printed before
    /// a C++ type name.
    pub explicit_ecsu: TypeId,
    pub explicit_int: ExplicitInt,
    /// Treat a line without a command as `explain`.
    pub infer_command: bool,
    pub prompt: bool,
    pub semicolon: bool,
    pub trailing_return: bool,
    /// Print `using` rather than `typedef` in C++11 and later.
    pub using: bool,
    pub west_decl: WestDecl,
    /// Load the standard and platform type names.
    pub predefined_typedefs: bool,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            lang: Lang::C_NEW,
            alt_tokens: false,
            debug: false,
            graph: Graph::None,
            east_const: false,
            echo_commands: false,
            english_types: false,
            explicit_ecsu: TypeId::STRUCT | TypeId::UNION,
            explicit_int: ExplicitInt::NONE,
            infer_command: false,
            prompt: true,
            semicolon: true,
            trailing_return: false,
            using: true,
            west_decl: WestDecl::CONVERSION,
            predefined_typedefs: true,
        }
    }
}

/// Whether an option can be turned on, off, or both.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Toggle {
    Both,
    OnOnly,
    OffOnly,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum OptionId {
    AltTokens,
    Debug,
    Digraphs,
    EastConst,
    EchoCommands,
    EnglishTypes,
    ExplicitEcsu,
    ExplicitInt,
    Graphs,
    InferCommand,
    Lang,
    Prompt,
    Semicolon,
    TrailingReturn,
    Trigraphs,
    Using,
    WestDecl,
}

struct OptionInfo {
    name: &'static str,
    id: OptionId,
    toggle: Toggle,
    /// Requires `=VALUE` when turned on.
    takes_value: bool,
}

const fn option(name: &'static str, id: OptionId, toggle: Toggle, takes_value: bool) -> OptionInfo {
    OptionInfo {
        name,
        id,
        toggle,
        takes_value,
    }
}

const OPTIONS: &[OptionInfo] = &[
    option("alt-tokens", OptionId::AltTokens, Toggle::Both, false),
    option("debug", OptionId::Debug, Toggle::Both, false),
    option("digraphs", OptionId::Digraphs, Toggle::OnOnly, false),
    option("east-const", OptionId::EastConst, Toggle::Both, false),
    option("echo-commands", OptionId::EchoCommands, Toggle::Both, false),
    option("english-types", OptionId::EnglishTypes, Toggle::Both, false),
    option("explain-by-default", OptionId::InferCommand, Toggle::Both, false),
    option("explicit-ecsu", OptionId::ExplicitEcsu, Toggle::Both, true),
    option("explicit-int", OptionId::ExplicitInt, Toggle::Both, true),
    option("graphs", OptionId::Graphs, Toggle::OffOnly, false),
    option("infer-command", OptionId::InferCommand, Toggle::Both, false),
    option("lang", OptionId::Lang, Toggle::OnOnly, true),
    option("prompt", OptionId::Prompt, Toggle::Both, false),
    option("semicolon", OptionId::Semicolon, Toggle::Both, false),
    option("trailing-return", OptionId::TrailingReturn, Toggle::Both, false),
    option("trigraphs", OptionId::Trigraphs, Toggle::OnOnly, false),
    option("using", OptionId::Using, Toggle::Both, false),
    option("west-decl", OptionId::WestDecl, Toggle::Both, true),
];

/// The option names `set` accepts, for help and suggestions.
pub fn option_names() -> impl Iterator<Item = &'static str> {
    OPTIONS.iter().map(|info| info.name)
}

fn without_hyphens(name: &str) -> String {
    name.chars().filter(|c| *c != '-').collect()
}

/// The options that `name` is a prefix of, ignoring hyphens. An exact match
/// is the only match.
fn find_options(name: &str) -> Vec<&'static OptionInfo> {
    let name = without_hyphens(name).to_ascii_lowercase();
    if name.is_empty() {
        return Vec::new();
    }
    let matches = OPTIONS
        .iter()
        .filter(|info| without_hyphens(info.name).starts_with(&name))
        .collect::<Vec<_>>();
    match matches.iter().find(|info| without_hyphens(info.name) == name) {
        Some(exact) => vec![*exact],
        None => matches
            .into_iter()
            .unique_by(|info| info.id)
            .collect(),
    }
}

impl Options {
    /// Apply a `set` option, returning any warning about it.
    pub fn set(&mut self, option: &SetOption) -> Result<Option<SemanticMessage>, Message> {
        let range = option.range;
        let name = option.name.as_str();

        let (infos, is_off) = match find_options(name) {
            infos if !infos.is_empty() => (infos, false),
            _ => match name.strip_prefix("no") {
                Some(rest) if !find_options(rest).is_empty() => (find_options(rest), true),
                _ => {
                    if option.value.is_none() {
                        if let Some(lang) = lang::find(name) {
                            return Ok(self.set_lang(lang, option));
                        }
                    }
                    let no_names = OPTIONS
                        .iter()
                        .filter(|info| info.toggle != Toggle::OnOnly)
                        .map(|info| format!("no{}", info.name))
                        .collect::<Vec<_>>();
                    let mut candidates = option_names().chain(lang::all_names()).collect::<Vec<&str>>();
                    candidates.extend(no_names.iter().map(String::as_str));
                    return Err(ParseMessage::Unknown {
                        range,
                        what: Unknown::SetOption,
                        name: name.to_owned(),
                        suggestions: dym::suggestions(name, candidates),
                    }
                    .into());
                }
            },
        };

        let info = match infos.as_slice() {
            [info] => *info,
            infos => {
                let names = infos.iter().map(|info| format!("\"{}\"", info.name)).collect::<Vec<_>>();
                let could_be = match names.split_last() {
                    Some((last, [first])) => format!("{first} or {last}"),
                    Some((last, rest)) => format!("{}, or {last}", rest.iter().format(", ")),
                    None => String::new(),
                };
                return Err(SemanticMessage::error(
                    range,
                    format!("\"{name}\": ambiguous set option; could be {could_be}"),
                )
                .into());
            }
        };

        match (info.toggle, is_off) {
            (Toggle::OnOnly, true) => {
                return Err(SemanticMessage::error(range, format!("\"no\" not valid for \"{}\"", info.name)).into())
            }
            (Toggle::OffOnly, false) => {
                return Err(SemanticMessage::error(range, format!("\"no\" required for \"{}\"", info.name)).into())
            }
            _ => {}
        }

        let value = match (&option.value, is_off, info.takes_value) {
            (Some(_), true, _) => {
                return Err(SemanticMessage::error(range, "\"no\" set options take no value").into())
            }
            (Some(value), false, false) => {
                return Err(SemanticMessage::error(
                    range,
                    format!("\"{value}\": set option \"{}\" takes no value", info.name),
                )
                .into())
            }
            (None, false, true) => {
                return Err(SemanticMessage::error(
                    range,
                    format!("\"{}\" set option requires =<value>", info.name),
                )
                .into())
            }
            (value, _, _) => value.as_deref().unwrap_or_default(),
        };
        let on = !is_off;

        let invalid = |value: &str| -> Message {
            SemanticMessage::error(range, format!("\"{value}\": invalid value for \"{}\"", info.name)).into()
        };

        match info.id {
            OptionId::AltTokens => self.alt_tokens = on,
            OptionId::Debug => self.debug = on,
            OptionId::Digraphs => {
                self.graph = Graph::Digraphs;
                return Ok(self.graph_warning(option));
            }
            OptionId::Trigraphs => {
                self.graph = Graph::Trigraphs;
                return Ok(self.graph_warning(option));
            }
            OptionId::Graphs => self.graph = Graph::None,
            OptionId::EastConst => self.east_const = on,
            OptionId::EchoCommands => self.echo_commands = on,
            OptionId::EnglishTypes => self.english_types = on,
            OptionId::InferCommand => self.infer_command = on,
            OptionId::Prompt => self.prompt = on,
            OptionId::Semicolon => self.semicolon = on,
            OptionId::TrailingReturn => self.trailing_return = on,
            OptionId::Using => self.using = on,
            OptionId::ExplicitEcsu => {
                self.explicit_ecsu = match on {
                    true => parse_explicit_ecsu(value).ok_or_else(|| invalid(value))?,
                    false => TypeId::empty(),
                }
            }
            OptionId::ExplicitInt => {
                self.explicit_int = match on {
                    true => ExplicitInt::parse(value).ok_or_else(|| invalid(value))?,
                    false => ExplicitInt::NONE,
                }
            }
            OptionId::WestDecl => {
                self.west_decl = match on {
                    true => WestDecl::parse(value).ok_or_else(|| invalid(value))?,
                    false => WestDecl::empty(),
                }
            }
            OptionId::Lang => match lang::find(value) {
                Some(lang) => return Ok(self.set_lang(lang, option)),
                None => {
                    return Err(ParseMessage::Unknown {
                        range,
                        what: Unknown::Language,
                        name: value.to_owned(),
                        suggestions: dym::suggestions(value, lang::all_names()),
                    }
                    .into())
                }
            },
        }
        tracing::debug!(option = info.name, on, value, "set option");
        Ok(None)
    }

    fn set_lang(&mut self, lang: Lang, option: &SetOption) -> Option<SemanticMessage> {
        tracing::debug!(%lang, "set language");
        self.lang = lang;
        self.graph_warning(option)
    }

    /// A warning if the current di/trigraph setting is not supported by the
    /// current language.
    fn graph_warning(&self, option: &SetOption) -> Option<SemanticMessage> {
        let (name, langs) = match self.graph {
            Graph::None => return None,
            Graph::Digraphs => ("digraphs", lang::feature::DIGRAPHS),
            Graph::Trigraphs => ("trigraphs", lang::feature::TRIGRAPHS),
        };
        (!self.lang.is_any(langs)).then(|| {
            SemanticMessage::warning(
                option.range,
                format!("{name} not supported{}", lang::which(langs, self.lang)),
            )
        })
    }

    /// Every option as `set` would print it, one per line.
    pub fn describe(&self) -> String {
        let flag = |on: bool, name: &str| match on {
            true => format!("    {name}"),
            false => format!("  no{name}"),
        };
        let valued = |name: &str, value: Option<String>| match value {
            Some(value) => format!("    {name}={value}"),
            None => format!("  no{name}"),
        };
        let graphs = match self.graph {
            Graph::None => "  nographs".to_owned(),
            Graph::Digraphs => "    digraphs".to_owned(),
            Graph::Trigraphs => "    trigraphs".to_owned(),
        };
        let explicit_int = (self.explicit_int != ExplicitInt::NONE).then(|| self.explicit_int.to_string());
        let explicit_ecsu = (!self.explicit_ecsu.is_empty()).then(|| explicit_ecsu_mask(self.explicit_ecsu));
        let west_decl = (!self.west_decl.is_empty()).then(|| self.west_decl.to_string());

        let lines = [
            flag(self.alt_tokens, "alt-tokens"),
            flag(self.debug, "debug"),
            flag(self.east_const, "east-const"),
            flag(self.echo_commands, "echo-commands"),
            flag(self.english_types, "english-types"),
            valued("explicit-ecsu", explicit_ecsu),
            valued("explicit-int", explicit_int),
            graphs,
            flag(self.infer_command, "infer-command"),
            format!("    lang={}", self.lang),
            flag(self.prompt, "prompt"),
            flag(self.semicolon, "semicolon"),
            flag(self.trailing_return, "trailing-return"),
            flag(self.using, "using"),
            valued("west-decl", west_decl),
        ];
        lines.iter().map(|line| format!("{line}\n")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ByteRange;

    fn set(options: &mut Options, word: &str) -> Result<Option<SemanticMessage>, Message> {
        let (name, value) = match word.split_once('=') {
            Some((name, value)) => (name, Some(value.to_owned())),
            None => (word, None),
        };
        options.set(&SetOption {
            name: name.to_owned(),
            value,
            range: ByteRange::new(0, word.len() as u32),
        })
    }

    fn error_text(result: Result<Option<SemanticMessage>, Message>) -> String {
        match result {
            Err(Message::Semantic(message)) => message.message,
            Err(Message::Parse(ParseMessage::Unknown { name, what, .. })) => format!("\"{name}\": unknown {what}"),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn toggles() {
        let mut options = Options::default();
        set(&mut options, "east-const").unwrap();
        assert!(options.east_const);
        set(&mut options, "noeast-const").unwrap();
        assert!(!options.east_const);
        set(&mut options, "noprompt").unwrap();
        assert!(!options.prompt);
        set(&mut options, "explain-by-default").unwrap();
        assert!(options.infer_command);
    }

    #[test]
    fn prefixes_ignore_hyphens() {
        let mut options = Options::default();
        set(&mut options, "alttok").unwrap();
        assert!(options.alt_tokens);
        set(&mut options, "trailing").unwrap();
        assert!(options.trailing_return);
        let text = error_text(set(&mut options, "e"));
        assert!(text.starts_with("\"e\": ambiguous set option; could be \"east-const\""), "{text}");
    }

    #[test]
    fn languages() {
        let mut options = Options::default();
        set(&mut options, "c++17").unwrap();
        assert_eq!(options.lang, Lang::CPP_17);
        set(&mut options, "lang=c89").unwrap();
        assert_eq!(options.lang, Lang::C_89);
        assert_eq!(error_text(set(&mut options, "lang=c++29")), "\"c++29\": unknown language");
    }

    #[test]
    fn values() {
        let mut options = Options::default();
        set(&mut options, "explicit-int=ul").unwrap();
        assert!(options.explicit_int.applies_to(TypeId::UNSIGNED | TypeId::LONG));
        set(&mut options, "noexplicit-int").unwrap();
        assert_eq!(options.explicit_int, ExplicitInt::NONE);
        set(&mut options, "west-decl=bf").unwrap();
        assert_eq!(options.west_decl, WestDecl::BLOCK | WestDecl::FUNC);
        set(&mut options, "explicit-ecsu=*").unwrap();
        assert_eq!(options.explicit_ecsu, TypeId::ANY_ECSU);
        assert_eq!(
            error_text(set(&mut options, "west-decl=q")),
            "\"q\": invalid value for \"west-decl\""
        );
    }

    #[test]
    fn misuse() {
        let mut options = Options::default();
        assert_eq!(error_text(set(&mut options, "nodigraphs")), "\"no\" not valid for \"digraphs\"");
        assert_eq!(error_text(set(&mut options, "graphs")), "\"no\" required for \"graphs\"");
        assert_eq!(error_text(set(&mut options, "prompt=1")), "\"1\": set option \"prompt\" takes no value");
        assert_eq!(error_text(set(&mut options, "west-decl")), "\"west-decl\" set option requires =<value>");
        assert_eq!(error_text(set(&mut options, "noprompt=1")), "\"no\" set options take no value");
        assert_eq!(error_text(set(&mut options, "bogus")), "\"bogus\": unknown set option");
    }

    #[test]
    fn unknown_options_suggest() {
        let mut options = Options::default();
        let Err(Message::Parse(ParseMessage::Unknown { suggestions, .. })) = set(&mut options, "noprmpt") else {
            panic!()
        };
        assert!(suggestions.iter().any(|suggestion| suggestion == "noprompt"), "{suggestions:?}");
    }

    #[test]
    fn graph_warnings() {
        let mut options = Options {
            lang: Lang::C_89,
            ..Options::default()
        };
        let warning = set(&mut options, "digraphs").unwrap().unwrap();
        assert_eq!(warning.message, "digraphs not supported until C95");
        assert_eq!(options.graph, Graph::Digraphs);
        assert!(set(&mut options, "c99").unwrap().is_none());
    }

    #[test]
    fn describe_lists_every_option() {
        let text = Options::default().describe();
        assert!(text.contains("  noalt-tokens\n"));
        assert!(text.contains("    explicit-ecsu=su\n"));
        assert!(text.contains("  noexplicit-int\n"));
        assert!(text.contains("    lang=C23\n"));
        assert!(text.contains("    west-decl=r\n"));
        assert_eq!(text.lines().count(), 15);
    }

    #[test]
    fn west_decl_masks() {
        assert_eq!(WestDecl::parse("*"), Some(WestDecl::all()));
        assert_eq!(WestDecl::parse("-"), Some(WestDecl::empty()));
        assert_eq!((WestDecl::FUNC | WestDecl::NON_FUNC).to_string(), "ft");
        assert!(WestDecl::parse("x").is_none());
    }
}
