//! Help text, reflowed to the width of the terminal.

use pretty::{Arena, DocAllocator, DocBuilder};

use crate::dym;
use crate::lang::{feature, Lang, LangIds};
use crate::reporting::{Message, ParseMessage, Unknown};
use crate::source::ByteRange;

const INDENT: isize = 4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Topic {
    Commands,
    English,
    Options,
    /// A single command, e.g. `help declare`.
    Command(&'static str),
}

struct Entry {
    /// The commands the entry is listed under.
    commands: &'static [&'static str],
    langs: LangIds,
    usage: &'static str,
}

const fn entry(commands: &'static [&'static str], langs: LangIds, usage: &'static str) -> Entry {
    Entry { commands, langs, usage }
}

const COMMANDS: &[Entry] = &[
    entry(&["cast"], LangIds::ANY, "cast [NAME] {as|into} ENGLISH"),
    entry(
        &["const", "dynamic", "reinterpret", "static"],
        LangIds::CPP_ANY,
        "{const|dynamic|reinterpret|static} cast [NAME] {as|into} ENGLISH",
    ),
    entry(
        &["declare"],
        LangIds::ANY,
        "declare NAME[, NAME]* as ENGLISH [width N [bits]] [aligned [as|to] {N [bytes]|ENGLISH}]",
    ),
    entry(
        &["declare"],
        LangIds::CPP_ANY,
        "declare OPERATOR [of class NAME] as [member|non-member] operator [(PARAMS)] returning ENGLISH",
    ),
    entry(
        &["declare"],
        LangIds::CPP_ANY,
        "declare [STORAGE]* user-defined conversion [operator] [of class NAME] returning ENGLISH",
    ),
    entry(&["define"], LangIds::ANY, "define NAME as ENGLISH"),
    entry(&["explain"], LangIds::ANY, "explain GIBBERISH[, DECLARATOR]*"),
    entry(&["explain"], LangIds::ANY, "explain (GIBBERISH)[NAME]"),
    entry(
        &["explain"],
        LangIds::CPP_ANY,
        "explain {const|dynamic|reinterpret|static}_cast<GIBBERISH>(NAME)",
    ),
    entry(
        &["class", "enum", "struct", "union"],
        LangIds::ANY,
        "{enum|class|struct|union} NAME [{ DECLARATION; ... }]",
    ),
    entry(
        &["namespace", "inline"],
        LangIds::CPP_ANY,
        "[inline] namespace NAME[::NAME]* { DECLARATION; ... }",
    ),
    entry(&["typedef"], LangIds::ANY, "typedef GIBBERISH[, DECLARATOR]*"),
    entry(&["using"], feature::USING_DECLARATION, "using NAME = GIBBERISH"),
    entry(
        &["show"],
        LangIds::ANY,
        "show [NAME|all|predefined|user] [typedefs] [as english|{as|in} gibberish]",
    ),
    entry(&["set"], LangIds::ANY, "set [OPTION [= VALUE]]*"),
    entry(&["help"], LangIds::ANY, "help [commands|english|options|COMMAND]"),
    entry(&["include"], LangIds::ANY, "include \"FILE\""),
    entry(&["#define"], LangIds::ANY, "#define NAME[(PARAM[, PARAM]*)] TOKENS"),
    entry(&["#undef"], LangIds::ANY, "#undef NAME"),
    entry(&["#include"], LangIds::ANY, "#include \"FILE\""),
    entry(&["expand"], LangIds::ANY, "expand NAME[(ARGS)] [TOKENS]*"),
    entry(&["exit", "quit"], LangIds::ANY, "{exit|quit}"),
];

const ENGLISH: &[Entry] = &[
    entry(&[], LangIds::ANY, "ENGLISH: [STORAGE]* [QUALIFIER]* TYPE"),
    entry(&[], LangIds::ANY, "array [N|*] of ENGLISH"),
    entry(&[], feature::VLA, "variable length array of ENGLISH"),
    entry(&[], LangIds::ANY, "[QUALIFIER]* pointer to ENGLISH"),
    entry(&[], LangIds::CPP_ANY, "pointer to member of class NAME ENGLISH"),
    entry(&[], LangIds::CPP_ANY, "[rvalue] reference to ENGLISH"),
    entry(&[], LangIds::ANY, "function [(PARAMS)] returning ENGLISH"),
    entry(&[], LangIds::ANY, "block [(PARAMS)] returning ENGLISH"),
    entry(&[], LangIds::CPP_ANY, "[member|non-member] operator [(PARAMS)] returning ENGLISH"),
    entry(&[], LangIds::CPP_ANY, "constructor [(PARAMS)]"),
    entry(&[], LangIds::CPP_ANY, "[virtual] destructor"),
    entry(&[], LangIds::CPP_ANY, "user-defined literal [(PARAMS)] returning ENGLISH"),
    entry(&[], LangIds::ANY, "{enum|struct|union} NAME [of type ENGLISH]"),
    entry(&[], LangIds::ANY, "PARAMS: {NAME as ENGLISH|ENGLISH|NAME|...}[, PARAMS]"),
    entry(
        &[],
        LangIds::ANY,
        "STORAGE: auto extern register static thread_local typedef constexpr explicit friend inline \
         mutable virtual pure default deleted noexcept final override",
    ),
    entry(&[], LangIds::ANY, "QUALIFIER: const volatile restrict _Atomic non-empty"),
    entry(
        &[],
        LangIds::ANY,
        "TYPE: void bool char char8_t char16_t char32_t wchar_t short int long unsigned signed \
         float double complex imaginary or a type name",
    ),
];

const OPTIONS: &[Entry] = &[
    entry(&[], LangIds::ANY, "[no]alt-tokens: print alternative tokens like bitand"),
    entry(&[], LangIds::ANY, "[no]debug: print each declaration's tree"),
    entry(&[], LangIds::ANY, "{di|tri|no}graphs: print di/trigraphs"),
    entry(&[], LangIds::ANY, "[no]east-const: print const after the type"),
    entry(&[], LangIds::ANY, "[no]echo-commands: echo commands read from files"),
    entry(&[], LangIds::ANY, "[no]english-types: print English words for types"),
    entry(&[], LangIds::ANY, "[no]explain-by-default: treat unknown commands as explain"),
    entry(&[], LangIds::CPP_ANY, "[no]explicit-ecsu=MASK: print class-like keywords for {e|c|s|u}"),
    entry(&[], LangIds::ANY, "[no]explicit-int=MASK: print int for {i|s|l|ll}, u prefixed, or *"),
    entry(&[], LangIds::ANY, "lang=LANG: use a language, also just LANG"),
    entry(&[], LangIds::ANY, "[no]prompt: print a prompt"),
    entry(&[], LangIds::ANY, "[no]semicolon: end declarations with a semicolon"),
    entry(&[], feature::TRAILING_RETURN, "[no]trailing-return: print auto f() -> T"),
    entry(&[], feature::USING_DECLARATION, "[no]using: print using rather than typedef"),
    entry(&[], LangIds::ANY, "[no]west-decl=MASK: print * and & next to the type for {b|f|l|o|r|t}, * or -"),
];

/// Find the topic named `word`.
pub fn find_topic(word: &str, range: ByteRange) -> Result<Topic, Message> {
    match word {
        "commands" | "command" => return Ok(Topic::Commands),
        "english" => return Ok(Topic::English),
        "options" => return Ok(Topic::Options),
        _ => {}
    }
    let command = COMMANDS
        .iter()
        .flat_map(|entry| entry.commands)
        .find(|command| **command == word || **command == format!("#{word}"));
    match command {
        Some(command) => Ok(Topic::Command(*command)),
        None => {
            let topics = ["commands", "english", "options"];
            let commands = COMMANDS.iter().flat_map(|entry| entry.commands.iter().copied());
            let candidates = topics.into_iter().chain(commands);
            Err(ParseMessage::Unknown {
                range,
                what: Unknown::HelpTopic,
                suggestions: dym::suggestions(word, candidates),
                name: word.to_owned(),
            }
            .into())
        }
    }
}

/// The help for `topic` in `lang`, at most `width` columns wide.
pub fn render(topic: Topic, lang: Lang, width: usize) -> String {
    let arena = Arena::new();
    let (title, entries) = match topic {
        Topic::Commands => ("commands:", COMMANDS),
        Topic::English => ("English:", ENGLISH),
        Topic::Options => ("options:", OPTIONS),
        Topic::Command(_) => ("usage:", COMMANDS),
    };
    let lines = entries
        .iter()
        .filter(|entry| lang.is_any(entry.langs))
        .filter(|entry| match topic {
            Topic::Command(command) => entry.commands.contains(&command),
            _ => true,
        })
        .map(|entry| reflow(&arena, entry.usage));
    let doc = arena
        .text(title)
        .append(arena.hardline().append(arena.intersperse(lines, arena.hardline())).nest(INDENT));
    doc.into_doc().pretty(width).to_string()
}

/// `text` with its words wrapped, continuation lines indented.
fn reflow<'a>(arena: &'a Arena<'a>, text: &'static str) -> DocBuilder<'a, Arena<'a>> {
    let words = text.split_whitespace().map(|word| arena.text(word));
    arena.intersperse(words, arena.softline()).nest(INDENT).group()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics() {
        let range = ByteRange::default();
        assert_eq!(find_topic("english", range).unwrap(), Topic::English);
        assert_eq!(find_topic("declare", range).unwrap(), Topic::Command("declare"));
        assert_eq!(find_topic("undef", range).unwrap(), Topic::Command("#undef"));
        let Err(Message::Parse(ParseMessage::Unknown { suggestions, .. })) = find_topic("englsh", range) else {
            panic!("expected an unknown topic");
        };
        assert_eq!(suggestions, ["english"]);
    }

    #[test]
    fn commands_depend_on_language() {
        let c = render(Topic::Commands, Lang::C_17, 80);
        let cpp = render(Topic::Commands, Lang::CPP_17, 80);
        assert!(c.starts_with("commands:\n    cast"));
        assert!(!c.contains("namespace"));
        assert!(cpp.contains("namespace"));
    }

    #[test]
    fn long_lines_wrap() {
        let help = render(Topic::Command("declare"), Lang::C_17, 40);
        assert!(help.lines().all(|line| line.len() <= 40), "{help}");
        assert!(help.lines().count() > 2);
    }
}
