//! C/C++ keywords and the pseudo-English words that stand in for them.
//!
//! Both tables are consulted by the parsers. C/C++ keywords are only keywords
//! in the revisions listed for them, so e.g. `class` is an ordinary
//! identifier in C. English words are always recognized and it is left to
//! the checker to reject what they name in the current language.

use fxhash::FxHashMap;
use once_cell::sync::Lazy;

use crate::lang::{self, feature, Lang, LangIds};
use crate::types::TypeId;

/// Where a keyword is recognized.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Context {
    Default,
    /// Inside `[[...]]`.
    Attribute,
    /// After a member function's parameters, e.g. `final`.
    FuncSuffix,
}

/// What a keyword means to the parser.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeywordKind {
    /// One or more type bits: a base type, storage class, qualifier, or
    /// attribute.
    Type,
    Alignas,
    /// `__attribute__`, which is skipped.
    GnuAttribute,
    Namespace,
    Operator,
    Using,
    ConstCast,
    DynamicCast,
    ReinterpretCast,
    StaticCast,
    /// An alternative spelling of a punctuator, e.g. `bitand` for `&`.
    AltToken(&'static str),
    /// A keyword that can not appear in a declaration, e.g. `while`.
    Other,
}

#[derive(Debug)]
pub struct Keyword {
    pub literal: &'static str,
    pub kind: KeywordKind,
    pub context: Context,
    pub ty: TypeId,
    /// The revisions in which the literal is a keyword.
    pub langs: LangIds,
    /// The revisions in which the keyword is offered as a completion or a
    /// suggestion. Always a subset of `langs`.
    pub ac_langs: LangIds,
}

const ANY: LangIds = LangIds::ANY;
const CPP: LangIds = LangIds::CPP_ANY;

const fn kw(literal: &'static str, kind: KeywordKind, ty: TypeId, langs: LangIds) -> Keyword {
    Keyword {
        literal,
        kind,
        context: Context::Default,
        ty,
        langs,
        ac_langs: langs,
    }
}

const fn ty(literal: &'static str, ty: TypeId, langs: LangIds) -> Keyword {
    kw(literal, KeywordKind::Type, ty, langs)
}

const fn other(literal: &'static str, langs: LangIds) -> Keyword {
    Keyword {
        ac_langs: LangIds::empty(),
        ..kw(literal, KeywordKind::Other, TypeId::empty(), langs)
    }
}

const fn alt(literal: &'static str, token: &'static str) -> Keyword {
    Keyword {
        ac_langs: LangIds::empty(),
        ..kw(literal, KeywordKind::AltToken(token), TypeId::empty(), ANY)
    }
}

const fn in_context(context: Context, keyword: Keyword) -> Keyword {
    Keyword { context, ..keyword }
}

const fn no_ac(keyword: Keyword) -> Keyword {
    Keyword {
        ac_langs: LangIds::empty(),
        ..keyword
    }
}

pub const C_KEYWORDS: &[Keyword] = &[
    // K&R C
    ty("auto", TypeId::AUTO_STORAGE, feature::AUTO_STORAGE),
    other("break", ANY),
    other("case", ANY),
    ty("char", TypeId::CHAR, ANY),
    other("continue", ANY),
    ty("default", TypeId::DEFAULT, ANY),
    other("do", ANY),
    ty("double", TypeId::DOUBLE, ANY),
    other("else", ANY),
    ty("extern", TypeId::EXTERN, ANY),
    ty("float", TypeId::FLOAT, ANY),
    other("for", ANY),
    other("goto", ANY),
    other("if", ANY),
    ty("int", TypeId::INT, ANY),
    ty("long", TypeId::LONG, ANY),
    ty("register", TypeId::REGISTER, ANY),
    other("return", ANY),
    ty("short", TypeId::SHORT, ANY),
    other("sizeof", ANY),
    ty("static", TypeId::STATIC, ANY),
    ty("struct", TypeId::STRUCT, ANY),
    other("switch", ANY),
    ty("typedef", TypeId::TYPEDEF, ANY),
    ty("union", TypeId::UNION, ANY),
    ty("unsigned", TypeId::UNSIGNED, ANY),
    other("while", ANY),
    // C89
    ty("const", TypeId::CONST, feature::CONST),
    ty("enum", TypeId::ENUM, feature::ENUM),
    ty("signed", TypeId::SIGNED, feature::SIGNED),
    ty("void", TypeId::VOID, feature::VOID),
    ty("volatile", TypeId::VOLATILE, feature::VOLATILE),
    // C95
    ty("wchar_t", TypeId::WCHAR_T, feature::WCHAR_T),
    // C99
    ty("_Bool", TypeId::BOOL, lang::c_min(Lang::C_99)),
    ty("_Complex", TypeId::COMPLEX, feature::COMPLEX),
    ty("_Imaginary", TypeId::IMAGINARY, feature::IMAGINARY),
    ty("inline", TypeId::INLINE, feature::INLINE),
    // Recognized in C++ only to say it is not supported there.
    Keyword {
        ac_langs: feature::RESTRICT,
        ..ty("restrict", TypeId::RESTRICT, feature::RESTRICT.union(CPP))
    },
    // C11
    kw("_Alignas", KeywordKind::Alignas, TypeId::empty(), lang::c_min(Lang::C_11)),
    other("_Alignof", lang::c_min(Lang::C_11)),
    ty("_Atomic", TypeId::ATOMIC, feature::ATOMIC),
    other("_Generic", lang::c_min(Lang::C_11)),
    ty("_Noreturn", TypeId::NORETURN, lang::c_min(Lang::C_11)),
    other("_Static_assert", lang::c_min(Lang::C_11)),
    ty("_Thread_local", TypeId::THREAD_LOCAL, lang::c_min(Lang::C_11)),
    // C23
    other("typeof", lang::c_min(Lang::C_23)),
    other("typeof_unqual", lang::c_min(Lang::C_23)),
    // C++
    ty("bool", TypeId::BOOL, feature::BOOL_KEYWORD),
    other("catch", CPP),
    ty("class", TypeId::CLASS, CPP),
    kw("const_cast", KeywordKind::ConstCast, TypeId::empty(), CPP),
    ty("delete", TypeId::DELETE, CPP),
    kw("dynamic_cast", KeywordKind::DynamicCast, TypeId::empty(), CPP),
    ty("explicit", TypeId::EXPLICIT, CPP),
    ty("export", TypeId::EXPORT, CPP),
    other("false", CPP),
    ty("friend", TypeId::FRIEND, CPP),
    ty("mutable", TypeId::MUTABLE, CPP),
    kw("namespace", KeywordKind::Namespace, TypeId::empty(), CPP),
    other("new", CPP),
    kw("operator", KeywordKind::Operator, TypeId::empty(), CPP),
    other("private", CPP),
    other("protected", CPP),
    other("public", CPP),
    kw("reinterpret_cast", KeywordKind::ReinterpretCast, TypeId::empty(), CPP),
    kw("static_cast", KeywordKind::StaticCast, TypeId::empty(), CPP),
    other("template", CPP),
    other("this", CPP),
    ty("throw", TypeId::THROW, CPP),
    other("true", CPP),
    other("try", CPP),
    other("typeid", CPP),
    other("typename", CPP),
    kw("using", KeywordKind::Using, TypeId::empty(), CPP),
    ty("virtual", TypeId::VIRTUAL, CPP),
    // C++11
    kw("alignas", KeywordKind::Alignas, TypeId::empty(), feature::ALIGNAS_KEYWORD),
    other("alignof", feature::ALIGNAS_KEYWORD),
    ty("auto", TypeId::AUTO, lang::min(Lang::CPP_11)),
    ty("char16_t", TypeId::CHAR16_T, feature::CHAR16_32_T),
    ty("char32_t", TypeId::CHAR32_T, feature::CHAR16_32_T),
    ty("constexpr", TypeId::CONSTEXPR, feature::CONSTEXPR),
    other("decltype", lang::min(Lang::CPP_11)),
    in_context(Context::FuncSuffix, ty("final", TypeId::FINAL, feature::FINAL)),
    ty("noexcept", TypeId::NOEXCEPT, feature::NOEXCEPT),
    other("nullptr", feature::NULLPTR),
    in_context(Context::FuncSuffix, ty("override", TypeId::OVERRIDE, feature::OVERRIDE)),
    ty("thread_local", TypeId::THREAD_LOCAL, feature::THREAD_LOCAL_KEYWORD),
    other("static_assert", feature::STATIC_ASSERT),
    // C++20
    ty("char8_t", TypeId::CHAR8_T, feature::CHAR8_T),
    other("concept", lang::min(Lang::CPP_20)),
    ty("consteval", TypeId::CONSTEVAL, feature::CONSTEVAL),
    ty("constinit", TypeId::CONSTINIT, feature::CONSTINIT),
    other("co_await", lang::min(Lang::CPP_20)),
    other("co_return", lang::min(Lang::CPP_20)),
    other("co_yield", lang::min(Lang::CPP_20)),
    other("requires", lang::min(Lang::CPP_20)),
    // Alternative tokens.
    alt("and", "&&"),
    alt("and_eq", "&="),
    alt("bitand", "&"),
    alt("bitor", "|"),
    alt("compl", "~"),
    alt("not", "!"),
    alt("not_eq", "!="),
    alt("or", "||"),
    alt("or_eq", "|="),
    alt("xor", "^"),
    alt("xor_eq", "^="),
    // Extensions.
    no_ac(ty("__auto_type", TypeId::AUTO, lang::not(feature::AUTO_TYPE))),
    no_ac(ty("__block", TypeId::BLOCK, ANY)),
    no_ac(ty("__complex", TypeId::COMPLEX, LangIds::C_ANY)),
    no_ac(ty("__complex__", TypeId::COMPLEX, LangIds::C_ANY)),
    no_ac(ty("__const", TypeId::CONST, ANY)),
    no_ac(ty("__inline", TypeId::INLINE, ANY)),
    no_ac(ty("__inline__", TypeId::INLINE, ANY)),
    no_ac(ty("__restrict", TypeId::RESTRICT, ANY)),
    no_ac(ty("__restrict__", TypeId::RESTRICT, ANY)),
    no_ac(ty("__signed", TypeId::SIGNED, ANY)),
    no_ac(ty("__signed__", TypeId::SIGNED, ANY)),
    no_ac(ty("__thread", TypeId::THREAD_LOCAL, ANY)),
    no_ac(ty("__volatile", TypeId::VOLATILE, ANY)),
    no_ac(ty("__volatile__", TypeId::VOLATILE, ANY)),
    no_ac(kw("__attribute__", KeywordKind::GnuAttribute, TypeId::empty(), ANY)),
    // Unified Parallel C.
    ty("relaxed", TypeId::UPC_RELAXED, feature::UPC),
    ty("shared", TypeId::UPC_SHARED, feature::UPC),
    ty("strict", TypeId::UPC_STRICT, feature::UPC),
    // Attributes.
    in_context(Context::Attribute, ty("carries_dependency", TypeId::CARRIES_DEPENDENCY, ANY)),
    in_context(Context::Attribute, ty("deprecated", TypeId::DEPRECATED, ANY)),
    in_context(Context::Attribute, ty("maybe_unused", TypeId::MAYBE_UNUSED, ANY)),
    in_context(Context::Attribute, ty("nodiscard", TypeId::NODISCARD, ANY)),
    in_context(Context::Attribute, ty("noreturn", TypeId::NORETURN, ANY)),
    in_context(Context::Attribute, ty("no_unique_address", TypeId::NO_UNIQUE_ADDRESS, ANY)),
];

/// Find the C/C++ keyword spelled `literal` in `lang` and `context`.
///
/// Keywords of the default context are also found in every other context.
pub fn find(literal: &str, lang: Lang, context: Context) -> Option<&'static Keyword> {
    spelled(literal).find(|keyword| {
        lang.is_any(keyword.langs) && (keyword.context == context || keyword.context == Context::Default)
    })
}

/// C/C++ keywords by spelling, in table order.
static BY_LITERAL: Lazy<FxHashMap<&'static str, Vec<&'static Keyword>>> = Lazy::new(|| {
    let mut keywords = FxHashMap::<_, Vec<_>>::default();
    for keyword in C_KEYWORDS {
        keywords.entry(keyword.literal).or_default().push(keyword);
    }
    keywords
});

fn spelled(literal: &str) -> impl Iterator<Item = &'static Keyword> {
    BY_LITERAL.get(literal).into_iter().flatten().copied()
}

/// Find `literal` as a keyword of the default context in any language.
pub fn find_in_any(literal: &str) -> Option<&'static Keyword> {
    spelled(literal)
        .filter(|keyword| keyword.context == Context::Default)
        .min_by_key(|keyword| keyword.langs.bits().trailing_zeros())
}

/// Find the type keyword spelled `literal` regardless of language, for use
/// when translating from pseudo-English.
pub fn find_type(literal: &str) -> Option<TypeId> {
    spelled(literal)
        .find(|keyword| keyword.kind == KeywordKind::Type)
        .map(|keyword| keyword.ty)
}

/// Keywords that are suggestions in `lang`.
pub fn suggestions(lang: Lang) -> impl Iterator<Item = &'static str> {
    C_KEYWORDS
        .iter()
        .filter(move |keyword| lang.is_any(keyword.ac_langs) && keyword.context == Context::Default)
        .map(|keyword| keyword.literal)
}

/// A phrase of pseudo-English words that names one or more type bits.
#[derive(Debug)]
pub struct EnglishType {
    pub words: &'static [&'static str],
    pub ty: TypeId,
}

const fn en(words: &'static [&'static str], ty: TypeId) -> EnglishType {
    EnglishType { words, ty }
}

/// Pseudo-English type phrases, longest phrases first for each leading word.
pub const ENGLISH_TYPES: &[EnglishType] = &[
    en(&["Apple", "block"], TypeId::BLOCK),
    en(&["atomic"], TypeId::ATOMIC),
    en(&["boolean"], TypeId::BOOL),
    en(&["Boolean"], TypeId::BOOL),
    en(&["bool"], TypeId::BOOL),
    en(&["carries", "dependency"], TypeId::CARRIES_DEPENDENCY),
    en(&["carries_dependency"], TypeId::CARRIES_DEPENDENCY),
    en(&["character", "8"], TypeId::CHAR8_T),
    en(&["character", "16"], TypeId::CHAR16_T),
    en(&["character", "32"], TypeId::CHAR32_T),
    en(&["character"], TypeId::CHAR),
    en(&["complex"], TypeId::COMPLEX),
    en(&["constant", "evaluation"], TypeId::CONSTEVAL),
    en(&["constant", "expression"], TypeId::CONSTEXPR),
    en(&["constant", "initialization"], TypeId::CONSTINIT),
    en(&["constant"], TypeId::CONST),
    en(&["const", "eval"], TypeId::CONSTEVAL),
    en(&["const", "expr"], TypeId::CONSTEXPR),
    en(&["const", "init"], TypeId::CONSTINIT),
    en(&["defaulted"], TypeId::DEFAULT),
    en(&["deleted"], TypeId::DELETE),
    en(&["deprecated"], TypeId::DEPRECATED),
    en(&["double", "precision"], TypeId::DOUBLE),
    en(&["enumeration"], TypeId::ENUM),
    en(&["exported"], TypeId::EXPORT),
    en(&["external"], TypeId::EXTERN),
    en(&["floating", "point"], TypeId::FLOAT),
    en(&["imaginary"], TypeId::IMAGINARY),
    en(&["integer"], TypeId::INT),
    en(&["maybe", "unused"], TypeId::MAYBE_UNUSED),
    en(&["maybe_unused"], TypeId::MAYBE_UNUSED),
    en(&["no", "discard"], TypeId::NODISCARD),
    en(&["no", "exception"], TypeId::NOEXCEPT),
    en(&["no", "except"], TypeId::NOEXCEPT),
    en(&["no", "return"], TypeId::NORETURN),
    en(&["no", "unique", "address"], TypeId::NO_UNIQUE_ADDRESS),
    en(&["no-discard"], TypeId::NODISCARD),
    en(&["no-except"], TypeId::NOEXCEPT),
    en(&["no-exception"], TypeId::NOEXCEPT),
    en(&["no-return"], TypeId::NORETURN),
    en(&["no-unique", "address"], TypeId::NO_UNIQUE_ADDRESS),
    en(&["nodiscard"], TypeId::NODISCARD),
    en(&["non-discardable"], TypeId::NODISCARD),
    en(&["non-returning"], TypeId::NORETURN),
    en(&["non-throwing"], TypeId::THROW),
    en(&["non-unique", "address"], TypeId::NO_UNIQUE_ADDRESS),
    en(&["noreturn"], TypeId::NORETURN),
    en(&["no_unique_address"], TypeId::NO_UNIQUE_ADDRESS),
    en(&["overridden"], TypeId::OVERRIDE),
    en(&["pure", "virtual"], TypeId::PURE_VIRTUAL.union(TypeId::VIRTUAL)),
    en(&["restricted"], TypeId::RESTRICT),
    en(&["structure"], TypeId::STRUCT),
    en(&["thread", "local"], TypeId::THREAD_LOCAL),
    en(&["thread_local"], TypeId::THREAD_LOCAL),
    en(&["thread-local"], TypeId::THREAD_LOCAL),
    en(&["wide", "character"], TypeId::WCHAR_T),
];

/// Find the longest pseudo-English type phrase at the start of `words`,
/// returning its type and the number of words it spans. A C/C++ keyword is
/// preferably taken with its meaning in `lang`.
pub fn find_english_type(words: &[&str], lang: Lang) -> Option<(TypeId, usize)> {
    let first = match *words.first()? {
        "automatic" => "auto",
        first => first,
    };
    let phrase = ENGLISH_TYPES
        .iter()
        .filter(|english| english.words.len() <= words.len())
        .filter(|english| english.words.iter().zip(words).all(|(a, b)| a == b))
        .max_by_key(|english| english.words.len());
    match phrase {
        Some(english) => Some((english.ty, english.words.len())),
        None => find(first, lang, Context::Attribute)
            .filter(|keyword| keyword.kind == KeywordKind::Type)
            .map(|keyword| keyword.ty)
            .or_else(|| find_type(first))
            .map(|ty| (ty, 1)),
    }
}

/// Words with the same meaning as another in pseudo-English.
const ENGLISH_SYNONYMS: &[(&str, &str)] = &[
    ("conv", "conversion"),
    ("ctor", "constructor"),
    ("dtor", "destructor"),
    ("func", "function"),
    ("len", "length"),
    ("mbr", "member"),
    ("non-mbr", "non-member"),
    ("oper", "operator"),
    ("predef", "predefined"),
    ("ptr", "pointer"),
    ("q", "quit"),
    ("ref", "reference"),
    ("ret", "returning"),
    ("user-def", "user-defined"),
    ("var", "variable"),
    ("varargs", "variadic"),
];

/// Map a pseudo-English word to its canonical spelling.
pub fn english_synonym(word: &str) -> &str {
    ENGLISH_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == word)
        .map_or(word, |(_, canonical)| *canonical)
}

/// Pseudo-English words, used for suggestions.
pub const ENGLISH_WORDS: &[&str] = &[
    "aligned", "all", "array", "as", "bits", "block", "bytes", "cast", "commands", "constructor",
    "conversion", "declare", "define", "destructor", "dynamic", "english", "explain", "function",
    "into", "length", "linkage", "literal", "member", "non-member", "of", "operator", "options",
    "pointer", "predefined", "pure", "reference", "reinterpret", "returning", "rvalue", "to",
    "type", "user", "user-defined", "variable", "variadic", "vector", "width",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_depend_on_language() {
        assert!(find("class", Lang::C_17, Context::Default).is_none());
        assert_eq!(find("class", Lang::CPP_98, Context::Default).unwrap().ty, TypeId::CLASS);
        assert_eq!(find("auto", Lang::C_17, Context::Default).unwrap().ty, TypeId::AUTO_STORAGE);
        assert_eq!(find("auto", Lang::CPP_11, Context::Default).unwrap().ty, TypeId::AUTO);
        assert!(find("_Bool", Lang::C_89, Context::Default).is_none());
    }

    #[test]
    fn contexts() {
        assert!(find("final", Lang::CPP_11, Context::Default).is_none());
        assert!(find("final", Lang::CPP_11, Context::FuncSuffix).is_some());
        assert!(find("nodiscard", Lang::CPP_17, Context::Default).is_none());
        assert!(find("nodiscard", Lang::CPP_17, Context::Attribute).is_some());
        assert!(find("const", Lang::CPP_17, Context::Attribute).is_some());
    }

    #[test]
    fn oldest_keyword_is_found_in_any_language() {
        let keyword = find_in_any("auto").unwrap();
        assert_eq!(keyword.ty, TypeId::AUTO_STORAGE);
        assert_eq!(lang::oldest(find_in_any("class").unwrap().langs), Some(Lang::CPP_98));
    }

    #[test]
    fn english_types() {
        let lang = Lang::C_17;
        assert_eq!(find_english_type(&["wide", "character"], lang), Some((TypeId::WCHAR_T, 2)));
        assert_eq!(find_english_type(&["character", "x"], lang), Some((TypeId::CHAR, 1)));
        assert_eq!(find_english_type(&["_Bool"], Lang::C_89), Some((TypeId::BOOL, 1)));
        assert_eq!(find_english_type(&["pointer"], lang), None);
        assert_eq!(find_english_type(&["automatic"], lang), Some((TypeId::AUTO_STORAGE, 1)));
        assert_eq!(find_english_type(&["auto"], Lang::CPP_17), Some((TypeId::AUTO, 1)));
        assert_eq!(english_synonym("ptr"), "pointer");
    }

    #[test]
    fn suggestions_are_keywords() {
        for keyword in C_KEYWORDS {
            assert!(keyword.langs.contains(keyword.ac_langs), "{}", keyword.literal);
        }
        assert!(!suggestions(Lang::CPP_17).any(|s| s == "restrict" || s == "while"));
    }
}
