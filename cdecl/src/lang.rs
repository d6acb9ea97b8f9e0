//! C and C++ language revisions.
//!
//! Every feature that cdecl knows about is tagged with the set of revisions in
//! which it is legal. That set is a [`LangIds`] bitset with one bit per
//! revision, ordered from oldest to newest within each family, with every C
//! revision ordered before every C++ revision.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// A set of language revisions.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct LangIds: u32 {
        const C_KNR = 1 << 0;
        const C_89 = 1 << 1;
        const C_95 = 1 << 2;
        const C_99 = 1 << 3;
        const C_11 = 1 << 4;
        const C_17 = 1 << 5;
        const C_23 = 1 << 6;
        /// Embedded C extensions to C99.
        const C_99_EMC = 1 << 7;
        /// Unified Parallel C extensions to C99.
        const C_99_UPC = 1 << 8;

        const CPP_98 = 1 << 9;
        const CPP_03 = 1 << 10;
        const CPP_11 = 1 << 11;
        const CPP_14 = 1 << 12;
        const CPP_17 = 1 << 13;
        const CPP_20 = 1 << 14;
        const CPP_23 = 1 << 15;

        const C_ANY = 0x01FF;
        const CPP_ANY = 0xFE00;
        /// Extension revisions that overlay a base revision.
        const EXTENSIONS = Self::C_99_EMC.bits() | Self::C_99_UPC.bits();
        const ANY = Self::C_ANY.bits() | Self::CPP_ANY.bits();
    }
}

/// A single language revision.
///
/// This is always exactly one bit of [`LangIds`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lang(LangIds);

impl Lang {
    pub const C_KNR: Lang = Lang(LangIds::C_KNR);
    pub const C_89: Lang = Lang(LangIds::C_89);
    pub const C_95: Lang = Lang(LangIds::C_95);
    pub const C_99: Lang = Lang(LangIds::C_99);
    pub const C_11: Lang = Lang(LangIds::C_11);
    pub const C_17: Lang = Lang(LangIds::C_17);
    pub const C_23: Lang = Lang(LangIds::C_23);
    pub const C_99_EMC: Lang = Lang(LangIds::C_99_EMC);
    pub const C_99_UPC: Lang = Lang(LangIds::C_99_UPC);
    pub const CPP_98: Lang = Lang(LangIds::CPP_98);
    pub const CPP_03: Lang = Lang(LangIds::CPP_03);
    pub const CPP_11: Lang = Lang(LangIds::CPP_11);
    pub const CPP_14: Lang = Lang(LangIds::CPP_14);
    pub const CPP_17: Lang = Lang(LangIds::CPP_17);
    pub const CPP_20: Lang = Lang(LangIds::CPP_20);
    pub const CPP_23: Lang = Lang(LangIds::CPP_23);

    /// The newest supported revision of C.
    pub const C_NEW: Lang = Lang::C_23;
    /// The newest supported revision of C++.
    pub const CPP_NEW: Lang = Lang::CPP_23;

    /// Make a language from a set that must contain exactly one revision.
    pub fn from_ids(ids: LangIds) -> Option<Lang> {
        (ids.bits().count_ones() == 1).then_some(Lang(ids))
    }

    pub fn ids(self) -> LangIds {
        self.0
    }

    pub fn is_c(self) -> bool {
        LangIds::C_ANY.contains(self.0)
    }

    pub fn is_cpp(self) -> bool {
        LangIds::CPP_ANY.contains(self.0)
    }

    /// Returns `true` if this revision is in `ids`.
    pub fn is_any(self, ids: LangIds) -> bool {
        ids.intersects(self.0) || ids.intersects(self.base().0)
    }

    /// The revision with extensions removed, i.e. C99 for Embedded C.
    pub fn base(self) -> Lang {
        if LangIds::EXTENSIONS.contains(self.0) {
            Lang::C_99
        } else {
            self
        }
    }

    /// The canonical name of this revision.
    pub fn name(self) -> &'static str {
        LANG_INFO
            .iter()
            .find(|info| info.lang == self)
            .map_or("", |info| info.name)
    }

    /// The name and value of `__STDC_VERSION__` or `__cplusplus`, if any.
    pub fn version_macro(self) -> Option<(&'static str, &'static str)> {
        let base = self.base();
        let info = LANG_INFO.iter().find(|info| info.lang == base)?;
        let name = if self.is_c() { "__STDC_VERSION__" } else { "__cplusplus" };
        info.version.map(|value| (name, value))
    }

    /// Every revision at least as new as this one, within its family only.
    pub fn and_newer(self) -> LangIds {
        min(self) & self.family()
    }

    /// Every revision of C, or every revision of C++.
    pub fn family(self) -> LangIds {
        if self.is_c() { LangIds::C_ANY } else { LangIds::CPP_ANY }
    }

    /// Returns the first revision after this one in the same family, skipping
    /// extensions.
    fn next(self) -> Option<Lang> {
        let family = self.family();
        let mut bits = self.0.bits() << 1;
        while bits != 0 && bits <= LangIds::CPP_23.bits() {
            let ids = LangIds::from_bits_retain(bits);
            if !family.contains(ids) {
                return None;
            }
            if !LangIds::EXTENSIONS.contains(ids) {
                return Some(Lang(ids));
            }
            bits <<= 1;
        }
        None
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

struct LangInfo {
    lang: Lang,
    name: &'static str,
    version: Option<&'static str>,
}

const LANG_INFO: &[LangInfo] = &[
    LangInfo { lang: Lang::C_KNR, name: "K&RC", version: None },
    LangInfo { lang: Lang::C_89, name: "C89", version: None },
    LangInfo { lang: Lang::C_95, name: "C95", version: Some("199409L") },
    LangInfo { lang: Lang::C_99, name: "C99", version: Some("199901L") },
    LangInfo { lang: Lang::C_11, name: "C11", version: Some("201112L") },
    LangInfo { lang: Lang::C_17, name: "C17", version: Some("201710L") },
    LangInfo { lang: Lang::C_23, name: "C23", version: Some("202311L") },
    LangInfo { lang: Lang::C_99_EMC, name: "C99 (with Embedded C extensions)", version: None },
    LangInfo { lang: Lang::C_99_UPC, name: "C99 (with Unified Parallel C extensions)", version: None },
    LangInfo { lang: Lang::CPP_98, name: "C++98", version: Some("199711L") },
    LangInfo { lang: Lang::CPP_03, name: "C++03", version: Some("199711L") },
    LangInfo { lang: Lang::CPP_11, name: "C++11", version: Some("201103L") },
    LangInfo { lang: Lang::CPP_14, name: "C++14", version: Some("201402L") },
    LangInfo { lang: Lang::CPP_17, name: "C++17", version: Some("201703L") },
    LangInfo { lang: Lang::CPP_20, name: "C++20", version: Some("202002L") },
    LangInfo { lang: Lang::CPP_23, name: "C++23", version: Some("202302L") },
];

/// The revisions at least as new as `lang`, spanning into C++ when `lang` is C.
pub const fn min(lang: Lang) -> LangIds {
    LangIds::from_bits_truncate(!(lang.0.bits() - 1))
        .intersection(LangIds::ANY)
        .difference(LangIds::EXTENSIONS)
}

/// The C revisions at least as new as `lang`.
pub const fn c_min(lang: Lang) -> LangIds {
    min(lang).intersection(LangIds::C_ANY)
}

/// The revisions no newer than `lang`, spanning into C when `lang` is C++.
pub const fn max(lang: Lang) -> LangIds {
    LangIds::from_bits_truncate((lang.0.bits() << 1) - 1).difference(LangIds::EXTENSIONS)
}

/// The C++ revisions no newer than `lang`.
pub const fn cpp_max(lang: Lang) -> LangIds {
    max(lang).intersection(LangIds::CPP_ANY)
}

/// The C revisions from `c` plus the C++ revisions from `cpp`.
pub const fn c_cpp_min(c: Lang, cpp: Lang) -> LangIds {
    c_min(c).union(min(cpp))
}

/// Every revision except those in `ids`.
pub const fn not(ids: LangIds) -> LangIds {
    LangIds::ANY.difference(ids)
}

/// The oldest revision in `ids`, ignoring extensions.
pub fn oldest(ids: LangIds) -> Option<Lang> {
    let ids = ids & !LangIds::EXTENSIONS;
    (!ids.is_empty()).then(|| Lang(LangIds::from_bits_retain(1 << ids.bits().trailing_zeros())))
}

/// The newest revision in `ids`, ignoring extensions.
pub fn newest(ids: LangIds) -> Option<Lang> {
    let ids = ids & !LangIds::EXTENSIONS;
    (!ids.is_empty())
        .then(|| Lang(LangIds::from_bits_retain(1 << (31 - ids.bits().leading_zeros()))))
}

/// `"C"` or `"C++"` if `ids` only has revisions of one family.
pub fn coarse_name(ids: LangIds) -> Option<&'static str> {
    let is_c = ids.intersects(LangIds::C_ANY);
    let is_cpp = ids.intersects(LangIds::CPP_ANY);
    match (is_c, is_cpp) {
        (true, false) => Some("C"),
        (false, true) => Some("C++"),
        _ => None,
    }
}

/// English phrase describing when a feature legal in `ids` can be used, relative
/// to `current`. It is empty if `current` is in `ids`.
///
/// The result either is empty or starts with a space, so it can be appended to
/// a message like `"X" is not supported`.
pub fn which(ids: LangIds, current: Lang) -> String {
    if current.is_any(ids) {
        return String::new();
    }
    let ids = ids & !LangIds::EXTENSIONS;
    if ids.is_empty() {
        return String::new();
    }

    if ids.bits().count_ones() == 1 {
        return format!(" unless {}", Lang(ids));
    }

    let family = current.family();
    let ids = ids & family;
    let (Some(oldest), Some(newest)) = (oldest(ids), newest(ids)) else {
        return if current.is_c() { " in C" } else { " in C++" }.to_owned();
    };

    let current = current.base();
    if current < oldest {
        format!(" until {oldest}")
    } else if current > newest {
        match newest.next() {
            Some(next) => format!(" since {next}"),
            None => String::new(),
        }
    } else {
        let names = (0..LangIds::ANY.bits().count_ones())
            .map(|bit| LangIds::from_bits_retain(1 << bit))
            .filter(|id| ids.contains(*id))
            .map(|id| Lang(id).name())
            .collect::<Vec<_>>();
        format!(" unless {}", names.join(" or "))
    }
}

/// Language names accepted by `--language` and `set`, with whether each is an
/// alias of another entry.
const LANG_NAMES: &[(&str, bool, Lang)] = &[
    ("C", false, Lang::C_NEW),
    ("CK&R", true, Lang::C_KNR),
    ("CKNR", true, Lang::C_KNR),
    ("CKR", true, Lang::C_KNR),
    ("K&R", true, Lang::C_KNR),
    ("K&RC", false, Lang::C_KNR),
    ("KNR", true, Lang::C_KNR),
    ("KNRC", true, Lang::C_KNR),
    ("KR", true, Lang::C_KNR),
    ("KRC", true, Lang::C_KNR),
    ("C78", true, Lang::C_KNR),
    ("C89", false, Lang::C_89),
    ("C90", true, Lang::C_89),
    ("C95", false, Lang::C_95),
    ("C99", false, Lang::C_99),
    ("C11", false, Lang::C_11),
    ("C17", false, Lang::C_17),
    ("C18", true, Lang::C_17),
    ("C23", false, Lang::C_23),
    ("C2X", true, Lang::C_23),
    ("UPC", false, Lang::C_99_UPC),
    ("C++", false, Lang::CPP_NEW),
    ("C++98", false, Lang::CPP_98),
    ("C++03", false, Lang::CPP_03),
    ("C++11", false, Lang::CPP_11),
    ("C++14", false, Lang::CPP_14),
    ("C++17", false, Lang::CPP_17),
    ("C++20", false, Lang::CPP_20),
    ("C++23", false, Lang::CPP_23),
];

/// Find a language by name, ignoring case.
pub fn find(name: &str) -> Option<Lang> {
    LANG_NAMES
        .iter()
        .find(|(lang_name, _, _)| lang_name.eq_ignore_ascii_case(name))
        .map(|(_, _, lang)| *lang)
}

/// The language names that are not aliases, in table order.
pub fn names() -> impl Iterator<Item = &'static str> {
    LANG_NAMES
        .iter()
        .filter(|(_, is_alias, _)| !is_alias)
        .map(|(name, _, _)| *name)
}

/// Every language name including aliases.
pub fn all_names() -> impl Iterator<Item = &'static str> {
    LANG_NAMES.iter().map(|(name, _, _)| *name)
}

/// The set of languages in which `name` is a reserved identifier.
///
/// Names starting with `_` followed by an uppercase letter or another `_` are
/// reserved everywhere; names containing `__` are reserved in C++.
pub fn reserved_in(name: &str) -> LangIds {
    let mut chars = name.chars();
    if chars.next() == Some('_') && matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_uppercase()) {
        return LangIds::ANY;
    }
    if name.contains("__") {
        return LangIds::CPP_ANY;
    }
    LangIds::empty()
}

/// A string literal that depends on the current language. The first entry
/// whose set contains the current language is used.
pub type LangLit = &'static [(LangIds, &'static str)];

pub fn lang_lit(lits: LangLit, lang: Lang) -> &'static str {
    lits.iter()
        .find(|(ids, _)| lang.is_any(*ids))
        .map_or("", |(_, lit)| *lit)
}

/// The revisions in which individual features are legal.
pub mod feature {
    use super::{c_cpp_min, c_min, cpp_max, max, min, Lang, LangIds};

    pub const ALIGNMENT: LangIds = c_cpp_min(Lang::C_11, Lang::CPP_11);
    /// `alignas` rather than `_Alignas`.
    pub const ALIGNAS_KEYWORD: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_11);
    pub const ATOMIC: LangIds = c_min(Lang::C_11);
    pub const ATTRIBUTES: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_11);
    pub const AUTO_STORAGE: LangIds = LangIds::C_ANY.union(cpp_max(Lang::CPP_03));
    pub const AUTO_TYPE: LangIds = min(Lang::CPP_11).union(LangIds::C_23);
    /// `auto` return types deduced without a trailing return type.
    pub const AUTO_RETURN: LangIds = min(Lang::CPP_14);
    pub const AUTO_PARAM: LangIds = min(Lang::CPP_20);
    pub const AUTO_POINTER_TYPES: LangIds = min(Lang::CPP_11);
    /// `auto x, y;`
    pub const AUTO_TYPE_MULTI_DECL: LangIds = min(Lang::CPP_11);
    pub const BOOL_TYPE: LangIds = c_min(Lang::C_99).union(LangIds::CPP_ANY);
    /// `bool` rather than `_Bool`.
    pub const BOOL_KEYWORD: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_98);
    pub const CARRIES_DEPENDENCY: LangIds = min(Lang::CPP_11);
    pub const CHAR8_T: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_20);
    pub const CHAR16_32_T: LangIds = c_cpp_min(Lang::C_11, Lang::CPP_11);
    pub const COMPLEX: LangIds = c_min(Lang::C_99);
    pub const CONST: LangIds = min(Lang::C_89);
    pub const CONSTEVAL: LangIds = min(Lang::CPP_20);
    pub const CONSTEXPR: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_11);
    pub const CONSTEXPR_RETURN_VOID: LangIds = min(Lang::CPP_14);
    pub const CONSTINIT: LangIds = min(Lang::CPP_20);
    pub const DEFAULT_DELETE_FUNC: LangIds = min(Lang::CPP_11);
    /// `= default` for relational operators.
    pub const DEFAULT_RELOPS: LangIds = min(Lang::CPP_20);
    pub const DEPRECATED: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_14);
    pub const DIGRAPHS: LangIds = min(Lang::C_95);
    pub const ENUM: LangIds = min(Lang::C_89);
    pub const ENUM_CLASS: LangIds = min(Lang::CPP_11);
    pub const EXPLICIT_USER_DEF_CONV: LangIds = min(Lang::CPP_11);
    pub const EXPORT: LangIds = min(Lang::CPP_20);
    pub const FINAL: LangIds = min(Lang::CPP_11);
    pub const FIXED_TYPE_ENUM: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_11);
    pub const IMAGINARY: LangIds = c_min(Lang::C_99);
    pub const IMPLICIT_INT: LangIds = max(Lang::C_95).intersection(LangIds::C_ANY);
    pub const INLINE: LangIds = c_cpp_min(Lang::C_99, Lang::CPP_98);
    pub const INLINE_NAMESPACE: LangIds = min(Lang::CPP_11);
    pub const INLINE_VARIABLE: LangIds = min(Lang::CPP_17);
    /// K&R C function definitions with identifier lists.
    pub const KNR_FUNC_DEFS: LangIds = max(Lang::C_17).intersection(LangIds::C_ANY);
    pub const LONG_DOUBLE: LangIds = min(Lang::C_89);
    pub const LONG_FLOAT: LangIds = LangIds::C_KNR;
    pub const LONG_LONG: LangIds = c_cpp_min(Lang::C_99, Lang::CPP_11);
    pub const MAYBE_UNUSED: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_17);
    pub const NESTED_NAMESPACE: LangIds = min(Lang::CPP_17);
    pub const NODISCARD: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_17);
    pub const NOEXCEPT: LangIds = min(Lang::CPP_11);
    pub const NONRETURNING_FUNC: LangIds = c_cpp_min(Lang::C_11, Lang::CPP_11);
    /// `[[noreturn]]` rather than `_Noreturn`.
    pub const NORETURN_ATTRIBUTE: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_11);
    pub const NO_UNIQUE_ADDRESS: LangIds = min(Lang::CPP_20);
    pub const NULLPTR: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_11);
    pub const OVERRIDE: LangIds = min(Lang::CPP_11);
    pub const POINTER_TO_MEMBER: LangIds = LangIds::CPP_ANY;
    pub const PROTOTYPES: LangIds = min(Lang::C_89);
    pub const QUALIFIED_ARRAY: LangIds = c_min(Lang::C_99);
    pub const REF_QUALIFIED_FUNC: LangIds = min(Lang::CPP_11);
    pub const REGISTER: LangIds = LangIds::C_ANY.union(cpp_max(Lang::CPP_14));
    /// `register` without a deprecation warning.
    pub const REGISTER_UNDEPRECATED: LangIds = LangIds::C_ANY.union(cpp_max(Lang::CPP_03));
    pub const REFERENCE: LangIds = LangIds::CPP_ANY;
    pub const RESTRICT: LangIds = c_min(Lang::C_99);
    pub const RVALUE_REFERENCE: LangIds = min(Lang::CPP_11);
    pub const SIGNED: LangIds = min(Lang::C_89);
    pub const SPACESHIP: LangIds = min(Lang::CPP_20);
    /// `static operator()`.
    pub const STATIC_OPER_PARENS: LangIds = min(Lang::CPP_23);
    pub const STATIC_ASSERT: LangIds = c_cpp_min(Lang::C_11, Lang::CPP_11);
    /// `int i, i;` declaring the same thing twice.
    pub const TENTATIVE_DEFS: LangIds = LangIds::C_ANY;
    pub const THREAD_LOCAL_STORAGE: LangIds = c_cpp_min(Lang::C_11, Lang::CPP_11);
    /// `thread_local` rather than `_Thread_local`.
    pub const THREAD_LOCAL_KEYWORD: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_11);
    pub const THROW: LangIds = cpp_max(Lang::CPP_17);
    /// `throw()` without a deprecation warning.
    pub const THROW_UNDEPRECATED: LangIds = cpp_max(Lang::CPP_03);
    pub const TRAILING_RETURN: LangIds = min(Lang::CPP_11);
    pub const TRIGRAPHS: LangIds = c_min(Lang::C_89)
        .difference(LangIds::C_23)
        .union(cpp_max(Lang::CPP_14));
    pub const UNSIGNED_CHAR: LangIds = min(Lang::C_89);
    pub const UNSIGNED_LONG: LangIds = min(Lang::C_89);
    pub const UNSIGNED_SHORT: LangIds = min(Lang::C_89);
    pub const UPC: LangIds = LangIds::C_99_UPC;
    pub const USER_DEF_CONV: LangIds = LangIds::CPP_ANY;
    pub const USER_DEF_LITERAL: LangIds = min(Lang::CPP_11);
    pub const USING_DECLARATION: LangIds = min(Lang::CPP_11);
    /// `f(...)` with no other parameters.
    pub const VARIADIC_ONLY_PARAMS: LangIds = c_cpp_min(Lang::C_23, Lang::CPP_98);
    pub const VLA: LangIds = c_min(Lang::C_99);
    pub const VOID: LangIds = min(Lang::C_89);
    pub const VOLATILE: LangIds = min(Lang::C_89);
    pub const WCHAR_T: LangIds = min(Lang::C_95);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_aliases() {
        assert_eq!(find("k&r"), Some(Lang::C_KNR));
        assert_eq!(find("c90"), Some(Lang::C_89));
        assert_eq!(find("C18"), Some(Lang::C_17));
        assert_eq!(find("c++"), Some(Lang::CPP_NEW));
        assert_eq!(find("c"), Some(Lang::C_NEW));
        assert_eq!(find("C++26"), None);
    }

    #[test]
    fn ranges() {
        assert!(min(Lang::C_99).contains(LangIds::C_23 | LangIds::CPP_98));
        assert!(!min(Lang::C_99).intersects(LangIds::C_89 | LangIds::EXTENSIONS));
        assert_eq!(c_min(Lang::C_11), LangIds::C_11 | LangIds::C_17 | LangIds::C_23);
        assert_eq!(cpp_max(Lang::CPP_03), LangIds::CPP_98 | LangIds::CPP_03);
        assert!(max(Lang::CPP_98).contains(LangIds::C_23));
        assert_eq!(Lang::CPP_17.and_newer(), LangIds::CPP_17 | LangIds::CPP_20 | LangIds::CPP_23);
    }

    #[test]
    fn oldest_and_newest() {
        let ids = LangIds::C_99 | LangIds::C_99_UPC | LangIds::CPP_11;
        assert_eq!(oldest(ids), Some(Lang::C_99));
        assert_eq!(newest(ids), Some(Lang::CPP_11));
        assert_eq!(oldest(LangIds::empty()), None);
    }

    #[test]
    fn which_phrases() {
        let bool_ids = c_min(Lang::C_99) | LangIds::CPP_ANY;
        assert_eq!(which(bool_ids, Lang::C_89), " until C99");
        assert_eq!(which(bool_ids, Lang::C_11), "");
        assert_eq!(which(LangIds::CPP_ANY, Lang::C_17), " in C");
        assert_eq!(which(LangIds::C_ANY, Lang::CPP_17), " in C++");
        assert_eq!(which(max(Lang::CPP_03) & LangIds::CPP_ANY, Lang::CPP_11), " since C++11");
        assert_eq!(which(LangIds::C_KNR, Lang::C_89), " unless K&RC");
        assert_eq!(which(LangIds::C_KNR, Lang::C_KNR), "");
        assert_eq!(which(c_min(Lang::C_99) | LangIds::CPP_ANY, Lang::C_23), "");
        assert_eq!(which(max(Lang::C_17) & LangIds::C_ANY, Lang::C_23), " since C23");
        assert_eq!(which(max(Lang::CPP_17), Lang::CPP_20), " since C++20");
        assert_eq!(which(c_min(Lang::C_11) | LangIds::CPP_ANY, Lang::CPP_98), "");
        assert_eq!(which(LangIds::C_89 | LangIds::C_11, Lang::C_99), " unless C89 or C11");
    }

    #[test]
    fn next_stays_in_family() {
        assert_eq!(Lang::C_17.next(), Some(Lang::C_23));
        assert_eq!(Lang::C_23.next(), None);
        assert_eq!(Lang::CPP_20.next(), Some(Lang::CPP_23));
        assert_eq!(Lang::CPP_23.next(), None);
    }

    #[test]
    fn coarse_names() {
        assert_eq!(coarse_name(LangIds::C_ANY), Some("C"));
        assert_eq!(coarse_name(min(Lang::CPP_11)), Some("C++"));
        assert_eq!(coarse_name(LangIds::ANY), None);
    }

    #[test]
    fn reserved_names() {
        assert_eq!(reserved_in("_Foo"), LangIds::ANY);
        assert_eq!(reserved_in("__foo"), LangIds::ANY);
        assert_eq!(reserved_in("a__b"), LangIds::CPP_ANY);
        assert_eq!(reserved_in("_foo"), LangIds::empty());
        assert_eq!(reserved_in("foo"), LangIds::empty());
    }
}
