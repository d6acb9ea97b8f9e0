//! Type identifiers and the rules for combining them.
//!
//! A [`TypeId`] packs four orthogonal groups of bits into a single `u64`:
//! base types, storage classes (and storage-class-like keywords), qualifiers,
//! and attributes. Which bits may be combined, and in which languages, is
//! driven by the tables in [`tables`].

use std::fmt;

use bitflags::bitflags;

use crate::lang::{self, Lang, LangIds};

mod tables;

pub use tables::TypeInfo;

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct TypeId: u64 {
        // Base types.
        const VOID = 1 << 0;
        /// Deduced type, i.e. `auto` in C++11 and C23.
        const AUTO = 1 << 1;
        const BOOL = 1 << 2;
        const CHAR = 1 << 3;
        const CHAR8_T = 1 << 4;
        const CHAR16_T = 1 << 5;
        const CHAR32_T = 1 << 6;
        const WCHAR_T = 1 << 7;
        const SHORT = 1 << 8;
        const INT = 1 << 9;
        const LONG = 1 << 10;
        /// Always set together with `LONG`.
        const LONG_LONG = 1 << 11;
        const SIGNED = 1 << 12;
        const UNSIGNED = 1 << 13;
        const FLOAT = 1 << 14;
        const DOUBLE = 1 << 15;
        const COMPLEX = 1 << 16;
        const IMAGINARY = 1 << 17;
        const ENUM = 1 << 18;
        const STRUCT = 1 << 19;
        const UNION = 1 << 20;
        const CLASS = 1 << 21;
        /// A reference to a `typedef`'d type, e.g. `size_t`.
        const TYPEDEF_TYPE = 1 << 22;

        // Storage classes.
        const AUTO_STORAGE = 1 << 23;
        /// Apple's `__block`.
        const BLOCK = 1 << 24;
        const EXTERN = 1 << 25;
        const EXTERN_C = 1 << 26;
        const REGISTER = 1 << 27;
        const STATIC = 1 << 28;
        const THREAD_LOCAL = 1 << 29;
        const TYPEDEF = 1 << 30;

        // Storage-class-like.
        const CONSTEVAL = 1 << 31;
        const CONSTEXPR = 1 << 32;
        const CONSTINIT = 1 << 33;
        const DEFAULT = 1 << 34;
        const DELETE = 1 << 35;
        const EXPLICIT = 1 << 36;
        const EXPORT = 1 << 37;
        const FINAL = 1 << 38;
        const FRIEND = 1 << 39;
        const INLINE = 1 << 40;
        const MUTABLE = 1 << 41;
        const NOEXCEPT = 1 << 42;
        const OVERRIDE = 1 << 43;
        const THROW = 1 << 44;
        const VIRTUAL = 1 << 45;
        const PURE_VIRTUAL = 1 << 46;

        // Qualifiers.
        const ATOMIC = 1 << 47;
        const CONST = 1 << 48;
        /// `static` inside an array parameter's brackets.
        const NON_EMPTY_ARRAY = 1 << 49;
        /// `&` after a member function's parameters.
        const REFERENCE = 1 << 50;
        /// `&&` after a member function's parameters.
        const RVALUE_REFERENCE = 1 << 51;
        const RESTRICT = 1 << 52;
        const VOLATILE = 1 << 53;
        const UPC_RELAXED = 1 << 54;
        const UPC_SHARED = 1 << 55;
        const UPC_STRICT = 1 << 56;

        // Attributes.
        const CARRIES_DEPENDENCY = 1 << 57;
        const DEPRECATED = 1 << 58;
        const MAYBE_UNUSED = 1 << 59;
        const NODISCARD = 1 << 60;
        const NORETURN = 1 << 61;
        const NO_UNIQUE_ADDRESS = 1 << 62;

        const MASK_BASE = (1 << 23) - 1;
        const MASK_STORAGE = ((1 << 47) - 1) & !Self::MASK_BASE.bits();
        const MASK_QUALIFIER = ((1 << 57) - 1) & !((1 << 47) - 1);
        const MASK_ATTRIBUTE = ((1 << 63) - 1) & !((1 << 57) - 1);

        const ANY_CHAR = Self::CHAR.bits()
            | Self::CHAR8_T.bits()
            | Self::CHAR16_T.bits()
            | Self::CHAR32_T.bits()
            | Self::WCHAR_T.bits();
        const ANY_FLOAT = Self::FLOAT.bits() | Self::DOUBLE.bits();
        const ANY_MODIFIER = Self::SHORT.bits()
            | Self::LONG.bits()
            | Self::LONG_LONG.bits()
            | Self::SIGNED.bits()
            | Self::UNSIGNED.bits();
        const ANY_INTEGRAL = Self::BOOL.bits()
            | Self::ANY_CHAR.bits()
            | Self::INT.bits()
            | Self::ANY_MODIFIER.bits();
        const ANY_CLASS = Self::STRUCT.bits() | Self::UNION.bits() | Self::CLASS.bits();
        const ANY_ECSU = Self::ENUM.bits() | Self::ANY_CLASS.bits();

        const CV = Self::CONST.bits() | Self::VOLATILE.bits();
        const ANY_REFERENCE = Self::REFERENCE.bits() | Self::RVALUE_REFERENCE.bits();
        const ANY_UPC = Self::UPC_RELAXED.bits() | Self::UPC_SHARED.bits() | Self::UPC_STRICT.bits();
        const ANY_LINKAGE = Self::EXTERN.bits() | Self::EXTERN_C.bits() | Self::STATIC.bits();
        const ANY_VIRTUAL = Self::VIRTUAL.bits()
            | Self::PURE_VIRTUAL.bits()
            | Self::OVERRIDE.bits()
            | Self::FINAL.bits();
        const ANY_CONSTANT = Self::CONSTEVAL.bits() | Self::CONSTEXPR.bits() | Self::CONSTINIT.bits();

        /// The only types that can apply to constructor definitions.
        const CONSTRUCTOR_DEF = Self::CONSTEXPR.bits()
            | Self::INLINE.bits()
            | Self::NOEXCEPT.bits()
            | Self::THROW.bits();
        /// The only types that can apply to constructor declarations.
        const CONSTRUCTOR_DECL = Self::CONSTRUCTOR_DEF.bits()
            | Self::DEFAULT.bits()
            | Self::DELETE.bits()
            | Self::EXPLICIT.bits()
            | Self::FRIEND.bits();
        /// The only types that can apply to destructor definitions.
        const DESTRUCTOR_DEF = Self::INLINE.bits() | Self::NOEXCEPT.bits() | Self::THROW.bits();
        /// The only types that can apply to destructor declarations.
        const DESTRUCTOR_DECL = Self::DESTRUCTOR_DEF.bits()
            | Self::DEFAULT.bits()
            | Self::DELETE.bits()
            | Self::FINAL.bits()
            | Self::FRIEND.bits()
            | Self::OVERRIDE.bits()
            | Self::PURE_VIRTUAL.bits()
            | Self::VIRTUAL.bits();
        /// The only types that can apply to functions in C.
        const FUNC_C = Self::EXTERN.bits()
            | Self::INLINE.bits()
            | Self::STATIC.bits()
            | Self::TYPEDEF.bits()
            | Self::NORETURN.bits();
        /// The only types that can apply to function-like things in C++.
        const FUNC_LIKE_CPP = Self::CV.bits()
            | Self::CONSTEVAL.bits()
            | Self::CONSTEXPR.bits()
            | Self::DEFAULT.bits()
            | Self::DELETE.bits()
            | Self::EXPLICIT.bits()
            | Self::EXPORT.bits()
            | Self::EXTERN_C.bits()
            | Self::FINAL.bits()
            | Self::FRIEND.bits()
            | Self::FUNC_C.bits()
            | Self::NOEXCEPT.bits()
            | Self::OVERRIDE.bits()
            | Self::PURE_VIRTUAL.bits()
            | Self::ANY_REFERENCE.bits()
            | Self::RESTRICT.bits()
            | Self::THROW.bits()
            | Self::VIRTUAL.bits();
        /// The only types that can apply to a C++ program's `main()`.
        const MAIN_FUNC_CPP = Self::EXTERN.bits()
            | Self::FRIEND.bits()
            | Self::NOEXCEPT.bits()
            | Self::THROW.bits();
        /// Types that can apply only to member functions. `DEFAULT` is absent
        /// because relational operators may be defaulted as non-members.
        const MEMBER_FUNC_ONLY = Self::CV.bits()
            | Self::DELETE.bits()
            | Self::FINAL.bits()
            | Self::OVERRIDE.bits()
            | Self::PURE_VIRTUAL.bits()
            | Self::ANY_REFERENCE.bits()
            | Self::RESTRICT.bits()
            | Self::VIRTUAL.bits();
        /// Types that can apply only to non-member functions.
        const NONMEMBER_FUNC_ONLY = Self::FRIEND.bits();
        /// The only types that can apply to `operator new` and `delete`.
        const NEW_DELETE_OPER = Self::EXTERN.bits()
            | Self::FRIEND.bits()
            | Self::NOEXCEPT.bits()
            | Self::STATIC.bits()
            | Self::THROW.bits();
        /// The only types that can apply to user-defined conversion operators.
        const USER_DEF_CONV = Self::CONST.bits()
            | Self::CONSTEXPR.bits()
            | Self::EXPLICIT.bits()
            | Self::FINAL.bits()
            | Self::FRIEND.bits()
            | Self::INLINE.bits()
            | Self::NOEXCEPT.bits()
            | Self::OVERRIDE.bits()
            | Self::PURE_VIRTUAL.bits()
            | Self::THROW.bits()
            | Self::VIRTUAL.bits();
    }
}

/// Which of `int`, `short`, `long`, and `long long` (signed or unsigned) are
/// printed with an explicit `int`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ExplicitInt {
    pub signed: TypeId,
    pub unsigned: TypeId,
}

impl ExplicitInt {
    pub const NONE: ExplicitInt = ExplicitInt {
        signed: TypeId::empty(),
        unsigned: TypeId::empty(),
    };

    const SIZES: TypeId = TypeId::SHORT
        .union(TypeId::INT)
        .union(TypeId::LONG)
        .union(TypeId::LONG_LONG);

    pub const ALL: ExplicitInt = ExplicitInt {
        signed: ExplicitInt::SIZES,
        unsigned: ExplicitInt::SIZES,
    };

    /// Parse a mask like `i,ul` or `*` where the letters `i`, `s`, `l`, `ll`
    /// name a size, a `u` prefix makes it unsigned, and a lone `u` means every
    /// unsigned size.
    pub fn parse(mask: &str) -> Option<ExplicitInt> {
        match mask {
            "*" => return Some(ExplicitInt::ALL),
            "-" | "" => return Some(ExplicitInt::NONE),
            _ => {}
        }

        let mut explicit = ExplicitInt::NONE;
        let mut chars = mask.chars().filter(|c| !c.is_whitespace() && *c != ',').peekable();
        while let Some(c) = chars.next() {
            let (is_unsigned, c) = match c.to_ascii_lowercase() {
                'u' => match chars.peek().map(|c| c.to_ascii_lowercase()) {
                    Some(next @ ('i' | 's' | 'l')) => {
                        chars.next();
                        (true, next)
                    }
                    _ => {
                        explicit.unsigned = ExplicitInt::SIZES;
                        continue;
                    }
                },
                c => (false, c),
            };
            let size = match c {
                'i' => TypeId::INT,
                's' => TypeId::SHORT,
                'l' if chars.peek().map(|c| c.to_ascii_lowercase()) == Some('l') => {
                    chars.next();
                    TypeId::LONG_LONG
                }
                'l' => TypeId::LONG,
                _ => return None,
            };
            match is_unsigned {
                true => explicit.unsigned |= size,
                false => explicit.signed |= size,
            }
        }
        Some(explicit)
    }

    /// Returns `true` if the integer base type `base` should include `int`.
    pub fn applies_to(self, base: TypeId) -> bool {
        if base.intersects(TypeId::ANY_CHAR | TypeId::BOOL | TypeId::ANY_FLOAT)
            || !base.intersects(TypeId::INT | TypeId::ANY_MODIFIER)
            || base.intersects(!(TypeId::INT | TypeId::ANY_MODIFIER) & TypeId::MASK_BASE)
        {
            return false;
        }
        let size = if base.contains(TypeId::LONG_LONG) {
            TypeId::LONG_LONG
        } else if base.contains(TypeId::LONG) {
            TypeId::LONG
        } else if base.contains(TypeId::SHORT) {
            TypeId::SHORT
        } else {
            TypeId::INT
        };
        let mask = if base.contains(TypeId::UNSIGNED) { self.unsigned } else { self.signed };
        mask.contains(size)
    }
}

impl fmt::Display for ExplicitInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == ExplicitInt::ALL {
            return f.write_str("*");
        }
        let mut parts = Vec::new();
        for (prefix, mask) in [("", self.signed), ("u", self.unsigned)] {
            if !prefix.is_empty() && mask == ExplicitInt::SIZES {
                parts.push("u".to_owned());
                continue;
            }
            for (letter, size) in [
                ("i", TypeId::INT),
                ("s", TypeId::SHORT),
                ("l", TypeId::LONG),
                ("ll", TypeId::LONG_LONG),
            ] {
                if mask.contains(size) {
                    parts.push(format!("{prefix}{letter}"));
                }
            }
        }
        match parts.is_empty() {
            true => f.write_str("-"),
            false => f.write_str(&parts.join(",")),
        }
    }
}

/// An attempt to combine types that overlap.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CombineError {
    pub new: TypeId,
    pub old: TypeId,
}

impl CombineError {
    pub fn message(&self, lang: Lang) -> String {
        format!(
            "\"{}\" can not be combined with \"{}\"",
            self.new.name_error(lang),
            self.old.name_error(lang),
        )
    }
}

/// How to render a type's name.
#[derive(Debug, Copy, Clone)]
pub struct NameStyle {
    pub lang: Lang,
    /// Render for pseudo-English output.
    pub english: bool,
    /// Use English words like `integer` when rendering English.
    pub english_types: bool,
    /// Render for an error message: keep `signed` and always use keywords.
    pub error: bool,
    /// Print `const` and `volatile` after the base type.
    pub east_const: bool,
    pub explicit_int: ExplicitInt,
    /// In C++, the subset of `enum`, `class`, `struct`, and `union` keywords
    /// to print, or `None` to print all of them.
    pub explicit_ecsu: Option<TypeId>,
    /// The tokens to wrap C23/C++11 attributes in, or `None` to list them
    /// as plain words.
    pub attr_brackets: Option<(&'static str, &'static str)>,
}

impl NameStyle {
    /// A plain C/C++ style for `lang`.
    pub fn gibberish(lang: Lang) -> NameStyle {
        NameStyle {
            lang,
            english: false,
            english_types: false,
            error: false,
            east_const: false,
            explicit_int: ExplicitInt::NONE,
            explicit_ecsu: None,
            attr_brackets: None,
        }
    }

    pub fn english(lang: Lang, english_types: bool) -> NameStyle {
        NameStyle {
            english: true,
            english_types,
            ..NameStyle::gibberish(lang)
        }
    }

    pub fn error(lang: Lang) -> NameStyle {
        NameStyle {
            error: true,
            ..NameStyle::gibberish(lang)
        }
    }
}

/// Storage classes in the order they are printed.
const STORAGE_ORDER: &[TypeId] = &[
    TypeId::DEFAULT,
    TypeId::DELETE,
    TypeId::EXTERN_C,
    TypeId::TYPEDEF,
    TypeId::AUTO_STORAGE,
    TypeId::BLOCK,
    TypeId::EXPORT,
    TypeId::EXTERN,
    TypeId::FRIEND,
    TypeId::REGISTER,
    TypeId::MUTABLE,
    TypeId::STATIC,
    TypeId::THREAD_LOCAL,
    TypeId::EXPLICIT,
    TypeId::INLINE,
    TypeId::OVERRIDE,
    TypeId::FINAL,
    TypeId::PURE_VIRTUAL,
    TypeId::VIRTUAL,
    TypeId::NOEXCEPT,
    TypeId::THROW,
    TypeId::CONSTEVAL,
    TypeId::CONSTEXPR,
    TypeId::CONSTINIT,
];

/// Qualifiers in the order they are printed.
const QUALIFIER_ORDER: &[TypeId] = &[
    TypeId::UPC_RELAXED,
    TypeId::UPC_STRICT,
    TypeId::UPC_SHARED,
    TypeId::CONST,
    TypeId::RESTRICT,
    TypeId::VOLATILE,
    TypeId::NON_EMPTY_ARRAY,
    TypeId::REFERENCE,
    TypeId::RVALUE_REFERENCE,
    TypeId::ATOMIC,
];

/// Base types in the order they are printed.
const BASE_ORDER: &[TypeId] = &[
    TypeId::SIGNED,
    TypeId::UNSIGNED,
    TypeId::SHORT,
    TypeId::LONG,
    TypeId::LONG_LONG,
    TypeId::VOID,
    TypeId::AUTO,
    TypeId::BOOL,
    TypeId::CHAR,
    TypeId::CHAR8_T,
    TypeId::CHAR16_T,
    TypeId::CHAR32_T,
    TypeId::WCHAR_T,
    TypeId::INT,
    TypeId::COMPLEX,
    TypeId::IMAGINARY,
    TypeId::FLOAT,
    TypeId::DOUBLE,
    TypeId::ENUM,
    TypeId::STRUCT,
    TypeId::UNION,
    TypeId::CLASS,
];

/// Attributes in the order they are printed.
const ATTRIBUTE_ORDER: &[TypeId] = &[
    TypeId::CARRIES_DEPENDENCY,
    TypeId::DEPRECATED,
    TypeId::MAYBE_UNUSED,
    TypeId::NODISCARD,
    TypeId::NORETURN,
    TypeId::NO_UNIQUE_ADDRESS,
];

impl TypeId {
    pub fn base(self) -> TypeId {
        self & TypeId::MASK_BASE
    }

    pub fn storage(self) -> TypeId {
        self & TypeId::MASK_STORAGE
    }

    pub fn qualifiers(self) -> TypeId {
        self & TypeId::MASK_QUALIFIER
    }

    pub fn attributes(self) -> TypeId {
        self & TypeId::MASK_ATTRIBUTE
    }

    /// Returns `true` if this is some form of `long int` only, not `long
    /// double` or `long float`.
    fn is_long_int(self) -> bool {
        self.contains(TypeId::LONG) && !self.intersects(TypeId::ANY_FLOAT)
    }

    /// Add `new` to this type, turning a second `long` into `long long`.
    pub fn add(&mut self, new: TypeId) -> Result<(), CombineError> {
        let mut new = new;
        if self.base().is_long_int() && new.base().is_long_int() {
            new = (new - TypeId::MASK_BASE) | TypeId::LONG_LONG;
        }
        if self.intersects(new) {
            let groups = [
                TypeId::MASK_BASE,
                TypeId::MASK_STORAGE,
                TypeId::MASK_QUALIFIER,
                TypeId::MASK_ATTRIBUTE,
            ];
            let group = groups
                .into_iter()
                .filter(|group| new.intersects(*group))
                .fold(TypeId::empty(), |acc, group| acc | group);
            return Err(CombineError {
                new,
                old: *self & group,
            });
        }
        *self |= new;
        Ok(())
    }

    /// Remove `signed` unless it is needed (i.e. `signed char`), turning a bare
    /// `signed` into `int`.
    fn without_signed(self) -> TypeId {
        if self.contains(TypeId::SIGNED) && !self.contains(TypeId::CHAR) {
            let base = self.base() - TypeId::SIGNED;
            let base = if base.is_empty() { TypeId::INT } else { base };
            return (self - TypeId::MASK_BASE) | base;
        }
        self
    }

    /// Normalize the base type so equivalent spellings compare equal:
    /// `signed` is dropped where it is implied, and an implicit `int` is made
    /// explicit.
    pub fn normalize(self) -> TypeId {
        let mut ty = self.without_signed();
        let base = ty.base();
        let only_modifiers = base.intersects(TypeId::SHORT | TypeId::UNSIGNED)
            && (base - (TypeId::ANY_MODIFIER | TypeId::INT)).is_empty()
            || (base.is_long_int() && (base - (TypeId::ANY_MODIFIER | TypeId::INT)).is_empty());
        if only_modifiers {
            ty |= TypeId::INT;
        }
        ty
    }

    /// Types are equivalent when their storage, qualifiers, attributes, and
    /// normalized base types are equal.
    pub fn equiv(self, other: TypeId) -> bool {
        self - TypeId::MASK_BASE == other - TypeId::MASK_BASE
            && self.base().normalize() == other.base().normalize()
    }

    /// Returns `true` if this type has any of the bits of `other` within
    /// each group `other` mentions.
    pub fn is_any(self, other: TypeId) -> bool {
        let groups = [TypeId::MASK_STORAGE | TypeId::MASK_QUALIFIER, TypeId::MASK_ATTRIBUTE];
        for group in groups {
            let wanted = other & group;
            if !wanted.is_empty() && !self.intersects(wanted) {
                return false;
            }
        }
        let wanted = other.base();
        wanted.is_empty() || self.base().normalize().intersects(wanted.normalize())
    }

    /// The languages in which this type is legal: every language if it is legal
    /// in `lang`, otherwise the languages of the first offending bit or
    /// combination.
    pub fn check(self, lang: Lang) -> LangIds {
        let legal_groups = [
            (self.attributes(), tables::ATTRIBUTE_INFO),
            (self.storage(), tables::STORAGE_INFO),
            (self.base(), tables::BASE_INFO),
            (self.qualifiers(), tables::QUALIFIER_INFO),
        ];
        for (ty, infos) in legal_groups {
            if let Some(info) = infos
                .iter()
                .find(|info| ty.intersects(info.id) && !lang.is_any(info.langs))
            {
                return info.langs;
            }
        }

        let combos = [
            (self.storage(), tables::STORAGE_INFO, &tables::OK_STORAGE[..]),
            (self.base(), tables::BASE_INFO, &tables::OK_BASE[..]),
            (self.qualifiers(), tables::QUALIFIER_INFO, &tables::OK_QUALIFIER[..]),
        ];
        for (ty, infos, ok) in combos {
            if let Some(langs) = check_combo(ty, infos, ok, lang) {
                return langs;
            }
        }

        LangIds::ANY
    }

    /// Is this type legal in `lang`?
    pub fn is_legal(self, lang: Lang) -> bool {
        self.check(lang) == LangIds::ANY
    }

    /// The name of this type as C/C++ keywords.
    pub fn name_c(self, lang: Lang) -> String {
        self.name(&NameStyle::gibberish(lang))
    }

    /// The name of this type for use in an error message.
    pub fn name_error(self, lang: Lang) -> String {
        self.name(&NameStyle::error(lang))
    }

    /// The name of this type in pseudo-English.
    pub fn name_english(self, lang: Lang, english_types: bool) -> String {
        self.name(&NameStyle::english(lang, english_types))
    }

    pub fn name(self, style: &NameStyle) -> String {
        let mut words = Vec::new();
        let mut base = if style.error { self.base() } else { self.base().without_signed() };
        let mut storage = self.storage();
        let mut qualifiers = self.qualifiers();
        let mut attributes = self.attributes();

        if attributes.contains(TypeId::NORETURN) && !style.lang.is_any(lang::feature::NORETURN_ATTRIBUTE) {
            // `_Noreturn` is a keyword before C23 rather than an attribute.
            words.push(literal(TypeId::NORETURN, style).to_owned());
            attributes -= TypeId::NORETURN;
        }

        if !attributes.is_empty() {
            let names = ATTRIBUTE_ORDER
                .iter()
                .filter(|id| attributes.contains(**id))
                .map(|id| literal(*id, style))
                .collect::<Vec<_>>();
            match style.attr_brackets {
                Some((open, close)) if !style.english => {
                    words.push(format!("{open}{}{close}", names.join(",")))
                }
                _ => words.extend(names.into_iter().map(str::to_owned)),
            }
        }

        if style.english {
            if base.intersects(TypeId::ANY_MODIFIER) && (base - TypeId::ANY_MODIFIER).is_empty() {
                base |= TypeId::INT;
            }
            if storage.intersects(TypeId::FINAL | TypeId::OVERRIDE | TypeId::PURE_VIRTUAL) {
                storage |= TypeId::VIRTUAL;
            }
        } else if style.explicit_int.applies_to(base) {
            base |= TypeId::INT;
        } else if base.intersects(TypeId::ANY_MODIFIER) {
            base -= TypeId::INT;
        }

        push_names(&mut words, storage, STORAGE_ORDER, style);

        let mut east = TypeId::empty();
        if style.east_const && !style.english {
            east = qualifiers & TypeId::CV;
            qualifiers -= TypeId::CV;
        }
        push_names(&mut words, qualifiers, QUALIFIER_ORDER, style);

        if style.lang.is_cpp() && !style.english && !style.error {
            if let Some(mask) = style.explicit_ecsu {
                base &= !TypeId::ANY_ECSU | mask;
            }
        }
        push_names(&mut words, base, BASE_ORDER, style);
        push_names(&mut words, east, QUALIFIER_ORDER, style);

        words.join(" ")
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name_c(Lang::CPP_NEW))
    }
}

fn push_names(words: &mut Vec<String>, ty: TypeId, order: &[TypeId], style: &NameStyle) {
    words.extend(
        order
            .iter()
            .filter(|id| ty.contains(**id))
            .map(|id| literal(*id, style))
            .filter(|lit| !lit.is_empty())
            .map(str::to_owned),
    );
}

/// The literal for a single bit.
fn literal(id: TypeId, style: &NameStyle) -> &'static str {
    let Some(info) = tables::info_for(id) else {
        return "";
    };
    match info.english {
        Some(english) if style.english && style.english_types && !style.error => english,
        _ => lang::lang_lit(info.lits, style.lang),
    }
}

fn check_combo(ty: TypeId, infos: &[TypeInfo], ok: &[&[LangIds]], lang: Lang) -> Option<LangIds> {
    for (row, row_info) in infos.iter().enumerate() {
        if !ty.intersects(row_info.id) {
            continue;
        }
        for (col, col_info) in infos.iter().enumerate().take(row + 1) {
            let langs = ok[row][col];
            if ty.intersects(col_info.id) && !lang.is_any(langs) {
                return Some(langs);
            }
        }
    }
    None
}

/// The English literal of a single bit, if it has one distinct from its
/// keyword.
pub fn english_literal(id: TypeId) -> Option<&'static str> {
    tables::info_for(id).and_then(|info| info.english)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_long() {
        let mut ty = TypeId::LONG;
        ty.add(TypeId::LONG).unwrap();
        assert_eq!(ty, TypeId::LONG | TypeId::LONG_LONG);
        assert_eq!(ty.name_c(Lang::C_17), "long long");
        assert!(ty.is_legal(Lang::C_99));
        assert_eq!(ty.check(Lang::C_89), lang::feature::LONG_LONG);
    }

    #[test]
    fn combine_duplicates() {
        let mut ty = TypeId::CONST | TypeId::INT;
        let error = ty.add(TypeId::CONST).unwrap_err();
        assert_eq!(error.message(Lang::C_17), r#""const" can not be combined with "const""#);

        let mut ty = TypeId::SIGNED;
        assert!(ty.add(TypeId::UNSIGNED).is_ok());
        assert!(!ty.is_legal(Lang::C_17));
    }

    #[test]
    fn illegal_combinations() {
        assert!(!(TypeId::LONG | TypeId::SHORT).is_legal(Lang::C_17));
        assert!((TypeId::SIGNED | TypeId::CHAR).is_legal(Lang::C_89));
        assert!((TypeId::LONG | TypeId::DOUBLE).is_legal(Lang::C_89));
        assert!((TypeId::LONG | TypeId::FLOAT).is_legal(Lang::C_KNR));
        assert!(!(TypeId::LONG | TypeId::FLOAT).is_legal(Lang::C_89));
        assert!(!(TypeId::EXTERN | TypeId::STATIC | TypeId::INT).is_legal(Lang::C_17));
    }

    #[test]
    fn bool_spelling() {
        assert_eq!(TypeId::BOOL.name_c(Lang::C_17), "_Bool");
        assert_eq!(TypeId::BOOL.name_c(Lang::C_23), "bool");
        assert_eq!(TypeId::BOOL.name_c(Lang::CPP_98), "bool");
        assert_eq!(TypeId::BOOL.check(Lang::C_89), lang::feature::BOOL_TYPE);
    }

    #[test]
    fn ordering() {
        let ty = TypeId::STATIC | TypeId::CONST | TypeId::UNSIGNED | TypeId::LONG | TypeId::INT;
        assert_eq!(ty.name_c(Lang::C_17), "static const unsigned long");

        let style = NameStyle {
            east_const: true,
            ..NameStyle::gibberish(Lang::C_17)
        };
        assert_eq!((TypeId::CONST | TypeId::INT).name(&style), "int const");
    }

    #[test]
    fn english_names() {
        let ty = TypeId::UNSIGNED;
        assert_eq!(ty.name_english(Lang::C_17, false), "unsigned int");
        assert_eq!(ty.name_english(Lang::C_17, true), "unsigned integer");
        assert_eq!(
            (TypeId::CONST | TypeId::CHAR).name_english(Lang::C_17, true),
            "constant character"
        );
    }

    #[test]
    fn explicit_int() {
        let explicit = ExplicitInt::parse("i,ul").unwrap();
        assert!(explicit.applies_to(TypeId::INT));
        assert!(explicit.applies_to(TypeId::UNSIGNED | TypeId::LONG));
        assert!(!explicit.applies_to(TypeId::LONG));
        assert!(!explicit.applies_to(TypeId::CHAR));
        assert_eq!(explicit.to_string(), "i,ul");
        assert_eq!(ExplicitInt::parse("u").unwrap().to_string(), "u");
        assert_eq!(ExplicitInt::parse("*").unwrap(), ExplicitInt::ALL);
        assert!(ExplicitInt::parse("x").is_none());

        let style = NameStyle {
            explicit_int: ExplicitInt::ALL,
            ..NameStyle::gibberish(Lang::C_17)
        };
        assert_eq!((TypeId::UNSIGNED | TypeId::SHORT).name(&style), "unsigned short int");
    }

    #[test]
    fn equivalence() {
        assert!((TypeId::SIGNED | TypeId::INT).equiv(TypeId::INT));
        assert!(TypeId::UNSIGNED.equiv(TypeId::UNSIGNED | TypeId::INT));
        assert!(TypeId::LONG.equiv(TypeId::LONG | TypeId::INT));
        assert!(!(TypeId::SIGNED | TypeId::CHAR).equiv(TypeId::CHAR));
        assert!(!(TypeId::CONST | TypeId::INT).equiv(TypeId::INT));
    }
}
