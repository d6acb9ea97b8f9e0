//! Per-bit information and legal combinations of bits.
//!
//! Each combination table is indexed by the position of a bit within its
//! group's info table. Only the lower triangle is consulted.

#![allow(non_upper_case_globals)]

use crate::lang::{self, feature, Lang, LangIds, LangLit};

use super::TypeId;

/// What is known about a single type bit.
#[derive(Debug)]
pub struct TypeInfo {
    pub id: TypeId,
    /// The revisions in which the bit is legal on its own.
    pub langs: LangIds,
    /// A pseudo-English word to use instead of the keyword, if any.
    pub english: Option<&'static str>,
    pub lits: LangLit,
}

const fn info(
    id: TypeId,
    langs: LangIds,
    english: Option<&'static str>,
    lits: LangLit,
) -> TypeInfo {
    TypeInfo {
        id,
        langs,
        english,
        lits,
    }
}

const ANY: LangIds = LangIds::ANY;

pub const ATTRIBUTE_INFO: &[TypeInfo] = &[
    info(
        TypeId::CARRIES_DEPENDENCY,
        feature::CARRIES_DEPENDENCY,
        Some("carries dependency"),
        &[(ANY, "carries_dependency")],
    ),
    info(TypeId::DEPRECATED, ANY, None, &[(ANY, "deprecated")]),
    info(TypeId::MAYBE_UNUSED, ANY, Some("maybe unused"), &[(ANY, "maybe_unused")]),
    info(TypeId::NODISCARD, ANY, Some("non-discardable"), &[(ANY, "nodiscard")]),
    info(
        TypeId::NORETURN,
        feature::NONRETURNING_FUNC,
        Some("non-returning"),
        &[(feature::NORETURN_ATTRIBUTE, "noreturn"), (ANY, "_Noreturn")],
    ),
    info(
        TypeId::NO_UNIQUE_ADDRESS,
        ANY,
        Some("non-unique address"),
        &[(ANY, "no_unique_address")],
    ),
];

pub const QUALIFIER_INFO: &[TypeInfo] = &[
    info(TypeId::ATOMIC, feature::ATOMIC, Some("atomic"), &[(ANY, "_Atomic")]),
    info(
        TypeId::CONST,
        ANY,
        Some("constant"),
        &[(lang::not(feature::CONST), "__const"), (ANY, "const")],
    ),
    info(
        TypeId::NON_EMPTY_ARRAY,
        feature::QUALIFIED_ARRAY,
        Some("non-empty"),
        &[(ANY, "static")],
    ),
    info(TypeId::REFERENCE, feature::REF_QUALIFIED_FUNC, None, &[(ANY, "reference")]),
    info(
        TypeId::RVALUE_REFERENCE,
        feature::REF_QUALIFIED_FUNC,
        None,
        &[(ANY, "rvalue reference")],
    ),
    info(
        TypeId::RESTRICT,
        ANY,
        Some("restricted"),
        &[(lang::not(feature::RESTRICT), "__restrict"), (ANY, "restrict")],
    ),
    info(
        TypeId::VOLATILE,
        ANY,
        None,
        &[(lang::not(feature::VOLATILE), "__volatile"), (ANY, "volatile")],
    ),
    info(TypeId::UPC_RELAXED, feature::UPC, None, &[(ANY, "relaxed")]),
    info(TypeId::UPC_SHARED, feature::UPC, None, &[(ANY, "shared")]),
    info(TypeId::UPC_STRICT, feature::UPC, None, &[(ANY, "strict")]),
];

pub const STORAGE_INFO: &[TypeInfo] = &[
    info(TypeId::AUTO_STORAGE, feature::AUTO_STORAGE, Some("automatic"), &[(ANY, "auto")]),
    info(TypeId::BLOCK, ANY, Some("Apple block"), &[(ANY, "__block")]),
    info(TypeId::EXTERN, ANY, Some("external"), &[(ANY, "extern")]),
    info(
        TypeId::EXTERN_C,
        LangIds::CPP_ANY,
        Some("external \"C\" linkage"),
        &[(ANY, "extern \"C\"")],
    ),
    info(TypeId::REGISTER, feature::REGISTER, None, &[(ANY, "register")]),
    info(TypeId::STATIC, ANY, None, &[(ANY, "static")]),
    info(
        TypeId::THREAD_LOCAL,
        ANY,
        Some("thread local"),
        &[
            (lang::not(feature::THREAD_LOCAL_STORAGE), "__thread"),
            (feature::THREAD_LOCAL_KEYWORD, "thread_local"),
            (ANY, "_Thread_local"),
        ],
    ),
    info(TypeId::TYPEDEF, ANY, Some("type"), &[(ANY, "typedef")]),
    info(
        TypeId::CONSTEVAL,
        feature::CONSTEVAL,
        Some("constant evaluation"),
        &[(ANY, "consteval")],
    ),
    info(
        TypeId::CONSTEXPR,
        feature::CONSTEXPR,
        Some("constant expression"),
        &[(ANY, "constexpr")],
    ),
    info(
        TypeId::CONSTINIT,
        feature::CONSTINIT,
        Some("constant initialization"),
        &[(ANY, "constinit")],
    ),
    info(TypeId::DEFAULT, feature::DEFAULT_DELETE_FUNC, None, &[(ANY, "default")]),
    info(TypeId::DELETE, feature::DEFAULT_DELETE_FUNC, Some("deleted"), &[(ANY, "delete")]),
    info(TypeId::EXPLICIT, LangIds::CPP_ANY, None, &[(ANY, "explicit")]),
    info(TypeId::EXPORT, feature::EXPORT, Some("exported"), &[(ANY, "export")]),
    info(TypeId::FINAL, feature::FINAL, None, &[(ANY, "final")]),
    info(TypeId::FRIEND, LangIds::CPP_ANY, None, &[(ANY, "friend")]),
    info(
        TypeId::INLINE,
        ANY,
        None,
        &[(lang::not(feature::INLINE), "__inline"), (ANY, "inline")],
    ),
    info(TypeId::MUTABLE, LangIds::CPP_ANY, None, &[(ANY, "mutable")]),
    info(TypeId::NOEXCEPT, feature::NOEXCEPT, Some("no exception"), &[(ANY, "noexcept")]),
    info(TypeId::OVERRIDE, feature::OVERRIDE, Some("overridden"), &[(ANY, "override")]),
    info(TypeId::THROW, LangIds::CPP_ANY, Some("non-throwing"), &[(ANY, "throw")]),
    info(TypeId::VIRTUAL, LangIds::CPP_ANY, None, &[(ANY, "virtual")]),
    info(TypeId::PURE_VIRTUAL, LangIds::CPP_ANY, Some("pure"), &[(ANY, "pure")]),
];

pub const BASE_INFO: &[TypeInfo] = &[
    info(TypeId::VOID, feature::VOID, None, &[(ANY, "void")]),
    info(
        TypeId::AUTO,
        lang::min(Lang::C_89),
        Some("automatic"),
        &[(lang::not(feature::AUTO_TYPE), "__auto_type"), (ANY, "auto")],
    ),
    info(
        TypeId::BOOL,
        feature::BOOL_TYPE,
        Some("boolean"),
        &[(feature::BOOL_KEYWORD, "bool"), (ANY, "_Bool")],
    ),
    info(TypeId::CHAR, ANY, Some("character"), &[(ANY, "char")]),
    info(TypeId::CHAR8_T, feature::CHAR8_T, Some("character 8"), &[(ANY, "char8_t")]),
    info(TypeId::CHAR16_T, feature::CHAR16_32_T, Some("character 16"), &[(ANY, "char16_t")]),
    info(TypeId::CHAR32_T, feature::CHAR16_32_T, Some("character 32"), &[(ANY, "char32_t")]),
    info(TypeId::WCHAR_T, feature::WCHAR_T, Some("wide character"), &[(ANY, "wchar_t")]),
    info(TypeId::SHORT, ANY, None, &[(ANY, "short")]),
    info(TypeId::INT, ANY, Some("integer"), &[(ANY, "int")]),
    info(TypeId::LONG, ANY, None, &[(ANY, "long")]),
    // Always printed after `long`, so it needs only one more word.
    info(TypeId::LONG_LONG, feature::LONG_LONG, None, &[(ANY, "long")]),
    info(
        TypeId::SIGNED,
        ANY,
        None,
        &[(lang::not(feature::SIGNED), "__signed"), (ANY, "signed")],
    ),
    info(TypeId::UNSIGNED, ANY, None, &[(ANY, "unsigned")]),
    info(TypeId::FLOAT, ANY, Some("floating point"), &[(ANY, "float")]),
    info(TypeId::DOUBLE, ANY, Some("double precision"), &[(ANY, "double")]),
    info(
        TypeId::COMPLEX,
        LangIds::C_ANY,
        Some("complex"),
        &[(lang::not(feature::COMPLEX), "__complex"), (ANY, "_Complex")],
    ),
    info(TypeId::IMAGINARY, feature::IMAGINARY, Some("imaginary"), &[(ANY, "_Imaginary")]),
    info(TypeId::ENUM, feature::ENUM, Some("enumeration"), &[(ANY, "enum")]),
    info(TypeId::STRUCT, ANY, Some("structure"), &[(ANY, "struct")]),
    info(TypeId::UNION, ANY, None, &[(ANY, "union")]),
    info(TypeId::CLASS, LangIds::CPP_ANY, None, &[(ANY, "class")]),
    info(TypeId::TYPEDEF_TYPE, ANY, None, &[(ANY, "")]),
];

/// Find the info for a single bit.
pub fn info_for(id: TypeId) -> Option<&'static TypeInfo> {
    [ATTRIBUTE_INFO, QUALIFIER_INFO, STORAGE_INFO, BASE_INFO]
        .into_iter()
        .flatten()
        .find(|info| info.id == id)
}

// Shorthands so the tables line up.
const ___: LangIds = LangIds::ANY;
const XXX: LangIds = LangIds::empty();
const ATO: LangIds = feature::ATOMIC;
const AUS: LangIds = feature::AUTO_STORAGE;
const BOO: LangIds = feature::BOOL_TYPE;
const C08: LangIds = feature::CHAR8_T;
const C16: LangIds = feature::CHAR16_32_T;
const C32: LangIds = feature::CHAR16_32_T;
const CEV: LangIds = feature::CONSTEVAL;
const CEX: LangIds = feature::CONSTEXPR;
const CIN: LangIds = feature::CONSTINIT;
const COM: LangIds = feature::COMPLEX;
const CPP: LangIds = LangIds::CPP_ANY;
const DDF: LangIds = feature::DEFAULT_DELETE_FUNC;
const ENC: LangIds = feature::ENUM_CLASS;
const ENU: LangIds = feature::ENUM;
const EXP: LangIds = feature::EXPORT;
const FIN: LangIds = feature::FINAL;
const IMA: LangIds = feature::IMAGINARY;
const INL: LangIds = feature::INLINE;
const LDO: LangIds = feature::LONG_DOUBLE;
const LFL: LangIds = feature::LONG_FLOAT;
const LLO: LangIds = feature::LONG_LONG;
const NOE: LangIds = feature::NOEXCEPT;
const OVR: LangIds = feature::OVERRIDE;
const QAR: LangIds = feature::QUALIFIED_ARRAY;
const REG: LangIds = feature::REGISTER;
const RVR: LangIds = feature::RVALUE_REFERENCE;
const SIG: LangIds = feature::SIGNED;
const THR: LangIds = feature::THROW;
const TLS: LangIds = feature::THREAD_LOCAL_STORAGE;
const UNC: LangIds = feature::UNSIGNED_CHAR;
const UNL: LangIds = feature::UNSIGNED_LONG;
const UNS: LangIds = feature::UNSIGNED_SHORT;
const UPC: LangIds = feature::UPC;
const VIR_CEX: LangIds = lang::min(Lang::CPP_20);
const VOL: LangIds = feature::VOID;
const WCH: LangIds = feature::WCHAR_T;

const fn both(a: LangIds, b: LangIds) -> LangIds {
    a.intersection(b)
}

#[rustfmt::skip]
pub const OK_QUALIFIER: [&[LangIds]; 10] = [
//   ato con nea ref rva res vol rel sha str
    &[ATO],                                           // atomic
    &[ATO,___],                                       // const
    &[XXX,QAR,QAR],                                   // non-empty
    &[XXX,CPP,XXX,CPP],                               // reference
    &[XXX,RVR,XXX,XXX,RVR],                           // rvalue reference
    &[XXX,___,QAR,CPP,RVR,___],                       // restrict
    &[ATO,___,QAR,CPP,RVR,___,___],                   // volatile
    &[XXX,UPC,XXX,XXX,XXX,UPC,UPC,UPC],               // relaxed
    &[XXX,UPC,XXX,XXX,XXX,UPC,UPC,UPC,UPC],           // shared
    &[XXX,UPC,XXX,XXX,XXX,UPC,UPC,XXX,UPC,UPC],       // strict
];

#[rustfmt::skip]
pub const OK_STORAGE: [&[LangIds]; 24] = [
//   auto            block extern externC register          static thread          typedef c'eval           c'expr           c'init default delete explicit export final            friend inline mutable noexcept         override throw virtual pure
    &[___],                                                                                                                                                                              // auto
    &[___,           ___],                                                                                                                                                               // block
    &[XXX,           ___,  ___],                                                                                                                                                         // extern
    &[XXX,           ___,  ___,   CPP],                                                                                                                                                  // extern "C"
    &[XXX,           ___,  XXX,   XXX,    ___],                                                                                                                                          // register
    &[XXX,           XXX,  XXX,   XXX,    XXX,              ___],                                                                                                                        // static
    &[XXX,           ___,  ___,   TLS,    XXX,              ___,   ___],                                                                                                                 // thread
    &[XXX,           ___,  XXX,   CPP,    XXX,              XXX,   XXX,            ___],                                                                                                 // typedef
    &[XXX,           CEV,  CEV,   CEV,    XXX,              CEV,   XXX,            XXX,    CEV],                                                                                         // consteval
    &[both(AUS, CEX),CEX,  XXX,   XXX,    both(CEX, REG),   CEX,   XXX,            XXX,    XXX,             CEX],                                                                        // constexpr
    &[XXX,           XXX,  CIN,   CIN,    XXX,              CIN,   both(CIN, TLS), XXX,    XXX,             XXX,             CIN],                                                       // constinit
    &[XXX,           XXX,  XXX,   XXX,    XXX,              XXX,   XXX,            XXX,    both(CEV, DDF),  both(CEX, DDF),  XXX,   DDF],                                                // default
    &[XXX,           XXX,  XXX,   XXX,    XXX,              XXX,   XXX,            XXX,    both(CEV, DDF),  both(CEX, DDF),  XXX,   XXX,    DDF],                                        // delete
    &[XXX,           XXX,  XXX,   XXX,    XXX,              XXX,   XXX,            XXX,    XXX,             CEX,             XXX,   DDF,    DDF,   CPP],                                 // explicit
    &[XXX,           XXX,  EXP,   XXX,    XXX,              XXX,   XXX,            XXX,    XXX,             both(CEX, EXP),  CIN,   XXX,    XXX,   XXX,     EXP],                        // export
    &[XXX,           XXX,  XXX,   XXX,    XXX,              XXX,   XXX,            XXX,    XXX,             both(CEX, FIN),  XXX,   XXX,    XXX,   XXX,     XXX,   FIN],                 // final
    &[XXX,           XXX,  XXX,   XXX,    XXX,              XXX,   XXX,            XXX,    CEV,             CEX,             XXX,   DDF,    XXX,   XXX,     XXX,   XXX,             CPP],                  // friend
    &[XXX,           XXX,  ___,   CPP,    XXX,              ___,   XXX,            XXX,    CEV,             CEX,             CIN,   DDF,    DDF,   CPP,     EXP,   FIN,             CPP,   INL],           // inline
    &[XXX,           XXX,  XXX,   XXX,    XXX,              XXX,   XXX,            XXX,    XXX,             XXX,             XXX,   XXX,    XXX,   XXX,     XXX,   XXX,             XXX,   XXX,   CPP],    // mutable
    &[XXX,           XXX,  NOE,   NOE,    XXX,              NOE,   XXX,            NOE,    both(CEV, NOE),  both(CEX, NOE),  XXX,   NOE,    NOE,   NOE,     EXP,   NOE,             NOE,   NOE,   NOE,     NOE],                    // noexcept
    &[XXX,           XXX,  XXX,   XXX,    XXX,              XXX,   XXX,            XXX,    XXX,             both(CEX, OVR),  XXX,   XXX,    XXX,   XXX,     XXX,   both(FIN, OVR),  XXX,   OVR,   XXX,     both(NOE, OVR), OVR],    // override
    &[XXX,           XXX,  CPP,   CPP,    XXX,              CPP,   XXX,            CPP,    CEV,             CEX,             XXX,   DDF,    DDF,   CPP,     XXX,   FIN,             XXX,   CPP,   THR,     XXX,            OVR,  CPP],         // throw
    &[XXX,           XXX,  XXX,   XXX,    XXX,              XXX,   XXX,            XXX,    XXX,             VIR_CEX,         XXX,   XXX,    XXX,   XXX,     XXX,   FIN,             XXX,   CPP,   XXX,     NOE,            OVR,  CPP,   CPP],  // virtual
    &[XXX,           XXX,  XXX,   XXX,    XXX,              XXX,   XXX,            XXX,    XXX,             VIR_CEX,         XXX,   XXX,    XXX,   XXX,     XXX,   XXX,             XXX,   CPP,   XXX,     NOE,            OVR,  CPP,   CPP,   CPP], // pure
];

#[rustfmt::skip]
pub const OK_BASE: [&[LangIds]; 23] = [
//   voi aut boo cha ch8 c16 c32 wch sho int lon lol sig uns flo dou com ima enu str uni cla typ
    &[VOL],                                                                                         // void
    &[XXX,___],                                                                                     // auto
    &[XXX,XXX,BOO],                                                                                 // bool
    &[XXX,XXX,XXX,___],                                                                             // char
    &[XXX,XXX,XXX,XXX,C08],                                                                         // char8_t
    &[XXX,XXX,XXX,XXX,XXX,C16],                                                                     // char16_t
    &[XXX,XXX,XXX,XXX,XXX,XXX,C32],                                                                 // char32_t
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,WCH],                                                             // wchar_t
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,___],                                                         // short
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,___,___],                                                     // int
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,___,___],                                                 // long
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,LLO,___,LLO],                                             // long long
    &[XXX,XXX,XXX,SIG,XXX,XXX,XXX,XXX,SIG,SIG,SIG,SIG,SIG],                                         // signed
    &[XXX,XXX,XXX,UNC,XXX,XXX,XXX,XXX,UNS,___,UNL,LLO,XXX,___],                                     // unsigned
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,LFL,XXX,XXX,XXX,___],                                 // float
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,LDO,XXX,XXX,XXX,XXX,___],                             // double
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,COM,COM,COM],                         // complex
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,IMA,IMA,XXX,IMA],                     // imaginary
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,ENU],                 // enum
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,ENC,___],             // struct
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,___],         // union
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,ENC,XXX,XXX,CPP],     // class
    &[XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,XXX,___], // typedef
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_line_up() {
        assert_eq!(OK_QUALIFIER.len(), QUALIFIER_INFO.len());
        assert_eq!(OK_STORAGE.len(), STORAGE_INFO.len());
        assert_eq!(OK_BASE.len(), BASE_INFO.len());
        for table in [&OK_QUALIFIER[..], &OK_STORAGE[..], &OK_BASE[..]] {
            for (row, entries) in table.iter().enumerate() {
                assert_eq!(entries.len(), row + 1, "row {row}");
            }
        }
    }

    #[test]
    fn groups_cover_their_masks() {
        let groups = [
            (ATTRIBUTE_INFO, TypeId::MASK_ATTRIBUTE),
            (QUALIFIER_INFO, TypeId::MASK_QUALIFIER),
            (STORAGE_INFO, TypeId::MASK_STORAGE),
            (BASE_INFO, TypeId::MASK_BASE),
        ];
        for (infos, mask) in groups {
            let all = infos.iter().fold(TypeId::empty(), |acc, info| acc | info.id);
            assert_eq!(all, mask);
        }
    }
}
