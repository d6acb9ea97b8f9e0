//! Pseudo-English declarations, e.g. `pointer to function returning int`.
//!
//! Unlike C/C++ declarations these read left to right, so each phrase simply
//! wraps whatever follows it.

use crate::ast::{ArraySize, Ast, Func, Kind, Member};
use crate::keywords;
use crate::reporting::{Message, SemanticMessage};
use crate::sname::{ScopeKind, Sname};
use crate::source::ByteRange;
use crate::types::TypeId;

use super::lexer::Token;
use super::Parser;

impl<'a> Parser<'a> {
    /// The word at token `n` with hyphenated words like `non-member` glued
    /// together, and the number of tokens it spans.
    pub(super) fn word_at(&self, n: usize) -> Option<(&'a str, usize)> {
        let is_word = |n| matches!(self.peek_at(n), Some(Token::Name(_) | Token::Number(_)));
        if !is_word(n) {
            return None;
        }
        let first = self.range_at(n);
        let mut last = first;
        let mut len = 1;
        while self.is_at(n + len, Token::Minus)
            && is_word(n + len + 1)
            && self.range_at(n + len).start() == last.end()
            && self.range_at(n + len + 1).start() == self.range_at(n + len).end()
        {
            last = self.range_at(n + len + 1);
            len += 2;
        }
        let word = self.source.get(first.start() as usize..last.end() as usize)?;
        Some((word, len))
    }

    /// Up to `max` words in their canonical spellings, with the number of
    /// tokens each spans.
    fn words(&self, max: usize) -> Vec<(&'a str, usize)> {
        let mut words = Vec::with_capacity(max);
        let mut n = 0;
        while words.len() < max {
            let Some((word, len)) = self.word_at(n) else {
                break;
            };
            words.push((keywords::english_synonym(word), len));
            n += len;
        }
        words
    }

    pub(super) fn peek_word(&self) -> Option<&'a str> {
        self.word_at(0).map(|(word, _)| keywords::english_synonym(word))
    }

    pub(super) fn eat_word(&mut self, word: &str) -> bool {
        match self.word_at(0) {
            Some((next, len)) if keywords::english_synonym(next) == word => {
                self.pos += len;
                true
            }
            _ => false,
        }
    }

    pub(super) fn expect_word(&mut self, word: &str) -> Result<ByteRange, Message> {
        let start = self.range();
        match self.eat_word(word) {
            true => Ok(self.range_from(start)),
            false => Err(self.unexpected(&[&format!("\"{word}\"")])),
        }
    }

    /// A scoped name written either as `a::b::c` or in pseudo-English as
    /// `c of class b of namespace a`.
    pub(super) fn english_sname(&mut self) -> Result<(Sname, ByteRange), Message> {
        let (mut sname, start) = self.sname()?;
        while self.peek_word() == Some("of") && self.is_scope_kind_at(1) {
            self.pos += 1;
            let kind = self.english_scope_kind()?;
            let (mut scope, _) = self.sname()?;
            scope.set_local_kind(kind);
            sname.prepend(&scope);
        }
        Ok((sname, self.range_from(start)))
    }

    fn is_scope_kind_at(&self, n: usize) -> bool {
        matches!(
            self.word_at(n).map(|(word, _)| word),
            Some(
                "class"
                    | "struct"
                    | "structure"
                    | "union"
                    | "enum"
                    | "enumeration"
                    | "namespace"
                    | "scope"
                    | "inline"
            )
        )
    }

    /// A pseudo-English type.
    pub(super) fn english(&mut self) -> Result<Ast, Message> {
        let start = self.range();
        let (ty, member) = self.english_types()?;
        let word = self.peek_word();
        let mut ast = match word {
            Some("array" | "variable" | "variable-length") => self.english_array(ty, start)?,
            Some("pointer") => self.english_pointer(start)?,
            Some("reference" | "lvalue" | "rvalue") => self.english_reference(start)?,
            Some("function") => {
                self.pos += 1;
                let func = self.english_func(member)?;
                Ast::new(Kind::Function(func), self.range_from(start))
            }
            Some("operator") => self.english_operator(member, start)?,
            Some("block") => {
                self.pos += 1;
                let func = self.english_func(Member::Unspecified)?;
                Ast::new(Kind::Block(func), self.range_from(start))
            }
            Some("constructor") => {
                self.pos += 1;
                let params = self.english_paren_params()?;
                let func = Func {
                    params,
                    ..Func::default()
                };
                Ast::new(Kind::Constructor(func), self.range_from(start))
            }
            Some("destructor") => {
                self.pos += 1;
                let params = self.english_paren_params()?;
                let func = Func {
                    params,
                    ..Func::default()
                };
                Ast::new(Kind::Destructor(func), self.range_from(start))
            }
            Some("user-defined") => self.english_user_defined(start)?,
            _ => {
                if member != Member::Unspecified {
                    return Err(self.unexpected(&["\"function\"", "\"operator\""]));
                }
                return self.english_type(ty, start);
            }
        };

        if !ty.base().is_empty() {
            return Err(SemanticMessage::error(
                start,
                format!("\"{}\" can not apply to {}", ty.base().name_error(self.lang), ast.kind_name(self.lang)),
            )
            .into());
        }
        if !matches!(ast.kind, Kind::Array { .. }) {
            ast.ty |= ty;
        }
        Ok(ast)
    }

    /// Storage classes, qualifiers, attributes and base types in any order,
    /// and whether `member` or `non-member` was among them.
    fn english_types(&mut self) -> Result<(TypeId, Member), Message> {
        let mut ty = TypeId::empty();
        let mut member = Member::Unspecified;
        loop {
            let range = self.range();
            let words = self.words(4);
            let phrase = words.iter().map(|(word, _)| *word).collect::<Vec<_>>();
            let (new, count) = match phrase.as_slice() {
                ["member", ..] => {
                    member = Member::Member;
                    (TypeId::empty(), 1)
                }
                ["non-member", ..] => {
                    member = Member::NonMember;
                    (TypeId::empty(), 1)
                }
                ["non-empty", ..] => (TypeId::NON_EMPTY_ARRAY, 1),
                // `reference member function`, but `reference to int`.
                ["lvalue", "reference", next, ..] if *next != "to" => (TypeId::REFERENCE, 2),
                ["reference", next, ..] if *next != "to" => (TypeId::REFERENCE, 1),
                ["rvalue", "reference", next, ..] if *next != "to" => (TypeId::RVALUE_REFERENCE, 2),
                // `external "C" linkage`
                ["external" | "extern", ..] if self.is_at(words[0].1, Token::StringLiteral("C")) => {
                    self.pos += words[0].1 + 1;
                    self.eat_word("linkage");
                    self.add_type(&mut ty, TypeId::EXTERN_C, self.range_from(range))?;
                    continue;
                }
                _ => match keywords::find_english_type(&phrase, self.lang) {
                    Some((new, _)) if new.intersects(TypeId::ANY_ECSU) => break,
                    Some(found) => found,
                    None => break,
                },
            };
            self.pos += words[..count].iter().map(|(_, len)| len).sum::<usize>();
            self.add_type(&mut ty, new, self.range_from(range))?;
        }
        Ok((ty, member))
    }

    /// A built-in type, type name, or `enum`, `class`, `struct` or `union`.
    fn english_type(&mut self, ty: TypeId, start: ByteRange) -> Result<Ast, Message> {
        let ecsu = self
            .peek_word()
            .and_then(|word| keywords::find_english_type(&[word], self.lang))
            .map(|(ecsu, _)| ecsu)
            .filter(|ecsu| ecsu.intersects(TypeId::ANY_ECSU));
        if let Some(ecsu) = ecsu {
            self.pos += self.word_at(0).map_or(1, |(_, len)| len);
            let mut ecsu = ecsu;
            if ecsu == TypeId::ENUM {
                if self.eat_word("class") {
                    ecsu |= TypeId::CLASS;
                } else if self.eat_word("struct") || self.eat_word("structure") {
                    ecsu |= TypeId::STRUCT;
                }
            }
            let (mut ecsu_sname, _) = self.english_sname()?;
            if let Some(kind) = ScopeKind::from_type(ecsu) {
                ecsu_sname.set_local_kind(kind);
            }
            let of = match self.eat_word("of") {
                true => {
                    self.expect_word("type")?;
                    Some(Box::new(self.english()?))
                }
                false => None,
            };
            let mut ty = ty;
            self.add_type(&mut ty, ecsu, self.range_from(start))?;
            return Ok(Ast::new(Kind::Ecsu { of, ecsu_sname }, self.range_from(start)).with_type(ty));
        }

        if ty.base().is_empty() {
            if let Some(Token::Name(_)) = self.peek() {
                let (sname, range) = self.english_sname()?;
                let Some(typedef) = self.find_type(&sname) else {
                    return Err(self.unknown_type(&sname.to_string(), range));
                };
                let mut ty = ty;
                self.add_type(&mut ty, TypeId::TYPEDEF_TYPE, range)?;
                return Ok(Ast::new(Kind::Typedef(typedef), self.range_from(start)).with_type(ty));
            }
            if ty.is_empty() {
                return Err(self.unexpected(&["type"]));
            }
        }
        Ok(Ast::builtin(ty, self.range_from(start)))
    }

    /// `array [N|*] of T`, `variable length array of T`
    fn english_array(&mut self, ty: TypeId, start: ByteRange) -> Result<Ast, Message> {
        let vla = self.eat_word("variable-length") || self.eat_word("variable");
        if vla {
            self.eat_word("length");
        }
        self.expect_word("array")?;
        let size = match self.peek() {
            _ if vla => ArraySize::Vla,
            Some(Token::Number(_)) => ArraySize::Int(self.number()?.0),
            Some(Token::Star) => {
                self.pos += 1;
                ArraySize::Vla
            }
            _ => ArraySize::None,
        };
        self.expect_word("of")?;
        let of = self.english()?;
        let qualifiers = ty & TypeId::MASK_QUALIFIER;
        let kind = Kind::Array {
            of: Box::new(of),
            size,
            qualifiers,
        };
        Ok(Ast::new(kind, self.range_from(start)).with_type(ty - qualifiers))
    }

    /// `pointer to T`, `pointer to member of class C T`
    fn english_pointer(&mut self, start: ByteRange) -> Result<Ast, Message> {
        self.expect_word("pointer")?;
        self.expect_word("to")?;
        if !self.eat_word("member") {
            let to = self.english()?;
            return Ok(Ast::new(Kind::Pointer(Box::new(to)), self.range_from(start)));
        }
        self.expect_word("of")?;
        let kind = self.english_scope_kind()?;
        let (mut class, _) = self.english_sname()?;
        class.set_local_kind(kind);
        let of = self.english()?;
        let kind = Kind::PointerToMember {
            of: Box::new(of),
            class,
        };
        Ok(Ast::new(kind, self.range_from(start)))
    }

    /// `class`, `struct`, `union` or `namespace`, as in `of class C`.
    pub(super) fn english_scope_kind(&mut self) -> Result<ScopeKind, Message> {
        let kind = match self.peek_word() {
            Some("class") => ScopeKind::Class,
            Some("struct" | "structure") => ScopeKind::Struct,
            Some("union") => ScopeKind::Union,
            Some("enum" | "enumeration") => ScopeKind::Enum,
            Some("namespace") => ScopeKind::Namespace,
            Some("inline") if self.word_at(1).map(|(word, _)| word) == Some("namespace") => {
                self.pos += 1;
                ScopeKind::InlineNamespace
            }
            Some("scope") => ScopeKind::Scope,
            _ => return Err(self.unexpected(&["\"class\"", "\"struct\"", "\"union\"", "\"namespace\""])),
        };
        self.pos += self.word_at(0).map_or(1, |(_, len)| len);
        Ok(kind)
    }

    /// `[lvalue] reference to T`, `rvalue reference to T`
    fn english_reference(&mut self, start: ByteRange) -> Result<Ast, Message> {
        let rvalue = self.eat_word("rvalue");
        if !rvalue {
            self.eat_word("lvalue");
        }
        self.expect_word("reference")?;
        self.expect_word("to")?;
        let to = Box::new(self.english()?);
        let kind = match rvalue {
            true => Kind::RvalueReference(to),
            false => Kind::Reference(to),
        };
        Ok(Ast::new(kind, self.range_from(start)))
    }

    /// `operator [OP] [(params)] returning T`, after any `member` or
    /// `non-member`.
    fn english_operator(&mut self, member: Member, start: ByteRange) -> Result<Ast, Message> {
        self.expect_word("operator")?;
        let oper = match self.oper_id().or(self.oper) {
            Some(oper) => oper,
            None => return Err(self.unexpected(&["operator"])),
        };
        let func = self.english_func(member)?;
        Ok(Ast::new(Kind::Operator { func, oper }, self.range_from(start)))
    }

    /// `user-defined conversion [operator] [of class C] returning T`,
    /// `user-defined literal [(params)] returning T`
    fn english_user_defined(&mut self, start: ByteRange) -> Result<Ast, Message> {
        self.expect_word("user-defined")?;
        if self.eat_word("literal") {
            let func = self.english_func(Member::Unspecified)?;
            return Ok(Ast::new(Kind::UserDefLiteral(func), self.range_from(start)));
        }
        self.expect_word("conversion")?;
        self.eat_word("operator");
        let mut sname = Sname::new();
        if self.eat_word("of") {
            let kind = self.english_scope_kind()?;
            let (scope, _) = self.english_sname()?;
            sname = scope;
            sname.set_local_kind(kind);
        }
        self.expect_word("returning")?;
        let to = self.english()?;
        let ast = Ast::new(Kind::UserDefConversion(Box::new(to)), self.range_from(start));
        Ok(ast.with_name(sname))
    }

    /// `[(params)] returning T`
    fn english_func(&mut self, member: Member) -> Result<Func, Message> {
        let params = self.english_paren_params()?;
        self.expect_word("returning")?;
        let ret = self.english()?;
        Ok(Func {
            params,
            ret: Some(Box::new(ret)),
            member,
        })
    }

    fn english_paren_params(&mut self) -> Result<Vec<Ast>, Message> {
        if !self.eat(Token::OpenParen) {
            return Ok(Vec::new());
        }
        let params = self.english_params()?;
        self.expect(Token::CloseParen)?;
        Ok(params)
    }

    /// `NAME as T`, `T`, a bare K&R C `NAME`, or `...`.
    fn english_params(&mut self) -> Result<Vec<Ast>, Message> {
        let mut params = Vec::new();
        if self.is(Token::CloseParen) {
            return Ok(params);
        }
        loop {
            let start = self.range();
            let param = if self.eat(Token::Ellipsis) || self.eat_word("variadic") {
                Ast::new(Kind::Variadic, start)
            } else if self.peek_name().is_some() && self.is_at(1, Token::Name("as")) {
                let (name, _) = self.expect_name()?;
                self.pos += 1;
                self.english()?.with_name(Sname::from_name(name))
            } else if self.is_english_knr_name() {
                let (sname, range) = self.sname()?;
                Ast::new(Kind::Name, range).with_name(sname)
            } else {
                self.english()?
            };
            params.push(param);
            if !self.eat(Token::Comma) {
                break;
            }
        }
        Ok(params)
    }

    fn is_english_knr_name(&self) -> bool {
        let Some(name) = self.peek_name() else {
            return false;
        };
        matches!(self.peek_at(1), Some(Token::Comma | Token::CloseParen))
            && keywords::find_english_type(&[name], self.lang).is_none()
            && self.find_type(&Sname::from_name(name)).is_none()
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ArraySize, Ast, Kind, Member};
    use crate::lang::Lang;
    use crate::parse::english_decl;
    use crate::reporting::{Message, ParseMessage};
    use crate::typedefs::Typedefs;
    use crate::types::TypeId;

    fn parse(source: &str, lang: Lang) -> Ast {
        let typedefs = Typedefs::with_predefined();
        english_decl(source, lang, &typedefs).unwrap()
    }

    #[test]
    fn array_of_pointer() {
        let ast = parse("array 10 of pointer to const int", Lang::C_17);
        let Kind::Array { of, size, .. } = &ast.kind else { panic!("{ast:?}") };
        assert_eq!(*size, ArraySize::Int(10));
        let Kind::Pointer(to) = &of.kind else { panic!("{of:?}") };
        assert_eq!(to.ty, TypeId::CONST | TypeId::INT);
    }

    #[test]
    fn functions_and_parameters() {
        let ast = parse("pointer to function (x as char, double, ...) returning int", Lang::C_17);
        let Kind::Pointer(func) = &ast.kind else { panic!("{ast:?}") };
        let params = func.params();
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].sname.to_string(), "x");
        assert!(matches!(params[2].kind, Kind::Variadic));
    }

    #[test]
    fn synonyms_and_hyphens() {
        let ast = parse("ptr to const non-member func returning int", Lang::CPP_17);
        let Kind::Pointer(func) = &ast.kind else { panic!("{ast:?}") };
        assert_eq!(func.func().unwrap().member, Member::NonMember);
        assert!(func.ty.contains(TypeId::CONST));
    }

    #[test]
    fn references_and_qualified_functions() {
        let ast = parse("rvalue reference to int", Lang::CPP_11);
        assert!(matches!(ast.kind, Kind::RvalueReference(_)));
        let ast = parse("const reference member function returning void", Lang::CPP_11);
        assert!(matches!(ast.kind, Kind::Function(_)));
        assert_eq!(ast.ty, TypeId::CONST | TypeId::REFERENCE);
    }

    #[test]
    fn multi_word_types() {
        let ast = parse("unsigned long long", Lang::C_17);
        assert_eq!(ast.ty, TypeId::UNSIGNED | TypeId::LONG | TypeId::LONG_LONG);
        let ast = parse("wide character", Lang::C_17);
        assert_eq!(ast.ty, TypeId::WCHAR_T);
        let ast = parse("_Bool", Lang::C_89);
        assert_eq!(ast.ty, TypeId::BOOL);
    }

    #[test]
    fn ecsu_and_type_names() {
        let ast = parse("enum class E of type int", Lang::CPP_11);
        assert_eq!(ast.ty, TypeId::ENUM | TypeId::CLASS);
        let Kind::Ecsu { of, ecsu_sname } = &ast.kind else { panic!("{ast:?}") };
        assert_eq!(ecsu_sname.to_string(), "E");
        assert!(of.is_some());

        let ast = parse("pointer to size_t", Lang::C_17);
        let Kind::Pointer(to) = &ast.kind else { panic!("{ast:?}") };
        assert!(to.is_size_t());
    }

    #[test]
    fn pointer_to_member() {
        let ast = parse("pointer to member of class C int", Lang::CPP_17);
        let Kind::PointerToMember { class, .. } = &ast.kind else { panic!("{ast:?}") };
        assert_eq!(class.to_string(), "C");
    }

    #[test]
    fn special_members() {
        let ast = parse("constructor (int)", Lang::CPP_17);
        assert!(matches!(ast.kind, Kind::Constructor(_)));
        let ast = parse("virtual destructor", Lang::CPP_17);
        assert!(matches!(ast.kind, Kind::Destructor(_)));
        assert_eq!(ast.ty, TypeId::VIRTUAL);
        let ast = parse("user-defined conversion operator of class C returning int", Lang::CPP_17);
        assert!(matches!(ast.kind, Kind::UserDefConversion(_)));
        assert_eq!(ast.sname.to_string(), "C");
        let ast = parse("member operator += (int) returning reference to int", Lang::CPP_17);
        assert!(ast.oper().is_some());
    }

    #[test]
    fn unknown_type_names() {
        let typedefs = Typedefs::with_predefined();
        let error = english_decl("pointer to sizet", Lang::C_17, &typedefs).unwrap_err();
        let Message::Parse(ParseMessage::Unknown { suggestions, .. }) = error else {
            panic!("{error:?}")
        };
        assert!(suggestions.iter().any(|suggestion| suggestion == "size_t"));
    }

    #[test]
    fn variable_length_arrays() {
        let ast = parse("variable length array of int", Lang::C_99);
        assert!(matches!(ast.kind, Kind::Array { size: ArraySize::Vla, .. }));
        let ast = parse("const non-empty array 4 of char", Lang::C_99);
        let Kind::Array { qualifiers, .. } = ast.kind else { panic!() };
        assert_eq!(qualifiers, TypeId::CONST | TypeId::NON_EMPTY_ARRAY);
    }
}
