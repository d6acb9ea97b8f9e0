//! C/C++ declarations.
//!
//! A declaration is parsed as its specifiers (e.g. `static const int`)
//! followed by one or more declarators (e.g. `*p[4]`). Each declarator is
//! built around a placeholder that is then replaced by the specifiers.

use crate::ast::{self, util, Align, ArraySize, Ast, Func, Kind};
use crate::keywords::{Context, KeywordKind};
use crate::lang::feature;
use crate::operators::OperId;
use crate::reporting::{Message, SemanticMessage};
use crate::sname::{ScopeKind, Sname};
use crate::source::ByteRange;
use crate::types::TypeId;

use super::lexer::Token;
use super::Parser;

/// The type a declaration's declarators apply to.
#[derive(Debug, Clone)]
pub(super) struct Specifiers {
    pub ast: Ast,
    /// A type name or an `enum`, `class`, `struct` or `union` was given.
    pub has_name: bool,
}

impl Specifiers {
    fn has_type(&self) -> bool {
        self.has_name || !self.ast.ty.base().is_empty()
    }
}

/// A declarator built around a placeholder, and the name it declares.
#[derive(Debug)]
pub(super) struct Declarator {
    ast: Ast,
    sname: Sname,
}

/// Declarator names that make the declaration something other than a
/// plain function.
enum Special {
    None,
    Destructor,
    Operator(OperId),
    Conversion(Ast),
    Literal,
}

/// Returns `true` if `ast` still has a placeholder for the specifiers.
fn has_placeholder(ast: &Ast) -> bool {
    matches!(ast.leaf().kind, Kind::Placeholder)
}

impl<'a> Parser<'a> {
    /// Declarations sharing specifiers, e.g. `int x, *y;`.
    pub(super) fn decls(&mut self) -> Result<Vec<Ast>, Message> {
        let spec = self.specifiers()?;
        let mut asts = Vec::new();
        loop {
            let decl = self.declarator()?;
            let mut ast = self.assemble(decl, &spec)?;
            if self.eat(Token::Colon) {
                let (width, range) = self.number()?;
                ast.bit_width = u32::try_from(width)
                    .ok()
                    .filter(|width| *width > 0)
                    .ok_or_else(|| SemanticMessage::error(range, "invalid bit-field width"))?;
            }
            asts.push(ast);
            if !self.eat(Token::Comma) {
                break;
            }
        }
        self.eat(Token::Semicolon);
        Ok(asts)
    }

    /// A type without a name, e.g. `const char *`.
    pub(super) fn type_name(&mut self) -> Result<Ast, Message> {
        let spec = self.specifiers()?;
        let decl = self.declarator()?;
        if !decl.sname.is_empty() {
            return Err(SemanticMessage::error(
                self.prev_range(),
                format!("\"{}\": type name expected", decl.sname),
            )
            .into());
        }
        self.assemble(decl, &spec)
    }

    /// Put a declarator and its specifiers together.
    fn assemble(&mut self, decl: Declarator, spec: &Specifiers) -> Result<Ast, Message> {
        let Declarator { ast: outer, sname } = decl;
        let mut outer = merge_blocks(outer)?;

        if !spec.has_type() && self.lang.is_cpp() && !sname.is_empty() {
            outer = into_constructor(outer);
        }

        let mut ast = if has_placeholder(&outer) {
            let mut ast = ast::join(outer, spec.ast.clone());
            util::hoist_storage(&mut ast);
            ast
        } else {
            let trailing = !matches!(outer.kind, Kind::Constructor(_) | Kind::Destructor(_) | Kind::UserDefConversion(_));
            if spec.has_name || (spec.has_type() && !(trailing && spec.ast.ty.base() == TypeId::AUTO)) {
                let message = match trailing {
                    true => "function with trailing return type must only specify \"auto\"".to_owned(),
                    false => format!("{} can not have a return type", outer.kind_name(self.lang)),
                };
                return Err(SemanticMessage::error(spec.ast.range, message).into());
            }
            outer.ty |= spec.ast.ty - TypeId::MASK_BASE;
            if !matches!(spec.ast.align, Align::None) {
                outer.align = spec.ast.align.clone();
            }
            outer
        };
        ast.sname = sname;
        ast.range = spec.ast.range.merge(self.prev_range());
        tracing::trace!(kind = ast.kind_name(self.lang), name = %ast.sname, "assembled declaration");
        Ok(ast)
    }

    // Specifiers.

    pub(super) fn specifiers(&mut self) -> Result<Specifiers, Message> {
        let start = self.range();
        let mut ast = Ast::new(Kind::Builtin, start);
        let mut has_name = false;

        loop {
            let range = self.range();
            match self.peek() {
                Some(Token::OpenBracket) if self.is_at(1, Token::OpenBracket) => {
                    let attributes = self.attribute_list()?;
                    self.add_type(&mut ast.ty, attributes, range)?;
                }
                Some(Token::Name(name)) => match self.keyword(name, Context::Default) {
                    Some(keyword) => match keyword.kind {
                        KeywordKind::Type => {
                            self.pos += 1;
                            let mut ty = keyword.ty;
                            if ty == TypeId::EXTERN && self.is(Token::StringLiteral("C")) {
                                self.pos += 1;
                                ty = TypeId::EXTERN_C;
                            }
                            if ty.intersects(TypeId::ANY_ECSU) {
                                if has_name {
                                    self.pos -= 1;
                                    return Err(self.unexpected(&[]));
                                }
                                let (ecsu, ecsu_sname) = self.ecsu_name(ty)?;
                                ty = ecsu;
                                ast.kind = Kind::Ecsu { of: None, ecsu_sname };
                                has_name = true;
                            }
                            self.add_type(&mut ast.ty, ty, self.range_from(range))?;
                        }
                        KeywordKind::Alignas => {
                            self.pos += 1;
                            ast.align = self.alignas()?;
                        }
                        KeywordKind::GnuAttribute => {
                            self.pos += 1;
                            self.skip_parens()?;
                            self.warn(self.range_from(range), "\"__attribute__\" not supported (ignoring)");
                        }
                        _ => break,
                    },
                    None => {
                        if has_name || !ast.ty.base().is_empty() || self.is_constructor_name() {
                            break;
                        }
                        let len = self.sname_len_at(0);
                        let sname = self.sname_at(len);
                        let Some(typedef) = self.find_type(&sname) else {
                            if self.peek_name_at(len).is_some() {
                                // Two names in a row: the first must have been meant as a type.
                                return Err(self.unknown_type(&sname.to_string(), self.range().merge(self.range_at(len - 1))));
                            }
                            break;
                        };
                        self.pos += len;
                        ast.kind = Kind::Typedef(typedef);
                        self.add_type(&mut ast.ty, TypeId::TYPEDEF_TYPE, self.range_from(range))?;
                        has_name = true;
                    }
                },
                _ => break,
            }
        }

        ast.range = match self.pos > 0 && self.prev_range().end() > start.start() {
            true => self.range_from(start),
            false => ByteRange::at(start.start()),
        };
        Ok(Specifiers { ast, has_name })
    }

    /// The scoped name of `len` tokens at the current position.
    fn sname_at(&self, len: usize) -> Sname {
        self.sname_at_offset(0, len)
    }

    /// Is the next name a class's name followed by a constructor's
    /// parameters, e.g. `S(int)` or `S::S()`?
    fn is_constructor_name(&self) -> bool {
        if !self.lang.is_cpp() {
            return false;
        }
        let len = self.sname_len_at(0);
        let sname = self.sname_at(len);
        if self.is_at(len, Token::Colon2) && self.is_at(len + 1, Token::Tilde) {
            return true;
        }
        if !self.is_at(len, Token::OpenParen) {
            return false;
        }
        if sname.is_ctor() {
            return true;
        }
        let is_class = self
            .find_type(&sname)
            .map_or(false, |typedef| typedef.ast.is_ecsu_any(TypeId::ANY_CLASS));
        is_class
            && !matches!(
                self.peek_at(len + 1),
                Some(Token::Star | Token::Amper | Token::Amper2 | Token::Circ)
            )
    }

    /// The scoped name after `enum`, `class`, `struct` or `union`, and the
    /// complete type, e.g. `enum class`.
    pub(super) fn ecsu_name(&mut self, ty: TypeId) -> Result<(TypeId, Sname), Message> {
        let mut ty = ty;
        if ty == TypeId::ENUM && self.lang.is_cpp() {
            if self.eat_name("class") {
                ty |= TypeId::CLASS;
            } else if self.eat_name("struct") {
                ty |= TypeId::STRUCT;
            }
        }
        let (mut ecsu_sname, _) = self.sname()?;
        if let Some(kind) = ScopeKind::from_type(ty) {
            ecsu_sname.set_local_kind(kind);
        }
        Ok((ty, ecsu_sname))
    }

    pub(super) fn add_type(&self, ty: &mut TypeId, new: TypeId, range: ByteRange) -> Result<(), Message> {
        ty.add(new)
            .map_err(|error| SemanticMessage::error(range, error.message(self.lang)).into())
    }

    /// `[[nodiscard, deprecated("why")]]`
    fn attribute_list(&mut self) -> Result<TypeId, Message> {
        self.expect(Token::OpenBracket)?;
        self.expect(Token::OpenBracket)?;
        let mut ty = TypeId::empty();
        while !self.is(Token::CloseBracket) {
            let (name, range) = self.expect_name()?;
            let mut name = name.to_owned();
            if self.eat(Token::Colon2) {
                let (local, _) = self.expect_name()?;
                name = format!("{name}::{local}");
            }
            if self.is(Token::OpenParen) {
                self.skip_parens()?;
            }
            match self.keyword(&name, Context::Attribute) {
                Some(keyword) if keyword.ty.intersects(TypeId::MASK_ATTRIBUTE) => {
                    self.add_type(&mut ty, keyword.ty, range)?;
                }
                _ => self.warn(self.range_from(range), format!("\"{name}\": unknown attribute")),
            }
            if !self.eat(Token::Comma) {
                break;
            }
        }
        self.expect(Token::CloseBracket)?;
        self.expect(Token::CloseBracket)?;
        Ok(ty)
    }

    /// `alignas(N)` or `alignas(T)`, after the keyword.
    fn alignas(&mut self) -> Result<Align, Message> {
        self.expect(Token::OpenParen)?;
        let align = match self.peek() {
            Some(Token::Number(_)) => {
                let (bytes, range) = self.number()?;
                let bytes = u32::try_from(bytes)
                    .map_err(|_| SemanticMessage::error(range, "alignment too large"))?;
                Align::Bytes(bytes)
            }
            _ => Align::Type(Box::new(self.type_name()?)),
        };
        self.expect(Token::CloseParen)?;
        Ok(align)
    }

    /// Skip a parenthesized token sequence, e.g. the `((packed))` of
    /// `__attribute__((packed))`.
    fn skip_parens(&mut self) -> Result<(), Message> {
        self.expect(Token::OpenParen)?;
        let mut depth = 1;
        while depth > 0 {
            match self.advance() {
                Some((Token::OpenParen, _)) => depth += 1,
                Some((Token::CloseParen, _)) => depth -= 1,
                Some(_) => {}
                None => return Err(self.unexpected(&["`)`"])),
            }
        }
        Ok(())
    }

    // Declarators.

    /// The next token, reading alternative tokens like `bitand` as the
    /// punctuators they stand for.
    pub(super) fn punct_at(&self, n: usize) -> Option<Token<'a>> {
        match self.peek_at(n) {
            Some(Token::Name(name)) => match self.keyword(name, Context::Default).map(|keyword| keyword.kind) {
                Some(KeywordKind::AltToken(token)) => alt_token(token),
                _ => Some(Token::Name(name)),
            },
            token => token,
        }
    }

    pub(super) fn declarator(&mut self) -> Result<Declarator, Message> {
        let start = self.range();
        let kind = match self.punct_at(0) {
            Some(Token::Star) => {
                self.pos += 1;
                Kind::Pointer(Box::new(Ast::placeholder(start)))
            }
            Some(Token::Amper) => {
                self.pos += 1;
                Kind::Reference(Box::new(Ast::placeholder(start)))
            }
            Some(Token::Amper2) => {
                self.pos += 1;
                Kind::RvalueReference(Box::new(Ast::placeholder(start)))
            }
            Some(Token::Circ) => {
                self.pos += 1;
                Kind::Block(Func {
                    ret: Some(Box::new(Ast::placeholder(start))),
                    ..Func::default()
                })
            }
            Some(Token::Name(_)) if self.is_ptr_to_member() => {
                let (mut class, _) = self.sname()?;
                class.set_local_kind(ScopeKind::Class);
                self.expect(Token::Colon2)?;
                self.expect(Token::Star)?;
                Kind::PointerToMember {
                    of: Box::new(Ast::placeholder(start)),
                    class,
                }
            }
            _ => return self.direct_declarator(),
        };
        let quals = self.qualifiers()?;
        let node = Ast::new(kind, self.range_from(start)).with_type(quals);
        let inner = self.declarator()?;
        Ok(Declarator {
            ast: ast::join(inner.ast, node),
            sname: inner.sname,
        })
    }

    /// `C::*`
    fn is_ptr_to_member(&self) -> bool {
        let len = self.sname_len_at(0);
        len > 0
            && self.peek_name().map_or(false, |name| self.is_identifier(name))
            && self.is_at(len, Token::Colon2)
            && self.is_at(len + 1, Token::Star)
    }

    /// Qualifiers after `*`, e.g. `* const`.
    fn qualifiers(&mut self) -> Result<TypeId, Message> {
        let mut ty = TypeId::empty();
        while let Some(name) = self.peek_name() {
            let Some(keyword) = self.keyword(name, Context::Default) else {
                break;
            };
            if keyword.kind != KeywordKind::Type || !(keyword.ty - TypeId::MASK_QUALIFIER).is_empty() {
                break;
            }
            let range = self.range();
            self.pos += 1;
            self.add_type(&mut ty, keyword.ty, range)?;
        }
        Ok(ty)
    }

    /// Is the `(` next the start of a nested declarator like `(*p)` rather
    /// than of parameters?
    fn is_nested_declarator(&self) -> bool {
        match self.punct_at(1) {
            Some(Token::Star | Token::Amper | Token::Amper2 | Token::Circ | Token::OpenParen | Token::Tilde) => true,
            Some(Token::Name(name)) => {
                let len = self.sname_len_at(1);
                match self.keyword(name, Context::Default) {
                    Some(keyword) => keyword.kind == KeywordKind::Operator,
                    None => self.find_type(&self.sname_at_offset(1, len)).is_none() || self.is_at(1 + len, Token::Colon2),
                }
            }
            _ => false,
        }
    }

    fn sname_at_offset(&self, offset: usize, len: usize) -> Sname {
        let mut sname = Sname::new();
        for n in (offset..offset + len).step_by(2) {
            if let Some(name) = self.peek_name_at(n) {
                sname.push(name, ScopeKind::Scope);
            }
        }
        sname
    }

    fn direct_declarator(&mut self) -> Result<Declarator, Message> {
        let start = self.range();
        let (mut decl, special) = match self.punct_at(0) {
            Some(Token::OpenParen) if self.is_nested_declarator() => {
                self.pos += 1;
                let decl = self.declarator()?;
                self.expect(Token::CloseParen)?;
                (decl, Special::None)
            }
            Some(Token::Name(name)) if self.is_identifier(name) || self.is_name("operator") => {
                self.declarator_name()?
            }
            Some(Token::Tilde) => self.declarator_name()?,
            _ => (
                Declarator {
                    ast: Ast::placeholder(start),
                    sname: Sname::new(),
                },
                Special::None,
            ),
        };

        if !matches!(special, Special::None) && !self.is(Token::OpenParen) {
            return Err(self.unexpected(&["`(`"]));
        }

        let mut suffixes = Vec::new();
        loop {
            let start = self.range();
            match self.punct_at(0) {
                Some(Token::OpenBracket) => suffixes.push(self.array_suffix(start)?),
                Some(Token::OpenParen) => suffixes.push(self.func_suffix(start)?),
                _ => break,
            }
        }

        if let Some(first) = suffixes.first_mut() {
            let node = std::mem::replace(first, Ast::placeholder(start));
            *first = self.special_function(node, special)?;
        }

        let chain = suffixes
            .into_iter()
            .rev()
            .fold(Ast::placeholder(start), |inner, suffix| ast::join(suffix, inner));
        decl.ast = ast::join(decl.ast, chain);
        Ok(decl)
    }

    /// The name in a declarator, e.g. `x`, `S::~S`, `operator+`.
    fn declarator_name(&mut self) -> Result<(Declarator, Special), Message> {
        let start = self.range();
        let mut sname = Sname::new();
        let special = loop {
            if self.punct_at(0) == Some(Token::Tilde) {
                self.pos += 1;
                let (name, _) = self.expect_name()?;
                sname.push(name, ScopeKind::Scope);
                break Special::Destructor;
            }
            let (name, range) = self.expect_name()?;
            if name == "operator" && self.lang.is_cpp() {
                break self.operator_name(range)?;
            }
            sname.push(name, ScopeKind::Scope);
            if !(self.is(Token::Colon2) && matches!(self.punct_at(1), Some(Token::Name(_) | Token::Tilde))) {
                break Special::None;
            }
            self.pos += 1;
        };
        if matches!(special, Special::Literal) {
            // The suffix of `operator"" _x` is the name.
            let (suffix, _) = self.expect_name()?;
            sname.push(suffix, ScopeKind::Scope);
        }
        let decl = Declarator {
            ast: Ast::placeholder(self.range_from(start)),
            sname,
        };
        Ok((decl, special))
    }

    /// What follows `operator`.
    fn operator_name(&mut self, range: ByteRange) -> Result<Special, Message> {
        if self.is(Token::StringLiteral("")) {
            self.pos += 1;
            return Ok(Special::Literal);
        }
        match self.oper_id() {
            Some(oper) => Ok(Special::Operator(oper)),
            None if matches!(self.peek(), Some(Token::Name(_))) => {
                Ok(Special::Conversion(self.conversion_type()?))
            }
            None => Err(SemanticMessage::error(range.merge(self.range()), "operator expected").into()),
        }
    }

    /// An overloadable operator's token(s), e.g. `+=`, `()` or `new[]`.
    pub(super) fn oper_id(&mut self) -> Option<OperId> {
        match self.punct_at(0) {
            Some(Token::OpenParen) if self.punct_at(1) == Some(Token::CloseParen) => {
                self.pos += 2;
                Some(OperId::Parens)
            }
            Some(Token::OpenBracket) if self.punct_at(1) == Some(Token::CloseBracket) => {
                self.pos += 2;
                Some(OperId::Brackets)
            }
            Some(Token::Qmark) if self.is_at(1, Token::Colon) => {
                self.pos += 2;
                Some(OperId::QmarkColon)
            }
            Some(Token::Name(name @ ("new" | "delete"))) => {
                self.pos += 1;
                let array = self.is(Token::OpenBracket) && self.is_at(1, Token::CloseBracket);
                if array {
                    self.pos += 2;
                }
                OperId::find(&format!("{name}{}", if array { "[]" } else { "" }))
            }
            Some(Token::Name("co_await")) => {
                self.pos += 1;
                Some(OperId::CoAwait)
            }
            Some(Token::Name(_)) => None,
            Some(token) => {
                let oper = OperId::find(token.punctuator());
                if oper.is_some() {
                    self.pos += 1;
                }
                oper
            }
            None => None,
        }
    }

    /// The type of `operator T()`: specifiers followed by `*`, `&` and `&&`
    /// only.
    fn conversion_type(&mut self) -> Result<Ast, Message> {
        let mut ast = match self.peek_name() {
            // Read a class name here since `S()` would otherwise look like a
            // constructor.
            Some(name) if self.is_identifier(name) => {
                let (sname, range) = self.sname()?;
                let typedef = self
                    .find_type(&sname)
                    .ok_or_else(|| self.unknown_type(&sname.to_string(), range))?;
                Ast::new(Kind::Typedef(typedef), range).with_type(TypeId::TYPEDEF_TYPE)
            }
            _ => {
                let spec = self.specifiers()?;
                if !spec.has_type() {
                    return Err(self.unexpected(&["type"]));
                }
                spec.ast
            }
        };
        loop {
            let start = self.range();
            let kind = match self.punct_at(0) {
                Some(Token::Star) => Kind::Pointer(Box::new(ast)),
                Some(Token::Amper) => Kind::Reference(Box::new(ast)),
                Some(Token::Amper2) => Kind::RvalueReference(Box::new(ast)),
                _ => break Ok(ast),
            };
            self.pos += 1;
            let quals = self.qualifiers()?;
            ast = Ast::new(kind, self.range_from(start)).with_type(quals);
        }
    }

    /// Turn the function suffix after a special name into that kind of
    /// function.
    fn special_function(&mut self, node: Ast, special: Special) -> Result<Ast, Message> {
        let Ast { kind, ty, range, .. } = node;
        let kind = match (kind, special) {
            (kind, Special::None) => kind,
            (Kind::Function(func), Special::Destructor) => Kind::Destructor(Func { ret: None, ..func }),
            (Kind::Function(func), Special::Operator(oper)) => Kind::Operator { func, oper },
            (Kind::Function(func), Special::Literal) => Kind::UserDefLiteral(func),
            (Kind::Function(func), Special::Conversion(to)) => {
                if !func.params.is_empty() {
                    return Err(SemanticMessage::error(
                        range,
                        "user-defined conversion operator can not have parameters",
                    )
                    .into());
                }
                Kind::UserDefConversion(Box::new(to))
            }
            (kind, _) => {
                return Err(SemanticMessage::error(range, format!("{} must be a function", kind.name(self.lang))).into())
            }
        };
        Ok(Ast::new(kind, range).with_type(ty))
    }

    /// `[N]`, `[]`, `[*]`, `[static const N]`
    fn array_suffix(&mut self, start: ByteRange) -> Result<Ast, Message> {
        self.pos += 1;
        let mut qualifiers = TypeId::empty();
        while let Some(name) = self.peek_name() {
            let ty = match self.keyword(name, Context::Default) {
                Some(keyword) if keyword.ty == TypeId::STATIC => TypeId::NON_EMPTY_ARRAY,
                Some(keyword)
                    if keyword.kind == KeywordKind::Type
                        && (keyword.ty - TypeId::MASK_QUALIFIER).is_empty() =>
                {
                    keyword.ty
                }
                _ => break,
            };
            let range = self.range();
            self.pos += 1;
            self.add_type(&mut qualifiers, ty, range)?;
        }
        let size = match self.peek() {
            Some(Token::Number(_)) => ArraySize::Int(self.number()?.0),
            Some(Token::Star) => {
                self.pos += 1;
                ArraySize::Vla
            }
            Some(Token::Name(_)) => {
                self.sname()?;
                ArraySize::Vla
            }
            _ => ArraySize::None,
        };
        if self.punct_at(0) != Some(Token::CloseBracket) {
            return Err(self.unexpected(&["`]`"]));
        }
        self.pos += 1;
        let kind = Kind::Array {
            of: Box::new(Ast::placeholder(start)),
            size,
            qualifiers,
        };
        Ok(Ast::new(kind, self.range_from(start)))
    }

    /// `(params)` and everything that can follow it: qualifiers, exception
    /// specifications, a trailing return type and `= 0`, `= default` or
    /// `= delete`.
    fn func_suffix(&mut self, start: ByteRange) -> Result<Ast, Message> {
        self.expect(Token::OpenParen)?;
        let params = self.params()?;
        self.expect(Token::CloseParen)?;

        let mut ty = TypeId::empty();
        loop {
            let range = self.range();
            let new = match self.punct_at(0) {
                Some(Token::Amper) => TypeId::REFERENCE,
                Some(Token::Amper2) => TypeId::RVALUE_REFERENCE,
                Some(Token::Name(name)) => match self.keyword(name, Context::FuncSuffix) {
                    Some(keyword)
                        if keyword.kind == KeywordKind::Type
                            && keyword.ty.intersects(
                                TypeId::CV
                                    | TypeId::RESTRICT
                                    | TypeId::NOEXCEPT
                                    | TypeId::THROW
                                    | TypeId::FINAL
                                    | TypeId::OVERRIDE,
                            ) =>
                    {
                        keyword.ty
                    }
                    _ => break,
                },
                _ => break,
            };
            self.pos += 1;
            let mut new = new;
            if new.intersects(TypeId::NOEXCEPT | TypeId::THROW) && self.is(Token::OpenParen) {
                let not_throwing = self.is_at(1, Token::CloseParen)
                    || (new == TypeId::NOEXCEPT && self.is_at(1, Token::Name("true")));
                self.skip_parens()?;
                if !not_throwing {
                    new = TypeId::empty();
                }
            }
            self.add_type(&mut ty, new, self.range_from(range))?;
        }

        let ret = match self.eat(Token::Arrow) {
            true => {
                if !self.lang.is_any(feature::TRAILING_RETURN) {
                    return Err(SemanticMessage::error(
                        self.prev_range(),
                        format!("trailing return type not supported{}", crate::lang::which(feature::TRAILING_RETURN, self.lang)),
                    )
                    .into());
                }
                self.type_name()?
            }
            false => Ast::placeholder(start),
        };

        if self.eat(Token::Eq) {
            let range = self.range();
            let new = match self.peek() {
                Some(Token::Number("0")) => TypeId::PURE_VIRTUAL,
                Some(Token::Name("default")) => TypeId::DEFAULT,
                Some(Token::Name("delete")) => TypeId::DELETE,
                _ => return Err(self.unexpected(&["`0`", "`default`", "`delete`"])),
            };
            self.pos += 1;
            self.add_type(&mut ty, new, range)?;
        }

        let func = Func {
            params,
            ret: Some(Box::new(ret)),
            ..Func::default()
        };
        Ok(Ast::new(Kind::Function(func), self.range_from(start)).with_type(ty))
    }

    /// Function parameters, not including the parentheses.
    fn params(&mut self) -> Result<Vec<Ast>, Message> {
        let mut params = Vec::new();
        if self.is(Token::CloseParen) {
            return Ok(params);
        }
        loop {
            let start = self.range();
            if self.eat(Token::Ellipsis) {
                params.push(Ast::new(Kind::Variadic, start));
            } else if self.is_knr_name() {
                let (sname, range) = self.sname()?;
                params.push(Ast::new(Kind::Name, range).with_name(sname));
            } else {
                let spec = self.specifiers()?;
                let decl = self.declarator()?;
                params.push(self.assemble(decl, &spec)?);
            }
            if !self.eat(Token::Comma) {
                break;
            }
        }
        Ok(params)
    }

    /// Is the next parameter just a name, as in K&R C's `f(a, b)`?
    fn is_knr_name(&self) -> bool {
        let Some(name) = self.peek_name() else {
            return false;
        };
        self.is_identifier(name)
            && matches!(self.peek_at(1), Some(Token::Comma | Token::CloseParen))
            && self.find_type(&Sname::from_name(name)).is_none()
    }

    // Scoped declarations.

    /// A `typedef`, `using`, `namespace`, or `enum`, `class`, `struct` or
    /// `union` declaration, returning the type names it declares.
    pub(super) fn scoped_decl(&mut self) -> Result<Vec<Ast>, Message> {
        let keyword = self
            .peek_name()
            .and_then(|name| self.keyword(name, Context::Default));
        match keyword.map(|keyword| (keyword.kind, keyword.ty)) {
            Some((KeywordKind::Namespace, _)) => self.namespace(false),
            Some((KeywordKind::Type, ty)) if ty == TypeId::INLINE && self.peek_name_at(1) == Some("namespace") => {
                self.pos += 1;
                self.namespace(true)
            }
            Some((KeywordKind::Using, _)) => Ok(vec![self.using()?]),
            Some((KeywordKind::Type, ty)) if ty == TypeId::TYPEDEF => self.typedef(),
            Some((KeywordKind::Type, ty)) if ty.intersects(TypeId::ANY_ECSU) => self.ecsu_decl(ty),
            _ => Err(self.unexpected(&["`typedef`", "`using`", "`namespace`", "`class`", "`struct`", "`union`", "`enum`"])),
        }
    }

    /// `typedef int T, *P;`
    pub(super) fn typedef(&mut self) -> Result<Vec<Ast>, Message> {
        let asts = self.decls()?;
        let mut typedefs = Vec::with_capacity(asts.len());
        for mut ast in asts {
            if !ast.ty.contains(TypeId::TYPEDEF) {
                return Err(SemanticMessage::error(ast.range, "\"typedef\" expected").into());
            }
            if ast.sname.is_empty() {
                return Err(SemanticMessage::error(ast.range, "type name expected").into());
            }
            ast.ty -= TypeId::TYPEDEF;
            ast.sname.prepend(&self.scope);
            self.declare_type(&ast);
            typedefs.push(ast);
        }
        Ok(typedefs)
    }

    /// `using T = int;`
    pub(super) fn using(&mut self) -> Result<Ast, Message> {
        let start = self.range();
        self.pos += 1;
        if !self.lang.is_any(feature::USING_DECLARATION) {
            return Err(SemanticMessage::error(
                start,
                format!("\"using\" not supported{}", crate::lang::which(feature::USING_DECLARATION, self.lang)),
            )
            .into());
        }
        let (name, _) = self.expect_name()?;
        self.expect(Token::Eq)?;
        let mut ast = self.type_name()?;
        self.eat(Token::Semicolon);
        ast.sname = Sname::from_name(name);
        ast.sname.prepend(&self.scope);
        ast.range = self.range_from(start);
        self.declare_type(&ast);
        Ok(ast)
    }

    /// `namespace a::b { ... }`, after any `inline`.
    fn namespace(&mut self, inline: bool) -> Result<Vec<Ast>, Message> {
        let start = self.range();
        self.pos += 1;
        let (mut names, range) = self.sname()?;
        if names.count() > 1 && !self.lang.is_any(feature::NESTED_NAMESPACE) {
            return Err(SemanticMessage::error(
                range,
                format!("nested namespace declarations not supported{}", crate::lang::which(feature::NESTED_NAMESPACE, self.lang)),
            )
            .into());
        }
        if inline && !self.lang.is_any(feature::INLINE_NAMESPACE) {
            return Err(SemanticMessage::error(
                start,
                format!("inline namespace not supported{}", crate::lang::which(feature::INLINE_NAMESPACE, self.lang)),
            )
            .into());
        }
        if let Some(scope) = self.scope.scopes().last() {
            if !scope.kind.is_namespace() {
                return Err(SemanticMessage::error(
                    start,
                    format!("namespace can not be nested within {}", scope.kind),
                )
                .into());
            }
        }
        names.fill_scope_kinds(ScopeKind::Namespace);
        names.set_local_kind(match inline {
            true => ScopeKind::InlineNamespace,
            false => ScopeKind::Namespace,
        });
        let asts = self.scoped_block(names)?;
        self.eat(Token::Semicolon);
        Ok(asts)
    }

    /// `{ ... }` with every declaration in it scoped in `names`.
    fn scoped_block(&mut self, names: Sname) -> Result<Vec<Ast>, Message> {
        self.expect(Token::OpenBrace)?;
        let outer = self.scope.clone();
        self.scope.append(names);
        let mut asts = Vec::new();
        let result = loop {
            if self.eat(Token::CloseBrace) {
                break Ok(asts);
            }
            match self.scoped_decl() {
                Ok(decls) => asts.extend(decls),
                Err(error) => break Err(error),
            }
        };
        self.scope = outer;
        result
    }

    /// `class S;`, `struct S { ... };`, `enum class E : int;`
    fn ecsu_decl(&mut self, keyword_ty: TypeId) -> Result<Vec<Ast>, Message> {
        let start = self.range();
        self.pos += 1;
        let (ty, ecsu_sname) = self.ecsu_name(keyword_ty)?;
        if ecsu_sname.count() > 1 {
            return Err(SemanticMessage::error(self.prev_range(), format!("\"{ecsu_sname}\": scoped name not allowed here")).into());
        }

        let mut of = None;
        if self.eat(Token::Colon) {
            match ty.contains(TypeId::ENUM) {
                true => {
                    if !self.lang.is_any(feature::FIXED_TYPE_ENUM) {
                        return Err(SemanticMessage::error(
                            self.prev_range(),
                            format!("enum with underlying type not supported{}", crate::lang::which(feature::FIXED_TYPE_ENUM, self.lang)),
                        )
                        .into());
                    }
                    of = Some(Box::new(self.type_name()?));
                }
                // Base classes are not part of the type.
                false => {
                    while !matches!(self.peek(), None | Some(Token::OpenBrace | Token::Semicolon)) {
                        self.pos += 1;
                    }
                }
            }
        }

        let mut sname = ecsu_sname.clone();
        sname.prepend(&self.scope);
        let ast = Ast::new(
            Kind::Ecsu {
                of,
                ecsu_sname: sname.clone(),
            },
            self.range_from(start),
        )
        .with_type(ty)
        .with_name(sname.clone());
        self.declare_type(&ast);

        let mut asts = vec![ast];
        if self.is(Token::OpenBrace) {
            match ty.contains(TypeId::ENUM) {
                // Enumerators are not types.
                true => self.skip_braces()?,
                false => asts.extend(self.scoped_block(ecsu_sname)?),
            }
        }
        self.eat(Token::Semicolon);
        Ok(asts)
    }

    fn skip_braces(&mut self) -> Result<(), Message> {
        self.expect(Token::OpenBrace)?;
        let mut depth = 1;
        while depth > 0 {
            match self.advance() {
                Some((Token::OpenBrace, _)) => depth += 1,
                Some((Token::CloseBrace, _)) => depth -= 1,
                Some(_) => {}
                None => return Err(self.unexpected(&["`}`"])),
            }
        }
        Ok(())
    }
}

/// The punctuator an alternative token stands for.
fn alt_token(token: &str) -> Option<Token<'static>> {
    Some(match token {
        "&&" => Token::Amper2,
        "&=" => Token::AmperEq,
        "&" => Token::Amper,
        "|" => Token::Pipe,
        "~" => Token::Tilde,
        "!" => Token::Exclam,
        "!=" => Token::ExclamEq,
        "||" => Token::Pipe2,
        "|=" => Token::PipeEq,
        "^" => Token::Circ,
        "^=" => Token::CircEq,
        _ => return None,
    })
}

/// Turn `S(params)` into a constructor.
fn into_constructor(ast: Ast) -> Ast {
    match ast.kind {
        Kind::Function(func) if func.ret.as_deref().map_or(false, |ret| matches!(ret.kind, Kind::Placeholder)) => {
            let func = Func { ret: None, ..func };
            Ast {
                kind: Kind::Constructor(func),
                ..ast
            }
        }
        kind => Ast { kind, ..ast },
    }
}

/// A block declarator `(^b)(params)` is parsed as a block of a function;
/// make the function's parameters and return type the block's own.
fn merge_blocks(mut ast: Ast) -> Result<Ast, Message> {
    if let Kind::Block(block) = &mut ast.kind {
        if let Some(ret) = block.ret.take() {
            let Ast { kind, ty, .. } = *ret;
            let Kind::Function(func) = kind else {
                return Err(SemanticMessage::error(ast.range, "block requires parameters").into());
            };
            block.params = func.params;
            block.ret = func.ret;
            ast.ty |= ty;
        }
    }
    if let Some(child) = ast.child_mut() {
        let old = std::mem::replace(child, Ast::placeholder(ByteRange::default()));
        *child = merge_blocks(old)?;
    }
    Ok(ast)
}

#[cfg(test)]
mod tests {
    use crate::ast::{ArraySize, Kind};
    use crate::lang::Lang;
    use crate::operators::OperId;
    use crate::parse::{gibberish_decls, typedef_decls};
    use crate::typedefs::Typedefs;
    use crate::types::TypeId;

    fn parse(source: &str, lang: Lang) -> Vec<crate::ast::Ast> {
        let mut typedefs = Typedefs::with_predefined();
        if lang.is_cpp() {
            for ast in typedef_decls("struct S;", lang, &typedefs).unwrap() {
                typedefs.add(ast);
            }
        }
        gibberish_decls(source, lang, &typedefs).unwrap()
    }

    fn parse_one(source: &str, lang: Lang) -> crate::ast::Ast {
        parse(source, lang).remove(0)
    }

    #[test]
    fn declarator_names() {
        let typedefs = Typedefs::new();
        let asts = gibberish_decls("int x, *y", Lang::C_17, &typedefs).unwrap();
        let names = asts.iter().map(|ast| ast.sname.to_string()).collect::<Vec<_>>();
        assert_eq!(names, ["x", "y"]);
        let asts = gibberish_decls("unsigned long (*fp)(void)", Lang::C_89, &typedefs).unwrap();
        assert_eq!(asts[0].sname.to_string(), "fp");
    }

    #[test]
    fn pointer_to_function() {
        let ast = parse_one("int (*p)(char, double)", Lang::CPP_23);
        assert_eq!(ast.sname.to_string(), "p");
        let Kind::Pointer(func) = &ast.kind else { panic!("{ast:?}") };
        let Kind::Function(func) = &func.kind else { panic!("{func:?}") };
        assert_eq!(func.params.len(), 2);
        assert_eq!(func.params[1].ty, TypeId::DOUBLE);
        assert_eq!(func.ret.as_ref().unwrap().ty, TypeId::INT);
    }

    #[test]
    fn array_of_pointer() {
        let ast = parse_one("static const int *a[10];", Lang::C_17);
        assert_eq!(ast.ty, TypeId::STATIC);
        let Kind::Array { of, size, .. } = &ast.kind else { panic!("{ast:?}") };
        assert_eq!(*size, ArraySize::Int(10));
        assert!(matches!(of.kind, Kind::Pointer(_)));
        assert_eq!(ast.leaf().ty, TypeId::CONST | TypeId::INT);
    }

    #[test]
    fn several_declarators() {
        let asts = parse("int x, *y, z : 3", Lang::C_17);
        assert_eq!(asts.len(), 3);
        assert!(matches!(asts[1].kind, Kind::Pointer(_)));
        assert_eq!(asts[2].bit_width, 3);
    }

    #[test]
    fn typedef_names() {
        let ast = parse_one("size_t *n", Lang::C_17);
        assert!(matches!(ast.leaf().kind, Kind::Typedef(_)));
        let ast = parse_one("std::size_t n", Lang::CPP_17);
        assert!(ast.leaf().is_size_t());
    }

    #[test]
    fn unknown_type() {
        let typedefs = Typedefs::new();
        let error = gibberish_decls("foo x", Lang::C_17, &typedefs).unwrap_err();
        assert!(format!("{error:?}").contains("foo"));
    }

    #[test]
    fn member_functions() {
        let ast = parse_one("virtual int S::f(int) const = 0", Lang::CPP_17);
        assert_eq!(ast.sname.to_string(), "S::f");
        assert!(ast.ty.contains(TypeId::VIRTUAL | TypeId::PURE_VIRTUAL | TypeId::CONST));
        assert!(matches!(ast.kind, Kind::Function(_)));
    }

    #[test]
    fn operators() {
        let ast = parse_one("bool operator==(const S&, const S&)", Lang::CPP_20);
        assert_eq!(ast.oper(), Some(OperId::Eq2));
        assert_eq!(ast.params().len(), 2);
        assert!(matches!(ast.params()[0].kind, Kind::Reference(_)));

        let ast = parse_one("S& S::operator[](int)", Lang::CPP_20);
        assert_eq!(ast.oper(), Some(OperId::Brackets));
        assert_eq!(ast.sname.to_string(), "S");

        let ast = parse_one("explicit operator bool() const", Lang::CPP_17);
        let Kind::UserDefConversion(to) = &ast.kind else { panic!("{ast:?}") };
        assert_eq!(to.ty, TypeId::BOOL);
        assert!(ast.ty.contains(TypeId::EXPLICIT | TypeId::CONST));

        let ast = parse_one(r#"int operator"" _km(unsigned long long)"#, Lang::CPP_17);
        assert!(matches!(ast.kind, Kind::UserDefLiteral(_)));
        assert_eq!(ast.sname.to_string(), "_km");
    }

    #[test]
    fn constructors_and_destructors() {
        let ast = parse_one("S::S(int)", Lang::CPP_17);
        assert!(matches!(ast.kind, Kind::Constructor(_)));
        let ast = parse_one("virtual S::~S()", Lang::CPP_17);
        assert!(matches!(ast.kind, Kind::Destructor(_)));
        assert_eq!(ast.sname.to_string(), "S::S");
        assert!(ast.ty.contains(TypeId::VIRTUAL));
    }

    #[test]
    fn trailing_return() {
        let ast = parse_one("auto f() -> int", Lang::CPP_11);
        let Kind::Function(func) = &ast.kind else { panic!("{ast:?}") };
        assert_eq!(func.ret.as_ref().unwrap().ty, TypeId::INT);

        let typedefs = Typedefs::new();
        assert!(gibberish_decls("int f() -> int", Lang::CPP_11, &typedefs).is_err());
    }

    #[test]
    fn blocks() {
        let ast = parse_one("void (^b)(int)", Lang::C_17);
        let Kind::Block(func) = &ast.kind else { panic!("{ast:?}") };
        assert_eq!(func.params.len(), 1);
        assert_eq!(func.ret.as_ref().unwrap().ty, TypeId::VOID);
    }

    #[test]
    fn knr_parameters() {
        let ast = parse_one("int f(a, b)", Lang::C_KNR);
        assert!(ast.params().iter().all(|param| matches!(param.kind, Kind::Name)));
    }

    #[test]
    fn pointer_to_member() {
        let ast = parse_one("int C::*p", Lang::CPP_17);
        let Kind::PointerToMember { class, .. } = &ast.kind else { panic!("{ast:?}") };
        assert_eq!(class.to_string(), "C");
    }

    #[test]
    fn alternative_tokens_and_graphs() {
        let ast = parse_one("int bitand r", Lang::CPP_17);
        assert!(matches!(ast.kind, Kind::Reference(_)));
        let ast = parse_one("int a<:4:>", Lang::C_17);
        assert!(matches!(ast.kind, Kind::Array { size: ArraySize::Int(4), .. }));
    }

    #[test]
    fn attributes() {
        let typedefs = Typedefs::new();
        let ast = gibberish_decls("[[nodiscard]] int f(void)", Lang::CPP_17, &typedefs).unwrap().remove(0);
        assert!(ast.ty.contains(TypeId::NODISCARD));
        assert_eq!(ast.leaf().ty, TypeId::INT);
    }

    #[test]
    fn enum_class() {
        let ast = parse_one("enum class E e", Lang::CPP_11);
        assert!(ast.ty.contains(TypeId::ENUM | TypeId::CLASS));
    }
}
