//! Scoped names, e.g. `std::chrono::seconds`.

use std::cmp::Ordering;
use std::fmt;

use crate::lang::{self, LangIds};
use crate::types::TypeId;

/// The kind of thing a scope of a scoped name refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum ScopeKind {
    /// Not known to be anything more specific.
    #[default]
    Scope,
    Namespace,
    InlineNamespace,
    Class,
    Struct,
    Union,
    Enum,
}

impl ScopeKind {
    /// The keyword(s) used to declare a scope of this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            ScopeKind::Scope => "scope",
            ScopeKind::Namespace => "namespace",
            ScopeKind::InlineNamespace => "inline namespace",
            ScopeKind::Class => "class",
            ScopeKind::Struct => "struct",
            ScopeKind::Union => "union",
            ScopeKind::Enum => "enum",
        }
    }

    pub fn english(self) -> &'static str {
        match self {
            ScopeKind::Struct => "structure",
            ScopeKind::Enum => "enumeration",
            kind => kind.keyword(),
        }
    }

    pub fn from_type(ty: TypeId) -> Option<ScopeKind> {
        let base = ty.base();
        if base.contains(TypeId::ENUM) {
            Some(ScopeKind::Enum)
        } else if base.contains(TypeId::CLASS) {
            Some(ScopeKind::Class)
        } else if base.contains(TypeId::STRUCT) {
            Some(ScopeKind::Struct)
        } else if base.contains(TypeId::UNION) {
            Some(ScopeKind::Union)
        } else {
            None
        }
    }

    pub fn to_type(self) -> TypeId {
        match self {
            ScopeKind::Class => TypeId::CLASS,
            ScopeKind::Struct => TypeId::STRUCT,
            ScopeKind::Union => TypeId::UNION,
            ScopeKind::Enum => TypeId::ENUM,
            ScopeKind::Scope | ScopeKind::Namespace | ScopeKind::InlineNamespace => {
                TypeId::empty()
            }
        }
    }

    pub fn is_namespace(self) -> bool {
        matches!(self, ScopeKind::Namespace | ScopeKind::InlineNamespace)
    }

    /// Can a scope of kind `inner` be nested inside one of this kind?
    ///
    /// Namespaces can only nest inside other namespaces.
    pub fn can_contain(self, inner: ScopeKind) -> bool {
        !inner.is_namespace() || matches!(self, ScopeKind::Scope) || self.is_namespace()
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
}

/// A name made of zero or more scopes, outermost first.
#[derive(Debug, Clone, Default, Eq)]
pub struct Sname {
    scopes: Vec<Scope>,
}

impl Sname {
    pub fn new() -> Sname {
        Sname { scopes: Vec::new() }
    }

    pub fn from_name(name: impl Into<String>) -> Sname {
        let mut sname = Sname::new();
        sname.push(name, ScopeKind::Scope);
        sname
    }

    /// Parse a name like `a::b::c`. Returns `None` if any part is not an
    /// identifier.
    pub fn parse(s: &str) -> Option<Sname> {
        let mut sname = Sname::new();
        for part in s.split("::") {
            let part = part.trim();
            if !is_identifier(part) {
                return None;
            }
            sname.push(part, ScopeKind::Scope);
        }
        Some(sname)
    }

    pub fn push(&mut self, name: impl Into<String>, kind: ScopeKind) {
        self.scopes.push(Scope {
            name: name.into(),
            kind,
        });
    }

    /// Append all of `other`'s scopes to this name.
    pub fn append(&mut self, other: Sname) {
        self.scopes.extend(other.scopes);
    }

    /// Put all of `outer`'s scopes in front of this name's.
    pub fn prepend(&mut self, outer: &Sname) {
        self.scopes.splice(0..0, outer.scopes.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub fn count(&self) -> usize {
        self.scopes.len()
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(|scope| scope.name.as_str())
    }

    /// The innermost name, e.g. `c` in `a::b::c`.
    pub fn local_name(&self) -> &str {
        self.scopes.last().map_or("", |scope| scope.name.as_str())
    }

    pub fn local_kind(&self) -> ScopeKind {
        self.scopes.last().map_or(ScopeKind::Scope, |scope| scope.kind)
    }

    pub fn set_local_kind(&mut self, kind: ScopeKind) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.kind = kind;
        }
    }

    /// The kind of the scope enclosing the local name.
    pub fn scope_kind(&self) -> ScopeKind {
        match self.scopes.len() {
            0 | 1 => ScopeKind::Scope,
            len => self.scopes[len - 2].kind,
        }
    }

    pub fn set_scope_kind(&mut self, kind: ScopeKind) {
        if let Some(len) = self.scopes.len().checked_sub(2) {
            self.scopes[len].kind = kind;
        }
    }

    /// Everything but the local name, e.g. `a::b` in `a::b::c`.
    pub fn scope_sname(&self) -> Sname {
        let len = self.scopes.len().saturating_sub(1);
        Sname {
            scopes: self.scopes[..len].to_vec(),
        }
    }

    pub fn scope_name(&self) -> String {
        self.scope_sname().to_string()
    }

    /// Remove and return the local name.
    pub fn pop(&mut self) -> Option<Scope> {
        self.scopes.pop()
    }

    /// Is this a constructor's name, i.e. `S::S`?
    pub fn is_ctor(&self) -> bool {
        let len = self.scopes.len();
        len >= 2 && self.scopes[len - 1].name == self.scopes[len - 2].name
    }

    /// Is any scope an inline namespace?
    pub fn has_inline_namespace(&self) -> bool {
        self.scopes
            .iter()
            .any(|scope| scope.kind == ScopeKind::InlineNamespace)
    }

    /// Set the kind of every scope whose kind is not known to `kind`.
    pub fn fill_scope_kinds(&mut self, kind: ScopeKind) {
        let len = self.scopes.len().saturating_sub(1);
        for scope in &mut self.scopes[..len] {
            if scope.kind == ScopeKind::Scope {
                scope.kind = kind;
            }
        }
    }

    /// The name in pseudo-English, e.g. `c of class b of namespace a`.
    pub fn english(&self) -> String {
        let mut english = self.local_name().to_owned();
        for scope in self.scopes.iter().rev().skip(1) {
            english.push_str(" of ");
            english.push_str(scope.kind.english());
            english.push(' ');
            english.push_str(&scope.name);
        }
        english
    }

    /// The languages in which any part of this name is reserved.
    pub fn reserved_in(&self) -> LangIds {
        self.names()
            .fold(LangIds::empty(), |acc, name| acc | lang::reserved_in(name))
    }
}

impl PartialEq for Sname {
    /// Names compare equal regardless of the kinds of their scopes.
    fn eq(&self, other: &Sname) -> bool {
        self.scopes.len() == other.scopes.len() && self.names().eq(other.names())
    }
}

impl PartialOrd for Sname {
    fn partial_cmp(&self, other: &Sname) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sname {
    fn cmp(&self, other: &Sname) -> Ordering {
        self.names().cmp(other.names())
    }
}

impl fmt::Display for Sname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, name) in self.names().enumerate() {
            if index > 0 {
                f.write_str("::")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl From<&str> for Sname {
    fn from(name: &str) -> Sname {
        Sname::parse(name).unwrap_or_else(|| Sname::from_name(name))
    }
}

pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parts() {
        let sname = Sname::parse("std::chrono::seconds").unwrap();
        assert_eq!(sname.to_string(), "std::chrono::seconds");
        assert_eq!(sname.count(), 3);
        assert_eq!(sname.local_name(), "seconds");
        assert_eq!(sname.scope_name(), "std::chrono");
        assert!(Sname::parse("a::1").is_none());
    }

    #[test]
    fn ordering_ignores_kinds() {
        let mut a = Sname::parse("N::C").unwrap();
        a.set_scope_kind(ScopeKind::Namespace);
        let b = Sname::parse("N::C").unwrap();
        assert_eq!(a, b);
        assert!(Sname::from("N") < Sname::from("N::C"));
        assert!(Sname::from("A::Z") < Sname::from("B"));
    }

    #[test]
    fn english() {
        let mut sname = Sname::new();
        sname.push("N", ScopeKind::Namespace);
        sname.push("S", ScopeKind::Struct);
        sname.push("x", ScopeKind::Scope);
        assert_eq!(sname.english(), "x of structure S of namespace N");
    }

    #[test]
    fn constructors() {
        assert!(Sname::from("S::S").is_ctor());
        assert!(!Sname::from("S::T").is_ctor());
        assert!(!Sname::from("S").is_ctor());
    }

    #[test]
    fn scope_nesting() {
        assert!(ScopeKind::Namespace.can_contain(ScopeKind::Class));
        assert!(!ScopeKind::Class.can_contain(ScopeKind::Namespace));
        assert!(ScopeKind::Class.can_contain(ScopeKind::Struct));
    }
}
