//! The registry of type names, both predefined and declared by the user.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::ast::{util, Ast};
use crate::lang::Lang;
use crate::sname::Sname;

mod corpus;

/// A registered type name.
#[derive(Debug)]
pub struct Typedef {
    /// The type, named by the type name.
    pub ast: Ast,
    /// Declared by the user rather than predefined.
    pub user_defined: bool,
}

impl Typedef {
    pub fn sname(&self) -> &Sname {
        &self.ast.sname
    }
}

/// The result of [`Typedefs::add`].
#[derive(Debug)]
pub enum Added {
    Added,
    /// The name was already registered with an equivalent type.
    Equivalent,
    /// The name was already registered with a different type.
    Conflict(Rc<Typedef>),
}

/// Which typedefs to visit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Which {
    All,
    Predefined,
    #[default]
    User,
}

#[derive(Debug, Default)]
pub struct Typedefs {
    map: BTreeMap<Sname, Rc<Typedef>>,
    /// Whether typedefs added from now on are declared by the user.
    user_defined: bool,
    warn_on_equivalent: bool,
}

impl Typedefs {
    /// An empty registry. Everything added to it is considered user-defined.
    pub fn new() -> Typedefs {
        Typedefs {
            map: BTreeMap::new(),
            user_defined: true,
            warn_on_equivalent: false,
        }
    }

    /// A registry preloaded with standard and platform types.
    pub fn with_predefined() -> Typedefs {
        let mut typedefs = Typedefs {
            user_defined: false,
            ..Typedefs::new()
        };
        corpus::load(&mut typedefs);
        typedefs.user_defined = true;
        typedefs
    }

    /// Should redefining a type name with an equivalent type be reported?
    pub fn warn_on_equivalent(&self) -> bool {
        self.warn_on_equivalent
    }

    pub fn set_warn_on_equivalent(&mut self, warn: bool) {
        self.warn_on_equivalent = warn;
    }

    /// Register `ast` under its name.
    pub fn add(&mut self, ast: Ast) -> Added {
        if let Some(old) = self.map.get(&ast.sname) {
            return match util::equiv(&old.ast, &ast) {
                true => Added::Equivalent,
                false => Added::Conflict(old.clone()),
            };
        }
        tracing::trace!(name = %ast.sname, user_defined = self.user_defined, "adding typedef");
        let typedef = Rc::new(Typedef {
            ast,
            user_defined: self.user_defined,
        });
        self.map.insert(typedef.ast.sname.clone(), typedef);
        Added::Added
    }

    pub fn find(&self, sname: &Sname) -> Option<&Rc<Typedef>> {
        self.map.get(sname)
    }

    /// Find a type name, also looking in the scopes enclosing `scope`. For
    /// example within `std::chrono`, `seconds` finds `std::chrono::seconds`.
    pub fn find_in_scope(&self, sname: &Sname, scope: &Sname) -> Option<&Rc<Typedef>> {
        let mut scope = scope.clone();
        loop {
            let mut name = sname.clone();
            name.prepend(&scope);
            if let Some(typedef) = self.find(&name) {
                return Some(typedef);
            }
            if scope.pop().is_none() {
                return None;
            }
        }
    }

    /// The typedefs in name order.
    pub fn iter(&self, which: Which) -> impl Iterator<Item = &Rc<Typedef>> {
        self.map.values().filter(move |typedef| match which {
            Which::All => true,
            Which::Predefined => !typedef.user_defined,
            Which::User => typedef.user_defined,
        })
    }

    /// Every type name as written, e.g. `std::size_t`.
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        self.map.keys().map(Sname::to_string)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The language a predefined typedef must be shown in: C++ for names in
    /// a scope, C otherwise.
    pub fn lang_for(typedef: &Typedef) -> Lang {
        match typedef.ast.sname.count() > 1 {
            true => Lang::CPP_NEW,
            false => Lang::C_NEW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ByteRange;
    use crate::types::TypeId;

    fn typedef(name: &str, ty: TypeId) -> Ast {
        Ast::builtin(ty, ByteRange::default()).with_name(Sname::from(name))
    }

    #[test]
    fn redefinition() {
        let mut typedefs = Typedefs::new();
        assert!(matches!(typedefs.add(typedef("T", TypeId::INT)), Added::Added));
        assert!(matches!(typedefs.add(typedef("T", TypeId::SIGNED)), Added::Equivalent));
        assert!(matches!(typedefs.add(typedef("T", TypeId::DOUBLE)), Added::Conflict(_)));
        assert_eq!(typedefs.find(&Sname::from("T")).unwrap().ast.ty, TypeId::INT);
        assert!(typedefs.find(&Sname::from("T")).unwrap().user_defined);
    }

    #[test]
    fn sorted_by_name() {
        let mut typedefs = Typedefs::new();
        for name in ["b", "a::z", "a", "c"] {
            typedefs.add(typedef(name, TypeId::INT));
        }
        let names = typedefs.names().collect::<Vec<_>>();
        assert_eq!(names, ["a", "a::z", "b", "c"]);
    }

    #[test]
    fn scoped_lookup() {
        let mut typedefs = Typedefs::new();
        typedefs.add(typedef("std::chrono::seconds", TypeId::LONG));
        typedefs.add(typedef("T", TypeId::INT));
        let scope = Sname::from("std::chrono");
        assert!(typedefs.find_in_scope(&Sname::from("seconds"), &scope).is_some());
        assert!(typedefs.find_in_scope(&Sname::from("T"), &scope).is_some());
        assert!(typedefs.find_in_scope(&Sname::from("minutes"), &scope).is_none());
    }

    #[test]
    fn predefined() {
        let typedefs = Typedefs::with_predefined();
        for name in ["size_t", "int8_t", "atomic_size_t", "pthread_t", "std::size_t", "DWORD"] {
            let typedef = typedefs.find(&Sname::from(name));
            assert!(typedef.map_or(false, |typedef| !typedef.user_defined), "{name}");
        }
        assert!(typedefs.find(&Sname::from("size_t")).unwrap().ast.is_size_t());
        assert_eq!(typedefs.iter(Which::User).count(), 0);
        assert_eq!(typedefs.iter(Which::All).count(), typedefs.len());
    }
}
