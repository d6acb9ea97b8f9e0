//! Declaration syntax trees.
//!
//! A declaration is a tree rooted at its outermost declarator. For example
//! `int *a[10]` is an array of pointer to `int`, so the root is an array node
//! whose element is a pointer node whose pointee is a built-in type node. The
//! declared name, storage classes and attributes always live on the root.

use std::rc::Rc;

use crate::lang::Lang;
use crate::operators::OperId;
use crate::sname::Sname;
use crate::source::ByteRange;
use crate::typedefs::Typedef;
use crate::types::TypeId;

pub mod util;

pub use util::join;

/// A declaration node.
#[derive(Debug, Clone)]
pub struct Ast {
    pub kind: Kind,
    /// The declared name, if any. Only the root of a declaration and the roots
    /// of parameters carry names.
    pub sname: Sname,
    pub ty: TypeId,
    pub align: Align,
    /// Bit-field width, or `0` if this is not a bit-field.
    pub bit_width: u32,
    pub range: ByteRange,
}

#[derive(Debug, Clone)]
pub enum Kind {
    /// Stands in for a subtree that has not been parsed yet. See [`join`].
    Placeholder,
    /// A built-in type like `int` or `unsigned long`.
    Builtin,
    /// A bare K&R C parameter name.
    Name,
    /// `...`
    Variadic,
    /// A use of a registered type name.
    Typedef(Rc<Typedef>),
    /// An `enum`, `class`, `struct`, or `union`, which one being given by
    /// the node's base type.
    Ecsu {
        /// An enumeration's underlying type.
        of: Option<Box<Ast>>,
        ecsu_sname: Sname,
    },
    Array {
        of: Box<Ast>,
        size: ArraySize,
        /// Qualifiers inside the brackets of an array parameter.
        qualifiers: TypeId,
    },
    Pointer(Box<Ast>),
    PointerToMember {
        of: Box<Ast>,
        class: Sname,
    },
    Reference(Box<Ast>),
    RvalueReference(Box<Ast>),
    Function(Func),
    /// An Apple block.
    Block(Func),
    Constructor(Func),
    Destructor(Func),
    Operator {
        func: Func,
        oper: OperId,
    },
    /// `operator T()`.
    UserDefConversion(Box<Ast>),
    /// `operator"" _x(params)`.
    UserDefLiteral(Func),
}

/// The parts shared by everything function-like.
#[derive(Debug, Clone, Default)]
pub struct Func {
    pub params: Vec<Ast>,
    /// The return type. Constructors and destructors have none.
    pub ret: Option<Box<Ast>>,
    pub member: Member,
}

/// Whether a function was explicitly declared a member or non-member.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Member {
    #[default]
    Unspecified,
    Member,
    NonMember,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ArraySize {
    /// `[]`
    #[default]
    None,
    /// `[N]`
    Int(u64),
    /// `[*]`
    Vla,
}

#[derive(Debug, Clone, Default)]
pub enum Align {
    #[default]
    None,
    Bytes(u32),
    Type(Box<Ast>),
}

impl Ast {
    pub fn new(kind: Kind, range: ByteRange) -> Ast {
        Ast {
            kind,
            sname: Sname::new(),
            ty: TypeId::empty(),
            align: Align::None,
            bit_width: 0,
            range,
        }
    }

    pub fn placeholder(range: ByteRange) -> Ast {
        Ast::new(Kind::Placeholder, range)
    }

    pub fn builtin(ty: TypeId, range: ByteRange) -> Ast {
        Ast {
            ty,
            ..Ast::new(Kind::Builtin, range)
        }
    }

    pub fn with_name(self, sname: Sname) -> Ast {
        Ast { sname, ..self }
    }

    pub fn with_type(self, ty: TypeId) -> Ast {
        Ast { ty, ..self }
    }

    /// The next node down the declarator chain: an array's element type, a
    /// pointer's pointee, a function's return type, and so on.
    pub fn child(&self) -> Option<&Ast> {
        match &self.kind {
            Kind::Array { of, .. }
            | Kind::Pointer(of)
            | Kind::PointerToMember { of, .. }
            | Kind::Reference(of)
            | Kind::RvalueReference(of)
            | Kind::UserDefConversion(of) => Some(of),
            Kind::Function(func)
            | Kind::Block(func)
            | Kind::Constructor(func)
            | Kind::Destructor(func)
            | Kind::Operator { func, .. }
            | Kind::UserDefLiteral(func) => func.ret.as_deref(),
            Kind::Placeholder
            | Kind::Builtin
            | Kind::Name
            | Kind::Variadic
            | Kind::Typedef(_)
            | Kind::Ecsu { .. } => None,
        }
    }

    pub fn child_mut(&mut self) -> Option<&mut Ast> {
        match &mut self.kind {
            Kind::Array { of, .. }
            | Kind::Pointer(of)
            | Kind::PointerToMember { of, .. }
            | Kind::Reference(of)
            | Kind::RvalueReference(of)
            | Kind::UserDefConversion(of) => Some(of),
            Kind::Function(func)
            | Kind::Block(func)
            | Kind::Constructor(func)
            | Kind::Destructor(func)
            | Kind::Operator { func, .. }
            | Kind::UserDefLiteral(func) => func.ret.as_deref_mut(),
            Kind::Placeholder
            | Kind::Builtin
            | Kind::Name
            | Kind::Variadic
            | Kind::Typedef(_)
            | Kind::Ecsu { .. } => None,
        }
    }

    pub fn func(&self) -> Option<&Func> {
        match &self.kind {
            Kind::Function(func)
            | Kind::Block(func)
            | Kind::Constructor(func)
            | Kind::Destructor(func)
            | Kind::Operator { func, .. }
            | Kind::UserDefLiteral(func) => Some(func),
            _ => None,
        }
    }

    pub fn func_mut(&mut self) -> Option<&mut Func> {
        match &mut self.kind {
            Kind::Function(func)
            | Kind::Block(func)
            | Kind::Constructor(func)
            | Kind::Destructor(func)
            | Kind::Operator { func, .. }
            | Kind::UserDefLiteral(func) => Some(func),
            _ => None,
        }
    }

    /// The parameters of a function-like node, or none.
    pub fn params(&self) -> &[Ast] {
        self.func().map_or(&[], |func| &func.params)
    }

    /// Is this a function, operator, constructor, and so on? Blocks do not
    /// count.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self.kind,
            Kind::Function(_)
                | Kind::Constructor(_)
                | Kind::Destructor(_)
                | Kind::Operator { .. }
                | Kind::UserDefConversion(_)
                | Kind::UserDefLiteral(_)
        )
    }

    /// Follow [`Ast::child`] to the bottom of the declarator chain.
    pub fn leaf(&self) -> &Ast {
        let mut ast = self;
        while let Some(child) = ast.child() {
            ast = child;
        }
        ast
    }

    /// Apply `f` to the bottom of the declarator chain.
    pub fn with_leaf_mut<T>(&mut self, f: impl FnOnce(&mut Ast) -> T) -> T {
        match self.child_mut() {
            Some(child) => child.with_leaf_mut(f),
            None => f(self),
        }
    }

    /// The operator of an operator node.
    pub fn oper(&self) -> Option<OperId> {
        match self.kind {
            Kind::Operator { oper, .. } => Some(oper),
            _ => None,
        }
    }

    pub fn kind_name(&self, lang: Lang) -> &'static str {
        self.kind.name(lang)
    }
}

impl Kind {
    /// The name of this kind of node for use in messages.
    pub fn name(&self, lang: Lang) -> &'static str {
        match self {
            Kind::Placeholder => "placeholder",
            Kind::Builtin => "built-in type",
            Kind::Name => "name",
            Kind::Variadic => "variadic",
            Kind::Typedef(_) => "typedef",
            Kind::Ecsu { .. } if lang.is_cpp() => "enum, class, struct, or union",
            Kind::Ecsu { .. } if lang == Lang::C_KNR => "struct or union",
            Kind::Ecsu { .. } => "enum, struct, or union",
            Kind::Array { .. } => "array",
            Kind::Pointer(_) => "pointer",
            Kind::PointerToMember { .. } => "pointer to member",
            Kind::Reference(_) => "reference",
            Kind::RvalueReference(_) => "rvalue reference",
            Kind::Function(_) => "function",
            Kind::Block(_) => "block",
            Kind::Constructor(_) => "constructor",
            Kind::Destructor(_) => "destructor",
            Kind::Operator { .. } => "operator",
            Kind::UserDefConversion(_) => "user-defined conversion operator",
            Kind::UserDefLiteral(_) => "user-defined literal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int() -> Ast {
        Ast::builtin(TypeId::INT, ByteRange::default())
    }

    #[test]
    fn leaf_follows_declarators() {
        let func = Func {
            ret: Some(Box::new(int())),
            ..Func::default()
        };
        let ptr = Ast::new(
            Kind::Pointer(Box::new(Ast::new(Kind::Function(func), ByteRange::default()))),
            ByteRange::default(),
        );
        assert!(matches!(ptr.leaf().kind, Kind::Builtin));
        assert!(ptr.child().map_or(false, Ast::is_function_like));
    }

    #[test]
    fn kind_names_depend_on_language() {
        let ecsu = Kind::Ecsu {
            of: None,
            ecsu_sname: Sname::from("S"),
        };
        assert_eq!(ecsu.name(Lang::CPP_17), "enum, class, struct, or union");
        assert_eq!(ecsu.name(Lang::C_17), "enum, struct, or union");
        assert_eq!(ecsu.name(Lang::C_KNR), "struct or union");
    }
}
