//! Operations over declaration trees used by the parsers, the checker and
//! the printers.

use std::rc::Rc;

use crate::ast::{Align, Ast, Func, Kind, Member};
use crate::lang::Lang;
use crate::source::ByteRange;
use crate::types::TypeId;

/// Replace the placeholder at the bottom of `outer`'s declarator chain with
/// `inner`.
///
/// Declarators are parsed outside-in but the type they apply to is only known
/// afterwards, so the parsers build `outer` around a [`Kind::Placeholder`]
/// and fill it in once `inner` is known. If `outer` is itself the
/// placeholder, `inner` is returned, taking `outer`'s name if it has none.
/// If `outer` has no placeholder it is returned unchanged.
pub fn join(mut outer: Ast, inner: Ast) -> Ast {
    if let Kind::Placeholder = outer.kind {
        let mut inner = inner;
        if inner.sname.is_empty() {
            inner.sname = outer.sname;
        }
        inner.ty |= outer.ty;
        return inner;
    }
    if let Some(child) = outer.child_mut() {
        let old = std::mem::replace(child, Ast::placeholder(ByteRange::default()));
        *child = join(old, inner);
    }
    outer
}

/// Move storage classes, attributes and alignment from the bottom of the
/// declarator chain to its root, where they apply to the declared entity.
pub fn hoist_storage(ast: &mut Ast) {
    if ast.child().is_none() {
        return;
    }
    let mask = TypeId::MASK_STORAGE | TypeId::MASK_ATTRIBUTE;
    let (bits, align) = ast.with_leaf_mut(|leaf| {
        let bits = leaf.ty & mask;
        leaf.ty -= bits;
        (bits, std::mem::take(&mut leaf.align))
    });
    ast.ty |= bits;
    if !matches!(align, Align::None) {
        ast.align = align;
    }
}

/// Are `a` and `b` the same declaration, ignoring source locations and
/// equivalent spellings of types like `signed int` and `int`?
pub fn equiv(a: &Ast, b: &Ast) -> bool {
    a.sname == b.sname
        && a.ty.equiv(b.ty)
        && a.bit_width == b.bit_width
        && align_equiv(&a.align, &b.align)
        && kind_equiv(&a.kind, &b.kind)
}

fn align_equiv(a: &Align, b: &Align) -> bool {
    match (a, b) {
        (Align::None, Align::None) => true,
        (Align::Bytes(a), Align::Bytes(b)) => a == b,
        (Align::Type(a), Align::Type(b)) => equiv(a, b),
        _ => false,
    }
}

fn kind_equiv(a: &Kind, b: &Kind) -> bool {
    match (a, b) {
        (Kind::Placeholder, Kind::Placeholder)
        | (Kind::Builtin, Kind::Builtin)
        | (Kind::Name, Kind::Name)
        | (Kind::Variadic, Kind::Variadic) => true,
        (Kind::Typedef(a), Kind::Typedef(b)) => Rc::ptr_eq(a, b) || a.ast.sname == b.ast.sname,
        (
            Kind::Ecsu {
                of: a_of,
                ecsu_sname: a_sname,
            },
            Kind::Ecsu {
                of: b_of,
                ecsu_sname: b_sname,
            },
        ) => {
            a_sname == b_sname
                && match (a_of, b_of) {
                    (Some(a), Some(b)) => equiv(a, b),
                    (None, None) => true,
                    _ => false,
                }
        }
        (
            Kind::Array {
                of: a_of,
                size: a_size,
                qualifiers: a_quals,
            },
            Kind::Array {
                of: b_of,
                size: b_size,
                qualifiers: b_quals,
            },
        ) => a_size == b_size && a_quals == b_quals && equiv(a_of, b_of),
        (Kind::Pointer(a), Kind::Pointer(b))
        | (Kind::Reference(a), Kind::Reference(b))
        | (Kind::RvalueReference(a), Kind::RvalueReference(b))
        | (Kind::UserDefConversion(a), Kind::UserDefConversion(b)) => equiv(a, b),
        (
            Kind::PointerToMember { of: a, class: a_class },
            Kind::PointerToMember { of: b, class: b_class },
        ) => a_class == b_class && equiv(a, b),
        (Kind::Function(a), Kind::Function(b))
        | (Kind::Block(a), Kind::Block(b))
        | (Kind::Constructor(a), Kind::Constructor(b))
        | (Kind::Destructor(a), Kind::Destructor(b))
        | (Kind::UserDefLiteral(a), Kind::UserDefLiteral(b)) => func_equiv(a, b),
        (
            Kind::Operator {
                func: a,
                oper: a_oper,
            },
            Kind::Operator {
                func: b,
                oper: b_oper,
            },
        ) => a_oper == b_oper && func_equiv(a, b),
        _ => false,
    }
}

fn func_equiv(a: &Func, b: &Func) -> bool {
    a.member == b.member
        && a.params.len() == b.params.len()
        && a.params.iter().zip(&b.params).all(|(a, b)| equiv(a, b))
        && match (&a.ret, &b.ret) {
            (Some(a), Some(b)) => equiv(a, b),
            (None, None) => true,
            _ => false,
        }
}

impl Ast {
    /// The type a typedef name stands for, or this node itself.
    pub fn untypedef(&self) -> &Ast {
        match &self.kind {
            Kind::Typedef(typedef) => typedef.ast.untypedef(),
            _ => self,
        }
    }

    /// The referred-to type if this is a reference (after looking through
    /// typedefs), or this node otherwise.
    pub fn unreference(&self) -> &Ast {
        let ast = self.untypedef();
        match &ast.kind {
            Kind::Reference(of) | Kind::RvalueReference(of) => of.untypedef(),
            _ => ast,
        }
    }

    /// The pointee if this is a pointer (after looking through typedefs).
    pub fn unpointer(&self) -> Option<&Ast> {
        match &self.untypedef().kind {
            Kind::Pointer(of) => Some(of.untypedef()),
            _ => None,
        }
    }

    /// Is this a built-in type having any of the bits in `ty`?
    pub fn is_builtin_any(&self, ty: TypeId) -> bool {
        let ast = self.untypedef();
        matches!(ast.kind, Kind::Builtin) && ast.bit_width == 0 && ast.ty.is_any(ty)
    }

    /// Is this a pointer to a type having the bits in `ty`?
    ///
    /// The pointee's own qualifiers count even when it is a typedef, so
    /// `const size_t*` is a pointer to `const`.
    pub fn is_ptr_to_type_any(&self, ty: TypeId) -> bool {
        match &self.untypedef().kind {
            Kind::Pointer(of) => {
                let pointee = of.untypedef();
                (pointee.ty | of.ty.qualifiers()).is_any(ty)
                    && !matches!(pointee.kind, Kind::Pointer(_))
            }
            _ => false,
        }
    }

    /// Is this a pointer to something satisfying `pred`?
    pub fn is_ptr_to(&self, pred: impl FnOnce(&Ast) -> bool) -> bool {
        self.unpointer().map_or(false, pred)
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self.untypedef().kind,
            Kind::Reference(_) | Kind::RvalueReference(_)
        )
    }

    /// Is this an `enum`, `class`, `struct`, or `union` having any of the
    /// base types in `ty`?
    pub fn is_ecsu_any(&self, ty: TypeId) -> bool {
        let ast = self.untypedef();
        matches!(ast.kind, Kind::Ecsu { .. }) && ast.ty.intersects(ty)
    }

    /// Is this `std::size_t`, or something equivalent to it?
    pub fn is_size_t(&self) -> bool {
        let ast = self.untypedef();
        matches!(ast.kind, Kind::Builtin)
            && ast.ty.base().normalize() == (TypeId::UNSIGNED | TypeId::LONG | TypeId::INT)
    }
}

/// Whether an operator is a member or a non-member.
///
/// An explicit `member` or `non-member` wins, then types that only apply to
/// one or the other, then the number of parameters. The result is
/// [`Member::Unspecified`] when it can not be decided.
pub fn oper_overload(ast: &Ast, lang: Lang) -> Member {
    let Kind::Operator { func, oper } = &ast.kind else {
        return Member::Unspecified;
    };
    if func.member != Member::Unspecified {
        return func.member;
    }
    if ast.ty.intersects(TypeId::MEMBER_FUNC_ONLY) {
        return Member::Member;
    }
    if ast.ty.intersects(TypeId::NONMEMBER_FUNC_ONLY) {
        return Member::NonMember;
    }
    let op = oper.get(lang);
    if op.overload == crate::operators::Overload::Member {
        return Member::Member;
    }
    if oper.is_new_delete() {
        return Member::Unspecified;
    }
    let count = func.params.len();
    if count == op.params_max {
        Member::NonMember
    } else if count == op.params_min {
        Member::Member
    } else {
        Member::Unspecified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::OperId;
    use crate::sname::Sname;
    use crate::typedefs::Typedef;

    fn at() -> ByteRange {
        ByteRange::default()
    }

    fn int() -> Ast {
        Ast::builtin(TypeId::INT, at())
    }

    #[test]
    fn join_fills_the_placeholder() {
        // (*p)[4] applied to `static int`
        let outer = Ast::new(Kind::Pointer(Box::new(Ast::placeholder(at()))), at())
            .with_name(Sname::from("p"));
        let array = Ast::new(
            Kind::Array {
                of: Box::new(int().with_type(TypeId::STATIC | TypeId::INT)),
                size: crate::ast::ArraySize::Int(4),
                qualifiers: TypeId::empty(),
            },
            at(),
        );
        let mut ast = join(outer, array);
        hoist_storage(&mut ast);
        assert_eq!(ast.sname.to_string(), "p");
        assert_eq!(ast.ty, TypeId::STATIC);
        assert_eq!(ast.leaf().ty, TypeId::INT);
        assert!(matches!(ast.child().map(|child| &child.kind), Some(Kind::Array { .. })));
    }

    #[test]
    fn join_onto_placeholder_keeps_name() {
        let outer = Ast::placeholder(at()).with_name(Sname::from("x"));
        let ast = join(outer, int());
        assert!(matches!(ast.kind, Kind::Builtin));
        assert_eq!(ast.sname.to_string(), "x");
    }

    #[test]
    fn clones_are_equivalent() {
        let func = Func {
            params: vec![int().with_name(Sname::from("a")), Ast::new(Kind::Variadic, at())],
            ret: Some(Box::new(int())),
            member: Member::Unspecified,
        };
        let ast = Ast::new(Kind::Pointer(Box::new(Ast::new(Kind::Function(func), at()))), at());
        assert!(equiv(&ast, &ast.clone()));

        let signed = Ast::builtin(TypeId::SIGNED, at());
        assert!(equiv(&int(), &signed));
        assert!(!equiv(&int(), &Ast::builtin(TypeId::CHAR, at())));
        assert!(!equiv(&int(), &int().with_name(Sname::from("x"))));
    }

    #[test]
    fn typedefs_are_looked_through() {
        let size_t = Rc::new(Typedef {
            ast: Ast::builtin(TypeId::UNSIGNED | TypeId::LONG, at()).with_name(Sname::from("size_t")),
            user_defined: false,
        });
        let ast = Ast::new(Kind::Typedef(size_t), at()).with_type(TypeId::TYPEDEF_TYPE);
        assert!(ast.is_size_t());
        assert!(ast.is_builtin_any(TypeId::LONG));

        let ptr = Ast::new(Kind::Pointer(Box::new(ast.with_type(TypeId::CONST))), at());
        assert!(ptr.is_ptr_to_type_any(TypeId::CONST | TypeId::UNSIGNED));
        assert!(ptr.unpointer().map_or(false, Ast::is_size_t));
    }

    #[test]
    fn operator_membership() {
        let oper = |params: usize, ty: TypeId| {
            let func = Func {
                params: (0..params).map(|_| int()).collect(),
                ret: Some(Box::new(int())),
                member: Member::Unspecified,
            };
            Ast::new(Kind::Operator { func, oper: OperId::Plus }, at()).with_type(ty)
        };
        let lang = Lang::CPP_17;
        assert_eq!(oper_overload(&oper(0, TypeId::empty()), lang), Member::Member);
        assert_eq!(oper_overload(&oper(2, TypeId::empty()), lang), Member::NonMember);
        assert_eq!(oper_overload(&oper(1, TypeId::empty()), lang), Member::Unspecified);
        assert_eq!(oper_overload(&oper(1, TypeId::CONST), lang), Member::Member);
        assert_eq!(oper_overload(&oper(1, TypeId::FRIEND), lang), Member::NonMember);
    }
}
