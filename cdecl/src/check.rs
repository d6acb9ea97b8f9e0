//! Semantic checks of declarations.
//!
//! Parsing only establishes that a declaration is well formed. Whether it is
//! legal (not an array of functions, say) and legal in the current language
//! is decided here. Checking stops at the first error, but warnings are
//! collected and returned when the declaration is otherwise legal.
//!
//! A declaration is checked in three passes over its tree: one for
//! structural errors, one for types that are illegal in the current
//! language, and one for warnings.

use crate::ast::util::oper_overload;
use crate::ast::{Align, ArraySize, Ast, Kind, Member};
use crate::keywords;
use crate::lang::{self, feature, Lang, LangIds};
use crate::operators::{OperId, Overload, UNLIMITED};
use crate::parse::CastKind;
use crate::reporting::SemanticMessage;
use crate::sname::{ScopeKind, Sname};
use crate::types::TypeId;

type CheckResult = Result<(), SemanticMessage>;

/// Storage classes that can only apply to the declared entity itself, never
/// to something it is built from.
const STORAGE_CLASSES: TypeId = TypeId::AUTO_STORAGE
    .union(TypeId::BLOCK)
    .union(TypeId::EXTERN)
    .union(TypeId::EXTERN_C)
    .union(TypeId::REGISTER)
    .union(TypeId::STATIC)
    .union(TypeId::THREAD_LOCAL)
    .union(TypeId::TYPEDEF)
    .union(TypeId::MUTABLE);

/// Check declarations sharing the same specifiers, e.g. `int x, *y`.
pub fn check_decls(asts: &[Ast], lang: Lang) -> Result<Vec<SemanticMessage>, SemanticMessage> {
    let mut checker = Checker::new(lang);
    checker.decl_list(asts)?;
    Ok(checker.warnings)
}

pub fn check_decl(ast: &Ast, lang: Lang) -> Result<Vec<SemanticMessage>, SemanticMessage> {
    check_decls(std::slice::from_ref(ast), lang)
}

/// Check a cast of `sname` (which may be empty) into `ast`.
pub fn check_cast(
    kind: CastKind,
    sname: &Sname,
    ast: &Ast,
    lang: Lang,
) -> Result<Vec<SemanticMessage>, SemanticMessage> {
    let mut checker = Checker::new(lang);
    checker.cast(kind, sname, ast)?;
    Ok(checker.warnings)
}

/// What the node being checked is part of.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Parent {
    /// Nothing: this is the declaration itself.
    Root,
    /// A type that declares nothing, like the target of a cast.
    TypeName,
    Array,
    Pointer,
    Reference,
    Return,
    Conversion,
    /// This is a function parameter.
    Param,
}

#[derive(Debug, Copy, Clone)]
struct Ctx {
    parent: Parent,
    in_param: bool,
}

impl Ctx {
    const ROOT: Ctx = Ctx {
        parent: Parent::Root,
        in_param: false,
    };
    const TYPE_NAME: Ctx = Ctx {
        parent: Parent::TypeName,
        in_param: false,
    };
    const PARAM: Ctx = Ctx {
        parent: Parent::Param,
        in_param: true,
    };

    fn below(self, parent: Parent) -> Ctx {
        Ctx { parent, ..self }
    }
}

fn error(ast: &Ast, message: impl Into<String>) -> CheckResult {
    Err(SemanticMessage::error(ast.range, message))
}

fn error_hint(ast: &Ast, message: impl Into<String>, hint: impl Into<String>) -> CheckResult {
    Err(SemanticMessage::error(ast.range, message).with_hint(hint))
}

fn plural(count: usize) -> &'static str {
    match count {
        1 => "",
        _ => "s",
    }
}

struct Checker {
    lang: Lang,
    warnings: Vec<SemanticMessage>,
}

impl Checker {
    fn new(lang: Lang) -> Checker {
        Checker {
            lang,
            warnings: Vec::new(),
        }
    }

    fn name(&self, ty: TypeId) -> String {
        ty.name_error(self.lang)
    }

    fn kind(&self, ast: &Ast) -> &'static str {
        ast.kind_name(self.lang)
    }

    fn which(&self, ids: LangIds) -> String {
        lang::which(ids, self.lang)
    }

    fn warn(&mut self, ast: &Ast, message: impl Into<String>) {
        self.warnings.push(SemanticMessage::warning(ast.range, message));
    }

    fn decl_list(&mut self, asts: &[Ast]) -> CheckResult {
        if let [first, _, ..] = asts {
            let leaf = first.leaf();
            if leaf.ty.base() == TypeId::AUTO && !self.lang.is_any(feature::AUTO_TYPE_MULTI_DECL) {
                return error(
                    first,
                    format!(
                        "\"auto\" with multiple declarators not supported{}",
                        self.which(feature::AUTO_TYPE_MULTI_DECL),
                    ),
                );
            }
        }

        for (index, ast) in asts.iter().enumerate() {
            if !ast.sname.is_empty() {
                let previous = asts[..index].iter().find(|prev| prev.sname == ast.sname);
                if let Some(previous) = previous {
                    if !self.lang.is_any(feature::TENTATIVE_DEFS) {
                        return error(ast, format!("\"{}\": redefinition", ast.sname));
                    }
                    if !crate::ast::util::equiv(previous, ast) {
                        return error(
                            ast,
                            format!("\"{}\": redefinition with different type", ast.sname),
                        );
                    }
                }
            }
            self.decl(ast, Ctx::ROOT)?;
        }
        Ok(())
    }

    fn decl(&mut self, ast: &Ast, ctx: Ctx) -> CheckResult {
        tracing::trace!(kind = self.kind(ast), sname = %ast.sname, "checking declaration");
        self.errors(ast, ctx)?;
        self.types(ast)?;
        self.warnings(ast);
        Ok(())
    }

    fn cast(&mut self, kind: CastKind, sname: &Sname, ast: &Ast) -> CheckResult {
        if let Some(keyword) = kind.keyword() {
            if !self.lang.is_any(kind.langs()) {
                return error(
                    ast,
                    format!("{keyword} not supported{}", self.which(kind.langs())),
                );
            }
        }

        let mut node = Some(ast);
        while let Some(current) = node {
            let storage = current.ty & STORAGE_CLASSES;
            if !storage.is_empty() {
                return error(current, format!("can not cast into {}", self.name(storage)));
            }
            node = current.child();
        }
        if ast.leaf().ty.base() == TypeId::AUTO {
            return error(ast, "can not cast into \"auto\"");
        }

        let raw = ast.untypedef();
        match &raw.kind {
            Kind::Array { .. } => {
                let message = match sname.is_empty() {
                    true => "can not cast into array".to_owned(),
                    false => format!("\"{sname}\": arithmetic or pointer type expected"),
                };
                return error_hint(ast, message, "cast into pointer");
            }
            _ if raw.is_function_like() || matches!(raw.kind, Kind::Block(_)) => {
                return error_hint(
                    ast,
                    format!("can not cast into {}", self.kind(raw)),
                    "cast into pointer to function",
                );
            }
            _ => {}
        }

        match kind {
            CastKind::C | CastKind::Static => {}
            CastKind::Const => {
                let ok = matches!(
                    raw.kind,
                    Kind::Pointer(_)
                        | Kind::PointerToMember { .. }
                        | Kind::Reference(_)
                        | Kind::RvalueReference(_)
                );
                if !ok {
                    return error(
                        ast,
                        "const_cast must be to a pointer, pointer-to-member, reference, or rvalue reference",
                    );
                }
            }
            CastKind::Dynamic => {
                let is_class = |ast: &Ast| ast.is_ecsu_any(TypeId::ANY_CLASS);
                let ok = ast.is_ptr_to(is_class) || (ast.is_reference() && is_class(ast.unreference()));
                if !ok {
                    return error(
                        ast,
                        "dynamic_cast must be to a pointer or reference to a class, struct, or union",
                    );
                }
            }
            CastKind::Reinterpret => {
                if ast.is_builtin_any(TypeId::VOID) {
                    return error(ast, "reinterpret_cast can not be to void");
                }
            }
        }

        self.decl(ast, Ctx::TYPE_NAME)
    }

    // Structural errors

    fn errors(&mut self, ast: &Ast, ctx: Ctx) -> CheckResult {
        self.alignment(ast)?;
        self.bit_field(ast, ctx)?;
        self.attributes(ast, ctx)?;

        if ast.ty.contains(TypeId::CONSTEVAL) && !ast.is_function_like() {
            return error(ast, "only functions can be consteval");
        }

        match &ast.kind {
            Kind::Placeholder | Kind::Name | Kind::Variadic => {}
            Kind::Builtin => self.builtin(ast, ctx)?,
            Kind::Typedef(_) => self.void_variable(ast, ctx)?,
            Kind::Ecsu { of, ecsu_sname } => self.ecsu(ast, of.as_deref(), ecsu_sname, ctx)?,
            Kind::Array {
                of,
                size,
                qualifiers,
            } => self.array(ast, of, *size, *qualifiers, ctx)?,
            Kind::Pointer(to) => self.pointer(ast, to)?,
            Kind::PointerToMember { of, .. } => {
                if !self.lang.is_any(feature::POINTER_TO_MEMBER) {
                    return error(
                        ast,
                        format!(
                            "pointer to member not supported{}",
                            self.which(feature::POINTER_TO_MEMBER),
                        ),
                    );
                }
                self.pointer(ast, of)?;
            }
            Kind::Reference(to) | Kind::RvalueReference(to) => self.reference(ast, to)?,
            Kind::Function(func) | Kind::Block(func) => {
                self.ret_type(ast, func.ret.as_deref())?;
                self.func(ast, &func.params, func.member)?;
                self.params(ast, &func.params)?;
                self.not_func_bits(ast)?;
            }
            Kind::Operator { func, oper } => {
                self.oper(ast, func.ret.as_deref(), &func.params, *oper)?;
                self.ret_type(ast, func.ret.as_deref())?;
                self.func(ast, &func.params, func.member)?;
                self.params(ast, &func.params)?;
                self.not_func_bits(ast)?;
            }
            Kind::Constructor(func) => {
                self.func(ast, &func.params, func.member)?;
                self.params(ast, &func.params)?;
                self.ctor_dtor(ast)?;
            }
            Kind::Destructor(_) => self.ctor_dtor(ast)?,
            Kind::UserDefConversion(to) => {
                self.conversion(ast, to)?;
                self.ret_type(ast, Some(to))?;
                self.func(ast, &[], Member::Unspecified)?;
            }
            Kind::UserDefLiteral(func) => {
                self.ret_type(ast, func.ret.as_deref())?;
                self.func(ast, &func.params, func.member)?;
                self.udl_params(ast, &func.params)?;
                self.params(ast, &func.params)?;
            }
        }

        self.restrict(ast)?;

        let parent = match &ast.kind {
            Kind::Array { .. } => Parent::Array,
            Kind::Pointer(_) | Kind::PointerToMember { .. } => Parent::Pointer,
            Kind::Reference(_) | Kind::RvalueReference(_) => Parent::Reference,
            Kind::UserDefConversion(_) => Parent::Conversion,
            Kind::Ecsu { .. } => return Ok(()),
            _ => Parent::Return,
        };
        match ast.child() {
            Some(child) => self.errors(child, ctx.below(parent)),
            None => Ok(()),
        }
    }

    fn alignment(&mut self, ast: &Ast) -> CheckResult {
        if matches!(ast.align, Align::None) {
            return Ok(());
        }
        if !self.lang.is_any(feature::ALIGNMENT) {
            return error(
                ast,
                format!("alignment not supported{}", self.which(feature::ALIGNMENT)),
            );
        }
        if ast.ty.contains(TypeId::TYPEDEF) {
            return error(ast, "types can not be aligned");
        }
        if ast.ty.contains(TypeId::REGISTER) {
            let keyword = match self.lang.is_any(feature::ALIGNAS_KEYWORD) {
                true => "alignas",
                false => "_Alignas",
            };
            return error(
                ast,
                format!("\"{keyword}\" can not be combined with \"register\""),
            );
        }
        let raw = ast.untypedef();
        let is_object = matches!(
            raw.kind,
            Kind::Builtin
                | Kind::Ecsu { .. }
                | Kind::Array { .. }
                | Kind::Pointer(_)
                | Kind::PointerToMember { .. }
        );
        if !is_object {
            return error(ast, format!("{} can not be aligned", self.kind(raw)));
        }
        if ast.bit_width > 0 {
            return error(ast, "bit fields can not be aligned");
        }
        match &ast.align {
            Align::Bytes(bytes) if !(*bytes == 0 || bytes.is_power_of_two()) => {
                error(ast, format!("\"{bytes}\": alignment must be a power of 2"))
            }
            Align::Type(ty) => self.decl(ty, Ctx::TYPE_NAME),
            _ => Ok(()),
        }
    }

    fn bit_field(&mut self, ast: &Ast, ctx: Ctx) -> CheckResult {
        if ast.bit_width == 0 {
            return Ok(());
        }
        if ctx.parent == Parent::Param {
            return error(ast, "parameters can not have bit-field widths");
        }
        if ast.sname.count() > 1 {
            return error(ast, "scoped names can not have bit-field widths");
        }
        let storage = ast.ty & STORAGE_CLASSES;
        if !storage.is_empty() {
            return error(
                ast,
                format!("{} can not have bit-field widths", self.name(storage)),
            );
        }
        if ast.ty.contains(TypeId::NO_UNIQUE_ADDRESS) {
            return error(
                ast,
                format!(
                    "{} can not have bit-field widths",
                    self.name(TypeId::NO_UNIQUE_ADDRESS),
                ),
            );
        }
        let raw = ast.untypedef();
        let is_integral = match raw.kind {
            Kind::Builtin => {
                raw.ty.base().normalize().intersects(TypeId::ANY_INTEGRAL)
                    && !raw.ty.intersects(TypeId::FLOAT | TypeId::DOUBLE)
            }
            Kind::Ecsu { .. } => raw.ty.contains(TypeId::ENUM),
            _ => false,
        };
        match is_integral {
            true => Ok(()),
            false => error(ast, "bit-fields must be of integral type"),
        }
    }

    fn attributes(&mut self, ast: &Ast, ctx: Ctx) -> CheckResult {
        let attributes = ast.ty.attributes();
        if attributes.is_empty() {
            return Ok(());
        }
        let raw = ast.untypedef();
        let bad = if ast.is_function_like() || matches!(ast.kind, Kind::Block(_)) {
            attributes & TypeId::NO_UNIQUE_ADDRESS
        } else {
            let mut bad = attributes & TypeId::NORETURN;
            if ctx.parent != Parent::Param {
                bad |= attributes & TypeId::CARRIES_DEPENDENCY;
            }
            if !matches!(raw.kind, Kind::Ecsu { .. }) {
                bad |= attributes & TypeId::NODISCARD;
            }
            bad
        };
        match bad.is_empty() {
            true => Ok(()),
            false => error(
                ast,
                format!("{} can not be {}", self.kind(ast), self.name(bad)),
            ),
        }
    }

    /// A variable (not a type, parameter, or pointee) of type `void`.
    fn void_variable(&mut self, ast: &Ast, ctx: Ctx) -> CheckResult {
        if ctx.parent != Parent::Root || !ast.is_builtin_any(TypeId::VOID) {
            return Ok(());
        }
        if ast.ty.contains(TypeId::TYPEDEF) {
            return Ok(());
        }
        // A declaration of an object of incomplete type.
        if self.lang.is_c() && ast.ty.contains(TypeId::EXTERN) {
            return Ok(());
        }
        error_hint(ast, "variable of void", "pointer to void")
    }

    fn builtin(&mut self, ast: &Ast, ctx: Ctx) -> CheckResult {
        if ast.ty.base().is_empty()
            && ctx.parent != Parent::Conversion
            && !self.lang.is_any(feature::IMPLICIT_INT)
        {
            return error(
                ast,
                format!(
                    "implicit \"int\" is illegal{}",
                    self.which(feature::IMPLICIT_INT),
                ),
            );
        }
        if ast.ty.contains(TypeId::INLINE) && !self.lang.is_any(feature::INLINE_VARIABLE) {
            return error(
                ast,
                format!(
                    "inline variables not supported{}",
                    self.which(feature::INLINE_VARIABLE),
                ),
            );
        }
        let upc_strictness = TypeId::UPC_RELAXED | TypeId::UPC_STRICT;
        if ast.ty.intersects(upc_strictness) && !ast.ty.contains(TypeId::UPC_SHARED) {
            return error(
                ast,
                format!(
                    "\"{}\" requires \"shared\"",
                    self.name(ast.ty & upc_strictness),
                ),
            );
        }
        self.void_variable(ast, ctx)
    }

    fn ecsu(&mut self, ast: &Ast, of: Option<&Ast>, ecsu_sname: &Sname, ctx: Ctx) -> CheckResult {
        let ecsu = ast.ty.base() & TypeId::ANY_ECSU;
        // Declaring the type itself, e.g. `enum class E;`.
        let declares_type = ctx.parent == Parent::Root && ast.sname == *ecsu_sname;

        if ecsu.contains(TypeId::ENUM)
            && ecsu.intersects(TypeId::ANY_CLASS)
            && !ast.ty.contains(TypeId::TYPEDEF)
            && !declares_type
        {
            return error(
                ast,
                format!(
                    "\"{}\": enum classes must just use \"enum\"",
                    self.name(ecsu),
                ),
            );
        }
        if ecsu.intersects(TypeId::ANY_CLASS) && !ecsu.contains(TypeId::ENUM) {
            if ast.ty.contains(TypeId::REGISTER) {
                return error(
                    ast,
                    format!("{} can not be register", self.name(ecsu)),
                );
            }
        }

        if let Some(underlying) = of {
            if !self.lang.is_any(feature::FIXED_TYPE_ENUM) {
                return error(
                    ast,
                    format!(
                        "enum with underlying type not supported{}",
                        self.which(feature::FIXED_TYPE_ENUM),
                    ),
                );
            }
            let raw = underlying.untypedef();
            let is_integral = matches!(raw.kind, Kind::Builtin)
                && raw.ty.base().normalize().intersects(TypeId::ANY_INTEGRAL)
                && !raw.ty.intersects(TypeId::FLOAT | TypeId::DOUBLE);
            if !is_integral {
                return error(underlying, "enum underlying type must be integral");
            }
            self.errors(underlying, Ctx::TYPE_NAME)?;
        }
        self.void_variable(ast, ctx)
    }

    fn array(
        &mut self,
        ast: &Ast,
        of: &Ast,
        size: ArraySize,
        qualifiers: TypeId,
        ctx: Ctx,
    ) -> CheckResult {
        if qualifiers.contains(TypeId::ATOMIC) || ast.ty.contains(TypeId::ATOMIC) {
            return error(
                ast,
                format!("array can not be {}", self.name(TypeId::ATOMIC)),
            );
        }
        match size {
            ArraySize::None if qualifiers.contains(TypeId::NON_EMPTY_ARRAY) => {
                return error(ast, "\"non-empty\" requires an array size");
            }
            ArraySize::Int(0) => return error(ast, "array size must be greater than 0"),
            ArraySize::Vla => {
                if !self.lang.is_any(feature::VLA) {
                    return error(
                        ast,
                        format!(
                            "variable length arrays not supported{}",
                            self.which(feature::VLA),
                        ),
                    );
                }
                if !ctx.in_param {
                    return error(
                        ast,
                        "variable length arrays are illegal outside of function parameters",
                    );
                }
            }
            _ => {}
        }

        let qualifiers = qualifiers - TypeId::ATOMIC;
        if !qualifiers.is_empty() {
            if !self.lang.is_any(feature::QUALIFIED_ARRAY) {
                return error(
                    ast,
                    format!(
                        "\"{}\" arrays not supported{}",
                        self.name(qualifiers),
                        self.which(feature::QUALIFIED_ARRAY),
                    ),
                );
            }
            if ctx.parent != Parent::Param {
                return error(
                    ast,
                    format!(
                        "\"{}\" arrays are illegal outside of function parameters",
                        self.name(qualifiers),
                    ),
                );
            }
        }

        let raw = of.untypedef();
        match &raw.kind {
            Kind::Array {
                size: ArraySize::None,
                ..
            } => return error(of, "array dimension required"),
            Kind::Builtin if raw.ty.base().contains(TypeId::VOID) => {
                return error_hint(ast, "array of void", "array of pointer to void");
            }
            Kind::Reference(_) | Kind::RvalueReference(_) => {
                let kind = self.kind(raw);
                return error_hint(
                    ast,
                    format!("array of {kind} is illegal"),
                    format!("{kind} to array"),
                );
            }
            _ if raw.is_function_like() || matches!(raw.kind, Kind::Block(_)) => {
                return error_hint(
                    ast,
                    format!("array of {}", self.kind(raw)),
                    "array of pointer to function",
                );
            }
            _ => {}
        }

        let storage = of.ty & STORAGE_CLASSES;
        if !storage.is_empty() {
            let storage = self.name(storage);
            return error_hint(
                ast,
                format!("array of {storage} is illegal"),
                format!("{storage} array"),
            );
        }
        Ok(())
    }

    fn pointer(&mut self, ast: &Ast, to: &Ast) -> CheckResult {
        let raw = to.untypedef();
        if matches!(raw.kind, Kind::Reference(_) | Kind::RvalueReference(_)) {
            let message = format!("{} to {} is illegal", self.kind(ast), self.kind(raw));
            return match matches!(to.kind, Kind::Typedef(_)) {
                true => error(ast, message),
                false => error_hint(ast, message, "reference to pointer"),
            };
        }
        if raw.is_builtin_any(TypeId::AUTO) && !self.lang.is_any(feature::AUTO_POINTER_TYPES) {
            return error(
                ast,
                format!(
                    "\"auto\" with pointer declarator not supported{}",
                    self.which(feature::AUTO_POINTER_TYPES),
                ),
            );
        }
        self.pointee_storage(ast, to)
    }

    fn pointee_storage(&mut self, ast: &Ast, to: &Ast) -> CheckResult {
        let storage = to.ty & STORAGE_CLASSES;
        match storage.is_empty() {
            true => Ok(()),
            false => error(
                ast,
                format!("{} to {} is illegal", self.kind(ast), self.name(storage)),
            ),
        }
    }

    fn reference(&mut self, ast: &Ast, to: &Ast) -> CheckResult {
        let feature = match ast.kind {
            Kind::RvalueReference(_) => feature::RVALUE_REFERENCE,
            _ => feature::REFERENCE,
        };
        let kind = self.kind(ast);
        if !self.lang.is_any(feature) {
            return error(ast, format!("{kind} not supported{}", self.which(feature)));
        }
        let cv = ast.ty & TypeId::CV;
        if !cv.is_empty() {
            let cv = self.name(cv);
            return error_hint(
                ast,
                format!("{kind} can not be {cv}"),
                format!("{kind} to {cv}"),
            );
        }
        let raw = to.untypedef();
        if matches!(raw.kind, Kind::Reference(_) | Kind::RvalueReference(_)) {
            return error(ast, format!("{kind} to {} is illegal", self.kind(raw)));
        }
        if to.is_builtin_any(TypeId::VOID) {
            return error_hint(ast, format!("{kind} to void is illegal"), "pointer to void");
        }
        self.pointee_storage(ast, to)
    }

    fn ret_type(&mut self, ast: &Ast, ret: Option<&Ast>) -> CheckResult {
        let kind = self.kind(ast);
        if let Some(ret) = ret {
            let raw = ret.untypedef();
            match &raw.kind {
                Kind::Array { .. } => {
                    return error_hint(
                        ast,
                        format!("{kind} returning array"),
                        format!("{kind} returning pointer"),
                    );
                }
                Kind::Builtin
                    if raw.ty.base() == TypeId::AUTO && !self.lang.is_any(feature::AUTO_RETURN) =>
                {
                    return error(
                        ast,
                        format!(
                            "{kind} returning \"auto\" not supported{}",
                            self.which(feature::AUTO_RETURN),
                        ),
                    );
                }
                Kind::Function(_) | Kind::Operator { .. } | Kind::UserDefLiteral(_) => {
                    return error_hint(
                        ast,
                        format!("{kind} returning {} is illegal", self.kind(raw)),
                        format!("{kind} returning pointer to function"),
                    );
                }
                _ => {}
            }
            let storage = ret.ty & STORAGE_CLASSES;
            if !storage.is_empty() {
                return error(
                    ast,
                    format!("{kind} returning {} is illegal", self.name(storage)),
                );
            }
        }

        if ast.ty.contains(TypeId::EXPLICIT) {
            let allowed = match ast.kind {
                Kind::UserDefConversion(_) => feature::EXPLICIT_USER_DEF_CONV,
                _ => LangIds::empty(),
            };
            if !self.lang.is_any(allowed) {
                return error(
                    ast,
                    format!("{kind} can not be explicit{}", self.which(allowed)),
                );
            }
        }
        Ok(())
    }

    fn func(&mut self, ast: &Ast, params: &[Ast], member: Member) -> CheckResult {
        if self.lang.is_c() {
            return Ok(());
        }
        let kind = self.kind(ast);
        let ty = ast.ty;

        if ty.contains(TypeId::CONSTINIT) {
            return error(ast, format!("{kind} can not be {}", self.name(TypeId::CONSTINIT)));
        }

        let linkage = ty & TypeId::ANY_LINKAGE;
        if ty.intersects(TypeId::ANY_REFERENCE) {
            if !self.lang.is_any(feature::REF_QUALIFIED_FUNC) {
                return error(
                    ast,
                    format!(
                        "reference qualified {kind}s not supported{}",
                        self.which(feature::REF_QUALIFIED_FUNC),
                    ),
                );
            }
            if !linkage.is_empty() {
                return error(
                    ast,
                    format!("reference qualified {kind}s can not be {}", self.name(linkage)),
                );
            }
        }

        let member_only = ty & TypeId::MEMBER_FUNC_ONLY;
        if !member_only.is_empty() && !linkage.is_empty() {
            return error(
                ast,
                format!(
                    "{} {kind}s can not be {}",
                    self.name(linkage),
                    self.name(member_only),
                ),
            );
        }
        match member {
            Member::Member => {
                let mut nonmember = TypeId::EXTERN | TypeId::EXTERN_C;
                let is_new_delete = ast.oper().map_or(false, OperId::is_new_delete);
                if ast.oper().is_some() && !is_new_delete {
                    nonmember |= TypeId::STATIC;
                }
                let bad = ty & nonmember;
                if !bad.is_empty() {
                    return error(ast, format!("member {kind}s can not be {}", self.name(bad)));
                }
            }
            Member::NonMember if !member_only.is_empty() => {
                return error(
                    ast,
                    format!("non-member {kind}s can not be {}", self.name(member_only)),
                );
            }
            _ => {}
        }

        let default_delete = ty & (TypeId::DEFAULT | TypeId::DELETE);
        if !default_delete.is_empty() {
            self.default_delete(ast, params, default_delete)?;
        }

        if ty.contains(TypeId::VIRTUAL) {
            if ast.sname.count() > 1 {
                return error(
                    ast,
                    format!(
                        "\"{}\": virtual can not be used in file-scoped {kind}s",
                        ast.sname,
                    ),
                );
            }
        } else if ty.contains(TypeId::PURE_VIRTUAL) {
            return error(ast, format!("non-virtual {kind}s can not be pure"));
        }
        Ok(())
    }

    fn default_delete(&mut self, ast: &Ast, params: &[Ast], default_delete: TypeId) -> CheckResult {
        let mut relational = false;
        match &ast.kind {
            Kind::Constructor(_) => {
                // Default and copy or move constructors.
                let ok = match params {
                    [] => true,
                    [param] => {
                        param.is_reference()
                            && param.unreference().is_ecsu_any(TypeId::ANY_CLASS)
                            && class_sname(param.unreference())
                                .map_or(false, |class| class.local_name() == ast.sname.local_name())
                    }
                    _ => false,
                };
                if ok {
                    return Ok(());
                }
            }
            Kind::Operator { func, oper } => match oper {
                OperId::Eq => {
                    let ret_class = func
                        .ret
                        .as_deref()
                        .filter(|ret| ret.is_reference())
                        .and_then(|ret| class_sname(ret.unreference()));
                    let param_class = match params {
                        [param] if param.is_reference() => class_sname(param.unreference()),
                        _ => None,
                    };
                    if ret_class.is_some() && ret_class == param_class {
                        return Ok(());
                    }
                    if default_delete.contains(TypeId::DELETE) {
                        return Ok(());
                    }
                    return error(
                        ast,
                        "default operator = must return and take a reference to the same class",
                    );
                }
                oper if oper.is_relational() => {
                    if default_delete.contains(TypeId::DEFAULT) {
                        return Ok(());
                    }
                    relational = true;
                }
                _ => {}
            },
            Kind::Destructor(_) => return Ok(()),
            _ => {}
        }
        let also = match relational {
            true => " and relational operators",
            false => "",
        };
        error(
            ast,
            format!(
                "\"{}\" can be used only for special member functions{also}",
                self.name(default_delete),
            ),
        )
    }

    /// Bits legal on other things but never on a function.
    fn not_func_bits(&mut self, ast: &Ast) -> CheckResult {
        let allowed = match self.lang.is_c() {
            true => TypeId::FUNC_C,
            false => TypeId::FUNC_LIKE_CPP,
        };
        let bad = (ast.ty.storage() | ast.ty.qualifiers()) - allowed;
        if !bad.is_empty() {
            return error(
                ast,
                format!("{} can not be {}", self.kind(ast), self.name(bad)),
            );
        }
        self.throw(ast)
    }

    fn throw(&mut self, ast: &Ast) -> CheckResult {
        if ast.ty.contains(TypeId::THROW) && !self.lang.is_any(feature::THROW) {
            return error_hint(
                ast,
                format!("\"throw\" not supported{}", self.which(feature::THROW)),
                "noexcept",
            );
        }
        Ok(())
    }

    fn params(&mut self, ast: &Ast, params: &[Ast]) -> CheckResult {
        if !self.lang.is_any(feature::PROTOTYPES) {
            return self.knr_params(ast, params);
        }

        let mut void_seen = false;
        let mut variadic = false;
        for (index, param) in params.iter().enumerate() {
            if void_seen {
                return error(param, "\"void\" must be only parameter if specified");
            }
            if param.sname.count() > 1 {
                return error(param, "parameter names can not be scoped");
            }

            let raw = param.untypedef();
            if !matches!(raw.kind, Kind::Array { .. }) {
                let bad = param.ty.storage() - TypeId::REGISTER;
                if !bad.is_empty() {
                    return error(
                        param,
                        format!("{} parameters can not be {}", self.kind(ast), self.name(bad)),
                    );
                }
            }

            match &raw.kind {
                Kind::Builtin if raw.ty.base().contains(TypeId::AUTO) => {
                    if !self.lang.is_any(feature::AUTO_PARAM) {
                        return error(
                            param,
                            format!(
                                "parameters can not be \"auto\"{}",
                                self.which(feature::AUTO_PARAM),
                            ),
                        );
                    }
                }
                Kind::Builtin if raw.ty.base().contains(TypeId::VOID) => {
                    if !param.sname.is_empty() {
                        return error(param, "void as parameter can not have a name");
                    }
                    let cv = param.ty & TypeId::CV;
                    if !cv.is_empty() {
                        return error(
                            param,
                            format!("void as parameter can not be {}", self.name(cv)),
                        );
                    }
                    if index > 0 {
                        return error(param, "\"void\" must be only parameter if specified");
                    }
                    void_seen = true;
                    continue;
                }
                Kind::Name if !self.lang.is_any(feature::KNR_FUNC_DEFS) => {
                    return error(
                        param,
                        format!(
                            "type specifier required{}",
                            self.which(feature::KNR_FUNC_DEFS),
                        ),
                    );
                }
                Kind::Variadic => {
                    if let Some(oper) = ast.oper() {
                        if oper != OperId::Parens {
                            return error(
                                param,
                                format!("operator {oper} can not have a variadic parameter"),
                            );
                        }
                    }
                    if index + 1 != params.len() {
                        return error(param, "variadic specifier must be last");
                    }
                    variadic = true;
                    continue;
                }
                _ => {}
            }

            self.errors(param, Ctx::PARAM)?;
        }

        if variadic && params.len() == 1 && !self.lang.is_any(feature::VARIADIC_ONLY_PARAMS) {
            return error(
                &params[0],
                format!(
                    "variadic specifier can not be only parameter{}",
                    self.which(feature::VARIADIC_ONLY_PARAMS),
                ),
            );
        }
        self.param_redefinition(params)
    }

    fn knr_params(&mut self, ast: &Ast, params: &[Ast]) -> CheckResult {
        for param in params {
            match param.kind {
                Kind::Name => {}
                Kind::Variadic => {
                    return error(
                        param,
                        format!("ellipsis not supported{}", self.which(feature::PROTOTYPES)),
                    );
                }
                _ => {
                    return error(
                        param,
                        format!(
                            "{} prototypes not supported{}",
                            self.kind(ast),
                            self.which(feature::PROTOTYPES),
                        ),
                    );
                }
            }
        }
        self.param_redefinition(params)
    }

    fn param_redefinition(&mut self, params: &[Ast]) -> CheckResult {
        for (index, param) in params.iter().enumerate() {
            if param.sname.is_empty() {
                continue;
            }
            if params[..index].iter().any(|prev| prev.sname == param.sname) {
                return error(
                    param,
                    format!("\"{}\": redefinition of parameter", param.sname),
                );
            }
        }
        Ok(())
    }

    fn oper(&mut self, ast: &Ast, ret: Option<&Ast>, params: &[Ast], oper: OperId) -> CheckResult {
        let op = oper.get(self.lang);
        if !op.is_overloadable() {
            return error(ast, format!("operator {oper} can not be overloaded"));
        }
        if !self.lang.is_any(op.langs) {
            return error(
                ast,
                format!(
                    "overloading operator \"{oper}\" not supported{}",
                    self.which(op.langs),
                ),
            );
        }

        let member = match &ast.kind {
            Kind::Operator { func, .. } => func.member,
            _ => Member::Unspecified,
        };
        let mismatch = match member {
            Member::Member => op.overload == Overload::None,
            Member::NonMember => op.overload != Overload::Either,
            Member::Unspecified => false,
        };
        if mismatch {
            let only = match op.overload {
                Overload::Member => "member",
                _ => "non-member",
            };
            return error(ast, format!("operator {oper} can only be a {only}"));
        }

        if op.overload == Overload::Member && ast.ty.contains(TypeId::STATIC) {
            let allowed = match oper {
                OperId::Parens => feature::STATIC_OPER_PARENS,
                _ => LangIds::empty(),
            };
            if !self.lang.is_any(allowed) {
                return error(
                    ast,
                    format!("operator {oper} must be non-static{}", self.which(allowed)),
                );
            }
        }

        if oper.is_new_delete() {
            let bad = (ast.ty.storage() | ast.ty.qualifiers()) - TypeId::NEW_DELETE_OPER;
            if !bad.is_empty() {
                return error(ast, format!("operator {oper} can not be {}", self.name(bad)));
            }
        }

        if let Some(ret) = ret {
            match oper {
                OperId::Arrow if !ret.is_ptr_to(|to| to.is_ecsu_any(TypeId::ANY_CLASS)) => {
                    return error(
                        ast,
                        format!("operator {oper} must return a pointer to struct, union, or class"),
                    );
                }
                OperId::Delete | OperId::DeleteArray if !ret.is_builtin_any(TypeId::VOID) => {
                    return error(ast, format!("operator {oper} must return void"));
                }
                OperId::New | OperId::NewArray if !ret.is_ptr_to_type_any(TypeId::VOID) => {
                    return error(ast, format!("operator {oper} must return a pointer to void"));
                }
                _ => {}
            }
        }

        if ast.ty.contains(TypeId::DEFAULT) {
            if oper.is_relational() {
                self.relational_default(ast, ret, params, oper)?;
            } else if oper != OperId::Eq {
                let also = match self.lang.is_any(feature::DEFAULT_RELOPS) {
                    true => " and relational",
                    false => "",
                };
                return error(ast, format!("only operator ={also} operators can be default"));
            }
        }

        self.oper_params(ast, params, oper)
    }

    fn relational_default(
        &mut self,
        ast: &Ast,
        ret: Option<&Ast>,
        params: &[Ast],
        oper: OperId,
    ) -> CheckResult {
        if !self.lang.is_any(feature::DEFAULT_RELOPS) {
            return error(
                ast,
                format!(
                    "default operator {oper} not supported{}",
                    self.which(feature::DEFAULT_RELOPS),
                ),
            );
        }

        match oper_overload(ast, self.lang) {
            Member::NonMember => {
                if !ast.ty.contains(TypeId::FRIEND) {
                    return error(
                        ast,
                        format!("default non-member operator {oper} must also be friend"),
                    );
                }
                let same_class = match params {
                    [a, b] => match (passed_class(a), passed_class(b)) {
                        (Some(a), Some(b)) => a == b,
                        _ => false,
                    },
                    _ => false,
                };
                if !same_class {
                    return error(
                        ast,
                        "default non-member relational operators must take two value or reference-to-const parameters of the same class",
                    );
                }
            }
            _ => {
                if !ast.ty.contains(TypeId::CONST) {
                    return error(ast, format!("default member operator {oper} must also be const"));
                }
                let ok = matches!(params, [param] if passed_class(param).is_some());
                if !ok {
                    return error(
                        ast,
                        "default member relational operators must take one value or reference-to-const parameter to a class",
                    );
                }
            }
        }

        let Some(ret) = ret else {
            return Ok(());
        };
        if oper == OperId::LessEqGreater {
            let is_ordering = match &ret.kind {
                Kind::Typedef(typedef) => matches!(
                    typedef.sname().to_string().as_str(),
                    "std::partial_ordering" | "std::strong_ordering" | "std::weak_ordering"
                ),
                _ => false,
            };
            if !(is_ordering || ret.is_builtin_any(TypeId::AUTO)) {
                return error(
                    ast,
                    format!(
                        "operator {oper} must return one of auto, std::partial_ordering, std::strong_ordering, or std::weak_ordering",
                    ),
                );
            }
        } else if !(ret.untypedef().ty.base() == TypeId::BOOL) {
            return error(
                ast,
                format!("operator {oper} must return {}", self.name(TypeId::BOOL)),
            );
        }
        Ok(())
    }

    fn oper_params(&mut self, ast: &Ast, params: &[Ast], oper: OperId) -> CheckResult {
        let op = oper.get(self.lang);
        let member = oper_overload(ast, self.lang);
        let (min, max) = match member {
            Member::NonMember => {
                let max = op.params_max;
                let min = match op.is_ambiguous() || max == UNLIMITED {
                    true => 1,
                    false => max,
                };
                (min, max)
            }
            Member::Member => {
                let min = op.params_min;
                let max = match (op.is_ambiguous(), op.params_max) {
                    (_, UNLIMITED) => UNLIMITED,
                    (true, _) => 1,
                    (false, _) => min,
                };
                (min, max)
            }
            Member::Unspecified => (op.params_min, op.params_max),
        };
        let prefix = match member {
            Member::Member => "member ",
            Member::NonMember => "non-member ",
            Member::Unspecified => "",
        };

        let count = params.len();
        let location = params.first().unwrap_or(ast);
        if count < min {
            let message = match min == max {
                true => format!(
                    "{prefix}operator {oper} must have exactly {min} parameter{}",
                    plural(min),
                ),
                false => format!(
                    "{prefix}operator {oper} must have at least {min} parameter{}",
                    plural(min),
                ),
            };
            return error(location, message);
        }
        if count > max {
            let message = match min == max {
                true => format!(
                    "{prefix}operator {oper} must have exactly {max} parameter{}",
                    plural(max),
                ),
                false => format!(
                    "{prefix}operator {oper} can have at most {max} parameter{}",
                    plural(max),
                ),
            };
            return error(location, message);
        }

        match member {
            Member::NonMember if !oper.is_new_delete() => {
                let has_ecsu = params.iter().any(|param| {
                    param.is_ecsu_any(TypeId::ANY_ECSU)
                        || (param.is_reference() && param.unreference().is_ecsu_any(TypeId::ANY_ECSU))
                });
                if !has_ecsu {
                    return error(
                        ast,
                        "at least 1 parameter of a non-member operator must be an enum, class, struct, or union; or a reference or rvalue reference thereto",
                    );
                }
            }
            Member::Member if ast.ty.contains(TypeId::FRIEND) && ast.sname.is_empty() => {
                return error(ast, "member operators can not be friend");
            }
            _ => {}
        }

        if oper.has_postfix_form() {
            let skip = match member {
                Member::NonMember => 1,
                _ => 0,
            };
            if let Some(param) = params.get(skip) {
                let raw = param.untypedef();
                let is_int = matches!(raw.kind, Kind::Builtin)
                    && raw.ty.base().normalize() == TypeId::INT;
                if !is_int {
                    return error(
                        param,
                        format!("parameter of postfix {prefix}operator {oper} must be int"),
                    );
                }
            }
        }

        if let Some(first) = params.first() {
            if oper.is_delete() && !first.is_ptr_to_type_any(TypeId::VOID | TypeId::ANY_CLASS) {
                return error(
                    first,
                    format!(
                        "invalid parameter type for operator {oper}; must be a pointer to void, class, struct, or union",
                    ),
                );
            }
            if matches!(oper, OperId::New | OperId::NewArray) && !first.is_size_t() {
                return error(
                    first,
                    format!(
                        "invalid parameter type for operator {oper}; must be std::size_t (or equivalent)",
                    ),
                );
            }
        }
        Ok(())
    }

    fn ctor_dtor(&mut self, ast: &Ast) -> CheckResult {
        let kind = self.kind(ast);
        if !self.lang.is_cpp() {
            return error(
                ast,
                format!("{kind}s not supported{}", self.which(LangIds::CPP_ANY)),
            );
        }

        let is_definition = ast.sname.count() > 1;
        if is_definition && !ast.sname.is_ctor() {
            let scopes = ast.sname.scopes();
            let class = &scopes[scopes.len() - 2];
            let class_kind = match class.kind {
                ScopeKind::Struct | ScopeKind::Union => class.kind.keyword(),
                _ => "class",
            };
            return error(
                ast,
                format!(
                    "\"{}\", \"{}\": {class_kind} and {kind} names don't match",
                    class.name,
                    ast.sname.local_name(),
                ),
            );
        }

        let is_ctor = matches!(ast.kind, Kind::Constructor(_));
        let allowed = match (is_ctor, is_definition) {
            (true, true) => TypeId::CONSTRUCTOR_DEF,
            (true, false) => TypeId::CONSTRUCTOR_DECL,
            (false, true) => TypeId::DESTRUCTOR_DEF,
            (false, false) => TypeId::DESTRUCTOR_DECL,
        };
        let bad = (ast.ty.storage() | ast.ty.qualifiers()) - allowed;
        if !bad.is_empty() {
            let what = match is_definition {
                true => " definitions",
                false => "s",
            };
            return error(ast, format!("{kind}{what} can not be {}", self.name(bad)));
        }
        self.throw(ast)
    }

    fn conversion(&mut self, ast: &Ast, to: &Ast) -> CheckResult {
        let kind = self.kind(ast);
        let bad = (ast.ty.storage() | ast.ty.qualifiers()) - TypeId::USER_DEF_CONV;
        if !bad.is_empty() {
            return error(ast, format!("{kind} can not be {}", self.name(bad)));
        }
        if ast.ty.contains(TypeId::FRIEND) && ast.sname.is_empty() {
            return error(ast, format!("friend {kind} must use qualified name"));
        }
        if matches!(to.untypedef().kind, Kind::Array { .. }) {
            return error_hint(
                ast,
                format!("{kind} can not convert to an array"),
                "pointer to array",
            );
        }
        self.throw(ast)
    }

    fn udl_params(&mut self, ast: &Ast, params: &[Ast]) -> CheckResult {
        match params {
            [] => error(ast, "user-defined literal must have at least 1 parameter"),
            [param] => {
                let raw = param.untypedef();
                let base = raw.ty.base().normalize();
                let is_literal_type = matches!(raw.kind, Kind::Builtin)
                    && [
                        TypeId::CHAR,
                        TypeId::CHAR8_T,
                        TypeId::CHAR16_T,
                        TypeId::CHAR32_T,
                        TypeId::WCHAR_T,
                        TypeId::UNSIGNED | TypeId::LONG | TypeId::LONG_LONG | TypeId::INT,
                        TypeId::LONG | TypeId::DOUBLE,
                    ]
                    .contains(&base);
                if is_literal_type || param.is_ptr_to_type_any(TypeId::CONST | TypeId::CHAR) {
                    return Ok(());
                }
                let char8 = match self.lang.is_any(feature::CHAR8_T) {
                    true => "char8_t, ",
                    false => "",
                };
                error(
                    param,
                    format!(
                        "invalid parameter type for user-defined literal; must be one of: unsigned long long, long double, char, const char*, {char8}char16_t, char32_t, or wchar_t",
                    ),
                )
            }
            [chars, size] => {
                if !chars.is_ptr_to_type_any(TypeId::CONST | TypeId::ANY_CHAR) {
                    return error(
                        chars,
                        "invalid parameter type for user-defined literal; must be a pointer to const character type",
                    );
                }
                if !size.is_size_t() {
                    return error(
                        size,
                        "invalid parameter type for user-defined literal; must be std::size_t (or equivalent)",
                    );
                }
                Ok(())
            }
            [_, _, extra, ..] => error(extra, "user-defined literal may have at most 2 parameters"),
        }
    }

    fn restrict(&mut self, ast: &Ast) -> CheckResult {
        if !ast.ty.contains(TypeId::RESTRICT) {
            return Ok(());
        }
        let raw = ast.untypedef();
        match &raw.kind {
            Kind::Array { .. }
            | Kind::Reference(_)
            | Kind::RvalueReference(_)
            | Kind::PointerToMember { .. } => Ok(()),
            _ if raw.is_function_like() || matches!(raw.kind, Kind::Block(_)) => Ok(()),
            Kind::Pointer(to) => {
                let to = to.untypedef();
                match to.is_function_like() || matches!(to.kind, Kind::Block(_)) {
                    true => error(
                        ast,
                        format!("pointer to {} can not be restrict", self.kind(to)),
                    ),
                    false => Ok(()),
                }
            }
            _ => error(
                ast,
                format!("{} can not be {}", self.kind(raw), self.name(TypeId::RESTRICT)),
            ),
        }
    }

    // Types illegal in the current language

    fn types(&mut self, ast: &Ast) -> CheckResult {
        self.legal_type(ast, ast.ty)?;
        if let Kind::Array { qualifiers, .. } = ast.kind {
            self.legal_type(ast, qualifiers)?;
        }

        if ast.ty.contains(TypeId::CONSTEXPR) {
            if let Some(ret) = ast.func().and_then(|func| func.ret.as_deref()) {
                if ret.is_builtin_any(TypeId::VOID) && !self.lang.is_any(feature::CONSTEXPR_RETURN_VOID) {
                    return error(
                        ast,
                        format!(
                            "\"{} {}\" is illegal{}",
                            self.name(TypeId::CONSTEXPR),
                            self.name(TypeId::VOID),
                            self.which(feature::CONSTEXPR_RETURN_VOID),
                        ),
                    );
                }
            }
        }

        if !matches!(ast.kind, Kind::Array { .. }) && ast.ty.contains(TypeId::NON_EMPTY_ARRAY) {
            return error(ast, format!("{} can not be non-empty", self.kind(ast)));
        }

        if let Kind::Ecsu { of: Some(of), .. } = &ast.kind {
            self.types(of)?;
        }
        if let Align::Type(ty) = &ast.align {
            self.types(ty)?;
        }
        for param in ast.params() {
            self.types(param)?;
        }
        match ast.child() {
            Some(child) if !matches!(ast.kind, Kind::Ecsu { .. }) => self.types(child),
            _ => Ok(()),
        }
    }

    fn legal_type(&mut self, ast: &Ast, ty: TypeId) -> CheckResult {
        let langs = ty.check(self.lang);
        if langs == LangIds::ANY {
            return Ok(());
        }
        let family = match self.lang.is_c() {
            true => LangIds::C_ANY,
            false => LangIds::CPP_ANY,
        };
        let name = self.name(ty);
        let message = if langs.is_empty() {
            format!("\"{name}\" is illegal for {}", self.kind(ast))
        } else if langs.intersects(family) {
            format!("\"{name}\" is illegal; not supported{}", self.which(langs))
        } else {
            format!("\"{name}\" is illegal{}", self.which(langs))
        };
        error(ast, message)
    }

    // Warnings

    fn warnings(&mut self, ast: &Ast) {
        self.name_warnings(ast, &ast.sname);

        match &ast.kind {
            Kind::Builtin
            | Kind::Typedef(_)
            | Kind::Ecsu { .. }
            | Kind::Array { .. }
            | Kind::Pointer(_)
            | Kind::PointerToMember { .. }
            | Kind::Reference(_)
            | Kind::RvalueReference(_) => {
                if ast.ty.contains(TypeId::REGISTER)
                    && !self.lang.is_any(feature::REGISTER_UNDEPRECATED)
                {
                    let which = self.which(feature::REGISTER_UNDEPRECATED);
                    self.warn(ast, format!("\"register\" is deprecated{which}"));
                }
                match &ast.kind {
                    Kind::Ecsu { ecsu_sname, .. } => self.name_warnings(ast, ecsu_sname),
                    Kind::PointerToMember { class, .. } => self.name_warnings(ast, class),
                    _ => {}
                }
            }
            Kind::Name => {
                if self.lang.is_any(feature::PROTOTYPES) {
                    self.warn(ast, "missing type specifier; int assumed");
                }
            }
            _ => {}
        }

        if let Kind::UserDefLiteral(_) = ast.kind {
            if !ast.sname.local_name().starts_with('_') {
                self.warn(ast, "user-defined literals not starting with '_' are reserved");
            }
        }

        if let Some(func) = ast.func() {
            if let Some(ret) = func.ret.as_deref() {
                if self.lang >= Lang::CPP_20 && ret.ty.contains(TypeId::VOLATILE) {
                    let which = self.which(lang::cpp_max(Lang::CPP_17));
                    self.warn(ret, format!("\"volatile\" return types are deprecated{which}"));
                }
                if ast.ty.contains(TypeId::NODISCARD) && ret.is_builtin_any(TypeId::VOID) {
                    let message = format!(
                        "{} {}s can not return void",
                        self.name(TypeId::NODISCARD),
                        self.kind(ast),
                    );
                    self.warn(ast, message);
                }
            }
            for param in &func.params {
                if self.lang >= Lang::CPP_20 && param.ty.contains(TypeId::VOLATILE) {
                    let which = self.which(lang::cpp_max(Lang::CPP_17));
                    self.warn(param, format!("\"volatile\" parameter types are deprecated{which}"));
                }
                self.warnings(param);
            }
        }

        if ast.ty.contains(TypeId::THROW)
            && self.lang.is_any(feature::NOEXCEPT)
            && !self.lang.is_any(feature::THROW_UNDEPRECATED)
        {
            let which = self.which(feature::THROW_UNDEPRECATED);
            self.warnings.push(
                SemanticMessage::warning(ast.range, format!("\"throw\" is deprecated{which}"))
                    .with_hint("noexcept"),
            );
        }

        if let Some(child) = ast.child() {
            if !matches!(ast.kind, Kind::Ecsu { .. }) {
                self.warnings(child);
            }
        }
    }

    fn name_warnings(&mut self, ast: &Ast, sname: &Sname) {
        for name in sname.names() {
            if let Some(keyword) = keywords::find_in_any(name) {
                if let Some(oldest) = lang::oldest(keyword.langs) {
                    self.warn(ast, format!("\"{name}\" is a keyword in {oldest}"));
                    continue;
                }
            }
            let reserved = lang::reserved_in(name);
            if self.lang.is_any(reserved) {
                let family = match lang::coarse_name(reserved) {
                    Some(family) => format!(" in {family}"),
                    None => String::new(),
                };
                self.warn(ast, format!("\"{name}\" is a reserved identifier{family}"));
            }
        }
    }
}

/// The name of the class, struct, or union `ast` is, if any.
fn class_sname(ast: &Ast) -> Option<&Sname> {
    match &ast.untypedef().kind {
        Kind::Ecsu { ecsu_sname, .. } if ast.is_ecsu_any(TypeId::ANY_CLASS) => Some(ecsu_sname),
        _ => None,
    }
}

/// The class a parameter passes by value or by reference to `const`.
fn passed_class(param: &Ast) -> Option<&Sname> {
    if param.is_reference() {
        let to = param.unreference();
        let is_const = match &param.untypedef().kind {
            Kind::Reference(of) => of.ty.contains(TypeId::CONST) || to.ty.contains(TypeId::CONST),
            _ => false,
        };
        return is_const.then(|| class_sname(to)).flatten();
    }
    class_sname(param)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::parse::{self, Command};
    use crate::session::Session;

    fn session(lang: Lang) -> Session {
        Session::new(Options {
            lang,
            ..Options::default()
        })
    }

    /// Check the declarations a `declare`, `explain`, or `cast` command makes.
    fn check(source: &str, lang: Lang) -> Result<Vec<SemanticMessage>, SemanticMessage> {
        let session = session(lang);
        let parsed = parse::command(source, &session).unwrap();
        match parsed.command.unwrap() {
            Command::Declare(asts) | Command::Explain(asts) => check_decls(&asts, lang),
            Command::Cast { kind, sname, ast } | Command::ExplainCast { kind, sname, ast } => {
                check_cast(kind, &sname, &ast, lang)
            }
            command => panic!("unexpected command: {command:?}"),
        }
    }

    fn error_message(source: &str, lang: Lang) -> String {
        match check(source, lang) {
            Ok(warnings) => panic!("expected an error for `{source}`, got {warnings:?}"),
            Err(error) => error.message,
        }
    }

    fn warning_messages(source: &str, lang: Lang) -> Vec<String> {
        match check(source, lang) {
            Ok(warnings) => warnings.into_iter().map(|warning| warning.message).collect(),
            Err(error) => panic!("unexpected error for `{source}`: {}", error.message),
        }
    }

    fn is_legal(source: &str, lang: Lang) -> bool {
        check(source, lang).is_ok()
    }

    #[test]
    fn array_of_function() {
        let session = session(Lang::C_17);
        let parsed = parse::command("declare x as array of function returning int", &session);
        let Some(Command::Declare(asts)) = parsed.unwrap().command else {
            panic!("expected a declaration");
        };
        let error = check_decls(&asts, Lang::C_17).unwrap_err();
        assert_eq!(error.message, "array of function");
        assert_eq!(error.hint.as_deref(), Some("array of pointer to function"));
    }

    #[test]
    fn bool_before_c99() {
        assert_eq!(
            error_message("declare x as _Bool", Lang::C_89),
            "\"_Bool\" is illegal; not supported until C99",
        );
        assert!(is_legal("declare x as _Bool", Lang::C_99));
    }

    #[test]
    fn constructor_names() {
        assert_eq!(
            error_message("declare S::T as friend default constructor", Lang::CPP_20),
            "\"S\", \"T\": class and constructor names don't match",
        );
        assert!(is_legal("declare S::S as constructor (int)", Lang::CPP_20));
    }

    #[test]
    fn non_member_operator_needs_class_param() {
        assert_eq!(
            error_message(
                "declare + as non-member operator (int, int) returning int",
                Lang::CPP_17,
            ),
            "at least 1 parameter of a non-member operator must be an enum, class, struct, or union; or a reference or rvalue reference thereto",
        );
        assert!(is_legal(
            "declare + as non-member operator (struct S, int) returning struct S",
            Lang::CPP_17,
        ));
    }

    #[test]
    fn casts() {
        assert_eq!(
            error_message("cast x into array 4 of int", Lang::C_17),
            "\"x\": arithmetic or pointer type expected",
        );
        assert_eq!(
            error_message("cast x into function returning int", Lang::C_17),
            "can not cast into function",
        );
        assert_eq!(
            error_message("reinterpret cast x into void", Lang::CPP_17),
            "reinterpret_cast can not be to void",
        );
        assert!(is_legal("cast x into pointer to int", Lang::C_17));
    }

    #[test]
    fn void_params() {
        assert!(is_legal("explain int f(void)", Lang::C_17));
        assert_eq!(
            error_message("explain int f(void, int)", Lang::C_17),
            "\"void\" must be only parameter if specified",
        );
        assert_eq!(
            error_message("explain int f(void x)", Lang::C_17),
            "void as parameter can not have a name",
        );
    }

    #[test]
    fn variadic_params() {
        assert_eq!(
            error_message("explain int f(..., int)", Lang::C_17),
            "variadic specifier must be last",
        );
        assert_eq!(
            error_message("explain int f(...)", Lang::C_17),
            "variadic specifier can not be only parameter until C23",
        );
        assert!(is_legal("explain int f(...)", Lang::C_23));
        assert!(is_legal("explain int f(...)", Lang::CPP_17));
    }

    #[test]
    fn knr_functions() {
        assert_eq!(
            error_message("explain int f(int)", Lang::C_KNR),
            "function prototypes not supported until C89",
        );
        assert!(is_legal("explain int f()", Lang::C_KNR));
    }

    #[test]
    fn pointers_and_references() {
        assert_eq!(
            error_message("declare p as pointer to reference to int", Lang::CPP_17),
            "pointer to reference is illegal",
        );
        assert_eq!(
            error_message("declare r as reference to void", Lang::CPP_17),
            "reference to void is illegal",
        );
        assert_eq!(
            error_message("declare r as reference to int", Lang::C_17),
            "reference not supported in C",
        );
        assert_eq!(
            error_message("declare p as pointer to register int", Lang::C_17),
            "pointer to register is illegal",
        );
    }

    #[test]
    fn arrays() {
        assert_eq!(
            error_message("declare a as array of void", Lang::C_17),
            "array of void",
        );
        assert_eq!(
            error_message("explain int a[][]", Lang::C_17),
            "array dimension required",
        );
        assert_eq!(
            error_message("declare a as array 0 of int", Lang::C_17),
            "array size must be greater than 0",
        );
        assert!(is_legal("explain int a[][4]", Lang::C_17));
        assert!(is_legal("explain void f(int a[*])", Lang::C_17));
        assert_eq!(
            error_message("explain void f(int a[*])", Lang::C_89),
            "variable length arrays not supported until C99",
        );
    }

    #[test]
    fn returns() {
        assert_eq!(
            error_message("declare f as function returning array 3 of int", Lang::C_17),
            "function returning array",
        );
        assert_eq!(
            error_message("declare f as function returning function returning int", Lang::C_17),
            "function returning function is illegal",
        );
    }

    #[test]
    fn void_variables() {
        assert_eq!(error_message("explain void x", Lang::C_17), "variable of void");
        assert!(is_legal("explain extern void x", Lang::C_17));
        assert!(is_legal("explain void *x", Lang::C_17));
    }

    #[test]
    fn virtual_functions() {
        assert_eq!(
            error_message("explain virtual void S::f()", Lang::CPP_17),
            "\"S::f\": virtual can not be used in file-scoped functions",
        );
        assert!(is_legal("explain virtual void f() = 0", Lang::CPP_17));
    }

    #[test]
    fn postfix_operators() {
        assert_eq!(
            error_message("explain struct S operator++(struct S&, double)", Lang::CPP_17),
            "parameter of postfix non-member operator ++ must be int",
        );
        assert!(is_legal("explain struct S operator++(struct S&, int)", Lang::CPP_17));
    }

    #[test]
    fn operator_param_counts() {
        assert_eq!(
            error_message("explain bool operator!(int, int, int)", Lang::CPP_17),
            "operator ! can have at most 1 parameter",
        );
    }

    #[test]
    fn redefinitions() {
        assert_eq!(
            error_message("explain int x, x", Lang::CPP_17),
            "\"x\": redefinition",
        );
        assert!(is_legal("explain int x, x", Lang::C_17));
        assert_eq!(
            error_message("explain int x, *x", Lang::C_17),
            "\"x\": redefinition with different type",
        );
        assert_eq!(
            error_message("explain int f(int x, int x)", Lang::C_17),
            "\"x\": redefinition of parameter",
        );
    }

    #[test]
    fn implicit_int() {
        assert!(is_legal("explain static x", Lang::C_89));
        assert_eq!(
            error_message("explain static x", Lang::C_99),
            "implicit \"int\" is illegal since C99",
        );
    }

    #[test]
    fn warnings() {
        assert_eq!(
            warning_messages("explain register int x", Lang::CPP_11),
            ["\"register\" is deprecated since C++11"],
        );
        assert!(warning_messages("explain register int x", Lang::C_17).is_empty());
        assert_eq!(
            warning_messages("explain int class", Lang::C_17),
            ["\"class\" is a keyword in C++98"],
        );
        assert_eq!(
            warning_messages("explain int _X", Lang::C_17),
            ["\"_X\" is a reserved identifier"],
        );
    }
}
