//! Pseudo-English declarations, e.g. `declare p as pointer to int`.
//!
//! The output reads from the declared name inwards and parses back as the
//! same declaration.

use crate::ast::{util, Align, ArraySize, Ast, Func, Kind, Member};
use crate::parse::CastKind;
use crate::sname::{ScopeKind, Sname};
use crate::typedefs::Typedef;
use crate::types::TypeId;

use super::Style;

struct Printer<'s> {
    style: &'s Style,
}

/// Print each declaration on a line of its own.
pub fn decls(asts: &[Ast], style: &Style) -> String {
    asts.iter()
        .map(|ast| decl(ast, style))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a declaration as a `declare` or `define` command, or as a bare type
/// if nothing is declared.
pub fn decl(ast: &Ast, style: &Style) -> String {
    let printer = Printer { style };
    let typedef = ast.ty.contains(TypeId::TYPEDEF);
    let mut ast = ast.clone();
    ast.ty -= TypeId::TYPEDEF;
    let english = format!("{}{}", printer.phrase(&ast), printer.suffix(&ast));

    if typedef {
        return format!("define {} as {english}", ast.sname.english());
    }
    match &ast.kind {
        Kind::Operator { oper, .. } => {
            let mut name = oper.literal().to_owned();
            if !ast.sname.is_empty() {
                name.push_str(&of_scope(&ast.sname));
            }
            format!("declare {name} as {english}")
        }
        // The class is part of the phrase.
        Kind::UserDefConversion(_) => format!("declare {english}"),
        _ if ast.sname.is_empty() => english,
        _ => format!("declare {} as {english}", ast.sname.english()),
    }
}

/// Print just the type, e.g. `pointer to char`.
pub fn ty(ast: &Ast, style: &Style) -> String {
    Printer { style }.phrase(ast)
}

/// Print a cast, e.g. `static cast p into pointer to char`.
pub fn cast(kind: CastKind, sname: &Sname, ast: &Ast, style: &Style) -> String {
    let name = sname.english();
    let ty = ty(ast, style);
    let mut words = Vec::new();
    words.extend(kind.english());
    words.push("cast");
    if !name.is_empty() {
        words.push(&name);
    }
    words.push("into");
    words.push(&ty);
    words.join(" ")
}

/// Print a registered type name as the `define` command that would register
/// it.
pub fn typedef(typedef: &Typedef, style: &Style) -> String {
    let printer = Printer { style };
    let mut ast = typedef.ast.clone();
    ast.ty -= TypeId::TYPEDEF;
    format!("define {} as {}", typedef.sname().english(), printer.phrase(&ast))
}

/// ` of class S`, naming the scope a member belongs to.
fn of_scope(sname: &Sname) -> String {
    format!(" of {} {}", sname.local_kind().english(), sname.english())
}

fn push_non_empty(words: &mut Vec<String>, text: String) {
    if !text.is_empty() {
        words.push(text);
    }
}

impl<'s> Printer<'s> {
    fn type_words(&self, ty: TypeId) -> String {
        ty.name(&self.style.english_names())
    }

    fn phrase(&self, ast: &Ast) -> String {
        let mut words = Vec::new();
        match &ast.kind {
            Kind::Placeholder => {}
            Kind::Builtin => push_non_empty(&mut words, self.type_words(ast.ty)),
            Kind::Name => words.push(ast.sname.to_string()),
            Kind::Variadic => words.push("...".to_owned()),
            Kind::Typedef(typedef) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.push(typedef.sname().english());
            }
            Kind::Ecsu { of, ecsu_sname } => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.push(ecsu_sname.english());
                if let Some(of) = of {
                    words.push("of type".to_owned());
                    words.push(self.phrase(of));
                }
            }
            Kind::Array { of, size, qualifiers } => {
                let quals = *qualifiers - TypeId::NON_EMPTY_ARRAY;
                push_non_empty(&mut words, self.type_words(ast.ty | quals));
                if qualifiers.contains(TypeId::NON_EMPTY_ARRAY) {
                    words.push("non-empty".to_owned());
                }
                words.push(match size {
                    ArraySize::None => "array of".to_owned(),
                    ArraySize::Int(size) => format!("array {size} of"),
                    ArraySize::Vla => "variable length array of".to_owned(),
                });
                words.push(self.phrase(of));
            }
            Kind::Pointer(to) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.push("pointer to".to_owned());
                words.push(self.phrase(to));
            }
            Kind::PointerToMember { of, class } => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                let kind = match class.local_kind() {
                    ScopeKind::Scope => ScopeKind::Class,
                    kind => kind,
                };
                words.push(format!("pointer to member of {} {}", kind.english(), class.english()));
                words.push(self.phrase(of));
            }
            Kind::Reference(to) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.push("reference to".to_owned());
                words.push(self.phrase(to));
            }
            Kind::RvalueReference(to) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.push("rvalue reference to".to_owned());
                words.push(self.phrase(to));
            }
            Kind::Function(func) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                let member = match func.member {
                    Member::Unspecified if ast.ty.intersects(TypeId::MEMBER_FUNC_ONLY) => Member::Member,
                    member => member,
                };
                words.extend(member_word(member));
                words.push("function".to_owned());
                self.func(&mut words, func);
            }
            Kind::Block(func) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.push("block".to_owned());
                self.func(&mut words, func);
            }
            Kind::Constructor(func) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.push("constructor".to_owned());
                self.func(&mut words, func);
            }
            Kind::Destructor(func) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.push("destructor".to_owned());
                self.func(&mut words, func);
            }
            Kind::Operator { func, .. } => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.extend(member_word(util::oper_overload(ast, self.style.lang)));
                words.push("operator".to_owned());
                self.func(&mut words, func);
            }
            Kind::UserDefConversion(to) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                let mut phrase = "user-defined conversion operator".to_owned();
                if !ast.sname.is_empty() {
                    phrase.push_str(&of_scope(&ast.sname));
                }
                words.push(phrase);
                words.push("returning".to_owned());
                words.push(self.phrase(to));
            }
            Kind::UserDefLiteral(func) => {
                push_non_empty(&mut words, self.type_words(ast.ty));
                words.push("user-defined literal".to_owned());
                self.func(&mut words, func);
            }
        }
        words.join(" ")
    }

    /// `(params) returning T`, leaving out whichever part is absent.
    fn func(&self, words: &mut Vec<String>, func: &Func) {
        if !func.params.is_empty() {
            let params = func
                .params
                .iter()
                .map(|param| self.param(param))
                .collect::<Vec<_>>();
            words.push(format!("({})", params.join(", ")));
        }
        if let Some(ret) = &func.ret {
            words.push("returning".to_owned());
            words.push(self.phrase(ret));
        }
    }

    fn param(&self, param: &Ast) -> String {
        match param.kind {
            Kind::Variadic => "...".to_owned(),
            // An untyped K&R C parameter is an `int`.
            Kind::Name => format!("{} as int", param.sname),
            _ if param.sname.is_empty() => self.phrase(param),
            _ => format!("{} as {}", param.sname, self.phrase(param)),
        }
    }

    /// ` width N bits` and ` aligned as N bytes`.
    fn suffix(&self, ast: &Ast) -> String {
        let mut suffix = String::new();
        if ast.bit_width > 0 {
            suffix.push_str(&format!(" width {} bits", ast.bit_width));
        }
        match &ast.align {
            Align::None => {}
            Align::Bytes(bytes) => suffix.push_str(&format!(" aligned as {bytes} bytes")),
            Align::Type(ty) => suffix.push_str(&format!(" aligned as {}", self.phrase(ty))),
        }
        suffix
    }
}

fn member_word(member: Member) -> Option<String> {
    match member {
        Member::Unspecified => None,
        Member::Member => Some("member".to_owned()),
        Member::NonMember => Some("non-member".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::Lang;
    use crate::options::Options;
    use crate::parse::{self, Command};
    use crate::session::Session;
    use crate::typedefs::Typedefs;

    fn style(lang: Lang) -> Style {
        Style::new(&Options {
            lang,
            ..Options::default()
        })
    }

    fn explain(source: &str, lang: Lang) -> String {
        let typedefs = Typedefs::with_predefined();
        let asts = parse::gibberish_decls(source, lang, &typedefs).unwrap();
        decls(&asts, &style(lang))
    }

    /// Parse a `declare` command and print it back.
    fn redeclare(source: &str, lang: Lang) -> String {
        let session = Session::new(Options {
            lang,
            ..Options::default()
        });
        let parsed = parse::command(source, &session).unwrap();
        let Some(Command::Declare(asts)) = parsed.command else {
            panic!("{:?}", parsed.command)
        };
        decls(&asts, &style(lang))
    }

    #[test]
    fn pointers_and_functions() {
        assert_eq!(
            explain("int (*p)(char, double)", Lang::CPP_23),
            "declare p as pointer to function (char, double) returning int"
        );
        assert_eq!(
            explain("char *const *p", Lang::C_17),
            "declare p as pointer to const pointer to char"
        );
        assert_eq!(explain("int f()", Lang::C_17), "declare f as function returning int");
        assert_eq!(
            explain("void f(int x, ...)", Lang::C_17),
            "declare f as function (x as int, ...) returning void"
        );
    }

    #[test]
    fn arrays() {
        assert_eq!(
            explain("const int *a[10]", Lang::C_17),
            "declare a as array 10 of pointer to const int"
        );
        assert_eq!(
            explain("void f(int a[const static 4])", Lang::C_99),
            "declare f as function (a as const non-empty array 4 of int) returning void"
        );
        assert_eq!(
            explain("void f(int a[*])", Lang::C_99),
            "declare f as function (a as variable length array of int) returning void"
        );
    }

    #[test]
    fn storage_and_members() {
        assert_eq!(
            explain("static unsigned long x", Lang::C_17),
            "declare x as static unsigned long int"
        );
        assert_eq!(
            explain("virtual int f() const = 0", Lang::CPP_17),
            "declare f as pure virtual const member function returning int"
        );
        assert_eq!(explain("int S::x", Lang::CPP_17), "declare x of scope S as int");
        assert_eq!(
            explain("int C::*p", Lang::CPP_17),
            "declare p as pointer to member of class C int"
        );
    }

    #[test]
    fn type_names() {
        assert_eq!(explain("size_t n", Lang::C_17), "declare n as size_t");
        assert_eq!(explain("enum E e", Lang::C_17), "declare e as enum E");
        assert_eq!(explain("typedef int *T", Lang::C_17), "define T as pointer to int");
    }

    #[test]
    fn special_members() {
        let cpp = Lang::CPP_17;
        assert_eq!(
            redeclare("declare + as member operator (int) returning bool", cpp),
            "declare + as member operator (int) returning bool"
        );
        assert_eq!(
            redeclare("declare ~S as virtual destructor", cpp),
            "declare S as virtual destructor"
        );
        assert_eq!(
            redeclare("declare user-defined conversion operator of class C returning int", cpp),
            "declare user-defined conversion operator of class C returning int"
        );
        assert_eq!(
            redeclare("declare _x as user-defined literal (unsigned long long) returning int", cpp),
            "declare _x as user-defined literal (unsigned long long int) returning int"
        );
    }

    #[test]
    fn bit_fields_and_alignment() {
        assert_eq!(
            redeclare("declare x as unsigned int width 3 bits", Lang::C_17),
            "declare x as unsigned int width 3 bits"
        );
        assert_eq!(
            redeclare("declare x as int aligned as 8 bytes", Lang::C_17),
            "declare x as int aligned as 8 bytes"
        );
    }

    #[test]
    fn english_types() {
        let style = Style {
            english_types: true,
            ..style(Lang::C_17)
        };
        let ast = parse::english_decl("pointer to const int", Lang::C_17, &Typedefs::new()).unwrap();
        assert_eq!(ty(&ast, &style), "pointer to constant integer");
    }

    #[test]
    fn casts() {
        let c17 = style(Lang::CPP_17);
        let ast = parse::english_decl("pointer to char", Lang::CPP_17, &Typedefs::new()).unwrap();
        assert_eq!(
            cast(CastKind::Static, &Sname::from("p"), &ast, &c17),
            "static cast p into pointer to char"
        );
        assert_eq!(cast(CastKind::C, &Sname::new(), &ast, &c17), "cast into pointer to char");
    }

    #[test]
    fn defines() {
        let typedefs = Typedefs::with_predefined();
        let size_t = typedefs.find(&Sname::from("size_t")).unwrap();
        assert_eq!(typedef(size_t, &style(Lang::C_17)), "define size_t as unsigned long int");
    }
}
