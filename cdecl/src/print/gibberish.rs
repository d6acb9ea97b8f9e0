//! C/C++ declarations.
//!
//! A declaration prints as type words followed by a declarator. The
//! declarator is built from the declared name outwards by walking the tree
//! from its root: pointers and references prefix it, arrays and functions
//! suffix it, and a prefix followed by a suffix needs parentheses, as in
//! `(*p)[4]`.

use crate::ast::{Align, ArraySize, Ast, Kind};
use crate::lang::{feature, Lang};
use crate::operators::Graph;
use crate::options::WestDecl;
use crate::parse::CastKind;
use crate::sname::{ScopeKind, Sname};
use crate::typedefs::Typedef;
use crate::types::{NameStyle, TypeId};

use super::Style;

/// Storage-class-like bits printed after a function's parameters rather than
/// before its return type.
const FUNC_SUFFIX_STORAGE: TypeId = TypeId::NOEXCEPT
    .union(TypeId::THROW)
    .union(TypeId::FINAL)
    .union(TypeId::OVERRIDE)
    .union(TypeId::PURE_VIRTUAL)
    .union(TypeId::DEFAULT)
    .union(TypeId::DELETE);

/// What the type words of a declaration are made of.
enum Base<'a> {
    /// The bottom of the declarator chain.
    Leaf(&'a Ast),
    /// `auto` standing in for a trailing return type.
    Auto,
    /// Constructors, destructors and conversion operators have no type.
    None,
}

/// A declaration split into its type words and its declarator.
struct Parts {
    words: String,
    declarator: String,
}

impl Parts {
    fn join(&self) -> String {
        match (self.words.is_empty(), self.declarator.is_empty()) {
            (_, true) => self.words.clone(),
            (true, false) => self.declarator.clone(),
            (false, false) => format!("{} {}", self.words, self.declarator),
        }
    }
}

struct Printer<'s> {
    style: &'s Style,
}

/// Print declarations that share a type, e.g. `int *x, *y;`.
pub fn decls(asts: &[Ast], style: &Style) -> String {
    let printer = Printer { style };
    let Some(first) = asts.first() else {
        return String::new();
    };
    let semicolon = if style.semicolon { ";" } else { "" };
    if printer.is_using(first) {
        return asts
            .iter()
            .map(|ast| format!("{}{semicolon}", printer.using(ast)))
            .collect::<Vec<_>>()
            .join("\n");
    }

    let parts = asts.iter().map(|ast| printer.parts(ast)).collect::<Vec<_>>();
    if parts.iter().all(|part| part.words == parts[0].words) {
        let declarators = parts
            .iter()
            .map(|part| part.declarator.as_str())
            .filter(|declarator| !declarator.is_empty())
            .collect::<Vec<_>>();
        let first = Parts {
            words: parts[0].words.clone(),
            declarator: declarators.join(", "),
        };
        return format!("{}{semicolon}", first.join());
    }
    parts
        .iter()
        .map(|part| format!("{}{semicolon}", part.join()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a single declaration.
pub fn decl(ast: &Ast, style: &Style) -> String {
    decls(std::slice::from_ref(ast), style)
}

/// Print a type without a name, e.g. `char *`.
pub fn type_name(ast: &Ast, style: &Style) -> String {
    let printer = Printer { style };
    printer.type_name(ast)
}

/// Print a cast, e.g. `(char *)p` or `static_cast<char *>(p)`.
pub fn cast(kind: CastKind, sname: &Sname, ast: &Ast, style: &Style) -> String {
    let ty = type_name(ast, style);
    match kind.keyword() {
        Some(keyword) => format!("{keyword}<{ty}>({sname})"),
        None => format!("({ty}){sname}"),
    }
}

/// Print a registered type name as the declaration that would register it,
/// wrapped in its enclosing scopes, e.g. `namespace std { typedef unsigned
/// long size_t; }`.
pub fn typedef(typedef: &Typedef, style: &Style) -> String {
    let printer = Printer { style };
    let sname = typedef.sname();
    let mut ast = typedef.ast.clone();
    ast.sname = Sname::from_name(sname.local_name());

    let text = match printer.ecsu_decl(&typedef.ast) {
        Some(text) => text,
        None => {
            ast.ty |= TypeId::TYPEDEF;
            match printer.is_using(&ast) {
                true => format!("{};", printer.using(&ast)),
                false => format!("{};", printer.parts(&ast).join()),
            }
        }
    };
    match (sname.count() > 1, style.semicolon) {
        (true, _) | (false, true) => scoped(sname, text),
        // Only the outermost declaration can go without a semicolon.
        (false, false) => text.trim_end_matches(';').to_owned(),
    }
}

/// Wrap `text` in the scopes of `sname`.
fn scoped(sname: &Sname, text: String) -> String {
    let scopes = sname.scopes();
    let outer = &scopes[..scopes.len().saturating_sub(1)];
    outer.iter().rev().fold(text, |text, scope| {
        let (keyword, close) = match scope.kind {
            ScopeKind::Scope => ("namespace", "}"),
            kind if kind.is_namespace() => (kind.keyword(), "}"),
            kind => (kind.keyword(), "};"),
        };
        format!("{keyword} {} {{ {text} {close}", scope.name)
    })
}

impl<'s> Printer<'s> {
    fn lang(&self) -> Lang {
        self.style.lang
    }

    fn names(&self) -> NameStyle {
        self.style.gibberish_names()
    }

    fn type_name(&self, ast: &Ast) -> String {
        let mut ast = ast.clone();
        ast.sname = Sname::new();
        self.parts(&ast).join()
    }

    /// Should `ast` print as `using NAME = TYPE;`?
    fn is_using(&self, ast: &Ast) -> bool {
        self.style.using
            && ast.ty.contains(TypeId::TYPEDEF)
            && self.lang().is_any(feature::USING_DECLARATION)
    }

    /// `using NAME = TYPE` without the semicolon.
    fn using(&self, ast: &Ast) -> String {
        let mut ty = ast.clone();
        ty.ty -= TypeId::TYPEDEF;
        format!("using {} = {}", ast.sname, self.type_name(&ty))
    }

    /// `struct S;` or `enum class E : int;` if `ast` declares a class-like
    /// type rather than naming one.
    fn ecsu_decl(&self, ast: &Ast) -> Option<String> {
        let Kind::Ecsu { of, ecsu_sname } = &ast.kind else {
            return None;
        };
        if ast.ty.contains(TypeId::TYPEDEF) || ast.sname != *ecsu_sname {
            return None;
        }
        let keyword = ast.ty.base().name_c(self.lang());
        let mut text = format!("{keyword} {}", ecsu_sname.local_name());
        if let Some(of) = of {
            text.push_str(" : ");
            text.push_str(&self.type_name(of));
        }
        text.push(';');
        Some(text)
    }

    fn parts(&self, ast: &Ast) -> Parts {
        let trailing = self.style.trailing_return
            && self.lang().is_any(feature::TRAILING_RETURN)
            && ast.is_function_like()
            && !matches!(ast.kind, Kind::UserDefConversion(_))
            && ast.func().map_or(false, |func| func.ret.is_some());

        let (mut declarator, base) = self.declarator(ast, self.name(ast), trailing);
        if ast.bit_width > 0 {
            declarator = format!("{declarator} : {}", ast.bit_width);
        }

        let mut words = self.alignment(ast);
        words.extend(self.type_words(ast, base));
        let mut words = words.join(" ");

        if self.is_west(ast) {
            let ops = declarator
                .find(|c| c != '*' && c != '&')
                .unwrap_or(declarator.len());
            if ops > 0 {
                words.push_str(&declarator[..ops]);
                declarator = declarator[ops..].trim_start().to_owned();
            }
        }
        Parts { words, declarator }
    }

    /// Print `*` and `&` next to the type rather than the name?
    fn is_west(&self, ast: &Ast) -> bool {
        let kind = match ast.kind {
            Kind::Block(_) => WestDecl::BLOCK,
            Kind::Function(_) | Kind::Constructor(_) | Kind::Destructor(_) => WestDecl::FUNC,
            Kind::UserDefLiteral(_) => WestDecl::LITERAL,
            Kind::Operator { .. } => WestDecl::OPERATOR,
            Kind::UserDefConversion(_) => WestDecl::CONVERSION,
            _ => WestDecl::NON_FUNC,
        };
        self.style.west_decl.contains(kind)
    }

    /// The declared name, which for operators and the like includes the
    /// `operator` keyword.
    fn name(&self, ast: &Ast) -> String {
        let sname = &ast.sname;
        let scope = |sname: &Sname| match sname.is_empty() {
            true => String::new(),
            false => format!("{sname}::"),
        };
        match &ast.kind {
            Kind::Destructor(_) => {
                format!("{}~{}", scope(&sname.scope_sname()), sname.local_name())
            }
            Kind::Operator { oper, .. } => {
                let token = oper.token(self.style.alt_tokens, self.style.graph);
                let space = if token.starts_with(char::is_alphabetic) { " " } else { "" };
                format!("{}operator{space}{token}", scope(sname))
            }
            Kind::UserDefConversion(to) => {
                let mut to = self.type_name(to);
                if self.is_west(ast) {
                    to = to.replace(" *", "*").replace(" &", "&");
                }
                format!("{}operator {to}", scope(sname))
            }
            Kind::UserDefLiteral(_) => {
                format!("{}operator\"\" {}", scope(&sname.scope_sname()), sname.local_name())
            }
            _ => sname.to_string(),
        }
    }

    /// The declarator around `name`, and what the type words are made of.
    fn declarator<'a>(&self, root: &'a Ast, name: String, trailing: bool) -> (String, Base<'a>) {
        let mut decl = name;
        // The last thing added was a prefix like `*`, so a suffix needs
        // parentheses.
        let mut prefix = false;
        let mut node = root;
        loop {
            match &node.kind {
                Kind::Pointer(_) => {
                    decl = self.prefixed("*", node.ty, &decl);
                    prefix = true;
                }
                Kind::PointerToMember { class, .. } => {
                    decl = self.prefixed(&format!("{class}::*"), node.ty, &decl);
                    prefix = true;
                }
                Kind::Reference(_) => {
                    let op = if self.style.alt_tokens { "bitand " } else { "&" };
                    decl = self.prefixed(op, node.ty, &decl);
                    prefix = true;
                }
                Kind::RvalueReference(_) => {
                    let op = if self.style.alt_tokens { "and " } else { "&&" };
                    decl = self.prefixed(op, node.ty, &decl);
                    prefix = true;
                }
                Kind::Array { size, qualifiers, .. } => {
                    if prefix {
                        decl = format!("({decl})");
                    }
                    decl.push_str(&self.brackets(*size, *qualifiers));
                    prefix = false;
                }
                Kind::Block(func) => {
                    let inner = self.prefixed("^", node.ty.qualifiers(), &decl);
                    decl = format!("({inner})({})", self.params(&func.params));
                    prefix = false;
                }
                Kind::Function(func)
                | Kind::Constructor(func)
                | Kind::Destructor(func)
                | Kind::Operator { func, .. }
                | Kind::UserDefLiteral(func) => {
                    if prefix {
                        decl = format!("({decl})");
                    }
                    decl.push('(');
                    decl.push_str(&self.params(&func.params));
                    decl.push(')');
                    decl.push_str(&self.qualifier_suffix(node.ty));
                    match (&func.ret, trailing && std::ptr::eq(node, root)) {
                        (Some(ret), true) => {
                            decl.push_str(" -> ");
                            decl.push_str(&self.type_name(ret));
                            decl.push_str(&self.virtual_suffix(node.ty));
                            return (decl, Base::Auto);
                        }
                        (Some(_), false) => decl.push_str(&self.virtual_suffix(node.ty)),
                        (None, _) => {
                            decl.push_str(&self.virtual_suffix(node.ty));
                            return (decl, Base::None);
                        }
                    }
                    prefix = false;
                }
                Kind::UserDefConversion(_) => {
                    decl.push_str("()");
                    decl.push_str(&self.qualifier_suffix(node.ty));
                    decl.push_str(&self.virtual_suffix(node.ty));
                    return (decl, Base::None);
                }
                Kind::Placeholder
                | Kind::Builtin
                | Kind::Name
                | Kind::Variadic
                | Kind::Typedef(_)
                | Kind::Ecsu { .. } => return (decl, Base::Leaf(node)),
            }
            match node.child() {
                Some(child) => node = child,
                None => return (decl, Base::None),
            }
        }
    }

    /// `op` and any qualifiers in front of `decl`, e.g. `*const p`.
    fn prefixed(&self, op: &str, ty: TypeId, decl: &str) -> String {
        let quals = ty.qualifiers().name(&NameStyle::gibberish(self.lang()));
        match (quals.is_empty(), decl.is_empty()) {
            (true, _) => format!("{op}{decl}"),
            (false, true) => format!("{op}{quals}"),
            (false, false) => format!("{op}{quals} {decl}"),
        }
    }

    fn brackets(&self, size: ArraySize, qualifiers: TypeId) -> String {
        let (open, close) = match self.style.graph {
            Graph::None => ("[", "]"),
            Graph::Digraphs => ("<:", ":>"),
            Graph::Trigraphs => ("??(", "??)"),
        };
        let mut words = Vec::new();
        if qualifiers.contains(TypeId::NON_EMPTY_ARRAY) {
            words.push("static".to_owned());
        }
        let quals = (qualifiers - TypeId::NON_EMPTY_ARRAY).name(&NameStyle::gibberish(self.lang()));
        if !quals.is_empty() {
            words.push(quals);
        }
        match size {
            ArraySize::None => {}
            ArraySize::Int(size) => words.push(size.to_string()),
            ArraySize::Vla => words.push("*".to_owned()),
        }
        format!("{open}{}{close}", words.join(" "))
    }

    fn params(&self, params: &[Ast]) -> String {
        params
            .iter()
            .map(|param| match param.kind {
                Kind::Variadic => "...".to_owned(),
                Kind::Name => param.sname.to_string(),
                _ => self.parts(param).join(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `const`, `&` and `noexcept` after a function's parameters.
    fn qualifier_suffix(&self, ty: TypeId) -> String {
        let mut suffix = String::new();
        let quals = (ty.qualifiers() - TypeId::ANY_REFERENCE).name(&NameStyle::gibberish(self.lang()));
        if !quals.is_empty() {
            suffix.push(' ');
            suffix.push_str(&quals);
        }
        if ty.contains(TypeId::REFERENCE) {
            suffix.push_str(if self.style.alt_tokens { " bitand" } else { " &" });
        }
        if ty.contains(TypeId::RVALUE_REFERENCE) {
            suffix.push_str(if self.style.alt_tokens { " and" } else { " &&" });
        }
        if ty.contains(TypeId::NOEXCEPT) {
            suffix.push_str(" noexcept");
        }
        if ty.contains(TypeId::THROW) {
            suffix.push_str(" throw()");
        }
        suffix
    }

    /// `final`, `override` and `= 0` after everything else.
    fn virtual_suffix(&self, ty: TypeId) -> String {
        let mut suffix = String::new();
        if ty.contains(TypeId::FINAL) {
            suffix.push_str(" final");
        }
        if ty.contains(TypeId::OVERRIDE) {
            suffix.push_str(" override");
        }
        if ty.contains(TypeId::PURE_VIRTUAL) {
            suffix.push_str(" = 0");
        } else if ty.contains(TypeId::DEFAULT) {
            suffix.push_str(" = default");
        } else if ty.contains(TypeId::DELETE) {
            suffix.push_str(" = delete");
        }
        suffix
    }

    fn alignment(&self, ast: &Ast) -> Vec<String> {
        let keyword = match self.lang().is_any(feature::ALIGNAS_KEYWORD) {
            true => "alignas",
            false => "_Alignas",
        };
        match &ast.align {
            Align::None => Vec::new(),
            Align::Bytes(bytes) => vec![format!("{keyword}({bytes})")],
            Align::Type(ty) => vec![format!("{keyword}({})", self.type_name(ty))],
        }
    }

    /// The storage classes, attributes and type of a declaration.
    fn type_words(&self, root: &Ast, base: Base<'_>) -> Vec<String> {
        let mut storage = root.ty & (TypeId::MASK_STORAGE | TypeId::MASK_ATTRIBUTE);
        storage -= FUNC_SUFFIX_STORAGE;
        let names = self.names();
        let leaf = match base {
            Base::Leaf(leaf) => leaf,
            Base::Auto => return vec![(storage | TypeId::AUTO).name(&names)],
            Base::None => return non_empty(storage.name(&names)),
        };

        let ty = match std::ptr::eq(leaf, root) {
            true => leaf.ty - FUNC_SUFFIX_STORAGE,
            false => leaf.ty | storage,
        };
        let sname = match &leaf.kind {
            Kind::Ecsu { ecsu_sname, .. } => Some(ecsu_sname.to_string()),
            Kind::Typedef(typedef) => Some(typedef.sname().to_string()),
            _ => None,
        };
        let Some(sname) = sname else {
            return non_empty(ty.name(&names));
        };

        // `const` has to follow the name, not the keywords before it.
        let east = match names.east_const {
            true => ty & TypeId::CV,
            false => TypeId::empty(),
        };
        let mut words = non_empty((ty - east).name(&NameStyle {
            east_const: false,
            ..names
        }));
        words.push(sname);
        if let Kind::Ecsu { of: Some(of), .. } = &leaf.kind {
            words.push(":".to_owned());
            words.push(self.type_name(of));
        }
        words.extend(non_empty(east.name(&names)));
        words
    }
}

fn non_empty(words: String) -> Vec<String> {
    match words.is_empty() {
        true => Vec::new(),
        false => vec![words],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn declare(source: &str, style: &Style) -> String {
        let session = Session::new(Options {
            lang: style.lang,
            ..Options::default()
        });
        let parsed = parse::command(source, &session).unwrap();
        let Some(Command::Declare(asts)) = parsed.command else {
            panic!("{:?}", parsed.command)
        };
        decls(&asts, style)
    }

    /// Parse C/C++ and print it back.
    fn reprint(source: &str, style: &Style) -> String {
        let typedefs = Typedefs::with_predefined();
        let asts = parse::gibberish_decls(source, style.lang, &typedefs).unwrap();
        decls(&asts, style)
    }

    #[test]
    fn arrays_of_pointers() {
        let c17 = style(Lang::C_17);
        assert_eq!(declare("declare a as array 10 of pointer to const int", &c17), "const int *a[10];");
        assert_eq!(reprint("char *const *p", &c17), "char *const *p;");
        assert_eq!(reprint("int (*p)[4]", &c17), "int (*p)[4];");
    }

    #[test]
    fn functions() {
        let cpp = style(Lang::CPP_23);
        assert_eq!(reprint("int (*p)(char, double)", &cpp), "int (*p)(char, double);");
        assert_eq!(
            reprint("void (*signal(int, void (*)(int)))(int)", &cpp),
            "void (*signal(int, void (*)(int)))(int);"
        );
        assert_eq!(reprint("virtual int f() const = 0", &cpp), "virtual int f() const = 0;");
        assert_eq!(reprint("int f(char) &&  noexcept", &cpp), "int f(char) && noexcept;");
    }

    #[test]
    fn shared_type_words() {
        let c17 = style(Lang::C_17);
        assert_eq!(declare("declare x, y as pointer to int", &c17), "int *x, *y;");
        assert_eq!(reprint("static unsigned long x", &c17), "static unsigned long x;");
    }

    #[test]
    fn special_members() {
        let cpp = style(Lang::CPP_17);
        assert_eq!(declare("declare + as operator (int) returning bool", &cpp), "bool operator+(int);");
        assert_eq!(declare("declare ~S as virtual destructor", &cpp), "virtual ~S();");
        assert_eq!(
            declare("declare user-defined conversion operator returning pointer to int", &cpp),
            "operator int*();"
        );
        assert_eq!(
            declare("declare _x as user-defined literal (unsigned long long) returning int", &cpp),
            "int operator\"\" _x(unsigned long long);"
        );
    }

    #[test]
    fn styles() {
        let mut cpp = style(Lang::CPP_17);
        cpp.trailing_return = true;
        assert_eq!(reprint("int *f(char)", &cpp), "auto f(char) -> int *;");

        let mut cpp = style(Lang::CPP_17);
        cpp.east_const = true;
        assert_eq!(reprint("const char *p", &cpp), "char const *p;");
        assert_eq!(reprint("const size_t n", &cpp), "size_t const n;");

        let mut cpp = style(Lang::CPP_17);
        cpp.west_decl = WestDecl::all();
        assert_eq!(reprint("int *f()", &cpp), "int* f();");

        let mut cpp = style(Lang::CPP_17);
        cpp.alt_tokens = true;
        assert_eq!(reprint("int &r", &cpp), "int bitand r;");

        let mut c99 = style(Lang::C_99);
        c99.graph = Graph::Digraphs;
        assert_eq!(reprint("int a[4]", &c99), "int a<:4:>;");

        let mut c17 = style(Lang::C_17);
        c17.semicolon = false;
        assert_eq!(reprint("int x", &c17), "int x");
    }

    #[test]
    fn blocks_and_bit_fields() {
        let c17 = style(Lang::C_17);
        assert_eq!(reprint("int (^b)(char)", &c17), "int (^b)(char);");
        assert_eq!(declare("declare x as unsigned int width 3 bits", &c17), "unsigned x : 3;");
        assert_eq!(declare("declare x as int aligned as 8 bytes", &c17), "_Alignas(8) int x;");
    }

    #[test]
    fn casts() {
        let cpp = style(Lang::CPP_17);
        let ast = parse::english_decl("pointer to char", Lang::CPP_17, &Typedefs::new()).unwrap();
        assert_eq!(cast(CastKind::Static, &Sname::from("p"), &ast, &cpp), "static_cast<char *>(p)");
        assert_eq!(cast(CastKind::C, &Sname::from("p"), &ast, &cpp), "(char *)p");
    }

    #[test]
    fn type_names() {
        let c17 = style(Lang::C_17);
        let typedefs = Typedefs::with_predefined();
        let size_t = typedefs.find(&Sname::from("size_t")).unwrap();
        assert_eq!(typedef(size_t, &c17), "typedef unsigned long size_t;");
        let cpp = style(Lang::CPP_17);
        assert_eq!(typedef(size_t, &cpp), "using size_t = unsigned long;");

        let cpp = Style {
            using: false,
            ..style(Lang::CPP_17)
        };
        let asts = parse::typedef_decls("namespace N { typedef int T; }", Lang::CPP_17, &typedefs).unwrap();
        let ast = asts.into_iter().find(|ast| ast.sname.to_string() == "N::T").unwrap();
        let scoped = Typedef {
            ast,
            user_defined: true,
        };
        assert_eq!(typedef(&scoped, &cpp), "namespace N { typedef int T; }");

        let asts = parse::typedef_decls("enum class E : int", Lang::CPP_17, &typedefs).unwrap();
        let ecsu = Typedef {
            ast: asts.into_iter().next().unwrap(),
            user_defined: true,
        };
        assert_eq!(typedef(&ecsu, &cpp), "enum class E : int;");
    }
}
