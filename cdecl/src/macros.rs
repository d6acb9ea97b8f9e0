//! Preprocessor macros: `#define`, `#undef` and `expand`.
//!
//! Macro bodies are kept as text and tokenized with the same lexer as
//! declarations. Expansion follows the usual C preprocessor rules closely
//! enough for exploring declarations: object-like and function-like macros,
//! `#` stringification, `##` token pasting and variadic parameters. Each
//! macro replaced is recorded as a [`Step`].

use std::fmt;

use fxhash::FxHashMap;
use itertools::Itertools;

use crate::dym;
use crate::lang::Lang;
use crate::parse::lexer::{self, Token};
use crate::reporting::{Message, ParseMessage, SemanticMessage, Unknown};
use crate::source::ByteRange;

/// The parameter name variadic arguments are substituted for.
const VA_ARGS: &str = "__VA_ARGS__";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    pub name: String,
    /// The parameters of a function-like macro, with `...` last if it is
    /// variadic.
    pub params: Option<Vec<String>>,
    pub body: String,
    pub predefined: bool,
}

impl Macro {
    fn is_variadic(&self) -> bool {
        self.params.as_ref().map_or(false, |params| params.last().map(String::as_str) == Some("..."))
    }

    /// The index of the parameter named `name`.
    fn param_index(&self, name: &str) -> Option<usize> {
        let params = self.params.as_ref()?;
        params.iter().position(|param| match param.as_str() {
            "..." => name == VA_ARGS,
            param => param == name,
        })
    }
}

impl fmt::Display for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#define {}", self.name)?;
        if let Some(params) = &self.params {
            write!(f, "({})", params.iter().format(", "))?;
        }
        if !self.body.is_empty() {
            write!(f, " {}", self.body)?;
        }
        Ok(())
    }
}

/// One macro replaced during expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub from: String,
    pub to: String,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.from, self.to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PpKind {
    Name,
    Other,
    /// Stands in for an empty argument next to `##`.
    Placemarker,
}

#[derive(Debug, Clone)]
struct PpToken {
    text: String,
    kind: PpKind,
    /// Preceded by whitespace.
    space: bool,
    /// A `##` from a macro body.
    paste: bool,
    /// The macros this token came from, which must not expand it again.
    hide: Vec<String>,
    range: ByteRange,
}

impl PpToken {
    fn is(&self, text: &str) -> bool {
        self.kind == PpKind::Other && self.text == text
    }

    fn placemarker(range: ByteRange) -> PpToken {
        PpToken {
            text: String::new(),
            kind: PpKind::Placemarker,
            space: false,
            paste: false,
            hide: Vec::new(),
            range,
        }
    }
}

/// Tokenize `text`, whose first byte is at `offset` in the command.
fn pp_tokens(text: &str, offset: u32) -> Result<Vec<PpToken>, Message> {
    let mut tokens = Vec::new();
    let mut prev_end = 0;
    for result in lexer::tokens(text) {
        let (token, range) = result.map_err(|error| match error {
            lexer::Error::UnclosedBlockComment { range } => {
                lexer::Error::UnclosedBlockComment { range: range.offset(offset) }
            }
            lexer::Error::UnexpectedCharacter { range } => {
                lexer::Error::UnexpectedCharacter { range: range.offset(offset) }
            }
        })?;
        let slice = text.get(range.start() as usize..range.end() as usize).unwrap_or_default();
        tokens.push(PpToken {
            text: slice.to_owned(),
            kind: match token {
                Token::Name(_) => PpKind::Name,
                _ => PpKind::Other,
            },
            space: range.start() > prev_end,
            paste: token == Token::Hash2,
            hide: Vec::new(),
            range: range.offset(offset),
        });
        prev_end = range.end();
    }
    Ok(tokens)
}

fn render(tokens: &[PpToken]) -> String {
    let mut text = String::new();
    for token in tokens.iter().filter(|token| token.kind != PpKind::Placemarker) {
        if token.space && !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&token.text);
    }
    text
}

/// `#x`: the spelling of an argument as a string literal.
fn stringify(arg: &[PpToken], range: ByteRange) -> PpToken {
    let mut text = String::from("\"");
    for (i, token) in arg.iter().filter(|token| token.kind != PpKind::Placemarker).enumerate() {
        if i > 0 && token.space {
            text.push(' ');
        }
        match token.text.starts_with(['"', '\'']) {
            true => {
                for c in token.text.chars() {
                    if matches!(c, '"' | '\\') {
                        text.push('\\');
                    }
                    text.push(c);
                }
            }
            false => text.push_str(&token.text),
        }
    }
    text.push('"');
    PpToken {
        text,
        kind: PpKind::Other,
        space: false,
        paste: false,
        hide: Vec::new(),
        range,
    }
}

#[derive(Debug)]
pub struct Macros {
    map: FxHashMap<String, Macro>,
}

impl Macros {
    /// The macros predefined in `lang`.
    pub fn new(lang: Lang) -> Macros {
        let mut macros = Macros {
            map: FxHashMap::default(),
        };
        macros.set_lang(lang);
        macros
    }

    /// Replace the predefined macros with those of `lang`.
    pub fn set_lang(&mut self, lang: Lang) {
        self.map.retain(|_, m| !m.predefined);
        let mut predefined = Vec::new();
        if lang.is_c() && lang != Lang::C_KNR {
            predefined.push(("__STDC__", "1"));
        }
        predefined.extend(lang.version_macro());
        for (name, value) in predefined {
            self.map.insert(
                name.to_owned(),
                Macro {
                    name: name.to_owned(),
                    params: None,
                    body: value.to_owned(),
                    predefined: true,
                },
            );
        }
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn find(&self, name: &str) -> Option<&Macro> {
        self.map.get(name)
    }

    /// Every macro, in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Macro> {
        self.map.values().sorted_by(|a, b| a.name.cmp(&b.name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// `#define`, returning a warning if an existing macro was changed.
    pub fn define(
        &mut self,
        name: &str,
        range: ByteRange,
        params: Option<Vec<String>>,
        body: &str,
    ) -> Result<Option<SemanticMessage>, Message> {
        if name == "defined" {
            return Err(SemanticMessage::error(range, "\"defined\" can not be a macro name").into());
        }
        if let Some(old) = self.map.get(name).filter(|old| old.predefined) {
            return Err(SemanticMessage::error(range, format!("\"{}\": predefined macro may not be redefined", old.name)).into());
        }

        let new = Macro {
            name: name.to_owned(),
            params,
            body: body.trim().to_owned(),
            predefined: false,
        };
        if let Some(params) = &new.params {
            let duplicate = params.iter().enumerate().find(|(i, param)| params[..*i].contains(param));
            if let Some((_, param)) = duplicate {
                return Err(SemanticMessage::error(range, format!("\"{param}\": duplicate macro parameter")).into());
            }
        }

        let body_range = range.merge(ByteRange::at(range.end()));
        let tokens = pp_tokens(&new.body, 0)?;
        if tokens.first().map_or(false, |token| token.paste) || tokens.last().map_or(false, |token| token.paste) {
            return Err(SemanticMessage::error(body_range, "\"##\" can not be at the beginning or end of a macro").into());
        }
        if new.params.is_some() {
            for (i, token) in tokens.iter().enumerate() {
                let is_param = |token: &PpToken| token.kind == PpKind::Name && new.param_index(&token.text).is_some();
                if token.is("#") && !tokens.get(i + 1).map_or(false, is_param) {
                    return Err(SemanticMessage::error(body_range, "\"#\" not followed by a macro parameter").into());
                }
            }
        }
        if !new.is_variadic() && tokens.iter().any(|token| token.text == VA_ARGS) {
            return Err(SemanticMessage::error(
                body_range,
                format!("{VA_ARGS} only allowed in a variadic macro"),
            )
            .into());
        }

        tracing::debug!(name, "defining macro");
        let warning = match self.map.get(name) {
            Some(old) if *old != new => {
                Some(SemanticMessage::warning(range, format!("\"{name}\": macro redefined")))
            }
            _ => None,
        };
        self.map.insert(name.to_owned(), new);
        Ok(warning)
    }

    /// `#undef`
    pub fn undef(&mut self, name: &str, range: ByteRange) -> Result<(), Message> {
        match self.map.get(name) {
            Some(old) if old.predefined => {
                Err(SemanticMessage::error(range, format!("\"{name}\": predefined macro may not be undefined")).into())
            }
            Some(_) => {
                self.map.remove(name);
                Ok(())
            }
            None => Err(self.unknown(name, range)),
        }
    }

    fn unknown(&self, name: &str, range: ByteRange) -> Message {
        ParseMessage::Unknown {
            range,
            what: Unknown::Macro,
            name: name.to_owned(),
            suggestions: dym::suggestions(name, self.names()),
        }
        .into()
    }

    /// Expand `text`, which starts at `offset` in the command and must start
    /// with a macro's name. Returns each macro replaced in turn, and then the
    /// whole expansion if more than one was.
    pub fn expand(&self, text: &str, offset: u32) -> Result<Vec<Step>, Message> {
        let tokens = pp_tokens(text, offset)?;
        match tokens.first() {
            Some(first) if first.kind == PpKind::Name && !self.is_defined(&first.text) => {
                return Err(self.unknown(&first.text, first.range))
            }
            Some(first) if first.kind != PpKind::Name => {
                return Err(SemanticMessage::error(first.range, "macro name expected").into())
            }
            _ => {}
        }

        let mut steps = Vec::new();
        let result = self.expand_tokens(tokens.clone(), &mut Some(&mut steps))?;
        let whole = Step {
            from: render(&tokens),
            to: render(&result),
        };
        // The whole line is shown once more when it is more than the last step.
        if steps.last().map_or(false, |last| *last != whole) {
            steps.push(whole);
        }
        Ok(steps)
    }

    fn expand_tokens(&self, mut tokens: Vec<PpToken>, steps: &mut Option<&mut Vec<Step>>) -> Result<Vec<PpToken>, Message> {
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            let found = match token.kind {
                PpKind::Name if !token.hide.contains(&token.text) => self.find(&token.text),
                _ => None,
            };
            let Some(found) = found else {
                i += 1;
                continue;
            };

            let (end, args) = match &found.params {
                None => (i + 1, Vec::new()),
                Some(_) => match self.args(&tokens, i, found)? {
                    Some(found_args) => found_args,
                    // A function-like macro's name without arguments is left alone.
                    None => {
                        i += 1;
                        continue;
                    }
                },
            };

            let name = &tokens[i];
            let mut replacement = self.substitute(found, &args, name)?;
            for token in &mut replacement {
                token.hide.extend(name.hide.iter().cloned());
                token.hide.push(found.name.clone());
            }
            if let Some(first) = replacement.first_mut() {
                first.space = name.space;
            }
            tracing::trace!(name = %found.name, "expanded macro");
            if let Some(steps) = steps {
                steps.push(Step {
                    from: render(&tokens[i..end]),
                    to: render(&replacement),
                });
            }
            tokens.splice(i..end, replacement);
        }
        Ok(tokens.into_iter().filter(|token| token.kind != PpKind::Placemarker).collect())
    }

    /// The arguments of the function-like macro named at `at`, and the index
    /// just past them, or `None` if no `(` follows.
    fn args(&self, tokens: &[PpToken], at: usize, found: &Macro) -> Result<Option<(usize, Vec<Vec<PpToken>>)>, Message> {
        if !tokens.get(at + 1).map_or(false, |token| token.is("(")) {
            return Ok(None);
        }
        let mut args = vec![Vec::new()];
        let mut depth = 0;
        let mut end = None;
        for (i, token) in tokens.iter().enumerate().skip(at + 2) {
            match token.text.as_str() {
                "(" if token.kind == PpKind::Other => depth += 1,
                ")" if token.kind == PpKind::Other && depth == 0 => {
                    end = Some(i + 1);
                    break;
                }
                ")" if token.kind == PpKind::Other => depth -= 1,
                "," if token.kind == PpKind::Other && depth == 0 => {
                    args.push(Vec::new());
                    continue;
                }
                _ => {}
            }
            if let Some(arg) = args.last_mut() {
                arg.push(token.clone());
            }
        }
        let name = &tokens[at];
        let Some(end) = end else {
            return Err(SemanticMessage::error(name.range, format!("\"{}\": unterminated macro argument list", found.name)).into());
        };

        let params = found.params.as_deref().unwrap_or_default();
        if params.is_empty() && args.len() == 1 && args[0].is_empty() {
            args.clear();
        }
        if found.is_variadic() && args.len() > params.len() {
            // Everything from the variadic parameter on, commas included.
            let rest = args.split_off(params.len() - 1);
            let mut va_args = Vec::new();
            for (i, arg) in rest.into_iter().enumerate() {
                if i > 0 {
                    va_args.push(PpToken {
                        text: ",".to_owned(),
                        kind: PpKind::Other,
                        space: false,
                        paste: false,
                        hide: Vec::new(),
                        range: name.range,
                    });
                }
                va_args.extend(arg);
            }
            args.push(va_args);
        } else if found.is_variadic() && args.len() + 1 == params.len() {
            args.push(Vec::new());
        }

        let range = name.range.merge(tokens[end - 1].range);
        match args.len().cmp(&params.len()) {
            std::cmp::Ordering::Less => Err(SemanticMessage::error(
                range,
                format!("\"{}\": too few arguments for function-like macro; {} expected", found.name, params.len()),
            )
            .into()),
            std::cmp::Ordering::Greater => Err(SemanticMessage::error(
                range,
                format!("\"{}\": too many arguments for function-like macro; {} expected", found.name, params.len()),
            )
            .into()),
            std::cmp::Ordering::Equal => Ok(Some((end, args))),
        }
    }

    /// The body of `found` with `args` substituted for its parameters and
    /// `##` applied.
    fn substitute(&self, found: &Macro, args: &[Vec<PpToken>], name: &PpToken) -> Result<Vec<PpToken>, Message> {
        let body = pp_tokens(&found.body, 0)?
            .into_iter()
            .map(|token| PpToken {
                range: name.range,
                ..token
            })
            .collect::<Vec<_>>();

        let param_at = |token: &PpToken| match token.kind {
            PpKind::Name => found.param_index(&token.text),
            _ => None,
        };

        let mut tokens = Vec::with_capacity(body.len());
        let mut j = 0;
        while j < body.len() {
            let token = &body[j];
            if token.is("#") && found.params.is_some() {
                if let Some(index) = body.get(j + 1).and_then(param_at) {
                    let mut string = stringify(&args[index], name.range);
                    string.space = token.space;
                    tokens.push(string);
                    j += 2;
                    continue;
                }
            }
            match param_at(token) {
                Some(index) => {
                    let next_to_paste = body.get(j + 1).map_or(false, |next| next.paste)
                        || j.checked_sub(1).and_then(|prev| body.get(prev)).map_or(false, |prev| prev.paste);
                    let mut arg = match next_to_paste {
                        true => args[index].clone(),
                        false => self.expand_tokens(args[index].clone(), &mut None)?,
                    };
                    if arg.is_empty() {
                        arg.push(PpToken::placemarker(name.range));
                    }
                    arg[0].space = token.space;
                    tokens.extend(arg);
                }
                None => tokens.push(token.clone()),
            }
            j += 1;
        }

        paste(tokens)
    }
}

/// Apply every `##` in `tokens`.
fn paste(tokens: Vec<PpToken>) -> Result<Vec<PpToken>, Message> {
    let mut out: Vec<PpToken> = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter();
    while let Some(token) = tokens.next() {
        if !token.paste {
            out.push(token);
            continue;
        }
        let (Some(lhs), Some(rhs)) = (out.pop(), tokens.next()) else {
            return Err(SemanticMessage::error(token.range, "\"##\" can not be at the beginning or end of a macro").into());
        };
        let pasted = match (&lhs.kind, &rhs.kind) {
            (PpKind::Placemarker, _) => PpToken { space: lhs.space, ..rhs },
            (_, PpKind::Placemarker) => lhs,
            _ => {
                let text = format!("{}{}", lhs.text, rhs.text);
                let relexed = pp_tokens(&text, 0).ok().filter(|relexed| relexed.len() == 1);
                let Some(relexed) = relexed.and_then(|relexed| relexed.into_iter().next()) else {
                    return Err(SemanticMessage::error(
                        token.range,
                        format!(
                            "pasting \"{}\" and \"{}\" does not give a valid preprocessing token",
                            lhs.text, rhs.text
                        ),
                    )
                    .into());
                };
                PpToken {
                    text,
                    kind: relexed.kind,
                    space: lhs.space,
                    paste: false,
                    hide: Vec::new(),
                    range: lhs.range,
                }
            }
        };
        out.push(pasted);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at() -> ByteRange {
        ByteRange::default()
    }

    fn define(macros: &mut Macros, name: &str, params: Option<&[&str]>, body: &str) {
        let params = params.map(|params| params.iter().map(|param| param.to_string()).collect());
        macros.define(name, at(), params, body).unwrap();
    }

    fn expand(macros: &Macros, text: &str) -> Vec<String> {
        macros.expand(text, 0).unwrap().iter().map(Step::to_string).collect()
    }

    #[test]
    fn predefined_depend_on_language() {
        let mut macros = Macros::new(Lang::C_17);
        assert!(macros.is_defined("__STDC__"));
        assert_eq!(macros.find("__STDC_VERSION__").unwrap().body, "201710L");
        macros.set_lang(Lang::CPP_17);
        assert!(!macros.is_defined("__STDC_VERSION__"));
        assert_eq!(expand(&macros, "__cplusplus"), ["__cplusplus => 201703L"]);
        assert!(macros.define("__cplusplus", at(), None, "1").is_err());
        assert!(macros.undef("__cplusplus", at()).is_err());
    }

    #[test]
    fn object_like() {
        let mut macros = Macros::new(Lang::C_17);
        define(&mut macros, "PI", None, "int *");
        define(&mut macros, "PPI", None, "PI *");
        assert_eq!(expand(&macros, "PPI"), ["PPI => PI *", "PI => int *", "PPI => int * *"]);
    }

    #[test]
    fn function_like() {
        let mut macros = Macros::new(Lang::C_17);
        define(&mut macros, "PTR", Some(&["T"]), "T *");
        assert_eq!(expand(&macros, "PTR(char)"), ["PTR(char) => char *"]);
        assert_eq!(expand(&macros, "PTR(char) p"), ["PTR(char) => char *", "PTR(char) p => char * p"]);
        define(&mut macros, "F", Some(&[]), "f()");
        assert_eq!(expand(&macros, "F()"), ["F() => f()"]);
        // Without arguments the name is left alone.
        assert!(expand(&macros, "PTR").is_empty());
    }

    #[test]
    fn stringify_and_paste() {
        let mut macros = Macros::new(Lang::C_17);
        define(&mut macros, "STR", Some(&["x"]), "#x");
        assert_eq!(expand(&macros, "STR(a \"b\")"), [r#"STR(a "b") => "a \"b\"""#]);
        define(&mut macros, "CAT", Some(&["a", "b"]), "a ## b");
        assert_eq!(expand(&macros, "CAT(int, 32)"), ["CAT(int, 32) => int32"]);
        assert_eq!(expand(&macros, "CAT(, x)"), ["CAT(, x) => x"]);
        define(&mut macros, "BAD", Some(&["a"]), "a ## +");
        assert!(macros.expand("BAD(-)", 0).is_err());
    }

    #[test]
    fn variadic() {
        let mut macros = Macros::new(Lang::C_17);
        define(&mut macros, "CALL", Some(&["f", "..."]), "f(__VA_ARGS__)");
        assert_eq!(expand(&macros, "CALL(g, 1, 2)"), ["CALL(g, 1, 2) => g(1, 2)"]);
    }

    #[test]
    fn no_infinite_recursion() {
        let mut macros = Macros::new(Lang::C_17);
        define(&mut macros, "X", None, "X + 1");
        assert_eq!(expand(&macros, "X"), ["X => X + 1"]);
    }

    #[test]
    fn errors() {
        let mut macros = Macros::new(Lang::C_17);
        define(&mut macros, "TWO", Some(&["a", "b"]), "a b");
        assert!(macros.expand("TWO(1)", 0).is_err());
        assert!(macros.expand("TWO(1, 2, 3)", 0).is_err());
        assert!(macros.expand("TWO(1, 2", 0).is_err());
        assert!(macros.expand("NOPE", 0).is_err());
        assert!(macros.define("S", at(), Some(vec!["x".to_owned()]), "#y").is_err());
        assert!(macros.define("S", at(), None, "## x").is_err());
        assert!(macros.define("S", at(), None, "__VA_ARGS__").is_err());
        assert!(macros.define("D", at(), Some(vec!["x".to_owned(), "x".to_owned()]), "x").is_err());
        assert!(macros.undef("TWO", at()).is_ok());
        assert!(macros.undef("TWO", at()).is_err());
    }

    #[test]
    fn redefinition_warns() {
        let mut macros = Macros::new(Lang::C_17);
        assert!(macros.define("N", at(), None, "1").unwrap().is_none());
        assert!(macros.define("N", at(), None, "1").unwrap().is_none());
        assert!(macros.define("N", at(), None, "2").unwrap().is_some());
        assert_eq!(macros.find("N").unwrap().to_string(), "#define N 2");
    }
}
