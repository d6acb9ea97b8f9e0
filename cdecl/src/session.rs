//! The state that persists between commands.

use crate::lang::Lang;
use crate::macros::Macros;
use crate::options::Options;
use crate::parse::SetOption;
use crate::reporting::{Message, SemanticMessage};
use crate::typedefs::Typedefs;

#[derive(Debug)]
pub struct Session {
    options: Options,
    typedefs: Typedefs,
    macros: Macros,
}

impl Session {
    pub fn new(options: Options) -> Session {
        let typedefs = match options.predefined_typedefs {
            true => Typedefs::with_predefined(),
            false => Typedefs::new(),
        };
        let macros = Macros::new(options.lang);
        Session {
            options,
            typedefs,
            macros,
        }
    }

    pub fn lang(&self) -> Lang {
        self.options.lang
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn typedefs(&self) -> &Typedefs {
        &self.typedefs
    }

    pub fn typedefs_mut(&mut self) -> &mut Typedefs {
        &mut self.typedefs
    }

    pub fn macros(&self) -> &Macros {
        &self.macros
    }

    pub fn macros_mut(&mut self) -> &mut Macros {
        &mut self.macros
    }

    /// Apply a `set` option. Changing the language also changes the
    /// predefined macros.
    pub fn set_option(&mut self, option: &SetOption) -> Result<Option<SemanticMessage>, Message> {
        let old_lang = self.options.lang;
        let warning = self.options.set(option)?;
        if self.options.lang != old_lang {
            self.macros.set_lang(self.options.lang);
        }
        Ok(warning)
    }

    /// The prompt for interactive input, e.g. `c++decl> `.
    pub fn prompt(&self) -> &'static str {
        match self.options.lang.is_cpp() {
            true => "c++decl> ",
            false => "cdecl> ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ByteRange;

    fn option(name: &str, value: Option<&str>) -> SetOption {
        SetOption {
            name: name.to_owned(),
            value: value.map(str::to_owned),
            range: ByteRange::default(),
        }
    }

    #[test]
    fn language_changes_macros_and_prompt() {
        let mut session = Session::new(Options::default());
        assert_eq!(session.prompt(), "cdecl> ");
        assert!(session.macros().is_defined("__STDC__"));

        session.set_option(&option("lang", Some("c++17"))).unwrap();
        assert_eq!(session.lang(), Lang::CPP_17);
        assert_eq!(session.prompt(), "c++decl> ");
        assert!(!session.macros().is_defined("__STDC__"));
        assert!(session.macros().is_defined("__cplusplus"));
    }

    #[test]
    fn predefined_typedefs_are_optional() {
        let session = Session::new(Options::default());
        assert!(!session.typedefs().is_empty());
        let session = Session::new(Options {
            predefined_typedefs: false,
            ..Options::default()
        });
        assert!(session.typedefs().is_empty());
    }
}