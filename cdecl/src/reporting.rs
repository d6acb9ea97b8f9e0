//! Diagnostic messages.
//!
//! These can be converted to [`Diagnostic`]s in order to present them to the
//! user.

use std::fmt;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use itertools::Itertools;

use crate::files::FileId;
use crate::parse::lexer;
use crate::source::ByteRange;

/// Global diagnostic messages
#[derive(Debug, Clone)]
pub enum Message {
    Lexer(lexer::Error),
    Parse(ParseMessage),
    Semantic(SemanticMessage),
}

impl From<lexer::Error> for Message {
    fn from(error: lexer::Error) -> Message {
        Message::Lexer(error)
    }
}

impl From<ParseMessage> for Message {
    fn from(message: ParseMessage) -> Message {
        Message::Parse(message)
    }
}

impl From<SemanticMessage> for Message {
    fn from(message: SemanticMessage) -> Message {
        Message::Semantic(message)
    }
}

impl Message {
    pub fn range(&self) -> ByteRange {
        match self {
            Message::Lexer(error) => error.range(),
            Message::Parse(message) => message.range(),
            Message::Semantic(message) => message.range,
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            Message::Semantic(message) => message.severity >= Severity::Error,
            Message::Lexer(_) | Message::Parse(_) => true,
        }
    }

    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic<FileId> {
        match self {
            Message::Lexer(error) => error.to_diagnostic(file_id),
            Message::Parse(message) => message.to_diagnostic(file_id),
            Message::Semantic(message) => message.to_diagnostic(file_id),
        }
    }
}

/// Something a name was expected to be.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unknown {
    Command,
    HelpTopic,
    Language,
    Macro,
    SetOption,
    Type,
}

impl fmt::Display for Unknown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Unknown::Command => "command",
            Unknown::HelpTopic => "help topic",
            Unknown::Language => "language",
            Unknown::Macro => "macro",
            Unknown::SetOption => "set option",
            Unknown::Type => "type",
        })
    }
}

/// Messages produced during parsing
#[derive(Debug, Clone)]
pub enum ParseMessage {
    UnexpectedEnd {
        range: ByteRange,
        expected: Vec<String>,
    },
    UnexpectedToken {
        range: ByteRange,
        token: String,
        expected: Vec<String>,
    },
    ExtraToken {
        range: ByteRange,
        token: String,
    },
    /// A name that is not a known command, type, etc.
    Unknown {
        range: ByteRange,
        what: Unknown,
        name: String,
        suggestions: Vec<String>,
    },
}

impl ParseMessage {
    pub fn range(&self) -> ByteRange {
        match self {
            ParseMessage::UnexpectedEnd { range, .. }
            | ParseMessage::UnexpectedToken { range, .. }
            | ParseMessage::ExtraToken { range, .. }
            | ParseMessage::Unknown { range, .. } => *range,
        }
    }

    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic<FileId> {
        match self {
            ParseMessage::UnexpectedEnd { range, expected } => Diagnostic::error()
                .with_message("unexpected end of command")
                .with_labels(vec![
                    Label::primary(file_id, *range).with_message("unexpected end of command")
                ])
                .with_notes(format_expected(expected).into_iter().collect()),
            ParseMessage::UnexpectedToken {
                range,
                token,
                expected,
            } => Diagnostic::error()
                .with_message(format!("unexpected {token}"))
                .with_labels(vec![Label::primary(file_id, *range).with_message("unexpected token")])
                .with_notes(format_expected(expected).into_iter().collect()),
            ParseMessage::ExtraToken { range, token } => Diagnostic::error()
                .with_message(format!("extra {token}"))
                .with_labels(vec![Label::primary(file_id, *range).with_message("extra token")]),
            ParseMessage::Unknown {
                range,
                what,
                name,
                suggestions,
            } => Diagnostic::error()
                .with_message(format!("\"{name}\": unknown {what}"))
                .with_labels(vec![Label::primary(file_id, *range)])
                .with_notes(format_suggestions(suggestions).into_iter().collect()),
        }
    }
}

/// Messages about declarations that are well formed but not legal, and
/// other problems with commands.
#[derive(Debug, Clone)]
pub struct SemanticMessage {
    pub severity: Severity,
    pub range: ByteRange,
    pub message: String,
    /// What was probably meant instead.
    pub hint: Option<String>,
}

impl SemanticMessage {
    pub fn error(range: ByteRange, message: impl Into<String>) -> SemanticMessage {
        SemanticMessage {
            severity: Severity::Error,
            range,
            message: message.into(),
            hint: None,
        }
    }

    pub fn warning(range: ByteRange, message: impl Into<String>) -> SemanticMessage {
        SemanticMessage {
            severity: Severity::Warning,
            ..SemanticMessage::error(range, message)
        }
    }

    pub fn with_hint(self, hint: impl Into<String>) -> SemanticMessage {
        SemanticMessage {
            hint: Some(hint.into()),
            ..self
        }
    }

    pub fn to_diagnostic(&self, file_id: FileId) -> Diagnostic<FileId> {
        let notes = self.hint.iter().map(|hint| format!("did you mean \"{hint}\"?"));
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(file_id, self.range)])
            .with_notes(notes.collect())
    }
}

fn format_expected(expected: &[impl fmt::Display]) -> Option<String> {
    expected.split_last().map(|items| match items {
        (last, []) => format!("expected {last}"),
        (last, expected) => format!("expected {} or {last}", expected.iter().format(", ")),
    })
}

/// A `did you mean` note listing `suggestions`, if there are any.
pub fn format_suggestions(suggestions: &[impl fmt::Display]) -> Option<String> {
    let quoted = suggestions.iter().map(|suggestion| format!("\"{suggestion}\""));
    let quoted = quoted.collect::<Vec<_>>();
    quoted.split_last().map(|items| match items {
        (last, []) => format!("did you mean {last}?"),
        (last, [first]) => format!("did you mean {first} or {last}?"),
        (last, rest) => format!("did you mean {}, or {last}?", rest.iter().format(", ")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_lists() {
        assert_eq!(format_expected(&["name"]).unwrap(), "expected name");
        assert_eq!(
            format_expected(&["name", "`*`", "`(`"]).unwrap(),
            "expected name, `*` or `(`"
        );
        let nothing: [&str; 0] = [];
        assert!(format_expected(&nothing).is_none());
    }

    #[test]
    fn suggestion_lists() {
        assert_eq!(format_suggestions(&["explain"]).unwrap(), r#"did you mean "explain"?"#);
        assert_eq!(
            format_suggestions(&["const", "constexpr", "consteval"]).unwrap(),
            r#"did you mean "const", "constexpr", or "consteval"?"#
        );
    }

    #[test]
    fn hints_become_notes() {
        let file_id = FileId::try_from(1).unwrap();
        let message = SemanticMessage::error(ByteRange::new(13, 18), "array of function")
            .with_hint("array of pointer to function");
        let diagnostic = message.to_diagnostic(file_id);
        assert_eq!(diagnostic.message, "array of function");
        assert_eq!(diagnostic.notes, [r#"did you mean "array of pointer to function"?"#]);
    }
}
