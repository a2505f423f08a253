use thiserror::Error;

/// Errors raised while lexing or interpreting CommandLang source.
///
/// All of them abort the current `run` call; no partial output is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandLangError {
    /// Malformed conditional block or boolean expression.
    #[error("{0}")]
    Syntax(String),
    /// An operator received the wrong number or kind of operands.
    #[error("{0}")]
    Operator(String),
    /// `:` access to an attribute outside the allow-list, or on something without attributes.
    #[error("{0}")]
    InvalidAttribute(String),
}

pub type CommandLangResult<T> = Result<T, CommandLangError>;

impl CommandLangError {
    pub fn syntax<S: Into<String>>(message: S) -> Self {
        CommandLangError::Syntax(message.into())
    }

    pub fn operator<S: Into<String>>(message: S) -> Self {
        CommandLangError::Operator(message.into())
    }

    pub fn invalid_attribute<S: Into<String>>(attribute: S) -> Self {
        CommandLangError::InvalidAttribute(format!(
            "Attempt to access invalid attribute {}",
            attribute.into()
        ))
    }

    /// Short name of the error kind, used when reporting to chat users.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandLangError::Syntax(_) => "SyntaxError",
            CommandLangError::Operator(_) => "OperatorError",
            CommandLangError::InvalidAttribute(_) => "InvalidAttribute",
        }
    }
}

/// Failures reported by the chat platform collaborators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    #[error("Failed to send message: {message}")]
    SendFailed { message: String },
    #[error("Command {command} failed: {message}")]
    CommandFailed { command: String, message: String },
    #[error("Malformed CommandLang syntax: {0}")]
    MalformedSyntax(#[from] CommandLangError),
}

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors surfaced by configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
