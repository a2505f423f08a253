use strum_macros::{AsRefStr, Display, EnumString, FromRepr};

/// Instruction opcodes of CommandLang.
///
/// Existing codes stay the same; new instructions get new opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromRepr)]
#[repr(u8)]
pub enum Instruction {
    Raw = 0,
    If = 1,
    Elif = 2,
    Else = 3,
    Exec = 4,
}

impl Instruction {
    pub fn opcode(self) -> u8 {
        self as u8
    }
}

/// Statement keyword of a conditional block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ConditionalKind {
    If,
    Elif,
    Else,
}

/// One lexed unit of a CommandLang document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text, emitted verbatim.
    Raw(String),
    /// `[kind predicate](body)`. The predicate is unparsed expression text and is absent
    /// only for `else`; the body is CommandLang source interpreted when selected.
    Conditional {
        kind: ConditionalKind,
        predicate: Option<String>,
        body: String,
    },
    /// Raw text inside `{...}`.
    Exec(String),
}

impl Token {
    pub fn instruction(&self) -> Instruction {
        match self {
            Token::Raw(_) => Instruction::Raw,
            Token::Conditional { kind, .. } => match kind {
                ConditionalKind::If => Instruction::If,
                ConditionalKind::Elif => Instruction::Elif,
                ConditionalKind::Else => Instruction::Else,
            },
            Token::Exec(_) => Instruction::Exec,
        }
    }
}
