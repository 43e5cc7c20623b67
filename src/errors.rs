use std::{
    error::Error,
    fmt::{self, Display},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError {
    PoppedEmptyStack,
}

impl Display for StackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Popping from an empty stack.")
    }
}

impl Error for StackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

/// Errors raised while interpreting a generated symbol word with a turtle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    /// A `]` with no matching `[`; carries the offending symbol index.
    UnbalancedBranch(usize),
}

impl Error for WordError {}

impl Display for WordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WordError::UnbalancedBranch(index) => {
                write!(f, "Unbalanced ']' at symbol {} of the word.", index)
            }
        }
    }
}

/// Errors from parsing a recurrence expression. All of these indicate a
/// misconfigured fractal definition rather than a numeric edge case, so they
/// surface before any grid cell is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionError {
    EmptyExpression,
    UnexpectedToken { found: String, position: usize },
    UnexpectedEnd,
    UnknownIdentifier { name: String, position: usize },
    UnknownFunction { name: String, position: usize },
    UnbalancedParen { position: usize },
    BadNumber { literal: String, position: usize },
}

impl Error for ExpressionError {}

impl Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExpressionError::EmptyExpression => write!(f, "Expression is empty."),
            ExpressionError::UnexpectedToken { found, position } => {
                write!(f, "Unexpected '{}' at offset {}.", found, position)
            }
            ExpressionError::UnexpectedEnd => write!(f, "Expression ended unexpectedly."),
            ExpressionError::UnknownIdentifier { name, position } => {
                write!(f, "Unknown identifier '{}' at offset {}.", name, position)
            }
            ExpressionError::UnknownFunction { name, position } => {
                write!(f, "Unknown function '{}' at offset {}.", name, position)
            }
            ExpressionError::UnbalancedParen { position } => {
                write!(f, "Missing ')' for '(' at offset {}.", position)
            }
            ExpressionError::BadNumber { literal, position } => {
                write!(f, "Bad numeric literal '{}' at offset {}.", literal, position)
            }
        }
    }
}

/// Errors raised while classifying or building from a fractal definition.
/// These are fatal to the run and fire before any generation happens.
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionError {
    /// No known key-set matched the supplied record.
    UnrecognizedShape { keys: Vec<String> },
    /// A field exists but failed to deserialize into the expected type.
    Malformed { kind: &'static str, message: String },
    EmptyStartingFigure,
    EmptyTransformList,
    BadEscapeRadius(f64),
    BadSampleWindow { width: u32, height: u32, step: u32 },
    Expression(ExpressionError),
}

impl Error for DefinitionError {}

impl Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DefinitionError::UnrecognizedShape { keys } => {
                write!(
                    f,
                    "Definition matches no known fractal shape (found keys: {}).",
                    keys.join(", ")
                )
            }
            DefinitionError::Malformed { kind, message } => {
                write!(f, "Malformed {} definition: {}", kind, message)
            }
            DefinitionError::EmptyStartingFigure => {
                write!(f, "IFS definition has an empty starting figure.")
            }
            DefinitionError::EmptyTransformList => {
                write!(f, "IFS definition has no affine mappings.")
            }
            DefinitionError::BadEscapeRadius(r) => {
                write!(f, "Escape radius must be positive and finite, got {}.", r)
            }
            DefinitionError::BadSampleWindow {
                width,
                height,
                step,
            } => {
                write!(
                    f,
                    "Sampling window {}x{} with step {} yields no grid cells.",
                    width, height, step
                )
            }
            DefinitionError::Expression(err) => write!(f, "{}", err),
        }
    }
}

impl From<ExpressionError> for DefinitionError {
    fn from(err: ExpressionError) -> Self {
        DefinitionError::Expression(err)
    }
}

/// Errors from running a full definition-to-output generation pass: either
/// the definition itself is bad, or the generated symbol word turned out to
/// be malformed when the turtle walked it.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateError {
    Definition(DefinitionError),
    Word(WordError),
}

impl Error for GenerateError {}

impl Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::Definition(err) => write!(f, "{}", err),
            GenerateError::Word(err) => write!(f, "{}", err),
        }
    }
}

impl From<DefinitionError> for GenerateError {
    fn from(err: DefinitionError) -> Self {
        GenerateError::Definition(err)
    }
}

impl From<WordError> for GenerateError {
    fn from(err: WordError) -> Self {
        GenerateError::Word(err)
    }
}
