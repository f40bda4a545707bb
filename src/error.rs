use thiserror::Error;

/// A failure produced by caller code: a command body, a route lookup, a
/// custom value or a deprecation callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can end an [`Executor::execute`](crate::Executor::execute) call.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The route capability rejected the leading token.
    #[error(transparent)]
    Route(BoxError),
    /// The command body itself failed.
    #[error(transparent)]
    Run(BoxError),
}

/// Stock error for routes that do not know a token.
#[derive(Debug, Error)]
#[error("command was not recognized: {0}")]
pub struct Unrecognized(pub String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeclError {
    #[error("empty declaration")]
    Empty,
    #[error("malformed declaration {0:?}")]
    Malformed(String),
    #[error("conflicting declarations in {0:?}")]
    Conflicting(String),
    #[error("invalid name {name:?} in declaration {decl:?}")]
    InvalidName { decl: String, name: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Declaration(#[from] DeclError),
    #[error("unsupported field type `{type_name}` for {path}")]
    UnsupportedType { path: String, type_name: &'static str },
    #[error("duplicate flag path: {0}")]
    DuplicatePath(String),
    #[error("shorthand -{letter} of {path} is already used by {other}")]
    DuplicateShorthand { letter: char, path: String, other: String },
    #[error("`--help` is generated automatically")]
    ReservedHelp,
    #[error("{0} is declared as a flag group, use `.` or `.name` on a loadable field")]
    ExpectedField(String),
    #[error("{0} is declared as a flag, it can't be loaded as a group")]
    ExpectedGroup(String),
    #[error("invalid default for {path}: {source}")]
    Default { path: String, source: ValueError },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized flag: {0}")]
    UnknownFlag(String),
    #[error("unknown shorthand flag: {letter:?} in {token}")]
    UnknownShorthand { letter: char, token: String },
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    #[error("flag needs an argument: {0}")]
    MissingValue(String),
    #[error("failed to apply flag {flag}: {value:?}: {source}")]
    Apply { flag: String, value: String, source: ValueError },
    #[error("deprecated flag {flag} was rejected: {source}")]
    Deprecated { flag: String, source: BoxError },
    #[error(
        "got {got} arguments, but expected {expected}, missing required arguments: {}",
        .missing.join(", ")
    )]
    MissingArgs { got: usize, expected: usize, missing: Vec<String> },
}

/// A string could not be turned into a field value.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("invalid integer {0:?}")]
    Int(String),
    #[error("{input:?} is out of range for {type_name}")]
    OutOfRange { input: String, type_name: &'static str },
    #[error("invalid float {input:?}: {source}")]
    Float { input: String, source: std::num::ParseFloatError },
    #[error("invalid boolean {0:?}")]
    Bool(String),
    #[error("invalid duration {input:?}: {reason}")]
    Duration { input: String, reason: &'static str },
    #[error("invalid IP address {input:?}: {source}")]
    Ip { input: String, source: std::net::AddrParseError },
    #[error("invalid IP network {0:?}")]
    IpNet(String),
    #[error("failed to parse IP mask: {0:?}")]
    IpMask(String),
    #[error("invalid hex {input:?}: {reason}")]
    Hex { input: String, reason: &'static str },
    #[error("byte length does not match fixed-length of {expected} bytes: parsed {actual} bytes")]
    Length { expected: usize, actual: usize },
    #[error(
        "byte length of element {index} does not match fixed-length of {expected} bytes: parsed {actual} bytes"
    )]
    ElementLength { index: usize, expected: usize, actual: usize },
    #[error("invalid list {input:?}: {reason}")]
    Csv { input: String, reason: &'static str },
    #[error(transparent)]
    Custom(BoxError),
}
