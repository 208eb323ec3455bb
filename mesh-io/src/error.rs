use crate::Ref;
use std::error;
use std::fmt;
use std::io;
use std::num;

#[derive(Debug)]
pub enum ErrorKind {
    /// A literal keyword or section label did not match the format grammar.
    UnexpectedToken { expected: String, found: String },
    /// The input ended before the counts read from it were satisfied.
    UnexpectedEof,
    BadInteger(num::ParseIntError),
    BadFloat(num::ParseFloatError),
    /// A named record of a structured file is missing or has the wrong shape.
    BadRecord { name: String, reason: String },
    Io(io::Error),
    /// The element keyword or code is valid but cannot be used for this mesh.
    UnsupportedElementType(String),
    /// Record number `record` references the vertex `key`, which does not exist.
    InvalidVertexIndex { record: usize, key: i64 },
    DimensionMismatch { expected: usize, found: usize },
    NotImplemented { format: &'static str, dimension: usize },
    UnsupportedFormat(String),
    UnknownFormat(String),
    /// None or several boundary markers of a TAU 2D grid qualify as the cell
    /// plane.
    AmbiguousBoundaryMarker { candidates: Vec<Ref> },
}

impl ErrorKind {
    /// Whether the error comes from input that does not follow the format
    /// grammar.
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnexpectedToken { .. }
                | ErrorKind::UnexpectedEof
                | ErrorKind::BadInteger(_)
                | ErrorKind::BadFloat(_)
                | ErrorKind::BadRecord { .. }
                | ErrorKind::Io(_)
        )
    }
}

#[derive(Debug)]
pub struct Error {
    pub(crate) kind: ErrorKind,
    pub(crate) lineno: usize,
}

impl Error {
    pub fn new(kind: ErrorKind, lineno: usize) -> Error {
        Error { kind, lineno }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Line at which the error was detected, or 0 for record-oriented input.
    pub fn lineno(&self) -> usize {
        self.lineno
    }

    pub(crate) fn bad_record(name: &str, reason: impl Into<String>) -> Error {
        Error::from(ErrorKind::BadRecord {
            name: name.to_owned(),
            reason: reason.into(),
        })
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected token {:?}, found {:?}", expected, found)
            }
            ErrorKind::UnexpectedEof => write!(f, "unexpected end of input"),
            ErrorKind::BadInteger(err) => write!(f, "when parsing integer: {}", err),
            ErrorKind::BadFloat(err) => write!(f, "when parsing float: {}", err),
            ErrorKind::BadRecord { name, reason } => write!(f, "record {:?}: {}", name, reason),
            ErrorKind::Io(err) => write!(f, "io error: {}", err),
            ErrorKind::UnsupportedElementType(t) => {
                write!(f, "element type {:?} is not supported here", t)
            }
            ErrorKind::InvalidVertexIndex { record, key } => {
                write!(f, "record {} references unknown vertex {}", record, key)
            }
            ErrorKind::DimensionMismatch { expected, found } => {
                write!(f, "expected dimension to be {}, found {}", expected, found)
            }
            ErrorKind::NotImplemented { format, dimension } => {
                write!(f, "{} meshes are not supported in {}D", format, dimension)
            }
            ErrorKind::UnsupportedFormat(why) => write!(f, "unsupported format: {}", why),
            ErrorKind::UnknownFormat(name) => {
                write!(f, "unknown format {:?}, expected one of {}", name, crate::Format::NAMES)
            }
            ErrorKind::AmbiguousBoundaryMarker { candidates } => write!(
                f,
                "expected exactly one boundary marker in the zero plane, found {:?}",
                candidates,
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lineno == 0 {
            self.kind.fmt(f)
        } else {
            write!(f, "at line {}: {}", self.lineno, self.kind)
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Io(err) => Some(err),
            ErrorKind::BadInteger(err) => Some(err),
            ErrorKind::BadFloat(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { kind, lineno: 0 }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        let kind = if err.kind() == io::ErrorKind::UnexpectedEof {
            ErrorKind::UnexpectedEof
        } else {
            ErrorKind::Io(err)
        };
        Error { kind, lineno: 0 }
    }
}

impl From<num::ParseIntError> for Error {
    fn from(err: num::ParseIntError) -> Error {
        Error {
            kind: ErrorKind::BadInteger(err),
            lineno: 0,
        }
    }
}

impl From<num::ParseFloatError> for Error {
    fn from(err: num::ParseFloatError) -> Error {
        Error {
            kind: ErrorKind::BadFloat(err),
            lineno: 0,
        }
    }
}
