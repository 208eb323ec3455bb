use std::fmt;

/// Errors returned by the pipeline and the boundary descriptions.
#[derive(Debug)]
pub enum Error {
    /// The mesh file could not be read.
    Input(mesh_io::Error),

    /// No vertex ordering of the given cell is both positively oriented and
    /// compatible with its neighbors.
    InconsistentOrientation { cell: usize },

    /// The number of points requested on a boundary entity cannot be laid out
    /// on it.
    InvalidPointCount { requested: usize },

    /// The operation has no meaning in this space dimension.
    UnsupportedDimension { dimension: usize },

    /// A face was given with the wrong number of corners.
    BadFaceVertexCount { expected: usize, found: usize },

    /// A reader produced records that break the mesh invariants.
    InternalConsistency(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Input(err) => write!(f, "failed to read mesh: {err}"),
            Error::InconsistentOrientation { cell } => {
                write!(f, "cannot find a consistent orientation for cell {cell}")
            }
            Error::InvalidPointCount { requested } => {
                write!(f, "cannot place {requested} points on this entity")
            }
            Error::UnsupportedDimension { dimension } => {
                write!(f, "operation not available in {dimension}D")
            }
            Error::BadFaceVertexCount { expected, found } => {
                write!(f, "expected a face with {expected} vertices, got {found}")
            }
            Error::InternalConsistency(msg) => write!(f, "internal consistency error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Input(err) => Some(err),
            _ => None,
        }
    }
}

impl From<mesh_io::Error> for Error {
    fn from(err: mesh_io::Error) -> Self {
        Error::Input(err)
    }
}

impl From<mesh_io::ErrorKind> for Error {
    fn from(kind: mesh_io::ErrorKind) -> Self {
        Error::Input(kind.into())
    }
}
