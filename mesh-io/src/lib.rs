//! Readers for a handful of legacy unstructured mesh formats.
//!
//! Every reader produces a [`RawMesh`]: vertices in file order, full
//! dimensional cells and lower dimensional boundary records, with vertex
//! references already resolved to file-order indices. Unused vertices are
//! kept and cell orientation is left as found in the file.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

pub use error::Error;
pub use error::ErrorKind;

pub mod dbmesh;
mod error;
mod lexer;
pub mod msh;
pub mod tau;
pub mod ucd;
pub mod xda;

use lexer::Lexer;

/// Material identifier of cells and boundary indicator of boundary records.
pub type Ref = isize;

/// Reference shapes handled by the readers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Line,
    Quadrilateral,
    Hexahedron,
}

impl ElementType {
    pub fn dimension(self) -> usize {
        match self {
            ElementType::Line => 1,
            ElementType::Quadrilateral => 2,
            ElementType::Hexahedron => 3,
        }
    }

    pub fn node_count(self) -> usize {
        match self {
            ElementType::Line => 2,
            ElementType::Quadrilateral => 4,
            ElementType::Hexahedron => 8,
        }
    }

    /// The reference shape of the given dimension, if any.
    pub fn for_dimension(dimension: usize) -> Option<ElementType> {
        match dimension {
            1 => Some(ElementType::Line),
            2 => Some(ElementType::Quadrilateral),
            3 => Some(ElementType::Hexahedron),
            _ => None,
        }
    }
}

/// A cell or a boundary record: vertex indices plus a tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellData {
    pub element_type: ElementType,
    pub vertices: Vec<usize>,
    pub material_id: Ref,
}

impl CellData {
    pub fn new(element_type: ElementType, vertices: Vec<usize>, material_id: Ref) -> CellData {
        CellData {
            element_type,
            vertices,
            material_id,
        }
    }
}

/// Mesh as read from a file, before any clean-up.
#[derive(Clone, Debug, Default)]
pub struct RawMesh {
    pub dimension: usize,
    /// Coordinates, `dimension` per vertex, in file order.
    pub coordinates: Vec<f64>,
    pub cells: Vec<CellData>,
    pub boundary: Vec<CellData>,
}

impl RawMesh {
    pub fn new(dimension: usize) -> RawMesh {
        assert_ne!(dimension, 0);
        RawMesh {
            dimension,
            ..RawMesh::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.coordinates.len() / self.dimension
    }

    pub fn vertex(&self, idx: usize) -> &[f64] {
        &self.coordinates[idx * self.dimension..(idx + 1) * self.dimension]
    }

    pub fn vertices(&self) -> impl Iterator<Item = &[f64]> {
        self.coordinates.chunks_exact(self.dimension)
    }

    /// Appends a vertex, keeping only the first `dimension` coordinates of
    /// `coordinates`.
    pub(crate) fn push_vertex(&mut self, coordinates: &[f64]) {
        self.coordinates
            .extend_from_slice(&coordinates[..self.dimension]);
    }
}

/// Supported file formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Legacy database mesh (`MeshVersionFormatted 0`), 2D only.
    DbMesh,
    /// Old gmsh format with `$NOD`/`$ELM` sections.
    Msh,
    /// AVS unstructured cell data.
    Ucd,
    /// Serialized XDA meshes.
    Xda,
    /// TAU grids stored as netCDF.
    NetCdf,
}

impl Format {
    /// Names accepted on the command line, for help texts.
    pub const NAMES: &'static str = "dbmesh|msh|ucd|xda|netcdf";

    pub fn default_suffix(self) -> &'static str {
        match self {
            Format::DbMesh => ".dbmesh",
            Format::Msh => ".msh",
            Format::Ucd => ".inp",
            Format::Xda => ".xda",
            Format::NetCdf => ".nc",
        }
    }

    /// Guesses the format from the extension of `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Format, Error> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext {
                "dbmesh" => Some(Format::DbMesh),
                "msh" => Some(Format::Msh),
                "inp" | "ucd" => Some(Format::Ucd),
                "xda" => Some(Format::Xda),
                "nc" => Some(Format::NetCdf),
                _ => None,
            })
            .ok_or_else(|| Error::from(ErrorKind::UnknownFormat(path.display().to_string())))
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Format, Error> {
        Ok(match s {
            "dbmesh" => Format::DbMesh,
            "msh" => Format::Msh,
            "ucd" | "inp" => Format::Ucd,
            "xda" => Format::Xda,
            "netcdf" | "nc" => Format::NetCdf,
            _ => return Err(ErrorKind::UnknownFormat(s.to_owned()).into()),
        })
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::DbMesh => "dbmesh",
            Format::Msh => "msh",
            Format::Ucd => "ucd",
            Format::Xda => "xda",
            Format::NetCdf => "netcdf",
        })
    }
}

/// Reader settings shared by every format.
#[derive(Clone, Debug)]
pub struct Reader {
    dimension: usize,
    comment_start: char,
}

impl Reader {
    /// # Panics
    ///
    /// If `dimension` is not 1, 2 or 3.
    pub fn new(dimension: usize) -> Reader {
        assert!(
            (1..=3).contains(&dimension),
            "meshes must be 1D, 2D or 3D, got {dimension}D"
        );
        Reader {
            dimension,
            comment_start: '#',
        }
    }

    /// Sets the character that starts comment lines in UCD headers.
    pub fn comment_start(mut self, comment_start: char) -> Reader {
        self.comment_start = comment_start;
        self
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Reads a whole mesh from `r`.
    ///
    /// TAU grids cannot be read from a stream, use [`Reader::read_file`] or
    /// [`tau::parse`] instead.
    pub fn read<R: io::Read>(&self, format: Format, r: R) -> Result<RawMesh, Error> {
        match format {
            Format::Ucd => ucd::parse(r, self.dimension, self.comment_start),
            Format::Msh => msh::parse(r, self.dimension),
            Format::DbMesh => dbmesh::parse(r, self.dimension),
            Format::Xda => xda::parse(r, self.dimension),
            Format::NetCdf => Err(ErrorKind::UnsupportedFormat(
                "netcdf grids must be read from a file".to_owned(),
            )
            .into()),
        }
    }

    /// Reads a mesh from the file at `path`. The format is guessed from its
    /// extension when `format` is `None`.
    pub fn read_file(&self, path: impl AsRef<Path>, format: Option<Format>) -> Result<RawMesh, Error> {
        let path = path.as_ref();
        let format = match format {
            Some(format) => format,
            None => Format::from_path(path)?,
        };
        if format == Format::NetCdf {
            return tau::read_file(path, self.dimension);
        }
        let file = fs::File::open(path)?;
        self.read(format, io::BufReader::new(file))
    }
}

/// Map from file-local vertex numbers to file-order indices.
///
/// Later definitions of the same number win.
#[derive(Debug, Default)]
pub(crate) struct VertexKeys(HashMap<i64, usize>);

impl VertexKeys {
    pub fn insert(&mut self, key: i64, index: usize) {
        self.0.insert(key, index);
    }

    /// Reads `count` vertex numbers of record number `record` and resolves
    /// them.
    pub fn read(&self, lexer: &mut Lexer, record: usize, count: usize) -> Result<Vec<usize>, Error> {
        (0..count)
            .map(|_| {
                let key: i64 = lexer.parse()?;
                self.0
                    .get(&key)
                    .copied()
                    .ok_or_else(|| lexer.error(ErrorKind::InvalidVertexIndex { record, key }))
            })
            .collect()
    }
}
