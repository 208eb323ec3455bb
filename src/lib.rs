//! Mesh ingestion for refinement engines.
//!
//! This crate reads unstructured meshes written in a handful of legacy formats
//! and turns them into a [`MeshRecord`] a triangulation can be built from:
//!
//! 1. the file is parsed by [`mesh_io`] into a [`RawMesh`],
//! 2. vertices that no record references are removed and the others are
//!    renumbered densely,
//! 3. cells are reordered by a [`Reorder`] implementation, [`GridReordering`]
//!    by default, so that they are positively oriented and agree with their
//!    neighbors on the direction of shared edges,
//! 4. the result is checked for dimension and index consistency.
//!
//! Any failure aborts the whole pipeline and no record is returned.
//!
//! The crate also provides [`StraightBoundary`], the affine [`Boundary`]
//! description refinement engines query for the position of new vertices.
//!
//! # Example
//!
//! ```rust
//! # fn main() -> Result<(), gridin::Error> {
//! let ucd = "\
//! 4 1 0 0 0
//! 1 0 0 0
//! 2 1 0 0
//! 3 1 1 0
//! 4 0 1 0
//! 1 0 quad 1 4 3 2
//! ";
//! let mesh = gridin::parse::<2>(gridin::Format::Ucd, ucd.as_bytes())?;
//!
//! assert_eq!(mesh.vertices().len(), 4);
//! assert_eq!(mesh.cells().len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    rust_2018_idioms
)]

mod boundary;
mod canonical;
mod debug;
mod error;
mod geometry;
mod mesh;
mod orientation;
mod reference;
mod validate;


pub use crate::boundary::{Boundary, EdgeLookup, NoRefinedEdges, StraightBoundary};
pub use crate::canonical::delete_unused_vertices;
pub use crate::error::Error;
pub use crate::geometry::{center, signed_measure};
pub use crate::geometry::{Point2D, Point3D, PointND};
pub use crate::mesh::{MeshRecord, TriangulationBuilder};
pub use crate::orientation::{invert_negative_cells, GridReordering, Reorder};
pub use crate::validate::check_consistency;

pub use mesh_io::{CellData, ElementType, Format, RawMesh, Ref};

pub use mesh_io;
pub use nalgebra;

use std::io;
use std::mem;
use std::path::Path;

/// Mesh reader running the full ingestion pipeline.
///
/// `D` is the dimension of the meshes to read. `R` is the cell reordering
/// step.
#[derive(Clone, Debug)]
pub struct GridIn<const D: usize, R = GridReordering> {
    reader: mesh_io::Reader,
    reordering: R,
}

impl<const D: usize> GridIn<D> {
    /// # Panics
    ///
    /// If `D` is not 1, 2 or 3.
    pub fn new() -> Self {
        Self {
            reader: mesh_io::Reader::new(D),
            reordering: GridReordering,
        }
    }
}

impl<const D: usize> Default for GridIn<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const D: usize, R> GridIn<D, R>
where
    R: Reorder<D>,
{
    /// Sets the character that starts comment lines in UCD files.
    pub fn comment_start(mut self, comment_start: char) -> Self {
        self.reader = self.reader.comment_start(comment_start);
        self
    }

    /// Replaces the cell reordering step.
    pub fn with_reordering<S>(self, reordering: S) -> GridIn<D, S>
    where
        S: Reorder<D>,
    {
        GridIn {
            reader: self.reader,
            reordering,
        }
    }

    /// Reads a mesh of the given format from a stream.
    pub fn read<Rd>(&mut self, format: Format, r: Rd) -> Result<MeshRecord<D>, Error>
    where
        Rd: io::Read,
    {
        let span = tracing::info_span!("parse", %format);
        let enter = span.enter();

        let raw = self.reader.read(format, r)?;

        mem::drop(enter);
        self.from_raw(raw)
    }

    /// Reads a mesh from a file. The format is guessed from the file
    /// extension when `format` is `None`.
    pub fn read_file(
        &mut self,
        path: impl AsRef<Path>,
        format: Option<Format>,
    ) -> Result<MeshRecord<D>, Error> {
        let path = path.as_ref();
        let span = tracing::info_span!("parse", path = %path.display());
        let enter = span.enter();

        let raw = self.reader.read_file(path, format)?;

        mem::drop(enter);
        self.from_raw(raw)
    }

    /// Reads a TAU grid from an already opened record source.
    pub fn read_dataset(
        &mut self,
        dataset: &impl mesh_io::tau::Dataset,
    ) -> Result<MeshRecord<D>, Error> {
        let span = tracing::info_span!("parse", format = %Format::NetCdf);
        let enter = span.enter();

        let raw = mesh_io::tau::parse(dataset, D)?;

        mem::drop(enter);
        self.from_raw(raw)
    }

    /// Runs the pipeline on a mesh that has already been parsed.
    pub fn from_raw(&mut self, raw: RawMesh) -> Result<MeshRecord<D>, Error> {
        if raw.dimension != D {
            return Err(mesh_io::ErrorKind::DimensionMismatch {
                expected: D,
                found: raw.dimension,
            }
            .into());
        }
        if raw.coordinates.len() != raw.vertex_count() * D {
            return Err(Error::InternalConsistency(format!(
                "{} coordinates for {D}D vertices",
                raw.coordinates.len(),
            )));
        }
        tracing::debug!(
            vertex_count = raw.vertex_count(),
            cell_count = raw.cells.len(),
            boundary_count = raw.boundary.len(),
            "parsed mesh"
        );

        // the canonicalizer and the reordering index vertices without bounds checks
        check_consistency(D, raw.vertex_count(), &raw.cells, &raw.boundary)?;

        let vertices = geometry::points_from_coordinates::<D>(&raw.coordinates);

        let span = tracing::info_span!("canonicalize");
        let enter = span.enter();
        let (vertices, mut cells, boundary) =
            delete_unused_vertices(vertices, raw.cells, raw.boundary);
        mem::drop(enter);

        let span = tracing::info_span!("reorder");
        let enter = span.enter();
        self.reordering.reorder(&vertices, &mut cells)?;
        mem::drop(enter);

        let span = tracing::info_span!("validate");
        let enter = span.enter();
        check_consistency(D, vertices.len(), &cells, &boundary)?;
        mem::drop(enter);

        tracing::info!(
            vertex_count = vertices.len(),
            cell_count = cells.len(),
            boundary_count = boundary.len(),
            "ingested mesh"
        );
        Ok(MeshRecord::new(vertices, cells, boundary))
    }
}

/// Reads a `D`-dimensional mesh from a stream with default settings.
pub fn parse<const D: usize>(format: Format, input: impl io::Read) -> Result<MeshRecord<D>, Error> {
    GridIn::<D>::new().read(format, input)
}

/// Reads a `D`-dimensional mesh from a file with default settings.
///
/// The format is guessed from the file extension when `format` is `None`.
pub fn parse_file<const D: usize>(
    path: impl AsRef<Path>,
    format: Option<Format>,
) -> Result<MeshRecord<D>, Error> {
    GridIn::<D>::new().read_file(path, format)
}
