//! Reader for TAU grids.
//!
//! TAU grids are stored in netCDF files, which are accessed through the
//! [`Dataset`] trait. [`NetCdfFile`] implements it on top of the netCDF
//! library when the `netcdf` feature is enabled; [`MemoryDataset`] holds the
//! records in memory.
//!
//! 2D grids are stored as one layer of hexahedra between the planes `y = 0`
//! and `y = c`. The quadrilaterals of the `y = 0` plane are found through
//! their boundary marker and become the cells, with `(x, z)` as coordinates.
//!
//! 3D grids store hexahedra directly, with the `y` and `z` axes swapped.

use crate::CellData;
use crate::ElementType;
use crate::Error;
use crate::ErrorKind;
use crate::RawMesh;
use crate::Ref;
use itertools::Itertools as _;
use std::collections::HashMap;
use std::path::Path;

#[cfg(feature = "netcdf")]
mod netcdf;

#[cfg(feature = "netcdf")]
pub use self::netcdf::NetCdfFile;

/// Boundary markers of 3D grids must fit in `0..=MAX_BOUNDARY_MARKER`, 255
/// being reserved for internal faces.
pub const MAX_BOUNDARY_MARKER: Ref = 254;

/// Axis that is constant over the cells of 2D grids.
const EXTRUSION_AXIS: usize = 1;

/// A named array of values, stored in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable<T> {
    pub shape: Vec<usize>,
    pub values: Vec<T>,
}

impl<T> Variable<T> {
    pub fn new(shape: Vec<usize>, values: Vec<T>) -> Variable<T> {
        debug_assert_eq!(shape.iter().product::<usize>(), values.len());
        Variable { shape, values }
    }
}

/// Read access to the named dimensions and variables of a structured file.
///
/// Missing names are reported as [`ErrorKind::BadRecord`].
pub trait Dataset {
    fn dimension_len(&self, name: &str) -> Result<usize, Error>;
    fn ints(&self, name: &str) -> Result<Variable<i64>, Error>;
    fn floats(&self, name: &str) -> Result<Variable<f64>, Error>;
}

pub(crate) fn missing(name: &str) -> Error {
    Error::bad_record(name, "not found")
}

/// A [`Dataset`] held in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryDataset {
    dimensions: HashMap<String, usize>,
    ints: HashMap<String, Variable<i64>>,
    floats: HashMap<String, Variable<f64>>,
}

impl MemoryDataset {
    pub fn new() -> MemoryDataset {
        MemoryDataset::default()
    }

    pub fn with_dimension(mut self, name: &str, len: usize) -> MemoryDataset {
        self.dimensions.insert(name.to_owned(), len);
        self
    }

    pub fn with_ints(mut self, name: &str, shape: &[usize], values: Vec<i64>) -> MemoryDataset {
        self.ints
            .insert(name.to_owned(), Variable::new(shape.to_vec(), values));
        self
    }

    pub fn with_floats(mut self, name: &str, shape: &[usize], values: Vec<f64>) -> MemoryDataset {
        self.floats
            .insert(name.to_owned(), Variable::new(shape.to_vec(), values));
        self
    }
}

impl Dataset for MemoryDataset {
    fn dimension_len(&self, name: &str) -> Result<usize, Error> {
        self.dimensions
            .get(name)
            .copied()
            .ok_or_else(|| missing(name))
    }

    fn ints(&self, name: &str) -> Result<Variable<i64>, Error> {
        self.ints.get(name).cloned().ok_or_else(|| missing(name))
    }

    fn floats(&self, name: &str) -> Result<Variable<f64>, Error> {
        self.floats.get(name).cloned().ok_or_else(|| missing(name))
    }
}

fn check_shape<T>(name: &str, var: Variable<T>, shape: &[usize]) -> Result<Vec<T>, Error> {
    if var.shape != shape || var.values.len() != shape.iter().product::<usize>() {
        return Err(Error::bad_record(
            name,
            format!("expected shape {:?}, found {:?}", shape, var.shape),
        ));
    }
    Ok(var.values)
}

fn expect_dimension(ds: &impl Dataset, name: &str, expected: usize) -> Result<(), Error> {
    let found = ds.dimension_len(name)?;
    if found != expected {
        return Err(Error::bad_record(
            name,
            format!("expected {expected}, found {found}"),
        ));
    }
    Ok(())
}

/// Reads a `rows × cols` table of vertex indices and checks each of them is
/// below `vertex_count`.
fn vertex_table(
    ds: &impl Dataset,
    name: &str,
    rows: usize,
    cols: usize,
    vertex_count: usize,
) -> Result<Vec<Vec<usize>>, Error> {
    let values = check_shape(name, ds.ints(name)?, &[rows, cols])?;
    values
        .chunks(cols.max(1))
        .enumerate()
        .map(|(record, row)| {
            row.iter()
                .map(|&key| {
                    if key < 0 || key as usize >= vertex_count {
                        return Err(Error::from(ErrorKind::InvalidVertexIndex { record, key }));
                    }
                    Ok(key as usize)
                })
                .collect::<Result<Vec<usize>, Error>>()
        })
        .collect()
}

/// Reads `points_xc`, `points_yc` and `points_zc`.
fn point_coordinates(ds: &impl Dataset) -> Result<[Vec<f64>; 3], Error> {
    let vertex_count = ds.dimension_len("no_of_points")?;
    let axis = |name: &str| check_shape(name, ds.floats(name)?, &[vertex_count]);
    Ok([axis("points_xc")?, axis("points_yc")?, axis("points_zc")?])
}

/// Reads a TAU grid of the given dimension from `ds`.
pub fn parse(ds: &impl Dataset, dimension: usize) -> Result<RawMesh, Error> {
    match dimension {
        2 => parse_2d(ds),
        3 => parse_3d(ds),
        _ => Err(unsupported_dimension(dimension)),
    }
}

fn unsupported_dimension(dimension: usize) -> Error {
    ErrorKind::UnsupportedFormat(format!("TAU grids cannot be read as {dimension}D meshes")).into()
}

/// Opens the netCDF file at `path` and reads a TAU grid from it.
pub fn read_file(path: impl AsRef<Path>, dimension: usize) -> Result<RawMesh, Error> {
    if dimension != 2 && dimension != 3 {
        return Err(unsupported_dimension(dimension));
    }
    #[cfg(feature = "netcdf")]
    {
        let file = NetCdfFile::open(path)?;
        parse(&file, dimension)
    }
    #[cfg(not(feature = "netcdf"))]
    {
        let _ = path;
        Err(ErrorKind::UnsupportedFormat(
            "netcdf grids require the \"netcdf\" feature of mesh-io".to_owned(),
        )
        .into())
    }
}

fn parse_2d(ds: &impl Dataset) -> Result<RawMesh, Error> {
    let cell_count = ds.dimension_len("no_of_elements")?;

    let marker_count = ds.dimension_len("no_of_markers")?;
    let markers = check_shape("marker", ds.ints("marker")?, &[marker_count])?;
    if let Some(duplicate) = markers.iter().duplicates().next() {
        return Err(Error::bad_record(
            "marker",
            format!("marker {duplicate} is listed twice"),
        ));
    }

    let quad_count = ds.dimension_len("no_of_surfacequadrilaterals")?;
    let quad_markers = check_shape(
        "boundarymarker_of_surfaces",
        ds.ints("boundarymarker_of_surfaces")?,
        &[quad_count],
    )?;
    let quads_per_marker = quad_markers.iter().counts();

    expect_dimension(ds, "points_per_surfacequadrilateral", 4)?;
    let vertex_count = ds.dimension_len("no_of_points")?;
    let quads = vertex_table(
        ds,
        "points_of_surfacequadrilaterals",
        quad_count,
        4,
        vertex_count,
    )?;
    let points = point_coordinates(ds)?;

    let in_plane = |quad: &[usize]| quad.iter().all(|&v| points[EXTRUSION_AXIS][v] == 0.0);
    let candidates: Vec<i64> = markers
        .iter()
        .copied()
        .filter(|marker| {
            quads_per_marker.get(marker).copied().unwrap_or(0) == cell_count
                && quads
                    .iter()
                    .zip(&quad_markers)
                    .filter(|(_, quad_marker)| *quad_marker == marker)
                    .all(|(quad, _)| in_plane(quad.as_slice()))
        })
        .collect();
    if candidates.len() != 1 {
        let candidates = candidates.into_iter().map(|m| m as Ref).collect();
        return Err(ErrorKind::AmbiguousBoundaryMarker { candidates }.into());
    }
    let marker = candidates[0];

    let mut mesh = RawMesh::new(2);
    mesh.coordinates = points[0]
        .iter()
        .zip(&points[2])
        .flat_map(|(&x, &z)| [x, z])
        .collect();
    mesh.cells = quads
        .into_iter()
        .zip(quad_markers)
        .filter(|(_, quad_marker)| *quad_marker == marker)
        .map(|(quad, _)| CellData::new(ElementType::Quadrilateral, quad, 0))
        .collect();

    Ok(mesh)
}

fn parse_3d(ds: &impl Dataset) -> Result<RawMesh, Error> {
    let cell_count = ds.dimension_len("no_of_elements")?;
    let hex_count = ds.dimension_len("no_of_hexaeders")?;
    if hex_count != cell_count {
        return Err(Error::bad_record(
            "no_of_hexaeders",
            format!("only hexahedral grids are supported, found {hex_count} hexahedra out of {cell_count} elements"),
        ));
    }
    expect_dimension(ds, "points_per_hexaeder", 8)?;
    let vertex_count = ds.dimension_len("no_of_points")?;
    let hexes = vertex_table(ds, "points_of_hexaeders", cell_count, 8, vertex_count)?;

    let [xc, yc, zc] = point_coordinates(ds)?;

    expect_dimension(ds, "points_per_surfacequadrilateral", 4)?;
    let quad_count = ds.dimension_len("no_of_surfacequadrilaterals")?;
    let quads = vertex_table(
        ds,
        "points_of_surfacequadrilaterals",
        quad_count,
        4,
        vertex_count,
    )?;
    let quad_markers = check_shape(
        "boundarymarker_of_surfaces",
        ds.ints("boundarymarker_of_surfaces")?,
        &[quad_count],
    )?;
    if let Some(marker) = quad_markers
        .iter()
        .find(|&&m| m < 0 || m > MAX_BOUNDARY_MARKER as i64)
    {
        return Err(Error::bad_record(
            "boundarymarker_of_surfaces",
            format!("marker {marker} is outside of 0..={MAX_BOUNDARY_MARKER}"),
        ));
    }

    let mut mesh = RawMesh::new(3);
    mesh.coordinates = itertools::izip!(&xc, &zc, &yc)
        .flat_map(|(&x, &y, &z)| [x, y, z])
        .collect();
    mesh.cells = hexes
        .into_iter()
        .map(|hex| CellData::new(ElementType::Hexahedron, hex, 0))
        .collect();
    mesh.boundary = quads
        .into_iter()
        .zip(quad_markers)
        .map(|(quad, marker)| CellData::new(ElementType::Quadrilateral, quad, marker as Ref))
        .collect();

    Ok(mesh)
}
