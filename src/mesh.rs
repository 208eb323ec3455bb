use crate::PointND;
use mesh_io::CellData;
use mesh_io::Ref;
use std::collections::BTreeSet;

/// A mesh that went through the whole ingestion pipeline.
///
/// Every vertex is used by at least one record, every cell is positively
/// oriented and agrees with its neighbors on the direction of their shared
/// edges, and boundary records have one dimension less than the cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshRecord<const D: usize> {
    vertices: Vec<PointND<D>>,
    cells: Vec<CellData>,
    boundary: Vec<CellData>,
}

impl<const D: usize> MeshRecord<D> {
    pub(crate) fn new(
        vertices: Vec<PointND<D>>,
        cells: Vec<CellData>,
        boundary: Vec<CellData>,
    ) -> Self {
        Self {
            vertices,
            cells,
            boundary,
        }
    }

    pub fn vertices(&self) -> &[PointND<D>] {
        &self.vertices
    }

    pub fn cells(&self) -> &[CellData] {
        &self.cells
    }

    /// Tagged sub-entities: lines in 2D, quadrilaterals in 3D.
    pub fn boundary(&self) -> &[CellData] {
        &self.boundary
    }

    /// Distinct tags carried by boundary records, in increasing order.
    pub fn boundary_tags(&self) -> BTreeSet<Ref> {
        self.boundary.iter().map(|b| b.material_id).collect()
    }

    /// Distinct material ids carried by cells, in increasing order.
    pub fn materials(&self) -> BTreeSet<Ref> {
        self.cells.iter().map(|c| c.material_id).collect()
    }

    /// Corner coordinates of the given cell, in cell order.
    pub fn cell_corners(&self, cell: usize) -> impl Iterator<Item = &PointND<D>> + '_ {
        self.cells[cell].vertices.iter().map(|&v| &self.vertices[v])
    }

    pub fn into_parts(self) -> (Vec<PointND<D>>, Vec<CellData>, Vec<CellData>) {
        (self.vertices, self.cells, self.boundary)
    }

    /// Hands the mesh over to a triangulation.
    pub fn build<B>(self, builder: &mut B) -> Result<(), B::Error>
    where
        B: TriangulationBuilder<D>,
    {
        let span = tracing::info_span!("build triangulation");
        let _enter = span.enter();

        builder.build_from(self.vertices, self.cells, self.boundary)
    }
}

/// Consumer of ingested meshes, typically a hierarchical triangulation.
pub trait TriangulationBuilder<const D: usize> {
    type Error;

    fn build_from(
        &mut self,
        vertices: Vec<PointND<D>>,
        cells: Vec<CellData>,
        boundary: Vec<CellData>,
    ) -> Result<(), Self::Error>;
}
