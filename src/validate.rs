use crate::Error;
use mesh_io::CellData;
use mesh_io::ElementType;

fn check_records(
    kind: &str,
    records: &[CellData],
    expected: ElementType,
    vertex_count: usize,
) -> Result<(), Error> {
    for (r, record) in records.iter().enumerate() {
        if record.element_type != expected {
            return Err(Error::InternalConsistency(format!(
                "{kind} {r} is a {:?}, expected a {expected:?}",
                record.element_type,
            )));
        }
        if record.vertices.len() != expected.node_count() {
            return Err(Error::InternalConsistency(format!(
                "{kind} {r} has {} vertices, expected {}",
                record.vertices.len(),
                expected.node_count(),
            )));
        }
        if let Some(&v) = record.vertices.iter().find(|&&v| vertex_count <= v) {
            return Err(Error::InternalConsistency(format!(
                "{kind} {r} references vertex {v}, but there are only {vertex_count}",
            )));
        }
    }
    Ok(())
}

/// Checks that cells have the mesh dimension, that boundary records have one
/// dimension less, and that every vertex reference is in bounds.
///
/// Parsers are expected to uphold these by construction.
pub fn check_consistency(
    dimension: usize,
    vertex_count: usize,
    cells: &[CellData],
    boundary: &[CellData],
) -> Result<(), Error> {
    let cell_type = ElementType::for_dimension(dimension).ok_or_else(|| {
        Error::InternalConsistency(format!("no cell type for dimension {dimension}"))
    })?;
    check_records("cell", cells, cell_type, vertex_count)?;

    match ElementType::for_dimension(dimension - 1) {
        Some(boundary_type) => check_records("boundary record", boundary, boundary_type, vertex_count),
        None if boundary.is_empty() => Ok(()),
        None => Err(Error::InternalConsistency(format!(
            "{} boundary records in a {dimension}D mesh",
            boundary.len(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(a: usize, b: usize) -> CellData {
        CellData::new(ElementType::Line, vec![a, b], 1)
    }

    fn quad() -> CellData {
        CellData::new(ElementType::Quadrilateral, vec![0, 1, 2, 3], 0)
    }

    #[test]
    fn test_valid_2d() {
        check_consistency(2, 4, &[quad()], &[line(0, 1), line(3, 0)]).unwrap();
    }

    #[test]
    fn test_boundary_of_wrong_dimension() {
        let err = check_consistency(2, 4, &[quad()], &[quad()]).unwrap_err();
        assert!(matches!(err, Error::InternalConsistency(_)));
        let err = check_consistency(1, 2, &[line(0, 1)], &[line(0, 1)]).unwrap_err();
        assert!(matches!(err, Error::InternalConsistency(_)));
    }

    #[test]
    fn test_out_of_bounds() {
        let err = check_consistency(2, 4, &[quad()], &[line(0, 4)]).unwrap_err();
        assert!(matches!(err, Error::InternalConsistency(_)));
        let err = check_consistency(2, 3, &[quad()], &[]).unwrap_err();
        assert!(matches!(err, Error::InternalConsistency(_)));
    }

    #[test]
    fn test_wrong_node_count() {
        let cell = CellData {
            element_type: ElementType::Quadrilateral,
            vertices: vec![0, 1, 2],
            material_id: 0,
        };
        let err = check_consistency(2, 4, &[cell], &[]).unwrap_err();
        assert!(matches!(err, Error::InternalConsistency(_)));
    }
}
