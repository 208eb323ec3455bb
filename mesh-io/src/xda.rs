//! Reader for serialized XDA meshes (2D and 3D).
//!
//! After a comment line, the cell and vertex counts each start a line, then
//! come eight header lines, the cells as zero-based vertex indices and
//! finally the vertices as `x y z` triples.

use crate::CellData;
use crate::ElementType;
use crate::Error;
use crate::ErrorKind;
use crate::Lexer;
use crate::RawMesh;
use std::io;

const HEADER_LINES: usize = 8;

/// `cell[i] = serialized[XDA_TO_REFERENCE[i]]` for hexahedra.
pub const XDA_TO_REFERENCE: [usize; 8] = [0, 1, 5, 4, 3, 2, 6, 7];

pub fn parse<R: io::Read>(r: R, dimension: usize) -> Result<RawMesh, Error> {
    let element_type = match dimension {
        2 => ElementType::Quadrilateral,
        3 => ElementType::Hexahedron,
        _ => {
            return Err(ErrorKind::NotImplemented {
                format: "xda",
                dimension,
            }
            .into())
        }
    };
    let mut lexer = Lexer::from_reader(r)?;

    lexer.line()?;
    let cell_count: usize = lexer.parse()?;
    lexer.line()?;
    let vertex_count: usize = lexer.parse()?;
    lexer.line()?;
    for _ in 0..HEADER_LINES {
        lexer.line()?;
    }

    let node_count = element_type.node_count();
    let mut mesh = RawMesh::new(dimension);
    for record in 0..cell_count {
        let serialized = (0..node_count)
            .map(|_| {
                let key: i64 = lexer.parse()?;
                if key < 0 || key as usize >= vertex_count {
                    return Err(lexer.error(ErrorKind::InvalidVertexIndex { record, key }));
                }
                Ok(key as usize)
            })
            .collect::<Result<Vec<usize>, Error>>()?;
        let vertices = match element_type {
            ElementType::Hexahedron => XDA_TO_REFERENCE.iter().map(|&i| serialized[i]).collect(),
            _ => serialized,
        };
        mesh.cells.push(CellData::new(element_type, vertices, 0));
    }

    for _ in 0..vertex_count {
        let x: [f64; 3] = [lexer.parse()?, lexer.parse()?, lexer.parse()?];
        mesh.push_vertex(&x);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cell_count: usize, vertex_count: usize) -> String {
        let mut s = format!("libMesh XDA\n{cell_count}\t# Num. Elements\n{vertex_count}\t# Num. Nodes\n");
        for i in 0..HEADER_LINES {
            s += &format!("header line {i}\n");
        }
        s
    }

    #[test]
    fn test_hexahedron_relabeling() {
        let mut input = header(1, 8);
        input += "0 1 2 3 4 5 6 7\n";
        for i in 0..8 {
            input += &format!("{} {} {}\n", i, 10 + i, 20 + i);
        }
        let mesh = parse(input.as_bytes(), 3).unwrap();
        assert_eq!(mesh.cells.len(), 1);
        assert_eq!(mesh.cells[0].vertices, vec![0, 1, 5, 4, 3, 2, 6, 7]);
        assert_eq!(mesh.vertex(3), &[3.0, 13.0, 23.0]);
        assert!(mesh.boundary.is_empty());
    }

    #[test]
    fn test_quadrilaterals() {
        let mut input = header(2, 6);
        input += "0 1 4 3\n1 2 5 4\n";
        input += "0 0 0\n1 0 0\n2 0 0\n0 1 0\n1 1 0\n2 1 0\n";
        let mesh = parse(input.as_bytes(), 2).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.vertex(5), &[2.0, 1.0]);
        assert_eq!(mesh.cells[1].vertices, vec![1, 2, 5, 4]);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut input = header(1, 4);
        input += "0 1 2 4\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n";
        let err = parse(input.as_bytes(), 2).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidVertexIndex { record: 0, key: 4 },
        ));
    }

    #[test]
    fn test_missing_vertices() {
        let mut input = header(1, 4);
        input += "0 1 2 3\n0 0 0\n1 0 0\n";
        let err = parse(input.as_bytes(), 2).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_huge_counts() {
        let mut input = header(9223372036854775807, 4);
        input += "0 1 2 3\n";
        let err = parse(input.as_bytes(), 2).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnexpectedEof));

        let mut input = header(1, 10000000000000);
        input += "0 1 2 3\n0 0 0\n";
        let err = parse(input.as_bytes(), 2).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_1d() {
        let err = parse(&b""[..], 1).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::NotImplemented { .. }));
    }
}
