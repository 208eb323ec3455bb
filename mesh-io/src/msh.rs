//! Reader for version 1 gmsh files.
//!
//! ```text
//! $NOD
//! n_vertices
//! id x y z
//! $ENDNOD
//! $ELM
//! n_elements
//! id type physical elementary n_nodes key...
//! $ENDELM
//! ```

use crate::CellData;
use crate::ElementType;
use crate::Error;
use crate::ErrorKind;
use crate::Lexer;
use crate::RawMesh;
use crate::Ref;
use crate::VertexKeys;
use std::io;

const POINT: u32 = 15;

fn element_type(code: u32) -> Option<ElementType> {
    Some(match code {
        1 => ElementType::Line,
        3 => ElementType::Quadrilateral,
        5 => ElementType::Hexahedron,
        _ => return None,
    })
}

pub fn parse<R: io::Read>(r: R, dimension: usize) -> Result<RawMesh, Error> {
    let mut lexer = Lexer::from_reader(r)?;

    lexer.expect_line("$NOD")?;
    let vertex_count: usize = lexer.parse()?;
    let mut mesh = RawMesh::new(dimension);
    let mut keys = VertexKeys::default();
    for vertex in 0..vertex_count {
        let key: i64 = lexer.parse()?;
        let x: [f64; 3] = [lexer.parse()?, lexer.parse()?, lexer.parse()?];
        mesh.push_vertex(&x);
        keys.insert(key, vertex);
    }
    // end of the last vertex line
    lexer.line()?;
    lexer.expect_line("$ENDNOD")?;
    lexer.expect_line("$ELM")?;

    let element_count: usize = lexer.parse()?;
    for record in 0..element_count {
        let _id: i64 = lexer.parse()?;
        let code: u32 = lexer.parse()?;
        let material_id: Ref = lexer.parse()?;
        let _elementary: i64 = lexer.parse()?;
        let node_count: usize = lexer.parse()?;

        if code == POINT {
            for _ in 0..node_count {
                let _: i64 = lexer.parse()?;
            }
            continue;
        }
        let element_type = match element_type(code) {
            Some(t) if t.dimension() == dimension || t.dimension() + 1 == dimension => t,
            _ => {
                return Err(lexer.error(ErrorKind::UnsupportedElementType(format!(
                    "gmsh element type {code}"
                ))))
            }
        };
        if node_count != element_type.node_count() {
            return Err(lexer.error(ErrorKind::BadRecord {
                name: format!("element {record}"),
                reason: format!(
                    "expected {} nodes, found {node_count}",
                    element_type.node_count(),
                ),
            }));
        }
        let vertices = keys.read(&mut lexer, record, node_count)?;
        let cell = CellData::new(element_type, vertices, material_id);
        if element_type.dimension() == dimension {
            mesh.cells.push(cell);
        } else {
            mesh.boundary.push(cell);
        }
    }

    Ok(mesh)
}
