//! AVS UCD reader.
//!
//! ```text
//! # comments
//! n_vertices n_cells n_node_data n_cell_data n_model_data
//! id x y z                        (n_vertices times)
//! id material type key...         (n_cells times)
//! ```
//!
//! `type` is one of `line`, `quad` or `hex`. Records whose shape has the
//! dimension of the mesh are cells, records one dimension lower are boundary
//! indicators.

use crate::CellData;
use crate::ElementType;
use crate::Error;
use crate::ErrorKind;
use crate::Lexer;
use crate::RawMesh;
use crate::Ref;
use crate::VertexKeys;
use std::io;

fn element_type(keyword: &str) -> Option<ElementType> {
    Some(match keyword {
        "line" => ElementType::Line,
        "quad" => ElementType::Quadrilateral,
        "hex" => ElementType::Hexahedron,
        _ => return None,
    })
}

pub fn parse<R: io::Read>(r: R, dimension: usize, comment_start: char) -> Result<RawMesh, Error> {
    let mut lexer = Lexer::from_reader(r)?;
    lexer.skip_comment_lines(comment_start);

    let vertex_count: usize = lexer.parse()?;
    let record_count: usize = lexer.parse()?;
    for _ in 0..3 {
        // node, cell and model data vectors
        let _: usize = lexer.parse()?;
    }

    // counts come from the file, vectors grow as records are actually read
    let mut mesh = RawMesh::new(dimension);
    let mut keys = VertexKeys::default();
    for vertex in 0..vertex_count {
        let key: i64 = lexer.parse()?;
        let x: [f64; 3] = [lexer.parse()?, lexer.parse()?, lexer.parse()?];
        mesh.push_vertex(&x);
        keys.insert(key, vertex);
    }

    for record in 0..record_count {
        let _id: i64 = lexer.parse()?;
        let material_id: Ref = lexer.parse()?;
        let keyword = lexer.token()?;
        let element_type = match element_type(keyword) {
            Some(t) if t.dimension() == dimension || t.dimension() + 1 == dimension => t,
            _ => {
                let keyword = keyword.to_owned();
                return Err(lexer.error(ErrorKind::UnsupportedElementType(keyword)));
            }
        };
        let vertices = keys.read(&mut lexer, record, element_type.node_count())?;
        let cell = CellData::new(element_type, vertices, material_id);
        if element_type.dimension() == dimension {
            mesh.cells.push(cell);
        } else {
            mesh.boundary.push(cell);
        }
    }

    Ok(mesh)
}
