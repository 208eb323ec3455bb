//! Reader for the legacy database mesh format.
//!
//! Section labels must match exactly. Edges and cracked edges are read and
//! thrown away, so these files never carry boundary indicators.

use crate::CellData;
use crate::ElementType;
use crate::Error;
use crate::ErrorKind;
use crate::Lexer;
use crate::RawMesh;
use std::io;

/// Reads and discards `count` records of `len` values each.
fn skip_records(lexer: &mut Lexer, count: usize, len: usize) -> Result<(), Error> {
    for _ in 0..count {
        for _ in 0..len {
            let _: f64 = lexer.parse()?;
        }
    }
    Ok(())
}

pub fn parse<R: io::Read>(r: R, dimension: usize) -> Result<RawMesh, Error> {
    if dimension != 2 {
        return Err(ErrorKind::NotImplemented {
            format: "dbmesh",
            dimension,
        }
        .into());
    }
    let mut lexer = Lexer::from_reader(r)?;
    lexer.skip_comment_lines('#');

    lexer.expect_line("MeshVersionFormatted 0")?;
    lexer.skip_empty_lines();
    lexer.expect_line("Dimension")?;
    let found: usize = lexer.parse()?;
    if found != dimension {
        return Err(lexer.error(ErrorKind::DimensionMismatch {
            expected: dimension,
            found,
        }));
    }
    lexer.skip_empty_lines();

    // free-form block up to the "# END" marker
    lexer.skip_past_line_containing("# END")?;
    lexer.skip_empty_lines();

    lexer.expect_line("Vertices")?;
    let vertex_count: usize = lexer.parse()?;
    let mut mesh = RawMesh::new(dimension);
    for _ in 0..vertex_count {
        let x: [f64; 2] = [lexer.parse()?, lexer.parse()?];
        mesh.push_vertex(&x);
        let _ref: f64 = lexer.parse()?;
    }
    lexer.skip_empty_lines();

    for label in ["Edges", "CrackedEdges"] {
        lexer.expect_line(label)?;
        let count: usize = lexer.parse()?;
        // two vertex numbers and a reference
        skip_records(&mut lexer, count, 3)?;
        lexer.skip_empty_lines();
    }

    lexer.expect_line("Quadrilaterals")?;
    let cell_count: usize = lexer.parse()?;
    for record in 0..cell_count {
        let vertices = (0..4)
            .map(|_| {
                let key: i64 = lexer.parse()?;
                if key < 1 || key as usize > vertex_count {
                    return Err(lexer.error(ErrorKind::InvalidVertexIndex { record, key }));
                }
                Ok(key as usize - 1)
            })
            .collect::<Result<Vec<usize>, Error>>()?;
        let _ref: f64 = lexer.parse()?;
        mesh.cells
            .push(CellData::new(ElementType::Quadrilateral, vertices, 0));
    }
    lexer.skip_empty_lines();

    // whatever follows is not used, the file may end without an "End" line
    if !lexer.is_exhausted() {
        let _ = lexer.skip_past_line_containing("End");
    }

    Ok(mesh)
}
