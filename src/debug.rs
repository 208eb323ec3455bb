//! Gnuplot output, to look at cell orientations.

use crate::geometry;
use crate::reference;
use crate::MeshRecord;
use crate::PointND;
use std::io;

fn write_point<const D: usize>(mut w: impl io::Write, p: &PointND<D>) -> io::Result<()> {
    let mut separator = "";
    for coord in p.iter() {
        write!(w, "{separator}{coord}")?;
        separator = " ";
    }
    writeln!(w)
}

impl<const D: usize> MeshRecord<D> {
    /// Writes the cells in a form gnuplot understands.
    ///
    /// 2D meshes give a script that draws each reference edge as an arrow and
    /// labels each cell with its index. Other meshes give a data file with one
    /// two-point segment per reference edge, to be drawn with `splot`.
    pub fn write_gnuplot(&self, mut w: impl io::Write) -> io::Result<()> {
        if D == 2 {
            self.write_gnuplot_script(&mut w)
        } else {
            self.write_gnuplot_segments(&mut w)
        }
    }

    fn write_gnuplot_script(&self, mut w: impl io::Write) -> io::Result<()> {
        let mut min = PointND::<D>::repeat(f64::INFINITY);
        let mut max = PointND::<D>::repeat(f64::NEG_INFINITY);

        for (c, cell) in self.cells().iter().enumerate() {
            let corners = geometry::corners(self.vertices(), cell);
            for p in &corners {
                min = min.inf(p);
                max = max.sup(p);
            }

            writeln!(w, "# cell {c}")?;
            let center = geometry::center(&corners);
            writeln!(w, "set label \"{c}\" at {},{} center", center[0], center[1])?;
            for &(from, to, _) in reference::edges(D) {
                let (a, b) = (&corners[from], &corners[to]);
                writeln!(w, "set arrow from {},{} to {},{}", a[0], a[1], b[0], b[1])?;
            }
            writeln!(w)?;
        }

        writeln!(w)?;
        writeln!(w, "set nokey")?;
        if !self.cells().is_empty() {
            let (xmin, ymin, xmax, ymax) = (min[0], min[1], max[0], max[1]);
            writeln!(w, "pl [{xmin}:{xmax}][{ymin}:{ymax}] {ymin}")?;
        }
        writeln!(w, "pause -1")
    }

    fn write_gnuplot_segments(&self, mut w: impl io::Write) -> io::Result<()> {
        for cell in self.cells() {
            for &(from, to, _) in reference::edges(D) {
                write_point(&mut w, &self.vertices()[cell.vertices[from]])?;
                write_point(&mut w, &self.vertices()[cell.vertices[to]])?;
                writeln!(w)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::mesh_io::CellData;
    use crate::mesh_io::ElementType;
    use crate::MeshRecord;
    use crate::Point2D;
    use crate::Point3D;

    #[test]
    fn test_script_2d() {
        let mesh = MeshRecord::new(
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(2.0, 0.0),
                Point2D::new(2.0, 1.0),
                Point2D::new(0.0, 1.0),
            ],
            vec![CellData::new(ElementType::Quadrilateral, vec![0, 1, 2, 3], 0)],
            Vec::new(),
        );
        let mut out = Vec::new();
        mesh.write_gnuplot(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let expected = "\
# cell 0
set label \"0\" at 1,0.5 center
set arrow from 0,0 to 2,0
set arrow from 2,0 to 2,1
set arrow from 0,1 to 2,1
set arrow from 0,0 to 0,1


set nokey
pl [0:2][0:1] 0
pause -1
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_segments_3d() {
        let vertices: Vec<Point3D> = (0..8)
            .map(|v| {
                let (x, y) = [(0, 0), (1, 0), (1, 1), (0, 1)][v % 4];
                Point3D::new(x as f64, y as f64, (v / 4) as f64)
            })
            .collect();
        let mesh = MeshRecord::new(
            vertices,
            vec![CellData::new(ElementType::Hexahedron, (0..8).collect(), 0)],
            Vec::new(),
        );
        let mut out = Vec::new();
        mesh.write_gnuplot(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("0 0 0\n1 0 0\n\n\n1 0 0\n1 1 0\n\n\n"));
        assert_eq!(out.lines().filter(|l| !l.is_empty()).count(), 24);
    }
}
