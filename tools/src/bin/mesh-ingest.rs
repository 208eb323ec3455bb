use anyhow::Context as _;
use anyhow::Result;
use gridin::Format;
use std::io;
use std::io::Write as _;

const USAGE: &str = "Usage: mesh-ingest [options] [in-mesh [out]] <in.mesh >out.txt";

fn main_d<const D: usize>(matches: &getopts::Matches, format: Option<Format>) -> Result<()> {
    let mesh = gridin_tools::read_mesh::<D>(matches.free.get(0), format)?;
    let mut output = io::BufWriter::new(gridin_tools::writer(matches.free.get(1))?);
    if matches.opt_present("g") {
        mesh.write_gnuplot(&mut output)
            .context("failed to write gnuplot output")?;
    } else {
        gridin_tools::write_summary(&mut output, &mesh)?;
    }
    output.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optopt("d", "dimension", "dimension of the mesh (default: 2)", "1|2|3");
    options.optopt("f", "format", "format of the input mesh", Format::NAMES);
    options.optflag("g", "gnuplot", "write cells as gnuplot input instead of a summary");
    options.optopt("t", "trace", "emit a chrome trace", "FILE");

    let matches = match gridin_tools::parse_args(options, USAGE, 2)? {
        Some(matches) => matches,
        None => return Ok(()),
    };

    let _chrome_trace_guard = gridin_tools::init_tracing(matches.opt_str("t"));

    let dimension = matches
        .opt_get_default("d", 2_usize)
        .context("invalid value for -d, --dimension")?;
    let format = matches
        .opt_get("f")
        .context("invalid value for -f, --format")?;

    match dimension {
        1 => main_d::<1>(&matches, format),
        2 => main_d::<2>(&matches, format),
        3 => main_d::<3>(&matches, format),
        n => anyhow::bail!("expected a 1D, 2D or 3D mesh, got {n}D"),
    }
}
