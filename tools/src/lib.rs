use anyhow::Context as _;
use anyhow::Result;
use gridin::Format;
use gridin::MeshRecord;
use itertools::Itertools as _;
use std::env;
use std::fs;
use std::io;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::Registry;
use tracing_tree::HierarchicalLayer;

/// Parses the command-line arguments, handling `-h, --help`.
///
/// Returns `None` when the help text has been printed and the program should
/// exit.
pub fn parse_args(
    mut options: getopts::Options,
    usage: &str,
    max_free_args: usize,
) -> Result<Option<getopts::Matches>> {
    options.optflag("h", "help", "print this help menu");

    let matches = options.parse(env::args().skip(1))?;

    if matches.opt_present("h") {
        eprintln!("{}", options.usage(usage));
        return Ok(None);
    }
    if matches.free.len() > max_free_args {
        anyhow::bail!("too many arguments\n\n{}", options.usage(usage));
    }

    Ok(Some(matches))
}

/// Installs the tracing subscriber, filtered by the `LOG` environment
/// variable. A chrome trace is also written to `chrome_trace` if given.
///
/// The returned guard must be kept alive until the end of the program.
pub fn init_tracing(chrome_trace: Option<String>) -> Option<tracing_chrome::FlushGuard> {
    let registry = Registry::default().with(EnvFilter::from_env("LOG")).with(
        HierarchicalLayer::new(4)
            .with_thread_ids(true)
            .with_targets(true)
            .with_bracketed_fields(true),
    );
    match chrome_trace {
        Some(filename) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(filename)
                .build();
            registry.with(chrome_layer).init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

/// Reads a mesh from the given file, or from standard input.
///
/// Standard input has no extension to guess from, so `format` is required in
/// that case.
pub fn read_mesh<const D: usize>(
    filename: Option<&String>,
    format: Option<Format>,
) -> Result<MeshRecord<D>> {
    let mesh = match filename.map(String::as_str) {
        None | Some("-") => {
            let format = format.context(
                "the format of the standard input cannot be guessed, use -f",
            )?;
            let stdin = io::stdin();
            gridin::parse::<D>(format, stdin.lock())?
        }
        Some(filename) => gridin::parse_file::<D>(filename, format)
            .with_context(|| format!("failed to read mesh {filename:?}"))?,
    };
    Ok(mesh)
}

/// Opens the given file for writing, or standard output.
pub fn writer(filename: Option<&String>) -> Result<impl io::Write> {
    Ok(match filename.map(String::as_str) {
        None | Some("-") => Box::new(io::stdout()) as Box<dyn io::Write>,
        Some(filename) => {
            let file = fs::File::create(filename)
                .with_context(|| format!("failed to create output file {filename:?}"))?;
            Box::new(file)
        }
    })
}

/// Writes the entity counts of the mesh and the tags in use.
pub fn write_summary<const D: usize>(mut w: impl io::Write, mesh: &MeshRecord<D>) -> Result<()> {
    writeln!(w, "Dimension:        {D}")?;
    writeln!(w, "Vertices:         {}", mesh.vertices().len())?;
    writeln!(w, "Cells:            {}", mesh.cells().len())?;
    writeln!(w, "Boundary records: {}", mesh.boundary().len())?;
    writeln!(w, "Materials:        {}", mesh.materials().iter().join(", "))?;
    writeln!(w, "Boundary tags:    {}", mesh.boundary_tags().iter().join(", "))?;
    Ok(())
}
