//! Demo binary: synthetic probe recording over a procedural brain shell.

use cerebra::data::SyntheticSource;
use cerebra::options::Options;
use cerebra::renderer::MeshData;
use cerebra::Viewer;

/// Probe count of the full recording.
const PROBES: usize = 11_293;

fn main() {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => match Options::load(std::path::Path::new(&path)) {
            Ok(opts) => opts,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    let source = SyntheticSource::new(PROBES, 7);
    let viewer = Viewer::new(source, MeshData::demo_brain())
        .with_options(options)
        .with_title("Cerebra");

    if let Err(e) = viewer.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
