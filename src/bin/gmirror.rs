mod gmirror_cli;

use gmirror_cli::{load_config, GmirrorApp};
use log::LevelFilter;

fn main() {
    stderrlog::new()
        .verbosity(LevelFilter::Trace)
        .init()
        .expect("Failed to initialize logger");

    let r = (|| -> anyhow::Result<()> {
        let config = load_config()?;
        GmirrorApp::new().run(config)
    })();

    if let Err(e) = r {
        log::error!("{e:?}");
        std::process::exit(1);
    }
}
