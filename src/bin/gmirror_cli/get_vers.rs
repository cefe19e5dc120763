use super::{get_version_filter, listing_arg, load_catalog, series_arg, stable_arg, LoadedConfig};

pub const CMD: &str = "get-vers";

pub fn command() -> clap::Command {
    clap::Command::new(CMD)
        .about("Get available versions")
        .arg(listing_arg())
        .arg(series_arg())
        .arg(stable_arg())
}

pub fn run(config: &LoadedConfig, args: &clap::ArgMatches) -> anyhow::Result<()> {
    let catalog = load_catalog(config, args)?;
    let version_filter = get_version_filter(args);

    for release in catalog.filter(&version_filter) {
        println!(
            "{}: {}{}",
            release.parsed.series(),
            release.version,
            if release.parsed.is_stable() {
                ""
            } else {
                " [pre-release]"
            }
        );
    }

    Ok(())
}
