use clap::Arg;
use gmirror::platform::{current_cpu, current_os};

use super::{
    arch_arg, get_arch, get_os, get_version_filter, listing_arg, load_catalog, os_arg,
    series_arg, stable_arg, LoadedConfig,
};

pub const CMD: &str = "get-downinfo";

pub fn command() -> clap::Command {
    clap::Command::new(CMD)
        .about("Get download info of the newest matching archive")
        .arg(Arg::new("version").help("Specific version"))
        .arg(series_arg())
        .arg(stable_arg())
        .arg(listing_arg())
        .arg(os_arg())
        .arg(arch_arg())
}

pub fn run(config: &LoadedConfig, args: &clap::ArgMatches) -> anyhow::Result<()> {
    let os = get_os(args)
        .or_else(|| current_os())
        .ok_or_else(|| anyhow::anyhow!("Unsupported OS, pass --os"))?;
    let arch = get_arch(args)
        .or_else(|| current_cpu())
        .ok_or_else(|| anyhow::anyhow!("Unsupported architecture, pass --arch"))?;
    let version_filter = get_version_filter(args);

    let catalog = load_catalog(config, args)?;
    let downinfo = catalog
        .select_download(&version_filter, os, arch)?
        .with_mirror(&config.mirror);
    println!("{}", serde_yaml_ng::to_string(&downinfo)?);
    Ok(())
}
