use clap::Arg;
use gmirror::catalog::{Package, PackageFilter};
use gmirror::platform::{current_cpu, current_os};

use super::{
    arch_arg, get_arch, get_kind, get_os, kind_arg, listing_arg, load_catalog, os_arg,
    LoadedConfig,
};

pub const CMD: &str = "get-files";

pub fn command() -> clap::Command {
    clap::Command::new(CMD)
        .about("Get the package files of a version")
        .arg(Arg::new("version").required(true).help("Version to list"))
        .arg(listing_arg())
        .arg(os_arg())
        .arg(arch_arg())
        .arg(kind_arg())
        .arg(
            Arg::new("all")
                .long("all")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with_all(["os", "arch"])
                .help("Show the files of every platform"),
        )
}

pub fn run(config: &LoadedConfig, args: &clap::ArgMatches) -> anyhow::Result<()> {
    let version = args.get_one::<String>("version").unwrap();
    let catalog = load_catalog(config, args)?;
    let release = catalog
        .find(version)
        .ok_or_else(|| anyhow::anyhow!("Version {} not found in the listing", version))?;

    let filter = if args.get_flag("all") {
        PackageFilter {
            kind: get_kind(args),
            ..Default::default()
        }
    } else {
        PackageFilter {
            os: get_os(args).or_else(|| current_os()),
            arch: get_arch(args).or_else(|| current_cpu()),
            kind: get_kind(args),
        }
    };
    log::debug!("Package filter: {:?}", filter);

    let packages: Vec<Package> = release
        .packages(&filter)
        .map(|p| p.with_mirror(&config.mirror))
        .collect();
    if packages.is_empty() {
        log::warn!("No package of {} matches", version);
    }
    print!("{}", serde_yaml_ng::to_string(&packages)?);
    Ok(())
}
