mod classify;
mod get_downinfo;
mod get_files;
mod get_vers;

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use directories::ProjectDirs;
use fxhash::FxHashMap;
use gmirror::catalog::{Catalog, VersionFilter};
use gmirror::file::Kind;
use gmirror::{listing, platform, UrlMirror};
use log::LevelFilter;
use smol_str::SmolStr;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

type RunSubcommand = fn(&LoadedConfig, &clap::ArgMatches) -> anyhow::Result<()>;

fn run_config_path(config: &LoadedConfig, _args: &clap::ArgMatches) -> anyhow::Result<()> {
    println!("{}", config.config_file.display());
    Ok(())
}

pub struct GmirrorApp {
    cmd: clap::Command,
    run_commands: FxHashMap<SmolStr, RunSubcommand>,
}

pub struct LoadedConfig {
    pub config_file: PathBuf,
    pub base_url: SmolStr,
    pub listing: Option<PathBuf>,
    pub mirror: UrlMirror,
}

impl GmirrorApp {
    pub const CONFIG_PATH_CMD: &str = "config-path";

    pub fn new() -> Self {
        Self {
            cmd: clap::Command::new("gmirror")
                .about("Classify the files of a Go mirror listing and pick releases from it")
                .version(env!("CARGO_PKG_VERSION"))
                .subcommand_required(true)
                .arg_required_else_help(true)
                .arg(
                    clap::Arg::new("debug")
                        .long("debug")
                        .global(true)
                        .action(clap::ArgAction::SetTrue),
                ),
            run_commands: FxHashMap::default(),
        }
        .add_subcommand(
            clap::Command::new(Self::CONFIG_PATH_CMD).about("Get the path of the config file"),
            run_config_path,
        )
        .add_subcommand(classify::command(), classify::run)
        .add_subcommand(get_vers::command(), get_vers::run)
        .add_subcommand(get_files::command(), get_files::run)
        .add_subcommand(get_downinfo::command(), get_downinfo::run)
    }

    fn add_subcommand(self, subcmd: clap::Command, run: RunSubcommand) -> Self {
        let Self {
            mut cmd,
            mut run_commands,
        } = self;
        run_commands.insert(subcmd.get_name().into(), run);
        cmd = cmd.subcommand(subcmd);
        Self { cmd, run_commands }
    }

    pub fn run(self, config: LoadedConfig) -> anyhow::Result<()> {
        let matches = self.cmd.get_matches();
        if !matches.get_flag("debug") {
            log::set_max_level(LevelFilter::Info);
        }

        let (subcmd, args) = matches.subcommand().expect("Subcommand is required");
        let run = self
            .run_commands
            .get(subcmd)
            .expect("Subcommand should be present");
        run(&config, args)
    }
}

impl Default for GmirrorApp {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_config() -> anyhow::Result<LoadedConfig> {
    let dirs = ProjectDirs::from("", "", "gmirror")
        .ok_or_else(|| anyhow::anyhow!("No home directory"))?;

    let config_path = match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => path.into(),
        None => dirs.config_dir().join("config.yaml"),
    };

    let config: gmirror::Config = match File::open(&config_path) {
        Ok(file) => serde_yaml_ng::from_reader(file)
            .with_context(|| format!("Failed to parse config {}", config_path.display()))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Use default config when file is not found
            gmirror::Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    Ok(LoadedConfig {
        config_file: config_path,
        base_url: config
            .base_url
            .unwrap_or_else(|| gmirror::DEFAULT_BASE_URL.into()),
        listing: config.listing,
        mirror: config.mirror,
    })
}

pub fn listing_arg() -> clap::Arg {
    clap::Arg::new("listing")
        .short('l')
        .long("listing")
        .value_parser(clap::value_parser!(PathBuf))
        .help("Saved mirror listing, HTML or YAML (`-` for stdin)")
}

pub fn load_catalog(config: &LoadedConfig, args: &clap::ArgMatches) -> anyhow::Result<Catalog> {
    let path: &Path = match args.get_one::<PathBuf>("listing") {
        Some(path) => path.as_path(),
        None => config.listing.as_deref().ok_or_else(|| {
            anyhow::anyhow!("No listing given, pass --listing or set `listing` in the config")
        })?,
    };
    let entries = listing::load(path, &config.base_url)?;
    Ok(Catalog::build(entries))
}

pub fn os_arg() -> clap::Arg {
    clap::Arg::new("os")
        .long("os")
        .value_parser(PossibleValuesParser::new(
            platform::OS_TOKENS.iter().map(|(_, label)| *label),
        ))
        .help("Target OS, defaults to the current one")
}

pub fn arch_arg() -> clap::Arg {
    clap::Arg::new("arch")
        .long("arch")
        .help("Target architecture (x86-64, ARM64, ppc64le, ...), defaults to the current one")
}

pub fn get_os(args: &clap::ArgMatches) -> Option<&str> {
    args.get_one::<String>("os").map(|s| s.as_str())
}

pub fn get_arch(args: &clap::ArgMatches) -> Option<&str> {
    args.get_one::<String>("arch").map(|s| s.as_str())
}

pub fn kind_arg() -> clap::Arg {
    clap::Arg::new("kind")
        .long("kind")
        .value_parser(PossibleValuesParser::new([
            Kind::Installer.as_str(),
            Kind::Archive.as_str(),
            Kind::Source.as_str(),
        ]))
        .help("Only show packages of this kind")
}

pub fn get_kind(args: &clap::ArgMatches) -> Option<Kind> {
    args.get_one::<String>("kind")
        .and_then(|k| Kind::from_label(k))
}

pub fn series_arg() -> clap::Arg {
    clap::Arg::new("series")
        .short('s')
        .long("series")
        .help("Release series filter, e.g. 1.18")
}

pub fn stable_arg() -> clap::Arg {
    clap::Arg::new("stable")
        .long("stable")
        .action(clap::ArgAction::SetTrue)
        .help("Skip beta and release candidate versions")
}

pub fn get_version_filter(args: &clap::ArgMatches) -> VersionFilter {
    let exact_version = args
        .try_get_one::<String>("version")
        .ok()
        .flatten()
        .map(SmolStr::from);
    let series = args.get_one::<String>("series").map(SmolStr::from);

    VersionFilter {
        stable_only: args.get_flag("stable"),
        series,
        exact_version,
    }
}
