use clap::Arg;
use gmirror::file::{Classification, FileEntry};
use serde::Serialize;

use super::LoadedConfig;

pub const CMD: &str = "classify";

#[derive(Serialize)]
struct Classified<'a> {
    name: &'a str,
    #[serde(flatten)]
    classification: Classification<'a>,
}

pub fn command() -> clap::Command {
    clap::Command::new(CMD)
        .about("Show what the name of a mirror file tells about it")
        .arg(
            Arg::new("names")
                .value_name("FILE NAME")
                .required(true)
                .num_args(1..)
                .help("File names as shown in a mirror listing"),
        )
}

pub fn run(_config: &LoadedConfig, args: &clap::ArgMatches) -> anyhow::Result<()> {
    let entries: Vec<FileEntry> = args
        .get_many::<String>("names")
        .into_iter()
        .flatten()
        .map(|name| FileEntry::new(name.as_str(), "", ""))
        .collect();
    let classified: Vec<Classified> = entries
        .iter()
        .map(|e| Classified {
            name: &e.name,
            classification: e.classify(),
        })
        .collect();

    print!("{}", serde_yaml_ng::to_string(&classified)?);
    Ok(())
}
