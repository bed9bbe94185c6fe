// src/cli.rs
use std::{env, path::PathBuf, time::Duration};

use crate::{
    config::options::AppOptions,
    error::{Error, Result},
    progress::LogProgress,
    runner,
    taxonomy::Taxonomy,
};

pub const HELP: &str = include_str!("cli_help.txt");

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run { opts: AppOptions, verbose: bool },
    Help,
}

pub fn run() -> Result<()> {
    let (opts, verbose) = match parse_args(env::args().skip(1))? {
        Command::Help => {
            println!("{HELP}");
            return Ok(());
        }
        Command::Run { opts, verbose } => (opts, verbose),
    };
    crate::log::init(verbose);

    let taxonomy = Taxonomy::ad13();
    let mut progress = LogProgress::default();
    let summary = runner::run(&opts, &taxonomy, Some(&mut progress))?;

    for entry in &summary.document.categories {
        println!("{:>6} fonds {:>8} notices  {}", entry.online_item_count, entry.online_record_count, entry.name);
    }
    println!(
        "{} fonds, {} notices",
        summary.document.metadata.total_items, summary.document.metadata.total_records
    );
    for p in &summary.files_written {
        println!("wrote {}", p.display());
    }
    Ok(())
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .ok_or_else(|| Error::InvalidArgument(format!("Missing value for {flag}")))
}

fn number<T: std::str::FromStr>(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<T> {
    let v = value(args, flag)?;
    v.parse()
        .map_err(|_| Error::InvalidArgument(format!("{flag}: not a number: {v}")))
}

pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut opts = AppOptions::default();
    let mut verbose = false;
    let mut args = args.into_iter();

    while let Some(a) = args.next() {
        match a.as_str() {
            "--scrape" => opts.scrape.enabled = true,
            "--snapshot" => opts.input.snapshots.push(PathBuf::from(value(&mut args, &a)?)),
            "--skeleton" => opts.merge.skeletons.push(PathBuf::from(value(&mut args, &a)?)),
            "-o" | "--out" => opts.output.document = PathBuf::from(value(&mut args, &a)?),
            "--save-snapshot" => opts.output.snapshot = Some(PathBuf::from(value(&mut args, &a)?)),
            "--sheets-out" => opts.output.sheets_dir = Some(PathBuf::from(value(&mut args, &a)?)),
            "--source" => opts.output.source_label = value(&mut args, &a)?,
            "--extracted-at" => opts.output.extracted_at = value(&mut args, &a)?,
            "--url" => opts.scrape.results_url = value(&mut args, &a)?,
            "--max-pages" => {
                let n: u32 = number(&mut args, &a)?;
                if n == 0 {
                    return Err(Error::InvalidArgument(s!("--max-pages must be at least 1")));
                }
                opts.scrape.max_pages = n;
            }
            "--pause-ms" => opts.scrape.pause = Duration::from_millis(number(&mut args, &a)?),
            "--insecure" => opts.scrape.accept_invalid_certs = true,
            "-v" | "--verbose" => verbose = true,
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(Error::InvalidArgument(format!("Unknown arg: {a}"))),
        }
    }

    if !opts.has_record_source() {
        return Err(Error::InvalidArgument(s!("nothing to read: pass --scrape and/or --snapshot <file>")));
    }
    Ok(Command::Run { opts, verbose })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command> {
        parse_args(line.split_whitespace().map(String::from))
    }

    #[test]
    fn full_line() {
        let Command::Run { opts, verbose } = parse(
            "--scrape --snapshot a.json --snapshot b.json --skeleton prev/ -o out/x.json \
             --sheets-out sheets --max-pages 3 --pause-ms 0 --source AD13 -v",
        )
        .unwrap() else {
            panic!("expected a run");
        };

        assert!(verbose);
        assert!(opts.scrape.enabled);
        assert_eq!(opts.input.snapshots, [PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(opts.merge.skeletons, [PathBuf::from("prev/")]);
        assert_eq!(opts.output.document, PathBuf::from("out/x.json"));
        assert_eq!(opts.output.sheets_dir, Some(PathBuf::from("sheets")));
        assert_eq!(opts.scrape.max_pages, 3);
        assert!(opts.scrape.pause.is_zero());
        assert_eq!(opts.output.source_label, "AD13");
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse("--scrape -h").unwrap(), Command::Help);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(parse(""), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse("--scrape --max-pages"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse("--scrape --max-pages x"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse("--scrape --max-pages 0"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse("--scrape --frobnicate"), Err(Error::InvalidArgument(_))));
    }
}
