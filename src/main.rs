use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::PathBuf;
use textsweep_lib::services::{ConfigStore, Sanitizer};
use textsweep_lib::init_logging;

const USAGE: &str = "Usage:\n  textsweep [<path>|-] [--strip-markup] [--no-normalize] [--annotated] [--json] [--config <path>] [--out <path>]\n\nNotes:\n  - Reads stdin when no path (or `-`) is given.\n  - Prints the cleaned text by default; the stats summary goes to stderr.\n  - `--annotated` prints the HTML-annotated original instead, `--json` prints everything.";

const VALUE_OPTIONS: [&str; 2] = ["--config", "--out"];

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

/// First argument that is neither a flag nor the value of a value option.
fn positional(args: &[String]) -> Option<String> {
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if VALUE_OPTIONS.contains(&a.as_str()) {
            i += 2;
            continue;
        }
        if a == "-" || !a.starts_with("--") {
            return Some(a.clone());
        }
        i += 1;
    }
    None
}

fn read_input(path: Option<&str>) -> Result<String> {
    let bytes = match path {
        None | Some("-") => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).context("read stdin failed")?;
            buf
        }
        Some(p) => std::fs::read(p).with_context(|| format!("read file failed: {}", p))?,
    };
    // Invalid UTF-8 is replaced rather than rejected.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    init_logging("warn");

    let store = match parse_arg_value(&args, "--config") {
        Some(p) => Some(ConfigStore::for_file(PathBuf::from(p))),
        None => ConfigStore::discover(),
    };
    let config = match store {
        Some(store) => store
            .load()
            .with_context(|| format!("load config failed: {}", store.config_file().display()))?,
        None => Default::default(),
    };

    let mut sanitizer = Sanitizer::from_config(&config).context("invalid phrase configuration")?;
    if has_flag(&args, "--strip-markup") {
        sanitizer.options_mut().strip_markup = true;
    }
    if has_flag(&args, "--no-normalize") {
        sanitizer.options_mut().normalize = false;
    }

    let input_path = positional(&args);
    let text = read_input(input_path.as_deref())?;
    let response = sanitizer.sanitize(&text);

    let rendered = if has_flag(&args, "--json") {
        serde_json::to_string_pretty(&response).context("serialize response failed")?
    } else if has_flag(&args, "--annotated") {
        response.annotated_text.clone()
    } else {
        response.clean_text.clone()
    };

    match parse_arg_value(&args, "--out") {
        Some(out) => std::fs::write(&out, &rendered).with_context(|| format!("write output failed: {}", out))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes()).context("write stdout failed")?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n").context("write stdout failed")?;
            }
        }
    }

    eprintln!("{}", response.summary());
    Ok(())
}
