//! wmltag - tag dictionary and template insertion for WML-style markup

use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;

use tracing::{debug, warn};

use wmltag::config::Config;
use wmltag::dictionary::{seed, Definition, Mandatory, SaveMode, Scope};
use wmltag::display::Display;
use wmltag::document::Document;
use wmltag::error::{Result, TagError};
use wmltag::logging;
use wmltag::session::{SaveOutcome, Session};
use wmltag::storage::FileStore;
use wmltag::template;

fn main() {
    logging::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    // Handle --help and --version
    match args.first().map(String::as_str) {
        None | Some("--help") | Some("-h") => {
            print_usage();
            return Ok(());
        }
        Some("--version") | Some("-V") => {
            print_version();
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load();
    let store_dir = match take_option(&mut args, "--store")? {
        Some(dir) => PathBuf::from(dir),
        None => config
            .store_dir()
            .ok_or_else(|| TagError::Config("no store directory".to_string()))?,
    };
    debug!("Using store at {}", store_dir.display());

    let mut session = Session::new(FileStore::new(store_dir));
    if config.seed_library {
        if let Err(e) = session.store.seed(&seed::library()) {
            warn!("Seed library not merged: {}", e);
        }
    }

    let Some(command) = args.first().cloned() else {
        print_usage();
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "tags" => cmd_tags(&session, rest),
        "config" => cmd_config(&config, rest),
        "show" => cmd_show(&session, rest),
        "learn" => cmd_learn(&mut session, rest),
        "forget" => cmd_forget(&mut session, rest),
        "insert" => cmd_insert(&mut session, &config, rest),
        "highlight" => cmd_highlight(&mut session, &config, rest),
        other => Err(TagError::Message(format!(
            "Unknown command '{}' (try --help)",
            other
        ))),
    }
}

fn cmd_tags(session: &Session<FileStore>, args: &[String]) -> Result<()> {
    let long = args.iter().any(|a| a == "--long" || a == "-l");
    let labels = session.store.labels();
    if labels.is_empty() {
        println!("No tags defined");
    }
    for label in labels {
        if long {
            let definition = session.store.definition(&label.tag, label.index)?;
            print!("{}", describe(&label.label, &definition));
        } else {
            println!("{}", label.label);
        }
    }
    Ok(())
}

fn cmd_config(config: &Config, args: &[String]) -> Result<()> {
    if args.iter().any(|a| a == "--save") {
        config.save()?;
        if let Some(path) = Config::config_path() {
            println!("Wrote {}", path.display());
        }
        return Ok(());
    }

    if let Some(path) = Config::config_path() {
        println!("# {}", path.display());
    }
    if let Some(dir) = config.store_dir() {
        println!("store-dir = {}", dir.display());
    }
    println!("line-numbers = {}", config.line_numbers);
    println!("seed-library = {}", config.seed_library);
    Ok(())
}

/// Detailed listing of one version: keys with level and scope badges
/// (M/O mandatory or optional, O/U official or umc), nested tags, comments
fn describe(label: &str, definition: &Definition) -> String {
    let mut out = format!("{}\n", label);
    if !definition.comment.is_empty() {
        out.push_str(&format!("    # {}\n", definition.comment));
    }
    for key in &definition.keys {
        let level = match key.mandatory {
            Mandatory::Mandatory => 'M',
            Mandatory::Optional => 'O',
        };
        let scope = match key.scope {
            Scope::Official => 'O',
            Scope::Umc => 'U',
        };
        out.push_str(&format!(
            "    {}={} ({}) [{}] [{}]",
            key.name,
            key.default_value,
            key.key_type.name(),
            level,
            scope
        ));
        if !key.comment.is_empty() {
            out.push_str(&format!(" # {}", key.comment));
        }
        out.push('\n');
    }
    if !definition.nested_tags.is_empty() {
        out.push_str(&format!("    nested: {}\n", definition.nested_tags));
    }
    out
}

fn cmd_show(session: &Session<FileStore>, args: &[String]) -> Result<()> {
    let mut args = args.to_vec();
    let annotated = take_flag(&mut args, "--annotated");
    let tag = arg(&args, 0, "tag")?;
    let version = match args.get(1) {
        Some(n) => parse_version(n)?,
        None => 0,
    };

    let definition = session.store.definition(tag, version)?;
    let indent = session.indentation();
    if annotated {
        print!("{}", template::format_annotated(tag, &definition, &indent));
    } else {
        print!("{}", template::template(tag, &definition, &indent));
    }
    Ok(())
}

fn cmd_learn(session: &mut Session<FileStore>, args: &[String]) -> Result<()> {
    let mut args = args.to_vec();
    let mode = if take_flag(&mut args, "--replace") {
        Some(SaveMode::Replace)
    } else if take_flag(&mut args, "--append") {
        Some(SaveMode::Append)
    } else {
        None
    };

    let path = arg(&args, 0, "file")?;
    let input = fs::read_to_string(path)?;

    let saved = match mode {
        Some(mode) => session.save_manual_with(&input, mode)?,
        None => match session.save_manual(&input)? {
            SaveOutcome::Saved(saved) => saved,
            SaveOutcome::Conflict(tag) => {
                session.cancel_pending();
                return Err(TagError::Message(format!(
                    "Tag '{}' already exists; rerun with --append or --replace",
                    tag
                )));
            }
        },
    };

    println!("Saved: {}", saved.join(", "));
    println!("Dictionary: {}", session.store.summary());
    Ok(())
}

fn cmd_forget(session: &mut Session<FileStore>, args: &[String]) -> Result<()> {
    let tag = arg(args, 0, "tag")?;
    let version = parse_version(arg(args, 1, "version")?)?;
    session.store.delete(tag, version)?;
    println!("Dictionary: {}", session.store.summary());
    Ok(())
}

fn cmd_insert(session: &mut Session<FileStore>, config: &Config, args: &[String]) -> Result<()> {
    let mut args = args.to_vec();
    let at = take_option(&mut args, "--at")?
        .map(|n| {
            n.parse::<usize>()
                .map_err(|_| TagError::Message(format!("Invalid index '{}'", n)))
        })
        .transpose()?;

    let tag = arg(&args, 0, "tag")?.to_string();
    let (version, path) = match args.len() {
        0 | 1 => return Err(TagError::Message("Missing <file> argument".to_string())),
        2 => (0, PathBuf::from(&args[1])),
        _ => (
            parse_version(arg(&args, 1, "version")?)?,
            PathBuf::from(arg(&args, 2, "file")?),
        ),
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    session.open(Document::from_text(&text));
    if let Some(at) = at {
        session.last_cursor = at;
    }

    let cursor = session.insert(&tag, version)?;

    let Some(doc) = session.document.as_ref() else {
        return Err(TagError::NoActiveDocument);
    };
    fs::write(&path, doc.flat_text())?;

    Display::new(config.line_numbers).render(doc, &mut io::stdout())?;
    println!();
    println!("Cursor at {}", cursor);
    Ok(())
}

fn cmd_highlight(session: &mut Session<FileStore>, config: &Config, args: &[String]) -> Result<()> {
    let path = arg(args, 0, "file")?;
    let text = fs::read_to_string(path)?;

    session.open(Document::from_text(&text));
    session.refresh();

    if let Some(doc) = session.document.as_ref() {
        Display::new(config.line_numbers).render(doc, &mut io::stdout())?;
        println!();
    }
    Ok(())
}

/// Positional argument `idx`, or an error naming it
fn arg<'a>(args: &'a [String], idx: usize, name: &str) -> Result<&'a str> {
    args.get(idx)
        .map(String::as_str)
        .ok_or_else(|| TagError::Message(format!("Missing <{}> argument", name)))
}

/// 1-based version number from the command line, as a 0-based index
fn parse_version(s: &str) -> Result<usize> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(TagError::Message(format!("Invalid version '{}'", s))),
    }
}

/// Remove `flag` from `args`, reporting whether it was there
fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    match args.iter().position(|a| a == flag) {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}

/// Remove `name VALUE` from `args` and return the value
fn take_option(args: &mut Vec<String>, name: &str) -> Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        return Err(TagError::Message(format!("{} needs a value", name)));
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

fn print_usage() {
    println!("wmltag {} - tag dictionary and template insertion", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: wmltag [--store DIR] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  tags [--long]                   List defined tags (with keys)");
    println!("  show <TAG> [N] [--annotated]    Print the template for version N");
    println!("  learn <FILE> [--append|--replace]");
    println!("                                  Read tag definitions from FILE");
    println!("  forget <TAG> <N>                Delete version N of a tag");
    println!("  insert <TAG> [N] <FILE> [--at INDEX]");
    println!("                                  Insert a template into FILE");
    println!("  highlight <FILE>                Show FILE with key highlighting");
    println!("  config [--save]                 Show settings, or write them to ~/.wmltag.toml");
    println!();
    println!("Options:");
    println!("  --store DIR    Dictionary and settings directory (default ~/.wmltag)");
    println!("  -h, --help     Show this help message");
    println!("  -V, --version  Show version information");
    println!();
    println!("Definition format (for learn):");
    println!("  [event]");
    println!("  # Optional description");
    println!("  name=foo (string, mandatory, official) # optional comment");
    println!("  nested_tags = \"filter, command\"");
    println!("  [/event]");
    println!();
    println!("Settings are read from ~/.wmltag.toml; set WMLTAG_LOG=debug for logs.");
}

fn print_version() {
    println!("wmltag {}", env!("CARGO_PKG_VERSION"));
    println!("Tag dictionary and template insertion for WML-style markup");
}
