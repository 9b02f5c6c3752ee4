//! Cellbook - command-line front end for the workbook engine

mod config;
mod logger;
mod render;

use anyhow::{Context, Result, anyhow};
use cellbook_core::{CellRef, StyleAttribute, Workbook};
use std::env;
use std::path::{Path, PathBuf};

fn print_usage() {
    eprintln!("Usage: cellbook [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Workbook file to open (created on save)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula against the sheet and print it");
    eprintln!("  -s, --set <REF=INPUT>     Write a cell before anything else (repeatable)");
    eprintln!("  --style <REF@ATTR=VALUE>  Apply a style attribute (repeatable)");
    eprintln!("  --sheet <NAME>            Sheet to operate on (default: active sheet)");
    eprintln!("  -o, --output <FILE>       Write the result: .md exports markdown,");
    eprintln!("                            anything else saves the workbook");
    eprintln!("  --config <FILE>           Engine config (default: config dir config.toml)");
    eprintln!("  --no-config               Ignore the config file in the config dir");
    eprintln!("  -v, --verbose             Log edits and recalculation to stderr");
    eprintln!("  -h, --help                Print help");
}

#[derive(Default)]
struct Options {
    file_path: Option<PathBuf>,
    command: Option<String>,
    edits: Vec<String>,
    styles: Vec<String>,
    sheet: Option<String>,
    output_file: Option<PathBuf>,
    config_file: Option<PathBuf>,
    no_config: bool,
    verbose: bool,
}

fn option_value(args: &[String], i: &mut usize, flag: &str, what: &str) -> String {
    *i += 1;
    if *i >= args.len() {
        eprintln!("Error: {} requires {}", flag, what);
        std::process::exit(1);
    }
    args[*i].to_string()
}

fn parse_args(args: &[String]) -> Options {
    let mut opts = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-c" | "--command" => {
                opts.command = Some(option_value(args, &mut i, "--command", "a formula"));
            }
            "-s" | "--set" => {
                opts.edits.push(option_value(args, &mut i, "--set", "REF=INPUT"));
            }
            "--style" => {
                opts.styles
                    .push(option_value(args, &mut i, "--style", "REF@ATTR=VALUE"));
            }
            "--sheet" => {
                opts.sheet = Some(option_value(args, &mut i, "--sheet", "a sheet name"));
            }
            "-o" | "--output" => {
                let path = option_value(args, &mut i, "--output", "a file path");
                opts.output_file = Some(PathBuf::from(path));
            }
            "--config" => {
                let path = option_value(args, &mut i, "--config", "a file path");
                opts.config_file = Some(PathBuf::from(path));
            }
            "--no-config" => opts.no_config = true,
            "-v" | "--verbose" => opts.verbose = true,
            arg if arg.starts_with('-') && arg.len() > 1 => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if opts.file_path.is_none() {
                    opts.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }
    opts
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let opts = parse_args(&args);
    logger::init(opts.verbose);

    match run(&opts) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns the process exit code.
fn run(opts: &Options) -> Result<i32> {
    let config = config::load_config(opts.config_file.as_deref(), opts.no_config)?;

    let mut workbook = match &opts.file_path {
        Some(path) if path.exists() => Workbook::load(path, config)
            .with_context(|| format!("failed to open {}", path.display()))?,
        _ => Workbook::with_config(config),
    };

    let sheet = match &opts.sheet {
        Some(name) => {
            workbook.sheet(name)?;
            name.clone()
        }
        None => workbook.active_sheet_name().to_string(),
    };

    for edit in &opts.edits {
        let (cell_ref, input) = split_edit(edit)?;
        workbook.write_cell_value(&sheet, cell_ref, input)?;
    }
    for style in &opts.styles {
        let (cell_ref, attribute) = parse_style(style)?;
        workbook.apply_style(&sheet, cell_ref, attribute)?;
    }

    if let Some(formula) = &opts.command {
        let result = workbook.sheet(&sheet)?.evaluate(formula);
        match &opts.output_file {
            Some(path) => {
                let table = render::markdown_table("Result", &[(CellRef::new(0, 0), result.clone())]);
                render::write_markdown(path, &table)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                eprintln!("Result written to {}", path.display());
            }
            None => println!("{}", result),
        }
        return Ok(if result.starts_with('#') { 1 } else { 0 });
    }

    let changed = !opts.edits.is_empty() || !opts.styles.is_empty();
    match (&opts.output_file, &opts.file_path) {
        (Some(output), _) => {
            export(&workbook, &sheet, output)?;
            println!("Exported to {}", output.display());
        }
        (None, Some(path)) if changed => {
            workbook
                .save(path)
                .with_context(|| format!("failed to save {}", path.display()))?;
            eprintln!("Saved {}", path.display());
            print!("{}", render::sheet_markdown(workbook.sheet(&sheet)?));
        }
        _ => print!("{}", render::sheet_markdown(workbook.sheet(&sheet)?)),
    }
    Ok(0)
}

fn export(workbook: &Workbook, sheet: &str, path: &Path) -> Result<()> {
    let is_markdown = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
    if is_markdown {
        let content = render::sheet_markdown(workbook.sheet(sheet)?);
        render::write_markdown(path, &content)
            .with_context(|| format!("failed to write {}", path.display()))
    } else {
        workbook
            .save(path)
            .with_context(|| format!("failed to save {}", path.display()))
    }
}

/// `A1=10` or `B2==A1*2`; everything after the first `=` is cell input.
fn split_edit(edit: &str) -> Result<(CellRef, &str)> {
    let (cell_ref, input) = edit
        .split_once('=')
        .ok_or_else(|| anyhow!("expected REF=INPUT, got {:?}", edit))?;
    Ok((CellRef::parse(cell_ref.trim())?, input))
}

/// `A1@bold=true`
fn parse_style(arg: &str) -> Result<(CellRef, StyleAttribute)> {
    let (cell_ref, rest) = arg
        .split_once('@')
        .ok_or_else(|| anyhow!("expected REF@ATTR=VALUE, got {:?}", arg))?;
    let (name, value) = rest
        .split_once('=')
        .ok_or_else(|| anyhow!("expected REF@ATTR=VALUE, got {:?}", arg))?;
    let cell_ref = CellRef::parse(cell_ref.trim())?;
    let attribute = StyleAttribute::from_name_value(name.trim(), value)?;
    Ok((cell_ref, attribute))
}
