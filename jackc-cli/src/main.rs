//! Entrypoint for CLI
use std::{
    env, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use jackc::{
    constants::{CONFIG_FILENAME, IMPL_VERSION},
    lex::{dump_tokens, tokenize},
    prelude::*,
};
use log::{error, info};

static USAGE: &str = r#"
usage: jackc [--config FILE] CMD PATH

commands:
    build       Compile a .jack file, or every .jack file in a directory
    tokens      Print the tokens of a .jack file
    symbols     Compile a .jack file and print its symbol tables

options:
    --config    YAML configuration file, defaults to ./jackc.yaml when present

examples:
    jackc build Main.jack
    jackc build projects/Square
    jackc --config jackc.yaml tokens Main.jack
"#;

// FreeBSD sysexits.
const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_NOINPUT: i32 = 66;
const EX_FAILURE: i32 = 1;

fn run_build(conf: CompilerConf, path: &Path) -> i32 {
    let driver = match Driver::new(conf) {
        Ok(driver) => driver,
        Err(err) => {
            error!("{err}");
            return EX_FAILURE;
        }
    };

    let report = match driver.compile_path(path) {
        Ok(report) => report,
        Err(err) => {
            error!("{err}");
            return EX_FAILURE;
        }
    };

    info!(
        "compiled {}, skipped {}, failed {}",
        report.compiled.len(),
        report.skipped.len(),
        report.failed.len()
    );

    match report.failed.first() {
        None => 0,
        Some((_, err)) if err.is_source_error() => EX_DATAERR,
        Some(_) => EX_FAILURE,
    }
}

fn run_tokens(path: &Path) -> JackResult<()> {
    let file_bytes = fs::read(path)?;
    let source_code = String::from_utf8(file_bytes)?;
    let tokens = tokenize(&source_code)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "line  kind                  text")?;
    dump_tokens(&tokens, &mut out)?;
    Ok(())
}

fn run_symbols(conf: CompilerConf, path: &Path) -> JackResult<()> {
    let driver = Driver::new(conf)?;
    let compilation = driver.compile_source(path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for table in &compilation.tables {
        writeln!(out, "{table}")?;
    }
    Ok(())
}

fn exit_code(err: &JackError) -> i32 {
    if err.is_source_error() {
        EX_DATAERR
    } else {
        EX_FAILURE
    }
}

fn main() {
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let Some(args) = parse_args(env::args().skip(1)) else {
        print_usage();
        std::process::exit(EX_USAGE)
    };

    let conf = match load_config(args.config.as_deref()) {
        Ok(conf) => conf,
        Err(err) => {
            error!("{err}");
            std::process::exit(EX_FAILURE)
        }
    };

    let path = args.cmd.path();
    if !path.exists() {
        error!("{}: no such file or directory", path.display());
        std::process::exit(EX_NOINPUT)
    }

    let code = match args.cmd {
        Cmd::Build { path } => run_build(conf, &path),
        Cmd::Tokens { path } => run_tokens(&path).map_or_else(|err| report(&err), |_| 0),
        Cmd::Symbols { path } => run_symbols(conf, &path).map_or_else(|err| report(&err), |_| 0),
    };

    std::process::exit(code)
}

fn report(err: &JackError) -> i32 {
    error!("{err}");
    exit_code(err)
}

/// Explicit configuration file, else `jackc.yaml` in the working directory, else defaults.
fn load_config(path: Option<&Path>) -> JackResult<CompilerConf> {
    match path {
        Some(path) => CompilerConf::from_file(path),
        None if Path::new(CONFIG_FILENAME).is_file() => CompilerConf::from_file(CONFIG_FILENAME),
        None => Ok(CompilerConf::default()),
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Args> {
    let mut config = None;
    let mut cmd = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config = Some(PathBuf::from(args.next()?)),
            "build" if cmd.is_none() => cmd = Some(Cmd::Build { path: consume_arg(&mut args)? }),
            "tokens" if cmd.is_none() => cmd = Some(Cmd::Tokens { path: consume_arg(&mut args)? }),
            "symbols" if cmd.is_none() => cmd = Some(Cmd::Symbols { path: consume_arg(&mut args)? }),
            _ => return None,
        }
    }

    Some(Args { config, cmd: cmd? })
}

/// Consumes the next argument as a path.
fn consume_arg(args: &mut impl Iterator<Item = String>) -> Option<PathBuf> {
    args.next().map(PathBuf::from)
}

fn print_usage() {
    println!("jackc v{IMPL_VERSION}");
    println!("{USAGE}");
}

struct Args {
    config: Option<PathBuf>,
    cmd: Cmd,
}

enum Cmd {
    /// Compile file or directory
    Build { path: PathBuf },
    /// Dump tokens
    Tokens { path: PathBuf },
    /// Dump symbol tables
    Symbols { path: PathBuf },
}

impl Cmd {
    fn path(&self) -> &Path {
        match self {
            Cmd::Build { path } | Cmd::Tokens { path } | Cmd::Symbols { path } => path,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(line: &str) -> Option<Args> {
        parse_args(line.split_whitespace().map(String::from))
    }

    #[test]
    fn test_parse_build() {
        let args = args("build src/Main.jack").unwrap();
        assert!(args.config.is_none());
        assert!(matches!(args.cmd, Cmd::Build { .. }));
        assert_eq!(args.cmd.path(), Path::new("src/Main.jack"));
    }

    #[test]
    fn test_parse_config_anywhere() {
        let args = args("tokens Main.jack --config conf.yaml").unwrap();
        assert_eq!(args.config, Some(PathBuf::from("conf.yaml")));
        assert!(matches!(args.cmd, Cmd::Tokens { .. }));
    }

    #[test]
    fn test_usage_errors() {
        assert!(args("").is_none());
        assert!(args("build").is_none());
        assert!(args("run Main.jack").is_none());
        assert!(args("build a.jack symbols b.jack").is_none());
        assert!(args("--config").is_none());
    }
}
