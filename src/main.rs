//! SOL25 Parser
//!
//! Reads a SOL25 program from standard input, checks it, and writes its
//! abstract syntax tree as XML to standard output.

mod backend;
mod driver;
mod feedback;
mod frontend;
mod stdlib;
mod utils;

use std::ffi::OsString;
use std::io::{self, Read, Write};
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;
use log::debug;

use feedback::{ErrorFormat, ErrorReport};
use utils::{exit_code, Error};

/// SOL25 parser
#[derive(Parser, Debug)]
#[command(name = "parse")]
#[command(about = "SOL25 parser - reads a program on stdin and writes its XML AST to stdout")]
#[command(override_usage = "parse < input_file")]
struct Cli {}

/// What the command line asks for
#[derive(Debug, PartialEq)]
enum Command {
    Translate,
    Help(String),
}

fn main() {
    env_logger::init();
    let format = ErrorFormat::from_env();

    match parse_args(std::env::args_os()) {
        Ok(Command::Translate) => {}
        Ok(Command::Help(usage)) => {
            if let Err(e) = write_stdout(&usage) {
                fail(&Error::Output(format!("{:#}", e)), None, format);
            }
            process::exit(exit_code::SUCCESS);
        }
        Err(e) => fail(&e, None, format),
    }

    let source = match read_source() {
        Ok(source) => source,
        Err(e) => fail(&Error::Input(format!("{:#}", e)), None, format),
    };
    debug!("read {} bytes of source", source.len());

    let document = match driver::translate(&source) {
        Ok(document) => document,
        Err(e) => fail(&e, Some(&source), format),
    };

    if let Err(e) = write_stdout(&document) {
        fail(&Error::Output(format!("{:#}", e)), None, format);
    }
}

/// Only a help flag is accepted; anything else is an argument error
fn parse_args<I, T>(args: I) -> Result<Command, Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(_) => Ok(Command::Translate),
        Err(e) if e.kind() == ErrorKind::DisplayHelp => Ok(Command::Help(e.to_string())),
        Err(e) => {
            let message = e.to_string();
            let first_line = message.lines().next().unwrap_or_default();
            let reason = first_line.trim_start_matches("error: ").to_string();
            Err(Error::InvalidArguments(reason))
        }
    }
}

/// Read the whole program from standard input
fn read_source() -> anyhow::Result<String> {
    let mut source = String::new();
    io::stdin()
        .lock()
        .read_to_string(&mut source)
        .context("failed to read program from standard input")?;
    Ok(source)
}

/// Write text (the XML document or usage) to standard output
fn write_stdout(text: &str) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .context("failed to write to standard output")?;
    stdout.flush().context("failed to flush standard output")?;
    Ok(())
}

/// Report an error on stderr and exit with its code
fn fail(error: &Error, source: Option<&str>, format: ErrorFormat) -> ! {
    let report = ErrorReport::from_error(error, source);
    eprintln!("{}", report.render(format));
    process::exit(error.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_translates() {
        assert_eq!(parse_args(["parse"]), Ok(Command::Translate));
    }

    #[test]
    fn test_help_flags() {
        for flag in ["-h", "--help"] {
            let err = Cli::try_parse_from(["parse", flag]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);

            match parse_args(["parse", flag]) {
                Ok(Command::Help(usage)) => assert!(usage.contains("parse < input_file")),
                other => panic!("expected help, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_unexpected_arguments_exit_10() {
        let err = Cli::try_parse_from(["parse", "extra"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);

        for args in [vec!["parse", "extra"], vec!["parse", "--source=x"], vec!["parse", "-v"]] {
            let err = parse_args(args).unwrap_err();
            assert!(matches!(err, Error::InvalidArguments(_)));
            assert_eq!(err.exit_code(), exit_code::MISSING_PARAM);
        }
    }
}
