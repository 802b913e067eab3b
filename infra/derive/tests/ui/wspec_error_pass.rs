use std::borrow::Cow;
use wspec_derive::wspec_error;

#[wspec_error]
#[derive(Debug)]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: std::num::ParseIntError, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, DemoError> {
    raw.trim().parse::<u32>().context("Parsing age threshold")
}

fn main() {
    assert!(parse("30").is_ok());
    assert!(parse("thirty").unwrap_err().context_message().is_some());
}
