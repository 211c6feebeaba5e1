use crate::error::Result;
use std::io::{self, BufRead, Write};

pub const URL_PROMPT: &str = "YouTube video URL: ";

/// Asks for the video URL on stdout and reads one line from stdin.
pub fn prompt_for_url() -> Result<String> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    read_url(&mut stdin.lock(), &mut stdout.lock())
}

pub fn read_url<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<String> {
    output.write_all(URL_PROMPT.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
