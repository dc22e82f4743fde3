//! fencemark CLI - print the event stream of a markdown document

use std::io::{self, Read, Write};

fn main() -> io::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    // Simple usage: read from stdin or file
    let input = if args.len() > 1 && args[1] != "-" {
        std::fs::read_to_string(&args[1])?
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    };

    let events = fencemark::tokenize(&input).map_err(io::Error::other)?;

    let mut out = io::BufWriter::new(io::stdout().lock());
    for event in &events {
        writeln!(out, "{event}")?;
    }
    out.flush()
}
