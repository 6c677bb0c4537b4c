use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use kwtrie::CompiledStream;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(name = "search", about = "A program to look up keywords in a trie stream.")]
struct Args {
    /// Raw trie stream output by `compile`.
    #[clap(short = 'i', long)]
    stream_in: PathBuf,

    /// Keywords to look up. If none is given, they are read from stdin line by line.
    keywords: Vec<String>,
}

fn report(stream: &CompiledStream, keyword: &[u8]) {
    match stream.lookup(keyword) {
        Some(value) => println!("Value found is {value}"),
        None => println!("Not Found"),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Loading the trie stream...");
    let stream = CompiledStream::read(BufReader::new(File::open(args.stream_in)?))?;
    eprintln!("{} bytes", stream.len());

    if !args.keywords.is_empty() {
        for keyword in &args.keywords {
            report(&stream, keyword.as_bytes());
        }
        return Ok(());
    }

    eprintln!("Ready to search :)");
    #[allow(clippy::significant_drop_in_scrutinee)]
    for line in std::io::stdin().lock().split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        report(&stream, &line);
    }

    Ok(())
}
