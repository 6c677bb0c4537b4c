use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use kwtrie::{InputSet, LiteralStyle, TrieBuilder};

use clap::{error::ErrorKind, CommandFactory, Parser};

#[derive(Parser, Debug)]
#[clap(
    name = "compile",
    about = "A program to compile a keyword list into a trie stream."
)]
struct Args {
    /// Keyword list, one `keyword [value]` per line.
    #[clap(short = 'i', long)]
    keywords_in: PathBuf,

    /// File to which the raw trie stream is output.
    #[clap(short = 'o', long)]
    stream_out: Option<PathBuf>,

    /// File to which the trie stream is output as a C array.
    #[clap(long)]
    c_header_out: Option<PathBuf>,

    /// File to which the trie stream is output as a Rust array.
    #[clap(long)]
    rust_source_out: Option<PathBuf>,

    /// Name of the array in the source outputs.
    #[clap(long, default_value = "KEYWORD_TRIE")]
    name: String,

    /// Prints the loaded keywords before compiling them.
    #[clap(long)]
    show_input: bool,

    /// Prints the levels and nodes of the trie with their offsets.
    #[clap(long)]
    show_trie: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if args.stream_out.is_none()
        && args.c_header_out.is_none()
        && args.rust_source_out.is_none()
        && !args.show_trie
    {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "At least one of --stream-out, --c-header-out, --rust-source-out or --show-trie must be specified.",
            )
            .exit();
    }

    eprintln!("Loading the keyword list...: {:?}", &args.keywords_in);
    let input = InputSet::from_reader(File::open(&args.keywords_in)?)?;
    eprintln!("{} keywords", input.len());

    if args.show_input {
        for (keyword, value) in input.iter() {
            println!("{}\t{value}", keyword.escape_ascii());
        }
    }

    eprintln!("Building the trie...");
    let start = Instant::now();
    let builder = TrieBuilder::from_records(input.iter())?;
    eprintln!("{} seconds", start.elapsed().as_secs_f64());
    eprintln!(
        "{} nodes, {} index levels, max depth {}",
        builder.num_nodes(),
        builder.num_indices(),
        builder.max_depth()
    );

    if args.show_trie {
        print!("{}", builder.dump()?);
    }

    if let Some(stream_out) = args.stream_out {
        eprintln!("Writing the trie stream...: {:?}", &stream_out);
        let stream = builder.build()?;
        let mut wtr = BufWriter::new(File::create(stream_out)?);
        let num_bytes = stream.write(&mut wtr)?;
        wtr.flush()?;
        eprintln!("{num_bytes} bytes written");
    }

    for (path, style) in [
        (args.c_header_out, LiteralStyle::C),
        (args.rust_source_out, LiteralStyle::Rust),
    ] {
        if let Some(path) = path {
            eprintln!("Writing the {style:?} source...: {:?}", &path);
            let wtr = BufWriter::new(File::create(path)?);
            let num_bytes = builder.write_literal(wtr, style, &args.name)?;
            eprintln!("{num_bytes} bytes written");
        }
    }

    Ok(())
}
