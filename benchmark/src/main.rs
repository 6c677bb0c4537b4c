mod timer;

use std::error::Error;
use std::fs::File;
use std::hint::black_box;

use hashbrown::HashMap;
use kwtrie::{lookup, InputSet};

use timer::Timer;

use clap::Parser;

const TRIALS: usize = 10;

#[derive(Parser, Debug)]
#[clap(
    name = "benchmark",
    about = "A program to compare trie lookups against a hash table."
)]
struct Args {
    /// Keyword list, one `keyword [value]` per line.
    #[clap(short = 'i', long)]
    keywords_in: std::path::PathBuf,

    /// Number of passes over all keywords in one run.
    #[clap(short = 'n', long, default_value = "500")]
    iterations: usize,
}

/// Runs `f` over all keywords `iterations` times per trial and returns the
/// average nanoseconds taken by a call.
fn measure<F>(keywords: &[&[u8]], iterations: usize, mut f: F) -> f64
where
    F: FnMut(&[u8]) -> Option<u16>,
{
    let mut t = Timer::new();
    for _ in 0..TRIALS {
        t.start();
        for _ in 0..iterations {
            for &keyword in keywords {
                black_box(f(black_box(keyword)));
            }
        }
        t.stop();
    }
    t.discard_outliers();
    let num_calls = iterations * keywords.len();
    if num_calls == 0 {
        return 0.0;
    }
    t.average() * 1e9 / num_calls as f64
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    eprintln!("Loading the keyword list...: {:?}", &args.keywords_in);
    let input = InputSet::from_reader(File::open(&args.keywords_in)?)?;
    let stream = kwtrie::compile(input.iter())?;
    let mut map = HashMap::new();
    for (keyword, value) in input.iter() {
        map.insert(keyword, u16::try_from(value)?);
    }
    eprintln!("{} keywords, {} bytes", input.len(), stream.len());

    for (keyword, value) in map.iter() {
        if lookup(stream.as_bytes(), keyword) != Some(*value) {
            let msg = format!("keyword {:?} is missing in the trie", keyword.escape_ascii());
            return Err(msg.into());
        }
    }

    let keywords: Vec<&[u8]> = input.iter().map(|(k, _)| k).collect();

    let null_ns = measure(&keywords, args.iterations, |k| k.first().map(|&b| u16::from(b)));
    let hash_ns = measure(&keywords, args.iterations, |k| map.get(k).copied());
    let trie_ns = measure(&keywords, args.iterations, |k| lookup(stream.as_bytes(), k));

    println!("Number_of_keywords: {}", keywords.len());
    println!("Iterations: {}", args.iterations);
    println!("Null_loop_ns_per_lookup: {null_ns:.2}");
    println!("Hash_table_ns_per_lookup: {hash_ns:.2}");
    println!("Trie_ns_per_lookup: {trie_ns:.2}");
    println!(
        "Trie_minus_null_ns_per_lookup: {:.2}",
        (trie_ns - null_ns).max(0.0)
    );

    Ok(())
}
