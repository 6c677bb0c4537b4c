use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::test_utils::hashmap;
use crate::{compile, CompiledStream};

const ALPHABET: &[u8] = b"abcd";

fn random_keyword<R: Rng>(rng: &mut R, max_len: usize) -> Vec<u8> {
    let len = rng.gen_range(1..=max_len);
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}

fn random_map<R: Rng>(rng: &mut R, num: usize, max_len: usize) -> HashMap<Vec<u8>, u16> {
    let mut map = HashMap::new();
    while map.len() < num {
        let keyword = random_keyword(rng, max_len);
        let value = rng.gen();
        map.entry(keyword).or_insert(value);
    }
    map
}

fn check(stream: &CompiledStream, map: &HashMap<Vec<u8>, u16>) {
    for (keyword, &value) in map {
        assert_eq!(stream.lookup(keyword), Some(value), "{:?}", keyword.escape_ascii());
    }
}

#[test]
fn test_small_map() {
    let map = hashmap![
        b"to".to_vec() => 7,
        b"tea".to_vec() => 3,
        b"ted".to_vec() => 4,
        b"ten".to_vec() => 12,
        b"i".to_vec() => 11,
        b"in".to_vec() => 5,
        b"inn".to_vec() => 9,
    ];
    let stream = compile(map.iter().map(|(k, &v)| (k, u32::from(v)))).unwrap();
    check(&stream, &map);
    for query in ["t", "te", "tea\0", "innn", "A", ""] {
        assert_eq!(stream.lookup(query), None, "{query:?}");
    }
}

#[test]
fn test_random_sets() {
    let mut rng = StdRng::seed_from_u64(0x6b77_7472);
    for &(num, max_len) in &[(1, 3), (10, 4), (100, 6), (1000, 10)] {
        let map = random_map(&mut rng, num, max_len);
        let stream = compile(map.iter().map(|(k, &v)| (k, u32::from(v)))).unwrap();
        check(&stream, &map);

        for _ in 0..1000 {
            let query = random_keyword(&mut rng, max_len + 2);
            assert_eq!(stream.lookup(&query), map.get(&query).copied());
        }
    }
}

#[test]
fn test_insertion_order_independence() {
    let mut rng = StdRng::seed_from_u64(42);
    let map = random_map(&mut rng, 300, 8);
    let mut records: Vec<_> = map.iter().map(|(k, &v)| (k.clone(), u32::from(v))).collect();

    records.sort();
    let expected = compile(records.iter().map(|(k, v)| (k, *v))).unwrap();
    check(&expected, &map);

    for _ in 0..5 {
        records.shuffle(&mut rng);
        let stream = compile(records.iter().map(|(k, v)| (k, *v))).unwrap();
        assert_eq!(stream, expected);
    }
}

#[test]
fn test_reload() {
    let mut rng = StdRng::seed_from_u64(7);
    let map = random_map(&mut rng, 500, 12);
    let stream = compile(map.iter().map(|(k, &v)| (k, u32::from(v)))).unwrap();

    let mut buf = vec![];
    stream.write(&mut buf).unwrap();
    let reloaded = CompiledStream::read(buf.as_slice()).unwrap();
    check(&reloaded, &map);
}
