use crate::{lookup, InputSet, LiteralStyle, TrieBuilder};

const SQL_KEYWORDS: &str = include_str!("./resources/sql_keywords.txt");

fn load() -> InputSet {
    InputSet::from_reader(SQL_KEYWORDS.as_bytes()).unwrap()
}

#[test]
fn test_sql_keywords() {
    let input = load();
    assert_eq!(input.len(), 91);

    let builder = TrieBuilder::from_records(input.iter()).unwrap();
    assert_eq!(builder.num_keywords(), input.len());
    let stream = builder.build().unwrap();

    for (keyword, value) in input.iter() {
        assert_eq!(
            lookup(stream.as_bytes(), keyword),
            Some(u16::try_from(value).unwrap()),
            "{:?}",
            keyword.escape_ascii()
        );
    }
}

#[test]
fn test_sql_keywords_misses() {
    let input = load();
    let stream = crate::compile(input.iter()).unwrap();

    for (keyword, _) in input.iter() {
        for end in 1..keyword.len() {
            let prefix = &keyword[..end];
            if input.iter().all(|(k, _)| k != prefix) {
                assert_eq!(stream.lookup(prefix), None, "{:?}", prefix.escape_ascii());
            }
        }
        let mut extended = keyword.to_vec();
        extended.push(b'_');
        assert_eq!(stream.lookup(&extended), None);

        let upper = keyword.to_ascii_uppercase();
        assert_eq!(stream.lookup(&upper), None);
    }
}

#[test]
fn test_sql_keywords_stats() {
    let builder = TrieBuilder::from_records(load().iter()).unwrap();
    assert!(builder.num_nodes() >= builder.num_keywords());
    assert!(builder.num_indices() <= builder.num_nodes());
    assert_eq!(builder.max_depth(), max_depth_of(&builder));
}

#[test]
fn test_sql_keywords_literal() {
    let builder = TrieBuilder::from_records(load().iter()).unwrap();
    let stream = builder.build().unwrap();

    let mut buf = vec![];
    let num_bytes = builder
        .write_literal(&mut buf, LiteralStyle::C, "sql_keywords")
        .unwrap();
    assert_eq!(num_bytes, stream.len());

    let lit = String::from_utf8(buf).unwrap();
    let header = format!("static const unsigned char sql_keywords[{}] = {{", stream.len());
    assert!(lit.starts_with(&header));
    assert!(lit.ends_with("\n};\n"));
    let body_lines = lit.lines().count() - 2;
    assert_eq!(body_lines, (stream.len() + 15) / 16);
}

/// Counts the levels in the textual dump, which starts every index at a new
/// level.
fn max_depth_of(builder: &TrieBuilder) -> usize {
    let dump = builder.dump().unwrap().to_string();
    dump.lines()
        .filter(|line| line.trim_start().starts_with("Level"))
        .filter_map(|line| {
            line.trim_start()
                .strip_prefix("Level ")?
                .split(' ')
                .next()?
                .parse::<usize>()
                .ok()
        })
        .max()
        .map_or(0, |level| level + 1)
}
