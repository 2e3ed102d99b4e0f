// Compares anchored matching against the regex crate over every string up to
// a fixed length drawn from a small alphabet.

use thompson_nfa::{compile, Regex};

const PATTERNS: &[&str] = &[
    "a",
    "abc",
    "a*",
    "a+",
    "a?",
    "ab?c",
    "a|b",
    "a.c",
    "ab|c",
    "a|bc",
    "(a|b)*c",
    "(ab|a)(bc|c)",
    "a*b*c*",
    "(a*)*b",
    "(a+)+b",
    "((a|b)(b|c))+",
    "a?a?a?aaa",
    "(a|b)*a(a|b)(a|b)",
    ".*b.*",
    "(.a|b.)+",
    "(a|b|c)?(c|b|a)?",
    "a(b(c)?)*",
];

/// Every string over {a, b, c} of length at most `max`.
fn haystacks_up_to(max: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max {
        let mut next = Vec::new();
        for s in &frontier {
            for ch in ['a', 'b', 'c'] {
                let mut t = s.clone();
                t.push(ch);
                next.push(t);
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    all
}

fn oracle(pattern: &str) -> regex::Regex {
    regex::Regex::new(&format!("^(?s:{})$", pattern)).unwrap()
}

#[test]
fn agrees_with_regex_crate() -> anyhow::Result<()> {
    crate::init_logging();
    let haystacks = haystacks_up_to(6);
    for pattern in PATTERNS {
        let ours = compile(pattern)?;
        let expected = oracle(pattern);
        let mut matcher = ours.matcher();
        for haystack in &haystacks {
            assert_eq!(
                matcher.is_match(haystack),
                expected.is_match(haystack),
                "pattern {:?}, haystack {:?}",
                pattern,
                haystack,
            );
        }
    }
    Ok(())
}

#[test]
fn compiling_twice_is_equivalent() -> anyhow::Result<()> {
    let haystacks = haystacks_up_to(5);
    for pattern in PATTERNS {
        let first = compile(pattern)?;
        let second = compile(pattern)?;
        assert_eq!(first.nfa(), second.nfa());
        for haystack in &haystacks {
            assert_eq!(first.is_match(haystack), second.is_match(haystack));
            assert_eq!(
                first.find(haystack).map(|m| m.range()),
                second.find(haystack).map(|m| m.range()),
            );
        }
    }
    Ok(())
}

#[test]
fn find_agrees_on_leftmost_start() -> anyhow::Result<()> {
    let haystacks = haystacks_up_to(5);
    for pattern in PATTERNS {
        let ours = Regex::new(pattern)?;
        let unanchored = regex::Regex::new(&format!("(?s:{})", pattern))?;
        let anchored = oracle(pattern);
        for haystack in &haystacks {
            let got = ours.find(haystack);
            let want = unanchored.find(haystack);
            assert_eq!(
                got.map(|m| m.start()),
                want.map(|m| m.start()),
                "pattern {:?}, haystack {:?}",
                pattern,
                haystack,
            );
            if let (Some(got), Some(want)) = (got, want) {
                // Leftmost-longest never stops short of leftmost-first.
                assert!(got.end() >= want.end());
                assert!(anchored.is_match(got.as_str()));
            }
        }
    }
    Ok(())
}
