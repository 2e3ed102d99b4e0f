use quickcheck::{Arbitrary, Gen, QuickCheck, TestResult};
use thompson_nfa::{compile, Regex};

/// A well-formed pattern over `a`, `b` and `.` that is also valid syntax for
/// the regex crate.
#[derive(Clone, Debug)]
struct Pattern(String);

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Pattern {
        Pattern(gen_pattern(g, 4))
    }
}

fn gen_atom(g: &mut Gen) -> String {
    g.choose(&["a", "b", "."]).copied().unwrap_or("a").to_string()
}

fn gen_pattern(g: &mut Gen, depth: u32) -> String {
    if depth == 0 {
        return gen_atom(g);
    }
    match u8::arbitrary(g) % 6 {
        0 => gen_atom(g),
        1 => gen_pattern(g, depth - 1) + &gen_pattern(g, depth - 1),
        2 => format!(
            "({}|{})",
            gen_pattern(g, depth - 1),
            gen_pattern(g, depth - 1)
        ),
        3 => format!("({})*", gen_pattern(g, depth - 1)),
        4 => format!("({})+", gen_pattern(g, depth - 1)),
        _ => format!("({})?", gen_pattern(g, depth - 1)),
    }
}

/// A haystack over `a` and `b`.
#[derive(Clone, Debug)]
struct Haystack(String);

impl Arbitrary for Haystack {
    fn arbitrary(g: &mut Gen) -> Haystack {
        let bits: Vec<bool> = Vec::arbitrary(g);
        Haystack(bits.into_iter().take(24).map(|b| if b { 'a' } else { 'b' }).collect())
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Haystack>> {
        let s = self.0.clone();
        Box::new((0..s.len()).rev().map(move |n| Haystack(s[..n].to_string())))
    }
}

#[test]
fn random_patterns_agree_with_regex_crate() {
    fn prop(p: Pattern, h: Haystack) -> bool {
        let ours = compile(&p.0).unwrap();
        let oracle = regex::Regex::new(&format!("^(?s:{})$", p.0)).unwrap();
        ours.is_match(&h.0) == oracle.is_match(&h.0)
    }
    QuickCheck::new()
        .tests(1_000)
        .quickcheck(prop as fn(Pattern, Haystack) -> bool);
}

#[test]
fn full_match_implies_find_spans_haystack() {
    fn prop(p: Pattern, h: Haystack) -> TestResult {
        let re = compile(&p.0).unwrap();
        if !re.is_match(&h.0) {
            return TestResult::discard();
        }
        let m = re.find(&h.0);
        TestResult::from_bool(m.map(|m| m.range()) == Some(0..h.0.len()))
    }
    QuickCheck::new().quickcheck(prop as fn(Pattern, Haystack) -> TestResult);
}

#[test]
fn matching_is_deterministic() {
    fn prop(p: Pattern, h: Haystack) -> bool {
        let first = compile(&p.0).unwrap();
        let second = compile(&p.0).unwrap();
        let mut reused = first.matcher();
        let expected = first.is_match(&h.0);
        second.is_match(&h.0) == expected
            && reused.is_match(&h.0) == expected
            && reused.is_match(&h.0) == expected
    }
    QuickCheck::new().quickcheck(prop as fn(Pattern, Haystack) -> bool);
}

#[test]
fn escaped_text_matches_itself() {
    fn prop(text: String) -> TestResult {
        if text.is_empty() {
            return TestResult::discard();
        }
        let pattern: String = text.chars().flat_map(|c| ['\\', c]).collect();
        let re = match Regex::new(&pattern) {
            Ok(re) => re,
            Err(_) => return TestResult::failed(),
        };
        let mut longer = text.clone();
        longer.push('x');
        TestResult::from_bool(re.is_match(&text) && !re.is_match(&longer))
    }
    QuickCheck::new().quickcheck(prop as fn(String) -> TestResult);
}

#[test]
fn star_accepts_only_repeats() {
    fn prop(h: String) -> bool {
        let re = compile("a*").unwrap();
        re.is_match(&h) == h.chars().all(|c| c == 'a')
    }
    QuickCheck::new().quickcheck(prop as fn(String) -> bool);
}
