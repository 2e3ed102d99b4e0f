/*!
Pike-style simulation of a compiled [`NFA`].

A [`Matcher`] is a search session. It owns two active-state sets that are
swapped after every input character, plus a table of generation stamps used
to keep each state from being added to a set twice. The NFA itself is only
ever read, so any number of matchers may search the same NFA at once as long
as each has its own session.
*/

use std::mem;

use crate::nfa::{StateId, Symbol, NFA};

/// A single match found in a haystack.
///
/// Offsets are byte offsets, so `&haystack[m.start()..m.end()]` is always
/// valid.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Match<'h> {
    haystack: &'h str,
    start: usize,
    end: usize,
}

impl<'h> Match<'h> {
    fn new(haystack: &'h str, start: usize, end: usize) -> Match<'h> {
        Match { haystack, start, end }
    }

    /// The byte offset where the match starts.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The byte offset just past the end of the match.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// The byte range of the match.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// The matched text.
    pub fn as_str(&self) -> &'h str {
        &self.haystack[self.range()]
    }

    /// Returns true if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The length of the match in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// A live NFA state and the haystack offset at which its thread began.
#[derive(Clone, Copy, Debug)]
struct Thread {
    id: StateId,
    start: usize,
}

/// The states reachable at one haystack position.
///
/// When searching, threads are kept in ascending order of start offset. That
/// falls out of stepping threads in list order and seeding new threads last.
#[derive(Clone, Debug, Default)]
struct ActiveSet {
    threads: Vec<Thread>,
}

impl ActiveSet {
    fn with_capacity(capacity: usize) -> ActiveSet {
        ActiveSet { threads: Vec::with_capacity(capacity) }
    }

    fn clear(&mut self) {
        self.threads.clear();
    }

    fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    /// The smallest start offset among threads sitting in the match state.
    fn match_start(&self, nfa: &NFA) -> Option<usize> {
        self.threads
            .iter()
            .find(|t| nfa.state(t.id).symbol == Symbol::Match)
            .map(|t| t.start)
    }
}

/// Follows epsilon transitions, stamping each state it visits with the
/// current generation so that no state enters a set twice per step.
#[derive(Clone, Debug)]
struct Closure {
    stamps: Vec<u32>,
    generation: u32,
    stack: Vec<StateId>,
}

impl Closure {
    fn new(len: usize) -> Closure {
        Closure { stamps: vec![0; len], generation: 0, stack: Vec::new() }
    }

    /// Invalidate every stamp at once.
    fn next_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Stamps from 2^32 generations ago would look current again.
            self.stamps.fill(0);
            self.generation = 1;
        }
    }

    /// Add `id` and everything reachable from it through split states to
    /// `set`, all attributed to a thread that started at `start`.
    fn add(
        &mut self,
        nfa: &NFA,
        set: &mut ActiveSet,
        id: Option<StateId>,
        start: usize,
    ) {
        self.stack.extend(id);
        while let Some(id) = self.stack.pop() {
            // Guard before following anything, otherwise the back edges
            // from '*' and '+' would loop forever.
            if self.stamps[id] == self.generation {
                continue;
            }
            self.stamps[id] = self.generation;
            let state = nfa.state(id);
            if state.symbol == Symbol::Split {
                // Pushed in reverse so out1 is explored first.
                self.stack.extend(state.out2);
                self.stack.extend(state.out1);
            }
            set.threads.push(Thread { id, start });
        }
    }
}

/// A search session over an NFA.
///
/// A matcher keeps its buffers between searches, so reusing one for many
/// haystacks avoids reallocating. It's not meant to be shared: give every
/// thread its own matcher over the same NFA instead.
#[derive(Clone, Debug)]
pub struct Matcher<'a> {
    nfa: &'a NFA,
    clist: ActiveSet,
    nlist: ActiveSet,
    closure: Closure,
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given NFA
    pub fn new(nfa: &'a NFA) -> Self {
        Self {
            nfa,
            clist: ActiveSet::with_capacity(nfa.len()),
            nlist: ActiveSet::with_capacity(nfa.len()),
            closure: Closure::new(nfa.len()),
        }
    }

    /// The NFA this matcher searches.
    pub fn nfa(&self) -> &'a NFA {
        self.nfa
    }

    /// Check if the entire input matches
    pub fn is_match(&mut self, haystack: &str) -> bool {
        let nfa = self.nfa;
        self.closure.next_generation();
        self.clist.clear();
        self.closure.add(nfa, &mut self.clist, Some(nfa.start()), 0);

        for ch in haystack.chars() {
            if self.clist.is_empty() {
                trace!("no live states left, rejecting before {:?}", ch);
                return false;
            }
            self.step(ch, None);
            mem::swap(&mut self.clist, &mut self.nlist);
        }
        self.clist.match_start(nfa).is_some()
    }

    /// Find the leftmost-longest match anywhere in the haystack.
    pub fn find<'h>(&mut self, haystack: &'h str) -> Option<Match<'h>> {
        self.find_at(haystack, 0)
    }

    /// Find the leftmost-longest match that starts at or after `start`.
    ///
    /// This runs in one pass over the haystack: a new thread is seeded at
    /// every position until some thread reaches the match state, and threads
    /// that started earlier win whenever two reach the same state.
    ///
    /// # Panics
    ///
    /// When `start` is past the end of `haystack` or not on a `char`
    /// boundary.
    pub fn find_at<'h>(
        &mut self,
        haystack: &'h str,
        start: usize,
    ) -> Option<Match<'h>> {
        let nfa = self.nfa;
        let mut best: Option<Match<'h>> = None;
        self.closure.next_generation();
        self.clist.clear();
        self.closure.add(nfa, &mut self.clist, Some(nfa.start()), start);

        let mut at = start;
        let mut chars = haystack[start..].chars();
        loop {
            if let Some(s) = self.clist.match_start(nfa) {
                // Either further left than the best so far, or the same start
                // and further right.
                if best.map_or(true, |m| s <= m.start()) {
                    best = Some(Match::new(haystack, s, at));
                }
            }
            if best.is_some() && self.clist.is_empty() {
                break;
            }
            let Some(ch) = chars.next() else { break };
            self.step(ch, best);
            at += ch.len_utf8();
            if best.is_none() {
                self.closure.add(nfa, &mut self.nlist, Some(nfa.start()), at);
            }
            mem::swap(&mut self.clist, &mut self.nlist);
        }
        best
    }

    /// Return an iterator over successive non-overlapping matches.
    pub fn find_iter<'h>(self, haystack: &'h str) -> Matches<'a, 'h> {
        Matches { matcher: self, haystack, at: 0, last_end: None }
    }

    /// Advance every thread in `clist` past `ch`, filling `nlist`.
    ///
    /// Threads that started after `best` can no longer produce a better
    /// match, so they're dropped.
    fn step(&mut self, ch: char, best: Option<Match<'_>>) {
        let nfa = self.nfa;
        self.closure.next_generation();
        self.nlist.clear();
        for thread in self.clist.threads.iter() {
            if best.map_or(false, |m| thread.start > m.start()) {
                // Starts only increase from here on.
                break;
            }
            let state = nfa.state(thread.id);
            if state.symbol.matches(ch) {
                self.closure.add(nfa, &mut self.nlist, state.out1, thread.start);
            }
        }
        trace!(
            "step {:?}: {} -> {} active states",
            ch,
            self.clist.threads.len(),
            self.nlist.threads.len(),
        );
    }
}

/// An iterator over non-overlapping leftmost-longest matches.
///
/// Created by [`Matcher::find_iter`] or
/// [`Regex::find_iter`](crate::Regex::find_iter).
#[derive(Debug)]
pub struct Matches<'a, 'h> {
    matcher: Matcher<'a>,
    haystack: &'h str,
    at: usize,
    last_end: Option<usize>,
}

impl<'a, 'h> Matches<'a, 'h> {
    /// Move the search position past the `char` at `self.at`.
    fn bump(&mut self) {
        self.at += self.haystack[self.at..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
    }
}

impl<'a, 'h> Iterator for Matches<'a, 'h> {
    type Item = Match<'h>;

    fn next(&mut self) -> Option<Match<'h>> {
        while self.at <= self.haystack.len() {
            let m = match self.matcher.find_at(self.haystack, self.at) {
                Some(m) => m,
                None => {
                    self.at = self.haystack.len() + 1;
                    return None;
                }
            };
            if m.is_empty() {
                self.at = m.end();
                self.bump();
                // An empty match right where the previous one ended adds
                // nothing.
                if self.last_end == Some(m.end()) {
                    continue;
                }
            } else {
                self.at = m.end();
            }
            self.last_end = Some(m.end());
            return Some(m);
        }
        None
    }
}
