/*!
The state graph produced by the [`Compiler`](crate::Compiler).

States live in one arena and refer to each other by [`StateId`]. While an NFA
is being built, transitions that don't have a target yet are tracked in a
[`PatchList`] of `(state, slot)` pairs and resolved in bulk.

# Example

```
use thompson_nfa::{Compiler, Symbol};

let nfa = Compiler::new().compile("a*").unwrap();
let split = nfa.state(nfa.start());
assert_eq!(split.symbol, Symbol::Split);
// The loop body leads back to the split.
assert_eq!(nfa.state(split.out1.unwrap()).out1, Some(nfa.start()));
```
*/

use std::fmt;

/// A state ID in the NFA. It's an index into the NFA's state arena.
pub type StateId = usize;

/// What a state matches, or the role it plays if it consumes no input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    /// Consumes exactly this character.
    Char(char),
    /// Consumes any character.
    Any,
    /// Consumes any character except `\n`.
    AnyExceptLF,
    /// Epsilon branch to both outgoing transitions.
    Split,
    /// The accepting state. It has no outgoing transitions.
    Match,
}

impl Symbol {
    /// Returns true if a state with this symbol consumes `ch`.
    ///
    /// Split and match states never consume input.
    #[inline]
    pub fn matches(self, ch: char) -> bool {
        match self {
            Symbol::Char(expected) => expected == ch,
            Symbol::Any => true,
            Symbol::AnyExceptLF => ch != '\n',
            Symbol::Split | Symbol::Match => false,
        }
    }
}

/// A single NFA state.
///
/// Consuming states use only `out1`. Split states use both. Match states use
/// neither. A transition is `None` only while the NFA is being built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    /// What this state matches.
    pub symbol: Symbol,
    /// The primary transition.
    pub out1: Option<StateId>,
    /// The second branch of a split.
    pub out2: Option<StateId>,
}

impl State {
    /// Whether every transition this kind of state needs has a target.
    fn is_resolved(&self) -> bool {
        match self.symbol {
            Symbol::Split => self.out1.is_some() && self.out2.is_some(),
            Symbol::Match => self.out1.is_none() && self.out2.is_none(),
            _ => self.out1.is_some(),
        }
    }
}

/// Names one of a state's two transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// `State::out1`
    Out1,
    /// `State::out2`
    Out2,
}

/// Transitions waiting to be pointed at a state that doesn't exist yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatchList {
    slots: Vec<(StateId, Slot)>,
}

impl PatchList {
    /// A list holding one dangling transition.
    pub fn single(id: StateId, slot: Slot) -> PatchList {
        PatchList { slots: vec![(id, slot)] }
    }

    /// Joins two lists into one.
    pub fn append(mut self, mut other: PatchList) -> PatchList {
        self.slots.append(&mut other.slots);
        self
    }

    /// The number of dangling transitions.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing is waiting to be patched.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// A partially built piece of an NFA: an entry state plus the transitions
/// that still need a target.
#[derive(Clone, Debug)]
pub struct Fragment {
    /// The entry state.
    pub start: StateId,
    /// Dangling exits.
    pub out: PatchList,
}

impl Fragment {
    /// A fragment for a freshly added consuming state.
    pub fn single(id: StateId) -> Fragment {
        Fragment { start: id, out: PatchList::single(id, Slot::Out1) }
    }
}

/// A Thompson NFA.
///
/// States live in one arena and refer to each other by [`StateId`]. Once
/// compiled, an NFA is never mutated, so it may be shared freely between
/// threads and searched by many [`Matcher`](crate::Matcher)s at once.
#[derive(Clone, PartialEq, Eq)]
pub struct NFA {
    /// All states in the NFA
    states: Vec<State>,
    /// Starting state
    start: StateId,
}

impl NFA {
    /// Create a new empty NFA
    pub(crate) fn new() -> Self {
        Self { states: Vec::new(), start: 0 }
    }

    /// Add a new state with no transitions and return its ID
    pub(crate) fn add_state(&mut self, symbol: Symbol) -> StateId {
        let id = self.states.len();
        self.states.push(State { symbol, out1: None, out2: None });
        id
    }

    /// Create a split state. Either branch may be filled in later by
    /// patching.
    pub(crate) fn split(
        &mut self,
        out1: Option<StateId>,
        out2: Option<StateId>,
    ) -> StateId {
        let id = self.add_state(Symbol::Split);
        self.states[id].out1 = out1;
        self.states[id].out2 = out2;
        id
    }

    /// Point every transition in `list` at `target`. The list is consumed.
    pub(crate) fn patch(&mut self, list: PatchList, target: StateId) {
        for (id, slot) in list.slots {
            let state = &mut self.states[id];
            match slot {
                Slot::Out1 => state.out1 = Some(target),
                Slot::Out2 => state.out2 = Some(target),
            }
        }
    }

    pub(crate) fn set_start(&mut self, start: StateId) {
        debug_assert!(
            self.states.iter().all(State::is_resolved),
            "every transition must be patched before the NFA is finished"
        );
        self.start = start;
    }

    /// The entry state.
    #[inline]
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The state with the given ID.
    ///
    /// # Panics
    ///
    /// When `id` isn't a state in this NFA.
    #[inline]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id]
    }

    /// All states, indexed by [`StateId`].
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The total number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if the NFA has no states. A compiled NFA always has at
    /// least a match state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl fmt::Debug for NFA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "thompson::NFA(")?;
        for (id, state) in self.states.iter().enumerate() {
            let marker = if id == self.start { '^' } else { ' ' };
            write!(f, "{}{:06}: ", marker, id)?;
            match state.symbol {
                Symbol::Char(ch) => write!(f, "{:?}", ch)?,
                Symbol::Any => write!(f, "any")?,
                Symbol::AnyExceptLF => write!(f, "any-except-lf")?,
                Symbol::Split => write!(f, "split")?,
                Symbol::Match => write!(f, "MATCH")?,
            }
            match (state.out1, state.out2) {
                (Some(a), Some(b)) => writeln!(f, "({}, {})", a, b)?,
                (Some(a), None) => writeln!(f, " => {}", a)?,
                (None, Some(b)) => writeln!(f, "(_, {})", b)?,
                (None, None) => writeln!(f)?,
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_resolves_every_slot() {
        let mut nfa = NFA::new();
        let a = nfa.add_state(Symbol::Char('a'));
        let split = nfa.split(Some(a), None);
        let list = PatchList::single(a, Slot::Out1)
            .append(PatchList::single(split, Slot::Out2));
        assert_eq!(list.len(), 2);

        let m = nfa.add_state(Symbol::Match);
        nfa.patch(list, m);
        nfa.set_start(split);

        assert_eq!(nfa.state(a).out1, Some(m));
        assert_eq!(nfa.state(split).out1, Some(a));
        assert_eq!(nfa.state(split).out2, Some(m));
        assert_eq!(nfa.start(), split);
        assert_eq!(nfa.len(), 3);
    }

    #[test]
    fn test_symbol_matches() {
        assert!(Symbol::Char('x').matches('x'));
        assert!(!Symbol::Char('x').matches('y'));
        assert!(Symbol::Any.matches('\n'));
        assert!(!Symbol::AnyExceptLF.matches('\n'));
        assert!(Symbol::AnyExceptLF.matches('β'));
        assert!(!Symbol::Split.matches('a'));
        assert!(!Symbol::Match.matches('a'));
    }

    #[test]
    fn test_debug_listing() {
        let mut nfa = NFA::new();
        let a = nfa.add_state(Symbol::Char('a'));
        let m = nfa.add_state(Symbol::Match);
        nfa.patch(Fragment::single(a).out, m);
        nfa.set_start(a);
        assert_eq!(
            format!("{:?}", nfa),
            "thompson::NFA(\n^000000: 'a' => 1\n 000001: MATCH\n)"
        );
    }
}
