/*!
Thompson's construction from postfix tokens to an [`NFA`].

Each token either pushes a new fragment or combines fragments popped off a
stack. A fragment's dangling exits are patched once the state they lead to
exists, and the last remaining fragment is patched to the match state.

# Example

```
use thompson_nfa::{Compiler, Config, Symbol};

let mut compiler = Compiler::new();
compiler.configure(Config::new().dot_matches_new_line(false));
let nfa = compiler.compile("a.").unwrap();
assert_eq!(nfa.state(1).symbol, Symbol::AnyExceptLF);
assert_eq!(nfa.state(nfa.len() - 1).symbol, Symbol::Match);
```
*/

use crate::{
    nfa::{Fragment, PatchList, Slot, Symbol, NFA},
    parser::{Parser, Token, TokenKind, DEFAULT_NEST_LIMIT},
    CompileError, CompileResult,
};

/// The configuration used for compiling a pattern into an NFA.
///
/// Options left unset fall back to their defaults. Use [`Config::new`] and
/// chain the setters.
#[derive(Clone, Debug, Default)]
pub struct Config {
    dot_matches_new_line: Option<bool>,
    nest_limit: Option<u32>,
}

impl Config {
    /// Return a new default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Whether `.` matches `\n`.
    ///
    /// This is enabled by default, so `.` matches every character.
    pub fn dot_matches_new_line(mut self, yes: bool) -> Config {
        self.dot_matches_new_line = Some(yes);
        self
    }

    /// The maximum depth to which groups may nest. The default is 250.
    pub fn nest_limit(mut self, limit: u32) -> Config {
        self.nest_limit = Some(limit);
        self
    }

    /// Returns whether `.` matches `\n`.
    pub fn get_dot_matches_new_line(&self) -> bool {
        self.dot_matches_new_line.unwrap_or(true)
    }

    /// Returns the group nesting limit.
    pub fn get_nest_limit(&self) -> u32 {
        self.nest_limit.unwrap_or(DEFAULT_NEST_LIMIT)
    }
}

/// Compiler that converts patterns to Thompson NFAs
///
/// The compiler parses a pattern to postfix and then runs Thompson's
/// construction over the tokens with a stack of fragments.
#[derive(Clone, Debug, Default)]
pub struct Compiler {
    config: Config,
}

impl Compiler {
    /// Create a new compiler
    pub fn new() -> Self {
        Self { config: Config::default() }
    }

    /// Apply the given configuration, replacing the previous one.
    pub fn configure(&mut self, config: Config) -> &mut Compiler {
        self.config = config;
        self
    }

    /// Compile a pattern into an NFA.
    pub fn compile(&self, pattern: &str) -> CompileResult<NFA> {
        let mut parser = Parser::new();
        parser.nest_limit(self.config.get_nest_limit());
        let postfix = parser.parse(pattern)?;
        let nfa = self.build(&postfix)?;
        debug!(
            "compiled {:?} into {} postfix tokens and {} states",
            pattern,
            postfix.len(),
            nfa.len(),
        );
        Ok(nfa)
    }

    /// Build an NFA from postfix tokens, as produced by
    /// [`Parser::parse`](crate::parser::Parser::parse).
    ///
    /// Fails if an operator doesn't have enough operands, if there are no
    /// tokens at all, or if more than one sub-expression is left at the end.
    pub fn build(&self, postfix: &[Token]) -> CompileResult<NFA> {
        let any = if self.config.get_dot_matches_new_line() {
            Symbol::Any
        } else {
            Symbol::AnyExceptLF
        };
        let mut nfa = NFA::new();
        let mut stack: Vec<Fragment> = Vec::new();

        for token in postfix {
            let fragment = match token.kind {
                TokenKind::Literal(ch) => {
                    Fragment::single(nfa.add_state(Symbol::Char(ch)))
                }
                TokenKind::Any => Fragment::single(nfa.add_state(any)),
                TokenKind::Concat => {
                    let e2 = pop(&mut stack, token)?;
                    let e1 = pop(&mut stack, token)?;
                    nfa.patch(e1.out, e2.start);
                    Fragment { start: e1.start, out: e2.out }
                }
                TokenKind::Alternate => {
                    let e2 = pop(&mut stack, token)?;
                    let e1 = pop(&mut stack, token)?;
                    let split = nfa.split(Some(e1.start), Some(e2.start));
                    Fragment { start: split, out: e1.out.append(e2.out) }
                }
                TokenKind::ZeroOrOne => {
                    let e = pop(&mut stack, token)?;
                    let split = nfa.split(Some(e.start), None);
                    let out = e.out.append(PatchList::single(split, Slot::Out2));
                    Fragment { start: split, out }
                }
                TokenKind::ZeroOrMore => {
                    let e = pop(&mut stack, token)?;
                    let split = nfa.split(Some(e.start), None);
                    nfa.patch(e.out, split);
                    Fragment {
                        start: split,
                        out: PatchList::single(split, Slot::Out2),
                    }
                }
                TokenKind::OneOrMore => {
                    let e = pop(&mut stack, token)?;
                    let split = nfa.split(Some(e.start), None);
                    nfa.patch(e.out, split);
                    // Entering at e.start forces at least one pass.
                    Fragment {
                        start: e.start,
                        out: PatchList::single(split, Slot::Out2),
                    }
                }
            };
            stack.push(fragment);
        }

        let e = stack.pop().ok_or(CompileError::Empty)?;
        if !stack.is_empty() {
            return Err(CompileError::Unjoined { count: stack.len() + 1 });
        }
        let match_state = nfa.add_state(Symbol::Match);
        nfa.patch(e.out, match_state);
        nfa.set_start(e.start);
        Ok(nfa)
    }
}

/// Pop an operand for `token`'s operator.
fn pop(stack: &mut Vec<Fragment>, token: &Token) -> CompileResult<Fragment> {
    stack
        .pop()
        .ok_or(CompileError::MissingOperand { offset: token.offset })
}
