/*!
This crate provides regular expression matching built on Thompson's NFA
construction, searched with Pike's parallel state simulation.

A pattern goes through three stages:

1. The [`parser`] rewrites the infix pattern with explicit concatenation
operators and converts it to postfix order with the shunting-yard algorithm.
2. The [`compiler`] consumes the postfix tokens and assembles an [`NFA`] out of
fragments whose dangling exits are patched as construction proceeds.
3. The [`matcher`] runs every live NFA state in lockstep, one input `char` at a
time. There is no backtracking, so the time to search is bounded by the length
of the haystack times the number of NFA states.

# Example

```
let re = thompson_nfa::compile("ab*(c|d)").unwrap();
assert!(thompson_nfa::matches(&re, "abbbd"));
assert!(!thompson_nfa::matches(&re, "abbb"));
```

# Syntax

```text
x        a literal character
.        any character (see RegexBuilder::dot_matches_new_line)
\x       the character x, even if it is a metacharacter
xy       concatenation
x|y      alternation
x*       zero or more of x
x+       one or more of x
x?       zero or one of x
(x)      grouping
```

Repetition binds tighter than concatenation, which binds tighter than
alternation. So `ab|c` matches either `ab` or `c`.

[`Regex::is_match`] is anchored at both ends: the whole haystack must match.
[`Regex::find`] and [`Regex::find_iter`] search for leftmost-longest matches
anywhere in the haystack.

# Crate features

* **std** - Enabled by default. Currently required.
* **logging** - Emits debug and trace messages through the `log` crate while
compiling and searching.
*/

#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

#[macro_use]
mod macros;

pub mod compiler;
pub mod matcher;
pub mod nfa;
pub mod parser;
mod regex;

pub use crate::{
    compiler::{Compiler, Config},
    matcher::{Match, Matcher, Matches},
    nfa::{State, StateId, Symbol, NFA},
    regex::{Regex, RegexBuilder},
};

/// The result of compiling a pattern.
pub type CompileResult<T> = Result<T, CompileError>;

/// An error that occurred while compiling a pattern.
///
/// Every compilation failure is a syntax error: the pattern could not be
/// reduced to exactly one NFA. Offsets are byte offsets into the pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The pattern is empty.
    Empty,
    /// The `(` at this offset is never closed.
    UnclosedGroup {
        /// Offset of the opening parenthesis.
        offset: usize,
    },
    /// The `)` at this offset has no matching `(`.
    UnopenedGroup {
        /// Offset of the closing parenthesis.
        offset: usize,
    },
    /// A group contains nothing, as in `()`.
    EmptyGroup {
        /// Offset of the opening parenthesis.
        offset: usize,
    },
    /// The operator at this offset doesn't have enough operands, as in
    /// `*a`, `a|` or `a||b`.
    MissingOperand {
        /// Offset of the operator.
        offset: usize,
    },
    /// More than one sub-expression was left over without an operator to
    /// join them.
    Unjoined {
        /// The number of sub-expressions left over.
        count: usize,
    },
    /// The pattern ends with a `\`.
    TrailingEscape {
        /// Offset of the backslash.
        offset: usize,
    },
    /// Groups are nested deeper than the configured limit.
    NestLimitExceeded {
        /// The configured limit.
        limit: u32,
        /// Offset of the `(` that went over the limit.
        offset: usize,
    },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Empty => write!(f, "empty pattern"),
            CompileError::UnclosedGroup { offset } => {
                write!(f, "unclosed group opened at offset {}", offset)
            }
            CompileError::UnopenedGroup { offset } => {
                write!(f, "unopened group closed at offset {}", offset)
            }
            CompileError::EmptyGroup { offset } => {
                write!(f, "empty group at offset {}", offset)
            }
            CompileError::MissingOperand { offset } => {
                write!(f, "operator at offset {} is missing an operand", offset)
            }
            CompileError::Unjoined { count } => {
                write!(f, "{} sub-expressions left without an operator", count)
            }
            CompileError::TrailingEscape { offset } => {
                write!(f, "incomplete escape sequence at offset {}", offset)
            }
            CompileError::NestLimitExceeded { limit, offset } => write!(
                f,
                "group at offset {} exceeds the nesting limit of {}",
                offset, limit
            ),
        }
    }
}

impl std::error::Error for CompileError {}

/// Compiles a pattern with the default configuration.
///
/// This is shorthand for [`Regex::new`].
pub fn compile(pattern: &str) -> CompileResult<Regex> {
    Regex::new(pattern)
}

/// Returns true if and only if `regex` matches all of `input`.
///
/// This never fails. An empty `input` is matched when the pattern accepts the
/// empty string.
pub fn matches(regex: &Regex, input: &str) -> bool {
    regex.is_match(input)
}
