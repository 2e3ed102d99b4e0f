/*!
Converts an infix pattern into a postfix token sequence.

Parsing happens in three passes over the pattern:

1. Lexing turns characters into atoms, operators and parentheses, resolving
escapes along the way.
2. An explicit concatenation operator is inserted between every pair of
adjacent items that would otherwise be joined implicitly.
3. The shunting-yard algorithm reorders the result into postfix, dropping
parentheses.

The postfix sequence is what the [`Compiler`](crate::Compiler) consumes.
*/

use crate::{CompileError, CompileResult};

/// The default limit on how deeply groups may nest.
pub const DEFAULT_NEST_LIMIT: u32 = 250;

/// A single postfix token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Byte offset into the pattern that this token came from. For
    /// concatenation, which has no text of its own, this is the offset of its
    /// right hand operand.
    pub offset: usize,
}

/// The kinds of token that appear in postfix output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// A literal character.
    Literal(char),
    /// The `.` wildcard.
    Any,
    /// Concatenation of the two preceding operands.
    Concat,
    /// `|`
    Alternate,
    /// `?`
    ZeroOrOne,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl TokenKind {
    /// Binding strength used by the shunting-yard pass. Higher binds tighter.
    fn precedence(self) -> u8 {
        match self {
            TokenKind::ZeroOrOne
            | TokenKind::ZeroOrMore
            | TokenKind::OneOrMore => 3,
            TokenKind::Concat => 2,
            TokenKind::Alternate => 1,
            TokenKind::Literal(_) | TokenKind::Any => 0,
        }
    }

    /// True for the postfix repetition operators.
    fn is_unary(self) -> bool {
        matches!(
            self,
            TokenKind::ZeroOrOne | TokenKind::ZeroOrMore | TokenKind::OneOrMore
        )
    }
}

/// One lexed element of the infix pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Item {
    kind: ItemKind,
    offset: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ItemKind {
    Atom(TokenKind),
    Operator(TokenKind),
    Open,
    Close,
}

impl ItemKind {
    /// Whether an implicit concatenation may follow this item.
    fn ends_operand(self) -> bool {
        match self {
            ItemKind::Atom(_) | ItemKind::Close => true,
            ItemKind::Operator(op) => op.is_unary(),
            ItemKind::Open => false,
        }
    }

    /// Whether an implicit concatenation may precede this item.
    fn starts_operand(self) -> bool {
        matches!(self, ItemKind::Atom(_) | ItemKind::Open)
    }
}

/// Converts patterns to postfix tokens.
///
/// A parser is cheap to build and holds only its configuration, so the same
/// parser can be used for any number of patterns.
#[derive(Clone, Debug)]
pub struct Parser {
    nest_limit: u32,
}

impl Parser {
    /// Create a parser with the default configuration.
    pub fn new() -> Parser {
        Parser { nest_limit: DEFAULT_NEST_LIMIT }
    }

    /// Set the maximum depth to which groups may nest.
    ///
    /// A pattern such as `((a))` has a depth of 2. Going over the limit is a
    /// [`CompileError::NestLimitExceeded`].
    pub fn nest_limit(&mut self, limit: u32) -> &mut Parser {
        self.nest_limit = limit;
        self
    }

    /// Parse `pattern` into postfix tokens.
    ///
    /// Chains of repetition operators keep their source order.
    pub fn parse(&self, pattern: &str) -> CompileResult<Vec<Token>> {
        if pattern.is_empty() {
            return Err(CompileError::Empty);
        }
        let items = self.lex(pattern)?;
        let items = insert_concat(&items);
        to_postfix(&items)
    }

    fn lex(&self, pattern: &str) -> CompileResult<Vec<Item>> {
        let mut items = Vec::with_capacity(pattern.len());
        let mut depth = 0u32;
        let mut chars = pattern.char_indices();
        while let Some((offset, ch)) = chars.next() {
            let kind = match ch {
                '\\' => match chars.next() {
                    Some((_, escaped)) => {
                        ItemKind::Atom(TokenKind::Literal(escaped))
                    }
                    None => {
                        return Err(CompileError::TrailingEscape { offset })
                    }
                },
                '.' => ItemKind::Atom(TokenKind::Any),
                '|' => ItemKind::Operator(TokenKind::Alternate),
                '?' => ItemKind::Operator(TokenKind::ZeroOrOne),
                '*' => ItemKind::Operator(TokenKind::ZeroOrMore),
                '+' => ItemKind::Operator(TokenKind::OneOrMore),
                '(' => {
                    depth += 1;
                    if depth > self.nest_limit {
                        return Err(CompileError::NestLimitExceeded {
                            limit: self.nest_limit,
                            offset,
                        });
                    }
                    ItemKind::Open
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    ItemKind::Close
                }
                _ => ItemKind::Atom(TokenKind::Literal(ch)),
            };
            items.push(Item { kind, offset });
        }
        Ok(items)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `pattern` into postfix tokens using the default configuration.
///
/// Repetition operators are emitted as soon as they're read, so a chain such
/// as `a*?` comes out in source order (`a * ?`).
pub fn parse(pattern: &str) -> CompileResult<Vec<Token>> {
    Parser::new().parse(pattern)
}

/// Makes every implicit concatenation explicit.
fn insert_concat(items: &[Item]) -> Vec<Item> {
    let mut out = Vec::with_capacity(items.len() * 2);
    for (i, &item) in items.iter().enumerate() {
        if i > 0 && items[i - 1].kind.ends_operand() && item.kind.starts_operand()
        {
            out.push(Item {
                kind: ItemKind::Operator(TokenKind::Concat),
                offset: item.offset,
            });
        }
        out.push(item);
    }
    out
}

/// Shunting-yard conversion from explicit infix to postfix.
fn to_postfix(items: &[Item]) -> CompileResult<Vec<Token>> {
    let mut output = Vec::with_capacity(items.len());
    // Holds operators and open parentheses.
    let mut stack: Vec<Item> = Vec::new();
    let mut prev: Option<ItemKind> = None;

    for &item in items {
        match item.kind {
            ItemKind::Atom(kind) => {
                output.push(Token { kind, offset: item.offset })
            }
            ItemKind::Open => stack.push(item),
            ItemKind::Close => {
                if prev == Some(ItemKind::Open) {
                    // The open paren is on top of the stack.
                    let offset = stack.last().map_or(item.offset, |i| i.offset);
                    return Err(CompileError::EmptyGroup { offset });
                }
                loop {
                    let Some(top) = stack.pop() else {
                        return Err(CompileError::UnopenedGroup {
                            offset: item.offset,
                        });
                    };
                    match top.kind {
                        ItemKind::Open => break,
                        ItemKind::Operator(kind) => {
                            output.push(Token { kind, offset: top.offset })
                        }
                        ItemKind::Atom(_) | ItemKind::Close => {
                            unreachable!("only operators and '(' are stacked")
                        }
                    }
                }
            }
            // A postfix operator binds tighter than anything that could be on
            // the stack and its operand is already complete, so it goes
            // straight to the output. This keeps chains like `a*?` in source
            // order.
            ItemKind::Operator(op) if op.is_unary() => {
                output.push(Token { kind: op, offset: item.offset })
            }
            ItemKind::Operator(op) => {
                while let Some(&top) = stack.last() {
                    // An open paren stops the scan.
                    let ItemKind::Operator(top_op) = top.kind else { break };
                    // Binary operators are left associative.
                    if op.precedence() > top_op.precedence() {
                        break;
                    }
                    stack.pop();
                    output.push(Token { kind: top_op, offset: top.offset });
                }
                stack.push(item);
            }
        }
        prev = Some(item.kind);
    }

    while let Some(top) = stack.pop() {
        match top.kind {
            ItemKind::Open => {
                return Err(CompileError::UnclosedGroup { offset: top.offset })
            }
            ItemKind::Operator(kind) => {
                output.push(Token { kind, offset: top.offset })
            }
            ItemKind::Atom(_) | ItemKind::Close => {
                unreachable!("only operators and '(' are stacked")
            }
        }
    }
    trace!("postfix for {} items: {:?}", items.len(), output);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Renders postfix tokens compactly, using `~` for concatenation.
    fn postfix(pattern: &str) -> String {
        parse(pattern)
            .unwrap()
            .iter()
            .map(|t| match t.kind {
                TokenKind::Literal(c) => c,
                TokenKind::Any => '.',
                TokenKind::Concat => '~',
                TokenKind::Alternate => '|',
                TokenKind::ZeroOrOne => '?',
                TokenKind::ZeroOrMore => '*',
                TokenKind::OneOrMore => '+',
            })
            .collect()
    }

    #[test]
    fn test_concat_insertion() {
        assert_eq!(postfix("ab"), "ab~");
        assert_eq!(postfix("abc"), "ab~c~");
        assert_eq!(postfix("a(b)"), "ab~");
        assert_eq!(postfix("(a)b"), "ab~");
        assert_eq!(postfix("a*b"), "a*b~");
        assert_eq!(postfix("a+(b)"), "a+b~");
        assert_eq!(postfix("a?."), "a?.~");
    }

    #[test]
    fn test_precedence() {
        assert_eq!(postfix("ab|c"), "ab~c|");
        assert_eq!(postfix("a|bc"), "abc~|");
        assert_eq!(postfix("ab*"), "ab*~");
        assert_eq!(postfix("(ab)*"), "ab~*");
        assert_eq!(postfix("a|b|c"), "ab|c|");
    }

    #[test]
    fn test_unary_chain() {
        assert_eq!(postfix("a**"), "a**");
        assert_eq!(postfix("a+?"), "a+?");
        assert_eq!(postfix("a*?b"), "a*?b~");
    }

    #[test]
    fn test_escape() {
        assert_eq!(postfix(r"\*"), "*");
        assert_eq!(postfix(r"a\|b"), "a|~b~");
        let tokens = parse(r"\.").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Literal('.'));
    }

    #[test]
    fn test_offsets() {
        let tokens = parse("aβ|c").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        // a, β, concat (at β), c, |
        assert_eq!(offsets, vec![0, 1, 1, 4, 3]);
    }

    #[test]
    fn test_unbalanced() {
        assert_eq!(parse("(a"), Err(CompileError::UnclosedGroup { offset: 0 }));
        assert_eq!(parse(")a"), Err(CompileError::UnopenedGroup { offset: 0 }));
        assert_eq!(parse("a)"), Err(CompileError::UnopenedGroup { offset: 1 }));
        assert_eq!(
            parse("(a))("),
            Err(CompileError::UnopenedGroup { offset: 3 })
        );
        assert_eq!(parse("a()"), Err(CompileError::EmptyGroup { offset: 1 }));
    }

    #[test]
    fn test_empty_and_escape_errors() {
        assert_eq!(parse(""), Err(CompileError::Empty));
        assert_eq!(parse(r"ab\"), Err(CompileError::TrailingEscape { offset: 2 }));
    }

    #[test]
    fn test_nest_limit() {
        let mut parser = Parser::new();
        parser.nest_limit(2);
        assert!(parser.parse("((a))").is_ok());
        assert_eq!(
            parser.parse("(((a)))"),
            Err(CompileError::NestLimitExceeded { limit: 2, offset: 2 })
        );
        // Depth goes back down after a group closes.
        assert!(parser.parse("((a))((b))").is_ok());
    }
}
