/*!
Statement and expression parser for one calculator input line.

Time & Space Complexity
=======================

* **n** = number of chars in the input line.

| Phase / function              | Cost | Rationale                                              |
|-------------------------------|-----:|--------------------------------------------------------|
| `=` lookup (`memchr`)         | O(n) | One vectorised scan of the raw bytes.                  |
| `Parser::parse`               | Θ(n) | Each char is advanced over exactly once.               |
| Operator reduction            | O(1) amortised | Every operator is pushed and popped once.    |

Space is O(n): two `Vec` stacks per (sub‑)expression plus one `Box` per binary
node.  Call‑stack depth grows only with parenthesis / call nesting.

### Logging Policy

| Location                        | Level  | Purpose                                   |
|---------------------------------|--------|-------------------------------------------|
| `Parser::new`, `parse`          | `info` | Lifecycle milestones.                     |
| statement forms, reductions     | `debug`| Which branch was taken and what it built. |

--------------------------------------------------------------------------------
Grammar
-------

```text
statement   → assign_op | assign | expression EOF ;
assign_op   → IDENT OP "=" expression EOF ;
assign      → IDENT ( "(" ( IDENT ( "," IDENT )* ","? )? ")" )? "=" expression EOF ;
expression  → primary ( OP primary )* ;
primary     → NUMBER
            | IDENT ( "(" ( expression ( "," expression )* ","? )? ")" )?
            | "(" expression ")" ;
OP          → "+" | "-" | "*" | "/" | "^" | "%" ;
```

Which statement form applies is decided up front from the first `=` in the
line: none means a bare expression, an operator char right before it means
`assign_op`, anything else means `assign`.

Binary expressions are built with two explicit stacks.  An incoming operator
first reduces every stacked operator whose [`Operator::rank`] is greater than
or equal to its own, so grouping follows declaration order rather than
arithmetic convention.
*/

use crate::ast::{Expression, Name, Node, Operator, Statement};
use crate::cursor::{Cursor, Mark};
use crate::error::{ParseError, Result};
use crate::scanner::{found, read_identifier, read_number, read_operator, skip_whitespace};
use crate::span::Spanned;

use log::{debug, info};
use memchr::memchr;

/// Parse `input` as a single statement.
pub fn parse_statement(input: &str) -> Result<Statement<'_>> {
    Parser::new(input).parse()
}

/// An entry on the operand stack.  `start`/`end` bound the operand's full
/// source text, which for a parenthesised group includes the parentheses
/// even though the node itself only spans the inner expression.
struct Operand<'a> {
    start: Mark,
    end: Mark,
    node: Node<'a>,
}

/// Deepest allowed nesting of groups and call arguments.
pub const MAX_NESTING: usize = 256;

/// Single‑use parser over one input line.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    depth: usize, // expressions currently being parsed, outermost included
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        info!("Parser created over {:?}", input);

        Self {
            cursor: Cursor::new(input),
            depth: 0,
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse the whole input as one statement, consuming the parser.
    pub fn parse(mut self) -> Result<Statement<'a>> {
        let source: &'a str = self.cursor.source();

        let statement: Statement<'a> = match memchr(b'=', source.as_bytes()) {
            None => self.eval_statement()?,

            Some(0) => {
                return Err(ParseError::invalid_assignment(
                    0,
                    "expected a name before '='",
                ));
            }

            Some(index) => {
                let preceding: Option<char> = source[..index].chars().next_back();

                if preceding.and_then(Operator::from_char).is_some() {
                    self.assign_op_statement()?
                } else {
                    self.assign_statement()?
                }
            }
        };

        info!("Parsed statement: {:?}", statement);

        Ok(statement)
    }

    // ──────────────────────── statement forms ─────────────────────

    fn eval_statement(&mut self) -> Result<Statement<'a>> {
        debug!("Parsing eval statement");

        let value: Node<'a> = self.expression()?;
        self.expect_end()?;

        Ok(Statement::Eval(value))
    }

    fn assign_op_statement(&mut self) -> Result<Statement<'a>> {
        debug!("Parsing operator assignment");

        skip_whitespace(&mut self.cursor);
        let name: Name<'a> = read_identifier(&mut self.cursor)?;

        skip_whitespace(&mut self.cursor);
        let operator: Spanned<'a, Operator> = read_operator(&mut self.cursor)?;

        self.consume_equals()?;

        skip_whitespace(&mut self.cursor);
        let value: Node<'a> = self.expression()?;
        self.expect_end()?;

        Ok(Statement::AssignOp {
            name,
            operator,
            value,
        })
    }

    fn assign_statement(&mut self) -> Result<Statement<'a>> {
        debug!("Parsing assignment");

        skip_whitespace(&mut self.cursor);
        let name: Name<'a> = read_identifier(&mut self.cursor)?;

        skip_whitespace(&mut self.cursor);
        let params: Option<Vec<Name<'a>>> = if self.cursor.current() == Some('(') {
            self.cursor.advance();

            Some(self.delimited_list(|parser| read_identifier(&mut parser.cursor))?)
        } else {
            None
        };

        skip_whitespace(&mut self.cursor);
        self.consume_equals()?;

        skip_whitespace(&mut self.cursor);
        let value: Node<'a> = self.expression()?;
        self.expect_end()?;

        Ok(Statement::Assign {
            name,
            params,
            value,
        })
    }

    // ─────────────────────── expression rules ─────────────────────

    /// Parse one expression, stopping before end of input, `)` or `,`.
    fn expression(&mut self) -> Result<Node<'a>> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::invalid_expression(
                self.cursor.offset(),
                format!("cannot nest more than {} levels", MAX_NESTING),
            ));
        }

        self.depth += 1;
        let result = self.operator_precedence();
        self.depth -= 1;

        result
    }

    /// Two‑stack reduction over one flat run of primaries and operators.
    fn operator_precedence(&mut self) -> Result<Node<'a>> {
        let mut operands: Vec<Operand<'a>> = Vec::new();
        let mut operators: Vec<Spanned<'a, Operator>> = Vec::new();

        loop {
            skip_whitespace(&mut self.cursor);
            if self.at_expression_end() {
                break;
            }

            operands.push(self.primary()?);

            skip_whitespace(&mut self.cursor);
            if self.at_expression_end() {
                break;
            }

            // No operator here means another primary follows; the extra
            // operand is rejected once the stacks are drained.
            if self.cursor.current().and_then(Operator::from_char).is_none() {
                continue;
            }

            let operator: Spanned<'a, Operator> = read_operator(&mut self.cursor)?;

            while operators
                .last()
                .is_some_and(|top| top.value().rank() >= operator.value().rank())
            {
                self.reduce(&mut operands, &mut operators)?;
            }

            operators.push(operator);
        }

        while !operators.is_empty() {
            self.reduce(&mut operands, &mut operators)?;
        }

        match (operands.pop(), operands.is_empty()) {
            (Some(operand), true) => Ok(operand.node),

            (None, _) => Err(ParseError::invalid_expression(
                self.cursor.offset(),
                format!("expected expression, {}", found(&self.cursor)),
            )),

            (Some(_), false) => Err(ParseError::invalid_expression(
                self.cursor.offset(),
                "operands left over after reduction",
            )),
        }
    }

    /// Pop one operator and its two operands and push the combined node.
    fn reduce(
        &self,
        operands: &mut Vec<Operand<'a>>,
        operators: &mut Vec<Spanned<'a, Operator>>,
    ) -> Result<()> {
        let Some(operator) = operators.pop() else {
            return Ok(());
        };

        let (Some(right), Some(left)) = (operands.pop(), operands.pop()) else {
            return Err(ParseError::invalid_expression(
                self.cursor.offset(),
                format!("operator '{}' is missing an operand", operator.value()),
            ));
        };

        let span = self.cursor.capture_range(left.start, right.end);

        debug!("Reduced {:?} over '{}'", operator.value(), span.text());

        operands.push(Operand {
            start: left.start,
            end: right.end,
            node: Spanned::new(
                span,
                Expression::Binary {
                    left: Box::new(left.node),
                    operator,
                    right: Box::new(right.node),
                },
            ),
        });

        Ok(())
    }

    fn primary(&mut self) -> Result<Operand<'a>> {
        let start: Mark = self.cursor.mark();

        let node: Node<'a> = match self.cursor.current() {
            Some(c) if c.is_ascii_digit() => {
                read_number(&mut self.cursor)?.map(Expression::Number)
            }

            Some('(') => {
                self.cursor.advance();

                let inner: Node<'a> = self.expression()?;

                if self.cursor.current() != Some(')') {
                    return Err(ParseError::invalid_expression(
                        self.cursor.offset(),
                        format!("expected ')' to close group, {}", found(&self.cursor)),
                    ));
                }

                self.cursor.advance();

                inner
            }

            _ => self.call()?,
        };

        Ok(Operand {
            start,
            end: self.cursor.mark(),
            node,
        })
    }

    /// Identifier, optionally followed *immediately* by an argument list.
    fn call(&mut self) -> Result<Node<'a>> {
        let start: Mark = self.cursor.mark();
        let name: Name<'a> = read_identifier(&mut self.cursor)?;

        let args: Option<Vec<Node<'a>>> = if self.cursor.current() == Some('(') {
            self.cursor.advance();

            Some(self.delimited_list(Self::expression)?)
        } else {
            None
        };

        Ok(Spanned::new(
            self.cursor.capture(start),
            Expression::Call { name, args },
        ))
    }

    // ────────────────────── utility helpers ───────────────────────

    /// Elements up to and including the closing `)`; the opening `(` has
    /// already been consumed.  `()` yields an empty list.
    fn delimited_list<T>(
        &mut self,
        mut element: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items: Vec<T> = Vec::new();

        loop {
            skip_whitespace(&mut self.cursor);

            if self.cursor.current() == Some(')') {
                self.cursor.advance();
                return Ok(items);
            }

            items.push(element(self)?);

            skip_whitespace(&mut self.cursor);

            match self.cursor.current() {
                Some(',') => self.cursor.advance(),

                Some(')') => {
                    self.cursor.advance();
                    return Ok(items);
                }

                _ => {
                    return Err(ParseError::expected_comma_or_paren(
                        self.cursor.offset(),
                        found(&self.cursor),
                    ));
                }
            }
        }
    }

    #[inline(always)]
    fn at_expression_end(&self) -> bool {
        matches!(self.cursor.current(), None | Some(')') | Some(','))
    }

    fn consume_equals(&mut self) -> Result<()> {
        if self.cursor.current() != Some('=') {
            return Err(ParseError::invalid_assignment(
                self.cursor.offset(),
                format!("expected '=', {}", found(&self.cursor)),
            ));
        }

        self.cursor.advance();

        Ok(())
    }

    fn expect_end(&mut self) -> Result<()> {
        skip_whitespace(&mut self.cursor);

        if let Some(c) = self.cursor.current() {
            return Err(ParseError::unexpected_character(
                self.cursor.offset(),
                format!("'{}' after end of statement", c),
            ));
        }

        Ok(())
    }
}
