use phf::phf_map;
use serde::Serialize;
use std::fmt;

use crate::span::Spanned;

// ─────────────────────────────────────────────────────────────────────────────
// Static operator table (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static OPERATORS: phf::Map<char, Operator> = phf_map! {
    '+' => Operator::Add,
    '-' => Operator::Sub,
    '*' => Operator::Mul,
    '/' => Operator::Div,
    '^' => Operator::Pow,
    '%' => Operator::Mod,
};

/// The six binary operators of the calculator language.
///
/// The declaration order doubles as the reduction rank used by the expression
/// parser: `Add` < `Sub` < `Mul` < `Div` < `Pow` < `Mod`.  Note this is *not*
/// arithmetic precedence, e.g. `1+2-3` groups as `1+(2-3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    /// '+'
    Add,

    /// '-'
    Sub,

    /// '*'
    Mul,

    /// '/'
    Div,

    /// '^'
    Pow,

    /// '%'
    Mod,
}

impl Operator {
    /// Every operator, in rank order.
    pub const ALL: [Operator; 6] = [
        Operator::Add,
        Operator::Sub,
        Operator::Mul,
        Operator::Div,
        Operator::Pow,
        Operator::Mod,
    ];

    /// Look up the operator spelled by `c`.
    pub fn from_char(c: char) -> Option<Self> {
        OPERATORS.get(&c).copied()
    }

    pub const fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
            Operator::Mod => '%',
        }
    }

    /// Declaration‑order rank, 0 through 5.
    pub const fn rank(self) -> u8 {
        match self {
            Operator::Add => 0,
            Operator::Sub => 1,
            Operator::Mul => 2,
            Operator::Div => 3,
            Operator::Pow => 4,
            Operator::Mod => 5,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A span‑wrapped expression node.
pub type Node<'a> = Spanned<'a, Expression<'a>>;

/// A span‑wrapped identifier borrowed from the input.
pub type Name<'a> = Spanned<'a, &'a str>;

/// **Abstract‑Syntax‑Tree node** for expressions.  Every child is wrapped in
/// a [`Spanned`] covering the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression<'a> {
    /// Numeric literal, stored as IEEE‑754 `f64`.
    Number(f64),

    /// Variable reference (`args == None`) or function call (`args == Some(..)`).
    /// `f()` yields `Some(vec![])`.
    Call {
        name: Name<'a>,
        args: Option<Vec<Node<'a>>>,
    },

    /// Infix binary operator expression.
    Binary {
        left: Box<Node<'a>>,
        operator: Spanned<'a, Operator>,
        right: Box<Node<'a>>,
    },
}

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement<'a> {
    /// A bare expression to evaluate.
    Eval(Node<'a>),

    /// `name = value` or `name(p1, p2) = value`.
    Assign {
        name: Name<'a>,

        /// Parameter names, `None` when no `(` followed the name.
        params: Option<Vec<Name<'a>>>,

        value: Node<'a>,
    },

    /// `name OP= value`, e.g. `x += 1`.
    AssignOp {
        name: Name<'a>,
        operator: Spanned<'a, Operator>,
        value: Node<'a>,
    },
}

impl<'a> Statement<'a> {
    /// The assigned name, if this is an assignment.
    pub fn target(&self) -> Option<&Name<'a>> {
        match self {
            Statement::Eval(_) => None,

            Statement::Assign { name, .. } | Statement::AssignOp { name, .. } => Some(name),
        }
    }

    /// The expression on the right of `=`, or the whole expression for `Eval`.
    pub fn value(&self) -> &Node<'a> {
        match self {
            Statement::Eval(value)
            | Statement::Assign { value, .. }
            | Statement::AssignOp { value, .. } => value,
        }
    }
}
