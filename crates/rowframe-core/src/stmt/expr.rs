use super::{Path, Value};

/// A filter predicate over a query's root model.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// All of the inner expressions hold
    And(Vec<Expr>),

    /// `path <op> value`
    BinaryOp(ExprBinaryOp),

    /// `path IN (values)`
    InList(ExprInList),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinaryOp {
    pub lhs: Path,
    pub op: BinaryOp,
    pub rhs: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub lhs: Path,
    pub list: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Expr {
    pub fn eq(lhs: Path, rhs: impl Into<Value>) -> Self {
        Self::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    pub fn ne(lhs: Path, rhs: impl Into<Value>) -> Self {
        Self::binary_op(lhs, BinaryOp::Ne, rhs)
    }

    pub fn lt(lhs: Path, rhs: impl Into<Value>) -> Self {
        Self::binary_op(lhs, BinaryOp::Lt, rhs)
    }

    pub fn le(lhs: Path, rhs: impl Into<Value>) -> Self {
        Self::binary_op(lhs, BinaryOp::Le, rhs)
    }

    pub fn gt(lhs: Path, rhs: impl Into<Value>) -> Self {
        Self::binary_op(lhs, BinaryOp::Gt, rhs)
    }

    pub fn ge(lhs: Path, rhs: impl Into<Value>) -> Self {
        Self::binary_op(lhs, BinaryOp::Ge, rhs)
    }

    pub fn binary_op(lhs: Path, op: BinaryOp, rhs: impl Into<Value>) -> Self {
        Self::BinaryOp(ExprBinaryOp {
            lhs,
            op,
            rhs: rhs.into(),
        })
    }

    pub fn in_list(lhs: Path, list: impl IntoIterator<Item = Value>) -> Self {
        Self::InList(ExprInList {
            lhs,
            list: list.into_iter().collect(),
        })
    }

    /// Combines two predicates, flattening nested `And`s.
    pub fn and(lhs: Expr, rhs: Expr) -> Self {
        let mut operands = match lhs {
            Expr::And(operands) => operands,
            expr => vec![expr],
        };

        match rhs {
            Expr::And(rhs) => operands.extend(rhs),
            expr => operands.push(expr),
        }

        Expr::And(operands)
    }
}

impl BinaryOp {
    /// Evaluates the operator for an already computed ordering.
    pub fn holds(self, ord: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;

        match self {
            BinaryOp::Eq => ord == Equal,
            BinaryOp::Ne => ord != Equal,
            BinaryOp::Lt => ord == Less,
            BinaryOp::Le => ord != Greater,
            BinaryOp::Gt => ord == Greater,
            BinaryOp::Ge => ord != Less,
        }
    }
}
