//! Binary operator semantics for [`Value`].
//!
//! Operand pairs are first classified into a common representation, then the
//! operation runs over that representation:
//!
//! | Left    | Right   | Evaluated as | Result tag            |
//! |---------|---------|--------------|-----------------------|
//! | Int     | Int     | integers     | Int (Bool for compare)|
//! | Float   | Float   | floats       | Float (Bool)          |
//! | Int     | Float   | integers, float truncated | Int (Bool)|
//! | Bool    | Int     | booleans, int converted   | Bool      |
//! | String  | String  | strings      | String (Bool)         |
//!
//! Everything else is `UnsupportedOperation`. Modulus is only defined for
//! Int/Int. [`can_perform`] uses the same classification as [`apply`], so the
//! capability check and the applier always agree on eligibility.

use std::fmt;
use std::ops::{Add, Div, Mul, Rem, Sub};

use crate::error::RuntimeError;
use crate::value::Value;

/// Binary operators understood by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl ArithmeticOp {
    /// Every operator, in opcode order.
    pub const ALL: [ArithmeticOp; 11] = [
        ArithmeticOp::Add,
        ArithmeticOp::Sub,
        ArithmeticOp::Mul,
        ArithmeticOp::Div,
        ArithmeticOp::Mod,
        ArithmeticOp::Eq,
        ArithmeticOp::Neq,
        ArithmeticOp::Lt,
        ArithmeticOp::Lte,
        ArithmeticOp::Gt,
        ArithmeticOp::Gte,
    ];

    /// Source symbol of this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
            ArithmeticOp::Eq => "==",
            ArithmeticOp::Neq => "!=",
            ArithmeticOp::Lt => "<",
            ArithmeticOp::Lte => "<=",
            ArithmeticOp::Gt => ">",
            ArithmeticOp::Gte => ">=",
        }
    }

    /// Check if this operator produces a Bool.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            ArithmeticOp::Eq
                | ArithmeticOp::Neq
                | ArithmeticOp::Lt
                | ArithmeticOp::Lte
                | ArithmeticOp::Gt
                | ArithmeticOp::Gte
        )
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An operand pair after coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Operands<'a> {
    Ints(i64, i64),
    Floats(f64, f64),
    Bools(bool, bool),
    Strings(&'a str, &'a str),
}

fn classify<'a>(lhs: &'a Value, rhs: &'a Value) -> Option<Operands<'a>> {
    let operands = match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => Operands::Ints(*a, *b),
        (Value::Float(a), Value::Float(b)) => Operands::Floats(*a, *b),
        (Value::Int(a), Value::Float(b)) => Operands::Ints(*a, *b as i64),
        (Value::Float(a), Value::Int(b)) => Operands::Ints(*a as i64, *b),
        (Value::Bool(a), Value::Int(b)) => Operands::Bools(*a, *b != 0),
        (Value::Int(a), Value::Bool(b)) => Operands::Bools(*a != 0, *b),
        (Value::String(a), Value::String(b)) => Operands::Strings(a, b),
        _ => return None,
    };
    Some(operands)
}

/// Report whether `lhs op rhs` is eligible for evaluation.
///
/// Eligibility is about operand types only; an eligible integer division can
/// still fail with `DivisionByZero`.
pub fn can_perform(op: ArithmeticOp, lhs: &Value, rhs: &Value) -> bool {
    if op == ArithmeticOp::Mod {
        return matches!((lhs, rhs), (Value::Int(_), Value::Int(_)));
    }

    match classify(lhs, rhs) {
        Some(Operands::Strings(..)) => op == ArithmeticOp::Add || op.is_comparison(),
        Some(_) => true,
        None => false,
    }
}

/// Evaluate `lhs op rhs`.
pub fn apply(op: ArithmeticOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let unsupported = || RuntimeError::UnsupportedOperation {
        op: op.symbol(),
        lhs: lhs.type_name().to_string(),
        rhs: rhs.type_name().to_string(),
    };

    if op == ArithmeticOp::Mod {
        return match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => apply_ints(op, *a, *b),
            _ => Err(unsupported()),
        };
    }

    match classify(lhs, rhs).ok_or_else(unsupported)? {
        Operands::Ints(a, b) => apply_ints(op, a, b),
        Operands::Floats(a, b) => apply_floats(op, a, b).ok_or_else(unsupported),
        Operands::Bools(a, b) => apply_bools(op, a, b),
        Operands::Strings(a, b) => apply_strings(op, a, b).ok_or_else(unsupported),
    }
}

fn compare<T: PartialOrd>(op: ArithmeticOp, a: T, b: T) -> Option<bool> {
    let result = match op {
        ArithmeticOp::Eq => a == b,
        ArithmeticOp::Neq => a != b,
        ArithmeticOp::Lt => a < b,
        ArithmeticOp::Lte => a <= b,
        ArithmeticOp::Gt => a > b,
        ArithmeticOp::Gte => a >= b,
        _ => return None,
    };
    Some(result)
}

fn apply_ints(op: ArithmeticOp, a: i64, b: i64) -> Result<Value, RuntimeError> {
    if let Some(result) = compare(op, a, b) {
        return Ok(Value::Bool(result));
    }

    let result = match op {
        ArithmeticOp::Add => a.wrapping_add(b),
        ArithmeticOp::Sub => a.wrapping_sub(b),
        ArithmeticOp::Mul => a.wrapping_mul(b),
        ArithmeticOp::Div | ArithmeticOp::Mod if b == 0 => {
            return Err(RuntimeError::DivisionByZero);
        }
        ArithmeticOp::Div => a.wrapping_div(b),
        ArithmeticOp::Mod => a.wrapping_rem(b),
        _ => unreachable!("comparisons handled above"),
    };
    Ok(Value::Int(result))
}

fn apply_floats(op: ArithmeticOp, a: f64, b: f64) -> Option<Value> {
    if let Some(result) = compare(op, a, b) {
        return Some(Value::Bool(result));
    }

    let result = match op {
        ArithmeticOp::Add => a + b,
        ArithmeticOp::Sub => a - b,
        ArithmeticOp::Mul => a * b,
        ArithmeticOp::Div => a / b,
        _ => return None,
    };
    Some(Value::Float(result))
}

fn apply_bools(op: ArithmeticOp, a: bool, b: bool) -> Result<Value, RuntimeError> {
    // Evaluate over 0/1 and fold the integer result back to a Bool.
    match apply_ints(op, a as i64, b as i64)? {
        Value::Int(n) => Ok(Value::Bool(n != 0)),
        other => Ok(other),
    }
}

fn apply_strings(op: ArithmeticOp, a: &str, b: &str) -> Option<Value> {
    if let Some(result) = compare(op, a, b) {
        return Some(Value::Bool(result));
    }

    match op {
        ArithmeticOp::Add => Some(Value::String(format!("{}{}", a, b))),
        _ => None,
    }
}

impl Value {
    /// Evaluate `self op rhs`. See [`apply`].
    pub fn binary_op(&self, op: ArithmeticOp, rhs: &Value) -> Result<Value, RuntimeError> {
        apply(op, self, rhs)
    }

    /// Report whether `self op rhs` is eligible. See [`can_perform`].
    pub fn can_perform_operation(&self, op: ArithmeticOp, rhs: &Value) -> bool {
        can_perform(op, self, rhs)
    }
}

macro_rules! impl_value_op {
    ($($trait:ident, $method:ident => $op:ident;)*) => {
        $(
            impl $trait<&Value> for &Value {
                type Output = Result<Value, RuntimeError>;

                fn $method(self, rhs: &Value) -> Self::Output {
                    apply(ArithmeticOp::$op, self, rhs)
                }
            }
        )*
    };
}

impl_value_op! {
    Add, add => Add;
    Sub, sub => Sub;
    Mul, mul => Mul;
    Div, div => Div;
    Rem, rem => Mod;
}
