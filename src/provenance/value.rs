use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::foundation::core::format_number;
use crate::foundation::error::{NocaError, NocaResult};

/// Operators understood by [`ProvenanceValue`], with their expression symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ValueOp {
    /// Infix symbol used when concatenating expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            ValueOp::Add => "+",
            ValueOp::Sub => "-",
            ValueOp::Mul => "*",
            ValueOp::Div => "/",
            ValueOp::Pow => "**",
            ValueOp::Eq => "==",
            ValueOp::Ne => "!=",
            ValueOp::Gt => ">",
            ValueOp::Ge => ">=",
            ValueOp::Lt => "<",
            ValueOp::Le => "<=",
        }
    }

    /// Only addition skips parenthesizing compound operands.
    pub fn is_associative(self) -> bool {
        matches!(self, ValueOp::Add)
    }

    fn is_comparison(self) -> bool {
        matches!(
            self,
            ValueOp::Eq | ValueOp::Ne | ValueOp::Gt | ValueOp::Ge | ValueOp::Lt | ValueOp::Le
        )
    }
}

/// Primitive payload of a provenance value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Bool(bool),
    Number(f64),
    List(Vec<f64>),
}

impl Primitive {
    fn as_scalar(&self) -> Option<f64> {
        match *self {
            Primitive::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Primitive::Number(v) => Some(v),
            Primitive::List(_) => None,
        }
    }

    /// Numbers behind this primitive, one per channel. Booleans count as 0/1.
    pub fn to_numbers(&self) -> Vec<f64> {
        match self {
            Primitive::List(vs) => vs.clone(),
            other => other.as_scalar().into_iter().collect(),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool(b) => write!(f, "{b}"),
            Primitive::Number(v) => f.write_str(&format_number(*v)),
            Primitive::List(vs) => {
                let parts: Vec<String> = vs.iter().map(|v| format_number(*v)).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// A primitive annotated with the human-readable expression that produced it.
///
/// Arithmetic and comparisons act on the primitive exactly as they would on the bare value
/// and return a new, derived value whose expression combines both operand expressions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceValue {
    value: Primitive,
    expression: String,
    user_authored: bool,
}

/// Wrap a user-authored value. Its expression is the value's own text.
pub fn value(v: impl Into<Primitive>) -> ProvenanceValue {
    let value = v.into();
    ProvenanceValue {
        expression: value.to_string(),
        value,
        user_authored: true,
    }
}

impl ProvenanceValue {
    /// Wrap a value with an explicit expression.
    pub fn new(v: impl Into<Primitive>, expression: impl Into<String>, user_authored: bool) -> Self {
        Self {
            value: v.into(),
            expression: expression.into(),
            user_authored,
        }
    }

    pub fn primitive(&self) -> &Primitive {
        &self.value
    }

    pub fn into_primitive(self) -> Primitive {
        self.value
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_user_authored(&self) -> bool {
        self.user_authored
    }

    /// Scalar view; `None` for lists.
    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_scalar()
    }

    /// Apply `op` to both primitives and concatenate the expressions.
    ///
    /// Lists combine element-wise; a scalar on either side is broadcast. Lists of different
    /// lengths are rejected.
    pub fn combine(&self, op: ValueOp, rhs: &ProvenanceValue) -> NocaResult<ProvenanceValue> {
        let result = if op.is_comparison() {
            Primitive::Bool(compare(op, &self.value, &rhs.value))
        } else {
            arithmetic(op, &self.value, &rhs.value)?
        };
        Ok(ProvenanceValue {
            value: result,
            expression: concatenate(op, &self.expression, &rhs.expression),
            user_authored: false,
        })
    }

    pub fn pow(&self, rhs: impl Into<ProvenanceValue>) -> NocaResult<ProvenanceValue> {
        self.combine(ValueOp::Pow, &rhs.into())
    }

    /// `base ** self`.
    pub fn rpow(&self, base: impl Into<ProvenanceValue>) -> NocaResult<ProvenanceValue> {
        base.into().combine(ValueOp::Pow, self)
    }

    pub fn equal(&self, rhs: impl Into<ProvenanceValue>) -> NocaResult<ProvenanceValue> {
        self.combine(ValueOp::Eq, &rhs.into())
    }

    pub fn not_equal(&self, rhs: impl Into<ProvenanceValue>) -> NocaResult<ProvenanceValue> {
        self.combine(ValueOp::Ne, &rhs.into())
    }

    pub fn greater(&self, rhs: impl Into<ProvenanceValue>) -> NocaResult<ProvenanceValue> {
        self.combine(ValueOp::Gt, &rhs.into())
    }

    pub fn greater_equal(&self, rhs: impl Into<ProvenanceValue>) -> NocaResult<ProvenanceValue> {
        self.combine(ValueOp::Ge, &rhs.into())
    }

    pub fn less(&self, rhs: impl Into<ProvenanceValue>) -> NocaResult<ProvenanceValue> {
        self.combine(ValueOp::Lt, &rhs.into())
    }

    pub fn less_equal(&self, rhs: impl Into<ProvenanceValue>) -> NocaResult<ProvenanceValue> {
        self.combine(ValueOp::Le, &rhs.into())
    }
}

impl fmt::Display for ProvenanceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl PartialEq<f64> for ProvenanceValue {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == Some(*other)
    }
}

impl PartialEq<bool> for ProvenanceValue {
    fn eq(&self, other: &bool) -> bool {
        self.value == Primitive::Bool(*other)
    }
}

impl PartialEq<[f64]> for ProvenanceValue {
    fn eq(&self, other: &[f64]) -> bool {
        matches!(&self.value, Primitive::List(vs) if vs.as_slice() == other)
    }
}

/// Wrap `expr` in parentheses unless it only holds alphanumerics, whitespace and dots.
fn parenthesize(expr: &str) -> String {
    let simple = expr
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || c == '.');
    if simple {
        expr.to_owned()
    } else {
        format!("({expr})")
    }
}

pub(crate) fn concatenate(op: ValueOp, lhs: &str, rhs: &str) -> String {
    if op.is_associative() {
        format!("{lhs} {} {rhs}", op.symbol())
    } else {
        format!("{} {} {}", parenthesize(lhs), op.symbol(), parenthesize(rhs))
    }
}

fn scalar_op(op: ValueOp, a: f64, b: f64) -> f64 {
    match op {
        ValueOp::Add => a + b,
        ValueOp::Sub => a - b,
        ValueOp::Mul => a * b,
        ValueOp::Div => a / b,
        ValueOp::Pow => a.powf(b),
        // comparisons never reach here
        _ => f64::NAN,
    }
}

fn arithmetic(op: ValueOp, lhs: &Primitive, rhs: &Primitive) -> NocaResult<Primitive> {
    match (lhs.as_scalar(), rhs.as_scalar()) {
        (Some(a), Some(b)) => Ok(Primitive::Number(scalar_op(op, a, b))),
        (Some(a), None) => Ok(Primitive::List(
            rhs.to_numbers()
                .into_iter()
                .map(|b| scalar_op(op, a, b))
                .collect(),
        )),
        (None, Some(b)) => Ok(Primitive::List(
            lhs.to_numbers()
                .into_iter()
                .map(|a| scalar_op(op, a, b))
                .collect(),
        )),
        (None, None) => {
            let (a, b) = (lhs.to_numbers(), rhs.to_numbers());
            if a.len() != b.len() {
                return Err(NocaError::incompatible(format!(
                    "cannot combine {lhs} {} {rhs}: lengths {} and {} differ",
                    op.symbol(),
                    a.len(),
                    b.len()
                )));
            }
            Ok(Primitive::List(
                a.into_iter()
                    .zip(b)
                    .map(|(a, b)| scalar_op(op, a, b))
                    .collect(),
            ))
        }
    }
}

fn compare(op: ValueOp, lhs: &Primitive, rhs: &Primitive) -> bool {
    use std::cmp::Ordering;

    let ord = match (lhs.as_scalar(), rhs.as_scalar()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        (None, None) => lhs.to_numbers().partial_cmp(&rhs.to_numbers()),
        // a list never equals a scalar and has no order against it
        _ => None,
    };
    match op {
        ValueOp::Eq => ord == Some(Ordering::Equal),
        ValueOp::Ne => ord != Some(Ordering::Equal),
        ValueOp::Gt => ord == Some(Ordering::Greater),
        ValueOp::Ge => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
        ValueOp::Lt => ord == Some(Ordering::Less),
        ValueOp::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
        _ => false,
    }
}

impl From<f64> for Primitive {
    fn from(v: f64) -> Self {
        Primitive::Number(v)
    }
}

impl From<i32> for Primitive {
    fn from(v: i32) -> Self {
        Primitive::Number(f64::from(v))
    }
}

impl From<bool> for Primitive {
    fn from(v: bool) -> Self {
        Primitive::Bool(v)
    }
}

impl From<Vec<f64>> for Primitive {
    fn from(v: Vec<f64>) -> Self {
        Primitive::List(v)
    }
}

impl<const N: usize> From<[f64; N]> for Primitive {
    fn from(v: [f64; N]) -> Self {
        Primitive::List(v.to_vec())
    }
}

impl From<f64> for ProvenanceValue {
    fn from(v: f64) -> Self {
        value(v)
    }
}

impl From<i32> for ProvenanceValue {
    fn from(v: i32) -> Self {
        value(v)
    }
}

impl From<bool> for ProvenanceValue {
    fn from(v: bool) -> Self {
        value(v)
    }
}

impl From<&ProvenanceValue> for ProvenanceValue {
    fn from(v: &ProvenanceValue) -> Self {
        v.clone()
    }
}

impl From<Vec<f64>> for ProvenanceValue {
    fn from(v: Vec<f64>) -> Self {
        value(v)
    }
}

macro_rules! impl_value_binop {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<T: Into<ProvenanceValue>> $trait<T> for ProvenanceValue {
            type Output = NocaResult<ProvenanceValue>;

            fn $method(self, rhs: T) -> Self::Output {
                self.combine($op, &rhs.into())
            }
        }

        impl<T: Into<ProvenanceValue>> $trait<T> for &ProvenanceValue {
            type Output = NocaResult<ProvenanceValue>;

            fn $method(self, rhs: T) -> Self::Output {
                self.combine($op, &rhs.into())
            }
        }

        impl $trait<ProvenanceValue> for f64 {
            type Output = NocaResult<ProvenanceValue>;

            fn $method(self, rhs: ProvenanceValue) -> Self::Output {
                value(self).combine($op, &rhs)
            }
        }
    };
}

impl Neg for &ProvenanceValue {
    type Output = ProvenanceValue;

    fn neg(self) -> ProvenanceValue {
        let value = match &self.value {
            Primitive::List(vs) => Primitive::List(vs.iter().map(|v| -v).collect()),
            scalar => Primitive::Number(-scalar.as_scalar().unwrap_or_default()),
        };
        ProvenanceValue {
            value,
            expression: format!("-{}", parenthesize(&self.expression)),
            user_authored: false,
        }
    }
}

impl Neg for ProvenanceValue {
    type Output = ProvenanceValue;

    fn neg(self) -> ProvenanceValue {
        -&self
    }
}

impl_value_binop!(Add, add, ValueOp::Add);
impl_value_binop!(Sub, sub, ValueOp::Sub);
impl_value_binop!(Mul, mul, ValueOp::Mul);
impl_value_binop!(Div, div, ValueOp::Div);

#[cfg(test)]
#[path = "../../tests/unit/provenance/value.rs"]
mod tests;
