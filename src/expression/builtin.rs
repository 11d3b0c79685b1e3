use super::{Bindings, CompiledExpression, ExprError, ExpressionEvaluator};
use crate::parse::{parse, ParseError};
use crate::{ArithOp, Expr, Value};

/// The default [`ExpressionEvaluator`]: a small infix language with
/// comparisons, arithmetic and boolean connectives.
///
/// ```text
/// age < 21
/// rnd >= 200 AND NOT (country == 'US' || country == "CA")
/// income / dependents <= 1000.5
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEvaluator;

#[derive(Debug)]
struct BuiltinExpression {
    expr: Expr,
}

impl ExpressionEvaluator for BuiltinEvaluator {
    fn compile(&self, source: &str) -> Result<Box<dyn CompiledExpression>, ParseError> {
        let expr = parse(source)?;
        Ok(Box::new(BuiltinExpression { expr }))
    }
}

impl CompiledExpression for BuiltinExpression {
    fn evaluate(&self, bindings: &dyn Bindings) -> Result<Value, ExprError> {
        eval_expr(&self.expr, bindings)
    }
}

fn eval_expr(expr: &Expr, bindings: &dyn Bindings) -> Result<Value, ExprError> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Var(name) => bindings
            .lookup(name)
            .cloned()
            .ok_or_else(|| ExprError::UnboundVariable { name: name.clone() }),
        Expr::Neg(inner) => negate(eval_expr(inner, bindings)?),
        Expr::Arith { op, lhs, rhs } => {
            let l = eval_expr(lhs, bindings)?;
            let r = eval_expr(rhs, bindings)?;
            arith(*op, &l, &r)
        }
        Expr::Compare { op, lhs, rhs } => {
            let l = eval_expr(lhs, bindings)?;
            let r = eval_expr(rhs, bindings)?;
            l.compare(*op, &r)
                .map(Value::Bool)
                .ok_or_else(|| ExprError::TypeMismatch {
                    op: op.to_string(),
                    left: l.type_name(),
                    right: r.type_name(),
                })
        }
        Expr::And(a, b) => {
            if !eval_bool("AND", a, bindings)? {
                return Ok(Value::Bool(false));
            }
            eval_bool("AND", b, bindings).map(Value::Bool)
        }
        Expr::Or(a, b) => {
            if eval_bool("OR", a, bindings)? {
                return Ok(Value::Bool(true));
            }
            eval_bool("OR", b, bindings).map(Value::Bool)
        }
        Expr::Not(inner) => eval_bool("NOT", inner, bindings).map(|b| Value::Bool(!b)),
    }
}

fn eval_bool(op: &str, expr: &Expr, bindings: &dyn Bindings) -> Result<bool, ExprError> {
    let value = eval_expr(expr, bindings)?;
    value.as_bool().ok_or_else(|| ExprError::InvalidOperand {
        op: op.to_owned(),
        expected: "boolean",
        found: value.type_name(),
    })
}

fn negate(value: Value) -> Result<Value, ExprError> {
    match value {
        Value::Int(i) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| ExprError::Overflow { op: "-".to_owned() }),
        Value::Float(f) => Ok(Value::Float(-f)),
        other => Err(ExprError::InvalidOperand {
            op: "-".to_owned(),
            expected: "numeric",
            found: other.type_name(),
        }),
    }
}

#[allow(clippy::cast_precision_loss)]
fn arith(op: ArithOp, l: &Value, r: &Value) -> Result<Value, ExprError> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => int_arith(op, *a, *b),
        (Value::Int(a), Value::Float(b)) => float_arith(op, *a as f64, *b),
        (Value::Float(a), Value::Int(b)) => float_arith(op, *a, *b as f64),
        (Value::Float(a), Value::Float(b)) => float_arith(op, *a, *b),
        (Value::String(a), Value::String(b)) if op == ArithOp::Add => {
            Ok(Value::String(format!("{a}{b}")))
        }
        _ => Err(ExprError::TypeMismatch {
            op: op.to_string(),
            left: l.type_name(),
            right: r.type_name(),
        }),
    }
}

fn int_arith(op: ArithOp, a: i64, b: i64) -> Result<Value, ExprError> {
    if matches!(op, ArithOp::Div | ArithOp::Rem) && b == 0 {
        return Err(ExprError::DivisionByZero);
    }
    let result = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        ArithOp::Div => a.checked_div(b),
        ArithOp::Rem => a.checked_rem(b),
    };
    result
        .map(Value::Int)
        .ok_or_else(|| ExprError::Overflow { op: op.to_string() })
}

fn float_arith(op: ArithOp, a: f64, b: f64) -> Result<Value, ExprError> {
    if matches!(op, ArithOp::Div | ArithOp::Rem) && b == 0.0 {
        return Err(ExprError::DivisionByZero);
    }
    Ok(Value::Float(match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        ArithOp::Rem => a % b,
    }))
}
