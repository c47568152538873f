//! Core expression and template evaluator.

use crate::Scope;
use hilt_types::ast::*;
use hilt_types::{Result, Span, TemplateError, Value};

/// Walks AST nodes against a read-only [`Scope`] and produces Values.
pub struct Evaluator<'s> {
    scope: &'s Scope,
}

/// Evaluate a single expression against `scope`.
pub fn evaluate(expr: &Expr, scope: &Scope) -> Result<Value> {
    Evaluator::new(scope).eval_expr(expr)
}

impl<'s> Evaluator<'s> {
    pub fn new(scope: &'s Scope) -> Self {
        Self { scope }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Templates
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate every span and concatenate the results with the literal
    /// text, in document order. Stops at the first failing span.
    pub fn render(&self, template: &Template) -> Result<String> {
        let mut out = String::new();
        for segment in &template.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Expr(expr) => {
                    let value = self.eval_expr(expr)?;
                    let text = value.render().ok_or(TemplateError::ResultType {
                        got: value.type_tag(),
                        span: expr.span,
                    })?;
                    out.push_str(&text);
                }
            }
        }
        Ok(out)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&self, expr: &Expr) -> Result<Value> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::Variable(name) => self.eval_variable(name),
            ExprKind::Call { name, args } => self.eval_call(name, args, expr.span),
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right, expr.span),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, expr.span),
        }
    }

    // ── Identifiers & Calls ──────────────────────────────────────────────

    fn eval_variable(&self, name: &Ident) -> Result<Value> {
        self.scope
            .variable(&name.name)
            .cloned()
            .ok_or_else(|| TemplateError::UnknownVariable {
                name: name.name.clone(),
                span: name.span,
            })
    }

    /// Resolve the function, evaluate arguments left to right (stopping at
    /// the first failure), check them against the signature, then invoke.
    fn eval_call(&self, name: &Ident, args: &[Expr], span: Span) -> Result<Value> {
        let function = self.scope.function(&name.name).ok_or_else(|| {
            TemplateError::UnknownFunction {
                name: name.name.clone(),
                span: name.span,
            }
        })?;

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        function.check_args(&name.name, &values, span)?;

        tracing::trace!(function = %name.name, args = values.len(), "calling function");
        let result = function.call(&values).map_err(|message| {
            tracing::debug!(function = %name.name, %message, "function reported failure");
            TemplateError::Callback {
                function: name.name.clone(),
                message,
                span,
            }
        })?;

        let got = result.type_tag();
        if !function.return_type.accepts(got) {
            tracing::error!(
                function = %name.name,
                expected = %function.return_type,
                %got,
                "function broke its return type contract"
            );
            return Err(TemplateError::ReturnType {
                function: name.name.clone(),
                expected: function.return_type,
                got,
                span,
            });
        }
        Ok(result)
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_binary(&self, left: &Expr, op: BinOp, right: &Expr, span: Span) -> Result<Value> {
        let lhs = self.eval_expr(left)?;
        let rhs = self.eval_expr(right)?;
        let arithmetic = |message: String| TemplateError::Arithmetic { message, span };

        match (&lhs, &rhs) {
            (Value::Int(a), Value::Int(b)) => int_op(op, *a, *b).map(Value::Int).map_err(arithmetic),
            _ => match (as_float(&lhs), as_float(&rhs)) {
                (Some(a), Some(b)) => float_op(op, a, b).map(Value::Float).map_err(arithmetic),
                _ => Err(arithmetic(format!(
                    "operator '{}' cannot be applied to {} and {}",
                    op.symbol(),
                    lhs.type_tag(),
                    rhs.type_tag()
                ))),
            },
        }
    }

    fn eval_unary(&self, op: UnaryOp, operand: &Expr, span: Span) -> Result<Value> {
        let value = self.eval_expr(operand)?;
        match (op, value) {
            (UnaryOp::Neg, Value::Int(n)) => {
                n.checked_neg().map(Value::Int).ok_or_else(|| TemplateError::Arithmetic {
                    message: format!("integer overflow in -({n})"),
                    span,
                })
            }
            (UnaryOp::Neg, Value::Float(n)) => Ok(Value::Float(-n)),
            (UnaryOp::Neg, other) => Err(TemplateError::Arithmetic {
                message: format!("operator '-' cannot be applied to {}", other.type_tag()),
                span,
            }),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Arithmetic helpers
// ══════════════════════════════════════════════════════════════════════════

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        _ => None,
    }
}

fn int_op(op: BinOp, a: i64, b: i64) -> std::result::Result<i64, String> {
    if b == 0 && matches!(op, BinOp::Div | BinOp::Mod) {
        return Err(zero_divisor(op));
    }
    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => a.checked_div(b),
        BinOp::Mod => a.checked_rem(b),
    };
    result.ok_or_else(|| format!("integer overflow in {a} {} {b}", op.symbol()))
}

fn float_op(op: BinOp, a: f64, b: f64) -> std::result::Result<f64, String> {
    if b == 0.0 && matches!(op, BinOp::Div | BinOp::Mod) {
        return Err(zero_divisor(op));
    }
    Ok(match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Mod => a % b,
    })
}

fn zero_divisor(op: BinOp) -> String {
    match op {
        BinOp::Mod => "modulo by zero".to_string(),
        _ => "division by zero".to_string(),
    }
}
