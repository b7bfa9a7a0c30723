use sea_orm::{
    EntityTrait, Order, QueryOrder, Select,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

pub trait OrderByLower {
    /// Order by `lower(expr)`, for case-insensitive sorting of text columns or
    /// computed text such as a concatenated full name.
    fn order_by_lower(self, expr: impl Into<SimpleExpr>, order: Order) -> Self;
}

impl<E> OrderByLower for Select<E>
where
    E: EntityTrait,
{
    fn order_by_lower(mut self, expr: impl Into<SimpleExpr>, order: Order) -> Self {
        QueryOrder::query(&mut self)
            .order_by_expr(SimpleExpr::FunctionCall(Func::lower(expr.into())), order);
        self
    }
}

/// Escape `%`, `_` and `\` so user input matches literally inside a LIKE pattern.
pub fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `lower(expr) LIKE '%needle%'`, case-insensitive substring match.
pub fn contains_ci(expr: impl Into<SimpleExpr>, needle: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(expr.into())).like(LikeExpr::new(pattern).escape('\\'))
}

/// Case-insensitive equality on a text expression.
pub fn eq_ci(expr: impl Into<SimpleExpr>, value: &str) -> SimpleExpr {
    Expr::expr(Func::lower(expr.into())).eq(value.to_lowercase())
}
