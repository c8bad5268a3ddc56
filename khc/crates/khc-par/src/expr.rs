//! Expression parsing - the 20-level precedence ladder.
//!
//! One function per precedence level, lowest first; each consumes its
//! left-hand side from the next tighter level and loops on its own
//! operators. Comparisons collect into one n-ary chain node, and the
//! ternary and power levels recurse on themselves for right
//! associativity.
//!
//! The whole ladder is shared between value and type positions: an
//! [`ExprCtx`] threads `ignore_newline` and `filter_type` through every
//! level, and each level returns early when the filter forbids it.

use khc_lex::{Delim, Keyword, Op, Token};
use khc_util::DiagnosticCode;

use crate::ast::*;
use crate::Parser;

/// Context threaded through every expression level.
#[derive(Clone, Copy, Debug)]
pub struct ExprCtx {
    /// When set, newline tokens between operators and operands are
    /// insignificant (inside brackets, argument lists, ...).
    pub ignore_newline: bool,
    /// Type-only mode: only the expression subset that can denote a
    /// type is accepted; the rest reports a diagnostic.
    pub filter_type: bool,
    /// Whether an `ident :` atom may start a variable declaration.
    /// Cleared inside dict keys, where the `:` belongs to the literal.
    pub(crate) allow_declaration: bool,
}

impl ExprCtx {
    /// A value-position context.
    pub fn value(ignore_newline: bool) -> Self {
        Self {
            ignore_newline,
            filter_type: false,
            allow_declaration: true,
        }
    }

    /// A type-position context.
    pub fn type_only(ignore_newline: bool) -> Self {
        Self {
            ignore_newline,
            filter_type: true,
            allow_declaration: false,
        }
    }

    /// Same mode, different newline significance.
    pub(crate) fn with_ignore_newline(self, ignore_newline: bool) -> Self {
        Self {
            ignore_newline,
            ..self
        }
    }

    /// Same mode, with declaration atoms disabled.
    pub(crate) fn no_declaration(self) -> Self {
        Self {
            allow_declaration: false,
            ..self
        }
    }
}

/// Operators of the in-place assignment level.
const ASSIGN_OPS: &[Op] = &[
    Op::Eq,
    Op::PlusEq,
    Op::MinusEq,
    Op::StarEq,
    Op::SlashEq,
    Op::PercentEq,
    Op::CaretEq,
    Op::DotEq,
    Op::AmpersandEq,
    Op::PipeEq,
    Op::TildeEq,
    Op::ShlEq,
    Op::ShrEq,
];

fn assign_binop(op: Op) -> BinaryOp {
    match op {
        Op::Eq => BinaryOp::Assign,
        Op::PlusEq => BinaryOp::AddAssign,
        Op::MinusEq => BinaryOp::SubAssign,
        Op::StarEq => BinaryOp::MulAssign,
        Op::SlashEq => BinaryOp::DivAssign,
        Op::PercentEq => BinaryOp::ModAssign,
        Op::CaretEq => BinaryOp::PowAssign,
        Op::DotEq => BinaryOp::DotAssign,
        Op::AmpersandEq => BinaryOp::BitAndAssign,
        Op::PipeEq => BinaryOp::BitOrAssign,
        Op::TildeEq => BinaryOp::BitXorAssign,
        Op::ShlEq => BinaryOp::ShlAssign,
        Op::ShrEq => BinaryOp::ShrAssign,
        _ => unreachable!("not an assignment operator"),
    }
}

impl<'a> Parser<'a> {
    /// Parses one expression in the given context.
    ///
    /// This is the ladder's entry point; statement parsers and test
    /// harnesses call it directly.
    pub fn parse_expression(&mut self, ctx: ExprCtx) -> Expr {
        self.parse_assignment(ctx)
    }

    /// Level 1: in-place assignments, right-associative.
    fn parse_assignment(&mut self, ctx: ExprCtx) -> Expr {
        let lhs = self.parse_ternary(ctx);
        if ctx.filter_type {
            return lhs;
        }
        if let Some(op) = self.eat_any_op(ASSIGN_OPS, ctx.ignore_newline) {
            let rhs = self.parse_assignment(ctx);
            return Expr::binary(assign_binop(op), lhs, rhs);
        }
        lhs
    }

    /// Level 2: `value if condition else otherwise`.
    fn parse_ternary(&mut self, ctx: ExprCtx) -> Expr {
        let mut value = self.parse_or(ctx);
        if ctx.filter_type {
            return value;
        }
        while self.eat_keyword(Keyword::If, ctx.ignore_newline) {
            let condition = self.parse_or(ctx);
            self.expect_keyword(Keyword::Else, ctx.ignore_newline);
            let otherwise = self.parse_or(ctx);
            value = Expr::Ternary(TernaryExpr {
                span: value.span().merge(otherwise.span()),
                value: Box::new(value),
                condition: Box::new(condition),
                otherwise: Box::new(otherwise),
            });
        }
        value
    }

    /// Level 3: logical `or`.
    fn parse_or(&mut self, ctx: ExprCtx) -> Expr {
        let mut lhs = self.parse_xor(ctx);
        if ctx.filter_type {
            return lhs;
        }
        while self.eat_op(Op::Or, ctx.ignore_newline) {
            lhs = Expr::binary(BinaryOp::Or, lhs, self.parse_xor(ctx));
        }
        lhs
    }

    /// Level 4: logical `xor`.
    fn parse_xor(&mut self, ctx: ExprCtx) -> Expr {
        let mut lhs = self.parse_and(ctx);
        if ctx.filter_type {
            return lhs;
        }
        while self.eat_op(Op::Xor, ctx.ignore_newline) {
            lhs = Expr::binary(BinaryOp::Xor, lhs, self.parse_and(ctx));
        }
        lhs
    }

    /// Level 5: logical `and`.
    fn parse_and(&mut self, ctx: ExprCtx) -> Expr {
        let mut lhs = self.parse_not(ctx);
        if ctx.filter_type {
            return lhs;
        }
        while self.eat_op(Op::And, ctx.ignore_newline) {
            lhs = Expr::binary(BinaryOp::And, lhs, self.parse_not(ctx));
        }
        lhs
    }

    /// Level 6: low-binding prefix `not`.
    fn parse_not(&mut self, ctx: ExprCtx) -> Expr {
        if !ctx.filter_type {
            let start = self.peek_span(ctx.ignore_newline);
            if self.eat_op(Op::Not, ctx.ignore_newline) {
                let operand = self.parse_not(ctx);
                return Expr::Unary(UnaryExpr {
                    span: start.merge(operand.span()),
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                });
            }
        }
        self.parse_comparison(ctx)
    }

    /// Consumes a comparison operator, if next.
    fn eat_comparison_op(&mut self, ignore_newline: bool) -> Option<ComparisonOp> {
        let op = match self.peek(ignore_newline) {
            Token::Op(Op::EqEq) => ComparisonOp::Eq,
            Token::Op(Op::NotEq) => ComparisonOp::Ne,
            Token::Op(Op::Lt) => ComparisonOp::Lt,
            Token::Op(Op::Gt) => ComparisonOp::Gt,
            Token::Op(Op::LtEq) => ComparisonOp::Le,
            Token::Op(Op::GtEq) => ComparisonOp::Ge,
            _ => return None,
        };
        self.advance_to(ignore_newline);
        self.bump();
        Some(op)
    }

    /// Level 7: the comparison chain.
    ///
    /// `a < b <= c` is one node with `operations.len() + 1` operands,
    /// not a nest of binaries.
    fn parse_comparison(&mut self, ctx: ExprCtx) -> Expr {
        let first = self.parse_bitor(ctx);
        if ctx.filter_type {
            return first;
        }
        let Some(op) = self.eat_comparison_op(ctx.ignore_newline) else {
            return first;
        };
        let mut operations = vec![op];
        let mut operands = vec![first, self.parse_bitor(ctx)];
        while let Some(op) = self.eat_comparison_op(ctx.ignore_newline) {
            operations.push(op);
            operands.push(self.parse_bitor(ctx));
        }
        let span = operands
            .first()
            .map(|e| e.span())
            .unwrap_or_default()
            .merge(operands.last().map(|e| e.span()).unwrap_or_default());
        Expr::Comparison(ComparisonExpr {
            span,
            operations,
            operands,
        })
    }

    /// Parses one left-associative binary level.
    fn parse_left_assoc(
        &mut self,
        ctx: ExprCtx,
        ops: &[(Op, BinaryOp)],
        next: fn(&mut Self, ExprCtx) -> Expr,
    ) -> Expr {
        let mut lhs = next(self, ctx);
        if ctx.filter_type {
            return lhs;
        }
        'outer: loop {
            for &(token, op) in ops {
                if self.eat_op(token, ctx.ignore_newline) {
                    lhs = Expr::binary(op, lhs, next(self, ctx));
                    continue 'outer;
                }
            }
            break;
        }
        lhs
    }

    /// Level 8: bitwise or.
    fn parse_bitor(&mut self, ctx: ExprCtx) -> Expr {
        self.parse_left_assoc(ctx, &[(Op::Pipe, BinaryOp::BitOr)], Self::parse_bitxor)
    }

    /// Level 9: bitwise xor, spelled `~`.
    fn parse_bitxor(&mut self, ctx: ExprCtx) -> Expr {
        self.parse_left_assoc(ctx, &[(Op::Tilde, BinaryOp::BitXor)], Self::parse_bitand)
    }

    /// Level 10: bitwise and.
    fn parse_bitand(&mut self, ctx: ExprCtx) -> Expr {
        self.parse_left_assoc(ctx, &[(Op::Ampersand, BinaryOp::BitAnd)], Self::parse_shift)
    }

    /// Level 11: shifts.
    fn parse_shift(&mut self, ctx: ExprCtx) -> Expr {
        self.parse_left_assoc(
            ctx,
            &[(Op::Shl, BinaryOp::Shl), (Op::Shr, BinaryOp::Shr)],
            Self::parse_additive,
        )
    }

    /// Level 12: addition and subtraction.
    fn parse_additive(&mut self, ctx: ExprCtx) -> Expr {
        self.parse_left_assoc(
            ctx,
            &[(Op::Plus, BinaryOp::Add), (Op::Minus, BinaryOp::Sub)],
            Self::parse_multiplicative,
        )
    }

    /// Level 13: multiplication, division, modulo.
    fn parse_multiplicative(&mut self, ctx: ExprCtx) -> Expr {
        self.parse_left_assoc(
            ctx,
            &[
                (Op::Star, BinaryOp::Mul),
                (Op::Slash, BinaryOp::Div),
                (Op::Percent, BinaryOp::Mod),
            ],
            Self::parse_power,
        )
    }

    /// Level 14: power (`**` and its `^` spelling), right-associative.
    fn parse_power(&mut self, ctx: ExprCtx) -> Expr {
        let lhs = self.parse_prefix(ctx);
        if ctx.filter_type {
            return lhs;
        }
        if self.eat_op(Op::StarStar, ctx.ignore_newline)
            || self.eat_op(Op::Caret, ctx.ignore_newline)
        {
            let rhs = self.parse_power(ctx);
            return Expr::binary(BinaryOp::Pow, lhs, rhs);
        }
        lhs
    }

    /// Level 15: tight prefix unaries. None of them can denote a type,
    /// so the whole level is skipped under the filter.
    fn parse_prefix(&mut self, ctx: ExprCtx) -> Expr {
        if ctx.filter_type {
            return self.parse_postfix(ctx);
        }
        let op = match self.peek(ctx.ignore_newline) {
            Token::Op(Op::Plus) => Some(UnaryOp::Pos),
            Token::Op(Op::Minus) => Some(UnaryOp::Neg),
            Token::Op(Op::PlusPlus) => Some(UnaryOp::PreIncrement),
            Token::Op(Op::MinusMinus) => Some(UnaryOp::PreDecrement),
            Token::Op(Op::Not) => Some(UnaryOp::Not),
            Token::Op(Op::Tilde) => Some(UnaryOp::BitNot),
            _ => None,
        };
        if let Some(op) = op {
            let start = self.peek_span(ctx.ignore_newline);
            self.advance_to(ctx.ignore_newline);
            self.bump();
            let operand = self.parse_prefix(ctx);
            return Expr::Unary(UnaryExpr {
                span: start.merge(operand.span()),
                op,
                operand: Box::new(operand),
            });
        }
        self.parse_postfix(ctx)
    }

    /// Levels 16 and 17: postfix forms.
    ///
    /// Calls, indexing and postfix `++`/`--` share a loop with the
    /// tighter scope (`.name` runs) and templatize (`!`) forms; left
    /// associativity falls out of the loop order. Calls are value-only;
    /// indexing stays available to types for static-array sizing.
    fn parse_postfix(&mut self, ctx: ExprCtx) -> Expr {
        let mut expr = self.parse_atom(ctx);
        loop {
            if self.check_delim(Delim::Dot, ctx.ignore_newline) {
                let mut names = Vec::new();
                while self.eat_delim(Delim::Dot, ctx.ignore_newline) {
                    names.push(self.expect_ident(ctx.ignore_newline));
                }
                expr = Expr::Scope(ScopeExpr {
                    span: expr.span().merge(self.prev_span()),
                    value: Box::new(expr),
                    scope_names: names,
                });
            } else if self.check_delim(Delim::Bang, ctx.ignore_newline) {
                self.advance_to(ctx.ignore_newline);
                self.bump();
                let template_arguments = if self.eat_delim(Delim::LParen, true) {
                    self.parse_expr_list_until(Delim::RParen, ExprCtx::type_only(true))
                } else {
                    let span = self.peek_span(ctx.ignore_newline);
                    let name = self.expect_ident(ctx.ignore_newline);
                    vec![Expr::Ident(IdentExpr { span, name })]
                };
                expr = Expr::Templatize(TemplatizeExpr {
                    span: expr.span().merge(self.prev_span()),
                    value: Box::new(expr),
                    template_arguments,
                });
            } else if !ctx.filter_type && self.check_delim(Delim::LParen, ctx.ignore_newline) {
                self.advance_to(ctx.ignore_newline);
                self.bump();
                let arguments = self.parse_expr_list_until(Delim::RParen, ExprCtx::value(true));
                expr = Expr::Call(CallExpr {
                    span: expr.span().merge(self.prev_span()),
                    callee: Box::new(expr),
                    arguments,
                });
            } else if self.check_delim(Delim::LBracket, ctx.ignore_newline) {
                self.advance_to(ctx.ignore_newline);
                self.bump();
                let arguments =
                    self.parse_expr_list_until(Delim::RBracket, ctx.with_ignore_newline(true));
                expr = Expr::Index(IndexExpr {
                    span: expr.span().merge(self.prev_span()),
                    indexee: Box::new(expr),
                    arguments,
                });
            } else if let Some(op) =
                self.eat_any_op(&[Op::PlusPlus, Op::MinusMinus], ctx.ignore_newline)
            {
                let op = if op == Op::PlusPlus {
                    UnaryOp::PostIncrement
                } else {
                    UnaryOp::PostDecrement
                };
                expr = Expr::Unary(UnaryExpr {
                    span: expr.span().merge(self.prev_span()),
                    op,
                    operand: Box::new(expr),
                });
            } else {
                break;
            }
        }
        expr
    }

    /// Parses a comma-separated expression list up to (and including)
    /// the closing delimiter. Newlines inside the list are
    /// insignificant.
    pub(crate) fn parse_expr_list_until(&mut self, close: Delim, ctx: ExprCtx) -> Vec<Expr> {
        let mut values = Vec::new();
        loop {
            if self.eat_delim(close, true) {
                break;
            }
            if matches!(self.peek(true), Token::Eof) {
                self.error(
                    "unexpected end of file in expression list",
                    DiagnosticCode::E2003,
                    self.peek_span(true),
                );
                break;
            }
            values.push(self.parse_expression(ctx.with_ignore_newline(true)));
            if !self.eat_delim(Delim::Comma, true) {
                self.expect_delim(close, true);
                break;
            }
        }
        values
    }

    /// Builds a literal atom, checking the type filter.
    fn literal_atom(
        &mut self,
        ctx: ExprCtx,
        span: khc_util::Span,
        value: LiteralValue,
    ) -> Expr {
        // Integer and uinteger literals stay available to types for
        // static-array sizing; everything else is value-only.
        let sizing = matches!(
            value,
            LiteralValue::Integer(_) | LiteralValue::UInteger(_)
        );
        if ctx.filter_type && !sizing {
            self.error(
                "literal not allowed in a type",
                DiagnosticCode::E2009,
                span,
            );
        }
        self.bump();
        Expr::Literal(LiteralExpr { span, value })
    }

    /// Level 18: atoms.
    fn parse_atom(&mut self, ctx: ExprCtx) -> Expr {
        self.advance_to(ctx.ignore_newline);
        let span = self.current_span();
        match self.current_token().clone() {
            Token::Int(v) => self.literal_atom(ctx, span, LiteralValue::Integer(v)),
            Token::UInt(v) => self.literal_atom(ctx, span, LiteralValue::UInteger(v)),
            Token::Byte(v) => self.literal_atom(ctx, span, LiteralValue::Byte(v)),
            Token::SByte(v) => self.literal_atom(ctx, span, LiteralValue::SByte(v)),
            Token::Short(v) => self.literal_atom(ctx, span, LiteralValue::Short(v)),
            Token::UShort(v) => self.literal_atom(ctx, span, LiteralValue::UShort(v)),
            Token::Long(v) => self.literal_atom(ctx, span, LiteralValue::Long(v)),
            Token::ULong(v) => self.literal_atom(ctx, span, LiteralValue::ULong(v)),
            Token::Float(v) => self.literal_atom(ctx, span, LiteralValue::Float(v)),
            Token::Double(v) => self.literal_atom(ctx, span, LiteralValue::Double(v)),
            Token::IFloat(v) => self.literal_atom(ctx, span, LiteralValue::IFloat(v)),
            Token::IDouble(v) => self.literal_atom(ctx, span, LiteralValue::IDouble(v)),
            Token::Char(v) => self.literal_atom(ctx, span, LiteralValue::Char(v)),
            Token::Str(v) => self.literal_atom(ctx, span, LiteralValue::Str(v)),
            Token::Buffer(v) => self.literal_atom(ctx, span, LiteralValue::Buffer(v)),

            Token::Ident(name) => {
                if ctx.allow_declaration
                    && !ctx.filter_type
                    && self.peek_second(ctx.ignore_newline) == &Token::Delim(Delim::Colon)
                {
                    return self.parse_variable_declaration(ctx, false);
                }
                self.bump();
                Expr::Ident(IdentExpr { span, name })
            }

            Token::Keyword(Keyword::Def) => {
                if self.peek_second(ctx.ignore_newline) == &Token::Delim(Delim::Bang) {
                    self.parse_function_type()
                } else {
                    if ctx.filter_type {
                        self.error(
                            "lambda not allowed in a type",
                            DiagnosticCode::E2009,
                            span,
                        );
                    }
                    self.parse_lambda()
                }
            }

            Token::Keyword(Keyword::Static)
            | Token::Keyword(Keyword::Wild)
            | Token::Keyword(Keyword::Ref) => {
                if ctx.filter_type {
                    self.error(
                        "variable declaration not allowed in a type",
                        DiagnosticCode::E2009,
                        span,
                    );
                }
                self.parse_variable_declaration(ctx, false)
            }

            Token::Delim(Delim::LParen) => {
                self.bump();
                let values =
                    self.parse_expr_list_until(Delim::RParen, ctx.with_ignore_newline(true));
                if values.len() == 1 {
                    // A single element is a grouping; the parentheses
                    // leave no node behind.
                    values.into_iter().next().unwrap()
                } else {
                    Expr::Tuple(TupleExpr {
                        span: span.merge(self.prev_span()),
                        values,
                    })
                }
            }

            Token::Delim(Delim::LBracket) => {
                if ctx.filter_type {
                    self.error(
                        "array literal not allowed in a type",
                        DiagnosticCode::E2009,
                        span,
                    );
                }
                self.bump();
                let values = self.parse_expr_list_until(Delim::RBracket, ExprCtx::value(true));
                Expr::Array(ArrayExpr {
                    span: span.merge(self.prev_span()),
                    values,
                })
            }

            Token::Delim(Delim::LBrace) => {
                if ctx.filter_type {
                    self.error(
                        "dict literal not allowed in a type",
                        DiagnosticCode::E2009,
                        span,
                    );
                }
                self.bump();
                let mut keys = Vec::new();
                let mut values = Vec::new();
                loop {
                    if self.eat_delim(Delim::RBrace, true) {
                        break;
                    }
                    if matches!(self.peek(true), Token::Eof) {
                        self.error(
                            "unexpected end of file in dict literal",
                            DiagnosticCode::E2003,
                            self.peek_span(true),
                        );
                        break;
                    }
                    keys.push(self.parse_expression(ExprCtx::value(true).no_declaration()));
                    self.expect_delim(Delim::Colon, true);
                    values.push(self.parse_expression(ExprCtx::value(true)));
                    if !self.eat_delim(Delim::Comma, true) {
                        self.expect_delim(Delim::RBrace, true);
                        break;
                    }
                }
                Expr::Dict(DictExpr {
                    span: span.merge(self.prev_span()),
                    keys,
                    values,
                })
            }

            Token::Newline | Token::Eof => {
                // Leave the terminator for the statement machinery.
                self.error(
                    "expected an expression",
                    DiagnosticCode::E2002,
                    span,
                );
                Expr::Invalid(span)
            }

            _ => {
                self.error(
                    format!("expected an expression, found {}", self.describe_peek(false)),
                    DiagnosticCode::E2002,
                    span,
                );
                self.bump();
                Expr::Invalid(span)
            }
        }
    }

    /// Parses a variable declaration expression:
    /// `(static)? (wild)? (ref)? name : (type)? (= initializer)?`.
    ///
    /// `pre_static` is set when an enclosing specifier prefix already
    /// consumed the `static` keyword.
    pub(crate) fn parse_variable_declaration(&mut self, ctx: ExprCtx, pre_static: bool) -> Expr {
        let start = self.peek_span(ctx.ignore_newline);
        let is_static = pre_static || self.eat_keyword(Keyword::Static, ctx.ignore_newline);
        let is_wild = self.eat_keyword(Keyword::Wild, ctx.ignore_newline);
        let is_ref = self.eat_keyword(Keyword::Ref, ctx.ignore_newline);
        let name = self.expect_ident(ctx.ignore_newline);
        self.expect_delim(Delim::Colon, ctx.ignore_newline);

        let ty = if self.type_follows(ctx) {
            Some(Box::new(
                self.parse_expression(ExprCtx::type_only(ctx.ignore_newline)),
            ))
        } else {
            None
        };

        let initializer = if self.eat_op(Op::Eq, ctx.ignore_newline) {
            Some(Box::new(
                self.parse_expression(ExprCtx::value(ctx.ignore_newline)),
            ))
        } else {
            None
        };

        if ty.is_none() && initializer.is_none() {
            self.error(
                "variable declaration needs a type or an initializer",
                DiagnosticCode::E2003,
                start.merge(self.prev_span()),
            );
        }

        Expr::VariableDeclaration(VariableDeclaration {
            span: start.merge(self.prev_span()),
            is_static,
            is_wild,
            is_ref,
            name,
            ty,
            initializer,
        })
    }

    /// True when a type expression follows the `:` of a declaration.
    fn type_follows(&self, ctx: ExprCtx) -> bool {
        !matches!(
            self.peek(ctx.ignore_newline),
            Token::Op(Op::Eq)
                | Token::Eof
                | Token::Newline
                | Token::Delim(Delim::Semicolon)
                | Token::Delim(Delim::Comma)
                | Token::Delim(Delim::RParen)
                | Token::Delim(Delim::RBrace)
                | Token::Delim(Delim::RBracket)
        )
    }

    /// Parses a lambda: `def (args) -> ret { body }`. The cursor stands
    /// on `def`.
    fn parse_lambda(&mut self) -> Expr {
        let start = self.current_span();
        self.bump();
        let (arguments, variadic_argument, is_return_type_ref, return_type) =
            self.parse_signature();
        let content = self.parse_block();
        Expr::Lambda(Lambda {
            span: start.merge(self.prev_span()),
            arguments,
            variadic_argument: variadic_argument.map(Box::new),
            is_return_type_ref,
            return_type,
            content,
        })
    }

    /// Parses a function type: `def!(types) -> ret`. The cursor stands
    /// on `def` with `!` known to follow.
    fn parse_function_type(&mut self) -> Expr {
        let start = self.current_span();
        self.bump(); // def
        self.bump(); // !

        let mut argument_types = Vec::new();
        let mut are_arguments_refs = Vec::new();
        if self.expect_delim(Delim::LParen, true) {
            loop {
                if self.eat_delim(Delim::RParen, true) {
                    break;
                }
                if matches!(self.peek(true), Token::Eof) {
                    self.error(
                        "unexpected end of file in function type",
                        DiagnosticCode::E2003,
                        self.peek_span(true),
                    );
                    break;
                }
                are_arguments_refs.push(self.eat_keyword(Keyword::Ref, true));
                argument_types.push(self.parse_expression(ExprCtx::type_only(true)));
                if !self.eat_delim(Delim::Comma, true) {
                    self.expect_delim(Delim::RParen, true);
                    break;
                }
            }
        }

        let (is_return_type_ref, return_type) = self.parse_return_annotation();
        Expr::FunctionType(FunctionType {
            span: start.merge(self.prev_span()),
            argument_types,
            are_arguments_refs,
            is_return_type_ref,
            return_type,
        })
    }

    /// Parses the optional `-> (ref)? type` tail shared by function
    /// definitions, lambdas, and function types.
    pub(crate) fn parse_return_annotation(&mut self) -> (bool, Option<Box<Expr>>) {
        if self.eat_delim(Delim::Arrow, true) {
            let is_ref = self.eat_keyword(Keyword::Ref, true);
            let ty = self.parse_expression(ExprCtx::type_only(true));
            (is_ref, Some(Box::new(ty)))
        } else {
            (false, None)
        }
    }
}
