//! AST node definitions for the Kithare front-end.
//!
//! Pure data: the parser builds these, nothing here mutates them. Every
//! node records the source range it was parsed from. Children are owned
//! through `Box`/`Vec` at the recursive points, so a statement tree is
//! dropped as a unit.
//!
//! The `Display` implementations reprint canonical source; reparsing a
//! node's printed form yields an equal node (up to whitespace), which the
//! round-trip tests rely on.

use std::fmt;

use khc_lex::Token;
use khc_util::{Span, Symbol};

/// AST root - a parsed source is a sequence of statements.
pub type Ast = Vec<Stmt>;

// =============================================================================
// STATEMENTS
// =============================================================================

/// A block-level statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Placeholder produced by error recovery.
    Invalid(Span),
    /// `import a.b.c as z`
    Import(Import),
    /// `include .a.b` - same shape as import, inlines at the top level.
    Include(Import),
    /// `def name(args) -> ret { ... }`
    Function(Function),
    /// `class Name!(T)(Base) { ... }`
    Class(Composite),
    /// `struct Name { ... }`
    Struct(Composite),
    /// `enum Name { a, b }`
    Enum(EnumDecl),
    /// `alias name expr`
    Alias(AliasDecl),
    /// `if c { } elif c2 { } else { }`
    If(IfBranch),
    /// `while c { }`
    While(WhileLoop),
    /// `do { } while c`
    DoWhile(DoWhileLoop),
    /// `for init, cond, update { }`
    For(ForLoop),
    /// `for x, y in iteratee { }`
    ForEach(ForEachLoop),
    /// `break`
    Break(Span),
    /// `continue`
    Continue(Span),
    /// `return a, b`
    Return(Return),
    /// An expression in statement position.
    Expr(Expr),
}

impl Stmt {
    /// The source range this statement covers.
    pub fn span(&self) -> Span {
        match self {
            Stmt::Invalid(span) | Stmt::Break(span) | Stmt::Continue(span) => *span,
            Stmt::Import(node) | Stmt::Include(node) => node.span,
            Stmt::Function(node) => node.span,
            Stmt::Class(node) | Stmt::Struct(node) => node.span,
            Stmt::Enum(node) => node.span,
            Stmt::Alias(node) => node.span,
            Stmt::If(node) => node.span,
            Stmt::While(node) => node.span,
            Stmt::DoWhile(node) => node.span,
            Stmt::For(node) => node.span,
            Stmt::ForEach(node) => node.span,
            Stmt::Return(node) => node.span,
            Stmt::Expr(expr) => expr.span(),
        }
    }
}

/// An `import` or `include` statement.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    pub span: Span,
    /// Dot-separated module path, at least one element.
    pub path: Vec<Symbol>,
    /// True when the path began with a leading `.`.
    pub relative: bool,
    /// Binding name after `as`, import only.
    pub alias: Option<Symbol>,
}

/// A function definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub span: Span,
    pub is_incase: bool,
    pub is_static: bool,
    /// The target name, possibly scoped (`a.b`) or templatized (`f!T`).
    pub name_point: Expr,
    pub arguments: Vec<VariableDeclaration>,
    /// The `...`-marked trailing argument, if any.
    pub variadic_argument: Option<VariableDeclaration>,
    pub is_return_type_ref: bool,
    pub return_type: Option<Box<Expr>>,
    pub content: Vec<Stmt>,
}

/// A `class` or `struct` definition; the two share a shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Composite {
    pub span: Span,
    pub is_incase: bool,
    pub name: Symbol,
    /// Template parameters from `!T` or `!(T, U)`.
    pub template_arguments: Vec<Symbol>,
    /// Base type from a parenthesized suffix.
    pub base_type: Option<Box<Expr>>,
    pub content: Vec<Stmt>,
}

/// An `enum` definition. Members are plain identifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumDecl {
    pub span: Span,
    pub name: Symbol,
    pub members: Vec<Symbol>,
}

/// An `alias` definition.
#[derive(Clone, Debug, PartialEq)]
pub struct AliasDecl {
    pub span: Span,
    pub is_incase: bool,
    pub name: Symbol,
    pub expression: Box<Expr>,
}

/// An `if`/`elif`/`else` chain.
///
/// `branch_conditions` and `branch_contents` always have the same
/// length; `else_content` may be empty.
#[derive(Clone, Debug, PartialEq)]
pub struct IfBranch {
    pub span: Span,
    pub branch_conditions: Vec<Expr>,
    pub branch_contents: Vec<Vec<Stmt>>,
    pub else_content: Vec<Stmt>,
}

/// A `while` loop.
#[derive(Clone, Debug, PartialEq)]
pub struct WhileLoop {
    pub span: Span,
    pub condition: Box<Expr>,
    pub content: Vec<Stmt>,
}

/// A `do { } while cond` loop.
#[derive(Clone, Debug, PartialEq)]
pub struct DoWhileLoop {
    pub span: Span,
    pub condition: Box<Expr>,
    pub content: Vec<Stmt>,
}

/// A C-style `for init, cond, update { }` loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub span: Span,
    pub initial_expression: Box<Expr>,
    pub loop_condition: Box<Expr>,
    pub update_expression: Box<Expr>,
    pub content: Vec<Stmt>,
}

/// A `for x, y in iteratee { }` loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ForEachLoop {
    pub span: Span,
    /// At least one iterator expression.
    pub iterators: Vec<Expr>,
    pub iteratee: Box<Expr>,
    pub content: Vec<Stmt>,
}

/// A `return` statement; `values` is empty for a bare return.
#[derive(Clone, Debug, PartialEq)]
pub struct Return {
    pub span: Span,
    pub values: Vec<Expr>,
}

// =============================================================================
// EXPRESSIONS
// =============================================================================

/// An expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Placeholder produced by error recovery.
    Invalid(Span),
    /// A name.
    Ident(IdentExpr),
    /// A literal constant.
    Literal(LiteralExpr),
    /// `(a, b)` - zero or two-plus elements; one element collapses to
    /// the grouped expression instead.
    Tuple(TupleExpr),
    /// `[a, b]`
    Array(ArrayExpr),
    /// `{k: v, ...}` - keys and values always have the same length.
    Dict(DictExpr),
    /// One `.n1.n2` run applied to a value.
    Scope(ScopeExpr),
    /// `value!T` or `value!(T, U)`
    Templatize(TemplatizeExpr),
    /// `indexee[args]`
    Index(IndexExpr),
    /// `callee(args)`
    Call(CallExpr),
    /// Prefix or postfix unary operation.
    Unary(UnaryExpr),
    /// Binary operation, including assignments.
    Binary(BinaryExpr),
    /// `value if condition else otherwise`
    Ternary(TernaryExpr),
    /// Chained comparison: `operands.len() == operations.len() + 1`.
    Comparison(ComparisonExpr),
    /// `name: type = init` with optional specifiers.
    VariableDeclaration(VariableDeclaration),
    /// `def (args) -> ret { body }`
    Lambda(Lambda),
    /// `def!(types) -> ret`
    FunctionType(FunctionType),
}

/// An identifier expression.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentExpr {
    pub span: Span,
    pub name: Symbol,
}

/// A literal expression. The value mirrors the typed literal tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct LiteralExpr {
    pub span: Span,
    pub value: LiteralValue,
}

/// The payload of a literal expression.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Byte(u8),
    SByte(i8),
    Short(i16),
    UShort(u16),
    Integer(i32),
    UInteger(u32),
    Long(i64),
    ULong(u64),
    Float(f32),
    Double(f64),
    IFloat(f32),
    IDouble(f64),
    Char(char),
    Str(Symbol),
    Buffer(Vec<u8>),
}

/// A tuple expression.
#[derive(Clone, Debug, PartialEq)]
pub struct TupleExpr {
    pub span: Span,
    pub values: Vec<Expr>,
}

/// An array expression.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayExpr {
    pub span: Span,
    pub values: Vec<Expr>,
}

/// A dict expression; parallel key/value arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct DictExpr {
    pub span: Span,
    pub keys: Vec<Expr>,
    pub values: Vec<Expr>,
}

/// One run of `.name` scope traversal.
#[derive(Clone, Debug, PartialEq)]
pub struct ScopeExpr {
    pub span: Span,
    pub value: Box<Expr>,
    /// The chain of names, in source order.
    pub scope_names: Vec<Symbol>,
}

/// Application of template arguments via `!`.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplatizeExpr {
    pub span: Span,
    pub value: Box<Expr>,
    pub template_arguments: Vec<Expr>,
}

/// An index expression.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexExpr {
    pub span: Span,
    pub indexee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

/// A call expression.
#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub span: Span,
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

/// A unary expression; `op` distinguishes prefix from postfix forms.
#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub span: Span,
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

/// A binary expression.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpr {
    pub span: Span,
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

/// A conditional expression: `value if condition else otherwise`.
#[derive(Clone, Debug, PartialEq)]
pub struct TernaryExpr {
    pub span: Span,
    pub value: Box<Expr>,
    pub condition: Box<Expr>,
    pub otherwise: Box<Expr>,
}

/// A chained comparison. `a < b <= c` is one node with two operations
/// and three operands, not a nest of binaries.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonExpr {
    pub span: Span,
    pub operations: Vec<ComparisonOp>,
    pub operands: Vec<Expr>,
}

/// A variable declaration expression.
///
/// At least one of `ty` and `initializer` is present in well-formed
/// input; both may be absent after error recovery.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDeclaration {
    pub span: Span,
    pub is_static: bool,
    pub is_wild: bool,
    pub is_ref: bool,
    pub name: Symbol,
    /// Type-filtered expression after the `:`.
    pub ty: Option<Box<Expr>>,
    pub initializer: Option<Box<Expr>>,
}

/// A lambda: a function minus name and outer specifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct Lambda {
    pub span: Span,
    pub arguments: Vec<VariableDeclaration>,
    pub variadic_argument: Option<Box<VariableDeclaration>>,
    pub is_return_type_ref: bool,
    pub return_type: Option<Box<Expr>>,
    pub content: Vec<Stmt>,
}

/// A function type: `def!(int, ref float) -> ref double`.
///
/// `argument_types` and `are_arguments_refs` always have the same
/// length.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionType {
    pub span: Span,
    pub argument_types: Vec<Expr>,
    pub are_arguments_refs: Vec<bool>,
    pub is_return_type_ref: bool,
    pub return_type: Option<Box<Expr>>,
}

impl Expr {
    /// The source range this expression covers.
    pub fn span(&self) -> Span {
        match self {
            Expr::Invalid(span) => *span,
            Expr::Ident(node) => node.span,
            Expr::Literal(node) => node.span,
            Expr::Tuple(node) => node.span,
            Expr::Array(node) => node.span,
            Expr::Dict(node) => node.span,
            Expr::Scope(node) => node.span,
            Expr::Templatize(node) => node.span,
            Expr::Index(node) => node.span,
            Expr::Call(node) => node.span,
            Expr::Unary(node) => node.span,
            Expr::Binary(node) => node.span,
            Expr::Ternary(node) => node.span,
            Expr::Comparison(node) => node.span,
            Expr::VariableDeclaration(node) => node.span,
            Expr::Lambda(node) => node.span,
            Expr::FunctionType(node) => node.span,
        }
    }

    /// Builds a binary node spanning both operands.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            span: left.span().merge(right.span()),
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

// =============================================================================
// OPERATOR KINDS
// =============================================================================

/// Binary operation kinds, including in-place assignments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,
    DotAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
    Or,
    Xor,
    And,
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    /// The operator's canonical spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::ModAssign => "%=",
            BinaryOp::PowAssign => "^=",
            BinaryOp::DotAssign => ".=",
            BinaryOp::BitAndAssign => "&=",
            BinaryOp::BitOrAssign => "|=",
            BinaryOp::BitXorAssign => "~=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
            BinaryOp::And => "and",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "~",
            BinaryOp::BitAnd => "&",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
        }
    }
}

/// Unary operation kinds. Postfix increment and decrement are distinct
/// from their prefix forms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Pos,
    Neg,
    PreIncrement,
    PreDecrement,
    Not,
    BitNot,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    /// The operator's spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Pos => "+",
            UnaryOp::Neg => "-",
            UnaryOp::PreIncrement | UnaryOp::PostIncrement => "++",
            UnaryOp::PreDecrement | UnaryOp::PostDecrement => "--",
            UnaryOp::Not => "not",
            UnaryOp::BitNot => "~",
        }
    }

    /// True for the postfix forms.
    pub fn is_postfix(self) -> bool {
        matches!(self, UnaryOp::PostIncrement | UnaryOp::PostDecrement)
    }
}

/// Comparison operation kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl ComparisonOp {
    /// The operator's spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gt => ">",
            ComparisonOp::Le => "<=",
            ComparisonOp::Ge => ">=",
        }
    }
}

// =============================================================================
// REPR (Display)
// =============================================================================

/// Reprints a whole statement sequence, one statement per line.
pub fn repr(ast: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in ast {
        out.push_str(&stmt.to_string());
        out.push('\n');
    }
    out
}

fn write_block(f: &mut fmt::Formatter<'_>, content: &[Stmt]) -> fmt::Result {
    if content.is_empty() {
        return write!(f, "{{ }}");
    }
    writeln!(f, "{{")?;
    for stmt in content {
        writeln!(f, "{}", stmt)?;
    }
    write!(f, "}}")
}

fn write_comma_list(f: &mut fmt::Formatter<'_>, values: &[Expr]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    Ok(())
}

fn write_declaration(f: &mut fmt::Formatter<'_>, decl: &VariableDeclaration) -> fmt::Result {
    if decl.is_static {
        write!(f, "static ")?;
    }
    if decl.is_wild {
        write!(f, "wild ")?;
    }
    if decl.is_ref {
        write!(f, "ref ")?;
    }
    write!(f, "{}:", decl.name)?;
    if let Some(ty) = &decl.ty {
        write!(f, " {}", ty)?;
    }
    if let Some(init) = &decl.initializer {
        write!(f, " = {}", init)?;
    }
    Ok(())
}

fn write_signature(
    f: &mut fmt::Formatter<'_>,
    arguments: &[VariableDeclaration],
    variadic: Option<&VariableDeclaration>,
    is_return_type_ref: bool,
    return_type: Option<&Expr>,
) -> fmt::Result {
    write!(f, "(")?;
    let mut first = true;
    for arg in arguments {
        if !first {
            write!(f, ", ")?;
        }
        first = false;
        write_declaration(f, arg)?;
    }
    if let Some(variadic) = variadic {
        if !first {
            write!(f, ", ")?;
        }
        write!(f, "...")?;
        write_declaration(f, variadic)?;
    }
    write!(f, ")")?;
    if let Some(ret) = return_type {
        write!(f, " -> ")?;
        if is_return_type_ref {
            write!(f, "ref ")?;
        }
        write!(f, "{}", ret)?;
    }
    Ok(())
}

/// Writes an operand of a postfix form (`.`, `!`, call, index, `++`),
/// parenthesizing anything that binds looser than postfix.
fn write_postfix_operand(f: &mut fmt::Formatter<'_>, value: &Expr) -> fmt::Result {
    match value {
        Expr::Ident(_)
        | Expr::Literal(_)
        | Expr::Tuple(_)
        | Expr::Array(_)
        | Expr::Dict(_)
        | Expr::Scope(_)
        | Expr::Templatize(_)
        | Expr::Index(_)
        | Expr::Call(_)
        | Expr::Invalid(_) => write!(f, "{}", value),
        _ => write!(f, "({})", value),
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Invalid(_) => write!(f, "<invalid>"),
            Expr::Ident(node) => write!(f, "{}", node.name),
            Expr::Literal(node) => write!(f, "{}", node.value),
            Expr::Tuple(node) => {
                write!(f, "(")?;
                write_comma_list(f, &node.values)?;
                write!(f, ")")
            }
            Expr::Array(node) => {
                write!(f, "[")?;
                write_comma_list(f, &node.values)?;
                write!(f, "]")
            }
            Expr::Dict(node) => {
                write!(f, "{{")?;
                for (i, (key, value)) in node.keys.iter().zip(&node.values).enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Expr::Scope(node) => {
                write_postfix_operand(f, &node.value)?;
                for name in &node.scope_names {
                    write!(f, ".{}", name)?;
                }
                Ok(())
            }
            Expr::Templatize(node) => {
                write_postfix_operand(f, &node.value)?;
                match node.template_arguments.as_slice() {
                    [Expr::Ident(arg)] => write!(f, "!{}", arg.name),
                    args => {
                        write!(f, "!(")?;
                        write_comma_list(f, args)?;
                        write!(f, ")")
                    }
                }
            }
            Expr::Index(node) => {
                write_postfix_operand(f, &node.indexee)?;
                write!(f, "[")?;
                write_comma_list(f, &node.arguments)?;
                write!(f, "]")
            }
            Expr::Call(node) => {
                write_postfix_operand(f, &node.callee)?;
                write!(f, "(")?;
                write_comma_list(f, &node.arguments)?;
                write!(f, ")")
            }
            Expr::Unary(node) => {
                if node.op.is_postfix() {
                    write!(f, "(")?;
                    write_postfix_operand(f, &node.operand)?;
                    write!(f, "{})", node.op.as_str())
                } else if node.op == UnaryOp::Not {
                    write!(f, "(not {})", node.operand)
                } else {
                    write!(f, "({}{})", node.op.as_str(), node.operand)
                }
            }
            Expr::Binary(node) => {
                write!(f, "({} {} {})", node.left, node.op.as_str(), node.right)
            }
            Expr::Ternary(node) => {
                write!(
                    f,
                    "({} if {} else {})",
                    node.value, node.condition, node.otherwise
                )
            }
            Expr::Comparison(node) => {
                write!(f, "({}", node.operands[0])?;
                for (op, operand) in node.operations.iter().zip(node.operands.iter().skip(1)) {
                    write!(f, " {} {}", op.as_str(), operand)?;
                }
                write!(f, ")")
            }
            Expr::VariableDeclaration(node) => write_declaration(f, node),
            Expr::Lambda(node) => {
                write!(f, "def ")?;
                write_signature(
                    f,
                    &node.arguments,
                    node.variadic_argument.as_deref(),
                    node.is_return_type_ref,
                    node.return_type.as_deref(),
                )?;
                write!(f, " ")?;
                write_block(f, &node.content)
            }
            Expr::FunctionType(node) => {
                write!(f, "def!(")?;
                for (i, (ty, is_ref)) in node
                    .argument_types
                    .iter()
                    .zip(&node.are_arguments_refs)
                    .enumerate()
                {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if *is_ref {
                        write!(f, "ref ")?;
                    }
                    write!(f, "{}", ty)?;
                }
                write!(f, ")")?;
                if let Some(ret) = &node.return_type {
                    write!(f, " -> ")?;
                    if node.is_return_type_ref {
                        write!(f, "ref ")?;
                    }
                    write!(f, "{}", ret)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Literal printing is shared with the token layer so the two
        // stay in sync.
        let token = match self {
            LiteralValue::Byte(v) => Token::Byte(*v),
            LiteralValue::SByte(v) => Token::SByte(*v),
            LiteralValue::Short(v) => Token::Short(*v),
            LiteralValue::UShort(v) => Token::UShort(*v),
            LiteralValue::Integer(v) => Token::Int(*v),
            LiteralValue::UInteger(v) => Token::UInt(*v),
            LiteralValue::Long(v) => Token::Long(*v),
            LiteralValue::ULong(v) => Token::ULong(*v),
            LiteralValue::Float(v) => Token::Float(*v),
            LiteralValue::Double(v) => Token::Double(*v),
            LiteralValue::IFloat(v) => Token::IFloat(*v),
            LiteralValue::IDouble(v) => Token::IDouble(*v),
            LiteralValue::Char(v) => Token::Char(*v),
            LiteralValue::Str(v) => Token::Str(*v),
            LiteralValue::Buffer(v) => Token::Buffer(v.clone()),
        };
        write!(f, "{}", token)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Invalid(_) => write!(f, "<invalid>"),
            Stmt::Import(node) | Stmt::Include(node) => {
                let keyword = if matches!(self, Stmt::Import(_)) {
                    "import"
                } else {
                    "include"
                };
                write!(f, "{} ", keyword)?;
                if node.relative {
                    write!(f, ".")?;
                }
                for (i, part) in node.path.iter().enumerate() {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", part)?;
                }
                if let Some(alias) = node.alias {
                    write!(f, " as {}", alias)?;
                }
                Ok(())
            }
            Stmt::Function(node) => {
                if node.is_incase {
                    write!(f, "incase ")?;
                }
                if node.is_static {
                    write!(f, "static ")?;
                }
                write!(f, "def {}", node.name_point)?;
                write_signature(
                    f,
                    &node.arguments,
                    node.variadic_argument.as_ref(),
                    node.is_return_type_ref,
                    node.return_type.as_deref(),
                )?;
                write!(f, " ")?;
                write_block(f, &node.content)
            }
            Stmt::Class(node) | Stmt::Struct(node) => {
                if node.is_incase {
                    write!(f, "incase ")?;
                }
                let keyword = if matches!(self, Stmt::Class(_)) {
                    "class"
                } else {
                    "struct"
                };
                write!(f, "{} {}", keyword, node.name)?;
                match node.template_arguments.as_slice() {
                    [] => {}
                    [single] => write!(f, "!{}", single)?,
                    many => {
                        write!(f, "!(")?;
                        for (i, arg) in many.iter().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{}", arg)?;
                        }
                        write!(f, ")")?;
                    }
                }
                if let Some(base) = &node.base_type {
                    write!(f, "({})", base)?;
                }
                write!(f, " ")?;
                write_block(f, &node.content)
            }
            Stmt::Enum(node) => {
                write!(f, "enum {} {{ ", node.name)?;
                for (i, member) in node.members.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", member)?;
                }
                write!(f, " }}")
            }
            Stmt::Alias(node) => {
                if node.is_incase {
                    write!(f, "incase ")?;
                }
                write!(f, "alias {} {}", node.name, node.expression)
            }
            Stmt::If(node) => {
                for (i, (cond, content)) in node
                    .branch_conditions
                    .iter()
                    .zip(&node.branch_contents)
                    .enumerate()
                {
                    if i == 0 {
                        write!(f, "if {} ", cond)?;
                    } else {
                        write!(f, " elif {} ", cond)?;
                    }
                    write_block(f, content)?;
                }
                if !node.else_content.is_empty() {
                    write!(f, " else ")?;
                    write_block(f, &node.else_content)?;
                }
                Ok(())
            }
            Stmt::While(node) => {
                write!(f, "while {} ", node.condition)?;
                write_block(f, &node.content)
            }
            Stmt::DoWhile(node) => {
                write!(f, "do ")?;
                write_block(f, &node.content)?;
                write!(f, " while {}", node.condition)
            }
            Stmt::For(node) => {
                write!(
                    f,
                    "for {}, {}, {} ",
                    node.initial_expression, node.loop_condition, node.update_expression
                )?;
                write_block(f, &node.content)
            }
            Stmt::ForEach(node) => {
                write!(f, "for ")?;
                write_comma_list(f, &node.iterators)?;
                write!(f, " in {} ", node.iteratee)?;
                write_block(f, &node.content)
            }
            Stmt::Break(_) => write!(f, "break"),
            Stmt::Continue(_) => write!(f, "continue"),
            Stmt::Return(node) => {
                if node.values.is_empty() {
                    write!(f, "return")
                } else {
                    write!(f, "return ")?;
                    write_comma_list(f, &node.values)
                }
            }
            Stmt::Expr(expr) => write!(f, "{}", expr),
        }
    }
}
