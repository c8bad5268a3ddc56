//! Item parsing - imports, functions, classes, structs, enums, aliases.

use khc_lex::{Delim, Keyword, Token};
use khc_util::DiagnosticCode;

use crate::ast::*;
use crate::{ExprCtx, Parser};

impl<'a> Parser<'a> {
    /// `import a.b.c as z` / `include .a.b`
    ///
    /// A leading `.` marks the path as relative. The `as` alias is
    /// accepted for both keywords; only import gives it meaning.
    pub(crate) fn parse_import(&mut self, include: bool) -> Stmt {
        let start = self.current_span();
        self.bump();

        let relative = self.eat_delim(Delim::Dot, false);
        let mut path = vec![self.expect_ident(false)];
        while self.eat_delim(Delim::Dot, false) {
            path.push(self.expect_ident(false));
        }

        let alias = if self.eat_keyword(Keyword::As, false) {
            Some(self.expect_ident(false))
        } else {
            None
        };

        let span = start.merge(self.prev_span());
        self.expect_terminator();

        let node = Import {
            span,
            path,
            relative,
            alias,
        };
        if include {
            Stmt::Include(node)
        } else {
            Stmt::Import(node)
        }
    }

    /// `def name_point(args) -> ret { body }`
    ///
    /// The name point is a type-filtered expression, so scoped
    /// (`a.b.f`) and templatized (`f!T`) targets parse without
    /// swallowing the argument list.
    pub(crate) fn parse_function(&mut self, is_incase: bool, is_static: bool) -> Stmt {
        let start = self.current_span();
        self.bump();

        let name_point = self.parse_expression(ExprCtx::type_only(false));
        let (arguments, variadic_argument, is_return_type_ref, return_type) =
            self.parse_signature();
        let content = self.parse_block();

        Stmt::Function(Function {
            span: start.merge(self.prev_span()),
            is_incase,
            is_static,
            name_point,
            arguments,
            variadic_argument,
            is_return_type_ref,
            return_type,
            content,
        })
    }

    /// Parses the argument list and return annotation shared by
    /// function definitions and lambdas.
    ///
    /// A `...` prefix marks the variadic tail, which must be last and
    /// unique.
    pub(crate) fn parse_signature(
        &mut self,
    ) -> (
        Vec<VariableDeclaration>,
        Option<VariableDeclaration>,
        bool,
        Option<Box<Expr>>,
    ) {
        let mut arguments = Vec::new();
        let mut variadic: Option<VariableDeclaration> = None;

        if self.expect_delim(Delim::LParen, true) {
            loop {
                if self.eat_delim(Delim::RParen, true) {
                    break;
                }
                if matches!(self.peek(true), Token::Eof) {
                    self.error(
                        "unexpected end of file in argument list",
                        DiagnosticCode::E2003,
                        self.peek_span(true),
                    );
                    break;
                }

                let marker_span = self.peek_span(true);
                let is_variadic = self.eat_delim(Delim::Ellipsis, true);
                let decl = self.parse_argument();

                if is_variadic {
                    if variadic.is_some() {
                        self.error(
                            "only one variadic argument is allowed",
                            DiagnosticCode::E2007,
                            marker_span,
                        );
                    } else {
                        variadic = Some(decl);
                    }
                } else {
                    if variadic.is_some() {
                        self.error(
                            "the variadic argument must be last",
                            DiagnosticCode::E2007,
                            decl.span,
                        );
                    }
                    arguments.push(decl);
                }

                if !self.eat_delim(Delim::Comma, true) {
                    self.expect_delim(Delim::RParen, true);
                    break;
                }
            }
        }

        let (is_return_type_ref, return_type) = self.parse_return_annotation();
        (arguments, variadic, is_return_type_ref, return_type)
    }

    /// One argument: a variable declaration.
    fn parse_argument(&mut self) -> VariableDeclaration {
        match self.parse_variable_declaration(ExprCtx::value(true), false) {
            Expr::VariableDeclaration(decl) => decl,
            _ => unreachable!("declaration parser yields a declaration"),
        }
    }

    /// `class Name!(T, U)(Base) { ... }`
    pub(crate) fn parse_class(&mut self, is_incase: bool) -> Stmt {
        let mut node = self.parse_composite();
        node.is_incase = is_incase;
        Stmt::Class(node)
    }

    /// `struct Name { ... }` - same surface as class.
    pub(crate) fn parse_struct(&mut self, is_incase: bool) -> Stmt {
        let mut node = self.parse_composite();
        node.is_incase = is_incase;
        Stmt::Struct(node)
    }

    /// The shared class/struct body: name, optional `!` template
    /// parameters, optional parenthesized base type, block.
    fn parse_composite(&mut self) -> Composite {
        let start = self.current_span();
        self.bump();

        let name = self.expect_ident(false);

        let mut template_arguments = Vec::new();
        if self.eat_delim(Delim::Bang, false) {
            if self.eat_delim(Delim::LParen, true) {
                loop {
                    if self.eat_delim(Delim::RParen, true) {
                        break;
                    }
                    if matches!(self.peek(true), Token::Eof) {
                        self.error(
                            "unexpected end of file in template parameter list",
                            DiagnosticCode::E2003,
                            self.peek_span(true),
                        );
                        break;
                    }
                    template_arguments.push(self.expect_ident(true));
                    if !self.eat_delim(Delim::Comma, true) {
                        self.expect_delim(Delim::RParen, true);
                        break;
                    }
                }
            } else {
                template_arguments.push(self.expect_ident(false));
            }
        }

        let base_type = if self.eat_delim(Delim::LParen, false) {
            let base = self.parse_expression(ExprCtx::type_only(true));
            self.expect_delim(Delim::RParen, true);
            Some(Box::new(base))
        } else {
            None
        };

        let content = self.parse_block();

        Composite {
            span: start.merge(self.prev_span()),
            is_incase: false,
            name,
            template_arguments,
            base_type,
            content,
        }
    }

    /// `enum Name { a, b, c }` - members are identifiers only.
    pub(crate) fn parse_enum(&mut self) -> Stmt {
        let start = self.current_span();
        self.bump();

        let name = self.expect_ident(false);

        let mut members = Vec::new();
        if self.expect_delim(Delim::LBrace, true) {
            loop {
                if self.eat_delim(Delim::RBrace, true) {
                    break;
                }
                if matches!(self.peek(true), Token::Eof) {
                    self.error(
                        "unexpected end of file in enum body",
                        DiagnosticCode::E2003,
                        self.peek_span(true),
                    );
                    break;
                }
                members.push(self.expect_ident(true));
                if !self.eat_delim(Delim::Comma, true) {
                    self.expect_delim(Delim::RBrace, true);
                    break;
                }
            }
        }

        Stmt::Enum(EnumDecl {
            span: start.merge(self.prev_span()),
            name,
            members,
        })
    }

    /// `alias name expression`
    pub(crate) fn parse_alias(&mut self, is_incase: bool) -> Stmt {
        let start = self.current_span();
        self.bump();

        let name = self.expect_ident(false);
        let expression = self.parse_expression(ExprCtx::value(false));

        let span = start.merge(self.prev_span());
        self.expect_terminator();

        Stmt::Alias(AliasDecl {
            span,
            is_incase,
            name,
            expression: Box::new(expression),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use khc_util::{Handler, Symbol};

    fn parse_clean(source: &str) -> Vec<Stmt> {
        let handler = Handler::new();
        let ast = parse(source, &handler);
        assert!(
            !handler.has_errors(),
            "unexpected diagnostics for {:?}: {:?}",
            source,
            handler.diagnostics()
        );
        ast
    }

    fn parse_one(source: &str) -> Stmt {
        let ast = parse_clean(source);
        assert_eq!(ast.len(), 1, "expected one statement for {:?}", source);
        ast.into_iter().next().unwrap()
    }

    fn sym(name: &str) -> Symbol {
        Symbol::intern(name)
    }

    // ==================== IMPORT / INCLUDE ====================

    #[test]
    fn test_import_path_and_alias() {
        let Stmt::Import(node) = parse_one("import a.b.c as z") else { panic!() };
        assert_eq!(node.path, vec![sym("a"), sym("b"), sym("c")]);
        assert!(!node.relative);
        assert_eq!(node.alias, Some(sym("z")));
    }

    #[test]
    fn test_import_single_segment() {
        let Stmt::Import(node) = parse_one("import net") else { panic!() };
        assert_eq!(node.path, vec![sym("net")]);
        assert_eq!(node.alias, None);
    }

    #[test]
    fn test_include_relative() {
        let Stmt::Include(node) = parse_one("include .util.strings") else { panic!() };
        assert!(node.relative);
        assert_eq!(node.path, vec![sym("util"), sym("strings")]);
    }

    #[test]
    fn test_import_missing_path() {
        let handler = Handler::new();
        let ast = parse("import", &handler);
        assert!(handler.has_errors());
        assert!(matches!(ast[0], Stmt::Import(_)));
    }

    // ==================== FUNCTIONS ====================

    #[test]
    fn test_simple_function() {
        let Stmt::Function(node) = parse_one("def main() { return 0 }") else { panic!() };
        assert!(matches!(node.name_point, Expr::Ident(_)));
        assert!(node.arguments.is_empty());
        assert!(node.variadic_argument.is_none());
        assert!(node.return_type.is_none());
        assert_eq!(node.content.len(), 1);
        assert!(!node.is_incase && !node.is_static);
    }

    #[test]
    fn test_function_arguments_and_return() {
        let Stmt::Function(node) = parse_one("def add(a: int, b: int) -> int { return a + b }")
        else {
            panic!()
        };
        assert_eq!(node.arguments.len(), 2);
        assert_eq!(node.arguments[0].name, sym("a"));
        assert!(matches!(node.return_type.as_deref(), Some(Expr::Ident(_))));
        assert!(!node.is_return_type_ref);
    }

    #[test]
    fn test_function_ref_return() {
        let Stmt::Function(node) = parse_one("def get() -> ref int { }") else { panic!() };
        assert!(node.is_return_type_ref);
    }

    #[test]
    fn test_templated_function_name_point() {
        let Stmt::Function(node) = parse_one("def fib!(T)(n: T) -> T { return n }") else {
            panic!()
        };
        assert!(matches!(node.name_point, Expr::Templatize(_)));
        assert_eq!(node.arguments.len(), 1);
        assert_eq!(node.arguments[0].name, sym("n"));
    }

    #[test]
    fn test_scoped_function_name_point() {
        let Stmt::Function(node) = parse_one("def List.push(item: int) { }") else {
            panic!()
        };
        assert!(matches!(node.name_point, Expr::Scope(_)));
    }

    #[test]
    fn test_variadic_argument() {
        let Stmt::Function(node) = parse_one("def log(level: int, ...rest: str) { }") else {
            panic!()
        };
        assert_eq!(node.arguments.len(), 1);
        let variadic = node.variadic_argument.expect("variadic");
        assert_eq!(variadic.name, sym("rest"));
    }

    #[test]
    fn test_variadic_must_be_last() {
        let handler = Handler::new();
        parse("def f(...rest: str, a: int) { }", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_variadic_must_be_unique() {
        let handler = Handler::new();
        parse("def f(...a: str, ...b: str) { }", &handler);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_ref_argument() {
        let Stmt::Function(node) = parse_one("def swap(ref a: int, ref b: int) { }") else {
            panic!()
        };
        assert!(node.arguments.iter().all(|a| a.is_ref));
    }

    #[test]
    fn test_specified_function() {
        let Stmt::Function(node) = parse_one("incase static def helper() { }") else {
            panic!()
        };
        assert!(node.is_incase);
        assert!(node.is_static);
    }

    // ==================== CLASS / STRUCT ====================

    #[test]
    fn test_class_plain() {
        let Stmt::Class(node) = parse_one("class Point { x: int\ny: int }") else {
            panic!()
        };
        assert_eq!(node.name, sym("Point"));
        assert!(node.template_arguments.is_empty());
        assert!(node.base_type.is_none());
        assert_eq!(node.content.len(), 2);
    }

    #[test]
    fn test_class_single_template_parameter() {
        let Stmt::Class(node) = parse_one("class Box!T { value: T }") else { panic!() };
        assert_eq!(node.template_arguments, vec![sym("T")]);
    }

    #[test]
    fn test_class_template_list_and_base() {
        let Stmt::Class(node) = parse_one("class Map!(K, V)(Container) { }") else {
            panic!()
        };
        assert_eq!(node.template_arguments, vec![sym("K"), sym("V")]);
        assert!(matches!(node.base_type.as_deref(), Some(Expr::Ident(_))));
    }

    #[test]
    fn test_struct() {
        let Stmt::Struct(node) = parse_one("struct Pair { a: int\nb: int }") else {
            panic!()
        };
        assert_eq!(node.name, sym("Pair"));
        assert_eq!(node.content.len(), 2);
    }

    #[test]
    fn test_incase_class() {
        let Stmt::Class(node) = parse_one("incase class Hidden { }") else { panic!() };
        assert!(node.is_incase);
    }

    #[test]
    fn test_static_class_is_diagnosed() {
        let handler = Handler::new();
        let ast = parse("static class C { }", &handler);
        assert!(handler.has_errors());
        assert!(matches!(ast[0], Stmt::Class(_)));
    }

    #[test]
    fn test_class_with_method() {
        let source = "class Greeter { def hello() { return 1 } }";
        let Stmt::Class(node) = parse_one(source) else { panic!() };
        assert!(matches!(node.content[0], Stmt::Function(_)));
    }

    // ==================== ENUM ====================

    #[test]
    fn test_enum() {
        let Stmt::Enum(node) = parse_one("enum Color { red, green, blue }") else {
            panic!()
        };
        assert_eq!(node.name, sym("Color"));
        assert_eq!(node.members, vec![sym("red"), sym("green"), sym("blue")]);
    }

    #[test]
    fn test_enum_trailing_comma() {
        let Stmt::Enum(node) = parse_one("enum E { a, b, }") else { panic!() };
        assert_eq!(node.members.len(), 2);
    }

    #[test]
    fn test_enum_multiline() {
        let Stmt::Enum(node) = parse_one("enum E {\n    a,\n    b,\n}") else { panic!() };
        assert_eq!(node.members.len(), 2);
    }

    #[test]
    fn test_empty_enum() {
        let Stmt::Enum(node) = parse_one("enum Never { }") else { panic!() };
        assert!(node.members.is_empty());
    }

    // ==================== ALIAS ====================

    #[test]
    fn test_alias() {
        let Stmt::Alias(node) = parse_one("alias Ints array!int") else { panic!() };
        assert_eq!(node.name, sym("Ints"));
        assert!(matches!(*node.expression, Expr::Templatize(_)));
        assert!(!node.is_incase);
    }

    #[test]
    fn test_incase_alias() {
        let Stmt::Alias(node) = parse_one("incase alias Old New") else { panic!() };
        assert!(node.is_incase);
    }
}
