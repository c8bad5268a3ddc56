//! Statement parsing - dispatch, blocks, control flow.

use khc_lex::{Delim, Keyword, Token};
use khc_util::DiagnosticCode;

use crate::ast::*;
use crate::{ExprCtx, Parser};

impl<'a> Parser<'a> {
    /// Parses one statement. Never fails: malformed input yields an
    /// `Invalid` node plus diagnostics, and the cursor always moves.
    pub fn parse_statement(&mut self) -> Stmt {
        self.skip_line_breaks();
        let span = self.current_span();

        if let Token::Keyword(kw) = self.current_token() {
            let kw = *kw;
            match kw {
                Keyword::Import => return self.parse_import(false),
                Keyword::Include => return self.parse_import(true),
                Keyword::Def => {
                    // `def!` in statement position is a bare function
                    // type expression, not a definition.
                    if self.peek_second(false) == &Token::Delim(Delim::Bang) {
                        return self.parse_expression_statement();
                    }
                    return self.parse_function(false, false);
                }
                Keyword::Class => return self.parse_class(false),
                Keyword::Struct => return self.parse_struct(false),
                Keyword::Enum => return self.parse_enum(),
                Keyword::Alias => return self.parse_alias(false),
                Keyword::If => return self.parse_if(),
                Keyword::While => return self.parse_while(),
                Keyword::Do => return self.parse_do_while(),
                Keyword::For => return self.parse_for(),
                Keyword::Return => return self.parse_return(),
                Keyword::Break => {
                    self.bump();
                    self.expect_terminator();
                    return Stmt::Break(span);
                }
                Keyword::Continue => {
                    self.bump();
                    self.expect_terminator();
                    return Stmt::Continue(span);
                }
                Keyword::Incase | Keyword::Static => return self.parse_specified_statement(),
                Keyword::As | Keyword::Elif | Keyword::Else => {
                    self.error(
                        format!("unexpected '{}'", kw.as_str()),
                        DiagnosticCode::E2004,
                        span,
                    );
                    self.bump();
                    return Stmt::Invalid(span);
                }
                // wild/ref start a variable declaration; the remaining
                // keywords fall through and fail in atom position.
                _ => {}
            }
        }

        if matches!(self.current_token(), Token::Eof) {
            self.error("expected a statement", DiagnosticCode::E2001, span);
            return Stmt::Invalid(span);
        }

        self.parse_expression_statement()
    }

    /// An expression in statement position, with its terminator.
    fn parse_expression_statement(&mut self) -> Stmt {
        let expr = self.parse_expression(ExprCtx::value(false));
        self.expect_terminator();
        Stmt::Expr(expr)
    }

    /// Consumes a run of `incase`/`static` specifiers.
    fn parse_specifier_prefix(&mut self) -> (bool, bool) {
        let mut is_incase = false;
        let mut is_static = false;
        loop {
            if self.eat_keyword(Keyword::Incase, false) {
                if is_incase {
                    self.error(
                        "duplicate 'incase' specifier",
                        DiagnosticCode::E2005,
                        self.prev_span(),
                    );
                }
                is_incase = true;
            } else if self.eat_keyword(Keyword::Static, false) {
                if is_static {
                    self.error(
                        "duplicate 'static' specifier",
                        DiagnosticCode::E2005,
                        self.prev_span(),
                    );
                }
                is_static = true;
            } else {
                break;
            }
        }
        (is_incase, is_static)
    }

    /// Reports a disallowed `static` specifier.
    fn deny_static(&self, is_static: bool, what: &str) {
        if is_static {
            self.error(
                format!("'static' is not allowed on a {}", what),
                DiagnosticCode::E2005,
                self.current_span(),
            );
        }
    }

    /// Parses a statement that begins with a specifier prefix. Only a
    /// function, class, struct, alias, or variable declaration may
    /// follow.
    fn parse_specified_statement(&mut self) -> Stmt {
        let start = self.current_span();
        let (is_incase, is_static) = self.parse_specifier_prefix();

        if let Token::Keyword(kw) = self.current_token() {
            match *kw {
                Keyword::Def => return self.parse_function(is_incase, is_static),
                Keyword::Class => {
                    self.deny_static(is_static, "class");
                    return self.parse_class(is_incase);
                }
                Keyword::Struct => {
                    self.deny_static(is_static, "struct");
                    return self.parse_struct(is_incase);
                }
                Keyword::Alias => {
                    self.deny_static(is_static, "alias");
                    return self.parse_alias(is_incase);
                }
                Keyword::Wild | Keyword::Ref => {}
                _ => {}
            }
        }

        match self.current_token() {
            Token::Ident(_) | Token::Keyword(Keyword::Wild) | Token::Keyword(Keyword::Ref) => {
                if is_incase {
                    self.error(
                        "'incase' is not allowed on a variable declaration",
                        DiagnosticCode::E2005,
                        start,
                    );
                }
                let expr = self.parse_variable_declaration(ExprCtx::value(false), is_static);
                self.expect_terminator();
                Stmt::Expr(expr)
            }
            _ => {
                self.error(
                    "expected 'def', 'class', 'struct', 'alias', or a variable declaration after specifiers",
                    DiagnosticCode::E2001,
                    self.current_span(),
                );
                self.recover();
                Stmt::Invalid(start)
            }
        }
    }

    /// Parses a braced statement block. Reaching end of file inside the
    /// block terminates it with a diagnostic.
    pub(crate) fn parse_block(&mut self) -> Vec<Stmt> {
        let mut content = Vec::new();
        if !self.expect_delim(Delim::LBrace, true) {
            return content;
        }
        loop {
            self.skip_line_breaks();
            match self.current_token() {
                Token::Delim(Delim::RBrace) => {
                    self.bump();
                    break;
                }
                Token::Eof => {
                    self.error(
                        "unexpected end of file inside block",
                        DiagnosticCode::E2003,
                        self.current_span(),
                    );
                    break;
                }
                _ => {
                    let before = self.position;
                    content.push(self.parse_statement());
                    if self.position == before {
                        self.recover();
                    }
                }
            }
        }
        content
    }

    /// `if c { } elif c2 { } else { }`
    fn parse_if(&mut self) -> Stmt {
        let start = self.current_span();
        self.bump();

        let mut branch_conditions = Vec::new();
        let mut branch_contents = Vec::new();
        loop {
            branch_conditions.push(self.parse_expression(ExprCtx::value(false)));
            branch_contents.push(self.parse_block());
            if !self.eat_keyword(Keyword::Elif, true) {
                break;
            }
        }

        let else_content = if self.eat_keyword(Keyword::Else, true) {
            self.parse_block()
        } else {
            Vec::new()
        };

        Stmt::If(IfBranch {
            span: start.merge(self.prev_span()),
            branch_conditions,
            branch_contents,
            else_content,
        })
    }

    /// `while c { }`
    fn parse_while(&mut self) -> Stmt {
        let start = self.current_span();
        self.bump();
        let condition = self.parse_expression(ExprCtx::value(false));
        let content = self.parse_block();
        Stmt::While(WhileLoop {
            span: start.merge(self.prev_span()),
            condition: Box::new(condition),
            content,
        })
    }

    /// `do { } while c`
    fn parse_do_while(&mut self) -> Stmt {
        let start = self.current_span();
        self.bump();
        let content = self.parse_block();
        self.expect_keyword(Keyword::While, true);
        let condition = self.parse_expression(ExprCtx::value(false));
        let span = start.merge(self.prev_span());
        self.expect_terminator();
        Stmt::DoWhile(DoWhileLoop {
            span,
            condition: Box::new(condition),
            content,
        })
    }

    /// `for` with a comma-separated head, disambiguated by what follows:
    /// `in` makes it a for-each over the head; otherwise the head must
    /// be exactly `init, cond, update`.
    fn parse_for(&mut self) -> Stmt {
        let start = self.current_span();
        self.bump();

        let mut head = vec![self.parse_expression(ExprCtx::value(false))];
        while self.eat_delim(Delim::Comma, false) {
            head.push(self.parse_expression(ExprCtx::value(false)));
        }

        if self.eat_keyword(Keyword::In, false) {
            let iteratee = self.parse_expression(ExprCtx::value(false));
            let content = self.parse_block();
            return Stmt::ForEach(ForEachLoop {
                span: start.merge(self.prev_span()),
                iterators: head,
                iteratee: Box::new(iteratee),
                content,
            });
        }

        let content = self.parse_block();
        let span = start.merge(self.prev_span());
        if head.len() == 3 {
            let mut head = head.into_iter();
            Stmt::For(ForLoop {
                span,
                initial_expression: Box::new(head.next().unwrap()),
                loop_condition: Box::new(head.next().unwrap()),
                update_expression: Box::new(head.next().unwrap()),
                content,
            })
        } else {
            self.error(
                format!(
                    "for loop header needs 'in' or exactly three expressions, found {}",
                    head.len()
                ),
                DiagnosticCode::E2006,
                span,
            );
            Stmt::Invalid(span)
        }
    }

    /// `return` with an optional comma-separated value list.
    fn parse_return(&mut self) -> Stmt {
        let start = self.current_span();
        self.bump();

        let mut values = Vec::new();
        if !self.at_terminator() {
            values.push(self.parse_expression(ExprCtx::value(false)));
            while self.eat_delim(Delim::Comma, false) {
                values.push(self.parse_expression(ExprCtx::value(false)));
            }
        }

        let span = start.merge(self.prev_span());
        self.expect_terminator();
        Stmt::Return(Return { span, values })
    }
}
