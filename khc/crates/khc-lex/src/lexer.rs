//! The Kithare scanner.
//!
//! Transforms source text into a stream of [`Token`]s. One call to
//! [`Lexer::next_token`] consumes inter-token whitespace and produces
//! exactly one token. A bare `\n` is a token of its own ([`Token::Newline`])
//! because the parser uses it as a statement terminator; `#` comments are
//! emitted as [`Token::Comment`] and swallow their terminating newline.
//!
//! The scanner never fails: malformed input produces a diagnostic in the
//! shared [`Handler`] plus a best-effort token, and always advances.

use khc_util::{Diagnostic, DiagnosticCode, Handler, Span, Symbol};

use crate::cursor::Cursor;
use crate::token::{keyword_from_word, Delim, Op, Token, TokenWithSpan};

/// Returns the numeric value of `c` as a digit in `base`, if it is one.
#[inline]
fn digit_value(c: char, base: u32) -> Option<u32> {
    c.to_digit(base)
}

/// The scanner.
///
/// Holds the cursor (its sole mutable state) and a reference to the
/// diagnostic sink.
///
/// # Example
///
/// ```
/// use khc_lex::{Lexer, Token};
/// use khc_util::Handler;
///
/// let handler = Handler::new();
/// let mut lexer = Lexer::new("x: int", &handler);
/// assert!(matches!(lexer.next_token(), Token::Ident(_)));
/// ```
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Diagnostic sink.
    handler: &'a Handler,

    /// Start byte offset of the current token.
    token_start: usize,

    /// Start line of the current token.
    token_start_line: u32,

    /// Start column of the current token.
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer over `source`, reporting into `handler`.
    pub fn new(source: &'a str, handler: &'a Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token, advancing the cursor past it.
    ///
    /// Guarantees forward progress: when no recognizable token is
    /// present, the offending code point is consumed, a diagnostic is
    /// recorded, and scanning continues.
    pub fn next_token(&mut self) -> Token {
        loop {
            // Inter-token whitespace, excluding '\n' which is a token.
            self.cursor
                .eat_while(|c| c.is_whitespace() && c != '\n');

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();

            if self.cursor.is_at_end() {
                return Token::Eof;
            }

            match self.cursor.current_char() {
                '\n' => {
                    self.cursor.advance();
                    return Token::Newline;
                }
                '#' => return self.lex_comment(),

                // Single-character delimiters
                '(' => return self.single(Delim::LParen),
                ')' => return self.single(Delim::RParen),
                '{' => return self.single(Delim::LBrace),
                '}' => return self.single(Delim::RBrace),
                '[' => return self.single(Delim::LBracket),
                ']' => return self.single(Delim::RBracket),
                ',' => return self.single(Delim::Comma),
                ';' => return self.single(Delim::Semicolon),
                ':' => return self.single(Delim::Colon),
                '@' => return self.single(Delim::At),

                // Multi-character operators
                '+' => return self.lex_plus(),
                '-' => return self.lex_minus(),
                '*' => return self.lex_star(),
                '/' => return self.lex_slash(),
                '%' => return self.lex_percent(),
                '^' => return self.lex_caret(),
                '=' => return self.lex_equals(),
                '!' => return self.lex_bang(),
                '<' => return self.lex_less(),
                '>' => return self.lex_greater(),
                '&' => return self.lex_ampersand(),
                '|' => return self.lex_pipe(),
                '~' => return self.lex_tilde(),
                '.' => return self.lex_dot(),

                // Quoted literals
                '"' => return self.lex_string(false),
                '\'' => return self.lex_char(false),

                // A lone 'b'/'B' in front of a quote introduces a byte
                // character or byte buffer literal, not an identifier.
                'b' | 'B' if self.cursor.peek_char(1) == '"' => {
                    self.cursor.advance();
                    return self.lex_string(true);
                }
                'b' | 'B' if self.cursor.peek_char(1) == '\'' => {
                    self.cursor.advance();
                    return self.lex_char(true);
                }

                c if c.is_alphabetic() => return self.lex_word(),
                c if c.is_ascii_digit() => return self.lex_number(),

                c => {
                    self.report_error(
                        format!("unexpected character '{}'", c),
                        DiagnosticCode::E1001,
                    );
                    self.cursor.advance();
                }
            }
        }
    }

    /// The span of the most recently returned token.
    pub fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Consume one character and return a delimiter token.
    fn single(&mut self, delim: Delim) -> Token {
        self.cursor.advance();
        Token::Delim(delim)
    }

    // =========================================================================
    // WORDS
    // =========================================================================

    /// Lexes a run of alphanumerics starting with a letter, then resolves
    /// it against the keyword and word-operator tables.
    fn lex_word(&mut self) -> Token {
        self.cursor.eat_while(|c| c.is_alphanumeric());
        let text = self.cursor.slice_from(self.token_start);
        keyword_from_word(text).unwrap_or_else(|| Token::Ident(Symbol::intern(text)))
    }

    // =========================================================================
    // NUMBERS
    // =========================================================================

    /// Lexes a numeric literal.
    ///
    /// Integers accumulate into a `u64`; a `.`, an exponent marker, or
    /// accumulator overflow rewinds to the start of the digits and
    /// re-lexes the literal as floating-point.
    fn lex_number(&mut self) -> Token {
        let mut base: u32 = 10;
        if self.cursor.current_char() == '0' {
            match self.cursor.peek_char(1) {
                'b' | 'B' => {
                    self.cursor.advance_n(2);
                    base = 2;
                }
                'o' | 'O' => {
                    self.cursor.advance_n(2);
                    base = 8;
                }
                'x' | 'X' => {
                    self.cursor.advance_n(2);
                    base = 16;
                }
                _ => {}
            }
        }

        let digits_mark = self.cursor.snapshot();
        let mut value: u64 = 0;
        let mut overflowed = false;
        let mut digit_count = 0usize;
        while let Some(d) = digit_value(self.cursor.current_char(), base) {
            digit_count += 1;
            match value
                .checked_mul(base as u64)
                .and_then(|v| v.checked_add(d as u64))
            {
                Some(v) => value = v,
                None => overflowed = true,
            }
            self.cursor.advance();
        }

        let c = self.cursor.current_char();
        let float_trigger = c == '.' || c == 'e' || c == 'E' || c == 'p' || c == 'P' || overflowed;
        if float_trigger {
            self.cursor.restore(digits_mark);
            return self.lex_float(base);
        }

        if digit_count == 0 {
            self.report_error(
                format!("no digits after base-{} prefix", base),
                DiagnosticCode::E1006,
            );
            return Token::Int(0);
        }

        let suffix_start = self.cursor.position();
        self.cursor.eat_while(|c| c.is_ascii_alphanumeric());
        let suffix = self.cursor.slice_from(suffix_start).to_ascii_lowercase();
        self.integer_for_suffix(value, &suffix)
    }

    /// Applies the integer suffix table and range-checks the value.
    fn integer_for_suffix(&mut self, value: u64, suffix: &str) -> Token {
        match suffix {
            "" => Token::Int(self.ranged(value, i32::MAX as u64) as i32),
            "b" | "ub" => Token::Byte(self.ranged(value, u8::MAX as u64) as u8),
            "sb" => Token::SByte(self.ranged(value, i8::MAX as u64) as i8),
            "s" => Token::Short(self.ranged(value, i16::MAX as u64) as i16),
            "us" => Token::UShort(self.ranged(value, u16::MAX as u64) as u16),
            "u" => Token::UInt(self.ranged(value, u32::MAX as u64) as u32),
            "l" | "sl" => Token::Long(self.ranged(value, i64::MAX as u64) as i64),
            "ul" => Token::ULong(value),
            "f" => Token::Float(value as f32),
            "d" => Token::Double(value as f64),
            "if" => Token::IFloat(value as f32),
            "id" | "i" => Token::IDouble(value as f64),
            _ if suffix.starts_with(|c: char| c.is_ascii_digit()) => {
                self.report_error(
                    format!("invalid digit in numeric literal: '{}'", suffix),
                    DiagnosticCode::E1006,
                );
                Token::Int(self.ranged(value, i32::MAX as u64) as i32)
            }
            _ => {
                self.report_error(
                    format!("unknown numeric suffix '{}'", suffix),
                    DiagnosticCode::E1008,
                );
                Token::Int(self.ranged(value, i32::MAX as u64) as i32)
            }
        }
    }

    /// Clamps `value` to `max`, reporting overflow.
    fn ranged(&mut self, value: u64, max: u64) -> u64 {
        if value > max {
            self.report_error(
                format!("integer literal overflows its type (max {})", max),
                DiagnosticCode::E1005,
            );
            max
        } else {
            value
        }
    }

    /// Lexes a floating-point literal. The cursor stands at the first
    /// digit (any base prefix has already been consumed).
    ///
    /// Fraction digits use the literal's base; an `e`/`E` exponent scales
    /// by powers of ten, `p`/`P` by powers of two. Exponent overflow
    /// saturates to infinity or zero.
    fn lex_float(&mut self, base: u32) -> Token {
        let fbase = base as f64;
        let mut value = 0f64;

        while let Some(d) = digit_value(self.cursor.current_char(), base) {
            value = value * fbase + d as f64;
            self.cursor.advance();
        }

        if self.cursor.current_char() == '.' {
            self.cursor.advance();
            let mut scale = 1f64;
            while let Some(d) = digit_value(self.cursor.current_char(), base) {
                scale /= fbase;
                value += d as f64 * scale;
                self.cursor.advance();
            }
        }

        let c = self.cursor.current_char();
        if c == 'e' || c == 'E' || c == 'p' || c == 'P' {
            let exp_base: f64 = if c == 'p' || c == 'P' { 2.0 } else { 10.0 };
            self.cursor.advance();

            let negative = if self.cursor.current_char() == '-' {
                self.cursor.advance();
                true
            } else {
                self.cursor.match_char('+');
                false
            };

            let mut exp: i32 = 0;
            let mut exp_digits = 0usize;
            while let Some(d) = digit_value(self.cursor.current_char(), 10) {
                exp = exp.saturating_mul(10).saturating_add(d as i32);
                exp_digits += 1;
                self.cursor.advance();
            }
            if exp_digits == 0 {
                self.report_error("no digits in float exponent", DiagnosticCode::E1006);
            }

            let exp = if negative { -exp } else { exp };
            value *= exp_base.powi(exp);
        }

        let suffix_start = self.cursor.position();
        self.cursor.eat_while(|c| c.is_ascii_alphanumeric());
        let suffix = self.cursor.slice_from(suffix_start).to_ascii_lowercase();
        match suffix.as_str() {
            "" | "d" => Token::Double(value),
            "f" => Token::Float(value as f32),
            "if" => Token::IFloat(value as f32),
            "id" | "i" => Token::IDouble(value),
            _ => {
                self.report_error(
                    format!("unknown numeric suffix '{}'", suffix),
                    DiagnosticCode::E1008,
                );
                Token::Double(value)
            }
        }
    }

    // =========================================================================
    // QUOTED LITERALS
    // =========================================================================

    /// Lexes a character literal (`'a'`) or byte character (`b'a'`).
    fn lex_char(&mut self, byte_literal: bool) -> Token {
        self.cursor.advance(); // opening quote

        let synth = |cp: u32| {
            if byte_literal {
                Token::Byte(cp as u8)
            } else {
                Token::Char(char::from_u32(cp).unwrap_or('\u{FFFD}'))
            }
        };

        if self.cursor.is_at_end() {
            self.report_error("unterminated character literal", DiagnosticCode::E1003);
            return synth(0);
        }

        let cp = match self.cursor.current_char() {
            '\\' => {
                self.cursor.advance();
                self.lex_escape(byte_literal).unwrap_or(0)
            }
            '\'' => {
                self.cursor.advance();
                self.report_error("empty character literal", DiagnosticCode::E1003);
                return synth(0);
            }
            '\n' => {
                self.report_error("unterminated character literal", DiagnosticCode::E1003);
                return synth(0);
            }
            c => {
                self.cursor.advance();
                c as u32
            }
        };

        if self.cursor.current_char() == '\'' {
            self.cursor.advance();
        } else {
            self.report_error("unterminated character literal", DiagnosticCode::E1003);
            self.cursor.eat_while(|c| c != '\'' && c != '\n');
            self.cursor.match_char('\'');
        }

        if byte_literal && cp > 0xff {
            self.report_error(
                "byte character literal out of range (max 255)",
                DiagnosticCode::E1007,
            );
            return Token::Byte(0);
        }

        synth(cp)
    }

    /// Lexes a string (`"..."`, `"""..."""`) or byte buffer (`b"..."`)
    /// literal.
    ///
    /// Unclosed literals record a diagnostic and keep whatever content
    /// was accumulated.
    fn lex_string(&mut self, byte_literal: bool) -> Token {
        self.cursor.advance(); // opening quote

        let multiline =
            self.cursor.current_char() == '"' && self.cursor.peek_char(1) == '"';
        if multiline {
            self.cursor.advance_n(2);
        }

        let mut text = String::new();
        let mut bytes: Vec<u8> = Vec::new();
        let mut push = |lexer: &mut Self, cp: u32| {
            if byte_literal {
                if cp > 0xff {
                    lexer.report_error(
                        "buffer element out of range (max 255)",
                        DiagnosticCode::E1007,
                    );
                } else {
                    bytes.push(cp as u8);
                }
            } else if let Some(c) = char::from_u32(cp) {
                text.push(c);
            }
        };

        loop {
            if self.cursor.is_at_end() {
                self.report_error("unterminated string literal", DiagnosticCode::E1002);
                break;
            }

            let c = self.cursor.current_char();

            if !multiline && c == '\n' {
                self.report_error("unterminated string literal", DiagnosticCode::E1002);
                break;
            }

            if c == '"' {
                if multiline {
                    if self.cursor.peek_char(1) == '"' && self.cursor.peek_char(2) == '"' {
                        self.cursor.advance_n(3);
                        break;
                    }
                    self.cursor.advance();
                    push(self, '"' as u32);
                } else {
                    self.cursor.advance();
                    break;
                }
                continue;
            }

            if c == '\\' {
                self.cursor.advance();
                if let Some(cp) = self.lex_escape(byte_literal) {
                    push(self, cp);
                }
                continue;
            }

            self.cursor.advance();
            push(self, c as u32);
        }

        if byte_literal {
            Token::Buffer(bytes)
        } else {
            Token::Str(Symbol::intern(&text))
        }
    }

    /// Decodes one escape sequence; the cursor stands just past the `\`.
    ///
    /// Byte contexts reject `\u` and `\U`. Returns the decoded code
    /// point, or `None` when the escape was invalid (a diagnostic has
    /// been recorded and the sequence consumed).
    fn lex_escape(&mut self, byte_context: bool) -> Option<u32> {
        if self.cursor.is_at_end() {
            self.report_error("unterminated escape sequence", DiagnosticCode::E1004);
            return None;
        }

        let c = self.cursor.current_char();
        self.cursor.advance();

        match c {
            '0' => Some(0x00),
            'n' => Some(0x0a),
            'r' => Some(0x0d),
            't' => Some(0x09),
            'v' => Some(0x0b),
            'b' => Some(0x08),
            'a' => Some(0x07),
            'f' => Some(0x0c),
            '\\' => Some('\\' as u32),
            '\'' => Some('\'' as u32),
            '"' => Some('"' as u32),
            'x' => self.read_hex_digits(2),
            'u' | 'U' => {
                let count = if c == 'u' { 4 } else { 8 };
                let cp = self.read_hex_digits(count);
                if byte_context {
                    self.report_error(
                        format!("'\\{}' escape not allowed in byte literal", c),
                        DiagnosticCode::E1007,
                    );
                    return None;
                }
                match cp {
                    Some(value) if char::from_u32(value).is_some() => Some(value),
                    Some(value) => {
                        self.report_error(
                            format!("invalid unicode code point U+{:04X}", value),
                            DiagnosticCode::E1004,
                        );
                        None
                    }
                    None => None,
                }
            }
            _ => {
                self.report_error(
                    format!("unknown escape sequence '\\{}'", c),
                    DiagnosticCode::E1004,
                );
                Some(c as u32)
            }
        }
    }

    /// Reads exactly `count` hex digits into a value.
    fn read_hex_digits(&mut self, count: usize) -> Option<u32> {
        let mut value: u32 = 0;
        for _ in 0..count {
            match digit_value(self.cursor.current_char(), 16) {
                Some(d) => {
                    value = value.wrapping_mul(16).wrapping_add(d);
                    self.cursor.advance();
                }
                None => {
                    self.report_error(
                        format!("expected {} hex digits in escape sequence", count),
                        DiagnosticCode::E1004,
                    );
                    return None;
                }
            }
        }
        Some(value)
    }

    // =========================================================================
    // COMMENTS
    // =========================================================================

    /// Lexes a `#` comment, consuming up to and including the newline.
    fn lex_comment(&mut self) -> Token {
        self.cursor.eat_while(|c| c != '\n');
        if !self.cursor.is_at_end() {
            self.cursor.advance();
        }
        Token::Comment
    }

    // =========================================================================
    // SYMBOLS (maximal munch)
    // =========================================================================

    /// `+`, `+=`, `++`
    fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Op(Op::PlusEq)
        } else if self.cursor.match_char('+') {
            Token::Op(Op::PlusPlus)
        } else {
            Token::Op(Op::Plus)
        }
    }

    /// `-`, `->`, `-=`, `--`
    fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            Token::Delim(Delim::Arrow)
        } else if self.cursor.match_char('=') {
            Token::Op(Op::MinusEq)
        } else if self.cursor.match_char('-') {
            Token::Op(Op::MinusMinus)
        } else {
            Token::Op(Op::Minus)
        }
    }

    /// `*`, `**`, `*=`
    fn lex_star(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('*') {
            Token::Op(Op::StarStar)
        } else if self.cursor.match_char('=') {
            Token::Op(Op::StarEq)
        } else {
            Token::Op(Op::Star)
        }
    }

    /// `/`, `/=`
    fn lex_slash(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Op(Op::SlashEq)
        } else {
            Token::Op(Op::Slash)
        }
    }

    /// `%`, `%=`
    fn lex_percent(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Op(Op::PercentEq)
        } else {
            Token::Op(Op::Percent)
        }
    }

    /// `^`, `^=`
    fn lex_caret(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Op(Op::CaretEq)
        } else {
            Token::Op(Op::Caret)
        }
    }

    /// `=`, `==`
    fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Op(Op::EqEq)
        } else {
            Token::Op(Op::Eq)
        }
    }

    /// `!`, `!=`
    fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Op(Op::NotEq)
        } else {
            Token::Delim(Delim::Bang)
        }
    }

    /// `<`, `<=`, `<<`, `<<=`
    fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                Token::Op(Op::ShlEq)
            } else {
                Token::Op(Op::Shl)
            }
        } else if self.cursor.match_char('=') {
            Token::Op(Op::LtEq)
        } else {
            Token::Op(Op::Lt)
        }
    }

    /// `>`, `>=`, `>>`, `>>=`
    fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('>') {
            if self.cursor.match_char('=') {
                Token::Op(Op::ShrEq)
            } else {
                Token::Op(Op::Shr)
            }
        } else if self.cursor.match_char('=') {
            Token::Op(Op::GtEq)
        } else {
            Token::Op(Op::Gt)
        }
    }

    /// `&`, `&=`
    fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Op(Op::AmpersandEq)
        } else {
            Token::Op(Op::Ampersand)
        }
    }

    /// `|`, `|=`
    fn lex_pipe(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Op(Op::PipeEq)
        } else {
            Token::Op(Op::Pipe)
        }
    }

    /// `~`, `~=`
    fn lex_tilde(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            Token::Op(Op::TildeEq)
        } else {
            Token::Op(Op::Tilde)
        }
    }

    /// `.`, `...`, `.=`
    fn lex_dot(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1) == '.' {
            self.cursor.advance_n(2);
            Token::Delim(Delim::Ellipsis)
        } else if self.cursor.match_char('=') {
            Token::Op(Op::DotEq)
        } else {
            Token::Delim(Delim::Dot)
        }
    }

    /// Records a lexer diagnostic spanning the current token.
    fn report_error(&self, message: impl Into<String>, code: DiagnosticCode) {
        self.handler
            .emit(Diagnostic::lexer_error(message, self.token_span()).with_code(code));
    }
}

/// Lexer is an iterator over tokens, ending before `Eof`.
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token::Eof => None,
            token => Some(token),
        }
    }
}

/// Tokenizes an entire source string.
///
/// The returned stream always ends with an `Eof` token.
///
/// # Example
///
/// ```
/// use khc_lex::{tokenize, Token};
/// use khc_util::Handler;
///
/// let handler = Handler::new();
/// let tokens = tokenize("x + 1", &handler);
/// assert_eq!(tokens.len(), 4); // x, +, 1, <eof>
/// assert!(!handler.has_errors());
/// ```
pub fn tokenize(source: &str, handler: &Handler) -> Vec<TokenWithSpan> {
    let mut lexer = Lexer::new(source, handler);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let span = lexer.token_span();
        let done = token == Token::Eof;
        tokens.push(TokenWithSpan::new(token, span));
        if done {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Keyword;

    fn lex_tokens(source: &str) -> Vec<Token> {
        let handler = Handler::new();
        let tokens: Vec<Token> = Lexer::new(source, &handler).collect();
        assert!(
            !handler.has_errors(),
            "unexpected diagnostics for {:?}: {:?}",
            source,
            handler.diagnostics()
        );
        tokens
    }

    fn lex_with_errors(source: &str) -> (Vec<Token>, Handler) {
        let handler = Handler::new();
        let tokens: Vec<Token> = Lexer::new(source, &handler).collect();
        (tokens, handler)
    }

    fn first_token(source: &str) -> Token {
        lex_tokens(source).into_iter().next().expect("no token")
    }

    fn ident(name: &str) -> Token {
        Token::Ident(Symbol::intern(name))
    }

    // ==================== WORDS ====================

    #[test]
    fn test_simple_identifier() {
        assert_eq!(first_token("counter"), ident("counter"));
    }

    #[test]
    fn test_identifier_with_digits() {
        assert_eq!(first_token("v2"), ident("v2"));
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(first_token("variável"), ident("variável"));
    }

    #[test]
    fn test_keywords() {
        assert_eq!(first_token("def"), Token::Keyword(Keyword::Def));
        assert_eq!(first_token("class"), Token::Keyword(Keyword::Class));
        assert_eq!(first_token("incase"), Token::Keyword(Keyword::Incase));
        assert_eq!(first_token("wild"), Token::Keyword(Keyword::Wild));
        assert_eq!(first_token("elif"), Token::Keyword(Keyword::Elif));
        assert_eq!(first_token("do"), Token::Keyword(Keyword::Do));
    }

    #[test]
    fn test_word_operators() {
        assert_eq!(
            lex_tokens("a and b or c xor not d"),
            vec![
                ident("a"),
                Token::Op(Op::And),
                ident("b"),
                Token::Op(Op::Or),
                ident("c"),
                Token::Op(Op::Xor),
                Token::Op(Op::Not),
                ident("d"),
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(first_token("definition"), ident("definition"));
        assert_eq!(first_token("classes"), ident("classes"));
        assert_eq!(first_token("android"), ident("android"));
    }

    #[test]
    fn test_b_identifier_not_byte_literal() {
        assert_eq!(first_token("b"), ident("b"));
        assert_eq!(first_token("banana"), ident("banana"));
    }

    // ==================== INTEGERS ====================

    #[test]
    fn test_decimal_integers() {
        assert_eq!(first_token("0"), Token::Int(0));
        assert_eq!(first_token("42"), Token::Int(42));
        assert_eq!(first_token("2147483647"), Token::Int(i32::MAX));
    }

    #[test]
    fn test_hexadecimal_integers() {
        assert_eq!(first_token("0xFF"), Token::Int(255));
        assert_eq!(first_token("0Xff"), Token::Int(255));
        assert_eq!(first_token("0x10"), Token::Int(16));
    }

    #[test]
    fn test_binary_integers() {
        assert_eq!(first_token("0b101"), Token::Int(5));
        assert_eq!(first_token("0B1111"), Token::Int(15));
    }

    #[test]
    fn test_octal_integers() {
        assert_eq!(first_token("0o777"), Token::Int(511));
        assert_eq!(first_token("0O10"), Token::Int(8));
    }

    #[test]
    fn test_integer_suffixes() {
        assert_eq!(first_token("7b"), Token::Byte(7));
        assert_eq!(first_token("7ub"), Token::Byte(7));
        assert_eq!(first_token("7sb"), Token::SByte(7));
        assert_eq!(first_token("7s"), Token::Short(7));
        assert_eq!(first_token("7us"), Token::UShort(7));
        assert_eq!(first_token("7u"), Token::UInt(7));
        assert_eq!(first_token("7l"), Token::Long(7));
        assert_eq!(first_token("7sl"), Token::Long(7));
        assert_eq!(first_token("7ul"), Token::ULong(7));
    }

    #[test]
    fn test_integer_suffixes_uppercase() {
        assert_eq!(first_token("7B"), Token::Byte(7));
        assert_eq!(first_token("7SB"), Token::SByte(7));
        assert_eq!(first_token("7US"), Token::UShort(7));
        assert_eq!(first_token("7UL"), Token::ULong(7));
    }

    #[test]
    fn test_integer_float_suffixes() {
        assert_eq!(first_token("3f"), Token::Float(3.0));
        assert_eq!(first_token("3d"), Token::Double(3.0));
        assert_eq!(first_token("3if"), Token::IFloat(3.0));
        assert_eq!(first_token("3id"), Token::IDouble(3.0));
        assert_eq!(first_token("3i"), Token::IDouble(3.0));
    }

    #[test]
    fn test_hex_with_suffix() {
        assert_eq!(first_token("0xffus"), Token::UShort(255));
    }

    #[test]
    fn test_suffix_out_of_range() {
        let (tokens, handler) = lex_with_errors("300b");
        assert_eq!(tokens, vec![Token::Byte(255)]);
        assert_eq!(handler.error_count(), 1);
        assert_eq!(
            handler.diagnostics()[0].code,
            Some(DiagnosticCode::E1005)
        );
    }

    #[test]
    fn test_bare_int_out_of_range() {
        let (tokens, handler) = lex_with_errors("3000000000");
        assert_eq!(tokens, vec![Token::Int(i32::MAX)]);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_unknown_suffix() {
        let (tokens, handler) = lex_with_errors("12zz");
        assert_eq!(tokens, vec![Token::Int(12)]);
        assert_eq!(
            handler.diagnostics()[0].code,
            Some(DiagnosticCode::E1008)
        );
    }

    #[test]
    fn test_no_digits_after_prefix() {
        let (tokens, handler) = lex_with_errors("0x");
        assert_eq!(tokens, vec![Token::Int(0)]);
        assert_eq!(
            handler.diagnostics()[0].code,
            Some(DiagnosticCode::E1006)
        );
    }

    #[test]
    fn test_invalid_binary_digit() {
        let (tokens, handler) = lex_with_errors("0b102");
        assert_eq!(tokens, vec![Token::Int(2)]);
        assert!(handler.has_errors());
    }

    // ==================== FLOATS ====================

    #[test]
    fn test_simple_floats() {
        assert_eq!(first_token("3.5"), Token::Double(3.5));
        assert_eq!(first_token("0.25"), Token::Double(0.25));
    }

    #[test]
    fn test_float_suffixes() {
        assert_eq!(first_token("3.5f"), Token::Float(3.5));
        assert_eq!(first_token("3.5d"), Token::Double(3.5));
        assert_eq!(first_token("3.5if"), Token::IFloat(3.5));
        assert_eq!(first_token("3.5id"), Token::IDouble(3.5));
        assert_eq!(first_token("3.5i"), Token::IDouble(3.5));
    }

    #[test]
    fn test_float_decimal_exponent() {
        assert_eq!(first_token("1e3"), Token::Double(1000.0));
        assert_eq!(first_token("1.5e2"), Token::Double(150.0));
        assert_eq!(first_token("25e-2"), Token::Double(0.25));
        assert_eq!(first_token("1E+2"), Token::Double(100.0));
    }

    #[test]
    fn test_float_binary_exponent() {
        assert_eq!(first_token("1p3"), Token::Double(8.0));
        assert_eq!(first_token("1.5p1"), Token::Double(3.0));
        assert_eq!(first_token("8p-3"), Token::Double(1.0));
    }

    #[test]
    fn test_hex_float() {
        // 0x1.8 = 1.5, scaled by 2^1.
        assert_eq!(first_token("0x1.8p1"), Token::Double(3.0));
    }

    #[test]
    fn test_binary_float_fraction() {
        // 0b1.1 = 1.5 in base 2.
        assert_eq!(first_token("0b1.1"), Token::Double(1.5));
    }

    #[test]
    fn test_exponent_saturation() {
        assert_eq!(first_token("1e999999999"), Token::Double(f64::INFINITY));
        assert_eq!(first_token("1e-999999999"), Token::Double(0.0));
    }

    #[test]
    fn test_integer_overflow_relexes_as_double() {
        // Does not fit u64, so the literal is re-lexed as floating-point.
        let tokens = lex_tokens("18446744073709551616");
        assert_eq!(tokens, vec![Token::Double(18446744073709551616.0)]);
    }

    #[test]
    fn test_exponent_missing_digits() {
        let (tokens, handler) = lex_with_errors("1e");
        assert_eq!(tokens, vec![Token::Double(1.0)]);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_trailing_dot() {
        assert_eq!(first_token("2."), Token::Double(2.0));
    }

    // ==================== CHARS, STRINGS, BUFFERS ====================

    #[test]
    fn test_simple_char() {
        assert_eq!(first_token("'a'"), Token::Char('a'));
        assert_eq!(first_token("'£'"), Token::Char('£'));
    }

    #[test]
    fn test_char_escapes() {
        assert_eq!(first_token("'\\n'"), Token::Char('\n'));
        assert_eq!(first_token("'\\t'"), Token::Char('\t'));
        assert_eq!(first_token("'\\''"), Token::Char('\''));
        assert_eq!(first_token("'\\\\'"), Token::Char('\\'));
        assert_eq!(first_token("'\\0'"), Token::Char('\0'));
        assert_eq!(first_token("'\\a'"), Token::Char('\x07'));
        assert_eq!(first_token("'\\v'"), Token::Char('\x0b'));
    }

    #[test]
    fn test_char_hex_escape() {
        assert_eq!(first_token("'\\x41'"), Token::Char('A'));
    }

    #[test]
    fn test_char_unicode_escapes() {
        assert_eq!(first_token("'\\u00e9'"), Token::Char('é'));
        assert_eq!(first_token("'\\U0001F600'"), Token::Char('\u{1F600}'));
    }

    #[test]
    fn test_byte_char() {
        assert_eq!(first_token("b'A'"), Token::Byte(65));
        assert_eq!(first_token("B'\\xff'"), Token::Byte(255));
    }

    #[test]
    fn test_byte_char_out_of_range() {
        let (tokens, handler) = lex_with_errors("b'€'");
        assert_eq!(tokens, vec![Token::Byte(0)]);
        assert_eq!(
            handler.diagnostics()[0].code,
            Some(DiagnosticCode::E1007)
        );
    }

    #[test]
    fn test_simple_string() {
        assert_eq!(
            first_token("\"hello\""),
            Token::Str(Symbol::intern("hello"))
        );
        assert_eq!(first_token("\"\""), Token::Str(Symbol::intern("")));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            first_token("\"a\\nb\\tc\\\"d\""),
            Token::Str(Symbol::intern("a\nb\tc\"d"))
        );
    }

    #[test]
    fn test_string_hex_and_unicode_escapes() {
        assert_eq!(
            first_token("\"\\x41\\u00e9\""),
            Token::Str(Symbol::intern("Aé"))
        );
    }

    #[test]
    fn test_multiline_string() {
        assert_eq!(
            first_token("\"\"\"line one\nline two\"\"\""),
            Token::Str(Symbol::intern("line one\nline two"))
        );
    }

    #[test]
    fn test_multiline_string_with_inner_quote() {
        assert_eq!(
            first_token("\"\"\"say \"hi\" done\"\"\""),
            Token::Str(Symbol::intern("say \"hi\" done"))
        );
    }

    #[test]
    fn test_buffer() {
        assert_eq!(
            first_token("b\"hi\\x00\""),
            Token::Buffer(vec![b'h', b'i', 0])
        );
    }

    #[test]
    fn test_buffer_rejects_unicode_escape() {
        let (tokens, handler) = lex_with_errors("b\"\\u0041\"");
        assert_eq!(tokens, vec![Token::Buffer(vec![])]);
        assert_eq!(
            handler.diagnostics()[0].code,
            Some(DiagnosticCode::E1007)
        );
    }

    #[test]
    fn test_buffer_rejects_wide_char() {
        let (tokens, handler) = lex_with_errors("b\"€\"");
        assert_eq!(tokens, vec![Token::Buffer(vec![])]);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, handler) = lex_with_errors("\"abc");
        assert_eq!(tokens, vec![Token::Str(Symbol::intern("abc"))]);
        assert_eq!(
            handler.diagnostics()[0].code,
            Some(DiagnosticCode::E1002)
        );
    }

    #[test]
    fn test_unterminated_string_at_newline() {
        let (tokens, handler) = lex_with_errors("\"abc\nx");
        assert_eq!(
            tokens,
            vec![
                Token::Str(Symbol::intern("abc")),
                Token::Newline,
                ident("x")
            ]
        );
        assert!(handler.has_errors());
    }

    #[test]
    fn test_unterminated_multiline_string() {
        let (tokens, handler) = lex_with_errors("\"\"\"abc");
        assert_eq!(tokens, vec![Token::Str(Symbol::intern("abc"))]);
        assert!(handler.has_errors());
    }

    #[test]
    fn test_unterminated_char() {
        let (_, handler) = lex_with_errors("'a");
        assert!(handler.has_errors());
    }

    #[test]
    fn test_unknown_escape() {
        let (tokens, handler) = lex_with_errors("\"\\q\"");
        // Unknown escapes keep the raw character.
        assert_eq!(tokens, vec![Token::Str(Symbol::intern("q"))]);
        assert_eq!(
            handler.diagnostics()[0].code,
            Some(DiagnosticCode::E1004)
        );
    }

    // ==================== OPERATORS AND DELIMITERS ====================

    #[test]
    fn test_arithmetic_operators() {
        assert_eq!(
            lex_tokens("+ - * / % ^ **"),
            vec![
                Token::Op(Op::Plus),
                Token::Op(Op::Minus),
                Token::Op(Op::Star),
                Token::Op(Op::Slash),
                Token::Op(Op::Percent),
                Token::Op(Op::Caret),
                Token::Op(Op::StarStar),
            ]
        );
    }

    #[test]
    fn test_compound_assignment_operators() {
        assert_eq!(
            lex_tokens("+= -= *= /= %= ^= .="),
            vec![
                Token::Op(Op::PlusEq),
                Token::Op(Op::MinusEq),
                Token::Op(Op::StarEq),
                Token::Op(Op::SlashEq),
                Token::Op(Op::PercentEq),
                Token::Op(Op::CaretEq),
                Token::Op(Op::DotEq),
            ]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            lex_tokens("== != < > <= >="),
            vec![
                Token::Op(Op::EqEq),
                Token::Op(Op::NotEq),
                Token::Op(Op::Lt),
                Token::Op(Op::Gt),
                Token::Op(Op::LtEq),
                Token::Op(Op::GtEq),
            ]
        );
    }

    #[test]
    fn test_bitwise_operators() {
        assert_eq!(
            lex_tokens("& | ~ << >> &= |= ~= <<= >>="),
            vec![
                Token::Op(Op::Ampersand),
                Token::Op(Op::Pipe),
                Token::Op(Op::Tilde),
                Token::Op(Op::Shl),
                Token::Op(Op::Shr),
                Token::Op(Op::AmpersandEq),
                Token::Op(Op::PipeEq),
                Token::Op(Op::TildeEq),
                Token::Op(Op::ShlEq),
                Token::Op(Op::ShrEq),
            ]
        );
    }

    #[test]
    fn test_increment_decrement() {
        assert_eq!(
            lex_tokens("++ --"),
            vec![Token::Op(Op::PlusPlus), Token::Op(Op::MinusMinus)]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            lex_tokens(", : ; . ... ( ) { } [ ] ! -> @"),
            vec![
                Token::Delim(Delim::Comma),
                Token::Delim(Delim::Colon),
                Token::Delim(Delim::Semicolon),
                Token::Delim(Delim::Dot),
                Token::Delim(Delim::Ellipsis),
                Token::Delim(Delim::LParen),
                Token::Delim(Delim::RParen),
                Token::Delim(Delim::LBrace),
                Token::Delim(Delim::RBrace),
                Token::Delim(Delim::LBracket),
                Token::Delim(Delim::RBracket),
                Token::Delim(Delim::Bang),
                Token::Delim(Delim::Arrow),
                Token::Delim(Delim::At),
            ]
        );
    }

    #[test]
    fn test_maximal_munch() {
        assert_eq!(
            lex_tokens("a<<=b"),
            vec![ident("a"), Token::Op(Op::ShlEq), ident("b")]
        );
        assert_eq!(
            lex_tokens("a<<b"),
            vec![ident("a"), Token::Op(Op::Shl), ident("b")]
        );
        assert_eq!(
            lex_tokens("a< <b"),
            vec![ident("a"), Token::Op(Op::Lt), Token::Op(Op::Lt), ident("b")]
        );
    }

    #[test]
    fn test_two_dots_are_two_tokens() {
        assert_eq!(
            lex_tokens("a..b"),
            vec![
                ident("a"),
                Token::Delim(Delim::Dot),
                Token::Delim(Delim::Dot),
                ident("b"),
            ]
        );
    }

    // ==================== NEWLINES AND COMMENTS ====================

    #[test]
    fn test_newline_token() {
        assert_eq!(
            lex_tokens("a\nb"),
            vec![ident("a"), Token::Newline, ident("b")]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        // '\r' is inter-token whitespace, '\n' is the token.
        assert_eq!(
            lex_tokens("a\r\nb"),
            vec![ident("a"), Token::Newline, ident("b")]
        );
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(
            lex_tokens("a # comment\nb"),
            vec![ident("a"), Token::Comment, ident("b")]
        );
    }

    #[test]
    fn test_comment_swallows_newline() {
        // The comment token includes its newline; no separate Newline.
        let tokens = lex_tokens("# only a comment\n");
        assert_eq!(tokens, vec![Token::Comment]);
    }

    #[test]
    fn test_comment_at_eof() {
        assert_eq!(lex_tokens("# no newline"), vec![Token::Comment]);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(lex_tokens(""), Vec::<Token>::new());
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(lex_tokens("  \t  "), Vec::<Token>::new());
    }

    // ==================== ERROR RECOVERY ====================

    #[test]
    fn test_unexpected_character() {
        let (tokens, handler) = lex_with_errors("a $ b");
        assert_eq!(tokens, vec![ident("a"), ident("b")]);
        assert_eq!(
            handler.diagnostics()[0].code,
            Some(DiagnosticCode::E1001)
        );
    }

    #[test]
    fn test_progress_on_garbage() {
        let (tokens, handler) = lex_with_errors("$$$$$");
        assert!(tokens.is_empty());
        assert_eq!(handler.error_count(), 5);
    }

    // ==================== SPANS AND DRIVERS ====================

    #[test]
    fn test_token_spans() {
        let handler = Handler::new();
        let tokens = tokenize("ab + cd", &handler);
        assert_eq!(tokens[0].span.start, 0);
        assert_eq!(tokens[0].span.end, 2);
        assert_eq!(tokens[1].span.start, 3);
        assert_eq!(tokens[1].span.end, 4);
        assert_eq!(tokens[2].span.start, 5);
        assert_eq!(tokens[2].span.end, 7);
    }

    #[test]
    fn test_span_lines() {
        let handler = Handler::new();
        let tokens = tokenize("a\nbb", &handler);
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[2].span.line, 2);
        assert_eq!(tokens[2].span.column, 1);
    }

    #[test]
    fn test_tokenize_ends_with_eof() {
        let handler = Handler::new();
        let tokens = tokenize("x", &handler);
        assert_eq!(tokens.last().unwrap().token, Token::Eof);
        let tokens = tokenize("", &handler);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, Token::Eof);
    }

    #[test]
    fn test_full_coverage_without_errors() {
        // A clean parse consumes the source exactly up to the end.
        let source = "def main() { return 0 }";
        let handler = Handler::new();
        let tokens = tokenize(source, &handler);
        assert!(!handler.has_errors());
        assert_eq!(tokens.last().unwrap().span.start, source.len());
    }

    // ==================== LITERAL ROUND-TRIPS ====================

    #[test]
    fn test_numeric_token_display_round_trip() {
        let cases = vec![
            Token::Int(42),
            Token::UInt(7),
            Token::Byte(255),
            Token::SByte(12),
            Token::Short(300),
            Token::UShort(65535),
            Token::Long(1),
            Token::ULong(u64::MAX),
            Token::Float(1.5),
            Token::Double(0.125),
            Token::IFloat(2.0),
            Token::IDouble(3.25),
        ];
        for tok in cases {
            let printed = tok.to_string();
            assert_eq!(first_token(&printed), tok, "printed form {:?}", printed);
        }
    }

    #[test]
    fn test_string_token_display_round_trip() {
        let cases = vec![
            Token::Char('x'),
            Token::Char('\n'),
            Token::Str(Symbol::intern("plain")),
            Token::Str(Symbol::intern("with \"quotes\" and \\slashes\\")),
            Token::Buffer(vec![0, 1, 2, b'a', 255]),
        ];
        for tok in cases {
            let printed = tok.to_string();
            assert_eq!(first_token(&printed), tok, "printed form {:?}", printed);
        }
    }

    // ==================== PROGRAMS ====================

    #[test]
    fn test_representative_program() {
        let source = "def fib!(T)(n: T) -> T {\n    if n < 2 { return n }\n}";
        let tokens = lex_tokens(source);
        assert_eq!(tokens[0], Token::Keyword(Keyword::Def));
        assert_eq!(tokens[1], ident("fib"));
        assert_eq!(tokens[2], Token::Delim(Delim::Bang));
        assert!(tokens.contains(&Token::Delim(Delim::Arrow)));
        assert!(tokens.contains(&Token::Op(Op::Lt)));
    }
}
