//! Edge case tests for khc-lex.


#[cfg(test)]
mod property_tests {
    use crate::{tokenize, Lexer, Token};
    use khc_util::Handler;
    use proptest::prelude::*;

    proptest! {
        /// The lexer terminates and never panics on arbitrary input.
        #[test]
        fn prop_lexer_total(source in ".*") {
            let handler = Handler::new();
            let _tokens: Vec<Token> = Lexer::new(&source, &handler).collect();
        }

        /// The token stream always ends with Eof whose span reaches no
        /// further than the end of the buffer.
        #[test]
        fn prop_tokenize_bounded(source in ".*") {
            let handler = Handler::new();
            let tokens = tokenize(&source, &handler);
            let last = tokens.last().unwrap();
            prop_assert_eq!(&last.token, &Token::Eof);
            prop_assert!(last.span.end <= source.len());
        }

        /// Integer literals round-trip through their printed form.
        #[test]
        fn prop_int_literal_round_trip(value in 0i32..=i32::MAX) {
            let handler = Handler::new();
            let printed = Token::Int(value).to_string();
            let tokens: Vec<Token> = Lexer::new(&printed, &handler).collect();
            prop_assert_eq!(tokens, vec![Token::Int(value)]);
            prop_assert!(!handler.has_errors());
        }

        /// Unsigned literals round-trip through their printed form.
        #[test]
        fn prop_ulong_literal_round_trip(value in 0u64..=u64::MAX) {
            let handler = Handler::new();
            let printed = Token::ULong(value).to_string();
            let tokens: Vec<Token> = Lexer::new(&printed, &handler).collect();
            prop_assert_eq!(tokens, vec![Token::ULong(value)]);
            prop_assert!(!handler.has_errors());
        }
    }
}
