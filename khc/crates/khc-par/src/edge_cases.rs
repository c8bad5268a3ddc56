//! Edge case and end-to-end tests for khc-par.
