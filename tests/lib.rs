//! Shared helpers for the tickerscope behavior and contract suites.

pub mod support;
