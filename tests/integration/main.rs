//! Integration tests for Sumi-Mirror
//!
//! Every test runs against a wiremock server on localhost and keeps its
//! stores in a temporary directory.

mod crawl_tests;
mod fetch_tests;
