//! HTTP API tests. Each test builds the full router over the in-memory
//! store and a temporary local image bucket.

mod admin_test;
mod catalog_test;
mod degrade_test;
mod helpers;
mod image_test;
