/// Main test module that includes all sub-modules
/// Run specific tests with `cargo test <module>::<submodule>`
/// For example: `cargo test integration::pipeline_test`
// Utility modules
pub mod utils;

// Integration tests
pub mod integration {
    pub mod encoding_test;
    pub mod pipeline_test;
    pub mod rules_test;
    pub mod schema_test;
}
