//! Forces dynamic linking of `sota_internal` when the `dynamic_linking` feature is enabled.

#[allow(unused_imports)]
pub use sota_internal::*;
