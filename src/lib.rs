#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `sota-rs` decodes a compact polygon animation format captured from a planar-framebuffer
//! demo and renders it in software: a command stream decoder, an XOR scanline fill on
//! simulated bit-planes, a shape tweener, and a palette compositor.
//!
pub use sota_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use sota_dylib;
