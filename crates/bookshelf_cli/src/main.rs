//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bookshelf_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("bookshelf_core ping={}", bookshelf_core::ping());
    println!("bookshelf_core version={}", bookshelf_core::core_version());
}
