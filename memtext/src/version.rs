pub const MEMTEXT_VERSION: &str = env!("CARGO_PKG_VERSION");
