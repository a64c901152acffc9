mod content_type;
mod interface;
mod lock;
#[cfg(test)]
mod tests;

pub use content_type::*;
pub use interface::*;
pub use lock::*;
