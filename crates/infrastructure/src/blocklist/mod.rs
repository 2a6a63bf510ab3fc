pub mod bloom;
pub mod membership;
pub mod parser;

pub use bloom::AtomicBloom;
pub use membership::BlocklistMembership;
pub use parser::{parse_blocklist, parse_blocklist_line};
