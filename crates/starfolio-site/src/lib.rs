//! Portfolio page shell.
//!
//! Static content, skill-card flip state and the page application that hosts
//! the animated backdrop.

pub mod content;
pub mod shell;
pub mod skills;

pub use shell::PageShell;
pub use skills::SkillDeck;
