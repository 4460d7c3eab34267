//! Dry-run execution of withdrawal plans

mod paper_avatar;

pub use paper_avatar::{PaperAvatar, PaperLedger};
