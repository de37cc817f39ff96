//! Transient user-facing notices

mod bus;

pub use bus::{Notice, NoticeBus, NoticeLevel, NoticeSubscriber};
