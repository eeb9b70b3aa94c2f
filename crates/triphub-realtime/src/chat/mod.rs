//! Community-trip chat: transcript state machine, derived question
//! threads, and the send service with optimistic input rollback.

pub mod service;
pub mod store;
pub mod thread;

pub use service::ChatService;
pub use store::ChatStore;
pub use thread::QuestionThread;
