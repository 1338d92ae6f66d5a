pub mod conversation_repo;
pub mod message_repo;

pub use conversation_repo::ConversationRepository;
pub use message_repo::MessageRepository;
