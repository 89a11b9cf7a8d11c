mod chatbot;
mod conversations;
mod error_response;
mod health;

pub use chatbot::{ChatbotResponse, MessageRequest, chatbot_handler};
pub use conversations::{
    ConversationResponse, ConversationSummaryResponse, DeleteResponse, MessageResponse,
    create_conversation_handler, delete_conversation_handler, get_conversation_handler,
    list_conversations_handler, send_message_handler,
};
pub use error_response::ErrorResponse;
pub use health::{HealthResponse, health_handler};
