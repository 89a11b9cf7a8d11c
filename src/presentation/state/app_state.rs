use std::sync::Arc;

use crate::application::ports::ConversationRepository;
use crate::application::services::ChatService;

#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub conversation_repository: Arc<dyn ConversationRepository>,
}
