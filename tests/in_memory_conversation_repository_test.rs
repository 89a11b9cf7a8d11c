use ragline::application::ports::{ConversationRepository, RepositoryError};
use ragline::domain::{ConversationId, DEFAULT_TITLE, Sender};
use ragline::infrastructure::persistence::InMemoryConversationRepository;

#[tokio::test]
async fn given_created_conversations_when_listing_then_summaries_follow_creation_order() {
    let repository = InMemoryConversationRepository::new();
    let first = repository.create_conversation().await.unwrap();
    let second = repository.create_conversation().await.unwrap();
    repository
        .append_message(second.id, Sender::User, "Second opens with this")
        .await
        .unwrap();

    let summaries = repository.list_summaries().await.unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, first.id);
    assert_eq!(summaries[0].first_message, DEFAULT_TITLE);
    assert_eq!(summaries[1].id, second.id);
    assert_eq!(summaries[1].first_message, "Second opens with this");
    assert_eq!(summaries[1].title, "Second opens with this");
}

#[tokio::test]
async fn given_unknown_id_when_appending_then_not_found() {
    let repository = InMemoryConversationRepository::new();

    let result = repository
        .append_message(ConversationId::new(), Sender::User, "Hello")
        .await;

    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn given_messages_when_appending_then_earlier_messages_are_untouched() {
    let repository = InMemoryConversationRepository::new();
    let created = repository.create_conversation().await.unwrap();

    repository
        .append_message(created.id, Sender::User, "one")
        .await
        .unwrap();
    let before = repository.get_conversation(created.id).await.unwrap();
    repository
        .append_message(created.id, Sender::Bot, "two")
        .await
        .unwrap();
    let after = repository.get_conversation(created.id).await.unwrap();

    assert_eq!(after.messages[..before.messages.len()], before.messages[..]);
    assert_eq!(after.messages.len(), before.messages.len() + 1);
}
