//! Client/plumber conversations

use super::request::FormBuilder;
use super::{ApiRequest, ClientError, PlumbClient};
use crate::types::{
    Chat, ChatMessage, MarkReadRequest, MessageKind, NewAttachmentMessage, NewTextMessage,
    OpenChatRequest,
};

impl PlumbClient {
    pub async fn chats(&self) -> Result<Vec<Chat>, ClientError> {
        self.execute_list(ApiRequest::get("/chats/")).await
    }

    /// Get the chat with `receiver_id`, creating it on first contact
    pub async fn open_chat(&self, receiver_id: i64) -> Result<Chat, ClientError> {
        let request = ApiRequest::post("/chats/").json(&OpenChatRequest { receiver_id })?;
        self.execute(request).await
    }

    pub async fn chat(&self, id: i64) -> Result<Chat, ClientError> {
        self.execute(ApiRequest::get(format!("/chats/{id}/"))).await
    }

    pub async fn chat_messages(&self, chat_id: i64) -> Result<Vec<ChatMessage>, ClientError> {
        let request = ApiRequest::get("/chat-messages/").query([("chat", chat_id.to_string())]);
        self.execute_list(request).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        content: impl Into<String>,
    ) -> Result<ChatMessage, ClientError> {
        let request = ApiRequest::post("/chat-messages/").json(&NewTextMessage {
            chat: chat_id,
            content: content.into(),
            message_type: MessageKind::Text,
        })?;
        self.execute(request).await
    }

    /// Send an image or file; the attachment goes in the field named after
    /// the message kind
    pub async fn send_attachment(
        &self,
        message: &NewAttachmentMessage,
    ) -> Result<ChatMessage, ClientError> {
        let kind = message.kind.as_str();
        let request = ApiRequest::post("/chat-messages/").multipart(
            FormBuilder::default()
                .text("chat", message.chat)
                .text("content", &message.content)
                .text("message_type", kind)
                .file(kind, Some(&message.attachment))
                .finish(),
        );
        self.execute(request).await
    }

    /// Mark every message of a chat as read
    pub async fn mark_chat_read(&self, chat_id: i64) -> Result<(), ClientError> {
        let request =
            ApiRequest::post("/chat-messages/mark_read/").json(&MarkReadRequest { chat_id })?;
        self.execute_empty(request).await
    }

    pub async fn delete_message(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::delete(format!("/chat-messages/{id}/")))
            .await
    }

    pub async fn archive_chat(&self, id: i64) -> Result<(), ClientError> {
        self.execute_empty(ApiRequest::post(format!("/chats/{id}/archive/")))
            .await
    }
}
