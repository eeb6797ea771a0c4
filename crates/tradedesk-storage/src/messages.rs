//! In-memory conversation store

use async_trait::async_trait;
use tracing::debug;

use tradedesk_core::messaging::{
    Conversation, ConversationFilter, ConversationPatch, ConversationSummary, NewConversation,
};
use tradedesk_core::store::MessageStore;
use tradedesk_core::{Error, Result, TenantId};

use crate::Latency;
use crate::table::{Record, TenantTable};

impl Record for Conversation {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct MemoryMessageStore {
    conversations: TenantTable<Conversation>,
    latency: Latency,
}

impl MemoryMessageStore {
    pub fn new(latency: Latency) -> Self {
        Self {
            conversations: TenantTable::new(),
            latency,
        }
    }

    /// Insert a conversation as-is (seeding)
    pub async fn insert(&self, tenant: TenantId, conversation: Conversation) {
        self.conversations.push(tenant, conversation).await;
    }

    async fn modify(
        &self,
        tenant: TenantId,
        id: &str,
        f: impl FnOnce(&mut Conversation),
    ) -> Result<Conversation> {
        self.latency.wait().await;
        self.conversations
            .modify(tenant, id, f)
            .await
            .map(|(_, c)| c)
            .ok_or_else(|| Error::not_found("Conversation", id))
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn list(
        &self,
        tenant: TenantId,
        filter: &ConversationFilter,
    ) -> Result<Vec<ConversationSummary>> {
        self.latency.wait().await;
        let mut rows: Vec<ConversationSummary> = self
            .conversations
            .filter(tenant, |c| filter.matches(c))
            .await
            .iter()
            .map(Conversation::summary)
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }

    async fn get(&self, tenant: TenantId, id: &str) -> Result<Conversation> {
        self.latency.wait().await;
        self.conversations
            .find(tenant, id)
            .await
            .ok_or_else(|| Error::not_found("Conversation", id))
    }

    async fn create(
        &self,
        tenant: TenantId,
        sender: &str,
        conversation: NewConversation,
    ) -> Result<Conversation> {
        conversation.validate()?;
        self.latency.wait().await;
        let conversation = conversation.into_conversation(sender);
        debug!(tenant = %tenant, conversation = %conversation.id, "Started conversation");
        Ok(self.conversations.push(tenant, conversation).await)
    }

    async fn reply(
        &self,
        tenant: TenantId,
        id: &str,
        sender: &str,
        body: String,
    ) -> Result<Conversation> {
        if body.trim().is_empty() {
            return Err(Error::InvalidRequest("message body is empty".to_string()));
        }
        self.modify(tenant, id, |c| {
            c.push_message(sender, body);
        })
        .await
    }

    async fn mark_read(&self, tenant: TenantId, id: &str) -> Result<Conversation> {
        self.modify(tenant, id, |c| {
            c.mark_all_read();
        })
        .await
    }

    async fn update(
        &self,
        tenant: TenantId,
        id: &str,
        patch: ConversationPatch,
    ) -> Result<Conversation> {
        self.modify(tenant, id, |c| c.apply(patch)).await
    }

    async fn delete(&self, tenant: TenantId, id: &str) -> Result<()> {
        self.latency.wait().await;
        if self.conversations.remove(tenant, id).await {
            Ok(())
        } else {
            Err(Error::not_found("Conversation", id))
        }
    }

    async fn unread_total(&self, tenant: TenantId) -> Result<usize> {
        self.latency.wait().await;
        Ok(self
            .conversations
            .filter(tenant, |c| !c.archived)
            .await
            .iter()
            .map(Conversation::unread_count)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_conversation(subject: &str) -> NewConversation {
        NewConversation {
            subject: subject.to_string(),
            participants: vec!["agent@broker.test".to_string()],
            related_request: None,
            body: "Hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_reply_and_read_flow() {
        let store = MemoryMessageStore::new(Latency::none());
        let tenant = TenantId::new();
        let conv = store
            .create(tenant, "buyer@acme.test", new_conversation("Freight quote"))
            .await
            .unwrap();
        assert_eq!(conv.messages.len(), 1);
        assert_eq!(store.unread_total(tenant).await.unwrap(), 0);

        store
            .update(
                tenant,
                &conv.id,
                ConversationPatch {
                    starred: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // Incoming message lands unread
        store
            .conversations
            .modify(tenant, &conv.id, |c| {
                c.messages.push(tradedesk_core::messaging::Message {
                    id: "msg_in".to_string(),
                    sender: "agent@broker.test".to_string(),
                    body: "Rate is $1,850 per 40ft".to_string(),
                    sent_at: chrono::Utc::now(),
                    read: false,
                })
            })
            .await
            .unwrap();
        assert_eq!(store.unread_total(tenant).await.unwrap(), 1);

        let read = store.mark_read(tenant, &conv.id).await.unwrap();
        assert_eq!(read.unread_count(), 0);
        assert!(read.starred);

        let replied = store
            .reply(tenant, &conv.id, "buyer@acme.test", "Booked".to_string())
            .await
            .unwrap();
        assert_eq!(replied.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let store = MemoryMessageStore::new(Latency::none());
        let tenant = TenantId::new();
        let first = store
            .create(tenant, "me", new_conversation("First"))
            .await
            .unwrap();
        store.create(tenant, "me", new_conversation("Second")).await.unwrap();
        store
            .reply(tenant, &first.id, "me", "bump".to_string())
            .await
            .unwrap();

        let rows = store.list(tenant, &ConversationFilter::default()).await.unwrap();
        assert_eq!(rows[0].subject, "First");
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_reply_rejected() {
        let store = MemoryMessageStore::new(Latency::none());
        let tenant = TenantId::new();
        let conv = store.create(tenant, "me", new_conversation("x")).await.unwrap();
        assert!(store.reply(tenant, &conv.id, "me", "  ".to_string()).await.is_err());
        assert!(store.delete(tenant, "conv_missing").await.is_err());
    }
}
