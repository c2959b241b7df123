//! InMemory Connection Repository 実装

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionRepository, ConnectionRequest, RepositoryError, RequestId, RequestStatus, UserId,
    UserPair,
};

/// インメモリ Connection Repository 実装
pub struct InMemoryConnectionRepository {
    requests: Arc<Mutex<HashMap<String, ConnectionRequest>>>,
}

impl InMemoryConnectionRepository {
    /// 空のストアを持つ新しい InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn sorted_most_recent_first(mut requests: Vec<ConnectionRequest>) -> Vec<ConnectionRequest> {
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        requests
    }
}

impl Default for InMemoryConnectionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn insert(&self, request: ConnectionRequest) -> Result<(), RepositoryError> {
        let mut requests = self.requests.lock().await;
        requests.insert(request.id.as_str().to_string(), request);
        Ok(())
    }

    async fn find(&self, id: &RequestId) -> Result<Option<ConnectionRequest>, RepositoryError> {
        let requests = self.requests.lock().await;
        Ok(requests.get(id.as_str()).cloned())
    }

    async fn save(&self, request: ConnectionRequest) -> Result<(), RepositoryError> {
        let mut requests = self.requests.lock().await;
        if !requests.contains_key(request.id.as_str()) {
            return Err(RepositoryError::NotFound(
                "connection request",
                request.id.as_str().to_string(),
            ));
        }
        requests.insert(request.id.as_str().to_string(), request);
        Ok(())
    }

    async fn list_incoming(
        &self,
        user: &UserId,
    ) -> Result<Vec<ConnectionRequest>, RepositoryError> {
        let requests = self.requests.lock().await;
        let incoming = requests
            .values()
            .filter(|r| &r.to_user == user && r.status == RequestStatus::Pending)
            .cloned()
            .collect();
        Ok(Self::sorted_most_recent_first(incoming))
    }

    async fn list_sent(&self, user: &UserId) -> Result<Vec<ConnectionRequest>, RepositoryError> {
        let requests = self.requests.lock().await;
        let sent = requests
            .values()
            .filter(|r| &r.from_user == user && r.status == RequestStatus::Pending)
            .cloned()
            .collect();
        Ok(Self::sorted_most_recent_first(sent))
    }

    async fn list_accepted(
        &self,
        user: &UserId,
    ) -> Result<Vec<ConnectionRequest>, RepositoryError> {
        let requests = self.requests.lock().await;
        let accepted = requests
            .values()
            .filter(|r| r.involves(user) && r.status == RequestStatus::Accepted)
            .cloned()
            .collect();
        Ok(Self::sorted_most_recent_first(accepted))
    }

    async fn find_pending_between(
        &self,
        pair: &UserPair,
    ) -> Result<Option<ConnectionRequest>, RepositoryError> {
        let requests = self.requests.lock().await;
        Ok(requests
            .values()
            .find(|r| {
                r.status == RequestStatus::Pending
                    && pair.contains(&r.from_user)
                    && pair.contains(&r.to_user)
            })
            .cloned())
    }
}
