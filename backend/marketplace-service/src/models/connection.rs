use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Pagination, RealtorSummary};

/// Connection request between two realtors.
///
/// `from_id` sent the request. `connected` flips to true once `to_id` accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Connection {
    pub id: Uuid,
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub connected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    pub fn involves(&self, realtor_id: Uuid) -> bool {
        self.from_id == realtor_id || self.to_id == realtor_id
    }

    pub fn is_between(&self, a: Uuid, b: Uuid) -> bool {
        (self.from_id == a && self.to_id == b) || (self.from_id == b && self.to_id == a)
    }

    /// The party that is not `realtor_id`.
    pub fn other_party(&self, realtor_id: Uuid) -> Option<Uuid> {
        if self.from_id == realtor_id {
            Some(self.to_id)
        } else if self.to_id == realtor_id {
            Some(self.from_id)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionWithRealtors {
    #[serde(flatten)]
    pub connection: Connection,
    pub from_realtor: RealtorSummary,
    pub to_realtor: RealtorSummary,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ConnectionFilter {
    /// Matches either side of the connection
    pub realtor_id: Option<Uuid>,
    pub connected: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ConnectionFilter {
    pub fn page(&self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset,
        }
    }

    pub fn matches(&self, connection: &Connection) -> bool {
        self.realtor_id.map_or(true, |id| connection.involves(id))
            && self.connected.map_or(true, |c| connection.connected == c)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ConnectionUpdate {
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Block {
    pub id: Uuid,
    pub from_realtor: Uuid,
    pub to_realtor: Uuid,
    pub created_at: DateTime<Utc>,
}

/// How `realtor_id` relates to `other_id`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipStatus {
    pub connected: bool,
    /// A request exists in either direction but is not accepted
    pub pending: bool,
    /// `other_id` blocked `realtor_id`
    pub is_blocked: bool,
    /// `realtor_id` blocked `other_id`
    pub is_blocking: bool,
}
