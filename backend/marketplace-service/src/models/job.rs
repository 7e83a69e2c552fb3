use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Realtor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub price: Option<f64>,
    pub applicants: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job together with the realtor who posted it.
#[derive(Debug, Clone, Serialize)]
pub struct JobWithOwner {
    #[serde(flatten)]
    pub job: Job,
    pub owner: Realtor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub from_realtor: Uuid,
    pub to_realtor: Uuid,
    pub job_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub from_realtor: Uuid,
    pub to_realtor: Uuid,
    pub job_id: Option<Uuid>,
    pub rating: i16,
    pub comment: Option<String>,
}
