use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    entities::{actor, movies},
    error::{AppError, AppResult},
};

/// Body of `POST /actors` and `PUT /actors/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ActorRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewActor {
    pub name: String,
    pub surname: String,
}

impl ActorRequest {
    pub fn validate(self) -> AppResult<NewActor> {
        match (non_empty(self.name), non_empty(self.surname)) {
            (Some(name), Some(surname)) => Ok(NewActor { name, surname }),
            _ => Err(AppError::InvalidInput(
                "All fields: name and surname are required!".to_string(),
            )),
        }
    }
}

/// Body of `POST /movies` and `PUT /movies/{id}`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MovieRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub actors: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub actors: String,
}

impl MovieRequest {
    pub fn validate(self) -> AppResult<NewMovie> {
        match (non_empty(self.title), self.year, non_empty(self.actors)) {
            (Some(title), Some(year), Some(actors)) => Ok(NewMovie { title, year, actors }),
            _ => Err(AppError::InvalidInput(
                "All fields title/year/actors are required!".to_string(),
            )),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct ActorResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
}

impl From<actor::Model> for ActorResponse {
    fn from(m: actor::Model) -> Self {
        Self { id: m.id, name: m.name, surname: m.surname }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct MovieResponse {
    pub id: i32,
    pub title: String,
    pub year: i32,
    pub actors: String,
}

impl From<movies::Model> for MovieResponse {
    fn from(m: movies::Model) -> Self {
        Self { id: m.id, title: m.title, year: m.year, actors: m.actors }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i32,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum BatchDeleteResponse {
    Complete {
        message: String,
        deleted_ids: Vec<i32>,
    },
    Partial {
        message: String,
        requested_ids: Vec<i32>,
        actual_deleted_count: u64,
    },
}

impl BatchDeleteResponse {
    /// `plural` names the catalog in messages, e.g. "actors".
    pub fn new(plural: &str, requested_ids: Vec<i32>, deleted: u64) -> Self {
        let requested = requested_ids.len() as u64;
        if deleted < requested {
            BatchDeleteResponse::Partial {
                message: format!(
                    "Operation partially successful. Deleted {deleted} out of {requested} requested {plural}."
                ),
                requested_ids,
                actual_deleted_count: deleted,
            }
        } else {
            BatchDeleteResponse::Complete {
                message: format!("All selected {plural} deleted successfully!"),
                deleted_ids: requested_ids,
            }
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SumQuery {
    /// Defaults to 0.
    #[serde(default)]
    pub x: i64,
    /// Defaults to 10.
    #[serde(default = "default_y")]
    pub y: i64,
}

fn default_y() -> i64 {
    10
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GeocodeQuery {
    pub lat: f64,
    pub lon: f64,
}
