use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use crate::{
    entities::actor,
    error::{AppError, AppResult},
    models::NewActor,
};

const NOT_FOUND: &str = "Actor not found!";
const CREATE_CONFLICT: &str = "Actor already exists in database!";
const UPDATE_CONFLICT: &str = "Actor already exists. Update not allowed!";

#[derive(Clone)]
pub struct ActorCatalog {
    db: DatabaseConnection,
}

impl ActorCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<actor::Model>> {
        let actors = actor::Entity::find().order_by_asc(actor::Column::Id).all(&self.db).await?;
        Ok(actors)
    }

    pub async fn get(&self, id: i32) -> AppResult<actor::Model> {
        actor::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    /// Inserts a new actor and returns its generated id.
    pub async fn create(&self, new: NewActor) -> AppResult<i32> {
        if self.find_duplicate(&new, None).await?.is_some() {
            return Err(AppError::Conflict(CREATE_CONFLICT.to_string()));
        }

        let model = actor::ActiveModel {
            id: Default::default(),
            name: Set(new.name),
            surname: Set(new.surname),
        };

        let res = actor::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, CREATE_CONFLICT))?;

        tracing::debug!(id = res.last_insert_id, "actor created");
        Ok(res.last_insert_id)
    }

    /// Overwrites both fields of actor `id`. The conflict check runs before
    /// the row is known to exist, so a taken pair wins over a missing id.
    pub async fn update(&self, id: i32, new: NewActor) -> AppResult<()> {
        if self.find_duplicate(&new, Some(id)).await?.is_some() {
            return Err(AppError::Conflict(UPDATE_CONFLICT.to_string()));
        }

        let res = actor::Entity::update_many()
            .col_expr(actor::Column::Name, Expr::value(new.name))
            .col_expr(actor::Column::Surname, Expr::value(new.surname))
            .filter(actor::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, UPDATE_CONFLICT))?;

        if res.rows_affected == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::debug!(id, "actor updated");
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let res = actor::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::debug!(id, "actor deleted");
        Ok(())
    }

    /// Deletes every listed id that exists and returns how many rows went.
    pub async fn delete_many(&self, ids: &[i32]) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput(
                "No actor(s) to remove! Please select at least one actor.".to_string(),
            ));
        }

        let res = actor::Entity::delete_many()
            .filter(actor::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;

        tracing::debug!(requested = ids.len(), deleted = res.rows_affected, "actors deleted");
        Ok(res.rows_affected)
    }

    async fn find_duplicate(&self, new: &NewActor, exclude: Option<i32>) -> AppResult<Option<i32>> {
        let mut query = actor::Entity::find()
            .filter(actor::Column::Name.eq(new.name.as_str()))
            .filter(actor::Column::Surname.eq(new.surname.as_str()));
        if let Some(id) = exclude {
            query = query.filter(actor::Column::Id.ne(id));
        }

        Ok(query.one(&self.db).await?.map(|m| m.id))
    }
}
