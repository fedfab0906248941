use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

use crate::{
    entities::movies,
    error::{AppError, AppResult},
    models::NewMovie,
};

const NOT_FOUND: &str = "Movie not found!";
const CREATE_CONFLICT: &str = "Movie already exists!";
const UPDATE_CONFLICT: &str = "Movie already exists. Update not allowed!";

#[derive(Clone)]
pub struct MovieCatalog {
    db: DatabaseConnection,
}

impl MovieCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<movies::Model>> {
        let all = movies::Entity::find().order_by_asc(movies::Column::Id).all(&self.db).await?;
        Ok(all)
    }

    pub async fn get(&self, id: i32) -> AppResult<movies::Model> {
        movies::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))
    }

    pub async fn create(&self, new: NewMovie) -> AppResult<i32> {
        if self.find_duplicate(&new, None).await?.is_some() {
            return Err(AppError::Conflict(CREATE_CONFLICT.to_string()));
        }

        let model = movies::ActiveModel {
            id: Default::default(),
            title: Set(new.title),
            year: Set(new.year),
            actors: Set(new.actors),
        };

        let res = movies::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, CREATE_CONFLICT))?;

        tracing::debug!(id = res.last_insert_id, "movie created");
        Ok(res.last_insert_id)
    }

    pub async fn update(&self, id: i32, new: NewMovie) -> AppResult<()> {
        if self.find_duplicate(&new, Some(id)).await?.is_some() {
            return Err(AppError::Conflict(UPDATE_CONFLICT.to_string()));
        }

        let res = movies::Entity::update_many()
            .col_expr(movies::Column::Title, Expr::value(new.title))
            .col_expr(movies::Column::Year, Expr::value(new.year))
            .col_expr(movies::Column::Actors, Expr::value(new.actors))
            .filter(movies::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| AppError::from_write(e, UPDATE_CONFLICT))?;

        if res.rows_affected == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::debug!(id, "movie updated");
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let res = movies::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(NOT_FOUND.to_string()));
        }

        tracing::debug!(id, "movie deleted");
        Ok(())
    }

    pub async fn delete_many(&self, ids: &[i32]) -> AppResult<u64> {
        if ids.is_empty() {
            return Err(AppError::InvalidInput(
                "No movie(s) to remove! Please select at least one movie.".to_string(),
            ));
        }

        let res = movies::Entity::delete_many()
            .filter(movies::Column::Id.is_in(ids.iter().copied()))
            .exec(&self.db)
            .await?;

        tracing::debug!(requested = ids.len(), deleted = res.rows_affected, "movies deleted");
        Ok(res.rows_affected)
    }

    async fn find_duplicate(&self, new: &NewMovie, exclude: Option<i32>) -> AppResult<Option<i32>> {
        let mut query = movies::Entity::find()
            .filter(movies::Column::Title.eq(new.title.as_str()))
            .filter(movies::Column::Year.eq(new.year));
        if let Some(id) = exclude {
            query = query.filter(movies::Column::Id.ne(id));
        }

        Ok(query.one(&self.db).await?.map(|m| m.id))
    }
}
