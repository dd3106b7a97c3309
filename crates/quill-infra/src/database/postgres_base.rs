//! Generic CRUD over a SeaORM entity, shared by the blog repositories.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, SqlErr,
};

use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

/// CRUD for one entity; domain types convert to and from its model.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Map a SeaORM error onto the domain's repository error.
///
/// Unique and foreign-key violations become [`RepoError::Constraint`] so
/// callers can turn a lost race (two sign-ups, a post deleted mid-comment)
/// into a form error instead of a 500.
pub(crate) fn repo_error(err: DbErr) -> RepoError {
    if let Some(violation) = err.sql_err() {
        match violation {
            SqlErr::UniqueConstraintViolation(detail)
            | SqlErr::ForeignKeyConstraintViolation(detail) => {
                return RepoError::Constraint(detail);
            }
            _ => {}
        }
    }

    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        DbErr::RecordNotFound(_) => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Clone + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        E::find_by_id(id)
            .one(&self.db)
            .await
            .map(|found| found.map(T::from))
            .map_err(repo_error)
    }

    /// Updates the row when it exists, inserts it otherwise.
    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();

        let model = match active_model.clone().update(&self.db).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => {
                active_model.insert(&self.db).await.map_err(repo_error)?
            }
            Err(e) => return Err(repo_error(e)),
        };

        Ok(model.into())
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let deleted = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(repo_error)?;

        match deleted.rows_affected {
            0 => Err(RepoError::NotFound),
            _ => Ok(()),
        }
    }
}
