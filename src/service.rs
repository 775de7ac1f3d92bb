//! Storage operations over the `cupcakes` table.
//!
//! Every function takes the connection it should run on, so handlers can pass
//! an open transaction and commit once the whole operation succeeded.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder, Set,
};
use thiserror::Error;

use crate::entities::cupcake::{self, Entity as CupcakeEntity, DEFAULT_IMAGE_URL};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No cupcake with id {0}")]
    NotFound(i32),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Validated create payload. Never carries an id.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCupcake {
    pub flavor: String,
    pub size: String,
    pub rating: f64,
    pub image_url: Option<String>,
}

/// Partial update. `None` always means "leave the column alone".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CupcakePatch {
    pub flavor: Option<String>,
    pub size: Option<String>,
    pub rating: Option<f64>,
    pub image_url: Option<String>,
}

/// What an empty `image_url` does on update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyImageUrl {
    /// Empty string is treated as "no value supplied".
    #[default]
    Keep,
    /// Empty string resets the column to [`DEFAULT_IMAGE_URL`].
    ResetToDefault,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdatePolicy {
    pub empty_image_url: EmptyImageUrl,
}

impl UpdatePolicy {
    /// flavor and size have no default to fall back to, so empty strings are
    /// always skipped for them.
    pub fn apply(&self, cupcake: &mut cupcake::ActiveModel, patch: CupcakePatch) {
        if let Some(flavor) = patch.flavor.filter(|flavor| !flavor.is_empty()) {
            cupcake.flavor = Set(flavor);
        }
        if let Some(size) = patch.size.filter(|size| !size.is_empty()) {
            cupcake.size = Set(size);
        }
        if let Some(rating) = patch.rating {
            cupcake.rating = Set(rating);
        }
        match patch.image_url {
            Some(url) if !url.is_empty() => cupcake.image_url = Set(Some(url)),
            Some(_) => {
                if self.empty_image_url == EmptyImageUrl::ResetToDefault {
                    cupcake.image_url = Set(Some(DEFAULT_IMAGE_URL.to_owned()));
                }
            }
            None => {}
        }
    }
}

pub struct CupcakeQuery;

impl CupcakeQuery {
    pub async fn find_all<C: ConnectionTrait>(conn: &C) -> Result<Vec<cupcake::Model>, DbErr> {
        CupcakeEntity::find()
            .order_by_asc(cupcake::Column::Id)
            .all(conn)
            .await
    }

    pub async fn find_by_id<C: ConnectionTrait>(
        conn: &C,
        id: i32,
    ) -> Result<cupcake::Model, StoreError> {
        CupcakeEntity::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    pub async fn count<C: ConnectionTrait>(conn: &C) -> Result<u64, DbErr> {
        CupcakeEntity::find().count(conn).await
    }
}

pub struct CupcakeMutation;

impl CupcakeMutation {
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        new_cupcake: NewCupcake,
    ) -> Result<cupcake::Model, DbErr> {
        let image_url = cupcake::resolve_image_url(new_cupcake.image_url);

        cupcake::ActiveModel {
            flavor: Set(new_cupcake.flavor),
            size: Set(new_cupcake.size),
            rating: Set(new_cupcake.rating),
            image_url: Set(Some(image_url)),
            ..Default::default()
        }
        .insert(conn)
        .await
    }

    pub async fn update<C: ConnectionTrait>(
        conn: &C,
        id: i32,
        patch: CupcakePatch,
        policy: UpdatePolicy,
    ) -> Result<cupcake::Model, StoreError> {
        let current = CupcakeQuery::find_by_id(conn, id).await?;
        let mut cupcake: cupcake::ActiveModel = current.clone().into();
        policy.apply(&mut cupcake, patch);

        // nothing to write, an UPDATE with no columns is invalid SQL
        if !cupcake.is_changed() {
            return Ok(current);
        }

        Ok(cupcake.update(conn).await?)
    }

    pub async fn delete<C: ConnectionTrait>(conn: &C, id: i32) -> Result<i32, StoreError> {
        let result = CupcakeEntity::delete_by_id(id).exec(conn).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(id)
    }
}
