use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::entities::cupcake::CupcakeJson;
use crate::middleware::logging::{to_response, ApiError};
use crate::service::{CupcakeMutation, CupcakePatch, CupcakeQuery, NewCupcake, UpdatePolicy};

//ROUTERS
pub fn cupcake_router(db: Arc<DatabaseConnection>, policy: UpdatePolicy) -> Router {
    Router::new()
        .route("/cupcakes", get(get_cupcakes).post(create_cupcake))
        .route(
            "/cupcakes/:id",
            get(get_cupcake).patch(patch_cupcake).delete(delete_cupcake),
        )
        .layer(Extension(db))
        .layer(Extension(policy))
}

//ROUTES
async fn get_cupcakes(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    match CupcakeQuery::find_all(&*db).await {
        Ok(cupcakes) => {
            let cupcakes: Vec<CupcakeJson> = cupcakes.into_iter().map(CupcakeJson::from).collect();
            to_response(
                (StatusCode::OK, Json(json!({ "cupcakes": cupcakes }))),
                Ok(()),
            )
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn get_cupcake(
    Path(id): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    match CupcakeQuery::find_by_id(&*db, id).await {
        Ok(cupcake) => to_response(
            (StatusCode::OK, Json(json!({ "cupcake": cupcake.serialize() }))),
            Ok(()),
        ),
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn create_cupcake(
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Json(payload): Json<CreateCupcake>,
) -> Response {
    tracing::debug!(?payload, "create_cupcake");

    let new_cupcake = match NewCupcake::try_from(payload) {
        Ok(new_cupcake) => new_cupcake,
        Err(err) => return err.into_response(),
    };

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match CupcakeMutation::create(&txn, new_cupcake).await {
        Ok(cupcake) => match txn.commit().await {
            Ok(_) => to_response(
                (
                    StatusCode::CREATED,
                    Json(json!({ "cupcake": CupcakeJson::from(cupcake) })),
                ),
                Ok(()),
            ),
            Err(err) => ApiError::from(err).into_response(),
        },
        Err(err) => {
            //NOT NULL / driver failure
            let _ = txn.rollback().await;
            ApiError::from(err).into_response()
        }
    }
}

async fn patch_cupcake(
    Path(id): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
    Extension(policy): Extension<UpdatePolicy>,
    Json(payload): Json<PatchCupcake>,
) -> Response {
    tracing::debug!(id = %id, ?payload, "patch_cupcake");

    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match CupcakeMutation::update(&txn, id, payload.into(), policy).await {
        Ok(cupcake) => match txn.commit().await {
            Ok(_) => to_response(
                (
                    StatusCode::OK,
                    Json(json!({ "cupcake": CupcakeJson::from(cupcake) })),
                ),
                Ok(()),
            ),
            Err(err) => ApiError::from(err).into_response(),
        },
        Err(err) => {
            let _ = txn.rollback().await;
            ApiError::from(err).into_response()
        }
    }
}

async fn delete_cupcake(
    Path(id): Path<String>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(err) => return err.into_response(),
    };

    let txn = match db.begin().await {
        Ok(txn) => txn,
        Err(_) => return ApiError::TransactionCreationFailed.into_response(),
    };

    match CupcakeMutation::delete(&txn, id).await {
        Ok(deleted) => match txn.commit().await {
            Ok(_) => to_response(
                (StatusCode::OK, Json(json!({ "deleted": [deleted] }))),
                Ok(()),
            ),
            Err(err) => ApiError::from(err).into_response(),
        },
        Err(err) => {
            let _ = txn.rollback().await;
            ApiError::from(err).into_response()
        }
    }
}

//Utils
/// Anything that is not a key the table can hold is simply an unknown cupcake.
fn parse_id(raw: &str) -> Result<i32, ApiError> {
    raw.parse::<i32>().map_err(|_| ApiError::NotFound(raw.to_owned()))
}

//Struct
/// Every key is optional on the wire so absence can be reported by name.
/// Unknown keys, `id` included, are ignored.
#[derive(Deserialize, Clone, Debug)]
struct CreateCupcake {
    flavor: Option<String>,
    size: Option<String>,
    rating: Option<f64>,
    image_url: Option<String>,
}

impl TryFrom<CreateCupcake> for NewCupcake {
    type Error = ApiError;

    fn try_from(value: CreateCupcake) -> Result<NewCupcake, ApiError> {
        Ok(NewCupcake {
            flavor: value.flavor.ok_or(ApiError::MissingField("flavor"))?,
            size: value.size.ok_or(ApiError::MissingField("size"))?,
            rating: value.rating.ok_or(ApiError::MissingField("rating"))?,
            image_url: value.image_url.filter(|url| !url.is_empty()),
        })
    }
}

#[derive(Deserialize, Clone, Debug)]
struct PatchCupcake {
    flavor: Option<String>,
    size: Option<String>,
    rating: Option<f64>,
    image_url: Option<String>,
}

impl From<PatchCupcake> for CupcakePatch {
    fn from(value: PatchCupcake) -> CupcakePatch {
        CupcakePatch {
            flavor: value.flavor,
            size: value.size,
            rating: value.rating,
            image_url: value.image_url,
        }
    }
}
