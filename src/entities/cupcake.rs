use sea_orm::entity::prelude::*;
use serde::Serialize;

pub const DEFAULT_IMAGE_URL: &str = "https://tinyurl.com/demo-cupcake";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cupcakes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub flavor: String,
    #[sea_orm(column_type = "Text")]
    pub size: String,
    pub rating: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Wire shape of a cupcake. All five keys are always present.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CupcakeJson {
    pub id: i32,
    pub flavor: String,
    pub size: String,
    pub rating: f64,
    pub image_url: String,
}

impl Model {
    pub fn serialize(&self) -> CupcakeJson {
        CupcakeJson::from(self.clone())
    }
}

impl From<Model> for CupcakeJson {
    fn from(value: Model) -> CupcakeJson {
        CupcakeJson {
            id: value.id,
            flavor: value.flavor,
            size: value.size,
            rating: value.rating,
            image_url: resolve_image_url(value.image_url),
        }
    }
}

/// Absent or empty urls fall back to [`DEFAULT_IMAGE_URL`].
pub fn resolve_image_url(image_url: Option<String>) -> String {
    match image_url {
        Some(url) if !url.is_empty() => url,
        _ => DEFAULT_IMAGE_URL.to_owned(),
    }
}
