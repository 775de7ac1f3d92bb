pub mod cupcake;

use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, Schema};
use crate::entities::cupcake::Entity as Cupcake;

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut create_cupcake_table = schema.create_table_from_entity(Cupcake);
    create_cupcake_table.if_not_exists();

    db.execute(backend.build(&create_cupcake_table)).await?;
    tracing::debug!("cupcakes schema ready");
    Ok(())
}
