use sea_orm::entity::prelude::*;

/// `seq` is the row's insertion sequence and doubles as the primary key;
/// `id` is the public identifier.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub seq: i64,
    #[sea_orm(unique)]
    pub id: Uuid,
    pub reception_id: Uuid,
    pub product_type: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::receptions::Entity",
        from = "Column::ReceptionId",
        to = "super::receptions::Column::Id"
    )]
    Reception,
}

impl Related<super::receptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reception.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
