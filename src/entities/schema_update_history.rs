use sea_orm::{ActiveValue::NotSet, ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::types::{SchemaUpdate, UpdateOutcome, UpdateResult};

/// One attempt to apply one update. Rows are only ever appended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "schema_update_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(column_name = "index")]
    pub index: i64,

    pub file_name: String,

    pub started_at: DateTimeUtc,

    pub ended_at: Option<DateTimeUtc>,

    pub result: UpdateResult,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn update(&self) -> SchemaUpdate {
        SchemaUpdate::new(self.name.clone(), self.index, self.file_name.clone())
    }
}

impl From<&UpdateOutcome> for ActiveModel {
    fn from(outcome: &UpdateOutcome) -> Self {
        Self {
            id: NotSet,
            name: Set(outcome.name.clone()),
            index: Set(outcome.index),
            file_name: Set(outcome.filename.clone()),
            started_at: Set(outcome.started_at),
            ended_at: Set(outcome.ended_at),
            result: Set(outcome.result),
        }
    }
}
