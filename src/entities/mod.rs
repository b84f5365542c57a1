pub mod schema_update_history;

pub use schema_update_history::{
    ActiveModel as HistoryActiveModel, Column as HistoryColumn, Entity as HistoryEntity,
    Model as HistoryModel,
};
