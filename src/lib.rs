pub mod compare_options;
pub mod compare_result;
pub mod compare_task_spawner;
pub mod csv;
pub mod csv_compare;
pub mod visitor;

mod reconciler;
mod row_key;
mod row_registry;
mod stream_matcher;
