pub mod create;
pub mod delete;
pub mod get_first_list_item;
pub mod get_full_list;
pub mod get_list;
pub mod get_one;
pub mod update;
