pub mod json_item_store;
