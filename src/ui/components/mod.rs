pub mod data_table;
pub mod dialogs;
pub mod dropdown;
pub mod editable_cell;
