pub mod layout;
pub mod table;
