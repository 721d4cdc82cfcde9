pub mod choice;
pub mod date_input;
pub mod form;
pub mod popup;
pub mod record_list;
pub mod search_input;
