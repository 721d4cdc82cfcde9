pub mod companies;
pub mod company_form;
pub mod components;
pub mod contact_form;
pub mod contacts;
pub mod pages;
pub mod route;
pub mod sidebar;
pub mod task_form;
pub mod tasks;
pub mod theme;
