mod company;
mod contact;
mod task;

pub use company::{Company, CompanyPatch, NewCompany};
pub use contact::{CompanyName, Contact, ContactPatch, NewContact};
pub use task::{ContactName, NewTask, Task, TaskPatch, TaskPriority, TaskStatus};
