pub mod panel;

pub use panel::EmployeePage;
