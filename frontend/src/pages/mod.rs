pub mod dashboard;
pub mod employee;
pub mod employees;
pub mod login;
pub mod not_found;
pub mod overview;
pub mod profile;
pub mod reports;
pub mod schedule;
