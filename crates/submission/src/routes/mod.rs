pub mod important_dates;
pub mod projects;
