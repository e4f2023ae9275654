pub mod important_dates;
pub mod notifier;
pub mod projects;
