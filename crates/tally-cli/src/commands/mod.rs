pub mod assignment;
pub mod dashboard;
pub mod dispatch;
pub mod history;
pub mod import;
pub mod init;
pub mod metrics;
pub mod rebuild;
pub mod session;
pub mod shared;
