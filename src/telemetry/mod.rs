pub mod model;
pub mod poller;
pub mod realtime_db;
pub mod stubs;
