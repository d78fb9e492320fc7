pub mod inmem;
pub mod model;
pub mod session;
pub mod validation;
