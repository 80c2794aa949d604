pub mod health;
pub mod info;
pub mod metrics;
pub mod oicp;
pub mod process_id;
