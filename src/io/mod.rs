pub mod config_io;
pub mod persist;
pub mod recovery;
pub mod state;
pub mod storage;
pub mod store_io;
