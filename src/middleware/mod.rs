pub use access_log::access_log;

mod access_log;
