pub mod discovery;
pub mod probe;
pub mod prober;
pub mod scanner;
pub mod server;
