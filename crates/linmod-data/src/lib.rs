pub mod batch;
pub mod init;

pub use batch::*;
pub use init::*;
