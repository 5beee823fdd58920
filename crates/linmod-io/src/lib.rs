pub mod csv_io;
pub mod error;
pub mod model_io;

pub use csv_io::*;
pub use error::IoError;
pub use model_io::*;
