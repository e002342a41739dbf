//! Service layer separating file I/O from the pure image transforms

mod io;

pub use io::ImageIOService;
