mod media;
mod report;

pub use media::*;
pub use report::*;
