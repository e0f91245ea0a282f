pub mod checksum;
pub mod crc;
pub mod template;

pub use crc::Crc32;
pub use template::FrameTemplate;
