pub mod convert;
pub mod inspect;
pub mod paste;

pub use convert::{convert, ConvertArgs};
pub use inspect::{inspect, InspectArgs};
pub use paste::{paste, PasteArgs};
