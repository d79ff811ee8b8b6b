//! Shared building blocks for the OpenDesign packages: the octopus layer
//! types every other crate passes around, a visitor over layer trees and the
//! asset sources used to resolve image references.

pub mod assets;
pub mod error;
pub mod octopus;
pub mod result;
pub mod visitor;

pub use assets::*;
pub use error::*;
pub use octopus::*;
pub use result::*;
pub use visitor::*;
