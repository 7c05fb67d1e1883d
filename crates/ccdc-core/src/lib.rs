pub mod consts;
pub mod error;
pub mod model;
pub mod select;
pub mod unpack;
pub mod extract;
pub mod io;
pub mod pipeline;
