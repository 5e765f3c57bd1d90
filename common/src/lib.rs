mod room;

pub mod games;
pub mod api;

pub use room::*;
pub use api::*;
pub use games::rock_paper_scissors::*;
