pub mod clock;
pub mod error;
pub mod printer;
pub mod rank;
pub mod render;
pub mod sink;
pub mod world;
