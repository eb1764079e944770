pub mod event;
pub mod level;
pub mod queue;
pub mod step;
pub mod world;
