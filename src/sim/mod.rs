pub mod event;
pub mod input_queue;
pub mod level;
pub mod step;
pub mod world;
