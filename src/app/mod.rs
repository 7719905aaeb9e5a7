// Application layer: the update cycle and the ports it drives.
pub mod archive;
pub mod cycle;
pub mod ports;
pub mod scheduler;
