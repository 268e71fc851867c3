// File I/O operations

pub mod xlsx;
