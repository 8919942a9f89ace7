//! Small helpers that don't belong to any particular part of the machine.

pub mod bit_splitter;
