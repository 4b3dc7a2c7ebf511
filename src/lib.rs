//! DataCure: load a tabular file, clean it with a fixed pipeline, and save
//! the result. The desktop front-end lives in `main.rs`; this library holds
//! everything that does not need a window.

pub mod data;
