//! Progress reporting while requests are in flight

pub mod reporter;
