//! Client generated from `schema.graphql` by the build script.
//!
//! The schema declares types named `Result`, `Option`, `Box` and `Client`
//! next to ordinary fleet types, so this crate only compiles while generated
//! code keeps every path absolute.

pub mod enums {
    include!(concat!(env!("OUT_DIR"), "/enums.rs"));
}

pub mod operations {
    include!(concat!(env!("OUT_DIR"), "/operations.rs"));
}

pub mod types {
    include!(concat!(env!("OUT_DIR"), "/types.rs"));
}

pub use operations::Api;
