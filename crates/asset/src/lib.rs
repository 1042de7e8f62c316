//! Asset loading: OBJ meshes turned into flat, renderer-ready buffers.

pub mod error;
pub mod mesh;
pub mod obj;

pub use error::{MeshError, MeshResult};
pub use mesh::{Mesh, MeshVertex};
pub use obj::{load_mesh_from_path, load_mesh_from_reader, parse_mesh};
