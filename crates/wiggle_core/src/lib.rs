//! # wiggle_core - Wiggle Core
//!
//! Dependency-free primitives shared by every Wiggle crate:
//! - **Handles**: generational, typed references to scene objects and
//!   collections that go stale when their target is deleted
//! - **Settings**: the live per-scene, per-armature and per-bone spring
//!   parameters a host stores
//! - **Host traits**: the narrow read/write surface the settings
//!   serializer uses to walk a host scene
//! - **Persistence**: atomic temp-file-and-rename writes
//!
//! Enable the `serde` feature to make the settings records and handle maps
//! serializable.

pub mod handle;
pub mod host;
pub mod persist;
pub mod settings;

pub use handle::*;
pub use host::*;
pub use settings::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::handle::{Handle, HandleAllocator, HandleMap};
    pub use crate::host::{Host, TargetTable};
    pub use crate::settings::{
        BoneSettings, Collection, ColliderType, Endpoint, EndpointSettings, RigSettings,
        SceneObject, SceneSettings,
    };
}
