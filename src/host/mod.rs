//! Host-side object model and interception contract.
//!
//! - [`value`]: handles to host objects, lists and constructors
//! - [`adapter`]: the render entry point capability a host exposes
//! - [`synthetic`]: an in-process fake host for tests and demos

pub mod adapter;
pub mod synthetic;
pub mod value;

pub use adapter::{HostAdapter, RenderCall, RenderFn};
pub use synthetic::{HostClasses, SyntheticHost};
pub use value::{ClassId, ClassRef, FunctionRef, ListRef, ObjectId, ObjectRef, Value};
