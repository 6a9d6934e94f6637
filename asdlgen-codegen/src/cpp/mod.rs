//! C++ code generation passes.

pub mod decls;
pub mod enums;
pub mod forward;
pub mod methods;
pub mod types;

pub use decls::DeclPass;
pub use enums::EnumTablePass;
pub use forward::ForwardDeclPass;
pub use methods::MethodPass;
pub use types::CppTypes;
