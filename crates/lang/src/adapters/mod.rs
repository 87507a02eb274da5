//! One adapter per supported language.

mod cpp;
mod csharp;
mod javascript;
mod python;
mod vue;

pub use cpp::CppAdapter;
pub use csharp::CSharpAdapter;
pub use javascript::JavaScriptAdapter;
pub use python::PythonAdapter;
pub use vue::VueAdapter;
