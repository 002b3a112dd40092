//! Input readers - parse source code into the syntax tree.

#[cfg(any(feature = "read-csharp", feature = "read-powershell"))]
mod syntax;

#[cfg(feature = "read-csharp")]
pub mod csharp;

#[cfg(feature = "read-csharp")]
pub use csharp::{CSHARP_READER, CSharpReader, read_csharp};

#[cfg(feature = "read-powershell")]
pub mod powershell;

#[cfg(feature = "read-powershell")]
pub use powershell::{POWERSHELL_READER, PowerShellReader, read_powershell};
