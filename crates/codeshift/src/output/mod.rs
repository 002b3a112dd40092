//! Output writers - render the tree as source code.

pub mod cstyle;
pub mod emitter;

pub use emitter::{Emitter, Render, WriteOptions};

#[cfg(feature = "write-csharp")]
pub mod csharp;

#[cfg(feature = "write-csharp")]
pub use csharp::{CSHARP_WRITER, CSharpWriter, CSharpWriterImpl};

#[cfg(feature = "write-powershell")]
pub mod powershell;

#[cfg(feature = "write-powershell")]
pub use powershell::{POWERSHELL_WRITER, PowerShellWriter, PowerShellWriterImpl};
