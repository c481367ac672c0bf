//! Runtime TypeScript modules embedded at compile time.
//!
//! These modules are written in TypeScript in the `runtime/` directory
//! and embedded into the compiler binary using `include_str!`.

/// Validation helpers (`sString`, `sEnum`, `sObject`, ...) used by generated
/// endpoint functions. Emitted in the `Validation` section.
pub const VALIDATION: &str = include_str!("../../runtime/validation.ts");
/// `makeHttpRequest` and its path/query helpers. Emitted in the `HTTP` section.
pub const HTTP: &str = include_str!("../../runtime/http.ts");
/// Shared declarations parsed after the user's sources, never emitted as is.
pub const PRELUDE_TS: &str = include_str!("../../runtime/prelude.ts");

/// Interfaces every client registers, whether or not an endpoint uses them.
pub const CORE_INTERFACES: [&str; 3] = ["Instance", "IdInput", "Message"];
