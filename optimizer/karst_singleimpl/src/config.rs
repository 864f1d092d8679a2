//! Analysis configuration.
//!
//! Parsing config files is the driver's job; this is the plain data the
//! analysis consumes. Name lists match the interface's dotted name
//! exactly; package lists match by prefix.

/// Allow/deny lists applied by the structural validators.
///
/// Allow-lists are evaluated before deny-lists: a candidate retained by
/// either allow-list can never be escaped by a deny-list.
#[derive(Clone, Debug, Default)]
pub struct SingleImplConfig {
    /// Exact interface names to retain.
    pub allow_names: Vec<String>,
    /// Package prefixes to retain.
    pub allow_packages: Vec<String>,
    /// Exact interface names to escape.
    pub deny_names: Vec<String>,
    /// Package prefixes to escape.
    pub deny_packages: Vec<String>,
}
