//! Shared foundations for gtsh: configuration, convoy context, and the agent
//! collaborator contract the interactive shell drives.

pub mod agent;
pub mod agents;
pub mod config;
pub mod convoy;
pub mod logging;
pub mod shutdown;
