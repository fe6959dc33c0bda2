//! Ask plain-language questions about the resources in an Azure subscription.
//!
//! A query is classified by a Conversational Language Understanding project
//! and answered from a snapshot of the subscription taken at startup.
//!
//! - [`azure`] - Resource Manager authentication, HTTP and listing
//! - [`catalog`] - Startup snapshot and the operations over it
//! - [`nlu`] - Language service client and prediction types
//! - [`interpreter`] - Maps predictions onto catalog operations
//! - [`config`] - Environment and file configuration

pub mod azure;
pub mod catalog;
pub mod config;
pub mod interpreter;
pub mod nlu;
