//! # Resource factories
//!
//! Deferred constructors for the processor's external resources. A factory
//! captures its connection options when the config is built and only touches
//! the network when [`ResourceFactory::open`] is called. Every call opens a new,
//! independently owned resource; releasing it is up to the caller.
use async_trait::async_trait;
use log::info;

use crate::models::ResourceError;

#[cfg(test)]
use mockall::automock;

mod database;
pub use database::*;

mod queue;
pub use queue::*;

#[async_trait]
#[cfg_attr(test, automock(type Resource = u32;))]
pub trait ResourceFactory: Send + Sync {
    type Resource: Send;

    /// Opens a new resource from the captured options.
    async fn open(&self) -> Result<Self::Resource, ResourceError>;
}

/// Opens the database and then the queue client.
///
/// The queue is not attempted when the database fails. If the queue fails,
/// the already opened database resource is dropped.
pub async fn open_resources<D, Q>(
    database: &D,
    queue: &Q,
) -> Result<(D::Resource, Q::Resource), ResourceError>
where
    D: ResourceFactory,
    Q: ResourceFactory,
{
    let database = database.open().await?;
    info!("Database resource opened");

    let queue = queue.open().await?;
    info!("Queue resource opened");

    Ok((database, queue))
}
