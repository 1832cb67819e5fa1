//! Driver factories and the default logger.
//!
//! The kernel binds a [`LoggerFactory`], a [`CacheFactory`] and a
//! [`QueueFactory`] during bootstrap; providers extend them with drivers and
//! the kernel binds a logger built from the default `log` driver.
pub mod factory;
pub mod logger;

pub use factory::{
    AnyService, CacheFactory, DriverFactory, LoggerFactory, QueueFactory, cache_factory,
    logger_factory, queue_factory,
};
pub use logger::{LogFacadeLogger, Logger};
