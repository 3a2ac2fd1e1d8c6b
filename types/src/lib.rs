//! Contains the data types that the subscription publish engine reads and
//! writes on its wire surface. Binary serialization of these types is the
//! transport's concern and lives elsewhere; this crate only defines the values
//! themselves, plus the date/time and status code machinery they depend on.

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

/// Tracing macro for obtaining a read lock on a `RwLock`. If a deadlock
/// is suspected, run with trace logging to see which lock was the last to
/// be taken before things stopped.
#[macro_export]
macro_rules! trace_read_lock_unwrap {
    ( $x:expr ) => {
        {
            use std::thread;
            trace!("Thread {:?} acquiring read lock on {} at {}, line {}", thread::current().id(), stringify!($x), file!(), line!());
            let v = $x.read().unwrap();
            trace!("Thread {:?} obtained read lock on {}", thread::current().id(), stringify!($x));
            v
        }
    }
}

/// Tracing macro for obtaining a write lock on a `RwLock`.
#[macro_export]
macro_rules! trace_write_lock_unwrap {
    ( $x:expr ) => {
        {
            use std::thread;
            trace!("Thread {:?} acquiring write lock on {} at {}, line {}", thread::current().id(), stringify!($x), file!(), line!());
            let v = $x.write().unwrap();
            trace!("Thread {:?} obtained write lock on {}", thread::current().id(), stringify!($x));
            v
        }
    }
}

/// Tracing macro for obtaining a lock on a `Mutex`.
#[macro_export]
macro_rules! trace_lock_unwrap {
    ( $x:expr ) => {
        {
            use std::thread;
            trace!("Thread {:?} acquiring lock on {} at {}, line {}", thread::current().id(), stringify!($x), file!(), line!());
            let v = $x.lock().unwrap();
            trace!("Thread {:?} obtained lock on {}", thread::current().id(), stringify!($x));
            v
        }
    }
}

mod data_value;
mod date_time;
mod request_header;
mod response_header;
mod status_code;
mod variant;

pub mod service_types;

pub use crate::{
    data_value::*,
    date_time::*,
    request_header::*,
    response_header::*,
    status_code::*,
    variant::*,
};
