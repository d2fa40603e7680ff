use std::collections::TryReserveError;

use thiserror::Error;

use crate::geometry::{Dimensions, Screen};

#[derive(Debug, Error)]
pub enum RenderError {
    /// Storage for the destination pixel buffer could not be acquired.
    #[error("unable to lock {size} pixel buffer for software rendering: {source}")]
    Allocation {
        size: Dimensions<Screen>,
        #[source]
        source: TryReserveError,
    },
}
