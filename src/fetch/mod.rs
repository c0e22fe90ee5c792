use crate::error::Result;

pub mod decode;
pub mod request;
pub mod task;
pub mod vehicles;

pub use task::{FetchSlot, Generation, Tagged};
pub use vehicles::{Make, VehicleModel, VehicleSource, VpicClient};

pub type FetchResult<T> = Result<T>;
