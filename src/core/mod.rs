pub mod email;
pub mod etl;
pub mod exclusion;
pub mod filters;
pub mod pipeline;
pub mod table;
pub mod worker;
pub mod writer;

pub use crate::domain::model::{Table, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
