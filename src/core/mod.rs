pub mod catalog;
pub mod etl;
pub mod extract;
pub mod pipeline;
pub mod scroll;

pub use crate::domain::model::{PageSnapshot, ResultEntry, TransformResult};
pub use crate::domain::ports::{BrowserLauncher, BrowserSession, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
